//! Rakuten Ichiba integration: the source-side marketplace.

pub mod client;
pub mod dto;
pub mod settings;

pub use client::RakutenClient;
pub use settings::RakutenConfig;
