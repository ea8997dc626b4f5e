//! Keepa integration: the Amazon-side product catalog.

pub mod client;
pub mod dto;
pub mod settings;

pub use client::KeepaClient;
pub use settings::KeepaConfig;
