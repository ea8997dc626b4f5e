//! Infrastructure configuration modules.

pub mod logging;
pub mod output;
pub mod research;
pub mod selection;
pub mod settings;
