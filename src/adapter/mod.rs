//! Implementations of ports plus file I/O.

pub mod csv;
pub mod http;
pub mod keepa;
pub mod rakuten;
