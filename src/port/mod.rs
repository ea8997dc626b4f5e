//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams the research pipelines talk through. Adapters
//! implement them against the real APIs; tests implement them in memory.
//!
//! ```text
//!            ┌─────────────────────┐
//!            │     Application     │
//!            │  (research runs)    │
//!            └─────────┬───────────┘
//!          ┌───────────┴────────────┐
//!          ▼                        ▼
//!   ┌──────────────┐         ┌──────────────┐
//!   │ProductCatalog│         │ Marketplace  │
//!   │   (Keepa)    │         │  (Rakuten)   │
//!   └──────────────┘         └──────────────┘
//! ```

mod catalog;
mod marketplace;

pub use catalog::ProductCatalog;
pub use marketplace::Marketplace;
