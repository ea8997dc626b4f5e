//! Marketplace-agnostic domain logic.

pub mod candidate;
pub mod error;
pub mod evaluation;
pub mod fee;
pub mod id;
pub mod listing;
pub mod money;
pub mod product;
pub mod profit;

pub use candidate::{Candidate, ExportRow, GapRow, Genre};
pub use evaluation::{
    Appraisal, BuyOffer, Evaluator, Rejection, SelectionCriteria, ThresholdMode, Verdict,
};
pub use fee::{FeeBreakdown, FeeSchedule, Parcel};
pub use id::{Asin, Jan};
pub use listing::{Listing, ListingQuery, ListingTerm};
pub use money::Yen;
pub use product::{Dimensions, ProductStats};
pub use profit::{Profit, ProfitInput};
