//! Wire types for the Nebula developer catalog API.
//!
//! Everything the dashboard sends to or receives from
//! `/api/developer/...` lives here, so a server implementation can share the
//! exact same JSON shapes.

pub mod api;
pub mod categories;
pub mod constants;
pub mod errors;
pub mod requests;

pub use api::{App, CategoryRank, Developer, ModerationStatus, PromotionWindow, Stat};
pub use categories::{
    AppCategory, AppKind, Category, CategorySelection, Classification, GameCategory,
    UnknownCategory,
};
pub use errors::ApiErrorBody;
pub use requests::{
    AppSubmission, PromoteRequest, PromoteResponse, PromotionDuration, PromotionPlacement,
};
