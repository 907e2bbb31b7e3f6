//! Tax-rate (alícuota) lookup over a static reference dataset.
//!
//! [`AlicuotaService`] answers two questions for a guided selection UI:
//! which values remain valid for the next filter, and which rate applies to
//! a complete (province, year, activity, sub-activity, sub-sub-activity)
//! selection.

pub mod dataset;
pub mod models;
pub mod resolvers;
pub mod service;

pub use dataset::{Dataset, DatasetSummary};
pub use models::*;
pub use resolvers::{GENERAL_CASE_OPTION, ResolveError};
pub use service::AlicuotaService;
