//! Client implementation and builder.

mod builder;
mod core;

pub use builder::{AnalysisClientBuilder, API_KEY_ENV};
pub use core::AnalysisClient;
