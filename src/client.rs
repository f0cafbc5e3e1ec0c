//! Ad-decisioning client.
//!
//! The public surface is [`AdClient`] plus its builder; input checks live in
//! `validation`.

pub mod builder;
pub mod core;
mod validation;

pub use builder::AdClientBuilder;
pub use self::core::AdClient;
pub use validation::{DEFAULT_RECOMMENDATION_LIMIT, MAX_RECOMMENDATIONS};
