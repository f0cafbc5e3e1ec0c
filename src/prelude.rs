//! Minimal prelude for application code.
//!
//! Goal: reduce import noise without hiding important concepts.

pub use crate::client::{AdClient, AdClientBuilder};
pub use crate::config::{AdClientConfig, Environment};
pub use crate::error::{Error, RequestFailure};
pub use crate::error_code::FailureClass;
pub use crate::types::{
    Ad, AdRequest, AdResponse, AdSlot, EventType, PageContext, SlotType, TrackingEvent,
};
pub use tokio_util::sync::CancellationToken;
