//! # patternos-sdk
//!
//! Typed async client for the PatternOS retail-media API: request ads for
//! page slots from the real-time bidding endpoint, post best-effort tracking
//! events, and read intent, recommendation and campaign data.
//!
//! The client performs no auction, ranking or scoring itself. Every call is a
//! single authenticated round-trip to the remote service.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use patternos_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> patternos_sdk::Result<()> {
//!     let client = AdClient::builder()
//!         .api_key("pk_live_...")
//!         .aggregator("freshmart")
//!         .build()?;
//!
//!     let request = AdRequest::new("user-42", PageContext::new("category").with_category("dairy"))
//!         .with_slot(AdSlot::new("hero", SlotType::HeroBanner))
//!         .with_slot(AdSlot::new("sidebar", SlotType::Sidebar).with_size("300x250"));
//!
//!     let response = client.request_ads(&request).await?;
//!     for ad in &response.ads {
//!         println!("{} -> {}", ad.slot.id, ad.creative.headline);
//!         client
//!             .track_event(&TrackingEvent::impression("user-42").with_campaign_id(&ad.campaign_id))
//!             .await;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error handling
//!
//! | Error | When |
//! |-------|------|
//! | [`Error::Configuration`] | Blank API key / aggregator or an unusable URL at construction |
//! | [`Error::Validation`] | Caller input rejected before any I/O |
//! | [`Error::RequestFailed`] | Network failure, timeout, cancellation, non-2xx status, bad body |
//!
//! Tracking never returns an error; failures are logged through `tracing`.
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`AdClient`] and [`AdClientBuilder`] |
//! | [`config`] | Configuration, environments, YAML / env loading |
//! | [`types`] | Wire types for ads, events, intelligence and campaigns |
//! | [`transport`] | Authenticated HTTP transport |
//! | [`error_code`] | Failure classes for `RequestFailed` errors |

pub mod client;
pub mod config;
pub mod error_code;
pub mod prelude;
pub mod transport;
pub mod types;

pub use client::{AdClient, AdClientBuilder};
pub use config::{AdClientConfig, Environment};
pub use tokio_util::sync::CancellationToken;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, RequestFailure};
