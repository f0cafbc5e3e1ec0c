//! # Types Module
//!
//! Wire types exchanged with the ad-decisioning service. All of them are
//! transient request/response payloads; nothing here is persisted.
//!
//! ## Submodules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`ad`] | Ad slots, ad requests, winning ads, ad responses |
//! | [`events`] | Tracking events and their wire envelope |
//! | [`intelligence`] | Intent, recommendation and campaign listing payloads |
//!
//! ## Example
//!
//! ```rust
//! use patternos_sdk::types::{AdRequest, AdSlot, PageContext, SlotType};
//!
//! let request = AdRequest::new("user-42", PageContext::new("search").with_search_query("oat milk"))
//!     .with_slot(AdSlot::new("hero", SlotType::HeroBanner).with_size("970x250"))
//!     .with_slot(AdSlot::new("grid-3", SlotType::ProductListing).with_position(3));
//!
//! assert_eq!(request.slot_ids().collect::<Vec<_>>(), vec!["hero", "grid-3"]);
//! ```

pub mod ad;
pub mod events;
pub mod intelligence;

pub use ad::{Ad, AdRequest, AdResponse, AdSlot, AuctionDebug, Creative, PageContext, SlotType};
pub use events::{EventType, TrackingEvent, TrackingPayload};
pub use intelligence::{Campaign, CampaignListResult, IntentResult, Recommendation};
