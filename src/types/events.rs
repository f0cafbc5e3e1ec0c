//! Tracking events: write-only behavioral signals sent for attribution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Impression,
    Click,
    Conversion,
    View,
    CartAdd,
    Purchase,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Impression => "impression",
            EventType::Click => "click",
            EventType::Conversion => "conversion",
            EventType::View => "view",
            EventType::CartAdd => "cart_add",
            EventType::Purchase => "purchase",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub event_type: EventType,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Value attached to conversion / purchase events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl TrackingEvent {
    pub fn new(event_type: EventType, user_id: impl Into<String>) -> Self {
        Self {
            event_type,
            user_id: user_id.into(),
            ad_id: None,
            campaign_id: None,
            product_id: None,
            revenue: None,
            metadata: None,
        }
    }

    pub fn impression(user_id: impl Into<String>) -> Self {
        Self::new(EventType::Impression, user_id)
    }

    pub fn click(user_id: impl Into<String>) -> Self {
        Self::new(EventType::Click, user_id)
    }

    pub fn conversion(user_id: impl Into<String>, revenue: f64) -> Self {
        Self::new(EventType::Conversion, user_id).with_revenue(revenue)
    }

    pub fn view(user_id: impl Into<String>) -> Self {
        Self::new(EventType::View, user_id)
    }

    pub fn cart_add(user_id: impl Into<String>) -> Self {
        Self::new(EventType::CartAdd, user_id)
    }

    pub fn purchase(user_id: impl Into<String>, revenue: f64) -> Self {
        Self::new(EventType::Purchase, user_id).with_revenue(revenue)
    }

    pub fn with_ad_id(mut self, ad_id: impl Into<String>) -> Self {
        self.ad_id = Some(ad_id.into());
        self
    }

    pub fn with_campaign_id(mut self, campaign_id: impl Into<String>) -> Self {
        self.campaign_id = Some(campaign_id.into());
        self
    }

    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn with_revenue(mut self, revenue: f64) -> Self {
        self.revenue = Some(revenue);
        self
    }

    /// Add one metadata entry, creating the bag on first use.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata
            .get_or_insert_with(serde_json::Map::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Body posted to the tracking endpoint: the event plus sender and send time.
#[derive(Debug, Serialize)]
pub struct TrackingPayload<'a> {
    #[serde(flatten)]
    pub event: &'a TrackingEvent,
    pub platform: &'a str,
    pub timestamp: DateTime<Utc>,
}

impl<'a> TrackingPayload<'a> {
    pub fn new(event: &'a TrackingEvent, platform: &'a str) -> Self {
        Self {
            event,
            platform,
            timestamp: Utc::now(),
        }
    }
}
