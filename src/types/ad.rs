//! Ad request / response contract of the real-time bidding endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placement kind of an ad slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    HeroBanner,
    Sidebar,
    Footer,
    Native,
    ProductListing,
    Sponsored,
}

impl SlotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotType::HeroBanner => "hero_banner",
            SlotType::Sidebar => "sidebar",
            SlotType::Footer => "footer",
            SlotType::Native => "native",
            SlotType::ProductListing => "product_listing",
            SlotType::Sponsored => "sponsored",
        }
    }
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placement opportunity on a page. `id` is unique within one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdSlot {
    pub id: String,
    #[serde(rename = "type")]
    pub slot_type: SlotType,
    /// Display dimensions, e.g. "300x250".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Ordering hint, e.g. the position inside a product grid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl AdSlot {
    pub fn new(id: impl Into<String>, slot_type: SlotType) -> Self {
        Self {
            id: id.into(),
            slot_type,
            size: None,
            position: None,
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }
}

/// Contextual targeting signals for the page being rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContext {
    pub page_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

impl PageContext {
    pub fn new(page_type: impl Into<String>) -> Self {
        Self {
            page_type: page_type.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }
}

/// A single ad-decisioning query.
///
/// `aggregator` may be left empty: the client always sends its configured
/// aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRequest {
    pub user_id: String,
    #[serde(default)]
    pub aggregator: String,
    pub page_context: PageContext,
    pub ad_slots: Vec<AdSlot>,
}

impl AdRequest {
    pub fn new(user_id: impl Into<String>, page_context: PageContext) -> Self {
        Self {
            user_id: user_id.into(),
            aggregator: String::new(),
            page_context,
            ad_slots: Vec::new(),
        }
    }

    pub fn with_slot(mut self, slot: AdSlot) -> Self {
        self.ad_slots.push(slot);
        self
    }

    pub fn with_slots(mut self, slots: impl IntoIterator<Item = AdSlot>) -> Self {
        self.ad_slots.extend(slots);
        self
    }

    pub fn slot_ids(&self) -> impl Iterator<Item = &str> {
        self.ad_slots.iter().map(|s| s.id.as_str())
    }

    pub fn has_slot(&self, id: &str) -> bool {
        self.ad_slots.iter().any(|s| s.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creative {
    #[serde(rename = "type")]
    pub creative_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

/// The winning creative for one slot.
///
/// Prices and `auction_type` are opaque values decided by the remote auction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ad {
    pub campaign_id: String,
    pub campaign_name: String,
    pub brand: String,
    pub bid_amount: f64,
    pub actual_price: f64,
    pub creative: Creative,
    pub slot: AdSlot,
    pub click_url: String,
    pub auction_type: String,
    /// Offset-less timestamps are read as UTC.
    #[serde(with = "iso8601")]
    pub won_at: DateTime<Utc>,
}

mod iso8601 {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 timestamp '{raw}'")))
    }

    fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuctionDebug {
    #[serde(default)]
    pub eligible_campaigns: u64,
    #[serde(default)]
    pub user_intent_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdResponse {
    pub auction_id: String,
    /// Zero ads is a valid outcome, not an error.
    #[serde(default)]
    pub ads: Vec<Ad>,
    #[serde(default)]
    pub response_time_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<AuctionDebug>,
}

impl AdResponse {
    pub fn is_empty(&self) -> bool {
        self.ads.is_empty()
    }

    pub fn ad_for_slot(&self, slot_id: &str) -> Option<&Ad> {
        self.ads.iter().find(|ad| ad.slot.id == slot_id)
    }
}
