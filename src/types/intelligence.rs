//! Read-only intelligence and campaign payloads.
//!
//! Scores and flags here are computed by the remote service; the client
//! forwards them untouched. Fields the service adds later are kept in `extra`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    #[serde(default)]
    pub intent_score: f64,
    #[serde(default)]
    pub ready_to_buy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_category: Option<String>,
    #[serde(default, alias = "categories")]
    pub category_scores: HashMap<String, f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The recommendations endpoint answers either with a bare list or wrapped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RecommendationsBody {
    List(Vec<Recommendation>),
    Wrapped { recommendations: Vec<Recommendation> },
}

impl RecommendationsBody {
    pub(crate) fn into_vec(self) -> Vec<Recommendation> {
        match self {
            RecommendationsBody::List(v) => v,
            RecommendationsBody::Wrapped { recommendations } => recommendations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spent: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignListResult {
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}
