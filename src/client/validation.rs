//! Caller-input checks performed before any network I/O, and the slot
//! correlation filter applied to ad responses.

use crate::types::{AdRequest, AdResponse};
use crate::{Error, ErrorContext, Result};
use std::collections::HashSet;
use tracing::warn;

/// Limit used by `get_default_recommendations`.
pub const DEFAULT_RECOMMENDATION_LIMIT: u32 = 10;
/// Upper bound applied to recommendation limits before sending.
pub const MAX_RECOMMENDATIONS: u32 = 100;

pub(crate) fn validate_ad_request(request: &AdRequest) -> Result<()> {
    require_user_id(&request.user_id, "request.user_id")?;

    if request.ad_slots.is_empty() {
        return Err(Error::validation_with_context(
            "at least one ad slot is required",
            ErrorContext::new()
                .with_field_path("request.ad_slots")
                .with_source("request_validator"),
        ));
    }

    let mut seen = HashSet::with_capacity(request.ad_slots.len());
    for (idx, slot) in request.ad_slots.iter().enumerate() {
        if slot.id.trim().is_empty() {
            return Err(Error::validation_with_context(
                "ad slot id must not be empty",
                ErrorContext::new()
                    .with_field_path(format!("request.ad_slots[{}].id", idx))
                    .with_source("request_validator"),
            ));
        }
        if !seen.insert(slot.id.as_str()) {
            return Err(Error::validation_with_context(
                format!("duplicate ad slot id '{}'", slot.id),
                ErrorContext::new()
                    .with_field_path(format!("request.ad_slots[{}].id", idx))
                    .with_source("request_validator"),
            ));
        }
    }
    Ok(())
}

pub(crate) fn require_user_id(user_id: &str, field: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(Error::validation_with_context(
            "user_id is required",
            ErrorContext::new()
                .with_field_path(field)
                .with_source("request_validator"),
        ));
    }
    Ok(())
}

/// Reject zero, clamp anything above [`MAX_RECOMMENDATIONS`].
pub(crate) fn recommendation_limit(limit: u32) -> Result<u32> {
    if limit == 0 {
        return Err(Error::validation_with_context(
            "limit must be a positive integer",
            ErrorContext::new()
                .with_field_path("limit")
                .with_source("request_validator"),
        ));
    }
    Ok(limit.min(MAX_RECOMMENDATIONS))
}

/// Drop ads awarded to slots the request never asked for. Returns how many were dropped.
pub(crate) fn retain_requested_slots(request: &AdRequest, response: &mut AdResponse) -> usize {
    let AdResponse {
        auction_id, ads, ..
    } = response;
    let before = ads.len();
    ads.retain(|ad| {
        let requested = request.has_slot(&ad.slot.id);
        if !requested {
            warn!(
                auction_id = auction_id.as_str(),
                slot_id = ad.slot.id.as_str(),
                campaign_id = ad.campaign_id.as_str(),
                "dropping ad for a slot that was not requested"
            );
        }
        requested
    });
    before - ads.len()
}
