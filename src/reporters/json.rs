//! JSON reporter
//!
//! Outputs any report as pretty-printed JSON with the tier palette
//! attached at the top level, so consumers (map overlays, dashboards)
//! color tiers without hardcoding hex values.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::models::Tier;

/// Render a report as JSON with the tier palette attached
pub fn render<T: Serialize>(report: &T) -> Result<String> {
    let mut value = serde_json::to_value(report)?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("palette".to_string(), palette());
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Render a report as compact JSON (single line)
#[allow(dead_code)] // Public API helper
pub fn render_compact<T: Serialize>(report: &T) -> Result<String> {
    let mut value = serde_json::to_value(report)?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("palette".to_string(), palette());
    }
    Ok(serde_json::to_string(&value)?)
}

fn palette() -> Value {
    let mut map = serde_json::Map::new();
    for tier in [
        Tier::VeryLow,
        Tier::Low,
        Tier::Medium,
        Tier::High,
        Tier::VeryHigh,
    ] {
        map.insert(
            tier.to_string(),
            Value::String(super::tier_hex(tier).to_string()),
        );
    }
    Value::Object(map)
}
