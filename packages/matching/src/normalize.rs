// ABOUTME: Boundary normalization of external item payloads
// ABOUTME: Converts numbers, numeric strings, {count} objects and JSON-encoded strings into plain counts

use givelink_core::{Categorized, Category, RequestedItem};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::MatchError;

/// Normalize a category → item → count payload.
///
/// Accepts an object or a JSON-encoded string of one (multipart forms send the latter).
/// Unknown categories are ignored and entries whose count normalizes to zero or less are dropped.
/// Item names are trimmed, and counts of names that trim to the same item are summed.
pub fn normalize_items(value: &Value) -> Result<Categorized<i64>, MatchError> {
    match value {
        Value::Null => Ok(Categorized::new()),
        Value::String(raw) => {
            let parsed: Value = serde_json::from_str(raw).map_err(|e| {
                debug!("Rejecting unparsable item payload: {}", e);
                MatchError::InvalidItemData
            })?;
            match parsed {
                Value::Object(_) | Value::Null => normalize_items(&parsed),
                _ => Err(MatchError::InvalidItemData),
            }
        }
        Value::Object(categories) => {
            let mut items = Categorized::new();
            for (key, entries) in categories {
                let Ok(category) = key.parse::<Category>() else {
                    continue;
                };
                let Value::Object(entries) = entries else {
                    continue;
                };
                for (name, raw_count) in entries {
                    let name = name.trim();
                    let count = normalize_count(raw_count);
                    if name.is_empty() || count <= 0 {
                        debug!(category = %category, item = name, "Dropping non-positive item");
                        continue;
                    }
                    // Names differing only in surrounding whitespace are the same item
                    let total = items.get_mut(category).entry(name.to_string()).or_insert(0i64);
                    *total = total.saturating_add(count);
                }
            }
            Ok(items)
        }
        _ => Err(MatchError::InvalidItemData),
    }
}

/// Normalize request items into remaining-count records.
pub fn normalize_requested_items(value: &Value) -> Result<Categorized<RequestedItem>, MatchError> {
    Ok(normalize_items(value)?.map(|_, _, &count| RequestedItem { count }))
}

/// Read a single count the way browsers submit it.
///
/// Integers pass through, floats truncate, strings take their leading integer,
/// and `{ "count": .. }` unwraps once. Anything else is 0.
pub fn normalize_count(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => parse_leading_int(s),
        Value::Object(fields) => match fields.get("count") {
            Some(Value::Object(_)) | None => 0,
            Some(inner) => normalize_count(inner),
        },
        _ => 0,
    }
}

/// Normalize a category → [url] payload. Single strings are accepted as one-element lists.
pub fn normalize_images(value: &Value) -> BTreeMap<Category, Vec<String>> {
    let parsed;
    let value = match value {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(v) => {
                parsed = v;
                &parsed
            }
            Err(_) => return BTreeMap::new(),
        },
        other => other,
    };

    let mut images = BTreeMap::new();
    if let Value::Object(categories) = value {
        for (key, urls) in categories {
            let Ok(category) = key.parse::<Category>() else {
                continue;
            };
            let urls: Vec<String> = match urls {
                Value::String(url) => vec![url.clone()],
                Value::Array(list) => list
                    .iter()
                    .filter_map(|u| u.as_str().map(str::to_string))
                    .collect(),
                _ => Vec::new(),
            };
            let urls: Vec<String> = urls.into_iter().filter(|u| !u.trim().is_empty()).collect();
            if !urls.is_empty() {
                images.insert(category, urls);
            }
        }
    }
    images
}

fn parse_leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) => 0,
    }
}
