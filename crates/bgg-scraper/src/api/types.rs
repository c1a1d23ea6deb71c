//! geekdo linked-items response types.
//!
//! The endpoint is inconsistent about number encoding: the same field can
//! arrive as a JSON number, a numeric string, an empty string or `null`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use shared::{GameRecord, Rank};

/// One page of `/linkeditems`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkedItemsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<LinkedItem>,
}

/// A game as listed on a designer's or publisher's page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedItem {
    #[serde(deserialize_with = "lenient_string")]
    pub objectid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub yearpublished: i32,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub average: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avgweight: f64,
    #[serde(default, deserialize_with = "lenient_rank")]
    pub rank: Option<u32>,
}

impl LinkedItem {
    /// Convert into a catalog record, attaching the enrichment value
    pub fn into_record(self, collaborator: Option<String>) -> GameRecord {
        GameRecord {
            title: self.name,
            year: self.yearpublished,
            average_score: self.average,
            average_weight: self.avgweight,
            collaborator,
            bgg_id: self.objectid,
            rank: Rank::from_raw(self.rank),
        }
    }
}

fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_from(&value).unwrap_or(0.0))
}

fn lenient_i32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_from(&value)
        .filter(|n| n.fract() == 0.0 && *n >= i32::MIN as f64 && *n <= i32::MAX as f64)
        .map(|n| n as i32)
        .unwrap_or(0))
}

fn lenient_rank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_from(&value)
        .filter(|n| n.fract() == 0.0 && *n > 0.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32))
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<LinkedItem>, D::Error> {
    Ok(Option::<Vec<LinkedItem>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for objectid, got {}",
            other
        ))),
    }
}
