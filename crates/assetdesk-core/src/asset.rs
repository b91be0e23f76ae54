//! Asset registry records as exchanged with the backend REST API.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::ids::AssetId;

/// Lifecycle status of an asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetStatus {
    /// In service.
    #[default]
    Active,
    /// Temporarily out of service.
    Maintenance,
    /// Permanently out of service.
    Retired,
}

impl AssetStatus {
    /// All statuses, in display order.
    pub const ALL: [AssetStatus; 3] = [Self::Active, Self::Maintenance, Self::Retired];

    /// Wire/display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Maintenance => "Maintenance",
            Self::Retired => "Retired",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetStatus {
    type Err = CoreError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CoreError::InvalidInput(format!(
                    "unknown asset status '{}' (expected Active, Maintenance or Retired)",
                    s
                ))
            })
    }
}

/// An asset record returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    pub category: String,
    /// Monetary value.
    pub value: f64,
    pub status: AssetStatus,
    /// Sent as `YYYY-MM-DD`. The backend may answer with a full timestamp or
    /// `null`.
    #[serde(default, deserialize_with = "deserialize_purchase_date")]
    pub purchase_date: Option<NaiveDate>,
}

impl Asset {
    /// The editable fields of this asset.
    pub fn draft(&self) -> AssetDraft {
        AssetDraft {
            name: self.name.clone(),
            category: self.category.clone(),
            value: self.value,
            status: self.status,
            purchase_date: self.purchase_date,
        }
    }
}

/// Body of create and update requests: an asset without its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDraft {
    pub name: String,
    pub category: String,
    pub value: f64,
    pub status: AssetStatus,
    #[serde(default, deserialize_with = "deserialize_purchase_date")]
    pub purchase_date: Option<NaiveDate>,
}

/// Parse a `YYYY-MM-DD` purchase date.
pub fn parse_purchase_date(s: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| CoreError::InvalidInput(format!("invalid purchase date '{}': {}", s, e)))
}

/// Date part of a purchase date as the backend stores it: a plain date, an
/// RFC 3339 timestamp, or a timestamp without offset.
fn parse_wire_date(raw: &str) -> Result<NaiveDate, CoreError> {
    if let Ok(date) = parse_purchase_date(raw) {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.date_naive());
    }
    raw.parse::<NaiveDateTime>()
        .map(|timestamp| timestamp.date())
        .map_err(|e| CoreError::InvalidInput(format!("invalid purchase date '{}': {}", raw, e)))
}

fn deserialize_purchase_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_wire_date(&raw).map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}
