//! Goal domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Lifecycle state of a goal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GoalStatus {
    /// Goal is being worked on.
    #[default]
    Active,
    /// Goal was reached.
    Completed,
    /// Goal was given up.
    Abandoned,
}

/// Validated goal fields, everything except the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalFields {
    /// Owner of the goal.
    pub user_id: String,
    /// Short title, at least 3 characters.
    pub title: String,
    /// Free text, empty when omitted.
    pub description: String,
    /// When the goal should be reached.
    pub target_date: DateTime<Utc>,
    /// Current status.
    pub status: GoalStatus,
}

/// A stored health goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Server-assigned identifier, never changes.
    pub id: String,
    /// Owner of the goal.
    pub user_id: String,
    /// Short title.
    pub title: String,
    /// Free text.
    pub description: String,
    /// When the goal should be reached.
    #[serde(with = "millis_timestamp")]
    pub target_date: DateTime<Utc>,
    /// Current status.
    pub status: GoalStatus,
}

impl Goal {
    /// Combine an id with validated fields.
    pub fn from_fields(id: impl Into<String>, fields: GoalFields) -> Self {
        Self {
            id: id.into(),
            user_id: fields.user_id,
            title: fields.title,
            description: fields.description,
            target_date: fields.target_date,
            status: fields.status,
        }
    }
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2025-05-15T00:00:00.000Z`.
pub mod millis_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Canonical string form of a timestamp.
    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
