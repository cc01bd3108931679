#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mood attached to a journal entry.
///
/// The catalog is fixed: five moods, each with a stable id, a display label,
/// an emoji, and a sentiment score on a 1-10 scale. Analytics aggregate over
/// the scores, so they are part of the contract and must not be renumbered.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "overjoyed"))]
    Overjoyed,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "happy"))]
    Happy,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "neutral"))]
    Neutral,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "sad"))]
    Sad,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "angry"))]
    Angry,
}

impl Mood {
    /// All moods, ordered from highest to lowest score.
    pub const ALL: &'static [Mood] = &[
        Self::Overjoyed,
        Self::Happy,
        Self::Neutral,
        Self::Sad,
        Self::Angry,
    ];

    /// Stable identifier, used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overjoyed => "overjoyed",
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Sad => "sad",
            Self::Angry => "angry",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Overjoyed => "Overjoyed",
            Self::Happy => "Happy",
            Self::Neutral => "Neutral",
            Self::Sad => "Sad",
            Self::Angry => "Angry",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Overjoyed => "🥳",
            Self::Happy => "😊",
            Self::Neutral => "😐",
            Self::Sad => "😢",
            Self::Angry => "😡",
        }
    }

    /// Sentiment score on a 1-10 scale.
    pub fn score(&self) -> i32 {
        match self {
            Self::Overjoyed => 10,
            Self::Happy => 8,
            Self::Neutral => 5,
            Self::Sad => 3,
            Self::Angry => 2,
        }
    }

    /// Look up a mood by the key a client supplied.
    ///
    /// Keys are matched case-insensitively, so `"HAPPY"`, `"happy"` and
    /// `"Happy"` all resolve to [`Mood::Happy`]. Returns `None` for anything
    /// outside the catalog.
    pub fn from_key(key: &str) -> Option<Mood> {
        match key.to_uppercase().as_str() {
            "OVERJOYED" => Some(Self::Overjoyed),
            "HAPPY" => Some(Self::Happy),
            "NEUTRAL" => Some(Self::Neutral),
            "SAD" => Some(Self::Sad),
            "ANGRY" => Some(Self::Angry),
            _ => None,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid mood id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMoodError {
    invalid: String,
}

impl fmt::Display for ParseMoodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid mood '{}'. Valid values: {}",
            self.invalid,
            Mood::ALL
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseMoodError {}

impl FromStr for Mood {
    type Err = ParseMoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overjoyed" => Ok(Self::Overjoyed),
            "happy" => Ok(Self::Happy),
            "neutral" => Ok(Self::Neutral),
            "sad" => Ok(Self::Sad),
            "angry" => Ok(Self::Angry),
            _ => Err(ParseMoodError {
                invalid: s.to_string(),
            }),
        }
    }
}

/// One-line reading of an average mood score, for the analytics summary.
pub fn trend_for_average(average: f64) -> &'static str {
    if average >= 8.0 {
        "You've been on a high note"
    } else if average >= 6.0 {
        "Overall positive"
    } else if average >= 4.0 {
        "Holding steady"
    } else if average >= 2.0 {
        "Running a little low"
    } else {
        "A rough stretch"
    }
}
