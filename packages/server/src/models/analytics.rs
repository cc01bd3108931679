use chrono::NaiveDate;
use common::Mood;
use serde::{Deserialize, Serialize};

/// Aggregation window for mood analytics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    Quarter,
}

impl Period {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "7d" => Some(Self::Week),
            "30d" => Some(Self::Month),
            "90d" => Some(Self::Quarter),
            _ => None,
        }
    }

    pub fn days(self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Quarter => "90d",
        }
    }
}

/// Query parameters for the analytics endpoint.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct AnalyticsQuery {
    /// Aggregation window: `7d`, `30d` (default) or `90d`.
    #[param(example = "30d")]
    pub period: Option<String>,
}

/// Aggregated mood for one calendar day.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DayStat {
    /// Calendar date (UTC).
    pub date: NaiveDate,
    /// Average mood score that day, rounded to one decimal.
    #[schema(example = 6.5)]
    pub average_score: f64,
    #[schema(example = 2)]
    pub entry_count: u64,
}

/// Window-wide totals.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AnalyticsSummary {
    #[schema(example = 12)]
    pub total_entries: u64,
    /// Average mood score over the window, rounded to one decimal. Zero
    /// when the window has no entries.
    #[schema(example = 6.8)]
    pub average_score: f64,
    /// Most frequently logged mood, null when the window has no entries.
    pub most_frequent_mood: Option<Mood>,
    /// One-line reading of the average.
    #[schema(example = "Overall positive")]
    pub mood_trend: String,
}

/// Mood analytics over the requested window. Days without entries are
/// omitted from the timeline.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AnalyticsResponse {
    #[schema(example = "30d")]
    pub period: String,
    pub timeline: Vec<DayStat>,
    pub summary: AnalyticsSummary,
}
