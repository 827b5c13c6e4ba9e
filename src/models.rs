//! Data models for the creator analysis engine.
//!
//! This module contains all the core data structures used throughout
//! the application: the validated creator profile, the computed metrics,
//! the narrative sections, and the retained analysis result.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status of a business venture (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessStatus {
    /// Venture is currently operating.
    Active,
    /// Venture was sold or absorbed by another company.
    Acquired,
    /// Venture no longer operates.
    Defunct,
}

impl fmt::Display for BusinessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessStatus::Active => write!(f, "Active"),
            BusinessStatus::Acquired => write!(f, "Acquired"),
            BusinessStatus::Defunct => write!(f, "Defunct"),
        }
    }
}

impl BusinessStatus {
    /// Parse a status label, accepting the closed set only.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(BusinessStatus::Active),
            "acquired" => Some(BusinessStatus::Acquired),
            "defunct" => Some(BusinessStatus::Defunct),
            _ => None,
        }
    }
}

/// Resolution status of a challenge (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStatus {
    Open,
    Resolved,
    Unknown,
}

impl fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionStatus::Open => write!(f, "Open"),
            ResolutionStatus::Resolved => write!(f, "Resolved"),
            ResolutionStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

impl ResolutionStatus {
    /// Parse a resolution label, accepting the closed set only.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "open" => Some(ResolutionStatus::Open),
            "resolved" => Some(ResolutionStatus::Resolved),
            "unknown" => Some(ResolutionStatus::Unknown),
            _ => None,
        }
    }
}

/// A business venture associated with the creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    /// Business name.
    pub name: String,
    /// Founding date. Must not be after the analysis date.
    pub founded: NaiveDate,
    /// Current operational status.
    pub status: BusinessStatus,
    /// Unit-less performance indicator in [0, 100].
    pub performance: f64,
}

/// A core value stated by the creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRecord {
    /// Free-text label, deduplicated case-insensitively within a profile.
    pub label: String,
    /// Optional strength weight in [0, 1].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// A notable career achievement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub description: String,
    pub date: NaiveDate,
    /// Optional magnitude score in [0, 1].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<f64>,
}

/// A significant challenge faced by the creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub description: String,
    pub date: NaiveDate,
    pub resolution: ResolutionStatus,
}

/// Validated in-memory representation of a content creator.
///
/// Produced only by `profile::validate`; invariants (non-empty identity,
/// bounded indicators, deduplicated value labels) hold by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorProfile {
    /// Creator or channel display name.
    pub name: String,
    /// Channel identifier (handle or channel URL slug).
    pub channel_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub niche: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Age of the channel in whole years.
    pub channel_age_years: u32,
    pub businesses: Vec<BusinessRecord>,
    pub values: Vec<ValueRecord>,
    pub achievements: Vec<AchievementRecord>,
    pub challenges: Vec<ChallengeRecord>,
}

impl CreatorProfile {
    /// Normalized identity key used for history lookups.
    pub fn identity_key(&self) -> String {
        self.channel_id.trim().to_lowercase()
    }
}

/// Kind of a merged timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    BusinessFounded,
    Achievement,
    Challenge,
}

impl fmt::Display for TimelineEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimelineEventKind::BusinessFounded => write!(f, "Business founded"),
            TimelineEventKind::Achievement => write!(f, "Achievement"),
            TimelineEventKind::Challenge => write!(f, "Challenge"),
        }
    }
}

/// One dated event on the merged career timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub date: NaiveDate,
    pub kind: TimelineEventKind,
    pub label: String,
    /// Position within the profile walk; ties on `date` keep this order.
    pub source_index: usize,
}

/// Value-impact correlation outcome.
///
/// Fewer than two comparable (weight, outcome) pairs yield the explicit
/// `InsufficientData` sentinel; callers must branch on it rather than
/// reading a numeric artifact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "coefficient", rename_all = "snake_case")]
pub enum ValueImpact {
    /// Bounded correlation coefficient in [-1, 1].
    Coefficient(f64),
    InsufficientData,
}

impl ValueImpact {
    pub fn coefficient(&self) -> Option<f64> {
        match self {
            ValueImpact::Coefficient(c) => Some(*c),
            ValueImpact::InsufficientData => None,
        }
    }
}

impl fmt::Display for ValueImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueImpact::Coefficient(c) => write!(f, "{:.2}", c),
            ValueImpact::InsufficientData => write!(f, "insufficient data"),
        }
    }
}

/// Closed-vocabulary pattern label derived from threshold rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternTag {
    SerialEntrepreneur,
    PivotHeavy,
    ValuesDriven,
    Resilient,
}

impl fmt::Display for PatternTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternTag::SerialEntrepreneur => write!(f, "serial-entrepreneur"),
            PatternTag::PivotHeavy => write!(f, "pivot-heavy"),
            PatternTag::ValuesDriven => write!(f, "values-driven"),
            PatternTag::Resilient => write!(f, "resilient"),
        }
    }
}

/// Record counts carried alongside the derived scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileCounts {
    pub businesses: usize,
    pub active_businesses: usize,
    pub values: usize,
    pub achievements: usize,
    pub challenges: usize,
}

/// Derived metrics computed from a validated profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Business-health composite in [0, 100]; 0 when no businesses exist.
    pub business_health: f64,
    pub value_impact: ValueImpact,
    pub pattern_tags: Vec<PatternTag>,
    pub counts: ProfileCounts,
    /// Year of the earliest dated event, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub career_start_year: Option<i32>,
    /// Dated events per year of career, when the span is at least a year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_frequency: Option<f64>,
    /// Merged career timeline, ordered by date with stable ties.
    pub timeline: Vec<TimelineEvent>,
}

impl Metrics {
    /// Restartable iterator over the ordered timeline.
    pub fn timeline(&self) -> impl Iterator<Item = &TimelineEvent> {
        self.timeline.iter()
    }
}

/// Named prose sections produced by narrative synthesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSections {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub risks: String,
    #[serde(default)]
    pub recommendations: String,
    /// Fallback for response content that could not be mapped to a section.
    #[serde(default)]
    pub uncategorized: String,
}

impl NarrativeSections {
    /// Wrap an unmappable raw response so nothing is discarded.
    pub fn from_raw(raw: String) -> Self {
        Self {
            uncategorized: raw,
            ..Self::default()
        }
    }

    /// True when no section carries any text.
    #[allow(dead_code)] // Utility for callers that branch on degraded output
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
            && self.strengths.is_empty()
            && self.risks.is_empty()
            && self.recommendations.is_empty()
            && self.uncategorized.is_empty()
    }
}

/// Immutable output of one complete analysis run.
///
/// Owns a snapshot of the profile it was computed from. The history
/// tracker only appends and reads these, never mutates them. The
/// `analyzed_at` field is the one volatile field excluded from
/// byte-identity expectations on the JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub profile: CreatorProfile,
    pub metrics: Metrics,
    pub narrative: NarrativeSections,
    pub analyzed_at: DateTime<Utc>,
}

/// Identity-keyed, sequence-ordered wrapper around a retained result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Normalized creator identity (see `CreatorProfile::identity_key`).
    pub identity: String,
    /// Monotonically increasing per store; orders comparisons.
    pub sequence: u64,
    pub recorded_at: DateTime<Utc>,
    pub result: AnalysisResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_status_parse() {
        assert_eq!(BusinessStatus::parse("active"), Some(BusinessStatus::Active));
        assert_eq!(BusinessStatus::parse("Acquired"), Some(BusinessStatus::Acquired));
        assert_eq!(BusinessStatus::parse("DEFUNCT"), Some(BusinessStatus::Defunct));
        assert_eq!(BusinessStatus::parse("sold"), None);
    }

    #[test]
    fn test_identity_key_normalization() {
        let profile = CreatorProfile {
            name: "Test Creator".to_string(),
            channel_id: "  @TechInnovators ".to_string(),
            biography: None,
            niche: None,
            country: None,
            channel_age_years: 5,
            businesses: vec![],
            values: vec![],
            achievements: vec![],
            challenges: vec![],
        };
        assert_eq!(profile.identity_key(), "@techinnovators");
    }

    #[test]
    fn test_value_impact_serde_shape() {
        let json = serde_json::to_string(&ValueImpact::Coefficient(0.5)).unwrap();
        assert!(json.contains("\"kind\":\"coefficient\""));
        assert!(json.contains("0.5"));

        let json = serde_json::to_string(&ValueImpact::InsufficientData).unwrap();
        assert!(json.contains("insufficient_data"));

        let back: ValueImpact = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ValueImpact::InsufficientData);
    }

    #[test]
    fn test_pattern_tag_display() {
        assert_eq!(PatternTag::SerialEntrepreneur.to_string(), "serial-entrepreneur");
        assert_eq!(PatternTag::ValuesDriven.to_string(), "values-driven");
    }

    #[test]
    fn test_narrative_sections_from_raw() {
        let sections = NarrativeSections::from_raw("free-form text".to_string());
        assert_eq!(sections.uncategorized, "free-form text");
        assert!(sections.summary.is_empty());
        assert!(!sections.is_empty());
    }
}
