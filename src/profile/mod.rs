//! Profile validation.
//!
//! This module turns caller-supplied raw field maps into a validated
//! `CreatorProfile`. Validation is pure: every violated constraint is
//! collected into a single `ValidationError` so the caller can surface
//! all problems at once instead of fixing them one at a time.

use crate::models::{
    AchievementRecord, BusinessRecord, BusinessStatus, ChallengeRecord, CreatorProfile,
    ResolutionStatus, ValueRecord,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

/// A single violated constraint, qualified by the field that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Caller-input defect. Always recoverable: lists every violation.
#[derive(Debug, Error)]
#[error("profile validation failed with {} violation(s)", violations.len())]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// One line per violation, for user-facing output.
    pub fn describe(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("  - {}", v))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Raw creator fields as supplied by the input collaborator.
///
/// Status and resolution labels stay as free strings here so that
/// closed-set violations are reported by field instead of failing
/// during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub niche: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub channel_age_years: i64,
    #[serde(default)]
    pub businesses: Vec<RawBusiness>,
    #[serde(default)]
    pub values: Vec<RawValue>,
    #[serde(default)]
    pub achievements: Vec<RawAchievement>,
    #[serde(default)]
    pub challenges: Vec<RawChallenge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBusiness {
    #[serde(default)]
    pub name: String,
    pub founded: NaiveDate,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub performance: f64,
}

fn default_status() -> String {
    "active".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawValue {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAchievement {
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub magnitude: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawChallenge {
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default = "default_resolution")]
    pub resolution: String,
}

fn default_resolution() -> String {
    "unknown".to_string()
}

/// Validate raw fields into a `CreatorProfile`.
///
/// Returns every violated constraint at once. Value labels are
/// deduplicated case-insensitively, keeping the first occurrence's
/// weight. No side effects beyond pure validation.
pub fn validate(raw: RawProfile, analysis_date: NaiveDate) -> Result<CreatorProfile, ValidationError> {
    let mut violations = Vec::new();

    if raw.name.trim().is_empty() {
        violations.push(Violation {
            field: "name".to_string(),
            message: "must not be empty".to_string(),
        });
    }
    if raw.channel_id.trim().is_empty() {
        violations.push(Violation {
            field: "channel_id".to_string(),
            message: "must not be empty".to_string(),
        });
    }
    if raw.channel_age_years < 0 {
        violations.push(Violation {
            field: "channel_age_years".to_string(),
            message: format!("must be >= 0, got {}", raw.channel_age_years),
        });
    }

    let mut businesses = Vec::with_capacity(raw.businesses.len());
    for (i, b) in raw.businesses.iter().enumerate() {
        let field = |name: &str| format!("businesses[{}].{}", i, name);

        if b.name.trim().is_empty() {
            violations.push(Violation {
                field: field("name"),
                message: "must not be empty".to_string(),
            });
        }
        if b.founded > analysis_date {
            violations.push(Violation {
                field: field("founded"),
                message: format!("{} is after the analysis date {}", b.founded, analysis_date),
            });
        }
        if !(0.0..=100.0).contains(&b.performance) {
            violations.push(Violation {
                field: field("performance"),
                message: format!("must be within [0, 100], got {}", b.performance),
            });
        }
        match BusinessStatus::parse(&b.status) {
            Some(status) => businesses.push(BusinessRecord {
                name: b.name.trim().to_string(),
                founded: b.founded,
                status,
                performance: b.performance,
            }),
            None => violations.push(Violation {
                field: field("status"),
                message: format!(
                    "must be one of active/acquired/defunct, got '{}'",
                    b.status
                ),
            }),
        }
    }

    let mut seen_labels = HashSet::new();
    let mut values = Vec::with_capacity(raw.values.len());
    for (i, v) in raw.values.iter().enumerate() {
        let field = |name: &str| format!("values[{}].{}", i, name);

        if v.label.trim().is_empty() {
            violations.push(Violation {
                field: field("label"),
                message: "must not be empty".to_string(),
            });
            continue;
        }
        if let Some(w) = v.weight {
            if !(0.0..=1.0).contains(&w) {
                violations.push(Violation {
                    field: field("weight"),
                    message: format!("must be within [0, 1], got {}", w),
                });
            }
        }
        // First occurrence wins; later duplicates are dropped silently.
        if seen_labels.insert(v.label.trim().to_lowercase()) {
            values.push(ValueRecord {
                label: v.label.trim().to_string(),
                weight: v.weight,
            });
        }
    }

    let mut achievements = Vec::with_capacity(raw.achievements.len());
    for (i, a) in raw.achievements.iter().enumerate() {
        let field = |name: &str| format!("achievements[{}].{}", i, name);

        if a.description.trim().is_empty() {
            violations.push(Violation {
                field: field("description"),
                message: "must not be empty".to_string(),
            });
        }
        if let Some(m) = a.magnitude {
            if !(0.0..=1.0).contains(&m) {
                violations.push(Violation {
                    field: field("magnitude"),
                    message: format!("must be within [0, 1], got {}", m),
                });
            }
        }
        achievements.push(AchievementRecord {
            description: a.description.trim().to_string(),
            date: a.date,
            magnitude: a.magnitude,
        });
    }

    let mut challenges = Vec::with_capacity(raw.challenges.len());
    for (i, c) in raw.challenges.iter().enumerate() {
        let field = |name: &str| format!("challenges[{}].{}", i, name);

        if c.description.trim().is_empty() {
            violations.push(Violation {
                field: field("description"),
                message: "must not be empty".to_string(),
            });
        }
        match ResolutionStatus::parse(&c.resolution) {
            Some(resolution) => challenges.push(ChallengeRecord {
                description: c.description.trim().to_string(),
                date: c.date,
                resolution,
            }),
            None => violations.push(Violation {
                field: field("resolution"),
                message: format!(
                    "must be one of open/resolved/unknown, got '{}'",
                    c.resolution
                ),
            }),
        }
    }

    if !violations.is_empty() {
        return Err(ValidationError { violations });
    }

    Ok(CreatorProfile {
        name: raw.name.trim().to_string(),
        channel_id: raw.channel_id.trim().to_string(),
        biography: raw.biography,
        niche: raw.niche,
        country: raw.country,
        channel_age_years: raw.channel_age_years as u32,
        businesses,
        values,
        achievements,
        challenges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn valid_raw() -> RawProfile {
        RawProfile {
            name: "Tech Innovators".to_string(),
            channel_id: "@techinnovators".to_string(),
            channel_age_years: 6,
            businesses: vec![RawBusiness {
                name: "Merch Store".to_string(),
                founded: NaiveDate::from_ymd_opt(2019, 3, 1).unwrap(),
                status: "active".to_string(),
                performance: 72.0,
            }],
            values: vec![RawValue {
                label: "Authenticity".to_string(),
                weight: Some(0.9),
            }],
            achievements: vec![RawAchievement {
                description: "Reached 100k subscribers".to_string(),
                date: NaiveDate::from_ymd_opt(2020, 8, 12).unwrap(),
                magnitude: Some(0.7),
            }],
            challenges: vec![RawChallenge {
                description: "Platform demonetization wave".to_string(),
                date: NaiveDate::from_ymd_opt(2019, 11, 3).unwrap(),
                resolution: "resolved".to_string(),
            }],
            ..RawProfile::default()
        }
    }

    #[test]
    fn test_valid_profile_passes() {
        let profile = validate(valid_raw(), analysis_date()).unwrap();
        assert_eq!(profile.name, "Tech Innovators");
        assert_eq!(profile.businesses.len(), 1);
        assert_eq!(profile.businesses[0].status, BusinessStatus::Active);
        assert_eq!(profile.challenges[0].resolution, ResolutionStatus::Resolved);
    }

    #[test]
    fn test_all_violations_reported_at_once() {
        let mut raw = valid_raw();
        raw.name = "".to_string();
        raw.channel_age_years = -1;
        raw.businesses[0].performance = 150.0;
        raw.businesses[0].status = "sold".to_string();

        let err = validate(raw, analysis_date()).unwrap_err();
        let fields: Vec<&str> = err.violations.iter().map(|v| v.field.as_str()).collect();

        assert_eq!(err.violations.len(), 4);
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"channel_age_years"));
        assert!(fields.contains(&"businesses[0].performance"));
        assert!(fields.contains(&"businesses[0].status"));
    }

    #[test]
    fn test_future_founding_date_rejected() {
        let mut raw = valid_raw();
        raw.businesses[0].founded = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();

        let err = validate(raw, analysis_date()).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field, "businesses[0].founded");
    }

    #[test]
    fn test_value_labels_deduplicated_case_insensitively() {
        let mut raw = valid_raw();
        raw.values = vec![
            RawValue {
                label: "Authenticity".to_string(),
                weight: Some(0.9),
            },
            RawValue {
                label: "AUTHENTICITY".to_string(),
                weight: Some(0.1),
            },
            RawValue {
                label: "Quality".to_string(),
                weight: None,
            },
        ];

        let profile = validate(raw, analysis_date()).unwrap();
        assert_eq!(profile.values.len(), 2);
        assert_eq!(profile.values[0].label, "Authenticity");
        // First occurrence's weight wins.
        assert_eq!(profile.values[0].weight, Some(0.9));
    }

    #[test]
    fn test_weight_out_of_range_rejected() {
        let mut raw = valid_raw();
        raw.values[0].weight = Some(1.5);

        let err = validate(raw, analysis_date()).unwrap_err();
        assert_eq!(err.violations[0].field, "values[0].weight");
    }

    #[test]
    fn test_describe_lists_each_violation() {
        let mut raw = valid_raw();
        raw.name = "".to_string();
        raw.channel_id = " ".to_string();

        let err = validate(raw, analysis_date()).unwrap_err();
        let text = err.describe();
        assert!(text.contains("name: must not be empty"));
        assert!(text.contains("channel_id: must not be empty"));
    }
}
