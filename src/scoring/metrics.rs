//! Derived metric computation.
//!
//! This module computes the business-health composite, the value-impact
//! correlation, and the pattern tags. It never fails on a validated
//! profile; empty collections produce defined defaults instead of errors.

use crate::config::ScoringConfig;
use crate::models::{
    BusinessRecord, BusinessStatus, CreatorProfile, Metrics, PatternTag, ProfileCounts,
    ResolutionStatus, ValueImpact,
};
use crate::scoring::timeline::build_timeline;
use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// Status weight for an active business.
pub const ACTIVE_STATUS_WEIGHT: f64 = 1.0;
/// Status weight for an acquired business.
pub const ACQUIRED_STATUS_WEIGHT: f64 = 0.8;
/// Status weight for a defunct business.
pub const DEFUNCT_STATUS_WEIGHT: f64 = 0.3;

/// Default multiplicative decay applied per year since founding.
pub const DEFAULT_RECENCY_DECAY_PER_YEAR: f64 = 0.9;
/// Default minimum business count for the `serial-entrepreneur` tag.
pub const DEFAULT_SERIAL_ENTREPRENEUR_MIN_BUSINESSES: usize = 3;
/// Default minimum business count before `pivot-heavy` applies.
pub const DEFAULT_PIVOT_HEAVY_MIN_BUSINESSES: usize = 2;
/// Default defunct-to-total ratio for the `pivot-heavy` tag.
pub const DEFAULT_PIVOT_HEAVY_DEFUNCT_RATIO: f64 = 0.5;
/// Default correlation coefficient floor for the `values-driven` tag.
pub const DEFAULT_VALUES_DRIVEN_MIN_COEFFICIENT: f64 = 0.5;
/// Default resolved-challenge count for the `resilient` tag.
pub const DEFAULT_RESILIENT_MIN_RESOLVED: usize = 2;

const DAYS_PER_YEAR: f64 = 365.25;

fn status_weight(status: BusinessStatus) -> f64 {
    match status {
        BusinessStatus::Active => ACTIVE_STATUS_WEIGHT,
        BusinessStatus::Acquired => ACQUIRED_STATUS_WEIGHT,
        BusinessStatus::Defunct => DEFUNCT_STATUS_WEIGHT,
    }
}

/// Compute all derived metrics for a validated profile.
pub fn score(profile: &CreatorProfile, config: &ScoringConfig, analysis_date: NaiveDate) -> Metrics {
    let timeline = build_timeline(profile);
    let business_health = business_health(&profile.businesses, config, analysis_date);
    let value_impact = value_impact(profile);
    let pattern_tags = pattern_tags(profile, value_impact, config);

    let counts = ProfileCounts {
        businesses: profile.businesses.len(),
        active_businesses: profile
            .businesses
            .iter()
            .filter(|b| b.status == BusinessStatus::Active)
            .count(),
        values: profile.values.len(),
        achievements: profile.achievements.len(),
        challenges: profile.challenges.len(),
    };

    let career_start_year = timeline.first().map(|e| e.date.year());
    let milestone_frequency = career_start_year.and_then(|start| {
        let span = analysis_date.year() - start;
        if span >= 1 {
            Some(timeline.len() as f64 / span as f64)
        } else {
            None
        }
    });

    debug!(
        health = business_health,
        tags = pattern_tags.len(),
        events = timeline.len(),
        "computed metrics for {}",
        profile.identity_key()
    );

    Metrics {
        business_health,
        value_impact,
        pattern_tags,
        counts,
        career_start_year,
        milestone_frequency,
        timeline,
    }
}

/// Business-health composite: performance weighted by status and recency.
///
/// Weight per business = status weight x decay^(years since founding).
/// Normalized to [0, 100]; defined as 0 when no business records exist.
pub fn business_health(
    businesses: &[BusinessRecord],
    config: &ScoringConfig,
    analysis_date: NaiveDate,
) -> f64 {
    if businesses.is_empty() {
        return 0.0;
    }

    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for business in businesses {
        let years = ((analysis_date - business.founded).num_days() as f64 / DAYS_PER_YEAR).max(0.0);
        let weight = status_weight(business.status) * config.recency_decay_per_year.powf(years);
        weighted_sum += business.performance * weight;
        weight_sum += weight;
    }

    if weight_sum == 0.0 {
        return 0.0;
    }
    (weighted_sum / weight_sum).clamp(0.0, 100.0)
}

/// Value-impact correlation between stated value weights and outcomes.
///
/// Outcomes are achievement magnitudes followed by business performance
/// scaled to [0, 1], paired with weighted values in declaration order up
/// to the shorter length. Fewer than two pairs yield the
/// `InsufficientData` sentinel; a zero-variance series yields 0.0.
pub fn value_impact(profile: &CreatorProfile) -> ValueImpact {
    let weights: Vec<f64> = profile.values.iter().filter_map(|v| v.weight).collect();

    let mut outcomes: Vec<f64> = profile
        .achievements
        .iter()
        .filter_map(|a| a.magnitude)
        .collect();
    outcomes.extend(profile.businesses.iter().map(|b| b.performance / 100.0));

    let n = weights.len().min(outcomes.len());
    if n < 2 {
        return ValueImpact::InsufficientData;
    }

    let xs = &weights[..n];
    let ys = &outcomes[..n];
    ValueImpact::Coefficient(pearson(xs, ys))
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Derive closed-vocabulary pattern tags from threshold rules.
pub fn pattern_tags(
    profile: &CreatorProfile,
    value_impact: ValueImpact,
    config: &ScoringConfig,
) -> Vec<PatternTag> {
    let mut tags = Vec::new();
    let business_count = profile.businesses.len();

    if business_count >= config.serial_entrepreneur_min_businesses {
        tags.push(PatternTag::SerialEntrepreneur);
    }

    if business_count >= config.pivot_heavy_min_businesses {
        let defunct = profile
            .businesses
            .iter()
            .filter(|b| b.status == BusinessStatus::Defunct)
            .count();
        if defunct as f64 / business_count as f64 >= config.pivot_heavy_defunct_ratio {
            tags.push(PatternTag::PivotHeavy);
        }
    }

    if let Some(coefficient) = value_impact.coefficient() {
        if coefficient >= config.values_driven_min_coefficient {
            tags.push(PatternTag::ValuesDriven);
        }
    }

    let resolved = profile
        .challenges
        .iter()
        .filter(|c| c.resolution == ResolutionStatus::Resolved)
        .count();
    if resolved >= config.resilient_min_resolved {
        tags.push(PatternTag::Resilient);
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AchievementRecord, ChallengeRecord, ValueRecord};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn analysis_date() -> NaiveDate {
        date(2024, 6, 1)
    }

    fn business(name: &str, founded: NaiveDate, status: BusinessStatus, perf: f64) -> BusinessRecord {
        BusinessRecord {
            name: name.to_string(),
            founded,
            status,
            performance: perf,
        }
    }

    fn empty_profile() -> CreatorProfile {
        CreatorProfile {
            name: "Creator".to_string(),
            channel_id: "@creator".to_string(),
            biography: None,
            niche: None,
            country: None,
            channel_age_years: 6,
            businesses: vec![],
            values: vec![],
            achievements: vec![],
            challenges: vec![],
        }
    }

    #[test]
    fn test_no_businesses_scores_zero() {
        let config = ScoringConfig::default();
        assert_eq!(business_health(&[], &config, analysis_date()), 0.0);

        let metrics = score(&empty_profile(), &config, analysis_date());
        assert_eq!(metrics.business_health, 0.0);
    }

    #[test]
    fn test_mixed_status_composite_between_blend_and_active_only() {
        let config = ScoringConfig::default();
        let active = business("Merch", date(2022, 1, 1), BusinessStatus::Active, 80.0);
        let defunct = business("Courses", date(2019, 1, 1), BusinessStatus::Defunct, 40.0);

        let composite = business_health(
            &[active.clone(), defunct.clone()],
            &config,
            analysis_date(),
        );
        let active_only = business_health(&[active.clone()], &config, analysis_date());

        // The status-unweighted blend of the same two businesses.
        let blended = {
            let as_active = business("Courses", date(2019, 1, 1), BusinessStatus::Active, 40.0);
            business_health(&[active, as_active], &config, analysis_date())
        };

        assert!(composite < active_only);
        assert!(composite > blended);
    }

    #[test]
    fn test_composite_is_deterministic() {
        let config = ScoringConfig::default();
        let businesses = vec![
            business("A", date(2021, 5, 1), BusinessStatus::Active, 65.0),
            business("B", date(2018, 2, 1), BusinessStatus::Acquired, 55.0),
        ];
        let first = business_health(&businesses, &config, analysis_date());
        let second = business_health(&businesses, &config, analysis_date());
        assert_eq!(first, second);
    }

    #[test]
    fn test_insufficient_data_sentinel() {
        let mut profile = empty_profile();
        profile.values = vec![ValueRecord {
            label: "Authenticity".to_string(),
            weight: Some(0.9),
        }];
        profile.achievements = vec![AchievementRecord {
            description: "100k subscribers".to_string(),
            date: date(2020, 1, 1),
            magnitude: Some(0.7),
        }];

        // One pair only.
        assert_eq!(value_impact(&profile), ValueImpact::InsufficientData);
    }

    #[test]
    fn test_perfectly_aligned_values_correlate_positively() {
        let mut profile = empty_profile();
        profile.values = vec![
            ValueRecord {
                label: "Authenticity".to_string(),
                weight: Some(0.2),
            },
            ValueRecord {
                label: "Quality".to_string(),
                weight: Some(0.5),
            },
            ValueRecord {
                label: "Consistency".to_string(),
                weight: Some(0.8),
            },
        ];
        profile.achievements = vec![
            AchievementRecord {
                description: "A".to_string(),
                date: date(2020, 1, 1),
                magnitude: Some(0.2),
            },
            AchievementRecord {
                description: "B".to_string(),
                date: date(2021, 1, 1),
                magnitude: Some(0.5),
            },
            AchievementRecord {
                description: "C".to_string(),
                date: date(2022, 1, 1),
                magnitude: Some(0.8),
            },
        ];

        match value_impact(&profile) {
            ValueImpact::Coefficient(c) => assert!((c - 1.0).abs() < 1e-9),
            ValueImpact::InsufficientData => panic!("expected a coefficient"),
        }
    }

    #[test]
    fn test_zero_variance_yields_zero_coefficient() {
        let mut profile = empty_profile();
        profile.values = vec![
            ValueRecord {
                label: "A".to_string(),
                weight: Some(0.5),
            },
            ValueRecord {
                label: "B".to_string(),
                weight: Some(0.5),
            },
        ];
        profile.achievements = vec![
            AchievementRecord {
                description: "A".to_string(),
                date: date(2020, 1, 1),
                magnitude: Some(0.3),
            },
            AchievementRecord {
                description: "B".to_string(),
                date: date(2021, 1, 1),
                magnitude: Some(0.9),
            },
        ];

        assert_eq!(value_impact(&profile), ValueImpact::Coefficient(0.0));
    }

    #[test]
    fn test_pattern_tag_thresholds() {
        let config = ScoringConfig::default();
        let mut profile = empty_profile();
        profile.businesses = vec![
            business("A", date(2018, 1, 1), BusinessStatus::Defunct, 30.0),
            business("B", date(2020, 1, 1), BusinessStatus::Defunct, 20.0),
            business("C", date(2022, 1, 1), BusinessStatus::Active, 80.0),
        ];
        profile.challenges = vec![
            ChallengeRecord {
                description: "Burnout".to_string(),
                date: date(2019, 1, 1),
                resolution: ResolutionStatus::Resolved,
            },
            ChallengeRecord {
                description: "Demonetization".to_string(),
                date: date(2020, 1, 1),
                resolution: ResolutionStatus::Resolved,
            },
        ];

        let tags = pattern_tags(&profile, ValueImpact::Coefficient(0.7), &config);
        assert!(tags.contains(&PatternTag::SerialEntrepreneur));
        assert!(tags.contains(&PatternTag::PivotHeavy));
        assert!(tags.contains(&PatternTag::ValuesDriven));
        assert!(tags.contains(&PatternTag::Resilient));

        let tags = pattern_tags(&empty_profile(), ValueImpact::InsufficientData, &config);
        assert!(tags.is_empty());
    }

    #[test]
    fn test_milestone_frequency_and_start_year() {
        let config = ScoringConfig::default();
        let mut profile = empty_profile();
        profile.achievements = vec![
            AchievementRecord {
                description: "A".to_string(),
                date: date(2020, 3, 1),
                magnitude: None,
            },
            AchievementRecord {
                description: "B".to_string(),
                date: date(2022, 3, 1),
                magnitude: None,
            },
        ];

        let metrics = score(&profile, &config, analysis_date());
        assert_eq!(metrics.career_start_year, Some(2020));
        assert_eq!(metrics.milestone_frequency, Some(0.5));
    }
}
