//! Career timeline synthesis.
//!
//! Merges dated events from businesses (founding), achievements, and
//! challenges into one ordered sequence. Ordering is by date with ties
//! broken by insertion order within the profile, so re-running on an
//! unchanged profile always yields an identical sequence.

use crate::models::{CreatorProfile, TimelineEvent, TimelineEventKind};

/// Build the merged, date-ordered career timeline for a profile.
pub fn build_timeline(profile: &CreatorProfile) -> Vec<TimelineEvent> {
    let mut events = Vec::with_capacity(
        profile.businesses.len() + profile.achievements.len() + profile.challenges.len(),
    );
    let mut source_index = 0usize;

    for business in &profile.businesses {
        events.push(TimelineEvent {
            date: business.founded,
            kind: TimelineEventKind::BusinessFounded,
            label: business.name.clone(),
            source_index,
        });
        source_index += 1;
    }
    for achievement in &profile.achievements {
        events.push(TimelineEvent {
            date: achievement.date,
            kind: TimelineEventKind::Achievement,
            label: achievement.description.clone(),
            source_index,
        });
        source_index += 1;
    }
    for challenge in &profile.challenges {
        events.push(TimelineEvent {
            date: challenge.date,
            kind: TimelineEventKind::Challenge,
            label: challenge.description.clone(),
            source_index,
        });
        source_index += 1;
    }

    // Stable sort: equal dates keep profile insertion order.
    events.sort_by_key(|e| e.date);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AchievementRecord, BusinessRecord, BusinessStatus, ChallengeRecord, ResolutionStatus,
    };
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_profile() -> CreatorProfile {
        CreatorProfile {
            name: "Creator".to_string(),
            channel_id: "@creator".to_string(),
            biography: None,
            niche: None,
            country: None,
            channel_age_years: 6,
            businesses: vec![BusinessRecord {
                name: "Merch Store".to_string(),
                founded: date(2020, 1, 15),
                status: BusinessStatus::Active,
                performance: 70.0,
            }],
            values: vec![],
            achievements: vec![AchievementRecord {
                description: "First viral video".to_string(),
                date: date(2019, 6, 1),
                magnitude: Some(0.6),
            }],
            challenges: vec![ChallengeRecord {
                description: "Burnout period".to_string(),
                date: date(2020, 1, 15),
                resolution: ResolutionStatus::Resolved,
            }],
        }
    }

    #[test]
    fn test_timeline_ordered_by_date() {
        let events = build_timeline(&sample_profile());
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].kind, TimelineEventKind::Achievement);
        assert!(events.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let events = build_timeline(&sample_profile());
        // Business founding and challenge share a date; businesses are
        // walked first, so the founding comes first.
        assert_eq!(events[1].kind, TimelineEventKind::BusinessFounded);
        assert_eq!(events[2].kind, TimelineEventKind::Challenge);
        assert!(events[1].source_index < events[2].source_index);
    }

    #[test]
    fn test_timeline_is_idempotent() {
        let profile = sample_profile();
        let first = build_timeline(&profile);
        let second = build_timeline(&profile);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_profile_yields_empty_timeline() {
        let mut profile = sample_profile();
        profile.businesses.clear();
        profile.achievements.clear();
        profile.challenges.clear();
        assert!(build_timeline(&profile).is_empty());
    }
}
