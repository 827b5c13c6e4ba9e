//! Report assembly and generation.
//!
//! Both export views are generated from the same `AnalysisResult`
//! instance so they can never diverge. The Markdown document carries
//! fixed top-level sections in a documented order; the JSON record is a
//! field-for-field serialization with stable snake_case keys.

use crate::models::{AnalysisResult, CreatorProfile, Metrics, NarrativeSections, ValueImpact};
use anyhow::Result;
use chrono::Utc;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Programming defect: assembly received input that validation should
/// have rejected. Must be reported, never silently swallowed.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("analysis result assembly failed: profile identity is empty")]
    MissingIdentity,
}

/// Assemble the immutable analysis result from the pipeline stages.
///
/// Pure and total for well-formed input; the profile snapshot, metrics,
/// and narrative are owned by the result from here on.
pub fn assemble(
    profile: CreatorProfile,
    metrics: Metrics,
    narrative: NarrativeSections,
) -> Result<AnalysisResult, AssemblyError> {
    if profile.identity_key().is_empty() {
        return Err(AssemblyError::MissingIdentity);
    }

    Ok(AnalysisResult {
        profile,
        metrics,
        narrative,
        analyzed_at: Utc::now(),
    })
}

/// Generate the Markdown document view.
///
/// Top-level sections, in order: Career Summary, Business Analysis,
/// Value-Impact Analysis, Achievements & Challenges, Recommendations.
pub fn generate_markdown_report(result: &AnalysisResult) -> String {
    let mut output = String::new();

    output.push_str("# Creator Analysis Report\n\n");
    output.push_str(&generate_header(result));
    output.push_str(&generate_career_summary(result));
    output.push_str(&generate_business_analysis(result));
    output.push_str(&generate_value_impact_section(result));
    output.push_str(&generate_achievements_challenges(result));
    output.push_str(&generate_recommendations_section(&result.narrative));
    output.push_str(&generate_uncategorized_section(&result.narrative));
    output.push_str(&generate_footer());

    output
}

fn generate_header(result: &AnalysisResult) -> String {
    let mut section = String::new();
    let profile = &result.profile;

    section.push_str(&format!(
        "- **Creator:** {} (`{}`)\n",
        profile.name, profile.channel_id
    ));
    if let Some(ref niche) = profile.niche {
        section.push_str(&format!("- **Niche:** {}\n", niche));
    }
    section.push_str(&format!(
        "- **Channel Age:** {} years\n",
        profile.channel_age_years
    ));
    section.push_str(&format!(
        "- **Analyzed:** {}\n",
        result.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push('\n');

    section
}

fn generate_career_summary(result: &AnalysisResult) -> String {
    let mut section = String::new();
    let metrics = &result.metrics;

    section.push_str("## Career Summary\n\n");

    if !result.narrative.summary.is_empty() {
        section.push_str(&result.narrative.summary);
        section.push_str("\n\n");
    }

    if let Some(year) = metrics.career_start_year {
        section.push_str(&format!("- **Career Start:** {}\n", year));
    }
    if let Some(freq) = metrics.milestone_frequency {
        section.push_str(&format!("- **Milestones per Year:** {:.1}\n", freq));
    }
    section.push_str(&format!(
        "- **Record Counts:** {} businesses, {} values, {} achievements, {} challenges\n\n",
        metrics.counts.businesses,
        metrics.counts.values,
        metrics.counts.achievements,
        metrics.counts.challenges
    ));

    if metrics.timeline.is_empty() {
        return section;
    }

    section.push_str("| Date | Event | Detail |\n");
    section.push_str("|:---|:---|:---|\n");
    for event in metrics.timeline() {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            event.date, event.kind, event.label
        ));
    }
    section.push('\n');

    section
}

fn generate_business_analysis(result: &AnalysisResult) -> String {
    let mut section = String::new();
    let metrics = &result.metrics;

    section.push_str("## Business Analysis\n\n");
    section.push_str(&format!(
        "- **Business Health:** {:.1}/100\n",
        metrics.business_health
    ));

    if !metrics.pattern_tags.is_empty() {
        let tags: Vec<String> = metrics
            .pattern_tags
            .iter()
            .map(|t| format!("`{}`", t))
            .collect();
        section.push_str(&format!("- **Pattern Tags:** {}\n", tags.join(", ")));
    }
    section.push('\n');

    if result.profile.businesses.is_empty() {
        section.push_str("No business ventures on record.\n\n");
    } else {
        section.push_str("| Business | Status | Founded | Performance |\n");
        section.push_str("|:---|:---|:---|:---:|\n");
        for b in &result.profile.businesses {
            section.push_str(&format!(
                "| {} | {} | {} | {:.0} |\n",
                b.name, b.status, b.founded, b.performance
            ));
        }
        section.push('\n');
    }

    if !result.narrative.strengths.is_empty() {
        section.push_str("**Strengths:**\n\n");
        section.push_str(&result.narrative.strengths);
        section.push_str("\n\n");
    }

    section
}

fn generate_value_impact_section(result: &AnalysisResult) -> String {
    let mut section = String::new();

    section.push_str("## Value-Impact Analysis\n\n");

    match result.metrics.value_impact {
        ValueImpact::Coefficient(c) => {
            section.push_str(&format!("- **Correlation Coefficient:** {:.2}\n\n", c));
        }
        ValueImpact::InsufficientData => {
            section.push_str(
                "Insufficient comparable data points to estimate a value-impact correlation.\n\n",
            );
        }
    }

    if !result.profile.values.is_empty() {
        section.push_str("**Stated Values:**\n\n");
        for v in &result.profile.values {
            match v.weight {
                Some(w) => section.push_str(&format!("- {} (weight {:.2})\n", v.label, w)),
                None => section.push_str(&format!("- {}\n", v.label)),
            }
        }
        section.push('\n');
    }

    if !result.narrative.risks.is_empty() {
        section.push_str("**Risks:**\n\n");
        section.push_str(&result.narrative.risks);
        section.push_str("\n\n");
    }

    section
}

fn generate_achievements_challenges(result: &AnalysisResult) -> String {
    let mut section = String::new();
    let profile = &result.profile;

    section.push_str("## Achievements & Challenges\n\n");

    if profile.achievements.is_empty() && profile.challenges.is_empty() {
        section.push_str("No achievements or challenges on record.\n\n");
        return section;
    }

    if !profile.achievements.is_empty() {
        section.push_str("**Achievements:**\n\n");
        for a in &profile.achievements {
            match a.magnitude {
                Some(m) => section.push_str(&format!(
                    "- {} ({}, magnitude {:.2})\n",
                    a.description, a.date, m
                )),
                None => section.push_str(&format!("- {} ({})\n", a.description, a.date)),
            }
        }
        section.push('\n');
    }

    if !profile.challenges.is_empty() {
        section.push_str("**Challenges:**\n\n");
        for c in &profile.challenges {
            section.push_str(&format!("- {} ({}, {})\n", c.description, c.date, c.resolution));
        }
        section.push('\n');
    }

    section
}

fn generate_recommendations_section(narrative: &NarrativeSections) -> String {
    let mut section = String::new();

    section.push_str("## Recommendations\n\n");
    if narrative.recommendations.is_empty() {
        section.push_str("No recommendations were generated for this analysis.\n\n");
    } else {
        section.push_str(&narrative.recommendations);
        section.push_str("\n\n");
    }

    section
}

fn generate_uncategorized_section(narrative: &NarrativeSections) -> String {
    if narrative.uncategorized.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Uncategorized Notes\n\n");
    section.push_str(&narrative.uncategorized);
    section.push_str("\n\n");

    section
}

fn generate_footer() -> String {
    "---\n\n*Report generated by CreatorLens*\n".to_string()
}

/// Generate the structured JSON export.
///
/// Field order follows struct declaration order and is stable across
/// runs; `analyzed_at` is the documented volatile field.
pub fn generate_json_report(result: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(result).map_err(Into::into)
}

/// Write the Markdown document to a file.
#[allow(dead_code)] // Convenience wrapper
pub fn write_report(result: &AnalysisResult, path: &Path) -> Result<()> {
    let content = generate_markdown_report(result);

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

/// Write the JSON export to a file.
#[allow(dead_code)] // Convenience wrapper
pub fn write_json_report(result: &AnalysisResult, path: &Path) -> Result<()> {
    let content = generate_json_report(result)?;

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
