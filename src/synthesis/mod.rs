//! Narrative synthesis adapter.
//!
//! Builds a deterministic prompt from the profile and computed metrics,
//! invokes an external text-generation capability through the
//! `TextGenerator` seam, and normalizes the response into named
//! narrative sections. The external call is the only stage of the
//! pipeline that may block or time out.

pub mod ollama;

pub use ollama::OllamaGenerator;

use crate::models::{CreatorProfile, Metrics, NarrativeSections};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// External-dependency defect from the synthesis round trip.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The model did not respond within the timeout budget.
    #[error("synthesis request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The model endpoint could not be reached or returned an error.
    #[error("synthesis backend unavailable: {reason}")]
    Unavailable { reason: String },

    /// No recognizable section could be mapped from the response.
    /// The raw text is preserved so the caller can degrade gracefully.
    #[error("synthesis response could not be mapped into sections")]
    MalformedResponse { raw: String },
}

/// Seam for the external text-generation capability.
///
/// Production uses `OllamaGenerator`; tests substitute a deterministic
/// stub. One prompt, one response, no multi-turn state.
pub trait TextGenerator {
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, SynthesisError>> + Send;
}

/// Run one synthesis round trip and parse the response into sections.
pub async fn synthesize<G: TextGenerator>(
    generator: &G,
    profile: &CreatorProfile,
    metrics: &Metrics,
) -> Result<NarrativeSections, SynthesisError> {
    let prompt = build_prompt(profile, metrics);
    let response = generator.generate(&prompt).await?;
    parse_sections(&response)
}

/// Build the prompt payload for the model.
///
/// Field order is fixed so identical input yields an identical payload.
pub fn build_prompt(profile: &CreatorProfile, metrics: &Metrics) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "Analyze the following YouTube content creator profile and computed metrics.\n\n",
    );
    prompt.push_str("Respond with a single JSON object with exactly these keys: ");
    prompt.push_str("\"summary\", \"strengths\", \"risks\", \"recommendations\". ");
    prompt.push_str("Each value must be a string. Only output JSON, no other text.\n\n");

    prompt.push_str("=== CREATOR PROFILE ===\n");
    prompt.push_str(&format!("Name: {}\n", profile.name));
    prompt.push_str(&format!("Channel: {}\n", profile.channel_id));
    if let Some(ref niche) = profile.niche {
        prompt.push_str(&format!("Niche: {}\n", niche));
    }
    if let Some(ref country) = profile.country {
        prompt.push_str(&format!("Country: {}\n", country));
    }
    prompt.push_str(&format!("Channel age: {} years\n", profile.channel_age_years));
    if let Some(ref biography) = profile.biography {
        prompt.push_str(&format!("Biography: {}\n", biography));
    }

    if !profile.businesses.is_empty() {
        prompt.push_str("Businesses:\n");
        for b in &profile.businesses {
            prompt.push_str(&format!(
                "  - {} ({}, founded {}, performance {:.0}/100)\n",
                b.name, b.status, b.founded, b.performance
            ));
        }
    }
    if !profile.values.is_empty() {
        prompt.push_str("Values:\n");
        for v in &profile.values {
            match v.weight {
                Some(w) => prompt.push_str(&format!("  - {} (weight {:.2})\n", v.label, w)),
                None => prompt.push_str(&format!("  - {}\n", v.label)),
            }
        }
    }
    if !profile.achievements.is_empty() {
        prompt.push_str("Achievements:\n");
        for a in &profile.achievements {
            prompt.push_str(&format!("  - {} ({})\n", a.description, a.date));
        }
    }
    if !profile.challenges.is_empty() {
        prompt.push_str("Challenges:\n");
        for c in &profile.challenges {
            prompt.push_str(&format!("  - {} ({}, {})\n", c.description, c.date, c.resolution));
        }
    }

    prompt.push_str("\n=== COMPUTED METRICS ===\n");
    prompt.push_str(&format!(
        "Business health: {:.1}/100\n",
        metrics.business_health
    ));
    prompt.push_str(&format!("Value-impact correlation: {}\n", metrics.value_impact));
    if !metrics.pattern_tags.is_empty() {
        let tags: Vec<String> = metrics.pattern_tags.iter().map(|t| t.to_string()).collect();
        prompt.push_str(&format!("Pattern tags: {}\n", tags.join(", ")));
    }
    if let Some(year) = metrics.career_start_year {
        prompt.push_str(&format!("Career start year: {}\n", year));
    }

    prompt
}

const SECTION_KEYS: [&str; 4] = ["summary", "strengths", "risks", "recommendations"];

/// Map a model response into `NarrativeSections`.
///
/// The response must contain a JSON object with the declared section
/// keys (string or string-array values). When some but not all sections
/// are present, the parsed sections are kept and the full raw text is
/// preserved under `uncategorized`. A response with no recognizable
/// section is a `MalformedResponse`.
pub fn parse_sections(raw: &str) -> Result<NarrativeSections, SynthesisError> {
    let object = extract_json_object(raw).ok_or_else(|| SynthesisError::MalformedResponse {
        raw: raw.to_string(),
    })?;

    let mut sections = NarrativeSections::default();
    let mut mapped = 0usize;
    let mut extras = Vec::new();

    if let Value::Object(map) = object {
        for (key, value) in &map {
            let Some(text) = section_text(value) else {
                continue;
            };
            if text.is_empty() {
                continue;
            }
            match key.as_str() {
                "summary" => sections.summary = text,
                "strengths" => sections.strengths = text,
                "risks" => sections.risks = text,
                "recommendations" => sections.recommendations = text,
                other => extras.push(format!("{}: {}", other, text)),
            }
            if SECTION_KEYS.contains(&key.as_str()) {
                mapped += 1;
            }
        }
    }

    if mapped == 0 {
        return Err(SynthesisError::MalformedResponse {
            raw: raw.to_string(),
        });
    }

    if mapped < SECTION_KEYS.len() {
        // Incomplete schema: keep what mapped, preserve the raw text.
        warn!("synthesis response missing {} section(s)", SECTION_KEYS.len() - mapped);
        sections.uncategorized = raw.trim().to_string();
    } else {
        sections.uncategorized = extras.join("\n");
    }

    Ok(sections)
}

/// Pull the outermost JSON object out of a possibly chatty response.
fn extract_json_object(raw: &str) -> Option<Value> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok()
}

fn section_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Array(items) => {
            let lines: Vec<String> = items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| format!("- {}", s.trim()))
                .collect();
            Some(lines.join("\n"))
        }
        _ => None,
    }
}

/// Deterministic sections for offline runs (no model call).
pub fn offline_sections(profile: &CreatorProfile, metrics: &Metrics) -> NarrativeSections {
    let tags = if metrics.pattern_tags.is_empty() {
        "none".to_string()
    } else {
        metrics
            .pattern_tags
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    NarrativeSections {
        summary: format!(
            "{} ({}) has run a channel for {} years with {} business venture(s), \
             {} achievement(s), and {} challenge(s) on record. \
             Business health scores {:.1}/100; pattern tags: {}.",
            profile.name,
            profile.channel_id,
            profile.channel_age_years,
            metrics.counts.businesses,
            metrics.counts.achievements,
            metrics.counts.challenges,
            metrics.business_health,
            tags,
        ),
        ..NarrativeSections::default()
    }
}

/// Deterministic generator for tests and dry runs.
#[cfg(test)]
pub struct StubGenerator {
    pub response: String,
}

#[cfg(test)]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, SynthesisError> {
        Ok(self.response.clone())
    }
}
