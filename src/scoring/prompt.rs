//! Recommendation request builder: assembles the normalized payload
//! sent to the reasoning service.
//!
//! Pure mapping only: the networked call (with its retry/timeout
//! policy) lives behind `services::reasoning::RecommendationEngine`.

use serde::Serialize;

use crate::models::{BiomarkerSet, DailyChecklist, LifestyleSnapshot, RatedHabits};

/// System prompt for the reasoning service. The service is expected to
/// answer with a JSON array of 3–6 recommendation objects.
pub const RECOMMENDATION_SYSTEM_PROMPT: &str = "\
You are a men's reproductive health coach. Based on the semen analysis \
values and lifestyle factors provided, produce 3 to 6 ranked, actionable \
recommendations. Respond ONLY with a JSON array of objects with fields: \
title, description, category (one of: diet, exercise, supplements, \
lifestyle, stress, sleep), priority (one of: low, medium, high, \
critical), reasoning. Order from most to least impactful. Never give \
medical diagnoses; advise consulting a physician for abnormal values.";

/// One rendered biomarker line. Absent values render as "Not measured"
/// rather than being dropped, so the model sees the full panel shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiomarkerLine {
    pub label: &'static str,
    pub value: String,
}

/// Normalized payload for the reasoning service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationRequest {
    pub base_score: u8,
    pub biomarkers: Vec<BiomarkerLine>,
    /// Bullet list of lifestyle factors. `None` when no lifestyle data
    /// exists; the section is omitted entirely, not sent empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifestyle_summary: Option<String>,
}

/// Build the request payload from biomarkers, the base score, and an
/// optional lifestyle snapshot (either historical shape).
pub fn build_recommendation_request(
    biomarkers: &BiomarkerSet,
    base_score: u8,
    lifestyle: Option<&LifestyleSnapshot>,
) -> RecommendationRequest {
    RecommendationRequest {
        base_score,
        biomarkers: render_biomarkers(biomarkers),
        lifestyle_summary: lifestyle.map(render_lifestyle),
    }
}

impl RecommendationRequest {
    /// Render the user prompt sent alongside the system prompt.
    pub fn to_prompt(&self) -> String {
        let mut out = String::from("Semen analysis results:\n");
        for line in &self.biomarkers {
            out.push_str(&format!("- {}: {}\n", line.label, line.value));
        }
        out.push_str(&format!(
            "\nComputed health score: {}/100\n",
            self.base_score
        ));
        if let Some(summary) = &self.lifestyle_summary {
            out.push_str("\nLifestyle factors:\n");
            out.push_str(summary);
            out.push('\n');
        }
        out
    }
}

fn render_biomarkers(b: &BiomarkerSet) -> Vec<BiomarkerLine> {
    fn line(label: &'static str, value: Option<f64>, unit: &str) -> BiomarkerLine {
        BiomarkerLine {
            label,
            value: match value {
                Some(v) => format!("{v} {unit}").trim_end().to_string(),
                None => "Not measured".to_string(),
            },
        }
    }

    vec![
        line("Concentration", b.concentration, "million/mL"),
        line("Total motility", b.total_motility, "%"),
        line("Progressive motility", b.progressive_motility, "%"),
        line("Morphology", b.morphology, "%"),
        line("Volume", b.volume, "mL"),
        line("pH", b.ph, ""),
        line("DNA fragmentation index", b.dna_fragmentation, "%"),
    ]
}

fn render_lifestyle(snapshot: &LifestyleSnapshot) -> String {
    match snapshot {
        LifestyleSnapshot::Rated(r) => render_rated(r),
        LifestyleSnapshot::Checklist(c) => render_checklist(c),
    }
}

fn render_rated(r: &RatedHabits) -> String {
    let mut lines = Vec::new();
    if let Some(d) = r.diet_quality {
        lines.push(format!("- Diet quality: {}", d.as_str()));
    }
    if let Some(s) = r.sleep_quality {
        lines.push(format!("- Sleep quality: {}", s.as_str()));
    }
    if let Some(s) = r.stress_level {
        lines.push(format!("- Stress level: {}", s.as_str()));
    }
    if let Some(m) = r.exercise_minutes {
        lines.push(format!("- Exercise: {m} minutes/day"));
    }
    if r.electrolytes {
        lines.push("- Takes electrolytes".to_string());
    }
    if let Some(c) = r.masturbation_count {
        lines.push(format!("- Ejaculation frequency: {c}/day"));
    }
    lines.join("\n")
}

fn render_checklist(c: &DailyChecklist) -> String {
    fn yes_no(v: bool) -> &'static str {
        if v {
            "yes"
        } else {
            "no"
        }
    }
    [
        format!("- Healthy eating: {}", yes_no(c.healthy_eating)),
        format!("- No smoking: {}", yes_no(c.no_smoking)),
        format!("- No alcohol: {}", yes_no(c.no_alcohol)),
        format!("- Exercised: {}", yes_no(c.exercised)),
        format!("- 7+ hours sleep: {}", yes_no(c.good_sleep)),
        format!("- Loose underwear: {}", yes_no(c.loose_underwear)),
    ]
    .join("\n")
}
