use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The eight required plan sections, normalized to text. Multi-item JSON
/// sections arrive as one item per line.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanSections {
    pub analysis: String,
    pub strategy: String,
    pub code_transformations: String,
    pub dependencies: String,
    pub configuration: String,
    pub testing: String,
    pub risks: String,
    pub implementation_order: String,
}

impl PlanSections {
    /// Number of units (non-empty lines) in a section
    #[must_use]
    pub fn units(section: &str) -> usize {
        section.lines().filter(|line| !line.trim().is_empty()).count()
    }
}

/// Provenance block attached to every plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetadata {
    pub generated_at: DateTime<Utc>,
    pub chunks_analyzed: usize,
    pub target_technology: String,
    pub command: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePhase {
    pub name: String,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub phases: Vec<TimelinePhase>,
    pub estimated_total_time: String,
    pub risk_level: RiskLevel,
}

/// A complete migration plan: the eight sections plus provenance and timeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MigrationPlan {
    #[serde(flatten)]
    pub sections: PlanSections,
    pub metadata: PlanMetadata,
    pub timeline: Timeline,
}
