use chrono::{DateTime, Utc};
use recast_chunk_store::ProjectStatistics;
use recast_planner::MigrationPlan;
use recast_rewrite::{FileError, FileResult};
use recast_validation::ValidationReport;
use serde::{Deserialize, Serialize};

/// The stage a failed migration died in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStep {
    Validation,
    Analysis,
    ChunkDiscovery,
    PlanGeneration,
    Execution,
}

/// Aggregate numbers for a finished migration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatistics {
    pub chunks_analyzed: usize,
    pub files_modified: usize,
    pub total_time_ms: u64,
}

/// Outbound report for a migration that ran to completion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessReport {
    /// Always true; kept explicit for the wire shape
    pub success: bool,
    pub migration_id: String,
    pub command: String,
    pub target_technology: String,
    pub plan: MigrationPlan,
    pub results: Vec<FileResult>,
    pub errors: Vec<FileError>,
    pub validation: ValidationReport,
    pub statistics: ReportStatistics,
    pub project_statistics: ProjectStatistics,
    pub completed_at: DateTime<Utc>,
}

/// Outbound report for a migration that failed at some stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FailureReport {
    /// Always false; kept explicit for the wire shape
    pub success: bool,
    pub error: String,
    pub step: MigrationStep,
}

/// What `process_migration` hands back to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MigrationReport {
    Success(Box<SuccessReport>),
    Failure(FailureReport),
}

impl MigrationReport {
    pub fn failure(step: MigrationStep, error: impl Into<String>) -> Self {
        Self::Failure(FailureReport {
            success: false,
            error: error.into(),
            step,
        })
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The success payload, when there is one
    #[must_use]
    pub fn as_success(&self) -> Option<&SuccessReport> {
        match self {
            Self::Success(report) => Some(report),
            Self::Failure(_) => None,
        }
    }

    /// The failure payload, when there is one
    #[must_use]
    pub fn as_failure(&self) -> Option<&FailureReport> {
        match self {
            Self::Failure(report) => Some(report),
            Self::Success(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_serializes_to_the_wire_shape() {
        let report = MigrationReport::failure(MigrationStep::Validation, "Missing required fields");
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["step"], "validation");
        assert_eq!(json["error"], "Missing required fields");
    }

    #[test]
    fn step_names_use_snake_case() {
        let json = serde_json::to_string(&MigrationStep::ChunkDiscovery).unwrap();
        assert_eq!(json, "\"chunk_discovery\"");
        let json = serde_json::to_string(&MigrationStep::PlanGeneration).unwrap();
        assert_eq!(json, "\"plan_generation\"");
    }
}
