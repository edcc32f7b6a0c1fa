use crate::plan::{PlanSections, RiskLevel, Timeline, TimelinePhase};

/// Derive the fixed four-phase timeline and a risk level from the plan text.
///
/// Risk score: +2 when code transformations run past 10 units, +3 when the
/// dependencies section touches a database, +2 when the risks section calls
/// something breaking. 5 and up is High, 3 and up Medium, otherwise Low.
#[must_use]
pub fn derive_timeline(sections: &PlanSections) -> Timeline {
    let mut score = 0u8;
    if PlanSections::units(&sections.code_transformations) > 10 {
        score += 2;
    }
    if sections.dependencies.to_lowercase().contains("database") {
        score += 3;
    }
    if sections.risks.to_lowercase().contains("breaking") {
        score += 2;
    }

    let risk_level = if score >= 5 {
        RiskLevel::High
    } else if score >= 3 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    Timeline {
        phases: vec![
            phase("Preparation", "1-2 hours"),
            phase("Core Migration", "2-4 hours"),
            phase("Testing & Validation", "1-2 hours"),
            phase("Cleanup", "30 minutes"),
        ],
        estimated_total_time: "4.5-8.5 hours".to_string(),
        risk_level,
    }
}

fn phase(name: &str, duration: &str) -> TimelinePhase {
    TimelinePhase {
        name: name.to_string(),
        duration: duration.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quiet_plan_is_low_risk() {
        let timeline = derive_timeline(&PlanSections::default());
        assert_eq!(timeline.risk_level, RiskLevel::Low);
        assert_eq!(timeline.phases.len(), 4);
        assert_eq!(timeline.phases[0].name, "Preparation");
        assert_eq!(timeline.phases[3].duration, "30 minutes");
    }

    #[test]
    fn database_dependencies_raise_to_medium() {
        let sections = PlanSections {
            dependencies: "swap the database driver".to_string(),
            ..PlanSections::default()
        };
        assert_eq!(derive_timeline(&sections).risk_level, RiskLevel::Medium);
    }

    #[test]
    fn database_plus_breaking_is_high() {
        let sections = PlanSections {
            dependencies: "database client changes".to_string(),
            risks: "breaking change to the public api".to_string(),
            ..PlanSections::default()
        };
        assert_eq!(derive_timeline(&sections).risk_level, RiskLevel::High);
    }

    #[test]
    fn long_transformations_add_two() {
        let sections = PlanSections {
            code_transformations: (0..11)
                .map(|i| format!("step {i}"))
                .collect::<Vec<_>>()
                .join("\n"),
            risks: "breaking".to_string(),
            ..PlanSections::default()
        };
        // 2 + 2 = 4: still Medium, not High.
        assert_eq!(derive_timeline(&sections).risk_level, RiskLevel::Medium);
    }
}
