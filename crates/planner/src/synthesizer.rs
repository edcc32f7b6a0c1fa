use crate::error::Result;
use crate::parse::{fill_defaults, parse_plan_sections};
use crate::plan::{MigrationPlan, PlanMetadata};
use crate::prompt::build_plan_prompt;
use crate::timeline::derive_timeline;
use chrono::Utc;
use recast_providers::LlmProvider;
use recast_retrieval::RetrievedChunk;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Prompts the LLM for a plan and normalizes the response.
pub struct PlanSynthesizer {
    llm: Arc<dyn LlmProvider>,
}

impl PlanSynthesizer {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Produce a complete plan. Provider failures propagate; malformed
    /// responses degrade to default sections instead of failing.
    pub async fn plan(
        &self,
        command: &str,
        target: &str,
        chunks: &[RetrievedChunk],
        options: &Map<String, Value>,
    ) -> Result<MigrationPlan> {
        let prompt = build_plan_prompt(command, target, options, chunks);
        log::debug!("Plan prompt: {} chars", prompt.len());

        let response = self.llm.generate(&prompt).await?;

        let mut sections = parse_plan_sections(&response);
        fill_defaults(&mut sections, target);

        let timeline = derive_timeline(&sections);
        let metadata = PlanMetadata {
            generated_at: Utc::now(),
            chunks_analyzed: chunks.len(),
            target_technology: target.to_string(),
            command: command.to_string(),
        };

        log::info!(
            "Plan synthesized for '{target}': {:?} risk, {} chunks analyzed",
            timeline.risk_level,
            metadata.chunks_analyzed
        );

        Ok(MigrationPlan {
            sections,
            metadata,
            timeline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::RiskLevel;
    use recast_providers::testing::ScriptedLlm;
    use recast_providers::ProviderError;

    #[tokio::test]
    async fn well_formed_json_becomes_a_plan() {
        let llm = Arc::new(ScriptedLlm::always(
            r#"{"analysis": "three files touch the database",
                "strategy": "migrate reads first",
                "code_transformations": ["swap pool.query for prisma"],
                "dependencies": "add the database client",
                "configuration": "add DATABASE_URL",
                "testing": "run the integration suite",
                "risks": "breaking change in transactions",
                "implementation_order": "db.ts first"}"#,
        ));
        let synthesizer = PlanSynthesizer::new(llm);

        let plan = synthesizer
            .plan("convert to prisma", "prisma", &[], &Map::new())
            .await
            .unwrap();

        assert_eq!(plan.sections.analysis, "three files touch the database");
        assert_eq!(plan.metadata.target_technology, "prisma");
        // database (+3) and breaking (+2) push the risk to High.
        assert_eq!(plan.timeline.risk_level, RiskLevel::High);
    }

    #[tokio::test]
    async fn prompt_reaches_the_llm_with_command_and_target() {
        let llm = Arc::new(ScriptedLlm::always("{}"));
        let synthesizer = PlanSynthesizer::new(llm.clone());

        synthesizer
            .plan("convert to prisma", "prisma", &[], &Map::new())
            .await
            .unwrap();

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("convert to prisma"));
        assert!(prompts[0].contains("Target technology: prisma"));
    }

    #[tokio::test]
    async fn plain_text_degrades_to_defaults() {
        let llm = Arc::new(ScriptedLlm::always(
            "I think you should be careful with this migration.",
        ));
        let synthesizer = PlanSynthesizer::new(llm);

        let plan = synthesizer
            .plan("convert to prisma", "prisma", &[], &Map::new())
            .await
            .unwrap();

        assert!(plan.sections.analysis.contains("prisma"));
        assert!(plan.sections.implementation_order.contains("prisma"));
        assert_eq!(plan.timeline.phases.len(), 4);
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let llm = Arc::new(ScriptedLlm::new(vec![Err(ProviderError::Unavailable(
            "down".into(),
        ))]));
        let synthesizer = PlanSynthesizer::new(llm);

        let result = synthesizer.plan("convert", "prisma", &[], &Map::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn eight_sections_are_always_present() {
        let llm = Arc::new(ScriptedLlm::always(r#"{"analysis": "only this"}"#));
        let synthesizer = PlanSynthesizer::new(llm);

        let plan = synthesizer
            .plan("migrate", "react", &[], &Map::new())
            .await
            .unwrap();

        for section in [
            &plan.sections.analysis,
            &plan.sections.strategy,
            &plan.sections.code_transformations,
            &plan.sections.dependencies,
            &plan.sections.configuration,
            &plan.sections.testing,
            &plan.sections.risks,
            &plan.sections.implementation_order,
        ] {
            assert!(!section.trim().is_empty());
        }
    }
}
