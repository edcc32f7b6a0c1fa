use crate::context::FileContext;
use recast_chunk_model::CodeChunk;
use recast_planner::MigrationPlan;
use recast_tech_profiles::TechProfile;
use std::fmt::Write;

/// Build the per-chunk rewrite prompt: technology context and patterns, the
/// chunk itself, its file context, and the full plan, followed by the
/// code-only output instruction.
#[must_use]
pub fn build_rewrite_prompt(
    chunk: &CodeChunk,
    profile: &TechProfile,
    file_context: &FileContext,
    plan: &MigrationPlan,
) -> String {
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "You are migrating one code fragment to {}.",
        profile.tag
    );
    let _ = writeln!(prompt, "\nTarget context:\n{}", profile.context);

    if !profile.patterns.is_empty() {
        let _ = writeln!(prompt, "\nApply these patterns:");
        for pattern in profile.patterns {
            let _ = writeln!(prompt, "- {pattern}");
        }
    }

    let _ = writeln!(
        prompt,
        "\nFragment: {} ({}) in {} [{}] complexity {}",
        chunk.name,
        chunk.kind.as_str(),
        chunk.file_path,
        chunk.language,
        chunk.complexity
    );
    let _ = writeln!(prompt, "```\n{}\n```", chunk.code);

    let _ = writeln!(prompt, "\nFile context:");
    if !file_context.imports.is_empty() {
        let _ = writeln!(prompt, "- imports: {}", file_context.imports.join(", "));
    }
    if !file_context.exports.is_empty() {
        let _ = writeln!(prompt, "- exports: {}", file_context.exports.join(", "));
    }
    if !file_context.dependencies.is_empty() {
        let _ = writeln!(
            prompt,
            "- dependencies: {}",
            file_context.dependencies.join(", ")
        );
    }

    let _ = writeln!(prompt, "\nMigration plan:");
    let _ = writeln!(prompt, "Strategy: {}", plan.sections.strategy);
    let _ = writeln!(
        prompt,
        "Transformations: {}",
        plan.sections.code_transformations
    );
    let _ = writeln!(
        prompt,
        "Implementation order: {}",
        plan.sections.implementation_order
    );

    let _ = writeln!(
        prompt,
        "\nReturn only the migrated code. Preserve the fragment's behavior, \
         apply {} idioms, add any imports or exports it needs, add error \
         handling, and explain non-obvious changes in code comments.",
        profile.tag
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use recast_chunk_model::ChunkKind;
    use recast_planner::{PlanMetadata, PlanSections, RiskLevel, Timeline};
    use recast_tech_profiles::profile_for;

    fn plan() -> MigrationPlan {
        MigrationPlan {
            sections: PlanSections {
                strategy: "migrate reads first".to_string(),
                code_transformations: "swap pool.query for prisma".to_string(),
                implementation_order: "db.ts first".to_string(),
                ..PlanSections::default()
            },
            metadata: PlanMetadata {
                generated_at: Utc::now(),
                chunks_analyzed: 1,
                target_technology: "prisma".to_string(),
                command: "convert".to_string(),
            },
            timeline: Timeline {
                phases: vec![],
                estimated_total_time: String::new(),
                risk_level: RiskLevel::Low,
            },
        }
    }

    #[test]
    fn prompt_carries_chunk_context_and_plan() {
        let chunk = CodeChunk::new(
            "c1",
            "s1",
            "src/db.ts",
            ChunkKind::Function,
            "connect",
            "function connect() { return pool.connect(); }",
        )
        .language("typescript");
        let context = FileContext {
            imports: vec!["pg".to_string()],
            exports: vec!["connect".to_string()],
            dependencies: vec![],
            language: "typescript".to_string(),
            extension: "ts".to_string(),
        };

        let prompt = build_rewrite_prompt(&chunk, profile_for("prisma"), &context, &plan());

        assert!(prompt.contains("migrating one code fragment to prisma"));
        assert!(prompt.contains("pool.connect()"));
        assert!(prompt.contains("- imports: pg"));
        assert!(prompt.contains("migrate reads first"));
        assert!(prompt.contains("Return only the migrated code"));
    }
}
