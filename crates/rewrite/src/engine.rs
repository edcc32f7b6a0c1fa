use crate::checks::validate_chunk;
use crate::context::{build_file_context, FileContext};
use crate::error::Result;
use crate::prompt::build_rewrite_prompt;
use crate::result::{
    ChunkRewrite, FileError, FileResult, FileStats, MigrationResult, MigrationStatistics,
};
use futures::future::join_all;
use recast_chunk_model::CodeChunk;
use recast_planner::MigrationPlan;
use recast_providers::LlmProvider;
use recast_tech_profiles::{profile_for, TechProfile};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Rewrites chunks through the LLM and assembles per-file outputs.
pub struct RewriteEngine {
    llm: Arc<dyn LlmProvider>,
}

impl RewriteEngine {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Execute the plan over the given chunks. Files run concurrently; chunks
    /// within a file run sequentially in dependency-priority order.
    pub async fn rewrite(
        &self,
        session_id: &str,
        user_id: &str,
        plan: &MigrationPlan,
        chunks: Vec<CodeChunk>,
    ) -> Result<MigrationResult> {
        let started = Instant::now();
        let migration_id = Uuid::new_v4().to_string();
        let profile = profile_for(&plan.metadata.target_technology);

        let groups = group_by_file(chunks);
        log::info!(
            "Rewriting {} files for migration '{migration_id}'",
            groups.len()
        );

        let file_jobs = groups
            .into_iter()
            .map(|(file_path, file_chunks)| self.rewrite_file(file_path, file_chunks, profile, plan));
        let outcomes = join_all(file_jobs).await;

        let mut results = Vec::new();
        let mut errors = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(result) => results.push(result),
                Err(error) => errors.push(error),
            }
        }

        let files_attempted = results.len() + errors.len();
        let total_chunks: usize = results.iter().map(|r| r.chunks.len()).sum();
        let chunk_time: u64 = results
            .iter()
            .flat_map(|r| r.chunks.iter())
            .map(|c| c.time_ms)
            .sum();

        let statistics = MigrationStatistics {
            total_chunks,
            files_processed: files_attempted,
            success_rate: if files_attempted == 0 {
                0.0
            } else {
                results.len() as f64 / files_attempted as f64
            },
            average_time_per_chunk_ms: if total_chunks == 0 {
                0.0
            } else {
                chunk_time as f64 / total_chunks as f64
            },
        };

        Ok(MigrationResult {
            migration_id,
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            results,
            errors,
            execution_time_ms: started.elapsed().as_millis() as u64,
            statistics,
        })
    }

    /// Rewrite one file's chunks sequentially, then assemble the output.
    /// Returns Err only when every chunk in the file failed.
    async fn rewrite_file(
        &self,
        file_path: String,
        mut chunks: Vec<CodeChunk>,
        profile: &TechProfile,
        plan: &MigrationPlan,
    ) -> std::result::Result<FileResult, FileError> {
        let file_started = Instant::now();

        // Interfaces and types first, then classes, functions, methods and
        // variables; simpler chunks lead within each kind.
        chunks.sort_by_key(|chunk| (chunk.kind.priority(), chunk.complexity));

        let refs: Vec<&CodeChunk> = chunks.iter().collect();
        let file_context = build_file_context(&refs);

        let mut rewrites = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            rewrites.push(self.rewrite_chunk(chunk, profile, &file_context, plan).await);
        }

        let success = rewrites.iter().any(|r| r.error.is_none());
        if !success {
            return Err(FileError {
                file_path,
                error: format!("all {} chunk rewrites failed", rewrites.len()),
            });
        }

        let content = assemble_file(&rewrites, &file_context, profile);
        let chunks_valid = rewrites.iter().filter(|r| r.validation.is_valid).count();

        Ok(FileResult {
            file_path,
            success,
            stats: FileStats {
                chunks_total: rewrites.len(),
                chunks_valid,
                time_ms: file_started.elapsed().as_millis() as u64,
            },
            chunks: rewrites,
            content,
        })
    }

    async fn rewrite_chunk(
        &self,
        chunk: &CodeChunk,
        profile: &TechProfile,
        file_context: &FileContext,
        plan: &MigrationPlan,
    ) -> ChunkRewrite {
        let prompt = build_rewrite_prompt(chunk, profile, file_context, plan);
        let chunk_started = Instant::now();

        let (migrated_code, error) = match self.llm.generate(&prompt).await {
            Ok(response) => (strip_code_fences(&response), None),
            Err(err) => {
                log::warn!("Rewrite failed for chunk '{}': {err}", chunk.id);
                (String::new(), Some(err.to_string()))
            }
        };

        let validation = validate_chunk(&migrated_code, chunk.kind, profile);
        ChunkRewrite {
            chunk_id: chunk.id.clone(),
            chunk_name: chunk.name.clone(),
            kind: chunk.kind,
            original_code: chunk.code.clone(),
            migrated_code,
            validation,
            time_ms: chunk_started.elapsed().as_millis() as u64,
            error,
        }
    }
}

/// Group chunks by file path, keeping the order files first appear in.
fn group_by_file(chunks: Vec<CodeChunk>) -> Vec<(String, Vec<CodeChunk>)> {
    let mut groups: Vec<(String, Vec<CodeChunk>)> = Vec::new();
    for chunk in chunks {
        match groups.iter_mut().find(|(path, _)| *path == chunk.file_path) {
            Some((_, group)) => group.push(chunk),
            None => groups.push((chunk.file_path.clone(), vec![chunk])),
        }
    }
    groups
}

/// Assemble a migrated file: import block (original imports plus the
/// target's required packages), chunk outputs separated by blank lines, and
/// a final export line when the file exported anything.
fn assemble_file(rewrites: &[ChunkRewrite], context: &FileContext, profile: &TechProfile) -> String {
    let mut imports: Vec<&str> = context.imports.iter().map(String::as_str).collect();
    for package in profile.required_imports {
        if !imports.contains(package) {
            imports.push(package);
        }
    }

    let mut parts = Vec::new();
    if !imports.is_empty() {
        let block: Vec<String> = imports
            .iter()
            .map(|source| format!("import {source};"))
            .collect();
        parts.push(block.join("\n"));
    }

    let bodies: Vec<&str> = rewrites
        .iter()
        .filter(|r| r.error.is_none() && !r.migrated_code.trim().is_empty())
        .map(|r| r.migrated_code.trim())
        .collect();
    parts.push(bodies.join("\n\n"));

    if !context.exports.is_empty() {
        parts.push(format!("export {{ {} }};", context.exports.join(", ")));
    }

    parts.join("\n\n")
}

/// Drop a single wrapping markdown code fence, if the model added one.
fn strip_code_fences(response: &str) -> String {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed.to_string();
    };
    // Skip the info string on the opening fence ("```ts\n...").
    let body = body.split_once('\n').map_or(body, |(_, tail)| tail);
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use recast_chunk_model::ChunkKind;
    use recast_planner::{PlanMetadata, PlanSections, RiskLevel, Timeline};
    use recast_providers::testing::ScriptedLlm;
    use recast_providers::ProviderError;

    fn plan(target: &str) -> MigrationPlan {
        MigrationPlan {
            sections: PlanSections::default(),
            metadata: PlanMetadata {
                generated_at: Utc::now(),
                chunks_analyzed: 0,
                target_technology: target.to_string(),
                command: "convert".to_string(),
            },
            timeline: Timeline {
                phases: vec![],
                estimated_total_time: String::new(),
                risk_level: RiskLevel::Low,
            },
        }
    }

    fn chunk(id: &str, path: &str, kind: ChunkKind, complexity: u8) -> CodeChunk {
        CodeChunk::new(id, "s1", path, kind, format!("sym_{id}"), "function f() {}")
            .language("typescript")
            .complexity(complexity)
    }

    #[tokio::test]
    async fn chunks_emit_in_priority_then_complexity_order() {
        let llm = Arc::new(ScriptedLlm::always("function migrated() {}"));
        let engine = RewriteEngine::new(llm);

        let chunks = vec![
            chunk("var", "src/a.ts", ChunkKind::Variable, 1),
            chunk("fn_hard", "src/a.ts", ChunkKind::Function, 5),
            chunk("iface", "src/a.ts", ChunkKind::Interface, 3),
            chunk("fn_easy", "src/a.ts", ChunkKind::Function, 1),
        ];
        let result = engine
            .rewrite("s1", "u1", &plan("generic"), chunks)
            .await
            .unwrap();

        let order: Vec<&str> = result.results[0]
            .chunks
            .iter()
            .map(|c| c.chunk_id.as_str())
            .collect();
        assert_eq!(order, vec!["iface", "fn_easy", "fn_hard", "var"]);
    }

    #[tokio::test]
    async fn failed_chunk_does_not_abort_the_file() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Err(ProviderError::Unavailable("down".into())),
            Ok("function ok() {}".to_string()),
        ]));
        let engine = RewriteEngine::new(llm);

        let chunks = vec![
            chunk("a", "src/a.ts", ChunkKind::Function, 1),
            chunk("b", "src/a.ts", ChunkKind::Function, 2),
        ];
        let result = engine
            .rewrite("s1", "u1", &plan("generic"), chunks)
            .await
            .unwrap();

        assert_eq!(result.results.len(), 1);
        let file = &result.results[0];
        assert!(file.success);
        assert!(file.chunks[0].error.is_some());
        assert!(!file.chunks[0].validation.is_valid);
        assert!(file.chunks[1].error.is_none());
    }

    #[tokio::test]
    async fn failed_file_is_recorded_not_fatal() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            Err(ProviderError::Unavailable("down".into())),
            Ok("function ok() {}".to_string()),
        ]));
        let engine = RewriteEngine::new(llm);

        let chunks = vec![
            chunk("a", "src/broken.ts", ChunkKind::Function, 1),
            chunk("b", "src/fine.ts", ChunkKind::Function, 1),
        ];
        let result = engine
            .rewrite("s1", "u1", &plan("generic"), chunks)
            .await
            .unwrap();

        assert_eq!(result.results.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].file_path, "src/broken.ts");
        assert!((result.statistics.success_rate - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn assembled_file_has_imports_bodies_and_exports() {
        let llm = Arc::new(ScriptedLlm::always(
            "export function getUsers() { return prisma.user.findMany(); }",
        ));
        let engine = RewriteEngine::new(llm);

        let mut source = chunk("a", "src/users.ts", ChunkKind::Function, 1);
        source.code = "import { Pool } from 'pg';\nexport function getUsers() {}".to_string();

        let result = engine
            .rewrite("s1", "u1", &plan("prisma"), vec![source])
            .await
            .unwrap();

        let content = &result.results[0].content;
        assert!(content.contains("import pg;"));
        assert!(content.contains("import @prisma/client;"));
        assert!(content.contains("prisma.user.findMany()"));
        assert!(content.contains("export { getUsers };"));
    }

    #[tokio::test]
    async fn markdown_fences_are_stripped() {
        let llm = Arc::new(ScriptedLlm::always(
            "```ts\nfunction migrated() {}\n```",
        ));
        let engine = RewriteEngine::new(llm);

        let result = engine
            .rewrite(
                "s1",
                "u1",
                &plan("generic"),
                vec![chunk("a", "src/a.ts", ChunkKind::Function, 1)],
            )
            .await
            .unwrap();

        assert_eq!(
            result.results[0].chunks[0].migrated_code,
            "function migrated() {}"
        );
    }

    #[tokio::test]
    async fn migration_ids_are_fresh_per_run() {
        let llm = Arc::new(ScriptedLlm::always("function f() {}"));
        let engine = RewriteEngine::new(llm);

        let a = engine
            .rewrite("s1", "u1", &plan("generic"), vec![chunk("a", "src/a.ts", ChunkKind::Function, 1)])
            .await
            .unwrap();
        let b = engine
            .rewrite("s1", "u1", &plan("generic"), vec![chunk("b", "src/a.ts", ChunkKind::Function, 1)])
            .await
            .unwrap();
        assert_ne!(a.migration_id, b.migration_id);
    }
}
