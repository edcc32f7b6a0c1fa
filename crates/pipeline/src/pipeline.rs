use crate::capabilities::Capabilities;
use crate::error::PipelineError;
use crate::report::{MigrationReport, MigrationStep, ReportStatistics, SuccessReport};
use crate::request::MigrationRequest;
use recast_chunk_model::{ChunkKind, CodeChunk};
use recast_chunk_store::ChunkStore;
use recast_planner::PlanSynthesizer;
use recast_retrieval::{RetrievalEngine, RetrievalOptions};
use recast_rewrite::RewriteEngine;
use recast_validation::{
    classify_error, run_stage, truncate_chunks, validate_migration_results, ErrorClass, MAX_RETRIES,
};
use std::time::Instant;

/// The migration orchestrator. Construct once per process from a capability
/// bundle; each `process_migration` call is independent.
pub struct MigrationPipeline {
    caps: Capabilities,
    retrieval: RetrievalEngine,
    planner: PlanSynthesizer,
    rewriter: RewriteEngine,
}

impl MigrationPipeline {
    pub fn new(caps: Capabilities) -> Self {
        let retrieval = RetrievalEngine::new(caps.embedder.clone(), caps.store.clone());
        let planner = PlanSynthesizer::new(caps.llm.clone());
        let rewriter = RewriteEngine::new(caps.llm.clone());
        Self {
            caps,
            retrieval,
            planner,
            rewriter,
        }
    }

    /// Run the six-stage pipeline. Never panics and never partially commits:
    /// failures come back as `{success: false, error, step}` reports.
    pub async fn process_migration(&self, request: &MigrationRequest) -> MigrationReport {
        let started = Instant::now();
        log::info!(
            "Processing migration for session '{}': '{}' -> {}",
            request.session_id,
            request.command,
            request.target_technology
        );

        // Stage 1: validate.
        let missing = request.missing_fields();
        if !missing.is_empty() {
            return MigrationReport::failure(
                MigrationStep::Validation,
                PipelineError::InvalidRequest(missing.join(", ")).to_string(),
            );
        }
        match self.caps.store.count_by_session(&request.session_id).await {
            Ok(0) => {
                return MigrationReport::failure(
                    MigrationStep::Validation,
                    PipelineError::NoIndexedCode.to_string(),
                );
            }
            Ok(count) => log::debug!("Session '{}' has {count} chunks", request.session_id),
            Err(err) => {
                return MigrationReport::failure(MigrationStep::Validation, err.to_string());
            }
        }

        // Stage 2: analyze.
        let project_statistics = match self
            .caps
            .store
            .project_statistics(&request.session_id)
            .await
        {
            Ok(statistics) => statistics,
            Err(err) => {
                return MigrationReport::failure(MigrationStep::Analysis, err.to_string());
            }
        };

        // Stage 3: retrieve, with transient failures (rate limits, network)
        // run through the recovery state machine.
        let options = retrieval_options(request);
        let retrieval = &self.retrieval;
        let command = request.command.as_str();
        let session_id = request.session_id.as_str();
        let options_ref = &options;
        let retrieved = match run_stage("chunk_discovery", MAX_RETRIES, move || async move {
            retrieval
                .retrieve(command, session_id, options_ref)
                .await
                .map_err(|err| err.to_string())
        })
        .await
        {
            Ok((chunks, metadata)) => {
                log::info!(
                    "Discovered {} chunks ({} candidates)",
                    chunks.len(),
                    metadata.candidates_considered
                );
                chunks
            }
            Err(failure) => {
                return MigrationReport::failure(MigrationStep::ChunkDiscovery, failure.to_string());
            }
        };

        // Stage 4: plan.
        let planner = &self.planner;
        let target = request.target_technology.as_str();
        let chunks_ref = &retrieved;
        let options_map = &request.options;
        let plan = match run_stage("plan_generation", MAX_RETRIES, move || async move {
            planner
                .plan(command, target, chunks_ref, options_map)
                .await
                .map_err(|err| err.to_string())
        })
        .await
        {
            Ok(plan) => plan,
            Err(failure) => {
                return MigrationReport::failure(MigrationStep::PlanGeneration, failure.to_string());
            }
        };

        // Stage 5: rewrite. A resource-exhaustion failure gets one recovery
        // attempt with the candidate list cut down.
        let mut chunks: Vec<CodeChunk> = retrieved.iter().map(|r| r.chunk.clone()).collect();
        let result = match self
            .rewriter
            .rewrite(&request.session_id, &request.user_id, &plan, chunks.clone())
            .await
        {
            Ok(result) => result,
            Err(err) => {
                let message = err.to_string();
                if classify_error(&message) != ErrorClass::ResourceError {
                    return MigrationReport::failure(MigrationStep::Execution, message);
                }
                log::warn!("Rewrite hit resource limits, retrying with fewer chunks");
                truncate_chunks(&mut chunks);
                match self
                    .rewriter
                    .rewrite(&request.session_id, &request.user_id, &plan, chunks)
                    .await
                {
                    Ok(result) => result,
                    Err(err) => {
                        return MigrationReport::failure(MigrationStep::Execution, err.to_string());
                    }
                }
            }
        };

        // Stage 6: validate results. Informative, never fatal.
        let validation = validate_migration_results(&result);

        let statistics = ReportStatistics {
            chunks_analyzed: retrieved.len(),
            files_modified: result.results.len(),
            total_time_ms: started.elapsed().as_millis() as u64,
        };
        log::info!(
            "Migration '{}' done: {} files, {} ms",
            result.migration_id,
            statistics.files_modified,
            statistics.total_time_ms
        );

        MigrationReport::Success(Box::new(SuccessReport {
            success: true,
            migration_id: result.migration_id.clone(),
            command: request.command.clone(),
            target_technology: request.target_technology.clone(),
            plan,
            errors: result.errors.clone(),
            results: result.results,
            validation,
            statistics,
            project_statistics,
            completed_at: self.caps.clock.now(),
        }))
    }
}

/// Read the retrieval knobs out of the request's option map, falling back to
/// the documented defaults.
fn retrieval_options(request: &MigrationRequest) -> RetrievalOptions {
    let options = &request.options;
    let mut parsed = RetrievalOptions::default();

    if let Some(threshold) = options.get("threshold").and_then(|v| v.as_f64()) {
        parsed.threshold = threshold as f32;
    }
    if let Some(limit) = options.get("limit").and_then(|v| v.as_u64()) {
        parsed.limit = limit as usize;
    }
    if let Some(kinds) = options.get("chunkTypes").and_then(|v| v.as_array()) {
        parsed.chunk_types = kinds
            .iter()
            .filter_map(|v| serde_json::from_value::<ChunkKind>(v.clone()).ok())
            .collect();
    }
    if let Some(languages) = options.get("languages").and_then(|v| v.as_array()) {
        parsed.languages = languages
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
    }
    if let Some(include) = options.get("includeDependencies").and_then(|v| v.as_bool()) {
        parsed.include_dependencies = include;
    }
    if let Some(include) = options.get("includeRelatedFiles").and_then(|v| v.as_bool()) {
        parsed.include_related_files = include;
    }

    parsed
}
