use recast_retrieval::RetrievedChunk;
use recast_tech_profiles::{command_patterns, profile_for};
use serde_json::{Map, Value};
use std::fmt::Write;

/// How much chunk code the plan prompt quotes per chunk
const CODE_PREVIEW_CHARS: usize = 200;

/// Build the plan-synthesis prompt: command, target, options, technology
/// context, migration patterns, and a summary of every retrieved chunk,
/// followed by the JSON instruction.
#[must_use]
pub fn build_plan_prompt(
    command: &str,
    target: &str,
    options: &Map<String, Value>,
    chunks: &[RetrievedChunk],
) -> String {
    let profile = profile_for(target);
    let mut prompt = String::new();

    let _ = writeln!(prompt, "You are planning a code migration.");
    let _ = writeln!(prompt, "Command: {command}");
    let _ = writeln!(prompt, "Target technology: {target}");
    if !options.is_empty() {
        let _ = writeln!(
            prompt,
            "Options: {}",
            serde_json::to_string(options).unwrap_or_default()
        );
    }

    let _ = writeln!(prompt, "\nTarget context:\n{}", profile.context);

    let patterns = command_patterns(command);
    if !patterns.is_empty() {
        let _ = writeln!(prompt, "\nMigration patterns to apply:");
        for pattern in patterns {
            let _ = writeln!(prompt, "- {pattern}");
        }
    }

    let _ = writeln!(prompt, "\nRelevant code chunks ({}):", chunks.len());
    for retrieved in chunks {
        let chunk = &retrieved.chunk;
        let preview: String = chunk.code.chars().take(CODE_PREVIEW_CHARS).collect();
        let _ = writeln!(
            prompt,
            "\n- {} ({}) in {} [{}] complexity {} relevance {:.2}\n```\n{preview}\n```",
            chunk.name,
            chunk.kind.as_str(),
            chunk.file_path,
            chunk.language,
            chunk.complexity,
            retrieved.migration_relevance,
        );
    }

    let _ = writeln!(
        prompt,
        "\nRespond with a single JSON object containing exactly these keys: \
         \"analysis\", \"strategy\", \"code_transformations\", \"dependencies\", \
         \"configuration\", \"testing\", \"risks\", \"implementation_order\". \
         Each value may be a string or an array of strings. No other text."
    );

    prompt
}
