//! Static inspection of rewritten code.
//!
//! Every heuristic the engine applies to LLM output lives here, driven by the
//! technology tables, so target-specific patterns stay data instead of being
//! scattered through the engine.

use recast_chunk_model::ChunkKind;
use recast_tech_profiles::TechProfile;
use serde::{Deserialize, Serialize};

/// Outcome of the static checks on one rewritten chunk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChunkValidation {
    pub has_code: bool,
    pub has_imports: bool,
    pub maintains_structure: bool,
    pub follows_patterns: bool,
    pub issues: Vec<String>,
    pub is_valid: bool,
}

/// Run the static checks for a rewritten chunk against its target profile.
/// `is_valid` holds exactly when `issues` is empty.
#[must_use]
pub fn validate_chunk(code: &str, kind: ChunkKind, profile: &TechProfile) -> ChunkValidation {
    let mut issues = Vec::new();

    let has_code = !code.trim().is_empty();
    if !has_code {
        issues.push("rewrite produced no code".to_string());
    }

    let has_imports = profile.required_imports.is_empty()
        || profile
            .required_imports
            .iter()
            .any(|package| code.contains(package));
    if !has_imports {
        issues.push(format!(
            "missing required import for '{}' (expected one of: {})",
            profile.tag,
            profile.required_imports.join(", ")
        ));
    }

    let maintains_structure = structure_preserved(code, kind);
    if !maintains_structure {
        issues.push(format!("{} structure not preserved", kind.as_str()));
    }

    let follows_patterns = profile.pattern_markers.is_empty()
        || profile
            .pattern_markers
            .iter()
            .any(|marker| code.contains(marker));
    if !follows_patterns {
        issues.push(format!("no '{}' idioms detected", profile.tag));
    }

    ChunkValidation {
        has_code,
        has_imports,
        maintains_structure,
        follows_patterns,
        is_valid: issues.is_empty(),
        issues,
    }
}

fn structure_preserved(code: &str, kind: ChunkKind) -> bool {
    match kind {
        ChunkKind::Function | ChunkKind::Method | ChunkKind::ArrowFunction => {
            (code.contains('(') && code.contains(')')) || code.contains("=>")
        }
        ChunkKind::Class => code.contains("class"),
        ChunkKind::Variable => {
            code.contains('=')
                || code.contains("const ")
                || code.contains("let ")
                || code.contains("var ")
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_tech_profiles::profile_for;

    #[test]
    fn empty_rewrite_is_invalid() {
        let validation = validate_chunk("  ", ChunkKind::Function, profile_for("generic"));
        assert!(!validation.has_code);
        assert!(!validation.is_valid);
        assert!(!validation.issues.is_empty());
    }

    #[test]
    fn is_valid_iff_issues_empty() {
        let good = validate_chunk(
            "import { PrismaClient } from '@prisma/client';\nconst users = await prisma.user.findMany();",
            ChunkKind::Variable,
            profile_for("prisma"),
        );
        assert!(good.is_valid);
        assert!(good.issues.is_empty());

        let bad = validate_chunk("function f() {}", ChunkKind::Function, profile_for("prisma"));
        assert_eq!(bad.is_valid, bad.issues.is_empty());
        assert!(!bad.is_valid);
    }

    #[test]
    fn missing_required_import_is_flagged() {
        let validation = validate_chunk(
            "const users = prisma.user.findMany();",
            ChunkKind::Variable,
            profile_for("prisma"),
        );
        assert!(!validation.has_imports);
        assert!(validation.issues.iter().any(|i| i.contains("@prisma/client")));
    }

    #[test]
    fn function_structure_accepts_arrows() {
        let profile = profile_for("generic");
        assert!(validate_chunk("const f = x => x + 1", ChunkKind::ArrowFunction, profile).maintains_structure);
        assert!(validate_chunk("function f(a, b) { }", ChunkKind::Function, profile).maintains_structure);
        assert!(!validate_chunk("no call syntax here", ChunkKind::Function, profile).maintains_structure);
    }

    #[test]
    fn class_and_variable_structure() {
        let profile = profile_for("generic");
        assert!(validate_chunk("class A {}", ChunkKind::Class, profile).maintains_structure);
        assert!(!validate_chunk("not a type", ChunkKind::Class, profile).maintains_structure);
        assert!(validate_chunk("const x = 1;", ChunkKind::Variable, profile).maintains_structure);
        assert!(validate_chunk("let y;", ChunkKind::Variable, profile).maintains_structure);
    }

    #[test]
    fn generic_profile_skips_import_and_pattern_checks() {
        let validation = validate_chunk("function f() {}", ChunkKind::Function, profile_for("unknown-tech"));
        assert!(validation.has_imports);
        assert!(validation.follows_patterns);
        assert!(validation.is_valid);
    }
}
