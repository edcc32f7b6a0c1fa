use crate::tables::{COMMAND_PATTERNS, GENERIC_PROFILE, PROFILES};
use serde::Serialize;

/// Everything the pipeline knows about one target technology
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct TechProfile {
    /// Canonical technology tag (lowercase)
    pub tag: &'static str,

    /// Context paragraph injected into plan and rewrite prompts
    pub context: &'static str,

    /// Idiom bullets injected into rewrite prompts
    pub patterns: &'static [&'static str],

    /// Package names whose import marks a rewrite as wired to the target
    pub required_imports: &'static [&'static str],

    /// Tokens whose presence marks target-idiomatic output
    pub pattern_markers: &'static [&'static str],
}

/// Resolve a technology tag to its profile. Unknown tags get the generic
/// profile rather than an error; tag matching is case-insensitive.
#[must_use]
pub fn profile_for(tag: &str) -> &'static TechProfile {
    let wanted = tag.trim();
    PROFILES
        .iter()
        .find(|profile| profile.tag.eq_ignore_ascii_case(wanted))
        .unwrap_or(&GENERIC_PROFILE)
}

/// Pattern bullets for the plan prompt, selected by scanning the command for
/// the concerns it mentions (database, api, component, test). Order follows
/// the table, not the command.
#[must_use]
pub fn command_patterns(command: &str) -> Vec<&'static str> {
    let lowered = command.to_lowercase();
    let mut bullets = Vec::new();
    for (concern, set) in COMMAND_PATTERNS {
        if lowered.contains(concern) {
            bullets.extend_from_slice(set);
        }
    }
    bullets
}
