use recast_tech_profiles::{KEYWORD_EXPANSIONS, MIGRATION_LEXICON};

/// Expand a migration command into the query that actually gets embedded.
///
/// Appends, in order: the keyword set of every technology the command
/// mentions, then every migration-lexicon word present in the command.
/// Appended terms are deduplicated against each other and against words
/// already in the command; the command itself is kept verbatim up front.
#[must_use]
pub fn expand_command(command: &str) -> String {
    let lowered = command.to_lowercase();
    let existing: Vec<&str> = lowered.split_whitespace().collect();
    let mut appended: Vec<&str> = Vec::new();

    let mut push = |term: &'static str| {
        if !existing.contains(&term) && !appended.contains(&term) {
            appended.push(term);
        }
    };

    for (tag, keywords) in KEYWORD_EXPANSIONS {
        if lowered.contains(tag) {
            for keyword in *keywords {
                push(keyword);
            }
        }
    }

    for word in MIGRATION_LEXICON {
        if lowered.contains(word) {
            push(word);
        }
    }

    if appended.is_empty() {
        return command.to_string();
    }
    format!("{command} {}", appended.join(" "))
}
