//! # Recast Tech Profiles
//!
//! Target-technology knowledge as data: query-expansion keywords, prompt
//! context paragraphs, migration pattern bullets, required imports, and the
//! pattern markers used by static validation. Dispatch over technology tags
//! happens through one lookup into these tables; unknown tags resolve to a
//! generic profile instead of failing.

mod profile;
mod tables;

pub use profile::{command_patterns, profile_for, TechProfile};
pub use tables::{KEYWORD_EXPANSIONS, MIGRATION_LEXICON};
