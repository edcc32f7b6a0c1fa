use once_cell::sync::Lazy;
use recast_chunk_model::CodeChunk;
use regex::Regex;
use serde::Serialize;

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s+[^;]*?\s+from\s+['"]([^'"]+)['"]"#).expect("valid import regex")
});

static EXPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"export\s+(?:default\s+)?(?:const|let|var|function|class)\s+([A-Za-z_$][A-Za-z0-9_$]*)")
        .expect("valid export regex")
});

/// What the rewrite prompt knows about the file around a chunk
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileContext {
    /// Import sources appearing anywhere in the file's chunks
    pub imports: Vec<String>,

    /// Identifiers the file exports
    pub exports: Vec<String>,

    /// Dependency sources declared on the chunk records
    pub dependencies: Vec<String>,

    pub language: String,
    pub extension: String,
}

/// Union the imports, exports and declared dependencies of every chunk in
/// one file. Insertion order is kept, duplicates dropped.
#[must_use]
pub fn build_file_context(chunks: &[&CodeChunk]) -> FileContext {
    let mut context = FileContext::default();

    for chunk in chunks {
        for capture in IMPORT_RE.captures_iter(&chunk.code) {
            if let Some(source) = capture.get(1) {
                push_unique(&mut context.imports, source.as_str());
            }
        }
        for capture in EXPORT_RE.captures_iter(&chunk.code) {
            if let Some(name) = capture.get(1) {
                push_unique(&mut context.exports, name.as_str());
            }
        }
        for dependency in &chunk.dependencies {
            push_unique(&mut context.dependencies, &dependency.source);
        }
    }

    if let Some(first) = chunks.first() {
        context.language = first.language.clone();
        context.extension = first.file_ext.clone();
    }

    context
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use recast_chunk_model::{ChunkKind, DependencyRef};

    fn chunk(code: &str) -> CodeChunk {
        CodeChunk::new("c1", "s1", "src/users.ts", ChunkKind::Function, "f", code)
            .language("typescript")
    }

    #[test]
    fn extracts_import_sources() {
        let a = chunk("import { Pool } from 'pg';\nimport express from \"express\";");
        let context = build_file_context(&[&a]);
        assert_eq!(context.imports, vec!["pg", "express"]);
    }

    #[test]
    fn extracts_exported_identifiers() {
        let a = chunk("export default function handler() {}\nexport const limit = 10;");
        let context = build_file_context(&[&a]);
        assert_eq!(context.exports, vec!["handler", "limit"]);
    }

    #[test]
    fn unions_across_chunks_without_duplicates() {
        let a = chunk("import db from 'pg';");
        let b = chunk("import db from 'pg';\nimport { z } from 'zod';");
        let context = build_file_context(&[&a, &b]);
        assert_eq!(context.imports, vec!["pg", "zod"]);
    }

    #[test]
    fn carries_declared_dependencies_and_language() {
        let a = chunk("function f() {}").add_dependency(DependencyRef::import("lodash", 1, true));
        let context = build_file_context(&[&a]);
        assert_eq!(context.dependencies, vec!["lodash"]);
        assert_eq!(context.language, "typescript");
        assert_eq!(context.extension, "ts");
    }
}
