use crate::error::{ChunkModelError, Result};
use crate::SimilarChunk;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File extensions accepted for indexed chunks
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "py", "java", "go", "rb", "php", "cs", "cpp", "c", "rs", "swift",
    "kt",
];

/// A semantic code fragment extracted at ingestion time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeChunk {
    /// Globally unique chunk identifier
    pub id: String,

    /// Session that owns this chunk
    pub session_id: String,

    /// User that owns this chunk
    pub user_id: String,

    pub project_id: String,
    pub project_name: String,

    /// Source file path
    pub file_path: String,
    pub file_name: String,

    /// File extension, restricted to [`SUPPORTED_EXTENSIONS`]
    pub file_ext: String,

    /// Full source text of the chunk
    pub code: String,

    /// Semantic kind of the fragment
    pub kind: ChunkKind,

    /// Symbol name (function name, class name, etc.)
    pub name: String,

    pub start_line: usize,
    pub end_line: usize,
    pub start_column: usize,
    pub end_column: usize,
    pub start_index: usize,
    pub end_index: usize,

    /// Detected programming language
    pub language: String,

    /// Integer complexity in [1, 10]
    pub complexity: u8,

    pub is_async: bool,
    pub is_static: bool,
    pub visibility: Visibility,

    /// Ordered parameter records
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Ordered dependency records (imports, calls)
    #[serde(default)]
    pub dependencies: Vec<DependencyRef>,

    /// Ordered comment records
    #[serde(default)]
    pub comments: Vec<CommentRecord>,

    /// Enclosing chunk, if any
    pub parent_id: Option<String>,

    /// Nested chunks, in source order
    #[serde(default)]
    pub child_ids: Vec<String>,

    /// Top-K most similar chunks, sorted descending by similarity
    #[serde(default)]
    pub similar_chunks: Vec<SimilarChunk>,

    pub file_size: u64,
    pub last_modified: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CodeChunk {
    /// Create a chunk with the required identity fields; everything else
    /// starts from neutral defaults and is filled via the builder setters.
    pub fn new(
        id: impl Into<String>,
        session_id: impl Into<String>,
        file_path: impl Into<String>,
        kind: ChunkKind,
        name: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        let file_path = file_path.into();
        let file_name = file_path
            .rsplit('/')
            .next()
            .unwrap_or(file_path.as_str())
            .to_string();
        let file_ext = file_name.rsplit('.').next().unwrap_or("").to_string();
        let now = Utc::now();

        Self {
            id: id.into(),
            session_id: session_id.into(),
            user_id: String::new(),
            project_id: String::new(),
            project_name: String::new(),
            file_path,
            file_name,
            file_ext,
            code: code.into(),
            kind,
            name: name.into(),
            start_line: 1,
            end_line: 1,
            start_column: 0,
            end_column: 0,
            start_index: 0,
            end_index: 0,
            language: "javascript".to_string(),
            complexity: 1,
            is_async: false,
            is_static: false,
            visibility: Visibility::Public,
            parameters: Vec::new(),
            dependencies: Vec::new(),
            comments: Vec::new(),
            parent_id: None,
            child_ids: Vec::new(),
            similar_chunks: Vec::new(),
            file_size: 0,
            last_modified: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder: set owning user
    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Builder: set detected language
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Builder: set complexity, clamped into [1, 10]
    #[must_use]
    pub fn complexity(mut self, complexity: u8) -> Self {
        self.complexity = complexity.clamp(1, 10);
        self
    }

    /// Builder: set source span
    #[must_use]
    pub const fn span(mut self, start_line: usize, end_line: usize) -> Self {
        self.start_line = start_line;
        self.end_line = end_line;
        self
    }

    /// Builder: set byte span
    #[must_use]
    pub const fn byte_span(mut self, start_index: usize, end_index: usize) -> Self {
        self.start_index = start_index;
        self.end_index = end_index;
        self
    }

    /// Builder: mark async
    #[must_use]
    pub const fn is_async(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }

    /// Builder: set visibility
    #[must_use]
    pub const fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Builder: add a parameter record
    #[must_use]
    pub fn add_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Builder: add a dependency record
    #[must_use]
    pub fn add_dependency(mut self, dependency: DependencyRef) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Get the number of lines in this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Directory portion of the file path (empty for top-level files)
    #[must_use]
    pub fn directory(&self) -> &str {
        match self.file_path.rfind('/') {
            Some(idx) => &self.file_path[..idx],
            None => "",
        }
    }

    /// Check required fields and span/complexity invariants
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: &str| {
            Err(ChunkModelError::InvalidChunk {
                id: self.id.clone(),
                reason: reason.to_string(),
            })
        };

        if self.id.trim().is_empty() {
            return fail("empty id");
        }
        if self.session_id.trim().is_empty() {
            return fail("empty session id");
        }
        if self.file_path.trim().is_empty() {
            return fail("empty file path");
        }
        if !SUPPORTED_EXTENSIONS.contains(&self.file_ext.as_str()) {
            return Err(ChunkModelError::UnsupportedExtension(self.file_ext.clone()));
        }
        if self.start_line > self.end_line {
            return fail("start line after end line");
        }
        if self.start_index > self.end_index {
            return fail("start index after end index");
        }
        if !(1..=10).contains(&self.complexity) {
            return fail("complexity outside [1, 10]");
        }
        Ok(())
    }
}

/// Semantic kind of a code chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkKind {
    Function,
    Class,
    Method,
    Variable,
    Import,
    Export,
    ArrowFunction,
    Block,
    Interface,
    Type,
    Enum,
    Namespace,
}

impl ChunkKind {
    /// Rewrite ordering within a file (lower = emitted first)
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Interface => 0,
            Self::Type => 1,
            Self::Class => 2,
            Self::Function => 3,
            Self::Method => 4,
            Self::Variable => 5,
            Self::ArrowFunction => 6,
            Self::Enum => 7,
            Self::Namespace => 8,
            Self::Import | Self::Export => 9,
            Self::Block => 10,
        }
    }

    /// Check if this kind names a declaration that anchors retrieval scoring
    #[must_use]
    pub const fn is_declaration(self) -> bool {
        matches!(
            self,
            Self::Class | Self::Function | Self::Method | Self::Interface | Self::Type
        )
    }

    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Method => "method",
            Self::Variable => "variable",
            Self::Import => "import",
            Self::Export => "export",
            Self::ArrowFunction => "arrow-function",
            Self::Block => "block",
            Self::Interface => "interface",
            Self::Type => "type",
            Self::Enum => "enum",
            Self::Namespace => "namespace",
        }
    }
}

/// Declared visibility of a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
    Internal,
}

/// A declared parameter of a function-like chunk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "type")]
    pub param_type: Option<String>,

    pub line: usize,
    pub optional: bool,

    /// Default-value expression text, if present
    pub default_value: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            param_type: None,
            line,
            optional: false,
            default_value: None,
        }
    }
}

/// A dependency recorded on a chunk (import target, callee)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRef {
    /// Dependency kind, e.g. "import" or "call"
    pub kind: String,

    /// Module path or symbol the chunk depends on
    pub source: String,

    pub line: usize,

    /// Whether the target lives outside the project
    pub external: bool,
}

impl DependencyRef {
    pub fn import(source: impl Into<String>, line: usize, external: bool) -> Self {
        Self {
            kind: "import".to_string(),
            source: source.into(),
            line,
            external,
        }
    }
}

/// A comment attached to a chunk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub text: String,
    pub line: usize,
    pub kind: CommentKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentKind {
    SingleLine,
    MultiLine,
    Docblock,
    Docstring,
}
