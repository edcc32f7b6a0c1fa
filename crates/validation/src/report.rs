use once_cell::sync::Lazy;
use recast_rewrite::{FileResult, MigrationResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s+[^;]*?\s+from\s+['"]([^'"]+)['"]"#).expect("valid import regex")
});

static EXPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"export\s+(?:default\s+)?(?:\{[^}]*\}|const|let|var|function|class)")
        .expect("valid export regex")
});

static ENV_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"process\.env\.([A-Za-z0-9_]+)").expect("valid env var regex"));

const BUILD_TOOLS: &[&str] = &["webpack", "babel", "typescript", "jest"];
const TEST_CONSTRUCTS: &[&str] = &["describe(", "it(", "test(", "expect("];

/// Heuristic quality rates over the rewritten files, each in [0, 1]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeQualityReport {
    pub syntax_rate: f64,
    pub imports_rate: f64,
    pub exports_rate: f64,
    pub type_safety_rate: f64,
    pub error_handling_rate: f64,
}

/// Chunk-level preservation rates, each in [0, 1]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionalityReport {
    pub structure_rate: f64,
    pub logic_rate: f64,
    pub api_compatibility_rate: f64,
}

/// Import sources observed across all rewritten files
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DependencyReport {
    pub imports: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationReport {
    /// Files that reference configuration code
    pub config_files: usize,
    pub env_vars: Vec<String>,
    pub build_tools: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TestingReport {
    pub test_files: usize,
    pub patterns: Vec<String>,
}

/// The full validation pass over a migration result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub code_quality: CodeQualityReport,
    pub functionality: FunctionalityReport,
    pub dependencies: DependencyReport,
    pub configuration: ConfigurationReport,
    pub testing: TestingReport,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Validate a migration result. Only successfully rewritten files are
/// scored; with no such files every rate is vacuously 1.0. Validation is
/// informative: it produces issues and recommendations, never an error.
#[must_use]
pub fn validate_migration_results(result: &MigrationResult) -> ValidationReport {
    let files: Vec<&FileResult> = result.results.iter().filter(|f| f.success).collect();

    let code_quality = code_quality(&files);
    let functionality = functionality(&files);
    let dependencies = dependencies(&files);
    let configuration = configuration(&files);
    let testing = testing(&files);

    let (issues, recommendations) = derive_issues(&code_quality, &functionality);

    log::info!(
        "Validated {} rewritten files: {} issue(s)",
        files.len(),
        issues.len()
    );

    ValidationReport {
        code_quality,
        functionality,
        dependencies,
        configuration,
        testing,
        issues,
        recommendations,
    }
}

fn rate(passing: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        passing as f64 / total as f64
    }
}

fn file_rate(files: &[&FileResult], check: impl Fn(&str) -> bool) -> f64 {
    let passing = files.iter().filter(|f| check(&f.content)).count();
    rate(passing, files.len())
}

fn code_quality(files: &[&FileResult]) -> CodeQualityReport {
    CodeQualityReport {
        syntax_rate: file_rate(files, |content| {
            ["function", "class", "const", "let", "var"]
                .iter()
                .any(|keyword| content.contains(keyword))
        }),
        imports_rate: file_rate(files, |content| {
            !content.contains("import")
                || content
                    .lines()
                    .any(|line| line.trim_start().starts_with("import "))
        }),
        exports_rate: file_rate(files, |content| {
            !content.contains("export") || EXPORT_RE.is_match(content)
        }),
        type_safety_rate: file_rate(files, |content| {
            content.contains(':') || content.contains("interface") || content.contains("type ")
        }),
        error_handling_rate: file_rate(files, |content| {
            ["try", "catch", "throw", "error"]
                .iter()
                .any(|keyword| content.to_lowercase().contains(keyword))
        }),
    }
}

fn functionality(files: &[&FileResult]) -> FunctionalityReport {
    let chunks: Vec<_> = files.iter().flat_map(|f| f.chunks.iter()).collect();
    let total = chunks.len();

    let produced = chunks
        .iter()
        .filter(|c| !c.migrated_code.is_empty())
        .count();
    let logic_intact = chunks
        .iter()
        .filter(|c| !c.migrated_code.trim().is_empty())
        .count();
    let api_compatible = chunks.iter().filter(|c| c.validation.is_valid).count();

    FunctionalityReport {
        structure_rate: rate(produced, total),
        logic_rate: rate(logic_intact, total),
        api_compatibility_rate: rate(api_compatible, total),
    }
}

fn dependencies(files: &[&FileResult]) -> DependencyReport {
    let mut imports = BTreeSet::new();
    for file in files {
        for capture in IMPORT_RE.captures_iter(&file.content) {
            if let Some(source) = capture.get(1) {
                imports.insert(source.as_str().to_string());
            }
        }
    }
    DependencyReport {
        imports: imports.into_iter().collect(),
    }
}

fn configuration(files: &[&FileResult]) -> ConfigurationReport {
    let mut env_vars = BTreeSet::new();
    let mut build_tools = BTreeSet::new();
    let mut config_files = 0;

    for file in files {
        let lowered = file.content.to_lowercase();
        if lowered.contains("config") || lowered.contains("process.env") || lowered.contains("settings")
        {
            config_files += 1;
        }
        for capture in ENV_VAR_RE.captures_iter(&file.content) {
            if let Some(name) = capture.get(1) {
                env_vars.insert(name.as_str().to_string());
            }
        }
        for tool in BUILD_TOOLS {
            if lowered.contains(tool) {
                build_tools.insert((*tool).to_string());
            }
        }
    }

    ConfigurationReport {
        config_files,
        env_vars: env_vars.into_iter().collect(),
        build_tools: build_tools.into_iter().collect(),
    }
}

fn testing(files: &[&FileResult]) -> TestingReport {
    let mut patterns = BTreeSet::new();
    let mut test_files = 0;

    for file in files {
        let mut mentions_tests = false;
        for construct in TEST_CONSTRUCTS {
            if file.content.contains(construct) {
                mentions_tests = true;
                patterns.insert((*construct).to_string());
            }
        }
        if mentions_tests {
            test_files += 1;
        }
    }

    TestingReport {
        test_files,
        patterns: patterns.into_iter().collect(),
    }
}

fn derive_issues(
    quality: &CodeQualityReport,
    functionality: &FunctionalityReport,
) -> (Vec<String>, Vec<String>) {
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    let mut flag = |failed: bool, issue: &str, recommendation: &str| {
        if failed {
            issues.push(issue.to_string());
            recommendations.push(recommendation.to_string());
        }
    };

    flag(
        quality.syntax_rate < 0.9,
        "syntax validity below 90%",
        "Review files without recognizable declarations and re-run the rewrite",
    );
    flag(
        quality.imports_rate < 0.8,
        "import statements below 80% validity",
        "Check that required packages are imported in each migrated file",
    );
    flag(
        quality.error_handling_rate < 0.5,
        "error handling present in fewer than half the files",
        "Add try/catch blocks around the migrated entry points",
    );
    flag(
        functionality.structure_rate < 0.8,
        "chunk structure preserved below 80%",
        "Re-run the failed chunks individually with more file context",
    );
    flag(
        functionality.logic_rate < 0.9,
        "chunk logic intact below 90%",
        "Inspect chunks whose rewrite came back empty",
    );

    (issues, recommendations)
}
