use crate::plan::PlanSections;
use serde::Deserialize;
use serde_json::Value;

/// Extract the first balanced `{...}` substring, skipping braces inside JSON
/// string literals.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// The section names accepted by the labelled-section fallback, paired with
/// their slot in [`PlanSections`].
const SECTION_LABELS: &[(&str, fn(&mut PlanSections) -> &mut String)] = &[
    ("ANALYSIS", |s| &mut s.analysis),
    ("STRATEGY", |s| &mut s.strategy),
    ("CODE TRANSFORMATIONS", |s| &mut s.code_transformations),
    ("CODE_TRANSFORMATIONS", |s| &mut s.code_transformations),
    ("DEPENDENCIES", |s| &mut s.dependencies),
    ("CONFIGURATION", |s| &mut s.configuration),
    ("TESTING", |s| &mut s.testing),
    ("RISKS", |s| &mut s.risks),
    ("IMPLEMENTATION ORDER", |s| &mut s.implementation_order),
    ("IMPLEMENTATION_ORDER", |s| &mut s.implementation_order),
];

/// Parse an LLM response into plan sections.
///
/// Tries the first balanced JSON object; when that fails, scans the text for
/// labelled sections (`ANALYSIS:`, `STRATEGY:`, ...). Either way the result
/// may be partial; [`fill_defaults`] completes it.
#[must_use]
pub fn parse_plan_sections(response: &str) -> PlanSections {
    if let Some(raw) = extract_json_object(response) {
        if let Ok(parsed) = serde_json::from_str::<RawPlan>(raw) {
            return parsed.into_sections();
        }
        log::debug!("Plan JSON found but not parseable, trying labelled sections");
    }
    scan_labelled_sections(response)
}

/// Replace every empty section with a default string naming the target.
pub fn fill_defaults(sections: &mut PlanSections, target: &str) {
    let defaults: [(&mut String, &str); 8] = [
        (&mut sections.analysis, "Analyze the existing code"),
        (&mut sections.strategy, "Incremental migration"),
        (&mut sections.code_transformations, "Transform code"),
        (&mut sections.dependencies, "Update dependencies"),
        (&mut sections.configuration, "Update configuration"),
        (&mut sections.testing, "Test the migrated code"),
        (&mut sections.risks, "Standard migration risks"),
        (&mut sections.implementation_order, "Migrate file by file"),
    ];
    for (slot, default) in defaults {
        if slot.trim().is_empty() {
            *slot = format!("{default} for {target}");
        }
    }
}

/// Typed view of the JSON the LLM is asked for. Extra keys are dropped here
/// rather than merged into the plan.
#[derive(Deserialize)]
struct RawPlan {
    #[serde(default)]
    analysis: Value,
    #[serde(default)]
    strategy: Value,
    #[serde(default, alias = "codeTransformations", alias = "code-transformations")]
    code_transformations: Value,
    #[serde(default)]
    dependencies: Value,
    #[serde(default)]
    configuration: Value,
    #[serde(default)]
    testing: Value,
    #[serde(default)]
    risks: Value,
    #[serde(default, alias = "implementationOrder", alias = "implementation-order")]
    implementation_order: Value,
}

impl RawPlan {
    fn into_sections(self) -> PlanSections {
        PlanSections {
            analysis: flatten(self.analysis),
            strategy: flatten(self.strategy),
            code_transformations: flatten(self.code_transformations),
            dependencies: flatten(self.dependencies),
            configuration: flatten(self.configuration),
            testing: flatten(self.testing),
            risks: flatten(self.risks),
            implementation_order: flatten(self.implementation_order),
        }
    }
}

/// Normalize a JSON section value to text: arrays become one item per line,
/// scalars their plain rendering, objects compact JSON.
fn flatten(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Array(items) => items
            .into_iter()
            .map(flatten)
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}

fn scan_labelled_sections(text: &str) -> PlanSections {
    let mut sections = PlanSections::default();
    let upper = text.to_uppercase();

    for (label, slot) in SECTION_LABELS {
        let Some(label_at) = upper.find(&format!("{label}:")) else {
            continue;
        };
        let body_at = label_at + label.len() + 1;

        // The section runs until the next known label or end of text.
        let mut end = text.len();
        for (other, _) in SECTION_LABELS {
            if let Some(at) = upper[body_at..].find(&format!("{other}:")) {
                end = end.min(body_at + at);
            }
        }

        let body = text[body_at..end].trim();
        let target = slot(&mut sections);
        if target.is_empty() && !body.is_empty() {
            *target = body.to_string();
        }
    }

    sections
}
