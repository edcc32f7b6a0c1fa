use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inbound migration request, as handed over by the HTTP layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MigrationRequest {
    #[serde(default)]
    pub session_id: String,

    #[serde(default)]
    pub user_id: String,

    #[serde(default)]
    pub command: String,

    #[serde(default)]
    pub target_technology: String,

    #[serde(default)]
    pub options: Map<String, Value>,
}

impl MigrationRequest {
    pub fn new(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        command: impl Into<String>,
        target_technology: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            command: command.into(),
            target_technology: target_technology.into(),
            options: Map::new(),
        }
    }

    /// Names of the required fields that are absent or blank
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.session_id.trim().is_empty() {
            missing.push("sessionId");
        }
        if self.user_id.trim().is_empty() {
            missing.push("userId");
        }
        if self.command.trim().is_empty() {
            missing.push("command");
        }
        if self.target_technology.trim().is_empty() {
            missing.push("targetTechnology");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn complete_request_has_no_missing_fields() {
        let request = MigrationRequest::new("s1", "u1", "convert to prisma", "prisma");
        assert!(request.missing_fields().is_empty());
    }

    #[test]
    fn blank_fields_are_reported_by_wire_name() {
        let mut request = MigrationRequest::new("s1", "u1", "  ", "prisma");
        request.user_id = String::new();
        assert_eq!(request.missing_fields(), vec!["userId", "command"]);
    }

    #[test]
    fn deserializes_with_absent_fields() {
        let request: MigrationRequest =
            serde_json::from_str(r#"{"sessionId": "s1", "userId": "u1"}"#).unwrap();
        assert_eq!(request.missing_fields(), vec!["command", "targetTechnology"]);
    }
}
