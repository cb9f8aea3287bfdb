//! Snippet requests, responses and the workflow catalog.
//!
//! A snippet is a workflow rule that computes Markdown on demand. Executing
//! one either yields content or asks the caller for a parameter first.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Prefix that marks a workflow rule title as a snippet.
const SNIPPET_TITLE_PREFIX: &str = "snippet:";

/// Rule type that snippets are registered as.
const SNIPPET_RULE_TYPE: &str = "StatelessActionRule";

/// Type of the parameter a snippet asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Single-line string.
    String,
    /// Number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// Multi-line text.
    Text,
}

/// Parameter a snippet needs before it can produce content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnippetInput {
    /// Expected value type.
    #[serde(rename = "type")]
    pub kind: InputKind,
    /// Prompt shown to the user.
    pub description: String,
    /// Allowed values, when the input is a choice.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<serde_json::Value>>,
}

impl SnippetInput {
    /// Whether `value` is acceptable for this input.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        if let Some(options) = &self.options {
            return options.iter().any(|option| match option {
                serde_json::Value::String(s) => s == value,
                other => other.to_string() == value,
            });
        }
        match self.kind {
            InputKind::String | InputKind::Text => true,
            InputKind::Number => value.trim().parse::<f64>().is_ok_and(f64::is_finite),
            InputKind::Boolean => matches!(value, "true" | "false"),
        }
    }
}

/// Snippet output, ready for the content transformer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetContent {
    /// Title to show above the content.
    pub title: String,
    /// Markdown content.
    pub content: String,
}

/// Body of a "parameter required" response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnippetInputRequest {
    /// The parameter to collect.
    pub input: SnippetInput,
}

/// Response of the snippet endpoint.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SnippetResponse {
    /// Content was produced.
    Content(SnippetContent),
    /// A parameter must be collected first.
    Input(SnippetInputRequest),
}

impl SnippetResponse {
    /// Parse a successful response body.
    pub fn from_json(body: &str) -> Result<Self, ProviderError> {
        Ok(serde_json::from_str(body)?)
    }
}

/// Error body returned when a snippet rule throws.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SnippetErrorRecord {
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Script stack trace, when available.
    #[serde(default)]
    pub stack: Option<String>,
}

impl From<SnippetErrorRecord> for ProviderError {
    fn from(record: SnippetErrorRecord) -> Self {
        Self::Snippet {
            message: record.message,
            stack: record.stack,
        }
    }
}

/// Request to execute a snippet rule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnippetRequest {
    /// Workflow that owns the rule.
    pub workflow: String,
    /// Rule name.
    pub rule: String,
    /// User-provided parameter (empty when none).
    pub param: String,
    /// Login of the viewing user.
    pub login: Option<String>,
    /// ID of the issue or article the widget is shown on.
    pub entity_id: Option<String>,
    /// Refresh counter, bumped to bypass caches.
    pub refresh: u32,
}

impl SnippetRequest {
    /// Request for `rule` in `workflow` without a parameter.
    #[must_use]
    pub fn new(workflow: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            workflow: workflow.into(),
            rule: rule.into(),
            ..Self::default()
        }
    }

    /// Set the user parameter.
    #[must_use]
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    /// Set the viewing user's login.
    #[must_use]
    pub fn with_login(mut self, login: Option<String>) -> Self {
        self.login = login;
        self
    }

    /// Set the host entity ID.
    #[must_use]
    pub fn with_entity_id(mut self, entity_id: Option<String>) -> Self {
        self.entity_id = entity_id;
        self
    }

    /// Set the refresh counter.
    #[must_use]
    pub fn with_refresh(mut self, refresh: u32) -> Self {
        self.refresh = refresh;
        self
    }

    /// Query parameters in the snippet endpoint's naming.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("workflow", self.workflow.clone()),
            ("rule", self.rule.clone()),
            ("userInput", self.param.clone()),
            ("login", self.login.clone().unwrap_or_default()),
            ("entityId", self.entity_id.clone().unwrap_or_default()),
            ("refreshCount", self.refresh.to_string()),
        ]
    }
}

/// Workflow rule as listed by the tracker admin API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RuleRecord {
    /// Rule (module) name.
    pub name: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: Option<String>,
    /// Rule type (`StatelessActionRule`, `OnChangeRule`, ...).
    #[serde(rename = "type", default)]
    pub rule_type: String,
}

/// Workflow as listed by the tracker admin API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct WorkflowRecord {
    /// Workflow name.
    pub name: String,
    /// Rules in the workflow.
    #[serde(default)]
    pub rules: Vec<RuleRecord>,
}

/// A snippet available for embedding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetInfo {
    /// Title without the `snippet:` prefix.
    pub title: String,
    /// Owning workflow.
    pub workflow: String,
    /// Rule name.
    pub rule: String,
}

/// List the snippet rules across `workflows`, in workflow and rule order.
#[must_use]
pub fn snippet_catalog(workflows: &[WorkflowRecord]) -> Vec<SnippetInfo> {
    workflows
        .iter()
        .flat_map(|workflow| {
            workflow.rules.iter().filter_map(move |rule| {
                if rule.rule_type != SNIPPET_RULE_TYPE {
                    return None;
                }
                let title = rule.title.as_deref()?.strip_prefix(SNIPPET_TITLE_PREFIX)?;
                Some(SnippetInfo {
                    title: title.to_owned(),
                    workflow: workflow.name.clone(),
                    rule: rule.name.clone(),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_content_response() {
        let response =
            SnippetResponse::from_json(r##"{"title": "Standup", "content": "# Today"}"##).unwrap();

        assert_eq!(
            response,
            SnippetResponse::Content(SnippetContent {
                title: "Standup".to_owned(),
                content: "# Today".to_owned(),
            })
        );
    }

    #[test]
    fn test_parse_input_response() {
        let body = r#"{"input": {"type": "string", "description": "Team", "enum": ["web", "api"]}}"#;
        let SnippetResponse::Input(request) = SnippetResponse::from_json(body).unwrap() else {
            panic!("expected input request");
        };

        assert_eq!(request.input.kind, InputKind::String);
        assert_eq!(request.input.description, "Team");
        assert_eq!(request.input.options.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_parse_invalid_input_type_fails() {
        let body = r#"{"input": {"type": "date", "description": "When"}}"#;
        assert!(matches!(
            SnippetResponse::from_json(body),
            Err(ProviderError::Json(_))
        ));
    }

    #[test]
    fn test_input_accepts_by_kind() {
        let input = |kind| SnippetInput {
            kind,
            description: String::new(),
            options: None,
        };

        assert!(input(InputKind::Number).accepts("42.5"));
        assert!(!input(InputKind::Number).accepts("forty"));
        assert!(input(InputKind::Boolean).accepts("false"));
        assert!(!input(InputKind::Boolean).accepts("yes"));
        assert!(input(InputKind::Text).accepts("any\ntext"));
    }

    #[test]
    fn test_input_accepts_enum_options() {
        let input = SnippetInput {
            kind: InputKind::Number,
            description: "Sprint".to_owned(),
            options: Some(vec![serde_json::json!(1), serde_json::json!(2)]),
        };

        assert!(input.accepts("2"));
        assert!(!input.accepts("3"));
    }

    #[test]
    fn test_snippet_error_record_into_provider_error() {
        let record: SnippetErrorRecord =
            serde_json::from_str(r#"{"message": "boom", "stack": "at rule.js:3"}"#).unwrap();
        let err = ProviderError::from(record);

        assert!(matches!(err, ProviderError::Snippet { ref message, .. } if message == "boom"));
    }

    #[test]
    fn test_request_query_pairs() {
        let request = SnippetRequest::new("team", "standup")
            .with_param("web")
            .with_login(Some("kim".to_owned()))
            .with_refresh(2);

        assert_eq!(
            request.query_pairs(),
            vec![
                ("workflow", "team".to_owned()),
                ("rule", "standup".to_owned()),
                ("userInput", "web".to_owned()),
                ("login", "kim".to_owned()),
                ("entityId", String::new()),
                ("refreshCount", "2".to_owned()),
            ]
        );
    }

    #[test]
    fn test_snippet_catalog_filters_rules() {
        let workflows: Vec<WorkflowRecord> = serde_json::from_str(
            r#"[
                {"name": "team", "rules": [
                    {"name": "standup", "title": "snippet:Standup", "type": "StatelessActionRule"},
                    {"name": "notify", "title": "Notify", "type": "StatelessActionRule"},
                    {"name": "guard", "title": "snippet:Guard", "type": "OnChangeRule"},
                    {"name": "untitled", "type": "StatelessActionRule"}
                ]},
                {"name": "release", "rules": [
                    {"name": "notes", "title": "snippet:Release notes", "type": "StatelessActionRule"}
                ]}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            snippet_catalog(&workflows),
            vec![
                SnippetInfo {
                    title: "Standup".to_owned(),
                    workflow: "team".to_owned(),
                    rule: "standup".to_owned(),
                },
                SnippetInfo {
                    title: "Release notes".to_owned(),
                    workflow: "release".to_owned(),
                    rule: "notes".to_owned(),
                },
            ]
        );
    }
}
