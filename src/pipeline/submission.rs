// Submissions and the soft stops that halt them before any call

use serde::Serialize;
use std::fmt;

use crate::config::constants::CUSTOM_MODEL_CHOICE;
use crate::local::remediation_command;

/// Model picked in the selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelChoice {
    /// A preset (or any directly named) model
    Named(String),
    /// "custom" was chosen; holds whatever was typed, possibly blank
    Custom(String),
}

impl ModelChoice {
    /// Interpret a selector value. `"custom"` takes the name from `custom`.
    pub fn from_selector(choice: &str, custom: Option<&str>) -> Self {
        if choice.trim().eq_ignore_ascii_case(CUSTOM_MODEL_CHOICE) {
            ModelChoice::Custom(custom.unwrap_or_default().to_string())
        } else {
            ModelChoice::Named(choice.to_string())
        }
    }

    /// Trimmed model name, or `None` if blank.
    pub fn resolve(&self) -> Option<&str> {
        let name = match self {
            ModelChoice::Named(name) | ModelChoice::Custom(name) => name.trim(),
        };
        (!name.is_empty()).then_some(name)
    }
}

/// One user submission, as entered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub query: String,
    pub model: ModelChoice,
    pub base_url: Option<String>,
}

impl Submission {
    pub fn new(query: impl Into<String>, model: ModelChoice) -> Self {
        Self {
            query: query.into(),
            model,
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

/// Reasons a submission halts without touching any model.
///
/// The session stays usable after any of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SoftStop {
    EmptyQuery,
    MissingModel,
    MissingBaseUrl,
    ModelNotInstalled { model: String, remediation: String },
    ModelCheckFailed { error: String },
}

impl SoftStop {
    pub fn model_not_installed(model: &str) -> Self {
        SoftStop::ModelNotInstalled {
            model: model.to_string(),
            remediation: remediation_command(model),
        }
    }
}

impl fmt::Display for SoftStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoftStop::EmptyQuery => write!(f, "Please enter a question."),
            SoftStop::MissingModel => {
                write!(f, "Please choose a local model or enter a custom model name.")
            }
            SoftStop::MissingBaseUrl => write!(f, "Please enter the local model base URL."),
            SoftStop::ModelNotInstalled { model, remediation } => {
                write!(f, "Model '{}' not installed. Run: {}", model, remediation)
            }
            SoftStop::ModelCheckFailed { error } => write!(f, "Model check failed: {}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_custom() {
        let choice = ModelChoice::from_selector("custom", Some("  my-model "));
        assert_eq!(choice, ModelChoice::Custom("  my-model ".to_string()));
        assert_eq!(choice.resolve(), Some("my-model"));

        let blank = ModelChoice::from_selector("custom", None);
        assert_eq!(blank.resolve(), None);

        let spaces = ModelChoice::from_selector("Custom", Some("   "));
        assert_eq!(spaces.resolve(), None);
    }

    #[test]
    fn test_selector_named() {
        let choice = ModelChoice::from_selector("llama3", Some("ignored"));
        assert_eq!(choice.resolve(), Some("llama3"));
    }

    #[test]
    fn test_has_query() {
        let named = ModelChoice::Named("mistral".to_string());
        assert!(!Submission::new("", named.clone()).has_query());
        assert!(!Submission::new(" \t\n", named.clone()).has_query());
        assert!(Submission::new(" hi ", named).has_query());
    }

    #[test]
    fn test_soft_stop_messages() {
        let stop = SoftStop::model_not_installed("phi3");
        assert_eq!(stop.to_string(), "Model 'phi3' not installed. Run: ollama pull phi3");

        let json = serde_json::to_value(&stop).unwrap();
        assert_eq!(json["kind"], "model_not_installed");
        assert_eq!(json["remediation"], "ollama pull phi3");

        let json = serde_json::to_value(SoftStop::EmptyQuery).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "empty_query"}));
    }
}
