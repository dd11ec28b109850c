// Typed call errors and user-facing error messages

use thiserror::Error;

/// Failure of a single call to the local model runner.
#[derive(Error, Debug)]
pub enum LocalModelError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error talking to `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    ExitStatus {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("local model call timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP {status_code} from local model: {message}")]
    Http { status_code: u16, message: String },

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("no base URL configured for the HTTP transport")]
    MissingBaseUrl,
}

/// Failure of the cloud completion call.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status_code}: {body}")]
    Status {
        provider: String,
        status_code: u16,
        body: String,
    },

    #[error("could not parse {provider} response: {source}")]
    Parse {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0} returned no choices in response")]
    EmptyChoices(String),
}

/// Append a suggestion block under an error message.
pub fn wrap_error_with_suggestion(message: impl Into<String>, suggestion: &str) -> String {
    format!("{}\n\n{}", message.into(), suggestion)
}

pub fn file_not_found_error(path: &str, what: &str) -> String {
    wrap_error_with_suggestion(
        format!("{} not found or unreadable: {}", what, path),
        "Check the path and file permissions, or pass --config <PATH>.",
    )
}

pub fn config_parse_error(detail: &str) -> String {
    wrap_error_with_suggestion(
        format!("Failed to parse configuration: {}", detail),
        "Expected layout:\n  \
         [local] transport = \"process\" | \"http\"\n  \
         [cloud] model = \"gpt-4o\"",
    )
}

pub fn api_key_missing_error() -> String {
    wrap_error_with_suggestion(
        "No cloud API key configured",
        "Set it in ~/.hybrid-assistant/config.toml:\n  \
         [cloud]\n  api_key = \"sk-...\"\n\n\
         or export it:\n  export OPENAI_API_KEY=\"sk-...\"",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_error_messages() {
        let err = LocalModelError::Timeout(60);
        assert_eq!(err.to_string(), "local model call timed out after 60s");

        let err = LocalModelError::ExitStatus {
            program: "ollama".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "model not found".to_string(),
        };
        assert!(err.to_string().contains("model not found"));
    }

    #[test]
    fn test_suggestion_wrapping() {
        let msg = wrap_error_with_suggestion("Boom", "Try again");
        assert_eq!(msg, "Boom\n\nTry again");
        assert!(api_key_missing_error().contains("OPENAI_API_KEY"));
    }
}
