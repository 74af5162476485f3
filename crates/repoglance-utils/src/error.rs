use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Library-level error type with rich context and user-friendly reporting.
///
/// `RepoGlanceError` is returned by the I/O-facing parts of repoglance
/// (configuration discovery, repository sources, summarizer backends).
/// The selection and chunking core never fails and does not use it.
///
/// # Error Categories
///
/// | Category | Description |
/// |----------|-------------|
/// | `Config` | Configuration file or CLI argument errors |
/// | `Source` | Repository source could not be read |
/// | `Llm` | Summarizer backend failures |
/// | `Io` | Unclassified file system failures |
///
/// # Exit Code Mapping
///
/// Use [`to_exit_code()`](Self::to_exit_code) to map errors to CLI exit codes:
///
/// | Exit Code | Error Type |
/// |-----------|------------|
/// | 2 | Configuration/CLI argument errors |
/// | 3 | Repository source errors |
/// | 70 | Summarizer failure |
/// | 1 | Other errors |
///
/// # Example
///
/// ```rust
/// use repoglance_utils::error::{ConfigError, RepoGlanceError};
/// use repoglance_utils::exit_codes::ExitCode;
///
/// let err = RepoGlanceError::Config(ConfigError::InvalidFile("bad toml".to_string()));
/// assert_eq!(err.to_exit_code(), ExitCode::CLI_ARGS);
/// assert!(err.display_for_user().starts_with("Error:"));
/// ```
#[derive(Error, Debug)]
pub enum RepoGlanceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Repository source error: {0}")]
    Source(#[from] SourceError),

    #[error("LLM backend error: {0}")]
    Llm(#[from] LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Repository,
    Summarizer,
    FileSystem,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Repository => write!(f, "Repository"),
            Self::Summarizer => write!(f, "Summarizer"),
            Self::FileSystem => write!(f, "File System"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Configuration discovery failed: {reason}")]
    DiscoveryFailed { reason: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => {
                format!("Configuration file has invalid format: {reason}")
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => {
                format!("Configuration file not found: {path}")
            }
            Self::DiscoveryFailed { reason } => {
                format!("Failed to discover configuration: {reason}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => Some(
                "Configuration files must be valid TOML with [selection], [chunking], [source] and [llm] sections."
                    .to_string(),
            ),
            Self::InvalidValue { key, .. } => Some(format!(
                "The '{key}' configuration option has specific format requirements."
            )),
            Self::NotFound { .. } => Some(
                "repoglance searches for .repoglance/config.toml starting from the current directory upward."
                    .to_string(),
            ),
            Self::DiscoveryFailed { .. } => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax using a TOML validator".to_string(),
                "Compare with the example configuration in the README".to_string(),
            ],
            Self::InvalidValue { key, .. } => match key.as_str() {
                "max_file_bytes" | "max_total_bytes" => vec![
                    "Use a positive integer value".to_string(),
                    "Defaults are 102400 bytes per file and 51200 bytes in total".to_string(),
                ],
                "chars_per_token" | "max_tokens" => {
                    vec!["Use a positive integer value (defaults: 4 and 8000)".to_string()]
                }
                "provider" => vec!["Use 'anthropic' or 'none'".to_string()],
                _ => vec![
                    "Check the documentation for valid values for this option".to_string(),
                    "Remove the option to use the default value".to_string(),
                ],
            },
            Self::NotFound { .. } => vec![
                "Create .repoglance/config.toml in your project root".to_string(),
                "Use CLI flags instead of a configuration file".to_string(),
            ],
            Self::DiscoveryFailed { .. } => vec![
                "Check file permissions in the current directory and parent directories"
                    .to_string(),
                "Use --config <path> to specify configuration file explicitly".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Repository source errors
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Repository root not found: {path}")]
    NotFound { path: String },

    #[error("Repository root is not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Repository path is not valid UTF-8: {path}")]
    NonUtf8Path { path: String },

    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl UserFriendlyError for SourceError {
    fn user_message(&self) -> String {
        match self {
            Self::NotFound { path } => format!("Repository directory '{path}' does not exist"),
            Self::NotADirectory { path } => format!("'{path}' is a file, not a repository directory"),
            Self::NonUtf8Path { path } => {
                format!("Repository path '{path}' contains non UTF-8 characters")
            }
            Self::InvalidPattern { pattern, reason } => {
                format!("Exclude pattern '{pattern}' is invalid: {reason}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidPattern { .. } => {
                Some("Exclude patterns use glob syntax, e.g. 'docs/**' or '**/*.snap'.".to_string())
            }
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotFound { .. } | Self::NotADirectory { .. } => vec![
                "Pass the path of a checked-out repository directory".to_string(),
                "Use an absolute path if the relative path is ambiguous".to_string(),
            ],
            Self::NonUtf8Path { .. } => {
                vec!["Rename or move the repository to a UTF-8 path".to_string()]
            }
            Self::InvalidPattern { .. } => {
                vec!["Fix the pattern in the [source] exclude list".to_string()]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Repository
    }
}

/// Summarizer backend errors.
///
/// The variants follow the collaborator contract: outages and timeouts are
/// transient and get one bounded retry, authentication and configuration
/// problems are permanent, and quota errors are surfaced without retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Transport-level failure (HTTP connectivity, malformed response)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider authentication failure (401, 403, missing API key)
    #[error("Provider authentication error: {0}")]
    ProviderAuth(String),

    /// Provider quota/rate limit exceeded (429)
    #[error("Provider quota exceeded: {0}")]
    ProviderQuota(String),

    /// Provider service outage (5xx errors)
    #[error("Provider outage: {0}")]
    ProviderOutage(String),

    /// Invocation timed out
    #[error("Timeout after {duration:?}")]
    Timeout { duration: Duration },

    /// Configuration error
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),

    /// Unsupported feature or provider
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl LlmError {
    /// Whether the failure is transient and worth a single wait-and-retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderOutage(_) | Self::Timeout { .. })
    }

    /// Short stable label used in summaries and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::ProviderAuth(_) => "auth",
            Self::ProviderQuota(_) => "quota",
            Self::ProviderOutage(_) => "outage",
            Self::Timeout { .. } => "timeout",
            Self::Misconfiguration(_) => "misconfiguration",
            Self::Unsupported(_) => "unsupported",
        }
    }
}

impl UserFriendlyError for LlmError {
    fn user_message(&self) -> String {
        match self {
            Self::Transport(msg) => format!("LLM transport error: {msg}"),
            Self::ProviderAuth(msg) => format!("LLM provider authentication failed: {msg}"),
            Self::ProviderQuota(msg) => format!("LLM provider quota exceeded: {msg}"),
            Self::ProviderOutage(msg) => format!("LLM provider service outage: {msg}"),
            Self::Timeout { duration } => {
                format!("LLM invocation timed out after {duration:?}")
            }
            Self::Misconfiguration(msg) => format!("LLM configuration error: {msg}"),
            Self::Unsupported(msg) => format!("LLM feature not supported: {msg}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::ProviderAuth(_) => Some(
                "Authentication errors indicate missing or invalid API keys.".to_string(),
            ),
            Self::ProviderQuota(_) => Some(
                "Quota errors occur when rate limits or usage limits are exceeded.".to_string(),
            ),
            Self::ProviderOutage(_) => {
                Some("Provider outages are temporary service disruptions.".to_string())
            }
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Transport(_) => vec![
                "Verify network connectivity".to_string(),
                "Try running with --verbose to see detailed error information".to_string(),
            ],
            Self::ProviderAuth(_) => vec![
                "Check that the required API key environment variable is set".to_string(),
                "Verify the API key is valid and not expired".to_string(),
            ],
            Self::ProviderQuota(_) | Self::ProviderOutage(_) => vec![
                "Wait a few minutes and try again".to_string(),
                "Run with --offline to get the heuristic summary only".to_string(),
            ],
            Self::Timeout { .. } => {
                vec!["Increase [llm] timeout_secs in the configuration".to_string()]
            }
            Self::Misconfiguration(_) | Self::Unsupported(_) => vec![
                "Review the [llm] section of .repoglance/config.toml".to_string(),
                "Set provider = \"none\" to disable narrative summaries".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Summarizer
    }
}

impl UserFriendlyError for RepoGlanceError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(err) => err.user_message(),
            Self::Source(err) => err.user_message(),
            Self::Llm(err) => err.user_message(),
            Self::Io(err) => format!("File system operation failed: {err}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(err) => err.context(),
            Self::Source(err) => err.context(),
            Self::Llm(err) => err.context(),
            Self::Io(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(err) => err.suggestions(),
            Self::Source(err) => err.suggestions(),
            Self::Llm(err) => err.suggestions(),
            Self::Io(_) => vec!["Check file permissions and available disk space".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(err) => err.category(),
            Self::Source(err) => err.category(),
            Self::Llm(err) => err.category(),
            Self::Io(_) => ErrorCategory::FileSystem,
        }
    }
}

impl RepoGlanceError {
    /// Get a user-friendly error message with context and actionable suggestions
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error: {}\n", self.user_message()));

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }

    /// Map this error to the appropriate CLI exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> crate::exit_codes::ExitCode {
        use crate::exit_codes::ExitCode;

        match self {
            Self::Config(_) => ExitCode::CLI_ARGS,
            Self::Source(_) => ExitCode::SOURCE_ERROR,
            Self::Llm(LlmError::Misconfiguration(_) | LlmError::Unsupported(_)) => {
                ExitCode::CLI_ARGS
            }
            Self::Llm(_) => ExitCode::LLM_FAILURE,
            Self::Io(_) => ExitCode::INTERNAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::ExitCode;

    #[test]
    fn test_retryable_classification() {
        assert!(LlmError::ProviderOutage("503".to_string()).is_retryable());
        assert!(
            LlmError::Timeout {
                duration: Duration::from_secs(1)
            }
            .is_retryable()
        );
        assert!(!LlmError::ProviderAuth("401".to_string()).is_retryable());
        assert!(!LlmError::ProviderQuota("429".to_string()).is_retryable());
        assert!(!LlmError::Misconfiguration("no key".to_string()).is_retryable());
    }

    #[test]
    fn test_exit_code_mapping() {
        let config = RepoGlanceError::Config(ConfigError::InvalidFile("x".to_string()));
        assert_eq!(config.to_exit_code(), ExitCode::CLI_ARGS);

        let source = RepoGlanceError::Source(SourceError::NotFound {
            path: "/nope".to_string(),
        });
        assert_eq!(source.to_exit_code(), ExitCode::SOURCE_ERROR);

        let llm = RepoGlanceError::Llm(LlmError::ProviderQuota("slow down".to_string()));
        assert_eq!(llm.to_exit_code(), ExitCode::LLM_FAILURE);

        let misconfigured = RepoGlanceError::Llm(LlmError::Misconfiguration("no key".to_string()));
        assert_eq!(misconfigured.to_exit_code(), ExitCode::CLI_ARGS);
    }

    #[test]
    fn test_display_for_user_includes_suggestions() {
        let err = RepoGlanceError::Config(ConfigError::InvalidValue {
            key: "max_total_bytes".to_string(),
            value: "must be greater than 0".to_string(),
        });
        let text = err.display_for_user();

        assert!(text.starts_with("Error: Configuration 'max_total_bytes'"));
        assert!(text.contains("Suggestions:"));
        assert!(text.contains("Use a positive integer value"));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_llm_error_kind_labels() {
        assert_eq!(LlmError::ProviderQuota(String::new()).kind(), "quota");
        assert_eq!(LlmError::ProviderAuth(String::new()).kind(), "auth");
        assert_eq!(
            LlmError::Timeout {
                duration: Duration::ZERO
            }
            .kind(),
            "timeout"
        );
    }
}
