use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

/// Model identifier used when `GENAI_TEXT_MODEL` is not set. Chat responses
/// echo the configured model id, so an unconfigured deployment reports this.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-pro";

/// Gemini REST API base URL.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_REQUEST_TIMEOUT_SECS: &str = "120";
const DEFAULT_STATIC_DIR: &str = "frontend";

/// Default upload body limit (16MB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub models: ModelConfig,
    pub frontend: FrontendConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// `None` when `GOOGLE_API_KEY` is unset or empty. Chat and file
    /// analysis are disabled in that case.
    pub api_key: Option<Secret<String>>,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model for chat and file analysis (e.g., gemini-pro)
    pub text_model: String,
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct FrontendConfig {
    /// Directory holding `index.html` and the rest of the bundle.
    pub static_dir: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub otlp_endpoint: Option<String>,
}

impl AnalyzerConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build the service config from an arbitrary variable source.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        Ok(AnalyzerConfig {
            common,
            google: GoogleConfig {
                api_key: vars.optional("GOOGLE_API_KEY").map(Secret::new),
            },
            models: ModelConfig {
                text_model: vars.get("GENAI_TEXT_MODEL", Some(DEFAULT_TEXT_MODEL))?,
                api_base: vars
                    .get("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE))?
                    .trim_end_matches('/')
                    .to_string(),
                request_timeout_secs: vars
                    .parsed("GENAI_REQUEST_TIMEOUT_SECS", Some(DEFAULT_REQUEST_TIMEOUT_SECS))?,
                temperature: vars.parsed_optional("GENAI_TEMPERATURE")?,
                max_output_tokens: vars.parsed_optional("GENAI_MAX_OUTPUT_TOKENS")?,
            },
            frontend: FrontendConfig {
                static_dir: vars.get("STATIC_DIR", Some(DEFAULT_STATIC_DIR))?,
                max_upload_bytes: vars
                    .parsed_optional("MAX_UPLOAD_BYTES")?
                    .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            },
            observability: ObservabilityConfig {
                otlp_endpoint: vars.optional("OTLP_ENDPOINT"),
            },
        })
    }

    pub fn api_key_configured(&self) -> bool {
        self.google.api_key.is_some()
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Set and non-empty, otherwise `None`.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|val| !val.trim().is_empty())
    }

    fn get(&self, key: &str, default: Option<&str>) -> Result<String, AppError> {
        match self.optional(key) {
            Some(val) => Ok(val),
            None => default.map(str::to_string).ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!("{} is required but not set", key))
            }),
        }
    }

    fn parsed<T>(&self, key: &str, default: Option<&str>) -> Result<T, AppError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.get(key, default)?;
        parse_value(key, &raw)
    }

    fn parsed_optional<T>(&self, key: &str) -> Result<Option<T>, AppError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key)
            .map(|raw| parse_value(key, &raw))
            .transpose()
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
    })
}
