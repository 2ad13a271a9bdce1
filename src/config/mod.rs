use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use fs_err as fs;
use serde::{Deserialize, Serialize};

use crate::errors::PlannerError;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(alias = "google")]
    Gemini,
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
    Ollama,
}

impl ProviderKind {
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-pro",
            ProviderKind::OpenAI => "gpt-4.1-mini",
            ProviderKind::Ollama => "llama3.1",
        }
    }

    pub fn default_api_base(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com",
            ProviderKind::OpenAI => "https://api.openai.com",
            ProviderKind::Ollama => "http://localhost:11434",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAI => "openai",
            ProviderKind::Ollama => "ollama",
        })
    }
}

/// Service credential. Never shown: `Debug` and `Display` are redacted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("ApiKey(<empty>)")
        } else {
            f.write_str("ApiKey(***)")
        }
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Sampling temperature, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Temperature(f32);

impl Temperature {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 1.0;

    pub fn new(value: f32) -> Result<Self, PlannerError> {
        if value.is_finite() && (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PlannerError::TemperatureOutOfRange(value))
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self(DEFAULT_TEMPERATURE)
    }
}

impl TryFrom<f32> for Temperature {
    type Error = PlannerError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Temperature> for f32 {
    fn from(t: Temperature) -> Self {
        t.0
    }
}

impl FromStr for Temperature {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f32 = s
            .trim()
            .parse()
            .map_err(|_| PlannerError::InvalidTemperature(s.trim().to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Session-held generation settings, reused across submissions.
#[derive(Debug, Clone, Default)]
pub struct GenerationConfig {
    pub api_key: ApiKey,
    pub temperature: Temperature,
}

impl GenerationConfig {
    pub fn new(api_key: ApiKey, temperature: Temperature) -> Self {
        Self { api_key, temperature }
    }
}

/// Settings file. The credential is deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub provider: ProviderKind,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub temperature: Temperature,
    pub timeout_secs: u64,
    pub output_dir: PathBuf,
    pub api_key_env: String,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: None,
            api_base: None,
            temperature: Temperature::default(),
            timeout_secs: 120,
            output_dir: PathBuf::from("."),
            api_key_env: DEFAULT_API_KEY_ENV.into(),
            log_level: None,
        }
    }
}

impl Config {
    /// Reads `path` when given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, PlannerError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path).map_err(|e| PlannerError::Config {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| PlannerError::Config {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    pub fn model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    pub fn api_base(&self) -> String {
        self.api_base
            .clone()
            .unwrap_or_else(|| self.provider.default_api_base().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_accepts_the_closed_unit_range() {
        assert_eq!(Temperature::new(0.0).unwrap().value(), 0.0);
        assert_eq!(Temperature::new(1.0).unwrap().value(), 1.0);
        assert_eq!(Temperature::default().value(), 0.7);
    }

    #[test]
    fn temperature_rejects_values_outside_range() {
        for bad in [-0.01, 1.01, 2.0, f32::NAN, f32::INFINITY] {
            assert!(
                matches!(Temperature::new(bad), Err(PlannerError::TemperatureOutOfRange(_))),
                "{bad} should be rejected"
            );
        }
        assert!("1.5".parse::<Temperature>().is_err());
        let err = "warm".parse::<Temperature>().unwrap_err();
        assert!(matches!(err, PlannerError::InvalidTemperature(ref raw) if raw == "warm"));
        assert!(!err.to_string().contains("NaN"), "got: {err}");
        assert_eq!("0.25".parse::<Temperature>().unwrap().value(), 0.25);
    }

    #[test]
    fn api_key_is_redacted() {
        let key = ApiKey::new("  secret-value ");
        assert_eq!(key.expose(), "secret-value");
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
        assert_eq!(key.to_string(), "***");
        assert!(ApiKey::new("   ").is_empty());

        let cfg = GenerationConfig::new(key, Temperature::default());
        assert!(!format!("{cfg:?}").contains("secret-value"));
    }

    #[test]
    fn load_without_path_gives_defaults() {
        let cfg = Config::load(None).unwrap();
        assert_eq!(cfg.provider, ProviderKind::Gemini);
        assert_eq!(cfg.model(), "gemini-pro");
        assert_eq!(cfg.api_base(), "https://generativelanguage.googleapis.com");
        assert_eq!(cfg.temperature, Temperature::default());
        assert_eq!(cfg.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn load_reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.toml");
        fs::write(
            &path,
            "provider = \"openai\"\ntemperature = 0.2\ntimeout_secs = 30\noutput_dir = \"plans\"\n",
        )
        .unwrap();

        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.provider, ProviderKind::OpenAI);
        assert_eq!(cfg.model(), "gpt-4.1-mini");
        assert_eq!(cfg.temperature.value(), 0.2);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.output_dir, PathBuf::from("plans"));
    }

    #[test]
    fn load_rejects_out_of_range_temperature_and_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let hot = dir.path().join("hot.toml");
        fs::write(&hot, "temperature = 1.5\n").unwrap();
        let err = Config::load(Some(&hot)).unwrap_err().to_string();
        assert!(err.contains("temperature"), "got: {err}");

        let keyed = dir.path().join("keyed.toml");
        fs::write(&keyed, "api_key = \"abc\"\n").unwrap();
        let err = Config::load(Some(&keyed)).unwrap_err().to_string();
        assert!(err.contains("api_key"), "got: {err}");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/planner.toml"))).unwrap_err();
        assert!(matches!(err, PlannerError::Config { .. }));
    }
}
