use chat_completion::Provider;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::paths;
use crate::prompt::{PromptVariant, DEFAULT_MAX_TOPIC_CHARS, DEFAULT_TOPIC};
use crate::store::DEFAULT_API_URL;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// CacheConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    crate::cache::DEFAULT_TTL.as_secs()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

// ---------------------------------------------------------------------------
// CompletionConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default)]
    pub provider: Provider,
    /// Overrides the provider preset's endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Falls back to the provider's default model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Falls back to the prompt variant's temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            base_url: None,
            model: None,
            temperature: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CompletionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Endpoint precedence: environment override, then config, then preset.
    pub fn effective_base_url<'a>(&'a self, env_override: Option<&'a str>) -> &'a str {
        env_override
            .or(self.base_url.as_deref())
            .unwrap_or_else(|| self.provider.base_url())
    }
}

// ---------------------------------------------------------------------------
// PromptConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default)]
    pub variant: PromptVariant,
    #[serde(default = "default_max_topic_chars")]
    pub max_topic_chars: usize,
    #[serde(default = "default_topic")]
    pub default_topic: String,
}

fn default_max_topic_chars() -> usize {
    DEFAULT_MAX_TOPIC_CHARS
}

fn default_topic() -> String {
    DEFAULT_TOPIC.to_string()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            variant: PromptVariant::default(),
            max_topic_chars: default_max_topic_chars(),
            default_topic: default_topic(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            store: StoreConfig::default(),
            cache: CacheConfig::default(),
            completion: CompletionConfig::default(),
            prompt: PromptConfig::default(),
        }
    }
}

impl Config {
    /// Load `.remix/config.yaml` under `root`; a missing file yields defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }


    /// Write the default config unless one already exists. Returns whether
    /// a file was created.
    pub fn init(root: &Path) -> Result<bool> {
        let data = serde_yaml::to_string(&Self::default())?;
        crate::io::write_if_missing(&paths::config_path(root), data.as_bytes())
    }

    pub fn temperature(&self) -> f32 {
        self.completion
            .temperature
            .unwrap_or_else(|| self.prompt.variant.default_temperature())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if let Some(t) = self.completion.temperature {
            if !(0.0..=2.0).contains(&t) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("completion.temperature {t} is outside 0.0..=2.0"),
                });
            }
        }

        if matches!(self.completion.model.as_deref(), Some(m) if m.trim().is_empty()) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "completion.model is empty".to_string(),
            });
        }

        if self.cache.ttl_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "cache.ttl_secs is 0: every request refetches the action table"
                    .to_string(),
            });
        }

        if self.prompt.max_topic_chars == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "prompt.max_topic_chars is 0: every topic will be rejected".to_string(),
            });
        }

        if self.store.timeout_secs == 0 || self.completion.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "a timeout of 0 seconds fails every request".to_string(),
            });
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.cache.ttl_secs, 600);
        assert_eq!(cfg.store.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.completion.provider, Provider::DeepSeek);
        assert_eq!(cfg.completion.timeout_secs, 60);
        assert_eq!(cfg.prompt.variant, PromptVariant::Classic);
        assert_eq!(cfg.prompt.max_topic_chars, 500);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "completion:\n  provider: openai\nprompt:\n  variant: visual\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.completion.provider, Provider::OpenAi);
        assert_eq!(cfg.completion.timeout_secs, 60);
        assert_eq!(cfg.completion.effective_model(), "gpt-4o-mini");
        assert_eq!(cfg.prompt.variant, PromptVariant::Visual);
        assert_eq!(cfg.temperature(), 0.8);
        assert_eq!(cfg.cache.ttl_secs, 600);
    }

    #[test]
    fn explicit_settings_override_presets() {
        let yaml = r#"
completion:
  provider: siliconflow
  base_url: https://proxy.example.com/v1
  model: Qwen/Qwen2.5-72B-Instruct
  temperature: 1.1
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.completion.effective_model(), "Qwen/Qwen2.5-72B-Instruct");
        assert_eq!(cfg.temperature(), 1.1);
        assert_eq!(
            cfg.completion.effective_base_url(None),
            "https://proxy.example.com/v1"
        );
        assert_eq!(
            cfg.completion.effective_base_url(Some("https://env.example.com")),
            "https://env.example.com"
        );
    }

    #[test]
    fn base_url_falls_back_to_provider_preset() {
        let cfg = Config::default();
        assert_eq!(cfg.completion.effective_base_url(None), "https://api.deepseek.com");
        assert_eq!(cfg.completion.effective_model(), "deepseek-chat");
        assert_eq!(cfg.temperature(), 0.9);
    }

    fn write(root: &Path, cfg: &Config) {
        let data = serde_yaml::to_string(cfg).unwrap();
        crate::io::atomic_write(&paths::config_path(root), data.as_bytes()).unwrap();
    }

    #[test]
    fn written_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.cache.ttl_secs = 30;
        cfg.prompt.default_topic = "周一早高峰".into();
        write(dir.path(), &cfg);

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.cache.ttl_secs, 30);
        assert_eq!(loaded.prompt.default_topic, "周一早高峰");
    }

    #[test]
    fn init_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        assert!(Config::init(dir.path()).unwrap());

        let mut cfg = Config::load(dir.path()).unwrap();
        cfg.cache.ttl_secs = 5;
        write(dir.path(), &cfg);

        assert!(!Config::init(dir.path()).unwrap());
        assert_eq!(Config::load(dir.path()).unwrap().cache.ttl_secs, 5);
    }

    #[test]
    fn unknown_provider_is_a_parse_error() {
        let result: std::result::Result<Config, _> =
            serde_yaml::from_str("completion:\n  provider: anthropic\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_flags_bad_values() {
        let mut cfg = Config::default();
        cfg.completion.temperature = Some(3.5);
        cfg.completion.model = Some("  ".into());
        cfg.cache.ttl_secs = 0;
        cfg.prompt.max_topic_chars = 0;

        let warnings = cfg.validate();
        let errors = warnings
            .iter()
            .filter(|w| w.level == WarnLevel::Error)
            .count();
        assert_eq!(errors, 3);
        assert!(warnings.iter().any(|w| w.message.contains("ttl_secs")));
    }
}
