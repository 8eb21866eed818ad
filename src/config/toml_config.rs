use crate::adapters::google::DEFAULT_MAPS_BASE_URL;
use crate::adapters::openai::DEFAULT_OPENAI_ENDPOINT;
use crate::core::pools::Pools;
use crate::core::route::TravelMode;
use crate::core::seed::{default_candidates, default_itinerary};
use crate::core::ConfigProvider;
use crate::domain::model::Item;
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.dify.ai/v1";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub maps: MapsConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    /// 未設定時使用內建的行程
    pub itinerary: Option<Vec<Item>>,
    pub candidates: Option<Vec<Item>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsConfig {
    #[serde(default = "default_maps_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    #[serde(default)]
    pub travel_mode: TravelMode,
    #[serde(default = "default_maps_timeout")]
    pub timeout_seconds: u64,
}

/// Wire protocol of the assistant service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatBackend {
    /// chat-messages 串流，對話狀態由服務端保存
    #[default]
    Dify,
    /// OpenAI 相容的 chat/completions（例如 Groq）
    OpenAi,
}

impl ChatBackend {
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ChatBackend::Dify => DEFAULT_CHAT_ENDPOINT,
            ChatBackend::OpenAi => DEFAULT_OPENAI_ENDPOINT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default)]
    pub backend: ChatBackend,
    /// 未設定時依 backend 使用預設位址
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    /// OpenAI 相容後端才會用到
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    #[serde(default = "default_chat_user")]
    pub user: String,
    #[serde(default = "default_chat_timeout")]
    pub timeout_seconds: u64,
}

fn default_maps_base_url() -> String {
    DEFAULT_MAPS_BASE_URL.to_string()
}

fn default_maps_timeout() -> u64 {
    10
}

fn default_chat_user() -> String {
    "user".to_string()
}

fn default_chat_timeout() -> u64 {
    30
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            base_url: default_maps_base_url(),
            api_key: None,
            travel_mode: TravelMode::default(),
            timeout_seconds: default_maps_timeout(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            backend: ChatBackend::default(),
            endpoint: None,
            api_key: None,
            model: None,
            system_prompt: None,
            user: default_chat_user(),
            timeout_seconds: default_chat_timeout(),
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

/// 未替換的 `${VAR}` 或空字串視為未設定
fn usable_secret(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !env_var_pattern().is_match(v))
}

impl PlannerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlannerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PlannerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GOOGLE_MAPS_API_KEY})，找不到時保留原字串
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Builds the session's starting pools: configured seed lists where given,
    /// the built-in Tokyo plan otherwise.
    pub fn initial_pools(&self) -> Result<Pools> {
        let itinerary = self.itinerary.clone().unwrap_or_else(default_itinerary);
        let candidates = self.candidates.clone().unwrap_or_else(default_candidates);
        Pools::new(itinerary, candidates)
    }

    pub fn maps_timeout(&self) -> Duration {
        Duration::from_secs(self.maps.timeout_seconds)
    }

    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.assistant.timeout_seconds)
    }

    pub fn travel_mode(&self) -> TravelMode {
        self.maps.travel_mode
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("maps.base_url", &self.maps.base_url)?;
        validation::validate_url("assistant.endpoint", self.chat_endpoint())?;
        validation::validate_positive_number("maps.timeout_seconds", self.maps.timeout_seconds, 1)?;
        validation::validate_positive_number(
            "assistant.timeout_seconds",
            self.assistant.timeout_seconds,
            1,
        )?;
        validation::validate_non_empty_string("assistant.user", &self.assistant.user)?;

        for (field, items) in [("itinerary", &self.itinerary), ("candidates", &self.candidates)] {
            for (index, item) in items.iter().flatten().enumerate() {
                validation::validate_item(&format!("{}[{}]", field, index), item)?;
            }
        }

        // 兩個清單之間的 id 也不能重複
        self.initial_pools().map(|_| ())
    }
}

impl ConfigProvider for PlannerConfig {
    fn maps_base_url(&self) -> &str {
        &self.maps.base_url
    }

    fn maps_api_key(&self) -> Option<&str> {
        usable_secret(&self.maps.api_key)
    }

    fn chat_endpoint(&self) -> &str {
        self.assistant
            .endpoint
            .as_deref()
            .unwrap_or_else(|| self.assistant.backend.default_endpoint())
    }

    fn chat_api_key(&self) -> Option<&str> {
        usable_secret(&self.assistant.api_key)
    }
}

impl Validate for PlannerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = PlannerConfig::from_toml_str("").unwrap();
        assert_eq!(config.maps.base_url, DEFAULT_MAPS_BASE_URL);
        assert_eq!(config.assistant.timeout_seconds, 30);
        assert_eq!(config.travel_mode(), TravelMode::Driving);
        assert!(config.maps_api_key().is_none());
        assert!(config.validate().is_ok());

        let pools = config.initial_pools().unwrap();
        assert_eq!(pools.itinerary().len(), 2);
    }

    #[test]
    fn test_parse_seed_pools() {
        let toml_content = r#"
[maps]
travel_mode = "walking"

[[itinerary]]
id = "kyoto1"
title = "Fushimi Inari"
date = "May 3, 2025"
icon = "train"
location = { lat = 34.9671, lng = 135.7727 }

[[candidates]]
id = "kyoto2"
title = "Kinkaku-ji"
"#;

        let config = PlannerConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.travel_mode(), TravelMode::Walking);

        let pools = config.initial_pools().unwrap();
        assert_eq!(pools.itinerary()[0].title, "Fushimi Inari");
        assert!(pools.candidates()[0].date.is_unscheduled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PLANNER_TEST_MAPS_KEY", "maps-key-123");

        let toml_content = r#"
[maps]
api_key = "${PLANNER_TEST_MAPS_KEY}"

[assistant]
api_key = "${PLANNER_TEST_UNSET_KEY}"
"#;

        let config = PlannerConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.maps_api_key(), Some("maps-key-123"));
        // 未設定的環境變數不算有效金鑰
        assert!(config.chat_api_key().is_none());

        std::env::remove_var("PLANNER_TEST_MAPS_KEY");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = PlannerConfig::from_toml_str("[maps]\nbase_url = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let duplicate = r#"
[[itinerary]]
id = "same"
title = "One"

[[candidates]]
id = "same"
title = "Two"
"#;
        let config = PlannerConfig::from_toml_str(duplicate).unwrap();
        assert!(matches!(
            config.validate(),
            Err(PlannerError::DuplicateIdentity { .. })
        ));

        let bad_location = r#"
[[candidates]]
id = "x"
title = "Nowhere"
location = { lat = 120.0, lng = 0.0 }
"#;
        let config = PlannerConfig::from_toml_str(bad_location).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[assistant]\nendpoint = \"https://chat.example.com/v1\"\nuser = \"traveler\"\n")
            .unwrap();

        let config = PlannerConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.chat_endpoint(), "https://chat.example.com/v1");
        assert_eq!(config.assistant.user, "traveler");
    }

    #[test]
    fn test_openai_backend_defaults() {
        let toml_content = r#"
[assistant]
backend = "openai"
api_key = "groq-key"
model = "llama-3.1-8b-instant"
"#;

        let config = PlannerConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.assistant.backend, ChatBackend::OpenAi);
        assert_eq!(config.chat_endpoint(), DEFAULT_OPENAI_ENDPOINT);
        assert_eq!(config.assistant.model.as_deref(), Some("llama-3.1-8b-instant"));

        let dify = PlannerConfig::default();
        assert_eq!(dify.chat_endpoint(), DEFAULT_CHAT_ENDPOINT);
    }
}
