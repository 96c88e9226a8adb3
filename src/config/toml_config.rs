use crate::adapters::http::RpcClient;
use crate::core::engine::LocalEngine;
use crate::core::irr::IrrSettings;
use crate::core::zoning::ZoningTable;
use crate::domain::model::DefaultCosts;
use crate::utils::error::{ProFormaError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    pub calculation: Option<IrrSettings>,
    /// Extra or replacement rows for the zoning table.
    pub zoning: Option<Vec<DefaultCosts>>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    /// "compact" or "json".
    pub format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProFormaError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ProFormaError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SUPABASE_ANON_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ProFormaError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Command-line values win over the file.
    pub fn apply_overrides(&mut self, base_url: Option<String>, api_key: Option<String>) {
        if base_url.is_some() {
            self.service.base_url = base_url;
        }
        if api_key.is_some() {
            self.service.api_key = api_key;
        }
    }

    pub fn settings(&self) -> IrrSettings {
        self.calculation.clone().unwrap_or_default()
    }

    pub fn zoning_table(&self) -> ZoningTable {
        ZoningTable::default().with_overrides(self.zoning.clone().unwrap_or_default())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.service
                .timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }

    pub fn local_engine(&self) -> LocalEngine {
        LocalEngine::new(self.settings(), self.zoning_table())
    }

    /// Requires both `service.base_url` and `service.api_key`.
    pub fn rpc_client(&self) -> Result<RpcClient> {
        let base_url =
            validation::validate_required_field("service.base_url", &self.service.base_url)?;
        let api_key =
            validation::validate_required_field("service.api_key", &self.service.api_key)?;
        ensure_substituted("service.base_url", base_url)?;
        ensure_substituted("service.api_key", api_key)?;
        validation::validate_url("service.base_url", base_url)?;
        validation::validate_non_empty_string("service.api_key", api_key)?;

        RpcClient::new(base_url.clone(), api_key.clone(), self.timeout())
    }

    pub fn validate_config(&self) -> Result<()> {
        // Unset placeholders only matter for remote calls; rpc_client reports them.
        if let Some(base_url) = self.service.base_url.as_deref().filter(|u| !u.contains("${")) {
            validation::validate_url("service.base_url", base_url)?;
        }
        if let Some(timeout) = self.service.timeout_seconds {
            validation::validate_range("service.timeout_seconds", timeout, 1, 600)?;
        }

        if let Some(settings) = &self.calculation {
            validation::validate_range(
                "calculation.default_interest_rate",
                settings.default_interest_rate,
                0.0,
                100.0,
            )?;
            validation::validate_range(
                "calculation.loan_draw_factor",
                settings.loan_draw_factor,
                0.0,
                1.0,
            )?;
            validation::validate_range("calculation.irr_floor", settings.irr_floor, -100.0, 0.0)?;
            if !settings.irr_cap.is_finite() || settings.irr_cap <= 0.0 {
                return Err(ProFormaError::InvalidConfigValueError {
                    field: "calculation.irr_cap".to_string(),
                    value: settings.irr_cap.to_string(),
                    reason: "Cap must be a positive finite number".to_string(),
                });
            }
        }

        for row in self.zoning.iter().flatten() {
            validation::validate_non_empty_string("zoning.zoning_code", &row.zoning_code)?;
            if !row.hard_cost_per_sf.is_finite() || row.hard_cost_per_sf <= 0.0 {
                return Err(ProFormaError::InvalidConfigValueError {
                    field: "zoning.hard_cost_per_sf".to_string(),
                    value: row.hard_cost_per_sf.to_string(),
                    reason: format!("Must be positive for {}", row.zoning_code),
                });
            }
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            let valid_formats = ["compact", "json"];
            if !valid_formats.contains(&format.to_ascii_lowercase().as_str()) {
                return Err(ProFormaError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: format!("Unsupported format. Valid formats: {}", valid_formats.join(", ")),
                });
            }
        }

        Ok(())
    }
}

fn ensure_substituted(field: &str, value: &str) -> Result<()> {
    if value.contains("${") {
        return Err(ProFormaError::ConfigValidationError {
            field: field.to_string(),
            message: format!("environment variable in '{}' is not set", value),
        });
    }
    Ok(())
}

impl Validate for TomlConfig {
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
    fn test_parse_full_config() {
        let toml_content = r#"
[service]
base_url = "https://abc.supabase.co"
api_key = "anon"
timeout_seconds = 10

[calculation]
default_interest_rate = 6.5
loan_draw_factor = 0.6

[[zoning]]
zoning_code = "TH"
use_type = "Townhouse"
hard_cost_per_sf = 290
interest_rate = 7.0
sale_price_per_unit = 900000

[logging]
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.settings().default_interest_rate, 6.5);
        assert_eq!(config.settings().irr_cap, 500.0);
        assert_eq!(config.zoning_table().lookup("th").use_type, "Townhouse");
        assert!(config.json_logs());
        assert!(config.rpc_client().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.settings(), IrrSettings::default());
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECONDS));
        assert!(!config.verbose());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PROFORMA_TEST_ANON_KEY", "secret-key");

        let config = TomlConfig::from_toml_str(
            r#"
[service]
base_url = "https://abc.supabase.co"
api_key = "${PROFORMA_TEST_ANON_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.service.api_key.as_deref(), Some("secret-key"));

        std::env::remove_var("PROFORMA_TEST_ANON_KEY");
    }

    #[test]
    fn test_unset_env_var_blocks_remote_client() {
        let config = TomlConfig::from_toml_str(
            r#"
[service]
base_url = "https://abc.supabase.co"
api_key = "${PROFORMA_TEST_NEVER_SET}"
"#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        assert!(matches!(
            config.rpc_client(),
            Err(ProFormaError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_remote_client_requires_base_url() {
        let config = TomlConfig::default();
        match config.rpc_client() {
            Err(ProFormaError::MissingConfigError { field }) => {
                assert_eq!(field, "service.base_url")
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_overrides_win() {
        let mut config = TomlConfig::from_toml_str(
            r#"
[service]
base_url = "https://file.supabase.co"
api_key = "file-key"
"#,
        )
        .unwrap();
        config.apply_overrides(Some("http://localhost:54321".to_string()), None);

        assert_eq!(config.service.base_url.as_deref(), Some("http://localhost:54321"));
        assert_eq!(config.service.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_config_validation() {
        let bad_url = TomlConfig::from_toml_str(
            r#"
[service]
base_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(bad_url.validate().is_err());

        let bad_draw = TomlConfig::from_toml_str(
            r#"
[calculation]
loan_draw_factor = 1.5
"#,
        )
        .unwrap();
        assert!(bad_draw.validate().is_err());

        let bad_format = TomlConfig::from_toml_str(
            r#"
[logging]
format = "xml"
"#,
        )
        .unwrap();
        assert!(bad_format.validate().is_err());
    }

    #[test]
    fn test_non_finite_calculation_settings_rejected() {
        for (key, value) in [
            ("irr_cap", "nan"),
            ("irr_cap", "inf"),
            ("irr_floor", "nan"),
            ("loan_draw_factor", "nan"),
            ("default_interest_rate", "inf"),
        ] {
            let config =
                TomlConfig::from_toml_str(&format!("[calculation]\n{} = {}\n", key, value))
                    .unwrap();
            match config.validate() {
                Err(ProFormaError::InvalidConfigValueError { field, .. }) => {
                    assert_eq!(field, format!("calculation.{}", key))
                }
                other => panic!("{} = {} accepted: {:?}", key, value, other),
            }
        }
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[service]\nbase_url = \"https://abc.supabase.co\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.service.base_url.as_deref(), Some("https://abc.supabase.co"));
    }
}
