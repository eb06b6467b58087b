use crate::core::normalizer::{NormalizationRule, RuleSet};
use crate::domain::model::EndpointSpec;
use crate::utils::error::{MigrateError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

const DEFAULT_HEALTH_PATH: &str = "/health";
const DEFAULT_VERIFY_PATH: &str = "/api/auth/verify";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_DELAY_MS: u64 = 1000;
const DEFAULT_PROGRESS_EVERY: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    pub migration: MigrationInfo,
    pub datasets: Vec<DatasetConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationInfo {
    pub name: String,
    pub description: Option<String>,
    pub base_url: String,
    pub access_key: Option<String>,
    pub health_path: Option<String>,
    pub verify_path: Option<String>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub name: String,
    pub description: Option<String>,
    pub enabled: Option<bool>,
    pub source_path: String,
    pub endpoint: String,
    pub method: Option<String>,
    pub requires_auth: Option<bool>,
    pub delay_ms: Option<u64>,
    pub label_fields: Option<Vec<String>>,
    pub progress_every: Option<usize>,
    pub rules: Option<RulesConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    pub scalarize_fields: Option<Vec<String>>,
    pub collapse_fields: Option<Vec<String>>,
    pub remove_fields: Option<Vec<String>>,
}

impl MigrationConfig {
    /// 從 TOML 檔案載入遷移配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MigrateError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析遷移配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MigrateError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MIGRATION_ACCESS_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 取得啟用的資料集（按定義順序）
    pub fn enabled_datasets(&self) -> Vec<&DatasetConfig> {
        self.datasets
            .iter()
            .filter(|dataset| dataset.is_enabled())
            .collect()
    }

    pub fn get_dataset(&self, name: &str) -> Option<&DatasetConfig> {
        self.datasets.iter().find(|d| d.name == name)
    }

    /// 是否有任何啟用的資料集需要授權
    pub fn needs_auth(&self) -> bool {
        self.enabled_datasets()
            .iter()
            .any(|dataset| dataset.requires_auth())
    }

    pub fn health_path(&self) -> &str {
        self.migration
            .health_path
            .as_deref()
            .unwrap_or(DEFAULT_HEALTH_PATH)
    }

    pub fn verify_path(&self) -> &str {
        self.migration
            .verify_path
            .as_deref()
            .unwrap_or(DEFAULT_VERIFY_PATH)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.migration
                .request_timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    fn validate_dataset(&self, dataset: &DatasetConfig) -> Result<()> {
        crate::utils::validation::validate_non_empty_string(
            "datasets.name",
            &dataset.name,
        )?;

        crate::utils::validation::validate_path(
            &format!("datasets.{}.source_path", dataset.name),
            &dataset.source_path,
        )?;

        crate::utils::validation::validate_file_extensions(
            &format!("datasets.{}.source_path", dataset.name),
            std::slice::from_ref(&dataset.source_path),
            &["json"],
        )?;

        crate::utils::validation::validate_non_empty_string(
            &format!("datasets.{}.endpoint", dataset.name),
            &dataset.endpoint,
        )?;

        if let Some(delay) = dataset.delay_ms {
            crate::utils::validation::validate_range(
                &format!("datasets.{}.delay_ms", dataset.name),
                delay,
                0,
                60_000,
            )?;
        }

        Ok(())
    }
}

impl Validate for MigrationConfig {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_url("migration.base_url", &self.migration.base_url)?;

        if self.datasets.is_empty() {
            return Err(MigrateError::ConfigValidationError {
                field: "datasets".to_string(),
                message: "At least one dataset must be defined".to_string(),
            });
        }

        // 資料集名稱必須唯一
        let mut seen: HashSet<&str> = HashSet::new();
        for dataset in &self.datasets {
            if !seen.insert(dataset.name.as_str()) {
                return Err(MigrateError::ConfigValidationError {
                    field: "datasets.name".to_string(),
                    message: format!("Duplicate dataset name: '{}'", dataset.name),
                });
            }
            self.validate_dataset(dataset)?;
        }

        // 需要授權的資料集必須搭配 access key
        if self.needs_auth() {
            crate::utils::validation::validate_required_field(
                "migration.access_key",
                &self.migration.access_key,
            )?;
        }

        Ok(())
    }
}

impl DatasetConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn requires_auth(&self) -> bool {
        self.requires_auth.unwrap_or(false)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.unwrap_or(DEFAULT_DELAY_MS))
    }

    pub fn progress_every(&self) -> usize {
        self.progress_every.unwrap_or(DEFAULT_PROGRESS_EVERY)
    }

    pub fn label_fields(&self) -> &[String] {
        self.label_fields.as_deref().unwrap_or(&[])
    }

    pub fn endpoint_spec(&self) -> EndpointSpec {
        EndpointSpec {
            path: self.endpoint.clone(),
            method: self.method.clone().unwrap_or_else(|| "POST".to_string()),
            requires_auth: self.requires_auth(),
        }
    }

    /// 把配置中的欄位列表組成規則集合，刪除規則由 RuleSet 排到最後
    pub fn rule_set(&self) -> RuleSet {
        let Some(rules) = &self.rules else {
            return RuleSet::default();
        };

        let mut list = Vec::new();
        for field in rules.scalarize_fields.iter().flatten() {
            list.push(NormalizationRule::ScalarizeArray {
                field: field.clone(),
            });
        }
        for field in rules.collapse_fields.iter().flatten() {
            list.push(NormalizationRule::CollapseWhitespace {
                field: field.clone(),
            });
        }
        for field in rules.remove_fields.iter().flatten() {
            list.push(NormalizationRule::RemoveField {
                field: field.clone(),
            });
        }

        RuleSet::new(list)
    }
}
