use crate::config::MigrationConfig;
use crate::core::Record;
use crate::domain::model::{EndpointSpec, ServerReply};
use crate::domain::ports::ApiTransport;
use crate::utils::error::{MigrateError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// `{success, message?, details?}` 的回應主體
#[derive(Debug, Deserialize)]
struct ReplyBody {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    status: Option<String>,
    message: Option<String>,
}

/// reqwest 實作的遠端 API 存取
pub struct HttpApi {
    client: Client,
    base_url: String,
    access_key: Option<String>,
    health_path: String,
    verify_path: String,
}

impl HttpApi {
    pub fn new(
        base_url: &str,
        access_key: Option<String>,
        health_path: &str,
        verify_path: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key,
            health_path: health_path.to_string(),
            verify_path: verify_path.to_string(),
        })
    }

    pub fn from_config(config: &MigrationConfig) -> Result<Self> {
        Self::new(
            &config.migration.base_url,
            config.migration.access_key.clone(),
            config.health_path(),
            config.verify_path(),
            config.request_timeout(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_header(&self) -> Result<String> {
        let key = self
            .access_key
            .as_deref()
            .ok_or_else(|| MigrateError::MissingConfigError {
                field: "migration.access_key".to_string(),
            })?;
        Ok(format!("AccessKey {}", key))
    }
}

#[async_trait::async_trait]
impl ApiTransport for HttpApi {
    async fn probe_health(&self) -> Result<Option<String>> {
        let url = self.url(&self.health_path);
        tracing::debug!("Probing API health at {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(MigrateError::ApiUnreachable {
                reason: format!("health check returned status {}", status),
            });
        }

        let body: HealthBody = response.json().await?;
        Ok(body.message.or(body.status))
    }

    async fn verify_access(&self) -> Result<ServerReply> {
        let key = self
            .access_key
            .as_deref()
            .ok_or_else(|| MigrateError::MissingConfigError {
                field: "migration.access_key".to_string(),
            })?;

        let url = self.url(&self.verify_path);
        tracing::debug!("Verifying access key at {}", url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "AccessKey": key }))
            .send()
            .await?;

        let http_ok = response.status().is_success();
        let body: ReplyBody = response.json().await?;

        Ok(ServerReply {
            http_ok,
            success: body.success,
            message: body.message,
            details: body.details,
        })
    }

    async fn submit(&self, endpoint: &EndpointSpec, record: &Record) -> Result<ServerReply> {
        let url = self.url(&endpoint.path);

        let mut request = match endpoint.method.to_uppercase().as_str() {
            "PUT" => self.client.put(&url),
            "PATCH" => self.client.patch(&url),
            _ => self.client.post(&url),
        };

        if endpoint.requires_auth {
            request = request.header("Authorization", self.auth_header()?);
        }

        let response = request.json(&record.body()).send().await?;

        let http_ok = response.status().is_success();
        // 非 JSON 回應視為傳輸失敗，由呼叫端歸類
        let body: ReplyBody = response.json().await?;

        Ok(ServerReply {
            http_ok,
            success: body.success,
            message: body.message,
            details: body.details,
        })
    }
}
