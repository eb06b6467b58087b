use crate::domain::ports::ApiTransport;
use crate::utils::error::{MigrateError, Result};

/// 送出任何記錄前的前置檢查：存活探測，必要時驗證 access key。
/// 任一項失敗都會中止整次遷移，不會有記錄被送出。
pub struct PreflightCheck<'a, T: ApiTransport> {
    transport: &'a T,
}

impl<'a, T: ApiTransport> PreflightCheck<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    pub async fn run(&self, needs_auth: bool) -> Result<()> {
        tracing::info!("🔍 Testing API connection...");

        match self.transport.probe_health().await {
            Ok(Some(message)) => {
                tracing::info!("✅ API connection successful: {}", message);
            }
            Ok(None) => {
                tracing::info!("✅ API connection successful");
            }
            Err(e @ MigrateError::ApiUnreachable { .. }) => return Err(e),
            Err(e) => {
                return Err(MigrateError::ApiUnreachable {
                    reason: e.to_string(),
                })
            }
        }

        if needs_auth {
            tracing::info!("🔐 Testing authentication...");

            match self.transport.verify_access().await {
                Ok(reply) if reply.accepted() => {
                    tracing::info!("✅ Authentication successful");
                }
                Ok(reply) => {
                    return Err(MigrateError::AccessKeyRejected {
                        message: reply.message_or_unknown(),
                    })
                }
                Err(e @ MigrateError::MissingConfigError { .. }) => return Err(e),
                Err(e) => {
                    return Err(MigrateError::ApiUnreachable {
                        reason: e.to_string(),
                    })
                }
            }
        }

        Ok(())
    }
}
