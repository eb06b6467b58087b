use crate::core::{Record, Storage};
use crate::utils::error::{MigrateError, Result};

/// 來源載入器：把本地 JSON 陣列讀成記錄列表
pub struct SourceLoader<S: Storage> {
    storage: S,
}

impl<S: Storage> SourceLoader<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// 載入失敗是整次遷移的前置條件錯誤，不做重試
    pub async fn load(&self, path: &str) -> Result<Vec<Record>> {
        tracing::debug!("Reading source file: {}", path);

        let bytes = self.storage.read_file(path).await.map_err(|e| match e {
            MigrateError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                MigrateError::SourceNotFound {
                    path: path.to_string(),
                }
            }
            other => other,
        })?;

        let json: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| MigrateError::SourceParseError {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let items = match json {
            serde_json::Value::Array(items) => items,
            other => {
                return Err(MigrateError::SourceParseError {
                    path: path.to_string(),
                    reason: format!("top-level value is not an array (found {})", value_kind(&other)),
                })
            }
        };

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            match Record::from_value(item) {
                Some(record) => records.push(record),
                // 非物件元素跳過，交由伺服器端驗證的欄位不在此檢查
                None => tracing::warn!("Skipping non-object entry in {}", path),
            }
        }

        tracing::debug!("Loaded {} records from {}", records.len(), path);
        Ok(records)
    }
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
