use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// 一筆來源記錄（使用者或題目），欄位結構由遠端服務決定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(obj) => {
                let mut data = HashMap::new();
                for (key, value) in obj {
                    data.insert(key, value);
                }
                Some(Record { data })
            }
            _ => None,
        }
    }

    /// 組出 HTTP 請求主體
    pub fn body(&self) -> serde_json::Value {
        serde_json::Value::Object(self.data.clone().into_iter().collect())
    }

    /// 依序嘗試各標籤欄位，取第一個字串值作為顯示名稱
    pub fn display_label(&self, label_fields: &[String]) -> Option<String> {
        for field in label_fields {
            if let Some(serde_json::Value::String(s)) = self.data.get(field) {
                return Some(s.clone());
            }
        }
        None
    }
}

/// 提交目標的描述：路徑、方法與是否需要授權標頭
#[derive(Debug, Clone)]
pub struct EndpointSpec {
    pub path: String,
    pub method: String,
    pub requires_auth: bool,
}

/// 伺服器回應，`{success, message?, details?}` 加上 HTTP 狀態是否為成功範圍
#[derive(Debug, Clone)]
pub struct ServerReply {
    pub http_ok: bool,
    pub success: bool,
    pub message: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl ServerReply {
    pub fn accepted(&self) -> bool {
        self.http_ok && self.success
    }

    pub fn message_or_unknown(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionStatus {
    Accepted,
    Rejected {
        message: String,
        details: Option<serde_json::Value>,
    },
    TransportFailed {
        message: String,
    },
}

impl SubmissionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionStatus::Accepted)
    }

    pub fn failure_cause(&self) -> Option<&str> {
        match self {
            SubmissionStatus::Accepted => None,
            SubmissionStatus::Rejected { message, .. } => Some(message),
            SubmissionStatus::TransportFailed { message } => Some(message),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionResult {
    pub label: String,
    pub status: SubmissionStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_results(results: &[SubmissionResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.status.is_success()).count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// 成功比例，總數為 0 時回傳 0
    pub fn success_ratio(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total() as f64
        }
    }

    pub fn success_rate_percent(&self) -> f64 {
        self.success_ratio() * 100.0
    }

    pub fn merge(&mut self, other: &RunSummary) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
    }
}

#[derive(Debug, Clone)]
pub struct DatasetReport {
    pub dataset_name: String,
    pub results: Vec<SubmissionResult>,
    pub summary: RunSummary,
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct MigrationReport {
    pub started_at: DateTime<Utc>,
    pub datasets: Vec<DatasetReport>,
}

impl MigrationReport {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            datasets: Vec::new(),
        }
    }

    pub fn add_dataset(&mut self, report: DatasetReport) {
        self.datasets.push(report);
    }

    pub fn overall_summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for dataset in &self.datasets {
            summary.merge(&dataset.summary);
        }
        summary
    }
}
