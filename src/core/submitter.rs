use crate::config::DatasetConfig;
use crate::core::Record;
use crate::domain::model::{SubmissionResult, SubmissionStatus};
use crate::domain::ports::ApiTransport;

const LABEL_PREVIEW_CHARS: usize = 50;

/// 依原始順序逐筆送出記錄，記錄間等待固定延遲。
/// 單筆失敗不中斷整批，所有結果都會被記錄下來。
pub struct Submitter<'a, T: ApiTransport> {
    transport: &'a T,
}

impl<'a, T: ApiTransport> Submitter<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    pub async fn submit_all(
        &self,
        dataset: &DatasetConfig,
        records: &[Record],
    ) -> Vec<SubmissionResult> {
        let endpoint = dataset.endpoint_spec();
        let delay = dataset.delay();
        let progress_every = dataset.progress_every();

        let mut results = Vec::with_capacity(records.len());
        let mut succeeded = 0usize;

        for (index, record) in records.iter().enumerate() {
            let label = record
                .display_label(dataset.label_fields())
                .unwrap_or_else(|| format!("record #{}", index + 1));

            let status = match self.transport.submit(&endpoint, record).await {
                Ok(reply) if reply.accepted() => {
                    tracing::info!("✅ {} uploaded: {}", dataset.name, preview(&label));
                    SubmissionStatus::Accepted
                }
                Ok(reply) => {
                    let message = reply.message_or_unknown();
                    tracing::info!(
                        "❌ Failed to upload {}: {}",
                        preview(&label),
                        message
                    );
                    if let Some(details) = &reply.details {
                        tracing::debug!("Validation details: {}", details);
                    }
                    SubmissionStatus::Rejected {
                        message,
                        details: reply.details,
                    }
                }
                Err(e) => {
                    tracing::warn!("❌ Error uploading {}: {}", preview(&label), e);
                    SubmissionStatus::TransportFailed {
                        message: e.to_string(),
                    }
                }
            };

            if status.is_success() {
                succeeded += 1;
            }
            results.push(SubmissionResult { label, status });

            if (index + 1) % progress_every == 0 {
                tracing::info!(
                    "📊 Progress: {}/{} records processed ({} successful, {} failed)",
                    index + 1,
                    records.len(),
                    succeeded,
                    index + 1 - succeeded
                );
            }

            // 固定延遲避免觸發速率限制，不論該筆成功與否
            if index + 1 < records.len() && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        results
    }
}

/// 顯示用的標籤截斷，過長的題目文字只取前段
fn preview(label: &str) -> String {
    if label.chars().count() <= LABEL_PREVIEW_CHARS {
        label.to_string()
    } else {
        let truncated: String = label.chars().take(LABEL_PREVIEW_CHARS).collect();
        format!("{}...", truncated)
    }
}
