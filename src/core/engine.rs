use crate::config::{DatasetConfig, MigrationConfig};
use crate::core::loader::SourceLoader;
use crate::core::preflight::PreflightCheck;
use crate::core::reporter::Reporter;
use crate::core::submitter::Submitter;
use crate::core::{Record, Storage};
use crate::domain::model::{DatasetReport, MigrationReport, RunSummary};
use crate::domain::ports::ApiTransport;
use crate::utils::error::{MigrateError, Result};
use crate::utils::monitor::SystemMonitor;
use std::time::Instant;

const PREVIEW_RECORDS: usize = 3;

/// 遷移引擎：前置檢查 → 逐資料集載入、正規化、送出 → 總結報告
pub struct MigrationEngine<S: Storage, T: ApiTransport> {
    loader: SourceLoader<S>,
    transport: T,
    config: MigrationConfig,
    monitor: SystemMonitor,
    dataset_filter: Option<String>,
}

impl<S: Storage, T: ApiTransport> MigrationEngine<S, T> {
    pub fn new(storage: S, transport: T, config: MigrationConfig) -> Self {
        Self {
            loader: SourceLoader::new(storage),
            transport,
            config,
            monitor: SystemMonitor::new(false),
            dataset_filter: None,
        }
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = SystemMonitor::new(enabled);
        self
    }

    /// 只遷移指定名稱的資料集
    pub fn with_dataset_filter(mut self, name: Option<String>) -> Self {
        self.dataset_filter = name;
        self
    }

    fn selected_datasets(&self) -> Result<Vec<&DatasetConfig>> {
        let enabled = self.config.enabled_datasets();

        let Some(filter) = &self.dataset_filter else {
            return Ok(enabled);
        };

        let selected: Vec<&DatasetConfig> = enabled
            .into_iter()
            .filter(|dataset| &dataset.name == filter)
            .collect();

        if selected.is_empty() {
            return Err(MigrateError::ConfigValidationError {
                field: "only".to_string(),
                message: format!("Dataset '{}' is not defined or not enabled", filter),
            });
        }

        Ok(selected)
    }

    pub async fn run(&self) -> Result<MigrationReport> {
        let started_at = chrono::Utc::now();
        self.monitor.log_stats("Migration started");

        let datasets = self.selected_datasets()?;
        let needs_auth = datasets.iter().any(|dataset| dataset.requires_auth());

        // 先把所有來源檔讀進來，任何一個壞掉就在送出任何記錄前中止
        let mut loaded: Vec<(&DatasetConfig, Vec<Record>)> = Vec::with_capacity(datasets.len());
        for dataset in datasets {
            let records = self.loader.load(&dataset.source_path).await?;
            loaded.push((dataset, records));
        }

        PreflightCheck::new(&self.transport).run(needs_auth).await?;

        let submitter = Submitter::new(&self.transport);
        let mut report = MigrationReport::new(started_at);

        for (dataset, records) in loaded {
            println!();
            println!("🚀 Starting {} migration...", dataset.name);
            println!(
                "📋 Found {} records in {}",
                records.len(),
                dataset.source_path
            );
            self.print_preview(dataset, &records);

            let rules = dataset.rule_set();
            let normalized: Vec<Record> = if rules.is_empty() {
                records
            } else {
                tracing::info!(
                    "🔧 Applying {} normalization rules to {}",
                    rules.len(),
                    dataset.name
                );
                records.iter().map(|record| rules.apply(record)).collect()
            };

            println!("🔄 Starting upload...");
            let start = Instant::now();
            let results = submitter.submit_all(dataset, &normalized).await;
            let duration = start.elapsed();

            let dataset_report = DatasetReport {
                dataset_name: dataset.name.clone(),
                summary: RunSummary::from_results(&results),
                results,
                duration,
            };

            Reporter::print_dataset_summary(&dataset_report);
            report.add_dataset(dataset_report);
        }

        Reporter::print_migration_report(&report);
        self.monitor.log_stats("Migration finished");

        Ok(report)
    }

    fn print_preview(&self, dataset: &DatasetConfig, records: &[Record]) {
        if records.is_empty() {
            return;
        }

        println!("Sample records:");
        for (index, record) in records.iter().take(PREVIEW_RECORDS).enumerate() {
            let label = record
                .display_label(dataset.label_fields())
                .unwrap_or_else(|| format!("record #{}", index + 1));
            println!("  {}. {}", index + 1, label);
        }
        if records.len() > PREVIEW_RECORDS {
            println!("  ... and {} more records", records.len() - PREVIEW_RECORDS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{EndpointSpec, ServerReply};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        fn put_file(&self, path: &str, data: &[u8]) {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), data.to_vec());
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().unwrap();
            files.get(path).cloned().ok_or_else(|| {
                MigrateError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }
    }

    struct MockTransport {
        health_ok: bool,
        auth_ok: bool,
        submitted: Mutex<Vec<serde_json::Value>>,
        submit_calls: AtomicUsize,
    }

    impl MockTransport {
        fn new(health_ok: bool, auth_ok: bool) -> Self {
            Self {
                health_ok,
                auth_ok,
                submitted: Mutex::new(Vec::new()),
                submit_calls: AtomicUsize::new(0),
            }
        }

        fn submit_count(&self) -> usize {
            self.submit_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ApiTransport for MockTransport {
        async fn probe_health(&self) -> Result<Option<String>> {
            if self.health_ok {
                Ok(Some("API is running".to_string()))
            } else {
                Err(MigrateError::ApiUnreachable {
                    reason: "connection refused".to_string(),
                })
            }
        }

        async fn verify_access(&self) -> Result<ServerReply> {
            Ok(ServerReply {
                http_ok: true,
                success: self.auth_ok,
                message: (!self.auth_ok).then(|| "Invalid access key".to_string()),
                details: None,
            })
        }

        async fn submit(&self, _endpoint: &EndpointSpec, record: &Record) -> Result<ServerReply> {
            self.submit_calls.fetch_add(1, Ordering::SeqCst);
            self.submitted.lock().unwrap().push(record.body());
            Ok(ServerReply {
                http_ok: true,
                success: true,
                message: None,
                details: None,
            })
        }
    }

    fn test_config() -> MigrationConfig {
        MigrationConfig::from_toml_str(
            r#"
[migration]
name = "test"
base_url = "https://api.example.com"
access_key = "1222262587654321"

[[datasets]]
name = "users"
source_path = "users.json"
endpoint = "/api/auth/register"
delay_ms = 0
label_fields = ["NameOfStu"]

[[datasets]]
name = "questions"
source_path = "data.json"
endpoint = "/api/quiz/create"
requires_auth = true
delay_ms = 0
label_fields = ["questionText"]

[datasets.rules]
scalarize_fields = ["images"]
collapse_fields = ["directions"]
remove_fields = ["questionImages"]
"#,
        )
        .unwrap()
    }

    fn seeded_storage() -> MockStorage {
        let storage = MockStorage::new();
        storage.put_file(
            "users.json",
            br#"[{"NameOfStu": "Suraj", "StuID": "1222", "AccessKey": "key1"}]"#,
        );
        storage.put_file(
            "data.json",
            br#"[{"questionText": "Q1", "directions": "a\n\nb", "options": [{"images": ["a.png", "b.png"]}], "questionImages": ["x.png"]}]"#,
        );
        storage
    }

    #[tokio::test]
    async fn test_full_run_submits_all_datasets() {
        let transport = MockTransport::new(true, true);
        let engine = MigrationEngine::new(seeded_storage(), transport, test_config());

        let report = engine.run().await.unwrap();

        assert_eq!(report.datasets.len(), 2);
        let overall = report.overall_summary();
        assert_eq!(overall.succeeded, 2);
        assert_eq!(overall.failed, 0);
        assert_eq!(engine.transport.submit_count(), 2);
    }

    #[tokio::test]
    async fn test_normalization_applied_before_submission() {
        let transport = MockTransport::new(true, true);
        let engine = MigrationEngine::new(seeded_storage(), transport, test_config());

        engine.run().await.unwrap();

        let submitted = engine.transport.submitted.lock().unwrap();
        let question = submitted
            .iter()
            .find(|body| body.get("questionText").is_some())
            .unwrap();

        assert_eq!(
            question.get("options").unwrap(),
            &serde_json::json!([{"images": "a.png"}])
        );
        assert_eq!(question.get("directions").unwrap(), "a b");
        assert!(question.get("questionImages").is_none());
    }

    #[tokio::test]
    async fn test_failed_preflight_aborts_before_any_submission() {
        let transport = MockTransport::new(false, true);
        let engine = MigrationEngine::new(seeded_storage(), transport, test_config());

        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, MigrateError::ApiUnreachable { .. }));
        assert_eq!(engine.transport.submit_count(), 0);
    }

    #[tokio::test]
    async fn test_rejected_key_aborts_before_any_submission() {
        let transport = MockTransport::new(true, false);
        let engine = MigrationEngine::new(seeded_storage(), transport, test_config());

        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, MigrateError::AccessKeyRejected { .. }));
        assert_eq!(engine.transport.submit_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_source_file_aborts_before_any_submission() {
        let storage = MockStorage::new();
        storage.put_file("users.json", br#"[{"NameOfStu": "Suraj"}]"#);
        // data.json 缺檔

        let transport = MockTransport::new(true, true);
        let engine = MigrationEngine::new(storage, transport, test_config());

        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, MigrateError::SourceNotFound { path } if path == "data.json"));
        assert_eq!(engine.transport.submit_count(), 0);
    }

    #[tokio::test]
    async fn test_dataset_filter_selects_single_dataset() {
        let transport = MockTransport::new(true, true);
        let engine = MigrationEngine::new(seeded_storage(), transport, test_config())
            .with_dataset_filter(Some("users".to_string()));

        let report = engine.run().await.unwrap();
        assert_eq!(report.datasets.len(), 1);
        assert_eq!(report.datasets[0].dataset_name, "users");
        assert_eq!(engine.transport.submit_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_dataset_filter_is_config_error() {
        let transport = MockTransport::new(true, true);
        let engine = MigrationEngine::new(seeded_storage(), transport, test_config())
            .with_dataset_filter(Some("nope".to_string()));

        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, MigrateError::ConfigValidationError { .. }));
        assert_eq!(engine.transport.submit_count(), 0);
    }
}
