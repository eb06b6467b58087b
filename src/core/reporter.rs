use crate::domain::model::{DatasetReport, MigrationReport, SubmissionResult};

/// 結果的純投影與人類可讀的總結輸出，除了列印沒有其他副作用
pub struct Reporter;

impl Reporter {
    /// 取出所有失敗的結果
    pub fn failures(results: &[SubmissionResult]) -> Vec<&SubmissionResult> {
        results.iter().filter(|r| !r.status.is_success()).collect()
    }

    pub fn print_dataset_summary(report: &DatasetReport) {
        let summary = &report.summary;

        println!();
        println!("📊 Migration Summary ({}):", report.dataset_name);
        println!("✅ Successfully uploaded: {} records", summary.succeeded);
        println!("❌ Failed to upload: {} records", summary.failed);
        println!("📈 Success rate: {:.1}%", summary.success_rate_percent());

        let failures = Self::failures(&report.results);
        if !failures.is_empty() {
            println!();
            println!("Failed records:");
            for failure in &failures {
                println!(
                    "  ❌ {}: {}",
                    failure.label,
                    failure.status.failure_cause().unwrap_or("Unknown error")
                );
            }
        }

        if summary.failed == 0 && summary.total() > 0 {
            println!();
            println!("🎉 All {} records migrated successfully!", report.dataset_name);
        } else if summary.succeeded > 0 {
            println!();
            println!("⚠️  Partial migration completed");
            println!("Some records may already exist or failed validation");
        } else if summary.total() > 0 {
            println!();
            println!("❌ Migration failed for every record");
        }
    }

    pub fn print_migration_report(report: &MigrationReport) {
        let overall = report.overall_summary();

        println!();
        println!("{}", "=".repeat(60));
        println!("🎯 MIGRATION REPORT");
        println!("{}", "=".repeat(60));
        println!(
            "Started at: {}",
            report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        );

        for dataset in &report.datasets {
            println!(
                "  {} — {}/{} succeeded in {:?}",
                dataset.dataset_name,
                dataset.summary.succeeded,
                dataset.summary.total(),
                dataset.duration
            );
        }

        println!();
        println!(
            "Overall: {} succeeded, {} failed ({:.1}%)",
            overall.succeeded,
            overall.failed,
            overall.success_rate_percent()
        );
        println!("{}", "=".repeat(60));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{RunSummary, SubmissionStatus};

    fn result(label: &str, status: SubmissionStatus) -> SubmissionResult {
        SubmissionResult {
            label: label.to_string(),
            status,
        }
    }

    #[test]
    fn test_failures_projection_keeps_causes() {
        let results = vec![
            result("Suraj", SubmissionStatus::Accepted),
            result(
                "Harshit",
                SubmissionStatus::Rejected {
                    message: "User already exists".to_string(),
                    details: None,
                },
            ),
            result(
                "Ayush",
                SubmissionStatus::TransportFailed {
                    message: "request timed out".to_string(),
                },
            ),
        ];

        let failures = Reporter::failures(&results);
        assert_eq!(failures.len(), 2);
        assert_eq!(
            failures[0].status.failure_cause(),
            Some("User already exists")
        );
        assert_eq!(failures[1].status.failure_cause(), Some("request timed out"));
    }

    #[test]
    fn test_failures_empty_for_clean_run() {
        let results = vec![result("Suraj", SubmissionStatus::Accepted)];
        assert!(Reporter::failures(&results).is_empty());
    }

    #[test]
    fn test_summary_matches_projection() {
        let results = vec![
            result("a", SubmissionStatus::Accepted),
            result(
                "b",
                SubmissionStatus::Rejected {
                    message: "duplicate".to_string(),
                    details: None,
                },
            ),
        ];

        let summary = RunSummary::from_results(&results);
        assert_eq!(Reporter::failures(&results).len(), summary.failed);
        assert_eq!(summary.succeeded + summary.failed, results.len());
    }
}
