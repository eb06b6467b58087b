use clap::Parser;
use quiz_migrate::config::{DatasetConfig, MigrationConfig};
use quiz_migrate::utils::{logger, validation::Validate};
use quiz_migrate::{CliConfig, HttpApi, LocalStorage, MigrationEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    println!("{}", "=".repeat(60));
    println!("       QUIZ DATA MIGRATION");
    println!("{}", "=".repeat(60));

    tracing::info!("📁 Loading configuration from: {}", cli.config);

    // 載入遷移配置
    let config = match MigrationConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &cli);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No requests will be sent");
        perform_dry_run(&config);
        return Ok(());
    }

    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 建立存儲、傳輸與遷移引擎
    let storage = LocalStorage::new(cli.data_dir.clone());
    let transport = match HttpApi::from_config(&config) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let engine = MigrationEngine::new(storage, transport, config)
        .with_monitoring(cli.monitor)
        .with_dataset_filter(cli.only.clone());

    match engine.run().await {
        Ok(report) => {
            // 部分記錄失敗仍算完成，離開碼為 0
            let overall = report.overall_summary();
            tracing::info!(
                "✅ Migration run completed: {}/{} records succeeded",
                overall.succeeded,
                overall.total()
            );
            println!();
            println!("✅ Migration run completed!");
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Migration failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                quiz_migrate::utils::error::ErrorSeverity::Low => 0,
                quiz_migrate::utils::error::ErrorSeverity::Medium => 2,
                quiz_migrate::utils::error::ErrorSeverity::High => 1,
                quiz_migrate::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &MigrationConfig, cli: &CliConfig) {
    println!("📋 Configuration Summary:");
    println!("  Migration: {}", config.migration.name);
    if let Some(description) = &config.migration.description {
        println!("  Description: {}", description);
    }
    println!("  API: {}", config.migration.base_url);
    println!("  Data directory: {}", cli.data_dir);
    println!("  Datasets: {}", config.enabled_datasets().len());

    if let Some(only) = &cli.only {
        println!("  Only: {}", only);
    }

    if cli.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &MigrationConfig) {
    println!("🔍 Dry Run Analysis:");

    for dataset in config.enabled_datasets() {
        println!();
        print_dataset_analysis(dataset);
    }

    println!();
    println!("✅ Dry run analysis complete. Remove --dry-run to start the migration.");
}

fn print_dataset_analysis(dataset: &DatasetConfig) {
    println!("📡 Dataset: {}", dataset.name);
    if let Some(description) = &dataset.description {
        println!("  Description: {}", description);
    }
    println!("  Source: {}", dataset.source_path);
    println!(
        "  Endpoint: {} {}",
        dataset.endpoint_spec().method,
        dataset.endpoint
    );
    println!("  Requires auth: {}", dataset.requires_auth());
    println!("  Delay between records: {:?}", dataset.delay());

    let rules = dataset.rule_set();
    if rules.is_empty() {
        println!("  Normalization: none");
    } else {
        println!("  Normalization: {} rules", rules.len());
        for rule in rules.rules() {
            println!("    - {:?}", rule);
        }
    }
}
