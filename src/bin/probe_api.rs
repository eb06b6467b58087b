use clap::Parser;
use quiz_migrate::core::preflight::PreflightCheck;
use quiz_migrate::utils::{logger, validation::Validate};
use quiz_migrate::{HttpApi, MigrationConfig};

/// 獨立的連線探測工具：只做存活探測與 access key 驗證，不送任何記錄
#[derive(Parser)]
#[command(name = "probe-api")]
#[command(about = "Check that the quiz backend API is reachable and the access key is accepted")]
struct Args {
    /// Path to the migration TOML configuration file
    #[arg(short, long, default_value = "migration.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    println!("🧪 Probing quiz backend API...");

    let config = match MigrationConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    println!("🌐 API: {}", config.migration.base_url);

    let transport = HttpApi::from_config(&config)?;

    // 有設定 access key 就一併驗證
    let check_auth = config.migration.access_key.is_some();
    let preflight = PreflightCheck::new(&transport);

    match preflight.run(check_auth).await {
        Ok(()) => {
            println!("✅ API is reachable");
            if check_auth {
                println!("✅ Access key accepted");
            }
        }
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}
