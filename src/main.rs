use anyhow::Context;
use clap::Parser;
use folio_leads::core::LeadStore;
use folio_leads::utils::error::ErrorCategory;
use folio_leads::utils::{logger, validation::Validate};
use folio_leads::{
    build_notifier, AppConfig, Cli, Command, JsonFileStore, LeadError, LeadIntake, LeadServer,
    RateLimiter,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, cli.log_json);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code(&e));
        }
    };
    tracing::debug!("Resolved config: {:?}", config);

    match cli.command() {
        Command::Serve => serve(config).await,
        Command::Leads { count } => print_leads(&config, count).await,
    }
}

fn load_config(cli: &Cli) -> folio_leads::Result<AppConfig> {
    let config = AppConfig::resolve(cli)?;
    config.validate()?;
    Ok(config)
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting folio-leads");

    let store = JsonFileStore::open(&config.leads_file)
        .await
        .with_context(|| format!("opening leads file {}", config.leads_file.display()))?;
    let notifier = build_notifier(&config.smtp);
    let limiter = RateLimiter::new(config.rate_limit_max, config.rate_window());
    tracing::info!(
        "🛡️ Rate limit: {} submissions per {}s per client",
        config.rate_limit_max,
        config.rate_window_secs
    );

    let intake = LeadIntake::new(store, notifier, limiter);
    let server = LeadServer::bind(&config.bind, intake)
        .await
        .with_context(|| format!("binding {}", config.bind))?;

    server
        .serve_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    tracing::info!("✅ Server stopped");
    Ok(())
}

async fn print_leads(config: &AppConfig, count: bool) -> anyhow::Result<()> {
    let store = JsonFileStore::new(&config.leads_file);
    let leads = store
        .all()
        .await
        .with_context(|| format!("reading leads file {}", config.leads_file.display()))?;

    if count {
        println!("{}", leads.len());
    } else {
        println!("{}", serde_json::to_string_pretty(&leads)?);
    }
    Ok(())
}

// 依錯誤類別決定退出碼
fn exit_code(error: &LeadError) -> i32 {
    match error.category() {
        ErrorCategory::Config => 2,
        ErrorCategory::Storage => 3,
        _ => 1,
    }
}
