use clap::Parser;
use company_domain_finder::adapters::search::build_provider;
use company_domain_finder::adapters::spreadsheet::load_company_names;
use company_domain_finder::app::{run_bulk, run_single, Console};
use company_domain_finder::config::Command;
use company_domain_finder::utils::logger;
use company_domain_finder::{CliConfig, DomainFinder, FinderSettings, LocalStorage, Result};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting company-domain-finder");

    let settings = match FinderSettings::from_cli(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    if cli.verbose {
        tracing::debug!("Resolved settings: {:?}", settings);
    }

    if let Err(e) = run(&cli, &settings).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = e.exit_code();

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(cli: &CliConfig, settings: &FinderSettings) -> Result<()> {
    let provider = build_provider(settings)?;
    let finder = DomainFinder::new(provider)
        .with_max_results(settings.max_results)
        .with_timeout(Duration::from_secs(settings.timeout_seconds));
    let storage = LocalStorage::new(settings.output_path.clone());
    let mut console = Console::stdio();

    match &cli.command {
        Command::Search { select, .. } => {
            let company_name = cli.command.company_name().unwrap_or_default();
            if let Some(record) = run_single(
                &finder,
                &storage,
                &mut console,
                &company_name,
                *select,
                &settings.single_filename,
            )
            .await?
            {
                tracing::info!(
                    "✅ {} -> {}",
                    record.company_name(),
                    record.selected_domain()
                );
            }
        }
        Command::Bulk { input, .. } => {
            // 缺少 Company Name 欄位時直接失敗，不進入流程
            let names = load_company_names(input)?;

            let outcome = run_bulk(
                &finder,
                &storage,
                &mut console,
                names,
                &settings.bulk_filename,
            )
            .await?;

            tracing::info!(
                "✅ Bulk run finished: {} resolved, {} skipped, completed = {}",
                outcome.records.len(),
                outcome.skipped.len(),
                outcome.completed
            );
        }
    }

    Ok(())
}
