use anyhow::Context;
use clap::Parser;
use welcome_docgen::config::Command;
use welcome_docgen::core::sources::SpreadsheetFile;
use welcome_docgen::core::{ConfigProvider, RecordSource};
use welcome_docgen::shell::format_report;
use welcome_docgen::utils::error::{DocGenError, ErrorSeverity};
use welcome_docgen::utils::{logger, validation::Validate};
use welcome_docgen::{AppConfig, CliConfig, DocumentEngine, LocalStorage, Shell};

fn load_config(cli: &CliConfig) -> Result<AppConfig, DocGenError> {
    cli.validate()?;
    let config = cli.load_app_config()?;
    config.validate()?;
    Ok(config)
}

fn exit_with(e: DocGenError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    let config = load_config(&cli);

    // 初始化日誌
    match &config {
        Ok(config) if config.logging.json => logger::init_json_logger(cli.verbose),
        _ => logger::init_cli_logger(cli.verbose),
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    tracing::info!("Starting welcome-docgen");
    tracing::debug!("CLI: {:?}", cli);
    tracing::debug!("Config: {:?}", config);
    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_dir());
    let engine = DocumentEngine::new_with_monitoring(storage, config.logo().clone(), cli.monitor);

    match cli.command.clone().unwrap_or(Command::Shell) {
        Command::Shell => {
            let mut shell = Shell::new(engine, config.export_formats(), config.output_dir());
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            if let Err(e) = shell.run(stdin, tokio::io::stdout()).await {
                exit_with(e);
            }
        }
        Command::Generate { files, json, .. } => {
            let files: Vec<SpreadsheetFile> = files.iter().map(SpreadsheetFile::new).collect();
            let sources: Vec<&dyn RecordSource> =
                files.iter().map(|f| f as &dyn RecordSource).collect();

            let report = engine.run(&sources, config.export_formats()).await;

            if json {
                let json = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize generation report")?;
                println!("{}", json);
            } else {
                println!("{}", format_report(&report, config.output_dir()));
            }

            if !report.has_files() {
                std::process::exit(1);
            }
            tracing::info!("✅ Generated {} document(s)", report.files.len());
        }
    }

    Ok(())
}
