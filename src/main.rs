use anyhow::Context;
use clap::Parser;
use classfy::core::report;
use classfy::core::ConfigProvider;
use classfy::utils::error::{ClassifyError, ErrorSeverity};
use classfy::utils::{logger, validation::Validate};
use classfy::{ClassifyEngine, ClassifyPipeline, CliConfig, LocalStorage, TomlConfig};
use std::path::Path;

fn load_toml(path: &Path) -> anyhow::Result<TomlConfig> {
    let toml = TomlConfig::from_file(path)
        .with_context(|| format!("Failed to load config file '{}'", path.display()))?;
    toml.validate()
        .with_context(|| format!("Invalid config file '{}'", path.display()))?;
    Ok(toml)
}

fn report_error(e: &ClassifyError) {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
}

#[tokio::main]
async fn main() {
    let mut config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting classfy");

    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path.display());
        match load_toml(&path) {
            Ok(toml) => config.merge_toml(&toml),
            Err(e) => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(ErrorSeverity::Critical.exit_code());
            }
        }
    }

    if let Err(e) = config.validate() {
        report_error(&e);
        std::process::exit(e.severity().exit_code());
    }

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }
    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no files will be moved");
    }

    let directories = config.directories.clone();
    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = ClassifyPipeline::new(LocalStorage::new(), config);
    let engine = ClassifyEngine::new_with_monitoring(pipeline, monitor_enabled);

    let mut summary = engine.run_all(&directories).await;

    for run in &summary.reports {
        println!(
            "{} {}: {} moved, {} skipped, {} conflicts, {} failures",
            if run.dry_run { "🔍" } else { "✅" },
            run.directory.display(),
            run.moved(),
            run.skipped(),
            run.conflicts(),
            run.failures()
        );
    }

    let pipeline = engine.pipeline();
    if let Some(path) = pipeline.config().report_path() {
        let format = pipeline.config().report_format();
        let written =
            report::write_report(pipeline.storage(), path, format, &summary.reports).await;
        match written {
            Ok(()) => println!("📁 Report saved to: {}", path.display()),
            Err(e) => summary.errors.push((path.to_path_buf(), e)),
        }
    }

    for (_, e) in &summary.errors {
        report_error(e);
    }

    let exit_code = summary.exit_code();
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}
