//! # dnstree
//!
//! Exports the relational DNS model as per-server-set BIND configuration
//! trees and checks packaged trees with the BIND tools.

mod bootstrap;
mod di;

use clap::{Parser, Subcommand};
use dnstree_domain::{CliOverrides, Config, ExportSummary, IterationId, ValidationReport};
use std::process::ExitCode;
use tracing::{error, info};

use di::{Repositories, UseCases};

#[derive(Parser)]
#[command(name = "dnstree")]
#[command(version)]
#[command(about = "Export and validate BIND configuration trees")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<String>,

    /// Directory receiving the exported tree
    #[arg(long, global = true)]
    root_dir: Option<String>,

    /// Directory receiving the previous tree of each replaced server set
    #[arg(long, global = true)]
    backup_dir: Option<String>,

    /// Directory holding the dns_tree-<n>.tar archives
    #[arg(long, global = true)]
    archive_dir: Option<String>,

    /// Tree directory on the deployed name servers
    #[arg(long, global = true)]
    named_dir: Option<String>,

    /// Path to the model database
    #[arg(long, global = true)]
    database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the model into the tree and package it
    Export {
        /// Export only this server set
        #[arg(long)]
        server_set: Option<String>,
    },
    /// Check a packaged tree with named-checkconf and named-checkzone
    Check {
        /// Archive iteration to check (default: newest)
        #[arg(long)]
        iteration: Option<IterationId>,
    },
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            root_config_dir: self.root_dir.clone(),
            backup_dir: self.backup_dir.clone(),
            archive_dir: self.archive_dir.clone(),
            named_dir: self.named_dir.clone(),
            database_path: self.database.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match bootstrap::load_config(cli.config.as_deref(), cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("dnstree: {:#}", e);
            return ExitCode::from(2);
        }
    };

    bootstrap::init_logging(&config);
    info!(
        config_file = cli.config.as_deref().unwrap_or("default"),
        root = %config.exporter.root_config_dir,
        archives = %config.exporter.archive_dir,
        "Configuration loaded"
    );

    match run(cli.command, cli.json, &config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("dnstree: {:#}", e);
            ExitCode::from(1)
        }
    }
}

/// Runs one command; `Ok(false)` means it completed but found failures.
async fn run(command: Command, json: bool, config: &Config) -> anyhow::Result<bool> {
    match command {
        Command::Export { server_set } => {
            let pool = bootstrap::init_database(&config.database).await?;
            let repos = Repositories::new(config, Some(pool));
            let use_cases = UseCases::new(&repos, config);
            let export = use_cases
                .export
                .ok_or_else(|| anyhow::anyhow!("Model database not configured"))?;

            let summary = match server_set {
                Some(name) => export.export_one(&name).await?,
                None => export.export_all().await?,
            };
            print_summary(&summary, json)?;
            Ok(summary.is_success())
        }
        Command::Check { iteration } => {
            let repos = Repositories::new(config, None);
            let use_cases = UseCases::new(&repos, config);

            let report = use_cases.check.execute(iteration).await?;
            print_report(&report, json)?;
            Ok(report.is_success())
        }
    }
}

fn print_summary(summary: &ExportSummary, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    for outcome in &summary.outcomes {
        match &outcome.error {
            None => println!(
                "{}: {} ({} files)",
                outcome.server_set, outcome.state, outcome.files_written
            ),
            Some(error) => println!("{}: {}: {}", outcome.server_set, outcome.state, error),
        }
    }
    println!(
        "iteration {}: {}",
        summary.iteration,
        summary.archive.display()
    );
    Ok(())
}

/// Diagnostics go to stdout exactly as rendered; nothing is printed on success.
fn print_report(report: &ValidationReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}
