//! Subcommand implementations.

use crate::cli::{Cli, Commands};
use crate::driver::{Driver, RunReport};
use crate::render;
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use ct_core::config::loader::{load_config, validate_service};
use ct_core::init::{generate_codetest_kit_structure, InitOptions};
use ct_core::profiles::{all_profiles, language_for_path, profile_for};
use ct_protocol::config_models::ServiceConfig;
use ct_protocol::ipc::Op;
use ct_protocol::language_models::{Language, Mode};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};

pub async fn dispatch(cli: Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Run {
            file,
            language,
            json,
            show_tests,
        } => {
            let service = resolve_service(&cli).await?;
            run_single(&service, file, *language, *json, *show_tests).await
        }
        Commands::Project {
            archive,
            language,
            json,
        } => {
            let service = resolve_service(&cli).await?;
            run_project(&service, archive, *language, *json).await
        }
        Commands::Profiles { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(all_profiles())?);
            } else {
                println!("{}", render::profile_table(all_profiles()));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Sample { language } => {
            print!("{}", profile_for(*language).default_source);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init {
            force,
            with_samples,
        } => init(&cli.root, *force, *with_samples).await,
    }
}

/// Defaults, then config file and environment, then command-line flags.
async fn resolve_service(cli: &Cli) -> Result<ServiceConfig> {
    let config = load_config(&cli.root).await?;
    if let Some(source) = &config.source {
        debug!(path = %source.display(), "using config file");
    }

    let mut service = config.service;
    if let Some(url) = &cli.generation_url {
        service.generation_url = url.clone();
    }
    if let Some(url) = &cli.execution_url {
        service.execution_url = url.clone();
    }
    if let Some(ms) = cli.archive_timeout_ms {
        service.archive_timeout_ms = ms;
    }
    validate_service(&service)?;

    info!(
        generation = %service.generation_url,
        execution = %service.execution_url,
        "resolved services"
    );
    Ok(service)
}

async fn run_single(
    service: &ServiceConfig,
    file: &Path,
    language: Option<Language>,
    json: bool,
    show_tests: bool,
) -> Result<ExitCode> {
    let language = language
        .or_else(|| language_for_path(file))
        .ok_or_else(|| {
            anyhow!(
                "Cannot infer the language of {}. Pass --language.",
                file.display()
            )
        })?;
    let source = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut driver = Driver::spawn(service, !json);
    driver.send(Op::SetLanguage { language }).await?;
    driver.send(Op::UpdateSource { text: source }).await?;
    let report = driver.run().await?;
    driver.shutdown().await?;

    print_report(&report, json, show_tests)
}

async fn run_project(
    service: &ServiceConfig,
    archive: &Path,
    language: Language,
    json: bool,
) -> Result<ExitCode> {
    let mut driver = Driver::spawn(service, !json);
    driver
        .send(Op::SetMode {
            mode: Mode::ProjectArchive,
        })
        .await?;
    driver.send(Op::SetLanguage { language }).await?;
    driver
        .send(Op::SelectArchive {
            path: archive.to_path_buf(),
            media_type: None,
        })
        .await?;

    if let Some(error) = driver.await_archive().await? {
        driver.shutdown().await?;
        eprintln!("{} {}", "error:".red().bold(), error);
        return Ok(ExitCode::FAILURE);
    }

    let report = driver.run().await?;
    driver.shutdown().await?;
    print_report(&report, json, false)
}

fn print_report(report: &RunReport, json: bool, show_tests: bool) -> Result<ExitCode> {
    if json {
        println!("{}", render::report_json(report)?);
    } else {
        println!("{}", render::report_card(report, show_tests));
    }

    Ok(if report.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn init(root: &Path, force: bool, with_samples: bool) -> Result<ExitCode> {
    let options = InitOptions {
        target_dir: root.to_path_buf(),
        force,
        with_samples,
    };
    let written = generate_codetest_kit_structure(options).await?;

    for path in &written {
        println!("{} {}", "created".green(), path.display());
    }
    Ok(ExitCode::SUCCESS)
}
