//! Stevedore CLI - artifact staging and zip-deploy tool
//!
//! Usage: stevedore <COMMAND>
//!
//! Commands:
//!   deploy   Stage declared resources and push them to the deploy endpoint
//!   stage    Stage resources into temp directories for inspection
//!   package  Stage and pack deployable artifacts to a local directory
//!   check    Validate deployment configuration

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stevedore::config::{Config, Credentials, CONFIG_FILE};
use stevedore::deploy::{
    deploy_resources, DeployOptions, DirectoryTarget, KuduClient,
};
use stevedore::models::DeploySummary;
use stevedore::stage::stage_resources;
use stevedore::StevedoreError;

/// Stevedore - artifact staging and zip-deploy tool
#[derive(Parser, Debug)]
#[command(name = "stevedore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format for CI
    #[arg(long, default_value = "false")]
    json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Stage declared resources and push them to the deploy endpoint
    Deploy {
        /// Path to stevedore.toml
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: PathBuf,

        /// Deploy endpoint URL (overrides config)
        #[arg(long)]
        url: Option<String>,

        /// Basic-auth deployment username (overrides env)
        #[arg(long)]
        username: Option<String>,

        /// Basic-auth deployment password (overrides env)
        #[arg(long)]
        password: Option<String>,

        /// Attempts per deploy call (overrides config)
        #[arg(long)]
        max_retries: Option<u32>,

        /// Stage and pack but make no deploy calls
        #[arg(long)]
        dry_run: bool,
    },

    /// Stage resources into temp directories for inspection
    Stage {
        /// Path to stevedore.toml
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: PathBuf,
    },

    /// Stage and pack deployable artifacts to a local directory
    Package {
        /// Path to stevedore.toml
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: PathBuf,

        /// Directory the artifacts are written to
        #[arg(short, long, default_value = "target/deploy")]
        output: PathBuf,
    },

    /// Validate deployment configuration
    Check {
        /// Path to stevedore.toml
        #[arg(short, long, default_value = CONFIG_FILE)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Deploy {
            config,
            url,
            username,
            password,
            max_retries,
            dry_run,
        } => cmd_deploy(
            &config,
            url,
            username,
            password,
            max_retries,
            dry_run,
            cli.json,
        ),
        Commands::Stage { config } => cmd_stage(&config, cli.json),
        Commands::Package { config, output } => cmd_package(&config, &output, cli.json),
        Commands::Check { config } => cmd_check(&config, cli.json),
    }
}

/// Map -v counts onto an EnvFilter; RUST_LOG still wins when set
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::from_default_env(),
        1 => EnvFilter::new("stevedore=info"),
        2 => EnvFilter::new("stevedore=debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file if present, falling back to the lookup hierarchy
/// (project file, user file, defaults) with env overrides applied.
fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Ok(Config::load(path)?.with_env_overrides())
    } else {
        Ok(Config::load_or_default(
            path.parent().filter(|p| !p.as_os_str().is_empty()),
        ))
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_deploy(
    config_path: &Path,
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    max_retries: Option<u32>,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;

    let url = url
        .or_else(|| config.app.url.clone())
        .ok_or(StevedoreError::MissingUrl)?;

    let credentials = match (username, password) {
        (Some(user), Some(pass)) => Some(Credentials::new(user, pass)),
        _ => Credentials::from_env(),
    };
    // Dry runs never touch the network, so credentials may be absent
    let credentials = match credentials {
        Some(creds) => creds,
        None if dry_run => Credentials::default(),
        None => return Err(StevedoreError::MissingCredentials.into()),
    };

    let options = DeployOptions {
        max_attempts: max_retries.unwrap_or(config.deploy.max_retries),
        dry_run,
    };

    if !json {
        println!("🚢 Stevedore Deploy");
        println!("Endpoint: {}", url);
        println!("Resources: {}", config.deploy.resources.len());
        if dry_run {
            println!("Mode: Dry run");
        }
    }

    let target = KuduClient::new(url, credentials)?;
    let summary = deploy_resources(&target, &config.deploy.resources, &options)?;

    print_summary(&summary, dry_run, json)?;
    Ok(())
}

fn print_summary(summary: &DeploySummary, dry_run: bool, json: bool) -> Result<()> {
    if json {
        let output = serde_json::json!({
            "event": "deploy",
            "status": "success",
            "dry_run": dry_run,
            "resources": summary.bundle_count(),
            "wars": summary.war_count(),
            "reports": summary.reports,
        });
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("\n📊 Deploy Results:");
    for (index, report) in summary.reports.iter().enumerate() {
        let target = report
            .target_path
            .as_deref()
            .map(|t| format!(" -> {}", t))
            .unwrap_or_default();
        println!("  Resource {}{}:", index + 1, target);
        for war in &report.wars {
            println!("    ✓ war deployed: {}", war.file);
        }
        println!(
            "    ✓ bundle deployed: {} entries ({})",
            report.bundle_entries, report.bundle_digest
        );
    }
    println!();
    Ok(())
}

fn cmd_stage(config_path: &Path, json: bool) -> Result<()> {
    let config = load_config(config_path)?;

    if !json {
        println!("🚢 Stevedore Stage");
        println!("Resources: {}", config.deploy.resources.len());
    }

    let staged = stage_resources(&config.deploy.resources)?;

    if json {
        let entries: Vec<_> = staged
            .iter()
            .map(|s| {
                serde_json::json!({
                    "path": s.path().display().to_string(),
                    "files": s.file_count,
                    "target_path": s.target_path,
                })
            })
            .collect();
        let output = serde_json::json!({
            "event": "stage",
            "status": "success",
            "staged": entries,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!();
        for (mapping, resource) in config.deploy.resources.iter().zip(&staged) {
            println!(
                "  ✓ {} -> {} ({} file(s))",
                mapping.directory.display(),
                resource.path().display(),
                resource.file_count
            );
        }
        println!();
    }

    // Keep the staging directories around for inspection
    for resource in staged {
        resource.keep();
    }

    Ok(())
}

fn cmd_package(config_path: &Path, output: &Path, json: bool) -> Result<()> {
    let config = load_config(config_path)?;

    if !json {
        println!("🚢 Stevedore Package");
        println!("Output: {}", output.display());
    }

    // Packaging is a deploy against the local filesystem: the artifacts that
    // land in the output directory are exactly what an upload would send.
    let target = DirectoryTarget::new(output);
    let options = DeployOptions {
        max_attempts: 1,
        dry_run: false,
    };
    let summary = deploy_resources(&target, &config.deploy.resources, &options)?;

    if json {
        let output = serde_json::json!({
            "event": "package",
            "status": "success",
            "resources": summary.bundle_count(),
            "wars": summary.war_count(),
            "reports": summary.reports,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("\n📊 Package Results:");
        for report in &summary.reports {
            for war in &report.wars {
                println!("  ✓ war: {}", war.file);
            }
            println!(
                "  ✓ bundle: {} entries ({})",
                report.bundle_entries, report.bundle_digest
            );
        }
        println!();
    }

    Ok(())
}

fn cmd_check(config_path: &Path, json: bool) -> Result<()> {
    let config = load_config(config_path)?;

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if config.deploy.resources.is_empty() {
        errors.push(StevedoreError::NoResources.to_string());
    }
    for mapping in &config.deploy.resources {
        if !mapping.directory.is_dir() {
            errors.push(format!(
                "resource directory not found: {}",
                mapping.directory.display()
            ));
        }
    }
    if config.app.url.is_none() {
        errors.push(StevedoreError::MissingUrl.to_string());
    }
    if Credentials::from_env().is_none() {
        warnings.push(
            "deploy credentials not set in environment (needed for deploy, not for package)"
                .to_string(),
        );
    }

    if json {
        let output = serde_json::json!({
            "event": "check",
            "errors": errors,
            "warnings": warnings,
            "success": errors.is_empty(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("🩺 Stevedore Check");
        println!("Config: {}", config_path.display());
        println!();
        for error in &errors {
            println!("  ✗ {}", error);
        }
        for warning in &warnings {
            println!("  ⚠ {}", warning);
        }
        if errors.is_empty() && warnings.is_empty() {
            println!("  ✓ configuration looks good");
        }
        println!();
        println!(
            "Result: {} error(s), {} warning(s)",
            errors.len(),
            warnings.len()
        );
    }

    if !errors.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
