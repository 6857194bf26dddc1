//! sitestack CLI entrypoint.
//!
//! This is the main entrypoint for the sitestack command-line tool.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use static_site_stack::cli::{AssemblyCommands, AuthCommands, Cli, Commands, OutputFormatter};
use static_site_stack::config::{ConfigParser, SiteSettings, find_config_file};
use static_site_stack::edge::{
    BasicAuthInterceptor, ViewerRequestEvent, encode_credentials, render_function_code,
};
use static_site_stack::error::{Result, SiteStackError};
use static_site_stack::publish::{
    AssemblyStore, LocalAssemblyStore, PUBLISH_DIR, S3AssemblyStore, publish_assembly,
};
use static_site_stack::synth::CloudAssembly;
use static_site_stack::waf::{MANAGED_RULES, RuleCatalog, make_rules};

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Init { path, force } => cmd_init(&path, force),
        Commands::Validate { warnings } => cmd_validate(cli.config.as_ref(), warnings, &formatter),
        Commands::Synth { out } => cmd_synth(cli.config.as_ref(), &out, &formatter),
        Commands::Rules => cmd_rules(&formatter),
        Commands::Auth { command } => cmd_auth(cli.config.as_ref(), command, &formatter),
        Commands::Assembly {
            command,
            bucket,
            prefix,
            region,
        } => {
            let target = StoreTarget {
                bucket,
                prefix,
                region,
            };
            cmd_assembly(cli.config.as_ref(), command, &target, &formatter).await
        }
    }
}

/// Initialize a new site project.
fn cmd_init(path: &Path, force: bool) -> Result<()> {
    info!("Initializing new site project in: {}", path.display());

    let config_path = path.join("settings.json");
    let env_path = path.join(".env.example");
    let gitignore_path = path.join(".gitignore");

    // Check if files exist
    if !force && config_path.exists() {
        eprintln!("Settings file already exists: {}", config_path.display());
        eprintln!("Use --force to overwrite.");
        return Ok(());
    }

    // Create directory if needed
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }

    // Write settings template
    let config_template = include_str!("../templates/settings.json");
    std::fs::write(&config_path, config_template)?;
    eprintln!("Created: {}", config_path.display());

    // Write .env.example
    let env_template = include_str!("../templates/.env.example");
    std::fs::write(&env_path, env_template)?;
    eprintln!("Created: {}", env_path.display());

    // Write/update .gitignore
    let ignored = [".env", "cdk.out/", ".sitestack/"];
    if gitignore_path.exists() {
        let existing = std::fs::read_to_string(&gitignore_path)?;
        let missing: Vec<&str> = ignored
            .iter()
            .copied()
            .filter(|entry| !existing.lines().any(|line| line.trim() == *entry))
            .collect();
        if !missing.is_empty() {
            let mut file = std::fs::OpenOptions::new()
                .append(true)
                .open(&gitignore_path)?;
            writeln!(file, "\n# sitestack")?;
            for entry in missing {
                writeln!(file, "{entry}")?;
            }
            eprintln!("Updated: {}", gitignore_path.display());
        }
    } else {
        std::fs::write(&gitignore_path, format!("{}\n", ignored.join("\n")))?;
        eprintln!("Created: {}", gitignore_path.display());
    }

    eprintln!("\nProject initialized successfully!");
    eprintln!("Next steps:");
    eprintln!("  1. Edit settings.json with your domain and GitHub repository");
    eprintln!("  2. Run 'sitestack validate' to check your settings");
    eprintln!("  3. Run 'sitestack synth' to write the CloudFormation templates to cdk.out/");
    eprintln!("  4. Run 'sitestack assembly publish' to record what you deploy");

    Ok(())
}

/// Validate settings.
fn cmd_validate(
    config_path: Option<&PathBuf>,
    show_warnings: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let (settings, config_file) = load_settings(config_path)?;
    info!("Validating settings: {}", config_file.display());

    let report = CloudAssembly::validate(&settings)?;
    eprintln!("{}", formatter.format_validation(&report, show_warnings));

    Ok(())
}

/// Synthesize and write the cloud assembly.
fn cmd_synth(config_path: Option<&PathBuf>, out: &Path, formatter: &OutputFormatter) -> Result<()> {
    let (settings, _) = load_settings(config_path)?;

    let assembly = CloudAssembly::synthesize(&settings)?;
    let written = assembly.write_to_dir(out)?;

    eprintln!("{}", formatter.format_assembly(&assembly, &written));
    Ok(())
}

/// Show the web ACL rules.
fn cmd_rules(formatter: &OutputFormatter) -> Result<()> {
    RuleCatalog::new(MANAGED_RULES).validate()?;
    let rules = make_rules(MANAGED_RULES);

    eprintln!("{}", formatter.format_rules(&rules));
    Ok(())
}

/// Basic auth commands.
fn cmd_auth(
    config_path: Option<&PathBuf>,
    command: AuthCommands,
    formatter: &OutputFormatter,
) -> Result<()> {
    let (settings, _) = load_settings(config_path)?;
    let report = CloudAssembly::validate(&settings)?;
    let credentials = report.configuration.basic_auth_credentials();

    match command {
        AuthCommands::Render => {
            let credentials = credentials.ok_or_else(|| {
                SiteStackError::internal("Basic auth is not enabled (set add_basic_auth)")
            })?;
            let code = render_function_code(&encode_credentials(credentials));
            std::io::stdout().write_all(code.as_bytes())?;
        }
        AuthCommands::Check { header, uri } => {
            let interceptor = credentials.map_or_else(
                BasicAuthInterceptor::default,
                BasicAuthInterceptor::from_credentials,
            );
            debug!("Checking against users: {:?}", interceptor.usernames());

            let outcome = interceptor.handle(ViewerRequestEvent::get(uri, header.as_deref()));
            eprintln!("{}", formatter.format_outcome(&outcome));
        }
    }

    Ok(())
}

/// Where published assemblies go.
struct StoreTarget {
    bucket: Option<String>,
    prefix: Option<String>,
    region: Option<String>,
}

/// Assembly publishing commands.
async fn cmd_assembly(
    config_path: Option<&PathBuf>,
    command: AssemblyCommands,
    target: &StoreTarget,
    formatter: &OutputFormatter,
) -> Result<()> {
    let (settings, config_file) = load_settings(config_path)?;
    let store = create_store(&config_file, target).await;
    debug!("Using {} publish backend", store.backend_type());

    match command {
        AssemblyCommands::Publish => {
            let assembly = CloudAssembly::synthesize(&settings)?;
            let record = publish_assembly(&store, settings.stack_name(), &assembly).await?;
            eprintln!("{}", formatter.format_record(&record));
        }
        AssemblyCommands::Show => {
            if let Some(record) = store.load_record().await? {
                eprintln!("{}", formatter.format_record(&record));
            } else {
                eprintln!("No publication found.");
            }
        }
        AssemblyCommands::Status => {
            let assembly = CloudAssembly::synthesize(&settings)?;
            if let Some(record) = store.load_record().await? {
                eprintln!("{}", formatter.format_changes(&record.compare(&assembly)));
            } else {
                eprintln!("Nothing published yet; every stack would be new.");
            }
        }
        AssemblyCommands::Delete { yes } => {
            if !store.exists().await? {
                eprintln!("No publication found.");
                return Ok(());
            }

            if !yes {
                eprint!("Delete the published assembly? [y/N]: ");
                std::io::stderr().flush()?;

                let mut input = String::new();
                std::io::stdin().read_line(&mut input)?;

                if !input.trim().eq_ignore_ascii_case("y") {
                    eprintln!("Delete cancelled.");
                    return Ok(());
                }
            }

            store.delete().await?;
            eprintln!("Published assembly deleted.");
        }
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Resolves the settings file path.
fn resolve_config_path(config_path: Option<&PathBuf>) -> Result<PathBuf> {
    config_path.map_or_else(|| find_config_file("."), |path| Ok(path.clone()))
}

/// Loads settings with `.env` and environment overrides applied.
fn load_settings(config_path: Option<&PathBuf>) -> Result<(SiteSettings, PathBuf)> {
    let config_file = resolve_config_path(config_path)?;
    debug!("Loading settings from: {}", config_file.display());

    let parser = ConfigParser::new().with_base_path(settings_dir(&config_file));
    parser.load_dotenv()?;

    let settings = parser.load_with_env(&config_file)?;
    Ok((settings, config_file))
}

/// Directory holding the settings file.
fn settings_dir(config_file: &Path) -> &Path {
    config_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Creates the publish backend: S3 when a bucket is given, else local.
async fn create_store(config_file: &Path, target: &StoreTarget) -> Box<dyn AssemblyStore> {
    match &target.bucket {
        Some(bucket) => Box::new(
            S3AssemblyStore::new(bucket, target.prefix.as_deref(), target.region.as_deref()).await,
        ),
        None => Box::new(LocalAssemblyStore::with_base_dir(
            settings_dir(config_file).join(PUBLISH_DIR),
        )),
    }
}
