//! Appliance Manager CLI - houses, appliances, documents and QR identifiers.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io;

use clap::{CommandFactory, Parser};
use tracing::debug;

use am::cli::{ApplianceCommand, Cli, Commands, DocumentCommand, HouseCommand};
use am::config::AppConfig;
use am::error::Result;
use am::logging;
use am::output::{self, Output, VersionInfo};
use am::shell::Shell;
use am::storage::Storage;

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    logging::init_logging(cli.use_json(), cli.verbose, cli.quiet);
    let out = output::for_cli(&cli);

    if let Err(e) = run(&cli, out.as_ref()) {
        out.error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, out: &dyn Output) -> Result<()> {
    match &cli.command {
        Commands::Version => {
            out.version(&VersionInfo {
                version: build_info::VERSION,
                git_sha: build_info::git_sha(),
                build_timestamp: build_info::build_timestamp(),
                rustc: build_info::rustc_semver(),
                target: build_info::target(),
            });
            Ok(())
        }
        Commands::Completions(args) => {
            clap_complete::generate(args.shell, &mut Cli::command(), "am", &mut io::stdout());
            Ok(())
        }
        Commands::Paths => {
            out.paths(&resolve_config(cli)?);
            Ok(())
        }
        Commands::House(cmd) => cmd_house(&open_storage(cli)?, cmd, out),
        Commands::Appliance(cmd) => cmd_appliance(&open_storage(cli)?, cmd, out),
        Commands::Document(cmd) => cmd_document(&open_storage(cli)?, cmd, out),
        Commands::Qr(args) => {
            let storage = open_storage(cli)?;
            let path = storage.generate_identifier(args.appliance_id)?;
            out.identifier(args.appliance_id, &path);
            Ok(())
        }
        Commands::Shell => {
            let storage = open_storage(cli)?;
            let stdin = io::stdin();
            let state = Shell::new(&storage, stdin.lock(), io::stdout()).run()?;
            debug!(?state, "Shell finished");
            Ok(())
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    AppConfig::resolve(cli.db.clone(), cli.qr_dir.clone(), cli.config.clone())
}

fn open_storage(cli: &Cli) -> Result<Storage> {
    let config = resolve_config(cli)?;
    Storage::open(&config.db_path, config.qr_dir)
}

// === Command Implementations ===

fn cmd_house(storage: &Storage, cmd: &HouseCommand, out: &dyn Output) -> Result<()> {
    match cmd {
        HouseCommand::Add(args) => {
            let id = storage.add_house(&args.name, args.address.as_deref())?;
            out.created("house", id, args.name.trim());
        }
        HouseCommand::List => out.houses(&storage.get_houses()?),
        HouseCommand::Show(args) => match storage.get_house(args.id)? {
            Some(house) => out.house(&house),
            None => out.not_found("house", args.id),
        },
    }
    Ok(())
}

fn cmd_appliance(storage: &Storage, cmd: &ApplianceCommand, out: &dyn Output) -> Result<()> {
    match cmd {
        ApplianceCommand::Add(args) => {
            let attrs = args.attrs()?;
            let id = storage.add_appliance(args.house_id, &args.name, &attrs)?;
            out.created("appliance", id, args.name.trim());
        }
        ApplianceCommand::List(args) => {
            let appliances = storage.get_appliances_by_house(args.house_id)?;
            out.appliances(args.house_id, &appliances);
        }
        ApplianceCommand::Show(args) => match storage.get_appliance(args.id)? {
            Some(appliance) => out.appliance(&appliance),
            None => out.not_found("appliance", args.id),
        },
    }
    Ok(())
}

fn cmd_document(storage: &Storage, cmd: &DocumentCommand, out: &dyn Output) -> Result<()> {
    match cmd {
        DocumentCommand::Add(args) => {
            let doc = args.document();
            let id = if args.with_qr {
                storage.add_document_with_identifier(args.appliance_id, &doc)?.0
            } else {
                storage.add_document(args.appliance_id, &doc)?
            };
            out.created("document", id, &format!("appliance {}", args.appliance_id));
        }
        DocumentCommand::Show(args) => match storage.get_document(args.appliance_id)? {
            Some(document) => out.document(&document),
            None => out.not_found("document for appliance", args.appliance_id),
        },
    }
    Ok(())
}
