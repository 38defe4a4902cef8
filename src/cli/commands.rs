//! Command dispatch: loads settings and dataset, runs one operation, prints results.

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::dataset::{load_records, sample_records};
use crate::application::FolderService;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{Folder, OrgId};

/// Moves applied by `demo`: (folder, new parent).
pub const DEMO_MOVES: [(&str, &str); 2] = [("gamma", "alpha"), ("bravo", "gamma")];

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see --help".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => cmd_config(cli, command),
        _ => {
            let settings = load_settings(cli)?;
            let service = build_service(&settings)?;
            dispatch(&service, command)
        }
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(data) = &cli.data {
        settings.data_file = Some(data.clone());
    }
    debug!("load_settings: {:?}", settings);
    Ok(settings)
}

fn build_service(settings: &Settings) -> CliResult<FolderService> {
    let records = match &settings.data_file {
        Some(path) => load_records(path)?,
        None => sample_records(),
    };
    Ok(FolderService::from_records(records, settings)?)
}

fn dispatch(service: &FolderService, command: &Commands) -> CliResult<()> {
    match command {
        Commands::List { org } => cmd_list(service, org),
        Commands::Children { org, name } => cmd_children(service, org, name),
        Commands::Find { name } => cmd_find(service, name),
        Commands::Move { name, new_parent } => cmd_move(service, name, new_parent),
        Commands::All => cmd_all(service),
        Commands::Tree { org } => cmd_tree(service, org.as_ref()),
        Commands::Demo => cmd_demo(service),
        Commands::Config { .. } | Commands::Completion { .. } => Err(CliError::InvalidArgs(
            "command does not operate on folders".to_string(),
        )),
    }
}

#[instrument(skip(service))]
fn cmd_list(service: &FolderService, org: &OrgId) -> CliResult<()> {
    let folders = service.get_folders_by_org_id(org)?;
    output::folders(&folders);
    Ok(())
}

#[instrument(skip(service))]
fn cmd_children(service: &FolderService, org: &OrgId, name: &str) -> CliResult<()> {
    let folders = service.get_all_child_folders(org, name)?;
    output::folders(&folders);
    Ok(())
}

#[instrument(skip(service))]
fn cmd_find(service: &FolderService, name: &str) -> CliResult<()> {
    let folder = service.get_named_folder(name)?;
    output::info(&output::format_folder(&folder));
    Ok(())
}

#[instrument(skip(service))]
fn cmd_move(service: &FolderService, name: &str, new_parent: &str) -> CliResult<()> {
    service.move_folder(name, new_parent)?;
    let moved: Folder = service.get_named_folder(name)?;
    output::success(&format!("moved {} to {}", name, moved.path));
    output::folders(&service.get_folders_by_org_id(&moved.org_id)?);
    Ok(())
}

#[instrument(skip(service))]
fn cmd_all(service: &FolderService) -> CliResult<()> {
    let folders = service.get_all_folders()?;
    output::folders(&folders);
    Ok(())
}

#[instrument(skip(service))]
fn cmd_tree(service: &FolderService, org: Option<&OrgId>) -> CliResult<()> {
    let org_ids = match org {
        Some(org) => vec![*org],
        None => service.org_ids()?,
    };
    for org_id in &org_ids {
        output::info(&service.render_tree(org_id)?);
    }
    Ok(())
}

#[instrument(skip(service))]
fn cmd_demo(service: &FolderService) -> CliResult<()> {
    for (name, new_parent) in DEMO_MOVES {
        match service.move_folder(name, new_parent) {
            Ok(()) => output::action("moved", &format!("{name} -> {new_parent}")),
            Err(e) => output::warning(&format!("move {name} -> {new_parent}: {e}")),
        }
    }
    cmd_all(service)
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            output::header("Config locations");
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "found" } else { "missing" };
                    output::detail(&format!("global: {} ({state})", path.display()));
                }
                None => output::detail(&"global: no home directory"),
            }
            if let Some(local) = &cli.config {
                output::detail(&format!("local:  {}", local.display()));
            }
        }
    }
    Ok(())
}
