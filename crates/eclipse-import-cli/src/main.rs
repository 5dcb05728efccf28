use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use eclipse_config::ImportConfig;
use eclipse_project::{load_project_with_options, LoadOptions, Workspace};
use serde::Serialize;

mod report;

use report::{ProjectReport, WorkspaceReport};

#[derive(Parser)]
#[command(
    name = "eclipse-import",
    version,
    about = "Read Eclipse workspaces and projects and report their resolved classpaths"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load every project of an Eclipse workspace
    Workspace(ImportArgs),
    /// Load a single Eclipse project (and its workspace, if it has one)
    Project(ImportArgs),
}

#[derive(Args)]
struct ImportArgs {
    /// Workspace or project directory
    path: PathBuf,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
    /// Config file (defaults to `eclipse-import.toml` in the target directory)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Exit with status 1 when any import problem was found
    #[arg(long)]
    fail_on_problems: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Workspace(args) => {
            let options = load_options(&args)?;
            let workspace = Workspace::load_with_options(&args.path, &options)
                .with_context(|| format!("failed to load workspace {}", args.path.display()))?;
            let report = WorkspaceReport::new(&workspace);
            print_output(&report, args.json)?;
            Ok(exit_code(report.summary.problems, args.fail_on_problems))
        }
        Command::Project(args) => {
            let options = load_options(&args)?;
            let import = load_project_with_options(&args.path, &options)
                .with_context(|| format!("failed to load project {}", args.path.display()))?;
            let report = ProjectReport::new(&import.project, import.workspace.as_ref());
            print_output(&report, args.json)?;
            Ok(exit_code(report.problems.len(), args.fail_on_problems))
        }
    }
}

/// Reads the config, installs logging and builds the loader options.
fn load_options(args: &ImportArgs) -> Result<LoadOptions> {
    let config = match &args.config {
        Some(path) => ImportConfig::load_from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => config_for_dir(&args.path)?,
    };
    eclipse_config::init_tracing(&config.logging);
    Ok(LoadOptions::from_config(&config))
}

fn config_for_dir(dir: &Path) -> Result<ImportConfig> {
    let (config, path) = eclipse_config::load_for_dir(dir)
        .with_context(|| format!("failed to load config for {}", dir.display()))?;
    if let Some(path) = path {
        tracing::debug!(config = %path.display(), "using config file");
    }
    Ok(config)
}

fn exit_code(problems: usize, fail_on_problems: bool) -> i32 {
    if fail_on_problems && problems > 0 {
        1
    } else {
        0
    }
}

fn print_output<T: Serialize + 'static>(value: &T, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(value)?;
        println!("{out}");
        return Ok(());
    }

    let any = value as &dyn std::any::Any;
    if let Some(report) = any.downcast_ref::<WorkspaceReport>() {
        println!("workspace: {}", report.directory.display());
        for project in &report.projects {
            project.print();
        }
        for launch in &report.launch_configurations {
            println!(
                "launch: {} ({})",
                launch.id,
                launch.project.as_deref().unwrap_or("no project")
            );
        }
        for problem in &report.problems {
            println!("problem: {problem}");
        }
        println!(
            "summary: {} projects, {} problems",
            report.summary.projects, report.summary.problems
        );
    } else if let Some(report) = any.downcast_ref::<ProjectReport>() {
        report.print();
    } else {
        let out = serde_json::to_string_pretty(value)?;
        println!("{out}");
    }
    Ok(())
}
