use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uiflow::{
    AppLayout, DuplicatePolicy, UiflowConfig, convert_app, plan_app, run_app,
    workspace_root,
};

/// Convert Espresso UI tests into replayable action plans.
#[derive(Parser)]
#[command(name = "uiflow", version)]
struct Cli {
    /// Workspace root (overrides UIFLOW_WORKSPACE_ROOT and config)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split test classes and synthesize internal methods
    Convert { app_id: String },

    /// Parse synthesized methods into the app's action plan document
    Plan {
        app_id: String,

        /// What to do when two methods share a name
        #[arg(long, value_enum)]
        on_duplicate: Option<DuplicatePolicy>,
    },

    /// Convert, then plan
    All {
        app_id: String,

        /// What to do when two methods share a name
        #[arg(long, value_enum)]
        on_duplicate: Option<DuplicatePolicy>,
    },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let (config, config_errors) = UiflowConfig::load(&cwd);
    init_tracing(if cli.verbose { "debug" } else { config.log_level() });
    for err in &config_errors {
        tracing::warn!(path = %err.path.display(), error = %err.source, "ignoring invalid config");
    }

    let root = workspace_root(cli.workspace.as_deref(), &config);
    let policy = |flag: Option<DuplicatePolicy>| flag.unwrap_or_else(|| config.on_duplicate());

    match cli.command {
        Command::Convert { app_id } => {
            let layout = AppLayout::new(&root, app_id);
            let report = convert_app(&layout)
                .with_context(|| format!("converting app `{}`", layout.app_id()))?;
            println!(
                "{}: {} method(s) synthesized from {} file(s), {} failed",
                layout.app_id(),
                report.methods.len(),
                report.files,
                report.failed.len()
            );
        }
        Command::Plan {
            app_id,
            on_duplicate,
        } => {
            let layout = AppLayout::new(&root, app_id);
            let report = plan_app(&layout, policy(on_duplicate))
                .with_context(|| format!("planning app `{}`", layout.app_id()))?;
            println!(
                "{}: {} plan(s) written to {}",
                layout.app_id(),
                report.document.action_plans.len(),
                report.path.display()
            );
        }
        Command::All {
            app_id,
            on_duplicate,
        } => {
            let layout = AppLayout::new(&root, app_id);
            let (converted, planned) = run_app(&layout, policy(on_duplicate))
                .with_context(|| format!("processing app `{}`", layout.app_id()))?;
            println!(
                "{}: {} method(s), {} plan(s) written to {}",
                layout.app_id(),
                converted.methods.len(),
                planned.document.action_plans.len(),
                planned.path.display()
            );
        }
    }

    Ok(())
}
