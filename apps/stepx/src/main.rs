//! stepx - Toolchain build-step executor for CI jobs
//!
//! The CLI loads the job configuration, wires the default collaborators
//! (process environment, configured installations, home-directory
//! interpreter lookup, local launcher) into the step executor, and
//! renders the emitted events while a step runs.

mod cli;
mod error;
mod events;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use stepx_builder::{
    execute, CommandNature, HomeInterpreterResolver, ProcessEnvironment, StaticInstallations,
    StepContext,
};
use stepx_config::Config;
use stepx_events::EventReceiver;
use stepx_matrix::Axis;
use stepx_platform::LocalLauncher;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    match run(cli).await {
        Ok(verdict) => {
            if !verdict {
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Application error: {}", e);
            if !json_mode {
                eprintln!("Error: {e}");
            }
            process::exit(2);
        }
    }
}

/// Main application logic; the returned bool is the process verdict
async fn run(cli: Cli) -> Result<bool, CliError> {
    info!("Starting stepx v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load_or_default(cli.global.config.as_deref()).await?;

    match cli.command {
        Commands::Run { step, working_dir } => {
            run_step(&config, &step, working_dir, &cli.global).await
        }

        Commands::Natures => {
            render_natures(cli.global.json);
            Ok(true)
        }

        Commands::Installations => {
            render_installations(&config, cli.global.json);
            Ok(true)
        }

        Commands::Steps => {
            render_steps(&config, cli.global.json);
            Ok(true)
        }

        Commands::Axis {
            values,
            extra,
            extras_only,
        } => {
            let axis = build_axis(&config, &values, extra.as_deref());
            render_axis(&axis, extras_only, cli.global.json);
            Ok(true)
        }
    }
}

/// Execute one configured step with event handling
async fn run_step(
    config: &Config,
    name: &str,
    working_dir: Option<PathBuf>,
    global: &GlobalArgs,
) -> Result<bool, CliError> {
    let request = config.step(name)?.to_request();
    let working_dir = match working_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let environment = ProcessEnvironment::new();
    let installations = StaticInstallations::new(config.installations());
    let interpreters = HomeInterpreterResolver::new();
    let launcher = LocalLauncher::new();

    let (event_sender, event_receiver) = stepx_events::channel();
    let ctx = StepContext::new(
        working_dir,
        &environment,
        &installations,
        &interpreters,
        &launcher,
    )
    .with_event_sender(event_sender);

    let colors_enabled = console::Term::stdout().features().colors_supported();
    let mut event_handler = EventHandler::new(colors_enabled, global.debug, global.json);

    let verdict =
        execute_with_events(&request, &ctx, event_receiver, &mut event_handler).await?;

    if global.json {
        println!(
            "{}",
            serde_json::json!({ "step": name, "verdict": verdict })
        );
    }
    Ok(verdict)
}

/// Drive the step future and the event stream concurrently
async fn execute_with_events(
    request: &stepx_types::BuildStepRequest,
    ctx: &StepContext<'_>,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<bool, CliError> {
    let mut step_future = Box::pin(execute(request, ctx));

    loop {
        select! {
            // Step completed
            result = &mut step_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result.map_err(Into::into);
            }

            // Event received
            event = event_receiver.recv() => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => { /* Channel closed: keep waiting for the step to finish */ }
                }
            }
        }
    }
}

/// Choose the axis source: explicit flags win over configuration
fn build_axis(config: &Config, values: &[String], extra: Option<&str>) -> Axis {
    if values.is_empty() && extra.is_none() {
        config
            .axis()
            .unwrap_or_else(|| Axis::new(&stepx_matrix::DEFAULTS, None))
    } else if values.is_empty() {
        Axis::new(&stepx_matrix::DEFAULTS, extra)
    } else {
        Axis::new(values, extra)
    }
}

fn render_natures(json: bool) {
    if json {
        let natures: Vec<_> = CommandNature::ALL
            .into_iter()
            .map(|nature| {
                serde_json::json!({
                    "identifier": nature.identifier(),
                    "label": nature.label(),
                })
            })
            .collect();
        println!("{}", serde_json::json!(natures));
    } else {
        for nature in CommandNature::ALL {
            println!("{:<12} {}", nature.identifier(), nature.label());
        }
    }
}

fn render_installations(config: &Config, json: bool) {
    let installations = config.installations();
    if json {
        println!("{}", serde_json::to_string(&installations).unwrap_or_default());
    } else if installations.is_empty() {
        println!("No installations configured");
    } else {
        for installation in installations {
            println!("{:<16} {}", installation.name, installation.home.display());
        }
    }
}

fn render_steps(config: &Config, json: bool) {
    if json {
        let steps: Vec<_> = config
            .steps
            .iter()
            .map(|step| {
                serde_json::json!({
                    "name": step.name,
                    "installation": step.installation,
                    "nature": step.nature,
                    "ignore_exit_code": step.ignore_exit_code,
                })
            })
            .collect();
        println!("{}", serde_json::json!(steps));
    } else if config.steps.is_empty() {
        println!("No steps configured");
    } else {
        for step in &config.steps {
            println!(
                "{:<16} {:<16} {}",
                step.name, step.installation, step.nature
            );
        }
    }
}

fn render_axis(axis: &Axis, extras_only: bool, json: bool) {
    if extras_only {
        if json {
            println!(
                "{}",
                serde_json::json!({ "extra_value_string": axis.extra_value_string() })
            );
        } else {
            println!("{}", axis.extra_value_string());
        }
    } else if json {
        println!(
            "{}",
            serde_json::json!({ "name": axis.key(), "values": axis.values() })
        );
    } else {
        for value in axis.values() {
            println!("{value}");
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    if json_mode {
        // JSON mode: suppress all console output to avoid contaminating JSON
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        let default_filter = if debug_enabled_flag {
            "info,stepx=debug"
        } else {
            "warn,stepx=warn"
        };
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
            )
            .init();
    }
}
