use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use agentdeck::api::{serve, AppState};
use agentdeck::engine::{Dashboard, FixedDurations};
use agentdeck::{Config, Simulation};

#[derive(Parser)]
#[command(name = "agentdeck")]
#[command(about = "Simulated multi-agent step progression", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(long, global = true, help = "Path to a TOML config file")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demo agents and stream their log to stdout
    Run {
        #[arg(long, default_value_t = 30, help = "How long to simulate, in seconds")]
        seconds: u64,

        #[arg(long, help = "Use the lower bound of each duration range instead of random draws")]
        fixed: bool,

        #[arg(long, help = "Enable every demo agent at startup")]
        all: bool,
    },
    /// Serve the dashboard over HTTP with a live simulation
    Serve {
        #[arg(long, help = "Port to listen on (overrides config)")]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env(),
    };
    config.validate()?;

    match cli.command {
        Commands::Run {
            seconds,
            fixed,
            all,
        } => run_demo(&config, seconds, fixed, all).await?,
        Commands::Serve { port } => {
            let simulation = Simulation::demo(&config);
            let state = AppState {
                dashboard: simulation.dashboard(),
            };
            serve(state, port.unwrap_or(config.port)).await?;
            simulation.shutdown().await;
        }
    }

    Ok(())
}

async fn run_demo(config: &Config, seconds: u64, fixed: bool, all: bool) -> Result<()> {
    let simulation = Simulation::spawn(|driver| {
        let dashboard = if fixed {
            let durations = FixedDurations::new(
                Duration::from_millis(config.tick.min_ms),
                Duration::from_millis(config.advance.min_ms),
            );
            Dashboard::demo(config, driver, Arc::new(durations))
        } else {
            Dashboard::demo(config, driver, Arc::new(config.durations()))
        };
        if all {
            dashboard.with_all_enabled()
        } else {
            dashboard
        }
    });

    let dashboard = simulation.dashboard();
    let mut seen = 0;
    {
        let dashboard = dashboard.lock().await;
        println!("Simulating {} agents for {}s", dashboard.len(), seconds);
    }

    let deadline = tokio::time::Instant::now() + Duration::from_secs(seconds);
    let mut poll = tokio::time::interval(Duration::from_millis(250));
    while tokio::time::Instant::now() < deadline {
        poll.tick().await;
        let dashboard = dashboard.lock().await;
        for entry in dashboard.logs().since(seen) {
            println!("{}", entry);
        }
        seen = dashboard.logs().total();
        if dashboard.running_count() == 0 {
            break;
        }
    }

    {
        let dashboard = dashboard.lock().await;
        println!();
        for summary in dashboard.summaries() {
            println!(
                "Agent {} {:<20} {:>3}%  {:<7}  {}",
                summary.ordinal,
                summary.name,
                summary.progress,
                summary.state.as_str(),
                summary.current_step.as_deref().unwrap_or("")
            );
        }
    }

    simulation.shutdown().await;
    Ok(())
}
