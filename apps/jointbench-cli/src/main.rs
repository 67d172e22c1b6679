use anyhow::Context;
use clap::{Parser, Subcommand};
use jointbench_render::DebugTextRenderer;
use jointbench_scenario::{Scenario, ScenarioConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jointbench-cli", about = "Headless runner for the fixed-joint demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the demo scene on simulated time
    Run {
        /// Number of fixed steps to simulate
        #[arg(short, long, default_value = "300")]
        frames: u64,
        /// Save and restore the probe's filter data around the attachment
        #[arg(long)]
        workaround: bool,
        /// Seconds of simulated time before the probe is attached
        #[arg(long, default_value = "3.0")]
        joint_delay: f32,
        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("jointbench-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("physics: {}", jointbench_physics::crate_info());
            println!("render: {}", jointbench_render::crate_info());
            println!("tools: {}", jointbench_tools::crate_info());
        }
        Commands::Run {
            frames,
            workaround,
            joint_delay,
            json,
        } => {
            let config = ScenarioConfig {
                joint_delay,
                preserve_filter_data: workaround,
                ..ScenarioConfig::default()
            };
            let dt = config.physics.timestep;
            let mut scenario = Scenario::new(config).context("failed to build the demo scene")?;
            tracing::info!(frames, workaround, joint_delay, "headless run started");

            for i in 0..frames {
                let attached = scenario.probe_joint().is_some();
                scenario
                    .frame(i as f32 * dt)
                    .with_context(|| format!("frame {i} failed"))?;

                if !attached && scenario.probe_joint().is_some() && !json {
                    for dump in scenario.filter_log() {
                        print!("{dump}");
                    }
                }
            }

            let report = scenario.report();
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let mut renderer = DebugTextRenderer::new();
                print!("{}", scenario.draw(&mut renderer));
                print!("{report}");
            }
        }
    }

    Ok(())
}
