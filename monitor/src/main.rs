use anyhow::Context;
use bridge::StatusBridge;
use clap::Parser;
use generator::plane_wave::{SyntheticConfig, SyntheticProvider};
use infracore::math::GeoHelper;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::MonitorConfig;
use workflow::runner::Runner;
use workflow::scheduler;

mod bridge;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Volcano infrasound alarm driver")]
struct Args {
    /// Per-array YAML configuration
    #[arg(long)]
    config: PathBuf,
    /// Run a single offline cycle against the synthetic source and print a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Synthetic source azimuth in degrees; defaults to the first volcano's bearing
    #[arg(long)]
    azimuth: Option<f64>,
    /// Synthetic apparent velocity in km/s
    #[arg(long, default_value_t = 0.35)]
    velocity: f64,
    /// Synthetic peak pressure in Pa
    #[arg(long, default_value_t = 1.2)]
    amplitude: f64,
    /// Run the periodic schedule with the status bridge (Ctrl+C to stop)
    #[arg(long, default_value_t = false)]
    serve: bool,
    /// Status bridge port
    #[arg(long, default_value_t = 9000)]
    port: u16,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = MonitorConfig::load(&args.config)?;

    let azimuth = match args.azimuth {
        Some(azimuth) => azimuth,
        None => {
            let reference = config
                .stations
                .first()
                .context("config has no stations")?;
            let volcano = config
                .volcanoes
                .first()
                .context("config has no volcanoes")?;
            GeoHelper::bearing_deg(reference.lat, reference.lon, volcano.lat, volcano.lon)
        }
    };

    let synthetic = SyntheticConfig {
        azimuth,
        velocity_kms: args.velocity,
        amplitude_pa: args.amplitude,
        counts_per_pa: 1.0 / config.params.digouti,
        ..Default::default()
    };
    let provider = Arc::new(SyntheticProvider::new(config.build_array()?, synthetic));

    let bridge = StatusBridge::new(
        &config.alarm_name,
        SocketAddr::from(([127, 0, 0, 1], args.port)),
    );
    let runner = Runner::from_config(&config, provider, bridge.notifier())?;

    if args.offline {
        let window_end = scheduler::epoch_now() - config.params.latency;
        let outcome = runner.execute(window_end)?;
        let solution = outcome
            .solution
            .as_ref()
            .map(|s| {
                format!(
                    "{:.1} deg at {:.2} km/s, {:.2} Pa",
                    s.back_azimuth, s.velocity_kms, s.peak_pressure
                )
            })
            .unwrap_or_else(|| "none".into());
        println!(
            "Offline cycle -> stations {}, usable pairs {}, solution {}, events {}",
            outcome.stations_used,
            outcome.valid_pairs,
            solution,
            outcome.events.len()
        );
        for event in &outcome.events {
            println!("  {}", event.payload());
        }
    }

    if args.serve {
        let runtime = TokioBuilder::new_multi_thread()
            .enable_all()
            .build()
            .context("creating runtime for the schedule")?;
        runtime.block_on(async {
            let mut heartbeat = runner.alarm().heartbeat();
            let schedule = scheduler::spawn(runner.clone());
            let pump_runner = runner.clone();
            let pump = tokio::spawn(async move {
                while heartbeat.changed().await.is_ok() {
                    let pulse = heartbeat.borrow().clone();
                    bridge.publish_pulse(pulse);
                    bridge.publish_volcanoes(pump_runner.alarm().tracker_snapshot());
                }
            });

            log::info!(
                "{} schedule running, status on port {}",
                config.alarm_name,
                args.port
            );
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            schedule.abort();
            pump.abort();
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
