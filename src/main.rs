use std::{error::Error, time::Duration};

use clap::Parser;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

mod config;
mod engine;
mod error;
mod exporter;
mod freshness;
mod hysteresis;
mod monitor;
mod normalize;
mod scanner;
mod wtrlvl;

use config::{Config, Settings};
use engine::Engine;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = String::from("0.0.0.0:9000"))]
    server: String,
    /// seconds between gauge refreshes without new broadcasts
    #[arg(short, long, default_value_t = 10)]
    refresh_interval: u64,
    #[command(flatten)]
    settings: Settings,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    log::info!("start rs-wtrlvl exporter");

    let config = Config::resolve(args.settings)?;
    log::info!(
        "battery {}..{}mV (low below {}mV), leak below {}cm (+{}cm), stale after {}ms",
        config.battery_voltage_min,
        config.battery_voltage_max,
        config.battery_voltage_low,
        config.distance_threshold,
        config.distance_debounce,
        config.max_update_interval,
    );
    let mut engine = Engine::new(config);

    exporter::init_prometheus(&args.server)?;
    log::info!("start prometheus server at {:}", args.server);
    let mut gauges = exporter::Gauges::register();

    let session = bluer::Session::new().await?;
    let adapter = session.default_adapter().await?;
    adapter.set_powered(true).await?;

    let (tx, rx) = mpsc::channel(64);
    let refresh = Duration::from_secs(args.refresh_interval.max(1));
    tokio::select! {
        result = scanner::scan(adapter, tx) => result?,
        _ = monitor::run(&mut engine, ReceiverStream::new(rx), &mut gauges, refresh, monitor::now_millis) => {}
    }

    return Ok(());
}
