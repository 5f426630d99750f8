//! prometheus exposition of the derived readings

use std::{error::Error, net::SocketAddr, str::FromStr};

use metrics::Gauge;

use crate::engine::Engine;
use crate::error::StaleData;

pub(crate) fn init_prometheus(addr: &str) -> Result<(), Box<dyn Error>> {
    let socket = SocketAddr::from_str(addr)?;

    let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    builder.with_http_listener(socket).install()?;

    return Ok(());
}

/// gauges
pub(crate) struct Gauges {
    leak_detected: Gauge,
    water_level: Gauge,
    battery: Gauge,
    battery_low: Gauge,
    status_active: Gauge,
    status_fault: Gauge,
    last_measured: Gauge,
    fresh: bool,
}

impl Gauges {
    pub(crate) fn register() -> Self {
        Self {
            leak_detected: metrics::gauge!("leak_detected"),
            water_level: metrics::gauge!("water_level_percent"),
            battery: metrics::gauge!("battery_percent"),
            battery_low: metrics::gauge!("battery_low"),
            status_active: metrics::gauge!("status_active"),
            status_fault: metrics::gauge!("status_fault"),
            last_measured: metrics::gauge!("last_measured_timestamp_ms"),
            fresh: false,
        }
    }

    /// Copy the engine's readings into the gauges. Stale readings become NaN.
    pub(crate) fn publish(&mut self, engine: &Engine, now: u64) {
        self.status_active.set(flag(engine.status_active(now)));
        self.status_fault.set(flag(engine.status_fault(now)));
        if let Some(last) = engine.last_update() {
            self.last_measured.set(last as f64);
        }

        if self.went_stale(engine.status_active(now)) {
            if let Err(e) = engine.read(now) {
                log::warn!("{} (age {:?}ms)", e, e.age);
            }
        }
        self.leak_detected.set(reading(engine.leak_detected(now).map(flag)));
        self.water_level.set(reading(engine.water_level_percent(now).map(f64::from)));
        self.battery.set(reading(engine.battery_percent(now).map(f64::from)));
        self.battery_low.set(reading(engine.battery_low(now).map(flag)));
    }

    /// `true` only on the publish where fresh data turns stale
    fn went_stale(&mut self, fresh: bool) -> bool {
        let edge = self.fresh && !fresh;
        self.fresh = fresh;
        edge
    }
}

fn reading(value: Result<f64, StaleData>) -> f64 {
    value.unwrap_or(f64::NAN)
}

fn flag(value: bool) -> f64 {
    if value {
        1_f64
    } else {
        0_f64
    }
}
