//! derived state of one monitored beacon

use crate::config::Config;
use crate::error::StaleData;
use crate::freshness;
use crate::hysteresis::{Hysteresis, LeakState};
use crate::wtrlvl::{self, Broadcast, Measurement};

/// Snapshot of the derived readings.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct DerivedState {
    pub(crate) leak_detected: bool,
    pub(crate) water_level_percent: f32,
    pub(crate) battery_percent: f32,
    pub(crate) battery_low: bool,
    /// milliseconds since epoch of the last accepted broadcast
    pub(crate) last_update: Option<u64>,
}

/// Owns the derived state. Single writer (`update`), read through snapshots.
#[derive(Debug)]
pub(crate) struct Engine {
    config: Config,
    hysteresis: Hysteresis,
    leak: LeakState,
    state: DerivedState,
}

impl Engine {
    pub(crate) fn new(config: Config) -> Self {
        let hysteresis = Hysteresis::new(config.distance_threshold, config.distance_debounce);
        Self {
            config,
            hysteresis,
            leak: LeakState::Dry,
            state: DerivedState::default(),
        }
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    /// Feed one broadcast. Returns `false` if it was foreign or malformed,
    /// in which case nothing changes.
    pub(crate) fn update(&mut self, broadcast: &Broadcast) -> bool {
        let Some(measurement) = wtrlvl::decode(
            &self.config.device_name,
            &broadcast.identity,
            &broadcast.payload,
        ) else {
            log::trace!("ignored broadcast from {:?}", broadcast.identity);
            return false;
        };
        log::debug!(
            "received: {}mV {}cm",
            measurement.voltage,
            measurement.distance
        );
        self.record(measurement, broadcast.received_at);
        true
    }

    pub(crate) fn record(&mut self, measurement: Measurement, received_at: u64) {
        let leak = self.hysteresis.step(self.leak, measurement.distance);
        if leak != self.leak {
            log::debug!("leak state {:?} -> {:?}", self.leak, leak);
        }

        // replace the whole snapshot at once
        self.leak = leak;
        self.state = DerivedState {
            leak_detected: leak.is_leak(),
            water_level_percent: self.config.level_scale.normalize(measurement.distance),
            battery_percent: self.config.battery_scale.normalize(measurement.voltage),
            battery_low: measurement.voltage < self.config.battery_voltage_low as f32,
            last_update: Some(received_at),
        };
    }

    /// Fresh snapshot, or `StaleData`.
    pub(crate) fn read(&self, now: u64) -> Result<DerivedState, StaleData> {
        freshness::check(now, self.state.last_update, self.config.max_update_interval)?;
        Ok(self.state)
    }

    pub(crate) fn leak_detected(&self, now: u64) -> Result<bool, StaleData> {
        self.read(now).map(|s| s.leak_detected)
    }

    pub(crate) fn water_level_percent(&self, now: u64) -> Result<f32, StaleData> {
        self.read(now).map(|s| s.water_level_percent)
    }

    pub(crate) fn battery_percent(&self, now: u64) -> Result<f32, StaleData> {
        self.read(now).map(|s| s.battery_percent)
    }

    pub(crate) fn battery_low(&self, now: u64) -> Result<bool, StaleData> {
        self.read(now).map(|s| s.battery_low)
    }

    pub(crate) fn last_update(&self) -> Option<u64> {
        self.state.last_update
    }

    pub(crate) fn status_active(&self, now: u64) -> bool {
        freshness::is_fresh(now, self.state.last_update, self.config.max_update_interval)
    }

    pub(crate) fn status_fault(&self, now: u64) -> bool {
        !self.status_active(now)
    }
}
