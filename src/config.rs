//! configuration for the derivation engine

use crate::error::ConfigError;
use crate::normalize::Scale;

pub(crate) const DEFAULT_BATTERY_VOLTAGE_MIN: u16 = 1800;
pub(crate) const DEFAULT_BATTERY_VOLTAGE_MAX: u16 = 3200;
pub(crate) const DEFAULT_BATTERY_VOLTAGE_LOW: u16 = 2000;
pub(crate) const DEFAULT_DISTANCE_THRESHOLD: f32 = 15.0;
pub(crate) const DEFAULT_DISTANCE_DEBOUNCE: f32 = 1.0;
pub(crate) const DEFAULT_MAX_UPDATE_INTERVAL: u64 = 30 * 60 * 1000;

/// distance (cm) at which the spot is considered nearly dry, 0% water level
pub(crate) const DRY_DISTANCE: f32 = 25.0;

/// Settings as given on the command line. Unset values take their default.
#[derive(Debug, Default, Clone, clap::Args)]
pub(crate) struct Settings {
    /// advertised local name of the beacon
    #[arg(short, long)]
    pub(crate) device_name: Option<String>,
    /// battery voltage reported as 0% in mV [default: 1800]
    #[arg(long)]
    pub(crate) battery_voltage_min: Option<u16>,
    /// battery voltage reported as 100% in mV [default: 3200]
    #[arg(long)]
    pub(crate) battery_voltage_max: Option<u16>,
    /// battery voltage below which the battery is low in mV [default: 2000]
    #[arg(long)]
    pub(crate) battery_voltage_low: Option<u16>,
    /// distance below which a leak is reported in cm [default: 15]
    #[arg(long)]
    pub(crate) distance_threshold: Option<f32>,
    /// extra distance needed to clear a leak in cm [default: 1]
    #[arg(long)]
    pub(crate) distance_debounce: Option<f32>,
    /// age after which readings are stale in ms [default: 1800000]
    #[arg(long)]
    pub(crate) max_update_interval: Option<u64>,
}

/// Validated, immutable configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Config {
    pub(crate) device_name: String,
    pub(crate) battery_voltage_min: u16,
    pub(crate) battery_voltage_max: u16,
    pub(crate) battery_voltage_low: u16,
    pub(crate) distance_threshold: f32,
    pub(crate) distance_debounce: f32,
    pub(crate) max_update_interval: u64,
    pub(crate) battery_scale: Scale,
    pub(crate) level_scale: Scale,
}

impl Config {
    pub(crate) fn resolve(settings: Settings) -> Result<Self, ConfigError> {
        let device_name = match settings.device_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(ConfigError::MissingDeviceName),
        };
        let battery_voltage_min = settings
            .battery_voltage_min
            .unwrap_or(DEFAULT_BATTERY_VOLTAGE_MIN);
        let battery_voltage_max = settings
            .battery_voltage_max
            .unwrap_or(DEFAULT_BATTERY_VOLTAGE_MAX);
        let battery_voltage_low = settings
            .battery_voltage_low
            .unwrap_or(DEFAULT_BATTERY_VOLTAGE_LOW);
        let distance_threshold = settings
            .distance_threshold
            .unwrap_or(DEFAULT_DISTANCE_THRESHOLD);
        let distance_debounce = settings
            .distance_debounce
            .unwrap_or(DEFAULT_DISTANCE_DEBOUNCE);
        let max_update_interval = settings
            .max_update_interval
            .unwrap_or(DEFAULT_MAX_UPDATE_INTERVAL);

        if battery_voltage_min >= battery_voltage_max {
            return Err(ConfigError::InvalidBatteryRange {
                min: battery_voltage_min,
                max: battery_voltage_max,
            });
        }
        if !distance_threshold.is_finite()
            || distance_threshold <= 0_f32
            || distance_threshold == DRY_DISTANCE
        {
            return Err(ConfigError::InvalidDistanceThreshold(distance_threshold));
        }
        if !distance_debounce.is_finite() || distance_debounce < 0_f32 {
            return Err(ConfigError::InvalidDebounce(distance_debounce));
        }
        if max_update_interval == 0 {
            return Err(ConfigError::InvalidUpdateInterval);
        }

        let battery_scale = Scale::new(battery_voltage_min as f32, battery_voltage_max as f32)?;
        let level_scale = Scale::new(DRY_DISTANCE, distance_threshold)?;

        return Ok(Config {
            device_name,
            battery_voltage_min,
            battery_voltage_max,
            battery_voltage_low,
            distance_threshold,
            distance_debounce,
            max_update_interval,
            battery_scale,
            level_scale,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named() -> Settings {
        Settings {
            device_name: Some("wtrlvl".to_string()),
            ..Settings::default()
        }
    }

    #[test]
    fn defaults_apply_per_field() {
        let config = Config::resolve(named()).unwrap();
        assert_eq!(config.device_name, "wtrlvl");
        assert_eq!(config.battery_voltage_min, 1800);
        assert_eq!(config.battery_voltage_max, 3200);
        assert_eq!(config.battery_voltage_low, 2000);
        assert_eq!(config.distance_threshold, 15.0);
        assert_eq!(config.distance_debounce, 1.0);
        assert_eq!(config.max_update_interval, 1_800_000);
    }

    #[test]
    fn explicit_field_does_not_leak_into_others() {
        let config = Config::resolve(Settings {
            battery_voltage_low: Some(2100),
            ..named()
        })
        .unwrap();
        assert_eq!(config.battery_voltage_low, 2100);
        assert_eq!(config.battery_voltage_min, DEFAULT_BATTERY_VOLTAGE_MIN);
        assert_eq!(config.battery_voltage_max, DEFAULT_BATTERY_VOLTAGE_MAX);
        assert_eq!(config.distance_threshold, DEFAULT_DISTANCE_THRESHOLD);
    }

    #[test]
    fn device_name_is_required() {
        assert_eq!(
            Config::resolve(Settings::default()),
            Err(ConfigError::MissingDeviceName)
        );
        let blank = Settings {
            device_name: Some("  ".to_string()),
            ..Settings::default()
        };
        assert_eq!(Config::resolve(blank), Err(ConfigError::MissingDeviceName));
    }

    #[test]
    fn battery_range_must_be_increasing() {
        let equal = Settings {
            battery_voltage_min: Some(3000),
            battery_voltage_max: Some(3000),
            ..named()
        };
        assert_eq!(
            Config::resolve(equal),
            Err(ConfigError::InvalidBatteryRange { min: 3000, max: 3000 })
        );
        let inverted = Settings {
            battery_voltage_min: Some(3300),
            ..named()
        };
        assert!(matches!(
            Config::resolve(inverted),
            Err(ConfigError::InvalidBatteryRange { .. })
        ));
    }

    #[test]
    fn rejects_bad_distances() {
        let negative = Settings {
            distance_debounce: Some(-0.5),
            ..named()
        };
        assert_eq!(Config::resolve(negative), Err(ConfigError::InvalidDebounce(-0.5)));

        let dry = Settings {
            distance_threshold: Some(DRY_DISTANCE),
            ..named()
        };
        assert_eq!(
            Config::resolve(dry),
            Err(ConfigError::InvalidDistanceThreshold(DRY_DISTANCE))
        );

        for threshold in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, 0.0, -3.0] {
            let settings = Settings {
                distance_threshold: Some(threshold),
                ..named()
            };
            assert!(
                matches!(
                    Config::resolve(settings),
                    Err(ConfigError::InvalidDistanceThreshold(_))
                ),
                "threshold {threshold} accepted"
            );
        }

        for debounce in [f32::NAN, f32::INFINITY] {
            let settings = Settings {
                distance_debounce: Some(debounce),
                ..named()
            };
            assert!(
                matches!(Config::resolve(settings), Err(ConfigError::InvalidDebounce(_))),
                "debounce {debounce} accepted"
            );
        }

        let zero_debounce = Settings {
            distance_debounce: Some(0.0),
            ..named()
        };
        assert!(Config::resolve(zero_debounce).is_ok());
    }

    #[test]
    fn rejects_zero_interval() {
        let settings = Settings {
            max_update_interval: Some(0),
            ..named()
        };
        assert_eq!(Config::resolve(settings), Err(ConfigError::InvalidUpdateInterval));
    }
}
