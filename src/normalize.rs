//! linear rescaling onto 0..=100

use crate::error::ConfigError;

/// A non-empty `[min, max]` window. `min` may be above `max` for readings
/// that grow as the value falls (distance to the water surface).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Scale {
    min: f32,
    max: f32,
}

impl Scale {
    pub(crate) fn new(min: f32, max: f32) -> Result<Self, ConfigError> {
        if !min.is_finite() || !max.is_finite() || min == max {
            return Err(ConfigError::EmptyRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// percentage of `value` within the window, clamped to the bounds
    pub(crate) fn normalize(&self, value: f32) -> f32 {
        let percent = (value - self.min) / (self.max - self.min) * 100_f32;
        percent.clamp(0_f32, 100_f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_map_to_0_and_100() {
        let battery = Scale::new(1800.0, 3200.0).unwrap();
        assert_eq!(battery.normalize(1800.0), 0.0);
        assert_eq!(battery.normalize(3200.0), 100.0);
        assert_eq!(battery.normalize(2500.0), 50.0);
    }

    #[test]
    fn clamps_outside_window() {
        let battery = Scale::new(1800.0, 3200.0).unwrap();
        assert_eq!(battery.normalize(0.0), 0.0);
        assert_eq!(battery.normalize(1799.0), 0.0);
        assert_eq!(battery.normalize(3201.0), 100.0);
        assert_eq!(battery.normalize(f32::from(u16::MAX)), 100.0);
    }

    #[test]
    fn monotonic_in_value() {
        let battery = Scale::new(1800.0, 3200.0).unwrap();
        let mut previous = battery.normalize(1500.0);
        for mv in (1500..3500).step_by(7) {
            let current = battery.normalize(mv as f32);
            assert!(current >= previous, "{mv}mV: {current} < {previous}");
            previous = current;
        }
    }

    #[test]
    fn inverted_window_for_water_level() {
        // 25cm is nearly dry, 15cm is the leak threshold
        let level = Scale::new(25.0, 15.0).unwrap();
        assert_eq!(level.normalize(25.0), 0.0);
        assert_eq!(level.normalize(20.0), 50.0);
        assert_eq!(level.normalize(15.0), 100.0);
        assert_eq!(level.normalize(40.0), 0.0);
        assert_eq!(level.normalize(3.0), 100.0);
    }

    #[test]
    fn empty_window_is_rejected() {
        assert_eq!(
            Scale::new(2000.0, 2000.0),
            Err(ConfigError::EmptyRange { min: 2000.0, max: 2000.0 })
        );
        assert!(Scale::new(f32::NAN, 100.0).is_err());
    }
}
