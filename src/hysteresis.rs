//! debounced leak state

/// leak state of the monitored spot
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LeakState {
    #[default]
    Dry,
    Wet,
}

impl LeakState {
    pub(crate) fn is_leak(self) -> bool {
        self == LeakState::Wet
    }
}

/// Threshold with a dead band above it. Entering `Wet` is immediate, leaving
/// it requires the distance to clear `threshold + debounce`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Hysteresis {
    threshold: f32,
    debounce: f32,
}

impl Hysteresis {
    pub(crate) fn new(threshold: f32, debounce: f32) -> Self {
        Self { threshold, debounce }
    }

    pub(crate) fn step(&self, state: LeakState, distance: f32) -> LeakState {
        match state {
            LeakState::Dry if distance < self.threshold => LeakState::Wet,
            LeakState::Wet if distance > self.threshold + self.debounce => LeakState::Dry,
            _ => state,
        }
    }
}
