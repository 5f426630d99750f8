//! freshness of the cached reading

use crate::error::StaleData;

/// `true` if the last update is younger than `max_interval`. Never updated
/// means never fresh.
pub(crate) fn is_fresh(now: u64, last_update: Option<u64>, max_interval: u64) -> bool {
    match last_update {
        Some(last) => now.saturating_sub(last) < max_interval,
        None => false,
    }
}

/// Freshness gate applied before any read.
pub(crate) fn check(now: u64, last_update: Option<u64>, max_interval: u64) -> Result<(), StaleData> {
    if is_fresh(now, last_update, max_interval) {
        return Ok(());
    }
    Err(StaleData {
        age: last_update.map(|last| now.saturating_sub(last)),
    })
}
