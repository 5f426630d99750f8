//! drives the engine from a stream of broadcasts

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio_stream::{Stream, StreamExt};

use crate::engine::Engine;
use crate::exporter::Gauges;
use crate::wtrlvl::Broadcast;

/// wall clock in milliseconds since epoch
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .inspect_err(|e| log::warn!("failed to get current time: {:?}", e))
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Feed every broadcast into `engine` and publish, re-publishing every
/// `refresh` so readings going stale show up without new traffic.
/// Returns once `broadcasts` ends.
pub(crate) async fn run<S, C>(
    engine: &mut Engine,
    mut broadcasts: S,
    gauges: &mut Gauges,
    refresh: Duration,
    clock: C,
) where
    S: Stream<Item = Broadcast> + Unpin,
    C: Fn() -> u64,
{
    log::info!("watching for {:?}", engine.config().device_name);
    let mut ticker = tokio::time::interval(refresh);
    loop {
        tokio::select! {
            broadcast = broadcasts.next() => {
                let Some(broadcast) = broadcast else {
                    log::info!("broadcast source closed");
                    break;
                };
                if engine.update(&broadcast) {
                    gauges.publish(engine, clock());
                }
            }

            _ = ticker.tick() => {
                gauges.publish(engine, clock());
            }
        }
    }
}
