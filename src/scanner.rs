//! BLE advertisement source

use std::collections::HashMap;

use bluer::{
    Adapter, AdapterEvent, AdapterProperty, Address, Device, DeviceEvent, DeviceProperty,
};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_stream::{StreamExt, StreamMap};

use crate::monitor::now_millis;
use crate::wtrlvl::Broadcast;

/// BlueZ hands out manufacturer data keyed by company id. Put the id back
/// in front so the payload matches the advertisement on air.
pub(crate) fn raw_manufacturer_data(company: u16, value: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(2 + value.len());
    payload.extend_from_slice(&company.to_le_bytes());
    payload.extend_from_slice(value);
    payload
}

fn emit(tx: &mpsc::Sender<Broadcast>, name: &str, data: &HashMap<u16, Vec<u8>>) -> bool {
    for (company, value) in data {
        let broadcast = Broadcast {
            identity: name.to_string(),
            payload: raw_manufacturer_data(*company, value),
            received_at: now_millis(),
        };
        match tx.try_send(broadcast) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => log::trace!("broadcast queue full, dropped"),
            Err(TrySendError::Closed(_)) => return false,
        }
    }
    true
}

/// what to do with discovery after an adapter power change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PowerAction {
    /// start a new discovery session, the old one died with the power
    Restart,
    /// nothing to scan until the adapter comes back
    Wait,
}

pub(crate) fn on_power_change(powered: bool) -> PowerAction {
    if powered {
        PowerAction::Restart
    } else {
        PowerAction::Wait
    }
}

/// A device gone between discovery and query is skipped, not fatal.
fn skip_failed<T>(addr: Address, result: bluer::Result<T>) -> Option<T> {
    result
        .inspect_err(|e| log::debug!("skipping device {}: {}", addr, e))
        .ok()
}

async fn device_info(
    device: &Device,
) -> bluer::Result<(Option<String>, Option<HashMap<u16, Vec<u8>>>)> {
    let name = device.name().await?;
    let data = device.manufacturer_data().await?;
    return Ok((name, data));
}

/// Scan forever, forwarding manufacturer data of every named device.
/// Returns when the receiving side is dropped. Errors from single devices
/// are skipped, only adapter failures end the scan.
pub(crate) async fn scan(adapter: Adapter, tx: mpsc::Sender<Broadcast>) -> bluer::Result<()> {
    let adapter_events = adapter.events().await?;
    tokio::pin!(adapter_events);
    let mut device_events = adapter.discover_devices().await?;
    let mut change_events = StreamMap::new();
    let mut names: HashMap<Address, String> = HashMap::new();

    loop {
        tokio::select! {
            Some(event) = adapter_events.next() => {
                if let AdapterEvent::PropertyChanged(AdapterProperty::Powered(powered)) = event {
                    log::info!("Bluetooth state changed to: powered={}", powered);
                    match on_power_change(powered) {
                        PowerAction::Restart => {
                            names.clear();
                            change_events.clear();
                            device_events = adapter.discover_devices().await?;
                            log::info!("discovery restarted");
                        }
                        PowerAction::Wait => log::info!("waiting for adapter to power on"),
                    }
                }
            }

            Some(event) = device_events.next() => {
                match event {
                    AdapterEvent::DeviceAdded(addr) => {
                        let Some(device) = skip_failed(addr, adapter.device(addr)) else {
                            continue;
                        };
                        let Some((name, data)) = skip_failed(addr, device_info(&device).await) else {
                            continue;
                        };
                        let Some(events) = skip_failed(addr, device.events().await) else {
                            continue;
                        };
                        if let (Some(name), Some(data)) = (&name, data) {
                            if !emit(&tx, name, &data) {
                                return Ok(());
                            }
                        }
                        if let Some(name) = name {
                            log::trace!("device {} named {:?}", addr, name);
                            names.insert(addr, name);
                        }
                        change_events.insert(addr, events);
                    }
                    AdapterEvent::DeviceRemoved(addr) => {
                        names.remove(&addr);
                        change_events.remove(&addr);
                    }
                    other => log::trace!("other adapter event {:?}", other),
                }
            }

            Some((addr, DeviceEvent::PropertyChanged(property))) = change_events.next() => {
                match property {
                    DeviceProperty::Name(name) => {
                        names.insert(addr, name);
                    }
                    DeviceProperty::ManufacturerData(data) => {
                        if let Some(name) = names.get(&addr) {
                            if !emit(&tx, name, &data) {
                                return Ok(());
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}
