// SPDX-License-Identifier: GPL-3.0-only

//! Orientation sensor integration via iio-sensor-proxy
//!
//! `net.hadess.SensorProxy` exposes the accelerometer on the system bus and
//! reports the device's physical orientation as a coarse string. That reading
//! is translated to a heading in degrees and forwarded continuously; the
//! capture session controller maps it to the still-capture target rotation.

use futures::{SinkExt, StreamExt};
use tracing::{debug, info};

const SENSOR_SERVICE: &str = "net.hadess.SensorProxy";
const SENSOR_PATH: &str = "/net/hadess/SensorProxy";
const SENSOR_INTERFACE: &str = "net.hadess.SensorProxy";

/// Translate an iio-sensor-proxy orientation value to a device heading in
/// degrees clockwise from the natural orientation. `undefined` (sensor
/// settling, or flat on a table) yields no reading.
pub fn heading_for_orientation(orientation: &str) -> Option<u16> {
    match orientation {
        "normal" => Some(0),
        "right-up" => Some(90),
        "bottom-up" => Some(180),
        "left-up" => Some(270),
        _ => None,
    }
}

/// Claim the accelerometer and forward heading samples for the lifetime of
/// the returned future. Errors out early when no accelerometer is present,
/// which is the common case on desktop hardware.
pub async fn watch_headings<M, F>(
    mut output: futures::channel::mpsc::Sender<M>,
    to_message: F,
) -> Result<(), String>
where
    F: Fn(u16) -> M,
{
    let connection = zbus::Connection::system()
        .await
        .map_err(|e| format!("Failed to connect to system D-Bus: {e}"))?;

    let proxy = zbus::Proxy::new(&connection, SENSOR_SERVICE, SENSOR_PATH, SENSOR_INTERFACE)
        .await
        .map_err(|e| format!("Failed to create sensor proxy: {e}"))?;

    let has_accelerometer: bool = proxy
        .get_property("HasAccelerometer")
        .await
        .map_err(|e| format!("Sensor proxy not reachable: {e}"))?;
    if !has_accelerometer {
        return Err("No accelerometer present".to_string());
    }

    // Claiming powers the sensor up; it stays claimed until this connection
    // goes away.
    let () = proxy
        .call("ClaimAccelerometer", &())
        .await
        .map_err(|e| format!("Failed to claim accelerometer: {e}"))?;
    info!("Accelerometer claimed, watching orientation");

    // Seed with the current reading before waiting for changes
    if let Ok(initial) = proxy.get_property::<String>("AccelerometerOrientation").await
        && let Some(heading) = heading_for_orientation(&initial)
        && output.send(to_message(heading)).await.is_err()
    {
        return Ok(());
    }

    let mut changes = proxy
        .receive_property_changed::<String>("AccelerometerOrientation")
        .await;

    while let Some(change) = changes.next().await {
        let Ok(orientation) = change.get().await else {
            continue;
        };
        debug!(orientation = %orientation, "Accelerometer orientation changed");
        if let Some(heading) = heading_for_orientation(&orientation)
            && output.send(to_message(heading)).await.is_err()
        {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_for_orientation() {
        assert_eq!(heading_for_orientation("normal"), Some(0));
        assert_eq!(heading_for_orientation("right-up"), Some(90));
        assert_eq!(heading_for_orientation("bottom-up"), Some(180));
        assert_eq!(heading_for_orientation("left-up"), Some(270));
        assert_eq!(heading_for_orientation("undefined"), None);
        assert_eq!(heading_for_orientation(""), None);
    }
}
