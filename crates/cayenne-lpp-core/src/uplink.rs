//! LoRaWAN wireless uplink events.
//!
//! An uplink event carries the LPP payload as base64 next to device and
//! gateway metadata. Processing decodes the payload and flattens the
//! telemetry into a single record keyed by the device EUI.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::codec::{LppError, decode};
use crate::payload::{PayloadError, from_base64};
use crate::telemetry::Telemetry;

#[derive(Debug, Error)]
pub enum UplinkError {
    #[error("payload error: {0}")]
    Payload(#[from] PayloadError),
    #[error("decode error: {0}")]
    Decode(#[from] LppError),
}

/// Uplink event as delivered by the LoRaWAN network server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UplinkEvent {
    /// Base64 LPP payload.
    pub payload_data: String,
    pub wireless_metadata: WirelessMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirelessMetadata {
    #[serde(rename = "LoRaWAN")]
    pub lorawan: LoRaWanMetadata,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoRaWanMetadata {
    pub dev_eui: String,
    /// Network server receive time (RFC 3339).
    pub timestamp: String,
    #[serde(default)]
    pub gateways: Vec<GatewayMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GatewayMetadata {
    pub gateway_eui: String,
    #[serde(default)]
    pub rssi: Option<f64>,
    #[serde(default)]
    pub snr: Option<f64>,
}

/// Decoded uplink, ready for storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UplinkRecord {
    /// Local receive time, milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(rename = "DevEUI")]
    pub dev_eui: String,
    #[serde(rename = "DeviceId")]
    pub device_id: String,
    /// Network server timestamp copied from the event.
    pub datetime: String,
    #[serde(flatten)]
    pub telemetry: Telemetry,
}

/// Decode an uplink event into a record stamped with `received_at_ms`.
///
/// # Examples
/// ```
/// use cayenne_lpp_core::{UplinkEvent, process_uplink};
///
/// let event: UplinkEvent = serde_json::from_str(r#"{
///     "PayloadData": "A2cBEA==",
///     "WirelessMetadata": {"LoRaWAN": {"DevEui": "a84041000181c061", "Timestamp": "2024-01-01T00:00:00Z"}}
/// }"#).unwrap();
/// let record = process_uplink(&event, 1_700_000_000_000).unwrap();
/// assert_eq!(record.device_id, "a84041000181c061");
/// assert_eq!(record.telemetry.temperature.map(|t| t.as_f64()), Some(27.2));
/// ```
#[instrument(skip(event), fields(dev_eui = %event.wireless_metadata.lorawan.dev_eui))]
pub fn process_uplink(event: &UplinkEvent, received_at_ms: i64) -> Result<UplinkRecord, UplinkError> {
    let lorawan = &event.wireless_metadata.lorawan;
    for gateway in &lorawan.gateways {
        debug!(
            gateway_eui = %gateway.gateway_eui,
            rssi = ?gateway.rssi,
            snr = ?gateway.snr,
            "uplink received by gateway"
        );
    }

    let payload = from_base64(&event.payload_data)?;
    debug!(payload_size = payload.len(), "decoding uplink payload");
    let readings = decode(&payload)?;

    Ok(UplinkRecord {
        timestamp: received_at_ms,
        dev_eui: lorawan.dev_eui.clone(),
        device_id: lorawan.dev_eui.clone(),
        datetime: lorawan.timestamp.clone(),
        telemetry: Telemetry::from_readings(&readings),
    })
}
