//! Advertising and scan response payloads.
//!
//! Advertising data carries the flags, the 128-bit service UUID and the
//! preferred connection interval range. The name goes in the scan response,
//! which active scanners always request.

use trouble_host::prelude::*;

use crate::config::{
    DEVICE_NAME, PREFERRED_CONN_INTERVAL_MAX, PREFERRED_CONN_INTERVAL_MIN, SERVICE_UUID_BYTES,
};
use crate::error::{AdvertisingStage, Error, Result};

/// Maximum size of a legacy advertising or scan response payload.
pub const LEGACY_PAYLOAD_MAX: usize = 31;

/// AD type of the Peripheral Connection Interval Range structure.
pub const PERIPHERAL_CONN_INTERVAL_RANGE: u8 = 0x12;

pub struct AdvertisingPayload {
    adv_data: [u8; LEGACY_PAYLOAD_MAX],
    adv_len: usize,
    scan_data: [u8; LEGACY_PAYLOAD_MAX],
    scan_len: usize,
}

impl AdvertisingPayload {
    pub fn new() -> Result<Self> {
        let mut adv_data = [0; LEGACY_PAYLOAD_MAX];
        let mut scan_data = [0; LEGACY_PAYLOAD_MAX];

        let interval_range = conn_interval_range(
            PREFERRED_CONN_INTERVAL_MIN,
            PREFERRED_CONN_INTERVAL_MAX,
        );

        let adv_len = AdStructure::encode_slice(
            &[
                AdStructure::Flags(LE_GENERAL_DISCOVERABLE | BR_EDR_NOT_SUPPORTED),
                AdStructure::ServiceUuids128(&[SERVICE_UUID_BYTES]),
                AdStructure::Unknown {
                    ty: PERIPHERAL_CONN_INTERVAL_RANGE,
                    data: &interval_range,
                },
            ],
            &mut adv_data,
        )
        .map_err(|_| Error::Advertising(AdvertisingStage::Encode))?;

        let scan_len = AdStructure::encode_slice(
            &[AdStructure::CompleteLocalName(DEVICE_NAME.as_bytes())],
            &mut scan_data,
        )
        .map_err(|_| Error::Advertising(AdvertisingStage::Encode))?;

        Ok(Self {
            adv_data,
            adv_len,
            scan_data,
            scan_len,
        })
    }

    pub fn adv_data(&self) -> &[u8] {
        &self.adv_data[..self.adv_len]
    }

    pub fn scan_data(&self) -> &[u8] {
        &self.scan_data[..self.scan_len]
    }

    pub fn advertisement(&self) -> Advertisement<'_> {
        Advertisement::ConnectableScannableUndirected {
            adv_data: self.adv_data(),
            scan_data: self.scan_data(),
        }
    }
}

/// Min and max connection interval, both little-endian u16 in 1.25 ms units.
fn conn_interval_range(min: u16, max: u16) -> [u8; 4] {
    let [min_lo, min_hi] = min.to_le_bytes();
    let [max_lo, max_hi] = max.to_le_bytes();
    [min_lo, min_hi, max_lo, max_hi]
}
