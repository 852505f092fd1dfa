//! Fixed identity and timing of both firmware images.
//!
//! Nothing here is read at runtime from flash or the environment, so every
//! power cycle comes up with the same name, UUIDs and initial value.

use embassy_time::Duration;
use log::LevelFilter;
use trouble_host::prelude::Uuid;

/// GAP device name, also sent as the complete local name in the scan response.
pub const DEVICE_NAME: &str = "TAG";

/// `4fafc201-1fb5-459e-8fcc-c5c9c331914b`, little-endian as sent on air.
pub const SERVICE_UUID_BYTES: [u8; 16] = [
    0x4b, 0x91, 0x31, 0xc3, 0xc9, 0xc5, // c5c9c331914b
    0xcc, 0x8f, // 8fcc
    0x9e, 0x45, // 459e
    0xb5, 0x1f, // 1fb5
    0x01, 0xc2, 0xaf, 0x4f, // 4fafc201
];

pub const SERVICE_UUID: Uuid = Uuid::Uuid128(SERVICE_UUID_BYTES);

/// `beb5483e-36e1-4688-b7f5-ea07361b26a8`
pub const CHARACTERISTIC_UUID_BYTES: [u8; 16] = [
    0xa8, 0x26, 0x1b, 0x36, 0x07, 0xea, // ea07361b26a8
    0xf5, 0xb7, // b7f5
    0x88, 0x46, // 4688
    0xe1, 0x36, // 36e1
    0x3e, 0x48, 0xb5, 0xbe, // beb5483e
];

pub const CHARACTERISTIC_UUID: Uuid = Uuid::Uuid128(CHARACTERISTIC_UUID_BYTES);

/// Value of the characteristic before any client writes to it.
pub const INITIAL_VALUE: &[u8] = b"Hello World";

/// Longest value a client may store in the characteristic.
pub const LABEL_CAPACITY: usize = 64;

/// Preferred connection interval hints, in units of 1.25 ms (7.5 ms .. 22.5 ms).
/// iOS centrals are slow to connect without them.
pub const PREFERRED_CONN_INTERVAL_MIN: u16 = 0x06;
pub const PREFERRED_CONN_INTERVAL_MAX: u16 = 0x12;

pub const ADVERTISING_INTERVAL: Duration = Duration::from_millis(100);
pub const ADVERTISING_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Time the LED spends in each state; a full blink takes twice this.
pub const BLINK_HALF_PERIOD: Duration = Duration::from_millis(500);

pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;
