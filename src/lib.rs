#![cfg_attr(not(test), no_std)]

pub mod address;
pub mod adv;
pub mod ble;
pub mod blink;
pub mod config;
pub mod error;
pub mod gatt;

#[cfg(feature = "firmware")]
pub mod logging;
#[cfg(feature = "firmware")]
pub mod nrf;

pub use error::{AdvertisingStage, Error, InitStage, Result};
