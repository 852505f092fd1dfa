use trouble_host::prelude::*;

use crate::config::{CHARACTERISTIC_UUID, DEVICE_NAME, INITIAL_VALUE, LABEL_CAPACITY, SERVICE_UUID};
use crate::error::{Error, InitStage, Result};

/// Variable-length characteristic value; a write replaces it whole.
pub type Label = heapless::Vec<u8, LABEL_CAPACITY>;

#[gatt_server]
pub struct TagServer {
    pub tag_service: TagService,
}

#[gatt_service(uuid = SERVICE_UUID)]
pub struct TagService {
    /// Readable and writable; nothing on the device reads it back after a write.
    #[characteristic(uuid = CHARACTERISTIC_UUID, read, write)]
    pub label: Label,
}

impl TagServer<'_> {
    /// Builds the attribute table with the label set to `INITIAL_VALUE`.
    pub fn build() -> Result<Self> {
        let server = Self::new_with_config(GapConfig::Peripheral(PeripheralConfig {
            name: DEVICE_NAME,
            appearance: &appearance::tag::GENERIC_TAG,
        }))
        .map_err(|_| Error::Initialization(InitStage::GattServer))?;

        let initial = Label::from_slice(INITIAL_VALUE)
            .map_err(|_| Error::Initialization(InitStage::GattServer))?;
        server
            .tag_service
            .label
            .set(&server, &initial)
            .map_err(|_| Error::Initialization(InitStage::GattServer))?;
        Ok(server)
    }

    /// Current value of the characteristic as a client would read it.
    pub fn label(&self) -> Option<Label> {
        self.tag_service.label.get(self).ok()
    }
}
