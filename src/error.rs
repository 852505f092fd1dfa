use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Bring-up step that failed. Any of these leaves the device without its
/// function, so they are fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStage {
    Mpsl,
    Controller,
    GattServer,
    StatusLed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvertisingStage {
    /// Payload does not fit a legacy advertising PDU.
    Encode,
    /// The controller refused to start advertising. Retried.
    Start,
    /// The host runner stopped.
    Host,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("initialization failed at {0:?}")]
    Initialization(InitStage),
    #[error("advertising failed at {0:?}")]
    Advertising(AdvertisingStage),
}

impl Error {
    /// Whether the advertiser should wait and try again instead of giving up.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Advertising(AdvertisingStage::Start))
    }
}
