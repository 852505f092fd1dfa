use core::convert::Infallible;
use core::fmt::Debug;

use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Timer};
use log::{info, warn};
use static_cell::StaticCell;
use trouble_host::gatt::GattConnectionEvent;
use trouble_host::prelude::*;

use crate::address::MacAddress;
use crate::adv::AdvertisingPayload;
use crate::config::{ADVERTISING_INTERVAL, ADVERTISING_RETRY_DELAY, DEVICE_NAME, SERVICE_UUID};
use crate::error::{AdvertisingStage, Error, Result};
use crate::gatt::TagServer;

const CONNECTIONS_MAX: usize = 1;
const L2CAP_CHANNELS_MAX: usize = 2;

static RESOURCES: StaticCell<
    HostResources<DefaultPacketPool, CONNECTIONS_MAX, L2CAP_CHANNELS_MAX>,
> = StaticCell::new();

static SERVER: StaticCell<TagServer<'static>> = StaticCell::new();

/// Advertiser life cycle. There is no way back to `Idle`: once advertising
/// has started the device re-advertises after every disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvertiserState {
    Idle,
    Advertising,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvertiserEvent {
    Started,
    StartFailed(Error),
    /// Accept failed, the GATT server could not attach, or the client left.
    SessionEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// First successful start.
    Announce,
    /// Started again after a session.
    Resume,
    Retry(Duration),
    Advertise,
    Stop(Error),
}

impl AdvertiserState {
    /// Returns `true` when this call made the transition.
    pub fn start(&mut self) -> bool {
        let first = *self == AdvertiserState::Idle;
        *self = AdvertiserState::Advertising;
        first
    }

    pub fn on(&mut self, event: AdvertiserEvent) -> Action {
        match event {
            AdvertiserEvent::Started if self.start() => Action::Announce,
            AdvertiserEvent::Started => Action::Resume,
            AdvertiserEvent::StartFailed(err) if err.is_retryable() => {
                Action::Retry(ADVERTISING_RETRY_DELAY)
            }
            AdvertiserEvent::StartFailed(err) => Action::Stop(err),
            AdvertiserEvent::SessionEnded => Action::Advertise,
        }
    }
}

/// The host runner only returns when the stack is gone.
pub fn host_stopped<E: Debug>(res: core::result::Result<(), E>) -> Error {
    match res {
        Ok(()) => warn!("BLE host stopped"),
        Err(e) => warn!("BLE host failed: {:?}", e),
    }
    Error::Advertising(AdvertisingStage::Host)
}

pub fn advertising_parameters() -> AdvertisementParameters {
    AdvertisementParameters {
        interval_min: ADVERTISING_INTERVAL,
        interval_max: ADVERTISING_INTERVAL,
        ..Default::default()
    }
}

/// Runs the tag peripheral. Returns only on a fatal error.
pub async fn run<C>(controller: C, address: MacAddress) -> Result<Infallible>
where
    C: Controller,
{
    info!("Starting BLE stack as '{}' ({})", DEVICE_NAME, address);

    let resources = RESOURCES.init(HostResources::new());
    let stack =
        trouble_host::new(controller, resources).set_random_address(Address::random(address.bytes()));

    let Host {
        mut peripheral,
        mut runner,
        ..
    } = stack.build();

    let server: &'static TagServer<'static> = SERVER.init(TagServer::build()?);
    let payload = AdvertisingPayload::new()?;
    info!("Service {:?} ready", SERVICE_UUID);

    match select(runner.run(), advertise(&mut peripheral, server, &payload)).await {
        Either::First(res) => Err(host_stopped(res)),
        Either::Second(res) => res,
    }
}

async fn advertise<C>(
    peripheral: &mut Peripheral<'_, C, DefaultPacketPool>,
    server: &'static TagServer<'static>,
    payload: &AdvertisingPayload,
) -> Result<Infallible>
where
    C: Controller,
{
    let params = advertising_parameters();
    let mut state = AdvertiserState::Idle;

    loop {
        let advertiser = match peripheral.advertise(&params, payload.advertisement()).await {
            Ok(advertiser) => advertiser,
            Err(e) => {
                warn!("Advertising start failed: {:?}", e);
                let failed = Error::Advertising(AdvertisingStage::Start);
                match state.on(AdvertiserEvent::StartFailed(failed)) {
                    Action::Retry(delay) => Timer::after(delay).await,
                    Action::Stop(err) => return Err(err),
                    _ => {}
                }
                continue;
            }
        };

        match state.on(AdvertiserEvent::Started) {
            Action::Announce => info!("Now advertising as '{}'", DEVICE_NAME),
            _ => info!("Advertising again"),
        }

        let connection = match advertiser.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Accept failed: {:?}", e);
                state.on(AdvertiserEvent::SessionEnded);
                continue;
            }
        };

        match connection.with_attribute_server(server) {
            Ok(conn) => serve(server, &conn).await,
            Err(e) => warn!("Failed to attach GATT server: {:?}", e),
        }

        if let Action::Stop(err) = state.on(AdvertiserEvent::SessionEnded) {
            return Err(err);
        }
    }
}

/// Answers GATT requests until the client disconnects.
async fn serve<P: PacketPool>(server: &TagServer<'_>, conn: &GattConnection<'_, '_, P>) {
    info!("Client connected");
    loop {
        match conn.next().await {
            GattConnectionEvent::Disconnected { reason } => {
                info!("Client disconnected: {:?}", reason);
                break;
            }
            GattConnectionEvent::Gatt { event } => {
                if let GattEvent::Write(write) = &event {
                    if write.handle() == server.tag_service.label.handle {
                        info!("Label overwritten with {} bytes", write.data().len());
                    }
                }
                match event.accept() {
                    Ok(reply) => reply.send().await,
                    Err(e) => warn!("Failed to answer GATT request: {:?}", e),
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_to_advertising_happens_once() {
        let mut state = AdvertiserState::Idle;
        assert!(state.start());
        assert_eq!(state, AdvertiserState::Advertising);
        assert!(!state.start());
        assert_eq!(state, AdvertiserState::Advertising);
    }

    #[test]
    fn first_start_is_announced_later_ones_resume() {
        let mut state = AdvertiserState::Idle;
        assert_eq!(state.on(AdvertiserEvent::Started), Action::Announce);
        assert_eq!(state.on(AdvertiserEvent::SessionEnded), Action::Advertise);
        assert_eq!(state, AdvertiserState::Advertising);
        assert_eq!(state.on(AdvertiserEvent::Started), Action::Resume);
    }

    #[test]
    fn start_failure_waits_and_retries() {
        let mut state = AdvertiserState::Idle;
        let failed = AdvertiserEvent::StartFailed(Error::Advertising(AdvertisingStage::Start));
        assert_eq!(state.on(failed), Action::Retry(ADVERTISING_RETRY_DELAY));
        assert_eq!(ADVERTISING_RETRY_DELAY, Duration::from_secs(1));
        // a failed start does not count as having advertised
        assert_eq!(state, AdvertiserState::Idle);
        assert_eq!(state.on(AdvertiserEvent::Started), Action::Announce);
    }

    #[test]
    fn fatal_failures_stop_the_advertiser() {
        let mut state = AdvertiserState::Advertising;
        let encode = Error::Advertising(AdvertisingStage::Encode);
        assert_eq!(
            state.on(AdvertiserEvent::StartFailed(encode)),
            Action::Stop(encode)
        );
    }

    #[test]
    fn every_session_end_advertises_again() {
        let mut state = AdvertiserState::Idle;
        state.on(AdvertiserEvent::Started);
        for _ in 0..3 {
            assert_eq!(state.on(AdvertiserEvent::SessionEnded), Action::Advertise);
            assert_eq!(state.on(AdvertiserEvent::Started), Action::Resume);
        }
    }

    #[test]
    fn host_runner_exit_is_an_advertising_failure() {
        let stopped: core::result::Result<(), &str> = Ok(());
        let failed: core::result::Result<(), &str> = Err("controller gone");
        assert_eq!(host_stopped(stopped), Error::Advertising(AdvertisingStage::Host));
        assert_eq!(host_stopped(failed), Error::Advertising(AdvertisingStage::Host));
    }

    #[test]
    fn advertises_at_a_fixed_interval() {
        let params = advertising_parameters();
        assert_eq!(params.interval_min, ADVERTISING_INTERVAL);
        assert_eq!(params.interval_max, ADVERTISING_INTERVAL);
    }
}
