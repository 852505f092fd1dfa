#![no_std]
#![no_main]

use embassy_executor::Spawner;
use log::{error, info};

use tag_firmware::nrf::{self, BleResources};
use tag_firmware::{ble, logging, take_ble_resources};

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    logging::init();
    info!("Booting up");

    let p = embassy_nrf::init(Default::default());

    let address = nrf::device_address();
    info!("MAC address: {}", address);

    let ble_resources = take_ble_resources!(p);
    let sdc = match nrf::init_ble(ble_resources, spawner) {
        Ok(sdc) => sdc,
        Err(e) => {
            error!("{}", e);
            panic!("BLE bring-up failed: {}", e);
        }
    };

    if let Err(e) = ble::run(sdc, address).await {
        error!("{}", e);
        panic!("advertiser stopped: {}", e);
    }
}
