#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_nrf::gpio::{Level, Output, OutputDrive, Pin};
use embassy_time::Delay;
use log::{error, info};

use tag_firmware::blink::Blinker;
use tag_firmware::nrf::StatusLedResources;
use tag_firmware::{logging, take_status_led_resources};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    logging::init();
    info!("Hello, World!");

    let p = embassy_nrf::init(Default::default());
    let leds = take_status_led_resources!(p);

    info!("Status LED on GPIO {}", leds.led.pin());

    // Output::new resets the pin config and leaves it driven low.
    let led = Output::new(leds.led, Level::Low, OutputDrive::Standard);

    let mut blinker = Blinker::new(led, Delay);
    if let Err(e) = blinker.run().await {
        error!("{}", e);
        panic!("status LED failed: {}", e);
    }
}
