//! RTT console shared by both images.

use log::Log;
use rtt_target::{rprintln, rtt_init_print};

use crate::config::LOG_LEVEL;

#[panic_handler]
fn panic(e: &core::panic::PanicInfo) -> ! {
    rprintln!("PANIC: {}", e);
    loop {}
}

struct RttLogger;

impl Log for RttLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= LOG_LEVEL
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            rprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: RttLogger = RttLogger;

/// Sets up the RTT channel and installs the logger. Call once, first thing.
pub fn init() {
    rtt_init_print!();
    // only fails if a logger is already installed, in which case keep it
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LOG_LEVEL);
    }
}
