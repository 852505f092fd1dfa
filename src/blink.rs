//! Status LED liveness blink.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use log::{debug, info};

use crate::config::BLINK_HALF_PERIOD;
use crate::error::{Error, InitStage, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedState {
    On,
    Off,
}

/// Drives a pin that is already configured as a push-pull output. Owning the
/// output type is what keeps the pin direction fixed for the blinker's life.
pub struct Blinker<P, D> {
    pin: P,
    delay: D,
    state: LedState,
}

impl<P, D> Blinker<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// `pin` must be low, as left by the output setup.
    pub fn new(pin: P, delay: D) -> Self {
        Self {
            pin,
            delay,
            state: LedState::Off,
        }
    }

    pub fn state(&self) -> LedState {
        self.state
    }

    fn set(&mut self, state: LedState) -> Result<()> {
        match state {
            LedState::On => self.pin.set_high(),
            LedState::Off => self.pin.set_low(),
        }
        .map_err(|_| Error::Initialization(InitStage::StatusLed))?;
        self.state = state;
        debug!("LED {:?}", state);
        Ok(())
    }

    /// One full period: on, wait, off, wait.
    pub async fn cycle(&mut self) -> Result<()> {
        let half_period_ms = BLINK_HALF_PERIOD.as_millis() as u32;

        self.set(LedState::On)?;
        self.delay.delay_ms(half_period_ms).await;

        self.set(LedState::Off)?;
        self.delay.delay_ms(half_period_ms).await;
        Ok(())
    }

    /// Blinks until a pin write fails, which on working hardware is never.
    pub async fn run(&mut self) -> Result<Infallible> {
        info!(
            "Blinking every {} ms",
            BLINK_HALF_PERIOD.as_millis() * 2
        );
        loop {
            self.cycle().await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use embassy_futures::block_on;
    use embedded_hal::digital::ErrorType;

    use super::*;

    /// Virtual clock in nanoseconds plus every level change seen on the pin.
    #[derive(Default)]
    struct Bench {
        now_ns: u64,
        edges: Vec<(u64, bool)>,
        fail_writes: bool,
    }

    #[derive(Debug)]
    struct PinFault;

    impl embedded_hal::digital::Error for PinFault {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    struct FakePin(Rc<RefCell<Bench>>);

    impl FakePin {
        fn write(&mut self, high: bool) -> core::result::Result<(), PinFault> {
            let mut bench = self.0.borrow_mut();
            if bench.fail_writes {
                return Err(PinFault);
            }
            let now = bench.now_ns;
            bench.edges.push((now, high));
            Ok(())
        }
    }

    impl ErrorType for FakePin {
        type Error = PinFault;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> core::result::Result<(), PinFault> {
            self.write(false)
        }

        fn set_high(&mut self) -> core::result::Result<(), PinFault> {
            self.write(true)
        }
    }

    struct FakeDelay(Rc<RefCell<Bench>>);

    impl DelayNs for FakeDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.0.borrow_mut().now_ns += u64::from(ns);
        }
    }

    fn blinker() -> (Blinker<FakePin, FakeDelay>, Rc<RefCell<Bench>>) {
        let bench = Rc::new(RefCell::new(Bench::default()));
        let blinker = Blinker::new(FakePin(bench.clone()), FakeDelay(bench.clone()));
        (blinker, bench)
    }

    const MS: u64 = 1_000_000;

    #[test]
    fn starts_off_until_the_first_cycle() {
        let (blinker, bench) = blinker();
        assert_eq!(blinker.state(), LedState::Off);
        assert!(bench.borrow().edges.is_empty());
    }

    #[test]
    fn first_edge_is_high_right_after_setup() {
        let (mut blinker, bench) = blinker();
        block_on(blinker.cycle()).unwrap();
        assert_eq!(bench.borrow().edges[0], (0, true));
    }

    #[test]
    fn alternates_every_half_period() {
        let (mut blinker, bench) = blinker();
        for _ in 0..4 {
            block_on(blinker.cycle()).unwrap();
        }

        let bench = bench.borrow();
        assert_eq!(bench.edges.len(), 8);
        for (i, (at, high)) in bench.edges.iter().enumerate() {
            assert_eq!(*at, i as u64 * 500 * MS);
            assert_eq!(*high, i % 2 == 0);
        }
        assert_eq!(bench.now_ns, 4 * 1000 * MS);
        assert_eq!(blinker.state(), LedState::Off);
    }

    #[test]
    fn pin_fault_is_a_status_led_failure() {
        let (mut blinker, bench) = blinker();
        bench.borrow_mut().fail_writes = true;
        assert_eq!(
            block_on(blinker.cycle()),
            Err(Error::Initialization(InitStage::StatusLed))
        );
        assert_eq!(blinker.state(), LedState::Off);
        assert_eq!(bench.borrow().now_ns, 0);
    }

    #[test]
    fn run_stops_only_on_a_pin_fault() {
        let (mut blinker, bench) = blinker();
        bench.borrow_mut().fail_writes = true;
        assert!(block_on(blinker.run()).is_err());
    }
}
