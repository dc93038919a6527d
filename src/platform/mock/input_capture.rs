//! Mock edge capture for testing
//!
//! Records the handlers armed through `begin` and replays edges into them
//! as if the capture interrupt had fired.

use heapless::Vec;
use lighthouse_tracker_core::lighthouse::types::EdgePolarity;

use crate::platform::{
    error::{GpioError, InputCaptureError, PlatformError},
    traits::{EdgeHandler, InputCaptureInterface},
    Result,
};

/// Number of GPIOs the mock accepts
pub const MOCK_PIN_COUNT: u8 = 48;

/// Capture channels available
pub const MOCK_CAPTURE_CHANNELS: usize = 8;

struct Registration<'a> {
    pin: u8,
    polarity: EdgePolarity,
    handler: EdgeHandler<'a>,
}

/// Mock input capture peripheral
pub struct MockInputCapture<'a> {
    registrations: Vec<Registration<'a>, MOCK_CAPTURE_CHANNELS>,
}

impl<'a> MockInputCapture<'a> {
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Number of armed pins
    pub fn armed(&self) -> usize {
        self.registrations.len()
    }

    /// Polarity `pin` is armed for, if any
    pub fn polarity_of(&self, pin: u8) -> Option<EdgePolarity> {
        self.registrations
            .iter()
            .find(|r| r.pin == pin)
            .map(|r| r.polarity)
    }

    /// Fire the capture interrupt of `pin` at `tick`
    ///
    /// Returns `false` if nothing is armed on the pin.
    pub fn trigger(&self, pin: u8, tick: u32) -> bool {
        match self.registrations.iter().find(|r| r.pin == pin) {
            Some(registration) => {
                registration.handler.dispatch(registration.polarity, tick);
                true
            }
            None => false,
        }
    }

    /// Replay one light pulse seen by `sensor`
    ///
    /// The photodiode output is active low: the falling edge marks the start
    /// of the pulse and the rising edge its end.
    pub fn pulse(&self, sensor: usize, start_tick: u32, width_ticks: u32) -> bool {
        let falling = self.pin_for(sensor, EdgePolarity::Falling);
        let rising = self.pin_for(sensor, EdgePolarity::Rising);
        match (falling, rising) {
            (Some(falling), Some(rising)) => {
                self.trigger(falling, start_tick);
                self.trigger(rising, start_tick.wrapping_add(width_ticks));
                true
            }
            _ => false,
        }
    }

    fn pin_for(&self, sensor: usize, polarity: EdgePolarity) -> Option<u8> {
        self.registrations
            .iter()
            .find(|r| r.handler.sensor() == sensor && r.polarity == polarity)
            .map(|r| r.pin)
    }
}

impl Default for MockInputCapture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> InputCaptureInterface<'a> for MockInputCapture<'a> {
    fn begin(&mut self, pin: u8, polarity: EdgePolarity, handler: EdgeHandler<'a>) -> Result<()> {
        if pin >= MOCK_PIN_COUNT {
            return Err(InputCaptureError::InvalidPin.into());
        }
        if self.registrations.iter().any(|r| r.pin == pin) {
            return Err(PlatformError::Gpio(GpioError::PinInUse));
        }
        self.registrations
            .push(Registration {
                pin,
                polarity,
                handler,
            })
            .map_err(|_| InputCaptureError::TooManyHandlers.into())
    }
}
