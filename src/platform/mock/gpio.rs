//! Mock GPIO implementation for testing

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};

/// Mock GPIO implementation
///
/// Tracks level and mode for test verification. A fresh output starts
/// high, matching a standby line pulled up at reset.
#[derive(Debug)]
pub struct MockGpio {
    state: bool,
    mode: GpioMode,
}

impl MockGpio {
    pub fn new_output() -> Self {
        Self {
            state: true,
            mode: GpioMode::OutputPushPull,
        }
    }

    pub fn new_input() -> Self {
        Self {
            state: false,
            mode: GpioMode::Input,
        }
    }

    /// Simulate an external level on an input
    pub fn set_input_state(&mut self, high: bool) {
        self.state = high;
    }

    fn drive(&mut self, high: bool) -> Result<()> {
        match self.mode {
            GpioMode::OutputPushPull => {
                self.state = high;
                Ok(())
            }
            GpioMode::Input => Err(PlatformError::Gpio(GpioError::InvalidMode)),
        }
    }
}

impl GpioInterface for MockGpio {
    fn set_high(&mut self) -> Result<()> {
        self.drive(true)
    }

    fn set_low(&mut self) -> Result<()> {
        self.drive(false)
    }

    fn read(&self) -> bool {
        self.state
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
