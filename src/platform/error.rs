//! Platform error types
//!
//! Platform implementations map their HAL-specific errors to these variants.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// Edge capture registration failed
    InputCapture(InputCaptureError),
    /// I2C operation failed
    I2c(I2cError),
    /// GPIO operation failed
    Gpio(GpioError),
}

/// Edge capture errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputCaptureError {
    /// Pin cannot be routed to a capture channel
    InvalidPin,
    /// All capture channels are in use
    TooManyHandlers,
    /// Photodiode index outside the board
    InvalidSensor,
}

/// I2C-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cError {
    /// Bus stuck or arbitration lost
    BusError,
    /// No acknowledgment received
    Nack,
    /// Timeout occurred
    Timeout,
}

/// GPIO-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Invalid pin number
    InvalidPin,
    /// Invalid mode for operation
    InvalidMode,
    /// Pin already in use
    PinInUse,
}

impl InputCaptureError {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputCaptureError::InvalidPin => "pin has no capture channel",
            InputCaptureError::TooManyHandlers => "no free capture channel",
            InputCaptureError::InvalidSensor => "photodiode index out of range",
        }
    }
}

impl I2cError {
    pub fn as_str(&self) -> &'static str {
        match self {
            I2cError::BusError => "bus error",
            I2cError::Nack => "no acknowledge",
            I2cError::Timeout => "timeout",
        }
    }
}

impl GpioError {
    pub fn as_str(&self) -> &'static str {
        match self {
            GpioError::InvalidPin => "invalid pin",
            GpioError::InvalidMode => "invalid pin mode",
            GpioError::PinInUse => "pin already in use",
        }
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::InputCapture(e) => write!(f, "Input capture error: {}", e.as_str()),
            PlatformError::I2c(e) => write!(f, "I2C error: {}", e.as_str()),
            PlatformError::Gpio(e) => write!(f, "GPIO error: {}", e.as_str()),
        }
    }
}

impl From<InputCaptureError> for PlatformError {
    fn from(e: InputCaptureError) -> Self {
        PlatformError::InputCapture(e)
    }
}

impl From<GpioError> for PlatformError {
    fn from(e: GpioError) -> Self {
        PlatformError::Gpio(e)
    }
}
