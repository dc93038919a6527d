//! Edge capture interface
//!
//! Each photodiode output is wired to two capture pins, one armed for the
//! falling edge (light on) and one for the rising edge (light off). The
//! capture timer stamps every edge with a free-running 48 MHz tick and calls
//! the registered handler from interrupt context.
//!
//! Handlers are plain `(sink, sensor)` pairs rather than closures so they
//! can be stored in fixed-size tables without allocation.

use lighthouse_tracker_core::lighthouse::types::EdgePolarity;

use crate::platform::Result;

/// Receiver of timestamped photodiode edges
///
/// Called from interrupt context: implementations must not block.
pub trait EdgeSink {
    fn on_edge(&self, sensor: usize, polarity: EdgePolarity, tick: u32);
}

/// Callback target bound to one photodiode
#[derive(Clone, Copy)]
pub struct EdgeHandler<'a> {
    sink: &'a dyn EdgeSink,
    sensor: usize,
}

impl<'a> EdgeHandler<'a> {
    pub fn new(sink: &'a dyn EdgeSink, sensor: usize) -> Self {
        Self { sink, sensor }
    }

    pub fn sensor(&self) -> usize {
        self.sensor
    }

    /// Deliver one captured edge
    pub fn dispatch(&self, polarity: EdgePolarity, tick: u32) {
        self.sink.on_edge(self.sensor, polarity, tick);
    }
}

/// Timer input-capture peripheral
pub trait InputCaptureInterface<'a> {
    /// Arm `pin` for `polarity` edges and route them to `handler`
    ///
    /// # Errors
    ///
    /// - `InputCaptureError::InvalidPin` if the pin has no capture channel
    /// - `InputCaptureError::TooManyHandlers` if every channel is taken
    /// - `GpioError::PinInUse` if the pin is already armed
    fn begin(&mut self, pin: u8, polarity: EdgePolarity, handler: EdgeHandler<'a>) -> Result<()>;
}
