//! Pulse-train builders shared by the receiver and tracker tests

use lighthouse_tracker_core::lighthouse::ootx::encode_frame;
use lighthouse_tracker_core::lighthouse::types::Axis;
use lighthouse_tracker_core::lighthouse::SyncBits;

use crate::platform::mock::MockInputCapture;

/// Self-period of one base station, ticks
pub const PERIOD_TICKS: u32 = 400_000;

/// Width of a sync pulse carrying the given bits
pub fn sync_width(skip: bool, data: bool, axis: Axis) -> u32 {
    SyncBits { skip, data, axis }.width_ticks()
}

/// Send one OOTX frame announcing `mode` with a level station through sync
/// pulses on photodiode 0
///
/// Returns the tick of the next sync slot.
pub fn feed_ootx_frame(capture: &MockInputCapture<'_>, start: u32, mode: u8) -> u32 {
    let mut payload = [0u8; 33];
    payload[21] = 127;
    payload[31] = mode;

    let mut t = start;
    for (i, bit) in encode_frame(&payload).enumerate() {
        let axis = if i % 2 == 0 { Axis::Horizontal } else { Axis::Vertical };
        capture.pulse(0, t, sync_width(false, bit, axis));
        t += PERIOD_TICKS;
    }
    t
}
