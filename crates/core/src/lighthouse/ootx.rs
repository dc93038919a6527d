//! OOTX frame decoder
//!
//! Base stations transmit a slow telemetry frame one bit per sync pulse.
//! The stream is a preamble of 17 zeros and a one, followed by 17-bit words:
//! 16 data bits (most significant first) and a trailing sync bit that must
//! be 1. The first word is the byte-swapped payload length, then the payload
//! and a CRC-32 follow two bytes per word.
//!
//! Any malformed bit or failed sync bit drops the in-flight frame and the
//! decoder goes back to scanning for a preamble.

use crc::{Crc, CRC_32_ISO_HDLC};
use heapless::Vec;

use super::types::BaseStationMode;
use crate::log_warn;

/// Payload buffer capacity in bytes
pub const OOTX_BUFFER_LEN: usize = 256;

/// Byte count collected when the declared length does not fit the buffer
pub const OOTX_FALLBACK_LEN: usize = 33;

const CRC_LEN: usize = 4;
const PREAMBLE_BITS: u8 = 18;
const PREAMBLE: u32 = 0x1;
const PREAMBLE_MASK: u32 = (1 << PREAMBLE_BITS) - 1;
const WORD_BITS: u8 = 17;

// Fixed payload offsets
const FW_VERSION_OFFSET: usize = 0;
const STATION_ID_OFFSET: usize = 2;
const HW_VERSION_OFFSET: usize = 15;
const ACCEL_DIR_OFFSET: usize = 20;
const MODE_OFFSET: usize = 31;

static CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Preamble,
    Length,
    Payload,
}

/// Decoded base-station telemetry frame
#[derive(Debug, Clone, PartialEq)]
pub struct OotxFrame {
    pub firmware_version: u16,
    pub protocol_version: u8,
    pub station_id: u32,
    pub hardware_version: u8,
    /// Raw signed accelerometer direction (x, y, z)
    pub accel_dir: [i8; 3],
    /// Base-station pitch from its accelerometer, degrees
    pub pitch_deg: f64,
    /// Base-station roll from its accelerometer, degrees
    pub roll_deg: f64,
    pub mode_byte: u8,
    /// `None` when the mode byte is outside 0..=2
    pub mode: Option<BaseStationMode>,
    /// Payload length as declared in the length word
    pub payload_len: usize,
    /// True when the declared length was replaced by the fallback size
    pub clamped: bool,
    /// Every byte collected for this frame (payload, CRC, padding)
    pub bytes: Vec<u8, OOTX_BUFFER_LEN>,
}

impl OotxFrame {
    fn from_bytes(buffer: &[u8; OOTX_BUFFER_LEN], received: usize, payload_len: usize, clamped: bool) -> Self {
        let received = received.min(OOTX_BUFFER_LEN);
        let mut bytes = Vec::new();
        // received never exceeds the buffer capacity
        let _ = bytes.extend_from_slice(&buffer[..received]);

        let mut frame = Self {
            firmware_version: 0,
            protocol_version: 0,
            station_id: 0,
            hardware_version: 0,
            accel_dir: [0; 3],
            pitch_deg: 0.0,
            roll_deg: 0.0,
            mode_byte: 0,
            mode: None,
            payload_len,
            clamped,
            bytes,
        };

        // Short frames keep zeroed telemetry and no mode
        if !frame.has_telemetry() {
            return frame;
        }

        let first16 = u16::from_le_bytes([buffer[FW_VERSION_OFFSET], buffer[FW_VERSION_OFFSET + 1]]);
        frame.firmware_version = (first16 & 0xFFC0) >> 6;
        frame.protocol_version = (first16 & 0x3F) as u8;
        frame.station_id = u32::from_le_bytes([
            buffer[STATION_ID_OFFSET],
            buffer[STATION_ID_OFFSET + 1],
            buffer[STATION_ID_OFFSET + 2],
            buffer[STATION_ID_OFFSET + 3],
        ]);
        frame.hardware_version = buffer[HW_VERSION_OFFSET];
        frame.accel_dir = [
            buffer[ACCEL_DIR_OFFSET] as i8,
            buffer[ACCEL_DIR_OFFSET + 1] as i8,
            buffer[ACCEL_DIR_OFFSET + 2] as i8,
        ];
        (frame.pitch_deg, frame.roll_deg) = tilt_from_accel_dir(frame.accel_dir);
        frame.mode_byte = buffer[MODE_OFFSET];
        frame.mode = BaseStationMode::from_byte(frame.mode_byte);
        frame
    }

    /// True when the payload is long enough to carry the mode byte and
    /// every field before it
    pub fn has_telemetry(&self) -> bool {
        self.payload_len > MODE_OFFSET && self.bytes.len() > MODE_OFFSET
    }

    /// Check the trailing little-endian CRC-32 against the payload
    ///
    /// Informational only; the decoder accepts frames either way. A frame
    /// whose length was clamped never matches.
    pub fn crc_matches(&self) -> bool {
        if self.clamped || self.bytes.len() < self.payload_len + CRC_LEN {
            return false;
        }
        let payload = &self.bytes[..self.payload_len];
        let crc = &self.bytes[self.payload_len..self.payload_len + CRC_LEN];
        let expected = u32::from_le_bytes([crc[0], crc[1], crc[2], crc[3]]);
        CRC32.checksum(payload) == expected
    }
}

/// Pitch and roll in degrees from a signed accelerometer direction
///
/// The direction is normalized first. `sign(0)` is taken as 0, so a zero
/// y component yields a pitch of ±90 or 0.
pub fn tilt_from_accel_dir(dir: [i8; 3]) -> (f64, f64) {
    let mut ax = dir[0] as f64 / 127.0;
    let mut ay = dir[1] as f64 / 127.0;
    let mut az = dir[2] as f64 / 127.0;

    let norm = libm::sqrt(ax * ax + ay * ay + az * az);
    if norm > 0.0 {
        ax /= norm;
        ay /= norm;
        az /= norm;
    }

    let sign_y = if ay > 0.0 {
        1.0
    } else if ay < 0.0 {
        -1.0
    } else {
        0.0
    };

    let roll = -libm::atan2(-ax, ay).to_degrees();
    let pitch = -libm::atan2(az, sign_y * libm::sqrt(ax * ax + ay * ay)).to_degrees();
    (pitch, roll)
}

/// Bit-serial OOTX frame decoder
#[derive(Debug, Clone)]
pub struct OotxDecoder {
    phase: Phase,
    accumulator: u32,
    bit_count: u8,
    payload_len: usize,
    expected: usize,
    clamped: bool,
    received: usize,
    buffer: [u8; OOTX_BUFFER_LEN],
    complete: bool,
    frame: Option<OotxFrame>,
}

impl Default for OotxDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl OotxDecoder {
    pub const fn new() -> Self {
        Self {
            phase: Phase::Preamble,
            accumulator: 0,
            bit_count: 0,
            payload_len: 0,
            expected: 0,
            clamped: false,
            received: 0,
            buffer: [0; OOTX_BUFFER_LEN],
            complete: false,
            frame: None,
        }
    }

    /// Drop any partial frame and scan for a preamble
    ///
    /// The last decoded frame stays available.
    pub fn reset(&mut self) {
        self.phase = Phase::Preamble;
        self.accumulator = 0;
        self.bit_count = 0;
        self.payload_len = 0;
        self.expected = 0;
        self.clamped = false;
        self.received = 0;
    }

    /// Feed one bit
    ///
    /// Any value other than 0 or 1 resets the decoder. Returns `true` when
    /// this bit completed a frame.
    pub fn add_bit(&mut self, bit: u8) -> bool {
        self.complete = false;

        if bit > 1 {
            self.reset();
            return false;
        }

        self.accumulator = (self.accumulator << 1) | bit as u32;
        self.bit_count += 1;

        match self.phase {
            Phase::Preamble => {
                if self.bit_count == PREAMBLE_BITS {
                    if self.accumulator & PREAMBLE_MASK == PREAMBLE {
                        self.phase = Phase::Length;
                        self.accumulator = 0;
                        self.bit_count = 0;
                    } else {
                        // Slide the window by one bit
                        self.accumulator &= PREAMBLE_MASK >> 1;
                        self.bit_count = PREAMBLE_BITS - 1;
                    }
                }
                false
            }
            Phase::Length | Phase::Payload => {
                if self.bit_count < WORD_BITS {
                    return false;
                }
                let sync = self.accumulator & 1;
                let word = (self.accumulator >> 1) as u16;
                self.accumulator = 0;
                self.bit_count = 0;

                if sync != 1 {
                    self.reset();
                    return false;
                }

                if self.phase == Phase::Length {
                    self.start_payload(word);
                    false
                } else {
                    self.push_word(word)
                }
            }
        }
    }

    fn start_payload(&mut self, word: u16) {
        let declared = word.swap_bytes() as usize;
        let mut total = declared + CRC_LEN;
        self.clamped = false;
        if total > OOTX_BUFFER_LEN {
            log_warn!("OOTX length {} exceeds buffer, using {}", total, OOTX_FALLBACK_LEN);
            total = OOTX_FALLBACK_LEN;
            self.clamped = true;
        }
        self.payload_len = declared;
        self.expected = total + (total & 1);
        self.received = 0;
        self.phase = Phase::Payload;
    }

    fn push_word(&mut self, word: u16) -> bool {
        let [high, low] = word.to_be_bytes();
        if self.received + 2 > OOTX_BUFFER_LEN {
            self.reset();
            return false;
        }
        self.buffer[self.received] = high;
        self.buffer[self.received + 1] = low;
        self.received += 2;

        if self.received < self.expected {
            return false;
        }

        self.frame = Some(OotxFrame::from_bytes(
            &self.buffer,
            self.received,
            self.payload_len,
            self.clamped,
        ));
        self.complete = true;
        self.reset();
        true
    }

    /// True once any frame has been decoded; survives later resets
    pub fn is_available(&self) -> bool {
        self.frame.is_some()
    }

    /// True only until the next bit after a frame completes
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Most recently decoded frame
    pub fn frame(&self) -> Option<&OotxFrame> {
        self.frame.as_ref()
    }
}

/// Bitstream of one OOTX frame carrying `payload`, CRC and padding included
///
/// Inverse of [`OotxDecoder`], used to drive simulated base stations.
#[cfg(any(test, feature = "mock"))]
pub fn encode_frame(payload: &[u8]) -> FrameBits<'_> {
    FrameBits {
        payload,
        crc: CRC32.checksum(payload).to_le_bytes(),
        position: 0,
    }
}

/// Iterator over the bits of an encoded OOTX frame
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone)]
pub struct FrameBits<'a> {
    payload: &'a [u8],
    crc: [u8; CRC_LEN],
    position: usize,
}

#[cfg(any(test, feature = "mock"))]
impl FrameBits<'_> {
    fn byte(&self, index: usize) -> u8 {
        let len = self.payload.len();
        if index < len {
            self.payload[index]
        } else if index < len + CRC_LEN {
            self.crc[index - len]
        } else {
            0
        }
    }

    fn word(&self, index: usize) -> u16 {
        if index == 0 {
            return (self.payload.len() as u16).swap_bytes();
        }
        let first = 2 * (index - 1);
        u16::from_be_bytes([self.byte(first), self.byte(first + 1)])
    }

    fn word_count(&self) -> usize {
        1 + (self.payload.len() + CRC_LEN).div_ceil(2)
    }
}

#[cfg(any(test, feature = "mock"))]
impl Iterator for FrameBits<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let preamble = PREAMBLE_BITS as usize;
        let bit = if self.position < preamble {
            self.position == preamble - 1
        } else {
            let offset = self.position - preamble;
            let word = offset / WORD_BITS as usize;
            let index = offset % WORD_BITS as usize;
            if word >= self.word_count() {
                return None;
            }
            // Index 16 is the trailing sync bit
            index == 16 || (self.word(word) >> (15 - index)) & 1 == 1
        };
        self.position += 1;
        Some(bit)
    }
}
