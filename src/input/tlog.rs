//! MAVLink telemetry log (`.tlog`) decoding.
//!
//! A tlog is a plain concatenation of records, each a big-endian u64 UNIX
//! timestamp in microseconds followed by one MAVLink v1 or v2 frame. Only
//! `GLOBAL_POSITION_INT` frames carry what the replay needs; everything else is
//! skipped.

use chrono::DateTime;
use tracing::debug;

use crate::core::{Sample, Track};

const TIMESTAMP_LEN: usize = 8;

const MAVLINK_V1_MAGIC: u8 = 0xFE;
const MAVLINK_V2_MAGIC: u8 = 0xFD;
const V1_HEADER_LEN: usize = 6;
const V2_HEADER_LEN: usize = 10;
const CHECKSUM_LEN: usize = 2;
const V2_SIGNED_FLAG: u8 = 0x01;
const V2_SIGNATURE_LEN: usize = 13;

const GLOBAL_POSITION_INT_ID: u32 = 33;
const GLOBAL_POSITION_INT_CRC_EXTRA: u8 = 104;
const GLOBAL_POSITION_INT_LEN: usize = 28;

/// CRC_EXTRA seeds from the MAVLink common dialect, for the messages an
/// autopilot usually streams into a tlog
fn crc_extra(msg_id: u32) -> Option<u8> {
    let extra = match msg_id {
        0 => 50,    // HEARTBEAT
        1 => 124,   // SYS_STATUS
        2 => 137,   // SYSTEM_TIME
        22 => 220,  // PARAM_VALUE
        24 => 24,   // GPS_RAW_INT
        27 => 144,  // RAW_IMU
        29 => 115,  // SCALED_PRESSURE
        30 => 39,   // ATTITUDE
        31 => 246,  // ATTITUDE_QUATERNION
        32 => 185,  // LOCAL_POSITION_NED
        GLOBAL_POSITION_INT_ID => GLOBAL_POSITION_INT_CRC_EXTRA,
        35 => 244,  // RC_CHANNELS_RAW
        36 => 222,  // SERVO_OUTPUT_RAW
        42 => 28,   // MISSION_CURRENT
        62 => 183,  // NAV_CONTROLLER_OUTPUT
        65 => 118,  // RC_CHANNELS
        74 => 20,   // VFR_HUD
        77 => 143,  // COMMAND_ACK
        147 => 154, // BATTERY_STATUS
        253 => 83,  // STATUSTEXT
        _ => return None,
    };
    Some(extra)
}

/// `hdg` value meaning "heading unknown"
const HEADING_UNKNOWN: u16 = u16::MAX;

/// Check whether the data starts like a tlog record
pub fn looks_like_tlog(data: &[u8]) -> bool {
    matches!(data.get(TIMESTAMP_LEN), Some(&MAVLINK_V1_MAGIC) | Some(&MAVLINK_V2_MAGIC))
}

/// Decode every valid `GLOBAL_POSITION_INT` record into a sample.
///
/// Frames with a bad checksum and bytes that do not start a record are
/// skipped by resyncing one byte at a time. A frame whose message has no
/// known CRC seed is only accepted when the next record (or the end of the
/// log) follows it.
pub fn parse_tlog(data: &[u8]) -> Track {
    let mut samples = Vec::new();
    let mut last_heading = None;
    let mut skipped_bytes = 0usize;
    let mut rejected_frames = 0usize;
    let mut pos = 0;

    while pos + TIMESTAMP_LEN < data.len() {
        let timestamp = u64::from_be_bytes(read_array(&data[pos..]));

        let Some(frame) = Frame::parse(&data[pos + TIMESTAMP_LEN..]) else {
            pos += 1;
            skipped_bytes += 1;
            continue;
        };
        let next = pos + TIMESTAMP_LEN + frame.total_len;

        let valid = match crc_extra(frame.msg_id) {
            Some(extra) => frame.checksum_valid(extra),
            // No CRC seed to check against: only trust it if a record follows
            None => next == data.len() || looks_like_tlog(&data[next..]),
        };
        if !valid {
            // Probably a magic byte inside garbage or another payload
            rejected_frames += 1;
            pos += 1;
            continue;
        }

        if frame.msg_id == GLOBAL_POSITION_INT_ID {
            let sample = decode_global_position(frame.payload, timestamp, last_heading);
            last_heading = Some(sample.heading);
            samples.push(sample);
        }

        pos = next;
    }

    debug!(
        "Decoded {} position samples from tlog ({} bytes skipped, {} frames rejected)",
        samples.len(),
        skipped_bytes,
        rejected_frames
    );

    Track::new(samples)
}

/// One MAVLink frame borrowed from the input buffer
struct Frame<'a> {
    msg_id: u32,
    /// Bytes covered by the checksum: header without magic, then payload
    checked: &'a [u8],
    payload: &'a [u8],
    checksum: u16,
    /// Frame length including magic, checksum and signature
    total_len: usize,
}

impl<'a> Frame<'a> {
    /// Parse a frame starting at `buf[0]`, None if there is no complete frame
    fn parse(buf: &'a [u8]) -> Option<Self> {
        let magic = *buf.first()?;
        let payload_len = *buf.get(1)? as usize;

        let (header_len, msg_id, signature_len) = match magic {
            MAVLINK_V1_MAGIC => {
                let header = buf.get(..V1_HEADER_LEN)?;
                (V1_HEADER_LEN, header[5] as u32, 0)
            }
            MAVLINK_V2_MAGIC => {
                let header = buf.get(..V2_HEADER_LEN)?;
                let msg_id = u32::from_le_bytes([header[7], header[8], header[9], 0]);
                let signature_len = if header[2] & V2_SIGNED_FLAG != 0 {
                    V2_SIGNATURE_LEN
                } else {
                    0
                };
                (V2_HEADER_LEN, msg_id, signature_len)
            }
            _ => return None,
        };

        let payload_end = header_len + payload_len;
        let total_len = payload_end + CHECKSUM_LEN + signature_len;
        if buf.len() < total_len {
            return None;
        }

        Some(Self {
            msg_id,
            checked: &buf[1..payload_end],
            payload: &buf[header_len..payload_end],
            checksum: u16::from_le_bytes([buf[payload_end], buf[payload_end + 1]]),
            total_len,
        })
    }

    fn checksum_valid(&self, crc_extra: u8) -> bool {
        let crc = self.checked.iter().fold(X25_INIT, |crc, &b| x25_accumulate(crc, b));
        x25_accumulate(crc, crc_extra) == self.checksum
    }
}

const X25_INIT: u16 = 0xFFFF;

/// CRC-16/MCRF4XX step as used by MAVLink
fn x25_accumulate(crc: u16, byte: u8) -> u16 {
    let mut tmp = byte ^ (crc & 0xFF) as u8;
    tmp ^= tmp << 4;
    let tmp = tmp as u16;
    (crc >> 8) ^ (tmp << 8) ^ (tmp << 3) ^ (tmp >> 4)
}

fn decode_global_position(payload: &[u8], timestamp_us: u64, last_heading: Option<f64>) -> Sample {
    // MAVLink 2 strips trailing zero bytes from payloads
    let mut buf = [0u8; GLOBAL_POSITION_INT_LEN];
    let n = payload.len().min(GLOBAL_POSITION_INT_LEN);
    buf[..n].copy_from_slice(&payload[..n]);

    // Wire order: time_boot_ms, lat, lon, alt, relative_alt, vx, vy, vz, hdg
    let lat = i32::from_le_bytes(read_array(&buf[4..]));
    let lon = i32::from_le_bytes(read_array(&buf[8..]));
    let alt = i32::from_le_bytes(read_array(&buf[12..]));
    let hdg = u16::from_le_bytes(read_array(&buf[26..]));

    let heading = if hdg == HEADING_UNKNOWN {
        last_heading.unwrap_or(0.0)
    } else {
        hdg as f64 / 100.0
    };

    Sample {
        lat: lat as f64 / 1e7,
        lon: lon as f64 / 1e7,
        alt: alt as f64 / 1000.0,
        heading,
        recorded_at: i64::try_from(timestamp_us)
            .ok()
            .and_then(DateTime::from_timestamp_micros),
    }
}

/// First `N` bytes of `buf`. Callers guarantee the length.
fn read_array<const N: usize>(buf: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&buf[..N]);
    out
}
