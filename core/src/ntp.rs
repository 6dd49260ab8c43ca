//! NTP wire codec and epoch conversion
//!
//! The clock speaks the minimal SNTP subset: a fixed 48-byte client query
//! and, from the reply, only the 32-bit transmit-timestamp seconds at byte
//! offset 40. No other reply fields are validated — this is a single
//! trusted-server query, an accepted simplification.

/// NTP packet length in bytes (both query and full reply).
pub const PACKET_LEN: usize = 48;

/// Offset between the NTP epoch (1900-01-01) and the Unix epoch (1970-01-01).
pub const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

/// Byte offset of the transmit-timestamp seconds field in a reply.
const TRANSMIT_SECONDS_OFFSET: usize = 40;

/// A reply must at least cover the transmit-timestamp seconds field.
pub const MIN_REPLY_LEN: usize = TRANSMIT_SECONDS_OFFSET + 4;

/// Reply decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NtpError {
    /// Reply shorter than the 44 bytes needed for the transmit timestamp
    ReplyTooShort,
}

impl core::fmt::Display for NtpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ReplyTooShort => write!(f, "NTP reply too short"),
        }
    }
}

impl core::error::Error for NtpError {}

/// Build the fixed 48-byte client query.
///
/// Byte 0 is 0x1B (LI=0, VN=3, Mode=3 client); the rest is zero. A fresh
/// buffer is constructed per request.
pub fn build_query() -> [u8; PACKET_LEN] {
    let mut query = [0u8; PACKET_LEN];
    query[0] = 0x1B;
    query
}

/// Extract the transmit-timestamp seconds (big-endian, seconds since
/// 1900-01-01) from a server reply.
pub fn transmit_seconds(reply: &[u8]) -> Result<u32, NtpError> {
    if reply.len() < MIN_REPLY_LEN {
        return Err(NtpError::ReplyTooShort);
    }
    let o = TRANSMIT_SECONDS_OFFSET;
    Ok(u32::from_be_bytes([
        reply[o],
        reply[o + 1],
        reply[o + 2],
        reply[o + 3],
    ]))
}

/// Convert NTP seconds to local Unix seconds by subtracting the epoch delta
/// and folding in the fixed UTC offset.
///
/// The offset is a compile-time constant in the caller, not DST-aware.
/// Saturates at the Unix epoch rather than going negative on garbage input.
pub fn to_local_unix(ntp_secs: u32, utc_offset_secs: i32) -> u64 {
    let local = ntp_secs as i64 - NTP_UNIX_OFFSET as i64 + utc_offset_secs as i64;
    local.max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{timestamp_to_unix, unix_to_timestamp};

    #[test]
    fn test_query_format() {
        let query = build_query();
        assert_eq!(query.len(), 48);
        assert_eq!(query[0], 0x1B);
        assert!(query[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_transmit_seconds_extraction() {
        let mut reply = [0u8; PACKET_LEN];
        reply[40..44].copy_from_slice(&0xE7_8D_5F_00u32.to_be_bytes());
        assert_eq!(transmit_seconds(&reply), Ok(0xE78D5F00));
    }

    #[test]
    fn test_truncated_reply_rejected() {
        let reply = [0u8; 30];
        assert_eq!(transmit_seconds(&reply), Err(NtpError::ReplyTooShort));
        // 44 bytes is the exact lower bound
        assert!(transmit_seconds(&[0u8; 43]).is_err());
        assert!(transmit_seconds(&[0u8; 44]).is_ok());
    }

    #[test]
    fn test_epoch_conversion() {
        // NTP epoch delta itself maps to the Unix epoch
        assert_eq!(to_local_unix(NTP_UNIX_OFFSET as u32, 0), 0);
        // 2024-01-01 00:00:00 UTC
        let ntp = (NTP_UNIX_OFFSET + 1704067200) as u32;
        assert_eq!(to_local_unix(ntp, 0), 1704067200);
        // Fixed +3h offset shifts the wall clock, not the date math
        assert_eq!(to_local_unix(ntp, 3 * 3600), 1704067200 + 3 * 3600);
        // Garbage below the NTP epoch saturates instead of wrapping
        assert_eq!(to_local_unix(0, 0), 0);
    }

    #[test]
    fn test_ntp_seconds_round_trip_through_calendar() {
        // Unix seconds derived from NTP seconds survive calendar conversion
        // and re-encoding for representative points across the NTP era.
        for &ntp_secs in &[
            NTP_UNIX_OFFSET as u32, // 1970-01-01
            3_913_056_000,          // 2024-01-01
            u32::MAX,               // 2036-02-07, end of NTP era 0
        ] {
            let unix = to_local_unix(ntp_secs, 0);
            let ts = unix_to_timestamp(unix);
            let back = timestamp_to_unix(&ts);
            assert_eq!(back, unix);
            assert_eq!(back + NTP_UNIX_OFFSET, ntp_secs as u64);
        }
    }
}
