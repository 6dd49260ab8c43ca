#![deny(unsafe_code)]
#![deny(warnings)]
//! One-shot SNTP synchronization
//!
//! Resolves the time server, sends the fixed 48-byte query over UDP with a
//! 1-second reply timeout, converts the embedded NTP seconds to local
//! calendar time and commits it to the clock source adapter.
//!
//! Called exactly once at startup, before the periodic render tick is
//! installed, so the bounded blocking wait can never stall a tick. There is
//! no retry or backoff: on failure the caller logs and the clock keeps
//! showing whatever the RTC hardware retained.

use binclock_core::{calendar, ntp, CalendarTimestamp};
use defmt::{info, warn, Debug2Format, Format};
use embassy_futures::select::{select, Either};
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpEndpoint, Stack};
use embassy_time::{Duration, Timer};

use super::rtc::{self, RtcError};

/// Time server hostname, resolved at every sync.
pub const NTP_SERVER: &str = "pool.ntp.org";

/// SNTP port (UDP 123)
const NTP_PORT: u16 = 123;

/// Reply timeout; also bounds the send path
const REPLY_TIMEOUT_MS: u64 = 1000;

/// Fixed local UTC offset in seconds (+3h, summer local time).
///
/// Not DST-aware: the clock keeps one offset year-round, preserved from the
/// original installation rather than growing a timezone database.
pub const UTC_OFFSET_SECS: i32 = 3 * 3600;

/// Synchronization errors
#[derive(Debug, Clone, Copy, Format)]
pub enum SyncError {
    /// Hostname lookup failed or returned no usable address
    Resolution,
    /// No reply within the timeout
    Timeout,
    /// Reply too short to carry the transmit timestamp
    MalformedReply,
    /// Socket-level fault (bind, send or receive)
    Io,
    /// Clock commit failed
    Rtc(RtcError),
}

impl From<ntp::NtpError> for SyncError {
    fn from(e: ntp::NtpError) -> Self {
        match e {
            ntp::NtpError::ReplyTooShort => SyncError::MalformedReply,
        }
    }
}

impl From<RtcError> for SyncError {
    fn from(e: RtcError) -> Self {
        SyncError::Rtc(e)
    }
}

impl core::fmt::Display for SyncError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Resolution => write!(f, "DNS resolution failed"),
            Self::Timeout => write!(f, "no NTP reply within timeout"),
            Self::MalformedReply => write!(f, "malformed NTP reply"),
            Self::Io => write!(f, "socket error"),
            Self::Rtc(_) => write!(f, "clock commit failed"),
        }
    }
}

impl core::error::Error for SyncError {}

/// Synchronize the clock once from `server`.
///
/// On success the committed timestamp is returned. On any failure the clock
/// source adapter is left unmodified; the UDP socket is released on every
/// exit path because it never outlives the inner scope.
pub async fn synchronize(
    stack: &Stack<'static>,
    server: &str,
    utc_offset_secs: i32,
) -> Result<CalendarTimestamp, SyncError> {
    // Resolve the server hostname to an IPv4 address
    let server_ip = match stack
        .dns_query(server, DnsQueryType::A)
        .await
        .map_err(|_| SyncError::Resolution)?
        .first()
    {
        Some(ip) => *ip,
        None => return Err(SyncError::Resolution),
    };
    let endpoint = IpEndpoint::new(server_ip, NTP_PORT);
    info!("Resolved {} to {}", server, Debug2Format(&endpoint));

    let mut reply = [0u8; ntp::PACKET_LEN];
    let reply_len = {
        // Socket and its buffers live only in this block; every exit path
        // below drops (closes) the socket before the clock is touched.
        let mut rx_meta = [PacketMetadata::EMPTY; 2];
        let mut rx_buffer = [0u8; 64];
        let mut tx_meta = [PacketMetadata::EMPTY; 2];
        let mut tx_buffer = [0u8; 64];
        let mut socket = UdpSocket::new(
            *stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );
        socket.bind(0).map_err(|_| SyncError::Io)?;

        let query = ntp::build_query();
        socket
            .send_to(&query, endpoint)
            .await
            .map_err(|_| SyncError::Io)?;

        let timeout = Timer::after(Duration::from_millis(REPLY_TIMEOUT_MS));
        match select(timeout, socket.recv_from(&mut reply)).await {
            Either::First(_) => {
                warn!("No NTP reply from {} within {} ms", server, REPLY_TIMEOUT_MS);
                return Err(SyncError::Timeout);
            }
            Either::Second(result) => {
                let (len, _) = result.map_err(|_| SyncError::Io)?;
                len
            }
        }
    };

    let ntp_secs = ntp::transmit_seconds(&reply[..reply_len])?;
    let unix_secs = ntp::to_local_unix(ntp_secs, utc_offset_secs);
    let timestamp = calendar::unix_to_timestamp(unix_secs);

    rtc::set(&timestamp)?;
    info!(
        "Clock synchronized: {:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        timestamp.year,
        timestamp.month,
        timestamp.day,
        timestamp.hour,
        timestamp.minute,
        timestamp.second
    );
    Ok(timestamp)
}
