//! SNTP (RFC 4330) time query module.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use chrono::{DateTime, TimeDelta, Utc};
use tokio::net::UdpSocket;

use crate::config::NtpConfig;
use crate::error::{ToolboxError, ToolboxResult};
use crate::types::NetworkTime;

const PACKET_LEN: usize = 48;
/// Seconds from the NTP epoch (1900-01-01) to the Unix epoch.
const NTP_UNIX_OFFSET_SECS: i64 = 2_208_988_800;
const ERA_SECS: i64 = 1 << 32;
const VERSION: u8 = 4;
const MODE_CLIENT: u8 = 3;
const MODE_SERVER: u8 = 4;
/// Leap indicator value for "clock not synchronized".
const LEAP_UNSYNCHRONIZED: u8 = 3;

/// 64-bit NTP timestamp: seconds and 2^-32 fractions since 1900.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct NtpTimestamp {
    seconds: u32,
    fraction: u32,
}

impl NtpTimestamp {
    fn from_datetime(time: DateTime<Utc>) -> Self {
        let seconds = (time.timestamp() + NTP_UNIX_OFFSET_SECS).rem_euclid(ERA_SECS);
        let fraction = (u64::from(time.timestamp_subsec_nanos()) << 32) / 1_000_000_000;
        Self {
            seconds: u32::try_from(seconds).unwrap_or_default(),
            fraction: u32::try_from(fraction).unwrap_or(u32::MAX),
        }
    }

    /// Convert back to UTC. Timestamps with the top bit clear are taken to be in
    /// era 1 (2036-02-07 onwards), as RFC 4330 §3 recommends.
    fn to_datetime(self) -> Option<DateTime<Utc>> {
        let era_base = if self.seconds & 0x8000_0000 == 0 {
            ERA_SECS
        } else {
            0
        };
        let unix_secs = i64::from(self.seconds) + era_base - NTP_UNIX_OFFSET_SECS;
        let nanos = (u64::from(self.fraction) * 1_000_000_000) >> 32;
        DateTime::from_timestamp(unix_secs, u32::try_from(nanos).ok()?)
    }

    fn read(bytes: &[u8]) -> Self {
        let word = |offset: usize| {
            bytes
                .get(offset..offset + 4)
                .and_then(|b| <[u8; 4]>::try_from(b).ok())
                .map_or(0, u32::from_be_bytes)
        };
        Self {
            seconds: word(0),
            fraction: word(4),
        }
    }

    fn write(self, out: &mut [u8]) {
        out[..4].copy_from_slice(&self.seconds.to_be_bytes());
        out[4..8].copy_from_slice(&self.fraction.to_be_bytes());
    }

    fn is_zero(self) -> bool {
        self == Self::default()
    }
}

/// Fields of a server reply that the client looks at.
#[derive(Debug)]
struct Reply {
    leap: u8,
    mode: u8,
    stratum: u8,
    reference_id: [u8; 4],
    originate: NtpTimestamp,
    receive: NtpTimestamp,
    transmit: NtpTimestamp,
}

fn build_request(transmit: NtpTimestamp) -> [u8; PACKET_LEN] {
    let mut packet = [0_u8; PACKET_LEN];
    // LI = 0 (no warning), VN, Mode
    packet[0] = (VERSION << 3) | MODE_CLIENT;
    transmit.write(&mut packet[40..48]);
    packet
}

fn parse_reply(bytes: &[u8]) -> ToolboxResult<Reply> {
    if bytes.len() < PACKET_LEN {
        return Err(ToolboxError::ParseError(format!(
            "NTP reply too short: {} bytes",
            bytes.len()
        )));
    }
    Ok(Reply {
        leap: bytes[0] >> 6,
        mode: bytes[0] & 0x07,
        stratum: bytes[1],
        reference_id: [bytes[12], bytes[13], bytes[14], bytes[15]],
        originate: NtpTimestamp::read(&bytes[24..32]),
        receive: NtpTimestamp::read(&bytes[32..40]),
        transmit: NtpTimestamp::read(&bytes[40..48]),
    })
}

/// Reject replies that carry no usable time.
fn check_reply(reply: &Reply, sent: NtpTimestamp) -> ToolboxResult<()> {
    if reply.mode != MODE_SERVER {
        return Err(ToolboxError::ProtocolError(format!(
            "Unexpected NTP mode {} in reply",
            reply.mode
        )));
    }
    if reply.stratum == 0 {
        let code = String::from_utf8_lossy(&reply.reference_id);
        return Err(ToolboxError::ProtocolError(format!(
            "Kiss-of-death from server: {}",
            code.trim_end_matches('\0')
        )));
    }
    if reply.leap == LEAP_UNSYNCHRONIZED {
        return Err(ToolboxError::ProtocolError(
            "NTP server clock is not synchronized".to_string(),
        ));
    }
    if reply.originate != sent {
        return Err(ToolboxError::ProtocolError(
            "NTP reply does not answer our request".to_string(),
        ));
    }
    if reply.transmit.is_zero() {
        return Err(ToolboxError::ProtocolError(
            "NTP reply has no transmit timestamp".to_string(),
        ));
    }
    Ok(())
}

fn io_error(action: &str, server: &str, e: &std::io::Error) -> ToolboxError {
    ToolboxError::NetworkError(format!("Failed to {action} {server}: {e}"))
}

/// Query `config.server` once, bounded by `config.timeout`.
pub async fn network_time(config: &NtpConfig) -> ToolboxResult<NetworkTime> {
    tokio::time::timeout(config.timeout, exchange(&config.server, config.port))
        .await
        .map_err(|_| {
            ToolboxError::Timeout(format!(
                "No NTP reply from {} within {}s",
                config.server,
                config.timeout.as_secs_f32()
            ))
        })?
}

async fn exchange(server: &str, port: u16) -> ToolboxResult<NetworkTime> {
    let addr = tokio::net::lookup_host((server, port))
        .await
        .map_err(|e| io_error("resolve", server, &e))?
        .next()
        .ok_or_else(|| ToolboxError::NetworkError(format!("No address found for {server}")))?;

    let local: SocketAddr = if addr.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(local)
        .await
        .map_err(|e| io_error("bind socket for", server, &e))?;
    socket
        .connect(addr)
        .await
        .map_err(|e| io_error("connect to", server, &e))?;

    log::debug!("[NTP] Querying {server} ({addr})");

    let t1 = Utc::now();
    let sent = NtpTimestamp::from_datetime(t1);
    socket
        .send(&build_request(sent))
        .await
        .map_err(|e| io_error("send request to", server, &e))?;

    let mut buf = [0_u8; 512];
    let len = socket
        .recv(&mut buf)
        .await
        .map_err(|e| io_error("receive reply from", server, &e))?;
    let t4 = Utc::now();

    let reply = parse_reply(&buf[..len])?;
    check_reply(&reply, sent)?;

    let invalid = || ToolboxError::ParseError("NTP timestamp out of range".to_string());
    let t3 = reply.transmit.to_datetime().ok_or_else(invalid)?;
    let t2 = if reply.receive.is_zero() {
        t3
    } else {
        reply.receive.to_datetime().ok_or_else(invalid)?
    };

    let offset = ((t2 - t1) + (t3 - t4)) / 2;
    let round_trip = ((t4 - t1) - (t3 - t2)).max(TimeDelta::zero());

    log::debug!(
        "[NTP] {server}: stratum {}, offset {}ms, delay {}ms",
        reply.stratum,
        offset.num_milliseconds(),
        round_trip.num_milliseconds()
    );

    let time = t4.checked_add_signed(offset).ok_or_else(invalid)?;

    Ok(NetworkTime {
        server: server.to_string(),
        time,
        offset_ms: offset.num_milliseconds(),
        round_trip_ms: round_trip.num_milliseconds(),
        stratum: reply.stratum,
    })
}
