//! ICMP echo probe.
//!
//! Measures ICMP round-trip time to a target host. Needs a raw or datagram
//! ICMP socket: run as root, grant `CAP_NET_RAW`, or allow unprivileged ping
//! through `net.ipv4.ping_group_range`.

use std::net::IpAddr;
use std::time::Duration;

use surge_ping::{Client, Config, ICMP, PingIdentifier, PingSequence, SurgeError};
use tokio::time::{Instant, timeout_at};

use crate::probe::{ProbeFailure, ProbeStatus, Prober};

/// Echo payload size, same as the classic `ping` default.
const PAYLOAD_SIZE: usize = 56;

/// ICMP echo prober.
///
/// Stateless: a fresh client socket is opened for every probe and dropped
/// when the probe returns.
#[derive(Debug, Clone)]
pub struct IcmpProber {
    payload: Vec<u8>,
}

impl Default for IcmpProber {
    fn default() -> Self {
        Self::new()
    }
}

impl IcmpProber {
    pub fn new() -> Self {
        Self {
            payload: vec![0; PAYLOAD_SIZE],
        }
    }
}

/// Resolve hostname to IP address.
async fn resolve_host(host: &str) -> Result<IpAddr, std::io::Error> {
    // First, try to parse as an IP address directly
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    // Otherwise, resolve the hostname using tokio's DNS lookup
    let addrs = tokio::net::lookup_host(format!("{host}:0")).await?;
    addrs
        .into_iter()
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses found"))
}

#[async_trait::async_trait]
impl Prober for IcmpProber {
    fn kind(&self) -> &'static str {
        "icmp"
    }

    async fn probe(&self, target: &str, timeout: Duration) -> ProbeStatus {
        // Resolution and the echo share one deadline.
        let deadline = Instant::now() + timeout;

        let ip_addr = match timeout_at(deadline, resolve_host(target)).await {
            Ok(Ok(ip)) => ip,
            Ok(Err(e)) => {
                tracing::debug!(host = %target, error = %e, "Failed to resolve hostname");
                return ProbeStatus::Failed(ProbeFailure::Resolve(e.to_string()));
            }
            Err(_) => {
                return ProbeStatus::Failed(ProbeFailure::Resolve(format!(
                    "no answer within {}s",
                    timeout.as_secs()
                )));
            }
        };

        // Create ICMP client based on IP version
        let client = match ip_addr {
            IpAddr::V4(_) => Client::new(&Config::default()),
            IpAddr::V6(_) => Client::new(&Config::builder().kind(ICMP::V6).build()),
        };

        let client = match client {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(host = %target, error = %e, "Failed to create ICMP client");
                return ProbeStatus::Failed(ProbeFailure::Socket(e.to_string()));
            }
        };

        let mut pinger = client.pinger(ip_addr, PingIdentifier(rand::random())).await;
        pinger.timeout(deadline.saturating_duration_since(Instant::now()));

        match timeout_at(deadline, pinger.ping(PingSequence(0), &self.payload)).await {
            Ok(Ok((_, rtt))) => ProbeStatus::Reply { rtt },
            Ok(Err(SurgeError::Timeout { .. })) | Err(_) => {
                ProbeStatus::Failed(ProbeFailure::Timeout)
            }
            Ok(Err(e)) => {
                tracing::debug!(host = %target, ip = %ip_addr, error = %e, "Ping probe failed");
                ProbeStatus::Failed(ProbeFailure::Network(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::FailureKind;

    #[tokio::test]
    async fn test_resolve_host_ipv4() {
        let ip = resolve_host("127.0.0.1").await.unwrap();
        assert_eq!(ip, IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)));
    }

    #[tokio::test]
    async fn test_resolve_host_ipv6() {
        let ip = resolve_host("::1").await.unwrap();
        assert_eq!(ip, IpAddr::V6(std::net::Ipv6Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_resolve_failure() {
        // `.invalid` is reserved and never resolves.
        let status = IcmpProber::new()
            .probe("flynet.invalid", Duration::from_secs(2))
            .await;

        match status {
            ProbeStatus::Failed(failure) => {
                assert_eq!(failure.kind(), FailureKind::Resolve);
                assert!(failure.to_string().starts_with("resolve: "));
            }
            other => panic!("expected resolve failure, got {other:?}"),
        }
    }

    #[test]
    fn test_payload_size() {
        assert_eq!(IcmpProber::default().payload.len(), PAYLOAD_SIZE);
        assert_eq!(IcmpProber::new().kind(), "icmp");
    }
}
