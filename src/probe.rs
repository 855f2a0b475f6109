//! Probe Layer
//!
//! One reachability probe per call, bounded by a timeout, with every failure
//! folded into the returned [`ProbeStatus`].
//!
//! - [`Prober`]: Trait the monitor drives (mockable in tests)
//! - [`IcmpProber`]: ICMP echo probe for host reachability and latency
//! - [`ProbeFailure`]: Classified failure with a stable kind

mod icmp;
mod traits;

pub use icmp::IcmpProber;
pub use traits::{FailureKind, ProbeFailure, ProbeStatus, Prober, TIMEOUT_MESSAGE};
