//! Concentrator capacity and radio bandwidth tables

/// Number of radios available on the concentrator
pub const RADIO_COUNT: usize = 2;

/// Number of multi-SF LoRa channels available on the concentrator
pub const MULTI_SF_CHANNEL_COUNT: usize = 8;

/// Radio bandwidth used when the channel bandwidth is not listed in
/// [`RADIO_BANDWIDTHS`]
pub const DEFAULT_RADIO_BANDWIDTH_HZ: i64 = 925_000;

/// Bandwidth a single radio can cover, per channel bandwidth (both in Hz)
const RADIO_BANDWIDTHS: [(i64, i64); 3] = [
    (500_000, 1_100_000),
    (250_000, 1_000_000),
    (125_000, 925_000),
];

/// Look up the radio bandwidth required to host a channel of the given
/// bandwidth
pub fn radio_bandwidth_hz(channel_bandwidth_hz: i64) -> i64 {
    RADIO_BANDWIDTHS
        .iter()
        .find(|(channel, _)| *channel == channel_bandwidth_hz)
        .map(|(_, radio)| *radio)
        .unwrap_or(DEFAULT_RADIO_BANDWIDTH_HZ)
}
