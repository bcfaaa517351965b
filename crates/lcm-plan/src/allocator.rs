//! Radio allocation
//!
//! Places channels under the concentrator's radios. Each radio covers a
//! contiguous window of `radio_bandwidth` Hz around its center frequency;
//! the width of that window depends on the bandwidth of the channel being
//! placed (see [`crate::bandwidth`]).
//!
//! Allocation runs in two passes:
//!
//! 1. Channels are sorted by the radio center they would need if they sat
//!    at the lower edge of a radio. Walking that order, a channel that does
//!    not fit under an already enabled radio enables the next free radio,
//!    centered so the channel sits at its lower edge.
//! 2. In the original channel order, every channel is assigned to the first
//!    radio whose window fully contains it, and its IF offset is computed
//!    against that radio's center.

use tracing::{debug, warn};

use crate::bandwidth::RADIO_COUNT;
use crate::channel::Channel;

/// One physical radio of the concentrator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RadioSlot {
    /// Whether the radio is in use
    pub enable: bool,
    /// Center frequency in Hz
    pub freq: i64,
}

impl RadioSlot {
    /// Whether `channel` fits entirely inside this radio's window
    pub fn covers(&self, channel: &Channel) -> bool {
        let half = channel.radio_bandwidth_hz() / 2;
        channel.min_hz() >= self.freq - half && channel.max_hz() <= self.freq + half
    }

    fn covers_upper_edge(&self, channel: &Channel) -> bool {
        channel.max_hz() <= self.freq + channel.radio_bandwidth_hz() / 2
    }
}

/// Radio assignment of a single channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// Index of the hosting radio
    pub radio: usize,
    /// Offset of the channel from the radio center in Hz
    pub if_offset: i64,
    /// False when no enabled radio covers the channel and it fell back to
    /// radio 0
    pub covered: bool,
}

/// Result of a radio allocation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Radio slots, indexed by radio number
    pub radios: [RadioSlot; RADIO_COUNT],
    /// One assignment per input channel, in input order
    pub assignments: Vec<Assignment>,
}

impl Allocation {
    /// Number of enabled radios
    pub fn enabled_radios(&self) -> usize {
        self.radios.iter().filter(|r| r.enable).count()
    }

    /// Whether every channel is covered by its radio
    pub fn all_covered(&self) -> bool {
        self.assignments.iter().all(|a| a.covered)
    }
}

/// Allocate radios for the given channels
pub fn allocate(channels: &[Channel]) -> Allocation {
    let radios = place_radios(channels);
    let assignments = channels
        .iter()
        .map(|channel| assign(&radios, channel))
        .collect();

    Allocation {
        radios,
        assignments,
    }
}

/// First pass: decide which radios are enabled and where they are centered
fn place_radios(channels: &[Channel]) -> [RadioSlot; RADIO_COUNT] {
    let mut radios = [RadioSlot::default(); RADIO_COUNT];

    // sort_by_key is stable, ties keep their input order
    let mut sorted: Vec<&Channel> = channels.iter().collect();
    sorted.sort_by_key(|c| c.min_radio_center_hz());

    for channel in sorted {
        for (index, radio) in radios.iter_mut().enumerate() {
            if !radio.enable {
                radio.enable = true;
                radio.freq = channel.min_radio_center_hz();
                debug!(
                    radio = index,
                    freq = radio.freq,
                    channel = channel.frequency,
                    "radio enabled"
                );
                break;
            }

            if radio.covers_upper_edge(channel) {
                break;
            }
        }
    }

    radios
}

/// Second pass: find the radio covering a channel
fn assign(radios: &[RadioSlot; RADIO_COUNT], channel: &Channel) -> Assignment {
    let found = radios
        .iter()
        .position(|radio| radio.enable && radio.covers(channel));

    let (radio, covered) = match found {
        Some(index) => (index, true),
        None => {
            warn!(
                frequency = channel.frequency,
                bandwidth = channel.bandwidth,
                "no radio covers channel, falling back to radio 0"
            );
            (0, false)
        }
    };

    Assignment {
        radio,
        if_offset: channel.frequency_hz() - radios[radio].freq,
        covered,
    }
}
