//! Channel classification
//!
//! The concentrator exposes three kinds of demodulator channels:
//!
//! - up to [`MULTI_SF_CHANNEL_COUNT`] LoRa channels demodulating several
//!   spreading factors at once
//! - a single LoRa channel fixed to one spreading factor
//! - a single FSK channel
//!
//! [`classify`] maps each channel of the plan onto one of these and fails
//! when a plan needs more of a kind than the hardware has.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::allocator::{allocate, Allocation, Assignment, RadioSlot};
use crate::bandwidth::{MULTI_SF_CHANNEL_COUNT, RADIO_COUNT};
use crate::channel::{Channel, Modulation};
use crate::error::PlanError;

/// Hardware channel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// LoRa, several spreading factors
    MultiSf,
    /// LoRa, one spreading factor
    LoraStd,
    /// FSK
    Fsk,
}

impl ChannelKind {
    /// Classify a channel by modulation and spreading factors
    pub fn of(channel: &Channel) -> Result<Self, PlanError> {
        match (&channel.modulation, channel.spread_factors.len()) {
            (Modulation::Fsk, _) => Ok(ChannelKind::Fsk),
            (Modulation::Lora, 1) => Ok(ChannelKind::LoraStd),
            (Modulation::Lora, n) if n > 1 => Ok(ChannelKind::MultiSf),
            (modulation, _) => Err(PlanError::UnsupportedModulation(modulation.to_string())),
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            ChannelKind::MultiSf => "LoRa multi-SF",
            ChannelKind::LoraStd => "LoRa std",
            ChannelKind::Fsk => "FSK",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Multi-SF LoRa channel slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultiSfChannelConfig {
    /// Whether the slot is in use
    pub enable: bool,
    /// Index of the hosting radio
    pub radio: usize,
    /// Offset from the radio center in Hz
    pub if_offset: i64,
    /// Absolute frequency in Hz
    pub freq: i64,
}

/// Single-SF LoRa channel slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoraStdChannelConfig {
    /// Whether the slot is in use
    pub enable: bool,
    /// Index of the hosting radio
    pub radio: usize,
    /// Offset from the radio center in Hz
    pub if_offset: i64,
    /// Bandwidth in Hz
    pub bandwidth: i64,
    /// The single spreading factor demodulated
    pub spread_factor: u8,
    /// Absolute frequency in Hz
    pub freq: i64,
}

/// FSK channel slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FskChannelConfig {
    /// Whether the slot is in use
    pub enable: bool,
    /// Index of the hosting radio
    pub radio: usize,
    /// Offset from the radio center in Hz
    pub if_offset: i64,
    /// Bandwidth in kHz, as received from the plan
    pub bandwidth: u32,
    /// Bit rate in bits per second
    pub datarate: u32,
    /// Absolute frequency in Hz
    pub freq: i64,
}

/// Complete radio and channel layout for the concentrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayChannelPlan {
    /// When the channel plan was last changed upstream
    pub updated_at: DateTime<Utc>,
    /// Radio slots, indexed by radio number
    pub radios: [RadioSlot; RADIO_COUNT],
    /// Multi-SF slots, filled in channel order
    pub multi_sf_channels: [MultiSfChannelConfig; MULTI_SF_CHANNEL_COUNT],
    pub lora_std_channel: LoraStdChannelConfig,
    pub fsk_channel: FskChannelConfig,
}

impl GatewayChannelPlan {
    /// Allocate radios and classify channels in one step
    pub fn build(updated_at: DateTime<Utc>, channels: &[Channel]) -> Result<Self, PlanError> {
        let allocation = allocate(channels);
        classify(updated_at, channels, &allocation)
    }

    /// Number of enabled multi-SF channels
    pub fn multi_sf_count(&self) -> usize {
        self.multi_sf_channels.iter().filter(|c| c.enable).count()
    }
}

/// Build the channel plan from an allocation
///
/// `allocation.assignments` must line up with `channels`. Channels are
/// processed in input order; the first violation aborts the whole plan.
pub fn classify(
    updated_at: DateTime<Utc>,
    channels: &[Channel],
    allocation: &Allocation,
) -> Result<GatewayChannelPlan, PlanError> {
    let mut plan = GatewayChannelPlan {
        updated_at,
        radios: allocation.radios,
        multi_sf_channels: [MultiSfChannelConfig::default(); MULTI_SF_CHANNEL_COUNT],
        lora_std_channel: LoraStdChannelConfig::default(),
        fsk_channel: FskChannelConfig::default(),
    };
    let mut multi_sf_used = 0;

    for (channel, assignment) in channels.iter().zip(&allocation.assignments) {
        let Assignment {
            radio, if_offset, ..
        } = *assignment;
        let kind = ChannelKind::of(channel)?;

        match kind {
            ChannelKind::Fsk => {
                if plan.fsk_channel.enable {
                    return Err(PlanError::DuplicateChannel(kind));
                }
                plan.fsk_channel = FskChannelConfig {
                    enable: true,
                    radio,
                    if_offset,
                    bandwidth: channel.bandwidth,
                    datarate: channel.bit_rate,
                    freq: channel.frequency_hz(),
                };
            }
            ChannelKind::LoraStd => {
                if plan.lora_std_channel.enable {
                    return Err(PlanError::DuplicateChannel(kind));
                }
                plan.lora_std_channel = LoraStdChannelConfig {
                    enable: true,
                    radio,
                    if_offset,
                    bandwidth: channel.bandwidth_hz(),
                    spread_factor: channel.spread_factors[0],
                    freq: channel.frequency_hz(),
                };
            }
            ChannelKind::MultiSf => {
                let slot = plan
                    .multi_sf_channels
                    .get_mut(multi_sf_used)
                    .ok_or(PlanError::CapacityExceeded {
                        capacity: MULTI_SF_CHANNEL_COUNT,
                    })?;
                *slot = MultiSfChannelConfig {
                    enable: true,
                    radio,
                    if_offset,
                    freq: channel.frequency_hz(),
                };
                multi_sf_used += 1;
            }
        }

        debug!(
            kind = %kind,
            frequency = channel.frequency,
            radio,
            if_offset,
            "channel classified"
        );
    }

    Ok(plan)
}
