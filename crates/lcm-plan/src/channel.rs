//! Channel definitions as received from the gateway configuration API

use std::fmt;

use crate::bandwidth::radio_bandwidth_hz;

/// Channel modulation
///
/// Modulation names the concentrator cannot handle are kept verbatim so the
/// classifier can report them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum Modulation {
    /// LoRa chirp spread spectrum
    Lora,
    /// Frequency shift keying
    Fsk,
    /// Any other modulation name
    Other(String),
}

impl Modulation {
    /// Wire name of the modulation
    pub fn name(&self) -> &str {
        match self {
            Modulation::Lora => "LORA",
            Modulation::Fsk => "FSK",
            Modulation::Other(name) => name,
        }
    }
}

impl fmt::Display for Modulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Modulation {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "LORA" => Modulation::Lora,
            "FSK" => Modulation::Fsk,
            _ => Modulation::Other(value),
        }
    }
}

impl From<Modulation> for String {
    fn from(value: Modulation) -> Self {
        value.name().to_string()
    }
}

/// A logical channel of the gateway channel plan
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Channel {
    /// Modulation of the channel
    pub modulation: Modulation,
    /// Center frequency in Hz
    pub frequency: u32,
    /// Channel bandwidth in kHz
    pub bandwidth: u32,
    /// Spreading factors (LoRa only)
    #[cfg_attr(feature = "serde", serde(default))]
    pub spread_factors: Vec<u8>,
    /// Bit rate (FSK only)
    #[cfg_attr(feature = "serde", serde(default))]
    pub bit_rate: u32,
}

impl Channel {
    /// Create a LoRa channel
    pub fn lora(frequency: u32, bandwidth: u32, spread_factors: Vec<u8>) -> Self {
        Self {
            modulation: Modulation::Lora,
            frequency,
            bandwidth,
            spread_factors,
            bit_rate: 0,
        }
    }

    /// Create an FSK channel
    pub fn fsk(frequency: u32, bandwidth: u32, bit_rate: u32) -> Self {
        Self {
            modulation: Modulation::Fsk,
            frequency,
            bandwidth,
            spread_factors: Vec::new(),
            bit_rate,
        }
    }

    /// Center frequency in Hz
    pub fn frequency_hz(&self) -> i64 {
        i64::from(self.frequency)
    }

    /// Channel bandwidth in Hz
    pub fn bandwidth_hz(&self) -> i64 {
        i64::from(self.bandwidth) * 1000
    }

    /// Lower edge of the channel in Hz
    pub fn min_hz(&self) -> i64 {
        self.frequency_hz() - self.bandwidth_hz() / 2
    }

    /// Upper edge of the channel in Hz
    pub fn max_hz(&self) -> i64 {
        self.frequency_hz() + self.bandwidth_hz() / 2
    }

    /// Bandwidth a radio needs to host this channel
    pub fn radio_bandwidth_hz(&self) -> i64 {
        radio_bandwidth_hz(self.bandwidth_hz())
    }

    /// Radio center frequency that puts this channel exactly at the lower
    /// edge of the radio's coverage
    pub fn min_radio_center_hz(&self) -> i64 {
        self.min_hz() + self.radio_bandwidth_hz() / 2
    }
}
