//! LoRa Channel Plan Library
//!
//! This crate turns an abstract channel plan (frequencies, bandwidths and
//! modulations) into the radio/channel layout of a two-radio, eight-channel
//! LoRa concentrator:
//!
//! - **Allocation**: decide which of the two radios hosts each channel and
//!   where each radio is centered
//! - **Classification**: sort channels into the FSK, LoRa-standard and
//!   LoRa multi-SF hardware channel types, enforcing their capacity limits
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use lcm_plan::{Channel, GatewayChannelPlan};
//!
//! let channels = vec![
//!     Channel::lora(868_100_000, 125, vec![7, 8, 9, 10, 11, 12]),
//!     Channel::lora(868_300_000, 125, vec![7, 8, 9, 10, 11, 12]),
//!     Channel::lora(868_500_000, 125, vec![7, 8, 9, 10, 11, 12]),
//! ];
//!
//! let plan = GatewayChannelPlan::build(Utc::now(), &channels).unwrap();
//! assert_eq!(plan.radios[0].freq, 868_500_000);
//! assert_eq!(plan.multi_sf_channels[0].if_offset, -400_000);
//! ```

pub mod allocator;
pub mod bandwidth;
pub mod channel;
pub mod classifier;
pub mod error;
pub mod gateway;

pub use allocator::{allocate, Allocation, Assignment, RadioSlot};
pub use bandwidth::{radio_bandwidth_hz, MULTI_SF_CHANNEL_COUNT, RADIO_COUNT};
pub use channel::{Channel, Modulation};
pub use classifier::{
    classify, ChannelKind, FskChannelConfig, GatewayChannelPlan, LoraStdChannelConfig,
    MultiSfChannelConfig,
};
pub use error::{GatewayIdError, PlanError};
pub use gateway::GatewayId;
