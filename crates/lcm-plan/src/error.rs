//! Error types for channel plan computation

use thiserror::Error;

use crate::classifier::ChannelKind;

/// Errors that abort the computation of a channel plan
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// A single-instance channel type appears more than once
    #[error("{0} channel already configured")]
    DuplicateChannel(ChannelKind),

    /// More multi-SF channels than the concentrator provides
    #[error("exceeded maximum number of multi-SF channels ({capacity})")]
    CapacityExceeded { capacity: usize },

    /// Modulation / spreading factor combination the concentrator cannot host
    #[error("invalid modulation {0}")]
    UnsupportedModulation(String),
}

/// Errors parsing a gateway identifier
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GatewayIdError {
    /// Not valid hexadecimal
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Wrong number of bytes
    #[error("expected 8 bytes, got {0}")]
    InvalidLength(usize),
}
