//! Packet-Forwarder Configuration Library
//!
//! This crate loads the hand-maintained packet-forwarder base configuration
//! and overlays a computed channel plan onto it.
//!
//! The packet-forwarder treats every object under its radio section
//! (`radio_0`, `chan_multiSF_3`, ...) as a complete override, so regenerating
//! those objects would drop the board-specific values that live next to the
//! channel settings (radio type, RSSI offsets, TX gain tables). Merging
//! therefore only touches the managed leaves and keeps everything else in
//! place, including key order.
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use lcm_config::{merge_plan, parse_document};
//! use lcm_plan::{Channel, GatewayChannelPlan, GatewayId};
//!
//! let base = parse_document(r#"{
//!     /* board specific */
//!     "SX1301_conf": {
//!         "radio_0": { "type": "SX1257", "rssi_offset": -166.0 },
//!         "radio_1": { "type": "SX1257" },
//!         "chan_multiSF_0": {}, "chan_multiSF_1": {}, "chan_multiSF_2": {},
//!         "chan_multiSF_3": {}, "chan_multiSF_4": {}, "chan_multiSF_5": {},
//!         "chan_multiSF_6": {}, "chan_multiSF_7": {},
//!         "chan_Lora_std": {}, "chan_FSK": {}
//!     },
//!     "gateway_conf": { "server_address": "localhost" }
//! }"#).unwrap();
//!
//! let plan = GatewayChannelPlan::build(
//!     Utc::now(),
//!     &[Channel::lora(868_100_000, 125, vec![7, 8, 9, 10, 11, 12])],
//! ).unwrap();
//! let id: GatewayId = "0102030405060708".parse().unwrap();
//!
//! let merged = merge_plan(&base, &plan, id).unwrap();
//! assert_eq!(merged["SX1301_conf"]["radio_0"]["freq"], 868_500_000);
//! assert_eq!(merged["SX1301_conf"]["radio_0"]["rssi_offset"], -166.0);
//! assert_eq!(merged["gateway_conf"]["gateway_ID"], "0102030405060708");
//! ```

pub mod document;
pub mod error;
pub mod merge;

pub use document::{load_document, parse_document, render_document, strip_block_comments};
pub use error::ConfigError;
pub use merge::{merge_plan, GATEWAY_SECTION_KEY, RADIO_SECTION_KEYS};
