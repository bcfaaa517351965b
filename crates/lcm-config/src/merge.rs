//! Channel plan merging
//!
//! Managed fields, relative to the radio section object:
//!
//! | Object                | Fields                                       |
//! |-----------------------|----------------------------------------------|
//! | `radio_<0..1>`        | enable, freq                                 |
//! | `chan_multiSF_<0..7>` | enable, radio, if                            |
//! | `chan_Lora_std`       | enable, radio, if, bandwidth, spread_factor  |
//! | `chan_FSK`            | enable, radio, if, bandwidth, datarate       |
//!
//! plus `gateway_conf.gateway_ID`. Every managed object must already exist
//! in the base document.

use lcm_plan::{GatewayChannelPlan, GatewayId};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::ConfigError;

/// Candidate keys of the radio section, in lookup order
pub const RADIO_SECTION_KEYS: [&str; 2] = ["SX1301_conf", "SX130x_conf"];

/// Key of the gateway section holding `gateway_ID`
pub const GATEWAY_SECTION_KEY: &str = "gateway_conf";

/// Overlay a channel plan onto a base document
///
/// The base document is left untouched; on error no partially merged
/// document escapes.
pub fn merge_plan(
    base: &Value,
    plan: &GatewayChannelPlan,
    gateway_id: GatewayId,
) -> Result<Value, ConfigError> {
    let mut document = base.clone();
    let root = document.as_object_mut().ok_or(ConfigError::Structural {
        path: "(root)".to_string(),
        found: type_name(Some(base)),
    })?;

    let section_key = RADIO_SECTION_KEYS
        .iter()
        .copied()
        .find(|key| root.contains_key(*key))
        .unwrap_or(RADIO_SECTION_KEYS[0]);
    let section = object_at(root, section_key, section_key)?;

    for (i, radio) in plan.radios.iter().enumerate() {
        let obj = child(section, section_key, &format!("radio_{i}"))?;
        obj.insert("enable".into(), json!(radio.enable));
        obj.insert("freq".into(), json!(radio.freq));
    }

    for (i, channel) in plan.multi_sf_channels.iter().enumerate() {
        let obj = child(section, section_key, &format!("chan_multiSF_{i}"))?;
        obj.insert("enable".into(), json!(channel.enable));
        obj.insert("radio".into(), json!(channel.radio));
        obj.insert("if".into(), json!(channel.if_offset));
    }

    let std = &plan.lora_std_channel;
    let obj = child(section, section_key, "chan_Lora_std")?;
    obj.insert("enable".into(), json!(std.enable));
    obj.insert("radio".into(), json!(std.radio));
    obj.insert("if".into(), json!(std.if_offset));
    obj.insert("bandwidth".into(), json!(std.bandwidth));
    obj.insert("spread_factor".into(), json!(std.spread_factor));

    let fsk = &plan.fsk_channel;
    let obj = child(section, section_key, "chan_FSK")?;
    obj.insert("enable".into(), json!(fsk.enable));
    obj.insert("radio".into(), json!(fsk.radio));
    obj.insert("if".into(), json!(fsk.if_offset));
    obj.insert("bandwidth".into(), json!(fsk.bandwidth));
    obj.insert("datarate".into(), json!(fsk.datarate));

    let gateway = object_at(root, GATEWAY_SECTION_KEY, GATEWAY_SECTION_KEY)?;
    gateway.insert("gateway_ID".into(), json!(gateway_id.to_string()));

    debug!(
        section = section_key,
        gateway_id = %gateway_id,
        "channel plan merged"
    );

    Ok(document)
}

fn child<'a>(
    section: &'a mut Map<String, Value>,
    section_key: &str,
    key: &str,
) -> Result<&'a mut Map<String, Value>, ConfigError> {
    object_at(section, key, &format!("{section_key}.{key}"))
}

/// Borrow `parent[key]` as an object, reporting `path` when it is not one
fn object_at<'a>(
    parent: &'a mut Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a mut Map<String, Value>, ConfigError> {
    match parent.get_mut(key) {
        Some(Value::Object(obj)) => Ok(obj),
        other => Err(ConfigError::Structural {
            path: path.to_string(),
            found: type_name(other.as_deref()),
        }),
    }
}

fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "missing",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}
