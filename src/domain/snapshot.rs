//! Timestamped attribute snapshots of a transceiver slot.

use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Attribute holding the transceiver identity block.
pub const EEPROM_CONTENTS_KEY: &str = "actualIdEepromContents";
/// Vendor part number inside the identity block (the SKU).
pub const VENDOR_PART_NUM_KEY: &str = "vendorPartNum";
/// Vendor serial number inside the identity block.
pub const VENDOR_SERIAL_NUM_KEY: &str = "vendorSerialNum";

/// A partial record of one interface's attributes at a point in time.
///
/// Snapshots taken while the slot is empty carry no eeprom contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    attributes: Map<String, Value>,
}

/// Identity read from a snapshot that carries a vendor part number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub sku: String,
    pub serial: String,
}

impl Snapshot {
    /// Create a snapshot from an attribute map.
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }

    /// Merge another set of updates into this snapshot; later keys win.
    pub fn merge(&mut self, updates: Map<String, Value>) {
        self.attributes.extend(updates);
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Read the transceiver identity, if one is present.
    ///
    /// Returns `Ok(None)` when the eeprom block is absent, null, or has no
    /// vendor part number. Both identity fields are trimmed.
    pub fn identity(&self, interface: &str, timestamp: i64) -> Result<Option<Identity>, DecodeError> {
        let eeprom = match self.attributes.get(EEPROM_CONTENTS_KEY) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(DecodeError::MalformedEeprom {
                    interface: interface.to_string(),
                    timestamp,
                })
            }
        };

        let Some(part_num) = eeprom.get(VENDOR_PART_NUM_KEY) else {
            return Ok(None);
        };

        let sku = string_field(part_num, interface, timestamp, VENDOR_PART_NUM_KEY)?;
        let serial = match eeprom.get(VENDOR_SERIAL_NUM_KEY) {
            Some(value) => string_field(value, interface, timestamp, VENDOR_SERIAL_NUM_KEY)?,
            None => {
                return Err(DecodeError::MissingField {
                    interface: interface.to_string(),
                    timestamp,
                    field: VENDOR_SERIAL_NUM_KEY,
                })
            }
        };

        Ok(Some(Identity {
            sku: sku.trim().to_string(),
            serial: serial.trim().to_string(),
        }))
    }
}

fn string_field<'a>(
    value: &'a Value,
    interface: &str,
    timestamp: i64,
    field: &'static str,
) -> Result<&'a str, DecodeError> {
    value.as_str().ok_or_else(|| DecodeError::InvalidField {
        interface: interface.to_string(),
        timestamp,
        field,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: Value) -> Snapshot {
        match value {
            Value::Object(map) => Snapshot::new(map),
            _ => panic!("test snapshot must be an object"),
        }
    }

    #[test]
    fn empty_snapshot_has_no_identity() {
        let snap = Snapshot::default();
        assert!(snap.is_empty());
        assert_eq!(snap.identity("Ethernet1", 0).unwrap(), None);
    }

    #[test]
    fn null_eeprom_has_no_identity() {
        let snap = snapshot(json!({ "actualIdEepromContents": null }));
        assert_eq!(snap.identity("Ethernet1", 0).unwrap(), None);
    }

    #[test]
    fn eeprom_without_part_number_has_no_identity() {
        let snap = snapshot(json!({ "actualIdEepromContents": { "vendorSerialNum": "SN1" } }));
        assert_eq!(snap.identity("Ethernet1", 0).unwrap(), None);
    }

    #[test]
    fn identity_is_trimmed() {
        let snap = snapshot(json!({
            "actualIdEepromContents": {
                "vendorPartNum": "  QSFP-100G-SR4 ",
                "vendorSerialNum": "XYZ123    "
            }
        }));

        let identity = snap.identity("Ethernet1", 10).unwrap().unwrap();
        assert_eq!(identity.sku, "QSFP-100G-SR4");
        assert_eq!(identity.serial, "XYZ123");
    }

    #[test]
    fn missing_serial_is_an_error() {
        let snap = snapshot(json!({ "actualIdEepromContents": { "vendorPartNum": "ABC" } }));
        let err = snap.identity("Ethernet7", 42).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingField {
                interface: "Ethernet7".to_string(),
                timestamp: 42,
                field: VENDOR_SERIAL_NUM_KEY,
            }
        );
    }

    #[test]
    fn non_string_part_number_is_an_error() {
        let snap = snapshot(json!({
            "actualIdEepromContents": { "vendorPartNum": 17, "vendorSerialNum": "SN1" }
        }));
        assert!(matches!(
            snap.identity("Ethernet1", 0),
            Err(DecodeError::InvalidField { field: VENDOR_PART_NUM_KEY, .. })
        ));
    }

    #[test]
    fn non_map_eeprom_is_an_error() {
        let snap = snapshot(json!({ "actualIdEepromContents": "garbage" }));
        assert!(matches!(
            snap.identity("Ethernet1", 0),
            Err(DecodeError::MalformedEeprom { .. })
        ));
    }

    #[test]
    fn merge_overrides_existing_keys() {
        let mut snap = snapshot(json!({ "a": 1, "b": 2 }));
        let Value::Object(updates) = json!({ "b": 3, "c": 4 }) else {
            unreachable!()
        };
        snap.merge(updates);

        assert_eq!(snap.attributes().get("a"), Some(&json!(1)));
        assert_eq!(snap.attributes().get("b"), Some(&json!(3)));
        assert_eq!(snap.attributes().get("c"), Some(&json!(4)));
    }
}
