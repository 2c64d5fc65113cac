//! Turning parsed JSON values into store records.

use serde_json::Value;
use storefinder_core::StoreRecord;

/// Object keys under which agents nest their list of stores.
const LIST_FIELDS: &[&str] = &["stores", "results", "dispensaries", "locations"];

/// An array whose elements are all objects. Any other element type is a
/// mismatch for the whole array.
pub(crate) fn records_from_array(value: &Value) -> Option<Vec<StoreRecord>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_object().map(StoreRecord::from_json))
        .collect()
}

/// An array, or an object holding one. Known list keys are tried first,
/// then the first other field holding a non-empty array of objects.
pub(crate) fn records_from_container(value: &Value) -> Option<Vec<StoreRecord>> {
    match value {
        Value::Array(_) => records_from_array(value),
        Value::Object(obj) => LIST_FIELDS
            .iter()
            .filter_map(|key| obj.get(*key))
            .find_map(records_from_array)
            .or_else(|| {
                obj.iter()
                    .filter(|(key, _)| key.as_str() != "inventory")
                    .find_map(|(_, field)| records_from_array(field).filter(|r| !r.is_empty()))
            }),
        _ => None,
    }
}

/// Like [`records_from_container`], but a bare object without any list key
/// is taken as a single store.
pub(crate) fn records_from_document(value: &Value) -> Option<Vec<StoreRecord>> {
    match value {
        Value::Object(obj) if !LIST_FIELDS.iter().any(|key| obj.contains_key(*key)) => {
            Some(vec![StoreRecord::from_json(obj)])
        }
        _ => records_from_container(value),
    }
}
