//! Store records as returned to callers.
//!
//! Agent answers carry no schema, so a record keeps the object the agent
//! emitted exactly as parsed and serializes it back unchanged. The accessors
//! are read-only views that accept several common key spellings and loose
//! value types; they never rewrite the stored object.

use serde::Serialize;
use serde_json::{Map, Value};

const ID_KEYS: &[&str] = &["id", "storeId", "store_id"];
const NAME_KEYS: &[&str] = &["name", "storeName", "store_name"];
const ADDRESS_KEYS: &[&str] = &["address", "fullAddress", "full_address"];
const DISTANCE_KEYS: &[&str] = &["distance", "distanceFromSearchOrigin", "distance_km"];
const RATING_KEYS: &[&str] = &["rating", "stars"];
const HOURS_KEYS: &[&str] = &[
    "hours",
    "operatingHours",
    "operating_hours",
    "openingHours",
    "opening_hours",
];
const WEBSITE_KEYS: &[&str] = &["website", "websiteUrl", "website_url", "url"];
const PHONE_KEYS: &[&str] = &["phone", "phoneNumber", "phone_number"];

const ITEM_ID_KEYS: &[&str] = &["itemId", "item_id", "strainId", "strain_id", "id"];
const ITEM_NAME_KEYS: &[&str] = &["itemName", "item_name", "strainName", "strain_name", "name"];
const IN_STOCK_KEYS: &[&str] = &["inStock", "in_stock", "available"];

/// One retail location reported by the agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreRecord {
    #[serde(flatten)]
    fields: Map<String, Value>,
    #[serde(skip)]
    diagnostic: bool,
}

/// Stock information for one requested item at one store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InventoryItem {
    fields: Map<String, Value>,
}

impl StoreRecord {
    /// Wraps a loose JSON object. Never fails and never alters the object.
    #[must_use]
    pub fn from_json(obj: &Map<String, Value>) -> Self {
        Self::from(obj.clone())
    }

    /// Placeholder record emitted when no structured data could be recovered
    /// from the agent's answer. The unparsed answer goes in `details`.
    #[must_use]
    pub fn diagnostic(raw: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("id".into(), "store1".into());
        fields.insert("name".into(), "Results from search".into());
        fields.insert("address".into(), "Parse error - see details".into());
        fields.insert("distance".into(), 0.into());
        fields.insert("rating".into(), 0.into());
        fields.insert("hours".into(), "".into());
        fields.insert("website".into(), "".into());
        fields.insert("phone".into(), "".into());
        fields.insert("inventory".into(), Value::Array(Vec::new()));
        fields.insert("details".into(), Value::String(raw.into()));
        Self {
            fields,
            diagnostic: true,
        }
    }

    /// True only for records built by [`StoreRecord::diagnostic`].
    #[must_use]
    pub fn is_diagnostic(&self) -> bool {
        self.diagnostic
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    #[must_use]
    pub fn id(&self) -> String {
        text_at(&self.fields, ID_KEYS)
    }

    #[must_use]
    pub fn name(&self) -> String {
        text_at(&self.fields, NAME_KEYS)
    }

    #[must_use]
    pub fn address(&self) -> String {
        text_at(&self.fields, ADDRESS_KEYS)
    }

    /// Distance from the search origin, in kilometres when the agent followed
    /// instructions. Strings like `"2.3 km"` read as their leading number;
    /// zero when absent or unreadable.
    #[must_use]
    pub fn distance(&self) -> f64 {
        number_at(&self.fields, DISTANCE_KEYS)
    }

    #[must_use]
    pub fn rating(&self) -> f64 {
        number_at(&self.fields, RATING_KEYS)
    }

    #[must_use]
    pub fn hours(&self) -> String {
        text_at(&self.fields, HOURS_KEYS)
    }

    #[must_use]
    pub fn website(&self) -> String {
        text_at(&self.fields, WEBSITE_KEYS)
    }

    #[must_use]
    pub fn phone(&self) -> String {
        text_at(&self.fields, PHONE_KEYS)
    }

    /// Object entries of the `inventory` array; anything else reads as empty.
    #[must_use]
    pub fn inventory(&self) -> Vec<InventoryItem> {
        self.fields
            .get("inventory")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .map(|obj| InventoryItem::from(obj.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.fields.get("details").and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for StoreRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            diagnostic: false,
        }
    }
}

impl InventoryItem {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    #[must_use]
    pub fn item_id(&self) -> String {
        text_at(&self.fields, ITEM_ID_KEYS)
    }

    #[must_use]
    pub fn item_name(&self) -> String {
        text_at(&self.fields, ITEM_NAME_KEYS)
    }

    #[must_use]
    pub fn price(&self) -> f64 {
        number_at(&self.fields, &["price"])
    }

    #[must_use]
    pub fn in_stock(&self) -> bool {
        first(&self.fields, IN_STOCK_KEYS).is_some_and(truthy)
    }
}

impl From<Map<String, Value>> for InventoryItem {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// First non-null value among `keys`, in order.
fn first<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| obj.get(*key).filter(|v| !v.is_null()))
}

fn text_at(obj: &Map<String, Value>, keys: &[&str]) -> String {
    match first(obj, keys) {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        _ => String::new(),
    }
}

fn number_at(obj: &Map<String, Value>, keys: &[&str]) -> f64 {
    match first(obj, keys) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
        Some(Value::String(s)) => leading_number(s).unwrap_or_default(),
        _ => 0.0,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "in stock" | "available"
        ),
        _ => false,
    }
}

/// Parses the number at the start of strings like `"2.3 km"` or `"$35.00"`.
fn leading_number(s: &str) -> Option<f64> {
    let trimmed = s.trim().trim_start_matches(['$', '~']);
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed[..end].parse::<f64>().ok()
}
