//! Core types for the Open Annotation JSON-LD transforms.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generic JSON media type.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// JSON-LD media type.
pub const JSONLD_MEDIA_TYPE: &str = "application/ld+json";

/// JSON-LD context key.
pub const CONTEXT_KEY: &str = "@context";

/// JSON-LD type key.
pub const TYPE_KEY: &str = "@type";

/// Collection link relations promoted to top-level keys, in promotion order.
///
/// `prev` and `previous` both appear because hosting frameworks differ in
/// which relation name they emit.
pub const COLLECTION_PAGE_RELATIONS: &[&str] = &["first", "last", "next", "prev", "previous"];

/// Link relation on an item that points at its containing collection.
pub const COLLECTION_RELATION: &str = "collection";

/// Top-level key an item's `collection` relation is promoted to.
pub const PART_OF_KEY: &str = "partOf";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Direction of a document transform.
///
/// Outbound turns a storage document into its JSON-LD client form;
/// inbound turns a client-submitted JSON-LD document back into storage form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outbound,
    Inbound,
}

impl Direction {
    /// Create a direction from an outbound flag (true = Outbound, false = Inbound).
    pub fn from_outbound_flag(is_outbound: bool) -> Self {
        if is_outbound {
            Direction::Outbound
        } else {
            Direction::Inbound
        }
    }
}

/// Configuration for one annotation store, threaded into every transform call.
///
/// The defaults describe an Open Annotation deployment: `_id`/`@id`
/// identifiers, a `@graph` items sequence, the W3C OA context, and Hydra
/// collection typing. No global state is consulted anywhere; hosts that serve
/// several stores construct one `Profile` per store.
#[derive(Debug, Clone)]
pub struct Profile {
    /// URL injected as the top-level `@context`.
    pub context_url: String,
    /// `@type` value for a single annotation.
    pub item_type: String,
    /// `@type` value for a collection wrapper.
    pub collection_type: String,
    /// Identifier key in the storage representation.
    pub storage_id_key: String,
    /// Identifier key in the JSON-LD representation.
    pub id_key: String,
    /// Additional storage-to-JSON-LD key renames beyond the identifier pair.
    pub extra_key_map: Vec<(String, String)>,
    /// Key holding a collection's items sequence.
    pub items_key: String,
    /// Key holding the framework's hyperlink metadata.
    pub links_key: String,
    /// Key holding the framework's pagination metadata.
    pub meta_key: String,
    /// When true, item identifiers are expanded against the request base URL
    /// on the way out and relativized on the way in.
    pub absolute_ids: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            context_url: "http://www.w3.org/ns/oa.jsonld".to_string(),
            item_type: "oa:Annotation".to_string(),
            collection_type: "http://www.w3.org/ns/hydra/core#Collection".to_string(),
            storage_id_key: "_id".to_string(),
            id_key: "@id".to_string(),
            extra_key_map: Vec::new(),
            items_key: "@graph".to_string(),
            links_key: "_links".to_string(),
            meta_key: "_meta".to_string(),
            absolute_ids: false,
        }
    }
}

impl Profile {
    /// Create a profile with the Open Annotation defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether identifiers are expanded to absolute URLs.
    pub fn absolute_ids(mut self, on: bool) -> Self {
        self.absolute_ids = on;
        self
    }

    /// Key mapping applied on the outbound path (storage key, JSON-LD key).
    ///
    /// The identifier pair always comes first; configured extra pairs follow.
    pub fn outbound_key_map(&self) -> Vec<(&str, &str)> {
        let mut map = vec![(self.storage_id_key.as_str(), self.id_key.as_str())];
        map.extend(self.extra_key_map.iter().map(|(a, b)| (a.as_str(), b.as_str())));
        map
    }

    /// Key mapping applied on the inbound path (JSON-LD key, storage key).
    pub fn inbound_key_map(&self) -> Vec<(&str, &str)> {
        let mut map = vec![(self.id_key.as_str(), self.storage_id_key.as_str())];
        map.extend(self.extra_key_map.iter().map(|(a, b)| (b.as_str(), a.as_str())));
        map
    }
}
