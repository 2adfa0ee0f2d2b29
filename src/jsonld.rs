//! Generic JSON-LD helpers: key remapping, context/type injection and
//! removal, collection detection, and structural normalization.
//!
//! Everything here operates on `serde_json::Value` with insertion order
//! preserved. A document is a *collection* when it carries the configured
//! items key (`@graph` by default); the distinction is structural, no type
//! tag is consulted.

use serde_json::{Map, Value};

use crate::types::{Profile, CONTEXT_KEY, TYPE_KEY};

/// Return true if the document is a collection wrapper.
pub fn is_collection(doc: &Value, items_key: &str) -> bool {
    doc.as_object()
        .map(|map| map.contains_key(items_key))
        .unwrap_or(false)
}

/// Rename top-level keys according to `key_map` (source key, target key).
///
/// The relative order of keys is preserved: the renamed entry stays in the
/// position of the original. Absent source keys are a no-op. For a
/// collection, the same renaming is applied to the top level of every
/// element in the items sequence (and through nested collections); keys
/// deeper inside item bodies are never touched, since nested annotation
/// bodies and targets may carry their own `@id`. A top-level array (the
/// bulk form) is handled element by element.
pub fn remap_keys(doc: &mut Value, key_map: &[(&str, &str)], items_key: &str) {
    match doc {
        Value::Object(map) => {
            let entries = std::mem::take(map);
            for (key, mut value) in entries {
                if key == items_key {
                    if let Value::Array(items) = &mut value {
                        for item in items {
                            remap_keys(item, key_map, items_key);
                        }
                    }
                }
                let renamed = match key_map.iter().find(|(from, _)| *from == key) {
                    Some((_, to)) => (*to).to_string(),
                    None => key,
                };
                map.insert(renamed, value);
            }
        }
        Value::Array(items) => {
            for item in items {
                remap_keys(item, key_map, items_key);
            }
        }
        _ => {}
    }
}

/// Insert `@context` as the first key of the document.
///
/// A pre-existing `@context` is replaced, not duplicated. Non-object
/// documents are left unchanged.
pub fn add_context(doc: &mut Value, context_url: &str) {
    if let Value::Object(map) = doc {
        insert_near_front(map, CONTEXT_KEY, Value::String(context_url.to_string()));
    }
}

/// Inject `@type` values: the collection type on a collection wrapper plus
/// the item type on each contained item, or the item type on a bare item.
///
/// The key is placed after a leading `@context` when one is present, so the
/// serialized form reads `@context`, `@type`, rest. Pre-existing `@type`
/// values are replaced.
pub fn add_types(doc: &mut Value, profile: &Profile) {
    if is_collection(doc, &profile.items_key) {
        let Value::Object(map) = doc else { return };
        insert_near_front(map, TYPE_KEY, Value::String(profile.collection_type.clone()));
        if let Some(Value::Array(items)) = map.get_mut(&profile.items_key) {
            for item in items {
                if let Value::Object(item_map) = item {
                    insert_near_front(item_map, TYPE_KEY, Value::String(profile.item_type.clone()));
                }
            }
        }
    } else if let Value::Object(map) = doc {
        insert_near_front(map, TYPE_KEY, Value::String(profile.item_type.clone()));
    }
}

/// Remove `@context` from the document and from contained items.
///
/// Absence is a no-op.
pub fn remove_context(doc: &mut Value, items_key: &str) {
    strip_key(doc, CONTEXT_KEY, items_key);
}

/// Remove `@type` from the document and from contained items.
///
/// Absence is a no-op.
pub fn remove_types(doc: &mut Value, items_key: &str) {
    strip_key(doc, TYPE_KEY, items_key);
}

/// Normalize an inbound document to a shape the storage layer accepts.
///
/// Clients may POST the JSON-LD graph convention: a wrapper object whose
/// items key holds the annotations. A wrapper with exactly one item is
/// unwrapped to that bare item; any other item count becomes a JSON array
/// of the items (the framework's bulk-insert form). Remaining wrapper keys
/// have no storage representation and are dropped with the wrapper.
/// Non-collection documents are left unchanged.
pub fn normalize(doc: &mut Value, items_key: &str) {
    let Value::Object(map) = &mut *doc else { return };
    if !matches!(map.get(items_key), Some(Value::Array(_))) {
        return;
    }
    let Some(Value::Array(mut items)) = map.shift_remove(items_key) else {
        return;
    };
    *doc = match items.len() {
        1 => items.remove(0),
        _ => Value::Array(items),
    };
}

// --- Internal implementation ---

/// Delete `key` from the document's top level, from every element of the
/// items sequence, and from every element of a top-level array.
fn strip_key(doc: &mut Value, key: &str, items_key: &str) {
    match doc {
        Value::Object(map) => {
            map.shift_remove(key);
            if let Some(items) = map.get_mut(items_key) {
                strip_key(items, key, items_key);
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_key(item, key, items_key);
            }
        }
        _ => {}
    }
}

/// Insert `key` near the front of the map: after a leading `@context` when
/// present, otherwise first. Any existing entry for `key` is replaced.
fn insert_near_front(map: &mut Map<String, Value>, key: &str, value: Value) {
    map.shift_remove(key);
    let rest = std::mem::take(map);
    let mut pending = Some(value);
    for (k, v) in rest {
        if k != CONTEXT_KEY {
            if let Some(val) = pending.take() {
                map.insert(key.to_string(), val);
            }
        }
        map.insert(k, v);
    }
    if let Some(val) = pending {
        map.insert(key.to_string(), val);
    }
}
