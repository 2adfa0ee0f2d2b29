//! HATEOAS link promotion and pagination cleanup.
//!
//! Storage responses describe navigation in a links map (`_links` by
//! default) keyed by relation name. The JSON-LD rendition flattens the
//! useful relations into plain document keys: pagination relations become
//! top-level keys on a collection, and a bare item's `collection` relation
//! becomes its `partOf`. Everything else in the links map (`self`,
//! `parent`, ...) is dropped along with the map itself, and a rewritten
//! collection also discards the links maps of its items rather than
//! rewriting them. A document without a links map is left untouched.
//!
//! Problems that leave the document usable are reported as [`Warning`]
//! values rather than errors:
//!
//! - `W001`: the document carries no links map
//! - `W002`: a recognized relation has no usable href
//! - `W003`: an item document carries no `collection` relation, so no
//!   `partOf` can be derived
//!
//! A promoted key colliding with an existing document key is not
//! recoverable and fails with [`TransformError::KeyCollision`].

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::TransformError;
use crate::jsonld::is_collection;
use crate::types::{
    json_type_name, Profile, COLLECTION_PAGE_RELATIONS, COLLECTION_RELATION, PART_OF_KEY,
};

/// Key holding the target URL inside a link entry.
const HREF_KEY: &str = "href";

/// A single non-fatal finding from link promotion.
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub code: String,
    /// JSON path to the issue in the input document (e.g., "/_links/next").
    pub path: String,
    pub message: String,
}

/// Promote link relations out of the links map and drop the map.
///
/// On a collection wrapper, the pagination relations (`first`, `last`,
/// `next`, `prev`, `previous`) are promoted to top-level keys holding the
/// href string, and the links map of every contained item is deleted
/// without promotion. On a bare item, the `collection` relation is
/// promoted to `partOf`. Promoted keys are appended after the existing
/// keys. A document with no links map records `W001` and is left
/// untouched.
///
/// Non-fatal findings are pushed onto `warnings`.
///
/// # Errors
///
/// Returns [`TransformError::KeyCollision`] when a promoted key is already
/// present in the document. The document may be partially rewritten when
/// this happens; callers should discard it.
pub fn promote_links(
    doc: &mut Value,
    profile: &Profile,
    warnings: &mut Vec<Warning>,
) -> Result<(), TransformError> {
    let collection = is_collection(doc, &profile.items_key);
    let Value::Object(map) = doc else { return Ok(()) };

    let links = match map.shift_remove(&profile.links_key) {
        Some(Value::Object(links)) => Some(links),
        Some(other) => {
            warnings.push(Warning {
                code: "W001".to_string(),
                path: "/".to_string(),
                message: format!(
                    "links entry \"{}\" is {}, expected a map",
                    profile.links_key,
                    json_type_name(&other)
                ),
            });
            None
        }
        None => {
            warnings.push(Warning {
                code: "W001".to_string(),
                path: "/".to_string(),
                message: format!("document has no links map \"{}\"", profile.links_key),
            });
            None
        }
    };

    if collection {
        if let Some(links) = &links {
            promote_page_links(map, links, profile, warnings)?;
            // Item link metadata inside a collection is discarded, not rewritten.
            if let Some(Value::Array(items)) = map.get_mut(&profile.items_key) {
                for item in items {
                    if let Value::Object(item_map) = item {
                        item_map.shift_remove(&profile.links_key);
                    }
                }
            }
        }
    } else if let Some(links) = &links {
        promote_part_of(map, links, profile, warnings)?;
    }
    Ok(())
}

/// Remove the pagination metadata entry (`_meta` by default) from the
/// document's top level. Absence is a no-op.
pub fn strip_pagination(doc: &mut Value, meta_key: &str) {
    if let Value::Object(map) = doc {
        map.shift_remove(meta_key);
    }
}

/// Promote pagination relations to top-level keys on a collection wrapper.
fn promote_page_links(
    map: &mut Map<String, Value>,
    links: &Map<String, Value>,
    profile: &Profile,
    warnings: &mut Vec<Warning>,
) -> Result<(), TransformError> {
    for relation in COLLECTION_PAGE_RELATIONS {
        let Some(entry) = links.get(*relation) else { continue };
        let Some(href) = link_href(entry) else {
            warnings.push(Warning {
                code: "W002".to_string(),
                path: format!("/{}/{}", profile.links_key, relation),
                message: format!("link relation \"{relation}\" has no usable href"),
            });
            continue;
        };
        if map.contains_key(*relation) {
            return Err(TransformError::KeyCollision {
                relation: (*relation).to_string(),
                key: (*relation).to_string(),
            });
        }
        map.insert((*relation).to_string(), Value::String(href.to_string()));
    }
    Ok(())
}

/// Promote an item's `collection` relation into the document as `partOf`.
fn promote_part_of(
    map: &mut Map<String, Value>,
    links: &Map<String, Value>,
    profile: &Profile,
    warnings: &mut Vec<Warning>,
) -> Result<(), TransformError> {
    let Some(entry) = links.get(COLLECTION_RELATION) else {
        warnings.push(Warning {
            code: "W003".to_string(),
            path: "/".to_string(),
            message: format!("item has no \"{COLLECTION_RELATION}\" link relation"),
        });
        return Ok(());
    };
    let Some(href) = link_href(entry) else {
        warnings.push(Warning {
            code: "W002".to_string(),
            path: format!("/{}/{}", profile.links_key, COLLECTION_RELATION),
            message: format!("link relation \"{COLLECTION_RELATION}\" has no usable href"),
        });
        return Ok(());
    };
    if map.contains_key(PART_OF_KEY) {
        return Err(TransformError::KeyCollision {
            relation: COLLECTION_RELATION.to_string(),
            key: PART_OF_KEY.to_string(),
        });
    }
    map.insert(PART_OF_KEY.to_string(), Value::String(href.to_string()));
    Ok(())
}

/// Extract the href from a link entry; accepts a bare string or a map
/// with an `href` string.
fn link_href(entry: &Value) -> Option<&str> {
    match entry {
        Value::String(href) => Some(href),
        Value::Object(map) => map.get(HREF_KEY).and_then(Value::as_str),
        _ => None,
    }
}
