//! The two directional document transforms.
//!
//! `outbound` rewrites a storage document into its JSON-LD rendition just
//! before it leaves the API; `inbound` rewrites an incoming JSON-LD
//! document back into storage form just before it is persisted. Both
//! mutate the document in place. The steps run in a fixed order:
//!
//! - outbound: key remap (storage → JSON-LD), absolute-URL expansion,
//!   `@context`/`@type` injection, pagination-metadata removal, link
//!   promotion.
//! - inbound: identifier relativization, key remap (JSON-LD → storage),
//!   graph normalization, `@context`/`@type` removal.
//!
//! Outbound is fallible (collisions, broken identifiers); inbound is
//! deliberately lenient and never fails.

use serde_json::Value;
use url::Url;

use crate::error::TransformError;
use crate::jsonld::{self, is_collection};
use crate::links::{self, Warning};
use crate::types::{json_type_name, Direction, Profile};

/// Rewrite a storage document into its JSON-LD rendition.
///
/// Absolute-URL expansion runs only when the profile enables it and a base
/// URL is supplied. Warnings from link promotion are returned for the
/// caller to log or surface.
///
/// # Errors
///
/// Returns [`TransformError::MissingIdentifier`] or
/// [`TransformError::InvalidIdentifier`] from identifier expansion, and
/// [`TransformError::KeyCollision`] from link promotion. On error the
/// document may be partially rewritten and should be discarded.
pub fn outbound(
    doc: &mut Value,
    base: Option<&Url>,
    profile: &Profile,
) -> Result<Vec<Warning>, TransformError> {
    let mut warnings = Vec::new();
    jsonld::remap_keys(doc, &profile.outbound_key_map(), &profile.items_key);
    if profile.absolute_ids {
        if let Some(base) = base {
            expand_identifiers(doc, base, profile)?;
        }
    }
    jsonld::add_context(doc, &profile.context_url);
    jsonld::add_types(doc, profile);
    links::strip_pagination(doc, &profile.meta_key);
    links::promote_links(doc, profile, &mut warnings)?;
    Ok(warnings)
}

/// Rewrite an incoming JSON-LD document into storage form.
///
/// Identifiers under the base URL are relativized when the profile has
/// absolute identifiers enabled and a base is supplied. Foreign-origin
/// identifiers, missing keys, and unexpected shapes all pass through
/// unchanged; the storage layer's own validation is the arbiter of what
/// gets persisted.
pub fn inbound(doc: &mut Value, base: Option<&Url>, profile: &Profile) {
    if profile.absolute_ids {
        if let Some(base) = base {
            relativize_identifiers(doc, base, profile);
        }
    }
    jsonld::remap_keys(doc, &profile.inbound_key_map(), &profile.items_key);
    jsonld::normalize(doc, &profile.items_key);
    jsonld::remove_context(doc, &profile.items_key);
    jsonld::remove_types(doc, &profile.items_key);
}

/// Run the transform for `direction`. Inbound never produces warnings.
///
/// # Errors
///
/// Propagates the outbound errors; inbound is infallible.
pub fn apply(
    doc: &mut Value,
    direction: Direction,
    base: Option<&Url>,
    profile: &Profile,
) -> Result<Vec<Warning>, TransformError> {
    match direction {
        Direction::Outbound => outbound(doc, base, profile),
        Direction::Inbound => {
            inbound(doc, base, profile);
            Ok(Vec::new())
        }
    }
}

/// Resolve item identifiers against the request base URL.
///
/// Standard URL-join semantics apply: a relative identifier becomes
/// absolute, an already-absolute identifier is returned unchanged, so the
/// operation is idempotent. For a collection this touches each contained
/// item, never the wrapper's own identifier. Non-object elements are
/// ignored.
///
/// # Errors
///
/// Returns [`TransformError::MissingIdentifier`] when an item lacks the
/// identifier key, and [`TransformError::InvalidIdentifier`] when the
/// identifier is not a string or cannot be joined to the base.
pub fn expand_identifiers(
    doc: &mut Value,
    base: &Url,
    profile: &Profile,
) -> Result<(), TransformError> {
    if is_collection(doc, &profile.items_key) {
        let Value::Object(map) = doc else { return Ok(()) };
        if let Some(Value::Array(items)) = map.get_mut(&profile.items_key) {
            for (index, item) in items.iter_mut().enumerate() {
                let path = format!("/{}/{}", profile.items_key, index);
                expand_one(item, base, &profile.id_key, &path)?;
            }
        }
        Ok(())
    } else {
        expand_one(doc, base, &profile.id_key, "/")
    }
}

/// Rewrite identifiers that fall under `base` back to their relative form.
///
/// The inverse of [`expand_identifiers`], applied on the inbound path: an
/// identifier string starting with the base URL keeps only the remainder.
/// Identifiers under other origins and non-string identifiers are left
/// unchanged. Accepts a bare item, a collection, or the bulk array form.
pub fn relativize_identifiers(doc: &mut Value, base: &Url, profile: &Profile) {
    if is_collection(doc, &profile.items_key) {
        let Value::Object(map) = doc else { return };
        if let Some(Value::Array(items)) = map.get_mut(&profile.items_key) {
            for item in items {
                relativize_one(item, base, &profile.id_key);
            }
        }
    } else if let Value::Array(items) = doc {
        for item in items {
            relativize_one(item, base, &profile.id_key);
        }
    } else {
        relativize_one(doc, base, &profile.id_key);
    }
}

fn expand_one(item: &mut Value, base: &Url, id_key: &str, path: &str) -> Result<(), TransformError> {
    let Value::Object(map) = item else { return Ok(()) };
    let Some(id_value) = map.get_mut(id_key) else {
        return Err(TransformError::MissingIdentifier {
            path: path.to_string(),
            key: id_key.to_string(),
        });
    };
    let Value::String(id) = id_value else {
        return Err(TransformError::InvalidIdentifier {
            path: path.to_string(),
            message: format!("identifier is {}, expected a string", json_type_name(id_value)),
        });
    };
    let joined = base.join(id).map_err(|err| TransformError::InvalidIdentifier {
        path: path.to_string(),
        message: err.to_string(),
    })?;
    *id = joined.into();
    Ok(())
}

fn relativize_one(item: &mut Value, base: &Url, id_key: &str) {
    let Value::Object(map) = item else { return };
    let Some(Value::String(id)) = map.get_mut(id_key) else { return };
    if let Some(relative) = id.strip_prefix(base.as_str()).map(|rest| rest.to_string()) {
        *id = relative;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://api.example.org/annotations/").unwrap()
    }

    fn absolute_profile() -> Profile {
        Profile::new().absolute_ids(true)
    }

    // === Identifier Expansion ===

    #[test]
    fn expands_relative_identifier_against_base() {
        let mut doc = json!({"@id": "42"});
        expand_identifiers(&mut doc, &base(), &Profile::default()).unwrap();
        assert_eq!(doc["@id"], "https://api.example.org/annotations/42");
    }

    #[test]
    fn leaves_absolute_identifier_unchanged() {
        let mut doc = json!({"@id": "https://other.org/x"});
        expand_identifiers(&mut doc, &base(), &Profile::default()).unwrap();
        assert_eq!(doc["@id"], "https://other.org/x");
    }

    #[test]
    fn expansion_is_idempotent() {
        let mut doc = json!({"@id": "42"});
        expand_identifiers(&mut doc, &base(), &Profile::default()).unwrap();
        expand_identifiers(&mut doc, &base(), &Profile::default()).unwrap();
        assert_eq!(doc["@id"], "https://api.example.org/annotations/42");
    }

    #[test]
    fn expands_items_but_not_the_wrapper() {
        let mut doc = json!({
            "@graph": [{"@id": "1"}, {"@id": "2"}]
        });
        expand_identifiers(&mut doc, &base(), &Profile::default()).unwrap();
        assert_eq!(doc["@graph"][0]["@id"], "https://api.example.org/annotations/1");
        assert_eq!(doc["@graph"][1]["@id"], "https://api.example.org/annotations/2");
        assert!(doc.get("@id").is_none());
    }

    #[test]
    fn missing_identifier_is_fatal() {
        let mut doc = json!({"@graph": [{"@id": "1"}, {"body": "no id"}]});
        let err = expand_identifiers(&mut doc, &base(), &Profile::default()).unwrap_err();
        match err {
            TransformError::MissingIdentifier { path, key } => {
                assert_eq!(path, "/@graph/1");
                assert_eq!(key, "@id");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_string_identifier_is_fatal() {
        let mut doc = json!({"@id": 42});
        let err = expand_identifiers(&mut doc, &base(), &Profile::default()).unwrap_err();
        match err {
            TransformError::InvalidIdentifier { path, message } => {
                assert_eq!(path, "/");
                assert!(message.contains("number"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // === Identifier Relativization ===

    #[test]
    fn relativizes_identifier_under_base() {
        let mut doc = json!({"@id": "https://api.example.org/annotations/42"});
        relativize_identifiers(&mut doc, &base(), &Profile::default());
        assert_eq!(doc["@id"], "42");
    }

    #[test]
    fn foreign_origin_identifier_passes_through() {
        let mut doc = json!({"@id": "https://other.org/x"});
        relativize_identifiers(&mut doc, &base(), &Profile::default());
        assert_eq!(doc["@id"], "https://other.org/x");
    }

    #[test]
    fn relativizes_bulk_array_form() {
        let mut doc = json!([
            {"@id": "https://api.example.org/annotations/1"},
            {"@id": "https://api.example.org/annotations/2"}
        ]);
        relativize_identifiers(&mut doc, &base(), &Profile::default());
        assert_eq!(doc[0]["@id"], "1");
        assert_eq!(doc[1]["@id"], "2");
    }

    // === Outbound ===

    #[test]
    fn outbound_item_produces_jsonld_rendition() {
        let mut doc = json!({
            "_id": "42",
            "body": "note",
            "target": "http://example.org/doc",
            "_links": {
                "self": {"href": "https://api.example.org/annotations/42"},
                "collection": {"href": "https://api.example.org/annotations/"}
            }
        });
        let warnings = outbound(&mut doc, Some(&base()), &absolute_profile()).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            concat!(
                r#"{"@context":"http://www.w3.org/ns/oa.jsonld","#,
                r#""@type":"oa:Annotation","#,
                r#""@id":"https://api.example.org/annotations/42","#,
                r#""body":"note","#,
                r#""target":"http://example.org/doc","#,
                r#""partOf":"https://api.example.org/annotations/"}"#
            )
        );
    }

    #[test]
    fn outbound_collection_produces_typed_graph() {
        let mut doc = json!({
            "@graph": [
                {"_id": "1", "body": "a", "_links": {"self": {"href": "x"}}},
                {"_id": "2", "body": "b"}
            ],
            "_links": {
                "self": {"href": "https://api.example.org/annotations/"},
                "next": {"href": "/annotations/?page=2"}
            },
            "_meta": {"page": 1, "max_results": 25, "total": 50}
        });
        let warnings = outbound(&mut doc, Some(&base()), &absolute_profile()).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(doc["@context"], "http://www.w3.org/ns/oa.jsonld");
        assert_eq!(doc["@type"], "http://www.w3.org/ns/hydra/core#Collection");
        assert_eq!(doc["next"], "/annotations/?page=2");
        assert!(doc.get("_meta").is_none());
        assert!(doc.get("_links").is_none());
        let first = &doc["@graph"][0];
        assert_eq!(first["@type"], "oa:Annotation");
        assert_eq!(first["@id"], "https://api.example.org/annotations/1");
        assert!(first.get("_links").is_none());
        assert_eq!(doc["@graph"][1]["@id"], "https://api.example.org/annotations/2");
    }

    #[test]
    fn outbound_without_base_keeps_relative_identifier() {
        let mut doc = json!({"_id": "42", "body": "note"});
        let warnings = outbound(&mut doc, None, &absolute_profile()).unwrap();
        assert_eq!(doc["@id"], "42");
        // The missing links map is tolerated and recorded.
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, "W001");
    }

    #[test]
    fn outbound_always_adds_context_and_type() {
        let mut doc = json!({"_id": "42"});
        outbound(&mut doc, None, &Profile::default()).unwrap();
        assert!(doc.get("@context").is_some());
        assert!(doc.get("@type").is_some());
    }

    // === Inbound ===

    #[test]
    fn inbound_strips_jsonld_keys_and_restores_storage_keys() {
        let mut doc = json!({
            "@context": "http://www.w3.org/ns/oa.jsonld",
            "@type": "oa:Annotation",
            "@id": "42",
            "body": "note"
        });
        inbound(&mut doc, None, &Profile::default());
        assert_eq!(doc, json!({"_id": "42", "body": "note"}));
    }

    #[test]
    fn inbound_unwraps_single_item_graph() {
        let mut doc = json!({
            "@context": "http://www.w3.org/ns/oa.jsonld",
            "@graph": [
                {"@id": "7", "@type": "oa:Annotation", "body": "x"}
            ]
        });
        inbound(&mut doc, None, &Profile::default());
        assert_eq!(doc, json!({"_id": "7", "body": "x"}));
    }

    #[test]
    fn inbound_turns_multi_item_graph_into_bulk_array() {
        let mut doc = json!({
            "@graph": [
                {"@id": "1", "@type": "oa:Annotation"},
                {"@id": "2", "@type": "oa:Annotation"}
            ]
        });
        inbound(&mut doc, None, &Profile::default());
        assert_eq!(doc, json!([{"_id": "1"}, {"_id": "2"}]));
    }

    // === Round Trips ===

    #[test]
    fn identifier_round_trips_without_absolute_rewriting() {
        let mut doc = json!({"_id": "42", "body": "note"});
        outbound(&mut doc, None, &Profile::default()).unwrap();
        inbound(&mut doc, None, &Profile::default());
        assert_eq!(doc, json!({"_id": "42", "body": "note"}));
    }

    #[test]
    fn identifier_round_trips_with_absolute_rewriting() {
        let mut doc = json!({"_id": "42", "body": "note"});
        outbound(&mut doc, Some(&base()), &absolute_profile()).unwrap();
        assert_eq!(doc["@id"], "https://api.example.org/annotations/42");
        inbound(&mut doc, Some(&base()), &absolute_profile());
        assert_eq!(doc, json!({"_id": "42", "body": "note"}));
    }

    // === Dispatch ===

    #[test]
    fn apply_routes_by_direction() {
        let profile = Profile::default();
        let mut doc = json!({"_id": "1"});
        let warnings = apply(&mut doc, Direction::Outbound, None, &profile).unwrap();
        assert!(!warnings.is_empty());
        assert_eq!(doc["@id"], "1");

        let mut doc = json!({"@id": "1", "@context": "c", "@type": "t"});
        let warnings = apply(&mut doc, Direction::Inbound, None, &profile).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(doc, json!({"_id": "1"}));
    }
}
