//! Open Annotation JSON-LD Hooks
//!
//! Bidirectional transformation between a storage framework's document
//! representation and the JSON-LD "Open Annotation" representation.
//!
//! The outbound transform rewrites documents read from storage into
//! JSON-LD just before they leave the API: storage keys become JSON-LD
//! keys (`_id` to `@id`), identifiers can be expanded to absolute URLs,
//! `@context` and `@type` are injected, pagination metadata is dropped,
//! and HATEOAS link relations are promoted to plain document keys. The
//! inbound transform undoes all of that before a document is persisted.
//!
//! # Example
//!
//! ```
//! use oa_jsonld::{outbound, inbound, Profile};
//! use serde_json::json;
//!
//! let profile = Profile::default();
//! let mut doc = json!({
//!     "_id": "42",
//!     "body": "an annotation",
//!     "_links": {
//!         "collection": { "href": "https://api.example.org/annotations/" }
//!     }
//! });
//!
//! let warnings = outbound(&mut doc, None, &profile).unwrap();
//! assert!(warnings.is_empty());
//! assert_eq!(doc["@context"], "http://www.w3.org/ns/oa.jsonld");
//! assert_eq!(doc["@type"], "oa:Annotation");
//! assert_eq!(doc["@id"], "42");
//! assert_eq!(doc["partOf"], "https://api.example.org/annotations/");
//!
//! inbound(&mut doc, None, &profile);
//! assert_eq!(doc["_id"], "42");
//! assert!(doc.get("@context").is_none());
//! ```
//!
//! # Hook Integration
//!
//! A hosting framework wires the two entry points into its extension
//! slots: [`post_read`] after every read operation and [`pre_write`]
//! before every create. Both mutate caller-owned request/response handles
//! in place; the framework re-reads the mutated document slot rather than
//! any value returned from the hook.
//!
//! # Document Shapes
//!
//! | Shape | Recognized by | Outbound `@type` |
//! |-------|---------------|------------------|
//! | Item | no items key | `oa:Annotation` |
//! | Collection | items key (`@graph`) present | the Hydra Collection URL |
//!
//! Inbound additionally accepts the bulk form: a top-level JSON array of
//! items, which is also what a multi-item `@graph` normalizes into.

mod error;
mod hooks;
mod jsonld;
mod links;
mod loader;
mod media;
mod transform;
mod types;

pub use error::{HookError, LoadError, TransformError};
pub use hooks::{post_read, pre_write, ReadRequest, ReadResponse, WriteRequest};
pub use jsonld::{
    add_context, add_types, is_collection, normalize, remap_keys, remove_context, remove_types,
};
pub use links::{promote_links, strip_pagination, Warning};
pub use loader::{is_url, load_document, load_document_auto, load_document_str};
pub use media::{is_jsonld_eligible, media_type, rewrite_content_type, rewrite_content_type_value};
pub use transform::{apply, expand_identifiers, inbound, outbound, relativize_identifiers};
pub use types::{
    json_type_name, Direction, Profile, COLLECTION_PAGE_RELATIONS, COLLECTION_RELATION,
    CONTEXT_KEY, JSONLD_MEDIA_TYPE, JSON_MEDIA_TYPE, PART_OF_KEY, TYPE_KEY,
};

#[cfg(feature = "remote")]
pub use loader::load_document_url;
