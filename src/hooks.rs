//! Hook entry points invoked by the hosting framework.
//!
//! The framework owns routing, persistence, and the HTTP exchange; these
//! hooks only reshape what passes through. `post_read` runs after every
//! read, rewriting the response body into JSON-LD. `pre_write` runs before
//! every create, rewriting the parsed request document back into storage
//! form and fixing up the content-type header so the framework's own body
//! parser accepts it.
//!
//! Both hooks mutate caller-owned handles in place; their return values
//! carry only warnings and errors, never the document. A fatal error
//! aborts the current request alone, and the framework maps it to an HTTP
//! error response.

use http::header::{HeaderMap, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::HookError;
use crate::links::Warning;
use crate::media;
use crate::transform;
use crate::types::{Profile, JSON_MEDIA_TYPE};

/// Read-side request context.
#[derive(Debug, Clone)]
pub struct ReadRequest {
    /// Base URL of the resource endpoint, used to expand identifiers.
    pub base_url: Url,
}

/// The outgoing response the framework is about to send.
#[derive(Debug, Clone)]
pub struct ReadResponse {
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ReadResponse {
    /// The declared content type, when present and readable as text.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)?.to_str().ok()
    }
}

/// The incoming request the framework is about to persist.
///
/// `document` is the framework's parsed-body slot. The framework re-reads
/// the mutated value from this slot rather than from any serialized
/// buffer, so the inbound transform writes through it.
#[derive(Debug, Clone)]
pub struct WriteRequest {
    /// Base URL of the resource endpoint, used to relativize identifiers.
    pub base_url: Url,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub document: Option<Value>,
}

impl WriteRequest {
    /// The declared content type, when present and readable as text.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)?.to_str().ok()
    }
}

/// Rewrite an outgoing response body into its JSON-LD rendition.
///
/// Responses whose declared media type is neither `application/json` nor
/// `application/ld+json` pass through untouched. Otherwise the body is
/// parsed, run through the outbound transform, and serialized compactly
/// back into `response.body`. Collected warnings are logged and returned.
///
/// # Errors
///
/// Returns [`HookError::ParseFailure`] when the body does not parse as
/// JSON, and propagates outbound transform failures as
/// [`HookError::Transform`].
pub fn post_read(
    resource: &str,
    request: &ReadRequest,
    response: &mut ReadResponse,
    profile: &Profile,
) -> Result<Vec<Warning>, HookError> {
    let eligible = response
        .content_type()
        .map(media::is_jsonld_eligible)
        .unwrap_or(false);
    if !eligible {
        debug!("{resource}: response is not JSON-LD eligible, skipping");
        return Ok(Vec::new());
    }

    let mut doc: Value = serde_json::from_slice(&response.body)?;
    let warnings = transform::outbound(&mut doc, Some(&request.base_url), profile)?;
    for warning in &warnings {
        warn!("{resource}: [{}] {} at {}", warning.code, warning.message, warning.path);
    }
    response.body = serde_json::to_vec(&doc)?;
    Ok(warnings)
}

/// Rewrite an incoming document into storage form before it is persisted.
///
/// The framework's parser refuses the JSON-LD media type, so when the
/// parsed-document slot is empty the raw body bytes are parsed here
/// regardless of the declared content type. The inbound transform then
/// mutates the document in the slot, and the content-type header is
/// rewritten from `application/ld+json` to `application/json` (replacing
/// the header map as a whole) so the framework accepts the request.
///
/// # Errors
///
/// Returns [`HookError::ParseFailure`] when the request body does not
/// parse, and [`HookError::NullDocument`] when the document it yields is
/// JSON `null` and there is nothing to persist.
pub fn pre_write(
    resource: &str,
    request: &mut WriteRequest,
    profile: &Profile,
) -> Result<(), HookError> {
    if request.document.is_none() {
        let declared = request.content_type().unwrap_or("unspecified");
        debug!("{resource}: force-parsing request body declared as {declared}");
        request.document = Some(serde_json::from_slice(&request.body)?);
    }
    let doc = match request.document.as_mut() {
        Some(doc) if !doc.is_null() => doc,
        _ => return Err(HookError::NullDocument),
    };
    transform::inbound(doc, Some(&request.base_url), profile);
    if let Some(rewritten) = media::rewrite_content_type(&request.headers) {
        debug!("{resource}: rewrote content type to {JSON_MEDIA_TYPE}");
        request.headers = rewritten;
    }
    Ok(())
}
