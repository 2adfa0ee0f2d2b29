//! Content-type classification and header rewriting.
//!
//! Both `application/json` and `application/ld+json` mark a body as
//! JSON-LD-eligible; lenient framework defaults often declare plain JSON
//! for bodies that are in fact JSON-LD. Classification looks only at the
//! media-type portion of the header value (parameters after `;` are
//! ignored) and compares ASCII-case-insensitively.
//!
//! The storage framework's body parser only accepts `application/json`,
//! so a request declaring `application/ld+json` has its content type
//! rewritten to the generic type before the framework sees it. Parameters
//! after the media type are preserved byte-for-byte.

use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

use crate::types::{JSONLD_MEDIA_TYPE, JSON_MEDIA_TYPE};

/// The media-type portion of a content-type value: everything before the
/// first `;`, trimmed.
pub fn media_type(value: &str) -> &str {
    let media = match value.split_once(';') {
        Some((media, _)) => media,
        None => value,
    };
    media.trim()
}

/// True when the declared content type marks the body as JSON-LD-eligible.
pub fn is_jsonld_eligible(value: &str) -> bool {
    let media = media_type(value);
    media.eq_ignore_ascii_case(JSON_MEDIA_TYPE) || media.eq_ignore_ascii_case(JSONLD_MEDIA_TYPE)
}

/// Rewrite a content-type value declaring `application/ld+json` to declare
/// `application/json`, keeping any parameter segment exactly as given.
/// Returns `None` when the value declares anything else.
pub fn rewrite_content_type_value(value: &str) -> Option<String> {
    if !media_type(value).eq_ignore_ascii_case(JSONLD_MEDIA_TYPE) {
        return None;
    }
    match value.split_once(';') {
        Some((_, params)) => Some(format!("{JSON_MEDIA_TYPE};{params}")),
        None => Some(JSON_MEDIA_TYPE.to_string()),
    }
}

/// Build a new header map with the content type rewritten from
/// `application/ld+json` to `application/json`.
///
/// Every other header, including multi-valued ones, is carried over
/// unchanged. Returns `None` when there is nothing to rewrite (no content
/// type, an opaque value, or a content type that is not JSON-LD), in which
/// case the original headers should be kept as they are.
pub fn rewrite_content_type(headers: &HeaderMap) -> Option<HeaderMap> {
    let declared = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    rewrite_content_type_value(declared)?;

    let mut rewritten = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if *name == CONTENT_TYPE {
            match value.to_str().ok().and_then(rewrite_content_type_value) {
                Some(new_value) => {
                    let new_value = HeaderValue::from_str(&new_value).ok()?;
                    rewritten.append(name, new_value);
                }
                None => {
                    rewritten.append(name, value.clone());
                }
            }
        } else {
            rewritten.append(name, value.clone());
        }
    }
    Some(rewritten)
}
