//! Request body decoding for the post handlers.
//!
//! Handlers take the raw `Bytes` and decode here, after their lookups and
//! ownership checks, so a bad body never hides a 404/403. Decoding follows
//! what browsers and form posts get from a lenient JSON API:
//! - no body, or a non-JSON content type: treated as `{}`
//! - duplicate keys: last one wins
//! - a JSON value that is not an object: treated as `{}`
//! - unparsable JSON: 400 `{message}`

use axum::body::Bytes;
use axum::http::{HeaderMap, header};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(header::CONTENT_TYPE) else {
        // No declared type: sniff the body instead.
        return true;
    };
    content_type
        .to_str()
        .map(|ct| {
            let mime = ct.split(';').next().unwrap_or_default().trim();
            mime.eq_ignore_ascii_case("application/json")
                || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}

fn object_of(headers: &HeaderMap, body: &[u8]) -> Result<Map<String, Value>, AppError> {
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    // Parsing into `Value` first: its map keeps the last duplicate key.
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "request body is not valid JSON");
        AppError::bad_request("Invalid JSON body")
    })?;

    Ok(match value {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

/// Decode a post request DTO. Every DTO field is coerced leniently, so once
/// the body is a JSON object this cannot fail on field shapes.
pub fn decode<T: DeserializeOwned>(headers: &HeaderMap, body: &Bytes) -> Result<T, AppError> {
    let map = object_of(headers, body)?;
    serde_json::from_value(Value::Object(map)).map_err(|e| {
        tracing::warn!(error = %e, "request body did not fit the DTO");
        AppError::bad_request("Invalid request body")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::posts::UpdatePostRequest;
    use axum::http::HeaderValue;

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn duplicate_keys_keep_the_last_value() {
        let req: UpdatePostRequest =
            decode(&json_headers(), &Bytes::from_static(br#"{"title":"a","title":"b"}"#)).unwrap();
        assert_eq!(req.title, Some(Some("b".to_string())));
    }

    #[test]
    fn empty_or_untyped_bodies_are_an_empty_object() {
        let req: UpdatePostRequest = decode(&HeaderMap::new(), &Bytes::new()).unwrap();
        assert_eq!(req.into_patch().title, None);

        let mut text = HeaderMap::new();
        text.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let req: UpdatePostRequest = decode(&text, &Bytes::from_static(b"hello")).unwrap();
        assert_eq!(req.title, None);
    }

    #[test]
    fn non_object_json_is_an_empty_object() {
        let req: UpdatePostRequest =
            decode(&json_headers(), &Bytes::from_static(br#"["title"]"#)).unwrap();
        assert_eq!(req.title, None);
    }

    #[test]
    fn broken_json_is_a_bad_request() {
        let err = decode::<UpdatePostRequest>(&json_headers(), &Bytes::from_static(b"{\"title\":"))
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn vendor_json_types_are_parsed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/merge-patch+json; charset=utf-8"),
        );
        let req: UpdatePostRequest =
            decode(&headers, &Bytes::from_static(br#"{"title":"x"}"#)).unwrap();
        assert_eq!(req.title, Some(Some("x".to_string())));
    }
}
