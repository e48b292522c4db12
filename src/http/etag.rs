//! ETag generation for JSON responses.

use std::fmt::Write;

use axum::http::HeaderValue;
use sha2::{Digest, Sha256};

/// Quoted lowercase-hex SHA-256 digest of `content`, e.g. `"9f86d0..."`.
pub fn generate_etag(content: &[u8]) -> String {
    let hash = Sha256::digest(content);

    let mut etag = String::with_capacity(hash.len() * 2 + 2);
    etag.push('"');
    for byte in hash {
        let _ = write!(etag, "{byte:02x}");
    }
    etag.push('"');
    etag
}

/// Whether the client's `If-None-Match` is exactly `etag`.
///
/// Lists and `*` are not honored.
pub fn if_none_match(header: Option<&HeaderValue>, etag: &str) -> bool {
    header.is_some_and(|value| value.as_bytes() == etag.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(b"{}");
        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert_eq!(etag.len(), 66);
        assert_eq!(
            generate_etag(b""),
            "\"e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855\""
        );
    }

    #[test]
    fn test_etag_consistency() {
        assert_eq!(generate_etag(b"same content"), generate_etag(b"same content"));
        assert_ne!(generate_etag(b"content a"), generate_etag(b"content b"));
    }

    #[test]
    fn test_if_none_match_exact() {
        let etag = generate_etag(b"x");
        let same = HeaderValue::from_str(&etag).unwrap();
        assert!(if_none_match(Some(&same), &etag));

        let list = HeaderValue::from_str(&format!("\"other\", {etag}")).unwrap();
        assert!(!if_none_match(Some(&list), &etag));
        assert!(!if_none_match(Some(&HeaderValue::from_static("*")), &etag));
        assert!(!if_none_match(None, &etag));
    }
}
