use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::BTreeMap;

// Create a type alias for the HMAC-SHA256 implementation.
type HmacSha256 = Hmac<Sha256>;

/// A canonicalized parameter set plus its authentication signature.
///
/// Built once by [`sign_request`] and immutable afterwards; the signature is
/// only valid for the exact canonical string it was computed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedQuery {
    /// The canonical query string the signature was computed over.
    pub canonical_query: String,
    /// The base64-encoded HMAC-SHA256 digest.
    pub signature: String,
}

impl SignedQuery {
    /// The full query string with the `Signature` pair appended, ready to be
    /// spliced into a request URL. The signature value is percent-encoded
    /// because base64 output contains `+`, `/` and `=`.
    pub fn into_query_string(self) -> String {
        format!(
            "{}&Signature={}",
            self.canonical_query,
            urlencoding::encode(&self.signature)
        )
    }
}

/// Builds the canonical query string from an ordered parameter map.
///
/// Keys are iterated in byte-ordinal order (the `BTreeMap` invariant), and
/// each key and value is percent-encoded individually per RFC 3986 — spaces
/// become `%20`, never `+`. The catalog API signs against exactly this form,
/// so any deviation invalidates the signature.
pub fn canonical_query_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Signs a catalog API request with HMAC-SHA256.
///
/// The string-to-sign is four lines joined by `\n`: the upper-cased HTTP
/// method, the host, the path, and the canonical query string. The raw
/// digest is base64-encoded (standard alphabet, no line wrapping).
///
/// Deterministic: identical inputs always produce an identical signature.
/// Any timestamp freshness must come from a parameter the caller already
/// included.
pub fn sign_request(
    secret_key: &str,
    params: &BTreeMap<String, String>,
    method: &str,
    host: &str,
    path: &str,
) -> SignedQuery {
    let canonical_query = canonical_query_string(params);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        method.to_uppercase(),
        host,
        path,
        canonical_query
    );

    // Create a new HMAC-SHA256 instance with the secret key.
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(string_to_sign.as_bytes());
    let digest = mac.finalize().into_bytes();

    SignedQuery {
        canonical_query,
        signature: BASE64.encode(digest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test_secret_key_12345";

    fn params_from(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn canonical_query_sorts_keys_and_encodes_spaces() {
        let params = params_from(&[
            ("Keywords", "wireless mouse"),
            ("AWSAccessKeyId", "AKID"),
            ("Operation", "ItemSearch"),
        ]);
        assert_eq!(
            canonical_query_string(&params),
            "AWSAccessKeyId=AKID&Keywords=wireless%20mouse&Operation=ItemSearch"
        );
    }

    #[test]
    fn canonicalization_is_invariant_to_insertion_order() {
        let pairs = [
            ("Service", "AWSECommerceService"),
            ("Operation", "ItemSearch"),
            ("Keywords", "usb c hub"),
            ("Timestamp", "2024-01-01T00:00:00Z"),
        ];
        let forward = params_from(&pairs);
        let mut reversed_pairs = pairs;
        reversed_pairs.reverse();
        let reversed = params_from(&reversed_pairs);

        assert_eq!(
            canonical_query_string(&forward),
            canonical_query_string(&reversed)
        );
    }

    #[test]
    fn signing_is_deterministic() {
        let params = params_from(&[("Operation", "ItemSearch"), ("Keywords", "lamp")]);

        let first = sign_request(TEST_SECRET, &params, "GET", "example.com", "/catalog");
        let second = sign_request(TEST_SECRET, &params, "GET", "example.com", "/catalog");

        assert_eq!(first, second);
    }

    #[test]
    fn changing_any_parameter_changes_the_signature() {
        let base = params_from(&[("Operation", "ItemSearch"), ("Keywords", "lamp")]);
        let base_sig = sign_request(TEST_SECRET, &base, "GET", "example.com", "/catalog");

        let mut changed = base.clone();
        changed.insert("Keywords".to_string(), "lamps".to_string());
        let changed_sig = sign_request(TEST_SECRET, &changed, "GET", "example.com", "/catalog");

        assert_ne!(base_sig.signature, changed_sig.signature);
    }

    #[test]
    fn method_is_upper_cased_before_signing() {
        let params = params_from(&[("Operation", "ItemSearch")]);

        let lower = sign_request(TEST_SECRET, &params, "get", "example.com", "/catalog");
        let upper = sign_request(TEST_SECRET, &params, "GET", "example.com", "/catalog");

        assert_eq!(lower.signature, upper.signature);
    }

    #[test]
    fn signature_value_is_percent_encoded_in_query_string() {
        let params = params_from(&[("Operation", "ItemSearch")]);
        let signed = sign_request(TEST_SECRET, &params, "GET", "example.com", "/catalog");

        let query = signed.clone().into_query_string();
        assert!(query.starts_with(&signed.canonical_query));

        // base64 padding and symbols must not appear raw in the URL
        let (_, encoded_sig) = query.rsplit_once("&Signature=").unwrap();
        assert!(!encoded_sig.contains('+'));
        assert!(!encoded_sig.contains('='));
        assert!(!encoded_sig.contains('/'));
    }
}
