//! Parameter decoding: `key=value&key=value` strings into an ordered map.

use indexmap::IndexMap;
use url::form_urlencoded;

/// Ordered parameter mapping. Later duplicate keys overwrite earlier ones
/// while keeping the original insertion position.
pub type Params = IndexMap<String, String>;

/// Decode a raw query or form-encoded body into a fresh mapping.
pub fn decode(raw: &str) -> Params {
    let mut params = Params::new();
    decode_into(raw, &mut params);
    params
}

/// Decode into an existing mapping; entries decoded here overwrite
/// same-named entries already present (body-over-query precedence).
///
/// Best-effort and permissive: percent- and plus-decoding follow the
/// form-urlencoded rules, a segment without `=` becomes a key with an empty
/// value, and malformed input never raises an error.
pub fn decode_into(raw: &str, params: &mut Params) {
    if raw.is_empty() {
        return;
    }
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        params.insert(key.into_owned(), value.into_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_pairs_in_order() {
        let params = decode("k1=v1&k2=v2");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("k1").map(String::as_str), Some("v1"));
        assert_eq!(params.get("k2").map(String::as_str), Some("v2"));
        let keys: Vec<_> = params.keys().map(String::as_str).collect();
        assert_eq!(keys, ["k1", "k2"]);
    }

    #[test]
    fn duplicate_keys_keep_last_value() {
        let params = decode("a=1&b=2&a=3");
        assert_eq!(params.get("a").map(String::as_str), Some("3"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn empty_input_is_a_noop() {
        assert!(decode("").is_empty());

        let mut params = decode("a=1");
        decode_into("", &mut params);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn bare_key_gets_empty_value() {
        let params = decode("flag");
        assert_eq!(params.get("flag").map(String::as_str), Some(""));
    }

    #[test]
    fn percent_and_plus_decoding() {
        let params = decode("name=John+Doe&q=a%26b");
        assert_eq!(params.get("name").map(String::as_str), Some("John Doe"));
        assert_eq!(params.get("q").map(String::as_str), Some("a&b"));
    }

    #[test]
    fn later_decode_overwrites_existing_entries() {
        let mut params = decode("debug=1&user=query");
        decode_into("user=body&password=123", &mut params);

        assert_eq!(params.get("debug").map(String::as_str), Some("1"));
        assert_eq!(params.get("user").map(String::as_str), Some("body"));
        assert_eq!(params.get("password").map(String::as_str), Some("123"));
    }

    #[test]
    fn malformed_input_never_errors() {
        let params = decode("&&==&a");
        // Permissive: whatever pairs fall out are kept, nothing panics.
        assert!(params.get("a").is_some());
    }
}
