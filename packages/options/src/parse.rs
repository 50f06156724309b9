//! String helpers shared by option parsing and rendering.

use std::collections::BTreeMap;

/// Split a comma separated allow-list. Empty entries are kept.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',').map(str::to_string).collect()
}

/// Parse a comma separated list of `key` or `key:value` tokens.
///
/// Tokens with an empty key are skipped. A bare key maps to the empty value.
/// Later tokens overwrite earlier ones with the same key.
pub fn parse_defaults(list: &str) -> BTreeMap<String, String> {
    let mut result = BTreeMap::new();

    for token in list.split(',') {
        let (key, value) = token.split_once(':').unwrap_or((token, ""));
        if key.is_empty() {
            continue;
        }
        result.insert(key.to_string(), value.to_string());
    }

    result
}

/// Parse a boolean the way option values have always been read.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false
/// counterparts `0`, `f`, `F`, `FALSE`, `false`, `False`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parse a base-10 signed 16-bit integer with an optional sign.
pub fn parse_short_int(value: &str) -> Option<i16> {
    value.parse::<i16>().ok()
}

/// Split a share address on its first `?`.
pub fn split_share(share: &str) -> (&str, Option<&str>) {
    match share.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (share, None),
    }
}

/// Iterate over the `key=value` pairs of a query string.
///
/// Pairs without `=` or with an empty value are skipped.
pub fn query_pairs(query: &str) -> impl Iterator<Item = (&str, &str)> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(_, value)| !value.is_empty())
}

/// Attach `params` to `base` as a query string, omitting `?` when empty.
pub fn join_share(base: &str, params: &[String]) -> String {
    if params.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, params.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_keeps_empty_entries() {
        assert_eq!(split_list(""), vec![String::new()]);
        assert_eq!(split_list("uid,,gid"), vec!["uid", "", "gid"]);
    }

    #[test]
    fn parse_defaults_handles_bare_and_valued_tokens() {
        let parsed = parse_defaults("uid:1000,ro,,:skipped,url:nfs://h:2049");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed["uid"], "1000");
        assert_eq!(parsed["ro"], "");
        assert_eq!(parsed["url"], "nfs://h:2049");
    }

    #[test]
    fn parse_defaults_of_empty_string_is_empty() {
        assert!(parse_defaults("").is_empty());
    }

    #[test]
    fn parse_bool_matches_accepted_spellings() {
        for spelling in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(spelling), Some(true), "{}", spelling);
        }
        for spelling in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(spelling), Some(false), "{}", spelling);
        }
        for spelling in ["", "yes", "tRUE", "2", " true"] {
            assert_eq!(parse_bool(spelling), None, "{}", spelling);
        }
    }

    #[test]
    fn parse_short_int_respects_range() {
        assert_eq!(parse_short_int("1000"), Some(1000));
        assert_eq!(parse_short_int("+12"), Some(12));
        assert_eq!(parse_short_int("-32768"), Some(i16::MIN));
        assert_eq!(parse_short_int("32768"), None);
        assert_eq!(parse_short_int("65534"), None);
        assert_eq!(parse_short_int("12a"), None);
    }

    #[test]
    fn split_share_uses_first_question_mark() {
        assert_eq!(split_share("nfs://h/p"), ("nfs://h/p", None));
        assert_eq!(split_share("nfs://h/p?a=1?b=2"), ("nfs://h/p", Some("a=1?b=2")));
    }

    #[test]
    fn query_pairs_skip_malformed_entries() {
        let pairs: Vec<_> = query_pairs("a=1&b&c=&d=x=y&&=v").collect();
        assert_eq!(pairs, vec![("a", "1"), ("d", "x=y"), ("", "v")]);
    }

    #[test]
    fn join_share_omits_question_mark_without_params() {
        assert_eq!(join_share("nfs://h/p", &[]), "nfs://h/p");
        assert_eq!(
            join_share("nfs://h/p", &["uid=1".to_string(), "ro".to_string()]),
            "nfs://h/p?uid=1&ro"
        );
    }
}
