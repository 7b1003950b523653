use supernote_reader::supernote::format::metadata::decode;
use supernote_reader::MetadataValue;

#[test]
fn repeated_key_becomes_list() {
    let map = decode("<K:V1><K:V2>");
    assert_eq!(map.len(), 1, "a repeated key must stay one entry");
    assert_eq!(
        map.get("K"),
        Some(&MetadataValue::List(vec!["V1".to_string(), "V2".to_string()])),
        "second occurrence must promote the scalar to a list"
    );
    assert_eq!(map.get_str("K"), Some("V1"));
}

#[test]
fn single_key_stays_scalar() {
    let map = decode("<K:V1>");
    assert_eq!(map.get("K"), Some(&MetadataValue::Scalar("V1".to_string())));
    assert_eq!(map.get("K").and_then(MetadataValue::as_scalar), Some("V1"));
}

#[test]
fn keys_keep_first_appearance_order() {
    let map = decode("<B:1><A:2><C:3><B:4><B:5>");
    let keys: Vec<&str> = map.keys().collect();
    assert_eq!(keys, vec!["B", "A", "C"]);

    let values: Vec<&str> = map.get("B").map(|v| v.values().collect()).unwrap_or_default();
    assert_eq!(values, vec!["1", "4", "5"], "list must keep source order");
}

#[test]
fn empty_value_is_allowed() {
    let map = decode("<KEY:>");
    assert_eq!(map.get_str("KEY"), Some(""));
}

#[test]
fn text_outside_tokens_is_ignored() {
    let map = decode("garbage <broken> <K:a:b> more <PAGE1:42> tail");
    assert_eq!(map.len(), 1, "only well-formed tokens are decoded: {:?}", map);
    assert_eq!(map.get_str("PAGE1"), Some("42"));
}

#[test]
fn text_without_tokens_yields_empty_map() {
    assert!(decode("").is_empty());
    assert!(decode("no tokens here").is_empty());
}

#[test]
fn prefix_lookup_follows_block_order() {
    let map = decode("<PAGE2:20><FILE_FEATURE:4><PAGE1:10>");
    let keys: Vec<&str> = map.with_prefix("PAGE").map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["PAGE2", "PAGE1"]);
}
