use std::io::{Cursor, Seek};

use supernote_reader::supernote::format::signature::{detect, FAMILY_B_SIGNATURES};
use supernote_reader::{detect_family, Family, NoteError, Policy};

fn stream(prefix: &str) -> Cursor<Vec<u8>> {
    let mut bytes = prefix.as_bytes().to_vec();
    bytes.extend_from_slice(&[0u8; 32]);
    Cursor::new(bytes)
}

#[test]
fn detects_family_a() {
    let mut file = stream("SN_FILE_ASA_20190529");
    let (family, signature) = detect_family(&mut file, Policy::Strict).expect("family A");
    assert_eq!(family, Family::A);
    assert_eq!(signature, "SN_FILE_ASA_20190529");
    assert_eq!(file.stream_position().unwrap(), 0, "stream must be rewound");
}

#[test]
fn detects_every_known_family_b_signature() {
    for known in FAMILY_B_SIGNATURES {
        let mut file = stream(known);
        let (family, signature) = detect_family(&mut file, Policy::Strict)
            .unwrap_or_else(|e| panic!("{} rejected: {}", known, e));
        assert_eq!(family, Family::B, "{}", known);
        assert_eq!(signature, *known);
    }
}

#[test]
fn loose_policy_accepts_future_signature_as_latest() {
    let mut file = stream("noteSN_FILE_VER_20990001");
    let (family, signature) = detect_family(&mut file, Policy::Loose).expect("loose accept");
    assert_eq!(family, Family::B);
    assert_eq!(signature, "noteSN_FILE_VER_20220013");

    let mut file = stream("SN_FILE_ASA_20230101");
    let (family, signature) = detect_family(&mut file, Policy::Loose).expect("loose accept");
    assert_eq!(family, Family::A);
    assert_eq!(signature, "SN_FILE_ASA_20190529");
}

#[test]
fn strict_policy_rejects_future_signature() {
    let mut file = stream("noteSN_FILE_VER_20990001");
    let err = detect_family(&mut file, Policy::Strict).unwrap_err();
    assert!(
        matches!(err, NoteError::UnsupportedFormat { ref found } if found.starts_with("noteSN_FILE_VER_2099")),
        "unexpected error: {:?}",
        err
    );
}

#[test]
fn unrelated_bytes_are_unsupported() {
    for policy in [Policy::Strict, Policy::Loose] {
        let mut file = stream("%PDF-1.7 not a note");
        let err = detect_family(&mut file, policy).unwrap_err();
        assert!(
            matches!(err, NoteError::UnsupportedFormat { ref found } if found.starts_with("%PDF")),
            "unexpected error under {:?}: {:?}",
            policy,
            err
        );
    }
}

#[test]
fn short_file_is_unsupported() {
    let mut file = Cursor::new(b"note".to_vec());
    let err = detect_family(&mut file, Policy::Loose).unwrap_err();
    assert!(matches!(err, NoteError::UnsupportedFormat { .. }), "{:?}", err);
}

#[test]
fn family_check_does_not_cross_families() {
    let mut file = stream("noteSN_FILE_VER_20220011");
    let err = detect(&mut file, Family::A, Policy::Loose).unwrap_err();
    assert!(matches!(err, NoteError::UnsupportedFormat { .. }), "{:?}", err);
}
