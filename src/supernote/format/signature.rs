//! File signature detection.
//!
//! The leading bytes of a file are the only self-description of the format.
//! Each family has an ordered list of concrete signatures, one per firmware
//! release that changed the container, plus a pattern any future release of
//! the same family is expected to follow.

use std::io::{Read, Seek, SeekFrom};
use std::sync::OnceLock;
use log::{debug, info, warn};
use regex::Regex;

use crate::supernote::types::error::{NoteError, Result};
use crate::supernote::types::models::{Family, Policy};

/// Known family `A` signatures, oldest first.
pub const FAMILY_A_SIGNATURES: &[&str] = &["SN_FILE_ASA_20190529"];

/// Known family `B` signatures, in firmware release order.
pub const FAMILY_B_SIGNATURES: &[&str] = &[
    "noteSN_FILE_VER_20200001", // C.053
    "noteSN_FILE_VER_20200005", // C.077
    "noteSN_FILE_VER_20200006", // C.130
    "noteSN_FILE_VER_20200007", // C.159
    "noteSN_FILE_VER_20200008", // C.237
    "noteSN_FILE_VER_20210009", // C.291
    "markSN_FILE_VER_20220011", // Chauvet 2.1.6
    "noteSN_FILE_VER_20210010", // Chauvet 2.1.6
    "noteSN_FILE_VER_20220011", // Chauvet 2.5.17
    "markSN_FILE_VER_20220013", // Chauvet 2.9.24
    "noteSN_FILE_VER_20220013", // Chauvet 2.9.24
];

/// Families in the order they are tried.
pub const DETECTION_ORDER: [Family; 2] = [Family::A, Family::B];

static FAMILY_A_PATTERN: OnceLock<Regex> = OnceLock::new();
static FAMILY_B_PATTERN: OnceLock<Regex> = OnceLock::new();

impl Family {
    /// Concrete signatures of this family, checked in order.
    pub fn signatures(&self) -> &'static [&'static str] {
        match self {
            Family::A => FAMILY_A_SIGNATURES,
            Family::B => FAMILY_B_SIGNATURES,
        }
    }

    /// The newest known signature, assumed for pattern-only matches.
    pub fn latest_signature(&self) -> &'static str {
        let signatures = self.signatures();
        signatures[signatures.len() - 1]
    }

    /// Lenient pattern shared by every signature of the family.
    pub fn pattern(&self) -> &'static Regex {
        match self {
            Family::A => FAMILY_A_PATTERN
                .get_or_init(|| Regex::new(r"^SN_FILE_ASA_\d{8}").expect("Invalid family A signature pattern")),
            Family::B => FAMILY_B_PATTERN
                .get_or_init(|| Regex::new(r"^(note|mark)SN_FILE_VER_\d{8}").expect("Invalid family B signature pattern")),
        }
    }
}

/// Checks the file against one family and returns the signature to parse with.
///
/// The stream is rewound to offset 0 before every read and after the check.
///
/// # Errors
/// `UnsupportedFormat` if no concrete signature matches and the policy or
/// the family pattern rules out a pattern-only match.
pub fn detect<R: Read + Seek>(file: &mut R, family: Family, policy: Policy) -> Result<String> {
    let mut found = String::new();
    for signature in family.signatures() {
        let prefix = read_prefix(file, signature.len())?;
        if prefix == signature.as_bytes() {
            file.seek(SeekFrom::Start(0))?;
            debug!("Exact signature match: {}", signature);
            return Ok(signature.to_string());
        }
        found = String::from_utf8_lossy(&prefix).into_owned();
    }

    let prefix = read_prefix(file, family.latest_signature().len())?;
    file.seek(SeekFrom::Start(0))?;
    let candidate = String::from_utf8_lossy(&prefix);
    let compatible = family.pattern().is_match(&candidate);

    if policy == Policy::Strict || !compatible {
        return Err(NoteError::UnsupportedFormat { found });
    }

    let assumed = family.latest_signature();
    warn!(
        "Unknown signature '{}' accepted under loose policy as {}",
        candidate, assumed
    );
    Ok(assumed.to_string())
}

/// Tries every family in [`DETECTION_ORDER`] and returns the first match.
pub fn detect_family<R: Read + Seek>(file: &mut R, policy: Policy) -> Result<(Family, String)> {
    for family in DETECTION_ORDER {
        match detect(file, family, policy) {
            Ok(signature) => {
                info!("Detected {:?} family file, signature {}", family, signature);
                return Ok((family, signature));
            }
            Err(NoteError::UnsupportedFormat { .. }) => {
                debug!("Signature does not belong to family {:?}", family);
            }
            Err(e) => return Err(e),
        }
    }

    let longest = FAMILY_B_SIGNATURES[0].len();
    let prefix = read_prefix(file, longest)?;
    file.seek(SeekFrom::Start(0))?;
    Err(NoteError::UnsupportedFormat {
        found: String::from_utf8_lossy(&prefix).into_owned(),
    })
}

/// Reads up to `len` bytes from offset 0. Short files give a short prefix.
fn read_prefix<R: Read + Seek>(file: &mut R, len: usize) -> Result<Vec<u8>> {
    file.seek(SeekFrom::Start(0))?;
    let mut prefix = Vec::with_capacity(len);
    file.by_ref().take(len as u64).read_to_end(&mut prefix)?;
    Ok(prefix)
}
