//! Salt parameters for adaptive hashing.
//!
//! A caller either supplies a cost factor, in which case bcrypt generates a
//! random salt, or a prebuilt salt string in modular-crypt form
//! (`$2a$10$N9qo8uLOickgx2ZMRZoMye`). Both are validated synchronously by
//! [`Salt::resolve`] before any hashing work is scheduled.

use std::fmt;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};

use crate::error::CryptError;

/// Cost used when the caller does not pick one.
pub const DEFAULT_COST: u32 = 10;

/// Smallest cost bcrypt accepts.
pub const MIN_COST: u32 = 4;

/// Largest cost bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// `$2a$10$` plus 22 salt characters.
const PREBUILT_SALT_LEN: usize = 29;

/// Length of the encoded salt in a modular-crypt string.
const ENCODED_SALT_LEN: usize = 22;

/// bcrypt's salt alphabet, unpadded. 22 characters carry 132 bits for a
/// 128 bit salt, so the trailing bits are ignored.
const BCRYPT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::BCRYPT,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// The salt argument of [`hash`](crate::hash).
///
/// ## Examples
///
/// ```rust
/// use xp_crypt::Salt;
///
/// let from_cost: Salt = 12.into();
/// assert_eq!(from_cost, Salt::Cost(12));
///
/// let prebuilt: Salt = "$2a$10$N9qo8uLOickgx2ZMRZoMye".into();
/// assert!(matches!(prebuilt, Salt::Prebuilt(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Salt {
    /// Generate a random salt at this cost.
    Cost(u32),
    /// Use an existing modular-crypt salt (or a full digest, whose first
    /// 29 characters are taken).
    Prebuilt(String),
}

impl Default for Salt {
    fn default() -> Self {
        Salt::Cost(DEFAULT_COST)
    }
}

impl From<u32> for Salt {
    fn from(cost: u32) -> Self {
        Salt::Cost(cost)
    }
}

impl From<&str> for Salt {
    fn from(salt: &str) -> Self {
        Salt::Prebuilt(salt.to_string())
    }
}

impl From<String> for Salt {
    fn from(salt: String) -> Self {
        Salt::Prebuilt(salt)
    }
}

/// The bcrypt revision tag carried in a modular-crypt string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BcryptVersion {
    TwoA,
    TwoB,
    TwoX,
    TwoY,
}

impl BcryptVersion {
    fn parse(tag: &str) -> Option<Self> {
        match tag {
            "a" => Some(BcryptVersion::TwoA),
            "b" => Some(BcryptVersion::TwoB),
            "x" => Some(BcryptVersion::TwoX),
            "y" => Some(BcryptVersion::TwoY),
            _ => None,
        }
    }
}

impl fmt::Display for BcryptVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            BcryptVersion::TwoA => "2a",
            BcryptVersion::TwoB => "2b",
            BcryptVersion::TwoX => "2x",
            BcryptVersion::TwoY => "2y",
        };
        f.write_str(tag)
    }
}

impl From<BcryptVersion> for bcrypt::Version {
    fn from(version: BcryptVersion) -> Self {
        match version {
            BcryptVersion::TwoA => bcrypt::Version::TwoA,
            BcryptVersion::TwoB => bcrypt::Version::TwoB,
            BcryptVersion::TwoX => bcrypt::Version::TwoX,
            BcryptVersion::TwoY => bcrypt::Version::TwoY,
        }
    }
}

/// A validated [`Salt`], ready to hand to an adaptive hasher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSalt {
    /// Let the hasher generate a random salt at `cost`.
    Generate { cost: u32 },
    /// Hash with exactly this salt and emit `version` in the digest.
    Fixed {
        version: BcryptVersion,
        cost: u32,
        salt: [u8; 16],
    },
}

impl ResolvedSalt {
    pub fn cost(&self) -> u32 {
        match self {
            ResolvedSalt::Generate { cost } | ResolvedSalt::Fixed { cost, .. } => *cost,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, ResolvedSalt::Fixed { .. })
    }
}

impl Salt {
    /// Validates the salt without doing any hashing work.
    ///
    /// ## Errors
    ///
    /// Returns `CryptError::InvalidCost` if the cost (given directly or
    /// embedded in a prebuilt salt) is outside `4..=31`.
    /// Returns `CryptError::HashFormat` if a prebuilt salt is malformed.
    pub fn resolve(&self) -> Result<ResolvedSalt, CryptError> {
        match self {
            Salt::Cost(cost) => Ok(ResolvedSalt::Generate {
                cost: check_cost(*cost)?,
            }),
            Salt::Prebuilt(salt) => parse_prebuilt(salt),
        }
    }
}

fn check_cost(cost: u32) -> Result<u32, CryptError> {
    if (MIN_COST..=MAX_COST).contains(&cost) {
        Ok(cost)
    } else {
        Err(CryptError::InvalidCost(cost))
    }
}

/// Parses `$2<v>$<cost>$<22 salt chars>`, ignoring anything after them.
fn parse_prebuilt(raw: &str) -> Result<ResolvedSalt, CryptError> {
    if raw.len() < PREBUILT_SALT_LEN {
        return Err(CryptError::HashFormat(format!("invalid salt length: {}", raw.len())));
    }
    let head = raw
        .get(..PREBUILT_SALT_LEN)
        .ok_or_else(|| CryptError::HashFormat("invalid salt encoding".to_string()))?;

    if !head.starts_with("$2") {
        return Err(CryptError::HashFormat("invalid salt version".to_string()));
    }

    let version = head
        .get(2..3)
        .and_then(BcryptVersion::parse)
        .ok_or_else(|| CryptError::HashFormat("invalid salt revision".to_string()))?;

    if head.get(3..4) != Some("$") || head.get(6..7) != Some("$") {
        return Err(CryptError::HashFormat("missing salt rounds".to_string()));
    }

    let rounds = head
        .get(4..6)
        .filter(|r| r.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| CryptError::HashFormat("invalid salt rounds".to_string()))?;
    let cost = rounds
        .parse::<u32>()
        .map_err(|e| CryptError::HashFormat(e.to_string()))?;
    let cost = check_cost(cost)?;

    let encoded = &head[7..7 + ENCODED_SALT_LEN];
    let decoded = BCRYPT_BASE64
        .decode(encoded)
        .map_err(|e| CryptError::HashFormat(format!("invalid salt encoding: {e}")))?;
    let salt: [u8; 16] = decoded
        .as_slice()
        .try_into()
        .map_err(|_| CryptError::HashFormat(format!("invalid salt size: {}", decoded.len())))?;

    Ok(ResolvedSalt::Fixed {
        version,
        cost,
        salt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_salt_uses_default_cost() {
        assert_eq!(Salt::default(), Salt::Cost(DEFAULT_COST));
        assert_eq!(
            Salt::default().resolve().unwrap(),
            ResolvedSalt::Generate { cost: 10 }
        );
    }

    #[test]
    fn cost_bounds_are_inclusive() {
        assert!(Salt::Cost(MIN_COST).resolve().is_ok());
        assert!(Salt::Cost(MAX_COST).resolve().is_ok());
    }

    #[test]
    fn out_of_range_cost_is_rejected() {
        for cost in [0, 2, 3, 32, 40] {
            let err = Salt::Cost(cost).resolve().unwrap_err();
            assert!(matches!(err, CryptError::InvalidCost(c) if c == cost));
        }
    }

    #[test]
    fn parses_prebuilt_salt() {
        let resolved = Salt::from("$2a$10$N9qo8uLOickgx2ZMRZoMye").resolve().unwrap();
        match resolved {
            ResolvedSalt::Fixed { version, cost, .. } => {
                assert_eq!(version, BcryptVersion::TwoA);
                assert_eq!(cost, 10);
            }
            other => panic!("expected fixed salt, got {other:?}"),
        }
    }

    #[test]
    fn full_digest_is_accepted_as_salt() {
        let digest = "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW";
        let from_digest = Salt::from(digest).resolve().unwrap();
        let from_prefix = Salt::from(&digest[..29]).resolve().unwrap();
        assert_eq!(from_digest, from_prefix);
        assert_eq!(from_digest.cost(), 5);
    }

    #[test]
    fn short_salt_is_rejected() {
        let err = Salt::from("$2a$10$short").resolve().unwrap_err();
        assert!(matches!(err, CryptError::HashFormat(_)));
    }

    #[test]
    fn multibyte_character_at_salt_boundary_is_an_encoding_error() {
        let err = Salt::from("$2a$10$N9qo8uLOickgx2ZMRZoMyé")
            .resolve()
            .unwrap_err();
        match err {
            CryptError::HashFormat(msg) => assert_eq!(msg, "invalid salt encoding"),
            other => panic!("expected HashFormat, got {other:?}"),
        }
    }

    #[test]
    fn bad_prefix_is_rejected() {
        let err = Salt::from("$1a$10$N9qo8uLOickgx2ZMRZoMye")
            .resolve()
            .unwrap_err();
        assert!(matches!(err, CryptError::HashFormat(_)));

        let err = Salt::from("$2q$10$N9qo8uLOickgx2ZMRZoMye")
            .resolve()
            .unwrap_err();
        assert!(matches!(err, CryptError::HashFormat(_)));
    }

    #[test]
    fn non_numeric_rounds_are_rejected() {
        let err = Salt::from("$2a$1x$N9qo8uLOickgx2ZMRZoMye")
            .resolve()
            .unwrap_err();
        assert!(matches!(err, CryptError::HashFormat(_)));
    }

    #[test]
    fn prebuilt_cost_out_of_range_is_invalid_cost() {
        let err = Salt::from("$2a$03$N9qo8uLOickgx2ZMRZoMye")
            .resolve()
            .unwrap_err();
        assert!(matches!(err, CryptError::InvalidCost(3)));
    }

    #[test]
    fn characters_outside_bcrypt_alphabet_are_rejected() {
        let err = Salt::from("$2a$10$N9qo8uLOickgx2ZMRZoM+e")
            .resolve()
            .unwrap_err();
        assert!(matches!(err, CryptError::HashFormat(_)));
    }

    #[test]
    fn version_display_matches_prefix() {
        assert_eq!(BcryptVersion::TwoA.to_string(), "2a");
        assert_eq!(BcryptVersion::TwoY.to_string(), "2y");
    }

    #[test]
    fn salt_deserializes_from_number_or_string() {
        let cost: Salt = serde_json::from_str("12").unwrap();
        assert_eq!(cost, Salt::Cost(12));

        let prebuilt: Salt = serde_json::from_str("\"$2b$04$N9qo8uLOickgx2ZMRZoMye\"").unwrap();
        assert!(matches!(prebuilt, Salt::Prebuilt(_)));
    }
}
