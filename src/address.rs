//! Deterministic addressing for seed records and ledger accounts.
//!
//! A seed record lives at an address that any party can recompute from the
//! seed identifier alone.  The derivation is a domain-separated BLAKE2b-256
//! digest over a fixed namespace tag and the little-endian seed id, so no
//! directory service or lookup table is ever consulted.

use blake2::digest::{consts::U32, Digest};
use blake2::Blake2b;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Domain separator for every address produced by this program.
const PROGRAM_DOMAIN: &[u8] = b"mfenx-gap-bridge-v1";

/// Namespace tag for seed state records.
pub const SEED_STATE_NAMESPACE: &[u8] = b"seed_state";

/// Domain separator for labelled account identifiers.
const ACCOUNT_DOMAIN: &[u8] = b"mfenx-gap-bridge-account-v1";

type Blake2b256 = Blake2b<U32>;

fn decode_hex32(input: &str) -> Result<[u8; 32], String> {
    let bytes = hex::decode(input).map_err(|err| format!("invalid hex: {err}"))?;
    if bytes.len() != 32 {
        return Err(format!("expected 32 bytes, got {}", bytes.len()));
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

macro_rules! hex_identifier {
    ($name:ident) => {
        impl $name {
            /// Wraps raw digest bytes.
            pub const fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            /// Returns the raw bytes.
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            /// Lowercase hex rendering.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Parses a 64-character hex string.
            pub fn from_hex(input: &str) -> Result<Self, String> {
                decode_hex32(input).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::from_hex(&raw).map_err(de::Error::custom)
            }
        }
    };
}

/// Address of a seed state record.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeedAddress([u8; 32]);

/// Identity of a signer, token account, or token asset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId([u8; 32]);

hex_identifier!(SeedAddress);
hex_identifier!(AccountId);

impl AccountId {
    /// Derives a stable identifier from a human-readable label.
    ///
    /// Useful for fixtures and for embedders that name accounts rather than
    /// holding key material.
    pub fn from_label(label: &str) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update(ACCOUNT_DOMAIN);
        hasher.update(label.as_bytes());
        Self(hasher.finalize().into())
    }
}

/// Derives the record address for `seed_id`.
///
/// Pure function of the seed id: `BLAKE2b-256(domain || "seed_state" || le64(seed_id))`.
pub fn derive(seed_id: u64) -> SeedAddress {
    let mut hasher = Blake2b256::new();
    hasher.update(PROGRAM_DOMAIN);
    hasher.update(SEED_STATE_NAMESPACE);
    hasher.update(seed_id.to_le_bytes());
    SeedAddress(hasher.finalize().into())
}
