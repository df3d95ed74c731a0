/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Unique identifiers for the Marimba task fabric.
//!
//! Every participant in the system — tasks, objects, actors, drivers, remote
//! functions, local-scheduler clients — is named by the same fixed-width
//! 20-byte identifier.  The width is deliberate: it matches a truncated
//! SHA-256 digest, which lets a task ID double as the seed for the object IDs
//! of its outputs (see [`crate::task::compute_return_id`]).
//!
//! The role aliases ([`TaskId`], [`ObjectId`], …) are plain `type` aliases,
//! not newtypes.  The derivation arithmetic reinterprets one role's bytes as
//! another role's identifier, so the roles share representation by contract;
//! the alias names exist to keep signatures readable.

use core::fmt;

use rand_core::{CryptoRng, RngCore};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Width of every identifier in the system, in bytes.
pub const UNIQUE_ID_SIZE: usize = 20;

/// Length of the lowercase hex rendering of an identifier.
pub const ID_HEX_LEN: usize = 2 * UNIQUE_ID_SIZE;

/// Width of a SHA-256 digest, in bytes.
pub const DIGEST_SIZE: usize = 32;

/// A full SHA-256 digest.
pub type Digest = [u8; DIGEST_SIZE];

/// The all-zero digest, used where "no digest yet" must be representable.
pub const NIL_DIGEST: Digest = [0u8; DIGEST_SIZE];

// ── UniqueId ──────────────────────────────────────────────────────────────────

/// A fixed-width opaque identifier.
///
/// Equality is bytewise.  The all-zero value is the distinguished
/// [`UniqueId::NIL`] sentinel, meaning "no ID" (unset parent, non-actor task,
/// under-construction task ID).
///
/// `Default` yields `NIL`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct UniqueId([u8; UNIQUE_ID_SIZE]);

/// Names a task: one invocation of a remote function.
pub type TaskId = UniqueId;
/// Names a task output or a driver-inserted value.
pub type ObjectId = UniqueId;
/// Names an actor instance.
pub type ActorId = UniqueId;
/// Names a remote function.
pub type FunctionId = UniqueId;
/// Names the driver program that owns a task lineage.
pub type DriverId = UniqueId;
/// Names a client of the shared control store (e.g. a local scheduler).
pub type DbClientId = UniqueId;

impl UniqueId {
    /// The distinguished nil identifier: 20 zero bytes.
    pub const NIL: Self = Self([0u8; UNIQUE_ID_SIZE]);

    /// Wraps raw identifier bytes.
    pub const fn from_bytes(bytes: [u8; UNIQUE_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw identifier bytes.
    pub const fn as_bytes(&self) -> &[u8; UNIQUE_ID_SIZE] {
        &self.0
    }

    /// Returns `true` if this is the [`NIL`](Self::NIL) sentinel.
    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    /// Generates a fresh, globally unique identifier from the supplied
    /// cryptographic random source.
    ///
    /// The RNG is injected rather than read from a process-wide singleton so
    /// tests and embedders control their entropy source.  With 160 random
    /// bits the collision probability is negligible for any practical
    /// cluster lifetime.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: RngCore + CryptoRng,
    {
        let mut bytes = [0u8; UNIQUE_ID_SIZE];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Lowercase hex rendering, [`ID_HEX_LEN`] characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UniqueId({})", self.to_hex())
    }
}

// Serialized as the hex string rather than a byte array so identifiers stay
// readable in JSON/YAML telemetry and log payloads.
impl Serialize for UniqueId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for UniqueId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let raw = hex::decode(&s).map_err(D::Error::custom)?;
        let bytes: [u8; UNIQUE_ID_SIZE] = raw
            .try_into()
            .map_err(|_| D::Error::custom("identifier must be 20 bytes of hex"))?;
        Ok(Self(bytes))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    // ── equality / nil ────────────────────────────────────────────────────────

    #[test]
    fn equality_is_bytewise() {
        let a = UniqueId::from_bytes([7u8; UNIQUE_ID_SIZE]);
        let b = UniqueId::from_bytes([7u8; UNIQUE_ID_SIZE]);
        let mut raw = [7u8; UNIQUE_ID_SIZE];
        raw[19] = 8;
        let c = UniqueId::from_bytes(raw);

        assert_eq!(a, b);
        assert_ne!(a, c, "one differing byte must break equality");
    }

    #[test]
    fn nil_is_all_zero_bytes() {
        assert_eq!(UniqueId::NIL.as_bytes(), &[0u8; UNIQUE_ID_SIZE]);
        assert!(UniqueId::NIL.is_nil());
        assert_eq!(UniqueId::default(), UniqueId::NIL);
    }

    #[test]
    fn nonzero_id_is_not_nil() {
        let mut raw = [0u8; UNIQUE_ID_SIZE];
        raw[0] = 1;
        assert!(!UniqueId::from_bytes(raw).is_nil());
    }

    // ── hex rendering ─────────────────────────────────────────────────────────

    #[test]
    fn to_hex_is_lowercase_and_full_width() {
        let id = UniqueId::from_bytes([0xAB; UNIQUE_ID_SIZE]);
        let hex = id.to_hex();
        assert_eq!(hex.len(), ID_HEX_LEN);
        assert_eq!(hex, "ab".repeat(UNIQUE_ID_SIZE));
    }

    #[test]
    fn display_matches_to_hex() {
        let id = UniqueId::from_bytes([0x01; UNIQUE_ID_SIZE]);
        assert_eq!(format!("{id}"), id.to_hex());
    }

    // ── fresh IDs ─────────────────────────────────────────────────────────────

    #[test]
    fn random_ids_are_distinct_and_not_nil() {
        let a = UniqueId::random(&mut OsRng);
        let b = UniqueId::random(&mut OsRng);
        assert!(!a.is_nil());
        assert!(!b.is_nil());
        assert_ne!(a, b);
    }

    // ── digests ───────────────────────────────────────────────────────────────

    #[test]
    fn nil_digest_is_all_zero_and_full_width() {
        assert_eq!(NIL_DIGEST, [0u8; DIGEST_SIZE]);
        assert_eq!(NIL_DIGEST.len(), DIGEST_SIZE);
    }

    #[test]
    fn real_digest_never_equals_nil_digest() {
        use sha2::{Digest as _, Sha256};
        let digest: Digest = Sha256::digest(b"").into();
        assert_ne!(digest, NIL_DIGEST);
    }

    // ── serde ─────────────────────────────────────────────────────────────────

    #[test]
    fn serde_round_trips_through_hex_string() {
        let id = UniqueId::from_bytes([0x5A; UNIQUE_ID_SIZE]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "5a".repeat(UNIQUE_ID_SIZE)));

        let back: UniqueId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn serde_rejects_wrong_length_hex() {
        let err = serde_json::from_str::<UniqueId>("\"abcd\"");
        assert!(err.is_err());
    }

    #[test]
    fn serde_rejects_non_hex_input() {
        let bad = format!("\"{}\"", "zz".repeat(UNIQUE_ID_SIZE));
        assert!(serde_json::from_str::<UniqueId>(&bad).is_err());
    }
}
