/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for decoding untrusted spec blobs.
//!
//! Inside one process the core treats contract violations as caller bugs and
//! panics (see the module docs of [`crate::task`]).  Blobs received from
//! another process are different: a truncated, corrupted, or hostile byte
//! sequence is an environmental condition, not a bug here, so the decode
//! path ([`TaskSpec::from_bytes`], [`TaskInstance::from_bytes`],
//! [`TaskSpec::verify_integrity`]) reports through this enum instead.
//!
//! Every variant carries the exact offending values so the transport layer
//! can log a fully-qualified `tracing` event without re-parsing the blob.
//!
//! [`TaskSpec::from_bytes`]: crate::task::TaskSpec::from_bytes
//! [`TaskSpec::verify_integrity`]: crate::task::TaskSpec::verify_integrity
//! [`TaskInstance::from_bytes`]: crate::instance::TaskInstance::from_bytes

use thiserror::Error;

use crate::id::TaskId;

/// Why a received byte blob is not a valid, finalized task specification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    /// The blob is shorter than the fixed header, so no field can be read.
    #[error("spec blob is {actual} bytes, shorter than the {header}-byte header")]
    TruncatedHeader { actual: usize, header: usize },

    /// A count field that must be nonnegative is negative.
    #[error("header field {field} is negative: {value}")]
    NegativeField { field: &'static str, value: i64 },

    /// The size implied by the header does not equal the received length.
    ///
    /// `expected` is computed in wide arithmetic so absurd header counts
    /// cannot wrap into a plausible size.
    #[error("header implies a {expected}-byte spec but {actual} bytes were received")]
    SizeMismatch { expected: u128, actual: usize },

    /// The construction cursor shows fewer arguments than declared — the
    /// sender serialized a spec that was never finalized.
    #[error("only {arg_index} of {num_args} arguments were constructed")]
    IncompleteArgs { arg_index: i64, num_args: i64 },

    /// The inline-value cursor does not cover the reserved value region.
    #[error("inline value region incomplete: {offset} of {size} bytes written")]
    IncompleteValueRegion { offset: i64, size: i64 },

    /// The task ID is still nil: the spec was never finalized.
    #[error("spec is not finalized (task ID is nil)")]
    NotFinalized,

    /// An argument/return slot carries a tag that is neither by-reference
    /// nor by-value.
    #[error("slot {slot} has unknown tag {tag}")]
    UnknownArgTag { slot: i64, tag: u8 },

    /// A by-value argument points outside the inline value region.
    #[error(
        "by-value argument {slot} spans [{offset}, {offset}+{length}) \
         outside the {region}-byte value region"
    )]
    ValueOutOfRange {
        slot: i64,
        offset: i64,
        length: i64,
        region: i64,
    },

    /// A return slot is not by-reference.  Every return is an object ID by
    /// construction; anything else is corruption.
    #[error("return slot {slot} is not by-reference")]
    ReturnNotByRef { slot: i64 },

    /// The stored task ID does not equal the content hash of the blob.
    #[error("task ID {stored} does not match content hash {computed}")]
    TaskIdMismatch { stored: TaskId, computed: TaskId },

    /// A return slot's object ID is not the one derived from the task ID.
    #[error("return slot {slot} does not carry the derived return ID")]
    ReturnIdMismatch { slot: i64 },

    /// A task instance blob is shorter than its fixed envelope header.
    #[error("instance blob is {actual} bytes, shorter than the {header}-byte envelope header")]
    TruncatedEnvelope { actual: usize, header: usize },
}
