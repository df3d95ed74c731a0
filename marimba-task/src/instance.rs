/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Task instances: the runtime envelope a scheduler wraps around a spec.
//!
//! A [`TaskInstance`] is what actually travels between the global scheduler,
//! the local schedulers, and the workers: the immutable [`TaskSpec`] plus the
//! two fields the scheduling pipeline mutates — a scheduling state and the
//! local scheduler the task is assigned to.  This crate stores both and
//! interprets neither; the state values and their transitions are owned by
//! the scheduler, and synchronization around the mutable fields is the
//! scheduler's job too.
//!
//! On the wire an instance is one contiguous blob — a 24-byte envelope
//! header followed by the spec blob — so handing an instance to another
//! component is a single copy with no pointer chasing:
//!
//! ```text
//! offset  size       field
//! 0       4          state               (i32, scheduler-defined)
//! 4       20         local_scheduler_id
//! 24      spec_size  task spec blob
//! ```

use core::fmt;

use tracing::trace;

use crate::id::{DbClientId, TaskId};
use crate::task::layout::{read_i32, read_id, write_i32, write_id};
use crate::task::{SpecError, TaskSpec};

// ── Envelope layout ───────────────────────────────────────────────────────────

/// Offset of the scheduling state within the envelope.
pub const ENVELOPE_STATE_OFFSET: usize = 0;

/// Offset of the assigned local scheduler ID within the envelope.
pub const ENVELOPE_LOCAL_SCHEDULER_ID_OFFSET: usize = 4;

/// Offset of the embedded spec blob; also the envelope header size.
pub const ENVELOPE_HEADER_SIZE: usize = 24;

// ── TaskInstance ──────────────────────────────────────────────────────────────

/// A task spec plus its scheduling state and placement.
///
/// `Clone` produces a deep copy: the clone carries its own blob and mutating
/// one instance never affects the other.
#[derive(Clone, PartialEq, Eq)]
pub struct TaskInstance {
    state: i32,
    local_scheduler_id: DbClientId,
    spec: TaskSpec,
}

impl TaskInstance {
    /// Wraps a finalized spec in a scheduling envelope.
    pub fn new(spec: TaskSpec, state: i32, local_scheduler_id: DbClientId) -> Self {
        Self {
            state,
            local_scheduler_id,
            spec,
        }
    }

    /// Current scheduling state.  Opaque to this crate.
    pub fn state(&self) -> i32 {
        self.state
    }

    /// Replaces the scheduling state.
    pub fn set_state(&mut self, state: i32) {
        self.state = state;
    }

    /// Local scheduler this task is assigned to; nil if unassigned.
    pub fn local_scheduler(&self) -> DbClientId {
        self.local_scheduler_id
    }

    /// Replaces the assigned local scheduler.
    pub fn set_local_scheduler(&mut self, local_scheduler_id: DbClientId) {
        self.local_scheduler_id = local_scheduler_id;
    }

    /// The embedded task specification.
    pub fn spec(&self) -> &TaskSpec {
        &self.spec
    }

    /// Task ID, read through to the embedded spec.
    pub fn task_id(&self) -> TaskId {
        self.spec.task_id()
    }

    /// Size of the serialized envelope: header plus embedded spec.
    pub fn size(&self) -> i64 {
        ENVELOPE_HEADER_SIZE as i64 + self.spec.spec_size()
    }

    /// Serializes the instance into one contiguous envelope blob.
    pub fn to_bytes(&self) -> Vec<u8> {
        let spec_bytes = self.spec.as_bytes();
        let mut buf = vec![0u8; ENVELOPE_HEADER_SIZE + spec_bytes.len()];
        write_i32(&mut buf, ENVELOPE_STATE_OFFSET, self.state);
        write_id(
            &mut buf,
            ENVELOPE_LOCAL_SCHEDULER_ID_OFFSET,
            self.local_scheduler_id,
        );
        buf[ENVELOPE_HEADER_SIZE..].copy_from_slice(spec_bytes);
        buf
    }

    /// Validates an envelope blob received from another process.
    ///
    /// The embedded spec goes through the full structural validation of
    /// [`TaskSpec::from_bytes`].  The state value is adopted as-is — state
    /// semantics belong to the scheduler.
    ///
    /// # Errors
    /// [`SpecError::TruncatedEnvelope`] if the blob cannot hold the header;
    /// otherwise whatever the spec validation reports.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SpecError> {
        if bytes.len() < ENVELOPE_HEADER_SIZE {
            return Err(SpecError::TruncatedEnvelope {
                actual: bytes.len(),
                header: ENVELOPE_HEADER_SIZE,
            });
        }
        let state = read_i32(bytes, ENVELOPE_STATE_OFFSET);
        let local_scheduler_id = read_id(bytes, ENVELOPE_LOCAL_SCHEDULER_ID_OFFSET);
        let spec = TaskSpec::from_bytes(bytes[ENVELOPE_HEADER_SIZE..].to_vec())?;
        trace!(task_id = %spec.task_id(), state, "task instance decoded");
        Ok(Self {
            state,
            local_scheduler_id,
            spec,
        })
    }
}

impl fmt::Debug for TaskInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskInstance")
            .field("task_id", &self.task_id())
            .field("state", &self.state)
            .field("local_scheduler_id", &self.local_scheduler_id)
            .finish_non_exhaustive()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{UniqueId, UNIQUE_ID_SIZE};
    use crate::task::TaskSpec;

    fn id(k: u8) -> UniqueId {
        UniqueId::from_bytes([k; UNIQUE_ID_SIZE])
    }

    fn sample_spec() -> TaskSpec {
        let mut builder =
            TaskSpec::begin(id(1), id(2), 0, UniqueId::NIL, 0, id(3), 1, 1, 0);
        builder.add_arg_by_ref(id(7));
        builder.finish()
    }

    // ── accessors ─────────────────────────────────────────────────────────────

    #[test]
    fn accessors_read_through_to_fields_and_spec() {
        let spec = sample_spec();
        let task_id = spec.task_id();
        let instance = TaskInstance::new(spec, 1, id(9));

        assert_eq!(instance.state(), 1);
        assert_eq!(instance.local_scheduler(), id(9));
        assert_eq!(instance.task_id(), task_id);
        assert_eq!(instance.spec().task_id(), task_id);
    }

    #[test]
    fn state_and_scheduler_are_mutable() {
        let mut instance = TaskInstance::new(sample_spec(), 0, UniqueId::NIL);
        instance.set_state(3);
        instance.set_local_scheduler(id(5));
        assert_eq!(instance.state(), 3);
        assert_eq!(instance.local_scheduler(), id(5));
    }

    #[test]
    fn size_is_header_plus_spec() {
        let spec = sample_spec();
        let spec_size = spec.spec_size();
        let instance = TaskInstance::new(spec, 0, id(9));
        assert_eq!(instance.size(), ENVELOPE_HEADER_SIZE as i64 + spec_size);
        assert_eq!(instance.size() as usize, instance.to_bytes().len());
    }

    // ── deep copy ─────────────────────────────────────────────────────────────

    #[test]
    fn clone_is_bytewise_equal() {
        let instance = TaskInstance::new(sample_spec(), 2, id(9));
        let copy = instance.clone();
        assert_eq!(copy, instance);
        assert_eq!(copy.to_bytes(), instance.to_bytes());
    }

    #[test]
    fn clone_is_independent_of_the_original() {
        let original = TaskInstance::new(sample_spec(), 2, id(9));
        let mut copy = original.clone();
        copy.set_state(7);
        copy.set_local_scheduler(id(8));

        assert_eq!(original.state(), 2);
        assert_eq!(original.local_scheduler(), id(9));
        assert_eq!(copy.state(), 7);
    }

    // ── envelope round-trip ───────────────────────────────────────────────────

    #[test]
    fn envelope_round_trips_through_bytes() {
        let instance = TaskInstance::new(sample_spec(), 5, id(9));
        let bytes = instance.to_bytes();
        let back = TaskInstance::from_bytes(&bytes).unwrap();

        assert_eq!(back, instance);
        assert_eq!(back.state(), 5);
        assert_eq!(back.local_scheduler(), id(9));
        assert_eq!(back.spec().as_bytes(), instance.spec().as_bytes());
    }

    #[test]
    fn envelope_layout_is_stable() {
        let instance = TaskInstance::new(sample_spec(), 0x0102, id(9));
        let bytes = instance.to_bytes();
        // state is little-endian at offset 0
        assert_eq!(&bytes[..4], &[0x02, 0x01, 0x00, 0x00]);
        // scheduler ID occupies the next 20 bytes
        assert_eq!(
            &bytes[ENVELOPE_LOCAL_SCHEDULER_ID_OFFSET..ENVELOPE_HEADER_SIZE],
            id(9).as_bytes()
        );
        // the spec blob follows verbatim
        assert_eq!(&bytes[ENVELOPE_HEADER_SIZE..], instance.spec().as_bytes());
    }

    #[test]
    fn from_bytes_rejects_truncated_envelope() {
        let err = TaskInstance::from_bytes(&[0u8; ENVELOPE_HEADER_SIZE - 1]).unwrap_err();
        assert!(matches!(err, SpecError::TruncatedEnvelope { .. }));
    }

    #[test]
    fn from_bytes_propagates_spec_validation() {
        // valid envelope header, garbage spec payload
        let bytes = vec![0u8; ENVELOPE_HEADER_SIZE + 10];
        let err = TaskInstance::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, SpecError::TruncatedHeader { .. }));
    }
}
