//! Task specifications: the immutable, content-addressed record of one task
//! invocation.
//!
//! Two distinct types model the two phases of a spec's life:
//!
//! ```text
//! TaskSpec::begin(…) ──► TaskSpecBuilder ──finish()──► TaskSpec ──► scheduler / wire
//!                         ↑ under construction          ↑ finalized
//!                         single-owner, mutable         immutable, hash-addressed
//! ```
//!
//! Both types are views over one contiguous byte blob in the canonical
//! [`layout`].  Keeping the construction cursors inside the blob means a
//! builder's memory image is already the serialized form, and finalizing is
//! a single hash pass over the allocation with no re-packing.
//!
//! # Why construction is two-phase
//!
//! The task ID is the truncated SHA-256 of the whole blob, so every argument
//! must be in place before hashing.  The return slots, however, carry object
//! IDs *derived from* the task ID — they cannot exist before the hash.
//! `finish()` therefore hashes the blob while the task ID field and all
//! return slots are still nil, then writes the ID and the derived return IDs.
//! Identical content yields an identical task ID; any tampering changes it.
//!
//! # Contract violations vs untrusted input
//!
//! Misusing the builder (too many arguments, overflowing the value region,
//! reading the wrong slot variant) is a caller bug and panics with a message
//! naming the violated precondition.  Decoding bytes received from another
//! process goes through [`TaskSpec::from_bytes`] /
//! [`TaskSpec::verify_integrity`] and reports [`SpecError`] instead.
//!
//! # Sharing discipline
//!
//! A [`TaskSpecBuilder`] is deliberately neither `Clone` nor shareable — it
//! is a single-owner value.  A finalized [`TaskSpec`] never changes and may
//! be shared freely across threads.

pub mod error;
pub mod layout;

pub use error::SpecError;

use core::fmt;

use sha2::{Digest as _, Sha256};
use tracing::{debug, trace};

use crate::id::{
    ActorId, Digest, DriverId, FunctionId, ObjectId, TaskId, UniqueId, UNIQUE_ID_SIZE,
};
use layout::{
    arg_slot_offset, read_f64, read_i64, read_id, value_region_offset, write_f64,
    write_i64, write_id, ACTOR_COUNTER_OFFSET, ACTOR_ID_OFFSET, ARGS_VALUE_OFFSET_OFFSET,
    ARGS_VALUE_SIZE_OFFSET, ARG_BY_REF, ARG_BY_VAL, ARG_INDEX_OFFSET, ARG_PAYLOAD_OFFSET,
    ARG_SLOT_SIZE, ARG_TAG_OFFSET, DRIVER_ID_OFFSET, FUNCTION_ID_OFFSET, HEADER_SIZE,
    MAX_RESOURCE_INDEX, NUM_ARGS_OFFSET, NUM_RETURNS_OFFSET, PARENT_COUNTER_OFFSET,
    PARENT_TASK_ID_OFFSET, REQUIRED_RESOURCES_OFFSET, TASK_ID_OFFSET,
};

// ── TaskArg ───────────────────────────────────────────────────────────────────

/// One argument or return slot of a task.
///
/// Return slots are always [`ByRef`](TaskArg::ByRef), carrying the object ID
/// derived for that output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskArg {
    /// The argument is another task's output, named by its object ID.
    ByRef { obj_id: ObjectId },
    /// The argument is inlined: `length` bytes at `offset` into the spec's
    /// pass-by-value region.
    ByVal { offset: i64, length: i64 },
}

// ── Object-ID derivation ──────────────────────────────────────────────────────

/// Derives the object ID of return value `return_index` of task `task_id`.
///
/// The first 8 bytes of the task ID, viewed as a little-endian `i64`, are
/// XORed with `return_index + 1`; the remaining 12 bytes pass through.  The
/// `+ 1` keeps return 0 distinct from the task ID itself.  Nonnegative
/// indices keep these masks disjoint from [`compute_put_id`]'s negative
/// masks.
///
/// The XOR touches only the first 8 of 20 bytes, so the map is not injective
/// across *different* task IDs: two task IDs agreeing in their last 12 bytes
/// could collide after derivation.  With uniformly random task IDs that
/// requires a 12-byte suffix collision first, which is negligible; the
/// arithmetic is a cluster-wide wire contract and must not be changed.
///
/// # Panics
/// Panics if `return_index` is negative.
pub fn compute_return_id(task_id: TaskId, return_index: i64) -> ObjectId {
    assert!(
        return_index >= 0,
        "return index must be nonnegative, got {return_index}"
    );
    xor_first_word(task_id, return_index + 1)
}

/// Derives the object ID of the `put_index`-th value explicitly inserted by
/// the driver under task `task_id`.
///
/// Same construction as [`compute_return_id`] with mask `-(put_index + 1)`,
/// keeping put IDs disjoint from every return ID of the same task.
///
/// # Panics
/// Panics if `put_index` is negative.
pub fn compute_put_id(task_id: TaskId, put_index: i64) -> ObjectId {
    assert!(
        put_index >= 0,
        "put index must be nonnegative, got {put_index}"
    );
    xor_first_word(task_id, -put_index - 1)
}

fn xor_first_word(id: UniqueId, mask: i64) -> UniqueId {
    let mut bytes = *id.as_bytes();
    let mut first = [0u8; 8];
    first.copy_from_slice(&bytes[..8]);
    let word = i64::from_le_bytes(first) ^ mask;
    bytes[..8].copy_from_slice(&word.to_le_bytes());
    UniqueId::from_bytes(bytes)
}

/// SHA-256 of the blob.
fn content_digest(buf: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(buf);
    hasher.finalize().into()
}

/// Truncated content digest: the content address of a task.
fn content_task_id(buf: &[u8]) -> TaskId {
    let digest = content_digest(buf);
    let mut bytes = [0u8; UNIQUE_ID_SIZE];
    bytes.copy_from_slice(&digest[..UNIQUE_ID_SIZE]);
    UniqueId::from_bytes(bytes)
}

/// Decodes slot `index`.  The blob is either builder-written or validated by
/// `from_bytes`, so an unknown tag here is memory corruption.
fn decode_slot(buf: &[u8], index: i64) -> TaskArg {
    let base = arg_slot_offset(index);
    match buf[base + ARG_TAG_OFFSET] {
        ARG_BY_REF => TaskArg::ByRef {
            obj_id: read_id(buf, base + ARG_PAYLOAD_OFFSET),
        },
        ARG_BY_VAL => TaskArg::ByVal {
            offset: read_i64(buf, base + ARG_PAYLOAD_OFFSET),
            length: read_i64(buf, base + ARG_PAYLOAD_OFFSET + 8),
        },
        tag => panic!("slot {index} has unknown tag {tag}"),
    }
}

fn resource_offset(index: usize) -> usize {
    assert!(
        index < MAX_RESOURCE_INDEX,
        "resource index {index} out of range (max {MAX_RESOURCE_INDEX})"
    );
    REQUIRED_RESOURCES_OFFSET + 8 * index
}

// ── TaskSpecBuilder ───────────────────────────────────────────────────────────

/// A task specification under construction.
///
/// Produced by [`TaskSpec::begin`]; consumed by [`finish`](Self::finish).
/// All argument slots must be populated, in order, and the reserved inline
/// value budget must be filled exactly before finishing.
pub struct TaskSpecBuilder {
    buf: Vec<u8>,
}

impl TaskSpecBuilder {
    /// Installs the next argument as a reference to another task's output.
    /// Returns the slot index it occupied.
    ///
    /// # Panics
    /// Panics if all `num_args` argument slots are already populated.
    pub fn add_arg_by_ref(&mut self, obj_id: ObjectId) -> i64 {
        let index = self.arg_index();
        let num_args = self.num_args();
        assert!(
            index < num_args,
            "add_arg_by_ref: all {num_args} argument slots already populated"
        );
        let base = arg_slot_offset(index);
        self.buf[base + ARG_TAG_OFFSET] = ARG_BY_REF;
        write_id(&mut self.buf, base + ARG_PAYLOAD_OFFSET, obj_id);
        write_i64(&mut self.buf, ARG_INDEX_OFFSET, index + 1);
        index
    }

    /// Installs the next argument as inlined bytes, copying `data` into the
    /// pass-by-value region at the current cursor.  Returns the slot index.
    ///
    /// # Panics
    /// Panics if all argument slots are already populated, if `data` would
    /// overflow the value budget reserved at [`TaskSpec::begin`], or if this
    /// is the final argument and `data` does not fill the budget exactly.
    pub fn add_arg_by_val(&mut self, data: &[u8]) -> i64 {
        let index = self.arg_index();
        let num_args = self.num_args();
        assert!(
            index < num_args,
            "add_arg_by_val: all {num_args} argument slots already populated"
        );

        let length = data.len() as i64;
        let offset = self.args_value_offset();
        let budget = self.args_value_size();
        assert!(
            offset + length <= budget,
            "add_arg_by_val: {length} bytes at offset {offset} overflow the \
             {budget}-byte value region"
        );
        if index == num_args - 1 {
            assert!(
                offset + length == budget,
                "add_arg_by_val: final argument leaves the value region at \
                 {} of {budget} bytes",
                offset + length
            );
        }

        let base = arg_slot_offset(index);
        self.buf[base + ARG_TAG_OFFSET] = ARG_BY_VAL;
        write_i64(&mut self.buf, base + ARG_PAYLOAD_OFFSET, offset);
        write_i64(&mut self.buf, base + ARG_PAYLOAD_OFFSET + 8, length);

        let value_base =
            value_region_offset(num_args, self.num_returns()) + offset as usize;
        self.buf[value_base..value_base + data.len()].copy_from_slice(data);

        write_i64(&mut self.buf, ARGS_VALUE_OFFSET_OFFSET, offset + length);
        write_i64(&mut self.buf, ARG_INDEX_OFFSET, index + 1);
        trace!(slot = index, length, "inlined by-value argument");
        index
    }

    /// Records a resource demand.  Index-keyed (see
    /// [`layout::CPU_RESOURCE_INDEX`] and friends); a value of `0.0` means
    /// "no requirement" and is the initial state of every entry.
    ///
    /// # Panics
    /// Panics if `index >= MAX_RESOURCE_INDEX`.
    pub fn set_required_resource(&mut self, index: usize, value: f64) {
        let offset = resource_offset(index);
        write_f64(&mut self.buf, offset, value);
    }

    /// Finalizes the spec: computes the content-addressed task ID and
    /// populates every return slot with its derived object ID.
    ///
    /// # Panics
    /// Panics unless every argument slot was populated and the inline value
    /// region was filled exactly.
    pub fn finish(self) -> TaskSpec {
        let mut buf = self.buf;

        let num_args = read_i64(&buf, NUM_ARGS_OFFSET);
        let arg_index = read_i64(&buf, ARG_INDEX_OFFSET);
        assert!(
            arg_index == num_args,
            "finish: only {arg_index} of {num_args} arguments were added"
        );
        let budget = read_i64(&buf, ARGS_VALUE_SIZE_OFFSET);
        let written = read_i64(&buf, ARGS_VALUE_OFFSET_OFFSET);
        assert!(
            written == budget,
            "finish: inline value region holds {written} of {budget} bytes"
        );

        // The hash is taken while the task ID field and every return slot
        // are still nil, so it is a pure function of the task's content.
        debug_assert!(read_id(&buf, TASK_ID_OFFSET).is_nil());
        let task_id = content_task_id(&buf);
        write_id(&mut buf, TASK_ID_OFFSET, task_id);

        let num_returns = read_i64(&buf, NUM_RETURNS_OFFSET);
        for i in 0..num_returns {
            let base = arg_slot_offset(num_args + i);
            debug_assert_eq!(buf[base + ARG_TAG_OFFSET], ARG_BY_REF);
            let return_id = compute_return_id(task_id, i);
            write_id(&mut buf, base + ARG_PAYLOAD_OFFSET, return_id);
        }

        debug!(task_id = %task_id, num_args, num_returns, "task spec finalized");
        TaskSpec { buf }
    }

    // ── Construction-state accessors ──────────────────────────────────────────

    /// Declared number of argument slots.
    pub fn num_args(&self) -> i64 {
        read_i64(&self.buf, NUM_ARGS_OFFSET)
    }

    /// Declared number of return slots.
    pub fn num_returns(&self) -> i64 {
        read_i64(&self.buf, NUM_RETURNS_OFFSET)
    }

    /// Number of argument slots populated so far.
    pub fn arg_index(&self) -> i64 {
        read_i64(&self.buf, ARG_INDEX_OFFSET)
    }

    /// An already-populated by-value argument slot.
    ///
    /// By-value slots are self-contained and readable in any state.  The
    /// object ID behind a by-reference slot is part of the finalized record
    /// and is readable only through [`TaskSpec::arg`] / [`TaskSpec::arg_id`]
    /// after [`finish`](Self::finish).
    ///
    /// # Panics
    /// Panics if slot `index` has not been populated yet, or if it is
    /// by-reference (use before finalization).
    pub fn arg(&self, index: i64) -> TaskArg {
        let arg_index = self.arg_index();
        assert!(
            (0..arg_index).contains(&index),
            "argument slot {index} not populated yet ({arg_index} added so far)"
        );
        match decode_slot(&self.buf, index) {
            arg @ TaskArg::ByVal { .. } => arg,
            TaskArg::ByRef { .. } => panic!(
                "argument slot {index} is by-reference; its object ID is \
                 readable only on the finished spec"
            ),
        }
    }

    /// Inline value budget reserved at [`TaskSpec::begin`].
    pub fn args_value_size(&self) -> i64 {
        read_i64(&self.buf, ARGS_VALUE_SIZE_OFFSET)
    }

    /// Inline value bytes written so far.
    pub fn args_value_offset(&self) -> i64 {
        read_i64(&self.buf, ARGS_VALUE_OFFSET_OFFSET)
    }

    /// Total blob size.  Fixed at [`TaskSpec::begin`]; finishing does not
    /// change it.
    pub fn spec_size(&self) -> i64 {
        self.buf.len() as i64
    }

    /// Reads back a resource demand.
    ///
    /// # Panics
    /// Panics if `index >= MAX_RESOURCE_INDEX`.
    pub fn required_resource(&self, index: usize) -> f64 {
        read_f64(&self.buf, resource_offset(index))
    }
}

impl fmt::Debug for TaskSpecBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSpecBuilder")
            .field("function_id", &read_id(&self.buf, FUNCTION_ID_OFFSET))
            .field("arg_index", &self.arg_index())
            .field("num_args", &self.num_args())
            .field("num_returns", &self.num_returns())
            .finish_non_exhaustive()
    }
}

// ── TaskSpec ──────────────────────────────────────────────────────────────────

/// A finalized, immutable task specification.
///
/// One contiguous blob in the canonical [`layout`]; [`as_bytes`](Self::as_bytes)
/// is the wire/storage form, byte for byte.  Cloning copies the blob; two
/// clones never alias.
#[derive(Clone, PartialEq, Eq)]
pub struct TaskSpec {
    buf: Vec<u8>,
}

impl TaskSpec {
    /// Starts constructing a spec.
    ///
    /// Allocates the whole blob up front — header, `num_args + num_returns`
    /// slots, and `args_value_size` bytes of inline value budget — zeroed,
    /// with the task ID nil until [`TaskSpecBuilder::finish`].  A zeroed
    /// slot already reads as `ByRef` of the nil ID, which is exactly the
    /// pre-finalization state of every return slot.
    ///
    /// `parent_task_id` is nil for driver submissions; `actor_id` is nil for
    /// ordinary (non-actor) tasks.
    ///
    /// # Panics
    /// Panics if `num_args`, `num_returns`, or `args_value_size` is negative.
    #[allow(clippy::too_many_arguments)]
    pub fn begin(
        driver_id: DriverId,
        parent_task_id: TaskId,
        parent_counter: i64,
        actor_id: ActorId,
        actor_counter: i64,
        function_id: FunctionId,
        num_args: i64,
        num_returns: i64,
        args_value_size: i64,
    ) -> TaskSpecBuilder {
        assert!(num_args >= 0, "num_args must be nonnegative, got {num_args}");
        assert!(
            num_returns >= 0,
            "num_returns must be nonnegative, got {num_returns}"
        );
        assert!(
            args_value_size >= 0,
            "args_value_size must be nonnegative, got {args_value_size}"
        );

        let size = layout::spec_size(num_args, num_returns, args_value_size);
        let mut buf = vec![0u8; size as usize];
        write_id(&mut buf, DRIVER_ID_OFFSET, driver_id);
        write_id(&mut buf, PARENT_TASK_ID_OFFSET, parent_task_id);
        write_i64(&mut buf, PARENT_COUNTER_OFFSET, parent_counter);
        write_id(&mut buf, ACTOR_ID_OFFSET, actor_id);
        write_i64(&mut buf, ACTOR_COUNTER_OFFSET, actor_counter);
        write_id(&mut buf, FUNCTION_ID_OFFSET, function_id);
        write_i64(&mut buf, NUM_ARGS_OFFSET, num_args);
        write_i64(&mut buf, NUM_RETURNS_OFFSET, num_returns);
        write_i64(&mut buf, ARGS_VALUE_SIZE_OFFSET, args_value_size);
        // task_id, arg_index, args_value_offset, and the resource vector
        // start from the zeroed allocation.

        trace!(
            driver = %driver_id,
            function = %function_id,
            num_args,
            num_returns,
            args_value_size,
            "task spec under construction"
        );
        TaskSpecBuilder { buf }
    }

    /// Validates bytes received from another process and adopts them as a
    /// spec.
    ///
    /// Structural checks only — header bounds, exact length, completed
    /// construction cursors, known slot tags, in-range by-value spans,
    /// by-reference return slots, non-nil task ID — in O(slots).  Verifying
    /// the content hash is a separate, heavier step:
    /// [`verify_integrity`](Self::verify_integrity).
    ///
    /// # Errors
    /// Returns the first [`SpecError`] encountered, carrying the offending
    /// values.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SpecError> {
        let len = bytes.len();
        if len < HEADER_SIZE {
            return Err(SpecError::TruncatedHeader {
                actual: len,
                header: HEADER_SIZE,
            });
        }

        let num_args = read_i64(&bytes, NUM_ARGS_OFFSET);
        let arg_index = read_i64(&bytes, ARG_INDEX_OFFSET);
        let num_returns = read_i64(&bytes, NUM_RETURNS_OFFSET);
        let value_size = read_i64(&bytes, ARGS_VALUE_SIZE_OFFSET);
        let value_offset = read_i64(&bytes, ARGS_VALUE_OFFSET_OFFSET);
        for (field, value) in [
            ("num_args", num_args),
            ("arg_index", arg_index),
            ("num_returns", num_returns),
            ("args_value_size", value_size),
            ("args_value_offset", value_offset),
        ] {
            if value < 0 {
                return Err(SpecError::NegativeField { field, value });
            }
        }

        // Wide arithmetic: hostile counts must not wrap into a plausible size.
        let expected = HEADER_SIZE as u128
            + (num_args as u128 + num_returns as u128) * ARG_SLOT_SIZE as u128
            + value_size as u128;
        if expected != len as u128 {
            return Err(SpecError::SizeMismatch {
                expected,
                actual: len,
            });
        }

        if arg_index != num_args {
            return Err(SpecError::IncompleteArgs {
                arg_index,
                num_args,
            });
        }
        if value_offset != value_size {
            return Err(SpecError::IncompleteValueRegion {
                offset: value_offset,
                size: value_size,
            });
        }
        if read_id(&bytes, TASK_ID_OFFSET).is_nil() {
            return Err(SpecError::NotFinalized);
        }

        for slot in 0..num_args {
            let base = arg_slot_offset(slot);
            match bytes[base + ARG_TAG_OFFSET] {
                ARG_BY_REF => {}
                ARG_BY_VAL => {
                    let offset = read_i64(&bytes, base + ARG_PAYLOAD_OFFSET);
                    let length = read_i64(&bytes, base + ARG_PAYLOAD_OFFSET + 8);
                    let in_range = offset >= 0
                        && length >= 0
                        && offset
                            .checked_add(length)
                            .map_or(false, |end| end <= value_size);
                    if !in_range {
                        return Err(SpecError::ValueOutOfRange {
                            slot,
                            offset,
                            length,
                            region: value_size,
                        });
                    }
                }
                tag => return Err(SpecError::UnknownArgTag { slot, tag }),
            }
        }
        for i in 0..num_returns {
            let base = arg_slot_offset(num_args + i);
            if bytes[base + ARG_TAG_OFFSET] != ARG_BY_REF {
                return Err(SpecError::ReturnNotByRef {
                    slot: num_args + i,
                });
            }
        }

        Ok(Self { buf: bytes })
    }

    /// Recomputes the content hash and re-derives every return ID, proving
    /// the spec was not tampered with since finalization.
    ///
    /// O(spec_size).  Transports that already authenticate their payload can
    /// skip this after [`from_bytes`](Self::from_bytes).
    ///
    /// # Errors
    /// [`SpecError::TaskIdMismatch`] if the stored task ID is not the hash
    /// of the content; [`SpecError::ReturnIdMismatch`] if a return slot does
    /// not carry its derived ID.
    pub fn verify_integrity(&self) -> Result<(), SpecError> {
        let num_args = self.num_args();
        let num_returns = self.num_returns();
        let stored = self.task_id();

        // Reconstruct the pre-finalization image the hash was taken over.
        let mut image = self.buf.clone();
        write_id(&mut image, TASK_ID_OFFSET, UniqueId::NIL);
        for i in 0..num_returns {
            let base = arg_slot_offset(num_args + i);
            write_id(&mut image, base + ARG_PAYLOAD_OFFSET, UniqueId::NIL);
        }
        let computed = content_task_id(&image);
        if computed != stored {
            return Err(SpecError::TaskIdMismatch { stored, computed });
        }

        for i in 0..num_returns {
            if self.return_id(i) != compute_return_id(stored, i) {
                return Err(SpecError::ReturnIdMismatch {
                    slot: num_args + i,
                });
            }
        }
        Ok(())
    }

    // ── Header accessors ──────────────────────────────────────────────────────

    /// The content-addressed task ID.  Never nil on a finalized spec.
    pub fn task_id(&self) -> TaskId {
        read_id(&self.buf, TASK_ID_OFFSET)
    }

    /// Driver that owns this task's lineage.
    pub fn driver_id(&self) -> DriverId {
        read_id(&self.buf, DRIVER_ID_OFFSET)
    }

    /// Task that submitted this one; nil for driver submissions.
    pub fn parent_task_id(&self) -> TaskId {
        read_id(&self.buf, PARENT_TASK_ID_OFFSET)
    }

    /// Ordinal of this submission within the parent.
    pub fn parent_counter(&self) -> i64 {
        read_i64(&self.buf, PARENT_COUNTER_OFFSET)
    }

    /// Actor instance this task targets; nil for ordinary tasks.
    pub fn actor_id(&self) -> ActorId {
        read_id(&self.buf, ACTOR_ID_OFFSET)
    }

    /// Ordinal of this submission within the target actor.
    pub fn actor_counter(&self) -> i64 {
        read_i64(&self.buf, ACTOR_COUNTER_OFFSET)
    }

    /// The remote function to invoke.
    pub fn function_id(&self) -> FunctionId {
        read_id(&self.buf, FUNCTION_ID_OFFSET)
    }

    /// Number of argument slots.
    pub fn num_args(&self) -> i64 {
        read_i64(&self.buf, NUM_ARGS_OFFSET)
    }

    /// Number of return slots.
    pub fn num_returns(&self) -> i64 {
        read_i64(&self.buf, NUM_RETURNS_OFFSET)
    }

    /// Size of the pass-by-value region, in bytes.
    pub fn args_value_size(&self) -> i64 {
        read_i64(&self.buf, ARGS_VALUE_SIZE_OFFSET)
    }

    /// Total blob size: header + slot array + value region.
    pub fn spec_size(&self) -> i64 {
        self.buf.len() as i64
    }

    /// Resource demand at `index`; `0.0` means "no requirement".
    ///
    /// # Panics
    /// Panics if `index >= MAX_RESOURCE_INDEX`.
    pub fn required_resource(&self, index: usize) -> f64 {
        read_f64(&self.buf, resource_offset(index))
    }

    // ── Argument / return accessors ───────────────────────────────────────────

    /// The argument in slot `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of `[0, num_args)`.
    pub fn arg(&self, index: i64) -> TaskArg {
        let num_args = self.num_args();
        assert!(
            (0..num_args).contains(&index),
            "argument index {index} out of range (num_args {num_args})"
        );
        decode_slot(&self.buf, index)
    }

    /// Object ID of the by-reference argument in slot `index`.
    ///
    /// # Panics
    /// Panics if the slot is out of range or holds a by-value argument.
    pub fn arg_id(&self, index: i64) -> ObjectId {
        match self.arg(index) {
            TaskArg::ByRef { obj_id } => obj_id,
            TaskArg::ByVal { .. } => {
                panic!("argument {index} is by-value, not by-reference")
            }
        }
    }

    /// The inlined bytes of the by-value argument in slot `index`.
    ///
    /// # Panics
    /// Panics if the slot is out of range or holds a by-reference argument.
    pub fn arg_value(&self, index: i64) -> &[u8] {
        match self.arg(index) {
            TaskArg::ByVal { offset, length } => {
                let base = value_region_offset(self.num_args(), self.num_returns());
                let start = base + offset as usize;
                &self.buf[start..start + length as usize]
            }
            TaskArg::ByRef { .. } => {
                panic!("argument {index} is by-reference, not by-value")
            }
        }
    }

    /// Byte length of the by-value argument in slot `index`.
    ///
    /// # Panics
    /// Panics if the slot is out of range or holds a by-reference argument.
    pub fn arg_length(&self, index: i64) -> i64 {
        match self.arg(index) {
            TaskArg::ByVal { length, .. } => length,
            TaskArg::ByRef { .. } => {
                panic!("argument {index} is by-reference, not by-value")
            }
        }
    }

    /// Object ID of return value `index`, as derived at finalization.
    ///
    /// # Panics
    /// Panics if `index` is out of `[0, num_returns)`.
    pub fn return_id(&self, index: i64) -> ObjectId {
        let num_returns = self.num_returns();
        assert!(
            (0..num_returns).contains(&index),
            "return index {index} out of range (num_returns {num_returns})"
        );
        let base = arg_slot_offset(self.num_args() + index);
        debug_assert_eq!(self.buf[base + ARG_TAG_OFFSET], ARG_BY_REF);
        read_id(&self.buf, base + ARG_PAYLOAD_OFFSET)
    }

    // ── Raw blob access ───────────────────────────────────────────────────────

    /// The canonical byte blob — the wire and storage form.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the spec, yielding the blob.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl fmt::Debug for TaskSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSpec")
            .field("task_id", &self.task_id())
            .field("function_id", &self.function_id())
            .field("num_args", &self.num_args())
            .field("num_returns", &self.num_returns())
            .finish_non_exhaustive()
    }
}

/// Human-readable one-line rendering for logs: the function ID, then each
/// argument, then each return ID.  Not a stable format — never parse it.
impl fmt::Display for TaskSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fun {} ", self.function_id())?;
        for i in 0..self.num_args() {
            match self.arg(i) {
                TaskArg::ByRef { obj_id } => write!(f, " id:{i} {obj_id}")?,
                TaskArg::ByVal { length, .. } => write!(f, " val:{i} len={length}")?,
            }
        }
        for i in 0..self.num_returns() {
            write!(f, " ret:{i} {}", self.return_id(i))?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
