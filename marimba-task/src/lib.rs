/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Marimba task representation core.
//!
//! Marimba is a distributed task-parallel execution engine: a driver program
//! submits units of work to a cluster, tasks consume other tasks' outputs by
//! reference or embedded bytes by value, and schedulers move the work to
//! workers and actor instances.  This crate is the one data structure every
//! component reads and writes — the task specification — plus the identity
//! scheme it is built on and the envelope schedulers wrap around it:
//!
//! ```text
//! lib.rs
//! ├── id          – 20-byte identifiers: nil sentinel, hex, fresh-ID generation
//! ├── task        – TaskSpec: two-phase builder, content-addressed task IDs,
//! │   │             derived object IDs, typed accessors
//! │   ├── layout  – the canonical byte layout (a cluster-wide wire contract)
//! │   └── error   – SpecError for decoding untrusted blobs
//! └── instance    – TaskInstance: spec + scheduling state + placement
//! ```
//!
//! The crate is passive data: no I/O, no scheduling policy, no transport.
//! A finalized spec is a single contiguous, byte-addressable blob whose task
//! ID is the truncated SHA-256 of its own content, so identical submissions
//! collapse to one identity and replays are detectable, and the object IDs
//! of its outputs are derivable from the task ID alone.

pub mod id;
pub mod instance;
pub mod task;

pub use id::{
    ActorId, DbClientId, Digest, DriverId, FunctionId, ObjectId, TaskId, UniqueId,
    DIGEST_SIZE, ID_HEX_LEN, NIL_DIGEST, UNIQUE_ID_SIZE,
};
pub use instance::TaskInstance;
pub use task::layout::{CPU_RESOURCE_INDEX, GPU_RESOURCE_INDEX, MAX_RESOURCE_INDEX};
pub use task::{
    compute_put_id, compute_return_id, SpecError, TaskArg, TaskSpec, TaskSpecBuilder,
};
