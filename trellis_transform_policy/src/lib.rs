// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_transform_policy --heading-base-level=0

//! Trellis Transform Policy: a gesture-scoped transform controller.
//!
//! One press-drag-release interaction is one **gesture**, and one gesture is
//! owned by one [`TransformPolicy`]. The policy captures the host's
//! transform when the gesture starts, routes every intermediate change
//! through a pre/post transform stack (see `trellis_transform_stack`), keeps
//! the host's visible transform in sync on every change (live preview), and
//! turns the finished gesture into a single undoable operation for an
//! external history.
//!
//! The policy does not know what a "host" is beyond the [`TransformHost`]
//! seam: something that can report its current transform, accept a new one,
//! and, optionally, mirror a committed transform into persisted content.
//!
//! ## Lifecycle
//!
//! ```text
//! init() ──► handle creation / mutation ──► commit() ──► one Operation
//!    ▲        (host follows live)     │
//!    │                                └──► abort() ──► host restored
//!    └──────────── reusable ◄─────────────────┘
//! ```
//!
//! Handle operations and `commit` before `init` report
//! [`PolicyError::NotInitialized`]; this is a caller bug, not a recoverable
//! condition. Host-side failures surface when the returned operation runs,
//! and are never retried.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::Affine;
//! use trellis_operation::Operation;
//! use trellis_transform_policy::{TransformHost, TransformPolicy};
//!
//! struct Node {
//!     transform: Affine,
//! }
//!
//! impl TransformHost for Node {
//!     fn current_transform(&self) -> Affine {
//!         self.transform
//!     }
//!
//!     fn apply_transform(&mut self, transform: Affine) {
//!         self.transform = transform;
//!     }
//! }
//!
//! let node = Rc::new(RefCell::new(Node { transform: Affine::IDENTITY }));
//! let mut policy = TransformPolicy::new(Rc::clone(&node));
//!
//! // Press: capture the node's transform.
//! policy.init();
//! let drag = policy.create_pre_transform()?;
//!
//! // Drag: the node follows live.
//! policy.set_pre_translate(drag, 10.0, 5.0)?;
//! assert_eq!(node.borrow().transform, Affine::translate((10.0, 5.0)));
//!
//! // Release: the whole gesture becomes one reversible operation.
//! let mut operation = policy.commit()?;
//! operation.undo().unwrap();
//! assert_eq!(node.borrow().transform, Affine::IDENTITY);
//! # Ok::<(), trellis_transform_policy::PolicyError>(())
//! ```
//!
//! The [`snap`] module provides grid-snapping offsets for interaction layers
//! that align dragged positions to a grid before feeding them into the
//! policy.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod host;
mod operation;
mod policy;
pub mod snap;

pub use host::{HostHandle, TransformHost};
pub use operation::ApplyTransformOperation;
pub use policy::{PolicyError, TransformPolicy};
