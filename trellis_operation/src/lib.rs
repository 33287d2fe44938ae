// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_operation --heading-base-level=0

//! Trellis Operation: undoable, redoable transactional units.
//!
//! Interactive editors turn every finished user gesture into a single
//! reversible unit that an external history can execute, undo, and redo.
//! This crate provides the contract for such units and the combinators to
//! build them:
//!
//! - [`Operation`]: the execute/undo/redo contract, plus two queries for
//!   the history layer: [`Operation::is_noop`] (skip pushing trivial
//!   operations) and [`Operation::is_content_relevant`] (distinguish
//!   cosmetic from semantic changes, e.g. for dirty tracking).
//! - [`composite::CompositeOperation`]: an ordered list of sub-operations
//!   executed front to back, undone in forward or reverse order.
//! - [`content`]: operations that add or remove a child of a content
//!   container, with construction-time snapshots for no-op detection.
//!
//! ## Minimal example
//!
//! ```rust
//! use trellis_operation::{Operation, OperationError};
//!
//! /// Sets a counter to a new value.
//! struct SetCounter {
//!     value: u32,
//!     old: u32,
//!     new: u32,
//! }
//!
//! impl Operation for SetCounter {
//!     fn label(&self) -> &str {
//!         "set counter"
//!     }
//!
//!     fn execute(&mut self) -> Result<(), OperationError> {
//!         self.value = self.new;
//!         Ok(())
//!     }
//!
//!     fn undo(&mut self) -> Result<(), OperationError> {
//!         self.value = self.old;
//!         Ok(())
//!     }
//!
//!     fn is_noop(&self) -> bool {
//!         self.old == self.new
//!     }
//!
//!     fn is_content_relevant(&self) -> bool {
//!         true
//!     }
//! }
//!
//! let mut op = SetCounter { value: 1, old: 1, new: 5 };
//! op.execute()?;
//! assert_eq!(op.value, 5);
//! op.undo()?;
//! assert_eq!(op.value, 1);
//! # Ok::<(), OperationError>(())
//! ```
//!
//! ## Failure semantics
//!
//! Execution failures are surfaced, never retried. A composite stops at the
//! first failing sub-operation and reports its position; it does not attempt
//! a compensating rollback. Recovery policy belongs to whoever runs the
//! operation.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod composite;
pub mod content;

use alloc::boxed::Box;
use alloc::string::String;

/// Errors surfaced when executing, undoing, or redoing an [`Operation`].
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// The receiving end refused the mutation.
    #[error("operation rejected: {0}")]
    Rejected(String),
    /// A sub-operation of a composite failed; `index` is its position in
    /// execution order.
    #[error("sub-operation {index} failed")]
    Composite {
        /// Position of the failing sub-operation within the composite.
        index: usize,
        /// The underlying failure.
        #[source]
        source: Box<OperationError>,
    },
}

/// A reversible unit of work handed to an external undo/redo history.
///
/// `execute` applies the change, `undo` reverts it, and `redo` applies it
/// again after an undo (by default simply `execute`). The two queries are
/// read by the history layer: operations reporting [`is_noop`](Self::is_noop)
/// need not be pushed at all, and [`is_content_relevant`](Self::is_content_relevant)
/// marks operations that change persisted domain state rather than
/// transient visual state.
pub trait Operation {
    /// A short human-readable description of this operation.
    fn label(&self) -> &str;

    /// Applies the change.
    fn execute(&mut self) -> Result<(), OperationError>;

    /// Reverts the change.
    fn undo(&mut self) -> Result<(), OperationError>;

    /// Applies the change again after an undo.
    fn redo(&mut self) -> Result<(), OperationError> {
        self.execute()
    }

    /// Whether executing this operation would leave every observable state
    /// unchanged.
    fn is_noop(&self) -> bool;

    /// Whether this operation changes persisted domain content, as opposed
    /// to purely visual or transient state.
    fn is_content_relevant(&self) -> bool;
}
