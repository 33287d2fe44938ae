// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composite operations: ordered lists of sub-operations run as one unit.
//!
//! A [`CompositeOperation`] executes its sub-operations front to back and
//! stops at the first failure. Undo order is configurable: a
//! [`reverse_undo`](CompositeOperation::reverse_undo) composite undoes in
//! reverse order of addition (last executed, first undone), which is the
//! right shape when later sub-operations depend on the effects of earlier
//! ones; a [`forward_undo`](CompositeOperation::forward_undo) composite
//! undoes in execution order for sub-operations whose undos are themselves
//! order-sensitive front to back.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::{Operation, OperationError};

/// The order in which a composite undoes its sub-operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UndoOrder {
    /// Undo in the order the sub-operations were added.
    Forward,
    /// Undo in reverse order of addition.
    Reverse,
}

/// An ordered list of sub-operations executed as one transactional unit.
pub struct CompositeOperation {
    label: String,
    operations: Vec<Box<dyn Operation>>,
    undo_order: UndoOrder,
}

impl fmt::Debug for CompositeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeOperation")
            .field("label", &self.label)
            .field("operations", &self.operations.len())
            .field("undo_order", &self.undo_order)
            .finish()
    }
}

impl CompositeOperation {
    /// Creates an empty composite that undoes sub-operations in the order
    /// they were added.
    #[must_use]
    pub fn forward_undo(label: impl Into<String>) -> Self {
        Self::new(label, UndoOrder::Forward)
    }

    /// Creates an empty composite that undoes sub-operations in reverse
    /// order of addition.
    #[must_use]
    pub fn reverse_undo(label: impl Into<String>) -> Self {
        Self::new(label, UndoOrder::Reverse)
    }

    fn new(label: impl Into<String>, undo_order: UndoOrder) -> Self {
        Self {
            label: label.into(),
            operations: Vec::new(),
            undo_order,
        }
    }

    /// Appends a sub-operation; it will execute after all previously added
    /// sub-operations.
    pub fn push(&mut self, operation: Box<dyn Operation>) {
        self.operations.push(operation);
    }

    /// Returns the number of sub-operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if no sub-operations have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns the configured undo order.
    #[must_use]
    pub fn undo_order(&self) -> UndoOrder {
        self.undo_order
    }

    /// Collapses a single-entry composite into its sole sub-operation.
    ///
    /// Composites with zero or multiple sub-operations are returned boxed,
    /// unchanged.
    #[must_use]
    pub fn unwrap(mut self) -> Box<dyn Operation> {
        if self.operations.len() == 1 {
            self.operations.remove(0)
        } else {
            Box::new(self)
        }
    }

    fn nested(index: usize, source: OperationError) -> OperationError {
        OperationError::Composite {
            index,
            source: Box::new(source),
        }
    }
}

impl Operation for CompositeOperation {
    fn label(&self) -> &str {
        &self.label
    }

    fn execute(&mut self) -> Result<(), OperationError> {
        for (index, op) in self.operations.iter_mut().enumerate() {
            op.execute().map_err(|source| Self::nested(index, source))?;
        }
        Ok(())
    }

    fn undo(&mut self) -> Result<(), OperationError> {
        match self.undo_order {
            UndoOrder::Forward => {
                for (index, op) in self.operations.iter_mut().enumerate() {
                    op.undo().map_err(|source| Self::nested(index, source))?;
                }
            }
            UndoOrder::Reverse => {
                for (index, op) in self.operations.iter_mut().enumerate().rev() {
                    op.undo().map_err(|source| Self::nested(index, source))?;
                }
            }
        }
        Ok(())
    }

    fn redo(&mut self) -> Result<(), OperationError> {
        for (index, op) in self.operations.iter_mut().enumerate() {
            op.redo().map_err(|source| Self::nested(index, source))?;
        }
        Ok(())
    }

    /// A composite is a no-op iff every sub-operation is (vacuously true
    /// when empty).
    fn is_noop(&self) -> bool {
        self.operations.iter().all(|op| op.is_noop())
    }

    /// A composite is content-relevant iff any sub-operation is.
    fn is_content_relevant(&self) -> bool {
        self.operations.iter().any(|op| op.is_content_relevant())
    }
}
