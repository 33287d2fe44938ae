// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Operations that edit the child list of a content container.
//!
//! These operations capture the container's children as an immutable
//! snapshot when the operation is **constructed**, and answer
//! [`Operation::is_noop`] from that snapshot rather than from live state.
//! The surrounding content may well change between construction and the
//! no-op query (a history layer typically asks long after the fact), so a
//! lazy answer would be wrong.
//!
//! Containers are shared through `Rc<RefCell<_>>`: the operation and its
//! container must outlive each other's use inside an undo history, and all
//! access is single-threaded.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::{Operation, OperationError};

/// The minimal content seam these operations edit through.
///
/// `children` returns a snapshot of the current child keys; `add_child` and
/// `remove_child` mutate the underlying content and may reject the mutation
/// with [`OperationError::Rejected`].
pub trait ContentContainer {
    /// Key type identifying a child; compared by equality.
    type Child: Clone + PartialEq;

    /// Returns the current children, in order.
    fn children(&self) -> Vec<Self::Child>;

    /// Inserts `child` at `index`.
    fn add_child(&mut self, child: Self::Child, index: usize) -> Result<(), OperationError>;

    /// Removes `child`.
    fn remove_child(&mut self, child: &Self::Child) -> Result<(), OperationError>;
}

/// Adds a child to a content container; undo removes it again.
///
/// No-op iff the child was already present when the operation was
/// constructed. Execution is guarded: the child is only inserted if it is
/// not currently present, and undo only removes it if it is.
pub struct AddContentChildOperation<C: ContentContainer> {
    container: Rc<RefCell<C>>,
    child: C::Child,
    index: usize,
    initial_children: Vec<C::Child>,
}

impl<C: ContentContainer> fmt::Debug for AddContentChildOperation<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddContentChildOperation")
            .field("container", &"<shared>")
            .field("index", &self.index)
            .field("initial_children", &self.initial_children.len())
            .finish_non_exhaustive()
    }
}

impl<C: ContentContainer> AddContentChildOperation<C> {
    /// Creates the operation, snapshotting the container's current children
    /// for later no-op queries.
    #[must_use]
    pub fn new(container: Rc<RefCell<C>>, child: C::Child, index: usize) -> Self {
        let initial_children = container.borrow().children();
        Self {
            container,
            child,
            index,
            initial_children,
        }
    }
}

impl<C: ContentContainer> Operation for AddContentChildOperation<C> {
    fn label(&self) -> &str {
        "add content child"
    }

    fn execute(&mut self) -> Result<(), OperationError> {
        let mut container = self.container.borrow_mut();
        if !container.children().contains(&self.child) {
            container.add_child(self.child.clone(), self.index)?;
        }
        Ok(())
    }

    fn undo(&mut self) -> Result<(), OperationError> {
        let mut container = self.container.borrow_mut();
        if container.children().contains(&self.child) {
            container.remove_child(&self.child)?;
        }
        Ok(())
    }

    fn is_noop(&self) -> bool {
        self.initial_children.contains(&self.child)
    }

    fn is_content_relevant(&self) -> bool {
        true
    }
}

/// Removes a child from a content container; undo re-inserts it at its
/// original position.
///
/// No-op iff the child was absent when the operation was constructed.
pub struct RemoveContentChildOperation<C: ContentContainer> {
    container: Rc<RefCell<C>>,
    child: C::Child,
    /// Position of the child at construction; `None` when it was absent.
    initial_index: Option<usize>,
}

impl<C: ContentContainer> fmt::Debug for RemoveContentChildOperation<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoveContentChildOperation")
            .field("container", &"<shared>")
            .field("initial_index", &self.initial_index)
            .finish_non_exhaustive()
    }
}

impl<C: ContentContainer> RemoveContentChildOperation<C> {
    /// Creates the operation, recording the child's current position for
    /// undo re-insertion.
    #[must_use]
    pub fn new(container: Rc<RefCell<C>>, child: C::Child) -> Self {
        let initial_index = container
            .borrow()
            .children()
            .iter()
            .position(|c| *c == child);
        Self {
            container,
            child,
            initial_index,
        }
    }
}

impl<C: ContentContainer> Operation for RemoveContentChildOperation<C> {
    fn label(&self) -> &str {
        "remove content child"
    }

    fn execute(&mut self) -> Result<(), OperationError> {
        let mut container = self.container.borrow_mut();
        if container.children().contains(&self.child) {
            container.remove_child(&self.child)?;
        }
        Ok(())
    }

    fn undo(&mut self) -> Result<(), OperationError> {
        let Some(index) = self.initial_index else {
            return Ok(());
        };
        let mut container = self.container.borrow_mut();
        if !container.children().contains(&self.child) {
            let index = index.min(container.children().len());
            container.add_child(self.child.clone(), index)?;
        }
        Ok(())
    }

    fn is_noop(&self) -> bool {
        self.initial_index.is_none()
    }

    fn is_content_relevant(&self) -> bool {
        true
    }
}
