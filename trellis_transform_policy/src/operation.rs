// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::Affine;
use trellis_operation::{Operation, OperationError};

use crate::host::{HostHandle, TransformHost};

/// Replays a committed transform change on a host.
///
/// Holds the transform the host had when the gesture started (`initial`)
/// and the composite it ended with (`target`). Executing applies `target`,
/// undoing applies `initial`. The gesture already applied `target` live, so
/// the first execution after a commit is idempotent.
pub struct ApplyTransformOperation<H: TransformHost> {
    host: HostHandle<H>,
    initial: Affine,
    target: Affine,
}

impl<H: TransformHost> fmt::Debug for ApplyTransformOperation<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplyTransformOperation")
            .field("host", &"<shared>")
            .field("initial", &self.initial)
            .field("target", &self.target)
            .finish()
    }
}

impl<H: TransformHost> ApplyTransformOperation<H> {
    /// Creates an operation replaying the change `initial` → `target`.
    #[must_use]
    pub fn new(host: HostHandle<H>, initial: Affine, target: Affine) -> Self {
        Self {
            host,
            initial,
            target,
        }
    }

    /// The transform the host had before the change.
    #[must_use]
    pub fn initial(&self) -> Affine {
        self.initial
    }

    /// The transform the host has after the change.
    #[must_use]
    pub fn target(&self) -> Affine {
        self.target
    }
}

impl<H: TransformHost> Operation for ApplyTransformOperation<H> {
    fn label(&self) -> &str {
        "apply transform"
    }

    fn execute(&mut self) -> Result<(), OperationError> {
        self.host.borrow_mut().apply_transform(self.target);
        Ok(())
    }

    fn undo(&mut self) -> Result<(), OperationError> {
        self.host.borrow_mut().apply_transform(self.initial);
        Ok(())
    }

    fn is_noop(&self) -> bool {
        self.initial == self.target
    }

    fn is_content_relevant(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::RefCell;

    struct Node {
        transform: Affine,
    }

    impl TransformHost for Node {
        fn current_transform(&self) -> Affine {
            self.transform
        }

        fn apply_transform(&mut self, transform: Affine) {
            self.transform = transform;
        }
    }

    #[test]
    fn execute_applies_target_and_undo_restores_initial() {
        let node = Rc::new(RefCell::new(Node {
            transform: Affine::IDENTITY,
        }));
        let target = Affine::translate((4.0, -1.0));
        let mut op = ApplyTransformOperation::new(Rc::clone(&node), Affine::IDENTITY, target);

        op.execute().unwrap();
        assert_eq!(node.borrow().transform, target);

        op.undo().unwrap();
        assert_eq!(node.borrow().transform, Affine::IDENTITY);

        op.redo().unwrap();
        assert_eq!(node.borrow().transform, target);
    }

    #[test]
    fn noop_iff_initial_equals_target() {
        let node = Rc::new(RefCell::new(Node {
            transform: Affine::IDENTITY,
        }));
        let same =
            ApplyTransformOperation::new(Rc::clone(&node), Affine::scale(2.0), Affine::scale(2.0));
        assert!(same.is_noop());
        assert!(!same.is_content_relevant());

        let moved =
            ApplyTransformOperation::new(Rc::clone(&node), Affine::IDENTITY, Affine::scale(2.0));
        assert!(!moved.is_noop());
    }
}
