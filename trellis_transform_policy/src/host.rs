// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use kurbo::Affine;
use trellis_operation::Operation;

/// Shared handle to a transform host.
///
/// Gesture processing is single-threaded: only the active gesture's policy
/// writes the host while the gesture runs, and operations produced by a
/// commit write it later from the undo history. `Rc<RefCell<_>>` gives both
/// writers access without locking.
pub type HostHandle<H> = Rc<RefCell<H>>;

/// The seam between a [`TransformPolicy`](crate::TransformPolicy) and
/// whatever it transforms.
///
/// The two required methods cover the visual side: reading the transform at
/// gesture start and replacing it on every change. Hosts whose transform is
/// also reflected in persisted content additionally override
/// [`supports_content_transform`](Self::supports_content_transform) and
/// [`create_content_delta_operation`](Self::create_content_delta_operation);
/// a committing policy then pairs the visual operation with the content
/// operation in one unit.
pub trait TransformHost {
    /// Returns the host's current transform.
    fn current_transform(&self) -> Affine;

    /// Replaces the host's transform.
    fn apply_transform(&mut self, transform: Affine);

    /// Whether committed transform changes should also be written to
    /// persisted content.
    fn supports_content_transform(&self) -> bool {
        false
    }

    /// Returns an operation that applies `delta` to the host's persisted
    /// content, where `delta` maps the gesture's initial transform to its
    /// final one in the host's local coordinates.
    ///
    /// Only consulted when [`supports_content_transform`](Self::supports_content_transform)
    /// returns `true`; `None` means there is no content change to record.
    fn create_content_delta_operation(&self, delta: Affine) -> Option<Box<dyn Operation>> {
        let _ = delta;
        None
    }
}
