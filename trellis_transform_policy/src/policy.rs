// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::fmt;

use kurbo::Affine;
use trellis_operation::composite::CompositeOperation;
use trellis_operation::Operation;
use trellis_transform_stack::{PostHandle, PreHandle, StackError, TransformStack};

use crate::host::{HostHandle, TransformHost};
use crate::operation::ApplyTransformOperation;

/// Errors reported by [`TransformPolicy`].
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// A handle operation, `commit`, or `abort` was invoked without an
    /// active gesture. Caller bug: call [`TransformPolicy::init`] first.
    #[error("no active gesture: call init() first")]
    NotInitialized,
    /// A handle referred to an entry that no longer exists.
    #[error(transparent)]
    Stack(#[from] StackError),
    /// A content delta was required but the gesture's initial transform is
    /// singular and cannot be inverted.
    #[error("initial transform is not invertible")]
    NonInvertibleBase,
}

/// Gesture-scoped controller for the transform of one host.
///
/// A policy is reusable: each gesture runs [`init`](Self::init), any number
/// of handle creations and mutations, and ends in either
/// [`commit`](Self::commit) or [`abort`](Self::abort). Between gestures the
/// policy holds no transform state. Every mutation recomputes the composite
/// transform and applies it to the host immediately, so the host tracks the
/// gesture live; the undo history only comes into play with the operation
/// returned by `commit`.
pub struct TransformPolicy<H: TransformHost> {
    host: HostHandle<H>,
    gesture: Option<TransformStack>,
}

impl<H: TransformHost> fmt::Debug for TransformPolicy<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformPolicy")
            .field("host", &"<shared>")
            .field("gesture", &self.gesture)
            .finish()
    }
}

impl<H: TransformHost + 'static> TransformPolicy<H> {
    /// Creates a policy for the given host. No gesture is active yet.
    #[must_use]
    pub fn new(host: HostHandle<H>) -> Self {
        Self {
            host,
            gesture: None,
        }
    }

    /// Returns `true` while a gesture is active (between `init` and
    /// `commit`/`abort`).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Starts a gesture: captures the host's current transform as the base
    /// and clears all transform state. Calling `init` during an active
    /// gesture discards that gesture and starts over.
    pub fn init(&mut self) {
        let base = self.host.borrow().current_transform();
        self.gesture = Some(TransformStack::new(base));
    }

    /// The transform the host had when the active gesture started.
    #[must_use]
    pub fn initial_transform(&self) -> Option<Affine> {
        self.gesture.as_ref().map(TransformStack::base)
    }

    /// The composite transform of the active gesture.
    pub fn current_composite(&self) -> Result<Affine, PolicyError> {
        Ok(self.stack()?.compose())
    }

    /// Appends an identity pre-transform and returns its handle.
    ///
    /// A fresh identity entry cannot change the composite, so the host is
    /// not touched.
    pub fn create_pre_transform(&mut self) -> Result<PreHandle, PolicyError> {
        Ok(self.stack_mut()?.create_pre_transform())
    }

    /// Appends an identity post-transform and returns its handle.
    pub fn create_post_transform(&mut self) -> Result<PostHandle, PolicyError> {
        Ok(self.stack_mut()?.create_post_transform())
    }

    /// Sets the identified pre-transform to a translation and applies the
    /// recomputed composite to the host.
    pub fn set_pre_translate(
        &mut self,
        handle: PreHandle,
        tx: f64,
        ty: f64,
    ) -> Result<(), PolicyError> {
        self.stack_mut()?.set_pre_translate(handle, tx, ty)?;
        self.sync_host();
        Ok(())
    }

    /// Sets the identified pre-transform to a scaling and applies the
    /// recomputed composite to the host.
    pub fn set_pre_scale(
        &mut self,
        handle: PreHandle,
        sx: f64,
        sy: f64,
    ) -> Result<(), PolicyError> {
        self.stack_mut()?.set_pre_scale(handle, sx, sy)?;
        self.sync_host();
        Ok(())
    }

    /// Sets the identified pre-transform to a counter-clockwise rotation
    /// and applies the recomputed composite to the host.
    pub fn set_pre_rotate(&mut self, handle: PreHandle, radians: f64) -> Result<(), PolicyError> {
        self.stack_mut()?.set_pre_rotate(handle, radians)?;
        self.sync_host();
        Ok(())
    }

    /// Replaces the identified pre-transform and applies the recomputed
    /// composite to the host.
    pub fn set_pre_transform(
        &mut self,
        handle: PreHandle,
        transform: Affine,
    ) -> Result<(), PolicyError> {
        self.stack_mut()?.set_pre_transform(handle, transform)?;
        self.sync_host();
        Ok(())
    }

    /// Sets the identified post-transform to a translation and applies the
    /// recomputed composite to the host.
    pub fn set_post_translate(
        &mut self,
        handle: PostHandle,
        tx: f64,
        ty: f64,
    ) -> Result<(), PolicyError> {
        self.stack_mut()?.set_post_translate(handle, tx, ty)?;
        self.sync_host();
        Ok(())
    }

    /// Sets the identified post-transform to a scaling and applies the
    /// recomputed composite to the host.
    pub fn set_post_scale(
        &mut self,
        handle: PostHandle,
        sx: f64,
        sy: f64,
    ) -> Result<(), PolicyError> {
        self.stack_mut()?.set_post_scale(handle, sx, sy)?;
        self.sync_host();
        Ok(())
    }

    /// Sets the identified post-transform to a counter-clockwise rotation
    /// and applies the recomputed composite to the host.
    pub fn set_post_rotate(&mut self, handle: PostHandle, radians: f64) -> Result<(), PolicyError> {
        self.stack_mut()?.set_post_rotate(handle, radians)?;
        self.sync_host();
        Ok(())
    }

    /// Replaces the identified post-transform and applies the recomputed
    /// composite to the host.
    pub fn set_post_transform(
        &mut self,
        handle: PostHandle,
        transform: Affine,
    ) -> Result<(), PolicyError> {
        self.stack_mut()?.set_post_transform(handle, transform)?;
        self.sync_host();
        Ok(())
    }

    /// Clears all transform entries and applies `transform` to the host
    /// directly (absolute repositioning). Existing handles are invalidated.
    pub fn set_transform(&mut self, transform: Affine) -> Result<(), PolicyError> {
        self.stack_mut()?.set_transform(transform);
        self.sync_host();
        Ok(())
    }

    /// Ends the gesture and returns one operation covering it.
    ///
    /// The operation replays the change from the gesture's base transform
    /// to its final composite; its undo restores the base. When the host
    /// supports content transformation and the gesture actually changed the
    /// transform, the content delta `inverse(base) · composite` is handed
    /// to the host and the resulting content operation is chained behind
    /// the visual one in a unit that executes forward and undoes in reverse
    /// order.
    ///
    /// On [`PolicyError::NonInvertibleBase`] the gesture stays active with
    /// the composite still applied to the host; the caller decides between
    /// [`abort`](Self::abort) and accepting the partial state.
    pub fn commit(&mut self) -> Result<Box<dyn Operation>, PolicyError> {
        let stack = self.gesture.as_ref().ok_or(PolicyError::NotInitialized)?;
        let base = stack.base();
        let composite = stack.compose();
        let visual = ApplyTransformOperation::new(Rc::clone(&self.host), base, composite);

        let needs_content = !visual.is_noop() && self.host.borrow().supports_content_transform();
        let operation: Box<dyn Operation> = if needs_content {
            if base.determinant().abs() < f64::EPSILON {
                return Err(PolicyError::NonInvertibleBase);
            }
            let delta = base.inverse() * composite;
            match self.host.borrow().create_content_delta_operation(delta) {
                Some(content) => {
                    let mut unit = CompositeOperation::reverse_undo("transform content");
                    unit.push(Box::new(visual));
                    unit.push(content);
                    Box::new(unit)
                }
                None => Box::new(visual),
            }
        } else {
            Box::new(visual)
        };

        self.gesture = None;
        Ok(operation)
    }

    /// Cancels the gesture: restores the host's pre-gesture transform
    /// directly, without going through any undo history, and clears all
    /// transform state.
    pub fn abort(&mut self) -> Result<(), PolicyError> {
        let stack = self.gesture.take().ok_or(PolicyError::NotInitialized)?;
        self.host.borrow_mut().apply_transform(stack.base());
        Ok(())
    }

    fn stack(&self) -> Result<&TransformStack, PolicyError> {
        self.gesture.as_ref().ok_or(PolicyError::NotInitialized)
    }

    fn stack_mut(&mut self) -> Result<&mut TransformStack, PolicyError> {
        self.gesture.as_mut().ok_or(PolicyError::NotInitialized)
    }

    fn sync_host(&self) {
        if let Some(stack) = &self.gesture {
            let composite = stack.compose();
            self.host.borrow_mut().apply_transform(composite);
        }
    }
}
