// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_transform_stack --heading-base-level=0

//! Trellis Transform Stack: ordered pre/post affine transforms around a base transform.
//!
//! When composing transformations, the order of concatenation is easy to get
//! wrong: the transform concatenated last takes effect first. Rotating a node
//! around a pivot point, for example, is three steps in effect order (move
//! the pivot to the origin, rotate, move back), but the matrices have to be
//! concatenated in the opposite order. [`TransformStack`] keeps this
//! bookkeeping explicit by managing two ordered lists around a fixed base
//! transform:
//!
//! - **Pre-transforms** are concatenated after the base. They manipulate the
//!   coordinate system before the node is transformed; the most recently
//!   created pre-transform takes effect first.
//! - **Post-transforms** are concatenated before the base, in reverse
//!   creation order. They manipulate the already-transformed node; the most
//!   recently created post-transform takes effect last.
//!
//! The composite produced by [`TransformStack::compose`] is
//!
//! ```text
//!   --> --> -->   direction of concatenation   --> --> -->
//!
//!   post list            base            pre list
//!   n-1, ..., 0                          0, 1, ..., m-1
//!
//!   <-- <-- <--     direction of effect      <-- <-- <--
//! ```
//!
//! Creating a transform with [`TransformStack::create_pre_transform`] or
//! [`TransformStack::create_post_transform`] appends an identity entry and
//! returns a handle. Handles are append-only indices; entries are never
//! removed individually, only cleared en masse by
//! [`TransformStack::set_transform`] and [`TransformStack::reset`].
//!
//! ## Pivot rotation example
//!
//! ```rust
//! use kurbo::{Affine, Point};
//! use trellis_transform_stack::TransformStack;
//!
//! let mut stack = TransformStack::new(Affine::IDENTITY);
//!
//! // Concatenate in reverse effect order: translate back first, rotate,
//! // then translate the pivot to the origin last (so it takes effect first).
//! let back = stack.create_pre_transform();
//! let rotate = stack.create_pre_transform();
//! let to_origin = stack.create_pre_transform();
//!
//! let pivot = Point::new(30.0, 40.0);
//! stack.set_pre_translate(back, pivot.x, pivot.y)?;
//! stack.set_pre_rotate(rotate, 0.5)?;
//! stack.set_pre_translate(to_origin, -pivot.x, -pivot.y)?;
//!
//! let composite = stack.compose();
//! let expected = Affine::rotate_about(0.5, pivot);
//! assert!((composite.as_coeffs()[4] - expected.as_coeffs()[4]).abs() < 1e-9);
//! # Ok::<(), trellis_transform_stack::StackError>(())
//! ```
//!
//! This crate does not own the node being transformed. A controller layer
//! reads [`TransformStack::compose`] after each change and pushes the result
//! wherever it needs to go.
//!
//! This crate is `no_std`.

#![no_std]

use core::fmt;

use kurbo::Affine;
use smallvec::SmallVec;

/// Identifies one of the two transform lists of a [`TransformStack`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformList {
    /// The list concatenated after the base transform.
    Pre,
    /// The list concatenated before the base transform.
    Post,
}

impl fmt::Display for TransformList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pre => f.write_str("pre"),
            Self::Post => f.write_str("post"),
        }
    }
}

/// Handle to an entry in the pre-transform list.
///
/// Returned by [`TransformStack::create_pre_transform`] and accepted by the
/// `set_pre_*` methods of the same stack. A handle stays valid until the
/// lists are cleared ([`TransformStack::set_transform`] or
/// [`TransformStack::reset`]); using it afterwards yields
/// [`StackError::OutOfRange`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreHandle(usize);

impl PreHandle {
    /// The position of this entry in the pre-transform list.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to an entry in the post-transform list.
///
/// See [`PreHandle`] for validity rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PostHandle(usize);

impl PostHandle {
    /// The position of this entry in the post-transform list.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Errors reported by [`TransformStack`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    /// A handle referred to an entry beyond the current list bounds.
    ///
    /// This indicates a stale handle (the lists were cleared since it was
    /// created) or a handle belonging to a different stack.
    #[error("no {list} transform at index {index} (list holds {len})")]
    OutOfRange {
        /// The list the handle referred to.
        list: TransformList,
        /// The out-of-range index.
        index: usize,
        /// The list length at the time of the failed access.
        len: usize,
    },
}

/// Ordered pre/post transform lists around an immutable base transform.
///
/// The base is captured at construction and never mutated; it is the
/// transform the manipulated node had before the interaction began.
/// [`compose`](Self::compose) combines the lists and the base into a single
/// [`Affine`] as described in the crate documentation.
#[derive(Clone, Debug)]
pub struct TransformStack {
    base: Affine,
    pre: SmallVec<[Affine; 2]>,
    post: SmallVec<[Affine; 2]>,
    /// Set by `set_transform`; shadows composition until the next handle
    /// creation or mutation.
    absolute: Option<Affine>,
}

impl TransformStack {
    /// Creates a stack around the given base transform with empty lists.
    #[must_use]
    pub fn new(base: Affine) -> Self {
        Self {
            base,
            pre: SmallVec::new(),
            post: SmallVec::new(),
            absolute: None,
        }
    }

    /// Returns the base transform captured at construction.
    #[must_use]
    pub fn base(&self) -> Affine {
        self.base
    }

    /// Returns the number of pre-transforms.
    #[must_use]
    pub fn pre_len(&self) -> usize {
        self.pre.len()
    }

    /// Returns the number of post-transforms.
    #[must_use]
    pub fn post_len(&self) -> usize {
        self.post.len()
    }

    /// Appends an identity transform to the pre-transform list.
    ///
    /// The new entry is concatenated last among the pre-transforms and will
    /// therefore take effect first.
    pub fn create_pre_transform(&mut self) -> PreHandle {
        self.absolute = None;
        self.pre.push(Affine::IDENTITY);
        PreHandle(self.pre.len() - 1)
    }

    /// Appends an identity transform to the post-transform list.
    ///
    /// The new entry is concatenated first among the post-transforms and
    /// will therefore take effect last.
    pub fn create_post_transform(&mut self) -> PostHandle {
        self.absolute = None;
        self.post.push(Affine::IDENTITY);
        PostHandle(self.post.len() - 1)
    }

    /// Sets the identified pre-transform to a translation by `(tx, ty)`.
    pub fn set_pre_translate(
        &mut self,
        handle: PreHandle,
        tx: f64,
        ty: f64,
    ) -> Result<(), StackError> {
        self.set_pre_transform(handle, Affine::translate((tx, ty)))
    }

    /// Sets the identified pre-transform to a scaling by `(sx, sy)`.
    ///
    /// Zero factors are accepted; the stack composes degenerate transforms
    /// like any other.
    pub fn set_pre_scale(&mut self, handle: PreHandle, sx: f64, sy: f64) -> Result<(), StackError> {
        self.set_pre_transform(handle, Affine::scale_non_uniform(sx, sy))
    }

    /// Sets the identified pre-transform to a counter-clockwise rotation.
    pub fn set_pre_rotate(&mut self, handle: PreHandle, radians: f64) -> Result<(), StackError> {
        self.set_pre_transform(handle, Affine::rotate(radians))
    }

    /// Replaces the identified pre-transform with the given matrix.
    pub fn set_pre_transform(
        &mut self,
        handle: PreHandle,
        transform: Affine,
    ) -> Result<(), StackError> {
        let len = self.pre.len();
        let slot = self.pre.get_mut(handle.0).ok_or(StackError::OutOfRange {
            list: TransformList::Pre,
            index: handle.0,
            len,
        })?;
        *slot = transform;
        self.absolute = None;
        Ok(())
    }

    /// Sets the identified post-transform to a translation by `(tx, ty)`.
    pub fn set_post_translate(
        &mut self,
        handle: PostHandle,
        tx: f64,
        ty: f64,
    ) -> Result<(), StackError> {
        self.set_post_transform(handle, Affine::translate((tx, ty)))
    }

    /// Sets the identified post-transform to a scaling by `(sx, sy)`.
    pub fn set_post_scale(
        &mut self,
        handle: PostHandle,
        sx: f64,
        sy: f64,
    ) -> Result<(), StackError> {
        self.set_post_transform(handle, Affine::scale_non_uniform(sx, sy))
    }

    /// Sets the identified post-transform to a counter-clockwise rotation.
    pub fn set_post_rotate(&mut self, handle: PostHandle, radians: f64) -> Result<(), StackError> {
        self.set_post_transform(handle, Affine::rotate(radians))
    }

    /// Replaces the identified post-transform with the given matrix.
    pub fn set_post_transform(
        &mut self,
        handle: PostHandle,
        transform: Affine,
    ) -> Result<(), StackError> {
        let len = self.post.len();
        let slot = self.post.get_mut(handle.0).ok_or(StackError::OutOfRange {
            list: TransformList::Post,
            index: handle.0,
            len,
        })?;
        *slot = transform;
        self.absolute = None;
        Ok(())
    }

    /// Clears both lists and sets the composite directly to `transform`.
    ///
    /// Used for absolute repositioning, for example snapping a node to an
    /// exact position. Handles created before this call are invalidated.
    /// The recorded matrix shadows composition only until the next handle
    /// creation or mutation, after which [`compose`](Self::compose) resumes
    /// from the base transform.
    pub fn set_transform(&mut self, transform: Affine) {
        self.pre.clear();
        self.post.clear();
        self.absolute = Some(transform);
    }

    /// Composes the lists and the base into a single transform.
    ///
    /// Post-transforms are concatenated in reverse creation order, then the
    /// base, then the pre-transforms in creation order:
    ///
    /// ```text
    ///   --> --> -->   direction of concatenation   --> --> -->
    ///
    ///   post list            base            pre list
    ///   n-1, ..., 0                          0, 1, ..., m-1
    ///
    ///   <-- <-- <--     direction of effect      <-- <-- <--
    /// ```
    ///
    /// The asymmetry is deliberate: reversing either loop silently breaks
    /// compound manipulations such as pivot rotation. Pure function of the
    /// current state; repeated calls without mutation are bit-identical.
    #[must_use]
    pub fn compose(&self) -> Affine {
        if let Some(absolute) = self.absolute {
            return absolute;
        }
        let mut composite = Affine::IDENTITY;
        for post in self.post.iter().rev() {
            composite *= *post;
        }
        composite *= self.base;
        for pre in &self.pre {
            composite *= *pre;
        }
        composite
    }

    /// Clears both lists and any absolute override, keeping the base.
    pub fn reset(&mut self) {
        self.pre.clear();
        self.post.clear();
        self.absolute = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn assert_affine_near(a: Affine, b: Affine) {
        let ca = a.as_coeffs();
        let cb = b.as_coeffs();
        for i in 0..6 {
            assert!(
                (ca[i] - cb[i]).abs() < 1e-9,
                "coefficient {i} differs: {ca:?} vs {cb:?}"
            );
        }
    }

    /// Tiny deterministic generator for randomized composition checks.
    struct Lcg(u64);

    impl Lcg {
        fn next_f64(&mut self) -> f64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            // Map the top bits into [-2, 2).
            ((self.0 >> 11) as f64 / (1_u64 << 53) as f64) * 4.0 - 2.0
        }

        fn next_affine(&mut self) -> Affine {
            Affine::new([
                self.next_f64(),
                self.next_f64(),
                self.next_f64(),
                self.next_f64(),
                self.next_f64() * 50.0,
                self.next_f64() * 50.0,
            ])
        }
    }

    #[test]
    fn new_stack_composes_to_base() {
        let base = Affine::translate((3.0, -7.0)) * Affine::rotate(0.25);
        let stack = TransformStack::new(base);
        assert_eq!(stack.compose(), base);
        assert_eq!(stack.pre_len(), 0);
        assert_eq!(stack.post_len(), 0);
    }

    #[test]
    fn pre_transforms_concatenate_in_creation_order() {
        let base = Affine::scale(2.0);
        let mut stack = TransformStack::new(base);
        let a = stack.create_pre_transform();
        let b = stack.create_pre_transform();
        stack.set_pre_translate(a, 10.0, 0.0).unwrap();
        stack.set_pre_scale(b, 3.0, 3.0).unwrap();

        // base · A · B: the later-created pre-transform sits rightmost.
        let expected = base * Affine::translate((10.0, 0.0)) * Affine::scale(3.0);
        assert_affine_near(stack.compose(), expected);
    }

    #[test]
    fn post_transforms_concatenate_in_reverse_creation_order() {
        let base = Affine::scale(2.0);
        let mut stack = TransformStack::new(base);
        let a = stack.create_post_transform();
        let b = stack.create_post_transform();
        stack.set_post_translate(a, 10.0, 0.0).unwrap();
        stack.set_post_scale(b, 3.0, 3.0).unwrap();

        // B · A · base: the later-created post-transform sits leftmost.
        let expected = Affine::scale(3.0) * Affine::translate((10.0, 0.0)) * base;
        assert_affine_near(stack.compose(), expected);
    }

    #[test]
    fn pivot_rotation_via_pre_transforms() {
        let mut stack = TransformStack::new(Affine::IDENTITY);
        let back = stack.create_pre_transform();
        let rotate = stack.create_pre_transform();
        let to_origin = stack.create_pre_transform();

        let pivot = Point::new(30.0, 40.0);
        let theta = core::f64::consts::FRAC_PI_3;
        stack.set_pre_translate(back, pivot.x, pivot.y).unwrap();
        stack.set_pre_rotate(rotate, theta).unwrap();
        stack.set_pre_translate(to_origin, -pivot.x, -pivot.y).unwrap();

        assert_affine_near(stack.compose(), Affine::rotate_about(theta, pivot));
        // The pivot itself stays fixed.
        let mapped = stack.compose() * pivot;
        assert!((mapped - pivot).hypot() < 1e-9);
    }

    #[test]
    fn pivot_rotation_via_mixed_pre_and_post() {
        // Same composite built with the translate-back step as a
        // post-transform instead: T(p) · base · R · T(-p).
        let mut stack = TransformStack::new(Affine::IDENTITY);
        let back = stack.create_post_transform();
        let rotate = stack.create_pre_transform();
        let to_origin = stack.create_pre_transform();

        let pivot = Point::new(5.0, -2.0);
        let theta = 1.1;
        stack.set_post_translate(back, pivot.x, pivot.y).unwrap();
        stack.set_pre_rotate(rotate, theta).unwrap();
        stack.set_pre_translate(to_origin, -pivot.x, -pivot.y).unwrap();

        assert_affine_near(stack.compose(), Affine::rotate_about(theta, pivot));
    }

    #[test]
    fn compose_matches_direct_matrix_product() {
        let mut rng = Lcg(0x5eed);
        for _ in 0..64 {
            let base = rng.next_affine();
            let mut stack = TransformStack::new(base);
            let mut pre = SmallVec::<[Affine; 2]>::new();
            let mut post = SmallVec::<[Affine; 2]>::new();
            for _ in 0..3 {
                let t = rng.next_affine();
                let h = stack.create_pre_transform();
                stack.set_pre_transform(h, t).unwrap();
                pre.push(t);
            }
            for _ in 0..3 {
                let t = rng.next_affine();
                let h = stack.create_post_transform();
                stack.set_post_transform(h, t).unwrap();
                post.push(t);
            }

            let mut expected = post[2] * post[1] * post[0];
            expected *= base;
            expected = expected * pre[0] * pre[1] * pre[2];
            assert_affine_near(stack.compose(), expected);
        }
    }

    #[test]
    fn compose_is_idempotent() {
        let mut stack = TransformStack::new(Affine::rotate(0.3));
        let h = stack.create_pre_transform();
        stack.set_pre_translate(h, 1.5, 2.5).unwrap();
        let first = stack.compose().as_coeffs();
        let second = stack.compose().as_coeffs();
        assert_eq!(first, second);
    }

    #[test]
    fn mutating_a_handle_replaces_the_entry() {
        let mut stack = TransformStack::new(Affine::IDENTITY);
        let h = stack.create_pre_transform();
        stack.set_pre_translate(h, 100.0, 100.0).unwrap();
        stack.set_pre_translate(h, 1.0, 2.0).unwrap();
        assert_affine_near(stack.compose(), Affine::translate((1.0, 2.0)));
    }

    #[test]
    fn out_of_range_handle_fails_and_leaves_stack_unchanged() {
        let mut stack = TransformStack::new(Affine::IDENTITY);
        let h = stack.create_pre_transform();
        stack.set_pre_translate(h, 4.0, 4.0).unwrap();
        let before = stack.compose();

        let stale = PreHandle(7);
        let err = stack.set_pre_translate(stale, 9.0, 9.0).unwrap_err();
        assert_eq!(
            err,
            StackError::OutOfRange {
                list: TransformList::Pre,
                index: 7,
                len: 1,
            }
        );
        assert_eq!(stack.compose(), before);

        let err = stack.set_post_scale(PostHandle(0), 2.0, 2.0).unwrap_err();
        assert_eq!(
            err,
            StackError::OutOfRange {
                list: TransformList::Post,
                index: 0,
                len: 0,
            }
        );
    }

    #[test]
    fn set_transform_overrides_composition_and_clears_lists() {
        let mut stack = TransformStack::new(Affine::scale(4.0));
        let h = stack.create_pre_transform();
        stack.set_pre_translate(h, 1.0, 1.0).unwrap();

        let absolute = Affine::translate((123.0, -45.0));
        stack.set_transform(absolute);
        assert_eq!(stack.compose(), absolute);
        assert_eq!(stack.pre_len(), 0);
        assert_eq!(stack.post_len(), 0);
        // Base survives absolute repositioning.
        assert_eq!(stack.base(), Affine::scale(4.0));
    }

    #[test]
    fn handles_are_invalidated_by_set_transform() {
        let mut stack = TransformStack::new(Affine::IDENTITY);
        let h = stack.create_pre_transform();
        stack.set_transform(Affine::translate((1.0, 1.0)));
        assert!(stack.set_pre_translate(h, 2.0, 2.0).is_err());
    }

    #[test]
    fn override_is_dropped_by_the_next_handle_operation() {
        let base = Affine::scale(2.0);
        let mut stack = TransformStack::new(base);
        stack.set_transform(Affine::translate((50.0, 50.0)));

        // Composition resumes from the base, not from the override.
        let h = stack.create_pre_transform();
        stack.set_pre_translate(h, 3.0, 0.0).unwrap();
        assert_affine_near(stack.compose(), base * Affine::translate((3.0, 0.0)));
    }

    #[test]
    fn reset_clears_lists_and_override() {
        let base = Affine::rotate(1.0);
        let mut stack = TransformStack::new(base);
        let h = stack.create_pre_transform();
        stack.set_pre_scale(h, 2.0, 2.0).unwrap();
        stack.set_transform(Affine::translate((9.0, 9.0)));

        stack.reset();
        assert_eq!(stack.pre_len(), 0);
        assert_eq!(stack.post_len(), 0);
        assert_eq!(stack.compose(), base);
    }

    #[test]
    fn zero_scale_transforms_are_permitted() {
        let mut stack = TransformStack::new(Affine::IDENTITY);
        let h = stack.create_pre_transform();
        stack.set_pre_scale(h, 0.0, 0.0).unwrap();
        let composite = stack.compose();
        assert_eq!(composite.determinant(), 0.0);
    }
}
