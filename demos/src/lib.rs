// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared pieces for the Trellis demos.

use kurbo::Affine;
use trellis_transform_policy::TransformHost;

/// A minimal canvas node: the demos' stand-in for a scene-graph host.
pub struct DemoNode {
    /// The node's current transform.
    pub transform: Affine,
}

impl DemoNode {
    /// Creates a node at the identity transform.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transform: Affine::IDENTITY,
        }
    }
}

impl Default for DemoNode {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformHost for DemoNode {
    fn current_transform(&self) -> Affine {
        self.transform
    }

    fn apply_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }
}
