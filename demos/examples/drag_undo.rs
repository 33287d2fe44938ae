// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag a node with grid snapping, then replay the gesture through undo/redo.
//!
//! One press-drag-release cycle is one gesture: the policy captures the
//! node's transform on press, keeps the node following the pointer during
//! the drag, and turns the whole gesture into a single reversible operation
//! on release.
//!
//! Run:
//! - `cargo run -p trellis_demos --example drag_undo`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Affine, Vec2};
use trellis_demos::DemoNode;
use trellis_operation::Operation;
use trellis_transform_policy::TransformPolicy;
use trellis_transform_policy::snap::{GridSettings, snap_to_grid_offset};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let node = Rc::new(RefCell::new(DemoNode::new()));
    let mut policy = TransformPolicy::new(Rc::clone(&node));

    let grid = GridSettings {
        snap_enabled: true,
        ..GridSettings::default()
    };

    // Press: capture the node's transform as the gesture base.
    policy.init();
    let drag = policy.create_pre_transform()?;

    // Drag through a few pointer offsets; each one snaps to the grid and
    // previews live on the node.
    for offset in [
        Vec2::new(13.0, 4.0),
        Vec2::new(27.0, 16.0),
        Vec2::new(42.0, 33.0),
    ] {
        let snap = snap_to_grid_offset(&grid, offset.to_point(), Vec2::new(1.0, 1.0));
        let snapped = offset + snap;
        policy.set_pre_translate(drag, snapped.x, snapped.y)?;
        println!(
            "drag by ({:>4.1}, {:>4.1}) -> node at {:?}",
            offset.x,
            offset.y,
            node.borrow().transform.translation()
        );
    }

    // Release: the whole gesture becomes one operation for the history.
    let mut operation = policy.commit()?;
    println!("committed \"{}\"", operation.label());

    operation.undo()?;
    assert_eq!(node.borrow().transform, Affine::IDENTITY);
    println!("after undo: node at {:?}", node.borrow().transform.translation());

    operation.redo()?;
    println!("after redo: node at {:?}", node.borrow().transform.translation());
    Ok(())
}
