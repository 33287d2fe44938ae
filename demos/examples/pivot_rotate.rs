// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rotate a node around a pivot by pairing pre- and post-transforms.
//!
//! The pivot-to-origin translation is created last so it takes effect first;
//! the translate-back step is a post-transform so it takes effect last. The
//! rotation handle in between is re-set on every "pointer move", which is
//! how an interaction layer animates a rotation gesture.
//!
//! Run:
//! - `cargo run -p trellis_demos --example pivot_rotate`

use std::cell::RefCell;
use std::f64::consts::FRAC_PI_2;
use std::rc::Rc;

use kurbo::Point;
use trellis_demos::DemoNode;
use trellis_operation::Operation;
use trellis_transform_policy::TransformPolicy;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let node = Rc::new(RefCell::new(DemoNode::new()));
    let mut policy = TransformPolicy::new(Rc::clone(&node));

    policy.init();
    let back = policy.create_post_transform()?;
    let rotate = policy.create_pre_transform()?;
    let to_origin = policy.create_pre_transform()?;

    let pivot = Point::new(50.0, 50.0);
    policy.set_post_translate(back, pivot.x, pivot.y)?;
    policy.set_pre_translate(to_origin, -pivot.x, -pivot.y)?;

    // Sweep the rotation up to a quarter turn; the pivot never moves.
    for step in 1..=4 {
        let theta = FRAC_PI_2 * f64::from(step) / 4.0;
        policy.set_pre_rotate(rotate, theta)?;
        let mapped = node.borrow().transform * pivot;
        let origin = node.borrow().transform * Point::ZERO;
        println!(
            "theta = {theta:.3} rad: pivot stays at ({:.1}, {:.1}), origin maps to ({:.1}, {:.1})",
            mapped.x, mapped.y, origin.x, origin.y
        );
    }

    let mut operation = policy.commit()?;
    operation.undo()?;
    println!("undone: node back at {:?}", node.borrow().transform);
    Ok(())
}
