// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid snapping offsets for drag interactions.
//!
//! Interaction layers that align dragged positions to a grid compute the
//! snap offset for a candidate position and add it to the translation
//! before feeding it into a
//! [`TransformPolicy`](crate::TransformPolicy) (for example via
//! `set_pre_translate`). Snapping is a policy of the interaction, not of
//! the transform engine, so this module is purely functional.

use kurbo::{Point, Vec2};

/// Grid configuration for snapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSettings {
    /// Whether snapping is in effect; when `false`, offsets are zero.
    pub snap_enabled: bool,
    /// Horizontal size of one grid cell.
    pub cell_width: f64,
    /// Vertical size of one grid cell.
    pub cell_height: f64,
}

impl Default for GridSettings {
    /// 10×10 grid cells with snapping disabled.
    fn default() -> Self {
        Self {
            snap_enabled: false,
            cell_width: 10.0,
            cell_height: 10.0,
        }
    }
}

/// Computes the offset to add to `local` so it lands on the nearest grid
/// line.
///
/// `cell_fraction` refines the grid granularity per axis: a fraction of
/// `0.5` snaps to half cells. Points exactly halfway between two grid lines
/// snap downwards. Returns [`Vec2::ZERO`] when snapping is disabled or a
/// step size is not positive.
#[must_use]
pub fn snap_to_grid_offset(grid: &GridSettings, local: Point, cell_fraction: Vec2) -> Vec2 {
    if !grid.snap_enabled {
        return Vec2::ZERO;
    }
    Vec2::new(
        axis_offset(local.x, grid.cell_width * cell_fraction.x),
        axis_offset(local.y, grid.cell_height * cell_fraction.y),
    )
}

fn axis_offset(coord: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return 0.0;
    }
    // Normalize the remainder into [0, step) so negative coordinates snap
    // to their nearest line as well.
    let mut rem = coord % step;
    if rem < 0.0 {
        rem += step;
    }
    if rem > step / 2.0 { step - rem } else { -rem }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridSettings {
        GridSettings {
            snap_enabled: true,
            ..GridSettings::default()
        }
    }

    #[test]
    fn disabled_grid_yields_zero_offset() {
        let offset = snap_to_grid_offset(
            &GridSettings::default(),
            Point::new(12.3, 45.6),
            Vec2::new(1.0, 1.0),
        );
        assert_eq!(offset, Vec2::ZERO);
    }

    #[test]
    fn below_the_half_cell_line_snaps_down() {
        let offset = snap_to_grid_offset(&grid(), Point::new(12.0, 34.0), Vec2::new(1.0, 1.0));
        assert_eq!(offset, Vec2::new(-2.0, -4.0));
    }

    #[test]
    fn above_the_half_cell_line_snaps_up() {
        let offset = snap_to_grid_offset(&grid(), Point::new(17.0, 36.0), Vec2::new(1.0, 1.0));
        assert_eq!(offset, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn on_grid_points_stay_put() {
        let offset = snap_to_grid_offset(&grid(), Point::new(20.0, 0.0), Vec2::new(1.0, 1.0));
        assert_eq!(offset, Vec2::ZERO);
    }

    #[test]
    fn negative_coordinates_snap_to_the_nearest_line() {
        let offset = snap_to_grid_offset(&grid(), Point::new(-3.0, -17.0), Vec2::new(1.0, 1.0));
        // -3 is closest to 0; -17 is closest to -20.
        assert_eq!(offset, Vec2::new(3.0, -3.0));
    }

    #[test]
    fn cell_fractions_refine_the_granularity() {
        let offset = snap_to_grid_offset(&grid(), Point::new(12.0, 12.0), Vec2::new(0.5, 1.0));
        // Half-cell steps on x: 12 is closest to 10; full cells on y.
        assert_eq!(offset, Vec2::new(-2.0, -2.0));
    }

    #[test]
    fn degenerate_step_sizes_are_ignored() {
        let settings = GridSettings {
            snap_enabled: true,
            cell_width: 0.0,
            cell_height: 10.0,
        };
        let offset = snap_to_grid_offset(&settings, Point::new(7.0, 7.0), Vec2::new(1.0, 1.0));
        assert_eq!(offset, Vec2::new(0.0, -3.0));
    }
}
