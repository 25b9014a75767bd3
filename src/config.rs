use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tuning knobs for building a [`CellList`](crate::CellList).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CellListConfig {
    /// Upper bound on the number of cells along each axis.
    ///
    /// When the bounding box is more than this many cutoffs wide, the cell
    /// side on that axis grows to `width / max_bins_per_axis`. Cells never
    /// shrink below the cutoff, so this trades larger candidate sets for a
    /// smaller grid.
    pub max_bins_per_axis: usize,

    /// Upper bound on the total number of cells, per input point.
    ///
    /// A sparse cloud spread over a large box would otherwise allocate far
    /// more cells than it has points. When the grid exceeds
    /// `max(1, points * max_cells_per_point)` cells, the busiest axis is
    /// coarsened until it fits.
    pub max_cells_per_point: usize,
}

impl CellListConfig {
    pub const DEFAULT_MAX_BINS_PER_AXIS: usize = 100;
    pub const DEFAULT_MAX_CELLS_PER_POINT: usize = 8;

    pub fn with_max_bins_per_axis(mut self, max_bins_per_axis: usize) -> Self {
        self.max_bins_per_axis = max_bins_per_axis;
        self
    }

    pub fn with_max_cells_per_point(mut self, max_cells_per_point: usize) -> Self {
        self.max_cells_per_point = max_cells_per_point;
        self
    }

    /// The largest grid allowed for `point_count` points.
    pub(crate) fn cell_budget(&self, point_count: usize) -> usize {
        point_count.saturating_mul(self.max_cells_per_point).max(1)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_bins_per_axis == 0 {
            return Err(Error::InvalidArgument(
                "max_bins_per_axis must be at least 1".to_string(),
            ));
        }
        if self.max_cells_per_point == 0 {
            return Err(Error::InvalidArgument(
                "max_cells_per_point must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CellListConfig {
    fn default() -> Self {
        Self {
            max_bins_per_axis: Self::DEFAULT_MAX_BINS_PER_AXIS,
            max_cells_per_point: Self::DEFAULT_MAX_CELLS_PER_POINT,
        }
    }
}
