use itertools::Itertools;
use log::{debug, warn};
use rayon::prelude::*;

use crate::{
    bounding_box::BoundingBox,
    config::CellListConfig,
    error::{Error, Result},
    offset3::Offset3,
    point_object::PointObject,
    query_result::QueryResult,
};

/// A cell list is a 3-dimensional grid of box-shaped cells that covers the
/// bounding box of a set of points. Each cell is a container for the points
/// that are positioned inside the space covered by the cell.
///
/// Every cell is at least as wide as the cutoff on each axis, so all points
/// within the cutoff of a query lie in the 3×3×3 block of cells around the
/// query's own cell.
///
/// The points are borrowed for the lifetime of the cell list and are never
/// modified. Once built, the cell list is immutable and can be queried from
/// many threads at once.
pub struct CellList<'a, T>
where
    T: PointObject,
{
    points: &'a [T],

    /// A flat vector that contains one element for each cell in the
    /// 3-dimensional grid. Each element contains the points that are bucketed
    /// into that cell, as a tuple of the point's position and the point's
    /// index in `points`.
    cell_point_positions: Vec<Vec<([f64; 3], usize)>>,

    bounding_box: BoundingBox,

    /// The width in space that is covered by each cell along each axis.
    cell_size: [f64; 3],

    /// The number of cells in each dimension of the grid.
    grid_dimensions: (usize, usize, usize),

    cutoff: f64,
    cutoff_squared: f64,
}

impl<'a> CellList<'a, [f64; 3]> {
    /// Builds a cell list over an interleaved `x0 y0 z0 x1 y1 z1 ...` buffer.
    ///
    /// The buffer length must be a multiple of 3.
    pub fn from_flat(coords: &'a [f64], cutoff: f64) -> Result<Self> {
        let points: &'a [[f64; 3]] = bytemuck::try_cast_slice(coords).map_err(|_| {
            Error::InvalidArgument(format!(
                "coordinate buffer of length {} is not an N×3 array",
                coords.len()
            ))
        })?;
        Self::new(points, cutoff)
    }
}

impl<'a, T> CellList<'a, T>
where
    T: PointObject,
{
    pub fn new(points: &'a [T], cutoff: f64) -> Result<Self> {
        Self::with_config(points, cutoff, CellListConfig::default())
    }

    pub fn with_config(points: &'a [T], cutoff: f64, config: CellListConfig) -> Result<Self> {
        if !(cutoff.is_finite() && cutoff > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "cutoff must be a positive finite number, got {}",
                cutoff
            )));
        }
        config.validate()?;

        let bb = BoundingBox::new(points)?;

        let widths = bb.widths();
        let mut cell_size = [cutoff; 3];
        let mut dims = [1usize; 3];
        for axis in 0..3 {
            // Cells grow past the cutoff only when the axis would otherwise
            // need more than `max_bins_per_axis` of them.
            cell_size[axis] = cutoff
                .max(widths[axis] / config.max_bins_per_axis as f64)
                .max(f64::MIN_POSITIVE);
            dims[axis] = ((widths[axis] / cell_size[axis]).ceil() as usize)
                .clamp(1, config.max_bins_per_axis);
        }

        // Coarsen the axis with the most cells, one cell at a time, until the
        // grid fits the budget for this many points. Cell sides only grow, and
        // `dims * cell_size` keeps covering the box.
        let budget = config.cell_budget(points.len());
        while dims.iter().product::<usize>() > budget {
            let axis = if dims[0] >= dims[1] && dims[0] >= dims[2] {
                0
            } else if dims[1] >= dims[2] {
                1
            } else {
                2
            };
            let target = dims[axis] - 1;
            cell_size[axis] = cell_size[axis].max(widths[axis] / target as f64 * (1.0 + 1e-9));
            dims[axis] = ((widths[axis] / cell_size[axis]).ceil() as usize).clamp(1, target);
        }
        let grid_dimensions = (dims[0], dims[1], dims[2]);

        if cell_size.iter().any(|&s| s > cutoff) {
            warn!(
                "Cell size {:?} inflated beyond cutoff {} to fit {} bins per axis and {} cells in total",
                cell_size, cutoff, config.max_bins_per_axis, budget
            );
        }

        let cell_count = grid_dimensions.0 * grid_dimensions.1 * grid_dimensions.2;
        let cell_indices = points
            .iter()
            .map(|p| {
                point_into_offset(p.position(), bb.min, cell_size)
                    .clamp_to_grid(grid_dimensions)
                    .into_grid_index1(grid_dimensions)
            })
            .collect_vec();

        let mut cell_point_counts: Vec<usize> = vec![0; cell_count];
        for &cell_index in cell_indices.iter().flatten() {
            cell_point_counts[cell_index] += 1;
        }

        // Pre-allocate the necessary space for the vector in each cell so that the
        // vectors don't need to get re-allocated as new points are added.
        let mut cell_point_positions = cell_point_counts
            .iter()
            .map(|&count| Vec::with_capacity(count))
            .collect_vec();

        for (point_index, (point, cell_index)) in points.iter().zip(&cell_indices).enumerate() {
            if let Some(cell_index) = *cell_index {
                cell_point_positions[cell_index].push((point.position(), point_index));
            }
        }

        debug!(
            "Built cell list over {} points: {}x{}x{} cells of size {:?}",
            points.len(),
            grid_dimensions.0,
            grid_dimensions.1,
            grid_dimensions.2,
            cell_size
        );

        Ok(Self {
            points,
            cell_point_positions,
            bounding_box: bb,
            cell_size,
            grid_dimensions,
            cutoff,
            cutoff_squared: cutoff * cutoff,
        })
    }

    /// Finds every point within the cutoff of the point at `index`, excluding
    /// that point itself.
    ///
    /// Other points at exactly the same position are still reported, with a
    /// distance of zero. Fails with [`Error::OutOfRange`] if `index` does not
    /// name one of the points, including negative indices of signed types.
    pub fn neighbors_for_index<I>(&self, index: I) -> Result<QueryResult>
    where
        I: TryInto<usize> + Copy + std::fmt::Display,
    {
        let i = index
            .try_into()
            .ok()
            .filter(|&i| i < self.points.len())
            .ok_or_else(|| Error::OutOfRange {
                index: index.to_string(),
                len: self.points.len(),
            })?;
        Ok(self.query(self.points[i].position(), Some(i)))
    }

    /// Finds every point within the cutoff of an arbitrary position.
    ///
    /// Distances are inclusive: a point exactly `cutoff` away is reported.
    /// Positions outside the bounding box, and even non-finite positions, are
    /// accepted and simply produce fewer (or no) matches.
    pub fn neighbors_for_position(&self, position: [f64; 3]) -> QueryResult {
        self.query(position, None)
    }

    /// Runs [`neighbors_for_index`](Self::neighbors_for_index) for every
    /// point, in index order.
    pub fn neighbors_for_all_indices(&self) -> Vec<QueryResult> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| self.query(p.position(), Some(i)))
            .collect()
    }

    /// Parallel version of
    /// [`neighbors_for_all_indices`](Self::neighbors_for_all_indices).
    pub fn par_neighbors_for_all_indices(&self) -> Vec<QueryResult>
    where
        T: Sync,
    {
        self.points
            .par_iter()
            .enumerate()
            .map(|(i, p)| self.query(p.position(), Some(i)))
            .collect()
    }

    /// Returns every unordered pair of distinct points `(i, j)` with `i < j`
    /// that lie within the cutoff of each other, along with their distance.
    ///
    /// Pairs are ordered by `i`, then by discovery order of `j`.
    pub fn neighbor_pairs(&self) -> Vec<(usize, usize, f64)> {
        self.neighbors_for_all_indices()
            .into_iter()
            .enumerate()
            .flat_map(|(i, result)| {
                result
                    .iter()
                    .filter(move |n| n.index > i)
                    .map(move |n| (i, n.index, n.distance))
                    .collect_vec()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn positions(&self) -> &'a [T] {
        self.points
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn cell_size(&self) -> [f64; 3] {
        self.cell_size
    }

    pub fn grid_dimensions(&self) -> (usize, usize, usize) {
        self.grid_dimensions
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Returns the indices of the points bucketed into the cell at
    /// `(ix, iy, iz)`, or an empty list if there is no such cell.
    pub fn bin_indices(&self, ix: usize, iy: usize, iz: usize) -> Vec<usize> {
        Offset3::new(ix as i64, iy as i64, iz as i64)
            .into_grid_index1(self.grid_dimensions)
            .map(|i| self.cell_point_positions[i].iter().map(|&(_, idx)| idx).collect())
            .unwrap_or_default()
    }

    /// Collects the points within the cutoff of `query_point` from the block
    /// of cells around the query's cell. `skip` names a point index to leave
    /// out of the result.
    fn query(&self, query_point: [f64; 3], skip: Option<usize>) -> QueryResult {
        let center = point_into_offset(query_point, self.bounding_box.min, self.cell_size)
            .clamp_to_grid(self.grid_dimensions);

        let mut result = QueryResult::new();
        for cell_index in center.neighborhood_index1s(self.grid_dimensions) {
            for &(position, point_index) in &self.cell_point_positions[cell_index] {
                if Some(point_index) == skip {
                    continue;
                }
                let d2 = dist2(query_point, position);
                if d2 <= self.cutoff_squared {
                    result.push(point_index, d2);
                }
            }
        }
        result
    }
}

/// Returns the 3-dimensional offset of the cell in which the point would be
/// bucketed, relative to the cell at `min_point`.
///
/// The offset may refer to a "cell" outside the grid if the point lies outside
/// the bounding box. Non-finite coordinates saturate to the extreme offsets.
fn point_into_offset(point: [f64; 3], min_point: [f64; 3], cell_size: [f64; 3]) -> Offset3 {
    let x = ((point[0] - min_point[0]) / cell_size[0]).floor() as i64;
    let y = ((point[1] - min_point[1]) / cell_size[1]).floor() as i64;
    let z = ((point[2] - min_point[2]) / cell_size[2]).floor() as i64;
    Offset3::new(x, y, z)
}

fn dist2(p: [f64; 3], q: [f64; 3]) -> f64 {
    let x = q[0] - p[0];
    let y = q[1] - p[1];
    let z = q[2] - p[2];
    x * x + y * y + z * z
}
