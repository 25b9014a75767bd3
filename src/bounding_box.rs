use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    point_object::PointObject,
};

/// The minimal axis-aligned box enclosing a set of points.
///
/// An empty set of points produces a zero-width box at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub x_width: f64,
    pub y_width: f64,
    pub z_width: f64,
}

impl BoundingBox {
    /// Computes the box in a single pass over the points.
    ///
    /// Fails if any coordinate is NaN or infinite, since such a point has no
    /// cell to live in.
    pub fn new<T>(points: &[T]) -> Result<Self>
    where
        T: PointObject,
    {
        if points.is_empty() {
            return Ok(BoundingBox {
                min: [0.0; 3],
                x_width: 0.0,
                y_width: 0.0,
                z_width: 0.0,
            });
        }

        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];

        for (row, p) in points.iter().enumerate() {
            let position = p.position();
            if position.iter().any(|c| !c.is_finite()) {
                return Err(Error::InvalidArgument(format!(
                    "point {} has a non-finite coordinate: {:?}",
                    row, position
                )));
            }
            for axis in 0..3 {
                min[axis] = min[axis].min(position[axis]);
                max[axis] = max[axis].max(position[axis]);
            }
        }

        Ok(BoundingBox {
            min,
            x_width: max[0] - min[0],
            y_width: max[1] - min[1],
            z_width: max[2] - min[2],
        })
    }

    pub fn max(&self) -> [f64; 3] {
        [
            self.min[0] + self.x_width,
            self.min[1] + self.y_width,
            self.min[2] + self.z_width,
        ]
    }

    pub fn widths(&self) -> [f64; 3] {
        [self.x_width, self.y_width, self.z_width]
    }
}
