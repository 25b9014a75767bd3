//! Fixed-radius neighbor search over 3-dimensional point clouds.
//!
//! A [`CellList`] buckets points into a uniform grid of cells whose sides are
//! at least as long as the cutoff, so every neighbor of a query lies in the
//! 3×3×3 block of cells around it.

mod bounding_box;
mod cell_list;
mod config;
mod error;
mod offset3;
pub mod point_object;
mod query_result;

pub use crate::bounding_box::BoundingBox;
pub use crate::cell_list::CellList;
pub use crate::config::CellListConfig;
pub use crate::error::{Error, Result};
pub use crate::point_object::PointObject;
pub use crate::query_result::{Neighbor, QueryResult};
