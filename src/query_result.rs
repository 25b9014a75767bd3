use itertools::{izip, Itertools};
use serde::{Deserialize, Serialize};

/// The points found within the cutoff of one query.
///
/// The three vectors are index-aligned: `distances[k]` and
/// `distances_squared[k]` belong to the point `indices[k]`. Entries appear in
/// the order the query visited them, not sorted by distance.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct QueryResult {
    pub indices: Vec<usize>,
    pub distances: Vec<f64>,
    pub distances_squared: Vec<f64>,
}

/// One entry of a [`QueryResult`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
    pub distance_squared: f64,
}

impl QueryResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, index: usize, distance_squared: f64) {
        self.indices.push(index);
        self.distances.push(distance_squared.sqrt());
        self.distances_squared.push(distance_squared);
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Neighbor> + '_ {
        izip!(&self.indices, &self.distances, &self.distances_squared).map(
            |(&index, &distance, &distance_squared)| Neighbor {
                index,
                distance,
                distance_squared,
            },
        )
    }

    /// Reorders the entries by increasing distance, breaking ties by index.
    pub fn sort_by_distance(&mut self) {
        let sorted = self
            .iter()
            .sorted_by(|a, b| {
                a.distance_squared
                    .total_cmp(&b.distance_squared)
                    .then(a.index.cmp(&b.index))
            })
            .collect_vec();
        *self = sorted.into_iter().collect();
    }
}

impl FromIterator<Neighbor> for QueryResult {
    fn from_iter<I: IntoIterator<Item = Neighbor>>(iter: I) -> Self {
        let mut result = QueryResult::new();
        for n in iter {
            result.indices.push(n.index);
            result.distances.push(n.distance);
            result.distances_squared.push(n.distance_squared);
        }
        result
    }
}
