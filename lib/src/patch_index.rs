//! Nearest neighbor search over the neighborhoods of one exemplar level.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::errors::PatchIndexError;
use crate::neighborhood::{Neighborhood, DIMENSIONS};
use crate::Error;

impl rstar::Point for Neighborhood {
    type Scalar = f32;
    const DIMENSIONS: usize = DIMENSIONS;

    fn generate(generator: impl Fn(usize) -> Self::Scalar) -> Self {
        let mut n = Self::default();
        for i in 0..DIMENSIONS {
            *n.component_mut(i) = generator(i);
        }
        n
    }

    #[inline]
    fn nth(&self, index: usize) -> Self::Scalar {
        self.component(index)
    }

    #[inline]
    fn nth_mut(&mut self, index: usize) -> &mut Self::Scalar {
        self.component_mut(index)
    }
}

// a neighborhood tagged with its position in the level's dataset
struct IndexedNeighborhood {
    neighborhood: Neighborhood,
    index: u32,
}

impl RTreeObject for IndexedNeighborhood {
    type Envelope = AABB<Neighborhood>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.neighborhood)
    }
}

impl PointDistance for IndexedNeighborhood {
    #[inline]
    fn distance_2(&self, point: &Neighborhood) -> f32 {
        self.neighborhood.distance_sq(point)
    }
}

/// An R*-tree over every neighborhood of an exemplar level, answering
/// k-nearest queries in feature space.
pub(crate) struct PatchIndex {
    tree: RTree<IndexedNeighborhood>,
}

impl PatchIndex {
    pub(crate) fn build(level: u32, dataset: &[Neighborhood]) -> Result<Self, Error> {
        if dataset.is_empty() {
            return Err(Error::PatchIndex(PatchIndexError {
                level,
                reason: "the level has no neighborhoods",
            }));
        }

        if !dataset.iter().all(Neighborhood::is_finite) {
            return Err(Error::PatchIndex(PatchIndexError {
                level,
                reason: "the level contains non-finite colors",
            }));
        }

        // Inserting one by one keeps the tree balanced, bulk loading degrades
        // to a flat node list with this many dimensions
        let mut tree = RTree::new();
        for (index, neighborhood) in dataset.iter().enumerate() {
            tree.insert(IndexedNeighborhood {
                neighborhood: *neighborhood,
                index: index as u32,
            });
        }

        Ok(Self { tree })
    }

    /// Fills `result` with the dataset indices of (up to) the `k` closest
    /// neighborhoods to `query`, closest first.
    pub(crate) fn k_nearest(&self, query: &Neighborhood, k: usize, result: &mut Vec<u32>) {
        result.clear();
        result.extend(
            self.tree
                .nearest_neighbor_iter(query)
                .take(k)
                .map(|item| item.index),
        );
    }

    pub(crate) fn len(&self) -> usize {
        self.tree.size()
    }
}
