use crate::{
    core::{extent::Extent, geo::Point},
    engine::feature::FeatureId,
};

use rstar::{RTree, RTreeObject, AABB};

/// Envelope of one feature, ordered by insertion so hits can be sorted
/// topmost first
#[derive(Debug, Clone)]
pub struct IndexedFeature {
    pub id: FeatureId,
    pub extent: Extent,
    pub order: u64,
}

impl PartialEq for IndexedFeature {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl RTreeObject for IndexedFeature {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.extent.min.x, self.extent.min.y],
            [self.extent.max.x, self.extent.max.y],
        )
    }
}

/// R-tree of feature envelopes for one vector source
pub struct FeatureIndex {
    rtree: RTree<IndexedFeature>,
}

impl FeatureIndex {
    pub fn new() -> Self {
        Self {
            rtree: RTree::new(),
        }
    }

    pub fn insert(&mut self, id: FeatureId, extent: Extent, order: u64) {
        self.rtree.insert(IndexedFeature { id, extent, order });
    }

    pub fn remove(&mut self, id: FeatureId) -> bool {
        let found = self.rtree.iter().find(|item| item.id == id).cloned();

        match found {
            Some(item) => self.rtree.remove(&item).is_some(),
            None => false,
        }
    }

    /// Candidates whose envelope lies within `tolerance` of `point`,
    /// most recently inserted first
    pub fn candidates(&self, point: Point, tolerance: f64) -> Vec<FeatureId> {
        let envelope = AABB::from_corners(
            [point.x - tolerance, point.y - tolerance],
            [point.x + tolerance, point.y + tolerance],
        );
        let mut hits: Vec<&IndexedFeature> = self
            .rtree
            .locate_in_envelope_intersecting(&envelope)
            .collect();
        hits.sort_by(|a, b| b.order.cmp(&a.order));
        hits.into_iter().map(|item| item.id).collect()
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    pub fn clear(&mut self) {
        self.rtree = RTree::new();
    }
}

impl Default for FeatureIndex {
    fn default() -> Self {
        Self::new()
    }
}
