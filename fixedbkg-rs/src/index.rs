//! Spatial index over background events.
//!
//! Nearest-neighbour queries answer the fixed-counts radius question directly:
//! the k-th item of a nearest-neighbour walk from the source centre is the
//! k-th smallest distance, without sorting the whole event list.

use rstar::{RTree, primitives::GeomWithData};

type IndexedEvent = GeomWithData<[f64; 2], usize>;

/// R*-tree over event coordinates, built once and shared read-only across
/// sources.
///
/// # Example
///
/// ```rust
/// use fixedbkg_rs::EventIndex;
///
/// let events = vec![(110.0, 100.0), (100.0, 120.0), (70.0, 100.0)];
/// let index = EventIndex::build(&events);
///
/// assert_eq!(index.kth_nearest_distance(100.0, 100.0, 2), Some(20.0));
/// assert_eq!(index.count_within(100.0, 100.0, 20.0), 2);
/// ```
pub struct EventIndex {
    rtree: RTree<IndexedEvent>,
    event_count: usize,
}

impl EventIndex {
    /// Build the index with bulk loading, O(n log n)
    pub fn build(events: &[(f64, f64)]) -> Self {
        let points: Vec<IndexedEvent> = events
            .iter()
            .enumerate()
            .map(|(idx, &(x, y))| GeomWithData::new([x, y], idx))
            .collect();

        Self {
            rtree: RTree::bulk_load(points),
            event_count: events.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.event_count
    }

    pub fn is_empty(&self) -> bool {
        self.event_count == 0
    }

    /// Distances from `(x, y)` to every event, ascending
    pub fn nearest_distances(&self, x: f64, y: f64) -> impl Iterator<Item = f64> + '_ {
        self.rtree
            .nearest_neighbor_iter(&[x, y])
            .map(move |event| {
                let [ex, ey] = *event.geom();
                f64::hypot(ex - x, ey - y)
            })
    }

    /// Distance of the k-th nearest event (1-based), `None` if `k` is zero or
    /// exceeds the number of events
    pub fn kth_nearest_distance(&self, x: f64, y: f64, k: usize) -> Option<f64> {
        if k == 0 {
            return None;
        }
        self.nearest_distances(x, y).nth(k - 1)
    }

    /// Distance of the farthest event, `None` for an empty index
    pub fn farthest_distance(&self, x: f64, y: f64) -> Option<f64> {
        self.rtree
            .iter()
            .map(|event| {
                let [ex, ey] = *event.geom();
                f64::hypot(ex - x, ey - y)
            })
            .reduce(f64::max)
    }

    /// Number of events in the closed disc of `radius` around `(x, y)`
    pub fn count_within(&self, x: f64, y: f64, radius: f64) -> usize {
        self.nearest_distances(x, y)
            .take_while(|&distance| distance <= radius)
            .count()
    }
}
