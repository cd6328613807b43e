//! Point cloud with a reorderable search space

use ::core::cmp::Ordering;

use nalgebra::{Point3, RealField, Scalar};

// ============================================================================
// Point Cloud
// ============================================================================

/// Labeled 3D points with a reorderable search space.
///
/// Points are appended to a backing store that only ever grows (until
/// [`clear`](PointCloud::clear)) and are identified by their insertion index.
/// All queries operate on the *search space*, an index view over the store:
/// sorting reorders the view, retaining narrows it, and neither touches the
/// stored points. [`reset_search_space`](PointCloud::reset_search_space)
/// restores the full store in insertion order, so one container serves many
/// queries per frame without copying point data.
///
/// Sorting is stable: points that compare equal keep their insertion order.
///
/// # Type Parameters
///
/// - `T`: The scalar type of point coordinates
/// - `V`: The value attached to each point (a label, a feature descriptor, ...)
///
/// # Example
///
/// ```
/// use fiducia::spatial::PointCloud;
/// use nalgebra::Point3;
///
/// let mut cloud: PointCloud<f64, &str> = PointCloud::new();
/// cloud.push(Point3::new(0.0, 0.0, 0.0), "near");
/// cloud.push(Point3::new(90.0, 0.0, 0.0), "far");
/// cloud.push(Point3::new(2.0, 0.0, 0.0), "close");
///
/// let origin = Point3::new(0.0, 0.0, 0.0);
/// cloud.retain_within(&origin, 10.0);
/// cloud.sort_by_distance(&origin);
///
/// let labels: Vec<&str> = cloud.iter().map(|(_, v)| *v).collect();
/// assert_eq!(labels, vec!["near", "close"]);
/// ```
#[derive(Debug, Clone)]
pub struct PointCloud<T: Scalar, V> {
    items: Vec<(Point3<T>, V)>,
    search_space: Vec<usize>,
}

impl<T: Scalar, V> PointCloud<T, V> {
    /// Creates an empty point cloud.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            search_space: Vec::new(),
        }
    }

    /// Creates an empty point cloud with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            search_space: Vec::with_capacity(capacity),
        }
    }

    /// Appends a point to the backing store and to the end of the current
    /// search space. Returns the insertion index, which stays valid until
    /// [`clear`](PointCloud::clear).
    pub fn push(&mut self, point: Point3<T>, value: V) -> usize {
        let index = self.items.len();
        self.items.push((point, value));
        self.search_space.push(index);
        index
    }

    /// Returns the stored entry at an insertion index, regardless of whether
    /// the current search space still contains it.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&(Point3<T>, V)> {
        self.items.get(index)
    }

    /// Number of points in the current search space.
    #[inline]
    pub fn len(&self) -> usize {
        self.search_space.len()
    }

    /// Whether the current search space is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.search_space.is_empty()
    }

    /// Number of points in the backing store.
    #[inline]
    pub fn total_len(&self) -> usize {
        self.items.len()
    }

    /// Insertion indices of the current search space, in view order.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.search_space
    }

    /// Restores the search space to the full backing store in insertion order.
    pub fn reset_search_space(&mut self) {
        self.search_space.clear();
        self.search_space.extend(0..self.items.len());
    }

    /// Removes all points and empties the search space.
    pub fn clear(&mut self) {
        self.items.clear();
        self.search_space.clear();
    }

    /// Sorts the search space by a comparison on the stored entries.
    ///
    /// The sort is stable, so entries that compare equal keep their insertion
    /// order. The backing store is not touched.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&(Point3<T>, V), &(Point3<T>, V)) -> Ordering,
    {
        let items = &self.items;
        self.search_space
            .sort_by(|&a, &b| compare(&items[a], &items[b]));
    }

    /// Keeps only the search space entries for which the predicate holds,
    /// preserving their current order. The backing store is not touched.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&(Point3<T>, V)) -> bool,
    {
        let items = &self.items;
        self.search_space.retain(|&index| keep(&items[index]));
    }

    /// Iterates over the current search space in view order.
    pub fn iter(&self) -> impl Iterator<Item = &(Point3<T>, V)> + '_ {
        self.search_space.iter().map(|&index| &self.items[index])
    }
}

impl<T: Scalar, V> Default for PointCloud<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Distance Queries
// ============================================================================

impl<T: RealField + Copy, V> PointCloud<T, V> {
    /// Sorts the search space nearest-first with respect to a reference point.
    ///
    /// Equidistant points keep their insertion order.
    pub fn sort_by_distance(&mut self, reference: &Point3<T>) {
        self.sort_by(|(a, _), (b, _)| {
            let da = (a - reference).norm();
            let db = (b - reference).norm();
            da.partial_cmp(&db).unwrap_or(Ordering::Equal)
        });
    }

    /// Narrows the search space to points within `radius` of a reference
    /// point. The boundary is inclusive: a point exactly at `radius` stays.
    pub fn retain_within(&mut self, reference: &Point3<T>, radius: T) {
        self.retain(|(point, _)| (point - reference).norm() <= radius);
    }
}
