use crate::clusterer::Point;

pub fn squared_euclidean(a: &Point, b: &Point) -> f64 {
    let dlat = a.lat - b.lat;
    let dlng = a.lng - b.lng;
    dlat * dlat + dlng * dlng
}

pub fn euclidean(a: &Point, b: &Point) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// Index of the centroid closest to `point`.
///
/// Ties go to the lowest index, so the result only depends on the order of
/// `centroids`. Returns `None` when `centroids` is empty.
pub fn nearest<'a, I>(point: &Point, centroids: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Point>,
{
    let mut best: Option<(usize, f64)> = None;

    for (idx, center) in centroids.into_iter().enumerate() {
        let dist = squared_euclidean(point, center);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((idx, dist)),
        }
    }

    best.map(|(idx, _)| idx)
}
