use crate::clusterer::Point;

/// Mean coordinate of `points`; `None` for an empty slice
pub fn compute_centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }

    let mut lat = 0.0;
    let mut lng = 0.0;

    for p in points {
        lat += p.lat;
        lng += p.lng;
    }

    let n = points.len() as f64;
    Some(Point::new(lat / n, lng / n))
}
