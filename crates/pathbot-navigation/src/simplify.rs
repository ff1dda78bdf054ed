//! Minimum-spacing filter that thins a dense grid path into sparse waypoints.

use crate::map::WorldPoint;

/// Thins `path` so that consecutive waypoints are more than `min_spacing`
/// apart.
///
/// Paths of two points or fewer are returned unchanged. Otherwise the first
/// point is kept, each interior point is kept only if it lies more than
/// `min_spacing` from the last kept point, and the final point is always kept
/// so the goal survives exactly. Only the final pair may be closer than
/// `min_spacing`.
pub fn simplify(path: &[WorldPoint], min_spacing: f64) -> Vec<WorldPoint> {
    let [first, interior @ .., last] = path else {
        return path.to_vec();
    };
    if interior.is_empty() {
        return path.to_vec();
    }

    let mut simplified = vec![*first];
    let mut anchor = *first;
    for point in interior {
        if anchor.distance(point) > min_spacing {
            simplified.push(*point);
            anchor = *point;
        }
    }
    simplified.push(*last);
    simplified
}
