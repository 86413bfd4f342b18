pub const NEIGHBOR_COUNT: usize = 5;

fn distance_sq(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

/// Indices of the `count` points closest to `reference`, nearest first.
///
/// The reference itself is excluded; equal distances keep index order.
pub fn nearest_neighbors(positions: &[[f64; 2]], reference: usize, count: usize) -> Vec<usize> {
    let Some(&origin) = positions.get(reference) else {
        return Vec::new();
    };

    let mut ranked = positions
        .iter()
        .enumerate()
        .filter(|&(index, _)| index != reference)
        .map(|(index, &position)| (distance_sq(origin, position), index))
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    ranked
        .into_iter()
        .take(count)
        .map(|(_distance, index)| index)
        .collect()
}
