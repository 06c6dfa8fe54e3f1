//! Point placement for categorical scatter charts (swarm and jitter).
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Horizontal offsets that keep points from overlapping in a beeswarm.
///
/// Points are placed in ascending value order. Each takes the grid offset
/// (`0, +dx, -dx, +2dx, ...`) closest to the centre line whose marker does not
/// collide with an already placed marker. Two markers collide when their
/// normalised distance `hypot(dx_diff / x_spacing, dy_diff / y_spacing)` is
/// below one. The result is in input order.
pub fn swarm_offsets(values: &[f64], y_spacing: f64, x_spacing: f64) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut offsets = vec![0.0; values.len()];
    if y_spacing <= 0.0 || x_spacing <= 0.0 {
        return offsets;
    }

    // (value, offset) of placed points, ascending by value
    let mut placed: Vec<(f64, f64)> = Vec::with_capacity(values.len());
    for &idx in &order {
        let y = values[idx];
        let neighbours: Vec<(f64, f64)> = placed
            .iter()
            .rev()
            .take_while(|(py, _)| (y - py).abs() < y_spacing)
            .copied()
            .collect();

        let mut chosen = 0.0;
        for step in 0..=(2 * neighbours.len()) {
            let k = ((step + 1) / 2) as f64;
            let candidate = if step % 2 == 1 { k * x_spacing } else { -k * x_spacing };
            let free = neighbours.iter().all(|&(py, px)| {
                let nx = (candidate - px) / x_spacing;
                let ny = (y - py) / y_spacing;
                (nx * nx + ny * ny).sqrt() >= 1.0 - 1e-9
            });
            if free {
                chosen = candidate;
                break;
            }
        }

        offsets[idx] = chosen;
        placed.push((y, chosen));
    }

    offsets
}

/// Shrink offsets proportionally so none exceeds `half_width` in magnitude.
pub fn fit_to_width(offsets: &mut [f64], half_width: f64) {
    let widest = offsets.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    if widest > half_width && widest > 0.0 {
        let factor = half_width / widest;
        for v in offsets.iter_mut() {
            *v *= factor;
        }
    }
}

/// Seeded uniform jitter in `[-width / 2, width / 2)`.
pub fn jitter(n: usize, width: f64, seed: u64) -> Vec<f64> {
    if width <= 0.0 {
        return vec![0.0; n];
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let half = width / 2.0;
    (0..n).map(|_| rng.gen_range(-half..half)).collect()
}
