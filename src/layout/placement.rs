use super::ranking::RankedGraph;

/// Cross-axis centres for every entry of `graph.buckets`, dummies included.
///
/// Each rank is placed at the mean of its already placed neighbours, then
/// pushed apart left to right so neighbours keep `spacing` between their
/// extents. Bucket order is never changed here. Sweeps run down then up
/// twice, so parents end up centred over their children.
pub(super) fn assign_cross_positions(
    graph: &RankedGraph,
    real_extent: f32,
    spacing: f32,
) -> Vec<f32> {
    let total = graph
        .buckets
        .iter()
        .flatten()
        .copied()
        .max()
        .map_or(0, |max| max + 1);
    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); total];
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); total];
    for &(from, to) in &graph.edges {
        outgoing[from].push(to);
        incoming[to].push(from);
    }

    let half = |idx: usize| {
        if graph.is_dummy(idx) {
            0.0
        } else {
            real_extent / 2.0
        }
    };

    let mut centers: Vec<Option<f32>> = vec![None; total];
    let place_rank = |bucket: &[usize], neighbors: &[Vec<usize>], centers: &mut [Option<f32>]| {
        if bucket.is_empty() {
            return;
        }
        let desired: Vec<f32> = bucket
            .iter()
            .map(|&idx| {
                let placed: Vec<f32> = neighbors[idx].iter().filter_map(|n| centers[*n]).collect();
                if placed.is_empty() {
                    centers[idx].unwrap_or(0.0)
                } else {
                    placed.iter().sum::<f32>() / placed.len() as f32
                }
            })
            .collect();

        let mut assigned: Vec<f32> = Vec::with_capacity(bucket.len());
        for (pos, &idx) in bucket.iter().enumerate() {
            let center = match pos.checked_sub(1) {
                Some(prev_pos) => {
                    let prev = assigned[prev_pos];
                    let min_center = prev + half(bucket[prev_pos]) + half(idx) + spacing;
                    desired[pos].max(min_center)
                }
                None => desired[pos],
            };
            assigned.push(center);
        }

        let desired_mean = desired.iter().sum::<f32>() / desired.len() as f32;
        let actual_mean = assigned.iter().sum::<f32>() / assigned.len() as f32;
        let delta = desired_mean - actual_mean;
        for (&idx, center) in bucket.iter().zip(assigned) {
            centers[idx] = Some(center + delta);
        }
    };

    for _ in 0..2 {
        for bucket in &graph.buckets {
            place_rank(bucket, &incoming, &mut centers);
        }
        for bucket in graph.buckets.iter().rev() {
            place_rank(bucket, &outgoing, &mut centers);
        }
    }

    centers.into_iter().map(|center| center.unwrap_or(0.0)).collect()
}
