use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Longest-path ranks over a fresh index arena.
///
/// Nodes are identified by their declaration index, which is also the tie
/// breaker whenever several nodes become ready at once. Edges that close a
/// cycle are ignored for ranking.
pub(super) fn compute_ranks(node_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut indeg: Vec<usize> = vec![0; node_count];
    for &(from, to) in edges {
        adj[from].push(to);
        indeg[to] += 1;
    }

    let mut ready: BinaryHeap<Reverse<usize>> = BinaryHeap::new();
    for (idx, deg) in indeg.iter().enumerate() {
        if *deg == 0 {
            ready.push(Reverse(idx));
        }
    }

    let mut order = Vec::with_capacity(node_count);
    let mut processed = vec![false; node_count];
    loop {
        while let Some(Reverse(idx)) = ready.pop() {
            if processed[idx] {
                continue;
            }
            order.push(idx);
            processed[idx] = true;
            for &next in &adj[idx] {
                if processed[next] {
                    continue;
                }
                indeg[next] = indeg[next].saturating_sub(1);
                if indeg[next] == 0 {
                    ready.push(Reverse(next));
                }
            }
        }

        if order.len() >= node_count {
            break;
        }

        // Cycle: the earliest unprocessed node becomes the next source and
        // its incoming edges are treated as back-edges.
        match processed.iter().position(|done| !done) {
            Some(idx) => ready.push(Reverse(idx)),
            None => break,
        }
    }

    let mut order_index = vec![0usize; node_count];
    for (pos, &idx) in order.iter().enumerate() {
        order_index[idx] = pos;
    }

    let mut ranks = vec![0usize; node_count];
    for &node in &order {
        for &next in &adj[node] {
            if order_index[next] <= order_index[node] {
                continue;
            }
            ranks[next] = ranks[next].max(ranks[node] + 1);
        }
    }
    ranks
}

/// Rank buckets plus the edge list rewritten so every edge spans exactly one
/// rank. Indices at or above `node_count` are dummy nodes on long edges.
pub(super) struct RankedGraph {
    pub node_count: usize,
    pub buckets: Vec<Vec<usize>>,
    pub edges: Vec<(usize, usize)>,
}

impl RankedGraph {
    pub fn is_dummy(&self, idx: usize) -> bool {
        idx >= self.node_count
    }
}

pub(super) fn build_rank_buckets(
    node_count: usize,
    edges: &[(usize, usize)],
    ranks: &[usize],
) -> RankedGraph {
    let max_rank = ranks.iter().copied().max().unwrap_or(0);
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); max_rank + 1];
    for (idx, rank) in ranks.iter().enumerate() {
        buckets[*rank].push(idx);
    }

    let mut expanded = Vec::with_capacity(edges.len());
    let mut next_dummy = node_count;
    for &(from, to) in edges {
        let (from_rank, to_rank) = (ranks[from], ranks[to]);
        if to_rank <= from_rank {
            continue;
        }
        let mut prev = from;
        for rank in (from_rank + 1)..to_rank {
            let dummy = next_dummy;
            next_dummy += 1;
            buckets[rank].push(dummy);
            expanded.push((prev, dummy));
            prev = dummy;
        }
        expanded.push((prev, to));
    }

    RankedGraph {
        node_count,
        buckets,
        edges: expanded,
    }
}

/// Barycentric-median sweeps, keeping the ordering with the fewest
/// crossings seen. Ties keep the current order, so untouched ranks stay in
/// declaration order.
pub(super) fn order_rank_nodes(graph: &mut RankedGraph, passes: usize) {
    if graph.buckets.len() <= 1 {
        return;
    }
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

    let mut positions = vec![0usize; total];
    update_positions(&graph.buckets, &mut positions);

    let mut best = graph.buckets.clone();
    let mut best_crossings = count_crossings(&graph.buckets, &graph.edges, &positions);

    for _ in 0..passes.max(1) {
        if best_crossings == 0 {
            break;
        }
        for rank in 1..graph.buckets.len() {
            sort_bucket(&mut graph.buckets[rank], &incoming, &positions);
            update_positions(&graph.buckets, &mut positions);
        }
        for rank in (0..graph.buckets.len() - 1).rev() {
            sort_bucket(&mut graph.buckets[rank], &outgoing, &positions);
            update_positions(&graph.buckets, &mut positions);
        }
        let crossings = count_crossings(&graph.buckets, &graph.edges, &positions);
        if crossings < best_crossings {
            best_crossings = crossings;
            best = graph.buckets.clone();
        }
    }

    graph.buckets = best;
}

fn update_positions(buckets: &[Vec<usize>], positions: &mut [usize]) {
    for bucket in buckets {
        for (pos, &idx) in bucket.iter().enumerate() {
            positions[idx] = pos;
        }
    }
}

fn sort_bucket(bucket: &mut [usize], neighbors: &[Vec<usize>], positions: &[usize]) {
    if bucket.len() <= 1 {
        return;
    }
    let mut keyed: Vec<(f32, usize, usize)> = bucket
        .iter()
        .enumerate()
        .map(|(current, &idx)| (median_position(idx, current, neighbors, positions), current, idx))
        .collect();
    keyed.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });
    for (slot, (_, _, idx)) in bucket.iter_mut().zip(keyed) {
        *slot = idx;
    }
}

pub(super) fn median_position(
    idx: usize,
    current: usize,
    neighbors: &[Vec<usize>],
    positions: &[usize],
) -> f32 {
    let mut values: Vec<f32> = neighbors[idx]
        .iter()
        .map(|neighbor| positions[*neighbor] as f32)
        .collect();
    if values.is_empty() {
        return current as f32;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) * 0.5
    }
}

/// Crossings between adjacent ranks, counted pairwise.
pub(super) fn count_crossings(
    buckets: &[Vec<usize>],
    edges: &[(usize, usize)],
    positions: &[usize],
) -> usize {
    let mut rank_of = vec![0usize; positions.len()];
    for (rank, bucket) in buckets.iter().enumerate() {
        for &idx in bucket {
            rank_of[idx] = rank;
        }
    }
    let mut by_rank: Vec<Vec<(usize, usize)>> = vec![Vec::new(); buckets.len()];
    for &(from, to) in edges {
        by_rank[rank_of[from]].push((positions[from], positions[to]));
    }
    let mut crossings = 0;
    for layer in &by_rank {
        for (i, a) in layer.iter().enumerate() {
            for b in &layer[i + 1..] {
                if (a.0 < b.0 && a.1 > b.1) || (a.0 > b.0 && a.1 < b.1) {
                    crossings += 1;
                }
            }
        }
    }
    crossings
}
