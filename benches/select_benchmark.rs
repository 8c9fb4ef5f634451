// ========================================================================================
//
//                  CATCHMENT LAZY-GREEDY SELECTION BENCHMARK
//
// ========================================================================================
//
// Measures the selection loop over synthetic coverage networks at a few sizes,
// comparing the lazy-greedy loop against an eager variant that rebuilds the
// priority list before every take. The gap between the two is the entire point
// of the lazy refresh: on realistic densities the lazy loop touches a handful
// of tail entries per pick where the eager one rescans every node.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use catchment::network::Network;
use catchment::select::select_top_k;

/// The number of picks to extract in every scenario.
const PICK_COUNT: usize = 50;
/// Average out-degree of the synthetic coverage graphs.
const MEAN_DEGREE: usize = 12;
/// Network sizes to sweep. The largest is in the range of a national tract set.
const NODE_COUNTS: [usize; 3] = [1_000, 10_000, 50_000];

/// Builds a reproducible synthetic network with uniformly random benefits and
/// uniformly random directed coverage edges.
fn build_network(node_count: usize) -> Network {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let ids: Vec<String> = (0..node_count).map(|i| format!("T{i:06}")).collect();

    let mut net = Network::new();
    for id in &ids {
        net.add_node(id, rng.gen_range(0.0..10_000.0));
    }
    for id in &ids {
        let degree = rng.gen_range(0..=MEAN_DEGREE * 2);
        let neighbors: Vec<String> = (0..degree)
            .map(|_| ids[rng.gen_range(0..node_count)].clone())
            .collect();
        net.add_neighbors(id, &neighbors);
    }
    net
}

/// The eager baseline: a full re-sort of every entry before each take.
fn eager_select_top_k(network: &mut Network, k: usize) -> usize {
    let mut picked = 0;
    for _ in 0..k {
        network.initial_sort();
        match network.peek_total() {
            Some(total) if total > 0.0 => {}
            _ => break,
        }
        if network.take().is_none() {
            break;
        }
        picked += 1;
    }
    picked
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_k_selection");

    for &node_count in &NODE_COUNTS {
        let net = build_network(node_count);
        group.throughput(Throughput::Elements(PICK_COUNT as u64));

        group.bench_with_input(
            BenchmarkId::new("lazy", node_count),
            &net,
            |b, net| {
                b.iter(|| {
                    let mut net = net.clone();
                    black_box(select_top_k(&mut net, PICK_COUNT))
                })
            },
        );

        // The eager baseline is quadratic; skip it at the largest size so the
        // suite stays runnable.
        if node_count <= 10_000 {
            group.bench_with_input(
                BenchmarkId::new("eager", node_count),
                &net,
                |b, net| {
                    b.iter(|| {
                        let mut net = net.clone();
                        black_box(eager_select_top_k(&mut net, PICK_COUNT))
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_selection);
criterion_main!(benches);
