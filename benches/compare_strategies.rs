use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use route_search::algorithms::best_first::AStar;
use route_search::algorithms::best_first::BestFirstSearch;
use route_search::algorithms::best_first::Greedy;
use route_search::algorithms::best_first::UniformCost;
use route_search::algorithms::depth_first::DepthFirstSearch;
use route_search::geo;
use route_search::geo::LatLon;
use route_search::problems::heuristics::RouteHeuristic;
use route_search::problems::road_network::Miles;
use route_search::problems::road_network::RoadNetwork;
use route_search::problems::route::RouteProblem;

/// A `side` x `side` grid 0.1 degrees apart, roads up to 50% longer than the
/// straight line.
fn grid(side: usize, rng: &mut ChaCha8Rng) -> RoadNetwork {
    let name = |x: usize, y: usize| format!("{x}:{y}");
    let mut network = RoadNetwork::new();
    for x in 0..side {
        for y in 0..side {
            let at = LatLon::new(40.0 + 0.1 * y as f64, -80.0 + 0.1 * x as f64);
            network.add_location(&name(x, y), at).unwrap();
        }
    }
    for x in 0..side {
        for y in 0..side {
            for (nx, ny) in [(x + 1, y), (x, y + 1)] {
                if nx >= side || ny >= side {
                    continue;
                }
                let a = network.coordinates(&name(x, y)).unwrap();
                let b = network.coordinates(&name(nx, ny)).unwrap();
                let miles = geo::great_circle_miles(a, b) * rng.random_range(1.0..1.5);
                network.connect(&name(x, y), &name(nx, ny), miles).unwrap();
            }
        }
    }
    network
}

fn ucs(problem: &RouteProblem) -> Option<Miles> {
    BestFirstSearch::new(problem, UniformCost)
        .search()
        .map(|p| p.cost)
}

fn astar(problem: &RouteProblem) -> Option<Miles> {
    BestFirstSearch::new(problem, AStar(RouteHeuristic::GreatCircle))
        .search()
        .map(|p| p.cost)
}

fn greedy(problem: &RouteProblem) -> Option<Miles> {
    BestFirstSearch::new(problem, Greedy(RouteHeuristic::GreatCircle))
        .search()
        .map(|p| p.cost)
}

fn dfs(problem: &RouteProblem) -> Option<Miles> {
    DepthFirstSearch::new(problem).search().map(|p| p.cost)
}

fn compare_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("Grid Route Search");

    for side in [6, 30] {
        let mut rng = ChaCha8Rng::seed_from_u64(side as u64);
        let network = grid(side, &mut rng);

        for i in 0..3 {
            let instance_name = format!("{side}x{side}:{i}");
            let Some(problem) = RouteProblem::randomize(&network, &mut rng) else {
                continue;
            };

            group.bench_with_input(BenchmarkId::new("UCS", &instance_name), &problem, |b, p| {
                b.iter(|| ucs(p))
            });
            group.bench_with_input(BenchmarkId::new("A*", &instance_name), &problem, |b, p| {
                b.iter(|| astar(p))
            });
            group.bench_with_input(
                BenchmarkId::new("Greedy", &instance_name),
                &problem,
                |b, p| b.iter(|| greedy(p)),
            );
            // Depth-first tree search blows up on larger grids.
            if side <= 6 {
                group.bench_with_input(BenchmarkId::new("DFS", &instance_name), &problem, |b, p| {
                    b.iter(|| dfs(p))
                });
            }
        }
    }
    group.finish();
}

criterion_group!(benches, compare_search);
criterion_main!(benches);
