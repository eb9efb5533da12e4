use std::collections::HashMap;

use meshpath::{
    BakedGrid, Connectivity, GridBake, Heuristic, IndexedHeap, Mesh, NodeId, NodeState, Path,
    PathError, Pathfinder, SearchConfig,
};
use meshpath_core::{Point, Range};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

/// Cheapest cost from `start` to every reachable node, by plain relaxation
/// until nothing changes.
fn reference_costs(mesh: &Mesh<Point>, start: NodeId) -> HashMap<NodeId, u32> {
    let mut dist = HashMap::new();
    dist.insert(start, 0u32);
    let mut changed = true;
    while changed {
        changed = false;
        for (id, node) in mesh.nodes() {
            let Some(&d) = dist.get(&id) else {
                continue;
            };
            if id != start && !node.is_available() {
                continue;
            }
            for &n in node.neighbours() {
                if !mesh.node(n).unwrap().is_available() {
                    continue;
                }
                let nd = d + mesh.cost_to_node(id, n).unwrap();
                if dist.get(&n).is_none_or(|&old| nd < old) {
                    dist.insert(n, nd);
                    changed = true;
                }
            }
        }
    }
    dist
}

fn assert_valid_path(mesh: &Mesh<Point>, path: &Path, start: NodeId, goal: NodeId) {
    assert_eq!(path.start(), Some(start));
    assert_eq!(path.destination(), Some(goal));
    let mut sum = 0;
    for w in path.nodes().windows(2) {
        assert!(mesh.node(w[0]).unwrap().has_neighbour(w[1]));
        assert!(mesh.node(w[1]).unwrap().is_available());
        sum += mesh.cost_to_node(w[0], w[1]).unwrap();
    }
    assert_eq!(sum, path.cost());
}

fn random_grid(rng: &mut StdRng, connectivity: Connectivity, weighted: bool) -> BakedGrid {
    let w = rng.random_range(2..9);
    let h = rng.random_range(2..9);
    let walls: Vec<bool> = (0..w * h).map(|_| rng.random_range(0..100) < 25).collect();
    let costs: Vec<u32> = (0..w * h)
        .map(|_| if weighted { rng.random_range(0..6) } else { 0 })
        .collect();
    let range = Range::new(0, 0, w, h);
    GridBake::new(range).connectivity(connectivity).bake_weighted(
        |p| !walls[range.index_of(p).unwrap()],
        |p| costs[range.index_of(p).unwrap()],
    )
}

fn check_optimal(rng: &mut StdRng, finder: &mut Pathfinder, grid: &BakedGrid) {
    let mesh = grid.mesh();
    let ids: Vec<NodeId> = mesh.ids().collect();
    for _ in 0..8 {
        let start = ids[rng.random_range(0..ids.len())];
        let goal = ids[rng.random_range(0..ids.len())];
        let result = finder.find_path(mesh, start, goal);
        if start == goal {
            assert_eq!(result, Err(PathError::SameNode(start)));
            continue;
        }
        let expected = reference_costs(mesh, start);
        match (result, expected.get(&goal)) {
            (Ok(path), Some(&best)) => {
                assert_eq!(path.cost(), best, "suboptimal path {start} -> {goal}");
                assert_valid_path(mesh, &path, start, goal);
            }
            (Err(PathError::NoPath { .. }), None) => {}
            (got, want) => panic!("{start} -> {goal}: got {got:?}, reference {want:?}"),
        }
    }
}

#[test]
fn distance_heuristic_finds_optimal_paths_on_weighted_grids() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut finder =
        Pathfinder::with_config(SearchConfig::default().with_heuristic(Heuristic::Distance));
    for round in 0..60 {
        let conn = if round % 2 == 0 {
            Connectivity::Four
        } else {
            Connectivity::Eight
        };
        let grid = random_grid(&mut rng, conn, true);
        check_optimal(&mut rng, &mut finder, &grid);
    }
}

#[test]
fn default_heuristic_finds_optimal_paths_on_uniform_grids() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut finder = Pathfinder::new();
    for _ in 0..60 {
        let grid = random_grid(&mut rng, Connectivity::Four, false);
        check_optimal(&mut rng, &mut finder, &grid);
    }
}

#[test]
fn heap_keeps_minimum_at_root_under_mixed_operations() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut heap: IndexedHeap<usize, u32> = IndexedHeap::new();
    let mut model: HashMap<usize, u32> = HashMap::new();

    for _ in 0..4000 {
        match rng.random_range(0..4) {
            0 | 1 => {
                let key = rng.random_range(0..64usize);
                let p = rng.random_range(0..1000u32);
                let res = heap.insert(key, p);
                if model.contains_key(&key) {
                    assert!(res.is_err());
                } else {
                    assert!(res.is_ok());
                    model.insert(key, p);
                }
            }
            2 => match heap.extract_min() {
                Ok((key, p)) => {
                    let min = *model.values().min().unwrap();
                    assert_eq!(p, min);
                    assert_eq!(model.remove(&key), Some(p));
                }
                Err(_) => assert!(model.is_empty()),
            },
            _ => {
                let key = rng.random_range(0..64usize);
                let p = rng.random_range(0..1000u32);
                let res = heap.resift(key, p);
                if let Some(old) = model.get_mut(&key) {
                    assert!(res.is_ok());
                    *old = p;
                } else {
                    assert!(res.is_err());
                }
            }
        }
        assert!(heap.check_invariant());
        assert_eq!(heap.len(), model.len());
        if let Some((_, &p)) = heap.peek() {
            assert_eq!(Some(&p), model.values().min());
        }
        for (&key, p) in model.iter() {
            assert!(heap.contains(key));
            assert_eq!(heap.priority(key), Some(p));
        }
    }
}

#[test]
fn random_mutation_never_leaves_dangling_neighbours() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut mesh = Mesh::dynamic(2);
    let mut live: Vec<NodeId> = Vec::new();
    let mut removed: Vec<NodeId> = Vec::new();

    for _ in 0..600 {
        if live.is_empty() || rng.random_range(0..100) < 60 {
            let p = Point::new(rng.random_range(0..12), rng.random_range(0..12));
            let id = if !live.is_empty() && rng.random_range(0..100) < 30 {
                let extra = live[rng.random_range(0..live.len())];
                mesh.add_node_with(p, &[extra]).unwrap()
            } else {
                mesh.add_node(p)
            };
            live.push(id);
        } else {
            let id = live.swap_remove(rng.random_range(0..live.len()));
            mesh.remove_node(id).unwrap();
            removed.push(id);
        }

        assert_eq!(mesh.size(), live.len());
        for (id, node) in mesh.nodes() {
            for &n in node.neighbours() {
                assert!(mesh.contains_node(n), "{id} keeps removed neighbour {n}");
                assert!(mesh.node(n).unwrap().has_neighbour(id));
            }
        }
    }
    for id in removed {
        assert!(!mesh.contains_node(id));
    }
}

#[test]
fn searches_agree_after_dynamic_edits() {
    let mut rng = StdRng::seed_from_u64(21);
    let mut mesh = Mesh::dynamic(1);
    let mut ids: Vec<NodeId> = Range::new(0, 0, 8, 8)
        .iter()
        .map(|p| mesh.add_node(p))
        .collect();
    let mut finder = Pathfinder::new();

    for _ in 0..30 {
        let victim = ids.swap_remove(rng.random_range(0..ids.len()));
        mesh.remove_node(victim).unwrap();

        let start = ids[rng.random_range(0..ids.len())];
        let goal = ids[rng.random_range(0..ids.len())];
        if start == goal {
            continue;
        }
        let expected = reference_costs(&mesh, start).get(&goal).copied();
        match finder.find_path(&mesh, start, goal) {
            Ok(path) => {
                assert_eq!(Some(path.cost()), expected);
                assert!(path.nodes().iter().all(|&n| mesh.contains_node(n)));
            }
            Err(err) => {
                assert!(matches!(err, PathError::NoPath { .. }));
                assert_eq!(expected, None);
            }
        }
    }
}

#[test]
fn reset_after_search_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(13);
    let grid = random_grid(&mut rng, Connectivity::Eight, true);
    let mesh = grid.mesh();
    let ids: Vec<NodeId> = mesh.ids().collect();
    let mut finder = Pathfinder::new();
    let _ = finder.find_path(mesh, ids[0], ids[ids.len() - 1]);

    let mut scratch = finder.scratch().clone();
    for _ in 0..2 {
        mesh.reset_nodes(&mut scratch);
        for &id in &ids {
            assert_eq!(scratch.f_cost(id), 0);
            assert_eq!(scratch.parent(id), None);
            assert_eq!(scratch.state(id), NodeState::Unvisited);
        }
    }
}
