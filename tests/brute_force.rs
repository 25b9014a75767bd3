use std::collections::BTreeMap;

use cell_list::{CellList, CellListConfig};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Uniform random points in `[-extent, extent)` per axis. A zero extent
/// flattens the cloud onto that axis' origin.
fn random_cloud(rng: &mut StdRng, n: usize, extent: [f64; 3]) -> Vec<[f64; 3]> {
    let mut coord = |e: f64| if e > 0.0 { rng.gen_range(-e..e) } else { 0.0 };
    (0..n)
        .map(|_| [coord(extent[0]), coord(extent[1]), coord(extent[2])])
        .collect()
}

fn dist2(p: [f64; 3], q: [f64; 3]) -> f64 {
    (0..3).map(|k| (p[k] - q[k]) * (p[k] - q[k])).sum()
}

/// Every point within `cutoff` of `query`, mapped to its squared distance.
fn brute_force(points: &[[f64; 3]], query: [f64; 3], cutoff: f64) -> BTreeMap<usize, f64> {
    points
        .iter()
        .enumerate()
        .map(|(j, &p)| (j, dist2(query, p)))
        .filter(|&(_, d2)| d2 <= cutoff * cutoff)
        .collect()
}

fn as_map(result: &cell_list::QueryResult) -> BTreeMap<usize, f64> {
    let map: BTreeMap<usize, f64> = result
        .iter()
        .map(|n| (n.index, n.distance_squared))
        .collect();
    assert_eq!(map.len(), result.len(), "duplicate index in result");
    map
}

#[test]
fn index_queries_match_brute_force() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(7);
    for &(n, cutoff, extent) in &[
        (300, 1.0, [5.0, 5.0, 5.0]),
        (500, 2.5, [10.0, 1.0, 4.0]),
        (150, 0.3, [2.0, 2.0, 0.0]),
        (80, 50.0, [3.0, 3.0, 3.0]),
    ] {
        let points = random_cloud(&mut rng, n, extent);
        let cl = CellList::new(&points, cutoff).unwrap();

        for i in 0..points.len() {
            let result = cl.neighbors_for_index(i).unwrap();
            let mut expected = brute_force(&points, points[i], cutoff);
            expected.remove(&i);
            assert_eq!(as_map(&result), expected, "point {} of {}", i, n);

            for neighbor in result.iter() {
                assert_eq!(neighbor.distance, neighbor.distance_squared.sqrt());
            }
        }
    }
}

#[test]
fn position_queries_match_brute_force() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(11);
    let points = random_cloud(&mut rng, 400, [6.0, 6.0, 6.0]);
    let cutoff = 1.7;
    let cl = CellList::new(&points, cutoff).unwrap();

    // Queries reach well outside the bounding box.
    for _ in 0..300 {
        let query = [
            rng.gen_range(-9.0..9.0),
            rng.gen_range(-9.0..9.0),
            rng.gen_range(-9.0..9.0),
        ];
        let result = cl.neighbors_for_position(query);
        assert_eq!(as_map(&result), brute_force(&points, query, cutoff));
    }
}

#[test]
fn position_query_at_a_point_adds_only_itself() {
    let mut rng = StdRng::seed_from_u64(3);
    let points = random_cloud(&mut rng, 200, [4.0, 4.0, 4.0]);
    let cl = CellList::new(&points, 1.2).unwrap();

    for (i, &p) in points.iter().enumerate() {
        let by_index = as_map(&cl.neighbors_for_index(i).unwrap());
        let mut by_position = as_map(&cl.neighbors_for_position(p));
        assert_eq!(by_position.remove(&i), Some(0.0));
        assert_eq!(by_position, by_index);
    }
}

#[test]
fn neighbor_relation_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(5);
    let points = random_cloud(&mut rng, 250, [3.0, 5.0, 2.0]);
    let cl = CellList::new(&points, 1.1).unwrap();
    let all = cl.neighbors_for_all_indices();

    for (i, result) in all.iter().enumerate() {
        for n in result.iter() {
            let back = all[n.index]
                .iter()
                .find(|m| m.index == i)
                .unwrap_or_else(|| panic!("{} lists {} but not the reverse", i, n.index));
            assert!((back.distance - n.distance).abs() < 1e-12);
        }
    }

    let pairs = cl.neighbor_pairs();
    let listed: usize = all.iter().map(|r| r.len()).sum();
    assert_eq!(pairs.len() * 2, listed);
    assert!(pairs.iter().all(|&(i, j, d)| i < j && d <= 1.1 + 1e-12));
}

#[test]
fn capped_grids_stay_exact() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(13);
    let points = random_cloud(&mut rng, 300, [20.0, 20.0, 20.0]);
    let cutoff = 0.9;
    let config = CellListConfig::default().with_max_bins_per_axis(5);
    let cl = CellList::with_config(&points, cutoff, config).unwrap();

    let (nx, ny, nz) = cl.grid_dimensions();
    assert!(nx <= 5 && ny <= 5 && nz <= 5);
    assert!(cl.cell_size().iter().all(|&s| s >= cutoff));

    for (i, &p) in points.iter().enumerate() {
        let mut expected = brute_force(&points, p, cutoff);
        expected.remove(&i);
        assert_eq!(as_map(&cl.neighbors_for_index(i).unwrap()), expected);
    }
}

#[test]
fn parallel_batch_agrees_with_single_queries() {
    let mut rng = StdRng::seed_from_u64(17);
    let points = random_cloud(&mut rng, 1000, [8.0, 8.0, 8.0]);
    let cl = CellList::new(&points, 1.0).unwrap();

    let batch = cl.par_neighbors_for_all_indices();
    assert_eq!(batch.len(), points.len());
    for (i, result) in batch.iter().enumerate() {
        assert_eq!(result, &cl.neighbors_for_index(i).unwrap());
    }
}

#[test]
fn sparse_clouds_fit_the_point_budget_and_stay_exact() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(19);
    let points = random_cloud(&mut rng, 20, [500.0, 500.0, 500.0]);
    let cutoff = 60.0;
    let config = CellListConfig::default().with_max_cells_per_point(2);
    let cl = CellList::with_config(&points, cutoff, config).unwrap();

    let (nx, ny, nz) = cl.grid_dimensions();
    assert!(nx * ny * nz <= 40);
    assert!(cl.cell_size().iter().all(|&s| s >= cutoff));

    for (i, &p) in points.iter().enumerate() {
        let mut expected = brute_force(&points, p, cutoff);
        expected.remove(&i);
        assert_eq!(as_map(&cl.neighbors_for_index(i).unwrap()), expected);
    }
    for _ in 0..200 {
        let query = [
            rng.gen_range(-600.0..600.0),
            rng.gen_range(-600.0..600.0),
            rng.gen_range(-600.0..600.0),
        ];
        assert_eq!(
            as_map(&cl.neighbors_for_position(query)),
            brute_force(&points, query, cutoff)
        );
    }
}
