//! Integration tests for frontier-bfs
//!
//! Drives the level step the way an orchestrator does: hand-built partitions,
//! round-by-round buffer reuse, and full multi-unit runs.

use frontier_bfs::{
    bfs_levels, ComputeUnit, CsrGraph, CsrPartition, FrontierBitset, GlobalNodeId, KernelConfig,
    KernelError, LevelContext, LevelSyncBfs, LockStrategy, UNREACHED,
};

fn set(bits: &FrontierBitset) -> Vec<u32> {
    bits.iter_ones().map(|n| n.0).collect()
}

fn frontier(words: usize, nodes: &[u32]) -> FrontierBitset {
    let mut bits = FrontierBitset::with_words(words);
    for &n in nodes {
        bits.insert(GlobalNodeId(n));
    }
    bits
}

#[test]
fn test_four_node_scenario_two_rounds() {
    // 0 → 1, 0 → 2, 1 → 2, 2 → 3
    let partition =
        CsrPartition::from_raw_parts(vec![0, 2, 3, 4, 4], vec![1, 2, 2, 3]).unwrap();
    let mut unit = ComputeUnit::new(KernelConfig::default().with_lanes(1), 1).unwrap();

    let mut visited = FrontierBitset::with_words(1);
    let mut next = FrontierBitset::with_words(1);
    let mut levels = vec![UNREACHED; 4];

    // Round 1: frontier {0}, level 0
    let current = frontier(1, &[0]);
    unit.level_step(LevelContext {
        partition: &partition,
        current: &current,
        visited: &mut visited,
        next: &mut next,
        levels: &mut levels,
        level: 0,
    })
    .unwrap();

    assert_eq!(levels[0], 0);
    assert_eq!(set(&next), vec![1, 2]);
    assert!(visited.is_empty(), "rotate folded an empty prior frontier");

    // Round 2: frontier {1, 2}, level 1
    let current = next.clone();
    unit.level_step(LevelContext {
        partition: &partition,
        current: &current,
        visited: &mut visited,
        next: &mut next,
        levels: &mut levels,
        level: 1,
    })
    .unwrap();

    assert_eq!(levels, vec![0, 1, 1, UNREACHED]);
    assert_eq!(set(&next), vec![3]);
    // Round 1's discoveries were rotated in
    assert_eq!(set(&visited), vec![1, 2]);
}

#[test]
fn test_empty_frontier_is_termination_signal() {
    let partition =
        CsrPartition::from_raw_parts(vec![0, 2, 3, 4, 4], vec![1, 2, 2, 3]).unwrap();
    let mut unit = ComputeUnit::new(KernelConfig::default().with_lanes(2), 2).unwrap();

    let current = FrontierBitset::with_words(2);
    let mut visited = frontier(2, &[0]);
    let mut next = FrontierBitset::with_words(2);
    let mut levels = vec![7; 4];

    let stats = unit
        .level_step(LevelContext {
            partition: &partition,
            current: &current,
            visited: &mut visited,
            next: &mut next,
            levels: &mut levels,
            level: 3,
        })
        .unwrap();

    assert!(next.is_empty());
    assert_eq!(levels, vec![7; 4]);
    assert_eq!(stats.active_nodes, 0);
}

#[test]
fn test_fully_visited_graph_yields_empty_next() {
    let partition =
        CsrPartition::from_raw_parts(vec![0, 2, 3, 4, 4], vec![1, 2, 2, 3]).unwrap();
    let mut unit = ComputeUnit::new(KernelConfig::default().with_lanes(1), 1).unwrap();

    let current = frontier(1, &[0, 1, 2, 3]);
    let mut visited = frontier(1, &[0, 1, 2, 3]);
    let mut next = FrontierBitset::with_words(1);
    let mut levels = vec![UNREACHED; 4];

    let stats = unit
        .level_step(LevelContext {
            partition: &partition,
            current: &current,
            visited: &mut visited,
            next: &mut next,
            levels: &mut levels,
            level: 5,
        })
        .unwrap();

    assert!(next.is_empty());
    assert_eq!(stats.edges_scanned, 4);
    assert_eq!(stats.lock_acquisitions, 0);
}

#[test]
fn test_node_without_out_edges_is_skipped() {
    let partition = CsrPartition::from_raw_parts(vec![0, 0, 1], vec![0]).unwrap();
    let mut unit = ComputeUnit::new(KernelConfig::default().with_lanes(1), 1).unwrap();

    let current = frontier(1, &[0]);
    let mut visited = FrontierBitset::with_words(1);
    let mut next = FrontierBitset::with_words(1);
    let mut levels = vec![UNREACHED; 2];

    unit.level_step(LevelContext {
        partition: &partition,
        current: &current,
        visited: &mut visited,
        next: &mut next,
        levels: &mut levels,
        level: 0,
    })
    .unwrap();

    assert_eq!(levels, vec![0, UNREACHED]);
    assert!(next.is_empty());
}

#[test]
fn test_hub_contention_sets_each_bit_once() {
    // 64 active sources all pointing at the same 32 targets in one word
    let sources = 64_u32;
    let mut offsets = vec![0_u32];
    let mut neighbors = Vec::new();
    for _ in 0..sources {
        neighbors.extend(64..96);
        offsets.push(u32::try_from(neighbors.len()).unwrap());
    }
    let partition = CsrPartition::from_raw_parts(offsets, neighbors).unwrap();

    for lock in [LockStrategy::Coarse, LockStrategy::Sharded { shards: 4 }] {
        let config = KernelConfig::default().with_lanes(2).with_lock(lock);
        let mut unit = ComputeUnit::new(config, 4).unwrap();

        let current = frontier(2, &(0..sources).collect::<Vec<_>>());
        let mut visited = FrontierBitset::with_words(4);
        let mut next = FrontierBitset::with_words(4);
        let mut levels = vec![UNREACHED; 64];

        let stats = unit
            .level_step(LevelContext {
                partition: &partition,
                current: &current,
                visited: &mut visited,
                next: &mut next,
                levels: &mut levels,
                level: 0,
            })
            .unwrap();

        assert_eq!(next.words(), vec![0, 0, u32::MAX, 0], "{lock:?}");
        assert_eq!(stats.lock_acquisitions, 64 * 32);
        assert!(levels.iter().all(|&l| l == 0));
    }
}

#[test]
fn test_preconditions_fail_fast() {
    let partition =
        CsrPartition::from_raw_parts(vec![0, 2, 3, 4, 4], vec![1, 2, 2, 3]).unwrap();
    let mut unit = ComputeUnit::new(KernelConfig::default().with_lanes(4), 4).unwrap();

    let current = frontier(4, &[0]);
    let mut visited = FrontierBitset::with_words(4);
    let mut next = FrontierBitset::with_words(4);
    // Level array too short for active node 0
    let mut levels: Vec<u32> = Vec::new();

    let err = unit
        .level_step(LevelContext {
            partition: &partition,
            current: &current,
            visited: &mut visited,
            next: &mut next,
            levels: &mut levels,
            level: 0,
        })
        .unwrap_err();
    assert!(matches!(err, KernelError::ActiveNodeOutOfRange { node: 0, .. }));
}

#[test]
fn test_level_sync_matches_sequential_on_grid() {
    // 20x20 directed grid: right and down edges
    let side = 20_u32;
    let mut edges = Vec::new();
    for r in 0..side {
        for c in 0..side {
            let id = r * side + c;
            if c + 1 < side {
                edges.push((GlobalNodeId(id), GlobalNodeId(id + 1)));
            }
            if r + 1 < side {
                edges.push((GlobalNodeId(id), GlobalNodeId(id + side)));
            }
        }
    }
    let graph = CsrGraph::from_edge_list(&edges).unwrap();
    let expected = bfs_levels(&graph, GlobalNodeId(0)).unwrap();

    for units in [1, 3] {
        let mut bfs =
            LevelSyncBfs::new(&graph, units, KernelConfig::default().with_lanes(4)).unwrap();
        let result = bfs.run(GlobalNodeId(0)).unwrap();

        assert_eq!(result.levels, expected, "units = {units}");
        assert_eq!(result.visited_count, 400);
        // Max distance 38, plus the final empty round
        assert_eq!(result.rounds, 39);
    }
}

#[test]
fn test_default_sixteen_lanes_on_small_graph() {
    let edges = [(0, 1), (1, 2), (2, 0)].map(|(s, d)| (GlobalNodeId(s), GlobalNodeId(d)));
    let graph = CsrGraph::from_edge_list(&edges).unwrap();

    let mut bfs = LevelSyncBfs::new(&graph, 1, KernelConfig::default()).unwrap();
    let result = bfs.run(GlobalNodeId(2)).unwrap();

    assert_eq!(result.levels, vec![1, 2, 0]);
    assert_eq!(bfs.unit_count(), 1);
}

#[cfg(feature = "storage")]
#[tokio::test]
async fn test_parquet_loaded_graph_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chain");

    let edges: Vec<_> = (0..100)
        .map(|i| (GlobalNodeId(i), GlobalNodeId(i + 1)))
        .collect();
    CsrGraph::from_edge_list(&edges)
        .unwrap()
        .write_parquet(&path)
        .await
        .unwrap();

    let graph = CsrGraph::read_parquet(&path).await.unwrap();
    let mut bfs = LevelSyncBfs::new(&graph, 2, KernelConfig::default().with_lanes(2)).unwrap();
    let result = bfs.run(GlobalNodeId(0)).unwrap();

    assert_eq!(result.level(GlobalNodeId(100)), Some(100));
    assert_eq!(result.visited_count, 101);
}
