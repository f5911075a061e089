use proptest::prelude::*;
use wfarg::audit::{expensive_check, generation_id_range, EdgesPerGeneration};
use wfarg::*;

fn params(popsize: u32, nsteps: i64, seed: u64) -> SimulationParams {
    SimulationParams {
        popsize,
        nsteps,
        seed,
        ..Default::default()
    }
}

// Edges of each child, in recording order.
fn edges_by_child(output: &SimulationOutput) -> Vec<Vec<Edge>> {
    let mut rv = vec![vec![]; output.tracker.num_nodes()];
    for e in output.tracker.edges() {
        rv[e.child.raw() as usize].push(*e);
    }
    rv
}

fn assert_tiles_unit_interval(edges: &[Edge]) {
    let mut edges = edges.to_vec();
    edges.sort_by(|a, b| a.left.cmp(&b.left));
    assert_eq!(edges[0].left, Position::LEFT);
    assert_eq!(edges[edges.len() - 1].right, Position::RIGHT);
    for w in edges.windows(2) {
        assert_eq!(w[0].right, w[1].left);
    }
}

#[test]
fn test_two_generations() {
    let output = neutral_wf(params(10, 2, 12345)).unwrap();
    assert_eq!(output.tracker.num_nodes(), 60);
    assert_eq!(output.tracker.num_edges(), 80);
    let expected = (40..60).map(NodeId::from).collect::<Vec<_>>();
    assert_eq!(output.samples, expected);
    assert_eq!(output.alive, expected);

    let tables = output.export();
    assert_eq!(tables.nodes.len(), 60);
    assert_eq!(tables.edges.len(), 80);
    assert_eq!(tables.samples, expected.as_slice());
}

#[test]
fn test_zero_generations() {
    let output = neutral_wf(params(5, 0, 1)).unwrap();
    assert_eq!(output.tracker.num_nodes(), 10);
    assert_eq!(output.tracker.num_edges(), 0);
    assert_eq!(
        output.samples,
        (0..10).map(NodeId::from).collect::<Vec<_>>()
    );
}

#[test]
fn test_node_generations() {
    let output = neutral_wf(params(7, 5, 101)).unwrap();
    for (i, node) in output.tracker.enumerate_nodes() {
        assert_eq!(node.id, i as u32);
        assert_eq!(node.generation, (i / 14) as f64);
        assert_eq!(node.population, DemeId::from(0));
    }
    for g in 0..=5 {
        let range = generation_id_range(7, g).unwrap();
        assert_eq!(range.end - range.start, 14);
        assert_eq!(range.start, 14 * g as u64);
    }
}

#[test]
fn test_single_crossover_edges() {
    let popsize = 10;
    let output = neutral_wf(params(popsize, 20, 8675309)).unwrap();
    assert_eq!(output.tracker.num_edges(), 4 * 10 * 20);
    for (child, edges) in edges_by_child(&output).iter().enumerate() {
        if child < 20 {
            assert!(edges.is_empty());
            continue;
        }
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].left, Position::LEFT);
        assert_eq!(edges[0].right, edges[1].left);
        assert_eq!(edges[1].right, Position::RIGHT);
        assert!(edges[0].right.is_interior());
        // Both gametes come from one diploid parent
        assert_ne!(edges[0].parent, edges[1].parent);
        assert_eq!(edges[0].parent.raw() / 2, edges[1].parent.raw() / 2);
        // ...of the previous generation
        let child_gen = child as u32 / 20;
        assert_eq!(edges[0].parent.raw() / 20, child_gen - 1);
    }
}

#[test]
fn test_edges_of_a_meiosis_are_contiguous() {
    let output = neutral_wf(params(10, 10, 54321)).unwrap();
    let edges = output.tracker.edges();
    let mut i = 0;
    while i < edges.len() {
        let child = edges[i].child;
        let mut j = i;
        while j < edges.len() && edges[j].child == child {
            j += 1;
        }
        assert!(edges[j..].iter().all(|e| e.child != child));
        i = j;
    }
}

#[test]
fn test_zero_rate_poisson() {
    let p = SimulationParams {
        recombination: RecombinationPolicy::Poisson { mean: 0.0 },
        flags: SimulationFlags::AUDIT,
        ..params(10, 10, 42)
    };
    let output = neutral_wf(p).unwrap();
    assert_eq!(output.tracker.num_edges(), 2 * 10 * 10);
    for e in output.tracker.edges() {
        assert_eq!(e.left, Position::LEFT);
        assert_eq!(e.right, Position::RIGHT);
    }
}

#[test]
fn test_poisson_edges_tile_the_genome() {
    let p = SimulationParams {
        recombination: RecombinationPolicy::Poisson { mean: 2.5 },
        ..params(10, 10, 42)
    };
    let output = neutral_wf(p).unwrap();
    for (child, edges) in edges_by_child(&output).iter().enumerate() {
        if child >= 20 {
            assert_tiles_unit_interval(edges);
            let child_time = output.tracker.nodes()[child].generation;
            for e in edges {
                let parent_time = output.tracker.nodes()[e.parent.raw() as usize].generation;
                assert_eq!(f64::from(child_time) - f64::from(parent_time), 1.0);
            }
        }
    }
}

#[test]
fn test_preallocation_does_not_change_output() {
    for recombination in [
        RecombinationPolicy::SingleCrossover,
        RecombinationPolicy::Poisson { mean: 1.0 },
    ] {
        let p = SimulationParams {
            recombination,
            ..params(10, 15, 1010)
        };
        let dynamic = neutral_wf(p).unwrap();
        let preallocated = neutral_wf(SimulationParams {
            flags: SimulationFlags::PREALLOCATE,
            ..p
        })
        .unwrap();
        assert_eq!(dynamic.tracker.nodes(), preallocated.tracker.nodes());
        assert_eq!(dynamic.tracker.edges(), preallocated.tracker.edges());
        assert_eq!(dynamic.samples, preallocated.samples);
    }
}

#[test]
fn test_reproducibility() {
    let p = SimulationParams {
        recombination: RecombinationPolicy::Poisson { mean: 0.5 },
        nsam: Some(5),
        ..params(10, 10, 77)
    };
    let a = neutral_wf(p).unwrap();
    let b = neutral_wf(p).unwrap();
    assert_eq!(a.tracker.edges(), b.tracker.edges());
    assert_eq!(a.samples, b.samples);

    let c = neutral_wf(SimulationParams { seed: 78, ..p }).unwrap();
    assert_ne!(a.tracker.edges(), c.tracker.edges());
}

#[test]
fn test_subsample() {
    let p = SimulationParams {
        nsam: Some(7),
        ..params(10, 4, 2)
    };
    let output = neutral_wf(p).unwrap();
    assert_eq!(output.samples.len(), 7);
    assert!(output.samples.windows(2).all(|w| w[0] < w[1]));
    assert!(output.samples.iter().all(|s| output.alive.contains(s)));
}

#[test]
fn test_configuration_errors() {
    for p in [
        params(0, 10, 1),
        params(10, -1, 1),
        SimulationParams {
            nsam: Some(21),
            ..params(10, 1, 1)
        },
        SimulationParams {
            recombination: RecombinationPolicy::Poisson { mean: f64::INFINITY },
            ..params(10, 1, 1)
        },
    ] {
        assert!(matches!(
            neutral_wf(p),
            Err(WfArgError::ConfigurationError { .. })
        ));
    }
}

#[test]
fn test_stepping() {
    let mut sim = WrightFisher::new(params(10, 3, 12345)).unwrap();
    for g in 1..=3 {
        assert_eq!(sim.step().unwrap(), 40);
        assert_eq!(sim.generation(), g);
        let first = 20 * g as u32;
        assert_eq!(
            sim.alive(),
            (first..first + 20).map(NodeId::from).collect::<Vec<_>>()
        );
    }
    let output = sim.finish().unwrap();
    assert_eq!(output.tracker.num_nodes(), 80);
}

#[test]
fn test_audit_of_a_stepped_simulation() {
    let mut sim = WrightFisher::new(params(4, 3, 1)).unwrap();
    for _ in 0..3 {
        sim.step().unwrap();
    }
    assert!(expensive_check(
        4,
        3,
        sim.tracker(),
        sim.alive(),
        EdgesPerGeneration::Exactly(16)
    )
    .is_ok());
    // Wrong number of generations
    assert!(expensive_check(
        4,
        2,
        sim.tracker(),
        sim.alive(),
        EdgesPerGeneration::Exactly(16)
    )
    .is_err());
}

proptest! {
    #[test]
    fn test_audit_passes(popsize in 1..20_u32, nsteps in 0..10_i64,
                         seed in 0..u64::MAX, rho in proptest::option::of(0.0..100.0_f64)) {
        let mut p = SimulationParams::from_scaled(popsize, 0.0, rho, None, seed).unwrap();
        p.nsteps = nsteps;
        p.flags = SimulationFlags::AUDIT;
        let output = neutral_wf(p).unwrap();
        let num_chromosomes = 2 * popsize as usize;
        prop_assert_eq!(output.tracker.num_nodes(), num_chromosomes * (nsteps as usize + 1));
        if rho.is_none() {
            prop_assert_eq!(output.tracker.num_edges(), 2 * num_chromosomes * nsteps as usize);
        }
        prop_assert_eq!(output.samples.len(), num_chromosomes);
    }
}
