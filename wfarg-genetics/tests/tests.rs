use proptest::prelude::*;
use rand::SeedableRng;

use wfarg_core::Position;
use wfarg_genetics::*;

// Sorts all segments by left edge and checks
// that they tile [0, 1) exactly.
fn tiles_unit_interval(segments: &GameteSegments) -> bool {
    let mut all = segments
        .first()
        .iter()
        .chain(segments.second().iter())
        .copied()
        .collect::<Vec<_>>();
    all.sort_by(|a, b| a.left.cmp(&b.left));
    if all.is_empty() {
        return false;
    }
    all.first().unwrap().left == 0.0
        && all.last().unwrap().right == 1.0
        && all.windows(2).all(|w| w[0].right == w[1].left)
        && all.iter().all(|s| s.left < s.right)
}

proptest! {
    #[test]
    fn test_segments_tile_genome(mut positions in prop::collection::vec(0.0..=1.0_f64, 0..20),
                                 terminate in any::<bool>()) {
        positions.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mut breakpoints = positions
            .iter()
            .map(|&x| Breakpoint::Crossover(Position::new_valid(x)))
            .collect::<Vec<_>>();
        if terminate {
            breakpoints.push(Breakpoint::End);
        }
        let segments = split_breakpoints(&breakpoints);
        prop_assert!(tiles_unit_interval(&segments));
    }
}

proptest! {
    #[test]
    fn test_poisson_breakpoints(seed in 0..u64::MAX, mean in 0.0..20.0_f64) {
        let mut map = GeneticMap::new(RecombinationPolicy::Poisson { mean }).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        for _ in 0..10 {
            map.generate_breakpoints(&mut rng);
            if map.is_empty() {
                continue;
            }
            let b = map.breakpoints();
            prop_assert_eq!(*b.last().unwrap(), Breakpoint::End);
            prop_assert!(b.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(b[..b.len() - 1]
                .iter()
                .all(|x| x.position().unwrap().is_interior()));
            prop_assert!(tiles_unit_interval(&split_breakpoints(b)));
        }
    }
}

#[test]
fn test_single_crossover_two_segments() {
    let mut map = GeneticMap::new(RecombinationPolicy::SingleCrossover).unwrap();
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let mut segments = GameteSegments::new();
    for _ in 0..100 {
        map.generate_breakpoints(&mut rng);
        segments.split(map.breakpoints());
        assert_eq!(segments.first().len(), 1);
        assert_eq!(segments.second().len(), 1);
        assert_eq!(segments.first()[0].right, segments.second()[0].left);
    }
}

#[test]
fn test_zero_mean_single_segment() {
    let mut map = GeneticMap::new(RecombinationPolicy::Poisson { mean: 0.0 }).unwrap();
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let mut segments = GameteSegments::new();
    for _ in 0..10 {
        map.generate_breakpoints(&mut rng);
        segments.split(map.breakpoints());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments.first()[0].left, 0.0);
        assert_eq!(segments.first()[0].right, 1.0);
    }
}

#[test]
fn test_split_is_deterministic() {
    let breakpoints = [
        Breakpoint::Crossover(Position::new_valid(0.2)),
        Breakpoint::Crossover(Position::new_valid(0.6)),
        Breakpoint::End,
    ];
    let a = split_breakpoints(&breakpoints);
    let b = split_breakpoints(&breakpoints);
    assert_eq!(a.first(), b.first());
    assert_eq!(a.second(), b.second());
}

#[test]
fn test_same_seed_same_breakpoints() {
    let policy = RecombinationPolicy::Poisson { mean: 5.0 };
    let mut a = GeneticMap::new(policy).unwrap();
    let mut b = GeneticMap::new(policy).unwrap();
    let mut rnga = rand::rngs::StdRng::seed_from_u64(101);
    let mut rngb = rand::rngs::StdRng::seed_from_u64(101);
    for _ in 0..10 {
        a.generate_breakpoints(&mut rnga);
        b.generate_breakpoints(&mut rngb);
        assert_eq!(a.breakpoints(), b.breakpoints());
    }
}
