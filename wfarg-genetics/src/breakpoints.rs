use rand::distributions::Uniform;
use rand::Rng;

use wfarg_core::Position;

/// Breakpoint positions from crossover events
///
/// # Notes
///
/// * Crossovers compare by their
///   [`Position`](wfarg_core::Position).
/// * [`Breakpoint::End`] compares greater than
///   any crossover and closes the final segment
///   of a meiosis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    Crossover(Position),
    End,
}

impl Breakpoint {
    /// The position of a crossover, or `None` for [`Breakpoint::End`].
    pub fn position(&self) -> Option<Position> {
        match self {
            Breakpoint::Crossover(p) => Some(*p),
            Breakpoint::End => None,
        }
    }
}

/// How crossover breakpoints are generated for one meiosis.
#[derive(Copy, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum RecombinationPolicy {
    /// Exactly one crossover per meiosis.
    SingleCrossover,
    /// A Poisson number of crossovers with the given mean.
    Poisson { mean: f64 },
}

impl RecombinationPolicy {
    /// The number of breakpoints (excluding [`Breakpoint::End`])
    /// if it is the same for every meiosis.
    pub fn fixed_num_crossovers(&self) -> Option<usize> {
        match self {
            RecombinationPolicy::SingleCrossover => Some(1),
            RecombinationPolicy::Poisson { mean } if *mean == 0.0 => Some(0),
            RecombinationPolicy::Poisson { .. } => None,
        }
    }
}

impl std::fmt::Display for RecombinationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecombinationPolicy::SingleCrossover => write!(f, "single crossover"),
            RecombinationPolicy::Poisson { mean } => write!(f, "Poisson(mean = {})", mean),
        }
    }
}

/// Generate the crossover breakpoints of one meiosis.
pub trait GenerateBreakpoints {
    /// Replace the stored breakpoints with those of a new meiosis.
    ///
    /// Crossovers are sorted and strictly inside `(0, 1)`.
    /// If there are any, the last breakpoint is [`Breakpoint::End`].
    fn generate_breakpoints<T: Rng>(&mut self, rng: &mut T);
    /// The breakpoints from the last call to
    /// [`GenerateBreakpoints::generate_breakpoints`].
    fn breakpoints(&self) -> &[Breakpoint];

    /// Number of generated breakpoints,
    /// including any [`Breakpoint::End`].
    fn len(&self) -> usize {
        self.breakpoints().len()
    }

    /// Checks if generated breakpoints are empty.
    fn is_empty(&self) -> bool {
        self.breakpoints().is_empty()
    }
}

// Draws from [0, 1) until the value is neither end of the genome.
// Terminates with probability one.
fn interior_position<T: Rng>(uniform: &Uniform<Position>, rng: &mut T) -> Position {
    loop {
        let p = rng.sample(uniform);
        if p.is_interior() {
            return p;
        }
    }
}

#[derive(Debug)]
enum CrossoverModel {
    Single,
    Poisson(Option<rand_distr::Poisson<f64>>),
}

/// Generates crossover breakpoints according to
/// a [`RecombinationPolicy`].
///
/// The output of each call to
/// [`GenerateBreakpoints::generate_breakpoints`]
/// is sorted, free of duplicates, strictly inside
/// `(0, 1)`, and terminated by [`Breakpoint::End`]
/// unless empty.
#[derive(Debug)]
pub struct GeneticMap {
    policy: RecombinationPolicy,
    model: CrossoverModel,
    uniform: Uniform<Position>,
    breakpoints: Vec<Breakpoint>,
}

impl GeneticMap {
    /// # Returns
    ///
    /// `None` if a Poisson mean is negative or not finite.
    pub fn new(policy: RecombinationPolicy) -> Option<Self> {
        let model = match policy {
            RecombinationPolicy::SingleCrossover => CrossoverModel::Single,
            RecombinationPolicy::Poisson { mean } => {
                if !mean.is_finite() || mean < 0.0 {
                    return None;
                }
                if mean > 0.0 {
                    CrossoverModel::Poisson(Some(rand_distr::Poisson::new(mean).ok()?))
                } else {
                    CrossoverModel::Poisson(None)
                }
            }
        };
        Some(Self {
            policy,
            model,
            uniform: Uniform::new(Position::LEFT, Position::RIGHT),
            breakpoints: vec![],
        })
    }

    /// The policy this map was built from.
    pub fn policy(&self) -> RecombinationPolicy {
        self.policy
    }
}

impl GenerateBreakpoints for GeneticMap {
    fn generate_breakpoints<T: Rng>(&mut self, rng: &mut T) {
        self.breakpoints.clear();
        match &self.model {
            CrossoverModel::Single => {
                let pos = interior_position(&self.uniform, rng);
                self.breakpoints.push(Breakpoint::Crossover(pos));
            }
            CrossoverModel::Poisson(Some(poisson)) => {
                let num: f64 = rng.sample(poisson);
                for _ in 0..num as u32 {
                    let pos = interior_position(&self.uniform, rng);
                    self.breakpoints.push(Breakpoint::Crossover(pos));
                }
                self.breakpoints.sort();
                // identical positions collapse to one breakpoint
                self.breakpoints.dedup();
            }
            CrossoverModel::Poisson(None) => (),
        }
        if !self.breakpoints.is_empty() {
            self.breakpoints.push(Breakpoint::End);
        }
    }

    fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_breakpoint_sorting() {
        let mut v = vec![
            Breakpoint::End,
            Breakpoint::Crossover(Position::new_valid(0.75)),
            Breakpoint::Crossover(Position::new_valid(0.25)),
        ];
        v.sort();
        assert_eq!(
            &v,
            &[
                Breakpoint::Crossover(Position::new_valid(0.25)),
                Breakpoint::Crossover(Position::new_valid(0.75)),
                Breakpoint::End,
            ]
        );
    }

    #[test]
    fn test_end_is_greater_than_right() {
        assert!(Breakpoint::Crossover(Position::RIGHT) < Breakpoint::End);
        assert!(Breakpoint::End.position().is_none());
    }

    #[test]
    fn test_invalid_poisson_mean() {
        assert!(GeneticMap::new(RecombinationPolicy::Poisson { mean: -1e-3 }).is_none());
        assert!(GeneticMap::new(RecombinationPolicy::Poisson { mean: f64::NAN }).is_none());
        assert!(GeneticMap::new(RecombinationPolicy::Poisson { mean: f64::INFINITY }).is_none());
        assert!(GeneticMap::new(RecombinationPolicy::Poisson { mean: 0.0 }).is_some());
    }

    #[test]
    fn test_fixed_num_crossovers() {
        assert_eq!(
            RecombinationPolicy::SingleCrossover.fixed_num_crossovers(),
            Some(1)
        );
        assert_eq!(
            RecombinationPolicy::Poisson { mean: 0.0 }.fixed_num_crossovers(),
            Some(0)
        );
        assert!(RecombinationPolicy::Poisson { mean: 1.0 }
            .fixed_num_crossovers()
            .is_none());
    }

    #[test]
    fn test_single_crossover() {
        let mut map = GeneticMap::new(RecombinationPolicy::SingleCrossover).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        for _ in 0..100 {
            map.generate_breakpoints(&mut rng);
            assert_eq!(map.len(), 2);
            assert!(map.breakpoints()[0].position().unwrap().is_interior());
            assert_eq!(map.breakpoints()[1], Breakpoint::End);
        }
    }

    #[test]
    fn test_zero_mean_is_empty() {
        let mut map = GeneticMap::new(RecombinationPolicy::Poisson { mean: 0.0 }).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        map.generate_breakpoints(&mut rng);
        assert!(map.is_empty());
    }
}
