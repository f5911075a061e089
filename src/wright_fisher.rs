//! A constant-size, diploid Wright-Fisher population
//! that records the ancestry of every chromosome.

use log::{debug, info, trace};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wfarg_core::{DemeId, NodeId, Time};
use wfarg_genetics::{GameteSegments, GenerateBreakpoints, GeneticMap, RecombinationPolicy};

use crate::audit::{self, EdgesPerGeneration};
use crate::error::{configuration_error, invariant_violation, WfArgResult};
use crate::samples::{fill_samples, subsample};
use crate::simulation_flags::SimulationFlags;
use crate::tables::{AncestryTracker, Edge, Node};

/// Length of a simulation built by
/// [``SimulationParams::from_scaled``], in units
/// of `N` generations.
pub const SIMLEN: i64 = 20;

/// Parameters of a simulation.
#[derive(Copy, Clone, Debug)]
pub struct SimulationParams {
    /// Number of diploids, `N`
    pub popsize: u32,
    /// Number of generations
    pub nsteps: i64,
    /// How crossovers are generated in each meiosis
    pub recombination: RecombinationPolicy,
    /// Per-generation mutation rate.
    /// Not used by the simulation itself; carried
    /// for mutation placement on the output.
    pub mutation_rate: f64,
    /// Number of final-generation chromosomes to sample.
    /// `None` samples all `2N`.
    pub nsam: Option<usize>,
    /// Random number seed
    pub seed: u64,
    /// See [``SimulationFlags``]
    pub flags: SimulationFlags,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            popsize: 1000,
            nsteps: 0,
            recombination: RecombinationPolicy::SingleCrossover,
            mutation_rate: 0.0,
            nsam: None,
            seed: 0,
            flags: SimulationFlags::empty(),
        }
    }
}

impl SimulationParams {
    /// Build parameters from population-scaled rates.
    ///
    /// * `theta` is `4Nu`
    /// * `rho` is `4Nr`, giving a Poisson number of crossovers
    ///   with mean `r` per meiosis. If `None`, every meiosis
    ///   has exactly one crossover.
    ///
    /// The simulation lasts [``SIMLEN``]` * N` generations.
    ///
    /// ```
    /// let p = wfarg::SimulationParams::from_scaled(10, 40.0, Some(20.0), Some(5), 42).unwrap();
    /// assert_eq!(p.nsteps, 200);
    /// assert_eq!(p.mutation_rate, 1.0);
    /// assert_eq!(p.recombination, wfarg::RecombinationPolicy::Poisson { mean: 0.5 });
    /// ```
    pub fn from_scaled(
        popsize: u32,
        theta: f64,
        rho: Option<f64>,
        nsam: Option<usize>,
        seed: u64,
    ) -> WfArgResult<Self> {
        if popsize == 0 {
            return configuration_error("population size must be > 0");
        }
        let four_n = 4.0 * f64::from(popsize);
        let recombination = match rho {
            Some(rho) => RecombinationPolicy::Poisson { mean: rho / four_n },
            None => RecombinationPolicy::SingleCrossover,
        };
        let params = Self {
            popsize,
            nsteps: SIMLEN * i64::from(popsize),
            recombination,
            mutation_rate: theta / four_n,
            nsam,
            seed,
            flags: SimulationFlags::empty(),
        };
        params.validate()?;
        Ok(params)
    }

    /// Check for configuration errors.
    pub fn validate(&self) -> WfArgResult<()> {
        if self.popsize == 0 {
            return configuration_error("population size must be > 0");
        }
        if self.nsteps < 0 {
            return configuration_error(format!(
                "number of generations must be >= 0, got {}",
                self.nsteps
            ));
        }
        if let Some(nsam) = self.nsam {
            if nsam > 2 * self.popsize as usize {
                return configuration_error(format!(
                    "sample size {} exceeds 2N = {}",
                    nsam,
                    2 * u64::from(self.popsize)
                ));
            }
        }
        if let RecombinationPolicy::Poisson { mean } = self.recombination {
            if !mean.is_finite() || mean < 0.0 {
                return configuration_error(format!("invalid recombination rate: {}", mean));
            }
        }
        if !self.mutation_rate.is_finite() || self.mutation_rate < 0.0 {
            return configuration_error(format!("invalid mutation rate: {}", self.mutation_rate));
        }
        let total_nodes = 2 * u128::from(self.popsize) * (self.nsteps as u128 + 1);
        if total_nodes > u128::from(u32::MAX) {
            return configuration_error(format!(
                "{} nodes would exceed the node id space",
                total_nodes
            ));
        }
        Ok(())
    }

    /// How many edges each generation adds.
    pub fn edges_per_generation(&self) -> EdgesPerGeneration {
        EdgesPerGeneration::from_policy(self.recombination, self.popsize)
    }
}

/// Borrowed views of a simulation's output,
/// ready to hand to a genealogy library.
#[derive(Copy, Clone, Debug)]
pub struct ExportTables<'a> {
    /// Nodes, ordered by id
    pub nodes: &'a [Node],
    /// Edges, unsorted
    pub edges: &'a [Edge],
    /// Sample nodes
    pub samples: &'a [NodeId],
}

/// The result of [``neutral_wf``].
#[derive(Debug)]
pub struct SimulationOutput {
    /// All recorded nodes and edges
    pub tracker: AncestryTracker,
    /// The `2N` living chromosomes of the final generation
    pub alive: Vec<NodeId>,
    /// The sample set: `alive`, or `nsam` of its members
    pub samples: Vec<NodeId>,
}

impl SimulationOutput {
    /// Borrow the output tables and samples.
    pub fn export(&self) -> ExportTables<'_> {
        ExportTables {
            nodes: self.tracker.nodes(),
            edges: self.tracker.edges(),
            samples: &self.samples,
        }
    }
}

// The two parents of one offspring,
// as indexes into the living diploids.
#[derive(Copy, Clone, Debug)]
struct Birth {
    parent0: usize,
    parent1: usize,
}

struct PopulationState {
    popsize: u32,
    // Diploid i has chromosomes alive[2i] and alive[2i + 1]
    alive: Vec<NodeId>,
    offspring: Vec<NodeId>,
    births: Vec<Birth>,
    genetic_map: GeneticMap,
    segments: GameteSegments,
    edge_buffer: Vec<Edge>,
    tracker: AncestryTracker,
}

impl PopulationState {
    fn new(params: &SimulationParams) -> WfArgResult<Self> {
        let genetic_map = match GeneticMap::new(params.recombination) {
            Some(map) => map,
            None => {
                return configuration_error(format!(
                    "invalid recombination policy: {}",
                    params.recombination
                ))
            }
        };
        let num_founders = 2 * params.popsize as usize;
        let tracker = if params.flags.contains(SimulationFlags::PREALLOCATE) {
            let ngens = params.nsteps as usize;
            let num_edges = match params.edges_per_generation() {
                EdgesPerGeneration::Exactly(n) => n * ngens,
                EdgesPerGeneration::Variable => {
                    debug!("edge count is not known in advance; edges will grow as needed");
                    0
                }
            };
            AncestryTracker::with_capacity(params.popsize, num_founders * (ngens + 1), num_edges)?
        } else {
            AncestryTracker::new(params.popsize)?
        };
        let alive = tracker.nodes().iter().map(|n| n.id).collect::<Vec<_>>();
        Ok(Self {
            popsize: params.popsize,
            alive,
            offspring: Vec::with_capacity(num_founders),
            births: Vec::with_capacity(params.popsize as usize),
            genetic_map,
            segments: GameteSegments::new(),
            edge_buffer: vec![],
            tracker,
        })
    }
}

fn sample_parents(popsize: u32, rng: &mut StdRng, births: &mut Vec<Birth>) {
    births.clear();
    let random_parents = Uniform::new(0_usize, popsize as usize);
    for _ in 0..popsize {
        let parent0 = rng.sample(random_parents);
        let parent1 = rng.sample(random_parents);
        births.push(Birth { parent0, parent1 });
    }
}

fn parent_nodes(alive: &[NodeId], parent: usize) -> (NodeId, NodeId) {
    (alive[2 * parent], alive[2 * parent + 1])
}

/// Decide which node to pass on from a parent.
fn mendel(pnodes: &mut (NodeId, NodeId), rng: &mut StdRng) {
    let x: f64 = rng.gen();
    if x < 0.5 {
        std::mem::swap(&mut pnodes.0, &mut pnodes.1);
    }
}

// Records the edges from one meiosis as one contiguous run.
fn crossover_and_record_edges(
    pnodes: (NodeId, NodeId),
    child: NodeId,
    genetic_map: &mut GeneticMap,
    segments: &mut GameteSegments,
    edge_buffer: &mut Vec<Edge>,
    tracker: &mut AncestryTracker,
    rng: &mut StdRng,
) -> WfArgResult<usize> {
    genetic_map.generate_breakpoints(rng);
    trace!("child {}: {} breakpoints", child, genetic_map.len());
    segments.split(genetic_map.breakpoints());

    edge_buffer.clear();
    for s in segments.first() {
        edge_buffer.push(Edge::new(s.left, s.right, pnodes.0, child)?);
    }
    for s in segments.second() {
        edge_buffer.push(Edge::new(s.left, s.right, pnodes.1, child)?);
    }
    tracker.record_edges(edge_buffer)?;
    Ok(edge_buffer.len())
}

fn generate_births(
    birth_time: Time,
    rng: &mut StdRng,
    pop: &mut PopulationState,
) -> WfArgResult<usize> {
    let PopulationState {
        alive,
        offspring,
        births,
        genetic_map,
        segments,
        edge_buffer,
        tracker,
        ..
    } = pop;
    offspring.clear();
    let mut num_edges = 0;
    for b in births.iter() {
        let mut parent0_nodes = parent_nodes(alive, b.parent0);
        let mut parent1_nodes = parent_nodes(alive, b.parent1);
        mendel(&mut parent0_nodes, rng);
        mendel(&mut parent1_nodes, rng);

        // Record 2 new nodes
        let new_node_0 = tracker.allocate_offspring_id()?;
        tracker.record_node(new_node_0, birth_time, DemeId::from(0))?;
        let new_node_1 = tracker.allocate_offspring_id()?;
        tracker.record_node(new_node_1, birth_time, DemeId::from(0))?;

        num_edges += crossover_and_record_edges(
            parent0_nodes,
            new_node_0,
            genetic_map,
            segments,
            edge_buffer,
            tracker,
            rng,
        )?;
        num_edges += crossover_and_record_edges(
            parent1_nodes,
            new_node_1,
            genetic_map,
            segments,
            edge_buffer,
            tracker,
            rng,
        )?;

        offspring.push(new_node_0);
        offspring.push(new_node_1);
    }
    Ok(num_edges)
}

/// Offspring `i` of a generation whose first id is `first`
/// receives ids `first + 2i` and `first + 2i + 1`.
///
/// ```
/// use wfarg::NodeId;
/// let (a, b) = wfarg::wright_fisher::offspring_ids(NodeId::from(40), 3).unwrap();
/// assert_eq!(a, 46);
/// assert_eq!(b, 47);
/// ```
pub fn offspring_ids(first: NodeId, offspring: usize) -> Option<(NodeId, NodeId)> {
    let base = u32::try_from(offspring)
        .ok()?
        .checked_mul(2)?
        .checked_add(first.raw())?;
    Some((NodeId::from(base), NodeId::from(base.checked_add(1)?)))
}

// The ids of a generation are contiguous from `first_child`,
// and every parent predates all of them.
fn check_generation(
    generation: i64,
    first_child: NodeId,
    offspring: &[NodeId],
    edges: &[Edge],
) -> WfArgResult<()> {
    for (i, pair) in offspring.chunks(2).enumerate() {
        let expected = offspring_ids(first_child, i);
        if expected.map(|(a, b)| [a, b].as_slice() == pair) != Some(true) {
            return invariant_violation(
                generation,
                format!("offspring {} has ids {:?}, expected {:?}", i, pair, expected),
            );
        }
    }
    if let Some(parent) = edges.iter().map(|e| e.parent).max() {
        if parent >= first_child {
            return invariant_violation(
                generation,
                format!(
                    "parent {} is not older than the first child {}",
                    parent, first_child
                ),
            );
        }
    }
    let start = u64::from(first_child.raw());
    let children = start..start + offspring.len() as u64;
    if let Some(e) = edges
        .iter()
        .find(|e| !children.contains(&u64::from(e.child.raw())))
    {
        return invariant_violation(
            generation,
            format!("edge child {} was not born this generation", e.child),
        );
    }
    Ok(())
}

/// A population stepping forward one
/// generation at a time.
///
/// # Example
///
/// ```
/// let params = wfarg::SimulationParams {
///     popsize: 10,
///     nsteps: 2,
///     seed: 12345,
///     ..Default::default()
/// };
/// let mut sim = wfarg::WrightFisher::new(params).unwrap();
/// sim.step().unwrap();
/// assert_eq!(sim.generation(), 1);
/// assert_eq!(sim.tracker().num_edges(), 40);
/// assert_eq!(sim.alive()[0], 20);
/// ```
pub struct WrightFisher {
    params: SimulationParams,
    rng: StdRng,
    generation: i64,
    pop: PopulationState,
}

impl WrightFisher {
    /// Validate `params` and record the founders.
    pub fn new(params: SimulationParams) -> WfArgResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            rng: StdRng::seed_from_u64(params.seed),
            generation: 0,
            pop: PopulationState::new(&params)?,
        })
    }

    /// Simulate one generation.
    ///
    /// Parents are sampled with replacement, each passes on
    /// one of its chromosomes at random, recombination happens,
    /// and the offspring's nodes and edges are recorded.
    /// The offspring then replace their parents.
    ///
    /// Returns the number of edges recorded.
    pub fn step(&mut self) -> WfArgResult<usize> {
        let generation = self.generation + 1;
        let birth_time = Time::try_from(generation)?;
        let first_child = self.pop.tracker.next_id();
        let first_edge = self.pop.tracker.num_edges();

        if !self.params.flags.contains(SimulationFlags::PREALLOCATE) {
            let num_chromosomes = 2 * self.pop.popsize as usize;
            let num_edges = match self.params.edges_per_generation() {
                EdgesPerGeneration::Exactly(n) => n,
                EdgesPerGeneration::Variable => num_chromosomes,
            };
            self.pop.tracker.reserve(num_chromosomes, num_edges);
        }

        sample_parents(self.pop.popsize, &mut self.rng, &mut self.pop.births);
        let num_edges = generate_births(birth_time, &mut self.rng, &mut self.pop)?;
        check_generation(
            generation,
            first_child,
            &self.pop.offspring,
            &self.pop.tracker.edges()[first_edge..],
        )?;
        std::mem::swap(&mut self.pop.alive, &mut self.pop.offspring);
        self.generation = generation;

        debug!(
            "generation {}: ids [{}, {}), {} edges",
            generation,
            first_child,
            self.pop.tracker.next_id(),
            num_edges
        );
        Ok(num_edges)
    }

    /// Number of generations simulated so far.
    pub fn generation(&self) -> i64 {
        self.generation
    }

    /// The `2N` living chromosomes.
    pub fn alive(&self) -> &[NodeId] {
        &self.pop.alive
    }

    /// Everything recorded so far.
    pub fn tracker(&self) -> &AncestryTracker {
        &self.pop.tracker
    }

    /// The (validated) parameters.
    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Choose the sample set and, if requested, audit the output.
    pub fn finish(mut self) -> WfArgResult<SimulationOutput> {
        let samples = match self.params.nsam {
            Some(nsam) => subsample(&self.pop.alive, nsam, &mut self.rng)?,
            None => {
                let mut samples = Vec::with_capacity(self.pop.alive.len());
                fill_samples(&self.pop.alive, &mut samples);
                samples
            }
        };
        if self.params.flags.contains(SimulationFlags::AUDIT) {
            audit::expensive_check(
                self.params.popsize,
                self.generation,
                &self.pop.tracker,
                &self.pop.alive,
                self.params.edges_per_generation(),
            )?;
            audit::check_sample_subset(self.params.popsize, self.generation, &samples)?;
        }
        Ok(SimulationOutput {
            tracker: self.pop.tracker,
            alive: self.pop.alive,
            samples,
        })
    }
}

/// Run a neutral Wright-Fisher simulation for
/// `params.nsteps` generations.
///
/// # Errors
///
/// * [``crate::WfArgError::ConfigurationError``] for invalid `params`,
///   before any simulation happens.
/// * [``crate::WfArgError::InvariantViolation``] if the recorded
///   ancestry is corrupt.
///
/// # Example
///
/// ```
/// let params = wfarg::SimulationParams {
///     popsize: 10,
///     nsteps: 2,
///     seed: 12345,
///     flags: wfarg::SimulationFlags::AUDIT,
///     ..Default::default()
/// };
/// let output = wfarg::neutral_wf(params).unwrap();
/// assert_eq!(output.tracker.num_nodes(), 60);
/// assert_eq!(output.tracker.num_edges(), 80);
/// ```
pub fn neutral_wf(params: SimulationParams) -> WfArgResult<SimulationOutput> {
    let mut sim = WrightFisher::new(params)?;
    info!(
        "simulating {} diploids for {} generations with {} recombination (flags: {:?})",
        params.popsize, params.nsteps, params.recombination, params.flags
    );
    for _ in 0..params.nsteps {
        sim.step()?;
    }
    let output = sim.finish()?;
    info!(
        "recorded {} nodes and {} edges; {} samples",
        output.tracker.num_nodes(),
        output.tracker.num_edges(),
        output.samples.len()
    );
    Ok(output)
}
