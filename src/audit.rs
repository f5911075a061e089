//! Post-hoc checks of a completed simulation.
//!
//! These checks are O(population size × generations)
//! and are not run unless requested, either via
//! [``crate::SimulationFlags::AUDIT``] or by calling
//! the functions here directly.
//!
//! All checks assume founders with ids `[0, 2N)` at
//! generation 0, so that generation `g` is born with
//! ids `[2N·g, 2N·g + 2N)`.

use std::ops::Range;

use wfarg_core::NodeId;
use wfarg_genetics::RecombinationPolicy;

use crate::error::{configuration_error, invariant_violation, WfArgResult};
use crate::tables::{AncestryTracker, Edge, Node};

/// How many edges each generation is expected to add.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EdgesPerGeneration {
    /// Every generation adds exactly this many edges,
    /// so the edges of generation `g` are found by position.
    Exactly(usize),
    /// The count varies (e.g., Poisson crossovers).
    /// Per-generation counts are not checked.
    Variable,
}

impl EdgesPerGeneration {
    /// Expected edge counts for a population of `popsize`
    /// diploids recombining under `policy`.
    ///
    /// ```
    /// use wfarg::audit::EdgesPerGeneration;
    /// use wfarg::RecombinationPolicy;
    /// assert_eq!(
    ///     EdgesPerGeneration::from_policy(RecombinationPolicy::SingleCrossover, 10),
    ///     EdgesPerGeneration::Exactly(40)
    /// );
    /// assert_eq!(
    ///     EdgesPerGeneration::from_policy(RecombinationPolicy::Poisson { mean: 0.0 }, 10),
    ///     EdgesPerGeneration::Exactly(20)
    /// );
    /// assert_eq!(
    ///     EdgesPerGeneration::from_policy(RecombinationPolicy::Poisson { mean: 1.0 }, 10),
    ///     EdgesPerGeneration::Variable
    /// );
    /// ```
    pub fn from_policy(policy: RecombinationPolicy, popsize: u32) -> Self {
        match policy.fixed_num_crossovers() {
            // k crossovers make k + 1 edges for each of the 2N new chromosomes
            Some(k) => Self::Exactly(2 * popsize as usize * (k + 1)),
            None => Self::Variable,
        }
    }
}

/// The ids born in `generation`.
///
/// Returns `None` for negative generations or
/// if the range does not fit in `u64`.
///
/// ```
/// assert_eq!(wfarg::audit::generation_id_range(10, 2), Some(40..60));
/// assert_eq!(wfarg::audit::generation_id_range(10, -1), None);
/// ```
pub fn generation_id_range(popsize: u32, generation: i64) -> Option<Range<u64>> {
    let width = 2 * u64::from(popsize);
    let start = width.checked_mul(u64::try_from(generation).ok()?)?;
    Some(start..start.checked_add(width)?)
}

fn id_range(popsize: u32, generation: i64) -> WfArgResult<Range<u64>> {
    match generation_id_range(popsize, generation) {
        Some(range) => Ok(range),
        None => invariant_violation(generation, "no valid id range for this generation"),
    }
}

fn check_ngens(ngens: i64) -> WfArgResult<usize> {
    match usize::try_from(ngens) {
        Ok(n) => Ok(n),
        Err(_) => configuration_error(format!(
            "number of generations must be >= 0, got {}",
            ngens
        )),
    }
}

fn node_generation(node: &Node) -> Option<i64> {
    let g = f64::from(node.generation);
    if g.fract() == 0.0 && g >= 0.0 {
        Some(g as i64)
    } else {
        None
    }
}

/// Every generation `0..=ngens` has exactly `2N` nodes,
/// and their ids are that generation's id range.
pub fn check_nodes(popsize: u32, ngens: i64, nodes: &[Node]) -> WfArgResult<()> {
    let mut counts = vec![0_usize; check_ngens(ngens)? + 1];
    for (i, node) in nodes.iter().enumerate() {
        if usize::try_from(node.id)? != i {
            return invariant_violation(
                node_generation(node).unwrap_or(-1),
                format!("node at row {} has id {}", i, node.id),
            );
        }
        let g = match node_generation(node) {
            Some(g) if g <= ngens => g,
            _ => {
                return invariant_violation(
                    -1,
                    format!("node {} has invalid birth time {}", node.id, node.generation),
                )
            }
        };
        if !id_range(popsize, g)?.contains(&u64::from(node.id.raw())) {
            return invariant_violation(g, format!("node {} outside expected id range", node.id));
        }
        counts[g as usize] += 1;
    }
    for (g, &c) in counts.iter().enumerate() {
        if c != 2 * popsize as usize {
            return invariant_violation(
                g as i64,
                format!("{} nodes recorded, expected {}", c, 2 * popsize),
            );
        }
    }
    Ok(())
}

fn check_edge(popsize: u32, generation: i64, edge: &Edge) -> WfArgResult<()> {
    let parents = id_range(popsize, generation - 1)?;
    let children = id_range(popsize, generation)?;
    if !parents.contains(&u64::from(edge.parent.raw())) {
        return invariant_violation(
            generation,
            format!(
                "parent {} of child {} outside {:?}",
                edge.parent, edge.child, parents
            ),
        );
    }
    if !children.contains(&u64::from(edge.child.raw())) {
        return invariant_violation(
            generation,
            format!("child {} outside {:?}", edge.child, children),
        );
    }
    if edge.left >= edge.right {
        return invariant_violation(
            generation,
            format!(
                "edge [{}, {}) of child {} is empty",
                edge.left, edge.right, edge.child
            ),
        );
    }
    Ok(())
}

/// Every edge links a parent born in the generation before
/// its child's to a child born in generations `1..=ngens`.
///
/// With [``EdgesPerGeneration::Exactly``], the edge table must
/// also be the generations' edges in birth order, each
/// generation contributing exactly that many.
pub fn check_edges(
    popsize: u32,
    ngens: i64,
    nodes: &[Node],
    edges: &[Edge],
    expected: EdgesPerGeneration,
) -> WfArgResult<()> {
    let num_gens = check_ngens(ngens)?;
    match expected {
        EdgesPerGeneration::Exactly(n) => {
            if n.checked_mul(num_gens) != Some(edges.len()) {
                return invariant_violation(
                    ngens,
                    format!(
                        "{} edges recorded, expected {} per generation",
                        edges.len(),
                        n
                    ),
                );
            }
            for generation in 1..=ngens {
                let start = (generation as usize - 1) * n;
                for edge in &edges[start..start + n] {
                    check_edge(popsize, generation, edge)?;
                }
            }
        }
        EdgesPerGeneration::Variable => {
            for edge in edges {
                let generation = usize::try_from(edge.child)
                    .ok()
                    .and_then(|i| nodes.get(i))
                    .and_then(node_generation);
                match generation {
                    Some(g) if g >= 1 && g <= ngens => check_edge(popsize, g, edge)?,
                    _ => {
                        return invariant_violation(
                            -1,
                            format!("child {} has no valid birth time", edge.child),
                        )
                    }
                }
            }
        }
    }
    Ok(())
}

/// The living chromosomes after `ngens` generations are
/// exactly the ids `[2N·ngens, 2N·ngens + 2N)`, in order.
pub fn check_samples(popsize: u32, ngens: i64, alive: &[NodeId]) -> WfArgResult<()> {
    check_ngens(ngens)?;
    let expected = id_range(popsize, ngens)?;
    if alive.len() as u64 != expected.end - expected.start
        || !alive
            .iter()
            .zip(expected.clone())
            .all(|(a, e)| u64::from(a.raw()) == e)
    {
        return invariant_violation(
            ngens,
            format!("sample set is not the id range {:?}", expected),
        );
    }
    Ok(())
}

/// A subset of the final generation: sorted, unique, and in range.
pub fn check_sample_subset(popsize: u32, ngens: i64, samples: &[NodeId]) -> WfArgResult<()> {
    check_ngens(ngens)?;
    let expected = id_range(popsize, ngens)?;
    if let Some(s) = samples
        .iter()
        .find(|s| !expected.contains(&u64::from(s.raw())))
    {
        return invariant_violation(ngens, format!("sample {} outside {:?}", s, expected));
    }
    if !samples.windows(2).all(|w| w[0] < w[1]) {
        return invariant_violation(ngens, "samples are not sorted and unique");
    }
    Ok(())
}

/// Run [``check_nodes``], [``check_edges``], and [``check_samples``].
pub fn expensive_check(
    popsize: u32,
    ngens: i64,
    tracker: &AncestryTracker,
    alive: &[NodeId],
    expected: EdgesPerGeneration,
) -> WfArgResult<()> {
    if expected == EdgesPerGeneration::Variable {
        log::warn!("edges per generation vary, so per-generation edge counts are not audited");
    }
    check_nodes(popsize, ngens, tracker.nodes())?;
    check_edges(popsize, ngens, tracker.nodes(), tracker.edges(), expected)?;
    check_samples(popsize, ngens, alive)?;
    log::info!(
        "audit passed: {} nodes, {} edges, {} generations",
        tracker.num_nodes(),
        tracker.num_edges(),
        ngens
    );
    Ok(())
}
