//! Data interchange to ``tskit`` format using [``tskit``].

use crate::error::WfArgResult;
use crate::tables::{AncestryTracker, TablesError};
use wfarg_core::{NodeId, Time};

fn to_tsk_node(id: NodeId) -> WfArgResult<tskit::NodeId> {
    match i32::try_from(id.raw()) {
        Ok(raw) => Ok(tskit::NodeId::from(raw)),
        Err(_) => Err(TablesError::IdOverflow.into()),
    }
}

/// Convert an [``AncestryTracker``](crate::AncestryTracker)
/// to ``tskit`` format.
///
/// # Parameters
///
/// * `tracker`: the recorded nodes and edges.
/// * `samples`: the nodes to flag as samples.
/// * `convert_time`: A callback to convert time, *e.g.* from forwards
///                   to backwards. For example, see
///                   [``simple_time_reverser``](crate::simple_time_reverser).
///
/// # Notes
///
/// The output edges are not sorted.
/// See [``sort_and_simplify``].
///
/// # Example
///
/// ```
/// let params = wfarg::SimulationParams {
///     popsize: 10,
///     nsteps: 2,
///     ..Default::default()
/// };
/// let output = wfarg::neutral_wf(params).unwrap();
/// let tables = wfarg::tskit_export::convert_to_tskit(
///     &output.tracker,
///     &output.samples,
///     wfarg::simple_time_reverser(wfarg::Time::from(2)),
/// )
/// .unwrap();
/// assert_eq!(tables.nodes().num_rows(), 60);
/// assert_eq!(tables.edges().num_rows(), 80);
/// assert_eq!(tables.populations().num_rows(), 1);
/// ```
pub fn convert_to_tskit(
    tracker: &AncestryTracker,
    samples: &[NodeId],
    convert_time: impl Fn(Time) -> f64,
) -> WfArgResult<tskit::TableCollection> {
    let mut tsk_tables = tskit::TableCollection::new(1.0)?;

    for e in tracker.edges() {
        tsk_tables.add_edge(
            f64::from(e.left),
            f64::from(e.right),
            to_tsk_node(e.parent)?,
            to_tsk_node(e.child)?,
        )?;
    }

    let mut is_sample = vec![false; tracker.num_nodes()];
    for s in samples {
        match is_sample.get_mut(s.raw() as usize) {
            Some(flag) => *flag = true,
            None => return Err(TablesError::UnallocatedNode { found: *s }.into()),
        }
    }

    let mut max_pop = -1_i32;
    for (i, n) in tracker.enumerate_nodes() {
        let flags = if is_sample[i] {
            tskit::NodeFlags::new_sample()
        } else {
            tskit::NodeFlags::default()
        };
        let population = n.population.raw();
        tsk_tables.add_node(
            flags,
            convert_time(n.generation),
            tskit::PopulationId::from(population),
            tskit::IndividualId::NULL,
        )?;
        max_pop = std::cmp::max(population, max_pop);
    }

    for _ in 0..=max_pop {
        tsk_tables.add_population()?;
    }

    Ok(tsk_tables)
}

/// Sort `tables` and simplify them with respect to `samples`.
///
/// Returns the map from input node ids to output node ids.
/// Nodes removed by simplification map to
/// [``tskit::NodeId::NULL``].
pub fn sort_and_simplify(
    tables: &mut tskit::TableCollection,
    samples: &[NodeId],
) -> WfArgResult<Vec<tskit::NodeId>> {
    let samples = samples
        .iter()
        .map(|s| to_tsk_node(*s))
        .collect::<WfArgResult<Vec<_>>>()?;
    tables.full_sort(tskit::TableSortOptions::default())?;
    let idmap = tables.simplify(&samples, tskit::SimplificationOptions::default(), true)?;
    Ok(idmap.map(|m| m.to_vec()).unwrap_or_default())
}
