use rand::Rng;
use wfarg_core::NodeId;

use crate::error::{configuration_error, WfArgResult};

/// Fill `samples` with the ids of all living chromosomes.
pub fn fill_samples(alive: &[NodeId], samples: &mut Vec<NodeId>) {
    samples.clear();
    samples.extend_from_slice(alive);
}

/// Choose `nsam` of the `alive` chromosomes, without replacement.
///
/// The returned ids are sorted.
///
/// # Errors
///
/// [``crate::WfArgError::ConfigurationError``] if `nsam > alive.len()`.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use wfarg::NodeId;
/// let alive = (10..20_u32).map(NodeId::from).collect::<Vec<_>>();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(6);
/// let samples = wfarg::subsample(&alive, 4, &mut rng).unwrap();
/// assert_eq!(samples.len(), 4);
/// assert!(samples.windows(2).all(|w| w[0] < w[1]));
/// assert!(wfarg::subsample(&alive, 11, &mut rng).is_err());
/// ```
pub fn subsample<R: Rng + ?Sized>(
    alive: &[NodeId],
    nsam: usize,
    rng: &mut R,
) -> WfArgResult<Vec<NodeId>> {
    if nsam > alive.len() {
        return configuration_error(format!(
            "sample size {} exceeds the number of chromosomes {}",
            nsam,
            alive.len()
        ));
    }
    let mut samples = rand::seq::index::sample(rng, alive.len(), nsam)
        .into_iter()
        .map(|i| alive[i])
        .collect::<Vec<_>>();
    samples.sort();
    Ok(samples)
}
