use crate::aggregate::MatrixPair;
use crate::config::PolarizationConfig;
use crate::events::EventBus;
use polarix_core::{ClusterSolution, PolarizationResult, RandomSource, absdiff};
use polarix_error::PolarixResult;

/// Runs the greedy pairwise-swap optimizer on one slice's matrix pair.
///
/// Starting from a random balanced partition, the driver sweeps all node
/// pairs in different clusters, keeps any swap that strictly improves the
/// quality, and repeats until a full sweep accepts nothing. Swaps exchange
/// two memberships, so cluster sizes never change.
#[derive(Clone, Debug)]
pub struct GreedyDriver {
    num_clusters: usize,
    normalize: bool,
}

impl GreedyDriver {
    pub fn from_config(config: &PolarizationConfig) -> Self {
        GreedyDriver {
            num_clusters: config.num_clusters,
            normalize: config.normalize_scores,
        }
    }

    pub fn solve(
        &self,
        pair: &MatrixPair,
        seed: u64,
        _bus: &EventBus,
    ) -> PolarixResult<PolarizationResult> {
        let n = pair.size();
        let (start, midpoint, stop) = (
            pair.congruence.start(),
            pair.congruence.midpoint(),
            pair.congruence.stop(),
        );

        if n < self.num_clusters || pair.combined_norm()? == 0.0 {
            return Ok(PolarizationResult::degenerate(start, midpoint, stop));
        }

        let mut rng = RandomSource::seeded(seed);
        let mut solution = ClusterSolution::random_balanced(n, self.num_clusters, &mut rng);
        let mut quality = self.quality(&solution, pair)?;
        let mut max_q = vec![quality];

        loop {
            let mut changed = false;

            for i in 0..n {
                for j in i + 1..n {
                    if solution.memberships()[i] == solution.memberships()[j] {
                        continue;
                    }

                    solution.memberships_mut().swap(i, j);
                    let candidate = self.quality(&solution, pair)?;

                    if candidate > quality {
                        quality = candidate;
                        max_q.push(quality);
                        changed = true;
                    } else {
                        solution.memberships_mut().swap(i, j);
                    }
                }
            }

            if !changed {
                break;
            }
        }

        // the hill climb has no population, so the mean trajectory mirrors
        // the best and the spread is zero throughout
        let avg_q = max_q.clone();
        let sd_q = vec![0.0; max_q.len()];

        Ok(PolarizationResult::new(
            max_q,
            avg_q,
            sd_q,
            quality,
            solution.memberships().to_vec(),
            pair.congruence.labels().to_vec(),
            true,
            start,
            midpoint,
            stop,
        ))
    }

    fn quality(&self, solution: &ClusterSolution, pair: &MatrixPair) -> PolarixResult<f64> {
        absdiff(
            solution.memberships(),
            &pair.congruence,
            &pair.conflict,
            self.normalize,
            self.num_clusters,
        )
    }
}
