use crate::aggregate::MatrixPair;
use crate::config::PolarizationConfig;
use crate::events::{EngineEvent, EventBus};
use hashbrown::HashSet;
use polarix_core::{ClusterSolution, PolarizationResult, RandomSource, absdiff, ranks_descending};
use polarix_error::PolarixResult;

/// Length of the lookback window for the convergence test, and the earliest
/// generation at which it may fire.
const CONVERGENCE_WINDOW: usize = 10;

/// A roulette wheel over (shifted) quality scores.
///
/// Negative scores are shifted up by the minimum so every weight is
/// non-negative; an all-zero wheel degrades to uniform selection.
pub(crate) struct ProbabilityWheel {
    cdf: Vec<f64>,
}

impl ProbabilityWheel {
    pub fn new(scores: &[f64]) -> Self {
        let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let shifted: Vec<f64> = if min < 0.0 {
            scores.iter().map(|q| q - min).collect()
        } else {
            scores.to_vec()
        };

        let total: f64 = shifted.iter().sum();
        let weights = if total > 0.0 {
            shifted
        } else {
            vec![1.0; scores.len()]
        };

        let mut cdf = Vec::with_capacity(weights.len());
        let mut running = 0.0;
        for w in weights {
            running += w;
            cdf.push(running);
        }

        ProbabilityWheel { cdf }
    }

    /// One spin: an index drawn with probability proportional to its weight.
    pub fn spin(&self, rng: &mut RandomSource) -> usize {
        let total = match self.cdf.last() {
            Some(&total) => total,
            None => return 0,
        };

        let draw = rng.random::<f64>() * total;
        let index = self.cdf.partition_point(|&c| c <= draw);
        index.min(self.cdf.len() - 1)
    }
}

/// One generation of the genetic optimizer.
///
/// `step` evaluates the parents, carries the top-ranked elites over
/// unchanged, fills the rest of the child generation by crossover with
/// hybrid roulette parent selection, and mutates every non-elite child with
/// a fixed number of cross-cluster pair swaps (which preserve cluster
/// sizes). Children that come out of crossover invalid are discarded and
/// replaced by fresh random solutions.
pub(crate) struct GeneticIteration<'a> {
    pair: &'a MatrixPair,
    bus: &'a EventBus,
    num_clusters: usize,
    num_elites: usize,
    num_mutations: usize,
    normalize: bool,
}

impl<'a> GeneticIteration<'a> {
    pub fn new(
        pair: &'a MatrixPair,
        bus: &'a EventBus,
        num_clusters: usize,
        num_elites: usize,
        num_mutations: usize,
        normalize: bool,
    ) -> Self {
        GeneticIteration {
            pair,
            bus,
            num_clusters,
            num_elites,
            num_mutations,
            normalize,
        }
    }

    /// Breeds the next generation. Returns the children along with the
    /// evaluated scores of the *parent* generation.
    pub fn step(
        &self,
        parents: &[ClusterSolution],
        rng: &mut RandomSource,
    ) -> PolarixResult<(Vec<ClusterSolution>, Vec<f64>)> {
        let population_size = parents.len();
        let n = self.pair.size();

        let mut scores = Vec::with_capacity(population_size);
        for parent in parents {
            scores.push(absdiff(
                parent.memberships(),
                &self.pair.congruence,
                &self.pair.conflict,
                self.normalize,
                self.num_clusters,
            )?);
        }

        // elites, best first
        let ranks = ranks_descending(&scores);
        let mut by_rank = vec![0; population_size];
        for (index, &rank) in ranks.iter().enumerate() {
            by_rank[rank] = index;
        }

        let mut children: Vec<ClusterSolution> = by_rank
            .iter()
            .take(self.num_elites)
            .map(|&index| parents[index].clone())
            .collect();

        let wheel = ProbabilityWheel::new(&scores);
        while children.len() < population_size {
            let a = wheel.spin(rng);
            let mut b = self.draw_mate(&wheel, population_size, rng);
            while b == a {
                b = self.draw_mate(&wheel, population_size, rng);
            }

            let mut child = parents[a].crossover(parents[b].memberships(), rng);
            if !child.is_valid() {
                let message = format!(
                    "crossover produced an invalid solution over {} nodes; replacing it",
                    n
                );
                tracing::error!("{}", message);
                self.bus.publish(EngineEvent::Error(message));
                child = ClusterSolution::random_balanced(n, self.num_clusters, rng);
            }

            children.push(child);
        }

        for child in children.iter_mut().skip(self.num_elites) {
            self.mutate(child, rng);
        }

        Ok((children, scores))
    }

    /// The second parent comes from the roulette wheel or uniformly at
    /// random, decided by a fair coin.
    fn draw_mate(
        &self,
        wheel: &ProbabilityWheel,
        population_size: usize,
        rng: &mut RandomSource,
    ) -> usize {
        if rng.bool(0.5) {
            wheel.spin(rng)
        } else {
            rng.range(0..population_size)
        }
    }

    /// Swaps the memberships of unique cross-cluster index pairs. A pair is
    /// identified by its sorted indices; rejected draws (same index, same
    /// cluster, already used) do not count toward the quota. The quota is
    /// capped by the number of distinct cross-cluster pairs.
    fn mutate(&self, solution: &mut ClusterSolution, rng: &mut RandomSource) {
        let n = solution.len();
        let same_cluster: usize = solution.counts().iter().map(|&s| s * s).sum();
        let available = (n * n - same_cluster) / 2;
        let quota = self.num_mutations.min(available);

        let mut used: HashSet<(usize, usize)> = HashSet::new();
        let memberships = solution.memberships_mut();

        while used.len() < quota {
            let i = rng.range(0..n);
            let j = rng.range(0..n);
            if i == j || memberships[i] == memberships[j] {
                continue;
            }

            let pair = if i < j { (i, j) } else { (j, i) };
            if !used.insert(pair) {
                continue;
            }

            memberships.swap(i, j);
        }
    }
}

/// Runs the genetic optimizer on one slice's matrix pair.
#[derive(Clone, Debug)]
pub struct GeneticDriver {
    num_clusters: usize,
    num_parents: usize,
    num_iterations: usize,
    elite_pct: f64,
    mut_pct: f64,
    normalize: bool,
}

impl GeneticDriver {
    pub fn from_config(config: &PolarizationConfig) -> Self {
        GeneticDriver {
            num_clusters: config.num_clusters,
            num_parents: config.num_parents,
            num_iterations: config.num_iterations,
            elite_pct: config.elite_pct,
            mut_pct: config.mut_pct,
            normalize: config.normalize_scores,
        }
    }

    /// Evolves the slice's partition and reports the quality trajectory.
    ///
    /// Slices with no more nodes than clusters, or with two empty networks,
    /// yield the degenerate result. Iteration stops early once the rounded
    /// (max, avg, sd) triple has shown a fully converged population for ten
    /// generations in a row; the recorded trajectories are then trimmed to
    /// the first generation of the final plateau.
    pub fn solve(
        &self,
        pair: &MatrixPair,
        seed: u64,
        bus: &EventBus,
    ) -> PolarixResult<PolarizationResult> {
        let n = pair.size();
        let (start, midpoint, stop) = (
            pair.congruence.start(),
            pair.congruence.midpoint(),
            pair.congruence.stop(),
        );

        if n <= self.num_clusters || pair.combined_norm()? == 0.0 {
            return Ok(PolarizationResult::degenerate(start, midpoint, stop));
        }

        let mut rng = RandomSource::seeded(seed);
        let num_elites = ((self.elite_pct * self.num_parents as f64).round() as usize).max(1);
        let num_mutations = (self.mut_pct * n as f64 / 2.0).round() as usize;

        let iteration = GeneticIteration::new(
            pair,
            bus,
            self.num_clusters,
            num_elites,
            num_mutations,
            self.normalize,
        );

        let mut population: Vec<ClusterSolution> = (0..self.num_parents)
            .map(|_| ClusterSolution::random_balanced(n, self.num_clusters, &mut rng))
            .collect();

        let mut max_q = Vec::with_capacity(self.num_iterations);
        let mut avg_q = Vec::with_capacity(self.num_iterations);
        let mut sd_q = Vec::with_capacity(self.num_iterations);
        let mut best_memberships = Vec::new();
        let mut early_convergence = false;

        for i in 0..self.num_iterations {
            let (children, scores) = iteration.step(&population, &mut rng)?;

            let mut max_index = 0;
            for (index, &score) in scores.iter().enumerate() {
                if score > scores[max_index] {
                    max_index = index;
                }
            }

            let avg = scores.iter().sum::<f64>() / scores.len() as f64;
            // spread statistic of the generation: the sum of
            // sqrt((q - avg)^2 / P) over the scores, which is not the
            // standard deviation
            let sd = scores
                .iter()
                .map(|q| ((q - avg).powi(2) / scores.len() as f64).sqrt())
                .sum::<f64>();

            max_q.push(scores[max_index]);
            avg_q.push(avg);
            sd_q.push(sd);
            best_memberships = population[max_index].memberships().to_vec();

            population = children;

            if i >= CONVERGENCE_WINDOW && self.converged(&max_q, &avg_q, &sd_q, i) {
                early_convergence = true;
                break;
            }
        }

        trim_plateau(&mut max_q, &mut avg_q, &mut sd_q);
        let final_q = max_q[max_q.len() - 1];

        Ok(PolarizationResult::new(
            max_q,
            avg_q,
            sd_q,
            final_q,
            best_memberships,
            pair.congruence.labels().to_vec(),
            early_convergence,
            start,
            midpoint,
            stop,
        ))
    }

    /// Converged iff the current rounded triple shows zero spread with max
    /// equal to avg, and the previous [CONVERGENCE_WINDOW] triples all equal
    /// the current one after rounding.
    fn converged(&self, max_q: &[f64], avg_q: &[f64], sd_q: &[f64], i: usize) -> bool {
        let current = (round2(max_q[i]), round2(avg_q[i]), round2(sd_q[i]));
        if current.2 != 0.0 || current.0 != current.1 {
            return false;
        }

        (i - CONVERGENCE_WINDOW..i)
            .all(|j| (round2(max_q[j]), round2(avg_q[j]), round2(sd_q[j])) == current)
    }
}

/// Cuts the trajectories back to the first generation whose best quality
/// already equals the final one.
fn trim_plateau(max_q: &mut Vec<f64>, avg_q: &mut Vec<f64>, sd_q: &mut Vec<f64>) {
    let last = max_q.len() - 1;
    let mut final_index = last;
    while final_index > 0 && max_q[final_index - 1] == max_q[last] {
        final_index -= 1;
    }

    max_q.truncate(final_index + 1);
    avg_q.truncate(final_index + 1);
    sd_q.truncate(final_index + 1);
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
