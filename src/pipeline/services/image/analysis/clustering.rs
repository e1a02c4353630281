//! Seeded k-means over weighted RGB points.
//!
//! Identical colors are collapsed into one point carrying their pixel count,
//! which yields the same centroids as clustering every pixel while keeping the
//! work proportional to the palette size.

use rand::distr::{weighted::WeightedIndex, Distribution};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{AnalysisError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedPoint {
    pub value: [f64; 3],
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    pub centroids: Vec<[f64; 3]>,
    pub inertia: f64,
}

#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    n_init: usize,
    max_iterations: usize,
    tolerance: f64,
    seed: u64,
}

impl KMeans {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            n_init: 10,
            max_iterations: 300,
            tolerance: 1e-4,
            seed,
        }
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init.max(1);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Best of `n_init` seeded runs, ranked by inertia
    pub fn fit(&self, points: &[WeightedPoint]) -> Result<Clustering> {
        if self.k == 0 || points.len() < self.k {
            return Err(AnalysisError::processing(format!(
                "k-means needs at least {} distinct points, got {}",
                self.k,
                points.len()
            )));
        }

        let shift_limit = self.tolerance * mean_variance(points);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<Clustering> = None;

        for _ in 0..self.n_init {
            let seeds = self.init_plus_plus(points, &mut rng)?;
            let run = self.lloyd(points, seeds, shift_limit);
            let improves = best
                .as_ref()
                .map_or(true, |current| run.inertia < current.inertia);
            if improves {
                best = Some(run);
            }
        }

        best.ok_or_else(|| AnalysisError::processing("k-means produced no clustering"))
    }

    // k-means++ seeding: each new centre is drawn proportionally to weight * D^2
    fn init_plus_plus(&self, points: &[WeightedPoint], rng: &mut StdRng) -> Result<Vec<[f64; 3]>> {
        let weights: Vec<f64> = points.iter().map(|p| p.weight).collect();
        let first = WeightedIndex::new(&weights)
            .map_err(|e| AnalysisError::processing(format!("k-means seeding failed: {e}")))?
            .sample(rng);

        let mut centroids = vec![points[first].value];
        let mut nearest: Vec<f64> = points
            .iter()
            .map(|p| squared_distance(&p.value, &centroids[0]))
            .collect();

        while centroids.len() < self.k {
            let scores: Vec<f64> = points
                .iter()
                .zip(&nearest)
                .map(|(p, d)| p.weight * d)
                .collect();
            let next = WeightedIndex::new(&scores)
                .map_err(|e| AnalysisError::processing(format!("k-means seeding failed: {e}")))?
                .sample(rng);

            let centre = points[next].value;
            for (d, p) in nearest.iter_mut().zip(points) {
                *d = d.min(squared_distance(&p.value, &centre));
            }
            centroids.push(centre);
        }

        Ok(centroids)
    }

    fn lloyd(&self, points: &[WeightedPoint], mut centroids: Vec<[f64; 3]>, shift_limit: f64) -> Clustering {
        let mut labels = vec![0usize; points.len()];

        for _ in 0..self.max_iterations {
            assign(points, &centroids, &mut labels);

            let mut sums = vec![[0.0f64; 3]; self.k];
            let mut totals = vec![0.0f64; self.k];
            for (p, &label) in points.iter().zip(&labels) {
                for c in 0..3 {
                    sums[label][c] += p.value[c] * p.weight;
                }
                totals[label] += p.weight;
            }

            let mut shift = 0.0;
            for (i, centre) in centroids.iter_mut().enumerate() {
                // an emptied cluster keeps its previous centre
                if totals[i] <= 0.0 {
                    continue;
                }
                let updated = [
                    sums[i][0] / totals[i],
                    sums[i][1] / totals[i],
                    sums[i][2] / totals[i],
                ];
                shift += squared_distance(centre, &updated);
                *centre = updated;
            }

            if shift <= shift_limit {
                break;
            }
        }

        let inertia = assign(points, &centroids, &mut labels);
        Clustering { centroids, inertia }
    }
}

/// Label every point with its nearest centroid and return the weighted inertia
fn assign(points: &[WeightedPoint], centroids: &[[f64; 3]], labels: &mut [usize]) -> f64 {
    let mut inertia = 0.0;
    for (p, label) in points.iter().zip(labels.iter_mut()) {
        let mut best = (0usize, f64::INFINITY);
        for (i, c) in centroids.iter().enumerate() {
            let d = squared_distance(&p.value, c);
            if d < best.1 {
                best = (i, d);
            }
        }
        *label = best.0;
        inertia += best.1 * p.weight;
    }
    inertia
}

fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (0..3).map(|i| (a[i] - b[i]).powi(2)).sum()
}

// Mean of the per-channel weighted variances, used to scale the tolerance
fn mean_variance(points: &[WeightedPoint]) -> f64 {
    let total: f64 = points.iter().map(|p| p.weight).sum();
    if total <= 0.0 {
        return 0.0;
    }

    let mut acc = 0.0;
    for c in 0..3 {
        let mu = points.iter().map(|p| p.value[c] * p.weight).sum::<f64>() / total;
        acc += points
            .iter()
            .map(|p| (p.value[c] - mu).powi(2) * p.weight)
            .sum::<f64>()
            / total;
    }
    acc / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(r: f64, g: f64, b: f64, weight: f64) -> WeightedPoint {
        WeightedPoint {
            value: [r, g, b],
            weight,
        }
    }

    #[test]
    fn separates_two_obvious_groups() {
        let points = vec![
            point(0.0, 250.0, 0.0, 10.0),
            point(0.0, 240.0, 10.0, 10.0),
            point(200.0, 100.0, 0.0, 5.0),
            point(210.0, 110.0, 0.0, 5.0),
        ];
        let clustering = KMeans::new(2, 42).fit(&points).unwrap();

        let mut centroids = clustering.centroids.clone();
        centroids.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert_eq!(centroids[0], [0.0, 245.0, 5.0]);
        assert_eq!(centroids[1], [205.0, 105.0, 0.0]);
    }

    #[test]
    fn same_seed_same_result() {
        let points: Vec<_> = (0..40)
            .map(|i| point((i * 6) as f64, (255 - i * 3) as f64, (i % 7) as f64 * 20.0, 1.0 + (i % 3) as f64))
            .collect();
        let a = KMeans::new(5, 42).fit(&points).unwrap();
        let b = KMeans::new(5, 42).fit(&points).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn k_equal_to_point_count_recovers_points() {
        let points = vec![point(1.0, 2.0, 3.0, 4.0), point(9.0, 9.0, 9.0, 1.0)];
        let clustering = KMeans::new(2, 7).fit(&points).unwrap();
        assert_eq!(clustering.inertia, 0.0);
    }

    #[test]
    fn too_few_points_is_an_error() {
        let points = vec![point(1.0, 2.0, 3.0, 1.0)];
        assert!(KMeans::new(2, 42).fit(&points).is_err());
    }
}
