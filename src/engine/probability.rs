//! Per-cell ship frequency over the hypothesis population.

use core::fmt;
use rayon::prelude::*;

use crate::engine::population::Hypothesis;

/// Empirical probability that each cell holds a ship.
///
/// Rebuilt from scratch for every move decision.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityMap {
    width: usize,
    height: usize,
    values: Vec<f64>,
    samples: usize,
}

impl ProbabilityMap {
    /// Fraction of `hypotheses` with a ship at each cell; all zero when the
    /// population is empty.
    pub fn from_hypotheses(width: usize, height: usize, hypotheses: &[Hypothesis]) -> Self {
        let area = width * height;
        let counts = hypotheses
            .par_iter()
            .fold(
                || vec![0u32; area],
                |mut acc, h| {
                    for (x, y) in h.iter_set_bits() {
                        acc[y * width + x] += 1;
                    }
                    acc
                },
            )
            .reduce(
                || vec![0u32; area],
                |mut a, b| {
                    for (l, r) in a.iter_mut().zip(b) {
                        *l += r;
                    }
                    a
                },
            );

        let samples = hypotheses.len();
        let values = if samples == 0 {
            vec![0.0; area]
        } else {
            let n = samples as f64;
            counts.into_iter().map(|c| c as f64 / n).collect()
        };
        Self {
            width,
            height,
            values,
            samples,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Population size the map was derived from.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Probability at (x, y); zero outside the board.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        if x < self.width && y < self.height {
            self.values[y * self.width + x]
        } else {
            0.0
        }
    }

    /// Row-major values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Expected number of ship cells per hypothesis.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl fmt::Display for ProbabilityMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{:>4.0}", self.get(x, y) * 100.0)?;
            }
            if y + 1 < self.height {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
