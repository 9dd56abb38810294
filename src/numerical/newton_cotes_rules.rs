//! # Newton-Cotes rules
//!
//! | rule | n | coefficients | scale |
//! |---|---|---|---|
//! | trapezoidal | any, 0 → 1 | 1, 2, 2, ..., 2, 1 | h/2 |
//! | Boole | multiple of 4 (rounded down, minimum 4) | 7, 32, 12, 32, 7 per segment | 2h/45 per segment |
//! | Simpson 3/8 | multiple of 3 (rounded down, minimum 3) | 1, 3, 3, 2, 3, 3, 2, ..., 1 | 3h/8 |
//! | Simpson 1/3 | even (odd rounded up, minimum 2) | 1, 4, 2, 4, ..., 4, 1 | h/3 |
//! | open Simpson 1/3 | always 4, ends never evaluated | 2, -1, 2 | 4h/3 |
//!
//! Simpson 3/8 and 1/3 visit the nodes grouped by coefficient: first `x_0`, then the
//! interior classes, then `x_n`. The Boole table lists each node once, with the
//! coefficient it accumulates over the segments sharing it (14 on inner segment borders);
//! the per-segment view is kept in the result's `segmentos`.
//! ```
//! use RustedNewtonCotes::numerical::newton_cotes_rules::NewtonCotesRule;
//! use RustedNewtonCotes::symbolic::evaluator::InputFormat;
//! let res = NewtonCotesRule::Simpson13
//!     .integrate("x**3", InputFormat::Native, 0.0, 1.0, 2)
//!     .unwrap();
//! assert!((res.result - 0.25).abs() < 1e-15);
//! ```

use crate::numerical::newton_cotes::{
    CompositeScheme, EvaluationNode, Grid, IndexPass, MAX_SUBINTERVALS, QuadratureError,
    QuadratureResult, Segment, SegmentPoint, integrate_composite,
};
use crate::symbolic::evaluator::{ExpressionEvaluator, InputFormat};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// local Boole weights of the five nodes of a segment
const BOOLE_WEIGHTS: [i32; 5] = [7, 32, 12, 32, 7];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum NewtonCotesRule {
    #[strum(serialize = "trapecio")]
    #[serde(rename = "trapecio")]
    Trapezoidal,
    #[strum(serialize = "boole")]
    #[serde(rename = "boole")]
    Boole,
    #[strum(serialize = "simpson38")]
    #[serde(rename = "simpson38")]
    Simpson38,
    #[strum(serialize = "simpson13")]
    #[serde(rename = "simpson13")]
    Simpson13,
    #[strum(serialize = "simpson_abierto")]
    #[serde(rename = "simpson_abierto")]
    OpenSimpson13,
}

impl NewtonCotesRule {
    /// name reported in `metodo`
    pub fn display_name(&self) -> &'static str {
        match self {
            NewtonCotesRule::Trapezoidal => "Trapecio",
            NewtonCotesRule::Boole => "Jorge Boole",
            NewtonCotesRule::Simpson38 => "Simpson 3/8",
            NewtonCotesRule::Simpson13 => "Simpson 1/3",
            NewtonCotesRule::OpenSimpson13 => "Simpson Abierto 1/3",
        }
    }

    pub fn formula(&self) -> &'static str {
        match self {
            NewtonCotesRule::Trapezoidal => {
                "(h/2) * [f(a) + 2*f(x1) + 2*f(x2) + ... + 2*f(xn-1) + f(b)]"
            }
            NewtonCotesRule::Boole => "(2h/45)[7f(x₀) + 32f(x₁) + 12f(x₂) + 32f(x₃) + 7f(x₄)]",
            NewtonCotesRule::Simpson38 => {
                "(3h/8) * [f(x0) + 3f(x1) + 3f(x2) + 2f(x3) + 3f(x4) + ... + f(xn)]"
            }
            NewtonCotesRule::Simpson13 => {
                "(h/3) * [f(x0) + 4f(x1) + 2f(x2) + 4f(x3) + ... + f(xn)]"
            }
            NewtonCotesRule::OpenSimpson13 => "(4h/3) [2f(x₁) - f(x₂) + 2f(x₃)]",
        }
    }

    /// Number of subintervals actually used for a requested `n`.
    pub fn effective_n(&self, n: usize) -> usize {
        match self {
            NewtonCotesRule::Trapezoidal => n.max(1),
            NewtonCotesRule::Boole => round_down_to_multiple(n, 4),
            NewtonCotesRule::Simpson38 => round_down_to_multiple(n, 3),
            NewtonCotesRule::Simpson13 => match n {
                0 => 2,
                n if n % 2 == 1 => n + 1,
                n => n,
            },
            NewtonCotesRule::OpenSimpson13 => 4,
        }
    }

    /// Integrates `expression` over `[a, b]`, parsing the expression once.
    pub fn integrate(
        &self,
        expression: &str,
        format: InputFormat,
        a: f64,
        b: f64,
        n: usize,
    ) -> Result<QuadratureResult, QuadratureError> {
        if expression.trim().is_empty() {
            return Err(QuadratureError::Input("the function is missing".to_string()));
        }
        let evaluator = ExpressionEvaluator::new(expression, format)
            .map_err(|e| QuadratureError::Input(e.to_string()))?;
        self.integrate_with(&evaluator, a, b, n)
    }

    /// Same as [`NewtonCotesRule::integrate`] with an already prepared evaluator.
    pub fn integrate_with(
        &self,
        evaluator: &ExpressionEvaluator,
        a: f64,
        b: f64,
        n: usize,
    ) -> Result<QuadratureResult, QuadratureError> {
        if !(a.is_finite() && b.is_finite()) {
            return Err(QuadratureError::Input(
                "a and b must be finite numbers".to_string(),
            ));
        }
        if n > MAX_SUBINTERVALS {
            return Err(QuadratureError::Input(format!(
                "n = {} exceeds the limit of {} subintervals",
                n, MAX_SUBINTERVALS
            )));
        }
        let n_effective = self.effective_n(n);
        if n_effective != n && *self != NewtonCotesRule::OpenSimpson13 {
            warn!(
                "{}: n = {} is not admissible, using n = {}",
                self.display_name(),
                n,
                n_effective
            );
        }
        // the open rule has n = 4 as well: h = (b - a)/4
        let grid = Grid::new(a, b, n_effective);
        debug!(
            "{} of '{}' on [{}, {}], n = {}, h = {}",
            self.display_name(),
            evaluator.text(),
            a,
            b,
            grid.n,
            grid.h
        );

        let (result, table, segments) = match self {
            NewtonCotesRule::Boole => {
                let (merged, table) = integrate_composite(evaluator, &grid, &self.scheme(grid.n))?;
                let segments = boole_segments(&grid, &table);
                let result: f64 = segments.iter().map(|segment| segment.value).sum();
                debug!("Boole: sum of segments {}, merged weights {}", result, merged);
                (result, table, Some(segments))
            }
            _ => {
                let (result, table) = integrate_composite(evaluator, &grid, &self.scheme(grid.n))?;
                (result, table, None)
            }
        };
        info!(
            "{}: n = {}, h = {}, integral = {}",
            self.display_name(),
            grid.n,
            grid.h,
            result
        );
        Ok(QuadratureResult {
            result,
            method: self.display_name().to_string(),
            function: evaluator.text().to_string(),
            format: evaluator.format(),
            a,
            b,
            n: grid.n,
            h: grid.h,
            table,
            segments,
            formula: self.formula().to_string(),
        })
    }

    /// Passes, coefficients and scale of the rule for `n` subintervals.
    pub fn scheme(&self, n: usize) -> CompositeScheme {
        match self {
            NewtonCotesRule::Trapezoidal => CompositeScheme {
                passes: vec![
                    IndexPass::single(0),
                    IndexPass::new(1, n, 1),
                    IndexPass::single(n),
                ],
                coefficient: |i, n| if i == 0 || i == n { 1 } else { 2 },
                scale: |h| h / 2.0,
            },
            NewtonCotesRule::Boole => CompositeScheme {
                passes: vec![IndexPass::new(0, n + 1, 1)],
                coefficient: boole_merged_coefficient,
                scale: |h| 2.0 * h / 45.0,
            },
            NewtonCotesRule::Simpson38 => CompositeScheme {
                passes: vec![
                    IndexPass::single(0),
                    IndexPass::new(1, n, 3),
                    IndexPass::new(2, n, 3),
                    IndexPass::new(3, n, 3),
                    IndexPass::single(n),
                ],
                coefficient: |i, n| match i {
                    i if i == 0 || i == n => 1,
                    i if i % 3 == 0 => 2,
                    _ => 3,
                },
                scale: |h| 3.0 * h / 8.0,
            },
            NewtonCotesRule::Simpson13 => CompositeScheme {
                passes: vec![
                    IndexPass::single(0),
                    IndexPass::new(1, n, 2),
                    IndexPass::new(2, n, 2),
                    IndexPass::single(n),
                ],
                coefficient: |i, n| match i {
                    i if i == 0 || i == n => 1,
                    i if i % 2 == 1 => 4,
                    _ => 2,
                },
                scale: |h| h / 3.0,
            },
            NewtonCotesRule::OpenSimpson13 => CompositeScheme {
                passes: vec![IndexPass::new(1, 4, 1)],
                coefficient: |i, _| if i == 2 { -1 } else { 2 },
                scale: |h| 4.0 * h / 3.0,
            },
        }
    }
}

/// Largest positive multiple of `k` not above `n`, or `k` itself.
fn round_down_to_multiple(n: usize, k: usize) -> usize {
    ((n / k) * k).max(k)
}

/// Weight of node `i` summed over every Boole segment containing it.
fn boole_merged_coefficient(i: usize, n: usize) -> i32 {
    match i {
        i if i == 0 || i == n => 7,
        i if i % 4 == 0 => 14,
        i if i % 2 == 1 => 32,
        _ => 12,
    }
}

/// Splits an ordered Boole table `0..=n` into its segments of five nodes.
fn boole_segments(grid: &Grid, table: &[EvaluationNode]) -> Vec<Segment> {
    let h = grid.h;
    table
        .windows(5)
        .step_by(4)
        .enumerate()
        .map(|(k, nodes)| {
            let points: Vec<SegmentPoint> = nodes
                .iter()
                .zip(BOOLE_WEIGHTS)
                .enumerate()
                .map(|(local, (node, weight))| SegmentPoint {
                    label: format!("x{}", local),
                    i: node.i,
                    x: node.xi,
                    fx: node.fxi,
                    coefficient: weight,
                    weighted: weight as f64 * node.fxi,
                })
                .collect();
            let f: Vec<f64> = nodes.iter().map(|node| node.fxi).collect();
            let value = (2.0 * h / 45.0)
                * (7.0 * f[0] + 32.0 * f[1] + 12.0 * f[2] + 32.0 * f[3] + 7.0 * f[4]);
            Segment {
                index: k + 1,
                interval: [nodes[0].xi, nodes[4].xi],
                value,
                points,
            }
        })
        .collect()
}
