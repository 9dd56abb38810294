//! # Composite Newton-Cotes engine
//!
//! Every rule of the family is the same procedure with different parameters:
//! partition `[a, b]` into `n` subintervals of width `h`, visit node indices in a list of
//! passes, weight each value `f(x_i)` by a coefficient that depends on `i` and `n`,
//! accumulate, and multiply the sum by a scale factor depending on `h`.
//!
//! The passes may visit indices in any order (Simpson rules group them by coefficient);
//! the iteration table is always sorted by node index before it is returned.
//!
//! Any evaluation failure aborts the whole procedure: no partial table is produced.

use crate::symbolic::evaluator::{EvalError, ExpressionEvaluator, InputFormat};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// largest number of subintervals a rule accepts
pub const MAX_SUBINTERVALS: usize = 10_000_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuadratureError {
    #[error("{0}")]
    Input(String),
    #[error("error evaluating the function at x = {x}: {source}")]
    Evaluation { x: f64, source: EvalError },
}

/// One row of the iteration table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationNode {
    pub i: usize,
    pub xi: f64,
    #[serde(rename = "f(xi)")]
    pub fxi: f64,
    #[serde(rename = "coeficiente")]
    pub coefficient: i32,
    #[serde(rename = "f(xi) * coef")]
    pub weighted: f64,
}

/// A node seen from inside one Boole segment, with its local label `x0`..`x4`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentPoint {
    #[serde(rename = "punto")]
    pub label: String,
    pub i: usize,
    pub x: f64,
    #[serde(rename = "f(x)")]
    pub fx: f64,
    #[serde(rename = "coeficiente")]
    pub coefficient: i32,
    #[serde(rename = "f(x) * coef")]
    pub weighted: f64,
}

/// Five consecutive nodes integrated together by the Boole rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// 1-based
    #[serde(rename = "segmento")]
    pub index: usize,
    #[serde(rename = "intervalo")]
    pub interval: [f64; 2],
    #[serde(rename = "valor")]
    pub value: f64,
    #[serde(rename = "puntos")]
    pub points: Vec<SegmentPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadratureResult {
    #[serde(rename = "resultado")]
    pub result: f64,
    #[serde(rename = "metodo")]
    pub method: String,
    #[serde(rename = "funcion")]
    pub function: String,
    #[serde(rename = "formato")]
    pub format: InputFormat,
    pub a: f64,
    pub b: f64,
    /// effective number of subintervals, after the rule's correction
    pub n: usize,
    pub h: f64,
    #[serde(rename = "tabla_iteracion")]
    pub table: Vec<EvaluationNode>,
    #[serde(
        rename = "segmentos",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub segments: Option<Vec<Segment>>,
    pub formula: String,
}

/// Uniform partition of `[a, b]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub a: f64,
    pub b: f64,
    pub n: usize,
    pub h: f64,
}

impl Grid {
    /// `n` must be positive
    pub fn new(a: f64, b: f64, n: usize) -> Self {
        Self {
            a,
            b,
            n,
            h: (b - a) / n as f64,
        }
    }

    /// `x_n` is `b` itself, not `a + n*h`
    pub fn abscissa(&self, i: usize) -> f64 {
        if i == self.n {
            self.b
        } else {
            self.a + i as f64 * self.h
        }
    }
}

/// Indices `start, start + step, ...` strictly below `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexPass {
    pub start: usize,
    pub stop: usize,
    pub step: usize,
}

impl IndexPass {
    pub fn new(start: usize, stop: usize, step: usize) -> Self {
        Self {
            start,
            stop,
            step: step.max(1),
        }
    }

    pub fn single(i: usize) -> Self {
        Self::new(i, i + 1, 1)
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> {
        (self.start..self.stop).step_by(self.step)
    }
}

/// Parameters of one composite rule.
pub struct CompositeScheme {
    /// visiting order; also the accumulation order of the weighted sum
    pub passes: Vec<IndexPass>,
    /// coefficient of node `i` for a partition into `n` subintervals
    pub coefficient: fn(usize, usize) -> i32,
    /// factor applied to the weighted sum, as a function of `h`
    pub scale: fn(f64) -> f64,
}

/// Evaluates the function at `x`, attaching `x` to a failure.
pub fn evaluate_at(evaluator: &ExpressionEvaluator, x: f64) -> Result<f64, QuadratureError> {
    evaluator
        .eval(x)
        .map_err(|source| QuadratureError::Evaluation { x, source })
}

/// Runs the passes of `scheme` over `grid`: returns the scaled weighted sum and the
/// iteration table ordered by node index.
pub fn integrate_composite(
    evaluator: &ExpressionEvaluator,
    grid: &Grid,
    scheme: &CompositeScheme,
) -> Result<(f64, Vec<EvaluationNode>), QuadratureError> {
    let mut sum = 0.0;
    let mut table = Vec::new();
    for pass in &scheme.passes {
        for i in pass.indices() {
            let xi = grid.abscissa(i);
            let fxi = evaluate_at(evaluator, xi)?;
            let coefficient = (scheme.coefficient)(i, grid.n);
            let weighted = coefficient as f64 * fxi;
            sum += weighted;
            table.push(EvaluationNode {
                i,
                xi,
                fxi,
                coefficient,
                weighted,
            });
        }
    }
    debug!("{} nodes evaluated, weighted sum {}", table.len(), sum);
    table.sort_by_key(|node| node.i);
    Ok(((scheme.scale)(grid.h) * sum, table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_pass() {
        let odd: Vec<usize> = IndexPass::new(1, 8, 2).indices().collect();
        assert_eq!(odd, vec![1, 3, 5, 7]);
        let one: Vec<usize> = IndexPass::single(6).indices().collect();
        assert_eq!(one, vec![6]);
        assert_eq!(IndexPass::new(3, 3, 3).indices().count(), 0);
    }

    #[test]
    fn test_grid_ends_exactly_at_b() {
        let grid = Grid::new(0.1, 0.7, 3);
        assert_eq!(grid.abscissa(0), 0.1);
        assert_eq!(grid.abscissa(3), 0.7);
        assert_eq!(grid.h, (0.7 - 0.1) / 3.0);
    }

    #[test]
    fn test_table_is_sorted_whatever_the_pass_order() {
        let evaluator = ExpressionEvaluator::new("x", InputFormat::Native).unwrap();
        let grid = Grid::new(0.0, 4.0, 4);
        let scheme = CompositeScheme {
            passes: vec![
                IndexPass::single(4),
                IndexPass::new(1, 4, 2),
                IndexPass::single(0),
                IndexPass::new(2, 4, 2),
            ],
            coefficient: |_, _| 1,
            scale: |h| h,
        };
        let (value, table) = integrate_composite(&evaluator, &grid, &scheme).unwrap();
        let indices: Vec<usize> = table.iter().map(|node| node.i).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(value, 10.0);
    }

    #[test]
    fn test_failure_reports_the_abscissa() {
        let evaluator = ExpressionEvaluator::new("1/(x - 1)", InputFormat::Native).unwrap();
        let grid = Grid::new(0.0, 2.0, 2);
        let scheme = CompositeScheme {
            passes: vec![IndexPass::new(0, 3, 1)],
            coefficient: |_, _| 1,
            scale: |h| h,
        };
        match integrate_composite(&evaluator, &grid, &scheme) {
            Err(QuadratureError::Evaluation { x, .. }) => assert_eq!(x, 1.0),
            other => panic!("expected an evaluation error, got {:?}", other),
        }
    }
}
