use std::io::Write;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors::SGError, rules::RuleType, serialization::{deserialize, serialize, SerializationFormat}};

use super::{domain_transform::{CanonicalDomain, DomainTransform}, global_grid::{GlobalGrid, GlobalGridOptions}, local_polynomial_grid::{LocalPolynomialGrid, RefinementOptions}};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GridKind
{
    Global(GlobalGrid),
    LocalPolynomial(LocalPolynomialGrid),
}

///
/// A sparse grid of either kind together with an optional affine map from
/// the canonical domain onto the caller's box. Points, weights, evaluation
/// and integrals are all expressed in the caller's coordinates.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SparseGrid
{
    kind: GridKind,
    transform: Option<DomainTransform>,
}

impl SparseGrid
{
    pub fn make_global_grid(num_dimensions: usize, num_outputs: usize, depth: i32, rule: RuleType, options: &GlobalGridOptions) -> Result<Self, SGError>
    {
        let grid = GlobalGrid::new(num_dimensions, num_outputs, depth, rule, options)?;
        Ok(Self { kind: GridKind::Global(grid), transform: None })
    }

    /// A single tensor product with `levels[d]` in dimension `d`.
    pub fn make_full_tensor_grid(num_dimensions: usize, num_outputs: usize, levels: &[i32], rule: RuleType, alpha: f64, beta: f64) -> Result<Self, SGError>
    {
        let grid = GlobalGrid::new_full_tensor(num_dimensions, num_outputs, levels, rule, alpha, beta)?;
        Ok(Self { kind: GridKind::Global(grid), transform: None })
    }

    pub fn make_local_polynomial_grid(num_dimensions: usize, num_outputs: usize, depth: i32, order: i32, rule: RuleType) -> Result<Self, SGError>
    {
        let grid = LocalPolynomialGrid::new(num_dimensions, num_outputs, depth, order, rule)?;
        Ok(Self { kind: GridKind::LocalPolynomial(grid), transform: None })
    }

    pub fn kind(&self) -> &GridKind
    {
        &self.kind
    }

    ///
    /// Maps the canonical domain of dimension `d` using `(lower[d], upper[d])`.
    /// Bounded rules map [-1, 1] onto the interval. Gauss-Hermite and
    /// Gauss-Laguerre take `lower` as the shift and `upper` as the positive
    /// rate of their weight.
    ///
    pub fn set_transform_ab(&mut self, lower: &[f64], upper: &[f64]) -> Result<(), SGError>
    {
        if lower.len() != self.num_dimensions()
        {
            return Err(SGError::DimensionMismatch { expected: self.num_dimensions(), found: lower.len() });
        }
        let domain = match &self.kind
        {
            GridKind::Global(grid) => CanonicalDomain::of(grid.rule_type(), grid.rule().family().parameters().0),
            GridKind::LocalPolynomial(_) => CanonicalDomain::Interval,
        };
        self.transform = Some(DomainTransform::new(domain, lower, upper)?);
        Ok(())
    }

    pub fn transform_ab(&self) -> Option<(&[f64], &[f64])>
    {
        self.transform.as_ref().map(|t| (t.lower.as_slice(), t.upper.as_slice()))
    }

    pub fn clear_transform_ab(&mut self)
    {
        self.transform = None;
    }

    pub fn num_dimensions(&self) -> usize
    {
        match &self.kind
        {
            GridKind::Global(grid) => grid.num_dimensions(),
            GridKind::LocalPolynomial(grid) => grid.num_dimensions(),
        }
    }

    pub fn num_outputs(&self) -> usize
    {
        match &self.kind
        {
            GridKind::Global(grid) => grid.num_outputs(),
            GridKind::LocalPolynomial(grid) => grid.num_outputs(),
        }
    }

    pub fn num_points(&self) -> usize
    {
        match &self.kind
        {
            GridKind::Global(grid) => grid.num_points(),
            GridKind::LocalPolynomial(grid) => grid.num_points(),
        }
    }

    pub fn num_needed_points(&self) -> usize
    {
        match &self.kind
        {
            GridKind::Global(grid) => grid.num_needed_points(),
            GridKind::LocalPolynomial(grid) => grid.num_needed_points(),
        }
    }

    pub fn rule_type(&self) -> RuleType
    {
        match &self.kind
        {
            GridKind::Global(grid) => grid.rule_type(),
            GridKind::LocalPolynomial(grid) => grid.rule_type(),
        }
    }

    pub fn rule_description(&self) -> &'static str
    {
        self.rule_type().description()
    }

    fn to_real(&self, mut points: Vec<f64>) -> Vec<f64>
    {
        if let Some(transform) = &self.transform
        {
            transform.to_real(&mut points);
        }
        points
    }

    fn volume_scale(&self) -> f64
    {
        self.transform.as_ref().map_or(1.0, |t| t.volume_scale())
    }

    fn check_point(&self, x: &[f64]) -> Result<(), SGError>
    {
        if x.len() != self.num_dimensions()
        {
            Err(SGError::DimensionMismatch { expected: self.num_dimensions(), found: x.len() })
        }
        else
        {
            Ok(())
        }
    }

    /// Coordinates of the loaded points, `[point][dimension]`.
    pub fn points(&self) -> Vec<f64>
    {
        let points = match &self.kind
        {
            GridKind::Global(grid) => grid.points(),
            GridKind::LocalPolynomial(grid) => grid.points(),
        };
        self.to_real(points)
    }

    /// Coordinates of the points waiting for values.
    pub fn needed_points(&self) -> Vec<f64>
    {
        let points = match &self.kind
        {
            GridKind::Global(grid) => grid.needed_points(),
            GridKind::LocalPolynomial(grid) => grid.needed_points(),
        };
        self.to_real(points)
    }

    /// Quadrature weights in the order of `points()`.
    pub fn weights(&self) -> Vec<f64>
    {
        let mut weights = match &self.kind
        {
            GridKind::Global(grid) => grid.quadrature_weights().to_vec(),
            GridKind::LocalPolynomial(grid) => grid.quadrature_weights(),
        };
        let scale = self.volume_scale();
        weights.iter_mut().for_each(|w| *w *= scale);
        weights
    }

    /// Values for the needed points, `[point][output]`.
    pub fn load_needed_points(&mut self, values: &[f64]) -> Result<(), SGError>
    {
        match &mut self.kind
        {
            GridKind::Global(grid) => grid.load_needed_points(values),
            GridKind::LocalPolynomial(grid) => grid.load_needed_points(values),
        }
    }

    pub fn evaluate(&self, x: &[f64]) -> Result<Vec<f64>, SGError>
    {
        self.check_point(x)?;
        let canonical;
        let x = match &self.transform
        {
            Some(transform) =>
            {
                canonical = transform.to_canonical(x);
                canonical.as_slice()
            }
            None => x,
        };
        match &self.kind
        {
            GridKind::Global(grid) => grid.evaluate(x),
            GridKind::LocalPolynomial(grid) => grid.evaluate(x),
        }
    }

    ///
    /// Evaluates every point of `x` (`[point][dimension]`) in parallel, returning
    /// `[point][output]` in the same order.
    ///
    pub fn evaluate_batch(&self, x: &[f64]) -> Result<Vec<f64>, SGError>
    {
        let ndim = self.num_dimensions();
        if x.len() % ndim != 0
        {
            return Err(SGError::DimensionMismatch { expected: ndim, found: x.len() % ndim });
        }
        let results: Vec<Vec<f64>> = x.par_chunks_exact(ndim).map(|point| self.evaluate(point)).collect::<Result<_, _>>()?;
        Ok(results.concat())
    }

    pub fn integrate(&self) -> Result<Vec<f64>, SGError>
    {
        let mut result = match &self.kind
        {
            GridKind::Global(grid) => grid.integrate()?,
            GridKind::LocalPolynomial(grid) => grid.integrate()?,
        };
        let scale = self.volume_scale();
        result.iter_mut().for_each(|r| *r *= scale);
        Ok(result)
    }

    /// Weights `w` such that the interpolant at `x` equals `sum_i w_i f(point_i)`.
    pub fn interpolant_weights(&self, x: &[f64]) -> Result<Vec<f64>, SGError>
    {
        self.check_point(x)?;
        let x = match &self.transform
        {
            Some(transform) => transform.to_canonical(x),
            None => x.to_vec(),
        };
        match &self.kind
        {
            GridKind::Global(grid) => grid.interpolant_weights(&x),
            GridKind::LocalPolynomial(grid) => grid.interpolant_weights(&x),
        }
    }

    /// Proposes new needed points. Only local polynomial grids refine.
    pub fn set_refinement(&mut self, options: &RefinementOptions) -> Result<(), SGError>
    {
        match &mut self.kind
        {
            GridKind::Global(grid) => Err(SGError::UnsupportedRule(grid.rule_type())),
            GridKind::LocalPolynomial(grid) => grid.set_refinement(options),
        }
    }

    /// Switches a local polynomial grid to basis `order`, keeping its points and values.
    pub fn update_order(&mut self, order: i32) -> Result<(), SGError>
    {
        match &mut self.kind
        {
            GridKind::Global(grid) => Err(SGError::UnsupportedRule(grid.rule_type())),
            GridKind::LocalPolynomial(grid) => grid.update_order(order),
        }
    }

    /// Writes a snapshot of the grid to `path`.
    pub fn write(&self, path: &str, format: SerializationFormat) -> Result<(), SGError>
    {
        let mut file = std::io::BufWriter::new(std::fs::File::create(path).map_err(|_| SGError::FileIOError)?);
        file.write_all(&serialize(self, format)?).map_err(|_| SGError::WriteBufferFailed)?;
        file.flush().map_err(|_| SGError::WriteBufferFailed)
    }

    pub fn read_buffer(buffer: &[u8], format: SerializationFormat) -> Result<Self, SGError>
    {
        deserialize(buffer, format)
    }

    pub fn read<Reader: std::io::Read>(mut reader: Reader, format: SerializationFormat) -> Result<Self, SGError>
    {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|_| SGError::ReadBufferFailed)?;
        Self::read_buffer(&bytes, format)
    }
}
