use std::collections::VecDeque;

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{basis::{base::{OneDimensionalRule, RuleFamily}, global::{GlobalFamily, GlobalRule}}, errors::SGError, index_set::IndexSet, rules::{RuleType, TypeDepth}};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalGridOptions
{
    /// Tensor selection strategy
    pub depth_type: TypeDepth,
    /// Per dimension weights of the selection (all ones if `None`), each at least one
    pub anisotropic_weights: Option<Vec<i32>>,
    /// First rule parameter (Gegenbauer, Jacobi, Hermite and Laguerre)
    pub alpha: f64,
    /// Second rule parameter (Jacobi)
    pub beta: f64,
}

///
/// All tuples below `bounds` in lexicographic order, flattened.
///
pub(crate) fn cartesian_product(bounds: &[usize]) -> Vec<usize>
{
    let ndim = bounds.len();
    let total_combinations = bounds.iter().product::<usize>();
    let mut multi_indices = vec![0; total_combinations * ndim];
    for (i, current) in multi_indices.chunks_exact_mut(ndim).enumerate()
    {
        let mut index = i;
        for (j, &bound) in bounds.iter().rev().enumerate()
        {
            current[ndim - 1 - j] = index % bound;
            index /= bound;
        }
    }
    multi_indices
}

///
/// Combination coefficient of each tensor of a downward closed set,
/// `c_t = sum over e in {0,1}^D with t + e in the set of (-1)^|e|`.
///
pub(crate) fn smolyak_coefficients(tensors: &IndexSet) -> Vec<i32>
{
    let ndim = tensors.num_dimensions();
    let mut shifted = vec![0; ndim];
    tensors.iter().map(|tensor|
    {
        let mut coefficient = 0;
        for mask in 0..1_usize << ndim
        {
            for d in 0..ndim
            {
                shifted[d] = tensor[d] + ((mask >> d) & 1) as i32;
            }
            if tensors.contains(&shifted)
            {
                coefficient += if mask.count_ones() % 2 == 0 { 1 } else { -1 };
            }
        }
        coefficient
    }).collect()
}

///
/// Downward closed set of level tuples admitted by `depth_type`, grown
/// breadth first from the zero tuple.
///
fn select_tensors(family: &GlobalFamily, depth_type: TypeDepth, depth: i32, weights: &[i32]) -> Result<IndexSet, SGError>
{
    let ndim = weights.len();
    let depth = depth as i64;
    let admissible = |tensor: &[i32]| -> bool
    {
        let weighted = |cost: &dyn Fn(usize) -> i64| -> i64
        {
            tensor.iter().zip(weights).map(|(&l, &w)| w as i64 * cost(l as usize)).sum()
        };
        match depth_type
        {
            TypeDepth::Level => weighted(&|l| l as i64) <= depth,
            TypeDepth::Interpolation => weighted(&|l| family.basis_level(l) as i64) <= depth,
            TypeDepth::Quadrature => weighted(&|l| family.quadrature_exactness(l) as i64 - 1) <= depth,
            TypeDepth::Hyperbolic =>
            {
                let product: f64 = tensor.iter().zip(weights).map(|(&l, &w)| (l as f64 + 1.0).powi(w)).product();
                product <= (depth + 1) as f64
            }
        }
    };

    let root = vec![0; ndim];
    let mut visited: FxHashSet<Vec<i32>> = FxHashSet::default();
    let mut queue = VecDeque::new();
    let mut entries = root.clone();
    visited.insert(root.clone());
    queue.push_back(root);
    while let Some(tensor) = queue.pop_front()
    {
        for d in 0..ndim
        {
            let mut child = tensor.clone();
            child[d] += 1;
            if !visited.contains(&child) && admissible(&child)
            {
                entries.extend_from_slice(&child);
                visited.insert(child.clone());
                queue.push_back(child);
            }
        }
    }
    IndexSet::from_unsorted(ndim, &entries)
}

///
/// Node tuples of one tensor in lexicographic slot order, with the weight
/// each contributes to the quadrature.
///
fn tensor_contribution(rule: &GlobalRule, levels: &[i32], coefficient: f64) -> (Vec<i32>, Vec<f64>)
{
    let table = rule.table();
    let ndim = levels.len();
    let bounds: Vec<usize> = levels.iter().map(|&l| rule.num_points(l as usize)).collect();
    let slots = cartesian_product(&bounds);
    let mut nodes = Vec::with_capacity(slots.len());
    let mut weights = Vec::with_capacity(slots.len() / ndim);
    for slot in slots.chunks_exact(ndim)
    {
        let mut weight = coefficient;
        for d in 0..ndim
        {
            let level = levels[d] as usize;
            nodes.push(table.level_points(level)[slot[d]] as i32);
            weight *= table.level_weights(level)[slot[d]];
        }
        weights.push(weight);
    }
    (nodes, weights)
}

///
/// Sparse grid built by the Smolyak combination of tensor products of a one
/// dimensional rule. Points are tuples of node indices of the rule.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlobalGrid
{
    num_dimensions: usize,
    num_outputs: usize,
    depth: i32,
    options: GlobalGridOptions,
    rule: GlobalRule,
    tensors: IndexSet,
    active_tensors: IndexSet,
    coefficients: Vec<i32>,
    /// start of each active tensor in `tensor_points`
    tensor_offsets: Vec<usize>,
    /// point slot of each tensor point, tensor after tensor
    tensor_points: Vec<usize>,
    points: IndexSet,
    needed: IndexSet,
    values: Vec<f64>,
    weights: Vec<f64>,
}

impl GlobalGrid
{
    pub fn new(num_dimensions: usize, num_outputs: usize, depth: i32, rule: RuleType, options: &GlobalGridOptions) -> Result<Self, SGError>
    {
        if num_dimensions == 0
        {
            return Err(SGError::InvalidDimensions);
        }
        if depth < 0
        {
            return Err(SGError::InvalidDepth(depth));
        }
        let family = GlobalFamily::new(rule, options.alpha, options.beta)?;
        let level_weights = match &options.anisotropic_weights
        {
            Some(weights) =>
            {
                if weights.len() != num_dimensions
                {
                    return Err(SGError::AnisotropicWeightsMismatch { expected: num_dimensions, found: weights.len() });
                }
                if let Some(&bad) = weights.iter().find(|&&w| w < 1)
                {
                    return Err(SGError::InvalidAnisotropicWeight(bad));
                }
                weights.clone()
            },
            None => vec![1; num_dimensions],
        };

        let tensors = select_tensors(&family, options.depth_type, depth, &level_weights)?;
        Self::from_tensors(num_outputs, depth, options.clone(), family, tensors)
    }

    ///
    /// The full tensor product of the rule at `levels[d]` in direction `d`,
    /// a single tensor with coefficient one. `depth()` reports the level sum.
    ///
    pub fn new_full_tensor(num_dimensions: usize, num_outputs: usize, levels: &[i32], rule: RuleType, alpha: f64, beta: f64) -> Result<Self, SGError>
    {
        if num_dimensions == 0
        {
            return Err(SGError::InvalidDimensions);
        }
        if levels.len() != num_dimensions
        {
            return Err(SGError::DimensionMismatch { expected: num_dimensions, found: levels.len() });
        }
        if let Some(&bad) = levels.iter().find(|&&l| l < 0)
        {
            return Err(SGError::InvalidDepth(bad));
        }
        let family = GlobalFamily::new(rule, alpha, beta)?;
        let bounds: Vec<usize> = levels.iter().map(|&l| l as usize + 1).collect();
        let entries: Vec<i32> = cartesian_product(&bounds).into_iter().map(|l| l as i32).collect();
        let tensors = IndexSet::from_unsorted(num_dimensions, &entries)?;
        let options = GlobalGridOptions { alpha, beta, ..Default::default() };
        Self::from_tensors(num_outputs, levels.iter().sum(), options, family, tensors)
    }

    /// Builds points and weights of the Smolyak combination of a downward closed `tensors`.
    fn from_tensors(num_outputs: usize, depth: i32, options: GlobalGridOptions, family: GlobalFamily, tensors: IndexSet) -> Result<Self, SGError>
    {
        let num_dimensions = tensors.num_dimensions();
        let max_level = tensors.as_slice().iter().copied().max().unwrap_or(0) as usize;
        let rule = GlobalRule::new(family, max_level + 1)?;

        let mut active = Vec::new();
        let mut coefficients = Vec::new();
        for (tensor, c) in tensors.iter().zip(smolyak_coefficients(&tensors))
        {
            if c != 0
            {
                active.extend_from_slice(tensor);
                coefficients.push(c);
            }
        }
        let active_tensors = IndexSet::from_sorted(num_dimensions, active);

        let contributions: Vec<(Vec<i32>, Vec<f64>)> = (0..active_tensors.len()).into_par_iter()
            .map(|i| tensor_contribution(&rule, active_tensors.get(i), coefficients[i] as f64))
            .collect();
        let all_nodes: Vec<i32> = contributions.iter().flat_map(|(nodes, _)| nodes.iter().copied()).collect();
        let points = IndexSet::from_unsorted(num_dimensions, &all_nodes)?;

        let mut weights = vec![0.0; points.len()];
        let mut tensor_offsets = Vec::with_capacity(coefficients.len() + 1);
        let mut tensor_points = Vec::with_capacity(all_nodes.len() / num_dimensions);
        tensor_offsets.push(0);
        for (nodes, tensor_weights) in &contributions
        {
            for (node, &weight) in nodes.chunks_exact(num_dimensions).zip(tensor_weights)
            {
                let Some(slot) = points.index_of(node) else { continue };
                weights[slot] += weight;
                tensor_points.push(slot);
            }
            tensor_offsets.push(tensor_points.len());
        }
        let needed = if num_outputs == 0 { IndexSet::new(num_dimensions) } else { points.clone() };
        tracing::debug!(rule = ?rule.rule_type(), num_dimensions, depth, tensors = tensors.len(), active = coefficients.len(),
            points = points.len(), "built global grid");
        Ok(Self { num_dimensions, num_outputs, depth, options, rule, tensors, active_tensors, coefficients,
            tensor_offsets, tensor_points, points, needed, values: Vec::new(), weights })
    }

    #[inline]
    pub fn num_dimensions(&self) -> usize
    {
        self.num_dimensions
    }

    #[inline]
    pub fn num_outputs(&self) -> usize
    {
        self.num_outputs
    }

    #[inline]
    pub fn num_points(&self) -> usize
    {
        self.points.len()
    }

    #[inline]
    pub fn num_needed_points(&self) -> usize
    {
        self.needed.len()
    }

    pub fn depth(&self) -> i32
    {
        self.depth
    }

    pub fn options(&self) -> &GlobalGridOptions
    {
        &self.options
    }

    pub fn rule(&self) -> &GlobalRule
    {
        &self.rule
    }

    pub fn rule_type(&self) -> RuleType
    {
        self.rule.rule_type()
    }

    /// The full downward closed tensor selection.
    pub fn tensors(&self) -> &IndexSet
    {
        &self.tensors
    }

    /// Tensors with a non-zero combination coefficient.
    pub fn active_tensors(&self) -> &IndexSet
    {
        &self.active_tensors
    }

    pub fn coefficients(&self) -> &[i32]
    {
        &self.coefficients
    }

    pub fn values(&self) -> &[f64]
    {
        &self.values
    }

    fn coordinates(&self, set: &IndexSet) -> Vec<f64>
    {
        set.as_slice().iter().map(|&node| self.rule.x(node as usize)).collect()
    }

    /// Canonical coordinates of all points, `[point][dimension]`.
    pub fn points(&self) -> Vec<f64>
    {
        self.coordinates(&self.points)
    }

    pub fn needed_points(&self) -> Vec<f64>
    {
        self.coordinates(&self.needed)
    }

    /// Quadrature weights over the canonical domain, in the order of `points()`.
    pub fn quadrature_weights(&self) -> &[f64]
    {
        &self.weights
    }

    ///
    /// Stores `values` (`[point][output]`) for the needed points. All points of a
    /// global grid are needed until the first load.
    ///
    pub fn load_needed_points(&mut self, values: &[f64]) -> Result<(), SGError>
    {
        let expected = self.needed.len() * self.num_outputs;
        if values.len() != expected
        {
            return Err(SGError::NumberOfPointsAndValuesMismatch { expected, found: values.len() });
        }
        if self.needed.is_empty()
        {
            return Ok(());
        }
        self.values = values.to_vec();
        self.needed = IndexSet::new(self.num_dimensions);
        tracing::debug!(points = self.points.len(), "loaded global grid values");
        Ok(())
    }

    fn check_point(&self, x: &[f64]) -> Result<(), SGError>
    {
        if x.len() != self.num_dimensions
        {
            Err(SGError::DimensionMismatch { expected: self.num_dimensions, found: x.len() })
        }
        else
        {
            Ok(())
        }
    }

    fn check_loaded(&self) -> Result<(), SGError>
    {
        if self.num_outputs > 0 && self.values.is_empty()
        {
            Err(SGError::NoValuesLoaded)
        }
        else
        {
            Ok(())
        }
    }

    ///
    /// Weights `w` such that the interpolant at `x` equals `sum_i w_i f(point_i)`.
    ///
    pub fn interpolant_weights(&self, x: &[f64]) -> Result<Vec<f64>, SGError>
    {
        self.check_point(x)?;
        let ndim = self.num_dimensions;
        let max_level = self.rule.max_level();
        // cardinals of every level in every direction, indexed [d][level]
        let cardinals: Vec<Vec<Vec<f64>>> = x.iter().map(|&xd|
        {
            (0..max_level).map(|level|
            {
                let mut values = Vec::new();
                self.rule.cardinal_values(level, xd, &mut values);
                values
            }).collect()
        }).collect();

        let mut result = vec![0.0; self.points.len()];
        let mut counter = vec![0; ndim];
        for (i, tensor) in self.active_tensors.iter().enumerate()
        {
            let factors: Vec<&[f64]> = (0..ndim).map(|d| cardinals[d][tensor[d] as usize].as_slice()).collect();
            let coefficient = self.coefficients[i] as f64;
            counter.fill(0);
            for &slot in &self.tensor_points[self.tensor_offsets[i]..self.tensor_offsets[i + 1]]
            {
                let mut weight = coefficient;
                for d in 0..ndim
                {
                    weight *= factors[d][counter[d]];
                }
                result[slot] += weight;
                for d in (0..ndim).rev()
                {
                    counter[d] += 1;
                    if counter[d] < factors[d].len()
                    {
                        break;
                    }
                    counter[d] = 0;
                }
            }
        }
        Ok(result)
    }

    /// Value of the interpolant at the canonical point `x`, one entry per output.
    pub fn evaluate(&self, x: &[f64]) -> Result<Vec<f64>, SGError>
    {
        self.check_loaded()?;
        let weights = self.interpolant_weights(x)?;
        let mut y = vec![0.0; self.num_outputs];
        if self.num_outputs == 0
        {
            return Ok(y);
        }
        for (&weight, value) in weights.iter().zip(self.values.chunks_exact(self.num_outputs))
        {
            for (yi, &vi) in y.iter_mut().zip(value)
            {
                *yi += weight * vi;
            }
        }
        Ok(y)
    }

    /// Integral over the canonical domain, one entry per output.
    pub fn integrate(&self) -> Result<Vec<f64>, SGError>
    {
        self.check_loaded()?;
        let mut y = vec![0.0; self.num_outputs];
        if self.num_outputs == 0
        {
            return Ok(y);
        }
        for (&weight, value) in self.weights.iter().zip(self.values.chunks_exact(self.num_outputs))
        {
            for (yi, &vi) in y.iter_mut().zip(value)
            {
                *yi += weight * vi;
            }
        }
        Ok(y)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    const EXACT: f64 = 2.513723354063905;

    fn load(grid: &mut GlobalGrid, f: impl Fn(&[f64]) -> f64)
    {
        let values: Vec<f64> = grid.needed_points().chunks_exact(grid.num_dimensions()).map(f).collect();
        grid.load_needed_points(&values).unwrap();
    }

    fn gaussian_cosine(x: &[f64]) -> f64
    {
        (-x[0] * x[0]).exp() * x[1].cos()
    }

    #[test]
    fn clenshaw_curtis_level_seven()
    {
        let mut grid = GlobalGrid::new(2, 1, 7, RuleType::ClenshawCurtis, &GlobalGridOptions::default()).unwrap();
        assert_eq!(grid.num_points(), 705);
        assert_eq!(grid.num_needed_points(), 705);
        load(&mut grid, gaussian_cosine);
        assert_eq!(grid.num_needed_points(), 0);
        let integral = grid.integrate().unwrap()[0];
        assert!((integral - EXACT).abs() < 1e-10);
    }

    #[test]
    fn gauss_legendre_interpolation_ten()
    {
        let options = GlobalGridOptions { depth_type: TypeDepth::Interpolation, ..Default::default() };
        let mut grid = GlobalGrid::new(2, 1, 10, RuleType::GaussLegendre, &options).unwrap();
        assert_eq!(grid.num_points(), 501);
        load(&mut grid, gaussian_cosine);
        let integral = grid.integrate().unwrap()[0];
        assert!((integral - EXACT).abs() < 1e-10);
        let value = grid.evaluate(&[0.3, -0.4]).unwrap()[0];
        assert!((value - gaussian_cosine(&[0.3, -0.4])).abs() < 1e-5);
    }

    #[test]
    fn smolyak_coefficients_of_a_simplex()
    {
        // levels with l0 + l1 <= 2: the diagonal gets +1, the one below -1, the rest 0
        let tensors = IndexSet::from_unsorted(2, &[0, 0, 0, 1, 0, 2, 1, 0, 1, 1, 2, 0]).unwrap();
        assert_eq!(smolyak_coefficients(&tensors), vec![0, -1, 1, -1, 1, 1]);
        let box_set = IndexSet::from_unsorted(2, &[0, 0, 0, 1, 1, 0, 1, 1]).unwrap();
        assert_eq!(smolyak_coefficients(&box_set), vec![0, 0, 0, 1]);
    }

    #[test]
    fn reproduces_tensor_polynomials()
    {
        // x^4 y^2 lives in the span of tensor (2, 1), x^2 y z + z^4 in 3D Gauss-Legendre
        let mut grid = GlobalGrid::new(2, 1, 3, RuleType::ClenshawCurtis, &GlobalGridOptions::default()).unwrap();
        let f = |x: &[f64]| x[0].powi(4) * x[1] * x[1];
        load(&mut grid, f);
        for x in [[0.3, -0.7], [-0.91, 0.12], [0.5, 0.5]]
        {
            assert!((grid.evaluate(&x).unwrap()[0] - f(&x)).abs() < 1e-13);
        }
        assert!((grid.integrate().unwrap()[0] - 2.0 / 5.0 * 2.0 / 3.0).abs() < 1e-13);
        let weights = grid.interpolant_weights(&[0.3, -0.7]).unwrap();
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-13);

        let options = GlobalGridOptions { depth_type: TypeDepth::Interpolation, ..Default::default() };
        let mut grid = GlobalGrid::new(3, 1, 4, RuleType::GaussLegendre, &options).unwrap();
        let f = |x: &[f64]| x[0] * x[0] * x[1] * x[2] + x[2].powi(4);
        load(&mut grid, f);
        for x in [[0.3, -0.7, 0.2], [-0.91, 0.12, 0.66]]
        {
            assert!((grid.evaluate(&x).unwrap()[0] - f(&x)).abs() < 1e-13);
        }
        assert!((grid.integrate().unwrap()[0] - 4.0 * 2.0 / 5.0).abs() < 1e-13);
    }

    #[test]
    fn matches_full_tensor_product()
    {
        // a box of tensors collapses to its largest tensor
        let options = GlobalGridOptions { depth_type: TypeDepth::Hyperbolic, ..Default::default() };
        let grid = GlobalGrid::new(1, 0, 4, RuleType::Fejer2, &options).unwrap();
        assert_eq!(grid.active_tensors().as_slice(), &[4]);
        assert_eq!(grid.num_points(), 31);

        // every monomial of f lies in a tensor of the level 3 selection, so the sparse
        // rule agrees with the full level 3 tensor rule
        let grid = GlobalGrid::new(3, 0, 3, RuleType::ClenshawCurtis, &GlobalGridOptions::default()).unwrap();
        let f = |x: &[f64]| (1.0 + x[0] + x[1] * x[1]) * (x[2].powi(4) - x[2]);
        let reference = GlobalRule::new(GlobalFamily::new(RuleType::ClenshawCurtis, 0.0, 0.0).unwrap(), 4).unwrap();
        let table = reference.table();
        let mut full = 0.0;
        for (&i, &wi) in table.level_points(3).iter().zip(table.level_weights(3))
        {
            for (&j, &wj) in table.level_points(3).iter().zip(table.level_weights(3))
            {
                for (&k, &wk) in table.level_points(3).iter().zip(table.level_weights(3))
                {
                    full += wi * wj * wk * f(&[reference.x(i), reference.x(j), reference.x(k)]);
                }
            }
        }
        let sparse: f64 = grid.points().chunks_exact(3).zip(grid.quadrature_weights()).map(|(x, w)| w * f(x)).sum();
        assert!((full - sparse).abs() < 1e-13);
        assert!((grid.quadrature_weights().iter().sum::<f64>() - 8.0).abs() < 1e-13);
    }

    #[test]
    fn full_tensor_grid()
    {
        let mut grid = GlobalGrid::new_full_tensor(2, 1, &[3, 1], RuleType::ClenshawCurtis, 0.0, 0.0).unwrap();
        assert_eq!(grid.active_tensors().as_slice(), &[3, 1]);
        assert_eq!(grid.coefficients(), &[1]);
        assert_eq!(grid.tensors().len(), 8);
        assert_eq!(grid.num_points(), 27);
        assert_eq!(grid.depth(), 4);
        assert!((grid.quadrature_weights().iter().sum::<f64>() - 4.0).abs() < 1e-13);

        // x^8 needs all 9 nodes of level 3, y^2 the 3 nodes of level 1
        let f = |x: &[f64]| x[0].powi(8) * x[1] * x[1] + x[0] * x[1];
        load(&mut grid, f);
        assert!((grid.integrate().unwrap()[0] - 4.0 / 27.0).abs() < 1e-13);
        for x in [[0.3, -0.7], [-0.91, 0.12]]
        {
            assert!((grid.evaluate(&x).unwrap()[0] - f(&x)).abs() < 1e-12);
        }

        let grid = GlobalGrid::new_full_tensor(3, 0, &[0, 2, 0], RuleType::GaussLegendre, 0.0, 0.0).unwrap();
        assert_eq!(grid.num_points(), grid.rule().num_points(2));
        assert_eq!(grid.num_needed_points(), 0);
    }

    #[test]
    fn full_tensor_errors()
    {
        assert_eq!(GlobalGrid::new_full_tensor(0, 1, &[], RuleType::ClenshawCurtis, 0.0, 0.0).unwrap_err(), SGError::InvalidDimensions);
        assert_eq!(GlobalGrid::new_full_tensor(2, 1, &[1], RuleType::ClenshawCurtis, 0.0, 0.0).unwrap_err(),
            SGError::DimensionMismatch { expected: 2, found: 1 });
        assert_eq!(GlobalGrid::new_full_tensor(2, 1, &[1, -2], RuleType::ClenshawCurtis, 0.0, 0.0).unwrap_err(), SGError::InvalidDepth(-2));
        assert_eq!(GlobalGrid::new_full_tensor(1, 1, &[2], RuleType::LocalPolynomial, 0.0, 0.0).unwrap_err(),
            SGError::UnsupportedRule(RuleType::LocalPolynomial));
    }

    #[test]
    fn anisotropic_gegenbauer()
    {
        let options = GlobalGridOptions { anisotropic_weights: Some(vec![1, 2]), alpha: 0.5, ..Default::default() };
        let mut grid = GlobalGrid::new(2, 1, 4, RuleType::GaussGegenbauer, &options).unwrap();
        assert!(grid.tensors().iter().all(|t| t[0] + 2 * t[1] <= 4));
        assert!(grid.tensors().contains(&[4, 0]));
        assert!(grid.tensors().contains(&[0, 2]));
        assert!(!grid.tensors().contains(&[1, 2]));
        // the weight (1-x^2)^(1/2) has total measure pi/2 per direction
        let f = |x: &[f64]| 1.0 + x[0] * x[0] * x[1] * x[1];
        load(&mut grid, f);
        let half_pi = std::f64::consts::FRAC_PI_2;
        let quarter = std::f64::consts::PI / 8.0;
        assert!((grid.integrate().unwrap()[0] - (half_pi * half_pi + quarter * quarter)).abs() < 1e-13);
    }

    #[test]
    fn pure_quadrature_grid()
    {
        let grid = GlobalGrid::new(2, 0, 3, RuleType::GaussHermite, &GlobalGridOptions::default()).unwrap();
        assert_eq!(grid.num_needed_points(), 0);
        let pi = std::f64::consts::PI;
        assert!((grid.quadrature_weights().iter().sum::<f64>() - pi).abs() < 1e-13);
        assert_eq!(grid.integrate().unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn construction_errors()
    {
        let default = GlobalGridOptions::default();
        assert_eq!(GlobalGrid::new(0, 1, 2, RuleType::ClenshawCurtis, &default).unwrap_err(), SGError::InvalidDimensions);
        assert_eq!(GlobalGrid::new(2, 1, -1, RuleType::ClenshawCurtis, &default).unwrap_err(), SGError::InvalidDepth(-1));
        assert_eq!(GlobalGrid::new(2, 1, 2, RuleType::LocalPolynomial, &default).unwrap_err(), SGError::UnsupportedRule(RuleType::LocalPolynomial));
        let options = GlobalGridOptions { anisotropic_weights: Some(vec![1]), ..Default::default() };
        assert_eq!(GlobalGrid::new(2, 1, 2, RuleType::ClenshawCurtis, &options).unwrap_err(), SGError::AnisotropicWeightsMismatch { expected: 2, found: 1 });
        let options = GlobalGridOptions { anisotropic_weights: Some(vec![1, 0]), ..Default::default() };
        assert_eq!(GlobalGrid::new(2, 1, 2, RuleType::ClenshawCurtis, &options).unwrap_err(), SGError::InvalidAnisotropicWeight(0));
        let options = GlobalGridOptions { alpha: -1.5, ..Default::default() };
        assert!(matches!(GlobalGrid::new(2, 1, 2, RuleType::GaussLaguerre, &options), Err(SGError::InvalidRuleParameter { .. })));
    }

    #[test]
    fn load_errors_do_not_mutate()
    {
        let mut grid = GlobalGrid::new(2, 2, 2, RuleType::ClenshawCurtis, &GlobalGridOptions::default()).unwrap();
        let needed = grid.num_needed_points();
        assert_eq!(grid.evaluate(&[0.0, 0.0]), Err(SGError::NoValuesLoaded));
        assert_eq!(grid.load_needed_points(&[1.0; 3]), Err(SGError::NumberOfPointsAndValuesMismatch { expected: 2 * needed, found: 3 }));
        assert_eq!(grid.num_needed_points(), needed);
        assert!(grid.values().is_empty());
        grid.load_needed_points(&vec![1.0; 2 * needed]).unwrap();
        assert_eq!(grid.evaluate(&[0.0]), Err(SGError::DimensionMismatch { expected: 2, found: 1 }));
        let y = grid.evaluate(&[0.1, 0.2]).unwrap();
        assert!((y[0] - 1.0).abs() < 1e-14 && (y[1] - 1.0).abs() < 1e-14);
    }
}
