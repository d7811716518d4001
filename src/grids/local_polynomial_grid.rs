use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::{basis::local_polynomial::LocalPolynomialRule, errors::SGError, index_set::IndexSet, rules::{RuleType, TypeRefinement, NUM_TOL}};

use super::global_grid::cartesian_product;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RefinementOptions
{
    /// Points whose normalized surplus exceeds this value are refined
    pub tolerance: f64,
    pub criterion: TypeRefinement,
}

impl RefinementOptions
{
    pub fn new(tolerance: f64) -> Self
    {
        Self { tolerance, ..Default::default() }
    }
}

///
/// Appends every level tuple of `ndim` entries with a sum of at most `budget`.
///
fn push_level_tuples(prefix: &mut Vec<usize>, ndim: usize, budget: usize, tuples: &mut Vec<Vec<usize>>)
{
    if prefix.len() == ndim
    {
        tuples.push(prefix.clone());
        return;
    }
    for level in 0..=budget
    {
        prefix.push(level);
        push_level_tuples(prefix, ndim, budget - level, tuples);
        prefix.pop();
    }
}

/// True when any output of `surplus` exceeds `tolerance` relative to `norm`.
fn exceeds(surplus: &[f64], norm: &[f64], tolerance: f64) -> bool
{
    surplus.iter().zip(norm).any(|(s, n)| s.abs() / n > tolerance)
}

///
/// Adaptive sparse grid of hierarchical local polynomials. Every point is a
/// tuple of one dimensional hierarchical indices and carries one surplus per
/// output.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalPolynomialGrid
{
    num_dimensions: usize,
    num_outputs: usize,
    rule: LocalPolynomialRule,
    points: IndexSet,
    needed: IndexSet,
    values: Vec<f64>,
    surpluses: Vec<f64>,
    /// slots of the loaded points with no loaded parent in any direction
    roots: Vec<usize>,
}

impl LocalPolynomialGrid
{
    ///
    /// Grid of all points whose levels sum to at most `depth`, all of them
    /// needed.
    ///
    pub fn new(num_dimensions: usize, num_outputs: usize, depth: i32, order: i32, rule: RuleType) -> Result<Self, SGError>
    {
        if num_dimensions == 0
        {
            return Err(SGError::InvalidDimensions);
        }
        if num_outputs == 0
        {
            return Err(SGError::InvalidOutputs(num_outputs));
        }
        if depth < 0
        {
            return Err(SGError::InvalidDepth(depth));
        }
        let rule = LocalPolynomialRule::new(rule, order)?;

        let mut level_tuples = Vec::new();
        push_level_tuples(&mut Vec::with_capacity(num_dimensions), num_dimensions, depth as usize, &mut level_tuples);
        let mut entries = Vec::new();
        for levels in &level_tuples
        {
            let ranges: Vec<_> = levels.iter().map(|&l| rule.points_at_level(l)).collect();
            let bounds: Vec<usize> = ranges.iter().map(|r| r.len()).collect();
            for offsets in cartesian_product(&bounds).chunks_exact(num_dimensions)
            {
                entries.extend(offsets.iter().zip(&ranges).map(|(&o, r)| (r.start + o) as i32));
            }
        }
        let needed = IndexSet::from_unsorted(num_dimensions, &entries)?;
        tracing::debug!(rule = ?rule.rule_type(), order, num_dimensions, depth, needed = needed.len(), "built local polynomial grid");
        Ok(Self { num_dimensions, num_outputs, rule, points: IndexSet::new(num_dimensions), needed, values: Vec::new(), surpluses: Vec::new(),
            roots: Vec::new() })
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

    pub fn rule(&self) -> &LocalPolynomialRule
    {
        &self.rule
    }

    pub fn rule_type(&self) -> RuleType
    {
        self.rule.rule_type()
    }

    pub fn order(&self) -> u32
    {
        self.rule.order()
    }

    /// Hierarchical indices of the loaded points.
    pub fn point_indexes(&self) -> &IndexSet
    {
        &self.points
    }

    /// Hierarchical indices of the points waiting for values.
    pub fn needed_indexes(&self) -> &IndexSet
    {
        &self.needed
    }

    pub fn values(&self) -> &[f64]
    {
        &self.values
    }

    pub fn surpluses(&self) -> &[f64]
    {
        &self.surpluses
    }

    fn coordinates(&self, set: &IndexSet) -> Vec<f64>
    {
        set.as_slice().iter().map(|&p| self.rule.x(p as usize)).collect()
    }

    /// Canonical coordinates of the loaded points, `[point][dimension]`.
    pub fn points(&self) -> Vec<f64>
    {
        self.coordinates(&self.points)
    }

    pub fn needed_points(&self) -> Vec<f64>
    {
        self.coordinates(&self.needed)
    }

    fn level_sum(&self, point: &[i32]) -> usize
    {
        point.iter().map(|&p| self.rule.level(p as usize)).sum()
    }

    /// Slots of the loaded points sorted by level sum, ties in index order.
    fn level_order(&self) -> Vec<usize>
    {
        let mut order: Vec<usize> = (0..self.points.len()).collect();
        order.sort_by_key(|&i| self.level_sum(self.points.get(i)));
        order
    }

    /// Tensor basis function of `point` at `x`.
    fn basis(&self, point: &[i32], x: &[f64]) -> f64
    {
        let mut value = 1.0;
        for (&p, &xd) in point.iter().zip(x)
        {
            value *= self.rule.eval(p as usize, xd);
            if value == 0.0
            {
                break;
            }
        }
        value
    }

    ///
    /// Calls `visit` with the slot and indices of every loaded point other
    /// than `point` whose index in each direction is an ancestor of, or equal
    /// to, the index of `point`. Only those can have a basis function that is
    /// non-zero at `point`.
    ///
    fn visit_ancestors(&self, point: &[i32], mut visit: impl FnMut(usize, &[i32]))
    {
        let ndim = self.num_dimensions;
        let lineages: Vec<Vec<i32>> = point.iter().map(|&p| self.rule.ancestors(p as usize).map(|q| q as i32).collect()).collect();
        let mut counter = vec![0; ndim];
        let mut tuple = point.to_vec();
        loop
        {
            // advance first so the all-zero counter, `point` itself, is skipped
            let mut d = 0;
            loop
            {
                if d == ndim
                {
                    return;
                }
                counter[d] += 1;
                if counter[d] < lineages[d].len()
                {
                    tuple[d] = lineages[d][counter[d]];
                    break;
                }
                counter[d] = 0;
                tuple[d] = lineages[d][0];
                d += 1;
            }
            if let Some(slot) = self.points.index_of(&tuple)
            {
                visit(slot, &tuple);
            }
        }
    }

    ///
    /// Stores `values` (`[needed point][output]`) and merges the needed points
    /// into the grid. Values already loaded are kept.
    ///
    pub fn load_needed_points(&mut self, values: &[f64]) -> Result<(), SGError>
    {
        let nout = self.num_outputs;
        let expected = self.needed.len() * nout;
        if values.len() != expected
        {
            return Err(SGError::NumberOfPointsAndValuesMismatch { expected, found: values.len() });
        }
        if self.needed.is_empty()
        {
            return Ok(());
        }
        let merged = self.points.union(&self.needed)?;
        let mut merged_values = vec![0.0; merged.len() * nout];
        for (slot, point) in merged.iter().enumerate()
        {
            let source = match self.needed.index_of(point)
            {
                Some(j) => &values[j * nout..(j + 1) * nout],
                None =>
                {
                    let Some(i) = self.points.index_of(point) else { continue };
                    &self.values[i * nout..(i + 1) * nout]
                }
            };
            merged_values[slot * nout..(slot + 1) * nout].copy_from_slice(source);
        }
        let loaded = self.needed.len();
        self.points = merged;
        self.values = merged_values;
        self.needed = IndexSet::new(self.num_dimensions);
        self.recompute_surpluses();
        tracing::debug!(loaded, points = self.points.len(), "loaded local polynomial grid values");
        Ok(())
    }

    ///
    /// Hierarchical surpluses from the loaded values. Points are processed
    /// coarse to fine so every ancestor surplus is final when it is used.
    ///
    pub fn recompute_surpluses(&mut self)
    {
        let nout = self.num_outputs;
        let mut surpluses = self.values.clone();
        for i in self.level_order()
        {
            let point = self.points.get(i);
            let x: Vec<f64> = point.iter().map(|&p| self.rule.x(p as usize)).collect();
            self.visit_ancestors(point, |slot, ancestor|
            {
                let basis = self.basis(ancestor, &x);
                if basis != 0.0
                {
                    for k in 0..nout
                    {
                        let s = surpluses[slot * nout + k];
                        surpluses[i * nout + k] -= basis * s;
                    }
                }
            });
        }
        self.surpluses = surpluses;
        self.roots = self.find_roots();
    }

    ///
    /// Replaces the basis by one of `order` over the same points and
    /// recomputes the surpluses from the loaded values.
    ///
    pub fn update_order(&mut self, order: i32) -> Result<(), SGError>
    {
        self.rule = LocalPolynomialRule::new(self.rule.rule_type(), order)?;
        self.recompute_surpluses();
        tracing::debug!(order, points = self.points.len(), "updated local polynomial order");
        Ok(())
    }

    fn find_roots(&self) -> Vec<usize>
    {
        let mut parent = vec![0; self.num_dimensions];
        (0..self.points.len()).filter(|&i|
        {
            let point = self.points.get(i);
            !(0..self.num_dimensions).any(|d|
            {
                let Some(p) = self.rule.parent(point[d] as usize) else { return false };
                parent.copy_from_slice(point);
                parent[d] = p as i32;
                self.points.contains(&parent)
            })
        }).collect()
    }

    ///
    /// Calls `visit` with the slot and basis value of every loaded point whose
    /// basis is non-zero at `x`. Supports are nested along the hierarchy, so the
    /// walk descends from the roots through loaded children and stops where the
    /// basis vanishes.
    ///
    fn visit_supported(&self, x: &[f64], mut visit: impl FnMut(usize, f64))
    {
        let mut seen = FxHashSet::default();
        let mut stack = self.roots.clone();
        let mut child = vec![0; self.num_dimensions];
        while let Some(i) = stack.pop()
        {
            if !seen.insert(i)
            {
                continue;
            }
            let point = self.points.get(i);
            let basis = self.basis(point, x);
            if basis == 0.0
            {
                continue;
            }
            visit(i, basis);
            for d in 0..self.num_dimensions
            {
                child.copy_from_slice(point);
                for c in self.rule.children(point[d] as usize)
                {
                    child[d] = c as i32;
                    if let Some(slot) = self.points.index_of(&child)
                    {
                        if !seen.contains(&slot)
                        {
                            stack.push(slot);
                        }
                    }
                }
            }
        }
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
        if self.points.is_empty()
        {
            Err(SGError::NoValuesLoaded)
        }
        else
        {
            Ok(())
        }
    }

    /// Value of the interpolant at the canonical point `x`, one entry per output.
    pub fn evaluate(&self, x: &[f64]) -> Result<Vec<f64>, SGError>
    {
        self.check_point(x)?;
        self.check_loaded()?;
        let nout = self.num_outputs;
        let mut result = vec![0.0; nout];
        self.visit_supported(x, |slot, basis|
        {
            let surplus = &self.surpluses[slot * nout..(slot + 1) * nout];
            result.iter_mut().zip(surplus).for_each(|(r, s)| *r += basis * s);
        });
        Ok(result)
    }

    /// Integral of the interpolant over the canonical domain.
    pub fn integrate(&self) -> Result<Vec<f64>, SGError>
    {
        self.check_loaded()?;
        let nout = self.num_outputs;
        let mut result = vec![0.0; nout];
        for (point, surplus) in self.points.iter().zip(self.surpluses.chunks_exact(nout))
        {
            let integral: f64 = point.iter().map(|&p| self.rule.integral(p as usize)).product();
            result.iter_mut().zip(surplus).for_each(|(r, s)| *r += integral * s);
        }
        Ok(result)
    }

    ///
    /// Maps coefficients of the surpluses to coefficients of the values, the
    /// transpose of the surplus computation walked fine to coarse.
    ///
    fn transpose_surplus_map(&self, mut weights: Vec<f64>) -> Vec<f64>
    {
        for &i in self.level_order().iter().rev()
        {
            let w = weights[i];
            if w == 0.0
            {
                continue;
            }
            let point = self.points.get(i);
            let x: Vec<f64> = point.iter().map(|&p| self.rule.x(p as usize)).collect();
            self.visit_ancestors(point, |slot, ancestor|
            {
                weights[slot] -= self.basis(ancestor, &x) * w;
            });
        }
        weights
    }

    /// Quadrature weights of the loaded points over the canonical domain.
    pub fn quadrature_weights(&self) -> Vec<f64>
    {
        let integrals: Vec<f64> = self.points.iter().map(|point| point.iter().map(|&p| self.rule.integral(p as usize)).product::<f64>()).collect();
        self.transpose_surplus_map(integrals)
    }

    ///
    /// Weights `w` such that the interpolant at `x` equals `sum_i w_i f(point_i)`.
    ///
    pub fn interpolant_weights(&self, x: &[f64]) -> Result<Vec<f64>, SGError>
    {
        self.check_point(x)?;
        let mut basis = vec![0.0; self.points.len()];
        self.visit_supported(x, |slot, value| basis[slot] = value);
        Ok(self.transpose_surplus_map(basis))
    }

    /// Largest magnitude of each output over the loaded values, at least `NUM_TOL`.
    fn normalization(&self) -> Vec<f64>
    {
        let nout = self.num_outputs;
        let mut norm = vec![0.0_f64; nout];
        for value in self.values.chunks_exact(nout)
        {
            norm.iter_mut().zip(value).for_each(|(n, v)| *n = n.max(v.abs()));
        }
        norm.iter_mut().filter(|n| **n < NUM_TOL).for_each(|n| *n = 1.0);
        norm
    }

    ///
    /// Flags direction `d` of a point when the surplus of the one dimensional
    /// hierarchical transform along the line through the point in direction `d`
    /// is large.
    ///
    fn directional_flags(&self, norm: &[f64], tolerance: f64, flags: &mut [bool])
    {
        let ndim = self.num_dimensions;
        let nout = self.num_outputs;
        for d in 0..ndim
        {
            let mut lines: FxHashMap<Vec<i32>, Vec<usize>> = FxHashMap::default();
            for (i, point) in self.points.iter().enumerate()
            {
                let mut key = point.to_vec();
                key.remove(d);
                lines.entry(key).or_default().push(i);
            }
            for line in lines.values_mut()
            {
                line.sort_by_key(|&i| self.rule.level(self.points.get(i)[d] as usize));
                let mut line_surpluses: FxHashMap<usize, Vec<f64>> = FxHashMap::default();
                for &i in line.iter()
                {
                    let p = self.points.get(i)[d] as usize;
                    let x = self.rule.x(p);
                    let mut surplus = self.values[i * nout..(i + 1) * nout].to_vec();
                    for ancestor in self.rule.ancestors(p).skip(1)
                    {
                        if let Some(coarse) = line_surpluses.get(&ancestor)
                        {
                            let basis = self.rule.eval(ancestor, x);
                            surplus.iter_mut().zip(coarse).for_each(|(s, c)| *s -= basis * c);
                        }
                    }
                    flags[i * ndim + d] = exceeds(&surplus, norm, tolerance);
                    line_surpluses.insert(p, surplus);
                }
            }
        }
    }

    /// Proposes the parent of `point` in direction `d` when it is not loaded, returns whether it did.
    fn push_missing_parent(&self, point: &[i32], d: usize, neighbor: &mut [i32], proposed: &mut Vec<i32>) -> bool
    {
        let Some(parent) = self.rule.parent(point[d] as usize) else { return false };
        neighbor.copy_from_slice(point);
        neighbor[d] = parent as i32;
        if self.points.contains(neighbor)
        {
            return false;
        }
        proposed.extend_from_slice(neighbor);
        true
    }

    ///
    /// Replaces the needed points with the refinement of the loaded grid.
    /// Points never loaded from an earlier call are discarded.
    ///
    pub fn set_refinement(&mut self, options: &RefinementOptions) -> Result<(), SGError>
    {
        self.check_loaded()?;
        let ndim = self.num_dimensions;
        let nout = self.num_outputs;
        let norm = self.normalization();
        let mut flags = vec![false; self.points.len() * ndim];
        if options.criterion.is_direction_selective()
        {
            self.directional_flags(&norm, options.tolerance, &mut flags);
        }
        else
        {
            for (i, surplus) in self.surpluses.chunks_exact(nout).enumerate()
            {
                let flagged = exceeds(surplus, &norm, options.tolerance);
                flags[i * ndim..(i + 1) * ndim].fill(flagged);
            }
        }

        let parents_first = options.criterion.is_parents_first();
        let mut proposed = Vec::new();
        let mut neighbor = vec![0; ndim];
        for (i, point) in self.points.iter().enumerate()
        {
            for d in (0..ndim).filter(|&d| flags[i * ndim + d])
            {
                // a missing parent in a flagged direction is completed before growing further
                if parents_first && self.push_missing_parent(point, d, &mut neighbor, &mut proposed)
                {
                    continue;
                }
                for child in self.rule.children(point[d] as usize)
                {
                    neighbor.copy_from_slice(point);
                    neighbor[d] = child as i32;
                    if !self.points.contains(&neighbor)
                    {
                        proposed.extend_from_slice(&neighbor);
                    }
                }
            }
        }
        self.needed = IndexSet::from_unsorted(ndim, &proposed)?;
        tracing::debug!(criterion = ?options.criterion, tolerance = options.tolerance, points = self.points.len(),
            needed = self.needed.len(), "refined local polynomial grid");
        Ok(())
    }
}
