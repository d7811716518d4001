use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{errors::SGError, rules::RuleType, utilities::clenshaw_curtis_table::{cc_weights, clenshaw_curtis_weights, fejer2_weights}};

use super::base::RuleFamily;

/// `n` Chebyshev extrema `cos(pi j / (n - 1))`, written so that the middle node is exactly zero.
fn chebyshev_extrema(n: usize) -> Vec<f64>
{
    if n == 1
    {
        return vec![0.0];
    }
    let m = (n - 1) as f64;
    (0..n).map(|j| (PI * (m - 2.0 * j as f64) / (2.0 * m)).sin()).collect()
}

///
/// Nested Clenshaw-Curtis rule, one point at level 0 and `2^l + 1` points after.
///
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClenshawCurtis;

impl RuleFamily for ClenshawCurtis
{
    fn rule_type(&self) -> RuleType
    {
        RuleType::ClenshawCurtis
    }

    fn num_points(&self, level: usize) -> usize
    {
        if level == 0 { 1 } else { (1 << level) + 1 }
    }

    fn basis_level(&self, level: usize) -> usize
    {
        if level == 0 { 0 } else { 1 << level }
    }

    fn quadrature_exactness(&self, level: usize) -> usize
    {
        self.num_points(level)
    }

    fn build_level(&self, level: usize) -> Result<(Vec<f64>, Vec<f64>), SGError>
    {
        Ok((chebyshev_extrema(self.num_points(level)), cc_weights(level as u32)))
    }
}

///
/// Fejer's second rule, the interior Chebyshev extrema. Level `l` has
/// `2^(l+1) - 1` points and every level contains the previous one.
///
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Fejer2;

impl RuleFamily for Fejer2
{
    fn rule_type(&self) -> RuleType
    {
        RuleType::Fejer2
    }

    fn num_points(&self, level: usize) -> usize
    {
        (1 << (level + 1)) - 1
    }

    fn basis_level(&self, level: usize) -> usize
    {
        self.num_points(level) - 1
    }

    fn quadrature_exactness(&self, level: usize) -> usize
    {
        self.num_points(level)
    }

    fn build_level(&self, level: usize) -> Result<(Vec<f64>, Vec<f64>), SGError>
    {
        let n = self.num_points(level);
        let m = (n + 1) as f64;
        let x = (1..=n).map(|j| (PI * (m - 2.0 * j as f64) / (2.0 * m)).sin()).collect();
        Ok((x, fejer2_weights(n)))
    }
}

///
/// Non-nested Chebyshev extrema with `l + 1` points and Clenshaw-Curtis weights.
///
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Chebyshev;

impl RuleFamily for Chebyshev
{
    fn rule_type(&self) -> RuleType
    {
        RuleType::Chebyshev
    }

    fn num_points(&self, level: usize) -> usize
    {
        level + 1
    }

    fn basis_level(&self, level: usize) -> usize
    {
        level
    }

    fn quadrature_exactness(&self, level: usize) -> usize
    {
        // symmetric rules with an odd number of points gain one degree
        if level % 2 == 0 { level + 1 } else { level }
    }

    fn build_level(&self, level: usize) -> Result<(Vec<f64>, Vec<f64>), SGError>
    {
        let n = self.num_points(level);
        Ok((chebyshev_extrema(n), clenshaw_curtis_weights(n)))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn check_exactness<F: RuleFamily>(family: &F, levels: std::ops::Range<usize>)
    {
        for level in levels
        {
            let (x, w) = family.build_level(level).unwrap();
            assert_eq!(x.len(), family.num_points(level));
            assert_eq!(w.len(), x.len());
            for k in 0..=family.quadrature_exactness(level)
            {
                let exact = if k % 2 == 0 { 2.0 / (k + 1) as f64 } else { 0.0 };
                let q: f64 = x.iter().zip(&w).map(|(x, w)| w * x.powi(k as i32)).sum();
                assert!((q - exact).abs() < 1e-13, "{:?} level {level} degree {k}", family.rule_type());
            }
        }
    }

    #[test]
    fn clenshaw_curtis_exactness()
    {
        check_exactness(&ClenshawCurtis, 0..7);
    }

    #[test]
    fn fejer2_exactness()
    {
        check_exactness(&Fejer2, 0..6);
    }

    #[test]
    fn chebyshev_exactness()
    {
        check_exactness(&Chebyshev, 0..12);
    }

    #[test]
    fn clenshaw_curtis_levels_are_nested()
    {
        let (coarse, _) = ClenshawCurtis.build_level(3).unwrap();
        let (fine, _) = ClenshawCurtis.build_level(4).unwrap();
        for x in coarse
        {
            assert!(fine.iter().any(|y| (x - y).abs() < 1e-14));
        }
    }

    #[test]
    fn middle_node_is_zero()
    {
        assert_eq!(chebyshev_extrema(5)[2], 0.0);
        assert_eq!(Fejer2.build_level(2).unwrap().0[3], 0.0);
    }
}
