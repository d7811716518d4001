use std::ops::{Range, RangeInclusive};

use serde::{Deserialize, Serialize};

use crate::{errors::SGError, rules::RuleType};

///
/// Hierarchical piecewise polynomials over [-1, 1].
///
/// Points are identified by a single hierarchical index `p`. With
/// [`RuleType::LocalPolynomial`] the root `p = 0` sits at the origin with a
/// constant basis, followed by the two boundary points and then the dyadic
/// midpoints. With [`RuleType::LocalPolynomialZero`] the hierarchy is a
/// complete binary tree of interior points and every basis function vanishes
/// on the boundary.
///
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPolynomialRule
{
    rule: RuleType,
    order: u32,
}

impl LocalPolynomialRule
{
    pub fn new(rule: RuleType, order: i32) -> Result<Self, SGError>
    {
        if !rule.is_local()
        {
            return Err(SGError::UnsupportedRule(rule));
        }
        if !(1..=3).contains(&order)
        {
            return Err(SGError::InvalidOrder(order));
        }
        Ok(Self { rule, order: order as u32 })
    }

    #[inline]
    fn zero_boundary(&self) -> bool
    {
        self.rule == RuleType::LocalPolynomialZero
    }

    pub fn rule_type(&self) -> RuleType
    {
        self.rule
    }

    pub fn order(&self) -> u32
    {
        self.order
    }

    pub fn level(&self, p: usize) -> usize
    {
        if self.zero_boundary()
        {
            return (p + 1).ilog2() as usize;
        }
        match p
        {
            0 => 0,
            1 | 2 => 1,
            _ => (p - 1).ilog2() as usize + 1,
        }
    }

    /// Indices of the points introduced at `level`.
    pub fn points_at_level(&self, level: usize) -> Range<usize>
    {
        if self.zero_boundary()
        {
            return (1 << level) - 1..(1 << (level + 1)) - 1;
        }
        match level
        {
            0 => 0..1,
            1 => 1..3,
            _ => (1 << (level - 1)) + 1..(1 << level) + 1,
        }
    }

    pub fn x(&self, p: usize) -> f64
    {
        if self.zero_boundary()
        {
            let scale = (1_usize << self.level(p)) as f64;
            return (2.0 * (p + 1) as f64 - 2.0 * scale + 1.0) / scale - 1.0;
        }
        match p
        {
            0 => 0.0,
            1 => -1.0,
            2 => 1.0,
            _ =>
            {
                let scale = (1_usize << (self.level(p) - 1)) as f64;
                (2.0 * (p as f64 - scale) - 1.0) / scale - 1.0
            }
        }
    }

    pub fn parent(&self, p: usize) -> Option<usize>
    {
        if self.zero_boundary()
        {
            return if p == 0 { None } else { Some((p - 1) / 2) };
        }
        match p
        {
            0 => None,
            1 | 2 => Some(0),
            3 | 4 => Some(p - 2),
            _ => Some((p + 1) / 2),
        }
    }

    pub fn children(&self, p: usize) -> RangeInclusive<usize>
    {
        if self.zero_boundary()
        {
            return 2 * p + 1..=2 * p + 2;
        }
        match p
        {
            0 => 1..=2,
            1 => 3..=3,
            2 => 4..=4,
            _ => 2 * p - 1..=2 * p,
        }
    }

    /// `p` followed by its parent, grandparent and so on up to the root.
    pub fn ancestors(&self, p: usize) -> impl Iterator<Item = usize> + '_
    {
        std::iter::successors(Some(p), move |&q| self.parent(q))
    }

    /// Half width of the support of the basis function of `p`.
    pub fn support(&self, p: usize) -> f64
    {
        let level = self.level(p);
        if self.zero_boundary()
        {
            1.0 / (1_usize << level) as f64
        }
        else if level <= 1
        {
            1.0
        }
        else
        {
            1.0 / (1_usize << (level - 1)) as f64
        }
    }

    /// Polynomial order actually used at `level`, the coarse levels cannot carry cubics.
    fn effective_order(&self, level: usize) -> u32
    {
        let first_cubic_level = if self.zero_boundary() { 1 } else { 2 };
        if self.order == 3 && level < first_cubic_level { 2 } else { self.order }
    }

    pub fn eval(&self, p: usize, x: f64) -> f64
    {
        let level = self.level(p);
        if level == 0 && !self.zero_boundary()
        {
            return 1.0;
        }
        let xp = self.x(p);
        let h = self.support(p);
        let t = (x - xp) / h;
        if t.abs() >= 1.0
        {
            return 0.0;
        }
        match self.effective_order(level)
        {
            1 => 1.0 - t.abs(),
            2 => 1.0 - t * t,
            _ =>
            {
                let side = match self.parent(p)
                {
                    Some(parent) if self.x(parent) < xp => 1.0,
                    _ => -1.0,
                };
                let far = xp + 3.0 * side * h;
                (1.0 - t * t) * (x - far) / (xp - far)
            }
        }
    }

    /// Integral of the basis function of `p` over [-1, 1].
    pub fn integral(&self, p: usize) -> f64
    {
        let level = self.level(p);
        if !self.zero_boundary() && level <= 1
        {
            return match (level, self.order)
            {
                (0, _) => 2.0,
                (_, 1) => 0.5,
                _ => 2.0 / 3.0,
            };
        }
        let h = self.support(p);
        match self.effective_order(level)
        {
            1 => h,
            // the cubic integrates like the quadratic, its odd part cancels
            _ => 4.0 * h / 3.0,
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn rules() -> Vec<LocalPolynomialRule>
    {
        let mut rules = Vec::new();
        for rule in [RuleType::LocalPolynomial, RuleType::LocalPolynomialZero]
        {
            for order in 1..=3
            {
                rules.push(LocalPolynomialRule::new(rule, order).unwrap());
            }
        }
        rules
    }

    #[test]
    fn hierarchy_is_consistent()
    {
        for rule in rules()
        {
            for p in 0..128
            {
                let level = rule.level(p);
                assert!(rule.points_at_level(level).contains(&p));
                for child in rule.children(p)
                {
                    assert_eq!(rule.parent(child), Some(p));
                    assert_eq!(rule.level(child), level + 1);
                }
                assert_eq!(rule.ancestors(p).count(), level + 1);
                assert!(rule.x(p).abs() <= 1.0);
            }
        }
    }

    #[test]
    fn point_coordinates()
    {
        let rule = LocalPolynomialRule::new(RuleType::LocalPolynomial, 1).unwrap();
        let x: Vec<f64> = (0..9).map(|p| rule.x(p)).collect();
        assert_eq!(x, vec![0.0, -1.0, 1.0, -0.5, 0.5, -0.75, -0.25, 0.25, 0.75]);
        let rule = LocalPolynomialRule::new(RuleType::LocalPolynomialZero, 1).unwrap();
        let x: Vec<f64> = (0..7).map(|p| rule.x(p)).collect();
        assert_eq!(x, vec![0.0, -0.5, 0.5, -0.75, -0.25, 0.25, 0.75]);
    }

    #[test]
    fn basis_is_hierarchical()
    {
        // every function is one at its own point and zero at the other points of
        // its level and all coarser levels, the constant root excepted
        for rule in rules()
        {
            for p in 1..64
            {
                assert!((rule.eval(p, rule.x(p)) - 1.0).abs() < 1e-15);
                for q in 0..rule.points_at_level(rule.level(p)).end
                {
                    if q != p
                    {
                        assert!(rule.eval(p, rule.x(q)).abs() < 1e-15, "{:?} {p} {q}", rule);
                    }
                }
            }
        }
    }

    #[test]
    fn integrals_match_simpson()
    {
        let n = 1 << 14;
        let dx = 2.0 / n as f64;
        for rule in rules()
        {
            for p in 0..64
            {
                let mut sum = rule.eval(p, -1.0) + rule.eval(p, 1.0);
                for i in 1..n
                {
                    let factor = if i % 2 == 1 { 4.0 } else { 2.0 };
                    sum += factor * rule.eval(p, -1.0 + i as f64 * dx);
                }
                let simpson = sum * dx / 3.0;
                assert!((simpson - rule.integral(p)).abs() < 1e-11, "{:?} {p}", rule);
            }
        }
    }

    #[test]
    fn invalid_construction()
    {
        assert_eq!(LocalPolynomialRule::new(RuleType::LocalPolynomial, 4), Err(SGError::InvalidOrder(4)));
        assert_eq!(LocalPolynomialRule::new(RuleType::LocalPolynomial, 0), Err(SGError::InvalidOrder(0)));
        assert_eq!(LocalPolynomialRule::new(RuleType::GaussLegendre, 1), Err(SGError::UnsupportedRule(RuleType::GaussLegendre)));
    }
}
