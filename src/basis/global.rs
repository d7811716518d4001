use serde::{Deserialize, Serialize};

use crate::{errors::SGError, rules::{RuleType, NUM_TOL}};

use super::{base::{OneDimensionalRule, RuleFamily, RuleTable}, clenshaw_curtis::{Chebyshev, ClenshawCurtis, Fejer2}, gauss::*};

///
/// The rule families usable by a global grid.
///
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GlobalFamily
{
    ClenshawCurtis(ClenshawCurtis),
    Fejer2(Fejer2),
    Chebyshev(Chebyshev),
    GaussLegendre(GaussLegendre),
    GaussChebyshev1(GaussChebyshev1),
    GaussChebyshev2(GaussChebyshev2),
    GaussGegenbauer(GaussGegenbauer),
    GaussJacobi(GaussJacobi),
    GaussHermite(GaussHermite),
    GaussLaguerre(GaussLaguerre),
}

impl GlobalFamily
{
    ///
    /// Selects the family of `rule`. `alpha` is used by the Gegenbauer, Jacobi,
    /// Hermite and Laguerre families, `beta` only by Jacobi.
    ///
    pub fn new(rule: RuleType, alpha: f64, beta: f64) -> Result<Self, SGError>
    {
        Ok(match rule
        {
            RuleType::ClenshawCurtis => GlobalFamily::ClenshawCurtis(ClenshawCurtis),
            RuleType::Fejer2 => GlobalFamily::Fejer2(Fejer2),
            RuleType::Chebyshev => GlobalFamily::Chebyshev(Chebyshev),
            RuleType::GaussLegendre => GlobalFamily::GaussLegendre(GaussLegendre),
            RuleType::GaussChebyshev1 => GlobalFamily::GaussChebyshev1(GaussChebyshev1),
            RuleType::GaussChebyshev2 => GlobalFamily::GaussChebyshev2(GaussChebyshev2),
            RuleType::GaussGegenbauer => GlobalFamily::GaussGegenbauer(GaussGegenbauer::new(alpha)?),
            RuleType::GaussJacobi => GlobalFamily::GaussJacobi(GaussJacobi::new(alpha, beta)?),
            RuleType::GaussHermite => GlobalFamily::GaussHermite(GaussHermite::new(alpha)?),
            RuleType::GaussLaguerre => GlobalFamily::GaussLaguerre(GaussLaguerre::new(alpha)?),
            RuleType::LocalPolynomial | RuleType::LocalPolynomialZero => return Err(SGError::UnsupportedRule(rule)),
        })
    }

    /// The `(alpha, beta)` pair, zero where the family has no parameter.
    pub fn parameters(&self) -> (f64, f64)
    {
        match self
        {
            GlobalFamily::GaussGegenbauer(f) => (f.alpha, 0.0),
            GlobalFamily::GaussJacobi(f) => (f.alpha, f.beta),
            GlobalFamily::GaussHermite(f) => (f.alpha, 0.0),
            GlobalFamily::GaussLaguerre(f) => (f.alpha, 0.0),
            _ => (0.0, 0.0),
        }
    }

    fn as_family(&self) -> &dyn RuleFamily
    {
        match self
        {
            GlobalFamily::ClenshawCurtis(f) => f,
            GlobalFamily::Fejer2(f) => f,
            GlobalFamily::Chebyshev(f) => f,
            GlobalFamily::GaussLegendre(f) => f,
            GlobalFamily::GaussChebyshev1(f) => f,
            GlobalFamily::GaussChebyshev2(f) => f,
            GlobalFamily::GaussGegenbauer(f) => f,
            GlobalFamily::GaussJacobi(f) => f,
            GlobalFamily::GaussHermite(f) => f,
            GlobalFamily::GaussLaguerre(f) => f,
        }
    }
}

impl RuleFamily for GlobalFamily
{
    fn rule_type(&self) -> RuleType
    {
        self.as_family().rule_type()
    }

    fn num_points(&self, level: usize) -> usize
    {
        self.as_family().num_points(level)
    }

    fn basis_level(&self, level: usize) -> usize
    {
        self.as_family().basis_level(level)
    }

    fn quadrature_exactness(&self, level: usize) -> usize
    {
        self.as_family().quadrature_exactness(level)
    }

    fn build_level(&self, level: usize) -> Result<(Vec<f64>, Vec<f64>), SGError>
    {
        self.as_family().build_level(level)
    }
}

/// What a snapshot stores of a rule, the tables are rebuilt on read.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleDescriptor
{
    rule: RuleType,
    alpha: f64,
    beta: f64,
    max_level: usize,
}

///
/// A rule family together with its node and weight tables.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleDescriptor", into = "RuleDescriptor")]
pub struct GlobalRule
{
    family: GlobalFamily,
    table: RuleTable,
}

impl GlobalRule
{
    /// Builds the tables of levels `0..max_level`.
    pub fn new(family: GlobalFamily, max_level: usize) -> Result<Self, SGError>
    {
        let table = RuleTable::build(&family, max_level, NUM_TOL)?;
        Ok(Self { family, table })
    }

    pub fn family(&self) -> &GlobalFamily
    {
        &self.family
    }

    pub fn table(&self) -> &RuleTable
    {
        &self.table
    }

    /// All distinct nodes, indexed by node.
    pub fn nodes(&self) -> &[f64]
    {
        self.table.nodes()
    }
}

impl TryFrom<RuleDescriptor> for GlobalRule
{
    type Error = SGError;

    fn try_from(value: RuleDescriptor) -> Result<Self, Self::Error>
    {
        GlobalRule::new(GlobalFamily::new(value.rule, value.alpha, value.beta)?, value.max_level)
    }
}

impl From<GlobalRule> for RuleDescriptor
{
    fn from(value: GlobalRule) -> Self
    {
        let (alpha, beta) = value.family.parameters();
        RuleDescriptor { rule: value.family.rule_type(), alpha, beta, max_level: value.table.max_level() }
    }
}

impl OneDimensionalRule for GlobalRule
{
    fn rule_type(&self) -> RuleType
    {
        self.family.rule_type()
    }

    fn max_level(&self) -> usize
    {
        self.table.max_level()
    }

    fn num_points(&self, level: usize) -> usize
    {
        self.family.num_points(level)
    }

    fn basis_level(&self, level: usize) -> usize
    {
        self.family.basis_level(level)
    }

    fn quadrature_exactness(&self, level: usize) -> usize
    {
        self.family.quadrature_exactness(level)
    }

    fn points(&self, level: usize) -> &[usize]
    {
        self.table.level_points(level)
    }

    fn num_nodes(&self) -> usize
    {
        self.table.num_nodes()
    }

    fn x(&self, node: usize) -> f64
    {
        self.table.nodes()[node]
    }

    fn weight(&self, level: usize, node: usize) -> f64
    {
        self.table.weight(level, node)
    }

    fn eval(&self, level: usize, node: usize, x: f64) -> f64
    {
        self.table.eval(level, node, x)
    }

    fn cardinal_values(&self, level: usize, x: f64, values: &mut Vec<f64>)
    {
        self.table.cardinal_values(level, x, values)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn nested_rule_has_no_duplicate_nodes()
    {
        let rule = GlobalRule::new(GlobalFamily::new(RuleType::ClenshawCurtis, 0.0, 0.0).unwrap(), 6).unwrap();
        // 1, 3, 5, 9, 17, 33 points, all nested
        assert_eq!(rule.num_nodes(), 33);
        let nodes = rule.nodes();
        for i in 0..nodes.len()
        {
            for j in 0..i
            {
                assert!((nodes[i] - nodes[j]).abs() >= NUM_TOL);
            }
        }
        assert_eq!(rule.points(0), &[0]);
        assert_eq!(rule.x(0), 0.0);
    }

    #[test]
    fn gauss_legendre_levels_share_only_the_origin()
    {
        let rule = GlobalRule::new(GlobalFamily::new(RuleType::GaussLegendre, 0.0, 0.0).unwrap(), 5).unwrap();
        // levels 0, 2, 4 contain x = 0, nothing else is shared
        assert_eq!(rule.num_nodes(), 1 + 2 + 3 + 4 + 5 - 2);
        for level in 0..5
        {
            assert_eq!(rule.points(level).len(), level + 1);
            let total: f64 = rule.points(level).iter().map(|&p| rule.weight(level, p)).sum();
            assert!((total - 2.0).abs() < 1e-14);
        }
    }

    #[test]
    fn weight_and_eval_scan_the_level()
    {
        let rule = GlobalRule::new(GlobalFamily::new(RuleType::ClenshawCurtis, 0.0, 0.0).unwrap(), 3).unwrap();
        let level1 = rule.points(1).to_vec();
        let level2 = rule.points(2).to_vec();
        let only_fine = level2.iter().copied().find(|p| !level1.contains(p)).unwrap();
        assert_eq!(rule.weight(1, only_fine), 0.0);
        for &p in &level2
        {
            for &q in &level2
            {
                let expected = if p == q { 1.0 } else { 0.0 };
                assert!((rule.eval(2, p, rule.x(q)) - expected).abs() < 1e-14);
            }
        }
        let mut values = Vec::new();
        rule.cardinal_values(2, 0.3, &mut values);
        for (slot, &p) in level2.iter().enumerate()
        {
            assert!((values[slot] - rule.eval(2, p, 0.3)).abs() < 1e-14);
        }
    }

    #[test]
    fn rejects_local_rules()
    {
        assert_eq!(GlobalFamily::new(RuleType::LocalPolynomial, 0.0, 0.0), Err(SGError::UnsupportedRule(RuleType::LocalPolynomial)));
    }

    #[test]
    fn descriptor_rebuilds_the_same_tables()
    {
        let rule = GlobalRule::new(GlobalFamily::new(RuleType::GaussJacobi, 0.5, 1.5).unwrap(), 4).unwrap();
        let bytes = serde_json::to_vec(&rule).unwrap();
        let copy: GlobalRule = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(rule, copy);
    }
}
