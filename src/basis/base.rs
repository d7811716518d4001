use crate::{errors::SGError, rules::RuleType, utilities::lagrange::{lagrange_coeffs, lagrange_weights}};

///
/// Capabilities shared by every one dimensional rule. Levels start at zero
/// and nodes are identified by their index in the rule's node table.
///
pub trait OneDimensionalRule
{
    fn rule_type(&self) -> RuleType;

    fn description(&self) -> &'static str
    {
        self.rule_type().description()
    }

    /// Number of levels available, valid levels are `0..max_level()`.
    fn max_level(&self) -> usize;

    /// Number of points at `level`.
    fn num_points(&self, level: usize) -> usize;

    /// Largest polynomial degree interpolated exactly at `level`.
    fn basis_level(&self, level: usize) -> usize;

    /// Largest polynomial degree integrated exactly at `level`.
    fn quadrature_exactness(&self, level: usize) -> usize;

    /// Node indices of `level`, in slot order.
    fn points(&self, level: usize) -> &[usize];

    /// Number of distinct nodes over all levels.
    fn num_nodes(&self) -> usize;

    /// Coordinate of a node over the canonical domain.
    fn x(&self, node: usize) -> f64;

    /// Quadrature weight of `node` at `level`, zero if the node is not used there.
    fn weight(&self, level: usize, node: usize) -> f64;

    /// Lagrange cardinal of `node` at `level` evaluated at `x`.
    fn eval(&self, level: usize, node: usize, x: f64) -> f64;

    /// All cardinals of `level` at `x`, in the order of [`Self::points`].
    fn cardinal_values(&self, level: usize, x: f64, values: &mut Vec<f64>);
}

///
/// Growth law and level construction of a rule family with a global basis.
///
pub trait RuleFamily
{
    fn rule_type(&self) -> RuleType;
    fn num_points(&self, level: usize) -> usize;
    fn basis_level(&self, level: usize) -> usize;
    fn quadrature_exactness(&self, level: usize) -> usize;
    /// Raw nodes and weights of a single level.
    fn build_level(&self, level: usize) -> Result<(Vec<f64>, Vec<f64>), SGError>;
}

///
/// Node and weight tables of a rule, built once for levels `0..max_level`.
/// Nodes appearing on several levels are merged when they are within `tol`
/// of each other, which is exact for nested families and an approximation
/// for the Gauss families.
///
#[derive(Clone, Debug, PartialEq)]
pub struct RuleTable
{
    pub(crate) max_level: usize,
    /// cumulative offset of each level, `max_level + 1` entries
    pub(crate) levels: Vec<usize>,
    /// node index of each (level, slot)
    pub(crate) level_points: Vec<usize>,
    /// weight of each (level, slot)
    pub(crate) weights: Vec<f64>,
    /// barycentric coefficient of each (level, slot)
    pub(crate) coefficients: Vec<f64>,
    pub(crate) nodes: Vec<f64>,
    pub(crate) tol: f64,
}

impl RuleTable
{
    pub fn build<F: RuleFamily>(family: &F, max_level: usize, tol: f64) -> Result<Self, SGError>
    {
        let mut levels = Vec::with_capacity(max_level + 1);
        levels.push(0);
        for level in 0..max_level
        {
            levels.push(levels[level] + family.num_points(level));
        }
        let total = levels[max_level];
        let mut level_points = Vec::with_capacity(total);
        let mut weights = Vec::with_capacity(total);
        let mut coefficients = Vec::with_capacity(total);
        let mut nodes: Vec<f64> = Vec::with_capacity(total);

        for level in 0..max_level
        {
            let (x, w) = family.build_level(level)?;
            coefficients.extend(lagrange_coeffs(&x));
            weights.extend(w);
            for xi in x
            {
                let point = match nodes.iter().position(|&known| (xi - known).abs() < tol)
                {
                    Some(point) => point,
                    None =>
                    {
                        nodes.push(xi);
                        nodes.len() - 1
                    }
                };
                level_points.push(point);
            }
        }
        tracing::debug!(rule = ?family.rule_type(), max_level, num_nodes = nodes.len(), "built rule table");
        Ok(Self { max_level, levels, level_points, weights, coefficients, nodes, tol })
    }

    #[inline]
    pub fn max_level(&self) -> usize
    {
        self.max_level
    }

    #[inline]
    pub fn num_nodes(&self) -> usize
    {
        self.nodes.len()
    }

    #[inline]
    pub fn nodes(&self) -> &[f64]
    {
        &self.nodes
    }

    #[inline]
    pub fn tolerance(&self) -> f64
    {
        self.tol
    }

    #[inline]
    pub fn level_slots(&self, level: usize) -> std::ops::Range<usize>
    {
        self.levels[level]..self.levels[level + 1]
    }

    /// Node indices of `level`.
    pub fn level_points(&self, level: usize) -> &[usize]
    {
        &self.level_points[self.level_slots(level)]
    }

    /// Weights of `level` in slot order.
    pub fn level_weights(&self, level: usize) -> &[f64]
    {
        &self.weights[self.level_slots(level)]
    }

    pub fn weight(&self, level: usize, node: usize) -> f64
    {
        self.level_slots(level).find(|&i| self.level_points[i] == node).map_or(0.0, |i| self.weights[i])
    }

    /// Lagrange cardinal of `node` at `level` in product form.
    pub fn eval(&self, level: usize, node: usize, x: f64) -> f64
    {
        let d = self.nodes[node];
        let mut value = 1.0;
        for i in self.level_slots(level)
        {
            let other = self.level_points[i];
            if other != node
            {
                value *= (x - self.nodes[other]) / (d - self.nodes[other]);
            }
        }
        value
    }

    ///
    /// All Lagrange cardinals of `level` evaluated at `x`, in slot order.
    ///
    pub fn cardinal_values(&self, level: usize, x: f64, values: &mut Vec<f64>)
    {
        let slots = self.level_slots(level);
        values.clear();
        values.resize(slots.len(), 0.0);
        let points: Vec<f64> = self.level_points[slots.clone()].iter().map(|&p| self.nodes[p]).collect();
        lagrange_weights(x, &self.coefficients[slots], &points, values);
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::utilities::eigen::decompose;

    /// Recurrence whose diagonal turns into NaN from level 1 on.
    struct BrokenRecurrence;

    impl RuleFamily for BrokenRecurrence
    {
        fn rule_type(&self) -> RuleType
        {
            RuleType::GaussLegendre
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
            2 * level + 1
        }

        fn build_level(&self, level: usize) -> Result<(Vec<f64>, Vec<f64>), SGError>
        {
            let mut diag = vec![0.0; level + 1];
            if level > 0
            {
                diag[0] = f64::NAN;
            }
            decompose(&diag, &vec![1.0; level + 1], 2.0)
        }
    }

    #[test]
    fn eigen_failures_propagate()
    {
        let table = RuleTable::build(&BrokenRecurrence, 1, 1e-12).unwrap();
        assert_eq!(table.nodes(), &[0.0]);
        assert_eq!(RuleTable::build(&BrokenRecurrence, 3, 1e-12), Err(SGError::EigenSolverNotConverged { size: 2 }));
    }
}
