use serde::{Deserialize, Serialize};

/// Tolerance used to decide that two nodes coincide, and as the floor for
/// output normalization during refinement.
pub const NUM_TOL: f64 = 1e-12;

/// Maximum number of implicit QL sweeps allowed per eigenvalue.
pub const MAX_EIGEN_ITERATIONS: usize = 30;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleType
{
    /// Classic nested rule using Chebyshev extrema, doubling growth.
    ClenshawCurtis,
    /// Nested rule using the interior Chebyshev extrema (Fejer's second rule).
    Fejer2,
    /// Non-nested Chebyshev extrema with `level + 1` points.
    Chebyshev,
    GaussLegendre,
    /// Gauss rule for the weight (1-x^2)^(-1/2).
    GaussChebyshev1,
    /// Gauss rule for the weight (1-x^2)^(1/2).
    GaussChebyshev2,
    /// Gauss rule for the weight (1-x^2)^alpha.
    GaussGegenbauer,
    /// Gauss rule for the weight (1-x)^alpha (1+x)^beta.
    GaussJacobi,
    /// Gauss rule for the weight |x|^alpha exp(-x^2) over the real line.
    GaussHermite,
    /// Gauss rule for the weight x^alpha exp(-x) over [0, inf).
    GaussLaguerre,
    /// Hierarchical piecewise polynomials with points on the boundary.
    LocalPolynomial,
    /// Hierarchical piecewise polynomials forced to zero on the boundary.
    LocalPolynomialZero,
}

impl RuleType
{
    pub fn is_local(&self) -> bool
    {
        matches!(self, RuleType::LocalPolynomial | RuleType::LocalPolynomialZero)
    }

    pub fn description(&self) -> &'static str
    {
        match self
        {
            RuleType::ClenshawCurtis => "Clenshaw-Curtis nested points, weights and Lagrange polynomials",
            RuleType::Fejer2 => "Fejer type 2 nested points, weights and Lagrange polynomials",
            RuleType::Chebyshev => "Non-nested Chebyshev extrema, Clenshaw-Curtis weights and Lagrange polynomials",
            RuleType::GaussLegendre => "Gauss-Legendre points, weights and Lagrange polynomials",
            RuleType::GaussChebyshev1 => "Gauss-Chebyshev points and weights of type 1, and Lagrange polynomials",
            RuleType::GaussChebyshev2 => "Gauss-Chebyshev points and weights of type 2, and Lagrange polynomials",
            RuleType::GaussGegenbauer => "Gauss-Gegenbauer points, weights and Lagrange polynomials",
            RuleType::GaussJacobi => "Gauss-Jacobi points, weights and Lagrange polynomials",
            RuleType::GaussHermite => "Gauss-Hermite points, weights and Lagrange polynomials",
            RuleType::GaussLaguerre => "Gauss-Laguerre points, weights and Lagrange polynomials",
            RuleType::LocalPolynomial => "Hierarchical piece-wise polynomials with boundary points",
            RuleType::LocalPolynomialZero => "Hierarchical piece-wise polynomials with zero boundary",
        }
    }
}

///
/// Strategy used to select the tensors of a global grid.
///
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeDepth
{
    /// Weighted sum of levels bounded by the depth.
    #[default]
    Level,
    /// Weighted sum of interpolation exactness bounded by the depth.
    Interpolation,
    /// Weighted sum of (zero based) quadrature exactness bounded by the depth.
    Quadrature,
    /// Weighted product of `level + 1` bounded by `depth + 1`.
    Hyperbolic,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRefinement
{
    /// Refine every direction of a point with a large surplus.
    #[default]
    Classic,
    /// Propose the missing parent in a flagged direction, otherwise the children.
    ParentsFirst,
    /// Refine only the directions with a large one dimensional surplus.
    DirectionSelective,
    /// Combination of `ParentsFirst` and `DirectionSelective`.
    Fds,
}

impl TypeRefinement
{
    pub(crate) fn is_direction_selective(&self) -> bool
    {
        matches!(self, TypeRefinement::DirectionSelective | TypeRefinement::Fds)
    }

    pub(crate) fn is_parents_first(&self) -> bool
    {
        matches!(self, TypeRefinement::ParentsFirst | TypeRefinement::Fds)
    }
}
