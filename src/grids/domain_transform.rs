use serde::{Deserialize, Serialize};

use crate::{errors::SGError, rules::RuleType};

///
/// The domain a rule's points live on before any transform, with the
/// parameter of its weight where the map depends on it.
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum CanonicalDomain
{
    /// [-1, 1], mapped onto the interval [a, b]
    Interval,
    /// The real line with weight `|t|^alpha exp(-t^2)`, mapped so the weight becomes `|x-a|^alpha exp(-b (x-a)^2)`
    Gaussian { alpha: f64 },
    /// [0, inf) with weight `t^alpha exp(-t)`, mapped so the weight becomes `(x-a)^alpha exp(-b (x-a))` on [a, inf)
    Exponential { alpha: f64 },
}

impl CanonicalDomain
{
    pub fn of(rule: RuleType, alpha: f64) -> Self
    {
        match rule
        {
            RuleType::GaussHermite => CanonicalDomain::Gaussian { alpha },
            RuleType::GaussLaguerre => CanonicalDomain::Exponential { alpha },
            _ => CanonicalDomain::Interval,
        }
    }
}

///
/// Per dimension affine map from the canonical domain. For [-1, 1] the pair
/// `(a, b)` is the target interval; for the unbounded domains `a` is the
/// shift and `b > 0` the rate of the weight.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainTransform
{
    pub domain: CanonicalDomain,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl DomainTransform
{
    pub fn new(domain: CanonicalDomain, lower: &[f64], upper: &[f64]) -> Result<Self, SGError>
    {
        if lower.len() != upper.len()
        {
            return Err(SGError::DimensionMismatch { expected: lower.len(), found: upper.len() });
        }
        let valid = |a: f64, b: f64| match domain
        {
            CanonicalDomain::Interval => a.is_finite() && b.is_finite() && a < b,
            _ => a.is_finite() && b.is_finite() && b > 0.0,
        };
        if lower.iter().zip(upper).any(|(&a, &b)| !valid(a, b))
        {
            return Err(SGError::InvalidTransform);
        }
        Ok(Self { domain, lower: lower.to_owned(), upper: upper.to_owned() })
    }

    #[inline]
    pub fn ndim(&self) -> usize
    {
        self.lower.len()
    }

    /// Length of a unit canonical step in real coordinates.
    #[inline]
    fn stretch(&self, dim: usize) -> f64
    {
        match self.domain
        {
            CanonicalDomain::Interval => 0.5 * (self.upper[dim] - self.lower[dim]),
            CanonicalDomain::Gaussian { .. } => 1.0 / self.upper[dim].sqrt(),
            CanonicalDomain::Exponential { .. } => 1.0 / self.upper[dim],
        }
    }

    #[inline]
    fn origin(&self, dim: usize) -> f64
    {
        match self.domain
        {
            CanonicalDomain::Interval => 0.5 * (self.upper[dim] + self.lower[dim]),
            _ => self.lower[dim],
        }
    }

    ///
    /// Factor applied to quadrature weights and integrals. Over the weighted
    /// domains it includes the rescaling of `|t|^alpha`.
    ///
    pub fn volume_scale(&self) -> f64
    {
        let exponent = match self.domain
        {
            CanonicalDomain::Interval => 1.0,
            CanonicalDomain::Gaussian { alpha } | CanonicalDomain::Exponential { alpha } => alpha + 1.0,
        };
        (0..self.ndim()).map(|d| self.stretch(d).powf(exponent)).product()
    }

    #[inline]
    pub fn to_real_coordinate(&self, t: f64, dim: usize) -> f64
    {
        self.origin(dim) + self.stretch(dim) * t
    }

    #[inline]
    pub fn to_canonical_coordinate(&self, x: f64, dim: usize) -> f64
    {
        (x - self.origin(dim)) / self.stretch(dim)
    }

    pub fn to_real(&self, points: &mut [f64])
    {
        let ndim = self.ndim();
        for point in points.chunks_exact_mut(ndim)
        {
            #[allow(clippy::needless_range_loop)]
            for d in 0..ndim
            {
                point[d] = self.to_real_coordinate(point[d], d);
            }
        }
    }

    pub fn to_canonical(&self, x: &[f64]) -> Vec<f64>
    {
        x.iter().enumerate().map(|(d, &xd)| self.to_canonical_coordinate(xd, d)).collect()
    }
}

#[test]
fn check_transform()
{
    let transform = DomainTransform::new(CanonicalDomain::Interval, &[0.0, -2.0], &[1.0, 6.0]).unwrap();
    assert_eq!(transform.volume_scale(), 2.0);
    let mut points = vec![-1.0, -1.0, 0.0, 0.5, 1.0, 1.0];
    transform.to_real(&mut points);
    assert_eq!(points, vec![0.0, -2.0, 0.5, 4.0, 1.0, 6.0]);
    assert_eq!(transform.to_canonical(&[0.5, 4.0]), vec![0.0, 0.5]);
    assert_eq!(DomainTransform::new(CanonicalDomain::Interval, &[1.0], &[1.0]), Err(SGError::InvalidTransform));
    assert!(DomainTransform::new(CanonicalDomain::Interval, &[0.0, 0.0], &[1.0]).is_err());
}

#[test]
fn check_weighted_transforms()
{
    let gaussian = DomainTransform::new(CanonicalDomain::Gaussian { alpha: 0.0 }, &[1.0], &[4.0]).unwrap();
    assert_eq!(gaussian.to_real_coordinate(2.0, 0), 2.0);
    assert_eq!(gaussian.to_canonical_coordinate(2.0, 0), 2.0);
    assert_eq!(gaussian.volume_scale(), 0.5);
    let exponential = DomainTransform::new(CanonicalDomain::Exponential { alpha: 1.0 }, &[-1.0, 0.0], &[2.0, 0.5]).unwrap();
    let mut points = vec![0.0, 0.0, 4.0, 1.0];
    exponential.to_real(&mut points);
    assert_eq!(points, vec![-1.0, 0.0, 1.0, 2.0]);
    // (1/2)^2 * 2^2
    assert_eq!(exponential.volume_scale(), 1.0);
    // the shift may be any finite value, the rate must be positive
    assert_eq!(DomainTransform::new(CanonicalDomain::Gaussian { alpha: 0.0 }, &[3.0], &[0.0]), Err(SGError::InvalidTransform));
    assert_eq!(DomainTransform::new(CanonicalDomain::Exponential { alpha: 0.0 }, &[f64::NAN], &[1.0]), Err(SGError::InvalidTransform));
}
