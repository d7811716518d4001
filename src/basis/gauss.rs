use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{errors::SGError, rules::RuleType, utilities::{eigen::decompose, special_functions::gamma}};

use super::base::RuleFamily;

fn check_parameter(name: &'static str, value: f64) -> Result<f64, SGError>
{
    if value.is_finite() && value > -1.0
    {
        Ok(value)
    }
    else
    {
        Err(SGError::InvalidRuleParameter { name, value })
    }
}

/// Every Gauss family uses `l + 1` points at level `l`.
macro_rules! gauss_family
{
    ($family:ty, $rule:expr) =>
    {
        impl RuleFamily for $family
        {
            fn rule_type(&self) -> RuleType
            {
                $rule
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
                self.nodes_and_weights(level + 1)
            }
        }
    };
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GaussLegendre;

impl GaussLegendre
{
    fn nodes_and_weights(&self, n: usize) -> Result<(Vec<f64>, Vec<f64>), SGError>
    {
        let off: Vec<f64> = (1..=n).map(|k|
        {
            let k = k as f64;
            k / (4.0 * k * k - 1.0).sqrt()
        }).collect();
        decompose(&vec![0.0; n], &off, 2.0)
    }
}

/// Weight `(1 - x^2)^(-1/2)`, nodes and weights in closed form.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GaussChebyshev1;

impl GaussChebyshev1
{
    fn nodes_and_weights(&self, n: usize) -> Result<(Vec<f64>, Vec<f64>), SGError>
    {
        let nf = n as f64;
        let x = (0..n).map(|i| (PI * (2.0 * i as f64 + 1.0 - nf) / (2.0 * nf)).sin()).collect();
        Ok((x, vec![PI / nf; n]))
    }
}

/// Weight `(1 - x^2)^(1/2)`, nodes and weights in closed form.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GaussChebyshev2;

impl GaussChebyshev2
{
    fn nodes_and_weights(&self, n: usize) -> Result<(Vec<f64>, Vec<f64>), SGError>
    {
        let mut x = vec![0.0; n];
        let mut w = vec![0.0; n];
        let scale = PI / (n + 1) as f64;
        for i in 0..n
        {
            let theta = scale * (i + 1) as f64;
            x[n - i - 1] = theta.cos();
            w[n - i - 1] = scale * theta.sin() * theta.sin();
        }
        Ok((x, w))
    }
}

///
/// Weight `(1 - x)^alpha (1 + x)^beta` over [-1, 1], built from the Jacobi
/// three term recurrence.
///
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaussJacobi
{
    pub alpha: f64,
    pub beta: f64,
}

impl GaussJacobi
{
    pub fn new(alpha: f64, beta: f64) -> Result<Self, SGError>
    {
        Ok(Self { alpha: check_parameter("alpha", alpha)?, beta: check_parameter("beta", beta)? })
    }

    fn nodes_and_weights(&self, n: usize) -> Result<(Vec<f64>, Vec<f64>), SGError>
    {
        let (a, b) = (self.alpha, self.beta);
        let ab = a + b;
        let mu0 = 2.0_f64.powf(ab + 1.0) * gamma(a + 1.0) * gamma(b + 1.0) / gamma(ab + 2.0);

        let mut diag = vec![0.0; n];
        let mut off = vec![0.0; n];
        diag[0] = (b - a) / (ab + 2.0);
        off[0] = (4.0 * (a + 1.0) * (b + 1.0) / ((ab + 2.0) * (ab + 2.0) * (ab + 3.0))).sqrt();
        for i in 1..n
        {
            let s = 2.0 * i as f64 + ab;
            diag[i] = (b * b - a * a) / (s * (s + 2.0));
            let k = (i + 1) as f64;
            let t = 2.0 * k + ab;
            off[i] = (4.0 * k * (k + a) * (k + b) * (k + ab) / (t * t * (t + 1.0) * (t - 1.0))).sqrt();
        }
        decompose(&diag, &off, mu0)
    }
}

/// Weight `(1 - x^2)^alpha`, the symmetric Jacobi family.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaussGegenbauer
{
    pub alpha: f64,
}

impl GaussGegenbauer
{
    pub fn new(alpha: f64) -> Result<Self, SGError>
    {
        Ok(Self { alpha: check_parameter("alpha", alpha)? })
    }

    fn nodes_and_weights(&self, n: usize) -> Result<(Vec<f64>, Vec<f64>), SGError>
    {
        GaussJacobi { alpha: self.alpha, beta: self.alpha }.nodes_and_weights(n)
    }
}

/// Weight `|x|^alpha exp(-x^2)` over the real line.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaussHermite
{
    pub alpha: f64,
}

impl GaussHermite
{
    pub fn new(alpha: f64) -> Result<Self, SGError>
    {
        Ok(Self { alpha: check_parameter("alpha", alpha)? })
    }

    fn nodes_and_weights(&self, n: usize) -> Result<(Vec<f64>, Vec<f64>), SGError>
    {
        let off: Vec<f64> = (1..=n).map(|k|
        {
            let shift = if k % 2 == 1 { self.alpha } else { 0.0 };
            ((k as f64 + shift) / 2.0).sqrt()
        }).collect();
        decompose(&vec![0.0; n], &off, gamma((self.alpha + 1.0) / 2.0))
    }
}

/// Weight `x^alpha exp(-x)` over [0, inf).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaussLaguerre
{
    pub alpha: f64,
}

impl GaussLaguerre
{
    pub fn new(alpha: f64) -> Result<Self, SGError>
    {
        Ok(Self { alpha: check_parameter("alpha", alpha)? })
    }

    fn nodes_and_weights(&self, n: usize) -> Result<(Vec<f64>, Vec<f64>), SGError>
    {
        let a = self.alpha;
        let diag: Vec<f64> = (0..n).map(|i| 2.0 * i as f64 + a + 1.0).collect();
        let off: Vec<f64> = (1..=n).map(|k| (k as f64 * (k as f64 + a)).sqrt()).collect();
        decompose(&diag, &off, gamma(a + 1.0))
    }
}

gauss_family!(GaussLegendre, RuleType::GaussLegendre);
gauss_family!(GaussChebyshev1, RuleType::GaussChebyshev1);
gauss_family!(GaussChebyshev2, RuleType::GaussChebyshev2);
gauss_family!(GaussJacobi, RuleType::GaussJacobi);
gauss_family!(GaussGegenbauer, RuleType::GaussGegenbauer);
gauss_family!(GaussHermite, RuleType::GaussHermite);
gauss_family!(GaussLaguerre, RuleType::GaussLaguerre);

#[cfg(test)]
mod tests
{
    use super::*;

    fn moments<F: RuleFamily>(family: &F, level: usize) -> Vec<f64>
    {
        let (x, w) = family.build_level(level).unwrap();
        (0..=family.quadrature_exactness(level)).map(|k| x.iter().zip(&w).map(|(x, w)| w * x.powi(k as i32)).sum()).collect()
    }

    fn central_binomial_over_power(k: usize) -> f64
    {
        // C(k, k/2) / 2^k for even k
        (1..=k / 2).map(|j| (2 * j - 1) as f64 / (2 * j) as f64).product()
    }

    #[test]
    fn gauss_legendre_exactness()
    {
        for level in 0..20
        {
            for (k, q) in moments(&GaussLegendre, level).into_iter().enumerate()
            {
                let exact = if k % 2 == 0 { 2.0 / (k + 1) as f64 } else { 0.0 };
                assert!((q - exact).abs() < 1e-13, "level {level} degree {k}");
            }
        }
    }

    #[test]
    fn gauss_chebyshev_exactness()
    {
        for level in 0..10
        {
            for (k, q) in moments(&GaussChebyshev1, level).into_iter().enumerate()
            {
                let exact = if k % 2 == 0 { PI * central_binomial_over_power(k) } else { 0.0 };
                assert!((q - exact).abs() < 1e-13, "level {level} degree {k}");
            }
            for (k, q) in moments(&GaussChebyshev2, level).into_iter().enumerate()
            {
                let exact = if k % 2 == 0 { PI * central_binomial_over_power(k) / (k + 2) as f64 } else { 0.0 };
                assert!((q - exact).abs() < 1e-13, "level {level} degree {k}");
            }
        }
    }

    #[test]
    fn gegenbauer_matches_chebyshev()
    {
        for level in 0..8
        {
            let (x1, w1) = GaussGegenbauer::new(-0.5).unwrap().build_level(level).unwrap();
            let (mut x2, mut w2) = GaussChebyshev1.build_level(level).unwrap();
            x2.sort_by(f64::total_cmp);
            w2.sort_by(f64::total_cmp);
            for i in 0..=level
            {
                assert!((x1[i] - x2[i]).abs() < 1e-13);
                assert!((w1[i] - w2[i]).abs() < 1e-13);
            }
            let (x1, w1) = GaussGegenbauer::new(0.5).unwrap().build_level(level).unwrap();
            let (x2, w2) = GaussChebyshev2.build_level(level).unwrap();
            for i in 0..=level
            {
                assert!((x1[i] - x2[i]).abs() < 1e-13);
                assert!((w1[i] - w2[i]).abs() < 1e-13);
            }
        }
    }

    #[test]
    fn gauss_jacobi_polynomial_weight()
    {
        // with alpha = 1, beta = 2 the weight is a polynomial, integrate it with Gauss-Legendre
        let jacobi = GaussJacobi::new(1.0, 2.0).unwrap();
        let (xl, wl) = GaussLegendre.build_level(15).unwrap();
        for level in 0..6
        {
            for (k, q) in moments(&jacobi, level).into_iter().enumerate()
            {
                let exact: f64 = xl.iter().zip(&wl).map(|(&x, w)| w * (1.0 - x) * (1.0 + x) * (1.0 + x) * x.powi(k as i32)).sum();
                assert!((q - exact).abs() < 1e-13, "level {level} degree {k}");
            }
        }
    }

    #[test]
    fn gauss_hermite_exactness()
    {
        let hermite = GaussHermite::new(0.0).unwrap();
        for level in 0..8
        {
            for (k, q) in moments(&hermite, level).into_iter().enumerate()
            {
                // the absolute moment sets the scale of the rounding error
                let scale = gamma(k as f64 / 2.0 + 0.5);
                let exact = if k % 2 == 0 { scale } else { 0.0 };
                assert!((q - exact).abs() < 1e-12 * scale, "level {level} degree {k}");
            }
        }
    }

    #[test]
    fn gauss_laguerre_exactness()
    {
        let laguerre = GaussLaguerre::new(0.5).unwrap();
        for level in 0..6
        {
            for (k, q) in moments(&laguerre, level).into_iter().enumerate()
            {
                let exact = gamma(k as f64 + 1.5);
                assert!((q / exact - 1.0).abs() < 1e-12, "level {level} degree {k}");
            }
        }
    }

    #[test]
    fn invalid_parameters()
    {
        assert!(matches!(GaussJacobi::new(-1.0, 0.0), Err(SGError::InvalidRuleParameter { name: "alpha", .. })));
        assert!(matches!(GaussJacobi::new(0.0, f64::NAN), Err(SGError::InvalidRuleParameter { name: "beta", .. })));
        assert!(GaussLaguerre::new(-2.0).is_err());
        assert!(GaussHermite::new(f64::INFINITY).is_err());
    }
}
