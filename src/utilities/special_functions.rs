//! Gamma and log-gamma for real arguments.
//!
//! The two functions are mutually defined: `gamma` uses a rational
//! approximation below 12 and `exp(log_gamma)` above, `log_gamma` uses the
//! asymptotic Stirling series above 12 and `ln|gamma|` below.

use std::f64::consts::PI;

/// 0.5 * ln(2 pi)
const HALF_LOG_TWO_PI: f64 = 0.918_938_533_204_672_7;

/// Above this value gamma overflows a double.
const GAMMA_OVERFLOW: f64 = 171.624;

const NUMERATOR: [f64; 8] = [
    -1.716_185_138_865_495,
    24.765_650_805_575_92,
    -379.804_256_470_945_6,
    629.331_155_312_818_4,
    866.966_202_790_413_2,
    -31_451.272_968_848_367,
    -36_144.413_418_691_176,
    66_456.143_820_240_54,
];

const DENOMINATOR: [f64; 8] = [
    -30.840_230_011_973_9,
    315.350_626_979_604_16,
    -1_015.156_367_490_219_2,
    -3_107.771_671_572_311,
    22_538.118_420_980_151,
    4_755.846_277_527_881,
    -134_659.959_864_969_3,
    -115_132.259_675_553_48,
];

const STIRLING: [f64; 8] = [
    1.0 / 12.0,
    -1.0 / 360.0,
    1.0 / 1260.0,
    -1.0 / 1680.0,
    1.0 / 1188.0,
    -691.0 / 360_360.0,
    1.0 / 156.0,
    -3617.0 / 122_400.0,
];

/// Gamma function for real `x` that is not a non-positive integer.
pub fn gamma(x: f64) -> f64
{
    if x <= 0.0
    {
        // reflection, the caller guarantees x is not a pole
        return PI / ((PI * x).sin() * gamma(1.0 - x));
    }
    if x < 12.0
    {
        let mut y = x;
        let mut n = 0;
        let less_than_one = y < 1.0;
        if less_than_one
        {
            y += 1.0;
        }
        else
        {
            n = y.floor() as usize - 1;
            y -= n as f64;
        }
        let z = y - 1.0;
        let mut num = 0.0;
        let mut den = 1.0;
        for (p, q) in NUMERATOR.iter().zip(DENOMINATOR.iter())
        {
            num = (num + p) * z;
            den = den * z + q;
        }
        let mut result = num / den + 1.0;
        if less_than_one
        {
            result /= y - 1.0;
        }
        else
        {
            for _ in 0..n
            {
                result *= y;
                y += 1.0;
            }
        }
        return result;
    }
    if x > GAMMA_OVERFLOW
    {
        return f64::INFINITY;
    }
    log_gamma(x).exp()
}

/// Natural logarithm of |gamma(x)|.
pub fn log_gamma(x: f64) -> f64
{
    if x < 12.0
    {
        return gamma(x).abs().ln();
    }
    let z = 1.0 / (x * x);
    let mut sum = STIRLING[7];
    for c in STIRLING[..7].iter().rev()
    {
        sum = sum * z + c;
    }
    (x - 0.5) * x.ln() - x + HALF_LOG_TWO_PI + sum / x
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn factorial(n: u32) -> f64
    {
        (1..=n).map(|k| k as f64).product()
    }

    #[test]
    fn gamma_matches_factorials()
    {
        for n in 1..20
        {
            let expected = factorial(n - 1);
            assert!((gamma(n as f64) / expected - 1.0).abs() < 1e-14, "n = {n}");
        }
    }

    #[test]
    fn gamma_half_integers()
    {
        let sqrt_pi = PI.sqrt();
        assert!((gamma(0.5) / sqrt_pi - 1.0).abs() < 1e-14);
        assert!((gamma(1.5) / (0.5 * sqrt_pi) - 1.0).abs() < 1e-14);
        assert!((gamma(-0.5) / (-2.0 * sqrt_pi) - 1.0).abs() < 1e-14);
        assert!((gamma(13.5) / (gamma(12.5) * 12.5) - 1.0).abs() < 1e-13);
    }

    #[test]
    fn log_gamma_is_consistent()
    {
        for &x in &[0.3, 1.7, 5.5, 11.9, 12.0, 20.0, 50.5]
        {
            assert!((log_gamma(x) - gamma(x).ln()).abs() < 1e-12, "x = {x}");
        }
        assert!((log_gamma(30.0) - factorial(29).ln()).abs() < 1e-12);
    }
}
