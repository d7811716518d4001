use std::f64::consts::PI;

use rustfft::{FftPlanner, num_complex::Complex};

///
/// Clenshaw-Curtis weights over [-1, 1] for the nested rule with `2^level + 1`
/// points, computed with the approach of J. Waldvogel (2006)
/// "Fast construction of the Fejer and Clenshaw-Curtis quadrature rules".
/// The weights are symmetric, so the order matches any ordering of the
/// extrema.
///
pub(crate) fn cc_weights(level: u32) -> Vec<f64>
{
    if level == 0
    {
        return vec![2.0];
    }
    let n = 1_usize << level;
    let odd: Vec<f64> = (0..n).map(|i| (2 * i + 1) as f64).take_while(|&v| v < n as f64).collect();
    let l = odd.len();
    let m = n - l;
    let mut v0: Vec<f64> = odd.iter().map(|&i| 2.0 / (i * (i - 2.0))).collect();
    v0.push(1.0 / odd[l - 1]);
    v0.extend(std::iter::repeat(0.0).take(m));

    let end = v0.len();
    let v2: Vec<f64> = (0..end - 1).map(|i| -v0[i] - v0[end - i - 1]).collect();

    let mut weights = vec![Complex::new(-1.0, 0.0); n];
    weights[l] += n as f64;
    weights[m] += n as f64;
    let g_scale = (n * n - 1 + n % 2) as f64;
    for (g, w) in weights.iter_mut().zip(v2)
    {
        g.re = g.re / g_scale + w;
    }
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_inverse(n);
    fft.process(&mut weights);

    // the (0, 1) normalization is 0.5 / n, doubled for [-1, 1]
    let mut result: Vec<f64> = weights.iter().map(|w| w.re / n as f64).collect();
    result.push(result[0]);
    result
}

///
/// Clenshaw-Curtis weights over [-1, 1] for `n` extrema `cos(pi j / (n-1))`,
/// valid for any `n`, nested or not.
///
pub(crate) fn clenshaw_curtis_weights(n: usize) -> Vec<f64>
{
    if n == 1
    {
        return vec![2.0];
    }
    let big_n = n - 1;
    (0..n).map(|j|
    {
        let theta = PI * j as f64 / big_n as f64;
        let mut s = 0.0;
        for k in 1..=big_n / 2
        {
            let b = if 2 * k == big_n { 1.0 } else { 2.0 };
            s += b / (4.0 * (k * k) as f64 - 1.0) * (2.0 * k as f64 * theta).cos();
        }
        let c = if j == 0 || j == big_n { 1.0 } else { 2.0 };
        c / big_n as f64 * (1.0 - s)
    }).collect()
}

///
/// Weights of Fejer's second rule over [-1, 1] for the `n` interior extrema
/// `cos(pi j / (n+1))`, `j = 1..=n`.
///
pub(crate) fn fejer2_weights(n: usize) -> Vec<f64>
{
    (1..=n).map(|j|
    {
        let theta = PI * j as f64 / (n + 1) as f64;
        let mut s = 0.0;
        for k in 1..=(n + 1) / 2
        {
            let odd = (2 * k - 1) as f64;
            s += (odd * theta).sin() / odd;
        }
        4.0 * theta.sin() / (n + 1) as f64 * s
    }).collect()
}

#[test]
fn check_weights()
{
    // weights from CLENSHAW_CURTIS_RULE by J. Burkardt over (-1, +1)
    let weights5 = [0.06666666666666668, 0.5333333333333333, 0.7999999999999999, 0.5333333333333334, 0.06666666666666668];
    let computed = cc_weights(2);
    assert_eq!(computed.len(), 5);
    for (w, expected) in computed.iter().zip(weights5)
    {
        assert!((1.0 - w / expected).abs() < 1e-14);
    }
    assert!((computed.iter().sum::<f64>() - 2.0).abs() < 1e-15);
}

#[test]
fn fft_weights_match_closed_form()
{
    for level in 1..=7
    {
        let fft = cc_weights(level);
        let closed = clenshaw_curtis_weights((1 << level) + 1);
        for (a, b) in fft.iter().zip(&closed)
        {
            assert!((a - b).abs() < 1e-14, "level {level}");
        }
    }
}

#[test]
fn fejer2_integrates_even_monomials()
{
    for n in [3_usize, 7, 15]
    {
        let w = fejer2_weights(n);
        let x: Vec<f64> = (1..=n).map(|j| (PI * j as f64 / (n + 1) as f64).cos()).collect();
        let degree = (n - 1) as i32;
        let integral: f64 = w.iter().zip(&x).map(|(w, x)| w * x.powi(degree)).sum();
        assert!((integral - 2.0 / (degree + 1) as f64).abs() < 1e-14);
    }
}
