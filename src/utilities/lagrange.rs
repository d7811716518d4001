///
/// Barycentric coefficients `1 / prod_{j != i} (x_i - x_j)` for the given nodes.
///
pub fn lagrange_coeffs(points: &[f64]) -> Vec<f64>
{
    let mut coeffs = Vec::with_capacity(points.len());
    for i in 0..points.len()
    {
        let mut li = 1.0;
        for j in 0..points.len()
        {
            if i != j
            {
                li *= points[i] - points[j];
            }
        }
        coeffs.push(1.0 / li);
    }
    coeffs
}

///
/// Values of all Lagrange cardinal polynomials of `points` at `x`, written to
/// `weights`. Uses the second (true) barycentric form.
///
#[inline]
pub fn lagrange_weights(x: f64, coeffs: &[f64], points: &[f64], weights: &mut [f64])
{
    weights.fill(0.0);
    // handle case where point coincides with one of our nodes...
    for (&point, weight) in points.iter().zip(weights.iter_mut())
    {
        if (point - x).abs() < f64::EPSILON
        {
            *weight = 1.0;
            return;
        }
    }
    let mut normalization_factor = 0.0;
    coeffs.iter().zip(points).zip(weights.iter_mut()).for_each(|((&coeff, &xi), weight)|
    {
        *weight = coeff / (x - xi);
        normalization_factor += *weight;
    });
    weights.iter_mut().for_each(|w| *w /= normalization_factor);
}

#[test]
fn test_lagrange_weights()
{
    let points: Vec<f64> = (0..9).map(|j| (std::f64::consts::PI * j as f64 / 8.0).cos()).collect();
    let coeffs = lagrange_coeffs(&points);
    let mut weights = vec![0.0; points.len()];
    lagrange_weights(0.2, &coeffs, &points, &mut weights);
    let value: f64 = weights.iter().zip(&points).map(|(&w, x)| w * x * x * x).sum();
    assert!((1.0 - value / 0.008).abs() < 1e-13);
    assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-14);

    lagrange_weights(points[3], &coeffs, &points, &mut weights);
    assert_eq!(weights[3], 1.0);
    assert_eq!(weights.iter().sum::<f64>(), 1.0);
}
