use crate::{errors::SGError, rules::MAX_EIGEN_ITERATIONS};

///
/// Golub-Welsch construction of a Gauss rule.
///
/// `diag` holds the recurrence diagonal, `off` the off-diagonal (entry
/// `i` couples `i` and `i + 1`, the last entry is ignored) and `mu0` the
/// total measure of the weight function. Returns the nodes in increasing
/// order and the weights `mu0 * v0^2`, where `v0` is the first component of
/// the normalized eigenvector of each node.
///
/// Uses implicit-shift QL sweeps, tracking only the first row of the
/// eigenvector matrix.
///
pub fn decompose(diag: &[f64], off: &[f64], mu0: f64) -> Result<(Vec<f64>, Vec<f64>), SGError>
{
    let n = diag.len();
    let mut d = diag.to_vec();
    let mut e = vec![0.0; n];
    let m_off = off.len().min(n.saturating_sub(1));
    e[..m_off].copy_from_slice(&off[..m_off]);
    let mut z = vec![0.0; n];
    if n == 0
    {
        return Ok((d, z));
    }
    z[0] = 1.0;
    // a non-finite entry never deflates
    if !d.iter().chain(&e).all(|v| v.is_finite())
    {
        return Err(SGError::EigenSolverNotConverged { size: n });
    }

    for l in 0..n
    {
        let mut iterations = 0;
        loop
        {
            let mut m = l;
            while m + 1 < n
            {
                let dd = d[m].abs() + d[m + 1].abs();
                if e[m].abs() <= f64::EPSILON * dd
                {
                    break;
                }
                m += 1;
            }
            if m == l
            {
                break;
            }
            iterations += 1;
            if iterations > MAX_EIGEN_ITERATIONS
            {
                return Err(SGError::EigenSolverNotConverged { size: n });
            }
            let mut g = (d[l + 1] - d[l]) / (2.0 * e[l]);
            let mut r = g.hypot(1.0);
            g = d[m] - d[l] + e[l] / (g + r.copysign(g));
            let mut s = 1.0;
            let mut c = 1.0;
            let mut p = 0.0;
            let mut deflated = false;
            for i in (l..m).rev()
            {
                let f = s * e[i];
                let b = c * e[i];
                r = f.hypot(g);
                e[i + 1] = r;
                if r == 0.0
                {
                    // underflow, the matrix splits at i + 1
                    d[i + 1] -= p;
                    e[m] = 0.0;
                    deflated = true;
                    break;
                }
                s = f / r;
                c = g / r;
                g = d[i + 1] - p;
                r = (d[i] - g) * s + 2.0 * c * b;
                p = s * r;
                d[i + 1] = g + p;
                g = c * r - b;
                let t = z[i + 1];
                z[i + 1] = s * z[i] + c * t;
                z[i] = c * z[i] - s * t;
            }
            if deflated
            {
                continue;
            }
            d[l] -= p;
            e[l] = g;
            e[m] = 0.0;
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| d[a].total_cmp(&d[b]));
    let nodes = order.iter().map(|&i| d[i]).collect();
    let weights = order.iter().map(|&i| mu0 * z[i] * z[i]).collect();
    tracing::trace!(size = n, "tridiagonal eigensolve converged");
    Ok((nodes, weights))
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn two_point_legendre()
    {
        let s = 1.0 / 3.0_f64.sqrt();
        let (x, w) = decompose(&[0.0, 0.0], &[s, 0.0], 2.0).unwrap();
        assert!((x[0] + s).abs() < 1e-15);
        assert!((x[1] - s).abs() < 1e-15);
        assert!((w[0] - 1.0).abs() < 1e-14);
        assert!((w[1] - 1.0).abs() < 1e-14);
    }

    #[test]
    fn eigenvalues_of_path_graph()
    {
        // tridiag(1, 0, 1) has eigenvalues 2 cos(k pi / (n + 1))
        let n = 12;
        let (x, w) = decompose(&vec![0.0; n], &vec![1.0; n], 1.0).unwrap();
        for k in 1..=n
        {
            let expected = 2.0 * (std::f64::consts::PI * k as f64 / (n + 1) as f64).cos();
            assert!((x[n - k] - expected).abs() < 1e-13);
        }
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-14);
    }

    #[test]
    fn non_finite_input_does_not_converge()
    {
        assert_eq!(decompose(&[f64::NAN, 0.0], &[1.0, 0.0], 1.0), Err(SGError::EigenSolverNotConverged { size: 2 }));
        assert_eq!(decompose(&[0.0, 0.0, 0.0], &[1.0, f64::INFINITY, 0.0], 1.0), Err(SGError::EigenSolverNotConverged { size: 3 }));
    }

    #[test]
    fn single_node()
    {
        let (x, w) = decompose(&[0.25], &[0.0], 3.0).unwrap();
        assert_eq!(x, vec![0.25]);
        assert_eq!(w, vec![3.0]);
    }
}
