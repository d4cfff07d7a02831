//! Real spherical harmonics, SN3D normalised, ACN ordered, no Condon-Shortley phase.

/// Order and degree of an ACN channel index.
#[inline]
pub fn acn_order_degree(acn: usize) -> (usize, i32) {
    let order = (acn as f64).sqrt().floor() as usize;
    let degree = acn as i32 - (order * (order + 1)) as i32;
    (order, degree)
}

#[inline]
pub fn acn_index(order: usize, degree: i32) -> usize {
    ((order * (order + 1)) as i32 + degree) as usize
}

/// Evaluates every harmonic up to `order` for one direction.
///
/// Angles are in radians (azimuth positive to the left, elevation positive up).
/// `out` must hold at least `(order + 1)²` values.
pub fn evaluate(order: usize, azimuth: f32, elevation: f32, out: &mut [f32]) {
    let count = (order + 1) * (order + 1);
    debug_assert!(out.len() >= count);

    let az = azimuth as f64;
    let x = (elevation as f64).sin();
    let legendre = associated_legendre(order, x);

    for n in 0..=order {
        for m in -(n as i32)..=(n as i32) {
            let am = m.unsigned_abs() as usize;
            let norm = sn3d_norm(n, am);
            let p = legendre[n * (order + 1) + am];
            let trig = if m >= 0 {
                (m as f64 * az).cos()
            } else {
                (am as f64 * az).sin()
            };
            out[acn_index(n, m)] = (norm * p * trig) as f32;
        }
    }
}

/// `P_n^m(x)` for `0 <= m <= n <= order`, stored at `n * (order + 1) + m`.
fn associated_legendre(order: usize, x: f64) -> Vec<f64> {
    let stride = order + 1;
    let mut p = vec![0.0f64; stride * stride];
    let s = (1.0 - x * x).max(0.0).sqrt();

    // P_m^m = (2m-1)!! s^m
    let mut pmm = 1.0;
    for m in 0..=order {
        if m > 0 {
            pmm *= (2 * m - 1) as f64 * s;
        }
        p[m * stride + m] = pmm;
        if m < order {
            p[(m + 1) * stride + m] = x * (2 * m + 1) as f64 * pmm;
        }
        for n in (m + 2)..=order {
            let a = (2 * n - 1) as f64 * x * p[(n - 1) * stride + m];
            let b = (n + m - 1) as f64 * p[(n - 2) * stride + m];
            p[n * stride + m] = (a - b) / (n - m) as f64;
        }
    }
    p
}

fn sn3d_norm(n: usize, m: usize) -> f64 {
    let delta = if m == 0 { 1.0 } else { 2.0 };
    // (n-m)! / (n+m)!
    let ratio: f64 = ((n - m + 1)..=(n + m)).map(|k| 1.0 / k as f64).product();
    (delta * ratio).sqrt()
}
