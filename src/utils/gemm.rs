//! Row-major matrix multiply used by dense layers.
//!
//! With the `blas` feature the product goes through CBLAS `sgemm`; otherwise
//! a cache-friendly triple loop is used.

#[cfg(feature = "blas")]
extern crate blas_src;

/// Computes `c = a × b` for row-major `a` (m × k), `b` (k × n), `c` (m × n).
///
/// Callers are responsible for the slice lengths; layers validate them
/// before calling.
pub fn matmul(a: &[f32], b: &[f32], c: &mut [f32], m: usize, k: usize, n: usize) {
    debug_assert_eq!(a.len(), m * k);
    debug_assert_eq!(b.len(), k * n);
    debug_assert_eq!(c.len(), m * n);

    if m == 0 || n == 0 {
        return;
    }
    if k == 0 {
        c.iter_mut().for_each(|v| *v = 0.0);
        return;
    }

    sgemm(a, b, c, m, k, n);
}

#[cfg(feature = "blas")]
fn sgemm(a: &[f32], b: &[f32], c: &mut [f32], m: usize, k: usize, n: usize) {
    use cblas::{Layout, Transpose};

    unsafe {
        cblas::sgemm(
            Layout::RowMajor,
            Transpose::None,
            Transpose::None,
            m as i32,
            n as i32,
            k as i32,
            1.0,
            a,
            k as i32,
            b,
            n as i32,
            0.0,
            c,
            n as i32,
        );
    }
}

#[cfg(not(feature = "blas"))]
fn sgemm(a: &[f32], b: &[f32], c: &mut [f32], m: usize, k: usize, n: usize) {
    c.iter_mut().for_each(|v| *v = 0.0);
    for i in 0..m {
        let row_out = &mut c[i * n..(i + 1) * n];
        for (p, &a_ip) in a[i * k..(i + 1) * k].iter().enumerate() {
            if a_ip == 0.0 {
                continue;
            }
            let row_b = &b[p * n..(p + 1) * n];
            for (out, &b_pj) in row_out.iter_mut().zip(row_b) {
                *out += a_ip * b_pj;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matmul_2x3_3x2() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
        let mut c = vec![0.0f32; 4];
        matmul(&a, &b, &mut c, 2, 3, 2);
        assert_eq!(c, vec![58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn test_matmul_overwrites_output() {
        let a = vec![1.0, 0.0, 0.0, 1.0];
        let b = vec![2.0, 3.0, 4.0, 5.0];
        let mut c = vec![100.0f32; 4];
        matmul(&a, &b, &mut c, 2, 2, 2);
        assert_eq!(c, vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_matmul_empty_inner_dim() {
        let mut c = vec![1.0f32; 6];
        matmul(&[], &[], &mut c, 2, 0, 3);
        assert_eq!(c, vec![0.0; 6]);
    }
}
