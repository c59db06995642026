/// Dense square matrices, just enough for absorbing-chain algebra.
use std::ops::{Index, IndexMut};

/// Pivots at or below this magnitude mark the matrix singular.
pub const SINGULAR_EPS: f64 = 1e-13;

/// Row-major `n × n` matrix of `f64`.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    n: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(n: usize) -> Self {
        Self { n, data: vec![0.0; n * n] }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.n).map(|i| self.row(i).iter().sum()).collect()
    }

    /// Rows and columns `keep`, in that order.
    pub fn submatrix(&self, keep: &[usize]) -> Self {
        let mut m = Self::zeros(keep.len());
        for (a, &i) in keep.iter().enumerate() {
            for (b, &j) in keep.iter().enumerate() {
                m[(a, b)] = self[(i, j)];
            }
        }
        m
    }

    /// `I - self`.
    pub fn identity_minus(&self) -> Self {
        let mut m = Self::identity(self.n);
        for (x, y) in m.data.iter_mut().zip(&self.data) {
            *x -= y;
        }
        m
    }

    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(v.len(), self.n, "dimension mismatch");
        (0..self.n)
            .map(|i| self.row(i).iter().zip(v).map(|(a, b)| a * b).sum())
            .collect()
    }

    /// Gauss–Jordan with partial pivoting. `None` if singular.
    pub fn inverse(&self) -> Option<Self> {
        let n = self.n;
        let mut a = self.clone();
        let mut inv = Self::identity(n);

        for col in 0..n {
            let mut piv = col;
            for r in col + 1..n {
                if a[(r, col)].abs() > a[(piv, col)].abs() {
                    piv = r;
                }
            }
            let pv = a[(piv, col)];
            if !pv.is_finite() || pv.abs() <= SINGULAR_EPS {
                return None;
            }
            if piv != col {
                a.swap_rows(piv, col);
                inv.swap_rows(piv, col);
            }

            let scale = 1.0 / pv;
            for j in 0..n {
                a[(col, j)] *= scale;
                inv[(col, j)] *= scale;
            }

            for r in 0..n {
                if r == col {
                    continue;
                }
                let f = a[(r, col)];
                if f == 0.0 {
                    continue;
                }
                for j in 0..n {
                    let (da, di) = (f * a[(col, j)], f * inv[(col, j)]);
                    a[(r, j)] -= da;
                    inv[(r, j)] -= di;
                }
            }
        }
        Some(inv)
    }

    fn swap_rows(&mut self, i: usize, j: usize) {
        for k in 0..self.n {
            self.data.swap(i * self.n + k, j * self.n + k);
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;
    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.n + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.n + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_rows(rows: &[&[f64]]) -> Matrix {
        let mut m = Matrix::zeros(rows.len());
        for (i, r) in rows.iter().enumerate() {
            for (j, &x) in r.iter().enumerate() {
                m[(i, j)] = x;
            }
        }
        m
    }

    fn close(a: &Matrix, b: &Matrix, tol: f64) -> bool {
        a.data.iter().zip(&b.data).all(|(x, y)| (x - y).abs() < tol)
    }

    #[test]
    fn inverse_of_known_matrix() {
        let m = from_rows(&[&[4.0, 7.0], &[2.0, 6.0]]);
        let want = from_rows(&[&[0.6, -0.7], &[-0.2, 0.4]]);
        assert!(close(&m.inverse().unwrap(), &want, 1e-12));
    }

    #[test]
    fn inverse_needs_pivoting() {
        // zero at (0,0) forces a row swap
        let m = from_rows(&[&[0.0, 1.0, 0.0], &[1.0, 0.0, 0.0], &[0.0, 0.0, 2.0]]);
        let inv = m.inverse().unwrap();
        let want = from_rows(&[&[0.0, 1.0, 0.0], &[1.0, 0.0, 0.0], &[0.0, 0.0, 0.5]]);
        assert!(close(&inv, &want, 1e-12));
    }

    #[test]
    fn singular_is_none() {
        let m = from_rows(&[&[1.0, 2.0], &[2.0, 4.0]]);
        assert!(m.inverse().is_none());
        assert!(Matrix::zeros(3).inverse().is_none());
    }

    #[test]
    fn submatrix_and_identity_minus() {
        let m = from_rows(&[&[0.1, 0.2, 0.7], &[0.3, 0.3, 0.4], &[0.0, 0.0, 1.0]]);
        let q = m.submatrix(&[0, 1]);
        assert_eq!(q, from_rows(&[&[0.1, 0.2], &[0.3, 0.3]]));
        let d = q.identity_minus();
        assert!(close(&d, &from_rows(&[&[0.9, -0.2], &[-0.3, 0.7]]), 1e-15));
    }

    #[test]
    fn row_sums_and_mul_vec() {
        let m = from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(m.row_sums(), vec![3.0, 7.0]);
        assert_eq!(m.mul_vec(&[1.0, 1.0]), vec![3.0, 7.0]);
        assert_eq!(m.mul_vec(&[2.0, 0.5]), vec![3.0, 8.0]);
    }
}
