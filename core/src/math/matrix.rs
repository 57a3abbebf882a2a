use ndarray::{Array1, Array2, ArrayView2};

const MAX_SWEEPS: usize = 50;

/// Eigen decomposition of a real symmetric 3×3 matrix by cyclic Jacobi rotations.
#[derive(Debug, Clone)]
pub struct SymmetricEigen {
    /// Eigenvalues in descending order.
    pub values: Array1<f64>,
    /// Unit eigenvectors as columns, matching `values`.
    pub vectors: Array2<f64>,
}

impl SymmetricEigen {
    pub fn decompose(matrix: ArrayView2<f64>) -> Self {
        let n = matrix.nrows();
        let mut a = matrix.to_owned();
        let mut v = Array2::<f64>::eye(n);

        let scale = a.iter().map(|x| x * x).sum::<f64>();
        for _ in 0..MAX_SWEEPS {
            let off_diagonal = off_diagonal_sum(&a);
            if off_diagonal <= f64::EPSILON * f64::EPSILON * scale {
                break;
            }
            for p in 0..n {
                for q in (p + 1)..n {
                    rotate(&mut a, &mut v, p, q);
                }
            }
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&i, &j| a[[j, j]].total_cmp(&a[[i, i]]));

        let values = Array1::from_iter(order.iter().map(|&i| a[[i, i]]));
        let mut vectors = Array2::<f64>::zeros((n, n));
        for (column, &source) in order.iter().enumerate() {
            vectors.column_mut(column).assign(&v.column(source));
        }

        Self { values, vectors }
    }

    pub fn vector(&self, index: usize) -> [f64; 3] {
        let column = self.vectors.column(index);
        [column[0], column[1], column[2]]
    }
}

fn off_diagonal_sum(a: &Array2<f64>) -> f64 {
    let n = a.nrows();
    let mut sum = 0.0;
    for p in 0..n {
        for q in (p + 1)..n {
            sum += a[[p, q]] * a[[p, q]];
        }
    }
    sum
}

// Zeroes a[p][q] with A' = Jᵀ A J and accumulates V' = V J.
fn rotate(a: &mut Array2<f64>, v: &mut Array2<f64>, p: usize, q: usize) {
    let apq = a[[p, q]];
    if apq == 0.0 {
        return;
    }
    let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
    let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
    let c = 1.0 / (t * t + 1.0).sqrt();
    let s = t * c;
    let n = a.nrows();

    for k in 0..n {
        let akp = a[[k, p]];
        let akq = a[[k, q]];
        a[[k, p]] = c * akp - s * akq;
        a[[k, q]] = s * akp + c * akq;
    }
    for k in 0..n {
        let apk = a[[p, k]];
        let aqk = a[[q, k]];
        a[[p, k]] = c * apk - s * aqk;
        a[[q, k]] = s * apk + c * aqk;
    }
    for k in 0..n {
        let vkp = v[[k, p]];
        let vkq = v[[k, q]];
        v[[k, p]] = c * vkp - s * vkq;
        v[[k, q]] = s * vkp + c * vkq;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    fn assert_eigenpairs(matrix: &Array2<f64>, eigen: &SymmetricEigen) {
        for i in 0..3 {
            let vector = eigen.vectors.column(i);
            let lhs = matrix.dot(&vector);
            let rhs = &vector * eigen.values[i];
            for k in 0..3 {
                assert!((lhs[k] - rhs[k]).abs() < 1e-9, "pair {i}");
            }
            assert!((vector.dot(&vector) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn diagonal_matrix_is_sorted_descending() {
        let m = arr2(&[[-1.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 0.5]]);
        let eigen = SymmetricEigen::decompose(m.view());
        assert_eq!(eigen.values.to_vec(), vec![3.0, 0.5, -1.0]);
        assert_eq!(eigen.vector(0), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn coupled_matrix_recovers_eigenpairs() {
        let m = arr2(&[[2.0, 1.0, 0.0], [1.0, 2.0, 0.0], [0.0, 0.0, 3.0]]);
        let eigen = SymmetricEigen::decompose(m.view());
        assert!((eigen.values[0] - 3.0).abs() < 1e-12);
        assert!((eigen.values[1] - 3.0).abs() < 1e-12);
        assert!((eigen.values[2] - 1.0).abs() < 1e-12);
        assert_eigenpairs(&m, &eigen);
    }

    #[test]
    fn dense_matrix_recovers_eigenpairs() {
        let m = arr2(&[[1.73, 2.12, 4.55], [2.12, -0.281, -0.657], [4.55, -0.657, -1.45]]);
        let eigen = SymmetricEigen::decompose(m.view());
        assert_eigenpairs(&m, &eigen);
        assert!(eigen.values[0] >= eigen.values[1]);
        assert!(eigen.values[1] >= eigen.values[2]);
    }
}
