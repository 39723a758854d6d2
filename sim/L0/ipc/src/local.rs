//! Bounded-size local gradients and Hessians.
//!
//! A constraint touches 1 to 4 vertices with 2 or 3 coordinates each, so its
//! local derivatives have between 2 and 12 entries per side. [`VectorMax12`]
//! and [`MatrixMax12`] keep a 12-capacity stack buffer plus the active size;
//! arithmetic and the PSD projection only visit the active block.

use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub};

use nalgebra::{DMatrix, DVector, SMatrix, SVector, SymmetricEigen};

/// Largest local stencil: four vertices in three dimensions.
pub const MAX_LOCAL_DOF: usize = 12;

/// Local vector with at most [`MAX_LOCAL_DOF`] entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorMax12 {
    data: SVector<f64, MAX_LOCAL_DOF>,
    len: usize,
}

impl VectorMax12 {
    /// Zero vector with `len` active entries (capped at [`MAX_LOCAL_DOF`]).
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        debug_assert!(len <= MAX_LOCAL_DOF);
        Self {
            data: SVector::zeros(),
            len: len.min(MAX_LOCAL_DOF),
        }
    }

    /// Build from a function of the entry index.
    #[must_use]
    pub fn from_fn(len: usize, mut f: impl FnMut(usize) -> f64) -> Self {
        let mut out = Self::zeros(len);
        for i in 0..out.len {
            out.data[i] = f(i);
        }
        out
    }

    /// Restrict a three-coordinates-per-point stencil result to `dim`
    /// coordinates per point.
    ///
    /// With `dim == 3` this is a copy; with `dim == 2` the `z` entries of
    /// every point are dropped.
    #[must_use]
    pub fn from_stencil<const N: usize>(full: &SVector<f64, N>, dim: usize) -> Self {
        debug_assert!(dim == 2 || dim == 3);
        Self::from_fn((N / 3) * dim, |i| full[3 * (i / dim) + i % dim])
    }

    /// Number of active entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no active entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Active entries.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data.as_slice()[..self.len]
    }

    /// Iterator over the active entries.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.as_slice().iter()
    }

    /// Dot product over the active entries.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        debug_assert_eq!(self.len, other.len);
        self.iter().zip(other.iter()).map(|(a, b)| a * b).sum()
    }

    /// Euclidean norm.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Largest absolute entry.
    #[must_use]
    pub fn amax(&self) -> f64 {
        self.iter().fold(0.0, |acc: f64, v| acc.max(v.abs()))
    }

    /// Outer product `self · otherᵀ`.
    #[must_use]
    pub fn outer(&self, other: &Self) -> MatrixMax12 {
        debug_assert_eq!(self.len, other.len);
        MatrixMax12::from_fn(self.len, |i, j| self.data[i] * other.data[j])
    }

    /// Heap copy of the active entries.
    #[must_use]
    pub fn to_dvector(&self) -> DVector<f64> {
        DVector::from_column_slice(self.as_slice())
    }
}

impl Index<usize> for VectorMax12 {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.as_slice()[i]
    }
}

impl IndexMut<usize> for VectorMax12 {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        let len = self.len;
        &mut self.data.as_mut_slice()[..len][i]
    }
}

impl Add for VectorMax12 {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for VectorMax12 {
    fn add_assign(&mut self, rhs: Self) {
        debug_assert_eq!(self.len, rhs.len);
        for i in 0..self.len {
            self.data[i] += rhs.data[i];
        }
    }
}

impl Sub for VectorMax12 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + -rhs
    }
}

impl Neg for VectorMax12 {
    type Output = Self;

    fn neg(self) -> Self {
        self * -1.0
    }
}

impl Mul<f64> for VectorMax12 {
    type Output = Self;

    fn mul(mut self, rhs: f64) -> Self {
        for i in 0..self.len {
            self.data[i] *= rhs;
        }
        self
    }
}

/// Square local matrix with at most [`MAX_LOCAL_DOF`] rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixMax12 {
    data: SMatrix<f64, MAX_LOCAL_DOF, MAX_LOCAL_DOF>,
    dim: usize,
}

impl MatrixMax12 {
    /// Zero `dim × dim` matrix (capped at [`MAX_LOCAL_DOF`]).
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        debug_assert!(dim <= MAX_LOCAL_DOF);
        Self {
            data: SMatrix::zeros(),
            dim: dim.min(MAX_LOCAL_DOF),
        }
    }

    /// Build from a function of `(row, column)`.
    #[must_use]
    pub fn from_fn(dim: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut out = Self::zeros(dim);
        for j in 0..out.dim {
            for i in 0..out.dim {
                out.data[(i, j)] = f(i, j);
            }
        }
        out
    }

    /// Restrict a three-coordinates-per-point stencil Hessian to `dim`
    /// coordinates per point. See [`VectorMax12::from_stencil`].
    #[must_use]
    pub fn from_stencil<const N: usize>(full: &SMatrix<f64, N, N>, dim: usize) -> Self {
        debug_assert!(dim == 2 || dim == 3);
        let map = |i: usize| 3 * (i / dim) + i % dim;
        Self::from_fn((N / 3) * dim, |i, j| full[(map(i), map(j))])
    }

    /// Number of active rows (and columns).
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Transpose of the active block.
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.dim, |i, j| self.data[(j, i)])
    }

    /// Largest absolute entry.
    #[must_use]
    pub fn amax(&self) -> f64 {
        let mut max = 0.0_f64;
        for j in 0..self.dim {
            for i in 0..self.dim {
                max = max.max(self.data[(i, j)].abs());
            }
        }
        max
    }

    /// Heap copy of the active block.
    #[must_use]
    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.dim, self.dim, |i, j| self.data[(i, j)])
    }

    /// Eigenvalues of the (symmetric) active block, unsorted.
    #[must_use]
    pub fn symmetric_eigenvalues(&self) -> DVector<f64> {
        SymmetricEigen::new(self.to_dmatrix()).eigenvalues
    }

    /// Nearest positive-semidefinite matrix in the eigenvalue sense.
    ///
    /// The active block is eigen-decomposed, negative eigenvalues are set to
    /// zero and the matrix is recomposed from the original eigenvectors.
    /// Matrices with non-finite entries (a barrier evaluated at zero
    /// distance) are returned unchanged.
    #[must_use]
    pub fn project_to_psd(&self) -> Self {
        if self.dim == 0 || !self.data.iter().all(|v| v.is_finite()) {
            return *self;
        }
        let mut eigen = SymmetricEigen::new(self.to_dmatrix());
        if eigen.eigenvalues.iter().all(|&l| l >= 0.0) {
            return *self;
        }
        for l in eigen.eigenvalues.iter_mut() {
            *l = l.max(0.0);
        }
        let projected = eigen.recompose();
        Self::from_fn(self.dim, |i, j| projected[(i, j)])
    }
}

impl Index<(usize, usize)> for MatrixMax12 {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        debug_assert!(i < self.dim && j < self.dim);
        &self.data[(i, j)]
    }
}

impl IndexMut<(usize, usize)> for MatrixMax12 {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        debug_assert!(i < self.dim && j < self.dim);
        &mut self.data[(i, j)]
    }
}

impl Add for MatrixMax12 {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for MatrixMax12 {
    fn add_assign(&mut self, rhs: Self) {
        debug_assert_eq!(self.dim, rhs.dim);
        for j in 0..self.dim {
            for i in 0..self.dim {
                self.data[(i, j)] += rhs.data[(i, j)];
            }
        }
    }
}

impl Sub for MatrixMax12 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + rhs * -1.0
    }
}

impl Mul<f64> for MatrixMax12 {
    type Output = Self;

    fn mul(mut self, rhs: f64) -> Self {
        for j in 0..self.dim {
            for i in 0..self.dim {
                self.data[(i, j)] *= rhs;
            }
        }
        self
    }
}
