//! Small fixed-size vector and matrix types for direction and frame math.
//!
//! `Vec3` holds a Cartesian direction, `Mat3` a 3x3 matrix stored in
//! row-major order. Rotation matrices between observer frames and the local
//! spherical basis matrices are both `Mat3`.
//!
//! # Example
//!
//! ```
//! use antpat_core::linalg::{Mat3, Vec3};
//!
//! let rz = Mat3::rotation_z(std::f64::consts::FRAC_PI_2);
//! let v = rz.mul_vec(&Vec3::new(1.0, 0.0, 0.0));
//! assert!((v.y - 1.0).abs() < 1e-12);
//! ```

/// Cartesian vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Euclidean length.
    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.to_array().iter().zip(other.to_array()).map(|(a, b)| a * b).sum()
    }

    /// Right-handed cross product `self × other`.
    pub fn cross(&self, other: &Self) -> Self {
        let (a, b) = (self, other);
        Self::new(a.y * b.z - a.z * b.y, a.z * b.x - a.x * b.z, a.x * b.y - a.y * b.x)
    }

    pub fn scale(&self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// 3x3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    /// `m[row][col]`
    pub m: [[f64; 3]; 3],
}

impl Mat3 {
    pub fn identity() -> Self {
        Self::from_columns(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0))
    }

    pub fn from_rows(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    /// Matrix with the given vectors as columns.
    pub fn from_columns(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self::from_rows([c0.to_array(), c1.to_array(), c2.to_array()]).transpose()
    }

    pub fn row(&self, i: usize) -> Vec3 {
        Vec3::from(self.m[i])
    }

    pub fn column(&self, j: usize) -> Vec3 {
        Vec3::new(self.m[0][j], self.m[1][j], self.m[2][j])
    }

    /// `self · v`
    pub fn mul_vec(&self, v: &Vec3) -> Vec3 {
        Vec3::new(self.row(0).dot(v), self.row(1).dot(v), self.row(2).dot(v))
    }

    /// `self · other`
    pub fn mul_mat(&self, other: &Self) -> Self {
        let mut m = [[0.0; 3]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            let r = self.row(i);
            for (j, v) in row.iter_mut().enumerate() {
                *v = r.dot(&other.column(j));
            }
        }
        Self { m }
    }

    pub fn transpose(&self) -> Self {
        let mut m = self.m;
        for (i, row) in m.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = self.m[j][i];
            }
        }
        Self { m }
    }

    /// Scalar triple product of the columns.
    pub fn determinant(&self) -> f64 {
        self.column(0).dot(&self.column(1).cross(&self.column(2)))
    }

    /// True when `selfᵀ·self` is the identity within `tol`.
    pub fn is_orthonormal(&self, tol: f64) -> bool {
        let gram = self.transpose().mul_mat(self);
        (0..3).all(|i| (0..3).all(|j| (gram.m[i][j] - if i == j { 1.0 } else { 0.0 }).abs() < tol))
    }

    /// Frame rotation `Rz(yaw) · Ry(pitch) · Rx(roll)`.
    pub fn from_euler_zyx(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self::rotation_z(yaw)
            .mul_mat(&Self::rotation_y(pitch))
            .mul_mat(&Self::rotation_x(roll))
    }

    /// Right-handed rotation about +z.
    pub fn rotation_z(angle_rad: f64) -> Self {
        let (s, c) = angle_rad.sin_cos();
        Self::from_rows([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Right-handed rotation about +y.
    pub fn rotation_y(angle_rad: f64) -> Self {
        let (s, c) = angle_rad.sin_cos();
        Self::from_rows([[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]])
    }

    /// Right-handed rotation about +x.
    pub fn rotation_x(angle_rad: f64) -> Self {
        let (s, c) = angle_rad.sin_cos();
        Self::from_rows([[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]])
    }
}
