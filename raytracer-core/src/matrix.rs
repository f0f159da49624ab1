use std::ops::Mul;

use crate::types::V3;

#[derive(Copy, Clone)]
pub struct Matrix([[f32; 4]; 4]);

impl Default for Matrix {
    fn default() -> Self {
        // Identity matrix
        Matrix([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

impl Matrix {
    pub fn translate(x: f32, y: f32, z: f32) -> Matrix {
        Matrix([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [x, y, z, 1.0],
        ])
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Matrix {
        Matrix([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotate_x(theta_rads: f32) -> Matrix {
        let sin = theta_rads.sin();
        let cos = theta_rads.cos();
        Matrix([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, cos, sin, 0.0],
            [0.0, -sin, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotate_y(theta_rads: f32) -> Matrix {
        let sin = theta_rads.sin();
        let cos = theta_rads.cos();
        Matrix([
            [cos, 0.0, -sin, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [sin, 0.0, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotate_z(theta_rads: f32) -> Matrix {
        let sin = theta_rads.sin();
        let cos = theta_rads.cos();
        Matrix([
            [cos, -sin, 0.0, 0.0],
            [sin, cos, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn multiply(Matrix(m1): &Matrix, Matrix(m2): &Matrix) -> Matrix {
        let mut result = [[0.0; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    result[i][j] += m1[i][k] * m2[k][j];
                }
            }
        }
        Matrix(result)
    }
}

impl Mul for Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        Matrix::multiply(&self, &rhs)
    }
}

// V3 * Matrix
impl Mul<Matrix> for V3 {
    type Output = V3;

    fn mul(self, Matrix(m): Matrix) -> Self::Output {
        V3(
            m[0][0] * self.0 + m[1][0] * self.1 + m[2][0] * self.2 + m[3][0],
            m[0][1] * self.0 + m[1][1] * self.1 + m[2][1] * self.2 + m[3][1],
            m[0][2] * self.0 + m[1][2] * self.1 + m[2][2] * self.2 + m[3][2],
        )
    }
}

// Transformation composition

pub struct MatrixBuilder {
    matrix: Matrix,
}

impl MatrixBuilder {
    pub fn new() -> Self {
        Self {
            matrix: Matrix::default(),
        }
    }

    /// Add scale
    pub fn scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.matrix = self.matrix * Matrix::scale(x, y, z);
        self
    }

    /// Add rotation on the X axis
    pub fn rotate_x(mut self, theta_rads: f32) -> Self {
        self.matrix = self.matrix * Matrix::rotate_x(theta_rads);
        self
    }

    /// Add rotation on the Y axis
    pub fn rotate_y(mut self, theta_rads: f32) -> Self {
        self.matrix = self.matrix * Matrix::rotate_y(theta_rads);
        self
    }

    /// Add rotation on the Z axis
    pub fn rotate_z(mut self, theta_rads: f32) -> Self {
        self.matrix = self.matrix * Matrix::rotate_z(theta_rads);
        self
    }

    /// Add translation
    pub fn translate(mut self, x: f32, y: f32, z: f32) -> Self {
        self.matrix = self.matrix * Matrix::translate(x, y, z);
        self
    }

    /// Return the completed transformation matrix
    pub fn done(self) -> Matrix {
        self.matrix
    }
}

impl Default for MatrixBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use crate::types::V3;
    use super::{Matrix, MatrixBuilder};

    macro_rules! assert_approx_eq {
        ($a:expr, $b:expr) => {
            assert_approx_eq!($a, $b, EPSILON = 0.000001);
        };
        ($a:expr, $b:expr, EPSILON = $epsilon:expr) => {
            match (&$a, &$b, &$epsilon) {
                (a, b, e) => {
                    if (*a - *b).abs() > *e || (*b - *a).abs() > *e {
                        panic!(
                            "assertion {} ~== {} failed\n  left: {:?}\n right: {:?}",
                            stringify!($a),
                            stringify!($b),
                            a,
                            b
                        );
                    }
                }
            }
        };
    }

    #[test]
    fn translate_1() {
        let p1 = V3(-1.0, -1.0, -1.0);
        let p2 = p1 * Matrix::translate(1.0, 1.0, 1.0);
        assert_eq!(p2, V3::ZERO);
    }

    #[test]
    fn scale_1() {
        let p1 = V3(1.0, 2.0, 3.0);
        let p2 = p1 * Matrix::scale(2.0, 2.0, 2.0);
        assert_eq!(p2, V3(2.0, 4.0, 6.0));
    }

    #[test]
    fn rotate_x_quarter_turn() {
        let p1 = V3(0.0, 1.0, 0.0);
        let p2 = p1 * Matrix::rotate_x(std::f32::consts::FRAC_PI_2);
        assert_approx_eq!(p2.x(), 0.0);
        assert_approx_eq!(p2.y(), 0.0);
        assert_approx_eq!(p2.z(), 1.0);
    }

    #[test]
    fn builder_composes_scale_rotate_translate() {
        let m = MatrixBuilder::new()
            .scale(2.0, 2.0, 2.0)
            .rotate_y(0.0)
            .translate(1.0, 0.0, 0.0)
            .done();
        let p = V3(1.0, 0.0, 0.0) * m;
        assert_approx_eq!(p.x(), 3.0);
        assert_approx_eq!(p.y(), 0.0);
        assert_approx_eq!(p.z(), 0.0);
    }
}
