use std::ops::{Add, Div, Mul, Neg, Sub};

//
// Vec3
//

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct V3(pub f32, pub f32, pub f32); // x, y, z

impl V3 {
    pub const ZERO: V3 = V3(0.0, 0.0, 0.0);
    pub const ONE: V3 = V3(1.0, 1.0, 1.0);

    pub fn x(&self) -> f32 {
        self.0
    }

    pub fn y(&self) -> f32 {
        self.1
    }

    pub fn z(&self) -> f32 {
        self.2
    }

    pub fn xyz(&self) -> [f32; 3] {
        [self.0, self.1, self.2]
    }

    /// Returns the zero vector if `self` has zero length, rather than producing NaN.
    pub fn unit(self) -> V3 {
        let len_sq = self.length_squared();
        if len_sq == 0.0 {
            self
        } else {
            self / len_sq.sqrt()
        }
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(self) -> f32 {
        (self.0 * self.0) + (self.1 * self.1) + (self.2 * self.2)
    }

    pub fn dot(a: V3, b: V3) -> f32 {
        a.0 * b.0 + a.1 * b.1 + a.2 * b.2
    }

    pub fn cross(a: V3, b: V3) -> V3 {
        V3(
            a.1 * b.2 - a.2 * b.1,
            a.2 * b.0 - a.0 * b.2,
            a.0 * b.1 - a.1 * b.0,
        )
    }

    /// Component-wise reciprocal.
    pub fn inverse(self) -> V3 {
        V3(1.0 / self.0, 1.0 / self.1, 1.0 / self.2)
    }

    pub fn clamp01(self) -> V3 {
        V3(
            self.0.clamp(0.0, 1.0),
            self.1.clamp(0.0, 1.0),
            self.2.clamp(0.0, 1.0),
        )
    }

    /// Reflects `self` about `normal`, which is assumed to be a unit vector.
    pub fn reflect(self, normal: V3) -> V3 {
        self - normal * (V3::dot(self, normal) * 2.0)
    }
}

impl Add for V3 {
    type Output = V3;
    fn add(self, other: V3) -> V3 {
        V3(self.0 + other.0, self.1 + other.1, self.2 + other.2)
    }
}

impl Sub for V3 {
    type Output = V3;
    fn sub(self, other: V3) -> V3 {
        V3(self.0 - other.0, self.1 - other.1, self.2 - other.2)
    }
}

impl Mul for V3 {
    type Output = V3;
    fn mul(self, other: V3) -> V3 {
        V3(self.0 * other.0, self.1 * other.1, self.2 * other.2)
    }
}

impl Mul<f32> for V3 {
    type Output = V3;
    fn mul(self, f: f32) -> V3 {
        V3(self.0 * f, self.1 * f, self.2 * f)
    }
}

impl Div<f32> for V3 {
    type Output = V3;
    fn div(self, f: f32) -> V3 {
        self * (1.0 / f)
    }
}

impl Neg for V3 {
    type Output = V3;
    fn neg(self) -> V3 {
        V3(-self.0, -self.1, -self.2)
    }
}

impl Default for V3 {
    fn default() -> V3 {
        V3::ZERO
    }
}

//
// Ray
//

#[derive(Debug, Copy, Clone)]
pub struct Ray {
    pub origin: V3,
    pub direction: V3,
}

impl Ray {
    /// Direction is normalized at construction.
    pub fn new(origin: V3, direction: V3) -> Ray {
        Ray {
            origin,
            direction: direction.unit(),
        }
    }

    pub fn point_at_parameter(&self, t: f32) -> V3 {
        self.origin + (self.direction * t)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unit_of_zero_vector_is_zero() {
        assert_eq!(V3::ZERO.unit(), V3::ZERO);
    }

    #[test]
    fn unit_vector_has_unit_length() {
        let v = V3(3.0, 4.0, 0.0).unit();
        assert!((v.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn inverse_is_componentwise_reciprocal() {
        let v = V3(2.0, 4.0, 0.5).inverse();
        assert_eq!(v, V3(0.5, 0.25, 2.0));
    }

    #[test]
    fn reflect_about_surface_normal() {
        let incoming = V3(1.0, -1.0, 0.0).unit();
        let normal = V3(0.0, 1.0, 0.0);
        let reflected = incoming.reflect(normal);
        assert!((reflected.y() - (-incoming.y())).abs() < 1e-5);
        assert!((reflected.x() - incoming.x()).abs() < 1e-5);
    }
}
