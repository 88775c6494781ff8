use std::fmt;
use std::ops::{Add, Div, Mul, MulAssign, Neg, Sub};
use std::str::FromStr;

use glam::{Mat4, Quat, Vec3, Vec4};

use crate::errors::RigError;

/// Below this length `normalize` leaves the quaternion untouched.
pub const NORMALIZE_EPSILON: f32 = 1e-8;

/// `slerp` switches to normalized `lerp` once `cos(theta)` is this close to 1.
pub const SLERP_EPSILON: f32 = 1e-5;

/// `|sin(pitch)|` this close to 1 is treated as the gimbal pole.
const GIMBAL_EPSILON: f32 = 1e-6;

/// Rotation quaternion `w + v·(i, j, k)`.
///
/// # Conventions
///
/// - The Hamilton product `b * a` applies `a` first, then `b`. A child's world
///   rotation is therefore `parent_world * local`.
/// - Rotations act on column vectors in a right-handed frame, matching
///   [`Quaternion::mat4`] and glam.
/// - Interpolation parameters are never clamped; `t` outside `[0, 1]`
///   extrapolates along the same arc.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quaternion {
    pub w: f32,
    pub v: Vec3,
}

impl Quaternion {
    /// The identity rotation `(1, 0, 0, 0)`.
    pub const IDENTITY: Self = Self {
        w: 1.0,
        v: Vec3::ZERO,
    };

    #[inline]
    #[must_use]
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self {
            w,
            v: Vec3::new(x, y, z),
        }
    }

    #[inline]
    #[must_use]
    pub const fn from_scalar_vector(w: f32, v: Vec3) -> Self {
        Self { w, v }
    }

    #[inline]
    #[must_use]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Rotation of `radians` around `axis`. The axis does not need to be unit length.
    #[must_use]
    pub fn from_axis_angle(axis: Vec3, radians: f32) -> Self {
        let axis = axis.normalize_or_zero();
        let (s, c) = (radians * 0.5).sin_cos();
        Self::from_scalar_vector(c, axis * s)
    }

    /// Rotation of `degrees` around `axis`.
    #[must_use]
    pub fn angle_axis(degrees: f32, axis: Vec3) -> Self {
        Self::from_axis_angle(axis, degrees.to_radians())
    }

    // ========================================================================
    // Norm
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn dot(self, rhs: Self) -> f32 {
        self.w * rhs.w + self.v.dot(rhs.v)
    }

    #[inline]
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Scales to unit length in place.
    ///
    /// A quaternion shorter than [`NORMALIZE_EPSILON`] has no direction and is
    /// left unchanged.
    pub fn normalize(&mut self) {
        let len = self.length();
        if len > NORMALIZE_EPSILON {
            *self = *self / len;
        }
    }

    #[must_use]
    pub fn normalized(self) -> Self {
        let mut q = self;
        q.normalize();
        q
    }

    /// Like [`Quaternion::normalized`] but reports the degenerate case.
    #[must_use]
    pub fn try_normalized(self) -> Option<Self> {
        let len = self.length();
        (len > NORMALIZE_EPSILON && len.is_finite()).then(|| self / len)
    }

    #[inline]
    #[must_use]
    pub fn is_normalized(self) -> bool {
        (self.length_squared() - 1.0).abs() < 1e-4
    }

    // ========================================================================
    // Inverse
    // ========================================================================

    /// Negates the vector part. This is the inverse for unit quaternions.
    #[inline]
    #[must_use]
    pub fn conjugate(self) -> Self {
        Self::from_scalar_vector(self.w, -self.v)
    }

    /// General inverse; identity for a degenerate quaternion.
    #[must_use]
    pub fn inverse(self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > NORMALIZE_EPSILON {
            self.conjugate() / len_sq
        } else {
            Self::IDENTITY
        }
    }

    // ========================================================================
    // Rotating points
    // ========================================================================

    /// Rotates `p`, assuming `self` is unit length.
    ///
    /// Expanded form of the sandwich product: `p + 2w(v × p) + 2v × (v × p)`.
    #[must_use]
    pub fn rotate_point(self, p: Vec3) -> Vec3 {
        let t = 2.0 * self.v.cross(p);
        p + self.w * t + self.v.cross(t)
    }

    /// Rotates `p` as the literal product `q * (0, p) * ~q`.
    #[must_use]
    pub fn rotate_point_sandwich(self, p: Vec3) -> Vec3 {
        (self * Self::from_scalar_vector(0.0, p) * self.conjugate()).v
    }

    // ========================================================================
    // Matrix conversion
    // ========================================================================

    /// Rotation matrix with the rotation in the upper 3×3 block.
    #[must_use]
    pub fn mat4(self) -> Mat4 {
        let Self { w, v } = self;
        let (x, y, z) = (v.x, v.y, v.z);
        let (x2, y2, z2) = (x + x, y + y, z + z);
        let (xx, yy, zz) = (x * x2, y * y2, z * z2);
        let (xy, xz, yz) = (x * y2, x * z2, y * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);

        Mat4::from_cols(
            Vec4::new(1.0 - (yy + zz), xy + wz, xz - wy, 0.0),
            Vec4::new(xy - wz, 1.0 - (xx + zz), yz + wx, 0.0),
            Vec4::new(xz + wy, yz - wx, 1.0 - (xx + yy), 0.0),
            Vec4::W,
        )
    }

    /// Extracts the rotation of a pure rotation matrix.
    ///
    /// Branches on the trace sign; when the trace is not positive the largest
    /// diagonal element selects the component computed from the square root so
    /// the divisor never approaches zero.
    #[must_use]
    pub fn from_mat4(mat: &Mat4) -> Self {
        // m[row][col]
        let m = |row: usize, col: usize| mat.col(col)[row];
        let (m00, m11, m22) = (m(0, 0), m(1, 1), m(2, 2));
        let trace = m00 + m11 + m22;

        let q = if trace > 0.0 {
            let s = 0.5 / (trace + 1.0).sqrt();
            Self::new(
                0.25 / s,
                (m(2, 1) - m(1, 2)) * s,
                (m(0, 2) - m(2, 0)) * s,
                (m(1, 0) - m(0, 1)) * s,
            )
        } else if m00 > m11 && m00 > m22 {
            let s = 2.0 * (1.0 + m00 - m11 - m22).sqrt();
            Self::new(
                (m(2, 1) - m(1, 2)) / s,
                0.25 * s,
                (m(0, 1) + m(1, 0)) / s,
                (m(0, 2) + m(2, 0)) / s,
            )
        } else if m11 > m22 {
            let s = 2.0 * (1.0 + m11 - m00 - m22).sqrt();
            Self::new(
                (m(0, 2) - m(2, 0)) / s,
                (m(0, 1) + m(1, 0)) / s,
                0.25 * s,
                (m(1, 2) + m(2, 1)) / s,
            )
        } else {
            let s = 2.0 * (1.0 + m22 - m00 - m11).sqrt();
            Self::new(
                (m(1, 0) - m(0, 1)) / s,
                (m(0, 2) + m(2, 0)) / s,
                (m(1, 2) + m(2, 1)) / s,
                0.25 * s,
            )
        };

        q.normalized()
    }

    // ========================================================================
    // Euler angles (ZYX)
    // ========================================================================

    /// Builds a rotation from `(roll, pitch, yaw)` radians.
    ///
    /// ZYX order: yaw about Z, then pitch about the new Y, then roll about the
    /// new X. Equivalent to `Rz(yaw) * Ry(pitch) * Rx(roll)`.
    #[must_use]
    pub fn from_euler_angles(euler: Vec3) -> Self {
        let (sr, cr) = (euler.x * 0.5).sin_cos();
        let (sp, cp) = (euler.y * 0.5).sin_cos();
        let (sy, cy) = (euler.z * 0.5).sin_cos();

        Self::new(
            cr * cp * cy + sr * sp * sy,
            sr * cp * cy - cr * sp * sy,
            cr * sp * cy + sr * cp * sy,
            cr * cp * sy - sr * sp * cy,
        )
    }

    /// Inverse of [`Quaternion::from_euler_angles`], returning `(roll, pitch, yaw)`.
    ///
    /// At the gimbal pole (pitch ±π/2) only `roll ∓ yaw` is defined; there roll
    /// is reported as 0 and the whole twist goes into yaw. The round trip holds
    /// for the rotation, not necessarily for the individual angles.
    #[must_use]
    pub fn to_euler_angles(self) -> Vec3 {
        let Self { w, v } = self;

        let sin_pitch = 2.0 * (w * v.y - v.z * v.x);
        if sin_pitch.abs() >= 1.0 - GIMBAL_EPSILON {
            let pitch = std::f32::consts::FRAC_PI_2.copysign(sin_pitch);
            let yaw = -2.0 * sin_pitch.signum() * v.x.atan2(w);
            return Vec3::new(0.0, pitch, yaw);
        }

        let roll = (2.0 * (w * v.x + v.y * v.z)).atan2(1.0 - 2.0 * (v.x * v.x + v.y * v.y));
        let pitch = sin_pitch.asin();
        let yaw = (2.0 * (w * v.z + v.x * v.y)).atan2(1.0 - 2.0 * (v.y * v.y + v.z * v.z));

        Vec3::new(roll, pitch, yaw)
    }

    // ========================================================================
    // Interpolation
    // ========================================================================

    /// Component-wise blend followed by normalization.
    ///
    /// Cheap, but angular velocity is not constant. Like `slerp`, `to` is
    /// negated when it lies in the opposite hemisphere, so `lerp(q, -q, t)`
    /// stays on `q` instead of collapsing to zero.
    #[must_use]
    pub fn lerp(from: Self, to: Self, t: f32) -> Self {
        let to = if from.dot(to) < 0.0 { -to } else { to };
        (from * (1.0 - t) + to * t).normalized()
    }

    /// Spherical interpolation along the shorter great arc.
    #[must_use]
    pub fn slerp(from: Self, to: Self, t: f32) -> Self {
        let mut cos_theta = from.dot(to);
        let mut to = to;

        // q and -q are the same rotation; take the short way round.
        if cos_theta < 0.0 {
            cos_theta = -cos_theta;
            to = -to;
        }

        // sin(theta) is too small to divide by.
        if cos_theta > 1.0 - SLERP_EPSILON {
            return Self::lerp(from, to, t);
        }

        let theta = cos_theta.acos();
        let inv_sin = 1.0 / theta.sin();
        let a = ((1.0 - t) * theta).sin() * inv_sin;
        let b = (t * theta).sin() * inv_sin;

        (from * a + to * b).normalized()
    }
}

impl Default for Quaternion {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ============================================================================
// Operators
// ============================================================================

/// Hamilton product.
impl Mul<Quaternion> for Quaternion {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            w: self.w * rhs.w - self.v.dot(rhs.v),
            v: self.w * rhs.v + rhs.w * self.v + self.v.cross(rhs.v),
        }
    }
}

impl MulAssign<Quaternion> for Quaternion {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::from_scalar_vector(self.w * rhs, self.v * rhs)
    }
}

impl Mul<Quaternion> for f32 {
    type Output = Quaternion;

    #[inline]
    fn mul(self, rhs: Quaternion) -> Quaternion {
        rhs * self
    }
}

impl Div<f32> for Quaternion {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self::from_scalar_vector(self.w / rhs, self.v / rhs)
    }
}

impl Add for Quaternion {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_scalar_vector(self.w + rhs.w, self.v + rhs.v)
    }
}

impl Sub for Quaternion {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_scalar_vector(self.w - rhs.w, self.v - rhs.v)
    }
}

impl Neg for Quaternion {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::from_scalar_vector(-self.w, -self.v)
    }
}

// ============================================================================
// glam interop
// ============================================================================

impl From<Quat> for Quaternion {
    fn from(q: Quat) -> Self {
        Self::new(q.w, q.x, q.y, q.z)
    }
}

impl From<Quaternion> for Quat {
    fn from(q: Quaternion) -> Self {
        Quat::from_xyzw(q.v.x, q.v.y, q.v.z, q.w)
    }
}

// ============================================================================
// Text form: "w x y z"
// ============================================================================

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.w, self.v.x, self.v.y, self.v.z)
    }
}

impl FromStr for Quaternion {
    type Err = RigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = [0.0_f32; 4];
        let mut fields = s.split_whitespace();

        for slot in &mut values {
            let field = fields
                .next()
                .ok_or_else(|| RigError::InvalidQuaternion(format!("expected 4 components in '{s}'")))?;
            *slot = field
                .parse()
                .map_err(|_| RigError::InvalidQuaternion(format!("'{field}' is not a number")))?;
        }

        if fields.next().is_some() {
            return Err(RigError::InvalidQuaternion(format!(
                "trailing data after 4 components in '{s}'"
            )));
        }

        let [w, x, y, z] = values;
        Ok(Self::new(w, x, y, z))
    }
}
