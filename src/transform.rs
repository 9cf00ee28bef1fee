//! Hand-rolled 4×4 transform math for placing, viewing and projecting geometry.
//!
//! Every matrix the demos upload is built here from closed-form formulas:
//!
//! - [`multiply`] — row-by-column product `a · b`
//! - [`perspective`] — OpenGL-convention projection (clip depth −1 at near, +1 at far)
//! - [`look_at`] — view matrix from an eye, a target and an up vector
//! - [`translate`] — translation in elements 12, 13 and 14
//! - [`rotate_y`] — rotation about +Y, angle in degrees
//!
//! # Layout
//!
//! [`Matrix4`] stores 16 `f32`s in column-major order (`index = col * 4 + row`),
//! the same order WGSL expects for a `mat4x4<f32>` uniform and the same order
//! [`glam::Mat4::to_cols_array`] produces. Shaders compose
//! `projection * view * model * vertex`, so the rightmost matrix applies first.
//!
//! ```
//! use firstlight::transform::{look_at, multiply, perspective, rotate_y, translate};
//! use firstlight::Vec3;
//!
//! let model = multiply(translate(0.0, 1.0, 0.0), rotate_y(45.0));
//! let view = look_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y);
//! let projection = perspective(45f32.to_radians(), 800.0 / 600.0, 0.1, 100.0);
//!
//! let clip = projection * view * model;
//! let ndc = clip.transform_point(Vec3::ZERO);
//! assert!(ndc.z > -1.0 && ndc.z < 1.0);
//! ```

use std::ops::Mul;

use glam::{Mat4, Vec3};

/// Below this length a cross product is treated as zero.
const DEGENERATE_EPSILON: f32 = 1e-6;

/// A fully populated 4×4 matrix in column-major order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix4 {
    m: [f32; 16],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Builds a matrix from 16 values in column-major order.
    pub const fn from_cols_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// Returns the 16 values in column-major order.
    pub const fn to_cols_array(&self) -> [f32; 16] {
        self.m
    }

    /// Returns the four columns, ready to be copied into a `mat4x4<f32>` uniform.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        let m = &self.m;
        [
            [m[0], m[1], m[2], m[3]],
            [m[4], m[5], m[6], m[7]],
            [m[8], m[9], m[10], m[11]],
            [m[12], m[13], m[14], m[15]],
        ]
    }

    /// Element at `row`, `col` (both in `0..4`).
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        assert!(row < 4 && col < 4, "matrix index ({row}, {col}) out of range");
        self.m[col * 4 + row]
    }

    /// Transforms a point (w = 1) and applies the perspective divide.
    ///
    /// If the resulting `w` is zero the undivided `xyz` is returned.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.m;
        let x = m[0] * p.x + m[4] * p.y + m[8] * p.z + m[12];
        let y = m[1] * p.x + m[5] * p.y + m[9] * p.z + m[13];
        let z = m[2] * p.x + m[6] * p.y + m[10] * p.z + m[14];
        let w = m[3] * p.x + m[7] * p.y + m[11] * p.z + m[15];

        if w != 0.0 {
            Vec3::new(x / w, y / w, z / w)
        } else {
            Vec3::new(x, y, z)
        }
    }

    /// Element-wise comparison with an absolute tolerance.
    pub fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// Returns true if every element is finite.
    pub fn is_finite(&self) -> bool {
        self.m.iter().all(|v| v.is_finite())
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        multiply(self, rhs)
    }
}

impl From<Mat4> for Matrix4 {
    fn from(m: Mat4) -> Self {
        Self::from_cols_array(m.to_cols_array())
    }
}

impl From<Matrix4> for Mat4 {
    fn from(m: Matrix4) -> Self {
        Mat4::from_cols_array(&m.to_cols_array())
    }
}

/// Standard matrix product `a · b`: applying the result equals applying `b`, then `a`.
pub fn multiply(a: Matrix4, b: Matrix4) -> Matrix4 {
    let mut out = [0.0f32; 16];
    for col in 0..4 {
        for row in 0..4 {
            out[col * 4 + row] = (0..4)
                .map(|k| a.m[k * 4 + row] * b.m[col * 4 + k])
                .sum::<f32>();
        }
    }
    Matrix4 { m: out }
}

/// OpenGL-convention perspective projection.
///
/// View-space points on the near plane (`z = -near`) land at NDC depth −1,
/// points on the far plane at +1. The caller must keep `aspect > 0`,
/// `0 < near < far` and `fov_y` within `(0, π)`; outside that range the
/// result is degenerate.
pub fn perspective(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Matrix4 {
    debug_assert!(aspect > 0.0, "aspect ratio must be positive, got {aspect}");
    debug_assert!(
        near > 0.0 && near < far,
        "clip planes must satisfy 0 < near < far, got near={near} far={far}"
    );
    debug_assert!(
        fov_y_radians > 0.0 && fov_y_radians < std::f32::consts::PI,
        "vertical fov must be within (0, pi), got {fov_y_radians}"
    );

    let tan_half_fov = (fov_y_radians / 2.0).tan();
    let mut m = [0.0f32; 16];
    m[0] = 1.0 / (aspect * tan_half_fov);
    m[5] = 1.0 / tan_half_fov;
    m[10] = -(far + near) / (far - near);
    m[11] = -1.0;
    m[14] = -(2.0 * far * near) / (far - near);
    Matrix4 { m }
}

/// Right-handed view matrix looking from `eye` towards `target`.
///
/// The basis is built by Gram–Schmidt: `forward = normalize(target - eye)`,
/// `side = normalize(forward × up)`, `up' = side × forward`. The rows
/// `(side, up', -forward)` are then composed with a translation by `-eye`.
///
/// When `forward` is parallel to `up` the side vector is undefined; a world
/// axis that is not parallel to `forward` is substituted for `up`. When
/// `eye == target` only the translation is kept. Use [`try_look_at`] to
/// detect either case instead.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Matrix4 {
    if let Some(view) = try_look_at(eye, target, up) {
        return view;
    }

    let forward = target - eye;
    if forward.length() <= DEGENERATE_EPSILON {
        return translate(-eye.x, -eye.y, -eye.z);
    }

    let fallback_up = [Vec3::Y, Vec3::Z, Vec3::X]
        .into_iter()
        .find(|axis| forward.normalize().cross(*axis).length() > DEGENERATE_EPSILON)
        .unwrap_or(Vec3::Z);
    try_look_at(eye, target, fallback_up).unwrap_or(translate(-eye.x, -eye.y, -eye.z))
}

/// Same as [`look_at`] but returns `None` for a zero-length view direction or
/// a view direction parallel to `up`.
pub fn try_look_at(eye: Vec3, target: Vec3, up: Vec3) -> Option<Matrix4> {
    let forward = target - eye;
    let forward_len = forward.length();
    if forward_len <= DEGENERATE_EPSILON {
        return None;
    }
    let forward = forward / forward_len;

    let side = forward.cross(up);
    let side_len = side.length();
    if side_len <= DEGENERATE_EPSILON {
        return None;
    }
    let side = side / side_len;
    let true_up = side.cross(forward);

    let basis = Matrix4::from_cols_array([
        side.x, true_up.x, -forward.x, 0.0, //
        side.y, true_up.y, -forward.y, 0.0, //
        side.z, true_up.z, -forward.z, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    Some(multiply(basis, translate(-eye.x, -eye.y, -eye.z)))
}

/// Identity with the translation `(x, y, z)` in elements 12, 13 and 14.
pub fn translate(x: f32, y: f32, z: f32) -> Matrix4 {
    let mut m = Matrix4::IDENTITY.m;
    m[12] = x;
    m[13] = y;
    m[14] = z;
    Matrix4 { m }
}

/// Right-handed rotation about +Y. Positive angles turn +X towards −Z.
///
/// Seen from above (+Y looking down) a positive angle turns counter-clockwise.
/// The transposed matrix (the left-handed reading) spins the other way.
pub fn rotate_y(angle_degrees: f32) -> Matrix4 {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    Matrix4::from_cols_array([
        cos, 0.0, -sin, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        sin, 0.0, cos, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn approx_vec(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    fn sample() -> Matrix4 {
        multiply(
            multiply(translate(1.0, -2.0, 3.5), rotate_y(33.0)),
            perspective(1.1, 1.5, 0.5, 20.0),
        )
    }

    #[test]
    fn identity_is_neutral_on_both_sides() {
        let m = sample();
        assert!(multiply(Matrix4::IDENTITY, m).abs_diff_eq(&m, EPSILON));
        assert!(multiply(m, Matrix4::IDENTITY).abs_diff_eq(&m, EPSILON));
    }

    #[test]
    fn multiply_is_associative() {
        let a = rotate_y(17.0);
        let b = translate(0.25, 4.0, -1.0);
        let c = look_at(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y);

        let left = multiply(a, multiply(b, c));
        let right = multiply(multiply(a, b), c);
        assert!(left.abs_diff_eq(&right, 1e-4));
    }

    #[test]
    fn multiply_applies_right_operand_first() {
        let m = multiply(translate(1.0, 0.0, 0.0), rotate_y(90.0));

        assert!(approx_vec(
            m.transform_point(Vec3::ZERO),
            Vec3::new(1.0, 0.0, 0.0)
        ));
        assert!(approx_vec(
            m.transform_point(Vec3::X),
            Vec3::new(1.0, 0.0, -1.0)
        ));
    }

    #[test]
    fn mul_operator_matches_multiply() {
        let a = rotate_y(10.0);
        let b = translate(1.0, 2.0, 3.0);
        assert_eq!(a * b, multiply(a, b));
    }

    #[test]
    fn multiply_matches_glam() {
        let a = rotate_y(25.0);
        let b = translate(-3.0, 0.5, 2.0);
        let expected = Matrix4::from(Mat4::from(a) * Mat4::from(b));
        assert!(multiply(a, b).abs_diff_eq(&expected, EPSILON));
    }

    #[test]
    fn perspective_maps_near_and_far_planes_to_ndc_bounds() {
        let near = 0.1;
        let far = 100.0;
        let proj = perspective(45f32.to_radians(), 1.0, near, far);

        let on_near = proj.transform_point(Vec3::new(0.0, 0.0, -near));
        let on_far = proj.transform_point(Vec3::new(0.0, 0.0, -far));

        assert!(approx_eq(on_near.z, -1.0), "near depth: {}", on_near.z);
        assert!((on_far.z - 1.0).abs() < 1e-4, "far depth: {}", on_far.z);
    }

    #[test]
    fn perspective_matches_glam_gl_convention() {
        let fov = 45f32.to_radians();
        let ours = perspective(fov, 800.0 / 600.0, 0.1, 100.0);
        let theirs = Matrix4::from(Mat4::perspective_rh_gl(fov, 800.0 / 600.0, 0.1, 100.0));
        assert!(ours.abs_diff_eq(&theirs, EPSILON));
    }

    #[test]
    fn perspective_layout() {
        let proj = perspective(90f32.to_radians(), 2.0, 1.0, 3.0);
        assert!(approx_eq(proj.get(0, 0), 0.5));
        assert!(approx_eq(proj.get(1, 1), 1.0));
        assert!(approx_eq(proj.get(2, 2), -2.0));
        assert_eq!(proj.get(3, 2), -1.0);
        assert!(approx_eq(proj.get(2, 3), -3.0));
        assert_eq!(proj.get(3, 3), 0.0);
    }

    #[test]
    fn look_at_moves_origin_in_front_of_camera() {
        let view = look_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y);
        let origin = view.transform_point(Vec3::ZERO);
        assert!(approx_vec(origin, Vec3::new(0.0, 0.0, -3.0)), "{origin:?}");
    }

    #[test]
    fn look_at_matches_glam_for_offset_eye() {
        let eye = Vec3::new(2.0, 3.0, 5.0);
        let target = Vec3::new(0.0, 1.0, 0.0);
        let ours = look_at(eye, target, Vec3::Y);
        let theirs = Matrix4::from(Mat4::look_at_rh(eye, target, Vec3::Y));
        assert!(ours.abs_diff_eq(&theirs, EPSILON));

        // The target always ends up straight ahead on -Z.
        let ahead = ours.transform_point(target);
        assert!(approx_eq(ahead.x, 0.0) && approx_eq(ahead.y, 0.0));
        assert!(approx_eq(ahead.z, -(target - eye).length()));
    }

    #[test]
    fn try_look_at_rejects_degenerate_inputs() {
        assert!(try_look_at(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0), Vec3::Y).is_none());
        assert!(try_look_at(Vec3::ONE, Vec3::ONE, Vec3::Y).is_none());
        assert!(try_look_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y).is_some());
    }

    #[test]
    fn look_at_falls_back_when_up_is_parallel() {
        let eye = Vec3::new(0.0, 4.0, 0.0);
        let view = look_at(eye, Vec3::ZERO, Vec3::Y);

        assert!(view.is_finite());
        let target = view.transform_point(Vec3::ZERO);
        assert!(approx_vec(target, Vec3::new(0.0, 0.0, -4.0)), "{target:?}");
    }

    #[test]
    fn look_at_with_coincident_points_only_translates() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(look_at(eye, eye, Vec3::Y), translate(-1.0, -2.0, -3.0));
    }

    #[test]
    fn translate_sets_last_column() {
        let t = translate(4.0, 5.0, 6.0);
        let m = t.to_cols_array();
        assert_eq!(&m[12..15], &[4.0, 5.0, 6.0]);
        assert_eq!(m[15], 1.0);
        assert_eq!(
            t.transform_point(Vec3::new(1.0, 1.0, 1.0)),
            Vec3::new(5.0, 6.0, 7.0)
        );
        assert_eq!(translate(0.0, 0.0, 0.0), Matrix4::IDENTITY);
    }

    #[test]
    fn rotate_y_full_turns_are_identity() {
        assert!(rotate_y(0.0).abs_diff_eq(&Matrix4::IDENTITY, EPSILON));
        assert!(rotate_y(360.0).abs_diff_eq(&Matrix4::IDENTITY, EPSILON));
    }

    #[test]
    fn rotate_y_quarter_turn() {
        let r = rotate_y(90.0);
        assert!(approx_vec(
            r.transform_point(Vec3::X),
            Vec3::new(0.0, 0.0, -1.0)
        ));
        assert!(approx_vec(r.transform_point(Vec3::Y), Vec3::Y));
        assert!(r.abs_diff_eq(
            &Matrix4::from(Mat4::from_rotation_y(90f32.to_radians())),
            EPSILON
        ));
    }

    #[test]
    fn cols_array_2d_groups_columns() {
        let cols = translate(7.0, 8.0, 9.0).to_cols_array_2d();
        assert_eq!(cols[3], [7.0, 8.0, 9.0, 1.0]);
        assert_eq!(cols[0], [1.0, 0.0, 0.0, 0.0]);
    }
}
