//! CPU mirror of the sphere fragment shader.
//!
//! `demos/shaders/sphere.frag.wgsl` runs this exact procedure per pixel on the
//! GPU. Keeping a host copy lets the formula be tested without a device.

use glam::{Vec2, Vec3};

/// Color written where the ray misses the sphere.
pub const BACKGROUND: [f32; 3] = [0.1, 0.1, 0.1];

/// Direction towards the light, before normalization.
pub const LIGHT_DIR: Vec3 = Vec3::new(-0.5, 0.5, -1.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Distance along `ray` to the nearer intersection, or `None` on a miss.
    ///
    /// Solves `|o + t·d − c|² = r²` for the smaller root. The root may be
    /// negative when the origin is inside the sphere.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let to_ray = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let b = 2.0 * ray.direction.dot(to_ray);
        let c = to_ray.dot(to_ray) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        Some((-b - discriminant.sqrt()) / (2.0 * a))
    }

    /// Outward surface normal at `point`.
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize()
    }
}

/// Lambertian diffuse term: `color · max(n · l, 0)`.
pub fn lambert(normal: Vec3, light_dir: Vec3, color: Vec3) -> Vec3 {
    color * normal.dot(light_dir).max(0.0)
}

/// Shades one pixel the way the sphere shader does.
///
/// `frag` is the pixel position with the origin at the bottom-left corner
/// (the shader flips wgpu's top-left `@builtin(position)`). The camera is
/// orthographic: each pixel casts a ray from `(uv, -1)` along +Z, with `uv`
/// in `[-1, 1]` and X stretched by the aspect ratio.
pub fn shade_pixel(frag: Vec2, resolution: Vec2, sphere: &Sphere, color: Vec3) -> [f32; 3] {
    let mut uv = (frag / resolution) * 2.0 - 1.0;
    uv.x *= resolution.x / resolution.y;

    let ray = Ray {
        origin: uv.extend(-1.0),
        direction: Vec3::Z,
    };

    match sphere.intersect(&ray) {
        None => BACKGROUND,
        Some(t) => {
            let hit = ray.origin + t * ray.direction;
            lambert(sphere.normal_at(hit), LIGHT_DIR.normalize(), color).to_array()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOLUTION: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn ray_through_center_hits_front_surface() {
        let sphere = Sphere::new(Vec3::ZERO, 0.5);
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, -1.0),
            direction: Vec3::Z,
        };

        let t = sphere.intersect(&ray).expect("center ray should hit");
        assert!((t - 0.5).abs() < 1e-6);
    }

    #[test]
    fn ray_beside_sphere_misses() {
        let sphere = Sphere::new(Vec3::ZERO, 0.5);
        let ray = Ray {
            origin: Vec3::new(0.6, 0.0, -1.0),
            direction: Vec3::Z,
        };
        assert_eq!(sphere.intersect(&ray), None);
    }

    #[test]
    fn grazing_ray_has_single_root() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        let ray = Ray {
            origin: Vec3::new(1.0, 0.0, -2.0),
            direction: Vec3::Z,
        };
        let t = sphere.intersect(&ray).expect("tangent ray should touch");
        assert!((t - 2.0).abs() < 1e-6);
    }

    #[test]
    fn lambert_clamps_back_facing_light() {
        let color = Vec3::new(1.0, 0.5, 0.2);
        assert_eq!(lambert(Vec3::Z, -Vec3::Z, color), Vec3::ZERO);
        assert_eq!(lambert(Vec3::Z, Vec3::Z, color), color);
    }

    #[test]
    fn center_pixel_is_lit_and_corner_is_background() {
        let sphere = Sphere::new(Vec3::ZERO, 0.5);
        let color = Vec3::new(1.0, 0.5, 0.2);

        let center = shade_pixel(RESOLUTION / 2.0, RESOLUTION, &sphere, color);
        assert_ne!(center, BACKGROUND);
        // Facing the camera, the normal is -Z and the light's -Z component dominates.
        let expected = color * Vec3::NEG_Z.dot(LIGHT_DIR.normalize());
        for (got, want) in center.iter().zip(expected.to_array()) {
            assert!((got - want).abs() < 1e-5, "{center:?} vs {expected:?}");
        }

        let corner = shade_pixel(Vec2::ZERO, RESOLUTION, &sphere, color);
        assert_eq!(corner, BACKGROUND);
    }

    #[test]
    fn sphere_follows_its_center() {
        let color = Vec3::ONE;
        let moved = Sphere::new(Vec3::new(0.9, 0.0, 0.0), 0.5);

        // uv.x = 0.9 sits at frag.x = (0.9 / aspect + 1) / 2 * width.
        let aspect = RESOLUTION.x / RESOLUTION.y;
        let frag_x = (0.9 / aspect + 1.0) / 2.0 * RESOLUTION.x;
        let lit = shade_pixel(Vec2::new(frag_x, 300.0), RESOLUTION, &moved, color);
        assert_ne!(lit, BACKGROUND);

        let centered = Sphere::new(Vec3::ZERO, 0.5);
        let dark = shade_pixel(Vec2::new(frag_x, 300.0), RESOLUTION, &centered, color);
        assert_eq!(dark, BACKGROUND);
    }
}
