//! Shape primitives and the ray/overlap math behind the query surface.

use glam::{Vec2, Vec3};

#[derive(Copy, Clone, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    #[inline]
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }
}

#[derive(Copy, Clone, Debug)]
pub enum Shape {
    Aabb(Aabb),
    Sphere { center: Vec3, radius: f32 },
    /// Vertical cylinder; the proxy shape for entities.
    CylinderY {
        center: Vec3,
        radius: f32,
        half_height: f32,
    },
}

/// Query volume for overlap tests (hazard damage areas, activation zones).
#[derive(Copy, Clone, Debug)]
pub enum Region {
    Box { center: Vec3, half_extents: Vec3 },
    Sphere { center: Vec3, radius: f32 },
}

/// Entry distance of a ray against a shape, if within `max_dist`.
/// `dir` must be normalized. A ray starting inside reports distance 0.
pub fn ray_shape(origin: Vec3, dir: Vec3, max_dist: f32, shape: &Shape) -> Option<f32> {
    let t = match shape {
        Shape::Aabb(b) => ray_aabb(origin, dir, b)?,
        Shape::Sphere { center, radius } => ray_sphere(origin, dir, *center, *radius)?,
        Shape::CylinderY {
            center,
            radius,
            half_height,
        } => ray_cylinder_y(origin, dir, *center, *radius, *half_height)?,
    };
    (t <= max_dist).then_some(t)
}

fn ray_aabb(origin: Vec3, dir: Vec3, b: &Aabb) -> Option<f32> {
    // Slab method; zero direction components handled via infinities.
    let inv = dir.recip();
    let t0 = (b.min - origin) * inv;
    let t1 = (b.max - origin) * inv;
    let tmin = t0.min(t1);
    let tmax = t0.max(t1);
    let enter = tmin.max_element();
    let exit = tmax.min_element();
    if enter > exit || exit < 0.0 {
        return None;
    }
    Some(enter.max(0.0))
}

fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    if oc.length_squared() <= radius * radius {
        return Some(0.0);
    }
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

fn ray_cylinder_y(
    origin: Vec3,
    dir: Vec3,
    center: Vec3,
    radius: f32,
    half_height: f32,
) -> Option<f32> {
    let y_min = center.y - half_height;
    let y_max = center.y + half_height;
    let o = Vec2::new(origin.x - center.x, origin.z - center.z);
    let d = Vec2::new(dir.x, dir.z);
    let a = d.length_squared();
    if a <= 1e-12 {
        // Vertical ray: only hits if already over the cap circle.
        if o.length_squared() > radius * radius {
            return None;
        }
        if origin.y >= y_min && origin.y <= y_max {
            return Some(0.0);
        }
        let target = if origin.y < y_min { y_min } else { y_max };
        let t = (target - origin.y) / dir.y;
        return (t >= 0.0).then_some(t);
    }
    if o.length_squared() <= radius * radius && origin.y >= y_min && origin.y <= y_max {
        return Some(0.0);
    }
    let b = o.dot(d);
    let c = o.length_squared() - radius * radius;
    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / a;
    if t < 0.0 {
        return None;
    }
    let y = origin.y + dir.y * t;
    (y >= y_min && y <= y_max).then_some(t)
}

/// Overlap test between a query region and a collider shape.
pub fn region_overlaps_shape(region: &Region, shape: &Shape) -> bool {
    match (region, shape) {
        (Region::Box { center, half_extents }, s) => {
            let rb = Aabb {
                min: *center - *half_extents,
                max: *center + *half_extents,
            };
            aabb_overlaps_shape(&rb, s)
        }
        (Region::Sphere { center, radius }, s) => sphere_overlaps_shape(*center, *radius, s),
    }
}

fn aabb_overlaps_shape(rb: &Aabb, shape: &Shape) -> bool {
    match shape {
        Shape::Aabb(b) => {
            rb.min.cmple(b.max).all() && rb.max.cmpge(b.min).all()
        }
        Shape::Sphere { center, radius } => {
            rb.closest_point(*center).distance_squared(*center) <= radius * radius
        }
        Shape::CylinderY {
            center,
            radius,
            half_height,
        } => {
            if rb.max.y < center.y - half_height || rb.min.y > center.y + half_height {
                return false;
            }
            let closest = Vec2::new(
                center.x.clamp(rb.min.x, rb.max.x),
                center.z.clamp(rb.min.z, rb.max.z),
            );
            closest.distance_squared(Vec2::new(center.x, center.z)) <= radius * radius
        }
    }
}

fn sphere_overlaps_shape(sc: Vec3, sr: f32, shape: &Shape) -> bool {
    match shape {
        Shape::Aabb(b) => b.closest_point(sc).distance_squared(sc) <= sr * sr,
        Shape::Sphere { center, radius } => {
            sc.distance_squared(*center) <= (sr + radius) * (sr + radius)
        }
        Shape::CylinderY {
            center,
            radius,
            half_height,
        } => {
            let dy = (sc.y - center.y).abs() - half_height;
            let lateral = Vec2::new(sc.x - center.x, sc.z - center.z).length() - radius;
            let dy = dy.max(0.0);
            let lateral = lateral.max(0.0);
            dy * dy + lateral * lateral <= sr * sr
        }
    }
}
