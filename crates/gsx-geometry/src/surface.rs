//! Surfaces and straight-line intersections.
//!
//! Three shapes cover a cylindrical detector: z-axis cylinders (barrel
//! layers and covers), discs normal to z (end-cap layers and volume ends)
//! and bounded planes (free-standing destination surfaces).

use gsx_core::{perp, LayerId, PropDirection, SurfaceId, Vector3};

/// Geometric shape of a surface.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceShape {
    /// Cylinder around the z axis.
    Cylinder {
        /// Radius in mm.
        radius: f64,
        /// z of the cylinder centre.
        center_z: f64,
        /// Half length along z.
        half_z: f64,
    },
    /// Annulus in a plane of constant z.
    Disc {
        /// z position of the plane.
        z: f64,
        /// Inner radius.
        r_min: f64,
        /// Outer radius.
        r_max: f64,
    },
    /// Plane bounded by a circle around `center`.
    Plane {
        /// Centre point.
        center: Vector3,
        /// Unit normal.
        normal: Vector3,
        /// Radius of the circular bound.
        half_extent: f64,
    },
}

/// A straight-line intersection with a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    /// Global intersection point.
    pub position: Vector3,
    /// Signed path length from the start point along the unit direction.
    pub path_length: f64,
}

/// A surface of the tracking geometry.
#[derive(Clone, Debug)]
pub struct Surface {
    pub(crate) id: SurfaceId,
    pub(crate) shape: SurfaceShape,
    /// Layer this surface represents or belongs to.
    pub(crate) layer: Option<LayerId>,
    /// Material layer attached to a boundary surface.
    pub(crate) material_layer: Option<LayerId>,
}

impl Surface {
    /// This surface's id.
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// The shape.
    pub fn shape(&self) -> &SurfaceShape {
        &self.shape
    }

    /// Associated layer, if any.
    pub fn layer(&self) -> Option<LayerId> {
        self.layer
    }

    /// Boundary material layer, if any.
    pub fn material_layer(&self) -> Option<LayerId> {
        self.material_layer
    }

    /// A representative point on the surface.
    pub fn reference_point(&self) -> Vector3 {
        match &self.shape {
            SurfaceShape::Cylinder {
                radius, center_z, ..
            } => Vector3::new(*radius, 0.0, *center_z),
            SurfaceShape::Disc { z, r_min, r_max } => Vector3::new(0.5 * (r_min + r_max), 0.0, *z),
            SurfaceShape::Plane { center, .. } => *center,
        }
    }

    /// Unit normal at `position`; for cylinders the outward radial
    /// direction (falls back to +x on the axis).
    pub fn normal_at(&self, position: &Vector3) -> Vector3 {
        match &self.shape {
            SurfaceShape::Cylinder { .. } => {
                let r = perp(position);
                if r > 0.0 {
                    Vector3::new(position.x / r, position.y / r, 0.0)
                } else {
                    Vector3::x()
                }
            }
            SurfaceShape::Disc { .. } => Vector3::z(),
            SurfaceShape::Plane { normal, .. } => *normal,
        }
    }

    /// Whether `position` is within `tolerance` of the surface and inside
    /// its bounds (the bounds are widened by `tolerance` as well).
    pub fn is_on_surface(&self, position: &Vector3, tolerance: f64) -> bool {
        match &self.shape {
            SurfaceShape::Cylinder {
                radius,
                center_z,
                half_z,
            } => {
                (perp(position) - radius).abs() <= tolerance
                    && (position.z - center_z).abs() <= half_z + tolerance
            }
            SurfaceShape::Disc { z, r_min, r_max } => {
                let r = perp(position);
                (position.z - z).abs() <= tolerance
                    && r >= r_min - tolerance
                    && r <= r_max + tolerance
            }
            SurfaceShape::Plane {
                center,
                normal,
                half_extent,
            } => {
                let d = position - center;
                let along = normal.dot(&d);
                let in_plane = d - normal * along;
                along.abs() <= tolerance && in_plane.norm() <= half_extent + tolerance
            }
        }
    }

    fn within_bounds(&self, point: &Vector3) -> bool {
        const EPS: f64 = 1e-9;
        match &self.shape {
            SurfaceShape::Cylinder {
                center_z, half_z, ..
            } => (point.z - center_z).abs() <= half_z + EPS,
            SurfaceShape::Disc { r_min, r_max, .. } => {
                let r = perp(point);
                r >= r_min - EPS && r <= r_max + EPS
            }
            SurfaceShape::Plane {
                center,
                normal,
                half_extent,
            } => {
                let d = point - center;
                (d - normal * normal.dot(&d)).norm() <= half_extent + EPS
            }
        }
    }

    /// Candidate path lengths along unit `direction` from `position`.
    fn solutions(&self, position: &Vector3, direction: &Vector3) -> smallvec::SmallVec<[f64; 2]> {
        let mut out = smallvec::SmallVec::new();
        match &self.shape {
            SurfaceShape::Cylinder { radius, .. } => {
                let a = direction.x * direction.x + direction.y * direction.y;
                if a < 1e-14 {
                    return out;
                }
                let b = 2.0 * (position.x * direction.x + position.y * direction.y);
                let c = position.x * position.x + position.y * position.y - radius * radius;
                let disc = b * b - 4.0 * a * c;
                if disc < 0.0 {
                    return out;
                }
                let sq = disc.sqrt();
                out.push((-b - sq) / (2.0 * a));
                out.push((-b + sq) / (2.0 * a));
            }
            SurfaceShape::Disc { z, .. } => {
                if direction.z.abs() > 1e-14 {
                    out.push((z - position.z) / direction.z);
                }
            }
            SurfaceShape::Plane { center, normal, .. } => {
                let denom = normal.dot(direction);
                if denom.abs() > 1e-14 {
                    out.push(normal.dot(&(center - position)) / denom);
                }
            }
        }
        out
    }

    /// Straight-line intersection from `position` along unit `direction`.
    ///
    /// `sense` selects which solutions are admissible:
    /// [`Along`](PropDirection::Along) requires `path >= min_path`,
    /// [`Opposite`](PropDirection::Opposite) requires `path <= -min_path`,
    /// [`Any`](PropDirection::Any) takes the solution with the smallest
    /// `|path|`. A negative `min_path` admits a start point that already
    /// lies on the surface. With `bounded`, solutions outside the surface
    /// bounds are discarded.
    pub fn intersect(
        &self,
        position: &Vector3,
        direction: &Vector3,
        sense: PropDirection,
        min_path: f64,
        bounded: bool,
    ) -> Option<Intersection> {
        self.solutions(position, direction)
            .into_iter()
            .filter(|&s| match sense {
                PropDirection::Along => s >= min_path,
                PropDirection::Opposite => s <= -min_path,
                PropDirection::Any => true,
            })
            .map(|s| Intersection {
                position: position + direction * s,
                path_length: s,
            })
            .filter(|i| !bounded || self.within_bounds(&i.position))
            .min_by(|a, b| a.path_length.abs().total_cmp(&b.path_length.abs()))
    }
}
