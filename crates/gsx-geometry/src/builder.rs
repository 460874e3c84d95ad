//! Validating geometry construction.

use gsx_core::{LayerId, SurfaceId, VolumeId};
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::error::GeometryError;
use crate::geometry::Geometry;
use crate::layer::{Layer, LayerKind};
use crate::material::MaterialProperties;
use crate::surface::{Surface, SurfaceShape};
use crate::volume::{LayerBinning, Volume, VolumeBounds};

/// Description of a volume to add.
#[derive(Clone, Debug)]
pub struct VolumeSpec {
    name: String,
    bounds: VolumeBounds,
    mother: Option<VolumeId>,
}

impl VolumeSpec {
    /// A tube `r_min..r_max` by `z_min..z_max`. Without
    /// [`inside`](Self::inside) the volume becomes the world.
    pub fn tube(name: impl Into<String>, r_min: f64, r_max: f64, z_min: f64, z_max: f64) -> Self {
        Self {
            name: name.into(),
            bounds: VolumeBounds {
                r_min,
                r_max,
                z_min,
                z_max,
            },
            mother: None,
        }
    }

    /// Nest the volume inside `mother`.
    pub fn inside(mut self, mother: VolumeId) -> Self {
        self.mother = Some(mother);
        self
    }
}

/// One of the boundary faces of a tube volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryFace {
    /// Disc at `z_min`.
    NegativeDisc,
    /// Disc at `z_max`.
    PositiveDisc,
    /// Cylinder at `r_max`.
    OuterCover,
    /// Cylinder at `r_min`; absent when `r_min == 0`.
    InnerCover,
}

impl BoundaryFace {
    fn index(self) -> usize {
        match self {
            Self::NegativeDisc => 0,
            Self::PositiveDisc => 1,
            Self::OuterCover => 2,
            Self::InnerCover => gsx_core::TUBE_INNER_COVER,
        }
    }
}

/// Builds an immutable [`Geometry`].
///
/// Ids are assigned densely in insertion order. Boundary surfaces are
/// created together with their volume, so boundary material can be
/// attached before [`build`](Self::build).
#[derive(Debug, Default)]
pub struct GeometryBuilder {
    surfaces: Vec<Surface>,
    layers: Vec<Layer>,
    volumes: Vec<Volume>,
    names: IndexMap<String, VolumeId>,
    world: Option<VolumeId>,
}

fn invalid(what: impl Into<String>, reason: &'static str) -> GeometryError {
    GeometryError::InvalidDimension {
        what: what.into(),
        reason,
    }
}

fn check_material(what: &str, material: Option<&MaterialProperties>) -> Result<(), GeometryError> {
    match material {
        Some(m) if !m.is_valid() => Err(invalid(what, "material properties out of range")),
        _ => Ok(()),
    }
}

fn check_thickness(what: &str, thickness: f64) -> Result<(), GeometryError> {
    if thickness.is_finite() && thickness >= 0.0 {
        Ok(())
    } else {
        Err(invalid(what, "thickness must be finite and non-negative"))
    }
}

impl GeometryBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_surface_id(&self) -> SurfaceId {
        SurfaceId(self.surfaces.len() as u32)
    }

    fn next_layer_id(&self) -> LayerId {
        LayerId(self.layers.len() as u32)
    }

    fn push_surface(&mut self, shape: SurfaceShape, layer: Option<LayerId>) -> SurfaceId {
        let id = self.next_surface_id();
        self.surfaces.push(Surface {
            id,
            shape,
            layer,
            material_layer: None,
        });
        id
    }

    fn volume(&self, id: VolumeId) -> Result<&Volume, GeometryError> {
        self.volumes
            .get(id.0 as usize)
            .ok_or(GeometryError::UnknownVolume(id))
    }

    /// Look up a volume id by name.
    pub fn volume_id(&self, name: &str) -> Option<VolumeId> {
        self.names.get(name).copied()
    }

    /// Add a volume and create its boundary surfaces.
    pub fn add_volume(&mut self, spec: VolumeSpec) -> Result<VolumeId, GeometryError> {
        let VolumeSpec {
            name,
            bounds,
            mother,
        } = spec;
        if !bounds.is_valid() {
            return Err(invalid(
                format!("volume '{name}'"),
                "bounds must be finite with r_min >= 0, r_max > r_min, z_max > z_min",
            ));
        }
        if self.names.contains_key(&name) {
            return Err(GeometryError::DuplicateName(name));
        }
        let depth = match mother {
            Some(m) => {
                let mv = self.volume(m)?;
                if !mv.bounds.encloses(&bounds) {
                    return Err(GeometryError::NotContained {
                        child: name,
                        mother: mv.name.clone(),
                    });
                }
                mv.depth + 1
            }
            None => {
                if let Some(w) = self.world {
                    return Err(GeometryError::MultipleWorlds {
                        name,
                        world: self.volumes[w.0 as usize].name.clone(),
                    });
                }
                0
            }
        };

        let id = VolumeId(self.volumes.len() as u32);
        let mut boundaries = SmallVec::new();
        for z in [bounds.z_min, bounds.z_max] {
            boundaries.push(self.push_surface(
                SurfaceShape::Disc {
                    z,
                    r_min: bounds.r_min,
                    r_max: bounds.r_max,
                },
                None,
            ));
        }
        let mut covers = vec![bounds.r_max];
        if bounds.r_min > 0.0 {
            covers.push(bounds.r_min);
        }
        for radius in covers {
            boundaries.push(self.push_surface(
                SurfaceShape::Cylinder {
                    radius,
                    center_z: bounds.center_z(),
                    half_z: bounds.half_z(),
                },
                None,
            ));
        }

        self.volumes.push(Volume {
            id,
            name: name.clone(),
            bounds,
            boundaries,
            layers: Vec::new(),
            binning: None,
            mother,
            depth,
            children: Vec::new(),
        });
        match mother {
            Some(m) => self.volumes[m.0 as usize].children.push(id),
            None => self.world = Some(id),
        }
        self.names.insert(name, id);
        Ok(id)
    }

    fn claim_binning(
        &mut self,
        volume: VolumeId,
        binning: LayerBinning,
    ) -> Result<(), GeometryError> {
        let v = &mut self.volumes[volume.0 as usize];
        match v.binning {
            Some(b) if b != binning => Err(GeometryError::MixedBinning(v.name.clone())),
            _ => {
                v.binning = Some(binning);
                Ok(())
            }
        }
    }

    fn push_layer(
        &mut self,
        volume: VolumeId,
        shape: SurfaceShape,
        thickness: f64,
        material: Option<MaterialProperties>,
    ) -> LayerId {
        let id = self.next_layer_id();
        let surface = self.push_surface(shape, Some(id));
        self.layers.push(Layer {
            id,
            surface,
            thickness,
            material,
            volume,
            kind: LayerKind::Confined,
        });
        self.volumes[volume.0 as usize].layers.push(id);
        id
    }

    /// Add a barrel layer at `radius` spanning the volume's z range.
    pub fn add_cylinder_layer(
        &mut self,
        volume: VolumeId,
        radius: f64,
        thickness: f64,
        material: Option<MaterialProperties>,
    ) -> Result<LayerId, GeometryError> {
        let v = self.volume(volume)?;
        let what = format!("cylinder layer in '{}'", v.name);
        check_thickness(&what, thickness)?;
        check_material(&what, material.as_ref())?;
        let b = v.bounds;
        let half = 0.5 * thickness;
        if !radius.is_finite() || radius - half <= b.r_min || radius + half >= b.r_max {
            return Err(GeometryError::LayerOutsideVolume {
                volume: v.name.clone(),
                position: radius,
            });
        }
        self.claim_binning(volume, LayerBinning::Radial)?;
        Ok(self.push_layer(
            volume,
            SurfaceShape::Cylinder {
                radius,
                center_z: b.center_z(),
                half_z: b.half_z(),
            },
            thickness,
            material,
        ))
    }

    /// Add an end-cap layer at `z` spanning the volume's radial range.
    pub fn add_disc_layer(
        &mut self,
        volume: VolumeId,
        z: f64,
        thickness: f64,
        material: Option<MaterialProperties>,
    ) -> Result<LayerId, GeometryError> {
        let v = self.volume(volume)?;
        let what = format!("disc layer in '{}'", v.name);
        check_thickness(&what, thickness)?;
        check_material(&what, material.as_ref())?;
        let b = v.bounds;
        let half = 0.5 * thickness;
        if !z.is_finite() || z - half <= b.z_min || z + half >= b.z_max {
            return Err(GeometryError::LayerOutsideVolume {
                volume: v.name.clone(),
                position: z,
            });
        }
        self.claim_binning(volume, LayerBinning::Z)?;
        Ok(self.push_layer(
            volume,
            SurfaceShape::Disc {
                z,
                r_min: b.r_min,
                r_max: b.r_max,
            },
            thickness,
            material,
        ))
    }

    fn check_shape(shape: SurfaceShape) -> Result<SurfaceShape, GeometryError> {
        let ok = match &shape {
            SurfaceShape::Cylinder {
                radius,
                center_z,
                half_z,
            } => {
                radius.is_finite()
                    && *radius > 0.0
                    && center_z.is_finite()
                    && half_z.is_finite()
                    && *half_z > 0.0
            }
            SurfaceShape::Disc { z, r_min, r_max } => {
                z.is_finite()
                    && r_min.is_finite()
                    && r_max.is_finite()
                    && *r_min >= 0.0
                    && r_max > r_min
            }
            SurfaceShape::Plane {
                center,
                normal,
                half_extent,
            } => {
                center.iter().all(|v| v.is_finite())
                    && normal.iter().all(|v| v.is_finite())
                    && normal.norm() > 0.0
                    && half_extent.is_finite()
                    && *half_extent > 0.0
            }
        };
        if !ok {
            return Err(invalid("surface", "non-finite or degenerate shape"));
        }
        Ok(match shape {
            SurfaceShape::Plane {
                center,
                normal,
                half_extent,
            } => SurfaceShape::Plane {
                center,
                normal: normal.normalize(),
                half_extent,
            },
            other => other,
        })
    }

    /// Add a free-standing surface, not associated with any layer.
    pub fn add_surface(&mut self, shape: SurfaceShape) -> Result<SurfaceId, GeometryError> {
        let shape = Self::check_shape(shape)?;
        Ok(self.push_surface(shape, None))
    }

    /// Add a sensor surface associated with `layer`.
    ///
    /// Extrapolating to such a surface treats `layer` as the destination
    /// layer.
    pub fn add_module_surface(
        &mut self,
        layer: LayerId,
        shape: SurfaceShape,
    ) -> Result<SurfaceId, GeometryError> {
        if layer.0 as usize >= self.layers.len() {
            return Err(GeometryError::UnknownLayer(layer));
        }
        let shape = Self::check_shape(shape)?;
        Ok(self.push_surface(shape, Some(layer)))
    }

    /// Attach material to one boundary face of `volume`.
    pub fn set_boundary_material(
        &mut self,
        volume: VolumeId,
        face: BoundaryFace,
        material: MaterialProperties,
    ) -> Result<LayerId, GeometryError> {
        let v = self.volume(volume)?;
        check_material(&format!("boundary of '{}'", v.name), Some(&material))?;
        let surface = *v
            .boundaries
            .get(face.index())
            .ok_or_else(|| GeometryError::NoSuchBoundary(v.name.clone()))?;
        let id = self.next_layer_id();
        self.layers.push(Layer {
            id,
            surface,
            thickness: material.thickness,
            material: Some(material),
            volume,
            kind: LayerKind::Boundary,
        });
        self.surfaces[surface.0 as usize].material_layer = Some(id);
        Ok(id)
    }

    fn layer_key(&self, layer: LayerId) -> f64 {
        let surface = self.layers[layer.0 as usize].surface;
        match self.surfaces[surface.0 as usize].shape {
            SurfaceShape::Cylinder { radius, .. } => radius,
            SurfaceShape::Disc { z, .. } => z,
            SurfaceShape::Plane { center, .. } => center.z,
        }
    }

    /// Validate and freeze.
    pub fn build(mut self) -> Result<Geometry, GeometryError> {
        let world = self.world.ok_or(GeometryError::Empty)?;
        for v in &self.volumes {
            for (i, &a) in v.children.iter().enumerate() {
                for &b in &v.children[i + 1..] {
                    let (va, vb) = (&self.volumes[a.0 as usize], &self.volumes[b.0 as usize]);
                    if va.bounds.overlaps(&vb.bounds) {
                        return Err(GeometryError::Overlap {
                            a: va.name.clone(),
                            b: vb.name.clone(),
                        });
                    }
                }
            }
        }
        for i in 0..self.volumes.len() {
            let mut layers = std::mem::take(&mut self.volumes[i].layers);
            layers.sort_by(|&a, &b| self.layer_key(a).total_cmp(&self.layer_key(b)));
            self.volumes[i].layers = layers;
        }
        Ok(Geometry {
            surfaces: self.surfaces,
            layers: self.layers,
            volumes: self.volumes,
            names: self.names,
            world,
        })
    }
}
