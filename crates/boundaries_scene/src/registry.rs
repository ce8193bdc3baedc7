use std::borrow::Cow;
use std::path::{Path, PathBuf};

use boundaries_assets::{AssetServer, MeshData};
use boundaries_core::{Assets, Handle};
use boundaries_renderer::{Tessellation, shapes};
use glam::Vec3;
use log::{info, warn};
use serde::Serialize;

/// A volume whose inside/outside the surface shader visualizes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BoundaryVolume {
    Sphere {
        center: Vec3,
        radius: f32,
    },
    /// `dimensions` are full edge lengths.
    Box {
        center: Vec3,
        dimensions: Vec3,
    },
    Cone {
        center: Vec3,
        radius: f32,
        height: f32,
    },
    Capsule {
        center: Vec3,
        radius: f32,
        height: f32,
    },
    Cylinder {
        center: Vec3,
        radius: f32,
        height: f32,
    },
    ImportedModel {
        path: PathBuf,
        #[serde(skip)]
        mesh: MeshData,
    },
}

impl BoundaryVolume {
    pub fn kind(&self) -> &'static str {
        match self {
            BoundaryVolume::Sphere { .. } => "sphere",
            BoundaryVolume::Box { .. } => "box",
            BoundaryVolume::Cone { .. } => "cone",
            BoundaryVolume::Capsule { .. } => "capsule",
            BoundaryVolume::Cylinder { .. } => "cylinder",
            BoundaryVolume::ImportedModel { .. } => "model",
        }
    }

    /// Geometry a camera or the visible group draws for this volume.
    pub fn subgraph(&self, tessellation: Tessellation) -> Cow<'_, MeshData> {
        match self {
            BoundaryVolume::Sphere { center, radius } => {
                Cow::Owned(shapes::sphere(*center, *radius, tessellation))
            }
            BoundaryVolume::Box { center, dimensions } => {
                Cow::Owned(shapes::cuboid(*center, *dimensions))
            }
            BoundaryVolume::Cone {
                center,
                radius,
                height,
            } => Cow::Owned(shapes::cone(*center, *radius, *height, tessellation)),
            BoundaryVolume::Capsule {
                center,
                radius,
                height,
            } => Cow::Owned(shapes::capsule(*center, *radius, *height, tessellation)),
            BoundaryVolume::Cylinder {
                center,
                radius,
                height,
            } => Cow::Owned(shapes::cylinder(*center, *radius, *height, tessellation)),
            BoundaryVolume::ImportedModel { mesh, .. } => Cow::Borrowed(mesh),
        }
    }
}

/// A registered volume together with the geometry built for it.
#[derive(Debug, Clone, Serialize)]
pub struct Boundary {
    pub volume: BoundaryVolume,
    pub subgraph: MeshData,
}

/// Boundaries in the order they were requested. A boundary's handle index is
/// the index of its depth texture pair.
#[derive(Debug, Clone, Serialize)]
pub struct BoundaryRegistry {
    #[serde(skip)]
    tessellation: Tessellation,
    boundaries: Assets<Boundary>,
}

impl Default for BoundaryRegistry {
    fn default() -> Self {
        Self::new(Tessellation::default())
    }
}

impl BoundaryRegistry {
    pub fn new(tessellation: Tessellation) -> Self {
        Self {
            tessellation,
            boundaries: Assets::default(),
        }
    }

    pub fn add(&mut self, volume: BoundaryVolume) -> Handle<Boundary> {
        let subgraph = volume.subgraph(self.tessellation).into_owned();
        self.boundaries.add(Boundary { volume, subgraph })
    }

    /// Loads a model file as a boundary. A file that cannot be loaded is
    /// reported and skipped.
    pub fn add_model(&mut self, server: &AssetServer, path: &Path) -> Option<Handle<Boundary>> {
        match server.load_model(path) {
            Ok(mesh) => {
                info!(
                    "Loaded boundary model {} ({} triangles)",
                    path.display(),
                    mesh.triangle_count()
                );
                Some(self.add(BoundaryVolume::ImportedModel {
                    path: path.to_path_buf(),
                    mesh,
                }))
            }
            Err(e) => {
                warn!("Skipping boundary model: {e}");
                None
            }
        }
    }

    pub fn get(&self, handle: Handle<Boundary>) -> Option<&Boundary> {
        self.boundaries.get(handle)
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = Handle<Boundary>> + '_ {
        self.boundaries.handles()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<Boundary>, &Boundary)> + '_ {
        self.boundaries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_request_order() {
        let mut registry = BoundaryRegistry::new(Tessellation::new(8, 4));
        let a = registry.add(BoundaryVolume::Box {
            center: Vec3::ZERO,
            dimensions: Vec3::ONE,
        });
        let b = registry.add(BoundaryVolume::Sphere {
            center: Vec3::X,
            radius: 0.5,
        });

        assert_eq!(registry.len(), 2);
        assert_eq!((a.index, b.index), (0, 1));
        let kinds: Vec<_> = registry.iter().map(|(_, b)| b.volume.kind()).collect();
        assert_eq!(kinds, vec!["box", "sphere"]);
    }

    #[test]
    fn every_shape_has_geometry() {
        let volumes = [
            BoundaryVolume::Sphere {
                center: Vec3::ZERO,
                radius: 1.0,
            },
            BoundaryVolume::Box {
                center: Vec3::ZERO,
                dimensions: Vec3::splat(2.0),
            },
            BoundaryVolume::Cone {
                center: Vec3::ZERO,
                radius: 1.0,
                height: 2.0,
            },
            BoundaryVolume::Capsule {
                center: Vec3::ZERO,
                radius: 0.5,
                height: 1.0,
            },
            BoundaryVolume::Cylinder {
                center: Vec3::ZERO,
                radius: 0.5,
                height: 1.0,
            },
        ];

        for volume in volumes {
            let mesh = volume.subgraph(Tessellation::default());
            assert!(!mesh.is_empty(), "{} has no triangles", volume.kind());
            assert!(matches!(mesh, Cow::Owned(_)));
        }
    }

    #[test]
    fn imported_model_borrows_its_mesh() {
        let mut mesh = MeshData::default();
        mesh.vertices.push(boundaries_assets::Vertex::new(Vec3::ZERO, Vec3::Z));
        mesh.vertices.push(boundaries_assets::Vertex::new(Vec3::X, Vec3::Z));
        mesh.vertices.push(boundaries_assets::Vertex::new(Vec3::Y, Vec3::Z));
        mesh.indices = vec![0, 1, 2];

        let volume = BoundaryVolume::ImportedModel {
            path: PathBuf::from("tri.obj"),
            mesh: mesh.clone(),
        };
        let subgraph = volume.subgraph(Tessellation::default());
        assert!(matches!(subgraph, Cow::Borrowed(_)));
        assert_eq!(*subgraph, mesh);
    }

    #[test]
    fn unloadable_model_is_skipped() {
        let mut registry = BoundaryRegistry::default();
        let missing = std::env::temp_dir().join("boundaries_scene_missing_model.obj");
        let _ = std::fs::remove_file(&missing);

        assert!(registry.add_model(&AssetServer::new(), &missing).is_none());
        assert!(registry.add_model(&AssetServer::new(), Path::new("model.fbx")).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn model_with_dangling_indices_is_skipped() {
        // Three positions, indices [0, 1, 5], no normals
        let gltf = r#"{
  "asset": { "version": "2.0" },
  "buffers": [{
    "byteLength": 44,
    "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAUAAAA="
  }],
  "bufferViews": [
    { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
    { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
  ],
  "accessors": [
    { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
    { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
  ],
  "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }],
  "nodes": [{ "mesh": 0 }],
  "scenes": [{ "nodes": [0] }],
  "scene": 0
}"#;
        let path = std::env::temp_dir().join("boundaries_scene_bad_index.gltf");
        std::fs::write(&path, gltf).unwrap();

        let mut registry = BoundaryRegistry::default();
        registry.add(BoundaryVolume::Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        });

        assert!(registry.add_model(&AssetServer::new(), &path).is_none());
        assert_eq!(registry.len(), 1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn loads_model_from_disk() {
        let path = std::env::temp_dir().join("boundaries_scene_tetra_test.obj");
        std::fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 3 2\nf 1 2 4\nf 1 4 3\nf 2 3 4\n",
        )
        .unwrap();

        let mut registry = BoundaryRegistry::default();
        let handle = registry
            .add_model(&AssetServer::new(), &path)
            .expect("model loads");
        let boundary = registry.get(handle).unwrap();

        assert_eq!(boundary.volume.kind(), "model");
        assert_eq!(boundary.subgraph.triangle_count(), 4);
        let _ = std::fs::remove_file(&path);
    }
}
