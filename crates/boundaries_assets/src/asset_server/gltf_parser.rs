use glam::Mat4;

use crate::{
    AssetError,
    assets::{MeshData, Vertex},
};

/// Loads every triangle primitive reachable from the document's scenes into
/// one mesh, with node transforms baked in.
pub fn parse_gltf(path: &str) -> Result<MeshData, AssetError> {
    // A. Load Document & Buffers
    let (document, buffers, _images) = gltf::import(path).map_err(|source| AssetError::Gltf {
        path: path.to_owned(),
        source,
    })?;

    let mut merged = MeshData::default();

    // B. Walk the hierarchy. Documents without scenes still get their meshes.
    if document.scenes().len() == 0 {
        for mesh in document.meshes() {
            append_mesh(path, &mesh, &buffers, Mat4::IDENTITY, &mut merged)?;
        }
    } else {
        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next());

        if let Some(scene) = scene {
            for node in scene.nodes() {
                visit_node(path, &node, &buffers, Mat4::IDENTITY, &mut merged)?;
            }
        }
    }

    Ok(merged)
}

fn visit_node(
    path: &str,
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent: Mat4,
    merged: &mut MeshData,
) -> Result<(), AssetError> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        append_mesh(path, &mesh, buffers, world, merged)?;
    }

    for child in node.children() {
        visit_node(path, &child, buffers, world, merged)?;
    }

    Ok(())
}

fn append_mesh(
    path: &str,
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: Mat4,
    merged: &mut MeshData,
) -> Result<(), AssetError> {
    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "Skipping non-triangle primitive in mesh '{}' of {}",
                mesh.name().unwrap_or("Mesh"),
                path
            );
            continue;
        }

        let reader =
            primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

        // Extract Positions
        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .map(|iter| iter.collect())
            .ok_or_else(|| AssetError::MissingPositions {
                path: path.to_owned(),
            })?;

        // Extract Normals (recomputed below when absent)
        let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|iter| iter.collect());

        // Extract Indices (non-indexed primitives draw vertices in order)
        let indices: Vec<u32> = reader
            .read_indices()
            .map(|read| read.into_u32().collect())
            .unwrap_or_else(|| (0..positions.len() as u32).collect());

        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex {
                position: *position,
                normal: normals
                    .as_ref()
                    .and_then(|n| n.get(i).copied())
                    .unwrap_or([0.0, 0.0, 0.0]),
            })
            .collect();

        let mut mesh_data = MeshData { vertices, indices };
        if !mesh_data.has_valid_indices() {
            return Err(AssetError::IndexOutOfRange {
                path: path.to_owned(),
            });
        }
        if normals.is_none() {
            mesh_data.recompute_normals();
        }
        mesh_data.transform(transform);

        merged.append(mesh_data);
    }

    Ok(())
}
