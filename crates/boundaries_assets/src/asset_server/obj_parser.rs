use crate::{
    AssetError,
    assets::{MeshData, Vertex},
};

/// Loads all models of a Wavefront OBJ file into one mesh.
pub fn parse_obj(path: &str) -> Result<MeshData, AssetError> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )
    .map_err(|source| AssetError::Obj {
        path: path.to_owned(),
        source,
    })?;

    let mut merged = MeshData::default();

    for model in models {
        let mesh = model.mesh;
        let has_normals = mesh.normals.len() == mesh.positions.len();

        let vertices = mesh
            .positions
            .chunks_exact(3)
            .enumerate()
            .map(|(i, p)| Vertex {
                position: [p[0], p[1], p[2]],
                normal: if has_normals {
                    [
                        mesh.normals[3 * i],
                        mesh.normals[3 * i + 1],
                        mesh.normals[3 * i + 2],
                    ]
                } else {
                    [0.0, 0.0, 0.0]
                },
            })
            .collect();

        let mut mesh_data = MeshData {
            vertices,
            indices: mesh.indices,
        };
        if !mesh_data.has_valid_indices() {
            return Err(AssetError::IndexOutOfRange {
                path: path.to_owned(),
            });
        }
        if !has_normals {
            mesh_data.recompute_normals();
        }

        merged.append(mesh_data);
    }

    Ok(merged)
}
