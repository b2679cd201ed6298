use bytemuck::NoUninit;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Clone, Copy, NoUninit)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
}

impl Mesh {
    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        MeshBuffer {
            vertex_buffer,
            vertex_count: self.vertices.len() as u32,
        }
    }
}

/// Unit cube centered at the origin, 12 triangles, position + uv per vertex.
pub fn cube_mesh() -> Mesh {
    #[rustfmt::skip]
    let raw: [[f32; 5]; 36] = [
        // back face
        [-0.5, -0.5, -0.5,  0.0, 0.0],
        [ 0.5, -0.5, -0.5,  1.0, 0.0],
        [ 0.5,  0.5, -0.5,  1.0, 1.0],
        [ 0.5,  0.5, -0.5,  1.0, 1.0],
        [-0.5,  0.5, -0.5,  0.0, 1.0],
        [-0.5, -0.5, -0.5,  0.0, 0.0],
        // front face
        [-0.5, -0.5,  0.5,  0.0, 0.0],
        [ 0.5, -0.5,  0.5,  1.0, 0.0],
        [ 0.5,  0.5,  0.5,  1.0, 1.0],
        [ 0.5,  0.5,  0.5,  1.0, 1.0],
        [-0.5,  0.5,  0.5,  0.0, 1.0],
        [-0.5, -0.5,  0.5,  0.0, 0.0],
        // left face
        [-0.5,  0.5,  0.5,  1.0, 0.0],
        [-0.5,  0.5, -0.5,  1.0, 1.0],
        [-0.5, -0.5, -0.5,  0.0, 1.0],
        [-0.5, -0.5, -0.5,  0.0, 1.0],
        [-0.5, -0.5,  0.5,  0.0, 0.0],
        [-0.5,  0.5,  0.5,  1.0, 0.0],
        // right face
        [ 0.5,  0.5,  0.5,  1.0, 0.0],
        [ 0.5,  0.5, -0.5,  1.0, 1.0],
        [ 0.5, -0.5, -0.5,  0.0, 1.0],
        [ 0.5, -0.5, -0.5,  0.0, 1.0],
        [ 0.5, -0.5,  0.5,  0.0, 0.0],
        [ 0.5,  0.5,  0.5,  1.0, 0.0],
        // bottom face
        [-0.5, -0.5, -0.5,  0.0, 1.0],
        [ 0.5, -0.5, -0.5,  1.0, 1.0],
        [ 0.5, -0.5,  0.5,  1.0, 0.0],
        [ 0.5, -0.5,  0.5,  1.0, 0.0],
        [-0.5, -0.5,  0.5,  0.0, 0.0],
        [-0.5, -0.5, -0.5,  0.0, 1.0],
        // top face
        [-0.5,  0.5, -0.5,  0.0, 1.0],
        [ 0.5,  0.5, -0.5,  1.0, 1.0],
        [ 0.5,  0.5,  0.5,  1.0, 0.0],
        [ 0.5,  0.5,  0.5,  1.0, 0.0],
        [-0.5,  0.5,  0.5,  0.0, 0.0],
        [-0.5,  0.5, -0.5,  0.0, 1.0],
    ];

    Mesh {
        vertices: raw
            .iter()
            .map(|v| Vertex {
                pos: [v[0], v[1], v[2]],
                uv: [v[3], v[4]],
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_36_vertices() {
        let mesh = cube_mesh();
        assert_eq!(mesh.vertices.len(), 36);
    }

    #[test]
    fn cube_fits_unit_bounds() {
        for v in cube_mesh().vertices {
            for c in v.pos {
                assert!(c.abs() <= 0.5);
            }
            for c in v.uv {
                assert!((0.0..=1.0).contains(&c));
            }
        }
    }
}
