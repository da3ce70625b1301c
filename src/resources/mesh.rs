use std::f32::consts::TAU;

use cgmath::Vector3;
use wgpu::util::DeviceExt;

/// The primitive shapes the desk scene is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// 2x2 quad in the XZ plane at y = 0, facing +Y.
    Plane,
    /// Unit cube centred on the origin.
    Box,
    /// Radius 1, base at y = 0, top at y = 1, capped at both ends.
    Cylinder,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Plane, ShapeKind::Box, ShapeKind::Cylinder];
}

/// Loads shape geometry once and draws it on request.
///
/// `draw_mesh` is stateless from the caller's point of view: whatever
/// uniforms were written before the call apply to that draw.
pub trait MeshProvider {
    fn load_mesh(&mut self, kind: ShapeKind);
    fn draw_mesh(&mut self, kind: ShapeKind);
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl ShapeVertex {
    fn new(position: Vector3<f32>, normal: Vector3<f32>, tex_coords: [f32; 2]) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
            tex_coords,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ShapeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// CPU-side geometry, counter-clockwise winding seen from outside.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<ShapeVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn for_shape(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Plane => plane(),
            ShapeKind::Box => cube(),
            ShapeKind::Cylinder => cylinder(CYLINDER_SEGMENTS),
        }
    }

    /// Append a quad given its corners in counter-clockwise order.
    fn push_quad(&mut self, corners: [Vector3<f32>; 4], normal: Vector3<f32>) {
        let base = self.vertices.len() as u32;
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(ShapeVertex::new(corner, normal, uv));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

pub const CYLINDER_SEGMENTS: u32 = 36;

fn plane() -> MeshData {
    let mut mesh = MeshData::default();
    mesh.push_quad(
        [
            Vector3::new(-1.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, -1.0),
            Vector3::new(-1.0, 0.0, -1.0),
        ],
        Vector3::unit_y(),
    );
    mesh
}

fn cube() -> MeshData {
    // (outward normal, u axis, v axis) with u x v == normal
    let faces = [
        (Vector3::unit_x(), -Vector3::unit_z(), Vector3::unit_y()),
        (-Vector3::unit_x(), Vector3::unit_z(), Vector3::unit_y()),
        (Vector3::unit_y(), Vector3::unit_x(), -Vector3::unit_z()),
        (-Vector3::unit_y(), Vector3::unit_x(), Vector3::unit_z()),
        (Vector3::unit_z(), Vector3::unit_x(), Vector3::unit_y()),
        (-Vector3::unit_z(), -Vector3::unit_x(), Vector3::unit_y()),
    ];
    let mut mesh = MeshData::default();
    for (normal, u, v) in faces {
        let centre = normal * 0.5;
        let (u, v) = (u * 0.5, v * 0.5);
        mesh.push_quad(
            [centre - u - v, centre + u - v, centre + u + v, centre - u + v],
            normal,
        );
    }
    mesh
}

fn cylinder(segments: u32) -> MeshData {
    let segments = segments.max(3);
    let mut mesh = MeshData::default();
    let ring = |i: u32| {
        let theta = TAU * i as f32 / segments as f32;
        (theta.cos(), theta.sin())
    };

    // side: a column of (bottom, top) pairs, the seam is duplicated for the uv wrap
    for i in 0..=segments {
        let (x, z) = ring(i);
        let normal = Vector3::new(x, 0.0, z);
        let u = i as f32 / segments as f32;
        mesh.vertices
            .push(ShapeVertex::new(Vector3::new(x, 0.0, z), normal, [u, 0.0]));
        mesh.vertices
            .push(ShapeVertex::new(Vector3::new(x, 1.0, z), normal, [u, 1.0]));
    }
    for i in 0..segments {
        let bottom = 2 * i;
        let top = bottom + 1;
        let next_bottom = bottom + 2;
        let next_top = bottom + 3;
        mesh.indices
            .extend_from_slice(&[bottom, top, next_bottom, top, next_top, next_bottom]);
    }

    for (y, normal) in [(1.0, Vector3::unit_y()), (0.0, -Vector3::unit_y())] {
        let centre = mesh.vertices.len() as u32;
        mesh.vertices
            .push(ShapeVertex::new(Vector3::new(0.0, y, 0.0), normal, [0.5, 0.5]));
        for i in 0..segments {
            let (x, z) = ring(i);
            mesh.vertices.push(ShapeVertex::new(
                Vector3::new(x, y, z),
                normal,
                [0.5 + 0.5 * x, 0.5 + 0.5 * z],
            ));
        }
        for i in 0..segments {
            let current = centre + 1 + i;
            let next = centre + 1 + (i + 1) % segments;
            if normal.y > 0.0 {
                mesh.indices.extend_from_slice(&[centre, next, current]);
            } else {
                mesh.indices.extend_from_slice(&[centre, current, next]);
            }
        }
    }
    mesh
}

#[derive(Debug)]
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl GpuMesh {
    pub fn new(device: &wgpu::Device, kind: ShapeKind, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", kind)),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", kind)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            num_elements: data.indices.len() as u32,
        }
    }
}

/// GPU buffers for every shape that has been loaded.
#[derive(Debug, Default)]
pub struct ShapeMeshes {
    plane: Option<GpuMesh>,
    cube: Option<GpuMesh>,
    cylinder: Option<GpuMesh>,
}

impl ShapeMeshes {
    fn slot(&mut self, kind: ShapeKind) -> &mut Option<GpuMesh> {
        match kind {
            ShapeKind::Plane => &mut self.plane,
            ShapeKind::Box => &mut self.cube,
            ShapeKind::Cylinder => &mut self.cylinder,
        }
    }

    /// Only one copy of a shape is kept no matter how often it is drawn.
    pub fn load(&mut self, device: &wgpu::Device, kind: ShapeKind) {
        let slot = self.slot(kind);
        if slot.is_none() {
            *slot = Some(GpuMesh::new(device, kind, &MeshData::for_shape(kind)));
        }
    }

    pub fn get(&self, kind: ShapeKind) -> Option<&GpuMesh> {
        match kind {
            ShapeKind::Plane => self.plane.as_ref(),
            ShapeKind::Box => self.cube.as_ref(),
            ShapeKind::Cylinder => self.cylinder.as_ref(),
        }
    }
}
