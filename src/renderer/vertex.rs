//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.059, 0.078, 0.098, 1.0];
    pub const GRID_LINE: [f32; 4] = [0.102, 0.102, 0.180, 1.0];
    pub const FOOD_CORE: [f32; 4] = [0.937, 0.267, 0.267, 1.0];
    pub const FOOD_RIM: [f32; 4] = [0.863, 0.149, 0.149, 1.0];
    pub const OBSTACLE: [f32; 4] = [0.278, 0.333, 0.412, 1.0];
    pub const HEAD_LIGHT: [f32; 4] = [0.063, 0.725, 0.506, 1.0];
    pub const HEAD_DARK: [f32; 4] = [0.020, 0.588, 0.412, 1.0];
    /// Body color; alpha is set per segment
    pub const BODY: [f32; 3] = [0.063, 0.725, 0.506];
    pub const EYE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}
