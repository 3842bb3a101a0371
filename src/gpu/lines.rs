//! Thick line rendering for the ruler.
//!
//! Every segment becomes one instance expanded into a camera-facing quad in
//! the vertex shader, so line width does not depend on driver support for
//! wide lines.

use bytemuck::{Pod, Zeroable};

use super::{create_vertex_buffer, depth_stencil_state, UNIFORMS_WGSL};
use crate::mesh::LineBatch;

/// One line segment on the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineInstance {
    pub start: [f32; 3],
    /// Half-width of the quad in world units.
    pub thickness: f32,
    pub end: [f32; 3],
    _pad: f32,
    pub color: [f32; 4],
}

impl LineInstance {
    pub fn new(start: glam::Vec3, end: glam::Vec3, color: glam::Vec3, thickness: f32) -> Self {
        Self {
            start: start.to_array(),
            thickness,
            end: end.to_array(),
            _pad: 0.0,
            color: color.extend(1.0).to_array(),
        }
    }
}

/// Flatten line batches into GPU instances.
pub fn line_instances(batches: &[LineBatch]) -> Vec<LineInstance> {
    batches
        .iter()
        .flat_map(|batch| {
            batch
                .mesh
                .lines
                .iter()
                .map(move |(a, b)| LineInstance::new(*a, *b, batch.color, batch.thickness))
        })
        .collect()
}

const LINE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32,
        offset: 12,
        shader_location: 1,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 16,
        shader_location: 2,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 32,
        shader_location: 3,
    },
];

const LINE_SHADER_BODY: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) start: vec3<f32>,
    @location(1) thickness: f32,
    @location(2) end: vec3<f32>,
    @location(3) color: vec4<f32>,
) -> VertexOutput {
    var out: VertexOutput;

    let line_dir = end - start;
    let line_len = length(line_dir);
    if line_len < 0.0001 {
        out.clip_position = vec4<f32>(0.0, 0.0, -1000.0, 1.0);
        out.color = vec4<f32>(0.0);
        return out;
    }
    let dir = line_dir / line_len;

    // Widen perpendicular to both the line and the view direction
    let toward_camera = cross(uniforms.camera_right.xyz, uniforms.camera_up.xyz);
    var side = cross(dir, toward_camera);
    if length(side) < 0.001 {
        side = uniforms.camera_right.xyz;
    }
    side = normalize(side) * thickness;

    var pos: vec3<f32>;
    switch vertex_index {
        case 0u: { pos = start - side; }
        case 1u: { pos = start + side; }
        case 2u: { pos = end - side; }
        case 3u: { pos = start + side; }
        case 4u: { pos = end + side; }
        default: { pos = end - side; }
    }

    out.clip_position = uniforms.view_proj * vec4<f32>(pos, 1.0);
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

fn line_shader() -> String {
    format!("{}{}", UNIFORMS_WGSL, LINE_SHADER_BODY)
}

pub(super) struct LineRenderer {
    pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    capacity: u32,
    count: u32,
}

impl LineRenderer {
    const INITIAL_CAPACITY: u32 = 1024;

    pub fn new(
        device: &wgpu::Device,
        uniform_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(line_shader().into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Line Pipeline Layout"),
            bind_group_layouts: &[uniform_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineInstance>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &LINE_ATTRIBUTES,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let capacity = Self::INITIAL_CAPACITY;
        let instance_buffer = create_vertex_buffer(
            device,
            "Line Instance Buffer",
            capacity as u64 * std::mem::size_of::<LineInstance>() as u64,
        );

        Self {
            pipeline,
            instance_buffer,
            capacity,
            count: 0,
        }
    }

    /// Replace the drawn segments, growing the buffer if needed.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, lines: &[LineInstance]) {
        let needed = lines.len() as u32;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            log::debug!("Growing line buffer to {} segments", self.capacity);
            self.instance_buffer = create_vertex_buffer(
                device,
                "Line Instance Buffer",
                self.capacity as u64 * std::mem::size_of::<LineInstance>() as u64,
            );
        }
        if !lines.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(lines));
        }
        self.count = needed;
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        pass.draw(0..6, 0..self.count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::validate_wgsl;
    use crate::mesh::LineMesh;
    use glam::Vec3;

    #[test]
    fn test_line_shader_validates() {
        if let Err(e) = validate_wgsl(&line_shader()) {
            panic!("line shader failed validation: {}", e);
        }
    }

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<LineInstance>(), 48);
        assert_eq!(LINE_ATTRIBUTES[3].offset, 32);
    }

    #[test]
    fn test_line_instances_flatten_batches() {
        let mut spine = LineMesh::segment(Vec3::NEG_Y, Vec3::Y);
        for i in 0..11 {
            let y = i as f32 * 0.2 - 1.0;
            spine.extend(LineMesh::segment(Vec3::new(0.0, y, 0.0), Vec3::new(0.2, y, 0.0)));
        }
        let red = LineBatch::new(spine, Vec3::X, 0.01);
        let blue = LineBatch::new(
            LineMesh::segment(Vec3::ZERO, Vec3::Y),
            Vec3::Z,
            0.02,
        );
        let instances = line_instances(&[red, blue]);

        assert_eq!(instances.len(), 13);
        let last = instances[12];
        assert_eq!(last.end, [0.0, 1.0, 0.0]);
        assert_eq!(last.color, [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(last.thickness, 0.02);
    }
}
