//! Filled, lit rendering for the plates and arrows.
//!
//! Solid meshes are small and change every frame while plates move, so they
//! are flattened into one non-indexed vertex buffer and rewritten each frame.
//! Shading is ambient plus Lambert diffuse with a faint Blinn-Phong
//! highlight from the scene's directional light.

use bytemuck::{Pod, Zeroable};

use super::{create_vertex_buffer, depth_stencil_state, UNIFORMS_WGSL};
use crate::mesh::SolidBatch;

/// One lit vertex on the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SolidVertexRaw {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// Flatten solid batches into GPU vertices.
pub fn solid_vertices(batches: &[SolidBatch]) -> Vec<SolidVertexRaw> {
    batches
        .iter()
        .flat_map(|batch| {
            batch.mesh.vertices.iter().map(move |v| SolidVertexRaw {
                position: v.position.to_array(),
                normal: v.normal.to_array(),
                color: batch.color.to_array(),
            })
        })
        .collect()
}

const SOLID_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];

const SOLID_SHADER_BODY: &str = r#"
const AMBIENT: f32 = 0.5;
const SPECULAR: f32 = 0.07;
const SHININESS: f32 = 30.0;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) color: vec3<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec3<f32>,
) -> VertexOutput {
    // Into the same view space the light direction is given in
    let right = uniforms.camera_right.xyz;
    let up = uniforms.camera_up.xyz;
    let back = cross(right, up);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(position, 1.0);
    out.normal = vec3<f32>(dot(normal, right), dot(normal, up), dot(normal, back));
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    var normal = normalize(in.normal);
    if !front {
        normal = -normal;
    }
    let light = uniforms.light_dir.xyz;
    let diffuse = max(dot(normal, light), 0.0);

    let half_dir = normalize(light + vec3<f32>(0.0, 0.0, 1.0));
    var specular = 0.0;
    if diffuse > 0.0 {
        specular = SPECULAR * pow(max(dot(normal, half_dir), 0.0), SHININESS);
    }

    let lit = in.color * min(AMBIENT + diffuse, 1.0) + vec3<f32>(specular);
    return vec4<f32>(min(lit, vec3<f32>(1.0)), 1.0);
}
"#;

fn solid_shader() -> String {
    format!("{}{}", UNIFORMS_WGSL, SOLID_SHADER_BODY)
}

pub(super) struct SolidRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    capacity: u32,
    count: u32,
}

impl SolidRenderer {
    const INITIAL_CAPACITY: u32 = 8192;

    pub fn new(
        device: &wgpu::Device,
        uniform_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Solid Shader"),
            source: wgpu::ShaderSource::Wgsl(solid_shader().into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Solid Pipeline Layout"),
            bind_group_layouts: &[uniform_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Solid Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<SolidVertexRaw>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &SOLID_ATTRIBUTES,
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
        let vertex_buffer = create_vertex_buffer(
            device,
            "Solid Vertex Buffer",
            capacity as u64 * std::mem::size_of::<SolidVertexRaw>() as u64,
        );

        Self {
            pipeline,
            vertex_buffer,
            capacity,
            count: 0,
        }
    }

    /// Replace the drawn triangles, growing the buffer if needed.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, vertices: &[SolidVertexRaw]) {
        let needed = vertices.len() as u32;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            log::debug!("Growing solid buffer to {} vertices", self.capacity);
            self.vertex_buffer = create_vertex_buffer(
                device,
                "Solid Vertex Buffer",
                self.capacity as u64 * std::mem::size_of::<SolidVertexRaw>() as u64,
            );
        }
        if !vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }
        self.count = needed;
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.count, 0..1);
    }
}
