//! Particle rendering as lit sphere impostors.

use bytemuck::{Pod, Zeroable};

use super::{create_vertex_buffer, depth_stencil_state, UNIFORMS_WGSL};
use crate::particles::{Particle, ParticleField, PARTICLE_RADIUS};

/// One particle on the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
}

impl From<&Particle> for ParticleInstance {
    fn from(particle: &Particle) -> Self {
        Self {
            position: particle.position.to_array(),
            radius: PARTICLE_RADIUS,
            color: particle.class().color().extend(1.0).to_array(),
        }
    }
}

/// Instances for the particles currently shown. Hidden ones are not drawn.
pub fn visible_instances(field: &ParticleField) -> Vec<ParticleInstance> {
    field.visible().map(ParticleInstance::from).collect()
}

const PARTICLE_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32, 2 => Float32x4];

const PARTICLE_SHADER_BODY: &str = r#"
const AMBIENT: f32 = 0.5;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec3<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) radius: f32,
    @location(2) color: vec4<f32>,
) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[vertex_index];

    let world = position
        + uniforms.camera_right.xyz * corner.x * radius
        + uniforms.camera_up.xyz * corner.y * radius;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(world, 1.0);
    out.uv = corner;
    out.color = color.rgb;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let dist_sq = dot(in.uv, in.uv);
    if dist_sq > 1.0 {
        discard;
    }

    // View-space normal of the sphere under this fragment
    let normal = vec3<f32>(in.uv, sqrt(1.0 - dist_sq));
    let diffuse = max(dot(normal, uniforms.light_dir.xyz), 0.0);
    let shade = min(AMBIENT + diffuse, 1.0);
    return vec4<f32>(in.color * shade, 1.0);
}
"#;

fn particle_shader() -> String {
    format!("{}{}", UNIFORMS_WGSL, PARTICLE_SHADER_BODY)
}

pub(super) struct ParticleRenderer {
    pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    capacity: u32,
    count: u32,
}

impl ParticleRenderer {
    pub fn new(
        device: &wgpu::Device,
        uniform_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        capacity: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(particle_shader().into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[uniform_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<ParticleInstance>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &PARTICLE_ATTRIBUTES,
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

        let capacity = capacity.max(1);
        let instance_buffer = create_vertex_buffer(
            device,
            "Particle Instance Buffer",
            capacity as u64 * std::mem::size_of::<ParticleInstance>() as u64,
        );

        Self {
            pipeline,
            instance_buffer,
            capacity,
            count: 0,
        }
    }

    /// Upload this frame's visible particles. Anything past capacity is dropped.
    pub fn upload(&mut self, queue: &wgpu::Queue, particles: &[ParticleInstance]) {
        let count = particles.len().min(self.capacity as usize);
        if count > 0 {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&particles[..count]),
            );
        }
        self.count = count as u32;
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
