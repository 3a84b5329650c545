use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use cubefield_common::{Color4, NodeId};
use cubefield_scene::{GridMaterial, Material, Mesh, Scene, Shape};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::shaders;

/// Hemispheric lights beyond this count are ignored.
const MAX_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LightData {
    direction: [f32; 4],
    diffuse: [f32; 4],
    ground: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    lights: [LightData; MAX_LIGHTS],
    light_count: [u32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GridUniforms {
    model: [[f32; 4]; 4],
    main_color: [f32; 4],
    line_color: [f32; 4],
    params: [f32; 4],
    flags: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, color: [f32; 4]) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color,
        }
    }
}

/// Generate unit cube vertices and indices.
fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        Vertex { position: [-p, -p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ p, -p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ p,  p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [-p,  p,  p], normal: [0.0, 0.0, 1.0] },
        // -Z face
        Vertex { position: [ p, -p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-p, -p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-p,  p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [ p,  p, -p], normal: [0.0, 0.0, -1.0] },
        // +X face
        Vertex { position: [ p, -p,  p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p, -p, -p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p,  p, -p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p,  p,  p], normal: [1.0, 0.0, 0.0] },
        // -X face
        Vertex { position: [-p, -p, -p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p, -p,  p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p,  p,  p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p,  p, -p], normal: [-1.0, 0.0, 0.0] },
        // +Y face
        Vertex { position: [-p,  p,  p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ p,  p,  p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ p,  p, -p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [-p,  p, -p], normal: [0.0, 1.0, 0.0] },
        // -Y face
        Vertex { position: [-p, -p, -p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ p, -p, -p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ p, -p,  p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [-p, -p,  p], normal: [0.0, -1.0, 0.0] },
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        0,1,2, 2,3,0,       // +Z
        4,5,6, 6,7,4,       // -Z
        8,9,10, 10,11,8,    // +X
        12,13,14, 14,15,12, // -X
        16,17,18, 18,19,16, // +Y
        20,21,22, 22,23,20, // -Y
    ];
    (vertices, indices)
}

/// Unit plane in XZ facing +Y, counter-clockwise seen from above.
fn plane_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    let up = [0.0, 1.0, 0.0];
    let vertices = vec![
        Vertex { position: [-p, 0.0, p], normal: up },
        Vertex { position: [p, 0.0, p], normal: up },
        Vertex { position: [p, 0.0, -p], normal: up },
        Vertex { position: [-p, 0.0, -p], normal: up },
    ];
    (vertices, vec![0, 1, 2, 2, 3, 0])
}

fn light_uniforms(scene: &Scene, view_proj: Mat4) -> Uniforms {
    let mut uniforms = Uniforms {
        view_proj: view_proj.to_cols_array_2d(),
        lights: [LightData::zeroed(); MAX_LIGHTS],
        light_count: [0; 4],
    };
    let mut count = 0;
    for light in scene.lights().values().take(MAX_LIGHTS) {
        let dir = light.direction.try_normalize().unwrap_or(Vec3::Y);
        uniforms.lights[count] = LightData {
            direction: [dir.x, dir.y, dir.z, light.intensity],
            diffuse: light.diffuse.with_alpha(1.0).to_array(),
            ground: light.ground_color.with_alpha(1.0).to_array(),
        };
        count += 1;
    }
    if scene.lights().len() > MAX_LIGHTS {
        tracing::warn!(lights = scene.lights().len(), "only the first {MAX_LIGHTS} lights are used");
    }
    uniforms.light_count[0] = count as u32;
    uniforms
}

fn grid_uniforms(mesh: &Mesh, grid: &GridMaterial) -> GridUniforms {
    GridUniforms {
        model: mesh.world_matrix().to_cols_array_2d(),
        main_color: grid.main_color.with_alpha(1.0).to_array(),
        line_color: grid.line_color.with_alpha(1.0).to_array(),
        params: [
            grid.grid_ratio.max(f32::EPSILON),
            grid.major_unit_frequency.max(1.0),
            grid.minor_unit_visibility,
            grid.opacity,
        ],
        flags: [if grid.back_face_culling { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
    }
}

/// Color for a mesh drawn through the lit pipeline.
fn mesh_color(scene: &Scene, mesh: &Mesh) -> [f32; 4] {
    match scene.material_of(mesh) {
        Some(Material::Standard(m)) => m.diffuse.with_alpha(m.alpha).to_array(),
        // a grid ground never reaches the lit pipeline
        Some(Material::Grid(m)) => m.main_color.with_alpha(m.opacity).to_array(),
        None => [1.0, 1.0, 1.0, 1.0],
    }
}

/// Per-mesh uniform buffer and bind group for a grid-material ground.
struct GridBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Render targets that follow the surface size.
struct Targets {
    depth: wgpu::TextureView,
    msaa: Option<wgpu::TextureView>,
}

/// Draws a scene: lit instanced boxes and planes, then grid grounds.
pub struct SceneRenderer {
    mesh_pipeline: wgpu::RenderPipeline,
    grid_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    grid_bind_group_layout: wgpu::BindGroupLayout,
    cube_vertex_buffer: wgpu::Buffer,
    cube_index_buffer: wgpu::Buffer,
    cube_index_count: u32,
    plane_vertex_buffer: wgpu::Buffer,
    plane_index_buffer: wgpu::Buffer,
    plane_index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    grid_bindings: HashMap<NodeId, GridBinding>,
    targets: Targets,
    surface_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    sample_count: u32,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        sample_count: u32,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[uniform_layout_entry()],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let grid_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("grid_bind_group_layout"),
                entries: &[uniform_layout_entry()],
            });

        let mesh_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });
        let grid_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("grid_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &grid_bind_group_layout],
            push_constant_ranges: &[],
        });

        let multisample = wgpu::MultisampleState {
            count: sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        };

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![
                0 => Float32x3,
                1 => Float32x3,
            ],
        };

        // Lit mesh pipeline
        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });

        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&mesh_layout),
            vertex: wgpu::VertexState {
                module: &mesh_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    vertex_layout.clone(),
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &mesh_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample,
            multiview: None,
            cache: None,
        });

        // Grid pipeline: translucent, both faces rasterized, culling decided per material
        let grid_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("grid_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::GRID_SHADER.into()),
        });

        let grid_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("grid_pipeline"),
            layout: Some(&grid_layout),
            vertex: wgpu::VertexState {
                module: &grid_shader,
                entry_point: Some("vs_grid"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout],
            },
            fragment: Some(wgpu::FragmentState {
                module: &grid_shader,
                entry_point: Some("fs_grid"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample,
            multiview: None,
            cache: None,
        });

        let (cube_verts, cube_indices) = cube_mesh();
        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&cube_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&cube_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let (plane_verts, plane_indices) = plane_mesh();
        let plane_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("plane_vertex_buffer"),
            contents: bytemuck::cast_slice(&plane_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let plane_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("plane_index_buffer"),
            contents: bytemuck::cast_slice(&plane_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instance_capacity = 4096;
        let instance_buffer = create_instance_buffer(device, instance_capacity);

        let targets = create_targets(
            device,
            surface_format,
            depth_format,
            sample_count,
            width,
            height,
        );

        Self {
            mesh_pipeline,
            grid_pipeline,
            uniform_buffer,
            uniform_bind_group,
            grid_bind_group_layout,
            cube_vertex_buffer,
            cube_index_buffer,
            cube_index_count: cube_indices.len() as u32,
            plane_vertex_buffer,
            plane_index_buffer,
            plane_index_count: plane_indices.len() as u32,
            instance_buffer,
            instance_capacity,
            grid_bindings: HashMap::new(),
            targets,
            surface_format,
            depth_format,
            sample_count,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.targets = create_targets(
            device,
            self.surface_format,
            self.depth_format,
            self.sample_count,
            width,
            height,
        );
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Render one frame of `scene` into `view`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        scene: &Scene,
        aspect: f32,
    ) {
        let view_proj = scene
            .active_camera()
            .map(|c| c.view_projection(aspect))
            .unwrap_or(Mat4::IDENTITY);
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&light_uniforms(scene, view_proj)),
        );

        // Lit instances: boxes first, then planes
        let mut boxes = Vec::new();
        let mut planes = Vec::new();
        let mut grids = Vec::new();
        for (id, mesh) in scene.meshes() {
            if !mesh.visible {
                continue;
            }
            match (mesh.shape, scene.material_of(mesh)) {
                (Shape::Ground { .. }, Some(Material::Grid(grid))) => {
                    grids.push((*id, grid_uniforms(mesh, grid)));
                }
                (Shape::Box { .. }, _) => {
                    boxes.push(InstanceData::new(mesh.world_matrix(), mesh_color(scene, mesh)));
                }
                (Shape::Ground { .. }, _) => {
                    planes.push(InstanceData::new(mesh.world_matrix(), mesh_color(scene, mesh)));
                }
            }
        }
        let box_count = boxes.len() as u32;
        let plane_count = planes.len() as u32;
        let mut instances = boxes;
        instances.append(&mut planes);

        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.instance_capacity);
            tracing::debug!(capacity = self.instance_capacity, "grew instance buffer");
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        self.grid_bindings
            .retain(|id, _| grids.iter().any(|(g, _)| g == id));
        for (id, uniforms) in &grids {
            let binding = self.grid_bindings.entry(*id).or_insert_with(|| {
                let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("grid_uniform_buffer"),
                    size: std::mem::size_of::<GridUniforms>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("grid_bind_group"),
                    layout: &self.grid_bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                });
                GridBinding { buffer, bind_group }
            });
            queue.write_buffer(&binding.buffer, 0, bytemuck::bytes_of(uniforms));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let (color_view, resolve_target) = match &self.targets.msaa {
                Some(msaa) => (msaa, Some(view)),
                None => (view, None),
            };
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(scene.clear_color)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            if !instances.is_empty() {
                pass.set_pipeline(&self.mesh_pipeline);
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                if box_count > 0 {
                    pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
                    pass.set_index_buffer(
                        self.cube_index_buffer.slice(..),
                        wgpu::IndexFormat::Uint16,
                    );
                    pass.draw_indexed(0..self.cube_index_count, 0, 0..box_count);
                }
                if plane_count > 0 {
                    pass.set_vertex_buffer(0, self.plane_vertex_buffer.slice(..));
                    pass.set_index_buffer(
                        self.plane_index_buffer.slice(..),
                        wgpu::IndexFormat::Uint16,
                    );
                    pass.draw_indexed(
                        0..self.plane_index_count,
                        0,
                        box_count..box_count + plane_count,
                    );
                }
            }

            // Translucent grid grounds after everything opaque
            if !grids.is_empty() {
                pass.set_pipeline(&self.grid_pipeline);
                pass.set_vertex_buffer(0, self.plane_vertex_buffer.slice(..));
                pass.set_index_buffer(self.plane_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                for (id, _) in &grids {
                    if let Some(binding) = self.grid_bindings.get(id) {
                        pass.set_bind_group(1, &binding.bind_group, &[]);
                        pass.draw_indexed(0..self.plane_index_count, 0, 0..1);
                    }
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn uniform_layout_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn clear_color(c: Color4) -> wgpu::Color {
    wgpu::Color {
        r: c.r as f64,
        g: c.g as f64,
        b: c.b as f64,
        a: c.a as f64,
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("instance_buffer"),
        size: (capacity * std::mem::size_of::<InstanceData>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_targets(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    sample_count: u32,
    width: u32,
    height: u32,
) -> Targets {
    let size = wgpu::Extent3d {
        width: width.max(1),
        height: height.max(1),
        depth_or_array_layers: 1,
    };
    let depth = device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: depth_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&Default::default());

    let msaa = (sample_count > 1).then(|| {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("msaa_color_texture"),
                size,
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format: surface_format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&Default::default())
    });

    Targets { depth, msaa }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubefield_common::Color3;
    use cubefield_scene::{HemisphericLight, StandardMaterial};

    #[test]
    fn cube_and_plane_meshes_are_consistent() {
        let (verts, indices) = cube_mesh();
        assert_eq!(verts.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < verts.len()));

        let (verts, indices) = plane_mesh();
        assert!(indices.iter().all(|&i| (i as usize) < verts.len()));
        assert!(verts.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn plane_winding_faces_up() {
        let (verts, indices) = plane_mesh();
        let p = |i: u16| Vec3::from_array(verts[i as usize].position);
        let n = (p(indices[1]) - p(indices[0])).cross(p(indices[2]) - p(indices[0]));
        assert!(n.y > 0.0);
    }

    #[test]
    fn uniform_layouts_have_no_padding() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 64 + MAX_LIGHTS * 48 + 16);
        assert_eq!(std::mem::size_of::<GridUniforms>(), 64 + 4 * 16);
        assert_eq!(std::mem::size_of::<InstanceData>(), 80);
    }

    #[test]
    fn light_uniforms_normalize_and_count() {
        let mut scene = Scene::default();
        let mut light = HemisphericLight::new("light", Vec3::new(0.0, 2.0, 0.0));
        light.intensity = 0.7;
        scene.add_light(light);
        let u = light_uniforms(&scene, Mat4::IDENTITY);
        assert_eq!(u.light_count[0], 1);
        assert_eq!(u.lights[0].direction, [0.0, 1.0, 0.0, 0.7]);
        assert_eq!(u.lights[0].ground, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn grid_uniforms_carry_material_parameters() {
        let mut grid = GridMaterial::new("grid");
        grid.major_unit_frequency = 5.0;
        grid.minor_unit_visibility = 0.4;
        grid.opacity = 0.9;
        grid.back_face_culling = false;
        grid.line_color = Color3::new(0.2, 0.2, 0.2);
        let mesh = Mesh::ground("ground", 1000.0, 1000.0);
        let u = grid_uniforms(&mesh, &grid);
        assert_eq!(u.params, [1.0, 5.0, 0.4, 0.9]);
        assert_eq!(u.flags[0], 0.0);
        assert_eq!(u.line_color, [0.2, 0.2, 0.2, 1.0]);
    }

    #[test]
    fn mesh_color_falls_back_to_white() {
        let mut scene = Scene::default();
        let mut red = StandardMaterial::new("red");
        red.diffuse = Color3::new(1.0, 0.0, 0.0);
        let red = scene.add_material(red);
        let plain = Mesh::cube("plain", 1.0);
        let tinted = Mesh::cube("tinted", 1.0).with_material(red);
        assert_eq!(mesh_color(&scene, &plain), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(mesh_color(&scene, &tinted), [1.0, 0.0, 0.0, 1.0]);
    }
}
