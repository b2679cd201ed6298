use crate::model::Vertex;
use crate::view::shader::ShaderProgram;
use crate::view::texture::SceneTexture;

pub fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

/// GPU side of a [`ShaderProgram`]: the render pipelines built from its
/// stages, the uniform buffer its staged block uploads into, and the bind
/// group tying both textures to the material.
///
/// The uniform buffer holds one aligned slot per draw so each instance can
/// carry its own block within a single render pass; slots are selected with
/// a dynamic offset at bind time.
pub struct ProgramBinding {
    pipeline: wgpu::RenderPipeline,
    wireframe_pipeline: Option<wgpu::RenderPipeline>,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    slot_stride: u32,
    slot_count: u32,
    slab: Vec<u8>,
}

impl ProgramBinding {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        program: &ShaderProgram,
        textures: [&SceneTexture; 2],
        slot_count: u32,
    ) -> Self {
        let block_size = program.block_size().max(16) as u64;
        let align = device.limits().min_uniform_buffer_offset_alignment as u64;
        let slot_stride = block_size.div_ceil(align) * align;

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("program_uniforms"),
            size: slot_stride * slot_count as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("program_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(block_size),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("program_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &uniform_buffer,
                        offset: 0,
                        size: wgpu::BufferSize::new(block_size),
                    }),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&textures[0].view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&textures[0].sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&textures[1].view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&textures[1].sampler),
                },
            ],
        });

        let vs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vertex_stage"),
            source: wgpu::ShaderSource::Wgsl(program.vertex_source().into()),
        });
        let fs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fragment_stage"),
            source: wgpu::ShaderSource::Wgsl(program.fragment_source().into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("program_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let make_pipeline = |polygon_mode: wgpu::PolygonMode, label: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &vs_module,
                    entry_point: Some(program.vertex_entry()),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[
                            wgpu::VertexAttribute {
                                offset: 0,
                                shader_location: 0,
                                format: wgpu::VertexFormat::Float32x3,
                            },
                            wgpu::VertexAttribute {
                                offset: 12,
                                shader_location: 1,
                                format: wgpu::VertexFormat::Float32x2,
                            },
                        ],
                    }],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &fs_module,
                    entry_point: Some(program.fragment_entry()),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: depth_format,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            })
        };

        let pipeline = make_pipeline(wgpu::PolygonMode::Fill, "program_pipeline");
        let wireframe_pipeline = if device.features().contains(wgpu::Features::POLYGON_MODE_LINE) {
            Some(make_pipeline(wgpu::PolygonMode::Line, "program_pipeline_wireframe"))
        } else {
            None
        };

        Self {
            pipeline,
            wireframe_pipeline,
            uniform_buffer,
            bind_group,
            slot_stride: slot_stride as u32,
            slot_count,
            slab: vec![0u8; (slot_stride * slot_count as u64) as usize],
        }
    }

    /// Copy the program's staged uniform block into slot `index`.
    pub fn stage_slot(&mut self, index: u32, program: &ShaderProgram) {
        debug_assert!(index < self.slot_count);
        let start = (index * self.slot_stride) as usize;
        let bytes = program.staged_bytes();
        self.slab[start..start + bytes.len()].copy_from_slice(bytes);
    }

    /// Upload every staged slot. Call once per frame, before the pass.
    pub fn flush(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.uniform_buffer, 0, &self.slab);
    }

    /// Make this program current for subsequent draws. Falls back to the
    /// fill pipeline when the adapter has no line polygon mode.
    pub fn activate(&self, pass: &mut wgpu::RenderPass<'_>, wireframe: bool) {
        let pipeline = if wireframe {
            self.wireframe_pipeline.as_ref().unwrap_or(&self.pipeline)
        } else {
            &self.pipeline
        };
        pass.set_pipeline(pipeline);
    }

    /// Bind uniform slot `index` for the next draw.
    pub fn bind_slot(&self, pass: &mut wgpu::RenderPass<'_>, index: u32) {
        pass.set_bind_group(0, &self.bind_group, &[index * self.slot_stride]);
    }

    pub fn supports_wireframe(&self) -> bool {
        self.wireframe_pipeline.is_some()
    }
}
