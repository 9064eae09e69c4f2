use std::sync::mpsc;

use anyhow::{Context, Result};
use wgpu::util::DeviceExt;

use life_sim::{GridSize, LifeError, SurfaceBackend};

use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    cells_to_texels, padded_bytes_per_row, texels_to_cells, CellPalette, PresentUniform,
    QuadVertex, QUAD_INDICES, QUAD_VERTICES,
};

const CELL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// One grid of cells held in a GPU texture.
///
/// Texel `(x, y)` is cell `(x, y)`; a cell is alive when its red channel is
/// set. The bind group exposes the texture to both programs as `state`.
pub struct GpuSurface {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
    size: GridSize,
}

impl GpuSurface {
    #[inline]
    pub fn size(&self) -> GridSize {
        self.size
    }
}

/// Runs the step and copy programs with wgpu.
///
/// Steps are recorded into their own encoder and submitted immediately, so a
/// later frame always samples the finished generation. Presenting records into
/// the frame's encoder.
pub struct GpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,

    state_bgl: wgpu::BindGroupLayout,
    step_pipeline: wgpu::RenderPipeline,

    present_bgl: wgpu::BindGroupLayout,
    present_format: wgpu::TextureFormat,
    present_pipeline: wgpu::RenderPipeline,
    present_ubo: wgpu::Buffer,
    present_bind_group: wgpu::BindGroup,

    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,

    palette: CellPalette,
    scale_factor: f32,
}

impl GpuBackend {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let device = ctx.device.clone();
        let queue = ctx.queue.clone();

        let state_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("life state bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            }],
        });

        let present_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("life present bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<PresentUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let step_pipeline = create_pipeline(
            &device,
            "life step",
            include_str!("shaders/step.wgsl"),
            &[&state_bgl],
            CELL_FORMAT,
        );
        let present_pipeline = create_pipeline(
            &device,
            "life present",
            include_str!("shaders/copy.wgsl"),
            &[&state_bgl, &present_bgl],
            ctx.surface_format,
        );

        let present_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("life present ubo"),
            size: std::mem::size_of::<PresentUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let present_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("life present bind group"),
            layout: &present_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: present_ubo.as_entire_binding(),
            }],
        });

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("life quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("life quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!("GpuBackend: pipelines ready (present format {:?})", ctx.surface_format);

        Self {
            device,
            queue,
            state_bgl,
            step_pipeline,
            present_bgl,
            present_format: ctx.surface_format,
            present_pipeline,
            present_ubo,
            present_bind_group,
            quad_vbo,
            quad_ibo,
            palette: CellPalette::default(),
            scale_factor: ctx.scale_factor,
        }
    }

    /// Picks up per-frame context: the DPI scale, and the surface format if it
    /// changed since the copy program was built.
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>) {
        self.scale_factor = ctx.scale_factor;
        if ctx.surface_format == self.present_format {
            return;
        }
        self.present_pipeline = create_pipeline(
            &self.device,
            "life present",
            include_str!("shaders/copy.wgsl"),
            &[&self.state_bgl, &self.present_bgl],
            ctx.surface_format,
        );
        self.present_format = ctx.surface_format;
        log::debug!("GpuBackend: rebuilt present pipeline for {:?}", ctx.surface_format);
    }

    pub fn set_palette(&mut self, palette: CellPalette) {
        self.palette = palette;
    }

    fn draw_quad(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, 0..1);
    }

    fn texel_copy<'a>(texture: &'a wgpu::Texture, x: u32, y: u32) -> wgpu::TexelCopyTextureInfo<'a> {
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d { x, y, z: 0 },
            aspect: wgpu::TextureAspect::All,
        }
    }

    /// Blocks until `buffer` is mapped and returns its contents.
    fn read_back(&self, buffer: &wgpu::Buffer) -> Result<Vec<u8>> {
        let slice = buffer.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .context("device poll failed during readback")?;

        rx.recv()
            .context("readback callback was dropped")?
            .context("failed to map readback buffer")?;

        let data = slice.get_mapped_range().to_vec();
        buffer.unmap();
        Ok(data)
    }
}

impl SurfaceBackend for GpuBackend {
    type Surface = GpuSurface;
    type Target<'t> = RenderTarget<'t>;

    fn create_surface(&mut self, size: GridSize) -> life_sim::Result<GpuSurface> {
        let max = self.device.limits().max_texture_dimension_2d;
        if size.width > max || size.height > max {
            return Err(LifeError::BackendUnavailable(format!(
                "{}x{} cells exceeds the device texture limit of {max}",
                size.width, size.height
            )));
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("life cell surface"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: CELL_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("life state bind group"),
            layout: &self.state_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            }],
        });

        Ok(GpuSurface {
            texture,
            view,
            bind_group,
            size,
        })
    }

    fn upload(&mut self, surface: &mut GpuSurface, cells: &[u8]) {
        let GridSize { width, height } = surface.size;
        self.queue.write_texture(
            Self::texel_copy(&surface.texture, 0, 0),
            &cells_to_texels(cells),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn write_cell(&mut self, surface: &mut GpuSurface, x: u32, y: u32, alive: bool) {
        self.queue.write_texture(
            Self::texel_copy(&surface.texture, x, y),
            &cells_to_texels(&[alive as u8]),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
    }

    fn download(&mut self, surface: &GpuSurface) -> life_sim::Result<Vec<u8>> {
        let GridSize { width, height } = surface.size;
        let bytes_per_row = padded_bytes_per_row(width);

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("life readback"),
            size: bytes_per_row as u64 * height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("life readback encoder"),
            });
        encoder.copy_texture_to_buffer(
            Self::texel_copy(&surface.texture, 0, 0),
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let data = self
            .read_back(&buffer)
            .map_err(|e| LifeError::BackendUnavailable(format!("readback failed: {e:#}")))?;
        Ok(texels_to_cells(&data, width, height, bytes_per_row))
    }

    fn run_step(&mut self, current: &GpuSurface, next: &mut GpuSurface) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("life step encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("life step pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &next.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(&self.step_pipeline);
            rpass.set_bind_group(0, &current.bind_group, &[]);
            self.draw_quad(&mut rpass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn present(&mut self, current: &GpuSurface, scale: u32, target: &mut RenderTarget<'_>) {
        let uniform = self.palette.uniform(scale as f32 * self.scale_factor);
        self.queue
            .write_buffer(&self.present_ubo, 0, bytemuck::bytes_of(&uniform));

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("life present pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.present_pipeline);
        rpass.set_bind_group(0, &current.bind_group, &[]);
        rpass.set_bind_group(1, &self.present_bind_group, &[]);
        self.draw_quad(&mut rpass);
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    source: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),

        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[QuadVertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
