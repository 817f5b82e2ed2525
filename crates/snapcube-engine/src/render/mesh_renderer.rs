use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{BoxGeometry, MeshVertex, Scene};
use crate::texture::{DecodedImage, TextureId};

/// Draws the scene's single lit box, optionally textured with a captured image.
///
/// GPU objects are created lazily on first use and rebuilt only when their
/// inputs change (surface format, box dimensions, texture identity). The pass
/// clears to transparent so whatever sits behind the surface shows through
/// everywhere the box is not drawn.
#[derive(Default)]
pub struct MeshRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    /// Texture the current bind group samples; `None` means the white fallback.
    bound_texture: Option<Option<TextureId>>,
    uniform_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    vbo: Option<wgpu::Buffer>,
    ibo: Option<wgpu::Buffer>,
    index_count: u32,
    geometry: Option<BoxGeometry>,

    map: Option<UploadedTexture>,
    fallback: Option<UploadedTexture>,
}

struct UploadedTexture {
    id: Option<TextureId>,
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one pass drawing `scene` into `target`.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, scene: &Scene) {
        self.ensure_pipeline(ctx);
        self.ensure_geometry(ctx, scene.mesh().geometry);
        self.ensure_texture(ctx, scene);
        self.ensure_bindings(ctx);

        let material = &scene.mesh().material;
        let draw = material.is_visible();
        if draw {
            self.write_uniform(ctx, scene);
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("snapcube mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        // A fully transparent mesh contributes nothing; the clear alone is the frame.
        if !draw {
            return;
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(vbo) = self.vbo.as_ref() else { return };
        let Some(ibo) = self.ibo.as_ref() else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader_src = include_str!("shaders/mesh.wgsl");
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("snapcube mesh shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("snapcube mesh bgl"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: wgpu::BufferSize::new(
                                    std::mem::size_of::<MeshUniform>() as u64,
                                ),
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
                    ],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("snapcube mesh pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("snapcube mesh pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // A single convex box: back-face culling is enough, no depth buffer.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.bound_texture = None;
    }

    fn ensure_geometry(&mut self, ctx: &RenderCtx<'_>, geometry: BoxGeometry) {
        if self.geometry == Some(geometry) && self.vbo.is_some() && self.ibo.is_some() {
            return;
        }

        let vertices = geometry.vertices();
        let indices = geometry.indices();

        self.vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("snapcube mesh vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("snapcube mesh ibo"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
        self.index_count = indices.len() as u32;
        self.geometry = Some(geometry);
    }

    fn ensure_texture(&mut self, ctx: &RenderCtx<'_>, scene: &Scene) {
        if self.fallback.is_none() {
            let white = DecodedImage {
                width: 1,
                height: 1,
                pixels: vec![255; 4],
            };
            self.fallback = Some(upload(ctx, None, &white));
        }

        let Some(texture) = scene.mesh().material.map.as_ref() else {
            // Keep the last upload: a restored material may point at it again.
            return;
        };
        if self.map.as_ref().is_some_and(|m| m.id == Some(texture.id())) {
            return;
        }

        // Release the previous image before allocating the next one.
        self.map = None;
        let limit = ctx.device.limits().max_texture_dimension_2d;
        let image = match texture.image().fit_within(limit) {
            Some(scaled) => {
                log::debug!(
                    "{} is {}x{}, over the {limit}px device limit; downscaled",
                    texture.id(),
                    texture.image().width,
                    texture.image().height
                );
                std::borrow::Cow::Owned(scaled)
            }
            None => std::borrow::Cow::Borrowed(texture.image()),
        };
        self.map = Some(upload(ctx, Some(texture.id()), &image));
        log::debug!("uploaded {} ({}x{})", texture.id(), image.width, image.height);
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.uniform_ubo.is_none() {
            self.uniform_ubo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("snapcube mesh ubo"),
                size: std::mem::size_of::<MeshUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }
        if self.sampler.is_none() {
            self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("snapcube mesh sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            }));
        }

        let wanted = self.map.as_ref().and_then(|m| m.id);
        if self.bind_group.is_some() && self.bound_texture == Some(wanted) {
            return;
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(ubo) = self.uniform_ubo.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };
        let Some(tex) = self.map.as_ref().or(self.fallback.as_ref()) else { return };

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("snapcube mesh bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&tex.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }));
        self.bound_texture = Some(wanted);
    }

    fn write_uniform(&mut self, ctx: &RenderCtx<'_>, scene: &Scene) {
        let Some(ubo) = self.uniform_ubo.as_ref() else { return };
        let u = MeshUniform::from_scene(scene);
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }
}

fn upload(ctx: &RenderCtx<'_>, id: Option<TextureId>, image: &DecodedImage) -> UploadedTexture {
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("snapcube mesh map"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    UploadedTexture {
        id,
        _texture: texture,
        view,
    }
}

fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x3, // normal
    2 => Float32x2  // uv
];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

/// Per-draw constants. Layout mirrors `MeshUniform` in `mesh.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MeshUniform {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    /// rgb linear, a = opacity
    base_color: [f32; 4],
    fog_color: [f32; 4],
    /// near, far, use_map, unused
    fog_params: [f32; 4],
    ambient: [f32; 4],
    /// xyz, distance
    point_pos: [f32; 4],
    /// rgb * intensity, decay
    point_color: [f32; 4],
    /// xyz, cos(outer angle)
    spot_pos: [f32; 4],
    /// xyz, cos(inner angle)
    spot_dir: [f32; 4],
    spot_color: [f32; 4],
}

impl MeshUniform {
    fn from_scene(scene: &Scene) -> Self {
        let camera = scene.camera();
        let mesh = scene.mesh();
        let material = &mesh.material;

        let scaled = |rgb: [f32; 3], k: f32| [rgb[0] * k, rgb[1] * k, rgb[2] * k];
        let xyzw = |v: glam::Vec3, w: f32| [v.x, v.y, v.z, w];
        let rgbw = |c: [f32; 3], w: f32| [c[0], c[1], c[2], w];

        let base = material.color.to_linear();
        let ambient = scaled(scene.ambient.color.to_linear(), scene.ambient.intensity);
        let point = scaled(scene.point.color.to_linear(), scene.point.intensity);
        let spot = scaled(scene.spot.color.to_linear(), scene.spot.intensity);

        let outer = scene.spot.angle.cos();
        let inner = (scene.spot.angle * (1.0 - scene.spot.penumbra.clamp(0.0, 1.0)))
            .cos()
            .max(outer + 1e-4);
        let use_map = if material.map.is_some() { 1.0 } else { 0.0 };

        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            model: mesh.model_matrix().to_cols_array_2d(),
            camera_pos: xyzw(camera.position, 1.0),
            base_color: rgbw(base, material.opacity.clamp(0.0, 1.0)),
            fog_color: rgbw(scene.fog.color.to_linear(), 1.0),
            fog_params: [scene.fog.near, scene.fog.far, use_map, 0.0],
            ambient: rgbw(ambient, 0.0),
            point_pos: xyzw(scene.point.position, scene.point.distance),
            point_color: rgbw(point, scene.point.decay),
            spot_pos: xyzw(scene.spot.position, outer),
            spot_dir: xyzw(scene.spot.direction(), inner),
            spot_color: rgbw(spot, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneGraph;
    use crate::surface::SurfaceId;

    #[test]
    fn uniform_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<MeshUniform>(), 288);
        assert_eq!(std::mem::size_of::<MeshUniform>() % 16, 0);
    }

    #[test]
    fn hidden_mesh_has_zero_opacity() {
        let scene = SceneGraph::default().build(SurfaceId(1), 640, 480);
        let u = MeshUniform::from_scene(&scene);
        assert_eq!(u.base_color[3], 0.0);
        assert_eq!(u.fog_params[2], 0.0);
    }

    #[test]
    fn visible_mesh_carries_scene_lighting() {
        let mut scene = SceneGraph::default().build(SurfaceId(1), 640, 480);
        scene.set_mesh_visible(true);
        let u = MeshUniform::from_scene(&scene);

        assert_eq!(u.base_color[3], 1.0);
        assert_eq!(u.point_pos, [0.0, 200.0, 200.0, 1000.0]);
        assert!((u.point_color[0] - 2.0).abs() < 1e-4);
        assert_eq!(u.point_color[3], 1.0);
        assert!(u.spot_dir[3] > u.spot_pos[3]);
    }
}
