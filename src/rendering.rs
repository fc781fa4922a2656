
// Presents CPU frames: upload to a texture, draw it over the whole surface.

use crate::{asset::ShaderSource, firstperson::Frame, webgpu::WebGPU};

pub struct FramePresenter {
	texture: wgpu::Texture,
	bind_group: wgpu::BindGroup,
	pipeline: wgpu::RenderPipeline,
	_texview: wgpu::TextureView,
	_sampler: wgpu::Sampler
}

impl FramePresenter {
	pub fn new(webgpu: &WebGPU, width: u32, height: u32) -> Self {
		let device = &webgpu.device;

		let texture = device.create_texture(&wgpu::TextureDescriptor {
			label: Some("FramePresenter.texture"),
			size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
			mip_level_count: 1,
			sample_count: 1,
			dimension: wgpu::TextureDimension::D2,
			format: wgpu::TextureFormat::Rgba8UnormSrgb,
			usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
			view_formats: &[]
		});
		let texview = texture.create_view(&wgpu::TextureViewDescriptor {
			label: Some("FramePresenter._texview"),
			dimension: Some(wgpu::TextureViewDimension::D2),
			..Default::default()
		});
		let sampler = device.create_sampler(&wgpu::SamplerDescriptor::default());

		let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
			label: Some("FramePresenter bind group layout: frame texture"),
			entries: &[
				wgpu::BindGroupLayoutEntry {
					binding: 0,
					visibility: wgpu::ShaderStages::FRAGMENT,
					ty: wgpu::BindingType::Texture {
						sample_type: wgpu::TextureSampleType::Float { filterable: true },
						view_dimension: wgpu::TextureViewDimension::D2,
						multisampled: false
					},
					count: None
				},
				wgpu::BindGroupLayoutEntry {
					binding: 1,
					visibility: wgpu::ShaderStages::FRAGMENT,
					ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
					count: None
				}
			]
		});

		let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
			label: Some("FramePresenter.bind_group"),
			layout: &bind_group_layout,
			entries: &[
				wgpu::BindGroupEntry {
					binding: 0,
					resource: wgpu::BindingResource::TextureView(&texview)
				},
				wgpu::BindGroupEntry {
					binding: 1,
					resource: wgpu::BindingResource::Sampler(&sampler)
				}
			]
		});

		let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
			label: Some("FramePresenter present shader"),
			source: wgpu::ShaderSource::Wgsl(ShaderSource::PRESENT.into())
		});

		let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
			label: Some("FramePresenter pipeline layout"),
			bind_group_layouts: &[&bind_group_layout],
			push_constant_ranges: &[]
		});

		let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
			label: Some("FramePresenter.pipeline"),
			layout: Some(&pipeline_layout),
			vertex: wgpu::VertexState {
				module: &shader,
				entry_point: "vs_main",
				buffers: &[],
				compilation_options: wgpu::PipelineCompilationOptions::default()
			},
			primitive: wgpu::PrimitiveState {
				topology: wgpu::PrimitiveTopology::TriangleStrip,
				strip_index_format: None,
				front_face: wgpu::FrontFace::Ccw,
				cull_mode: None,
				unclipped_depth: false,
				polygon_mode: wgpu::PolygonMode::Fill,
				conservative: false
			},
			depth_stencil: None,
			multisample: wgpu::MultisampleState::default(),
			fragment: Some(wgpu::FragmentState {
				module: &shader,
				entry_point: "fs_main",
				targets: &[Some(wgpu::ColorTargetState {
					format: webgpu.config.format,
					blend: Some(wgpu::BlendState::REPLACE),
					write_mask: wgpu::ColorWrites::ALL
				})],
				compilation_options: wgpu::PipelineCompilationOptions::default()
			}),
			multiview: None,
			cache: None
		});

		Self { texture, bind_group, pipeline, _texview: texview, _sampler: sampler }
	}

	pub fn upload(&self, webgpu: &WebGPU, frame: &Frame) {
		let size = self.texture.size();
		if frame.width() != size.width || frame.height() != size.height {
			log::warn!("frame {}x{} does not match presenter texture {}x{}",
				frame.width(), frame.height(), size.width, size.height);
			return;
		}

		webgpu.queue.write_texture(
			wgpu::ImageCopyTexture {
				texture: &self.texture,
				mip_level: 0,
				origin: wgpu::Origin3d::ZERO,
				aspect: wgpu::TextureAspect::All
			},
			frame.as_bytes(),
			wgpu::ImageDataLayout {
				offset: 0,
				bytes_per_row: Some(4 * frame.width()),
				rows_per_image: Some(frame.height())
			},
			size
		);
	}

	pub fn render(&self, webgpu: &WebGPU) -> Result<(), wgpu::SurfaceError> {
		let output = webgpu.surface.get_current_texture()?;
		let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

		let mut encoder = webgpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
		let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
			label: Some("FramePresenter::render() render pass"),
			color_attachments: &[Some(wgpu::RenderPassColorAttachment {
				view: &view,
				resolve_target: None,
				ops: wgpu::Operations {
					load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
					store: wgpu::StoreOp::Store
				}
			})],
			..Default::default()
		});

		render_pass.set_pipeline(&self.pipeline);
		render_pass.set_bind_group(0, &self.bind_group, &[]);
		render_pass.draw(0..4, 0..1);
		drop(render_pass);

		webgpu.queue.submit(Some(encoder.finish()));
		output.present();
		Ok(())
	}
}
