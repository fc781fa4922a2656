use std::sync::Arc;

use anyhow::Context;
use winit::window::Window;

pub struct WebGPU
{
	pub surface: wgpu::Surface<'static>,
	pub device: wgpu::Device,
	pub queue: wgpu::Queue,
	pub config: wgpu::SurfaceConfiguration
}

impl WebGPU {
	pub fn reconfigure_surface_size(&mut self, width: u32, height: u32) {
		let max_texture_extent = self.device.limits().max_texture_dimension_2d;
		self.config.width = std::cmp::min(width, max_texture_extent);
		self.config.height = std::cmp::min(height, max_texture_extent);
		self.surface.configure(&self.device, &self.config);
	}

	pub fn reconfigure(&mut self) {
		self.surface.configure(&self.device, &self.config);
	}

	pub fn new(window: Arc<Window>) -> anyhow::Result<Self> {
		let window_size = window.inner_size();
		let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
		let surface = instance.create_surface(window).context("failed to create surface")?;
		let adapter = pollster::block_on(instance.request_adapter(
			&wgpu::RequestAdapterOptions
			{
				compatible_surface: Some(&surface),
				..Default::default()
			}
		)).context("failed to request adapter")?;
		let (device, queue) = pollster::block_on(adapter.request_device(
			&wgpu::DeviceDescriptor
			{
				required_features: wgpu::Features::empty(),
				required_limits: wgpu::Limits::default(),
				label: None,
				memory_hints: wgpu::MemoryHints::default()
			},
			None
		)).context("failed to request device from adapter")?;

		// frames are sRGB pixels, present them on an sRGB surface
		let formats = surface.get_capabilities(&adapter).formats;
		let surface_format = formats.iter().copied()
			.find(|f| f.is_srgb())
			.or_else(|| formats.first().copied())
			.context("surface reports no formats")?;
		log::info!("adapter {:?}, surface format {:?}", adapter.get_info().name, surface_format);

		let config = wgpu::SurfaceConfiguration
		{
			usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
			format: surface_format,
			width: window_size.width.max(1),
			height: window_size.height.max(1),
			present_mode: wgpu::PresentMode::AutoVsync,
			alpha_mode: wgpu::CompositeAlphaMode::Auto,
			view_formats: vec![],
			desired_maximum_frame_latency: 2
		};
		surface.configure(&device, &config);

		Ok(Self { surface, device, queue, config })
	}
}
