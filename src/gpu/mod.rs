//! GPU presentation of the CPU framebuffer.

mod present;

use std::sync::Arc;

use winit::window::Window;

use crate::canvas::Framebuffer;
use crate::color::Rgb;
use crate::error::GpuError;

pub use present::{PresentPass, FRAME_FORMAT};

/// What the host should do after a failed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// The surface was reconfigured; the next frame should succeed.
    Reconfigured,
    /// Dropped this frame.
    Skipped,
    /// Unrecoverable; the host should exit.
    Fatal,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    present: PresentPass,
}

impl GpuState {
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(GpuError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let present = PresentPass::new(&device, config.width, config.height, surface_format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            present,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            log::debug!("surface resized to {}x{}", new_size.width, new_size.height);
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Upload and present one frame. `border` fills any surface area the
    /// frame does not cover.
    pub fn render(&mut self, frame: &Framebuffer, border: Rgb) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.present.upload(
            &self.device,
            &self.queue,
            frame.pixels(),
            frame.width(),
            frame.height(),
            self.surface_size(),
            border,
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Present Encoder"),
            });
        self.present.draw(&mut encoder, &view);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Render a frame and recover from surface errors where possible.
    pub fn render_or_recover(&mut self, frame: &Framebuffer, border: Rgb) -> FrameOutcome {
        match self.render(frame, border) {
            Ok(()) => FrameOutcome::Presented,
            Err(err) => {
                let outcome = classify(&err);
                match outcome {
                    FrameOutcome::Reconfigured => {
                        log::warn!("surface {err}; reconfiguring");
                        self.surface.configure(&self.device, &self.config);
                    }
                    FrameOutcome::Fatal => log::error!("surface {err}; giving up"),
                    _ => log::warn!("surface {err}; frame skipped"),
                }
                outcome
            }
        }
    }
}

/// Map a surface error to the recovery the host performs.
pub fn classify(err: &wgpu::SurfaceError) -> FrameOutcome {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => FrameOutcome::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => FrameOutcome::Fatal,
        _ => FrameOutcome::Skipped,
    }
}
