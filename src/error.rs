//! Error types for stormwave.
//!
//! The simulation itself never fails. These cover the edges: GPU setup,
//! the viewer's event loop, config files, storm parameters and PNG export.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error(
        "no compatible GPU adapter found; ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support"
    )]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reports no formats the adapter can present.
    #[error("surface is not supported by the selected adapter")]
    UnsupportedSurface,
}

/// Errors that can occur while running the viewer.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Failed to create or run the event loop.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create the window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}

/// Errors from loading or saving an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from configuring a storm.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum StormError {
    /// Intensity (events per second) must be finite and positive.
    #[error("storm intensity must be a positive finite rate, got {0}")]
    InvalidIntensity(f32),
    /// Duration must be finite and non-negative.
    #[error("storm duration must be a non-negative finite number of seconds, got {0}")]
    InvalidDuration(f32),
}

/// Errors from exporting a frame.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("framebuffer is empty ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storm_error_message() {
        let err = StormError::InvalidIntensity(0.0);
        assert!(err.to_string().contains("got 0"));
    }

    #[test]
    fn test_gpu_error_converts_into_viewer_error() {
        let err: ViewerError = GpuError::NoAdapter.into();
        assert!(matches!(err, ViewerError::Gpu(GpuError::NoAdapter)));
        assert!(err.to_string().starts_with("GPU error"));
    }

    #[test]
    fn test_config_json_error() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
