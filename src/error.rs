//! Error types for the swarm.
//!
//! The simulation itself never fails: every tick is a total numeric
//! function over fixed-size state. Errors only arise at the edges, when
//! loading configuration or bringing up the optional viewer window.

use thiserror::Error;

/// Errors that can occur while loading, saving or validating a [`SwarmConfig`].
///
/// [`SwarmConfig`]: crate::SwarmConfig
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for a swarm config.
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    /// The config parsed but holds values the simulation cannot run with.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors that can occur while running the viewer window.
#[cfg(feature = "viewer")]
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; a GPU with WebGPU/Vulkan/Metal/DX12 support is required")]
    NoAdapter,

    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    /// The swarm config was rejected before the window opened.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
