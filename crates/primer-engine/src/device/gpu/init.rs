use std::borrow::Cow;

/// Default shader library compiled into the engine.
pub const DEFAULT_LIBRARY_SOURCE: &str = include_str!("../../render/shaders/triangle.wgsl");

/// Initialization parameters for the wgpu backend.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct WgpuInit {
    /// Backends wgpu may pick an adapter from.
    pub backends: wgpu::Backends,

    /// Adapter preference when several GPUs are present.
    pub power_preference: wgpu::PowerPreference,

    /// Present mode (swap behavior).
    ///
    /// FIFO is broadly supported and paces frames to the display refresh.
    /// Unsupported modes fall back to FIFO.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,

    /// WGSL source of the default shader library.
    pub library_source: Cow<'static, str>,
}

impl Default for WgpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            library_source: Cow::Borrowed(DEFAULT_LIBRARY_SOURCE),
        }
    }
}
