use std::cell::RefCell;
use std::sync::Arc;

use winit::window::Window;

use crate::device::backend::{Drawable, Surface};
use crate::device::error::SurfaceErrorAction;
use crate::device::types::{Extent, PixelFormat};

use super::WgpuBackend;

/// Window-bound presentation surface (swapchain).
pub struct WgpuSurface {
    /// Keeps the window alive for as long as the surface exists.
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    pixel_format: PixelFormat,

    /// Active configuration; mutated only by `resize`.
    config: RefCell<wgpu::SurfaceConfiguration>,

    /// Last requested size, which may be zero while configuration is deferred.
    extent: RefCell<Extent>,
}

impl WgpuSurface {
    pub(crate) fn new(
        window: Arc<Window>,
        surface: wgpu::Surface<'static>,
        device: wgpu::Device,
        pixel_format: PixelFormat,
        config: wgpu::SurfaceConfiguration,
        extent: Extent,
    ) -> Self {
        Self {
            window,
            surface,
            device,
            pixel_format,
            config: RefCell::new(config),
            extent: RefCell::new(extent),
        }
    }
}

impl Surface<WgpuBackend> for WgpuSurface {
    fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    fn extent(&self) -> Extent {
        *self.extent.borrow()
    }

    fn resize(&self, extent: Extent) {
        apply_resize(
            &self.surface,
            &self.device,
            &mut self.config.borrow_mut(),
            &mut self.extent.borrow_mut(),
            extent,
        );
    }

    fn next_drawable(&self) -> Result<WgpuDrawable, SurfaceErrorAction> {
        match self.surface.get_current_texture() {
            Ok(surface_texture) => {
                let view = surface_texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                Ok(WgpuDrawable {
                    window: Arc::clone(&self.window),
                    surface_texture,
                    view,
                })
            }
            Err(err) => Err(map_surface_error(
                &self.surface,
                &self.device,
                &self.config.borrow(),
                *self.extent.borrow(),
                err,
            )),
        }
    }
}

/// One acquired swapchain image.
///
/// Holding it prevents acquisition of subsequent images; it is presented by
/// the command buffer it was handed to, or discarded if dropped.
pub struct WgpuDrawable {
    window: Arc<Window>,
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

impl WgpuDrawable {
    pub(crate) fn present(self) {
        let WgpuDrawable {
            window,
            surface_texture,
            view,
        } = self;
        drop(view);
        window.pre_present_notify();
        surface_texture.present();
    }
}

impl Drawable<WgpuBackend> for WgpuDrawable {
    fn texture(&self) -> wgpu::TextureView {
        self.view.clone()
    }
}

pub(crate) fn to_wgpu_format(format: PixelFormat) -> wgpu::TextureFormat {
    match format {
        PixelFormat::Bgra8Unorm => wgpu::TextureFormat::Bgra8Unorm,
        PixelFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
        PixelFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
        PixelFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
    }
}

/// Picks `requested` if the surface supports it, otherwise the first other
/// known format it supports.
pub(crate) fn choose_surface_format(
    supported: &[wgpu::TextureFormat],
    requested: PixelFormat,
) -> Option<PixelFormat> {
    std::iter::once(requested)
        .chain(PixelFormat::ALL)
        .find(|f| supported.contains(&to_wgpu_format(*f)))
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

pub(crate) fn choose_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    if caps.present_modes.contains(&requested) {
        requested
    } else {
        wgpu::PresentMode::Fifo
    }
}

/// wgpu does not support configuring a surface with a 0x0 size; in that case
/// only the recorded extent changes and configuration is deferred.
fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    extent: &mut Extent,
    new_extent: Extent,
) {
    *extent = new_extent;
    if new_extent.is_empty() {
        return;
    }

    config.width = new_extent.width;
    config.height = new_extent.height;

    surface.configure(device, config);
}

fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    extent: Extent,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if !extent.is_empty() {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_format_wins_when_supported() {
        let supported = [
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureFormat::Bgra8Unorm,
        ];
        assert_eq!(
            choose_surface_format(&supported, PixelFormat::Bgra8Unorm),
            Some(PixelFormat::Bgra8Unorm)
        );
    }

    #[test]
    fn falls_back_to_known_supported_format() {
        let supported = [
            wgpu::TextureFormat::Rgba16Float,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        assert_eq!(
            choose_surface_format(&supported, PixelFormat::Bgra8Unorm),
            Some(PixelFormat::Rgba8UnormSrgb)
        );
    }

    #[test]
    fn no_known_format_is_none() {
        let supported = [wgpu::TextureFormat::Rgba16Float];
        assert_eq!(choose_surface_format(&supported, PixelFormat::Bgra8Unorm), None);
    }
}
