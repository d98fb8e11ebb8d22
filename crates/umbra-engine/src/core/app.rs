use anyhow::Result;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::device::Gpu;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the layer that owns scene + renderer.
///
/// Callbacks never overlap: resize is delivered strictly between frames.
pub trait App {
    /// Called once after the GPU context exists, before the first frame.
    ///
    /// Build pipelines and GPU resources here. An error ends the run and is
    /// returned from `Runtime::run`.
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> Result<()>;

    /// Called for window events.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called after the surface has been reconfigured to `size`.
    ///
    /// Not called for zero-sized (minimized) windows.
    fn on_resize(&mut self, gpu: &Gpu<'_>, size: PhysicalSize<u32>) {
        let _ = (gpu, size);
    }

    /// Called once per frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
