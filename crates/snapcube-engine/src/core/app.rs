use winit::event::WindowEvent;

use super::ctx::WindowCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Nothing is drawn unless the app asks for it: the runtime only emits
/// `on_redraw` after [`WindowCtx::request_redraw`] or when the platform
/// invalidates the window.
pub trait App {
    /// The window exists (again) and may host a surface.
    fn on_resumed(&mut self, ctx: &WindowCtx<'_>) -> AppControl;

    /// The platform is about to take the window's surface away.
    fn on_suspended(&mut self) {}

    /// Called for every window event, before the runtime's own handling.
    fn on_window_event(&mut self, ctx: &WindowCtx<'_>, event: &WindowEvent) -> AppControl {
        let _ = (ctx, event);
        AppControl::Continue
    }

    fn on_redraw(&mut self, ctx: &WindowCtx<'_>) -> AppControl;

    /// Called when the loop is about to sleep; poll background work here.
    fn on_idle(&mut self, ctx: &WindowCtx<'_>) -> AppControl {
        let _ = ctx;
        AppControl::Continue
    }

    /// The runtime is exiting. Called once.
    fn on_close(&mut self) {}
}
