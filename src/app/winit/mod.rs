//! Winit-based window shell.
//!
//! [`App`] opens a window, mounts a [`SceneHost`] into it and forwards
//! window events to the host until the window is closed. Frames are driven
//! by winit redraw requests through [`WinitScheduler`].
//!
//! ```rust,ignore
//! use prowl::app::winit::App;
//! use prowl::config::SceneConfig;
//!
//! fn main() -> prowl::errors::Result<()> {
//!     App::new(SceneConfig::default())
//!         .with_title("Wolf")
//!         .run()
//! }
//! ```

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
pub use winit::window::{Window, WindowId};

use crate::config::SceneConfig;
use crate::errors::Result;
use crate::host::{MountTarget, SceneHost};
use crate::render::{HeadlessRenderer, Renderer};
use crate::render_loop::{FrameScheduler, FrameToken};

pub mod input_adapter;

/// Builds the renderer for a freshly created window.
pub type RendererFactory = Box<dyn FnOnce(&Arc<Window>, &MountTarget) -> Result<Box<dyn Renderer>>>;

/// Frame scheduler backed by winit redraw requests.
///
/// At most one frame is outstanding; cancelling it means the next
/// `RedrawRequested` finds nothing due.
pub struct WinitScheduler {
    window: Arc<Window>,
    next_token: u64,
    outstanding: Option<FrameToken>,
}

impl WinitScheduler {
    #[must_use]
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next_token: 0,
            outstanding: None,
        }
    }
}

impl FrameScheduler for WinitScheduler {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_token);
        self.next_token += 1;
        self.outstanding = Some(token);
        self.window.request_redraw();
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.outstanding == Some(token) {
            self.outstanding = None;
        }
    }

    fn take_due(&mut self) -> Option<FrameToken> {
        self.outstanding.take()
    }
}

/// Application builder.
pub struct App {
    title: String,
    config: SceneConfig,
    renderer_factory: Option<RendererFactory>,
}

impl App {
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        Self {
            title: "Prowl".into(),
            config,
            renderer_factory: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Supplies the renderer. Without one the session uses a
    /// [`HeadlessRenderer`], which updates the scene but draws nothing.
    #[must_use]
    pub fn with_renderer<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(&Arc<Window>, &MountTarget) -> Result<Box<dyn Renderer>> + 'static,
    {
        self.renderer_factory = Some(Box::new(factory));
        self
    }

    /// Runs the event loop on the current thread until the window closes.
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut runner = AppRunner {
            title: self.title,
            config: Some(self.config),
            renderer_factory: self.renderer_factory,
            window: None,
            host: None,
        };
        event_loop.run_app(&mut runner)?;
        Ok(())
    }
}

struct AppRunner {
    title: String,
    config: Option<SceneConfig>,
    renderer_factory: Option<RendererFactory>,
    window: Option<Arc<Window>>,
    host: Option<SceneHost>,
}

impl AppRunner {
    fn mount(&mut self, window: &Arc<Window>) -> Result<SceneHost> {
        let scale = window.scale_factor();
        let logical = window.inner_size().to_logical::<u32>(scale);
        let target = MountTarget::new(logical.width, logical.height).with_pixel_ratio(scale as f32);

        let config = self.config.take().unwrap_or_default();
        let factory = self.renderer_factory.take();
        let scheduler = WinitScheduler::new(window.clone());

        SceneHost::mount(
            Some(&target),
            config,
            |target| match factory {
                Some(factory) => factory(window, target),
                None => Ok(Box::new(HeadlessRenderer::new(target.width, target.height))),
            },
            scheduler,
        )
    }

    fn logical_size(&self, size: PhysicalSize<u32>) -> (u32, u32) {
        let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
        let logical = size.to_logical::<u32>(scale);
        (logical.width, logical.height)
    }
}

impl ApplicationHandler for AppRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        match self.mount(&window) {
            Ok(host) => self.host = Some(host),
            Err(e) => {
                log::error!("Failed to mount scene: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CloseRequested = event {
            if let Some(host) = self.host.take() {
                host.unmount();
            }
            event_loop.exit();
            return;
        }

        let (width, height) = match &event {
            WindowEvent::Resized(size) => self.logical_size(*size),
            _ => (0, 0),
        };
        let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());

        let Some(host) = self.host.as_mut() else {
            return;
        };

        match event {
            WindowEvent::Resized(_) => host.resize(width, height),
            WindowEvent::KeyboardInput { event, .. } => {
                let key = input_adapter::translate_key(&event.logical_key);
                match event.state {
                    ElementState::Pressed => {
                        host.key_down(&key);
                    }
                    ElementState::Released => host.key_up(&key),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(scale);
                host.pointer_moved(logical.x, logical.y);
            }
            WindowEvent::CursorLeft { .. } => host.pointer_left(),
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = input_adapter::translate_button(button) {
                    host.pointer_button(button, state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                host.wheel(input_adapter::translate_wheel(delta));
            }
            WindowEvent::RedrawRequested => {
                host.pump_frame(Instant::now());
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(host) = self.host.as_mut() {
            host.pump_assets();
        }
    }
}
