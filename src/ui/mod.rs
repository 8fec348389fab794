use anyhow::Context;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use softbuffer::Surface;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::ModifiersState;
use winit::window::{Window, WindowId};

use crate::config::{
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH, WINDOW_TITLE,
};
use crate::ui::layout::Button;
use crate::ui::render::Canvas;
use crate::ui::state::{Action, ViewerState, action_for_key};

pub mod dialog;
pub mod layout;
pub mod render;
pub mod state;

// ---------------------------------------------------------------------------
// Application handler (winit 0.30 style)
// ---------------------------------------------------------------------------

struct Gfx {
    window: Arc<Window>,
    // Keeps the display connection alive for the surface.
    _context: softbuffer::Context<Arc<Window>>,
    surface: Surface<Arc<Window>, Arc<Window>>,
}

pub struct App {
    state: ViewerState,
    gfx: Option<Gfx>,
    /// Paths from the command line, opened once the window exists.
    initial_paths: Vec<PathBuf>,
    modifiers: ModifiersState,
    cursor: (f64, f64),
    /// Set if the window could not be created; reported by `main`.
    pub startup_error: Option<anyhow::Error>,
}

impl App {
    pub fn new(state: ViewerState, initial_paths: Vec<PathBuf>) -> Self {
        Self {
            state,
            gfx: None,
            initial_paths,
            modifiers: ModifiersState::empty(),
            cursor: (-1.0, -1.0),
            startup_error: None,
        }
    }

    fn create_gfx(event_loop: &ActiveEventLoop) -> anyhow::Result<Gfx> {
        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT))
            .with_min_inner_size(LogicalSize::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT));
        let window = event_loop.create_window(attrs).context("create window")?;
        let window = Arc::new(window);
        // SoftBufferError is not Send + Sync, so it cannot take `.context`.
        let context = softbuffer::Context::new(Arc::clone(&window))
            .map_err(|e| anyhow::anyhow!("create softbuffer context: {e}"))?;
        let surface = Surface::new(&context, Arc::clone(&window))
            .map_err(|e| anyhow::anyhow!("create softbuffer surface: {e}"))?;
        Ok(Gfx {
            window,
            _context: context,
            surface,
        })
    }

    fn request_redraw(&self) {
        if let Some(gfx) = &self.gfx {
            gfx.window.request_redraw();
        }
    }

    fn perform(&mut self, action: Action, event_loop: &ActiveEventLoop) {
        let changed = match action {
            Action::Open => {
                let selection = match &self.gfx {
                    Some(gfx) => dialog::pick_images(Some(gfx.window.as_ref())),
                    None => dialog::pick_images(None),
                };
                self.state.open_selection(selection);
                true
            }
            Action::Next => self.state.show_next(),
            Action::Previous => self.state.show_previous(),
            Action::First => self.state.show_first(),
            Action::Last => self.state.show_last(),
            Action::Quit => {
                event_loop.exit();
                return;
            }
        };
        if changed {
            self.request_redraw();
        }
    }

    fn paint(&mut self) {
        let Some(gfx) = &mut self.gfx else { return };
        let size = gfx.window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return;
        };
        if let Err(e) = gfx.surface.resize(w, h) {
            log::error!("Failed to resize surface: {}", e);
            return;
        }
        match gfx.surface.buffer_mut() {
            Ok(mut buffer) => {
                let mut canvas = Canvas::new(&mut buffer, size.width, size.height);
                self.state.render(&mut canvas);
                if let Err(e) = buffer.present() {
                    log::error!("Failed to present frame: {}", e);
                }
            }
            Err(e) => log::error!("Failed to map frame buffer: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gfx.is_some() {
            return;
        }
        let gfx = match Self::create_gfx(event_loop) {
            Ok(gfx) => gfx,
            Err(e) => {
                self.startup_error = Some(e);
                event_loop.exit();
                return;
            }
        };

        let size = gfx.window.inner_size();
        self.state.resize(size.width, size.height, Instant::now());
        if !self.initial_paths.is_empty() {
            let paths = std::mem::take(&mut self.initial_paths);
            self.state.open_selection(Some(paths));
        }
        gfx.window.request_redraw();
        self.gfx = Some(gfx);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.state.resize(width, height, Instant::now());
                self.request_redraw();
            }

            WindowEvent::ModifiersChanged(mods) => {
                self.modifiers = mods.state();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                if let Some(action) = action_for_key(&event.logical_key, self.modifiers) {
                    // Auto-repeat steps through images but never reopens the dialog.
                    if event.repeat && action == Action::Open {
                        return;
                    }
                    self.perform(action, event_loop);
                }
            }

            WindowEvent::CursorMoved {
                position: PhysicalPosition { x, y },
                ..
            } => {
                self.cursor = (x, y);
                if self.state.pointer_moved(x, y) {
                    self.request_redraw();
                }
            }

            WindowEvent::CursorLeft { .. } => {
                self.cursor = (-1.0, -1.0);
                if self.state.pointer_moved(-1.0, -1.0) {
                    self.request_redraw();
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let (x, y) = self.cursor;
                match state {
                    ElementState::Pressed => self.state.pointer_pressed(x, y),
                    ElementState::Released => {
                        if let Some(button) = self.state.pointer_released(x, y) {
                            let action = match button {
                                Button::Open => Action::Open,
                                Button::Previous => Action::Previous,
                                Button::Next => Action::Next,
                            };
                            self.perform(action, event_loop);
                        }
                    }
                }
                self.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                self.paint();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        match self.state.resize_deadline() {
            Some(when) if Instant::now() < when => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(when));
            }
            Some(_) => {
                if self.state.settle_resize(Instant::now()) {
                    self.request_redraw();
                }
                event_loop.set_control_flow(ControlFlow::Wait);
            }
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}
