#![deny(clippy::all)]
#![forbid(unsafe_code)]

use error_iter::ErrorIter as _;
use log::{debug, error};
use pixels::wgpu::Color;
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, KeyEvent, MouseButton, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Cursor, CursorIcon, Fullscreen, Window, WindowId};
use world_grid::World;

pub use winit::keyboard::KeyCode;

const BACKGROUND_COLOR: Color = Color::BLACK;

/// A `World` that also reacts to the keyboard and the mouse.
pub trait Interactive: World {
    /// A key was released. Escape, Q and X never get here; they quit.
    fn on_key(&mut self, _key: KeyCode) {}

    /// The left button is down over grid cell `(x, y)`. The coordinates
    /// may lie outside the grid when the cursor is over the border.
    fn on_paint(&mut self, _x: i32, _y: i32) {}
}

#[derive(Debug, Error)]
pub enum AnimateError {
    #[error("event loop failed")]
    EventLoop(#[from] EventLoopError),
    #[error("could not create window")]
    Window(#[from] OsError),
    #[error("pixel buffer failed")]
    Pixels(#[from] pixels::Error),
    #[error("could not resize pixel surface")]
    Resize(#[from] pixels::TextureError),
}

pub fn log_error<E: std::error::Error + 'static>(method_name: &str, err: &E) {
    error!("{method_name}() failed: {err}");
    for source in err.sources().skip(1) {
        error!("  Caused by: {source}");
    }
}

/// Opens a borderless fullscreen window and runs `world`, calling
/// `update` once per `time_step` and repainting after every change.
pub fn animate<W: Interactive>(world: W, time_step: Duration) -> Result<(), AnimateError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    let mut handler = AppEventHandler::new(world, time_step);
    event_loop.run_app(&mut handler)?;
    match handler.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App<W: Interactive> {
    world: W,
    window: Arc<Window>,
    pixels: Pixels<'static>,
    time_step: Duration,
    next_update: Instant,
    cursor: Option<(f32, f32)>,
    painting: bool,
}

impl<W: Interactive> App<W> {
    fn new(event_loop: &ActiveEventLoop, world: W, time_step: Duration) -> Result<Self, AnimateError> {
        let window = Arc::new(Self::build_window(event_loop)?);
        let size = world.size();
        let pixels = Self::build_pixels(&window, size.width, size.height)?;
        Ok(Self {
            world,
            window,
            pixels,
            time_step,
            next_update: Instant::now(),
            cursor: None,
            painting: false,
        })
    }

    fn build_window(event_loop: &ActiveEventLoop) -> Result<Window, OsError> {
        let window_attributes = Window::default_attributes()
            .with_title("Life")
            .with_cursor(Cursor::Icon(CursorIcon::Crosshair))
            .with_fullscreen(Some(Fullscreen::Borderless(None)))
            .with_visible(false);
        event_loop.create_window(window_attributes)
    }

    fn build_pixels(
        window: &Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, pixels::Error> {
        let window_size = window.inner_size();
        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());
        PixelsBuilder::new(width, height, surface_texture)
            .clear_color(BACKGROUND_COLOR)
            .build()
    }

    fn on_create(&mut self) {
        self.window.request_redraw();
        self.window.set_visible(true);
    }

    fn on_time_step(&mut self) {
        self.world.update();
        self.window.request_redraw();

        while self.next_update < Instant::now() {
            self.next_update += self.time_step;
        }
    }

    fn on_redraw(&mut self) -> Result<(), AnimateError> {
        let screen = self.pixels.frame_mut();
        debug_assert_eq!(screen.len(), 4 * self.world.size().num_cells());

        for (color, pixel) in self.world.cell_colors().zip(screen.chunks_exact_mut(4)) {
            pixel.copy_from_slice(&color);
        }
        self.pixels.render()?;
        Ok(())
    }

    fn on_resize(&mut self, width: u32, height: u32) -> Result<(), AnimateError> {
        debug!("surface resized to {width}x{height}");
        self.pixels.resize_surface(width, height)?;
        self.window.request_redraw();
        Ok(())
    }

    fn on_key(&mut self, key: KeyCode) {
        self.world.on_key(key);
        self.window.request_redraw();
    }

    fn on_cursor_moved(&mut self, position: (f32, f32)) {
        self.cursor = Some(position);
        if self.painting {
            self.paint();
        }
    }

    fn on_left_button(&mut self, state: ElementState) {
        self.painting = state.is_pressed();
        if self.painting {
            self.paint();
        }
    }

    fn paint(&mut self) {
        let Some(position) = self.cursor else {
            return;
        };
        let (x, y) = match self.pixels.window_pos_to_pixel(position) {
            Ok((x, y)) => (x as i32, y as i32),
            Err((x, y)) => (x as i32, y as i32),
        };
        self.world.on_paint(x, y);
        self.window.request_redraw();
    }
}

struct AppEventHandler<W: Interactive> {
    world: Option<W>,
    time_step: Duration,
    app: Option<App<W>>,
    error: Option<AnimateError>,
}

impl<W: Interactive> AppEventHandler<W> {
    fn new(world: W, time_step: Duration) -> Self {
        Self {
            world: Some(world),
            time_step,
            app: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AnimateError) {
        self.error = Some(err);
        event_loop.exit();
    }
}

impl<W: Interactive> ApplicationHandler for AppEventHandler<W> {
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause
            && let Some(app) = self.app.as_mut()
        {
            app.on_time_step();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(world) = self.world.take() else {
            return;
        };
        match App::new(event_loop, world, self.time_step) {
            Ok(mut app) => {
                app.on_create();
                self.app = Some(app);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(app) = self.app.as_mut() else {
            return;
        };
        let result = match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                Ok(())
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Released,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                match code {
                    KeyCode::Escape | KeyCode::KeyQ | KeyCode::KeyX => event_loop.exit(),
                    _ => app.on_key(code),
                }
                Ok(())
            }
            WindowEvent::CursorMoved { position, .. } => {
                app.on_cursor_moved((position.x as f32, position.y as f32));
                Ok(())
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                app.on_left_button(state);
                Ok(())
            }
            WindowEvent::Resized(size) => app.on_resize(size.width, size.height),
            WindowEvent::RedrawRequested => app.on_redraw(),
            _ => Ok(()),
        };
        if let Err(err) = result {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(app) = self.app.as_ref() {
            event_loop.set_control_flow(ControlFlow::WaitUntil(app.next_update));
        }
    }
}
