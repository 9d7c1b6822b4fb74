use std::sync::Arc;

use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use super::gpu::GpuState;
use crate::error::ViewerError;
use crate::input::Pointer;
use crate::time::FrameTimer;
use crate::Swarm;

pub struct App {
    swarm: Swarm,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    pointer: Pointer,
    timer: FrameTimer,
    error: Option<ViewerError>,
}

impl App {
    pub fn new(swarm: Swarm) -> Self {
        Self {
            swarm,
            window: None,
            gpu_state: None,
            pointer: Pointer::new(),
            timer: FrameTimer::new(),
            error: None,
        }
    }

    /// Error that ended the event loop early, if any.
    pub fn take_error(&mut self) -> Option<ViewerError> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        error!(%err, "viewer failed");
        self.error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };

        let delta = self.timer.tick();
        let half_extents = gpu_state.camera.viewport_half_extents(gpu_state.aspect());
        self.swarm.advance(delta, &self.pointer, half_extents);

        match gpu_state.render(&self.swarm) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost) => gpu_state.resize(winit::dpi::PhysicalSize {
                width: gpu_state.config.width,
                height: gpu_state.config.height,
            }),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("surface out of memory");
                event_loop.exit();
            }
            Err(e) => warn!(?e, "render error"),
        }

        if self.timer.frame() % 600 == 0 {
            info!(
                fps = self.timer.fps(),
                edges = self.swarm.edges().len(),
                dropped_steps = self.swarm.clock().dropped(),
                "frame stats"
            );
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Neuron Swarm")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        let size = window.inner_size();
        self.pointer.set_window_size(size.width, size.height);

        match pollster::block_on(GpuState::new(window.clone(), &self.swarm)) {
            Ok(gpu_state) => {
                self.gpu_state = Some(gpu_state);
                self.window = Some(window);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.pointer.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    match code {
                        KeyCode::Escape => event_loop.exit(),
                        KeyCode::Space => self.timer.toggle_pause(),
                        _ => {}
                    }
                }
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
