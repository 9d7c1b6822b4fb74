//! Windowed viewer for a [`Swarm`].
//!
//! Opens a winit window, drives the swarm from the frame loop, and draws
//! bodies and edges with wgpu. The pointer position feeds the repulsor.
//!
//! Controls: move the pointer to push bodies, Space pauses, Escape quits.

mod app;
mod gpu;

use winit::event_loop::{ControlFlow, EventLoop};

use crate::error::ViewerError;
use crate::Swarm;

pub use app::App;

/// Run the viewer until the window is closed.
pub fn run(swarm: Swarm) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(swarm);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
