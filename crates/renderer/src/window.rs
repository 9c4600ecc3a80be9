//! Interactive window driver for the backdrop.
//!
//! The winit event loop is the host scheduler: redraw requests are the "run
//! before next repaint" primitive, `Resized` events are the viewport-change
//! notification, and closing the window tears the backdrop down.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::backdrop::Backdrop;
use crate::gpu::GpuState;
use crate::runtime::{FrameHandle, FrameScheduler, SystemFrameClock};
use crate::types::RendererConfig;

/// Frame scheduler that forwards to winit redraw requests.
///
/// winit cannot revoke a redraw that is already queued, so cancellation
/// relies on the backdrop's phase gate dropping the callback when it fires.
struct RedrawScheduler {
    window: Arc<Window>,
    next_id: u64,
}

impl RedrawScheduler {
    fn new(window: Arc<Window>) -> Self {
        Self { window, next_id: 0 }
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.window.request_redraw();
        self.next_id += 1;
        FrameHandle::new(self.next_id)
    }

    fn cancel(&mut self, _handle: FrameHandle) {}
}

/// Opens the backdrop window and pumps events until it closes.
pub(crate) fn run(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(&config.window_title)
        .with_inner_size(window_size)
        .build(&event_loop)
        .context("failed to create backdrop window")?;
    let window = Arc::new(window);

    let mut scheduler = RedrawScheduler::new(window.clone());
    let clock = SystemFrameClock::new();
    let mut backdrop = Backdrop::new();
    {
        let target = window.clone();
        let initial_size = window.inner_size();
        backdrop.initialize(&mut scheduler, move || {
            GpuState::new(target.as_ref(), initial_size)
        });
    }

    event_loop
        .run(move |event, elwt| {
            // Frames are driven by the backdrop rescheduling itself, so the
            // loop can sleep between events.
            elwt.set_control_flow(ControlFlow::Wait);

            if let Event::WindowEvent { window_id, event } = event {
                if window_id != window.id() {
                    return;
                }
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        backdrop.teardown(&mut scheduler);
                        elwt.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        backdrop.handle_resize(new_size);
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        // Covered by the per-frame size check.
                    }
                    WindowEvent::RedrawRequested => {
                        let result =
                            backdrop.frame(&mut scheduler, window.inner_size(), clock.now_millis());
                        match result {
                            None | Some(Ok(())) => {}
                            Some(Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                                backdrop.recover();
                            }
                            Some(Err(wgpu::SurfaceError::OutOfMemory)) => {
                                tracing::error!("surface out of memory; exiting");
                                backdrop.teardown(&mut scheduler);
                                elwt.exit();
                            }
                            Some(Err(wgpu::SurfaceError::Timeout)) => {
                                tracing::warn!("surface timeout; retrying next frame");
                            }
                            Some(Err(other)) => {
                                tracing::warn!(error = ?other, "surface error; retrying next frame");
                            }
                        }
                    }
                    _ => {}
                }
            }
        })
        .map_err(|err| anyhow!("event loop error: {err}"))
}
