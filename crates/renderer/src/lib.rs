//! Renderer crate for Wavepaper.
//!
//! The module glues the winit backdrop window, the `wgpu` rendering pipeline,
//! and the procedural wave pattern together. The overall flow is:
//!
//! ```text
//!   CLI / wavepaper
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ winit event loop ──▶ Backdrop::frame()
//!          ▲                       │
//!          │                       └─▶ WaveUniforms ─▶ GPU UBO ─▶ draw
//! ```
//!
//! `Backdrop` owns the mount-to-unmount lifecycle (surface acquisition, the
//! per-frame update/draw cycle, teardown) while `GpuState` owns the GPU
//! resources behind it. The two shading stages are fixed GLSL compiled at
//! start-up through wgpu's naga front end; the same per-pixel math lives in
//! [`pattern`] as the CPU reference.

mod backdrop;
mod compile;
mod gpu;
pub mod pattern;
mod runtime;
mod types;
mod window;

pub use backdrop::{Backdrop, BackdropSurface, Phase};
pub use runtime::{FrameHandle, FrameScheduler, SystemFrameClock};
pub use types::RendererConfig;

use anyhow::Result;

/// High-level entry point that owns the chosen configuration.
///
/// The heavy lifting lives inside the window driver and [`Backdrop`];
/// `Renderer` simply forwards the request.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the backdrop window and drives the event loop until it closes.
    ///
    /// Returns an error only when the event loop or the window itself cannot
    /// be created; a missing GPU degrades to an empty window instead.
    pub fn run(&mut self) -> Result<()> {
        window::run(&self.config)
    }
}
