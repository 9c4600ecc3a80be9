//! GPU orchestration for the backdrop renderer.
//!
//! - `context` owns wgpu instance/device/surface wiring and knows how to
//!   rebuild swapchain state when the window resizes.
//! - `uniforms` mirrors the std140 parameter block written each frame.
//! - `pipeline` compiles the GLSL stages, links them into the render
//!   pipeline, and uploads the full-screen quad.
//! - `state` glues everything together behind the `BackdropSurface` trait
//!   used by the lifecycle component.

mod context;
mod pipeline;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
