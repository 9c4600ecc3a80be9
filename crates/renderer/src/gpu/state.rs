use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::dpi::PhysicalSize;

use crate::backdrop::BackdropSurface;
use crate::pattern;

use super::context::GpuContext;
use super::pipeline::WavePipeline;
use super::uniforms::WaveUniforms;

/// Background the translucent wash composites over.
const PAGE_WHITE: wgpu::Color = wgpu::Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

/// Aggregates every GPU resource needed to present a frame.
///
/// A context that cannot be acquired is an error the caller turns into the
/// soft-failure path. A program that fails to compile or link is handled
/// here: the state degrades to a flat wash of the pattern's midpoint color
/// and the window stays usable.
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: Option<WavePipeline>,
    uniforms: WaveUniforms,
}

impl GpuState {
    /// Creates a fully initialised rendering state for the backdrop window.
    pub(crate) fn new<T>(target: &T, initial_size: PhysicalSize<u32>) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size)?;
        let uniforms = WaveUniforms::new(context.size.width, context.size.height);
        let pipeline = match WavePipeline::new(&context.device, context.surface_format, &uniforms) {
            Ok(pipeline) => Some(pipeline),
            Err(err) => {
                tracing::warn!(error = %err, "wave program rejected; falling back to a flat wash");
                None
            }
        };

        Ok(Self {
            context,
            pipeline,
            uniforms,
        })
    }

    fn clear_color(&self) -> wgpu::Color {
        if self.pipeline.is_some() {
            PAGE_WHITE
        } else {
            // No draw call follows, so pre-composite the wash over the page
            // white on the CPU.
            let [r, g, b, alpha] = pattern::fallback_wash();
            let alpha = f64::from(alpha);
            let over = |channel: f32| f64::from(channel) * alpha + 1.0 * (1.0 - alpha);
            wgpu::Color {
                r: over(r),
                g: over(g),
                b: over(b),
                a: 1.0,
            }
        }
    }
}

impl BackdropSurface for GpuState {
    fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if self.context.resize(new_size) {
            self.uniforms
                .set_resolution(new_size.width as f32, new_size.height as f32);
        }
    }

    fn set_time_millis(&mut self, timestamp_ms: f64) {
        self.uniforms.set_time_millis(timestamp_ms);
    }

    fn draw(&mut self) -> Result<(), wgpu::SurfaceError> {
        if let Some(pipeline) = &self.pipeline {
            self.context.queue.write_buffer(
                &pipeline.uniform_buffer,
                0,
                bytemuck::bytes_of(&self.uniforms),
            );
        }

        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("backdrop encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("backdrop pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            if let Some(pipeline) = &self.pipeline {
                render_pass.set_pipeline(&pipeline.pipeline);
                render_pass.set_bind_group(0, &pipeline.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, pipeline.vertex_buffer.slice(..));
                render_pass.draw(0..4, 0..1);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        tracing::trace!(
            width = self.context.size.width,
            height = self.context.size.height,
            time = self.uniforms.time,
            "presented backdrop frame"
        );
        Ok(())
    }

    fn recover(&mut self) {
        self.context.reconfigure();
    }
}
