use bytemuck::{Pod, Zeroable};

/// CPU-side mirror of the fragment stage's parameter block.
///
/// The layout matches the `WaveParams` block in the GLSL source and therefore
/// must observe std140 alignment rules: a vec2 followed by two scalars packs
/// into a single 16-byte row.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct WaveUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub _padding0: f32,
}

unsafe impl Zeroable for WaveUniforms {}
unsafe impl Pod for WaveUniforms {}

impl WaveUniforms {
    /// Prepares a parameter block sized to the current surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: [width as f32, height as f32],
            time: 0.0,
            _padding0: 0.0,
        }
    }

    /// Writes the current surface dimensions.
    pub fn set_resolution(&mut self, width: f32, height: f32) {
        self.resolution = [width, height];
    }

    /// Converts a loop timestamp in milliseconds into the seconds the shader
    /// consumes.
    pub fn set_time_millis(&mut self, timestamp_ms: f64) {
        self.time = (timestamp_ms * 0.001) as f32;
    }
}
