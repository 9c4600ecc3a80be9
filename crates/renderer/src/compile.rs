use std::borrow::Cow;

use anyhow::{anyhow, Result};
use wgpu::naga::ShaderStage;

/// Compiles the pass-through vertex stage.
pub(crate) fn compile_vertex_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    compile_stage(device, "backdrop vertex", VERTEX_SHADER_GLSL, ShaderStage::Vertex)
}

/// Compiles the wave fragment stage.
pub(crate) fn compile_fragment_shader(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    compile_stage(
        device,
        "backdrop fragment",
        FRAGMENT_SHADER_GLSL,
        ShaderStage::Fragment,
    )
}

/// Compiles one GLSL stage and surfaces its validation status.
///
/// `create_shader_module` reports translation failures through the device
/// error scope rather than its return value, so the scope is drained before
/// the module is handed out.
fn compile_stage(
    device: &wgpu::Device,
    label: &str,
    source: &'static str,
    stage: ShaderStage,
) -> Result<wgpu::ShaderModule> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(source),
            stage,
            defines: &[],
        },
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(anyhow!("{label} stage failed to compile: {error}"));
    }
    Ok(module)
}

/// Minimal pass-through vertex shader: forwards the 2-D corner position to
/// clip space with `z = 0`, `w = 1`.
const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 position;

void main() {
    gl_Position = vec4(position, 0.0, 1.0);
}
";

/// Wave fragment shader.
///
/// The uniform block layout must match `WaveUniforms` in `gpu::uniforms`.
/// `gl_FragCoord` is remapped to a bottom-left origin so the gradient runs
/// light-at-the-bottom to blue-at-the-top, the orientation the pattern was
/// authored against. The same math lives in [`crate::pattern`]; keep the two
/// in lockstep.
const FRAGMENT_SHADER_GLSL: &str = r"#version 450
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform WaveParams {
    vec2 _resolution;
    float _time;
    float _padding0;
} ubo;

#define resolution ubo._resolution
#define time ubo._time

float wave(vec2 p, float t) {
    return 0.04 * sin(p.x * 4.0 + t) + 0.04 * cos(p.y * 3.0 - t * 1.4);
}

void main() {
    vec2 fragCoord = vec2(gl_FragCoord.x, resolution.y - gl_FragCoord.y);
    vec2 uv = fragCoord / resolution;
    float t = time * 0.5;
    float wobble = wave(uv, t) + wave(uv.yx, t * 0.8);
    vec3 col = mix(vec3(0.97, 0.98, 1.0), vec3(0.15, 0.46, 0.91), uv.y + wobble * 6.0);
    col += 0.05 * sin(8.0 * (uv.x + uv.y + wobble + t));
    outColor = vec4(col, 0.75);
}
";
