use cubefield_view::OptionsMap;

/// The engine options the wgpu backend understands.
///
/// Everything else in the option map is kept by the view but has no effect
/// here; such keys are logged at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WgpuEngineOptions {
    /// Allocate a stencil aspect alongside depth.
    pub stencil: bool,
    /// Surface textures may also be used as copy sources, for readback.
    pub preserve_drawing_buffer: bool,
    pub power_preference: wgpu::PowerPreference,
}

impl Default for WgpuEngineOptions {
    fn default() -> Self {
        Self {
            stencil: false,
            preserve_drawing_buffer: false,
            power_preference: wgpu::PowerPreference::HighPerformance,
        }
    }
}

impl WgpuEngineOptions {
    pub fn from_map(map: &OptionsMap) -> Self {
        let mut opts = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "stencil" => match value.as_bool() {
                    Some(v) => opts.stencil = v,
                    None => tracing::warn!(%value, "engine option `stencil` expects a bool"),
                },
                "preserveDrawingBuffer" => match value.as_bool() {
                    Some(v) => opts.preserve_drawing_buffer = v,
                    None => {
                        tracing::warn!(%value, "engine option `preserveDrawingBuffer` expects a bool")
                    }
                },
                "powerPreference" => match value.as_str() {
                    Some("high-performance") => {
                        opts.power_preference = wgpu::PowerPreference::HighPerformance
                    }
                    Some("low-power") => opts.power_preference = wgpu::PowerPreference::LowPower,
                    Some("default") => opts.power_preference = wgpu::PowerPreference::None,
                    _ => tracing::warn!(%value, "unknown powerPreference"),
                },
                other => tracing::debug!(key = other, "engine option not used by the wgpu backend"),
            }
        }
        opts
    }

    pub fn depth_format(&self) -> wgpu::TextureFormat {
        if self.stencil {
            wgpu::TextureFormat::Depth24PlusStencil8
        } else {
            wgpu::TextureFormat::Depth32Float
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: serde_json::Value) -> OptionsMap {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn demo_options() {
        let opts = WgpuEngineOptions::from_map(&map(json!({
            "preserveDrawingBuffer": true,
            "stencil": true,
        })));
        assert!(opts.stencil);
        assert!(opts.preserve_drawing_buffer);
        assert_eq!(opts.depth_format(), wgpu::TextureFormat::Depth24PlusStencil8);
    }

    #[test]
    fn empty_map_gives_defaults() {
        let opts = WgpuEngineOptions::from_map(&OptionsMap::new());
        assert_eq!(opts, WgpuEngineOptions::default());
        assert_eq!(opts.depth_format(), wgpu::TextureFormat::Depth32Float);
    }

    #[test]
    fn bad_and_unknown_values_are_ignored() {
        let opts = WgpuEngineOptions::from_map(&map(json!({
            "stencil": "yes",
            "powerPreference": "low-power",
            "doNotHandleContextLost": true,
        })));
        assert!(!opts.stencil);
        assert_eq!(opts.power_preference, wgpu::PowerPreference::LowPower);
    }
}
