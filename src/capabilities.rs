/// Streamline features supported by the current adapter, driver and OS.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct CapabilitySet {
    /// DLSS Super Resolution.
    pub upscaling: bool,
    /// DLSS Frame Generation.
    pub frame_generation: bool,
    /// NVIDIA Image Scaling.
    pub sharpening: bool,
    /// Reflex low latency.
    pub latency_reduction: bool,
    /// PC Latency markers.
    pub marker_pipeline: bool,
}

/// Capability queried through [`crate::Streamline::get_capability`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CapabilityKind {
    Upscaling,
    FrameGeneration,
    Sharpening,
    LatencyReduction,
    MarkerPipeline,
}

impl CapabilitySet {
    pub fn get(&self, kind: CapabilityKind) -> bool {
        match kind {
            CapabilityKind::Upscaling => self.upscaling,
            CapabilityKind::FrameGeneration => self.frame_generation,
            CapabilityKind::Sharpening => self.sharpening,
            CapabilityKind::LatencyReduction => self.latency_reduction,
            CapabilityKind::MarkerPipeline => self.marker_pipeline,
        }
    }
}
