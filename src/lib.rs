//! # streamline_wgpu
//!
//! This crate integrates NVIDIA Streamline (DLSS, DLSS Frame Generation, NIS, Reflex and PC Latency markers) into a host engine's render loop.
//!
//! ## Setup
//! Ship `sl.interposer.dll` and the Streamline plugins next to the executable. Without them every call is a no-op and every capability reports `false`.
//!
//! Capability enumeration through wgpu only works with wgpu's Vulkan backend. D3D12 hosts pass the adapter LUID themselves.
//!
//! For further info on the SDK itself, read `$STREAMLINE_SDK/docs/ProgrammingGuide.md`.
//!
//! ## API Usage
//! ```rust,ignore
//! use streamline_wgpu::{EngineMarker, ExecutionMode, MemorySettings, Streamline, StreamlineContext};
//!
//! // Create once per process, before the graphics device
//! let streamline = Arc::new(Streamline::new(
//!     StreamlineContext::default(),
//!     MemorySettings::new().with(streamline_wgpu::SETTING_LATENCY_MODE, 1i64),
//!     ExecutionMode::Game,
//! ));
//! streamline.emit_marker(EngineMarker::InitializeVulkan);
//!
//! // Enumerate support against the adapter, then finish device setup
//! if let Some(handle) = streamline_wgpu::adapter_internal_handle(&adapter) {
//!     streamline.set_internal_parameter(handle);
//! }
//! streamline.emit_marker(EngineMarker::AfterDeviceCreation);
//!
//! // Every frame
//! streamline.emit_marker(EngineMarker::BeforeMessageLoop);
//! streamline.emit_marker(EngineMarker::BeginSimulation);
//! // ...
//! streamline.emit_marker(EngineMarker::EndPresent);
//!
//! // Teardown
//! streamline.emit_marker(EngineMarker::BeforeDeviceDestroy);
//! ```

mod capabilities;
mod context;
mod error;
mod functions;
mod initialization;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod options;
mod settings;
pub mod sl;
mod streamline;

pub use capabilities::{CapabilityKind, CapabilitySet};
pub use context::{
    DEFAULT_APPLICATION_ID, FRAME_GENERATION_COOLDOWN_FRAMES, FrameToken, InitConfig,
    InterposerSource, LatencySleep, Lifecycle, StreamlineContext, ViewportId,
};
pub use error::StreamlineError;
pub use functions::{FunctionTable, INTERPOSER_LIBRARY};
pub use initialization::{
    AdapterHandle, ExecutionMode, InternalHandle, InternalParameter, RenderApi,
    adapter_internal_handle,
};
pub use options::{
    FrameReport, LatencyMode, LatencyOptions, LatencyState, MarkerHotKey, MarkerOptions,
    PipelineMarker, UpscalingPreset,
};
pub use settings::{
    DefaultValue, MemorySettings, ProjectSettings, SETTING_DEBUG_OVERLAY, SETTING_DEFINITIONS,
    SETTING_FRAME_LIMIT_US, SETTING_LATENCY_MODE, SETTING_UPSCALING_PRESET,
    SETTING_VERBOSE_LOGGING, SettingDefinition, SettingHint, SettingValue, SettingsStore,
};
pub use streamline::{EngineMarker, ParameterKind, ParameterValue, Streamline};
