use crate::{
    capabilities::CapabilityKind,
    context::{InitConfig, LatencySleep, StreamlineContext, ViewportId},
    error::StreamlineError,
    initialization::{ExecutionMode, InternalHandle, InternalParameter, RenderApi},
    options::{
        LatencyMode, LatencyOptions, LatencyState, MarkerHotKey, MarkerOptions, PipelineMarker,
        UpscalingPreset,
    },
    settings::{ProjectSettings, SettingsStore},
};
use std::{
    ffi::c_void,
    ptr::NonNull,
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Frame loop and device lifecycle events sent by the host engine.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EngineMarker {
    InitializeVulkan,
    InitializeD3D12,
    AfterDeviceCreation,
    BeforeDeviceDestroy,
    ModifySwapchain,
    BeforeMessageLoop,
    BeginRender,
    EndRender,
    BeginSimulation,
    EndSimulation,
    BeginPresent,
    EndPresent,
    Ping,
}

impl EngineMarker {
    /// Every marker, in host numbering order.
    pub const ALL: [EngineMarker; 13] = [
        EngineMarker::InitializeVulkan,
        EngineMarker::InitializeD3D12,
        EngineMarker::AfterDeviceCreation,
        EngineMarker::BeforeDeviceDestroy,
        EngineMarker::ModifySwapchain,
        EngineMarker::BeforeMessageLoop,
        EngineMarker::BeginRender,
        EngineMarker::EndRender,
        EngineMarker::BeginSimulation,
        EngineMarker::EndSimulation,
        EngineMarker::BeginPresent,
        EngineMarker::EndPresent,
        EngineMarker::Ping,
    ];

    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    fn is_device_lifecycle(self) -> bool {
        matches!(
            self,
            EngineMarker::InitializeVulkan
                | EngineMarker::InitializeD3D12
                | EngineMarker::AfterDeviceCreation
                | EngineMarker::BeforeDeviceDestroy
        )
    }

    fn pipeline_marker(self) -> Option<PipelineMarker> {
        Some(match self {
            EngineMarker::BeginRender => PipelineMarker::RenderSubmitStart,
            EngineMarker::EndRender => PipelineMarker::RenderSubmitEnd,
            EngineMarker::BeginSimulation => PipelineMarker::SimulationStart,
            EngineMarker::EndSimulation => PipelineMarker::SimulationEnd,
            EngineMarker::BeginPresent => PipelineMarker::PresentStart,
            EngineMarker::EndPresent => PipelineMarker::PresentEnd,
            EngineMarker::Ping => PipelineMarker::Ping,
            _ => return None,
        })
    }
}

/// Values tunable through [`Streamline::set_parameter`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParameterKind {
    /// Reflex level: `<= 0` off, `(0, 1]` low latency, `> 1` with boost.
    LatencyMode,
    /// Reflex frame time cap in microseconds.
    FrameLimitUs,
    /// Single character DLSS preset code.
    UpscalingPreset,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParameterValue {
    Number(f64),
    Text(String),
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Number(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Number(value as f64)
    }
}

impl From<u32> for ParameterValue {
    fn from(value: u32) -> Self {
        ParameterValue::Number(value.into())
    }
}

impl From<char> for ParameterValue {
    fn from(value: char) -> Self {
        ParameterValue::Text(value.to_string())
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_owned())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::Text(value)
    }
}

/// Engine-facing entry point for Streamline.
///
/// Create one per process and share it with `Arc`. Every method locks the inner
/// [`StreamlineContext`], except for the Reflex sleep in [`EngineMarker::BeforeMessageLoop`],
/// which runs after the lock is released. Markers are still expected from the render thread
/// only, one frame token per loop iteration.
///
/// SDK failures are never returned to the caller. They are logged with `log::error!` and counted
/// in [`Streamline::failure_count`].
pub struct Streamline {
    context: Mutex<StreamlineContext>,
    settings: Box<dyn SettingsStore>,
    execution_mode: ExecutionMode,
    init_config: InitConfig,
    failures: AtomicUsize,
}

impl Streamline {
    pub fn new(
        context: StreamlineContext,
        settings: impl SettingsStore + 'static,
        execution_mode: ExecutionMode,
    ) -> Self {
        Self {
            context: Mutex::new(context),
            settings: Box::new(settings),
            execution_mode,
            init_config: InitConfig::default(),
            failures: AtomicUsize::new(0),
        }
    }

    pub fn with_init_config(mut self, init_config: InitConfig) -> Self {
        self.init_config = init_config;
        self
    }

    /// Locks the context, e.g. to reach the raw function table from render code.
    pub fn context(&self) -> MutexGuard<'_, StreamlineContext> {
        self.context.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.execution_mode
    }

    /// Number of SDK calls that returned a failure so far.
    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    fn report<T>(&self, result: Result<T, StreamlineError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                log::error!("Streamline: {err}");
                self.failures.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Host integer form of [`Streamline::emit_marker`]. Unknown values are ignored.
    pub fn emit_raw_marker(&self, raw: u32) {
        match EngineMarker::from_raw(raw) {
            Some(marker) => self.emit_marker(marker),
            None => log::debug!("Streamline: ignoring unknown marker {raw}"),
        }
    }

    pub fn emit_marker(&self, marker: EngineMarker) {
        let mut context = self.context();

        if marker.is_device_lifecycle() {
            self.device_lifecycle(&mut context, marker);
            return;
        }

        if !context.is_game() || !context.capabilities().latency_reduction {
            // Upscaling still needs a fresh token every iteration.
            if marker == EngineMarker::BeforeMessageLoop {
                let result = context.new_frame_token();
                self.report(result);
            }
            return;
        }

        match marker {
            EngineMarker::ModifySwapchain => {
                let result = context.disable_frame_generation();
                self.report(result);
                return;
            }
            EngineMarker::BeforeMessageLoop => {
                let sleep = self.begin_frame(&mut context);
                // Reflex blocks to pace the frame. Other callers must still reach the context.
                drop(context);
                if let Some(sleep) = sleep {
                    self.report(sleep.wait());
                }
                return;
            }
            _ => {}
        }

        if let Some(pipeline_marker) = marker.pipeline_marker() {
            let token = context.last_token();
            let result = context.emit_pipeline_marker(token, pipeline_marker);
            self.report(result);
        }
    }

    fn device_lifecycle(&self, context: &mut StreamlineContext, marker: EngineMarker) {
        match marker {
            EngineMarker::InitializeVulkan | EngineMarker::InitializeD3D12 => {
                let api = if marker == EngineMarker::InitializeD3D12 {
                    RenderApi::D3D12
                } else {
                    RenderApi::Vulkan
                };
                let settings = ProjectSettings::load(self.settings.as_ref());
                let result =
                    context.initialize(api, self.execution_mode, &settings, &self.init_config);
                self.report(result);
            }
            EngineMarker::AfterDeviceCreation => {
                context.load_functions_post_init();

                let capabilities = context.capabilities();
                if capabilities.marker_pipeline {
                    let result = context.set_marker_options(MarkerOptions {
                        virtual_key: MarkerHotKey::F13,
                        thread_id: 0,
                    });
                    self.report(result);
                }
                if capabilities.latency_reduction {
                    let result = context.set_latency_options(LatencyOptions {
                        mode: LatencyMode::Off,
                        frame_limit_us: 0,
                        virtual_key: MarkerHotKey::F13,
                        use_markers_to_optimize: false,
                        thread_id: 0,
                    });
                    self.report(result);
                }

                self.apply_project_settings(context);
            }
            EngineMarker::BeforeDeviceDestroy => {
                let result = context.shutdown();
                self.report(result);
            }
            _ => {}
        }
    }

    fn begin_frame(&self, context: &mut StreamlineContext) -> Option<LatencySleep> {
        context.tick_frame_generation_cooldown();

        if context.marker_options_dirty() {
            let options = context.marker_options();
            let result = context.set_marker_options(options);
            self.report(result);
        }
        if context.latency_options_dirty() {
            let options = context.latency_options();
            let result = context.set_latency_options(options);
            self.report(result);
        }

        let result = context.new_frame_token();
        self.report(result);

        if !context.latency_options().needs_sleep() {
            return None;
        }
        context.prepare_latency_sleep(context.last_token())
    }

    pub fn set_parameter(&self, kind: ParameterKind, value: impl Into<ParameterValue>) {
        let mut context = self.context();
        apply_parameter(&mut context, kind, value.into());
    }

    /// False until the adapter was handed over with [`Streamline::set_internal_parameter`].
    pub fn get_capability(&self, kind: CapabilityKind) -> bool {
        self.context().capabilities().get(kind)
    }

    /// Passes a backend handle in during device and adapter setup.
    pub fn set_internal_parameter(&self, handle: InternalHandle) {
        let mut context = self.context();
        match handle.adapter() {
            Some(adapter) => {
                context.refresh_capabilities(&adapter);
            }
            None => {
                if let InternalHandle::D3D12Device(device) = handle {
                    let result = context.init_device(device);
                    self.report(result);
                }
            }
        }
    }

    /// Interposer replacement for a D3D12 or DXGI creation entry point.
    pub fn get_internal_parameter(&self, parameter: InternalParameter) -> Option<NonNull<c_void>> {
        parameter.lookup(self.context().functions())
    }

    /// Re-reads the tunable values from the settings store.
    pub fn update_project_settings(&self) {
        let mut context = self.context();
        self.apply_project_settings(&mut context);
    }

    fn apply_project_settings(&self, context: &mut StreamlineContext) {
        let settings = ProjectSettings::load(self.settings.as_ref());
        apply_parameter(context, ParameterKind::LatencyMode, settings.latency_mode.into());
        apply_parameter(context, ParameterKind::FrameLimitUs, settings.frame_limit_us.into());
        apply_parameter(context, ParameterKind::UpscalingPreset, settings.upscaling_preset.into());
    }

    pub fn latency_options(&self) -> LatencyOptions {
        self.context().latency_options()
    }

    pub fn marker_options(&self) -> MarkerOptions {
        self.context().marker_options()
    }

    pub fn upscaling_preset(&self) -> Option<UpscalingPreset> {
        self.context().upscaling_preset()
    }

    pub fn frame_generation_cooldown(&self) -> u32 {
        self.context().frame_generation_cooldown()
    }

    /// Turns DLSS-G on for `viewport`. Returns whether it was enabled.
    pub fn enable_frame_generation(&self, viewport: ViewportId) -> bool {
        let result = self.context().enable_frame_generation(viewport);
        self.report(result).unwrap_or(false)
    }

    pub fn latency_state(&self) -> Option<LatencyState> {
        let result = self.context().latency_state();
        self.report(result).flatten()
    }
}

fn apply_parameter(context: &mut StreamlineContext, kind: ParameterKind, value: ParameterValue) {
    match (kind, value) {
        (ParameterKind::LatencyMode, ParameterValue::Number(level)) => {
            context.update_latency_mode(LatencyMode::from_level(level));
        }
        (ParameterKind::FrameLimitUs, ParameterValue::Number(frame_limit_us)) => {
            context.update_frame_limit(frame_limit_us as u32);
        }
        (ParameterKind::UpscalingPreset, ParameterValue::Text(preset)) => {
            let mut chars = preset.chars();
            match (chars.next(), chars.next()) {
                (Some(code), None) => {
                    context.update_upscaling_preset(code);
                }
                _ => log::debug!("Streamline: ignoring preset {preset:?}"),
            }
        }
        (kind, value) => log::debug!("Streamline: ignoring {value:?} for {kind:?}"),
    }
}
