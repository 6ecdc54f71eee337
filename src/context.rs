use crate::{
    capabilities::CapabilitySet,
    error::{StreamlineError, check_sl_result},
    functions::{FunctionTable, INTERPOSER_LIBRARY, open_interposer},
    initialization::{AdapterHandle, ExecutionMode, RenderApi},
    options::{LatencyMode, LatencyOptions, LatencyState, MarkerOptions, PipelineMarker, UpscalingPreset},
    settings::ProjectSettings,
    sl::{self, SlResult},
};
use libloading::Library;
use std::{
    ffi::{CString, c_void},
    path::PathBuf,
    ptr::{self, NonNull},
};
use uuid::Uuid;

/// Application id registered with NVIDIA for this integration.
pub const DEFAULT_APPLICATION_ID: u32 = 0x90d07004;

/// Frames during which frame generation stays off after being force-disabled.
pub const FRAME_GENERATION_COOLDOWN_FRAMES: u32 = 10;

/// Where the context gets its entry points from.
#[derive(Clone, Debug)]
pub enum InterposerSource {
    /// Open the interposer library at this path.
    Library(PathBuf),
    /// Use an already resolved table, e.g. one from an interposer loaded by the host.
    Preloaded(FunctionTable),
}

impl Default for InterposerSource {
    fn default() -> Self {
        InterposerSource::Library(PathBuf::from(INTERPOSER_LIBRARY))
    }
}

/// Identity passed to `slInit`.
#[derive(Clone, Debug)]
pub struct InitConfig {
    pub application_id: u32,
    pub project_id: Option<Uuid>,
    pub engine_version: Option<String>,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            application_id: DEFAULT_APPLICATION_ID,
            project_id: None,
            engine_version: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Lifecycle {
    /// `initialize` has not found an interposer yet.
    Uninitialized,
    /// `slInit` was resolved and called.
    Initialized,
    /// Feature entry points were looked up against the live session.
    Active,
    /// `slShutdown` ran. The context never initializes again.
    ShutDown,
}

/// Per-iteration token issued by `slGetNewFrameToken`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FrameToken(NonNull<sl::FrameToken>);

impl FrameToken {
    pub fn as_ptr(self) -> *mut sl::FrameToken {
        self.0.as_ptr()
    }
}

/// A Reflex sleep bound to a token, callable after the context lock is released.
#[derive(Clone, Copy, Debug)]
pub struct LatencySleep {
    reflex_sleep: sl::PFun_slReflexSleep,
    token: FrameToken,
}

impl LatencySleep {
    pub fn token(&self) -> FrameToken {
        self.token
    }

    /// Blocks in Reflex until the frame should start.
    pub fn wait(self) -> Result<(), StreamlineError> {
        check_sl_result("slReflexSleep", unsafe {
            (self.reflex_sleep)(self.token.as_ptr())
        })
    }
}

/// Streamline viewport id, as used by the host's DLSS-G integration.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ViewportId(pub u32);

/// Owner of the Streamline binding, capabilities and option state.
pub struct StreamlineContext {
    source: InterposerSource,
    _library: Option<Library>,
    functions: FunctionTable,
    lifecycle: Lifecycle,
    render_api: Option<RenderApi>,
    is_game: bool,
    capabilities: CapabilitySet,

    latency_options: LatencyOptions,
    latency_options_dirty: bool,
    marker_options: MarkerOptions,
    marker_options_dirty: bool,
    upscaling_preset: char,

    last_token: Option<FrameToken>,
    frame_generation_viewport: Option<ViewportId>,
    frame_generation_cooldown: u32,
}

// The SDK handles held here (tokens, entry points) may be used from any thread, one at a time.
unsafe impl Send for StreamlineContext {}

impl Default for StreamlineContext {
    fn default() -> Self {
        Self::new(InterposerSource::default())
    }
}

impl StreamlineContext {
    pub fn new(source: InterposerSource) -> Self {
        Self {
            source,
            _library: None,
            functions: FunctionTable::default(),
            lifecycle: Lifecycle::Uninitialized,
            render_api: None,
            is_game: false,
            capabilities: CapabilitySet::default(),
            latency_options: LatencyOptions::default(),
            latency_options_dirty: true,
            marker_options: MarkerOptions::default(),
            marker_options_dirty: true,
            upscaling_preset: UpscalingPreset::Default.code(),
            last_token: None,
            frame_generation_viewport: None,
            frame_generation_cooldown: 0,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_game(&self) -> bool {
        self.is_game
    }

    pub fn render_api(&self) -> Option<RenderApi> {
        self.render_api
    }

    /// Raw entry points, for host render code that tags resources or evaluates features.
    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    pub fn latency_options(&self) -> LatencyOptions {
        self.latency_options
    }

    pub fn latency_options_dirty(&self) -> bool {
        self.latency_options_dirty
    }

    pub fn marker_options(&self) -> MarkerOptions {
        self.marker_options
    }

    pub fn marker_options_dirty(&self) -> bool {
        self.marker_options_dirty
    }

    /// Stored preset code, `?` for the DLSS default.
    pub fn upscaling_preset_code(&self) -> char {
        self.upscaling_preset
    }

    pub fn upscaling_preset(&self) -> Option<UpscalingPreset> {
        UpscalingPreset::from_code(self.upscaling_preset)
    }

    pub fn last_token(&self) -> Option<FrameToken> {
        self.last_token
    }

    pub fn frame_generation_viewport(&self) -> Option<ViewportId> {
        self.frame_generation_viewport
    }

    pub fn frame_generation_cooldown(&self) -> u32 {
        self.frame_generation_cooldown
    }

    fn game_only(&self, operation: &str) -> bool {
        if !self.is_game {
            log::trace!("Streamline: {operation} suppressed outside of a game");
        }
        self.is_game
    }

    fn session_live(&self, operation: &str) -> bool {
        let live = self.lifecycle != Lifecycle::ShutDown;
        if !live {
            log::trace!("Streamline: {operation} after shutdown ignored");
        }
        live
    }

    /// Resolves the base entry points. A missing interposer leaves every entry null.
    pub fn load_functions(&mut self, api: RenderApi) {
        match &self.source {
            InterposerSource::Library(path) => match open_interposer(path) {
                Ok(library) => {
                    // SAFETY: the library was opened as the Streamline interposer.
                    self.functions = unsafe { FunctionTable::resolve_base(&library, api) };
                    self._library = Some(library);
                    log::info!("Streamline: loaded {}", path.display());
                }
                Err(err) => {
                    log::info!("Streamline: {} not loaded: {err}", path.display());
                }
            },
            InterposerSource::Preloaded(table) => {
                self.functions = table.base_entries(api);
            }
        }
    }

    /// Looks up the per-feature entry points. Only meaningful after `slInit` succeeded.
    pub fn load_functions_post_init(&mut self) {
        if self.functions.resolve_feature_entries() && self.lifecycle == Lifecycle::Initialized {
            self.lifecycle = Lifecycle::Active;
        }
    }

    /// Queries support of every feature for `adapter`. All false if the interposer is missing.
    pub fn enumerate_support(&self, adapter: &AdapterHandle) -> CapabilitySet {
        let Some(is_feature_supported) = self.functions.is_feature_supported else {
            return CapabilitySet::default();
        };

        adapter.with_adapter_info(|info| {
            let supported = |feature| unsafe { is_feature_supported(feature, info) }.is_ok();
            CapabilitySet {
                upscaling: supported(sl::kFeatureDLSS),
                frame_generation: supported(sl::kFeatureDLSS_G),
                latency_reduction: supported(sl::kFeatureReflex),
                marker_pipeline: supported(sl::kFeaturePCL),
                sharpening: supported(sl::kFeatureNIS),
            }
        })
    }

    /// Enumerates support for `adapter` and keeps the result.
    pub fn refresh_capabilities(&mut self, adapter: &AdapterHandle) -> CapabilitySet {
        self.capabilities = self.enumerate_support(adapter);
        log::info!("Streamline: capabilities {:?}", self.capabilities);
        self.capabilities
    }

    /// Hands the created `ID3D12Device` to the SDK.
    pub fn init_device(&self, d3d12_device: NonNull<c_void>) -> Result<(), StreamlineError> {
        let Some(set_d3d_device) = self.functions.set_d3d_device else {
            return Ok(());
        };
        check_sl_result("slSetD3DDevice", unsafe {
            set_d3d_device(d3d12_device.as_ptr())
        })
    }

    pub fn set_latency_options(&mut self, options: LatencyOptions) -> Result<(), StreamlineError> {
        if !self.game_only("slReflexSetOptions") || !self.session_live("slReflexSetOptions") {
            return Ok(());
        }

        self.latency_options = options;
        self.latency_options_dirty = false;
        let raw = options.to_sl();
        let result = self
            .functions
            .reflex_set_options
            .map_or(SlResult::OK, |f| unsafe { f(&raw) });
        check_sl_result("slReflexSetOptions", result)
    }

    pub fn set_marker_options(&mut self, options: MarkerOptions) -> Result<(), StreamlineError> {
        if !self.game_only("slPCLSetOptions") || !self.session_live("slPCLSetOptions") {
            return Ok(());
        }

        self.marker_options = options;
        self.marker_options_dirty = false;
        let raw = options.to_sl();
        let result = self
            .functions
            .pcl_set_options
            .map_or(SlResult::OK, |f| unsafe { f(&raw) });
        check_sl_result("slPCLSetOptions", result)
    }

    pub fn emit_pipeline_marker(
        &self,
        token: Option<FrameToken>,
        marker: PipelineMarker,
    ) -> Result<(), StreamlineError> {
        if !self.game_only("slPCLSetMarker") || !self.session_live("slPCLSetMarker") {
            return Ok(());
        }
        let Some(token) = token else {
            return Ok(());
        };

        log::trace!("Streamline: marker {marker:?}");
        let result = self
            .functions
            .pcl_set_marker
            .map_or(SlResult::OK, |f| unsafe { f(marker.as_sl(), token.as_ptr()) });
        check_sl_result("slPCLSetMarker", result)
    }

    /// Blocks in Reflex until the frame should start.
    pub fn sleep_for_latency(&self, token: Option<FrameToken>) -> Result<(), StreamlineError> {
        self.prepare_latency_sleep(token)
            .map_or(Ok(()), LatencySleep::wait)
    }

    /// The Reflex sleep for `token`, or `None` when there is nothing to wait on.
    pub fn prepare_latency_sleep(&self, token: Option<FrameToken>) -> Option<LatencySleep> {
        if !self.game_only("slReflexSleep") || !self.session_live("slReflexSleep") {
            return None;
        }
        Some(LatencySleep {
            reflex_sleep: self.functions.reflex_sleep?,
            token: token?,
        })
    }

    /// Reflex telemetry. `None` outside of a game or without Reflex.
    pub fn latency_state(&self) -> Result<Option<LatencyState>, StreamlineError> {
        if !self.game_only("slReflexGetState") {
            return Ok(None);
        }
        let Some(reflex_get_state) = self.functions.reflex_get_state else {
            return Ok(None);
        };

        let mut raw = sl::ReflexState::default();
        check_sl_result("slReflexGetState", unsafe { reflex_get_state(&mut raw) })?;
        Ok(Some(LatencyState::from(&raw)))
    }

    /// Requests the token for the next iteration, replacing the held one.
    ///
    /// On failure the previous token is kept.
    pub fn new_frame_token(&mut self) -> Result<Option<FrameToken>, StreamlineError> {
        if !self.session_live("slGetNewFrameToken") {
            return Ok(None);
        }
        let Some(get_new_frame_token) = self.functions.get_new_frame_token else {
            return Ok(self.last_token);
        };

        let mut token = self.last_token.map_or(ptr::null_mut(), FrameToken::as_ptr);
        check_sl_result("slGetNewFrameToken", unsafe {
            get_new_frame_token(&mut token, ptr::null())
        })?;
        self.last_token = NonNull::new(token).map(FrameToken);
        Ok(self.last_token)
    }

    /// Turns DLSS-G off on the bound viewport and keeps it off for a few frames.
    pub fn disable_frame_generation(&mut self) -> Result<(), StreamlineError> {
        if !self.game_only("DLSS-G disable") {
            return Ok(());
        }

        self.frame_generation_cooldown = FRAME_GENERATION_COOLDOWN_FRAMES;
        if !self.session_live("DLSS-G disable") {
            return Ok(());
        }

        let (Some(dlssg_set_options), Some(viewport)) =
            (self.functions.dlssg_set_options, self.frame_generation_viewport)
        else {
            return Ok(());
        };

        log::warn!("Streamline: force disabling DLSS-G on viewport {}", viewport.0);
        self.frame_generation_viewport = None;

        let handle = sl::ViewportHandle::new(viewport.0);
        let options = sl::DLSSGOptions {
            mode: sl::DLSSGMode::OFF,
            ..sl::DLSSGOptions::default()
        };
        check_sl_result("slDLSSGSetOptions", unsafe {
            dlssg_set_options(&handle, &options)
        })
    }

    /// Turns DLSS-G on for `viewport` and binds it.
    ///
    /// Returns `Ok(false)` while the cooldown runs, outside of a game, or when DLSS-G is not
    /// available.
    pub fn enable_frame_generation(&mut self, viewport: ViewportId) -> Result<bool, StreamlineError> {
        if !self.game_only("DLSS-G enable") || !self.session_live("DLSS-G enable") {
            return Ok(false);
        }
        if self.frame_generation_cooldown > 0 {
            log::debug!(
                "Streamline: DLSS-G stays off for {} more frames",
                self.frame_generation_cooldown
            );
            return Ok(false);
        }
        let Some(dlssg_set_options) = self.functions.dlssg_set_options else {
            return Ok(false);
        };
        if !self.capabilities.frame_generation {
            return Ok(false);
        }

        let handle = sl::ViewportHandle::new(viewport.0);
        let options = sl::DLSSGOptions {
            mode: sl::DLSSGMode::ON,
            ..sl::DLSSGOptions::default()
        };
        check_sl_result("slDLSSGSetOptions", unsafe {
            dlssg_set_options(&handle, &options)
        })?;
        self.frame_generation_viewport = Some(viewport);
        Ok(true)
    }

    pub fn tick_frame_generation_cooldown(&mut self) {
        self.frame_generation_cooldown = self.frame_generation_cooldown.saturating_sub(1);
    }

    /// Loads the interposer and calls `slInit`. Does nothing once an interposer was found.
    pub fn initialize(
        &mut self,
        api: RenderApi,
        mode: ExecutionMode,
        settings: &ProjectSettings,
        config: &InitConfig,
    ) -> Result<(), StreamlineError> {
        if self.lifecycle != Lifecycle::Uninitialized {
            return Ok(());
        }

        self.is_game = mode.is_game();
        self.render_api = Some(api);

        self.load_functions(api);
        let Some(init) = self.functions.init else {
            log::info!("Streamline: could not find slInit. Is the interposer installed?");
            return Ok(());
        };
        self.lifecycle = Lifecycle::Initialized;

        let features = self.features_to_load(settings);
        let project_id = config
            .project_id
            .and_then(|id| CString::new(id.hyphenated().to_string()).ok());
        let engine_version = config
            .engine_version
            .as_deref()
            .and_then(|version| CString::new(version).ok());

        let (log_level, show_console) = if settings.verbose_logging {
            (sl::LogLevel::VERBOSE, true)
        } else {
            (sl::LogLevel::OFF, false)
        };

        let preferences = sl::Preferences {
            show_console,
            log_level,
            flags: sl::PreferenceFlags::ALLOW_OTA
                | sl::PreferenceFlags::LOAD_DOWNLOADED_PLUGINS
                | sl::PreferenceFlags::DISABLE_CL_STATE_TRACKING,
            features_to_load: features.as_ptr(),
            num_features_to_load: features.len() as u32,
            application_id: config.application_id,
            engine_version: engine_version.as_ref().map_or(ptr::null(), |v| v.as_ptr()),
            project_id: project_id.as_ref().map_or(ptr::null(), |id| id.as_ptr()),
            render_api: api.as_sl(),
            ..sl::Preferences::default()
        };

        log::info!(
            "Streamline: initializing for {api:?} (game: {}, features: {features:?})",
            self.is_game
        );
        check_sl_result("slInit", unsafe { init(&preferences, sl::kSDKVersion) })
    }

    fn features_to_load(&self, settings: &ProjectSettings) -> Vec<sl::Feature> {
        let mut features = Vec::with_capacity(6);
        if self.is_game {
            features.push(sl::kFeaturePCL);
            features.push(sl::kFeatureReflex);
            features.push(sl::kFeatureDLSS_G);
            if settings.debug_overlay {
                features.push(sl::kFeatureImGUI);
            }
        }
        features.push(sl::kFeatureDLSS);
        features.push(sl::kFeatureNIS);
        features
    }

    /// Calls `slShutdown` once. The init entry is cleared so the session is never reused, and
    /// the held token is dropped so no frame call reaches the SDK afterwards.
    pub fn shutdown(&mut self) -> Result<(), StreamlineError> {
        let Some(shutdown) = self.functions.shutdown.take() else {
            return Ok(());
        };
        self.functions.init = None;
        self.lifecycle = Lifecycle::ShutDown;
        self.last_token = None;
        log::info!("Streamline: shutting down");
        check_sl_result("slShutdown", unsafe { shutdown() })
    }

    /// Returns whether the mode changed, which marks the latency options dirty.
    pub fn update_latency_mode(&mut self, mode: LatencyMode) -> bool {
        let changed = self.latency_options.mode != mode;
        self.latency_options.mode = mode;
        self.latency_options_dirty |= changed;
        changed
    }

    pub fn update_frame_limit(&mut self, frame_limit_us: u32) -> bool {
        let changed = self.latency_options.frame_limit_us != frame_limit_us;
        self.latency_options.frame_limit_us = frame_limit_us;
        self.latency_options_dirty |= changed;
        changed
    }

    pub fn update_upscaling_preset(&mut self, code: char) -> bool {
        let changed = self.upscaling_preset != code;
        self.upscaling_preset = code;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{self, MockCall, MockConfig, MockEntry};
    use ash::vk::{self, Handle};

    fn adapter() -> AdapterHandle {
        AdapterHandle::Vulkan(vk::PhysicalDevice::from_raw(0x1000))
    }

    fn initialized(config: MockConfig, mode: ExecutionMode) -> StreamlineContext {
        let table = mock::install(config);
        let mut context = StreamlineContext::new(InterposerSource::Preloaded(table));
        context
            .initialize(
                RenderApi::Vulkan,
                mode,
                &ProjectSettings::default(),
                &InitConfig::default(),
            )
            .unwrap();
        context.load_functions_post_init();
        context.refresh_capabilities(&adapter());
        mock::take_calls();
        context
    }

    fn init_call(calls: &[MockCall]) -> MockCall {
        calls
            .iter()
            .find(|call| matches!(call, MockCall::Init { .. }))
            .cloned()
            .unwrap()
    }

    #[test]
    fn game_requests_latency_features() {
        let table = mock::install(MockConfig::supported());
        let mut context = StreamlineContext::new(InterposerSource::Preloaded(table));
        context
            .initialize(
                RenderApi::D3D12,
                ExecutionMode::Game,
                &ProjectSettings::default(),
                &InitConfig::default(),
            )
            .unwrap();

        assert_eq!(context.lifecycle(), Lifecycle::Initialized);
        assert!(context.is_game());
        let MockCall::Init {
            features,
            render_api,
            log_level,
            show_console,
            flags,
            application_id,
            project_id,
            sdk_version,
        } = init_call(&mock::calls())
        else {
            unreachable!()
        };
        assert_eq!(
            features,
            [
                sl::kFeaturePCL,
                sl::kFeatureReflex,
                sl::kFeatureDLSS_G,
                sl::kFeatureDLSS,
                sl::kFeatureNIS
            ]
        );
        assert_eq!(render_api, sl::RenderAPI::D3D12);
        assert_eq!(log_level, sl::LogLevel::OFF);
        assert!(!show_console);
        assert!(flags.contains(sl::PreferenceFlags::ALLOW_OTA));
        assert!(flags.contains(sl::PreferenceFlags::LOAD_DOWNLOADED_PLUGINS));
        assert!(flags.contains(sl::PreferenceFlags::DISABLE_CL_STATE_TRACKING));
        assert_eq!(application_id, DEFAULT_APPLICATION_ID);
        assert_eq!(project_id, None);
        assert_eq!(sdk_version, sl::kSDKVersion);
    }

    #[test]
    fn editor_only_requests_upscaling_features() {
        let table = mock::install(MockConfig::supported());
        let mut context = StreamlineContext::new(InterposerSource::Preloaded(table));
        let settings = ProjectSettings {
            debug_overlay: true,
            ..ProjectSettings::default()
        };
        context
            .initialize(
                RenderApi::Vulkan,
                ExecutionMode::Editor,
                &settings,
                &InitConfig::default(),
            )
            .unwrap();

        let MockCall::Init { features, .. } = init_call(&mock::calls()) else {
            unreachable!()
        };
        assert_eq!(features, [sl::kFeatureDLSS, sl::kFeatureNIS]);
    }

    #[test]
    fn overlay_and_verbose_logging_follow_settings() {
        let table = mock::install(MockConfig::supported());
        let mut context = StreamlineContext::new(InterposerSource::Preloaded(table));
        let settings = ProjectSettings {
            verbose_logging: true,
            debug_overlay: true,
            ..ProjectSettings::default()
        };
        let project_id = Uuid::from_u128(0x1234_5678_9abc_def0_1234_5678_9abc_def0);
        let config = InitConfig {
            project_id: Some(project_id),
            ..InitConfig::default()
        };
        context
            .initialize(RenderApi::Vulkan, ExecutionMode::Game, &settings, &config)
            .unwrap();

        let MockCall::Init {
            features,
            log_level,
            show_console,
            project_id: sent_id,
            ..
        } = init_call(&mock::calls())
        else {
            unreachable!()
        };
        assert!(features.contains(&sl::kFeatureImGUI));
        assert_eq!(log_level, sl::LogLevel::VERBOSE);
        assert!(show_console);
        assert_eq!(sent_id, Some(project_id.hyphenated().to_string()));
    }

    #[test]
    fn initialize_runs_once() {
        let mut context = initialized(MockConfig::supported(), ExecutionMode::Game);
        context
            .initialize(
                RenderApi::D3D12,
                ExecutionMode::Editor,
                &ProjectSettings::default(),
                &InitConfig::default(),
            )
            .unwrap();

        assert!(mock::calls().is_empty());
        assert!(context.is_game());
        assert_eq!(context.render_api(), Some(RenderApi::Vulkan));
        assert_eq!(context.lifecycle(), Lifecycle::Active);
    }

    #[test]
    fn init_failure_is_reported() {
        let table = mock::install(MockConfig {
            failing: vec![(MockEntry::Init, SlResult::ERROR_NO_PLUGINS)],
            ..MockConfig::default()
        });
        let mut context = StreamlineContext::new(InterposerSource::Preloaded(table));
        let err = context
            .initialize(
                RenderApi::Vulkan,
                ExecutionMode::Game,
                &ProjectSettings::default(),
                &InitConfig::default(),
            )
            .unwrap_err();

        assert_eq!(err.result(), SlResult::ERROR_NO_PLUGINS);
        assert_eq!(context.lifecycle(), Lifecycle::Initialized);
    }

    #[test]
    fn missing_interposer_degrades_to_no_ops() {
        let mut context = StreamlineContext::new(InterposerSource::Library(PathBuf::from(
            "no-such-dir/sl.interposer.dll",
        )));
        context
            .initialize(
                RenderApi::Vulkan,
                ExecutionMode::Game,
                &ProjectSettings::default(),
                &InitConfig::default(),
            )
            .unwrap();
        context.load_functions_post_init();

        assert_eq!(context.lifecycle(), Lifecycle::Uninitialized);
        assert_eq!(context.enumerate_support(&adapter()), CapabilitySet::default());
        assert_eq!(context.new_frame_token(), Ok(None));
        assert_eq!(context.set_latency_options(LatencyOptions::default()), Ok(()));
        assert_eq!(context.latency_state(), Ok(None));
        assert_eq!(context.enable_frame_generation(ViewportId(0)), Ok(false));
        assert_eq!(context.shutdown(), Ok(()));
    }

    #[test]
    fn every_supported_feature_is_reported() {
        let context = initialized(MockConfig::supported(), ExecutionMode::Game);
        assert_eq!(
            context.enumerate_support(&adapter()),
            CapabilitySet {
                upscaling: true,
                frame_generation: true,
                sharpening: true,
                latency_reduction: true,
                marker_pipeline: true,
            }
        );
    }

    #[test]
    fn unsupported_features_are_reported_false() {
        let context = initialized(
            MockConfig {
                unsupported: vec![sl::kFeatureDLSS_G, sl::kFeaturePCL],
                ..MockConfig::default()
            },
            ExecutionMode::Game,
        );
        let capabilities = context.capabilities();
        assert!(capabilities.upscaling);
        assert!(!capabilities.frame_generation);
        assert!(!capabilities.marker_pipeline);
        assert!(capabilities.latency_reduction);
    }

    #[test]
    fn missing_support_query_reports_nothing() {
        let context = initialized(
            MockConfig {
                absent: vec![MockEntry::IsFeatureSupported],
                ..MockConfig::default()
            },
            ExecutionMode::Game,
        );
        assert_eq!(context.enumerate_support(&adapter()), CapabilitySet::default());
        assert!(mock::calls().is_empty());
    }

    #[test]
    fn options_are_suppressed_outside_of_a_game() {
        let mut context = initialized(MockConfig::supported(), ExecutionMode::Editor);
        let options = LatencyOptions {
            mode: LatencyMode::LowLatency,
            ..LatencyOptions::default()
        };

        assert_eq!(context.set_latency_options(options), Ok(()));
        assert_eq!(context.set_marker_options(MarkerOptions::default()), Ok(()));
        assert!(context.latency_options_dirty());
        assert!(context.marker_options_dirty());
        assert_eq!(context.latency_options().mode, LatencyMode::Off);
        assert!(mock::calls().is_empty());
    }

    #[test]
    fn pushing_options_clears_dirty_even_on_failure() {
        let mut context = initialized(
            MockConfig {
                failing: vec![(MockEntry::ReflexSetOptions, SlResult::ERROR_REFLEX_API)],
                ..MockConfig::default()
            },
            ExecutionMode::Game,
        );
        let options = LatencyOptions {
            mode: LatencyMode::LowLatencyWithBoost,
            frame_limit_us: 5000,
            ..LatencyOptions::default()
        };

        let err = context.set_latency_options(options).unwrap_err();
        assert_eq!(err.result(), SlResult::ERROR_REFLEX_API);
        assert!(!context.latency_options_dirty());
        assert_eq!(context.latency_options(), options);
        assert_eq!(
            mock::calls(),
            [MockCall::ReflexSetOptions {
                mode: sl::ReflexMode::LOW_LATENCY_WITH_BOOST,
                frame_limit_us: 5000,
            }]
        );
    }

    #[test]
    fn frame_tokens_replace_each_other() {
        let mut context = initialized(MockConfig::supported(), ExecutionMode::Editor);

        let first = context.new_frame_token().unwrap().unwrap();
        let second = context.new_frame_token().unwrap().unwrap();

        assert_ne!(first, second);
        assert_eq!(context.last_token(), Some(second));
        assert_eq!(
            mock::calls(),
            [
                MockCall::GetNewFrameToken {
                    previous: None,
                    issued: mock::token_address(0),
                },
                MockCall::GetNewFrameToken {
                    previous: Some(mock::token_address(0)),
                    issued: mock::token_address(1),
                },
            ]
        );
    }

    #[test]
    fn failed_token_request_keeps_the_previous_token() {
        let mut context = initialized(
            MockConfig {
                failing: vec![(MockEntry::GetNewFrameToken, SlResult::ERROR_NOT_INITIALIZED)],
                ..MockConfig::default()
            },
            ExecutionMode::Game,
        );
        assert!(context.new_frame_token().is_err());
        assert_eq!(context.last_token(), None);
    }

    #[test]
    fn markers_and_sleep_need_a_token() {
        let mut context = initialized(MockConfig::supported(), ExecutionMode::Game);
        assert_eq!(context.emit_pipeline_marker(None, PipelineMarker::Ping), Ok(()));
        assert_eq!(context.sleep_for_latency(None), Ok(()));
        assert!(mock::calls().is_empty());

        let token = context.new_frame_token().unwrap();
        context
            .emit_pipeline_marker(token, PipelineMarker::PresentStart)
            .unwrap();
        context.sleep_for_latency(token).unwrap();
        assert_eq!(
            mock::take_calls()[1..],
            [
                MockCall::PclSetMarker {
                    marker: sl::PCLMarker::PRESENT_START,
                    token: mock::token_address(0),
                },
                MockCall::ReflexSleep(mock::token_address(0)),
            ]
        );
    }

    #[test]
    fn disabling_frame_generation_clears_the_binding() {
        let mut context = initialized(MockConfig::supported(), ExecutionMode::Game);
        assert_eq!(context.enable_frame_generation(ViewportId(3)), Ok(true));
        assert_eq!(context.frame_generation_viewport(), Some(ViewportId(3)));
        mock::take_calls();

        context.disable_frame_generation().unwrap();
        assert_eq!(context.frame_generation_viewport(), None);
        assert_eq!(context.frame_generation_cooldown(), FRAME_GENERATION_COOLDOWN_FRAMES);
        assert_eq!(
            mock::take_calls(),
            [MockCall::DlssgSetOptions {
                viewport: 3,
                mode: sl::DLSSGMode::OFF,
            }]
        );

        context.disable_frame_generation().unwrap();
        assert!(mock::calls().is_empty());
        assert_eq!(context.frame_generation_cooldown(), FRAME_GENERATION_COOLDOWN_FRAMES);
    }

    #[test]
    fn frame_generation_waits_for_the_cooldown() {
        let mut context = initialized(MockConfig::supported(), ExecutionMode::Game);
        context.disable_frame_generation().unwrap();

        for _ in 1..FRAME_GENERATION_COOLDOWN_FRAMES {
            context.tick_frame_generation_cooldown();
            assert_eq!(context.enable_frame_generation(ViewportId(1)), Ok(false));
        }
        context.tick_frame_generation_cooldown();
        context.tick_frame_generation_cooldown();
        assert_eq!(context.frame_generation_cooldown(), 0);
        assert_eq!(context.enable_frame_generation(ViewportId(1)), Ok(true));
    }

    #[test]
    fn frame_generation_is_game_only() {
        let mut context = initialized(MockConfig::supported(), ExecutionMode::Editor);
        assert_eq!(context.enable_frame_generation(ViewportId(1)), Ok(false));
        context.disable_frame_generation().unwrap();
        assert_eq!(context.frame_generation_cooldown(), 0);
        assert!(mock::calls().is_empty());
    }

    #[test]
    fn shutdown_tombstones_the_session() {
        let mut context = initialized(MockConfig::supported(), ExecutionMode::Game);
        context.shutdown().unwrap();

        assert_eq!(mock::take_calls(), [MockCall::Shutdown]);
        assert_eq!(context.lifecycle(), Lifecycle::ShutDown);
        assert!(context.functions().init.is_none());
        assert!(context.functions().shutdown.is_none());

        context.shutdown().unwrap();
        context
            .initialize(
                RenderApi::Vulkan,
                ExecutionMode::Game,
                &ProjectSettings::default(),
                &InitConfig::default(),
            )
            .unwrap();
        assert!(mock::calls().is_empty());
        assert_eq!(context.lifecycle(), Lifecycle::ShutDown);
    }

    #[test]
    fn frame_calls_after_shutdown_do_not_reach_the_sdk() {
        let mut context = initialized(MockConfig::supported(), ExecutionMode::Game);
        let token = context.new_frame_token().unwrap();
        assert!(token.is_some());
        context.shutdown().unwrap();
        mock::take_calls();

        assert_eq!(context.last_token(), None);
        assert_eq!(context.new_frame_token(), Ok(None));
        assert!(context.prepare_latency_sleep(token).is_none());
        assert_eq!(context.sleep_for_latency(token), Ok(()));
        assert_eq!(context.emit_pipeline_marker(token, PipelineMarker::RenderSubmitStart), Ok(()));
        assert_eq!(context.set_latency_options(LatencyOptions::default()), Ok(()));
        assert_eq!(context.set_marker_options(MarkerOptions::default()), Ok(()));
        assert_eq!(context.enable_frame_generation(ViewportId(1)), Ok(false));
        assert!(mock::calls().is_empty());
    }

    #[test]
    fn device_push_propagates_failures() {
        let device = NonNull::new(0xd3d0usize as *mut c_void).unwrap();

        let context = initialized(MockConfig::supported(), ExecutionMode::Game);
        assert_eq!(context.init_device(device), Ok(()));
        assert_eq!(mock::take_calls(), [MockCall::SetD3DDevice(0xd3d0)]);

        let context = initialized(
            MockConfig {
                failing: vec![(MockEntry::SetD3DDevice, SlResult::ERROR_D3D_API)],
                ..MockConfig::default()
            },
            ExecutionMode::Game,
        );
        assert_eq!(
            context.init_device(device).unwrap_err().result(),
            SlResult::ERROR_D3D_API
        );

        let context = initialized(
            MockConfig {
                absent: vec![MockEntry::SetD3DDevice],
                ..MockConfig::default()
            },
            ExecutionMode::Game,
        );
        assert_eq!(context.init_device(device), Ok(()));
    }

    #[test]
    fn latency_state_passes_through() {
        let context = initialized(MockConfig::supported(), ExecutionMode::Game);
        let state = context.latency_state().unwrap().unwrap();
        assert!(state.low_latency_available);
        assert_eq!(state.frame_reports.len(), 1);
        assert_eq!(state.frame_reports[0].pc_latency_us(), 4_000);

        let context = initialized(MockConfig::supported(), ExecutionMode::ProjectManager);
        assert_eq!(context.latency_state(), Ok(None));
    }

    #[test]
    fn mutators_report_changes() {
        let mut context = initialized(MockConfig::supported(), ExecutionMode::Game);
        context.set_latency_options(LatencyOptions::default()).unwrap();
        assert!(!context.latency_options_dirty());

        assert!(!context.update_latency_mode(LatencyMode::Off));
        assert!(!context.latency_options_dirty());
        assert!(context.update_frame_limit(5000));
        assert!(context.latency_options_dirty());

        assert!(context.update_upscaling_preset('K'));
        assert_eq!(context.upscaling_preset(), Some(UpscalingPreset::K));
        assert!(!context.update_upscaling_preset('K'));
    }
}
