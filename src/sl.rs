//! Hand-declared subset of the Streamline ABI (`sl.h`, `sl_consts.h`, `sl_dlss_g.h`,
//! `sl_pcl.h`, `sl_reflex.h`).
//!
//! Only the entry points and structures this crate calls are declared. Enumerations that
//! cross the boundary as return values are transparent newtypes, so unknown values coming
//! back from the SDK are representable.
#![allow(dead_code)]
#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]

use std::ffi::{c_char, c_void};
use std::ptr;

pub type Feature = u32;

pub const kFeatureDLSS: Feature = 0;
pub const kFeatureNRD: Feature = 1;
pub const kFeatureNIS: Feature = 2;
pub const kFeatureReflex: Feature = 3;
pub const kFeaturePCL: Feature = 4;
pub const kFeatureDLSS_G: Feature = 1000;
pub const kFeatureImGUI: Feature = 9999;

const SDK_VERSION_MAGIC: u64 = 0xfedc;
const SDK_VERSION_MAJOR: u64 = 2;
const SDK_VERSION_MINOR: u64 = 7;
const SDK_VERSION_PATCH: u64 = 2;

pub const kSDKVersion: u64 = (SDK_VERSION_MAJOR << 48)
    | (SDK_VERSION_MINOR << 32)
    | (SDK_VERSION_PATCH << 16)
    | SDK_VERSION_MAGIC;

pub const kStructVersion1: usize = 1;

/// `sl::Result`.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SlResult(pub i32);

impl SlResult {
    pub const OK: Self = Self(0);
    pub const ERROR_IO: Self = Self(1);
    pub const ERROR_DRIVER_OUT_OF_DATE: Self = Self(2);
    pub const ERROR_OS_OUT_OF_DATE: Self = Self(3);
    pub const ERROR_OS_DISABLED_HWS: Self = Self(4);
    pub const ERROR_DEVICE_NOT_CREATED: Self = Self(5);
    pub const ERROR_NO_SUPPORTED_ADAPTER_FOUND: Self = Self(6);
    pub const ERROR_ADAPTER_NOT_SUPPORTED: Self = Self(7);
    pub const ERROR_NO_PLUGINS: Self = Self(8);
    pub const ERROR_VULKAN_API: Self = Self(9);
    pub const ERROR_DXGI_API: Self = Self(10);
    pub const ERROR_D3D_API: Self = Self(11);
    pub const ERROR_NRD_API: Self = Self(12);
    pub const ERROR_NVAPI: Self = Self(13);
    pub const ERROR_REFLEX_API: Self = Self(14);
    pub const ERROR_NGX_FAILED: Self = Self(15);
    pub const ERROR_JSON_PARSING: Self = Self(16);
    pub const ERROR_MISSING_PROXY: Self = Self(17);
    pub const ERROR_MISSING_RESOURCE_STATE: Self = Self(18);
    pub const ERROR_INVALID_INTEGRATION: Self = Self(19);
    pub const ERROR_MISSING_INPUT_PARAMETER: Self = Self(20);
    pub const ERROR_NOT_INITIALIZED: Self = Self(21);
    pub const ERROR_COMPUTE_FAILED: Self = Self(22);
    pub const ERROR_INIT_NOT_CALLED: Self = Self(23);
    pub const ERROR_EXCEPTION_HANDLER: Self = Self(24);
    pub const ERROR_INVALID_PARAMETER: Self = Self(25);
    pub const ERROR_MISSING_CONSTANTS: Self = Self(26);
    pub const ERROR_DUPLICATED_CONSTANTS: Self = Self(27);
    pub const ERROR_MISSING_OR_INVALID_API: Self = Self(28);
    pub const ERROR_COMMON_CONSTANTS_MISSING: Self = Self(29);
    pub const ERROR_UNSUPPORTED_INTERFACE: Self = Self(30);
    pub const ERROR_FEATURE_MISSING: Self = Self(31);
    pub const ERROR_FEATURE_NOT_SUPPORTED: Self = Self(32);
    pub const ERROR_FEATURE_MISSING_HOOKS: Self = Self(33);
    pub const ERROR_FEATURE_FAILED_TO_LOAD: Self = Self(34);
    pub const ERROR_FEATURE_WRONG_PRIORITY: Self = Self(35);
    pub const ERROR_FEATURE_MISSING_DEPENDENCY: Self = Self(36);
    pub const ERROR_FEATURE_MANAGER_INVALID_STATE: Self = Self(37);
    pub const ERROR_INVALID_STATE: Self = Self(38);
    pub const WARN_OUT_OF_VRAM: Self = Self(39);

    pub fn is_ok(self) -> bool {
        self == Self::OK
    }

    /// Stable diagnostic name of the result code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OK => "sl::eOk",
            Self::ERROR_IO => "sl::eErrorIO",
            Self::ERROR_DRIVER_OUT_OF_DATE => "sl::eErrorDriverOutOfDate",
            Self::ERROR_OS_OUT_OF_DATE => "sl::eErrorOSOutOfDate",
            Self::ERROR_OS_DISABLED_HWS => "sl::eErrorOSDisabledHWS",
            Self::ERROR_DEVICE_NOT_CREATED => "sl::eErrorDeviceNotCreated",
            Self::ERROR_NO_SUPPORTED_ADAPTER_FOUND => "sl::eErrorNoSupportedAdapterFound",
            Self::ERROR_ADAPTER_NOT_SUPPORTED => "sl::eErrorAdapterNotSupported",
            Self::ERROR_NO_PLUGINS => "sl::eErrorNoPlugins",
            Self::ERROR_VULKAN_API => "sl::eErrorVulkanAPI",
            Self::ERROR_DXGI_API => "sl::eErrorDXGIAPI",
            Self::ERROR_D3D_API => "sl::eErrorD3DAPI",
            Self::ERROR_NRD_API => "sl::eErrorNRDAPI",
            Self::ERROR_NVAPI => "sl::eErrorNVAPI",
            Self::ERROR_REFLEX_API => "sl::eErrorReflexAPI",
            Self::ERROR_NGX_FAILED => "sl::eErrorNGXFailed",
            Self::ERROR_JSON_PARSING => "sl::eErrorJSONParsing",
            Self::ERROR_MISSING_PROXY => "sl::eErrorMissingProxy",
            Self::ERROR_MISSING_RESOURCE_STATE => "sl::eErrorMissingResourceState",
            Self::ERROR_INVALID_INTEGRATION => "sl::eErrorInvalidIntegration",
            Self::ERROR_MISSING_INPUT_PARAMETER => "sl::eErrorMissingInputParameter",
            Self::ERROR_NOT_INITIALIZED => "sl::eErrorNotInitialized",
            Self::ERROR_COMPUTE_FAILED => "sl::eErrorComputeFailed",
            Self::ERROR_INIT_NOT_CALLED => "sl::eErrorInitNotCalled",
            Self::ERROR_EXCEPTION_HANDLER => "sl::eErrorExceptionHandler",
            Self::ERROR_INVALID_PARAMETER => "sl::eErrorInvalidParameter",
            Self::ERROR_MISSING_CONSTANTS => "sl::eErrorMissingConstants",
            Self::ERROR_DUPLICATED_CONSTANTS => "sl::eErrorDuplicatedConstants",
            Self::ERROR_MISSING_OR_INVALID_API => "sl::eErrorMissingOrInvalidAPI",
            Self::ERROR_COMMON_CONSTANTS_MISSING => "sl::eErrorCommonConstantsMissing",
            Self::ERROR_UNSUPPORTED_INTERFACE => "sl::eErrorUnsupportedInterface",
            Self::ERROR_FEATURE_MISSING => "sl::eErrorFeatureMissing",
            Self::ERROR_FEATURE_NOT_SUPPORTED => "sl::eErrorFeatureNotSupported",
            Self::ERROR_FEATURE_MISSING_HOOKS => "sl::eErrorFeatureMissingHooks",
            Self::ERROR_FEATURE_FAILED_TO_LOAD => "sl::eErrorFeatureFailedToLoad",
            Self::ERROR_FEATURE_WRONG_PRIORITY => "sl::eErrorFeatureWrongPriority",
            Self::ERROR_FEATURE_MISSING_DEPENDENCY => "sl::eErrorFeatureMissingDependency",
            Self::ERROR_FEATURE_MANAGER_INVALID_STATE => "sl::eErrorFeatureManagerInvalidState",
            Self::ERROR_INVALID_STATE => "sl::eErrorInvalidState",
            Self::WARN_OUT_OF_VRAM => "sl::eWarnOutOfVRAM",
            _ => "sl::eUnknown",
        }
    }
}

impl std::fmt::Display for SlResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StructType {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl StructType {
    const fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self {
            data1,
            data2,
            data3,
            data4,
        }
    }
}

pub const PREFERENCES_TYPE: StructType = StructType::new(
    0x1ca10965,
    0xbf8e,
    0x432b,
    [0x8d, 0xa1, 0x67, 0x16, 0xd8, 0x79, 0xfb, 0x14],
);
pub const ADAPTER_INFO_TYPE: StructType = StructType::new(
    0x0677315f,
    0xa746,
    0x4492,
    [0x9f, 0x42, 0xcb, 0x61, 0x42, 0xc9, 0xc3, 0xd4],
);
pub const VIEWPORT_HANDLE_TYPE: StructType = StructType::new(
    0x171b6435,
    0x9b3c,
    0x4fc8,
    [0x99, 0x94, 0xfb, 0xe5, 0x25, 0x69, 0xaa, 0xa4],
);
pub const REFLEX_OPTIONS_TYPE: StructType = StructType::new(
    0xf03af81a,
    0x6d0b,
    0x4902,
    [0xa6, 0x51, 0xc4, 0x96, 0x5e, 0x21, 0x5f, 0xaa],
);
pub const REFLEX_STATE_TYPE: StructType = StructType::new(
    0xf0bb5985,
    0xdab9,
    0x4f23,
    [0xb9, 0x82, 0x7d, 0x3c, 0x0b, 0x09, 0x8f, 0x8d],
);
pub const PCL_OPTIONS_TYPE: StructType = StructType::new(
    0x81bd4d10,
    0x0b2e,
    0x4b31,
    [0xa8, 0xd2, 0x1e, 0x52, 0xd4, 0x44, 0x4b, 0xad],
);
pub const DLSSG_OPTIONS_TYPE: StructType = StructType::new(
    0xfac5f1cb,
    0x2dfd,
    0x4f36,
    [0xa1, 0xe6, 0x3a, 0x9e, 0x86, 0x5b, 0x49, 0x71],
);

/// Common header of every versioned Streamline structure.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct BaseStructure {
    pub next: *mut BaseStructure,
    pub struct_type: StructType,
    pub struct_version: usize,
}

impl BaseStructure {
    pub const fn new(struct_type: StructType) -> Self {
        Self {
            next: ptr::null_mut(),
            struct_type,
            struct_version: kStructVersion1,
        }
    }
}

/// Opaque `sl::FrameToken`. Only ever handled by pointer.
#[repr(C)]
pub struct FrameToken {
    _private: [u8; 0],
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct ViewportHandle {
    pub base: BaseStructure,
    pub value: u32,
}

impl ViewportHandle {
    pub const fn new(value: u32) -> Self {
        Self {
            base: BaseStructure::new(VIEWPORT_HANDLE_TYPE),
            value,
        }
    }
}

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LogLevel(pub u32);

impl LogLevel {
    pub const OFF: Self = Self(0);
    pub const DEFAULT: Self = Self(1);
    pub const VERBOSE: Self = Self(2);
}

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RenderAPI(pub u32);

impl RenderAPI {
    pub const D3D11: Self = Self(0);
    pub const D3D12: Self = Self(1);
    pub const VULKAN: Self = Self(2);
}

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EngineType(pub u32);

impl EngineType {
    pub const CUSTOM: Self = Self(0);
}

bitflags::bitflags! {
    /// `sl::PreferenceFlags`.
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct PreferenceFlags: u64 {
        const DISABLE_CL_STATE_TRACKING = 1 << 0;
        const DISABLE_DEBUG_TEXT = 1 << 1;
        const USE_MANUAL_HOOKING = 1 << 2;
        const ALLOW_OTA = 1 << 3;
        const BYPASS_OS_VERSION_CHECK = 1 << 4;
        const USE_DXGI_FACTORY_PROXY = 1 << 5;
        const LOAD_DOWNLOADED_PLUGINS = 1 << 6;
    }
}

pub type PFun_LogMessageCallback = unsafe extern "C" fn(level: u32, message: *const c_char);

#[repr(C)]
pub struct Preferences {
    pub base: BaseStructure,
    pub show_console: bool,
    pub log_level: LogLevel,
    pub paths_to_plugins: *const *const u16,
    pub num_paths_to_plugins: u32,
    pub path_to_logs_and_data: *const u16,
    pub allocate_callback: *mut c_void,
    pub release_callback: *mut c_void,
    pub log_message_callback: Option<PFun_LogMessageCallback>,
    pub flags: PreferenceFlags,
    pub features_to_load: *const Feature,
    pub num_features_to_load: u32,
    pub application_id: u32,
    pub engine: EngineType,
    pub engine_version: *const c_char,
    pub project_id: *const c_char,
    pub render_api: RenderAPI,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            base: BaseStructure::new(PREFERENCES_TYPE),
            show_console: false,
            log_level: LogLevel::DEFAULT,
            paths_to_plugins: ptr::null(),
            num_paths_to_plugins: 0,
            path_to_logs_and_data: ptr::null(),
            allocate_callback: ptr::null_mut(),
            release_callback: ptr::null_mut(),
            log_message_callback: None,
            flags: PreferenceFlags::DISABLE_CL_STATE_TRACKING | PreferenceFlags::ALLOW_OTA,
            features_to_load: ptr::null(),
            num_features_to_load: 0,
            application_id: 0,
            engine: EngineType::CUSTOM,
            engine_version: ptr::null(),
            project_id: ptr::null(),
            render_api: RenderAPI::D3D12,
        }
    }
}

#[repr(C)]
pub struct AdapterInfo {
    pub base: BaseStructure,
    pub device_luid: *mut u8,
    pub device_luid_size_in_bytes: u32,
    pub vk_physical_device: *mut c_void,
}

impl Default for AdapterInfo {
    fn default() -> Self {
        Self {
            base: BaseStructure::new(ADAPTER_INFO_TYPE),
            device_luid: ptr::null_mut(),
            device_luid_size_in_bytes: 0,
            vk_physical_device: ptr::null_mut(),
        }
    }
}

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReflexMode(pub u32);

impl ReflexMode {
    pub const OFF: Self = Self(0);
    pub const LOW_LATENCY: Self = Self(1);
    pub const LOW_LATENCY_WITH_BOOST: Self = Self(2);
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct ReflexOptions {
    pub base: BaseStructure,
    pub mode: ReflexMode,
    pub frame_limit_us: u32,
    pub use_markers_to_optimize: bool,
    pub virtual_key: u16,
    pub id_thread: u32,
}

impl Default for ReflexOptions {
    fn default() -> Self {
        Self {
            base: BaseStructure::new(REFLEX_OPTIONS_TYPE),
            mode: ReflexMode::OFF,
            frame_limit_us: 0,
            use_markers_to_optimize: false,
            virtual_key: 0,
            id_thread: 0,
        }
    }
}

pub const kReflexFrameReportCount: usize = 64;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct ReflexReport {
    pub frame_id: u64,
    pub input_sample_time: u64,
    pub sim_start_time: u64,
    pub sim_end_time: u64,
    pub render_submit_start_time: u64,
    pub render_submit_end_time: u64,
    pub present_start_time: u64,
    pub present_end_time: u64,
    pub driver_start_time: u64,
    pub driver_end_time: u64,
    pub os_render_queue_start_time: u64,
    pub os_render_queue_end_time: u64,
    pub gpu_render_start_time: u64,
    pub gpu_render_end_time: u64,
    pub gpu_active_render_time_us: u32,
    pub gpu_frame_time_us: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct ReflexState {
    pub base: BaseStructure,
    pub low_latency_available: bool,
    pub latency_report_available: bool,
    pub flash_indicator_driver_controlled: bool,
    pub frame_report: [ReflexReport; kReflexFrameReportCount],
    pub stats_window_message: u32,
}

impl Default for ReflexState {
    fn default() -> Self {
        Self {
            base: BaseStructure::new(REFLEX_STATE_TYPE),
            low_latency_available: false,
            latency_report_available: false,
            flash_indicator_driver_controlled: false,
            frame_report: [ReflexReport::default(); kReflexFrameReportCount],
            stats_window_message: 0,
        }
    }
}

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PCLMarker(pub u32);

impl PCLMarker {
    pub const SIMULATION_START: Self = Self(0);
    pub const SIMULATION_END: Self = Self(1);
    pub const RENDER_SUBMIT_START: Self = Self(2);
    pub const RENDER_SUBMIT_END: Self = Self(3);
    pub const PRESENT_START: Self = Self(4);
    pub const PRESENT_END: Self = Self(5);
    pub const TRIGGER_FLASH: Self = Self(7);
    pub const PC_LATENCY_PING: Self = Self(8);
}

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PCLHotKey(pub u16);

impl PCLHotKey {
    pub const USE_PING_MESSAGE: Self = Self(0);
    pub const VK_F13: Self = Self(0x7c);
    pub const VK_F14: Self = Self(0x7d);
    pub const VK_F15: Self = Self(0x7e);
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct PCLOptions {
    pub base: BaseStructure,
    pub virtual_key: PCLHotKey,
    pub id_thread: u32,
}

impl Default for PCLOptions {
    fn default() -> Self {
        Self {
            base: BaseStructure::new(PCL_OPTIONS_TYPE),
            virtual_key: PCLHotKey::USE_PING_MESSAGE,
            id_thread: 0,
        }
    }
}

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DLSSGMode(pub u32);

impl DLSSGMode {
    pub const OFF: Self = Self(0);
    pub const ON: Self = Self(1);
    pub const AUTO: Self = Self(2);
}

pub type PFun_OnAPIErrorCallback = unsafe extern "C" fn(last_error: *const c_void);

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct DLSSGOptions {
    pub base: BaseStructure,
    pub mode: DLSSGMode,
    pub num_frames_to_generate: u32,
    pub flags: u32,
    pub dynamic_res_width: u32,
    pub dynamic_res_height: u32,
    pub num_back_buffers: u32,
    pub mvec_depth_width: u32,
    pub mvec_depth_height: u32,
    pub color_width: u32,
    pub color_height: u32,
    pub color_buffer_format: u32,
    pub mvec_buffer_format: u32,
    pub depth_buffer_format: u32,
    pub hud_less_buffer_format: u32,
    pub ui_buffer_format: u32,
    pub on_error_callback: Option<PFun_OnAPIErrorCallback>,
    pub use_reflex_matrices: bool,
    pub queue_parallelism_mode: u32,
}

impl Default for DLSSGOptions {
    fn default() -> Self {
        Self {
            base: BaseStructure::new(DLSSG_OPTIONS_TYPE),
            mode: DLSSGMode::OFF,
            num_frames_to_generate: 1,
            flags: 0,
            dynamic_res_width: 0,
            dynamic_res_height: 0,
            num_back_buffers: 0,
            mvec_depth_width: 0,
            mvec_depth_height: 0,
            color_width: 0,
            color_height: 0,
            color_buffer_format: 0,
            mvec_buffer_format: 0,
            depth_buffer_format: 0,
            hud_less_buffer_format: 0,
            ui_buffer_format: 0,
            on_error_callback: None,
            use_reflex_matrices: false,
            queue_parallelism_mode: 0,
        }
    }
}

// Interposer entry points. References in the C++ signatures are passed as pointers.
pub type PFun_slInit = unsafe extern "C" fn(pref: *const Preferences, sdk_version: u64) -> SlResult;
pub type PFun_slShutdown = unsafe extern "C" fn() -> SlResult;
pub type PFun_slIsFeatureSupported =
    unsafe extern "C" fn(feature: Feature, adapter_info: *const AdapterInfo) -> SlResult;
pub type PFun_slGetFeatureFunction = unsafe extern "C" fn(
    feature: Feature,
    function_name: *const c_char,
    function: *mut *mut c_void,
) -> SlResult;
pub type PFun_slGetNewFrameToken =
    unsafe extern "C" fn(token: *mut *mut FrameToken, frame_index: *const u32) -> SlResult;
pub type PFun_slAllocateResources = unsafe extern "C" fn(
    cmd_buffer: *mut c_void,
    feature: Feature,
    viewport: *const ViewportHandle,
) -> SlResult;
pub type PFun_slFreeResources =
    unsafe extern "C" fn(feature: Feature, viewport: *const ViewportHandle) -> SlResult;
pub type PFun_slEvaluateFeature = unsafe extern "C" fn(
    feature: Feature,
    frame: *const FrameToken,
    inputs: *const *const BaseStructure,
    num_inputs: u32,
    cmd_buffer: *mut c_void,
) -> SlResult;
pub type PFun_slSetTag = unsafe extern "C" fn(
    viewport: *const ViewportHandle,
    tags: *const c_void,
    num_tags: u32,
    cmd_buffer: *mut c_void,
) -> SlResult;
pub type PFun_slSetConstants = unsafe extern "C" fn(
    values: *const c_void,
    frame: *const FrameToken,
    viewport: *const ViewportHandle,
) -> SlResult;
pub type PFun_slSetFeatureLoaded = unsafe extern "C" fn(feature: Feature, loaded: bool) -> SlResult;
pub type PFun_slSetD3DDevice = unsafe extern "C" fn(d3d_device: *mut c_void) -> SlResult;

// Feature entry points, resolved through `slGetFeatureFunction`.
pub type PFun_slReflexGetState = unsafe extern "C" fn(state: *mut ReflexState) -> SlResult;
pub type PFun_slReflexSetOptions = unsafe extern "C" fn(options: *const ReflexOptions) -> SlResult;
pub type PFun_slReflexSleep = unsafe extern "C" fn(frame: *const FrameToken) -> SlResult;
pub type PFun_slPCLSetMarker =
    unsafe extern "C" fn(marker: PCLMarker, frame: *const FrameToken) -> SlResult;
pub type PFun_slPCLSetOptions = unsafe extern "C" fn(options: *const PCLOptions) -> SlResult;
pub type PFun_slDLSSGetOptimalSettings =
    unsafe extern "C" fn(options: *const c_void, settings: *mut c_void) -> SlResult;
pub type PFun_slDLSSGetState =
    unsafe extern "C" fn(viewport: *const ViewportHandle, state: *mut c_void) -> SlResult;
pub type PFun_slDLSSSetOptions =
    unsafe extern "C" fn(viewport: *const ViewportHandle, options: *const c_void) -> SlResult;
pub type PFun_slDLSSGGetState = unsafe extern "C" fn(
    viewport: *const ViewportHandle,
    state: *mut c_void,
    options: *const DLSSGOptions,
) -> SlResult;
pub type PFun_slDLSSGSetOptions =
    unsafe extern "C" fn(viewport: *const ViewportHandle, options: *const DLSSGOptions) -> SlResult;
pub type PFun_slNISSetOptions =
    unsafe extern "C" fn(viewport: *const ViewportHandle, options: *const c_void) -> SlResult;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_codes_map_to_diagnostic_names() {
        assert_eq!(SlResult::OK.as_str(), "sl::eOk");
        assert_eq!(SlResult::ERROR_FEATURE_NOT_SUPPORTED.as_str(), "sl::eErrorFeatureNotSupported");
        assert_eq!(SlResult::WARN_OUT_OF_VRAM.as_str(), "sl::eWarnOutOfVRAM");
        assert_eq!(SlResult(-7).as_str(), "sl::eUnknown");
        assert_eq!(SlResult(40).to_string(), "sl::eUnknown");
    }

    #[test]
    fn sdk_version_carries_magic() {
        assert_eq!(kSDKVersion & 0xffff, SDK_VERSION_MAGIC);
        assert_eq!(kSDKVersion >> 48, SDK_VERSION_MAJOR);
    }
}
