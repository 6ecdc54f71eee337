//! In-process stand-in for the Streamline interposer.
//!
//! [`install`] returns a [`FunctionTable`] whose entries record every call into a thread-local
//! log, so a host can drive the full marker protocol without the SDK. Function lookups through
//! `slGetFeatureFunction` are not recorded.

use crate::{functions::FunctionTable, sl::*};
use std::{
    cell::RefCell,
    ffi::{CStr, c_char, c_void},
    ptr::{self, NonNull},
    slice, thread,
    time::Duration,
};

/// Entry points whose presence or result can be configured.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MockEntry {
    Init,
    Shutdown,
    IsFeatureSupported,
    GetFeatureFunction,
    GetNewFrameToken,
    SetD3DDevice,
    D3D12Shims,
    ReflexSetOptions,
    ReflexSleep,
    ReflexGetState,
    PclSetOptions,
    PclSetMarker,
    DlssgSetOptions,
}

/// Behavior of the mock interposer.
#[derive(Clone, Debug, Default)]
pub struct MockConfig {
    /// Features reported as `eErrorFeatureNotSupported`.
    pub unsupported: Vec<Feature>,
    /// Entries left unresolved.
    pub absent: Vec<MockEntry>,
    /// Entries returning the given result instead of `eOk`.
    pub failing: Vec<(MockEntry, SlResult)>,
    /// How long `slReflexSleep` blocks.
    pub sleep_duration: Duration,
}

impl MockConfig {
    /// Every feature supported, every entry present.
    pub fn supported() -> Self {
        Self::default()
    }
}

/// A recorded interposer call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MockCall {
    Init {
        features: Vec<Feature>,
        render_api: RenderAPI,
        log_level: LogLevel,
        show_console: bool,
        flags: PreferenceFlags,
        application_id: u32,
        project_id: Option<String>,
        sdk_version: u64,
    },
    Shutdown,
    IsFeatureSupported {
        feature: Feature,
        /// LUID bytes from the adapter info, empty for Vulkan queries.
        luid: Vec<u8>,
        vk_physical_device: usize,
    },
    GetNewFrameToken {
        previous: Option<usize>,
        issued: usize,
    },
    SetD3DDevice(usize),
    ReflexSetOptions {
        mode: ReflexMode,
        frame_limit_us: u32,
    },
    ReflexSleep(usize),
    ReflexGetState,
    PclSetOptions(PCLHotKey),
    PclSetMarker {
        marker: PCLMarker,
        token: usize,
    },
    DlssgSetOptions {
        viewport: u32,
        mode: DLSSGMode,
    },
}

const TOKEN_BASE: usize = 0x5100_0000;
const TOKEN_STRIDE: usize = 0x40;

#[derive(Default)]
struct MockState {
    config: MockConfig,
    calls: Vec<MockCall>,
    tokens_issued: usize,
}

thread_local! {
    static STATE: RefCell<MockState> = RefCell::new(MockState::default());
}

/// Resets the thread's mock state and returns the base entries of a fresh interposer.
pub fn install(config: MockConfig) -> FunctionTable {
    STATE.with(|state| {
        *state.borrow_mut() = MockState {
            config: config.clone(),
            ..MockState::default()
        }
    });

    let present = |entry| !config.absent.contains(&entry);
    let shim = NonNull::new(d3d12_shim as *mut c_void).filter(|_| present(MockEntry::D3D12Shims));

    FunctionTable {
        init: present(MockEntry::Init).then_some(init as PFun_slInit),
        shutdown: present(MockEntry::Shutdown).then_some(shutdown as PFun_slShutdown),
        is_feature_supported: present(MockEntry::IsFeatureSupported)
            .then_some(is_feature_supported as PFun_slIsFeatureSupported),
        get_feature_function: present(MockEntry::GetFeatureFunction)
            .then_some(get_feature_function as PFun_slGetFeatureFunction),
        get_new_frame_token: present(MockEntry::GetNewFrameToken)
            .then_some(get_new_frame_token as PFun_slGetNewFrameToken),
        set_d3d_device: present(MockEntry::SetD3DDevice)
            .then_some(set_d3d_device as PFun_slSetD3DDevice),
        allocate_resources: Some(allocate_resources as PFun_slAllocateResources),
        free_resources: Some(free_resources as PFun_slFreeResources),
        evaluate_feature: Some(evaluate_feature as PFun_slEvaluateFeature),
        set_tag: Some(set_tag as PFun_slSetTag),
        set_constants: Some(set_constants as PFun_slSetConstants),
        set_feature_loaded: Some(set_feature_loaded as PFun_slSetFeatureLoaded),
        d3d12_get_interface: shim,
        d3d12_create_device: shim,
        dxgi_get_debug_interface1: shim,
        create_dxgi_factory: shim,
        create_dxgi_factory1: shim,
        create_dxgi_factory2: shim,
        ..FunctionTable::default()
    }
}

/// Calls recorded on this thread since [`install`] or the last [`take_calls`].
pub fn calls() -> Vec<MockCall> {
    STATE.with(|state| state.borrow().calls.clone())
}

pub fn take_calls() -> Vec<MockCall> {
    STATE.with(|state| std::mem::take(&mut state.borrow_mut().calls))
}

/// Address of the `n`th token issued by `slGetNewFrameToken`, starting at zero.
pub fn token_address(n: usize) -> usize {
    TOKEN_BASE + n * TOKEN_STRIDE
}

fn record(entry: MockEntry, call: MockCall) -> SlResult {
    STATE.with(|state| {
        let mut state = state.borrow_mut();
        state.calls.push(call);
        configured_result(&state.config, entry)
    })
}

fn configured_result(config: &MockConfig, entry: MockEntry) -> SlResult {
    config
        .failing
        .iter()
        .find(|(failing, _)| *failing == entry)
        .map_or(SlResult::OK, |(_, result)| *result)
}

unsafe extern "C" fn init(pref: *const Preferences, sdk_version: u64) -> SlResult {
    let pref = unsafe { &*pref };
    let features = if pref.features_to_load.is_null() {
        Vec::new()
    } else {
        unsafe { slice::from_raw_parts(pref.features_to_load, pref.num_features_to_load as usize) }
            .to_vec()
    };
    let project_id = (!pref.project_id.is_null())
        .then(|| unsafe { CStr::from_ptr(pref.project_id) }.to_string_lossy().into_owned());

    record(
        MockEntry::Init,
        MockCall::Init {
            features,
            render_api: pref.render_api,
            log_level: pref.log_level,
            show_console: pref.show_console,
            flags: pref.flags,
            application_id: pref.application_id,
            project_id,
            sdk_version,
        },
    )
}

unsafe extern "C" fn shutdown() -> SlResult {
    record(MockEntry::Shutdown, MockCall::Shutdown)
}

unsafe extern "C" fn is_feature_supported(feature: Feature, info: *const AdapterInfo) -> SlResult {
    let info = unsafe { &*info };
    let luid = if info.device_luid.is_null() {
        Vec::new()
    } else {
        unsafe { slice::from_raw_parts(info.device_luid, info.device_luid_size_in_bytes as usize) }
            .to_vec()
    };
    let result = record(
        MockEntry::IsFeatureSupported,
        MockCall::IsFeatureSupported {
            feature,
            luid,
            vk_physical_device: info.vk_physical_device as usize,
        },
    );
    let unsupported =
        STATE.with(|state| state.borrow().config.unsupported.contains(&feature));
    if unsupported {
        SlResult::ERROR_FEATURE_NOT_SUPPORTED
    } else {
        result
    }
}

unsafe extern "C" fn get_feature_function(
    _feature: Feature,
    function_name: *const c_char,
    function: *mut *mut c_void,
) -> SlResult {
    let name = unsafe { CStr::from_ptr(function_name) }.to_bytes();
    let resolved: Option<(Option<MockEntry>, *mut c_void)> = match name {
        b"slReflexSetOptions" => Some((
            Some(MockEntry::ReflexSetOptions),
            reflex_set_options as PFun_slReflexSetOptions as *mut c_void,
        )),
        b"slReflexSleep" => Some((
            Some(MockEntry::ReflexSleep),
            reflex_sleep as PFun_slReflexSleep as *mut c_void,
        )),
        b"slReflexGetState" => Some((
            Some(MockEntry::ReflexGetState),
            reflex_get_state as PFun_slReflexGetState as *mut c_void,
        )),
        b"slPCLSetMarker" => Some((
            Some(MockEntry::PclSetMarker),
            pcl_set_marker as PFun_slPCLSetMarker as *mut c_void,
        )),
        b"slPCLSetOptions" => Some((
            Some(MockEntry::PclSetOptions),
            pcl_set_options as PFun_slPCLSetOptions as *mut c_void,
        )),
        b"slDLSSGSetOptions" => Some((
            Some(MockEntry::DlssgSetOptions),
            dlssg_set_options as PFun_slDLSSGSetOptions as *mut c_void,
        )),
        b"slDLSSGGetState" => Some((None, dlssg_get_state as PFun_slDLSSGGetState as *mut c_void)),
        b"slDLSSGetOptimalSettings" => Some((
            None,
            dlss_get_optimal_settings as PFun_slDLSSGetOptimalSettings as *mut c_void,
        )),
        b"slDLSSGetState" => Some((None, dlss_get_state as PFun_slDLSSGetState as *mut c_void)),
        b"slDLSSSetOptions" => Some((None, dlss_set_options as PFun_slDLSSSetOptions as *mut c_void)),
        b"slNISSetOptions" => Some((None, nis_set_options as PFun_slNISSetOptions as *mut c_void)),
        _ => None,
    };

    let absent = |entry: Option<MockEntry>| {
        entry.is_some_and(|entry| {
            STATE.with(|state| state.borrow().config.absent.contains(&entry))
        })
    };

    match resolved {
        Some((entry, pointer)) if !absent(entry) => {
            unsafe { *function = pointer };
            SlResult::OK
        }
        _ => {
            unsafe { *function = ptr::null_mut() };
            SlResult::ERROR_FEATURE_MISSING
        }
    }
}

unsafe extern "C" fn get_new_frame_token(
    token: *mut *mut FrameToken,
    _frame_index: *const u32,
) -> SlResult {
    let previous = unsafe { *token };
    let (issued, result) = STATE.with(|state| {
        let mut state = state.borrow_mut();
        let issued = token_address(state.tokens_issued);
        let previous = (!previous.is_null()).then_some(previous as usize);
        state
            .calls
            .push(MockCall::GetNewFrameToken { previous, issued });
        let result = configured_result(&state.config, MockEntry::GetNewFrameToken);
        if result.is_ok() {
            state.tokens_issued += 1;
        }
        (issued, result)
    });
    if result.is_ok() {
        unsafe { *token = issued as *mut FrameToken };
    }
    result
}

unsafe extern "C" fn set_d3d_device(device: *mut c_void) -> SlResult {
    record(MockEntry::SetD3DDevice, MockCall::SetD3DDevice(device as usize))
}

unsafe extern "C" fn reflex_set_options(options: *const ReflexOptions) -> SlResult {
    let options = unsafe { &*options };
    record(
        MockEntry::ReflexSetOptions,
        MockCall::ReflexSetOptions {
            mode: options.mode,
            frame_limit_us: options.frame_limit_us,
        },
    )
}

unsafe extern "C" fn reflex_sleep(frame: *const FrameToken) -> SlResult {
    let result = record(MockEntry::ReflexSleep, MockCall::ReflexSleep(frame as usize));
    let duration = STATE.with(|state| state.borrow().config.sleep_duration);
    if !duration.is_zero() {
        thread::sleep(duration);
    }
    result
}

unsafe extern "C" fn reflex_get_state(state: *mut ReflexState) -> SlResult {
    let result = record(MockEntry::ReflexGetState, MockCall::ReflexGetState);
    if result.is_ok() {
        let state = unsafe { &mut *state };
        state.low_latency_available = true;
        state.latency_report_available = true;
        state.frame_report[0].frame_id = 1;
        state.frame_report[0].sim_start_time = 100;
        state.frame_report[0].present_end_time = 4_100;
    }
    result
}

unsafe extern "C" fn pcl_set_options(options: *const PCLOptions) -> SlResult {
    let options = unsafe { &*options };
    record(
        MockEntry::PclSetOptions,
        MockCall::PclSetOptions(options.virtual_key),
    )
}

unsafe extern "C" fn pcl_set_marker(marker: PCLMarker, frame: *const FrameToken) -> SlResult {
    record(
        MockEntry::PclSetMarker,
        MockCall::PclSetMarker {
            marker,
            token: frame as usize,
        },
    )
}

unsafe extern "C" fn dlssg_set_options(
    viewport: *const ViewportHandle,
    options: *const DLSSGOptions,
) -> SlResult {
    let (viewport, options) = unsafe { (&*viewport, &*options) };
    record(
        MockEntry::DlssgSetOptions,
        MockCall::DlssgSetOptions {
            viewport: viewport.value,
            mode: options.mode,
        },
    )
}

unsafe extern "C" fn dlssg_get_state(
    _viewport: *const ViewportHandle,
    _state: *mut c_void,
    _options: *const DLSSGOptions,
) -> SlResult {
    SlResult::OK
}

unsafe extern "C" fn dlss_get_optimal_settings(
    _options: *const c_void,
    _settings: *mut c_void,
) -> SlResult {
    SlResult::OK
}

unsafe extern "C" fn dlss_get_state(_viewport: *const ViewportHandle, _state: *mut c_void) -> SlResult {
    SlResult::OK
}

unsafe extern "C" fn dlss_set_options(
    _viewport: *const ViewportHandle,
    _options: *const c_void,
) -> SlResult {
    SlResult::OK
}

unsafe extern "C" fn nis_set_options(
    _viewport: *const ViewportHandle,
    _options: *const c_void,
) -> SlResult {
    SlResult::OK
}

unsafe extern "C" fn allocate_resources(
    _cmd_buffer: *mut c_void,
    _feature: Feature,
    _viewport: *const ViewportHandle,
) -> SlResult {
    SlResult::OK
}

unsafe extern "C" fn free_resources(_feature: Feature, _viewport: *const ViewportHandle) -> SlResult {
    SlResult::OK
}

unsafe extern "C" fn evaluate_feature(
    _feature: Feature,
    _frame: *const FrameToken,
    _inputs: *const *const BaseStructure,
    _num_inputs: u32,
    _cmd_buffer: *mut c_void,
) -> SlResult {
    SlResult::OK
}

unsafe extern "C" fn set_tag(
    _viewport: *const ViewportHandle,
    _tags: *const c_void,
    _num_tags: u32,
    _cmd_buffer: *mut c_void,
) -> SlResult {
    SlResult::OK
}

unsafe extern "C" fn set_constants(
    _values: *const c_void,
    _frame: *const FrameToken,
    _viewport: *const ViewportHandle,
) -> SlResult {
    SlResult::OK
}

unsafe extern "C" fn set_feature_loaded(_feature: Feature, _loaded: bool) -> SlResult {
    SlResult::OK
}

extern "C" fn d3d12_shim() {}
