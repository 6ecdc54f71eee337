use crate::{initialization::RenderApi, sl::*};
use libloading::Library;
use std::{
    ffi::{CStr, c_void},
    mem,
    path::Path,
    ptr::{self, NonNull},
};

/// Name of the Streamline interposer library.
#[cfg(windows)]
pub const INTERPOSER_LIBRARY: &str = "sl.interposer.dll";
/// Name of the Streamline interposer library.
#[cfg(not(windows))]
pub const INTERPOSER_LIBRARY: &str = "libsl.interposer.so";

/// Dynamically resolved Streamline entry points.
///
/// Every entry is optional. A `None` entry means the library or the owning feature plugin failed
/// to load, and callers treat the operation as a successful no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct FunctionTable {
    pub init: Option<PFun_slInit>,
    pub shutdown: Option<PFun_slShutdown>,
    pub is_feature_supported: Option<PFun_slIsFeatureSupported>,
    pub get_feature_function: Option<PFun_slGetFeatureFunction>,
    pub get_new_frame_token: Option<PFun_slGetNewFrameToken>,
    pub allocate_resources: Option<PFun_slAllocateResources>,
    pub free_resources: Option<PFun_slFreeResources>,
    pub evaluate_feature: Option<PFun_slEvaluateFeature>,
    pub set_tag: Option<PFun_slSetTag>,
    pub set_constants: Option<PFun_slSetConstants>,
    pub set_feature_loaded: Option<PFun_slSetFeatureLoaded>,
    pub set_d3d_device: Option<PFun_slSetD3DDevice>,

    pub reflex_get_state: Option<PFun_slReflexGetState>,
    pub reflex_set_options: Option<PFun_slReflexSetOptions>,
    pub reflex_sleep: Option<PFun_slReflexSleep>,

    pub pcl_set_marker: Option<PFun_slPCLSetMarker>,
    pub pcl_set_options: Option<PFun_slPCLSetOptions>,

    pub dlss_get_optimal_settings: Option<PFun_slDLSSGetOptimalSettings>,
    pub dlss_get_state: Option<PFun_slDLSSGetState>,
    pub dlss_set_options: Option<PFun_slDLSSSetOptions>,

    pub dlssg_get_state: Option<PFun_slDLSSGGetState>,
    pub dlssg_set_options: Option<PFun_slDLSSGSetOptions>,

    pub nis_set_options: Option<PFun_slNISSetOptions>,

    /// Device and factory creation shims exported by the interposer (D3D12 only).
    pub d3d12_get_interface: Option<NonNull<c_void>>,
    pub d3d12_create_device: Option<NonNull<c_void>>,
    pub dxgi_get_debug_interface1: Option<NonNull<c_void>>,
    pub create_dxgi_factory: Option<NonNull<c_void>>,
    pub create_dxgi_factory1: Option<NonNull<c_void>>,
    pub create_dxgi_factory2: Option<NonNull<c_void>>,
}

impl FunctionTable {
    /// Resolves the entries exported directly by the interposer.
    ///
    /// # Safety
    /// `library` must be a Streamline interposer whose exports match the declared signatures.
    pub(crate) unsafe fn resolve_base(library: &Library, api: RenderApi) -> Self {
        unsafe {
            let mut table = Self {
                init: symbol(library, c"slInit"),
                shutdown: symbol(library, c"slShutdown"),
                is_feature_supported: symbol(library, c"slIsFeatureSupported"),
                get_feature_function: symbol(library, c"slGetFeatureFunction"),
                get_new_frame_token: symbol(library, c"slGetNewFrameToken"),
                set_feature_loaded: symbol(library, c"slSetFeatureLoaded"),
                set_d3d_device: symbol(library, c"slSetD3DDevice"),
                allocate_resources: symbol(library, c"slAllocateResources"),
                free_resources: symbol(library, c"slFreeResources"),
                evaluate_feature: symbol(library, c"slEvaluateFeature"),
                set_tag: symbol(library, c"slSetTag"),
                set_constants: symbol(library, c"slSetConstants"),
                ..Self::default()
            };

            if api == RenderApi::D3D12 {
                table.create_dxgi_factory = address(library, c"CreateDXGIFactory");
                table.create_dxgi_factory1 = address(library, c"CreateDXGIFactory1");
                table.create_dxgi_factory2 = address(library, c"CreateDXGIFactory2");
                table.d3d12_create_device = address(library, c"D3D12CreateDevice");
                table.d3d12_get_interface = address(library, c"D3D12GetInterface");
                table.dxgi_get_debug_interface1 = address(library, c"DXGIGetDebugInterface1");
            }

            table
        }
    }

    /// Copy of this table with only the entries available before `slInit`.
    pub(crate) fn base_entries(&self, api: RenderApi) -> Self {
        let mut table = Self {
            init: self.init,
            shutdown: self.shutdown,
            is_feature_supported: self.is_feature_supported,
            get_feature_function: self.get_feature_function,
            get_new_frame_token: self.get_new_frame_token,
            allocate_resources: self.allocate_resources,
            free_resources: self.free_resources,
            evaluate_feature: self.evaluate_feature,
            set_tag: self.set_tag,
            set_constants: self.set_constants,
            set_feature_loaded: self.set_feature_loaded,
            set_d3d_device: self.set_d3d_device,
            ..Self::default()
        };
        if api == RenderApi::D3D12 {
            table.d3d12_get_interface = self.d3d12_get_interface;
            table.d3d12_create_device = self.d3d12_create_device;
            table.dxgi_get_debug_interface1 = self.dxgi_get_debug_interface1;
            table.create_dxgi_factory = self.create_dxgi_factory;
            table.create_dxgi_factory1 = self.create_dxgi_factory1;
            table.create_dxgi_factory2 = self.create_dxgi_factory2;
        }
        table
    }

    /// Looks up the per-feature entries against the live SDK session.
    ///
    /// Returns `false` when `slGetFeatureFunction` itself is unavailable.
    pub(crate) fn resolve_feature_entries(&mut self) -> bool {
        let Some(get) = self.get_feature_function else {
            return false;
        };

        // SAFETY: the requested names and feature ids are the SDK's own, so the returned
        // pointers have the declared signatures.
        unsafe {
            self.reflex_set_options = feature_function(get, kFeatureReflex, c"slReflexSetOptions");
            self.reflex_sleep = feature_function(get, kFeatureReflex, c"slReflexSleep");
            self.reflex_get_state = feature_function(get, kFeatureReflex, c"slReflexGetState");
            self.pcl_set_marker = feature_function(get, kFeaturePCL, c"slPCLSetMarker");
            self.pcl_set_options = feature_function(get, kFeaturePCL, c"slPCLSetOptions");

            self.dlss_get_optimal_settings =
                feature_function(get, kFeatureDLSS, c"slDLSSGetOptimalSettings");
            self.dlss_get_state = feature_function(get, kFeatureDLSS, c"slDLSSGetState");
            self.dlss_set_options = feature_function(get, kFeatureDLSS, c"slDLSSSetOptions");

            self.dlssg_get_state = feature_function(get, kFeatureDLSS_G, c"slDLSSGGetState");
            self.dlssg_set_options = feature_function(get, kFeatureDLSS_G, c"slDLSSGSetOptions");

            self.nis_set_options = feature_function(get, kFeatureNIS, c"slNISSetOptions");
        }
        true
    }
}

/// Opens the interposer library.
pub(crate) fn open_interposer(path: &Path) -> Result<Library, libloading::Error> {
    // SAFETY: Loading runs the library's initializers. The interposer is only ever resolved
    // through the documented `sl*` exports below.
    unsafe { Library::new(path) }
}

unsafe fn symbol<T: Copy>(library: &Library, name: &CStr) -> Option<T> {
    unsafe { library.get::<T>(name.to_bytes_with_nul()) }
        .ok()
        .map(|symbol| *symbol)
}

unsafe fn address(library: &Library, name: &CStr) -> Option<NonNull<c_void>> {
    unsafe { symbol::<*mut c_void>(library, name) }.and_then(NonNull::new)
}

unsafe fn feature_function<T: Copy>(
    get: PFun_slGetFeatureFunction,
    feature: Feature,
    name: &CStr,
) -> Option<T> {
    debug_assert_eq!(mem::size_of::<T>(), mem::size_of::<*mut c_void>());

    let mut function = ptr::null_mut();
    let result = unsafe { get(feature, name.as_ptr(), &mut function) };
    if !result.is_ok() || function.is_null() {
        log::debug!("Streamline: {name:?} unavailable for feature {feature} ({result})");
        return None;
    }
    Some(unsafe { mem::transmute_copy::<*mut c_void, T>(&function) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{self, MockConfig, MockEntry};

    #[test]
    fn feature_entries_resolve_through_the_session() {
        let mut table = mock::install(MockConfig::default());
        assert!(table.reflex_sleep.is_none());

        assert!(table.resolve_feature_entries());
        assert!(table.reflex_sleep.is_some());
        assert!(table.pcl_set_marker.is_some());
        assert!(table.dlssg_set_options.is_some());
        assert!(table.nis_set_options.is_some());
    }

    #[test]
    fn absent_feature_entries_stay_null() {
        let mut table = mock::install(MockConfig {
            absent: vec![MockEntry::PclSetMarker, MockEntry::ReflexSleep],
            ..MockConfig::default()
        });

        assert!(table.resolve_feature_entries());
        assert!(table.pcl_set_marker.is_none());
        assert!(table.reflex_sleep.is_none());
        assert!(table.reflex_set_options.is_some());
    }

    #[test]
    fn feature_lookup_requires_get_feature_function() {
        let mut table = mock::install(MockConfig {
            absent: vec![MockEntry::GetFeatureFunction],
            ..MockConfig::default()
        });

        assert!(!table.resolve_feature_entries());
        assert!(table.reflex_set_options.is_none());
    }

    #[test]
    fn base_entries_drop_creation_shims_outside_d3d12() {
        let mut table = mock::install(MockConfig::default());
        table.resolve_feature_entries();

        let vulkan = table.base_entries(RenderApi::Vulkan);
        assert!(vulkan.init.is_some());
        assert!(vulkan.reflex_sleep.is_none());
        assert!(vulkan.d3d12_create_device.is_none());

        let d3d12 = table.base_entries(RenderApi::D3D12);
        assert!(d3d12.d3d12_create_device.is_some());
    }

    #[test]
    fn missing_library_fails_to_open() {
        assert!(open_interposer(Path::new("definitely-not-a-streamline-interposer")).is_err());
    }
}
