use crate::{functions::FunctionTable, sl};
use ash::vk::{self, Handle};
use std::{
    ffi::c_void,
    ptr::{self, NonNull},
};
use wgpu::{Adapter, hal::api::Vulkan};

/// Graphics backend the host renders with.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RenderApi {
    Vulkan,
    D3D12,
}

impl RenderApi {
    pub(crate) fn as_sl(self) -> sl::RenderAPI {
        match self {
            RenderApi::Vulkan => sl::RenderAPI::VULKAN,
            RenderApi::D3D12 => sl::RenderAPI::D3D12,
        }
    }
}

/// How the host process is running.
///
/// Latency reduction, PC Latency markers and frame generation only reach the SDK in
/// [`ExecutionMode::Game`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ExecutionMode {
    #[default]
    Game,
    Editor,
    ProjectManager,
}

impl ExecutionMode {
    pub fn is_game(self) -> bool {
        self == ExecutionMode::Game
    }
}

/// Adapter identity used for feature support queries.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdapterHandle {
    Vulkan(vk::PhysicalDevice),
    D3D12 { luid: [u8; 8] },
}

impl AdapterHandle {
    /// Runs `f` with an `sl::AdapterInfo` describing this adapter.
    pub(crate) fn with_adapter_info<R>(&self, f: impl FnOnce(&sl::AdapterInfo) -> R) -> R {
        let mut info = sl::AdapterInfo::default();
        match *self {
            AdapterHandle::Vulkan(physical_device) => {
                info.vk_physical_device = physical_device.as_raw() as usize as *mut c_void;
                f(&info)
            }
            AdapterHandle::D3D12 { mut luid } => {
                info.device_luid = luid.as_mut_ptr();
                info.device_luid_size_in_bytes = luid.len() as u32;
                f(&info)
            }
        }
    }
}

/// Backend object handed over by the host during device/adapter setup.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InternalHandle {
    /// Triggers feature enumeration for a Vulkan physical device.
    VulkanPhysicalDevice(vk::PhysicalDevice),
    /// Triggers feature enumeration for a D3D12 adapter.
    D3D12AdapterLuid([u8; 8]),
    /// Hands the created `ID3D12Device` to the SDK.
    D3D12Device(NonNull<c_void>),
}

impl InternalHandle {
    /// Builds a handle from the string-keyed form used by C-style host backends.
    ///
    /// Returns `None` for unknown keys and null values.
    ///
    /// # Safety
    /// `value` must be a `VkPhysicalDevice` for `vulkan_physical_device`, a pointer to an 8-byte
    /// `LUID` for `d3d12_adapter_luid`, or an `ID3D12Device*` for `d3d12_device`.
    pub unsafe fn from_raw(key: &str, value: *mut c_void) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        match key {
            "vulkan_physical_device" => Some(InternalHandle::VulkanPhysicalDevice(
                vk::PhysicalDevice::from_raw(value as usize as u64),
            )),
            "d3d12_adapter_luid" => {
                let luid = unsafe { ptr::read_unaligned(value as *const [u8; 8]) };
                Some(InternalHandle::D3D12AdapterLuid(luid))
            }
            "d3d12_device" => NonNull::new(value).map(InternalHandle::D3D12Device),
            _ => None,
        }
    }

    pub(crate) fn adapter(&self) -> Option<AdapterHandle> {
        match *self {
            InternalHandle::VulkanPhysicalDevice(physical_device) => {
                Some(AdapterHandle::Vulkan(physical_device))
            }
            InternalHandle::D3D12AdapterLuid(luid) => Some(AdapterHandle::D3D12 { luid }),
            InternalHandle::D3D12Device(_) => None,
        }
    }
}

/// Interposer exports the host's D3D12 backend calls instead of the system ones, so device and
/// factory creation are routed through Streamline.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum InternalParameter {
    D3D12GetInterface,
    D3D12CreateDevice,
    DXGIGetDebugInterface1,
    CreateDXGIFactory,
    CreateDXGIFactory1,
    CreateDXGIFactory2,
}

impl InternalParameter {
    pub(crate) fn lookup(self, table: &FunctionTable) -> Option<NonNull<c_void>> {
        match self {
            InternalParameter::D3D12GetInterface => table.d3d12_get_interface,
            InternalParameter::D3D12CreateDevice => table.d3d12_create_device,
            InternalParameter::DXGIGetDebugInterface1 => table.dxgi_get_debug_interface1,
            InternalParameter::CreateDXGIFactory => table.create_dxgi_factory,
            InternalParameter::CreateDXGIFactory1 => table.create_dxgi_factory1,
            InternalParameter::CreateDXGIFactory2 => table.create_dxgi_factory2,
        }
    }
}

/// Returns the [`InternalHandle`] for a wgpu [`Adapter`], used to enumerate Streamline support.
///
/// Returns `None` if the adapter is not using the Vulkan backend.
pub fn adapter_internal_handle(adapter: &Adapter) -> Option<InternalHandle> {
    // SAFETY: the physical device handle is only copied out and passed to support queries.
    unsafe {
        adapter
            .as_hal::<Vulkan>()
            .map(|raw_adapter| InternalHandle::VulkanPhysicalDevice(raw_adapter.raw_physical_device()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_keys_map_to_handles() {
        let mut luid = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let handle =
            unsafe { InternalHandle::from_raw("d3d12_adapter_luid", luid.as_mut_ptr().cast()) };
        assert_eq!(handle, Some(InternalHandle::D3D12AdapterLuid(luid)));

        let device = 0x1000usize as *mut c_void;
        let handle = unsafe { InternalHandle::from_raw("vulkan_physical_device", device) };
        assert_eq!(
            handle,
            Some(InternalHandle::VulkanPhysicalDevice(vk::PhysicalDevice::from_raw(0x1000)))
        );
        assert_eq!(
            handle.and_then(|handle| handle.adapter()),
            Some(AdapterHandle::Vulkan(vk::PhysicalDevice::from_raw(0x1000)))
        );
    }

    #[test]
    fn unknown_keys_and_null_values_are_ignored() {
        let value = 0x1000usize as *mut c_void;
        assert_eq!(unsafe { InternalHandle::from_raw("metal_device", value) }, None);
        assert_eq!(
            unsafe { InternalHandle::from_raw("d3d12_device", ptr::null_mut()) },
            None
        );
    }

    #[test]
    fn adapter_info_carries_the_luid() {
        let adapter = AdapterHandle::D3D12 {
            luid: [9, 8, 7, 6, 5, 4, 3, 2],
        };
        let (size, first) = adapter.with_adapter_info(|info| {
            (info.device_luid_size_in_bytes, unsafe { *info.device_luid })
        });
        assert_eq!(size, 8);
        assert_eq!(first, 9);
    }

    #[test]
    fn only_game_mode_is_game() {
        assert!(ExecutionMode::Game.is_game());
        assert!(!ExecutionMode::Editor.is_game());
        assert!(!ExecutionMode::ProjectManager.is_game());
    }
}
