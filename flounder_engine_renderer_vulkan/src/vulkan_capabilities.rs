/// Surface capability query
///
/// Reads the (capabilities, formats, present modes) triple for a physical
/// device and surface. The triple is queried fresh on every chain creation
/// and never cached across a resize.

use ash::vk;
use flounder_engine::flounder::Result;
use flounder_engine::engine_debug;

use crate::vulkan_error::check;
use crate::vulkan_platform::SurfaceSupport;

/// Everything the surface reports about presentation support
#[derive(Debug, Clone)]
pub struct CapabilityTriple {
    /// Image count, extent and transform limits
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    /// Supported (format, color space) pairs, in driver order
    pub formats: Vec<vk::SurfaceFormatKHR>,
    /// Supported present modes, in driver order
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl CapabilityTriple {
    /// Query the triple; any failing query aborts
    pub fn query(
        surface_support: &dyn SurfaceSupport,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> Result<Self> {
        let capabilities = check(
            surface_support.surface_capabilities(physical_device, surface),
            "vkGetPhysicalDeviceSurfaceCapabilitiesKHR",
            physical_device,
        )?;

        let formats = check(
            surface_support.surface_formats(physical_device, surface),
            "vkGetPhysicalDeviceSurfaceFormatsKHR",
            physical_device,
        )?;

        let present_modes = check(
            surface_support.surface_present_modes(physical_device, surface),
            "vkGetPhysicalDeviceSurfacePresentModesKHR",
            physical_device,
        )?;

        engine_debug!(
            "flounder::vulkan::swapchain",
            "Surface supports {} formats, {} present modes, images {}..{}, current extent {}x{}",
            formats.len(),
            present_modes.len(),
            capabilities.min_image_count,
            capabilities.max_image_count,
            capabilities.current_extent.width,
            capabilities.current_extent.height
        );

        Ok(Self {
            capabilities,
            formats,
            present_modes,
        })
    }
}

#[cfg(test)]
#[path = "vulkan_capabilities_tests.rs"]
mod tests;
