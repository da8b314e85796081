/// Platform seams for presentation - the only place Vulkan is called
///
/// The swapchain logic talks to the driver through three narrow traits:
///
/// - `SurfaceSupport`: instance-level surface queries for a physical device
/// - `PresentationDevice`: logical-device calls that create and destroy the
///   swapchain, its image views and its framebuffers
/// - `DeviceProvider`: hands out the *current* device at teardown time
///
/// `AshSurfaceSupport` and `AshPresentationDevice` implement them on top of ash.

use ash::prelude::VkResult;
use ash::vk;
use std::ptr;

// ============================================================================
// TRAITS
// ============================================================================

/// Surface capability queries (VK_KHR_surface)
///
/// Zero-length format or present-mode results are returned as empty vectors.
pub trait SurfaceSupport {
    /// Surface limits: image counts, extents, current transform
    fn surface_capabilities(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<vk::SurfaceCapabilitiesKHR>;

    /// Supported (format, color space) pairs, in driver order
    fn surface_formats(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::SurfaceFormatKHR>>;

    /// Supported present modes, in driver order
    fn surface_present_modes(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::PresentModeKHR>>;
}

/// Logical-device calls used by the presentation chain (core + VK_KHR_swapchain)
pub trait PresentationDevice {
    /// Raw device handle, for diagnostics
    fn handle(&self) -> vk::Device;

    /// vkCreateSwapchainKHR
    fn create_swapchain(&self, create_info: &vk::SwapchainCreateInfoKHR<'_>) -> VkResult<vk::SwapchainKHR>;

    /// vkGetSwapchainImagesKHR; the length is whatever the platform allocated
    fn swapchain_images(&self, swapchain: vk::SwapchainKHR) -> VkResult<Vec<vk::Image>>;

    /// vkDestroySwapchainKHR (also releases the swapchain images)
    fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR);

    /// vkCreateImageView
    fn create_image_view(&self, create_info: &vk::ImageViewCreateInfo<'_>) -> VkResult<vk::ImageView>;

    /// vkDestroyImageView
    fn destroy_image_view(&self, image_view: vk::ImageView);

    /// vkCreateFramebuffer
    fn create_framebuffer(&self, create_info: &vk::FramebufferCreateInfo<'_>) -> VkResult<vk::Framebuffer>;

    /// vkDestroyFramebuffer
    fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer);

    /// vkDeviceWaitIdle - drains all in-flight GPU work
    fn wait_idle(&self) -> VkResult<()>;
}

/// Supplies the device to use for teardown
///
/// Teardown asks for the device at call time instead of trusting one stored
/// at creation, so the owner is free to rotate device handles in between.
pub trait DeviceProvider {
    /// Device currently owning the presentation resources
    fn current_device(&self) -> &dyn PresentationDevice;
}

// ============================================================================
// TWO-CALL ENUMERATION
// ============================================================================

/// Run a Vulkan "count, then fill" enumeration and return an owned vector
///
/// `fill` is called once with a null pointer to query the count, then with a
/// buffer of that capacity. A zero count returns an empty vector without the
/// second call. `VK_INCOMPLETE` (the set grew between the calls) restarts the
/// enumeration.
///
/// # Safety
///
/// `fill` must write at most `*count` elements to a non-null pointer and
/// update `*count` to the number written, as every Vulkan enumerator does.
pub unsafe fn read_into_vec<T>(
    mut fill: impl FnMut(&mut u32, *mut T) -> vk::Result,
) -> VkResult<Vec<T>> {
    loop {
        let mut count = 0u32;
        fill(&mut count, ptr::null_mut()).result()?;

        let mut data = Vec::with_capacity(count as usize);
        if count == 0 {
            return Ok(data);
        }

        match fill(&mut count, data.as_mut_ptr()) {
            vk::Result::SUCCESS => {
                data.set_len(count as usize);
                return Ok(data);
            }
            vk::Result::INCOMPLETE => continue,
            err => return Err(err),
        }
    }
}

// ============================================================================
// ASH IMPLEMENTATIONS
// ============================================================================

/// `SurfaceSupport` backed by the VK_KHR_surface instance functions
pub struct AshSurfaceSupport {
    loader: ash::khr::surface::Instance,
}

impl AshSurfaceSupport {
    /// Load the surface functions for `instance`
    pub fn new(entry: &ash::Entry, instance: &ash::Instance) -> Self {
        Self {
            loader: ash::khr::surface::Instance::new(entry, instance),
        }
    }

    /// Underlying loader (surface destruction stays with the window owner)
    pub fn loader(&self) -> &ash::khr::surface::Instance {
        &self.loader
    }
}

impl SurfaceSupport for AshSurfaceSupport {
    fn surface_capabilities(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<vk::SurfaceCapabilitiesKHR> {
        unsafe {
            self.loader
                .get_physical_device_surface_capabilities(physical_device, surface)
        }
    }

    fn surface_formats(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::SurfaceFormatKHR>> {
        let fp = self.loader.fp();
        unsafe {
            read_into_vec(|count, data| {
                (fp.get_physical_device_surface_formats_khr)(physical_device, surface, count, data)
            })
        }
    }

    fn surface_present_modes(
        &self,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::PresentModeKHR>> {
        let fp = self.loader.fp();
        unsafe {
            read_into_vec(|count, data| {
                (fp.get_physical_device_surface_present_modes_khr)(physical_device, surface, count, data)
            })
        }
    }
}

/// `PresentationDevice` backed by an ash logical device
///
/// Does not own the device: destroying it stays with the device subsystem.
pub struct AshPresentationDevice {
    device: ash::Device,
    swapchain_loader: ash::khr::swapchain::Device,
}

impl AshPresentationDevice {
    /// Wrap `device` and load its VK_KHR_swapchain functions
    pub fn new(instance: &ash::Instance, device: ash::Device) -> Self {
        let swapchain_loader = ash::khr::swapchain::Device::new(instance, &device);
        Self { device, swapchain_loader }
    }

    /// Underlying ash device
    pub fn device(&self) -> &ash::Device {
        &self.device
    }
}

impl PresentationDevice for AshPresentationDevice {
    fn handle(&self) -> vk::Device {
        self.device.handle()
    }

    fn create_swapchain(&self, create_info: &vk::SwapchainCreateInfoKHR<'_>) -> VkResult<vk::SwapchainKHR> {
        unsafe { self.swapchain_loader.create_swapchain(create_info, None) }
    }

    fn swapchain_images(&self, swapchain: vk::SwapchainKHR) -> VkResult<Vec<vk::Image>> {
        let fp = self.swapchain_loader.fp();
        let device = self.device.handle();
        unsafe {
            read_into_vec(|count, data| {
                (fp.get_swapchain_images_khr)(device, swapchain, count, data)
            })
        }
    }

    fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR) {
        unsafe { self.swapchain_loader.destroy_swapchain(swapchain, None) }
    }

    fn create_image_view(&self, create_info: &vk::ImageViewCreateInfo<'_>) -> VkResult<vk::ImageView> {
        unsafe { self.device.create_image_view(create_info, None) }
    }

    fn destroy_image_view(&self, image_view: vk::ImageView) {
        unsafe { self.device.destroy_image_view(image_view, None) }
    }

    fn create_framebuffer(&self, create_info: &vk::FramebufferCreateInfo<'_>) -> VkResult<vk::Framebuffer> {
        unsafe { self.device.create_framebuffer(create_info, None) }
    }

    fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer) {
        unsafe { self.device.destroy_framebuffer(framebuffer, None) }
    }

    fn wait_idle(&self) -> VkResult<()> {
        unsafe { self.device.device_wait_idle() }
    }
}

impl DeviceProvider for AshPresentationDevice {
    fn current_device(&self) -> &dyn PresentationDevice {
        self
    }
}

#[cfg(test)]
#[path = "vulkan_platform_tests.rs"]
mod tests;
