/*!
# Flounder Engine - Vulkan Presentation Backend

Vulkan presentation chain for the Flounder rendering engine, built on Ash.

The crate negotiates a swapchain configuration with a window surface, creates
the swapchain with one image view per image, builds one framebuffer per view
once a render pass exists, and tears everything down in reverse order behind
device idle waits.

## Architecture

- **vulkan_platform**: the traits every Vulkan call goes through, plus Ash implementations
- **vulkan_capabilities**: surface capability query
- **vulkan_chain_config**: format / present mode / extent / image count selection
- **vulkan_chain_builder**: swapchain creation under a `ChainPolicy`
- **vulkan_image_views**: per-image views and framebuffers
- **vulkan_swapchain**: the `Swapchain` manager and its teardown state machine

## Example

```no_run
use flounder_engine_renderer_vulkan::flounder::{
    AshPresentationDevice, AshSurfaceSupport, Swapchain,
};
# fn run(
#     entry: &ash::Entry,
#     instance: &ash::Instance,
#     device: ash::Device,
#     physical_device: ash::vk::PhysicalDevice,
#     surface: ash::vk::SurfaceKHR,
#     render_pass: ash::vk::RenderPass,
#     window: &winit::window::Window,
# ) -> flounder_engine::flounder::Result<()> {
let surface_support = AshSurfaceSupport::new(entry, instance);
let device = AshPresentationDevice::new(instance, device);

let mut swapchain = Swapchain::new();
swapchain.create(&device, &surface_support, physical_device, surface, window)?;
swapchain.create_framebuffers(&device, render_pass)?;

// ... render ...

swapchain.cleanup_framebuffers(&device)?;
swapchain.cleanup(&device)?;
# Ok(())
# }
```
*/

// Vulkan implementation modules
mod vulkan_error;
mod vulkan_platform;
mod vulkan_capabilities;
mod vulkan_chain_config;
mod vulkan_chain_builder;
mod vulkan_image_views;
mod vulkan_swapchain;

#[cfg(test)]
mod mock_platform;

// Main flounder namespace module
pub mod flounder {
    // Swapchain manager
    pub use crate::vulkan_swapchain::{Swapchain, ChainState};

    // Negotiation
    pub use crate::vulkan_capabilities::CapabilityTriple;
    pub use crate::vulkan_chain_config::{
        ChainConfiguration,
        PREFERRED_SURFACE_FORMAT,
        UNDEFINED_EXTENT,
        select_surface_format,
        select_present_mode,
        select_extent,
        select_image_count,
    };
    pub use crate::vulkan_chain_builder::{ChainPolicy, BuiltChain, build_chain};
    pub use crate::vulkan_image_views::{create_image_views, create_framebuffers};

    // Platform seams
    pub use crate::vulkan_platform::{
        SurfaceSupport,
        PresentationDevice,
        DeviceProvider,
        AshSurfaceSupport,
        AshPresentationDevice,
        read_into_vec,
    };

    // Error check
    pub use crate::vulkan_error::{check, check_with};
}
