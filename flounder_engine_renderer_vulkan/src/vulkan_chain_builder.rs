/// Swapchain creation from a negotiated configuration
///
/// Fills the create info from a `ChainConfiguration` plus the fixed
/// `ChainPolicy`, creates the swapchain and reads back the image handles the
/// platform actually allocated.

use ash::vk;
use flounder_engine::flounder::{Error, Result};
use flounder_engine::{engine_debug, engine_error};

use crate::vulkan_chain_config::ChainConfiguration;
use crate::vulkan_error::{check, check_with};
use crate::vulkan_platform::PresentationDevice;

/// Creation parameters that do not come from negotiation
#[derive(Debug, Clone, Copy)]
pub struct ChainPolicy {
    /// Layers per image (1 = not stereoscopic)
    pub image_array_layers: u32,
    /// Usage the images are created for
    pub image_usage: vk::ImageUsageFlags,
    /// Queue ownership mode; EXCLUSIVE passes no queue family list
    pub sharing_mode: vk::SharingMode,
    /// How alpha is composited with other windows
    pub composite_alpha: vk::CompositeAlphaFlagsKHR,
    /// Let the platform skip pixels hidden by other windows
    pub clipped: bool,
}

impl Default for ChainPolicy {
    fn default() -> Self {
        Self {
            image_array_layers: 1,
            image_usage: vk::ImageUsageFlags::COLOR_ATTACHMENT,
            sharing_mode: vk::SharingMode::EXCLUSIVE,
            composite_alpha: vk::CompositeAlphaFlagsKHR::OPAQUE,
            clipped: true,
        }
    }
}

/// A created swapchain and its images
#[derive(Debug, Clone)]
pub struct BuiltChain {
    pub swapchain: vk::SwapchainKHR,
    /// Platform-owned images, in platform order (may outnumber the request)
    pub images: Vec<vk::Image>,
}

/// Create the swapchain and retrieve its images
///
/// There is never an old swapchain to hand over: recreation always tears the
/// previous chain down first. If the images cannot be retrieved, or the
/// platform allocated none, the new swapchain is destroyed before the error
/// is returned.
pub fn build_chain(
    device: &dyn PresentationDevice,
    surface: vk::SurfaceKHR,
    config: &ChainConfiguration,
    policy: &ChainPolicy,
) -> Result<BuiltChain> {
    let create_info = vk::SwapchainCreateInfoKHR::default()
        .surface(surface)
        .min_image_count(config.image_count)
        .image_format(config.surface_format.format)
        .image_color_space(config.surface_format.color_space)
        .image_extent(config.extent)
        .image_array_layers(policy.image_array_layers)
        .image_usage(policy.image_usage)
        .image_sharing_mode(policy.sharing_mode)
        .pre_transform(config.pre_transform)
        .composite_alpha(policy.composite_alpha)
        .present_mode(config.present_mode)
        .clipped(policy.clipped)
        .old_swapchain(vk::SwapchainKHR::null());

    let swapchain = check_with(
        device.create_swapchain(&create_info),
        "vkCreateSwapchainKHR",
        device.handle(),
        config,
    )?;

    let images = match check(device.swapchain_images(swapchain), "vkGetSwapchainImagesKHR", swapchain) {
        Ok(images) => images,
        Err(err) => {
            device.destroy_swapchain(swapchain);
            return Err(err);
        }
    };

    if images.is_empty() {
        device.destroy_swapchain(swapchain);
        engine_error!("flounder::vulkan::swapchain", "Swapchain created without images [{}]", config);
        return Err(Error::ConfigurationExhausted(
            "swapchain reported no images".to_string(),
        ));
    }

    if images.len() != config.image_count as usize {
        engine_debug!(
            "flounder::vulkan::swapchain",
            "Requested {} images, platform allocated {}",
            config.image_count,
            images.len()
        );
    }

    Ok(BuiltChain { swapchain, images })
}

#[cfg(test)]
#[path = "vulkan_chain_builder_tests.rs"]
mod tests;
