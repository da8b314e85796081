/// Swapchain configuration selection
///
/// Pure functions that turn a `CapabilityTriple` (plus the window size, when
/// the surface leaves the extent open) into a `ChainConfiguration`.
///
/// Precedence rules:
/// - Format: single `UNDEFINED` entry means "anything goes" and yields the
///   preferred pair; otherwise the preferred pair if listed, else the first entry.
/// - Present mode: MAILBOX > IMMEDIATE > FIFO (FIFO is always supported).
/// - Extent: the surface's current extent when defined, else the window size
///   clamped per axis.
/// - Image count: one more than the minimum, capped by a nonzero maximum.

use ash::vk;
use flounder_engine::flounder::{Error, Result, WindowSizeSource};
use flounder_engine::{engine_debug, engine_error};
use std::fmt;

use crate::vulkan_capabilities::CapabilityTriple;

/// 8-bit BGRA, sRGB non-linear
pub const PREFERRED_SURFACE_FORMAT: vk::SurfaceFormatKHR = vk::SurfaceFormatKHR {
    format: vk::Format::B8G8R8A8_UNORM,
    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
};

/// `current_extent.width` value meaning "the application picks the size"
pub const UNDEFINED_EXTENT: u32 = u32::MAX;

/// Negotiated swapchain parameters
#[derive(Debug, Clone, Copy)]
pub struct ChainConfiguration {
    /// Pixel format and color space of the images
    pub surface_format: vk::SurfaceFormatKHR,
    /// Presentation policy
    pub present_mode: vk::PresentModeKHR,
    /// Image size in pixels
    pub extent: vk::Extent2D,
    /// Requested image count (the platform may allocate more)
    pub image_count: u32,
    /// Surface transform applied at presentation (the surface's current one)
    pub pre_transform: vk::SurfaceTransformFlagsKHR,
}

impl ChainConfiguration {
    /// Derive the configuration from a freshly queried triple
    ///
    /// # Errors
    ///
    /// `Error::ConfigurationExhausted` if the surface reported no formats or
    /// no present modes (the platform guarantees at least one of each).
    pub fn negotiate(triple: &CapabilityTriple, window: &dyn WindowSizeSource) -> Result<Self> {
        let surface_format = select_surface_format(&triple.formats).ok_or_else(|| {
            engine_error!("flounder::vulkan::swapchain", "Surface reported no formats");
            Error::ConfigurationExhausted("surface reported no formats".to_string())
        })?;

        if triple.present_modes.is_empty() {
            engine_error!("flounder::vulkan::swapchain", "Surface reported no present modes");
            return Err(Error::ConfigurationExhausted(
                "surface reported no present modes".to_string(),
            ));
        }
        let present_mode = select_present_mode(&triple.present_modes);

        let configuration = Self {
            surface_format,
            present_mode,
            extent: select_extent(&triple.capabilities, window),
            image_count: select_image_count(&triple.capabilities),
            pre_transform: triple.capabilities.current_transform,
        };

        engine_debug!("flounder::vulkan::swapchain", "Negotiated {}", configuration);

        Ok(configuration)
    }
}

impl fmt::Display for ChainConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "format={:?} color_space={:?} present_mode={:?} extent={}x{} images={}",
            self.surface_format.format,
            self.surface_format.color_space,
            self.present_mode,
            self.extent.width,
            self.extent.height,
            self.image_count
        )
    }
}

fn is_preferred(format: &vk::SurfaceFormatKHR) -> bool {
    format.format == PREFERRED_SURFACE_FORMAT.format
        && format.color_space == PREFERRED_SURFACE_FORMAT.color_space
}

/// Pick the surface format; `None` only for an empty list
pub fn select_surface_format(formats: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    if let [only] = formats {
        if only.format == vk::Format::UNDEFINED {
            return Some(PREFERRED_SURFACE_FORMAT);
        }
    }

    formats
        .iter()
        .find(|format| is_preferred(format))
        .or_else(|| formats.first())
        .copied()
}

/// Pick the present mode: MAILBOX wins outright, IMMEDIATE beats the FIFO default
pub fn select_present_mode(present_modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    let mut best_mode = vk::PresentModeKHR::FIFO;

    for &mode in present_modes {
        if mode == vk::PresentModeKHR::MAILBOX {
            return mode;
        }
        if mode == vk::PresentModeKHR::IMMEDIATE {
            best_mode = mode;
        }
    }

    best_mode
}

/// Pick the image extent
///
/// The window is only consulted when the surface leaves the size open.
pub fn select_extent(
    capabilities: &vk::SurfaceCapabilitiesKHR,
    window: &dyn WindowSizeSource,
) -> vk::Extent2D {
    if capabilities.current_extent.width != UNDEFINED_EXTENT {
        return capabilities.current_extent;
    }

    let (width, height) = window.pixel_size();
    let min = capabilities.min_image_extent;
    let max = capabilities.max_image_extent;

    // min/max order keeps a malformed range (min > max) from panicking
    vk::Extent2D {
        width: width.min(max.width).max(min.width),
        height: height.min(max.height).max(min.height),
    }
}

/// Pick the image count: `min + 1`, capped by `max` when `max != 0`
pub fn select_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let image_count = capabilities.min_image_count.saturating_add(1);

    if capabilities.max_image_count > 0 && image_count > capabilities.max_image_count {
        capabilities.max_image_count
    } else {
        image_count
    }
}

#[cfg(test)]
#[path = "vulkan_chain_config_tests.rs"]
mod tests;
