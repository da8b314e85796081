/// Swapchain - presentation chain manager
///
/// Owns the swapchain handle, one image view per swapchain image and
/// (once a render pass exists) one framebuffer per view. Creation runs
/// capability query, configuration negotiation, chain creation and view
/// creation in that order. Teardown runs in reverse, one tier at a time,
/// each tier behind a device idle wait:
///
/// ```text
/// Uninitialized --create--> ViewsLive --create_framebuffers--> FramebuffersLive
///       ^                    |  ^                                    |
///       |                    |  +-------cleanup_framebuffers---------+
///       |                 cleanup
///       |                    v
///       +--(create)------ Destroyed
/// ```

use ash::vk::{self, Handle};
use flounder_engine::flounder::{Error, Result, WindowSizeSource};
use flounder_engine::{engine_debug, engine_error, engine_info, engine_warn};
use std::fmt;

use crate::vulkan_capabilities::CapabilityTriple;
use crate::vulkan_chain_builder::{build_chain, ChainPolicy};
use crate::vulkan_chain_config::ChainConfiguration;
use crate::vulkan_error::check;
use crate::vulkan_image_views::{create_framebuffers, create_image_views};
use crate::vulkan_platform::{DeviceProvider, PresentationDevice, SurfaceSupport};

/// Which resource tiers are alive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// Nothing created yet
    Uninitialized,
    /// Swapchain and image views alive, no framebuffers
    ViewsLive,
    /// Swapchain, image views and framebuffers alive
    FramebuffersLive,
    /// Everything released; `create` may be called again
    Destroyed,
}

impl fmt::Display for ChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChainState::Uninitialized => "uninitialized",
            ChainState::ViewsLive => "views live",
            ChainState::FramebuffersLive => "framebuffers live",
            ChainState::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

/// Presentation chain for one window surface
///
/// Not internally synchronized: every method takes `&mut self`.
pub struct Swapchain {
    /// Fixed creation parameters
    policy: ChainPolicy,
    state: ChainState,

    swapchain: vk::SwapchainKHR,
    /// Parameters the live chain was created with
    configuration: Option<ChainConfiguration>,

    /// Platform-owned, never destroyed individually
    images: Vec<vk::Image>,
    /// `image_views[i]` wraps `images[i]`
    image_views: Vec<vk::ImageView>,
    /// `framebuffers[i]` attaches `image_views[i]`
    framebuffers: Vec<vk::Framebuffer>,
}

fn ordering_violation(message: String) -> Error {
    engine_error!("flounder::vulkan::swapchain", "Ordering violation: {}", message);
    Error::OrderingViolation(message)
}

impl Swapchain {
    /// Empty manager with the default `ChainPolicy`
    pub fn new() -> Self {
        Self::with_policy(ChainPolicy::default())
    }

    /// Empty manager with a custom creation policy
    pub fn with_policy(policy: ChainPolicy) -> Self {
        Self {
            policy,
            state: ChainState::Uninitialized,
            swapchain: vk::SwapchainKHR::null(),
            configuration: None,
            images: Vec::new(),
            image_views: Vec::new(),
            framebuffers: Vec::new(),
        }
    }

    /// Create the swapchain and its image views
    ///
    /// Queries the surface, negotiates a configuration, creates the chain and
    /// one view per image the platform allocated. Allowed from
    /// `Uninitialized` and `Destroyed` only.
    ///
    /// # Arguments
    ///
    /// * `device` - Logical device that will own the chain
    /// * `surface_support` - Surface queries for `physical_device`
    /// * `physical_device` - Device the surface capabilities are read for
    /// * `surface` - Window surface to present to
    /// * `window` - Read only when the surface leaves the extent open
    ///
    /// # Errors
    ///
    /// `OrderingViolation` over a live chain, otherwise whatever the query,
    /// negotiation or creation steps return. On failure nothing stays alive.
    pub fn create(
        &mut self,
        device: &dyn PresentationDevice,
        surface_support: &dyn SurfaceSupport,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
        window: &dyn WindowSizeSource,
    ) -> Result<()> {
        if matches!(self.state, ChainState::ViewsLive | ChainState::FramebuffersLive) {
            return Err(ordering_violation(format!(
                "create() called while the chain is {}",
                self.state
            )));
        }

        let triple = CapabilityTriple::query(surface_support, physical_device, surface)?;
        let configuration = ChainConfiguration::negotiate(&triple, window)?;
        let chain = build_chain(device, surface, &configuration, &self.policy)?;

        let image_views = match create_image_views(device, &chain.images, configuration.surface_format.format) {
            Ok(views) => views,
            Err(err) => {
                device.destroy_swapchain(chain.swapchain);
                return Err(err);
            }
        };

        self.swapchain = chain.swapchain;
        self.images = chain.images;
        self.image_views = image_views;
        self.framebuffers.clear();
        self.configuration = Some(configuration);
        self.state = ChainState::ViewsLive;

        engine_info!(
            "flounder::vulkan::swapchain",
            "Swapchain created: {} images, {:?}, {:?}, {}x{}",
            self.images.len(),
            configuration.surface_format.format,
            configuration.present_mode,
            configuration.extent.width,
            configuration.extent.height
        );

        Ok(())
    }

    /// Create one framebuffer per image view for `render_pass`
    ///
    /// Calling this while framebuffers are live replaces them without
    /// destroying them; the old handles leak and a warning says how many.
    /// Call `cleanup_framebuffers` first.
    ///
    /// # Errors
    ///
    /// `OrderingViolation` if no image views exist. On a creation failure the
    /// previous state (and any previous framebuffers) is kept.
    pub fn create_framebuffers(&mut self, device: &dyn PresentationDevice, render_pass: vk::RenderPass) -> Result<()> {
        let configuration = match (self.state, self.configuration) {
            (ChainState::ViewsLive | ChainState::FramebuffersLive, Some(configuration)) => configuration,
            _ => {
                return Err(ordering_violation(format!(
                    "create_framebuffers() called while the chain is {}",
                    self.state
                )))
            }
        };

        let framebuffers = create_framebuffers(device, render_pass, &self.image_views, configuration.extent)?;

        if self.state == ChainState::FramebuffersLive {
            engine_warn!(
                "flounder::vulkan::swapchain",
                "Framebuffers replaced without cleanup: {} handles leaked",
                self.framebuffers.len()
            );
        }

        self.framebuffers = framebuffers;
        self.state = ChainState::FramebuffersLive;

        engine_info!(
            "flounder::vulkan::swapchain",
            "Created {} framebuffers ({}x{})",
            self.framebuffers.len(),
            configuration.extent.width,
            configuration.extent.height
        );

        Ok(())
    }

    /// Destroy the framebuffers, keeping the views and the swapchain
    ///
    /// Waits for the device to go idle first. A no-op (no device call) when
    /// no framebuffers are live.
    pub fn cleanup_framebuffers(&mut self, provider: &dyn DeviceProvider) -> Result<()> {
        if self.state != ChainState::FramebuffersLive {
            return Ok(());
        }

        let device = provider.current_device();
        check(device.wait_idle(), "vkDeviceWaitIdle", device.handle())?;

        for framebuffer in self.framebuffers.drain(..) {
            device.destroy_framebuffer(framebuffer);
        }
        self.state = ChainState::ViewsLive;

        engine_debug!("flounder::vulkan::swapchain", "Framebuffers destroyed");

        Ok(())
    }

    /// Destroy the image views, then the swapchain
    ///
    /// Waits for the device to go idle first. A no-op (no device call) when
    /// nothing is live.
    ///
    /// # Errors
    ///
    /// `OrderingViolation` while framebuffers are live; nothing is destroyed.
    pub fn cleanup(&mut self, provider: &dyn DeviceProvider) -> Result<()> {
        match self.state {
            ChainState::Uninitialized | ChainState::Destroyed => return Ok(()),
            ChainState::FramebuffersLive => {
                return Err(ordering_violation(format!(
                    "cleanup() called with {} framebuffers alive; call cleanup_framebuffers() first",
                    self.framebuffers.len()
                )))
            }
            ChainState::ViewsLive => {}
        }

        let device = provider.current_device();
        check(device.wait_idle(), "vkDeviceWaitIdle", device.handle())?;

        for view in self.image_views.drain(..) {
            device.destroy_image_view(view);
        }
        device.destroy_swapchain(self.swapchain);

        self.swapchain = vk::SwapchainKHR::null();
        self.images.clear();
        self.configuration = None;
        self.state = ChainState::Destroyed;

        engine_info!("flounder::vulkan::swapchain", "Swapchain destroyed");

        Ok(())
    }

    /// Rebuild the chain after a resize or an out-of-date surface
    ///
    /// Full teardown (framebuffers, then views and swapchain), then a fresh
    /// `create` on the provider's current device with a re-queried surface.
    /// Framebuffers are not rebuilt; call `create_framebuffers` afterwards.
    pub fn recreate(
        &mut self,
        provider: &dyn DeviceProvider,
        surface_support: &dyn SurfaceSupport,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
        window: &dyn WindowSizeSource,
    ) -> Result<()> {
        engine_debug!("flounder::vulkan::swapchain", "Recreating swapchain (was {})", self.state);

        self.cleanup_framebuffers(provider)?;
        self.cleanup(provider)?;
        self.create(provider.current_device(), surface_support, physical_device, surface, window)
    }

    // ===== ACCESSORS =====

    /// Number of images the platform actually allocated
    pub fn image_count(&self) -> u32 {
        self.images.len() as u32
    }

    /// Image pixel format (`UNDEFINED` when no chain is live)
    pub fn format(&self) -> vk::Format {
        self.surface_format().format
    }

    /// Image format and color space
    pub fn surface_format(&self) -> vk::SurfaceFormatKHR {
        self.configuration
            .map(|c| c.surface_format)
            .unwrap_or_default()
    }

    /// Present mode (FIFO when no chain is live)
    pub fn present_mode(&self) -> vk::PresentModeKHR {
        self.configuration
            .map(|c| c.present_mode)
            .unwrap_or(vk::PresentModeKHR::FIFO)
    }

    /// Image size (0x0 when no chain is live)
    pub fn extent(&self) -> vk::Extent2D {
        self.configuration.map(|c| c.extent).unwrap_or_default()
    }

    pub fn images(&self) -> &[vk::Image] {
        &self.images
    }

    pub fn image_views(&self) -> &[vk::ImageView] {
        &self.image_views
    }

    /// Empty until `create_framebuffers`
    pub fn framebuffers(&self) -> &[vk::Framebuffer] {
        &self.framebuffers
    }

    /// Swapchain handle (null when no chain is live)
    pub fn handle(&self) -> vk::SwapchainKHR {
        self.swapchain
    }

    pub fn state(&self) -> ChainState {
        self.state
    }

    /// Configuration of the live chain
    pub fn configuration(&self) -> Option<&ChainConfiguration> {
        self.configuration.as_ref()
    }

    pub fn policy(&self) -> &ChainPolicy {
        &self.policy
    }
}

impl Default for Swapchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        // No device here, so report only
        if matches!(self.state, ChainState::ViewsLive | ChainState::FramebuffersLive) {
            engine_warn!(
                "flounder::vulkan::swapchain",
                "Swapchain {:#x} dropped while {}: {} framebuffers and {} image views leaked",
                self.swapchain.as_raw(),
                self.state,
                self.framebuffers.len(),
                self.image_views.len()
            );
        }
    }
}

#[cfg(test)]
#[path = "vulkan_swapchain_tests.rs"]
mod tests;
