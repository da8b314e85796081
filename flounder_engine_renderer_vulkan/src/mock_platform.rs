/// Mock presentation platform for unit tests (no GPU required)
///
/// `MockSurface` answers surface queries from fixed data. `MockDevice` hands
/// out fresh fake handles and records every call in order, so tests can check
/// index alignment and teardown ordering.

use ash::prelude::VkResult;
use ash::vk::{self, Handle};
use flounder_engine::flounder::Engine;
use flounder_engine::flounder::log::{LogEntry, Logger};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use crate::vulkan_platform::{DeviceProvider, PresentationDevice, SurfaceSupport};

// ============================================================================
// Mock Surface
// ============================================================================

/// Surface limits with a 1..4096 extent range and identity transform
pub fn capabilities(min_image_count: u32, max_image_count: u32, current_extent: vk::Extent2D) -> vk::SurfaceCapabilitiesKHR {
    vk::SurfaceCapabilitiesKHR {
        min_image_count,
        max_image_count,
        current_extent,
        min_image_extent: vk::Extent2D { width: 1, height: 1 },
        max_image_extent: vk::Extent2D { width: 4096, height: 4096 },
        max_image_array_layers: 1,
        supported_transforms: vk::SurfaceTransformFlagsKHR::IDENTITY,
        current_transform: vk::SurfaceTransformFlagsKHR::IDENTITY,
        supported_composite_alpha: vk::CompositeAlphaFlagsKHR::OPAQUE,
        supported_usage_flags: vk::ImageUsageFlags::COLOR_ATTACHMENT,
    }
}

pub fn surface_format(format: vk::Format, color_space: vk::ColorSpaceKHR) -> vk::SurfaceFormatKHR {
    vk::SurfaceFormatKHR { format, color_space }
}

pub struct MockSurface {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
    /// Returned by every query when set
    pub failure: Option<vk::Result>,
    /// Number of capability queries answered
    pub queries: AtomicU32,
}

impl MockSurface {
    pub fn new(
        capabilities: vk::SurfaceCapabilitiesKHR,
        formats: Vec<vk::SurfaceFormatKHR>,
        present_modes: Vec<vk::PresentModeKHR>,
    ) -> Self {
        Self {
            capabilities,
            formats,
            present_modes,
            failure: None,
            queries: AtomicU32::new(0),
        }
    }

    /// Typical desktop surface: 2..unbounded images, 1920x1080, BGRA8/sRGB, FIFO + MAILBOX
    pub fn desktop() -> Self {
        Self::new(
            capabilities(2, 0, vk::Extent2D { width: 1920, height: 1080 }),
            vec![surface_format(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR)],
            vec![vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX],
        )
    }

    pub fn failing(code: vk::Result) -> Self {
        Self {
            failure: Some(code),
            ..Self::desktop()
        }
    }
}

impl SurfaceSupport for MockSurface {
    fn surface_capabilities(
        &self,
        _physical_device: vk::PhysicalDevice,
        _surface: vk::SurfaceKHR,
    ) -> VkResult<vk::SurfaceCapabilitiesKHR> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        match self.failure {
            Some(code) => Err(code),
            None => Ok(self.capabilities),
        }
    }

    fn surface_formats(
        &self,
        _physical_device: vk::PhysicalDevice,
        _surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::SurfaceFormatKHR>> {
        match self.failure {
            Some(code) => Err(code),
            None => Ok(self.formats.clone()),
        }
    }

    fn surface_present_modes(
        &self,
        _physical_device: vk::PhysicalDevice,
        _surface: vk::SurfaceKHR,
    ) -> VkResult<Vec<vk::PresentModeKHR>> {
        match self.failure {
            Some(code) => Err(code),
            None => Ok(self.present_modes.clone()),
        }
    }
}

// ============================================================================
// Mock Device
// ============================================================================

/// One recorded platform call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformCall {
    WaitIdle,
    CreateSwapchain(vk::SwapchainKHR),
    GetSwapchainImages(vk::SwapchainKHR),
    CreateImageView { image: vk::Image, view: vk::ImageView },
    CreateFramebuffer { attachment: vk::ImageView, framebuffer: vk::Framebuffer },
    DestroyFramebuffer(vk::Framebuffer),
    DestroyImageView(vk::ImageView),
    DestroySwapchain(vk::SwapchainKHR),
}

/// Call at which `MockDevice` fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    CreateSwapchain,
    GetSwapchainImages,
    /// The n-th image view creation (0-based)
    CreateImageView(usize),
    /// The n-th framebuffer creation (0-based)
    CreateFramebuffer(usize),
    WaitIdle,
}

/// Fields of a recorded vkCreateSwapchainKHR
#[derive(Debug, Clone, Copy)]
pub struct SwapchainRequest {
    pub surface: vk::SurfaceKHR,
    pub min_image_count: u32,
    pub image_format: vk::Format,
    pub image_color_space: vk::ColorSpaceKHR,
    pub image_extent: vk::Extent2D,
    pub image_array_layers: u32,
    pub image_usage: vk::ImageUsageFlags,
    pub image_sharing_mode: vk::SharingMode,
    pub queue_family_index_count: u32,
    pub pre_transform: vk::SurfaceTransformFlagsKHR,
    pub composite_alpha: vk::CompositeAlphaFlagsKHR,
    pub present_mode: vk::PresentModeKHR,
    pub clipped: vk::Bool32,
    pub old_swapchain: vk::SwapchainKHR,
}

/// Fields of a recorded vkCreateImageView
#[derive(Debug, Clone, Copy)]
pub struct ImageViewRequest {
    pub image: vk::Image,
    pub view_type: vk::ImageViewType,
    pub format: vk::Format,
    pub components: vk::ComponentMapping,
    pub subresource_range: vk::ImageSubresourceRange,
}

/// Fields of a recorded vkCreateFramebuffer
#[derive(Debug, Clone)]
pub struct FramebufferRequest {
    pub render_pass: vk::RenderPass,
    pub attachments: Vec<vk::ImageView>,
    pub width: u32,
    pub height: u32,
    pub layers: u32,
}

pub struct MockDevice {
    handle: vk::Device,
    next_handle: AtomicU64,
    /// Image count the "platform" allocates (defaults to the requested count)
    granted_images: Option<u32>,
    failure: Option<(FailPoint, vk::Result)>,
    view_attempts: AtomicU64,
    framebuffer_attempts: AtomicU64,
    /// Signed live counts: (swapchains, views, framebuffers)
    live: Mutex<(i64, i64, i64)>,
    pub calls: Mutex<Vec<PlatformCall>>,
    pub swapchain_requests: Mutex<Vec<SwapchainRequest>>,
    pub view_requests: Mutex<Vec<ImageViewRequest>>,
    pub framebuffer_requests: Mutex<Vec<FramebufferRequest>>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            handle: vk::Device::from_raw(0xD0),
            next_handle: AtomicU64::new(0x1000),
            granted_images: None,
            failure: None,
            view_attempts: AtomicU64::new(0),
            framebuffer_attempts: AtomicU64::new(0),
            live: Mutex::new((0, 0, 0)),
            calls: Mutex::new(Vec::new()),
            swapchain_requests: Mutex::new(Vec::new()),
            view_requests: Mutex::new(Vec::new()),
            framebuffer_requests: Mutex::new(Vec::new()),
        }
    }

    /// Allocate `count` images whatever the request says
    pub fn granting_images(mut self, count: u32) -> Self {
        self.granted_images = Some(count);
        self
    }

    pub fn failing_at(mut self, point: FailPoint, code: vk::Result) -> Self {
        self.failure = Some((point, code));
        self
    }

    /// Stop failing (e.g. to tear down after a failure test)
    pub fn heal(&mut self) {
        self.failure = None;
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Handles created minus handles destroyed, per kind: (swapchains, views, framebuffers)
    ///
    /// Tracked apart from the call log, so `clear_calls` does not affect it.
    /// Panics if a kind was destroyed more often than created.
    pub fn live_handles(&self) -> (usize, usize, usize) {
        let live = *self.live.lock().unwrap();
        let count = |n: i64| usize::try_from(n).expect("more handles destroyed than created");
        (count(live.0), count(live.1), count(live.2))
    }

    fn fresh_raw(&self) -> u64 {
        self.next_handle.fetch_add(1, Ordering::SeqCst)
    }

    fn fails_at(&self, point: FailPoint) -> Option<vk::Result> {
        match self.failure {
            Some((p, code)) if p == point => Some(code),
            _ => None,
        }
    }

    fn record(&self, call: PlatformCall) {
        {
            let mut live = self.live.lock().unwrap();
            match call {
                PlatformCall::CreateSwapchain(_) => live.0 += 1,
                PlatformCall::DestroySwapchain(_) => live.0 -= 1,
                PlatformCall::CreateImageView { .. } => live.1 += 1,
                PlatformCall::DestroyImageView(_) => live.1 -= 1,
                PlatformCall::CreateFramebuffer { .. } => live.2 += 1,
                PlatformCall::DestroyFramebuffer(_) => live.2 -= 1,
                _ => {}
            }
        }
        self.calls.lock().unwrap().push(call);
    }
}

impl PresentationDevice for MockDevice {
    fn handle(&self) -> vk::Device {
        self.handle
    }

    fn create_swapchain(&self, create_info: &vk::SwapchainCreateInfoKHR<'_>) -> VkResult<vk::SwapchainKHR> {
        if let Some(code) = self.fails_at(FailPoint::CreateSwapchain) {
            return Err(code);
        }
        self.swapchain_requests.lock().unwrap().push(SwapchainRequest {
            surface: create_info.surface,
            min_image_count: create_info.min_image_count,
            image_format: create_info.image_format,
            image_color_space: create_info.image_color_space,
            image_extent: create_info.image_extent,
            image_array_layers: create_info.image_array_layers,
            image_usage: create_info.image_usage,
            image_sharing_mode: create_info.image_sharing_mode,
            queue_family_index_count: create_info.queue_family_index_count,
            pre_transform: create_info.pre_transform,
            composite_alpha: create_info.composite_alpha,
            present_mode: create_info.present_mode,
            clipped: create_info.clipped,
            old_swapchain: create_info.old_swapchain,
        });
        let swapchain = vk::SwapchainKHR::from_raw(self.fresh_raw());
        self.record(PlatformCall::CreateSwapchain(swapchain));
        Ok(swapchain)
    }

    fn swapchain_images(&self, swapchain: vk::SwapchainKHR) -> VkResult<Vec<vk::Image>> {
        if let Some(code) = self.fails_at(FailPoint::GetSwapchainImages) {
            return Err(code);
        }
        self.record(PlatformCall::GetSwapchainImages(swapchain));
        let requested = self
            .swapchain_requests
            .lock()
            .unwrap()
            .last()
            .map(|r| r.min_image_count)
            .unwrap_or(0);
        let count = self.granted_images.unwrap_or(requested);
        Ok((0..count).map(|_| vk::Image::from_raw(self.fresh_raw())).collect())
    }

    fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR) {
        self.record(PlatformCall::DestroySwapchain(swapchain));
    }

    fn create_image_view(&self, create_info: &vk::ImageViewCreateInfo<'_>) -> VkResult<vk::ImageView> {
        let attempt = self.view_attempts.fetch_add(1, Ordering::SeqCst) as usize;
        if let Some(code) = self.fails_at(FailPoint::CreateImageView(attempt)) {
            return Err(code);
        }
        self.view_requests.lock().unwrap().push(ImageViewRequest {
            image: create_info.image,
            view_type: create_info.view_type,
            format: create_info.format,
            components: create_info.components,
            subresource_range: create_info.subresource_range,
        });
        let view = vk::ImageView::from_raw(self.fresh_raw());
        self.record(PlatformCall::CreateImageView { image: create_info.image, view });
        Ok(view)
    }

    fn destroy_image_view(&self, image_view: vk::ImageView) {
        self.record(PlatformCall::DestroyImageView(image_view));
    }

    fn create_framebuffer(&self, create_info: &vk::FramebufferCreateInfo<'_>) -> VkResult<vk::Framebuffer> {
        let attempt = self.framebuffer_attempts.fetch_add(1, Ordering::SeqCst) as usize;
        if let Some(code) = self.fails_at(FailPoint::CreateFramebuffer(attempt)) {
            return Err(code);
        }
        let attachments = if create_info.attachment_count == 0 {
            Vec::new()
        } else {
            unsafe {
                std::slice::from_raw_parts(create_info.p_attachments, create_info.attachment_count as usize)
            }
            .to_vec()
        };
        let framebuffer = vk::Framebuffer::from_raw(self.fresh_raw());
        self.record(PlatformCall::CreateFramebuffer {
            attachment: attachments.first().copied().unwrap_or_default(),
            framebuffer,
        });
        self.framebuffer_requests.lock().unwrap().push(FramebufferRequest {
            render_pass: create_info.render_pass,
            attachments,
            width: create_info.width,
            height: create_info.height,
            layers: create_info.layers,
        });
        Ok(framebuffer)
    }

    fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer) {
        self.record(PlatformCall::DestroyFramebuffer(framebuffer));
    }

    fn wait_idle(&self) -> VkResult<()> {
        if let Some(code) = self.fails_at(FailPoint::WaitIdle) {
            return Err(code);
        }
        self.record(PlatformCall::WaitIdle);
        Ok(())
    }
}

impl DeviceProvider for MockDevice {
    fn current_device(&self) -> &dyn PresentationDevice {
        self
    }
}

// ============================================================================
// Log capture
// ============================================================================

/// Logger that stores the entries emitted by the installing thread
///
/// The logger is process-wide, so tests using it must be #[serial]; entries
/// from other test threads are ignored.
pub struct CaptureLogger {
    thread: ThreadId,
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

/// Restores the default logger when dropped
pub struct CaptureGuard;

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        Engine::reset_logger();
    }
}

impl CaptureLogger {
    pub fn install() -> (CaptureGuard, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        Engine::set_logger(CaptureLogger {
            thread: thread::current().id(),
            entries: entries.clone(),
        });
        (CaptureGuard, entries)
    }
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        if thread::current().id() != self.thread {
            return;
        }
        self.entries.lock().unwrap().push(entry.clone());
    }
}
