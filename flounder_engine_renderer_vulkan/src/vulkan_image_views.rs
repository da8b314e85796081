/// Image views and framebuffers over swapchain images
///
/// One view per image and one framebuffer per view, index-aligned:
/// `views[i]` wraps `images[i]` and `framebuffers[i]` attaches `views[i]`.
/// Both builders are all-or-nothing; on failure the handles created so far
/// are destroyed before the error is returned.

use ash::vk;
use flounder_engine::flounder::Result;
use flounder_engine::engine_trace;

use crate::vulkan_error::check;
use crate::vulkan_platform::PresentationDevice;

/// Create a 2D color view (identity swizzle, one mip, one layer) for each image
pub fn create_image_views(
    device: &dyn PresentationDevice,
    images: &[vk::Image],
    format: vk::Format,
) -> Result<Vec<vk::ImageView>> {
    let mut views = Vec::with_capacity(images.len());

    for (index, &image) in images.iter().enumerate() {
        let create_info = vk::ImageViewCreateInfo::default()
            .image(image)
            .view_type(vk::ImageViewType::TYPE_2D)
            .format(format)
            .components(vk::ComponentMapping {
                r: vk::ComponentSwizzle::IDENTITY,
                g: vk::ComponentSwizzle::IDENTITY,
                b: vk::ComponentSwizzle::IDENTITY,
                a: vk::ComponentSwizzle::IDENTITY,
            })
            .subresource_range(vk::ImageSubresourceRange {
                aspect_mask: vk::ImageAspectFlags::COLOR,
                base_mip_level: 0,
                level_count: 1,
                base_array_layer: 0,
                layer_count: 1,
            });

        match check(device.create_image_view(&create_info), "vkCreateImageView", image) {
            Ok(view) => {
                engine_trace!("flounder::vulkan::swapchain", "Image view {} created", index);
                views.push(view);
            }
            Err(err) => {
                for view in views {
                    device.destroy_image_view(view);
                }
                return Err(err);
            }
        }
    }

    Ok(views)
}

/// Create one framebuffer per view, each with that view as its only attachment
pub fn create_framebuffers(
    device: &dyn PresentationDevice,
    render_pass: vk::RenderPass,
    views: &[vk::ImageView],
    extent: vk::Extent2D,
) -> Result<Vec<vk::Framebuffer>> {
    let mut framebuffers = Vec::with_capacity(views.len());

    for (index, view) in views.iter().enumerate() {
        let attachments = [*view];
        let create_info = vk::FramebufferCreateInfo::default()
            .render_pass(render_pass)
            .attachments(&attachments)
            .width(extent.width)
            .height(extent.height)
            .layers(1);

        match check(device.create_framebuffer(&create_info), "vkCreateFramebuffer", *view) {
            Ok(framebuffer) => {
                engine_trace!("flounder::vulkan::swapchain", "Framebuffer {} created", index);
                framebuffers.push(framebuffer);
            }
            Err(err) => {
                for framebuffer in framebuffers {
                    device.destroy_framebuffer(framebuffer);
                }
                return Err(err);
            }
        }
    }

    Ok(framebuffers)
}

#[cfg(test)]
#[path = "vulkan_image_views_tests.rs"]
mod tests;
