/// Error check for Vulkan results
///
/// Every platform call made by the presentation chain goes through `check`
/// or `check_with`. A failure is logged once, with the call name, the handle
/// it was issued against and any extra context, then converted to an engine
/// `Error`. Nothing is retried: negotiation is deterministic.

use ash::prelude::VkResult;
use ash::vk::{self, Handle};
use flounder_engine::flounder::Error;
use flounder_engine::engine_error;
use std::fmt;

/// Map a Vulkan error code to the engine taxonomy (no logging)
pub fn to_error(code: vk::Result, call: &str) -> Error {
    match code {
        vk::Result::ERROR_OUT_OF_HOST_MEMORY | vk::Result::ERROR_OUT_OF_DEVICE_MEMORY => Error::OutOfMemory,
        _ => Error::PlatformCallFailed(format!("{}: {:?}", call, code)),
    }
}

/// Log a failed call and convert it
pub fn report<H: Handle>(code: vk::Result, call: &str, target: H, detail: Option<&dyn fmt::Display>) -> Error {
    let target = format!("{:?} {:#x}", H::TYPE, target.as_raw());
    match detail {
        Some(detail) => engine_error!(
            "flounder::vulkan",
            "{} failed on {}: {:?} [{}]",
            call, target, code, detail
        ),
        None => engine_error!("flounder::vulkan", "{} failed on {}: {:?}", call, target, code),
    }
    to_error(code, call)
}

/// Check a call result issued against `target`
pub fn check<T, H: Handle>(result: VkResult<T>, call: &str, target: H) -> Result<T, Error> {
    result.map_err(|code| report(code, call, target, None))
}

/// Check a call result, attaching `detail` (e.g. the rejected configuration) to the diagnostic
pub fn check_with<T, H: Handle>(
    result: VkResult<T>,
    call: &str,
    target: H,
    detail: &dyn fmt::Display,
) -> Result<T, Error> {
    result.map_err(|code| report(code, call, target, Some(detail)))
}

#[cfg(test)]
#[path = "vulkan_error_tests.rs"]
mod tests;
