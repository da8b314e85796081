/*!
# Flounder Engine

Core types for the Flounder rendering engine.

This crate holds the platform-agnostic pieces shared by every backend:
the engine error type, the engine logger and its macros, and the window
collaborator used when negotiating a presentation surface.

## Architecture

- **Error / Result**: fail-fast error taxonomy for GPU resource negotiation
- **Engine**: process-wide logger registry (custom loggers, severity filter)
- **WindowSizeSource**: on-demand window pixel size for swapchain extent selection

Backend crates (e.g. `flounder_engine_renderer_vulkan`) build on these types.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod window;

// Main flounder namespace module
pub mod flounder {
    // Error types
    pub use crate::error::{Error, Result};

    // Logger registry
    pub use crate::engine::Engine;

    // Window collaborator
    pub use crate::window::WindowSizeSource;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        // Note: engine_* macros are exported at the crate root by #[macro_export]
    }
}
