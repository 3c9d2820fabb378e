use {crate::graphics::backend::ErrorCode, thiserror::Error};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("Unable to get the default display: {0}")]
    NoDisplay(ErrorCode),

    #[error("Unable to initialize the display: {0}")]
    InitializeFailed(ErrorCode),

    #[error("Choosing a pixel-format config failed: {0}")]
    ChooseConfigFailed(ErrorCode),

    #[error("No config matches the requested pixel format")]
    NoMatchingConfig,

    #[error("Unable to create a rendering context: {0}")]
    CreateContextFailed(ErrorCode),

    #[error("Unable to create a window surface for the drawable: {0}")]
    CreateSurfaceFailed(ErrorCode),

    #[error("Unable to make the context current: {0}")]
    MakeCurrentFailed(ErrorCode),

    #[error("Unable to re-bind the lost context: {0}")]
    ContextLost(ErrorCode),

    #[error("Unable to swap buffers: {0}")]
    SwapFailed(ErrorCode),

    #[error("The graphics context is not initialized")]
    NotInitialized,
}
