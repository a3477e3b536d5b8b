use super::types::ShaderStage;

/// Failure of one step of graphics context construction.
///
/// Every variant is fatal for the construction attempt that produced it.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum InitError {
    #[error("GPU device couldn't be created")]
    DeviceUnavailable,

    #[error("presentation surface couldn't be configured: {0}")]
    SurfaceConfigurationFailed(String),

    #[error("GPU device couldn't create a buffer")]
    BufferAllocationFailed,

    #[error("GPU device couldn't create a library")]
    LibraryLoadFailed,

    #[error("GPU device couldn't create a {stage} function `{name}`")]
    ShaderFunctionNotFound { stage: ShaderStage, name: String },

    #[error("render pipeline state failed validation: {0}")]
    PipelineValidationFailed(String),

    #[error("GPU device couldn't create a command queue")]
    QueueCreationFailed,
}

/// High-level response after a drawable could not be acquired.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Resources are exhausted (commonly OOM).
    Fatal,
}

/// Reason a frame was dropped. None of these are propagated past the frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum FrameSkip {
    #[error("no drawable available ({0:?})")]
    DrawableUnavailable(SurfaceErrorAction),

    #[error("command queue couldn't create a command buffer")]
    CommandBufferUnavailable,

    #[error("command buffer couldn't create a render command encoder")]
    EncoderUnavailable,
}
