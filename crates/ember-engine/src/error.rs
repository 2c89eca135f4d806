use std::fmt;
use std::path::PathBuf;

/// Result alias for graphics construction calls.
pub type GfxResult<T> = Result<T, GfxError>;

/// Shader stage a compile diagnostic belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failures reported by graphics construction calls.
///
/// Every variant maps onto a stable numeric code (see [`GfxError::code`]) so
/// tools can keep reporting the historical error taxonomy.
#[derive(thiserror::Error, Debug)]
pub enum GfxError {
    /// Context or backend initialization failed.
    #[error("initialization failed: {0}")]
    Init(String),

    /// An asset file could not be read.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stages compiled but could not be linked into a program/pipeline.
    #[error("shader '{label}' failed to link: {message}")]
    ShaderLink { label: String, message: String },

    /// A shader stage failed to compile.
    #[error("shader '{label}' {stage} stage failed to compile: {message}")]
    ShaderCompile {
        label: String,
        stage: ShaderStage,
        message: String,
    },

    /// The requested framebuffer kind is not supported by the backend.
    #[error("unsupported framebuffer type: {0}")]
    FramebufferUnsupported(String),

    /// The framebuffer could not be completed (for example a zero-sized attachment).
    #[error("framebuffer {width}x{height} is not complete")]
    FramebufferIncomplete { width: u32, height: u32 },

    /// A handle that was never issued or already destroyed was passed in.
    #[error("unknown {0} handle {1}")]
    UnknownHandle(&'static str, u32),

    /// A font could not be parsed or rasterized.
    #[error("font error: {0}")]
    Font(String),
}

impl GfxError {
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    pub fn compile(label: impl Into<String>, stage: ShaderStage, message: impl Into<String>) -> Self {
        Self::ShaderCompile {
            label: label.into(),
            stage,
            message: message.into(),
        }
    }

    pub fn link(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ShaderLink {
            label: label.into(),
            message: message.into(),
        }
    }

    /// Numeric error code.
    pub fn code(&self) -> u32 {
        match self {
            GfxError::Init(_) => 0x10,
            GfxError::FileRead { .. } => 0x20,
            GfxError::ShaderLink { .. } => 0x30,
            GfxError::ShaderCompile { stage: ShaderStage::Vertex, .. } => 0x31,
            GfxError::ShaderCompile { stage: ShaderStage::Fragment, .. } => 0x32,
            GfxError::FramebufferUnsupported(_) => 0x40,
            GfxError::FramebufferIncomplete { .. } => 0x41,
            GfxError::UnknownHandle(..) => 0x50,
            GfxError::Font(_) => 0x60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_taxonomy() {
        assert_eq!(GfxError::init("x").code(), 0x10);
        assert_eq!(GfxError::link("s", "m").code(), 0x30);
        assert_eq!(GfxError::compile("s", ShaderStage::Vertex, "m").code(), 0x31);
        assert_eq!(GfxError::compile("s", ShaderStage::Fragment, "m").code(), 0x32);
        assert_eq!(GfxError::FramebufferUnsupported("depth".into()).code(), 0x40);
        assert_eq!(GfxError::FramebufferIncomplete { width: 0, height: 4 }.code(), 0x41);
    }

    #[test]
    fn file_read_keeps_source() {
        let err = GfxError::FileRead {
            path: PathBuf::from("font.ttf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.code(), 0x20);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("font.ttf"));
    }

    #[test]
    fn compile_message_names_stage() {
        let err = GfxError::compile("crt", ShaderStage::Fragment, "bad token");
        assert_eq!(err.to_string(), "shader 'crt' fragment stage failed to compile: bad token");
    }
}
