use thiserror::Error;

/// Failures the viewer classifies. Loader plumbing carries these inside
/// `anyhow::Error`, so callers can still downcast to them.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("unknown render mode `{0}`, expected one of pbr, solid, wireframe, normals, matcap")]
    UnknownRenderMode(String),

    #[error("invalid light colour `{0}`, expected #rrggbb")]
    InvalidLightColor(String),

    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("failed to parse model: {0}")]
    Parse(#[from] gltf::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
