//! viewer-ngin
//!
//! The control panel side of a glTF model viewer that runs natively and in the
//! browser. It loads `.glb`/`.gltf` assets into a scene graph, switches render
//! modes without reloading the asset, tracks lighting attributes and scores how
//! heavy a model is. Drawing the scene is left to the host renderer.
//!
//! High-level modules
//! - `cache`: snapshots of each mesh's materials as loaded
//! - `config`: viewer configuration with TOML support
//! - `data_structures`: scene graph, materials, geometry, textures
//! - `flow`: commands, handler output and the async dispatch loop
//! - `lighting`: environment, exposure, shadow and colour attributes
//! - `render_mode`: the five render modes and the applier that restyles a scene
//! - `resources`: reading asset bytes and parsing glTF
//! - `session`: the state of one viewer instance
//! - `stats`: scene statistics, performance score and panel text
//!

pub mod cache;
pub mod config;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod lighting;
pub mod render_mode;
pub mod resources;
pub mod session;
pub mod stats;

// Re-exports commonly used types for convenience in downstream code.
pub use cache::{MaterialCache, MaterialSnapshot};
pub use config::ViewerConfig;
pub use error::ViewerError;
pub use flow::{Command, Out, dispatch, init_logging};
pub use render_mode::{RenderCapabilities, RenderMode, RenderModeApplier};
pub use session::{ModelSource, ViewerSession};
