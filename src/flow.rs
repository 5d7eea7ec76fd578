//! Command dispatch into a viewer session.
//!
//! All state of a viewer lives in a [`ViewerSession`]. UI events, load results
//! and timers reach it as [`Command`]s, one at a time. A handler never awaits;
//! when it needs I/O it hands back futures inside an [`Out`], and whoever drives
//! the session awaits them and feeds the commands they resolve to back in.
//!
//! # Lifecycle of a load
//!
//! 1. `LoadModel` clears the material cache and emits the load future
//! 2. the load future resolves to `ModelLoaded` (or `LoadFailed`)
//! 3. `ModelLoaded` snapshots materials, re-applies the current render mode and
//!    emits the file size future
//! 4. `FileSizeMeasured` recomputes the statistics panel
//!
//! Each load is numbered. Results that belong to an older load than the
//! session's current one are dropped.

use std::collections::VecDeque;

use futures::future::LocalBoxFuture;

use crate::{
    data_structures::scene_graph::SceneNode,
    lighting::LightColor,
    render_mode::RenderMode,
    session::{ModelSource, ViewerSession},
};

#[derive(Debug)]
pub enum Command {
    LoadModel(ModelSource),
    /// Download progress of the current load in `0.0..=1.0`.
    Progress(f32),
    ModelLoaded {
        generation: u64,
        scene: Box<dyn SceneNode>,
    },
    LoadFailed {
        generation: u64,
        error: anyhow::Error,
    },
    FileSizeMeasured {
        generation: u64,
        file_size: anyhow::Result<u64>,
    },
    SetRenderMode(RenderMode),
    SetExposure(f32),
    SetShadowIntensity(f32),
    SetLightIntensity(f32),
    SetLightColor(LightColor),
    /// Lighting back to defaults and render mode back to `pbr`.
    Reset,
}

///
/// Output of [`ViewerSession::handle`].
///
/// `Out::FutEvent` holds futures that each resolve to a command which has to
/// be handed back to the same session. The futures are not `Send`, so they can
/// run on a browser's single thread.
///
/// `Empty` is returned when the command needs no follow-up.
///
#[derive(Default)]
pub enum Out {
    FutEvent(Vec<LocalBoxFuture<'static, Command>>),
    #[default]
    Empty,
}

impl std::fmt::Debug for Out {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Out::FutEvent(futures) => write!(f, "FutEvent({} pending)", futures.len()),
            Out::Empty => f.write_str("Empty"),
        }
    }
}

/**
 * Handles `command` and every command its follow-up futures resolve to, until
 * nothing is pending. Futures are awaited one after another in the order they
 * were emitted.
 */
pub async fn dispatch(session: &mut ViewerSession, command: Command) {
    let mut pending = VecDeque::from([command]);
    while let Some(command) = pending.pop_front() {
        match session.handle(command) {
            Out::FutEvent(futures) => {
                for future in futures {
                    pending.push_back(future.await);
                }
            }
            Out::Empty => (),
        }
    }
}

/// Installs the platform logger: `env_logger` natively, the browser console on wasm.
pub fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if console_log::init_with_level(log::Level::Info).is_err() {
            log::warn!("A logger was already installed");
        }
    }
}
