//! Loads a model, switches it into a render mode and prints the statistics panel.
//!
//! ```sh
//! cargo run -- path/to/model.glb wireframe
//! ```

use viewer_ngin::{Command, ModelSource, RenderMode, ViewerConfig, ViewerSession, dispatch};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    viewer_ngin::init_logging();

    let mut args = std::env::args().skip(1);
    let config = match std::env::var("VIEWER_CONFIG") {
        Ok(path) => ViewerConfig::load_from_file(path).unwrap_or_else(|e| {
            log::warn!("{}, using defaults", e);
            ViewerConfig::default()
        }),
        Err(_) => ViewerConfig::default(),
    };
    let source = match args.next() {
        Some(url) => ModelSource::upload(url),
        None => config.default_source(),
    };
    let mode = match args.next().map(|name| name.parse::<RenderMode>()) {
        Some(Ok(mode)) => mode,
        Some(Err(e)) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
        None => RenderMode::Pbr,
    };

    let mut session = ViewerSession::new(config);
    dispatch(&mut session, Command::SetRenderMode(mode)).await;
    dispatch(&mut session, Command::LoadModel(source)).await;

    let Some(scene) = session.scene() else {
        eprintln!("model could not be loaded");
        std::process::exit(1);
    };
    println!("meshes:          {}", scene.mesh_count());
    println!("render mode:     {}", session.mode());
    println!("snapshots:       {}", session.cache().len());

    let panel = session.panel();
    println!("triangles:       {}", panel.triangles);
    println!("file size:       {}", panel.file_size);
    println!("texture memory:  {}", panel.texture_memory);
    match panel.status {
        Some(status) => println!("score:           {} ({})", panel.score, status),
        None => println!("score:           {}", panel.score),
    }
    for tip in &panel.tips {
        println!("  - {}", tip);
    }
}
