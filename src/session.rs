//! The state of one viewer instance.
//!
//! A [`ViewerSession`] owns the current model and everything derived from it:
//! the material snapshots, the active render mode, lighting and the statistics
//! panel. It is mutated only through [`ViewerSession::handle`].

use std::path::PathBuf;

use futures::future::LocalBoxFuture;
use instant::Instant;

use crate::{
    cache::MaterialCache,
    config::ViewerConfig,
    data_structures::scene_graph::SceneNode,
    flow::{Command, Out},
    lighting::Lighting,
    render_mode::{RenderMode, RenderModeApplier},
    resources::{load_model_gltf, texture::load_binary},
    stats::{PerformanceMetrics, SceneStatistics, StatsPanel},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// One of the models shipped with the viewer.
    Preset,
    /// A file picked by the user, usually an object URL.
    Upload,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelSource {
    pub url: String,
    pub kind: SourceKind,
}

impl ModelSource {
    pub fn preset(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: SourceKind::Preset,
        }
    }

    pub fn upload(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: SourceKind::Upload,
        }
    }
}

#[derive(Debug)]
pub struct ViewerSession {
    config: ViewerConfig,
    applier: RenderModeApplier,
    cache: MaterialCache,
    mode: RenderMode,
    source: Option<ModelSource>,
    scene: Option<Box<dyn SceneNode>>,
    lighting: Lighting,
    panel: StatsPanel,
    metrics: Option<PerformanceMetrics>,
    progress: Option<f32>,
    generation: u64,
    load_started: Option<Instant>,
}

impl ViewerSession {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            applier: RenderModeApplier::new(config.capabilities),
            lighting: Lighting::new(config.lighting),
            config,
            cache: MaterialCache::new(),
            mode: RenderMode::default(),
            source: None,
            scene: None,
            panel: StatsPanel::default(),
            metrics: None,
            progress: None,
            generation: 0,
            load_started: None,
        }
    }

    pub fn handle(&mut self, command: Command) -> Out {
        match command {
            Command::LoadModel(source) => self.load_model(source),
            Command::Progress(progress) => {
                self.on_progress(progress);
                Out::Empty
            }
            Command::ModelLoaded { generation, scene } => self.on_model_loaded(generation, scene),
            Command::LoadFailed { generation, error } => {
                self.on_load_failed(generation, error);
                Out::Empty
            }
            Command::FileSizeMeasured {
                generation,
                file_size,
            } => {
                self.on_file_size_measured(generation, file_size);
                Out::Empty
            }
            Command::SetRenderMode(mode) => {
                self.set_render_mode(mode);
                Out::Empty
            }
            Command::SetExposure(exposure) => {
                self.lighting.exposure = exposure;
                Out::Empty
            }
            Command::SetShadowIntensity(intensity) => {
                self.lighting.shadow_intensity = intensity;
                Out::Empty
            }
            Command::SetLightIntensity(intensity) => {
                self.lighting.light_intensity = intensity;
                Out::Empty
            }
            Command::SetLightColor(color) => {
                self.lighting.set_light_color(color);
                Out::Empty
            }
            Command::Reset => {
                self.lighting.reset(self.config.lighting);
                self.set_render_mode(RenderMode::Pbr);
                Out::Empty
            }
        }
    }

    /// Starts loading the configured default model.
    pub fn open_default(&mut self) -> Out {
        let source = self.config.default_source();
        self.handle(Command::LoadModel(source))
    }

    fn load_model(&mut self, source: ModelSource) -> Out {
        self.generation += 1;
        self.cache.clear();
        self.progress = Some(0.0);
        self.load_started = Some(Instant::now());
        self.source = Some(source.clone());
        log::info!("Loading {} (load #{})", source.url, self.generation);

        let generation = self.generation;
        let assets_dir = self.config.assets_dir.clone();
        Out::FutEvent(vec![Box::pin(async move {
            match load_model_gltf(&source.url, &assets_dir).await {
                Ok(scene) => Command::ModelLoaded { generation, scene },
                Err(error) => Command::LoadFailed { generation, error },
            }
        })])
    }

    fn on_progress(&mut self, progress: f32) {
        if progress.is_nan() {
            log::warn!("Ignoring NaN load progress");
            return;
        }
        self.progress = Some(progress.clamp(0.0, 1.0));
    }

    fn is_current(&self, generation: u64, what: &str) -> bool {
        if generation != self.generation {
            log::debug!(
                "Dropping {} of load #{}, load #{} is current",
                what,
                generation,
                self.generation
            );
            return false;
        }
        true
    }

    fn on_model_loaded(&mut self, generation: u64, scene: Box<dyn SceneNode>) -> Out {
        if !self.is_current(generation, "model") {
            return Out::Empty;
        }
        self.progress = None;
        if let Some(started) = self.load_started.take() {
            log::info!("Model of load #{} ready after {:?}", generation, started.elapsed());
        }

        let scene = self.scene.insert(scene);
        self.cache.capture(&**scene);
        self.applier
            .apply(self.mode, &mut **scene, &self.cache, &mut self.lighting);

        match &self.source {
            Some(source) => Out::FutEvent(vec![measure_file_size(
                generation,
                source.url.clone(),
                self.config.assets_dir.clone(),
            )]),
            None => Out::Empty,
        }
    }

    fn on_load_failed(&mut self, generation: u64, error: anyhow::Error) {
        if !self.is_current(generation, "load error") {
            return;
        }
        self.progress = None;
        self.load_started = None;
        log::error!("Could not load model: {:#}", error);
    }

    fn on_file_size_measured(&mut self, generation: u64, file_size: anyhow::Result<u64>) {
        if !self.is_current(generation, "file size") {
            return;
        }
        match (file_size, self.scene.as_deref()) {
            (Ok(file_size), Some(scene)) => {
                let metrics = PerformanceMetrics::new(SceneStatistics::collect(scene), file_size);
                log::info!(
                    "{} triangles, {} vertices, score {} ({})",
                    metrics.statistics.whole_triangles(),
                    metrics.statistics.vertices,
                    metrics.score.score,
                    metrics.score.status
                );
                self.panel.show(&metrics);
                self.metrics = Some(metrics);
            }
            (Ok(_), None) => log::warn!("File size measured but no model is loaded"),
            (Err(e), _) => {
                log::error!("Error calculating statistics: {:#}", e);
                self.panel.show_unavailable();
            }
        }
    }

    /**
     * Makes `mode` current and applies it to the loaded model, if any. Without
     * a model the mode is deliberately remembered rather than dropped, and
     * gets applied when the next model arrives.
     */
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
        if let Some(scene) = self.scene.as_deref_mut() {
            self.applier
                .apply(mode, scene, &self.cache, &mut self.lighting);
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn source(&self) -> Option<&ModelSource> {
        self.source.as_ref()
    }

    /// The preset currently shown, `None` for uploads.
    pub fn active_preset(&self) -> Option<&str> {
        self.source
            .as_ref()
            .filter(|source| source.kind == SourceKind::Preset)
            .map(|source| source.url.as_str())
    }

    pub fn scene(&self) -> Option<&dyn SceneNode> {
        self.scene.as_deref()
    }

    /// For the renderer, which clears dirty flags after uploading materials.
    pub fn scene_mut(&mut self) -> Option<&mut (dyn SceneNode + 'static)> {
        self.scene.as_deref_mut()
    }

    pub fn cache(&self) -> &MaterialCache {
        &self.cache
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn panel(&self) -> &StatsPanel {
        &self.panel
    }

    pub fn metrics(&self) -> Option<&PerformanceMetrics> {
        self.metrics.as_ref()
    }

    /// `Some` while a load is in flight.
    pub fn progress(&self) -> Option<f32> {
        self.progress
    }

    /// Number of the latest load; results tagged with an older one are ignored.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }
}

fn measure_file_size(
    generation: u64,
    url: String,
    assets_dir: PathBuf,
) -> LocalBoxFuture<'static, Command> {
    Box::pin(async move {
        let file_size = load_binary(&url, &assets_dir)
            .await
            .map(|bytes| bytes.len() as u64);
        Command::FileSizeMeasured {
            generation,
            file_size,
        }
    })
}
