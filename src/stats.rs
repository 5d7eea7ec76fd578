//! Scene statistics and the heuristic performance score.
//!
//! - [`SceneStatistics`] counts vertices, triangles and texture memory of a scene
//! - [`PerformanceScore`] turns counts and file size into a 0–100 score, a status and tips
//! - [`PerformanceMetrics`] bundles both for one load
//! - [`StatsPanel`] is the text the viewer's statistics panel shows

use std::fmt;

use crate::data_structures::scene_graph::SceneNode;

const TRIANGLES_HIGH: f64 = 100_000.0;
const TRIANGLES_MODERATE: f64 = 50_000.0;
const FILE_SIZE_HIGH: u64 = 50_000_000;
const FILE_SIZE_MODERATE: u64 = 10_000_000;
const TEXTURE_MEMORY_HIGH: u64 = 50_000_000;
const TEXTURE_MEMORY_MODERATE: u64 = 20_000_000;

/// How many tips the panel shows at most.
pub const DISPLAYED_TIPS: usize = 2;

pub const WELL_OPTIMIZED: &str = "Model is well optimized!";

/// Placeholder shown for stats that could not be computed.
pub const UNAVAILABLE: &str = "N/A";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneStatistics {
    pub vertices: u64,
    /// Index count of indexed geometry plus position count of unindexed geometry.
    pub triangle_elements: u64,
    pub texture_memory: u64,
}

impl SceneStatistics {
    /**
     * Walks every mesh of `scene`. Indexed geometry contributes its index
     * count, unindexed geometry its position count. Every texture slot of
     * every live material adds `width * height * 4` bytes.
     */
    pub fn collect(scene: &dyn SceneNode) -> Self {
        let mut vertices = 0;
        let mut elements = 0;
        let mut texture_memory = 0;
        scene.traverse(&mut |node| {
            let Some(mesh) = node.mesh() else {
                return;
            };
            if let Some(geometry) = &mesh.geometry {
                vertices += geometry.vertex_count();
                elements += geometry.triangle_elements();
            }
            if let Some(material) = &mesh.material {
                texture_memory += material
                    .iter()
                    .flat_map(|m| m.textures())
                    .map(|texture| texture.estimated_bytes())
                    .sum::<u64>();
            }
        });
        Self {
            vertices,
            triangle_elements: elements,
            texture_memory,
        }
    }

    /// Triangle count as scored. Not rounded, so 300 002 elements are over 100 000 triangles.
    pub fn triangles(&self) -> f64 {
        self.triangle_elements as f64 / 3.0
    }

    /// Triangle count as displayed, rounded down.
    pub fn whole_triangles(&self) -> u64 {
        self.triangle_elements / 3
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Good,
    Moderate,
    Poor,
}

impl Status {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Status::Good,
            55.. => Status::Moderate,
            _ => Status::Poor,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Good => "Good",
            Status::Moderate => "Moderate",
            Status::Poor => "Poor",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PerformanceScore {
    pub score: u32,
    pub status: Status,
    /// Every applicable tip, in priority order: triangles, file size, textures.
    pub tips: Vec<&'static str>,
}

impl PerformanceScore {
    pub fn evaluate(triangles: f64, file_size: u64, texture_memory: u64) -> Self {
        let mut penalty = 0;
        let mut tips = Vec::new();

        if triangles > TRIANGLES_HIGH {
            penalty += 30;
            tips.push("Reduce polygon count for better performance");
        } else if triangles > TRIANGLES_MODERATE {
            penalty += 15;
            tips.push("Consider optimizing mesh complexity");
        }

        if file_size > FILE_SIZE_HIGH {
            penalty += 30;
            tips.push("Compress model file to reduce load time");
        } else if file_size > FILE_SIZE_MODERATE {
            penalty += 15;
            tips.push("File size could be optimized");
        }

        if texture_memory > TEXTURE_MEMORY_HIGH {
            penalty += 20;
            tips.push("Reduce texture resolution to improve performance");
        } else if texture_memory > TEXTURE_MEMORY_MODERATE {
            penalty += 10;
            tips.push("Consider texture atlas or compression");
        }

        let score = 100u32.saturating_sub(penalty);
        Self {
            score,
            status: Status::from_score(score),
            tips,
        }
    }

    /// The tips as the panel lists them.
    pub fn display_tips(&self) -> Vec<&'static str> {
        if self.tips.is_empty() {
            vec![WELL_OPTIMIZED]
        } else {
            self.tips.iter().copied().take(DISPLAYED_TIPS).collect()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PerformanceMetrics {
    pub statistics: SceneStatistics,
    pub file_size: u64,
    pub score: PerformanceScore,
}

impl PerformanceMetrics {
    pub fn new(statistics: SceneStatistics, file_size: u64) -> Self {
        let score = PerformanceScore::evaluate(
            statistics.triangles(),
            file_size,
            statistics.texture_memory,
        );
        Self {
            statistics,
            file_size,
            score,
        }
    }
}

/// Formats a byte count as mebibytes with two decimals, e.g. `"12.34 MB"`.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// Formats a count with `,` thousands separators, e.g. `"1,234,567"`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsPanel {
    pub triangles: String,
    pub file_size: String,
    pub texture_memory: String,
    pub score: String,
    pub status: Option<Status>,
    pub tips: Vec<String>,
}

impl Default for StatsPanel {
    fn default() -> Self {
        Self {
            triangles: "-".to_string(),
            file_size: "-".to_string(),
            texture_memory: "-".to_string(),
            score: "-".to_string(),
            status: None,
            tips: Vec::new(),
        }
    }
}

impl StatsPanel {
    pub fn show(&mut self, metrics: &PerformanceMetrics) {
        self.triangles = format_count(metrics.statistics.whole_triangles());
        self.file_size = format_megabytes(metrics.file_size);
        self.texture_memory = format_megabytes(metrics.statistics.texture_memory);
        self.score = metrics.score.score.to_string();
        self.status = Some(metrics.score.status);
        self.tips = metrics
            .score
            .display_tips()
            .into_iter()
            .map(String::from)
            .collect();
    }

    /// Blanks the three measured fields; score, status and tips stay as they were.
    pub fn show_unavailable(&mut self) {
        self.triangles = UNAVAILABLE.to_string();
        self.file_size = UNAVAILABLE.to_string();
        self.texture_memory = UNAVAILABLE.to_string();
    }
}
