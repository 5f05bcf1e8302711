use crate::color::{BLACK, DEFAULT_PALETTE};
use crate::error::{Result, VoronoiError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a new site picks its color from the palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteMode {
    /// Uniformly random palette entry.
    #[default]
    Random,
    /// Palette entries in order, wrapping around.
    Rotate,
}

/// Fixed parameters of a diagram, supplied once at construction.
///
/// Every field has a default, so a JSON config only needs the fields it changes:
///
/// ```json
/// { "width": 320, "height": 200, "max_sites": 64, "seed": 7 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoronoiConfig {
    /// Grid width in pixels.
    pub width: u32,
    /// Grid height in pixels.
    pub height: u32,
    /// Maximum number of sites the store accepts.
    pub max_sites: usize,
    /// Radius of the disc drawn over each site.
    pub site_radius: i32,
    /// Color of the site markers.
    pub site_color: u32,
    /// Colors handed out to new sites. Must not be empty.
    pub palette: Vec<u32>,
    pub palette_mode: PaletteMode,
    /// Seed for site placement, velocities and colors. Entropy when unset.
    pub seed: Option<u64>,
}

impl Default for VoronoiConfig {
    fn default() -> Self {
        VoronoiConfig {
            width: 800,
            height: 600,
            max_sites: 1000,
            site_radius: 3,
            site_color: BLACK,
            palette: DEFAULT_PALETTE.to_vec(),
            palette_mode: PaletteMode::Random,
            seed: None,
        }
    }
}

impl VoronoiConfig {
    pub fn new(width: u32, height: u32, max_sites: usize) -> Self {
        VoronoiConfig { width, height, max_sites, ..Default::default() }
    }

    pub fn with_palette(mut self, palette: Vec<u32>, mode: PaletteMode) -> Self {
        self.palette = palette;
        self.palette_mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_markers(mut self, radius: i32, color: u32) -> Self {
        self.site_radius = radius;
        self.site_color = color;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(VoronoiError::InvalidConfig("width and height must be positive"));
        }
        if self.width > i32::MAX as u32 || self.height > i32::MAX as u32 {
            return Err(VoronoiError::InvalidConfig("width and height must fit in an i32"));
        }
        if self.max_sites == 0 {
            return Err(VoronoiError::InvalidConfig("max_sites must be positive"));
        }
        if self.site_radius < 0 {
            return Err(VoronoiError::InvalidConfig("site_radius must not be negative"));
        }
        if self.palette.is_empty() {
            return Err(VoronoiError::InvalidConfig("palette must not be empty"));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: VoronoiConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Number of pixels in the grid.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
