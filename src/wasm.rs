use crate::algorithm::{AlgorithmDynamic, SpatialAlgorithm, Strategy};
use crate::config::VoronoiConfig;
use crate::error::VoronoiError;
use crate::voronoi::{InputEvent, Voronoi};
use js_sys::Uint32Array;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

fn to_js(e: VoronoiError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM wrapper around a raster Voronoi diagram.
///
/// Every mutating call redraws the full buffer before returning, so `pixels`
/// can be uploaded to a canvas right away.
#[wasm_bindgen(js_name = VoronoiRaster)]
pub struct VoronoiRasterWASM {
    inner: Voronoi<AlgorithmDynamic>,
}

#[wasm_bindgen(js_class = VoronoiRaster)]
impl VoronoiRasterWASM {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, max_sites: usize) -> Result<VoronoiRasterWASM, JsValue> {
        Self::with_config(VoronoiConfig::new(width, height, max_sites))
    }

    /// Builds a diagram from a JSON `VoronoiConfig`.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> Result<VoronoiRasterWASM, JsValue> {
        Self::with_config(VoronoiConfig::from_json_str(json).map_err(to_js)?)
    }

    /// Switches between the K-d tree (`true`) and the linear scan (`false`).
    pub fn use_kdtree(&mut self, enabled: bool) {
        let strategy = if enabled { Strategy::KdTree } else { Strategy::BruteForce };
        if self.inner.algorithm().strategy() != strategy {
            self.inner.set_algorithm(AlgorithmDynamic::new(strategy));
        }
    }

    /// Places a site, returning `false` if it was rejected.
    pub fn add_site(&mut self, x: i32, y: i32) -> bool {
        self.inner.handle(InputEvent::AddSite { x, y })
    }

    pub fn regenerate(&mut self, count: usize) {
        self.inner.handle(InputEvent::Regenerate(count));
    }

    pub fn toggle_animation(&mut self) {
        self.inner.handle(InputEvent::ToggleAnimation);
    }

    pub fn toggle_sites(&mut self) {
        self.inner.handle(InputEvent::ToggleSites);
    }

    /// Advances the animation by one frame. Returns `true` if the buffer changed.
    pub fn tick(&mut self) -> bool {
        self.inner.handle(InputEvent::Tick)
    }

    pub fn import_sites(&mut self, text: &str) -> Result<(), JsValue> {
        self.inner.import_sites_from(text.as_bytes()).map_err(to_js)?;
        let show = self.inner.shows_sites();
        self.inner.draw(show);
        Ok(())
    }

    pub fn export_sites(&self) -> Result<String, JsValue> {
        let mut out = Vec::new();
        self.inner.export_sites_to(&mut out).map_err(to_js)?;
        String::from_utf8(out).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    #[wasm_bindgen(getter)]
    pub fn count_sites(&self) -> usize {
        self.inner.site_count()
    }

    #[wasm_bindgen(getter)]
    pub fn animating(&self) -> bool {
        self.inner.is_animating()
    }

    /// Flat `[x, y, x, y, ...]` site positions.
    #[wasm_bindgen(getter)]
    pub fn sites(&self) -> Vec<i32> {
        self.inner.sites().iter().flat_map(|s| s.position()).collect()
    }

    /// A copy of the packed `0xAARRGGBB` pixel buffer, row-major.
    #[wasm_bindgen(getter)]
    pub fn pixels(&self) -> Uint32Array {
        Uint32Array::from(self.inner.pixels())
    }

    /// Color of the site nearest to (`x`, `y`), if there is one.
    pub fn nearest_color(&self, x: i32, y: i32) -> Option<u32> {
        self.inner.algorithm().nearest(self.inner.sites(), [x, y]).map(|n| n.color)
    }
}

impl VoronoiRasterWASM {
    fn with_config(config: VoronoiConfig) -> Result<VoronoiRasterWASM, JsValue> {
        let inner = Voronoi::new(config, AlgorithmDynamic::new(Strategy::KdTree)).map_err(to_js)?;
        Ok(VoronoiRasterWASM { inner })
    }
}
