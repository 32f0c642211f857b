pub mod config;
pub mod controller;
pub mod displace;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod noise;
pub mod panel;
pub mod preset;
pub mod rng;
pub mod scene;
pub mod server;
pub mod store;
pub mod texture;

use std::time::Instant;

use config::SceneConfig;
use controller::Controller;
use frame::Blob;
use scene::Scene;
use store::KeyValueStore;

/// Top-level owner of everything mutable: parameters and presets (via the
/// controller), the blob geometry, and the render-side scene.
pub struct App {
    pub controller: Controller,
    pub blob: Blob,
    pub scene: Scene,
}

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

impl App {
    /// Build geometry, load presets and apply the starting preset.
    pub fn new(config: &SceneConfig, store: Box<dyn KeyValueStore>) -> (Self, Vec<Timing>) {
        let mut timings = Vec::new();

        let t = Instant::now();
        let mut controller = Controller::new(store, &config.default_preset);
        timings.push(Timing {
            name: "presets",
            ms: t.elapsed().as_secs_f64() * 1000.0,
        });

        let t = Instant::now();
        let blob = Blob::new(config);
        timings.push(Timing {
            name: "geometry",
            ms: t.elapsed().as_secs_f64() * 1000.0,
        });

        let mut scene = Scene::new(controller.params());
        let start = controller.active().to_string();
        controller.apply_preset(&start, &mut scene);

        (
            Self {
                controller,
                blob,
                scene,
            },
            timings,
        )
    }

    /// One frame: displace both representations and submit them.
    pub fn tick(&mut self, dt: f32) {
        self.blob.tick(dt, self.controller.params(), &mut self.scene);
    }
}
