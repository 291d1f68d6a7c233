//! Headless application loop
//!
//! Drives a [`LayerStack`] once per frame. Windowing and rendering backends
//! are not part of this crate; a frontend that owns a window pumps its events
//! and then calls [`Application::frame`] itself.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use tracing::info;

use crate::config::{AppConfig, EngineConfig};
use crate::layer::{Layer, LayerStack};
use crate::time::{FramePacer, GameTime};

/// Cloneable flag that asks a running [`Application`] to stop after the
/// current frame.
#[derive(Debug, Clone, Default)]
pub struct QuitHandle(Rc<Cell<bool>>);

impl QuitHandle {
    pub fn request(&self) {
        self.0.set(true);
    }

    pub fn is_requested(&self) -> bool {
        self.0.get()
    }
}

pub struct Application {
    config: AppConfig,
    layers: LayerStack,
    time: GameTime,
    pacer: FramePacer,
    quit: QuitHandle,
}

impl Application {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.app.clone(),
            layers: LayerStack::new(),
            time: GameTime::new(config.time.clone()),
            pacer: FramePacer::new(config.app.target_fps),
            quit: QuitHandle::default(),
        }
    }

    pub fn push_layer<L: Layer + 'static>(&mut self, layer: L) {
        self.layers.push_layer(Box::new(layer));
    }

    pub fn push_overlay<L: Layer + 'static>(&mut self, overlay: L) {
        self.layers.push_overlay(Box::new(overlay));
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerStack {
        &mut self.layers
    }

    pub fn time(&self) -> &GameTime {
        &self.time
    }

    /// A handle layers can keep to stop the loop
    pub fn quit_handle(&self) -> QuitHandle {
        self.quit.clone()
    }

    /// Advance one frame: update every layer in stack order, then render them.
    pub fn frame(&mut self, raw_delta: f64) {
        self.time.update(raw_delta);
        let dt = self.time.delta_time;
        for layer in self.layers.iter_mut() {
            layer.on_update(dt);
        }
        for layer in self.layers.iter_mut() {
            layer.on_render(dt);
        }
    }

    fn frame_limit_reached(&self) -> bool {
        self.config
            .max_frames
            .is_some_and(|max| self.time.frame_count >= max)
    }

    /// Run frames until quit is requested or `max_frames` is reached.
    pub fn run(&mut self) {
        info!(
            "Starting '{}' ({} layers, target {} fps)",
            self.config.name,
            self.layers.len(),
            self.config.target_fps
        );

        let started = Instant::now();
        let mut last = started;
        while !self.quit.is_requested() && !self.frame_limit_reached() {
            let frame_start = Instant::now();
            let raw_delta = frame_start.duration_since(last).as_secs_f64();
            last = frame_start;

            self.frame(raw_delta);
            self.pacer.wait(frame_start);
        }

        info!(
            "'{}' stopped after {} frames in {:.2}s",
            self.config.name,
            self.time.frame_count,
            started.elapsed().as_secs_f64()
        );
    }
}
