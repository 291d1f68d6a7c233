//! Application layers
//!
//! Layers are how functionality is added to an application. The stack keeps
//! two segments: regular layers first, then overlays. Update and render walk
//! the stack front to back, so overlays always run after every regular layer.

/// A unit of per-frame application behaviour.
pub trait Layer {
    /// Name used to find the layer again and in log output
    fn name(&self) -> &str {
        "Layer"
    }

    /// Called when the layer is added to a stack
    fn on_push(&mut self) {}

    /// Called when the layer is removed from a stack, or the stack is dropped
    fn on_pop(&mut self) {}

    /// Called once per frame with the scaled delta time in seconds
    fn on_update(&mut self, _dt: f64) {}

    /// Called once per frame after every layer has updated
    fn on_render(&mut self, _dt: f64) {}
}

/// Ordered collection of layers and overlays.
#[derive(Default)]
pub struct LayerStack {
    layers: Vec<Box<dyn Layer>>,
    /// Number of regular layers; overlays start at this index.
    overlay_start: usize,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a layer after all existing layers but before any overlay.
    pub fn push_layer(&mut self, mut layer: Box<dyn Layer>) {
        layer.on_push();
        tracing::debug!("Pushed layer '{}'", layer.name());
        self.layers.insert(self.overlay_start, layer);
        self.overlay_start += 1;
    }

    /// Append an overlay on top of everything.
    pub fn push_overlay(&mut self, mut overlay: Box<dyn Layer>) {
        overlay.on_push();
        tracing::debug!("Pushed overlay '{}'", overlay.name());
        self.layers.push(overlay);
    }

    /// Remove the first regular layer called `name`. Overlays are not searched.
    pub fn pop_layer(&mut self, name: &str) -> Option<Box<dyn Layer>> {
        let index = self.layers[..self.overlay_start]
            .iter()
            .position(|l| l.name() == name)?;
        let mut layer = self.layers.remove(index);
        self.overlay_start -= 1;
        layer.on_pop();
        Some(layer)
    }

    /// Remove the first overlay called `name`. Regular layers are not searched.
    pub fn pop_overlay(&mut self, name: &str) -> Option<Box<dyn Layer>> {
        let offset = self.layers[self.overlay_start..]
            .iter()
            .position(|l| l.name() == name)?;
        let mut overlay = self.layers.remove(self.overlay_start + offset);
        overlay.on_pop();
        Some(overlay)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &dyn Layer> {
        self.layers.iter().map(|l| &**l)
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut Box<dyn Layer>> {
        self.layers.iter_mut()
    }

    /// Total number of layers and overlays
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of overlays
    pub fn overlay_count(&self) -> usize {
        self.layers.len() - self.overlay_start
    }
}

impl Drop for LayerStack {
    fn drop(&mut self) {
        for layer in &mut self.layers {
            layer.on_pop();
        }
    }
}
