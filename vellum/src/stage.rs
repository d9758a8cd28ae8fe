use crate::{Component, Container, Size};

/// The root of a component tree and its frame driver.
///
/// Each [`Stage::frame`] runs the pending update actions of the whole tree, then validates it
/// bottom-up. Nothing is drawn; a backend walks the validated tree afterwards.
#[derive(Debug)]
pub struct Stage {
    root: Container,
    size: Size,
    frames: u64,
}

impl Stage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            root: Container::with_size(width, height),
            size: Size::new(width, height),
            frames: 0,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Size::new(width, height);
        self.root.resize(width, height);
    }

    pub fn root(&self) -> &Container {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Container {
        &mut self.root
    }

    pub fn add_child(&mut self, child: Box<dyn Component>) {
        self.root.add_child(child);
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn frame(&mut self, now_ms: u64) {
        self.frames += 1;
        vtrace!(frame = self.frames, now_ms, "frame");
        self.root.update(now_ms);
        self.root.render();
    }
}
