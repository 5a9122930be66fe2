//! Canvas that records draw calls instead of rendering them
//!
//! Used by the headless simulator and by tests.

use glam::Vec2;

use super::{Canvas, DrawParams, ImageHandle, Rgba};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Image {
        image: ImageHandle,
        pos: Vec2,
        params: DrawParams,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgba,
    },
    Text {
        text: String,
        pos: Vec2,
    },
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn draw_image(&mut self, image: ImageHandle, pos: Vec2, params: DrawParams) {
        self.commands.push(DrawCommand::Image { image, pos, params });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, _color: Rgba) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
        });
    }
}
