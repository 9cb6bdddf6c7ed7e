use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Slide-deck document model: an ordered list of slides, each holding shapes
/// that carry a text frame, a table, or a picture. Serialized as JSON; the
/// external converter turns the filled deck into a fixed-layout document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Deck {
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Slide {
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Shape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_frame: Option<TextFrame>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<Picture>,
}

impl Shape {
    pub fn picture(path: &str, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            picture: Some(Picture {
                path: path.to_string(),
                x,
                y,
                width,
                height,
            }),
            ..Self::default()
        }
    }
}

/// Text content of a shape. Paragraphs are newline-separated; alignment,
/// size and color apply to the whole frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextFrame {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Justify,
}

/// A table addressed by fixed (row, column) indices.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub cells: Vec<Vec<String>>,
}

impl Table {
    /// Writes one cell, returning false when the position is out of range.
    pub fn set_cell(&mut self, row: usize, col: usize, text: impl Into<String>) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = text.into();
                true
            }
            None => false,
        }
    }
}

/// An embedded image, positioned in inches from the slide's top-left corner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Picture {
    pub path: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Deck {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| AppError::Template(format!("invalid deck template {}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Template(format!("failed to serialize deck: {e}")))?;
        fs::write(path, raw)?;
        Ok(())
    }
}
