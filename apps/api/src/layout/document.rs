//! Document model consumed by the layout pass.
//!
//! A `Document` is built once from report data, flowed once top to bottom and
//! then dropped. Nothing here is mutated during layout.

use serde::{Deserialize, Serialize};

use crate::layout::text_measure::TextInput;

// ────────────────────────────────────────────────────────────────────────────
// Style
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Text style. The field set is closed; renderers receive exactly these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub font_size_pt: f32,
    pub color: Rgb,
    pub weight: FontWeight,
    pub align: Align,
}

impl Style {
    pub const fn new(font_size_pt: f32, color: Rgb) -> Self {
        Self {
            font_size_pt,
            color,
            weight: FontWeight::Normal,
            align: Align::Left,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub const fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document tree
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub title: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub heading: Option<String>,
    pub blocks: Vec<Block>,
    /// Vertical space added after the last block.
    pub gap_after: f32,
}

impl Section {
    pub fn new(heading: Option<String>) -> Self {
        Self {
            heading,
            blocks: Vec::new(),
            gap_after: 0.0,
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }
}

/// One semantic unit of content. Its lines may still split across pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    /// Fixed gap added to the cursor once the block has been flowed.
    pub gap_after: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph {
        text: TextInput,
        indent: f32,
        style: Style,
    },
    ListItem {
        text: String,
        indent: f32,
        style: Style,
    },
    KeyValue {
        key: String,
        value: String,
        indent: f32,
        style: Style,
    },
    Divider {
        color: Rgb,
    },
    ClauseEntry {
        index: usize,
        title: String,
        explanation: String,
        risk: Option<String>,
        improvement: Option<String>,
    },
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            gap_after: 0.0,
        }
    }

    pub fn paragraph(text: impl Into<TextInput>, indent: f32, style: Style) -> Self {
        Self::new(BlockKind::Paragraph {
            text: text.into(),
            indent,
            style,
        })
    }

    pub fn list_item(text: impl Into<String>, indent: f32, style: Style) -> Self {
        Self::new(BlockKind::ListItem {
            text: text.into(),
            indent,
            style,
        })
    }

    pub fn key_value(
        key: impl Into<String>,
        value: impl Into<String>,
        indent: f32,
        style: Style,
    ) -> Self {
        Self::new(BlockKind::KeyValue {
            key: key.into(),
            value: value.into(),
            indent,
            style,
        })
    }

    pub fn divider(color: Rgb) -> Self {
        Self::new(BlockKind::Divider { color })
    }

    pub fn with_gap(mut self, gap_after: f32) -> Self {
        self.gap_after = gap_after;
        self
    }
}
