//! Structured post body, as produced by a block-based editor.
//!
//! Each block is serialized as `{"type": "<kind>", "data": {...}}`.

use serde::{Deserialize, Serialize};

/// A single block of a post body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ContentBlock {
    Paragraph {
        text: String,
    },
    Header {
        text: String,
        #[serde(default = "default_header_level")]
        level: u8,
    },
    List {
        #[serde(default)]
        style: ListStyle,
        items: Vec<String>,
    },
    Quote {
        text: String,
        #[serde(default)]
        caption: String,
    },
    Code {
        code: String,
    },
    Image {
        url: String,
        #[serde(default)]
        caption: String,
    },
}

fn default_header_level() -> u8 {
    2
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    #[default]
    Unordered,
}

impl ContentBlock {
    /// Text of the block if it is a paragraph.
    pub fn paragraph_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Paragraph { text } => Some(text),
            _ => None,
        }
    }

    /// Reader-visible text of the block. Structural fields such as the list
    /// style, header level and image URL are not included.
    pub fn text_fragments(&self) -> Vec<&str> {
        match self {
            ContentBlock::Paragraph { text } | ContentBlock::Header { text, .. } => {
                vec![text.as_str()]
            }
            ContentBlock::List { items, .. } => items.iter().map(String::as_str).collect(),
            ContentBlock::Quote { text, caption } => vec![text.as_str(), caption.as_str()],
            ContentBlock::Code { code } => vec![code.as_str()],
            ContentBlock::Image { caption, .. } => vec![caption.as_str()],
        }
    }
}

/// Text of the first paragraph in `body`, or an empty string.
pub fn first_paragraph(body: &[ContentBlock]) -> String {
    body.iter()
        .find_map(ContentBlock::paragraph_text)
        .unwrap_or_default()
        .to_string()
}
