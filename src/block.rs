use std::fmt;

use serde::Serialize;

/// Inline text spans with formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InlineSpan {
    PlainText { text: String },
    Bold { text: String },
}

impl InlineSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        InlineSpan::PlainText { text: text.into() }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        InlineSpan::Bold { text: text.into() }
    }

    /// The span's text without any delimiters.
    pub fn text(&self) -> &str {
        match self {
            InlineSpan::PlainText { text } | InlineSpan::Bold { text } => text,
        }
    }
}

/// Block-level elements, one per non-blank source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading {
        /// 1, 2 or 3
        level: u8,
        text: Vec<InlineSpan>,
    },
    BulletItem {
        content: Vec<InlineSpan>,
    },
    NumberedItem {
        /// The captured marker, e.g. `"2."`
        marker: String,
        content: Vec<InlineSpan>,
    },
    Paragraph {
        content: Vec<InlineSpan>,
    },
    /// A preserved blank line
    Spacer,
}

impl Block {
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "heading",
            Block::BulletItem { .. } => "bullet",
            Block::NumberedItem { .. } => "numbered",
            Block::Paragraph { .. } => "paragraph",
            Block::Spacer => "spacer",
        }
    }

    pub fn is_spacer(&self) -> bool {
        matches!(self, Block::Spacer)
    }

    /// Inline content of the block. Empty for spacers.
    pub fn spans(&self) -> &[InlineSpan] {
        match self {
            Block::Heading { text, .. } => text,
            Block::BulletItem { content }
            | Block::NumberedItem { content, .. }
            | Block::Paragraph { content } => content,
            Block::Spacer => &[],
        }
    }

    /// Concatenated span text with markers and bold delimiters removed.
    pub fn plain_text(&self) -> String {
        self.spans().iter().map(InlineSpan::text).collect()
    }
}

/// Writes the block as a line of the markdown subset: markers and `**` are
/// restored. A paragraph whose text begins with a marker (from an indented
/// source line) reads back as that marker's block kind.
impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::Heading { level, .. } => {
                write!(f, "{} ", "#".repeat(usize::from(*level)))?;
            }
            Block::BulletItem { .. } => f.write_str("- ")?,
            Block::NumberedItem { marker, .. } => write!(f, "{} ", marker)?,
            Block::Paragraph { .. } | Block::Spacer => {}
        }
        for span in self.spans() {
            match span {
                InlineSpan::PlainText { text } => f.write_str(text)?,
                InlineSpan::Bold { text } => write!(f, "**{}**", text)?,
            }
        }
        Ok(())
    }
}

/// Who wrote a piece of text. Affects presentation only, never structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    User,
    #[default]
    Coach,
}

impl Origin {
    pub fn from_is_user(is_user: bool) -> Self {
        if is_user { Origin::User } else { Origin::Coach }
    }

    pub fn is_user(self) -> bool {
        self == Origin::User
    }
}

/// A block paired with the origin of the message it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedBlock {
    #[serde(flatten)]
    pub block: Block,
    pub origin: Origin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_restores_markers() {
        let heading = Block::Heading {
            level: 2,
            text: vec![InlineSpan::plain("Warm "), InlineSpan::bold("up")],
        };
        assert_eq!(heading.to_string(), "## Warm **up**");

        let numbered = Block::NumberedItem {
            marker: "12.".to_string(),
            content: vec![InlineSpan::plain("Cool down")],
        };
        assert_eq!(numbered.to_string(), "12. Cool down");
        assert_eq!(Block::Spacer.to_string(), "");
    }

    #[test]
    fn plain_text_drops_delimiters() {
        let block = Block::BulletItem {
            content: vec![
                InlineSpan::plain("Hold "),
                InlineSpan::bold("30s"),
                InlineSpan::plain(" each side"),
            ],
        };
        assert_eq!(block.plain_text(), "Hold 30s each side");
        assert!(Block::Spacer.spans().is_empty());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let formatted = FormattedBlock {
            block: Block::NumberedItem {
                marker: "1.".to_string(),
                content: vec![InlineSpan::bold("Squat")],
            },
            origin: Origin::Coach,
        };
        let json = serde_json::to_value(&formatted).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "numbered_item",
                "marker": "1.",
                "content": [{ "kind": "bold", "text": "Squat" }],
                "origin": "coach",
            })
        );

        let spacer = serde_json::to_value(FormattedBlock {
            block: Block::Spacer,
            origin: Origin::User,
        })
        .unwrap();
        assert_eq!(spacer, serde_json::json!({ "kind": "spacer", "origin": "user" }));
    }

    #[test]
    fn origin_from_flag() {
        assert_eq!(Origin::from_is_user(true), Origin::User);
        assert_eq!(Origin::from_is_user(false), Origin::Coach);
        assert!(!Origin::default().is_user());
    }
}
