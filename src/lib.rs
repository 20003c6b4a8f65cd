mod block;
mod config;
mod error;
pub mod logging;
mod parser;
pub mod payload;
mod typst;

pub use block::{Block, FormattedBlock, InlineSpan, Origin};
pub use config::{ColorsConfig, Config, FontConfig, ListConfig, SpacingConfig};
pub use error::{Error, Result};
pub use payload::{PayloadKind, extract_text};

use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_pdf::PdfOptions;

/// Parse message text into a vector of blocks.
pub fn parse(text: &str) -> Vec<Block> {
    parser::parse(text)
}

/// Parse message text and tag every block with the message's origin.
pub fn format(text: &str, origin: Origin) -> Vec<FormattedBlock> {
    parser::parse(text)
        .into_iter()
        .map(|block| FormattedBlock { block, origin })
        .collect()
}

/// Convert formatted blocks to Typst markup.
pub fn to_typst(blocks: &[FormattedBlock], config: &Config) -> String {
    typst::blocks_to_typst(blocks, config)
}

/// Convert message text to Typst markup.
pub fn markdown_to_typst(text: &str, origin: Origin, config: &Config) -> String {
    to_typst(&format(text, origin), config)
}

/// Block list as pretty-printed JSON, for renderers in another process.
pub fn to_json(blocks: &[FormattedBlock]) -> Result<String> {
    serde_json::to_string_pretty(blocks)
        .map_err(|e| Error::Render(format!("JSON output failed: {}", e)))
}

/// Convert message text to PDF bytes.
pub fn to_pdf(text: &str, origin: Origin, config: &Config) -> Result<Vec<u8>> {
    blocks_to_pdf(&format(text, origin), config)
}

/// Convert formatted blocks, possibly from several messages, to PDF bytes.
pub fn blocks_to_pdf(blocks: &[FormattedBlock], config: &Config) -> Result<Vec<u8>> {
    use typst_library::layout::PagedDocument;

    let typst_content = to_typst(blocks, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let doc: PagedDocument = engine
        .compile()
        .output
        .map_err(|e| Error::Render(format!("Typst compilation failed: {:?}", e)))?;

    tracing::debug!(pages = doc.pages.len(), "compiled document");

    typst_pdf::pdf(&doc, &PdfOptions::default())
        .map_err(|e| Error::Render(format!("PDF generation failed: {:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_tags_every_block() {
        let blocks = format("# Hi\n\n- one", Origin::User);
        assert_eq!(blocks.len(), 3);
        assert!(blocks.iter().all(|b| b.origin == Origin::User));
    }

    #[test]
    fn origin_never_changes_structure() {
        let text = "## Day 1\n1. **Squat** 5x5\n\nRest well";
        let user: Vec<Block> = format(text, Origin::User).into_iter().map(|f| f.block).collect();
        let coach: Vec<Block> = format(text, Origin::Coach).into_iter().map(|f| f.block).collect();
        assert_eq!(user, coach);
        assert_eq!(user, parse(text));
    }

    #[test]
    fn formatter_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FormattedBlock>();

        let handles: Vec<_> = (0..4)
            .map(|n| std::thread::spawn(move || format(&format!("{n}. step"), Origin::Coach)))
            .collect();
        for (n, handle) in handles.into_iter().enumerate() {
            let blocks = handle.join().unwrap();
            assert!(matches!(
                &blocks[0].block,
                Block::NumberedItem { marker, .. } if *marker == format!("{n}.")
            ));
        }
    }

    #[test]
    fn json_lists_blocks_in_order() {
        let json = to_json(&format("# Hi\n\nWatch **out", Origin::User)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let kinds: Vec<_> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["kind"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, ["heading", "spacer", "paragraph"]);
        assert_eq!(value[2]["content"][1]["text"], "**out");
    }

    #[test]
    fn pdf_for_mixed_conversation() {
        let mut blocks = format("# Plan\n\n- Eat **well**\n2. Stretch \"now\"", Origin::Coach);
        blocks.extend(format("Watch **out @x $y\n## 1. Warm-up", Origin::User));
        blocks.extend(format("3x**10**reps", Origin::Coach));

        let bytes = blocks_to_pdf(&blocks, &Config::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let bytes = to_pdf("Hi coach", Origin::User, &Config::compiled_default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn pdf_compile_failure_is_render_error() {
        let mut config = Config::default();
        config.font.paragraph = f64::NAN;
        let err = to_pdf("Rest day", Origin::Coach, &config).unwrap_err();
        assert!(matches!(err, Error::Render(ref msg) if msg.starts_with("Typst compilation failed")));
    }
}
