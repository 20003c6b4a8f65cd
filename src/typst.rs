use crate::block::{Block, FormattedBlock, InlineSpan, Origin};
use crate::config::Config;

/// Convert formatted blocks to Typst markup
pub fn blocks_to_typst(blocks: &[FormattedBlock], config: &Config) -> String {
    let mut out = String::new();

    out.push_str("#set par(linebreaks: \"optimized\")\n\n");

    let mut i = 0;
    while i < blocks.len() {
        let origin = blocks[i].origin;
        let start = i;
        while i < blocks.len() && blocks[i].origin == origin {
            i += 1;
        }
        let run = &blocks[start..i];

        match origin {
            Origin::User => {
                // The user's own messages sit in a filled bubble
                out.push_str(&format!(
                    "#block(fill: {}, inset: 10pt, radius: 8pt, width: 100%)[\n",
                    color(&config.colors.user_bubble)
                ));
                for formatted in run {
                    emit_block(&formatted.block, origin, config, &mut out);
                }
                out.push_str("]\n\n");
            }
            Origin::Coach => {
                for formatted in run {
                    emit_block(&formatted.block, origin, config, &mut out);
                }
            }
        }
    }

    out
}

fn color(hex: &str) -> String {
    format!("rgb(\"{}\")", hex)
}

fn fill_for(origin: Origin, config: &Config) -> String {
    match origin {
        Origin::User => color(&config.colors.user_text),
        Origin::Coach => color(&config.colors.text),
    }
}

fn emit_block(block: &Block, origin: Origin, config: &Config, out: &mut String) {
    let fill = fill_for(origin, config);
    let size = config.font.paragraph;
    let item = config.spacing.item;

    match block {
        Block::Heading { level, text } => {
            let margin = config.spacing.margin_for_heading(*level);
            out.push_str(&format!(
                "#block(above: {margin}pt, below: {margin}pt)[#text(size: {}pt, weight: \"bold\", fill: {fill})[",
                config.font.size_for_heading(*level)
            ));
            spans_to_typst(text, out);
            out.push_str("]]\n\n");
        }
        Block::Paragraph { content } => {
            out.push_str(&format!(
                "#block(below: {item}pt)[#text(size: {size}pt, fill: {fill})["
            ));
            spans_to_typst(content, out);
            out.push_str("]]\n\n");
        }
        Block::BulletItem { content } => {
            emit_item(&config.list.bullet, content, &fill, config, out);
        }
        Block::NumberedItem { marker, content } => {
            emit_item(marker, content, &fill, config, out);
        }
        Block::Spacer => {
            out.push_str(&format!("#v({}pt)\n\n", config.spacing.spacer));
        }
    }
}

/// A list row: the marker in a narrow column, the content beside it
fn emit_item(
    marker: &str,
    content: &[InlineSpan],
    fill: &str,
    config: &Config,
    out: &mut String,
) {
    let size = config.font.paragraph;
    out.push_str(&format!(
        "#block(below: {}pt, grid(columns: (auto, 1fr), column-gutter: 8pt, text(size: {size}pt, fill: {fill}, {}), text(size: {size}pt, fill: {fill})[",
        config.spacing.item,
        string_literal(marker)
    ));
    spans_to_typst(content, out);
    out.push_str("]))\n\n");
}

fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn spans_to_typst(spans: &[InlineSpan], out: &mut String) {
    for (index, span) in spans.iter().enumerate() {
        match span {
            InlineSpan::PlainText { text } => escape_markup(text, index == 0, out),
            InlineSpan::Bold { text } => {
                // `;` ends the embedded call so the next span is never read as
                // a field access or trailing argument
                out.push_str("#strong[");
                escape_markup(text, true, out);
                out.push_str("];");
            }
        }
    }
}

/// Escape Typst markup. At the start of a content block a `N.` prefix would
/// open a numbered list, so its period is escaped too.
fn escape_markup(text: &str, at_start: bool, out: &mut String) {
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    let enum_marker = at_start && digits > 0 && text.as_bytes().get(digits) == Some(&b'.');

    for (offset, ch) in text.char_indices() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '=' | '-'
            | '+' | '/' | '~' | ';' => {
                out.push('\\');
                out.push(ch);
            }
            '.' if enum_marker && offset == digits => out.push_str("\\."),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::block::Origin;
    use crate::config::Config;
    use crate::markdown_to_typst;

    const PREAMBLE: &str = "#set par(linebreaks: \"optimized\")\n\n";

    fn coach(text: &str) -> String {
        markdown_to_typst(text, Origin::Coach, &Config::default())
    }

    #[test]
    fn empty() {
        assert_eq!(coach(""), PREAMBLE);
    }

    #[test]
    fn paragraph() {
        assert_eq!(
            coach("Hello world"),
            format!(
                "{PREAMBLE}#block(below: 4pt)[#text(size: 16pt, fill: rgb(\"#333333\"))[Hello world]]\n\n"
            )
        );
    }

    #[test]
    fn heading_sizes() {
        assert_eq!(
            coach("# Plan"),
            format!(
                "{PREAMBLE}#block(above: 8pt, below: 8pt)[#text(size: 20pt, weight: \"bold\", fill: rgb(\"#333333\"))[Plan]]\n\n"
            )
        );
        assert!(coach("### Cool down").contains("#text(size: 16pt, weight: \"bold\""));
    }

    #[test]
    fn bold() {
        assert!(coach("Do **10 reps** now").contains("[Do #strong[10 reps]; now]"));
    }

    #[test]
    fn bold_inside_a_word() {
        assert!(coach("3x**10**reps").contains("[3x#strong[10];reps]"));
        assert!(coach("**Tip**.Rest").contains("[#strong[Tip];.Rest]"));
    }

    #[test]
    fn leading_number_is_not_a_list() {
        assert!(coach("## 1. Warm-up").contains("[1\\. Warm\\-up]]"));
        assert!(coach("- 3. sets").contains("[3\\. sets]))"));
        assert!(coach("### **1.** Squat").contains("[#strong[1\\.]; Squat]]"));
        assert!(coach("Run 3.5 km").contains("[Run 3.5 km]"));
    }

    #[test]
    fn bullet_uses_configured_glyph() {
        let mut config = Config::default();
        config.list.bullet = "›".to_string();
        let out = markdown_to_typst("- Eat well", Origin::Coach, &config);
        assert!(out.contains("text(size: 16pt, fill: rgb(\"#333333\"), \"›\")"));
        assert!(out.contains("[Eat well]))"));
    }

    #[test]
    fn numbered_marker_is_a_string() {
        let out = coach("2. Stretch");
        assert!(out.contains(", \"2.\"), text(size: 16pt, fill: rgb(\"#333333\"))[Stretch]))"));
    }

    #[test]
    fn spacer() {
        assert_eq!(coach("A\n\n\nB").matches("#v(8pt)").count(), 1);
    }

    #[test]
    fn user_messages_sit_in_bubble() {
        let out = markdown_to_typst("Hi coach", Origin::User, &Config::default());
        assert!(out.starts_with(&format!(
            "{PREAMBLE}#block(fill: rgb(\"#6200EA\"), inset: 10pt, radius: 8pt, width: 100%)[\n"
        )));
        assert!(out.contains("fill: rgb(\"#ffffff\"))[Hi coach]"));
        assert!(out.ends_with("]\n\n"));
    }

    #[test]
    fn origin_changes_colour_only() {
        let user = markdown_to_typst("## Legs", Origin::User, &Config::default());
        let coached = coach("## Legs");
        assert!(user.contains("weight: \"bold\", fill: rgb(\"#ffffff\"))[Legs]"));
        assert!(coached.contains("weight: \"bold\", fill: rgb(\"#333333\"))[Legs]"));
    }

    #[test]
    fn escapes_special_chars() {
        assert!(coach("a #b c").contains("[a \\#b c]"));
        assert!(coach("Watch **out").contains("[Watch \\*\\*out]"));
        assert!(coach("see http://x.io").contains("[see http:\\/\\/x.io]"));
        assert!(coach("= not a heading").contains("[\\= not a heading]"));
        assert!(coach("sets; reps").contains("[sets\\; reps]"));
    }
}
