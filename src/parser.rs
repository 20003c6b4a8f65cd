use crate::block::{Block, InlineSpan};

const BOLD_DELIMITER: &str = "**";

/// Trim the message, collapse runs of three or more newlines down to one
/// blank line and strip trailing spaces/tabs from every line.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;

    for ch in text.trim().chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(ch);
            }
        } else {
            newlines = 0;
            out.push(ch);
        }
    }

    out.split('\n')
        .map(strip_trailing_whitespace)
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_trailing_whitespace(line: &str) -> &str {
    line.trim_end_matches([' ', '\t', '\r'])
}

/// Parse message text into a list of blocks
pub fn parse(text: &str) -> Vec<Block> {
    let normalized = normalize(text);
    let mut blocks: Vec<Block> = Vec::new();

    if normalized.is_empty() {
        return blocks;
    }

    for line in normalized.split('\n') {
        if line.trim().is_empty() {
            // Never two spacers in a row
            if !blocks.last().is_some_and(Block::is_spacer) {
                blocks.push(Block::Spacer);
            }
            continue;
        }
        blocks.push(parse_line(line));
    }

    tracing::trace!(blocks = blocks.len(), "parsed message");
    blocks
}

/// Classify a non-blank line. Headings win over bullets, bullets over
/// numbered items, and anything else is a paragraph.
fn parse_line(line: &str) -> Block {
    if let Some((level, rest)) = heading(line) {
        return Block::Heading {
            level,
            text: parse_inline(rest),
        };
    }

    if let Some(rest) = bullet(line) {
        return Block::BulletItem {
            content: parse_inline(rest),
        };
    }

    if let Some((marker, rest)) = numbered(line) {
        return Block::NumberedItem {
            marker: marker.to_string(),
            content: parse_inline(rest),
        };
    }

    Block::Paragraph {
        content: parse_inline(line.trim()),
    }
}

/// Text after `prefix` when the prefix is followed by whitespace.
fn after_marker<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(prefix)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn heading(line: &str) -> Option<(u8, &str)> {
    [("###", 3), ("##", 2), ("#", 1)]
        .into_iter()
        .find_map(|(prefix, level)| after_marker(line, prefix).map(|rest| (level, rest)))
}

fn bullet(line: &str) -> Option<&str> {
    ["-", "•", "*"]
        .into_iter()
        .find_map(|prefix| after_marker(line, prefix))
}

fn numbered(line: &str) -> Option<(&str, &str)> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || line.as_bytes().get(digits) != Some(&b'.') {
        return None;
    }
    let marker = &line[..=digits];
    after_marker(line, marker).map(|rest| (marker, rest))
}

/// Split a line on `**`. Even segments are plain, odd segments bold, and
/// empty segments produce nothing. An unpaired trailing `**` stays in the
/// text literally.
fn parse_inline(text: &str) -> Vec<InlineSpan> {
    let segments: Vec<&str> = text.split(BOLD_DELIMITER).collect();
    let delimiters = segments.len() - 1;
    let mut spans = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        if delimiters % 2 == 1 && index == delimiters {
            spans.push(InlineSpan::plain(format!("{}{}", BOLD_DELIMITER, segment)));
            continue;
        }
        if segment.is_empty() {
            continue;
        }
        if index % 2 == 0 {
            spans.push(InlineSpan::plain(*segment));
        } else {
            spans.push(InlineSpan::bold(*segment));
        }
    }

    spans
}
