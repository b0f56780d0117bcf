//! WebVTT flattening — turns a caption file into one line of plain text.

use regex::Regex;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static TIMING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}\.\d{3} --> ").unwrap());
static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct FlattenOptions {
    /// Drop a cue line equal to the previously kept one. YouTube's rolling
    /// auto-captions repeat every line once.
    pub dedupe: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Cue,
    /// `WEBVTT` header metadata (`Kind:`, `Language:`) up to the first blank
    /// line or timing line.
    Header,
    /// `NOTE`, `STYLE` or `REGION` block.
    Ignored,
}

/// Flatten WebVTT into plain text.
///
/// Cue identifiers, timing lines, header and comment blocks are dropped,
/// inline tags are stripped, and all whitespace collapses to single spaces.
pub fn vtt_to_text(input: &str, options: FlattenOptions) -> String {
    let mut block = Block::Cue;
    let mut block_start = true;
    let mut kept: Vec<String> = Vec::new();

    for raw in input.lines() {
        let line = raw.trim();
        if line.is_empty() {
            block = Block::Cue;
            block_start = true;
            continue;
        }
        let starts_block = std::mem::replace(&mut block_start, false);

        if line.starts_with("WEBVTT") {
            block = Block::Header;
            continue;
        }
        if starts_block && is_ignored_block(line) {
            block = Block::Ignored;
            continue;
        }
        if block == Block::Header && line.contains("-->") {
            block = Block::Cue;
        }
        if block != Block::Cue {
            continue;
        }
        if line.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if TIMING_REGEX.is_match(line) || line.contains("-->") {
            continue;
        }

        let text = TAG_REGEX.replace_all(line, "");
        let text = WHITESPACE_REGEX.replace_all(text.trim(), " ");
        if text.is_empty() {
            continue;
        }
        if options.dedupe && kept.last().is_some_and(|prev| *prev == text) {
            continue;
        }
        kept.push(text.into_owned());
    }

    let joined = kept.join(" ");
    WHITESPACE_REGEX.replace_all(&joined, " ").trim().to_string()
}

fn is_ignored_block(line: &str) -> bool {
    line == "NOTE"
        || line.starts_with("NOTE ")
        || line.starts_with("NOTE\t")
        || line == "STYLE"
        || line == "REGION"
}
