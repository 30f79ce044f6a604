//! Hierarchical, size-bounded Markdown chunking.
//!
//! Documents are split along their heading structure, descending one level at
//! a time (H1 → H2 → H3 → paragraphs) only where a section overflows the
//! size bound. Every emitted chunk is prefixed with its reconstructed header
//! context (a synthesized source-link line, the document title, and the
//! enclosing section headings) so each chunk stays readable on its own.
//!
//! The bound is a target rather than a hard ceiling: a single paragraph that
//! cannot be decomposed further is emitted oversized rather than split
//! mid-sentence.

use super::sectionizer::{Section, sectionize};

const H1_MARKER: &str = "# ";
const H2_MARKER: &str = "## ";
const H3_MARKER: &str = "### ";

/// Splits `text` into rendered chunks of at most `max_chars` characters
/// (soft bound, see module docs), each prefixed with its header context.
///
/// `link` is the document's canonical source URL, embedded as the first line
/// of every chunk. The result is never empty and preserves document order.
pub fn chunk_markdown(link: &str, text: &str, max_chars: usize) -> Vec<String> {
    // Common case: short pages need no header bookkeeping at all.
    if char_len(text) <= max_chars {
        return vec![text.trim().to_string()];
    }

    let lines: Vec<&str> = text.lines().collect();

    let document_title = lines
        .iter()
        .find(|line| line.starts_with(H1_MARKER))
        .map(|line| line.trim().to_string());

    let mut prefix: Vec<String> = vec![format!("[Source]({link})")];
    if let Some(title) = &document_title {
        prefix.push(title.clone());
    }

    // The first H1 line now lives in the prefix; everything else is body.
    let mut body: Vec<&str> = Vec::with_capacity(lines.len());
    let mut title_taken = false;
    for &line in &lines {
        if !title_taken && line.starts_with(H1_MARKER) {
            title_taken = true;
            continue;
        }
        body.push(line);
    }

    let mut chunks = Vec::new();
    for section in sectionize(&body, H2_MARKER) {
        if section.is_blank() {
            continue;
        }
        let rendered = render_section(&prefix, &section);
        if char_len(&rendered) <= max_chars {
            chunks.push(rendered);
        } else {
            chunk_overflowing_section(&prefix, &section, max_chars, &mut chunks);
        }
    }
    chunks
}

/// Descends into an oversized level-2 section: level-3 subsections where they
/// exist, paragraph packing otherwise.
fn chunk_overflowing_section(
    prefix: &[String],
    section: &Section<'_>,
    max_chars: usize,
    out: &mut Vec<String>,
) {
    let mut section_prefix = prefix.to_vec();
    if let Some(title) = section.title {
        section_prefix.push(title.to_string());
    }

    let subsections = sectionize(&section.body, H3_MARKER);
    if !subsections.iter().any(|sub| sub.title.is_some()) {
        pack_paragraphs(&section_prefix, &section.body, max_chars, out);
        return;
    }

    // Subsections that fit accumulate here and are packed under the shared
    // level-2 prefix. An overflowing subsection flushes them first so chunks
    // keep document order.
    let mut pending: Vec<String> = Vec::new();
    for sub in subsections {
        if sub.is_blank() {
            continue;
        }
        let rendered = render_section(&section_prefix, &sub);
        if char_len(&rendered) <= max_chars {
            pending.push(render_unit(&sub));
        } else {
            pack_units(&section_prefix, &std::mem::take(&mut pending), max_chars, out);
            let mut sub_prefix = section_prefix.clone();
            if let Some(title) = sub.title {
                sub_prefix.push(title.to_string());
            }
            pack_paragraphs(&sub_prefix, &sub.body, max_chars, out);
        }
    }
    pack_units(&section_prefix, &pending, max_chars, out);
}

/// Splits `body` on blank-line boundaries and packs the paragraphs as
/// titleless units under `prefix`. Decomposition stops here: a paragraph
/// longer than the bound is emitted as-is.
fn pack_paragraphs(prefix: &[String], body: &[&str], max_chars: usize, out: &mut Vec<String>) {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for &line in body {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n").trim().to_string());
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n").trim().to_string());
    }

    pack_units(prefix, &paragraphs, max_chars, out);
}

/// Greedy left-to-right packing of pre-rendered units under a shared prefix.
///
/// The running buffer starts with the prefix and the first unit; each further
/// unit is appended while `buffer + '\n' + unit` stays within `max_chars`,
/// otherwise the buffer is flushed and restarted. Units are never split, so a
/// unit that alone exceeds the bound still becomes one (oversized) chunk.
fn pack_units(prefix: &[String], units: &[String], max_chars: usize, out: &mut Vec<String>) {
    let prefix_text = prefix.join("\n");
    let mut buffer = String::new();

    for unit in units {
        if unit.is_empty() {
            continue;
        }
        if buffer.is_empty() {
            buffer = join_nonempty(&prefix_text, unit);
        } else if char_len(&buffer) + char_len(unit) + 1 <= max_chars {
            buffer.push('\n');
            buffer.push_str(unit);
        } else {
            out.push(std::mem::take(&mut buffer));
            buffer = join_nonempty(&prefix_text, unit);
        }
    }
    if !buffer.is_empty() {
        out.push(buffer);
    }
}

/// Renders a section with its full header-context prefix, trimmed.
fn render_section(prefix: &[String], section: &Section<'_>) -> String {
    let mut parts: Vec<&str> = prefix.iter().map(String::as_str).collect();
    if let Some(title) = section.title {
        parts.push(title);
    }
    parts.extend(section.body.iter().copied());
    parts.join("\n").trim().to_string()
}

/// Renders a section without any prefix, for use as a packable unit.
fn render_unit(section: &Section<'_>) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(section.body.len() + 1);
    if let Some(title) = section.title {
        parts.push(title);
    }
    parts.extend(section.body.iter().copied());
    parts.join("\n").trim().to_string()
}

fn join_nonempty(prefix: &str, unit: &str) -> String {
    if prefix.is_empty() {
        unit.to_string()
    } else {
        format!("{prefix}\n{unit}")
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
