//! Marker-based line partitioning for Markdown heading levels.

/// One partition produced by [`sectionize`]: an optional heading line and the
/// body lines that follow it, up to the next heading at the same level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    /// The full heading line (marker retained, trimmed), or `None` for the
    /// leading section before the first marker.
    pub title: Option<&'a str>,
    /// Body lines, excluding the heading line itself.
    pub body: Vec<&'a str>,
}

impl Section<'_> {
    /// `true` when the section carries no heading and no non-blank body line.
    pub fn is_blank(&self) -> bool {
        self.title.is_none() && self.body.iter().all(|line| line.trim().is_empty())
    }
}

/// Partitions `lines` into sections at every line starting with `marker`.
///
/// A new section begins at each marker line; that line becomes the section's
/// title and is excluded from its own body. Lines before the first marker
/// form a leading section with an absent title. No input is dropped:
/// reinserting the title lines and concatenating all bodies reconstructs the
/// original sequence. Input without any marker yields a single titleless
/// section.
pub fn sectionize<'a>(lines: &[&'a str], marker: &str) -> Vec<Section<'a>> {
    let mut sections = Vec::new();
    let mut leading: Vec<&'a str> = Vec::new();
    let mut current: Option<Section<'a>> = None;

    for &line in lines {
        if line.starts_with(marker) {
            if let Some(section) = current.take() {
                sections.push(section);
            } else if !leading.is_empty() {
                sections.push(Section {
                    title: None,
                    body: std::mem::take(&mut leading),
                });
            }
            current = Some(Section {
                title: Some(line.trim()),
                body: Vec::new(),
            });
        } else if let Some(section) = current.as_mut() {
            section.body.push(line);
        } else {
            leading.push(line);
        }
    }

    if let Some(section) = current {
        sections.push(section);
    } else if !leading.is_empty() {
        sections.push(Section {
            title: None,
            body: leading,
        });
    }

    sections
}
