//! Source discovery and filename-derived document metadata.
//!
//! Scraped pages are stored as Markdown files whose names encode the original
//! URL path with underscores (`www_example_org_en_study_bachelor.md`). The
//! helpers here walk the resource tree, rebuild the canonical link from the
//! filename, and derive keyword tokens from the path.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::types::PrepError;

/// Token separating the domain part of an encoded filename from its path
/// part. Everything up to and including it is treated as host + language
/// segment; the remainder becomes URL path segments.
const LANGUAGE_TOKEN: &str = "en";

/// One discovered source file.
///
/// `name` is the base filename, which doubles as the document's stable
/// identity in the checkpoint store and the record log.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub name: String,
}

/// Recursively collects every `*.md` file under `root`, sorted by path so a
/// run enumerates the corpus deterministically.
pub async fn discover_markdown(root: &Path) -> Result<Vec<SourceDocument>, PrepError> {
    let mut stack = vec![root.to_path_buf()];
    let mut documents = Vec::new();

    while let Some(dir) = stack.pop() {
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|ext| ext == "md") {
                let name = match path.file_name() {
                    Some(name) => name.to_string_lossy().into_owned(),
                    None => continue,
                };
                documents.push(SourceDocument { path, name });
            }
        }
    }

    documents.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(documents)
}

/// Reconstructs the original URL from a scraped filename.
///
/// The stem is split on `_`; tokens up to and including the language token
/// (falling back to the last token when absent) form the host, with the
/// language segment appended after a `/`. Remaining tokens become path
/// segments: `www_example_org_en_study_bachelor.md` →
/// `https://www.example.org/en/study/bachelor`.
pub fn link_from_filename(filename: &str) -> String {
    let stem = filename.strip_suffix(".md").unwrap_or(filename);
    let tokens: Vec<&str> = stem.split('_').collect();

    let language_idx = tokens
        .iter()
        .position(|token| *token == LANGUAGE_TOKEN)
        .unwrap_or(tokens.len() - 1);
    let (domain_tokens, path_tokens) = tokens.split_at(language_idx + 1);

    let domain = match domain_tokens {
        [host @ .., last] if !host.is_empty() => format!("{}/{}", host.join("."), last),
        _ => domain_tokens.concat(),
    };

    let mut url = format!("https://{domain}");
    let path: Vec<&str> = path_tokens
        .iter()
        .copied()
        .filter(|token| !token.is_empty())
        .collect();
    if !path.is_empty() {
        url.push('/');
        url.push_str(&path.join("/"));
    }
    url
}

/// Derives keyword tokens from a document's path relative to the resource
/// root: directory components split on underscores, plus the filename-stem
/// tokens that follow the encoded domain (language token included).
pub fn keywords_for(path: &Path, root: &Path) -> Vec<String> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut keywords = Vec::new();

    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            let component = component.as_os_str().to_string_lossy();
            keywords.extend(
                component
                    .split('_')
                    .filter(|token| !token.is_empty())
                    .map(str::to_string),
            );
        }
    }

    let stem = relative
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tokens: Vec<&str> = stem.split('_').filter(|token| !token.is_empty()).collect();
    let path_start = tokens
        .iter()
        .position(|token| *token == LANGUAGE_TOKEN)
        .map(|idx| idx + 1)
        .unwrap_or(0);
    keywords.extend(tokens[path_start..].iter().map(|token| token.to_string()));

    keywords
}

/// Reads a source file with UTF-8 replacement so a single mis-encoded page
/// cannot fail the corpus.
pub async fn read_lossy(path: &Path) -> Result<String, PrepError> {
    let bytes = fs::read(path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
