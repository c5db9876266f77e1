//! Substring search and snippet extraction over a course content tree.
//!
//! Both working adapters share this engine; they differ only in the walk
//! strategy (the fixture tree recurses into subsections, the filesystem
//! tree is flat) and in how an item's text body is resolved. A name match
//! scores 0.8 and suppresses the content check for that item; a content
//! match scores 0.6. Results are stable-sorted descending by score, so
//! ties keep traversal order.

use crate::error::Result;
use crate::types::{ContentItem, CourseContent, SearchResult, Section};

pub const NAME_MATCH_SCORE: f64 = 0.8;
pub const CONTENT_MATCH_SCORE: f64 = 0.6;

/// Context window on each side of the matched query, in characters.
pub const SNIPPET_CONTEXT_CHARS: usize = 50;

/// How [`search_course`] walks the section tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionWalk {
    /// Descend into subsections (fixture adapter)
    Recursive,
    /// Top-level sections only (filesystem adapter has no subsections)
    TopLevel,
}

/// Search a course's items for a literal, case-insensitive substring.
///
/// `resolve_body` fetches an item's text body on demand; `Ok(None)` means
/// the item has no resolvable body and only its name is matched. Resolver
/// I/O errors propagate. The result list is complete - no cap, no
/// pagination.
pub fn search_course<F>(
    content: &CourseContent, query: &str, walk: SectionWalk, mut resolve_body: F,
) -> Result<Vec<SearchResult>>
where
    F: FnMut(&ContentItem) -> Result<Option<String>>,
{
    let query_lower = query.to_lowercase();
    let mut results = Vec::new();

    for section in &content.sections {
        search_in_section(section, query, &query_lower, walk, &mut resolve_body, &mut results)?;
    }

    // sort_by is stable; ties retain traversal order
    results.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(results)
}

fn search_in_section<F>(
    section: &Section, query: &str, query_lower: &str, walk: SectionWalk, resolve_body: &mut F,
    results: &mut Vec<SearchResult>,
) -> Result<()>
where
    F: FnMut(&ContentItem) -> Result<Option<String>>,
{
    for item in &section.items {
        if item.name.to_lowercase().contains(query_lower) {
            results.push(SearchResult {
                item: item.clone(),
                section_name: section.name.clone(),
                snippet: make_snippet(&item.name, query, SNIPPET_CONTEXT_CHARS),
                relevance_score: NAME_MATCH_SCORE,
            });
            // name match takes priority; the body is not also checked
            continue;
        }

        if let Some(body) = resolve_body(item)?
            && body.to_lowercase().contains(query_lower)
        {
            results.push(SearchResult {
                item: item.clone(),
                section_name: section.name.clone(),
                snippet: make_snippet(&body, query, SNIPPET_CONTEXT_CHARS),
                relevance_score: CONTENT_MATCH_SCORE,
            });
        }
    }

    if walk == SectionWalk::Recursive {
        for subsection in &section.subsections {
            search_in_section(subsection, query, query_lower, walk, resolve_body, results)?;
        }
    }

    Ok(())
}

/// Extract a bounded excerpt around the first case-insensitive occurrence
/// of `query` in `text`.
///
/// With the match at character offset `idx`, the window is
/// `[max(0, idx - context_chars), min(len, idx + len(query) + context_chars))`,
/// prefixed with `"..."` when it starts past 0 and suffixed with `"..."`
/// when it ends early. When the query does not occur (normalization
/// drift), the snippet is the first 100 characters, plus `"..."` only if
/// the text was longer. Offsets are counted in characters, not bytes.
pub fn make_snippet(text: &str, query: &str, context_chars: usize) -> String {
    let text_chars: Vec<char> = text.chars().collect();

    let Some(idx) = find_case_insensitive(&text_chars, query) else {
        if text_chars.len() > 100 {
            let head: String = text_chars[..100].iter().collect();
            return format!("{head}...");
        }
        return text.to_string();
    };

    let query_len = query.chars().count();
    let start = idx.saturating_sub(context_chars);
    let end = (idx + query_len + context_chars).min(text_chars.len());

    let mut snippet: String = text_chars[start..end].iter().collect();
    if start > 0 {
        snippet = format!("...{snippet}");
    }
    if end < text_chars.len() {
        snippet.push_str("...");
    }

    snippet
}

/// Character offset of the first case-insensitive occurrence of `query`.
fn find_case_insensitive(text: &[char], query: &str) -> Option<usize> {
    let query_chars: Vec<char> = query.to_lowercase().chars().collect();
    if query_chars.is_empty() {
        return Some(0);
    }
    if query_chars.len() > text.len() {
        return None;
    }

    (0..=text.len() - query_chars.len()).find(|&i| {
        text[i..i + query_chars.len()]
            .iter()
            .flat_map(|c| c.to_lowercase())
            .eq(query_chars.iter().copied())
    })
}
