//! Offset-indexed text rewriting
//!
//! Replacements are applied in one left-to-right pass over the original text
//! using span offsets. A literal that appears several times is replaced per
//! occurrence, and text that merely contains the literal is left alone.

use crate::redaction::models::EntitySpan;
use std::cmp::Ordering;

/// Drop overlapping spans, keeping the higher-priority one
///
/// Priority is the category order, then the longer span, then the earlier
/// start. The result is sorted by start offset.
pub fn resolve_overlaps(spans: &[EntitySpan]) -> Vec<EntitySpan> {
    let mut ranked: Vec<&EntitySpan> = spans.iter().collect();
    ranked.sort_by(|a, b| {
        a.category
            .priority()
            .cmp(&b.category.priority())
            .then_with(|| b.len().cmp(&a.len()))
            .then_with(|| a.start.cmp(&b.start))
    });

    let mut kept: Vec<EntitySpan> = Vec::with_capacity(ranked.len());
    for span in ranked {
        if kept.iter().all(|k| !k.overlaps(span)) {
            kept.push(span.clone());
        }
    }

    kept.sort_by(|a, b| match a.start.cmp(&b.start) {
        Ordering::Equal => a.end.cmp(&b.end),
        other => other,
    });
    kept
}

/// Rewrite `text`, replacing each span with its paired replacement
///
/// `replacements` must be sorted by start and must not overlap; spans must lie
/// on character boundaries of `text`. Violations are reported as an error
/// message naming the offending span.
pub fn apply<'a, I>(text: &str, replacements: I) -> Result<String, String>
where
    I: IntoIterator<Item = (&'a EntitySpan, &'a str)>,
{
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;

    for (span, replacement) in replacements {
        if span.start < cursor {
            return Err(format!(
                "span {}..{} ({}) overlaps or precedes the previous replacement",
                span.start, span.end, span.category
            ));
        }
        let gap = text.get(cursor..span.start).ok_or_else(|| {
            format!(
                "span {}..{} ({}) does not start on a character boundary",
                span.start, span.end, span.category
            )
        })?;
        if text.get(span.start..span.end).is_none() {
            return Err(format!(
                "span {}..{} ({}) is outside the text",
                span.start, span.end, span.category
            ));
        }

        output.push_str(gap);
        output.push_str(replacement);
        cursor = span.end;
    }

    output.push_str(&text[cursor..]);
    Ok(output)
}
