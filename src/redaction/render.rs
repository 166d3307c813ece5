//! Annotated rendering of the original text
//!
//! Review output marking every annotated entity, independent of which pass
//! produced the downloadable text. Annotations are expected sorted by start;
//! any that overlap a previous one or do not fit the text are skipped.

use crate::redaction::models::{Annotation, EntityCategory};

/// Background color used for an entity label
fn color_for(category: EntityCategory) -> &'static str {
    match category {
        EntityCategory::Person => "#aa9cfc",
        EntityCategory::Org => "#7aecec",
        EntityCategory::Gpe => "#feca74",
        EntityCategory::Loc => "#ff9561",
        EntityCategory::Date => "#bfe1d9",
        EntityCategory::Money | EntityCategory::Cardinal => "#e4e7d2",
        _ => "#ddd",
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '\n' => escaped.push_str("<br>\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

enum Segment<'t, 'a> {
    Plain(&'t str),
    Entity(&'t str, &'a Annotation),
}

/// Split `text` into plain gaps and annotated slices
fn segments<'t, 'a>(text: &'t str, annotations: &'a [Annotation]) -> Vec<Segment<'t, 'a>> {
    let mut parts = Vec::with_capacity(annotations.len() * 2 + 1);
    let mut cursor = 0;
    for annotation in annotations {
        if annotation.start < cursor {
            continue;
        }
        let (Some(gap), Some(slice)) = (
            text.get(cursor..annotation.start),
            text.get(annotation.start..annotation.end),
        ) else {
            continue;
        };
        parts.push(Segment::Plain(gap));
        parts.push(Segment::Entity(slice, annotation));
        cursor = annotation.end;
    }
    parts.push(Segment::Plain(&text[cursor..]));
    parts
}

/// displaCy-style HTML rendering
///
/// Entities whose category was redacted carry the `redacted` class.
pub fn render_html(text: &str, annotations: &[Annotation]) -> String {
    let mut html = String::from(
        "<div class=\"entities\" style=\"line-height: 2.5; direction: ltr\">",
    );

    for segment in segments(text, annotations) {
        let (slice, annotation) = match segment {
            Segment::Plain(gap) => {
                html.push_str(&escape_html(gap));
                continue;
            }
            Segment::Entity(slice, annotation) => (slice, annotation),
        };
        let class = if annotation.redacted {
            "entity redacted"
        } else {
            "entity"
        };
        html.push_str(&format!(
            "<mark class=\"{class}\" style=\"background: {}; padding: 0.45em 0.6em; \
             margin: 0 0.25em; line-height: 1; border-radius: 0.35em;\">{}\
             <span style=\"font-size: 0.8em; font-weight: bold; line-height: 1; \
             border-radius: 0.35em; vertical-align: middle; margin-left: 0.5rem\">{}</span></mark>",
            color_for(annotation.category),
            escape_html(slice),
            annotation.category.label(),
        ));
    }

    html.push_str("</div>");
    html
}

/// Terminal-friendly rendering: `[text|LABEL]`, with `*` after the label for
/// redacted categories
pub fn render_inline(text: &str, annotations: &[Annotation]) -> String {
    let mut output = String::with_capacity(text.len() + annotations.len() * 10);

    for segment in segments(text, annotations) {
        match segment {
            Segment::Plain(gap) => output.push_str(gap),
            Segment::Entity(slice, annotation) => {
                output.push('[');
                output.push_str(slice);
                output.push('|');
                output.push_str(annotation.category.label());
                if annotation.redacted {
                    output.push('*');
                }
                output.push(']');
            }
        }
    }

    output
}
