//! Span-anchored source editing.
//!
//! Edits are recorded against spans of the original text and spliced in at
//! render time, so everything outside an edited span comes through
//! byte-for-byte. When an edit's span is nested inside another edit's span,
//! the outer edit wins and the inner one is dropped; `slice` exists so a
//! caller can resolve inner edits into a sub-range first and use the result
//! as the outer replacement text.

use crate::span::Span;

/// A recorded replacement of one source span.
#[derive(Debug, Clone)]
struct Edit {
    span: Span,
    text: String,
}

/// Non-destructive editor over a source string.
#[derive(Debug)]
pub struct SourceEditor<'a> {
    source: &'a str,
    edits: Vec<Edit>,
}

impl<'a> SourceEditor<'a> {
    /// Create an editor over the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            edits: Vec::new(),
        }
    }

    /// The unedited source text.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Replace the given span with new text. An empty string deletes it.
    pub fn replace(&mut self, span: Span, text: impl Into<String>) {
        self.edits.push(Edit {
            span,
            text: text.into(),
        });
    }

    /// Render a sub-range of the source with all edits contained in it
    /// applied. Edits that cross the range boundary are ignored.
    pub fn slice(&self, span: Span) -> String {
        self.apply(span)
    }

    /// Render the full source with all edits applied.
    pub fn render(&self) -> String {
        self.apply(Span::new(0, self.source.len() as u32))
    }

    fn apply(&self, range: Span) -> String {
        let mut edits: Vec<&Edit> = self
            .edits
            .iter()
            .filter(|edit| range.contains(edit.span))
            .collect();
        // Sort by start, widest first, so an outer edit is applied before
        // any edit nested inside it.
        edits.sort_by(|a, b| {
            a.span
                .start
                .cmp(&b.span.start)
                .then(b.span.end.cmp(&a.span.end))
        });

        let mut out = String::new();
        let mut pos = range.start;
        for edit in edits {
            if edit.span.start < pos {
                // Nested inside an edit that was already applied.
                continue;
            }
            out.push_str(&self.source[pos as usize..edit.span.start as usize]);
            out.push_str(&edit.text);
            pos = edit.span.end;
        }
        out.push_str(&self.source[pos as usize..range.end as usize]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_edits_is_identity() {
        let editor = SourceEditor::new("var x = 1;");
        assert_eq!(editor.render(), "var x = 1;");
    }

    #[test]
    fn test_replace_and_delete() {
        let source = "var a = require('a'); doWork();";
        let mut editor = SourceEditor::new(source);
        editor.replace(Span::new(8, 20), "$__a");
        editor.replace(Span::new(22, 31), "");
        assert_eq!(editor.render(), "var a = $__a; ");
    }

    #[test]
    fn test_outer_edit_wins_over_nested() {
        let source = "one two three";
        let mut editor = SourceEditor::new(source);
        editor.replace(Span::new(4, 7), "2");
        editor.replace(Span::new(0, 13), "all");
        assert_eq!(editor.render(), "all");
    }

    #[test]
    fn test_slice_applies_contained_edits() {
        let source = "function () { var x = require('a'); }";
        let mut editor = SourceEditor::new(source);
        editor.replace(Span::new(22, 34), "$__a");
        let body = editor.slice(Span::new(12, 37));
        assert_eq!(body, "{ var x = $__a; }");
    }

    #[test]
    fn test_slice_result_as_outer_replacement() {
        let source = "define(function () { return require('a'); });";
        let mut editor = SourceEditor::new(source);
        editor.replace(Span::new(28, 40), "$__a");
        let body = editor.slice(Span::new(21, 41));
        editor.replace(Span::new(0, 45), body);
        assert_eq!(editor.render(), "return $__a;");
    }

    #[test]
    fn test_insertion_at_point() {
        let mut editor = SourceEditor::new("ab");
        editor.replace(Span::new(1, 1), "X");
        assert_eq!(editor.render(), "aXb");
    }
}
