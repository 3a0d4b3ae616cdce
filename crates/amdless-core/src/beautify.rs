//! Whole-string re-indenting formatter.
//!
//! Line-based: each line is re-indented by bracket depth, four spaces per
//! level. Quoted strings and line comments are skipped when counting
//! brackets so literal braces do not shift the indentation.

const INDENT: &str = "    ";

/// Re-indent a block of source text.
pub fn beautify(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut depth: usize = 0;

    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            out.push('\n');
            continue;
        }

        // A line starting with a closer belongs to the outer level.
        let mut line_depth = depth;
        if trimmed.starts_with(['}', ')', ']']) {
            line_depth = line_depth.saturating_sub(1);
        }

        for _ in 0..line_depth {
            out.push_str(INDENT);
        }
        out.push_str(trimmed);
        out.push('\n');

        depth = apply_depth(trimmed, depth);
    }

    out
}

/// Net bracket depth after a line, ignoring brackets inside strings,
/// template literals, and line comments.
fn apply_depth(line: &str, mut depth: usize) -> usize {
    let mut chars = line.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '/' if chars.peek() == Some(&'/') => break,
            '{' | '(' | '[' => depth += 1,
            '}' | ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    depth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reindents_nested_blocks() {
        let input = "function f() {\nif (x) {\nreturn 1;\n}\n}\n";
        let expected = "function f() {\n    if (x) {\n        return 1;\n    }\n}\n";
        assert_eq!(beautify(input), expected);
    }

    #[test]
    fn test_braces_in_strings_ignored() {
        let input = "var s = '}{';\nvar t = 1;\n";
        assert_eq!(beautify(input), "var s = '}{';\nvar t = 1;\n");
    }

    #[test]
    fn test_line_comment_ignored() {
        let input = "var a = 1; // {\nvar b = 2;\n";
        assert_eq!(beautify(input), "var a = 1; // {\nvar b = 2;\n");
    }

    #[test]
    fn test_blank_lines_kept() {
        let input = "var a = 1;\n\nvar b = 2;\n";
        assert_eq!(beautify(input), input);
    }
}
