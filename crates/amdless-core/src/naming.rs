//! Import binding name synthesis.
//!
//! Names are generated from module paths and deduplicated against every
//! identifier already bound in the file, plus every name generated earlier
//! in the same conversion.

use rustc_hash::FxHashSet;

/// Allocates collision-free binding names for one conversion.
#[derive(Debug)]
pub struct NameAllocator {
    used: FxHashSet<String>,
    logical: bool,
}

impl NameAllocator {
    /// Create an allocator seeded with the names already bound in the file.
    pub fn new(used: FxHashSet<String>, logical: bool) -> Self {
        Self { used, logical }
    }

    /// Record a name as taken without generating anything.
    pub fn reserve(&mut self, name: &str) {
        self.used.insert(name.to_string());
    }

    /// Synthesize a binding name for a module path.
    ///
    /// Default form is `$__` plus the full path with each run of
    /// non-identifier characters collapsed to a single `_`. Logical form
    /// takes the filename stem of the last path segment. Either way a
    /// numeric suffix resolves collisions.
    pub fn name_for(&mut self, path: &str) -> String {
        let base = if self.logical {
            logical_stem(path)
        } else {
            format!("$__{}", sanitize(path))
        };

        let mut name = base.clone();
        let mut counter = 0u32;
        while self.used.contains(&name) {
            counter += 1;
            name = format!("{base}{counter}");
        }
        self.used.insert(name.clone());
        name
    }
}

/// Collapse each run of characters outside `[A-Za-z0-9_$]` to one `_`, so
/// `../utils/x` becomes `_utils_x` rather than `___utils_x`.
fn sanitize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut in_run = false;
    for c in path.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// Filename stem of the last path segment, sanitized into an identifier.
fn logical_stem(path: &str) -> String {
    let segment = path.rsplit('/').next().unwrap_or(path);
    let stem = match segment.rfind('.') {
        Some(0) | None => segment,
        Some(dot) => &segment[..dot],
    };
    let mut name = sanitize(stem);
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocator(logical: bool) -> NameAllocator {
        NameAllocator::new(FxHashSet::default(), logical)
    }

    #[test]
    fn test_default_name_sanitizes_full_path() {
        let mut names = allocator(false);
        assert_eq!(names.name_for("../utils/date-helper.js"), "$___utils_date_helper_js");
        assert_eq!(names.name_for("a"), "$__a");
    }

    #[test]
    fn test_separator_runs_collapse_to_one_underscore() {
        let mut names = allocator(false);
        assert_eq!(names.name_for("a//b.js"), "$__a_b_js");
        assert_eq!(names.name_for("./../c"), "$___c");
    }

    #[test]
    fn test_logical_name_takes_stem() {
        let mut names = allocator(true);
        assert_eq!(names.name_for("../utils/date-helper.js"), "date_helper");
    }

    #[test]
    fn test_collision_gets_numeric_suffix() {
        let mut names = allocator(true);
        assert_eq!(names.name_for("a/date-helper.js"), "date_helper");
        assert_eq!(names.name_for("b/date-helper.js"), "date_helper1");
        assert_eq!(names.name_for("c/date-helper.js"), "date_helper2");
    }

    #[test]
    fn test_reserved_names_collide() {
        let mut names = allocator(true);
        names.reserve("widget");
        assert_eq!(names.name_for("lib/widget.js"), "widget1");
    }

    #[test]
    fn test_logical_name_leading_digit() {
        let mut names = allocator(true);
        assert_eq!(names.name_for("lib/3d-math.js"), "_3d_math");
    }
}
