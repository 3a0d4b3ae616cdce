/// Options for one conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// Re-indent the generated module body.
    pub beautify: bool,

    /// Derive import binding names from the last path segment's filename stem
    /// instead of a sigil-prefixed sanitized full path.
    pub logical_names: bool,
}

impl ConvertOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the beautify pass.
    #[must_use]
    pub fn with_beautify(mut self, beautify: bool) -> Self {
        self.beautify = beautify;
        self
    }

    /// Set logical binding names.
    #[must_use]
    pub fn with_logical_names(mut self, logical: bool) -> Self {
        self.logical_names = logical;
        self
    }
}
