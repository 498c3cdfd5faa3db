// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser limits.

/// Default cap on recorded diagnostics.
pub const DEFAULT_MAX_ERRORS: usize = 20;

/// Default cap on syntactic nesting.
pub const DEFAULT_MAX_NESTING: usize = 256;

/// Knobs a hosting tool may tune.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct ParserConfig {
    /// Parsing stops once this many diagnostics have been recorded.
    pub max_errors: usize,
    /// Deeper nesting of expressions, types, patterns or blocks is reported
    /// as a single error instead of recursing further.
    pub max_nesting: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { max_errors: DEFAULT_MAX_ERRORS, max_nesting: DEFAULT_MAX_NESTING }
    }
}

impl ParserConfig {
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors.max(1);
        self
    }

    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = ParserConfig::default().with_max_errors(5).with_max_nesting(32);
        assert_eq!(config, ParserConfig { max_errors: 5, max_nesting: 32 });
    }

    #[test]
    fn zero_limits_are_clamped() {
        let config = ParserConfig::default().with_max_errors(0).with_max_nesting(0);
        assert_eq!(config.max_errors, 1);
        assert_eq!(config.max_nesting, 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_partial_config() {
        let config: ParserConfig = serde_json::from_str(r#"{ "max_errors": 3 }"#).unwrap();
        assert_eq!(config.max_errors, 3);
        assert_eq!(config.max_nesting, DEFAULT_MAX_NESTING);
    }
}
