#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a record made of nothing but its terminator is rendered.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EmptyLine {
    /// Render an empty line as `null`.
    Null,
    /// Render an empty line as an empty array, `[]`.
    Array,
}

impl EmptyLine {
    /// The complete output line, terminator included, for an empty record.
    pub(crate) fn token(&self) -> &'static [u8] {
        match *self {
            EmptyLine::Null => b"null\n",
            EmptyLine::Array => b"[]\n",
        }
    }
}

impl Default for EmptyLine {
    fn default() -> EmptyLine {
        EmptyLine::Null
    }
}

/// The knobs that control how strictly CSV input is interpreted.
///
/// A `Config` is a plain value. It is resolved once, handed to a
/// [`Transducer`](crate::Transducer) and never changes for the lifetime of
/// that run.
///
/// Two presets cover the common cases:
///
/// * [`Config::lenient`] (the default) skips blanks around fields and
///   accepts empty lines, rendering them as `null`.
/// * [`Config::rfc4180`] turns on compliant mode, which disables every
///   leniency toggle regardless of how it is set.
///
/// Everything in between can be built with a [`ConfigBuilder`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    compliant: bool,
    ignore_blanks_before_field: bool,
    ignore_blanks_after_quoted_field: bool,
    allow_empty_lines: bool,
    empty_line: EmptyLine,
}

impl Default for Config {
    fn default() -> Config {
        Config::lenient()
    }
}

impl Config {
    /// The lenient profile: blanks around fields are ignored and empty lines
    /// are records of their own, written as `null`.
    pub fn lenient() -> Config {
        Config {
            compliant: false,
            ignore_blanks_before_field: true,
            ignore_blanks_after_quoted_field: true,
            allow_empty_lines: true,
            empty_line: EmptyLine::Null,
        }
    }

    /// The strict RFC 4180 profile.
    ///
    /// Blanks next to a quoted field are errors and so are empty lines.
    pub fn rfc4180() -> Config {
        Config { compliant: true, ..Config::lenient() }
    }

    /// Whether compliant mode is on.
    pub fn compliant(&self) -> bool {
        self.compliant
    }

    /// Whether blanks in front of a field are skipped.
    ///
    /// Always `false` in compliant mode.
    pub fn ignore_blanks_before_field(&self) -> bool {
        !self.compliant && self.ignore_blanks_before_field
    }

    /// Whether blanks between a closing quote and the next separator are
    /// skipped.
    ///
    /// Always `false` in compliant mode.
    pub fn ignore_blanks_after_quoted_field(&self) -> bool {
        !self.compliant && self.ignore_blanks_after_quoted_field
    }

    /// Whether a line holding only a record terminator is a valid record.
    ///
    /// Always `false` in compliant mode.
    pub fn allow_empty_lines(&self) -> bool {
        !self.compliant && self.allow_empty_lines
    }

    /// How an empty record is written.
    pub fn empty_line(&self) -> EmptyLine {
        self.empty_line
    }
}

/// Builds a [`Config`] one toggle at a time.
///
/// The builder starts from the lenient preset.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder seeded with [`Config::lenient`].
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Build the configuration.
    pub fn build(&self) -> Config {
        self.config
    }

    /// Turn compliant mode on or off.
    ///
    /// When on, every leniency toggle below is ignored.
    pub fn compliant(&mut self, yes: bool) -> &mut ConfigBuilder {
        self.config.compliant = yes;
        self
    }

    /// Skip spaces and tabs in front of a field.
    pub fn ignore_blanks_before_field(
        &mut self,
        yes: bool,
    ) -> &mut ConfigBuilder {
        self.config.ignore_blanks_before_field = yes;
        self
    }

    /// Skip spaces and tabs after the closing quote of a quoted field.
    pub fn ignore_blanks_after_quoted_field(
        &mut self,
        yes: bool,
    ) -> &mut ConfigBuilder {
        self.config.ignore_blanks_after_quoted_field = yes;
        self
    }

    /// Accept empty lines as empty records.
    pub fn allow_empty_lines(&mut self, yes: bool) -> &mut ConfigBuilder {
        self.config.allow_empty_lines = yes;
        self
    }

    /// Choose how empty records are written.
    pub fn empty_line(&mut self, repr: EmptyLine) -> &mut ConfigBuilder {
        self.config.empty_line = repr;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigBuilder, EmptyLine};

    #[test]
    fn compliant_overrides_leniency() {
        let config = ConfigBuilder::new()
            .ignore_blanks_before_field(true)
            .ignore_blanks_after_quoted_field(true)
            .allow_empty_lines(true)
            .compliant(true)
            .build();
        assert!(!config.ignore_blanks_before_field());
        assert!(!config.ignore_blanks_after_quoted_field());
        assert!(!config.allow_empty_lines());
        assert_eq!(config, Config::rfc4180());
    }

    #[test]
    fn default_is_lenient() {
        let config = Config::default();
        assert!(config.ignore_blanks_before_field());
        assert!(config.ignore_blanks_after_quoted_field());
        assert!(config.allow_empty_lines());
        assert_eq!(config.empty_line(), EmptyLine::Null);
    }

    #[test]
    fn compliant_keeps_empty_line_repr() {
        let config = ConfigBuilder::new()
            .compliant(true)
            .empty_line(EmptyLine::Array)
            .build();
        assert_eq!(config.empty_line(), EmptyLine::Array);
        assert_eq!(config.empty_line().token(), b"[]\n");
    }

    #[test]
    fn toggles_are_independent() {
        let config =
            ConfigBuilder::new().ignore_blanks_before_field(false).build();
        assert!(!config.ignore_blanks_before_field());
        assert!(config.ignore_blanks_after_quoted_field());
        assert!(config.allow_empty_lines());

        let config = ConfigBuilder::new()
            .ignore_blanks_after_quoted_field(false)
            .build();
        assert!(config.ignore_blanks_before_field());
        assert!(!config.ignore_blanks_after_quoted_field());
        assert!(config.allow_empty_lines());

        let config = ConfigBuilder::new().allow_empty_lines(false).build();
        assert!(config.ignore_blanks_before_field());
        assert!(config.ignore_blanks_after_quoted_field());
        assert!(!config.allow_empty_lines());
    }
}
