use crate::{
    error::{ParseError, parse_error::ParseResult},
    functional::quadrature::QuadratureSettings,
};

/// Glyphs and numeric settings that shape how input is read.
///
/// ## Example
/// ```
/// use mathtree::{Parser, syntax::config::ParserConfig};
///
/// let config = ParserConfig { decimal_separator: ',',
///                             argument_separator: ';',
///                             ..ParserConfig::default() };
/// let expr = Parser::with_config(config).unwrap().parse("max(1,5; 2)").unwrap();
///
/// assert_eq!(expr.evaluate(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Separates the integral and fractional digits of a number.
    pub decimal_separator:  char,
    /// Separates arguments of calls and groups of a block.
    pub argument_separator: char,
    /// Characters removed from the input before scanning.
    pub stripped:           String,
    /// Settings handed to adaptive integrals.
    pub quadrature:         QuadratureSettings,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { decimal_separator:  '.',
               argument_separator: ',',
               stripped:           " \t\r\n".to_string(),
               quadrature:         QuadratureSettings::default(), }
    }
}

impl ParserConfig {
    /// Checks that the configured glyphs do not collide.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if both separators are the same character, if
    /// either is a bracket, a digit or a letter, or if a separator is stripped.
    pub fn validate(&self) -> ParseResult<()> {
        let invalid = |details: String| Err(ParseError::InvalidConfig { details });

        if self.decimal_separator == self.argument_separator {
            return invalid(format!("decimal and argument separators are both '{}'",
                                   self.decimal_separator));
        }
        for (role, glyph) in [("decimal", self.decimal_separator),
                              ("argument", self.argument_separator)]
        {
            if "()[]{}".contains(glyph) || glyph.is_alphanumeric() {
                return invalid(format!("{role} separator '{glyph}' is reserved"));
            }
            if self.stripped.contains(glyph) {
                return invalid(format!("{role} separator '{glyph}' is stripped from the input"));
            }
        }
        self.quadrature.validate()
    }

    /// Removes every stripped character from `input`.
    #[must_use]
    pub fn strip(&self, input: &str) -> String {
        input.chars().filter(|c| !self.stripped.contains(*c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ParserConfig::default().validate().is_ok());
    }

    #[test]
    fn colliding_separators_are_rejected() {
        let config = ParserConfig { decimal_separator: ',',
                                    ..ParserConfig::default() };

        assert!(matches!(config.validate(), Err(ParseError::InvalidConfig { .. })));
    }

    #[test]
    fn strip_removes_whitespace_and_newlines() {
        assert_eq!(ParserConfig::default().strip(" 1 +\n2\t"), "1+2");
    }
}
