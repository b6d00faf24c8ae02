use thiserror::Error;

use crate::span::Span;

/// Errors raised while scanning or parsing an annotation string.
///
/// Parsing aborts on the first error; there is no recovery and no partial
/// tree. Every variant carries the span of the offending input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// No token pattern matched at the current scan position.
    #[error("invalid character '{found}' at {span}")]
    InvalidCharacter { found: char, span: Span },

    /// A second bare type name arrived while one was still pending,
    /// e.g. `"Foo Bar"`.
    #[error("expected separator or end of annotation, found name '{name}' at {span}")]
    UnexpectedName { name: String, span: Span },

    /// A separator or closing token arrived before any type name,
    /// e.g. `", Foo"` or `"Array<>"`.
    #[error("expected type name, found {found} at {span}")]
    MissingName { found: String, span: Span },

    /// A closing token did not match the collection it would close,
    /// e.g. `"Foo<Bar"` (input ends inside `<`) or a stray `">"`.
    #[error("expected {expected}, found {found} at {span}")]
    Unbalanced {
        expected: String,
        found: String,
        span: Span,
    },
}

impl SyntaxError {
    /// Span of the offending character or token.
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::InvalidCharacter { span, .. }
            | SyntaxError::UnexpectedName { span, .. }
            | SyntaxError::MissingName { span, .. }
            | SyntaxError::Unbalanced { span, .. } => *span,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyntaxError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Position;

    fn span_at(column: u32) -> Span {
        let at = Position {
            line: 1,
            column,
            offset: column - 1,
        };
        Span::new(at, at)
    }

    #[test]
    fn invalid_character_display() {
        let e = SyntaxError::InvalidCharacter {
            found: '&',
            span: span_at(5),
        };
        assert_eq!(e.to_string(), "invalid character '&' at 1:5");
    }

    #[test]
    fn missing_name_display() {
        let e = SyntaxError::MissingName {
            found: "','".to_string(),
            span: span_at(1),
        };
        assert_eq!(e.to_string(), "expected type name, found ',' at 1:1");
    }

    #[test]
    fn unbalanced_display() {
        let e = SyntaxError::Unbalanced {
            expected: "'>'".to_string(),
            found: "end of annotation".to_string(),
            span: span_at(8),
        };
        assert_eq!(
            e.to_string(),
            "expected '>', found end of annotation at 1:8"
        );
    }

    #[test]
    fn span_accessor() {
        let e = SyntaxError::UnexpectedName {
            name: "Bar".to_string(),
            span: span_at(5),
        };
        assert_eq!(e.span().start.column, 5);
    }
}
