use std::fmt;

use annotype_common::Span;

/// A single token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn eof(span: Span) -> Self {
        Self {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            span,
        }
    }

    /// Human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of annotation".to_string(),
            _ => format!("'{}'", self.lexeme),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind, self.lexeme)
    }
}

/// All token kinds in the annotation grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    CollectionStart,      // <
    CollectionEnd,        // >
    FixedCollectionStart, // (
    FixedCollectionEnd,   // )

    /// A type name: bare (`Foo`), qualified (`::Acme::Widget`), or an
    /// instance reference (`#save`).
    TypeName,

    Separator, // , or ;

    /// Matched and then discarded; never reaches the parser.
    Whitespace,

    MappingStart, // {
    MappingArrow, // =>
    MappingEnd,   // }

    /// End of the annotation string.
    Eof,
}

impl TokenKind {
    /// Description of the kind itself, for "expected ..." messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::CollectionStart => "'<'",
            TokenKind::CollectionEnd => "'>'",
            TokenKind::FixedCollectionStart => "'('",
            TokenKind::FixedCollectionEnd => "')'",
            TokenKind::TypeName => "a type name",
            TokenKind::Separator => "','",
            TokenKind::Whitespace => "whitespace",
            TokenKind::MappingStart => "'{'",
            TokenKind::MappingArrow => "'=>'",
            TokenKind::MappingEnd => "'}'",
            TokenKind::Eof => "end of annotation",
        }
    }
}
