use annotype_common::{Result, SyntaxError};

use super::cursor::Cursor;
use super::token::{Token, TokenKind};

/// A token pattern. Consumes from the cursor on a match, leaves it untouched
/// otherwise.
type Matcher = fn(&mut Cursor) -> Option<TokenKind>;

/// Token patterns in priority order: the first matcher that succeeds at a
/// scan position wins. The order is part of the grammar (brackets before
/// the type-name pattern, whitespace before the mapping tokens), so this is
/// deliberately not a longest-match lexer. End-of-input is checked after
/// all of these fail.
const MATCHERS: [Matcher; 10] = [
    collection_start,
    collection_end,
    fixed_collection_start,
    fixed_collection_end,
    type_name,
    separator,
    whitespace,
    mapping_start,
    mapping_arrow,
    mapping_end,
];

/// Hand-written tokenizer for annotation strings.
///
/// Tokens are produced on demand; whitespace is matched and discarded.
pub struct Tokenizer<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Scan the next token, skipping whitespace. At end of input every call
    /// returns an `Eof` token.
    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            let start = self.cursor.position();

            let mut matched = None;
            for matcher in MATCHERS {
                if let Some(kind) = matcher(&mut self.cursor) {
                    matched = Some(kind);
                    break;
                }
            }

            match matched {
                Some(TokenKind::Whitespace) => continue,
                Some(kind) => {
                    let lexeme = self.cursor.slice_from(start.offset);
                    let span = self.cursor.span_from(start);
                    return Ok(Token::new(kind, lexeme, span));
                }
                None => match self.cursor.peek() {
                    Some(found) => {
                        self.cursor.advance();
                        let span = self.cursor.span_from(start);
                        return Err(SyntaxError::InvalidCharacter { found, span });
                    }
                    None => return Ok(Token::eof(self.cursor.span_from(start))),
                },
            }
        }
    }

    /// Tokenize the entire annotation, ending with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }
}

// ---------------------------------------------------------------
// Token patterns
// ---------------------------------------------------------------

fn collection_start(cursor: &mut Cursor) -> Option<TokenKind> {
    cursor.eat('<').then_some(TokenKind::CollectionStart)
}

fn collection_end(cursor: &mut Cursor) -> Option<TokenKind> {
    cursor.eat('>').then_some(TokenKind::CollectionEnd)
}

fn fixed_collection_start(cursor: &mut Cursor) -> Option<TokenKind> {
    cursor.eat('(').then_some(TokenKind::FixedCollectionStart)
}

fn fixed_collection_end(cursor: &mut Cursor) -> Option<TokenKind> {
    cursor.eat(')').then_some(TokenKind::FixedCollectionEnd)
}

/// Matches `#name` instance references and `::`-qualified identifiers
/// (`Foo`, `Foo::Bar`, `::Acme::Widget`). A trailing `::` is left
/// unconsumed.
fn type_name(cursor: &mut Cursor) -> Option<TokenKind> {
    if cursor.peek() == Some('#') {
        if cursor.peek_second().is_some_and(is_word) {
            cursor.advance();
            cursor.eat_while(is_word);
            return Some(TokenKind::TypeName);
        }
        return None;
    }

    let mut matched = false;
    loop {
        if cursor.peek().is_some_and(is_word) {
            cursor.eat_while(is_word);
            matched = true;
        } else if cursor.peek() == Some(':')
            && cursor.peek_second() == Some(':')
            && cursor.peek_nth(2).is_some_and(is_word)
        {
            cursor.advance();
            cursor.advance();
            cursor.eat_while(is_word);
            matched = true;
        } else {
            break;
        }
    }
    matched.then_some(TokenKind::TypeName)
}

fn separator(cursor: &mut Cursor) -> Option<TokenKind> {
    (cursor.eat(',') || cursor.eat(';')).then_some(TokenKind::Separator)
}

fn whitespace(cursor: &mut Cursor) -> Option<TokenKind> {
    if cursor.peek().is_some_and(|c| c.is_ascii_whitespace()) {
        cursor.eat_while(|c| c.is_ascii_whitespace());
        Some(TokenKind::Whitespace)
    } else {
        None
    }
}

fn mapping_start(cursor: &mut Cursor) -> Option<TokenKind> {
    cursor.eat('{').then_some(TokenKind::MappingStart)
}

fn mapping_arrow(cursor: &mut Cursor) -> Option<TokenKind> {
    if cursor.peek() == Some('=') && cursor.peek_second() == Some('>') {
        cursor.advance();
        cursor.advance();
        Some(TokenKind::MappingArrow)
    } else {
        None
    }
}

fn mapping_end(cursor: &mut Cursor) -> Option<TokenKind> {
    cursor.eat('}').then_some(TokenKind::MappingEnd)
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
