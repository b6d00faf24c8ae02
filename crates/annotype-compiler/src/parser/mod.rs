//! Recursive-descent parser for annotation strings.
//!
//! The grammar has no statements or precedence, only nesting: a frame
//! collects sibling type nodes until its terminating token, and every
//! opening bracket recurses into a child frame for the nested list.

use annotype_common::{Result, SyntaxError};

use crate::lexer::{Token, TokenKind, Tokenizer};
use crate::tree::TypeNode;

/// Parse an annotation string into its list of top-level type nodes.
///
/// `"Foo, Bar"` yields two siblings; `"Array<Foo>"` yields one node with a
/// nested element list. An empty or malformed string is a [`SyntaxError`].
pub fn parse(text: &str) -> Result<Vec<TypeNode>> {
    Parser::new(text).parse_annotation()
}

/// The closing token a recursion frame accepts. Any other closing token,
/// including end of input inside a nested frame, is unbalanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    EndOfInput,
    CollectionEnd,
    FixedCollectionEnd,
    MappingArrow,
    MappingEnd,
}

impl Terminator {
    fn accepts(self, kind: TokenKind) -> bool {
        matches!(
            (self, kind),
            (Terminator::EndOfInput, TokenKind::Eof)
                | (Terminator::CollectionEnd, TokenKind::CollectionEnd)
                | (Terminator::FixedCollectionEnd, TokenKind::FixedCollectionEnd)
                | (Terminator::MappingArrow, TokenKind::MappingArrow)
                | (Terminator::MappingEnd, TokenKind::MappingEnd)
        )
    }

    fn describe(self) -> &'static str {
        match self {
            Terminator::EndOfInput => TokenKind::Eof.describe(),
            Terminator::CollectionEnd => TokenKind::CollectionEnd.describe(),
            Terminator::FixedCollectionEnd => TokenKind::FixedCollectionEnd.describe(),
            Terminator::MappingArrow => TokenKind::MappingArrow.describe(),
            Terminator::MappingEnd => TokenKind::MappingEnd.describe(),
        }
    }
}

/// Pulls tokens lazily and builds type trees by recursing on matching
/// delimiters.
pub struct Parser<'src> {
    tokens: Tokenizer<'src>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            tokens: Tokenizer::new(source),
        }
    }

    /// Parse the whole annotation; the outermost frame runs to end of input.
    pub fn parse_annotation(mut self) -> Result<Vec<TypeNode>> {
        self.parse_frame(Terminator::EndOfInput)
    }

    /// Parse sibling nodes until the frame's terminator, which is consumed.
    ///
    /// Two slots per frame: at most one outstanding bare `name`, and at most
    /// one composite node under construction. A composite keeps its name in
    /// the pending slot until a separator or the terminator finalizes it.
    fn parse_frame(&mut self, until: Terminator) -> Result<Vec<TypeNode>> {
        let mut nodes = Vec::new();
        let mut pending_name: Option<String> = None;
        let mut pending_node: Option<TypeNode> = None;

        loop {
            let token = self.tokens.next_token()?;
            match token.kind {
                TokenKind::TypeName => {
                    if pending_name.is_some() {
                        return Err(SyntaxError::UnexpectedName {
                            name: token.lexeme,
                            span: token.span,
                        });
                    }
                    pending_name = Some(token.lexeme);
                }

                TokenKind::Separator => {
                    nodes.push(finalize(&token, pending_name.take(), pending_node.take())?);
                }

                TokenKind::CollectionStart => {
                    let name = default_name(&mut pending_name, "Array");
                    let elements = self.parse_frame(Terminator::CollectionEnd)?;
                    pending_node = Some(TypeNode::Collection { name, elements });
                }

                TokenKind::FixedCollectionStart => {
                    let name = default_name(&mut pending_name, "Array");
                    let elements = self.parse_frame(Terminator::FixedCollectionEnd)?;
                    pending_node = Some(TypeNode::FixedCollection { name, elements });
                }

                TokenKind::MappingStart => {
                    let name = default_name(&mut pending_name, "Hash");
                    let keys = self.parse_frame(Terminator::MappingArrow)?;
                    let values = self.parse_frame(Terminator::MappingEnd)?;
                    pending_node = Some(TypeNode::Mapping { name, keys, values });
                }

                TokenKind::CollectionEnd
                | TokenKind::FixedCollectionEnd
                | TokenKind::MappingArrow
                | TokenKind::MappingEnd
                | TokenKind::Eof => {
                    if !until.accepts(token.kind) {
                        return Err(SyntaxError::Unbalanced {
                            expected: until.describe().to_string(),
                            found: token.describe(),
                            span: token.span,
                        });
                    }
                    nodes.push(finalize(&token, pending_name.take(), pending_node.take())?);
                    return Ok(nodes);
                }

                // The tokenizer discards whitespace.
                TokenKind::Whitespace => continue,
            }
        }
    }
}

/// Close out the node under construction when a separator or terminator
/// arrives: the pending composite if one exists, else a `Simple` from the
/// pending name. A name must be outstanding either way.
fn finalize(
    token: &Token,
    pending_name: Option<String>,
    pending_node: Option<TypeNode>,
) -> Result<TypeNode> {
    let Some(name) = pending_name else {
        return Err(SyntaxError::MissingName {
            found: token.describe(),
            span: token.span,
        });
    };
    Ok(pending_node.unwrap_or(TypeNode::Simple { name }))
}

fn default_name(pending: &mut Option<String>, fallback: &str) -> String {
    pending.get_or_insert_with(|| fallback.to_string()).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TypeNode::{Collection, FixedCollection, Mapping};

    fn parse_ok(text: &str) -> Vec<TypeNode> {
        parse(text).unwrap_or_else(|e| panic!("parse failed for {:?}: {}", text, e))
    }

    fn parse_err(text: &str) -> SyntaxError {
        parse(text).expect_err("expected a syntax error")
    }

    #[test]
    fn simple_name() {
        assert_eq!(parse_ok("Foo"), vec![TypeNode::simple("Foo")]);
    }

    #[test]
    fn union_of_names() {
        assert_eq!(
            parse_ok("Foo, Bar"),
            vec![TypeNode::simple("Foo"), TypeNode::simple("Bar")]
        );
    }

    #[test]
    fn semicolon_union() {
        assert_eq!(
            parse_ok("Foo; Bar"),
            vec![TypeNode::simple("Foo"), TypeNode::simple("Bar")]
        );
    }

    #[test]
    fn collection_with_elements() {
        assert_eq!(
            parse_ok("Array<Foo, Bar>"),
            vec![Collection {
                name: "Array".to_string(),
                elements: vec![TypeNode::simple("Foo"), TypeNode::simple("Bar")],
            }]
        );
    }

    #[test]
    fn fixed_collection_defaults_its_name() {
        assert_eq!(
            parse_ok("(Foo, Bar)"),
            vec![FixedCollection {
                name: "Array".to_string(),
                elements: vec![TypeNode::simple("Foo"), TypeNode::simple("Bar")],
            }]
        );
    }

    #[test]
    fn named_fixed_collection() {
        assert_eq!(
            parse_ok("Tuple(Foo, Bar)"),
            vec![FixedCollection {
                name: "Tuple".to_string(),
                elements: vec![TypeNode::simple("Foo"), TypeNode::simple("Bar")],
            }]
        );
    }

    #[test]
    fn collection_defaults_its_name() {
        assert_eq!(
            parse_ok("<Foo>"),
            vec![Collection {
                name: "Array".to_string(),
                elements: vec![TypeNode::simple("Foo")],
            }]
        );
    }

    #[test]
    fn mapping() {
        assert_eq!(
            parse_ok("Hash{Symbol => String}"),
            vec![Mapping {
                name: "Hash".to_string(),
                keys: vec![TypeNode::simple("Symbol")],
                values: vec![TypeNode::simple("String")],
            }]
        );
    }

    #[test]
    fn mapping_defaults_its_name() {
        assert_eq!(
            parse_ok("{Symbol => String}"),
            vec![Mapping {
                name: "Hash".to_string(),
                keys: vec![TypeNode::simple("Symbol")],
                values: vec![TypeNode::simple("String")],
            }]
        );
    }

    #[test]
    fn mapping_with_union_keys() {
        assert_eq!(
            parse_ok("Hash{String, Symbol => Integer}"),
            vec![Mapping {
                name: "Hash".to_string(),
                keys: vec![TypeNode::simple("String"), TypeNode::simple("Symbol")],
                values: vec![TypeNode::simple("Integer")],
            }]
        );
    }

    #[test]
    fn nested_collections() {
        assert_eq!(
            parse_ok("Array<Array<String>>"),
            vec![Collection {
                name: "Array".to_string(),
                elements: vec![Collection {
                    name: "Array".to_string(),
                    elements: vec![TypeNode::simple("String")],
                }],
            }]
        );
    }

    #[test]
    fn mapping_nested_in_collection() {
        assert_eq!(
            parse_ok("Array<Hash{Symbol => String}>"),
            vec![Collection {
                name: "Array".to_string(),
                elements: vec![Mapping {
                    name: "Hash".to_string(),
                    keys: vec![TypeNode::simple("Symbol")],
                    values: vec![TypeNode::simple("String")],
                }],
            }]
        );
    }

    #[test]
    fn collection_followed_by_sibling() {
        assert_eq!(
            parse_ok("Array<Foo>, Bar"),
            vec![
                Collection {
                    name: "Array".to_string(),
                    elements: vec![TypeNode::simple("Foo")],
                },
                TypeNode::simple("Bar"),
            ]
        );
    }

    #[test]
    fn qualified_and_reference_names() {
        assert_eq!(
            parse_ok("::Acme::Widget, #save"),
            vec![TypeNode::simple("::Acme::Widget"), TypeNode::simple("#save")]
        );
    }

    // --- Errors ---

    #[test]
    fn two_bare_names_is_an_error() {
        match parse_err("Foo Bar") {
            SyntaxError::UnexpectedName { name, span } => {
                assert_eq!(name, "Bar");
                assert_eq!(span.start.column, 5);
            }
            other => panic!("expected unexpected-name error, got {:?}", other),
        }
    }

    #[test]
    fn separator_without_a_name_is_an_error() {
        match parse_err(", Foo") {
            SyntaxError::MissingName { found, .. } => assert_eq!(found, "','"),
            other => panic!("expected missing-name error, got {:?}", other),
        }
    }

    #[test]
    fn empty_annotation_is_an_error() {
        match parse_err("") {
            SyntaxError::MissingName { found, .. } => assert_eq!(found, "end of annotation"),
            other => panic!("expected missing-name error, got {:?}", other),
        }
    }

    #[test]
    fn empty_collection_is_an_error() {
        match parse_err("Array<>") {
            SyntaxError::MissingName { found, .. } => assert_eq!(found, "'>'"),
            other => panic!("expected missing-name error, got {:?}", other),
        }
    }

    #[test]
    fn unclosed_collection_is_an_error() {
        match parse_err("Foo<Bar") {
            SyntaxError::Unbalanced {
                expected, found, ..
            } => {
                assert_eq!(expected, "'>'");
                assert_eq!(found, "end of annotation");
            }
            other => panic!("expected unbalanced error, got {:?}", other),
        }
    }

    #[test]
    fn stray_close_is_an_error() {
        match parse_err("Foo>") {
            SyntaxError::Unbalanced {
                expected, found, ..
            } => {
                assert_eq!(expected, "end of annotation");
                assert_eq!(found, "'>'");
            }
            other => panic!("expected unbalanced error, got {:?}", other),
        }
    }

    #[test]
    fn mismatched_close_is_an_error() {
        assert!(matches!(
            parse_err("Array<Foo)"),
            SyntaxError::Unbalanced { .. }
        ));
    }

    #[test]
    fn mapping_without_arrow_is_an_error() {
        match parse_err("Hash{Symbol}") {
            SyntaxError::Unbalanced {
                expected, found, ..
            } => {
                assert_eq!(expected, "'=>'");
                assert_eq!(found, "'}'");
            }
            other => panic!("expected unbalanced error, got {:?}", other),
        }
    }

    #[test]
    fn invalid_character_is_an_error() {
        match parse_err("Foo & Bar") {
            SyntaxError::InvalidCharacter { found, .. } => assert_eq!(found, '&'),
            other => panic!("expected invalid-character error, got {:?}", other),
        }
    }
}
