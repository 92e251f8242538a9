use std::mem;

use thiserror::Error;

use crate::{
    ast::{Literal, Node, Token},
    lexer::{LexError, Lexer, Position},
};

/// Name of the function a head-less list desugars to.
pub const IMPLICIT_FUNCTION: &str = "elem";

/// Lists nested deeper than this are rejected instead of recursing further.
pub const MAX_NESTING: usize = 256;

/// Errors produced while parsing a query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, got {found} at {position}")]
    UnexpectedToken {
        expected: &'static str,
        found: Token,
        position: Position,
    },

    #[error("empty list at {position}")]
    EmptyList { position: Position },

    #[error("unclosed list starting at {position}")]
    UnclosedList { position: Position },

    #[error(
        "identifier '{name}' at {position} can only appear at the head of a list (use \"{name}\" for a field name)"
    )]
    BareIdentifier { name: String, position: Position },

    #[error(
        "list at {position} has {len} elements but no function name; only one or two are allowed"
    )]
    HeadlessList { len: usize, position: Position },

    #[error("lists nested deeper than {limit} levels at {position}")]
    TooDeep { limit: usize, position: Position },
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_position: Position,
    depth: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        let current_position = lexer.token_start();
        Ok(Parser {
            lexer,
            current_token,
            current_position,
            depth: 0,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        self.current_position = self.lexer.token_start();
        Ok(())
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    /// Parse a single expression: a literal or a parenthesized list.
    pub fn parse_expression(&mut self) -> Result<Node, ParseError> {
        let position = self.current_position;
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Integer(n) => {
                self.advance()?;
                Ok(Node::Literal(Literal::Integer(n)))
            }
            Token::String(s) => {
                self.advance()?;
                Ok(Node::Literal(Literal::String(s)))
            }
            Token::Boolean(b) => {
                self.advance()?;
                Ok(Node::Literal(Literal::Boolean(b)))
            }
            Token::Null => {
                self.advance()?;
                Ok(Node::Literal(Literal::Null))
            }
            Token::LParen => {
                if self.depth >= MAX_NESTING {
                    return Err(ParseError::TooDeep {
                        limit: MAX_NESTING,
                        position,
                    });
                }
                self.depth += 1;
                self.advance()?;
                let list = self.parse_list(position);
                self.depth -= 1;
                list
            }
            Token::Identifier(name) => Err(ParseError::BareIdentifier { name, position }),
            found => Err(ParseError::UnexpectedToken {
                expected: "an expression",
                found,
                position,
            }),
        }
    }

    /// Parse the remainder of a list after its opening parenthesis.
    fn parse_list(&mut self, start: Position) -> Result<Node, ParseError> {
        if let Token::Identifier(name) = &self.current_token {
            let name = name.clone();
            self.advance()?;
            let args = self.parse_elements(start)?;
            return Ok(Node::Call { name, args });
        }

        // No function name: `(a)` and `(a b)` are shorthand for elem.
        let elements = self.parse_elements(start)?;
        match elements.len() {
            0 => Err(ParseError::EmptyList { position: start }),
            1 | 2 => Ok(Node::call(IMPLICIT_FUNCTION, elements)),
            len => Err(ParseError::HeadlessList {
                len,
                position: start,
            }),
        }
    }

    fn parse_elements(&mut self, start: Position) -> Result<Vec<Node>, ParseError> {
        let mut elements = vec![];

        loop {
            if self.check(&Token::RParen) {
                self.advance()?;
                return Ok(elements);
            }
            if self.check(&Token::Eof) {
                return Err(ParseError::UnclosedList { position: start });
            }
            elements.push(self.parse_expression()?);
        }
    }

    /// Parse a complete query; anything after the first expression is an error.
    pub fn parse(&mut self) -> Result<Node, ParseError> {
        let node = self.parse_expression()?;
        if !self.check(&Token::Eof) {
            return Err(ParseError::UnexpectedToken {
                expected: "end of input",
                found: mem::replace(&mut self.current_token, Token::Eof),
                position: self.current_position,
            });
        }
        Ok(node)
    }
}

/// Convenience wrapper: tokenize and parse `query` in one step.
pub fn parse(query: &str) -> Result<Node, ParseError> {
    Parser::new(Lexer::new(query))?.parse()
}
