//! Tokens as seen by the parser.
//!
//! A token keeps its source and byte offset for the lifetime of the
//! compilation so that every later phase can point diagnostics at the
//! exact place a construct came from.

use crate::interner::Name;
use crate::source::{SourceId, Span};
use serde::Serialize;

/// Token kinds (lexical syntax).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum TokenKind {
    /// An identifier or keyword; keywords are recognized by name equality.
    Word(Name),
    /// A decimal integer literal.
    Int(i64),
    /// A string literal, interned after escape processing.
    Str(Name),

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Dot,
    Comma,
    Semicolon,
    Colon,
    Minus,
    Plus,
    Star,
    Slash,
    MinusMinus,
    PlusPlus,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Assign,
    EqEq,
}

impl TokenKind {
    /// Short kind name for diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Word(_) => "identifier",
            TokenKind::Int(_) => "integer literal",
            TokenKind::Str(_) => "string literal",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Dot => "`.`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Colon => "`:`",
            TokenKind::Minus => "`-`",
            TokenKind::Plus => "`+`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::MinusMinus => "`--`",
            TokenKind::PlusPlus => "`++`",
            TokenKind::Amp => "`&`",
            TokenKind::Pipe => "`|`",
            TokenKind::Caret => "`^`",
            TokenKind::Tilde => "`~`",
            TokenKind::Bang => "`!`",
            TokenKind::Assign => "`=`",
            TokenKind::EqEq => "`==`",
        }
    }
}

/// A lexed token.
#[derive(Clone, Copy, Debug)]
pub struct Token {
    pub source: SourceId,
    /// Byte offset of the first character of the lexeme.
    pub offset: u32,
    pub kind: TokenKind,
}

impl Token {
    /// A one-character span at the token's position, for diagnostics.
    pub fn span(&self) -> Span {
        Span::new(self.source, self.offset as usize, self.offset as usize + 1)
    }
}
