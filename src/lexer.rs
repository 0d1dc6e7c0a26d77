use lazy_static::lazy_static;
use regex::Regex;

use std::fmt::{self, Display};

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(
        r###"\s*(==|!=|[-+*/<>=!,;:(){}\[\]]|"[^"]*"?|[A-Za-z_][A-Za-z0-9_]*|[0-9]+|\S)"###
    )
    .unwrap();
}

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Illegal(String),
    Eof,

    Ident(String),
    Int(String),
    Str(String),

    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Eq,
    NotEq,

    Comma,
    Semicolon,
    Colon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,
    Macro,
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Illegal(s) => write!(f, "ILLEGAL({})", s),
            Self::Eof => write!(f, "EOF"),
            Self::Ident(s) | Self::Int(s) => write!(f, "{}", s),
            Self::Str(s) => write!(f, "\"{}\"", s),
            Self::Assign => write!(f, "="),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Bang => write!(f, "!"),
            Self::Asterisk => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Lt => write!(f, "<"),
            Self::Gt => write!(f, ">"),
            Self::Eq => write!(f, "=="),
            Self::NotEq => write!(f, "!="),
            Self::Comma => write!(f, ","),
            Self::Semicolon => write!(f, ";"),
            Self::Colon => write!(f, ":"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::LBrace => write!(f, "{{"),
            Self::RBrace => write!(f, "}}"),
            Self::LBracket => write!(f, "["),
            Self::RBracket => write!(f, "]"),
            Self::Function => write!(f, "fn"),
            Self::Let => write!(f, "let"),
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::If => write!(f, "if"),
            Self::Else => write!(f, "else"),
            Self::Return => write!(f, "return"),
            Self::Macro => write!(f, "macro"),
        }
    }
}

/// Splits `s` into tokens. The returned sequence always ends with
/// [`Token::Eof`].
pub fn tokenize(s: &str) -> Vec<Token> {
    TOKEN_RE
        .captures_iter(s)
        .filter_map(|c| c.get(1).map(|c| c.as_str()))
        .map(read_token)
        .chain(std::iter::once(Token::Eof))
        .collect()
}

fn read_token(token: &str) -> Token {
    match token {
        "==" => Token::Eq,
        "!=" => Token::NotEq,
        "=" => Token::Assign,
        "+" => Token::Plus,
        "-" => Token::Minus,
        "!" => Token::Bang,
        "*" => Token::Asterisk,
        "/" => Token::Slash,
        "<" => Token::Lt,
        ">" => Token::Gt,
        "," => Token::Comma,
        ";" => Token::Semicolon,
        ":" => Token::Colon,
        "(" => Token::LParen,
        ")" => Token::RParen,
        "{" => Token::LBrace,
        "}" => Token::RBrace,
        "[" => Token::LBracket,
        "]" => Token::RBracket,
        token if token.starts_with('"') => read_string(token),
        token if token.starts_with(|c: char| c.is_ascii_digit()) => Token::Int(token.into()),
        token if token.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') => {
            read_word(token)
        }
        token => Token::Illegal(token.into()),
    }
}

fn read_word(word: &str) -> Token {
    match word {
        "fn" => Token::Function,
        "let" => Token::Let,
        "true" => Token::True,
        "false" => Token::False,
        "if" => Token::If,
        "else" => Token::Else,
        "return" => Token::Return,
        "macro" => Token::Macro,
        ident => Token::Ident(ident.into()),
    }
}

fn read_string(token: &str) -> Token {
    if token.len() >= 2 && token.ends_with('"') {
        Token::Str(token[1..token.len() - 1].into())
    } else {
        Token::Illegal(token.into())
    }
}
