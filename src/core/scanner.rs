//! Source scanning.
//!
//! Every character is a potential token. The eight operators are recognised,
//! everything else is a comment and is skipped. Line and column numbers are
//! 1-based and counted in characters.

use std::str::Chars;

/// One tape-language operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Increment,
    Decrement,
    MoveRight,
    MoveLeft,
    Output,
    Input,
    LoopBegin,
    LoopEnd,
}

impl Token {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Token::Increment),
            '-' => Some(Token::Decrement),
            '>' => Some(Token::MoveRight),
            '<' => Some(Token::MoveLeft),
            '.' => Some(Token::Output),
            ',' => Some(Token::Input),
            '[' => Some(Token::LoopBegin),
            ']' => Some(Token::LoopEnd),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Token::Increment => '+',
            Token::Decrement => '-',
            Token::MoveRight => '>',
            Token::MoveLeft => '<',
            Token::Output => '.',
            Token::Input => ',',
            Token::LoopBegin => '[',
            Token::LoopEnd => ']',
        }
    }
}

/// Source position of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A token together with where it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub pos: Position,
}

/// Iterator over the operators of a source text.
pub struct Scanner<'src> {
    chars: Chars<'src>,
    line: usize,
    column: usize,
    ignored: usize,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            chars: source.chars(),
            line: 1,
            column: 0,
            ignored: 0,
        }
    }

    /// Number of non-operator characters skipped so far.
    pub fn ignored(&self) -> usize {
        self.ignored
    }
}

impl Iterator for Scanner<'_> {
    type Item = Spanned;

    fn next(&mut self) -> Option<Spanned> {
        for c in self.chars.by_ref() {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
                self.ignored += 1;
                continue;
            }
            self.column += 1;
            match Token::from_char(c) {
                Some(token) => {
                    return Some(Spanned {
                        token,
                        pos: Position {
                            line: self.line,
                            column: self.column,
                        },
                    })
                }
                None => self.ignored += 1,
            }
        }
        None
    }
}
