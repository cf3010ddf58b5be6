//! Minimal ECMAScript tokenizer
//!
//! Only precise enough to find top-level import declarations: it understands
//! strings, template literals, comments and regular expression literals so
//! that their contents never look like code, and it verifies that brackets
//! are balanced. Anything it does not understand is reported as an error
//! and the caller falls back to pattern matching.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// Identifier or keyword
    Ident(String),
    /// String literal contents without the quotes
    Str(String),
    /// Single punctuator character; multi-character operators arrive one char at a time
    Punct(char),
    Number,
    /// A piece of template literal text
    Template,
    Regex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Spanned {
    pub token: Token,
    /// Character offset of the token start
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated string literal at offset {0}")]
    UnterminatedString(usize),

    #[error("unterminated template literal at offset {0}")]
    UnterminatedTemplate(usize),

    #[error("unterminated block comment at offset {0}")]
    UnterminatedComment(usize),

    #[error("unterminated regular expression at offset {0}")]
    UnterminatedRegex(usize),

    #[error("unbalanced '{ch}' at offset {offset}")]
    Unbalanced { ch: char, offset: usize },

    #[error("unclosed bracket at end of input")]
    Unclosed,

    #[error("unsupported character '{ch}' at offset {offset}")]
    Unsupported { ch: char, offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Brace,
    Paren,
    Bracket,
    /// `${` inside a template literal
    TemplateExpr,
}

const PUNCTUATORS: &str = "{}()[];,<>+-*%&|^!~?:=.";

/// Keywords after which a `/` starts a regular expression rather than a division
const REGEX_PREFIX_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await",
];

pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>, LexError> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    frames: Vec<Frame>,
    tokens: Vec<Spanned>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            frames: Vec::new(),
            tokens: Vec::new(),
        }
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn push(&mut self, token: Token, offset: usize) {
        self.tokens.push(Spanned { token, offset });
    }

    fn run(mut self) -> Result<Vec<Spanned>, LexError> {
        // Hashbang line
        if self.peek(0) == Some('#') && self.peek(1) == Some('!') {
            self.skip_line();
        }

        while let Some(ch) = self.peek(0) {
            let start = self.pos;

            if ch.is_whitespace() || ch == '\u{feff}' {
                self.pos += 1;
            } else if ch == '/' && self.peek(1) == Some('/') {
                self.skip_line();
            } else if ch == '/' && self.peek(1) == Some('*') {
                self.skip_block_comment(start)?;
            } else if ch == '/' {
                if self.regex_allowed() {
                    self.lex_regex(start)?;
                } else {
                    self.pos += 1;
                    self.push(Token::Punct('/'), start);
                }
            } else if ch == '\'' || ch == '"' {
                self.lex_string(ch, start)?;
            } else if ch == '`' {
                self.pos += 1;
                self.lex_template(start)?;
            } else if ch.is_ascii_digit() || (ch == '.' && self.peek(1).is_some_and(|c| c.is_ascii_digit())) {
                self.lex_number();
                self.push(Token::Number, start);
            } else if is_ident_start(ch) || (ch == '#' && self.peek(1).is_some_and(is_ident_start)) {
                self.pos += 1;
                let ident = self.lex_ident_rest(start);
                self.push(Token::Ident(ident), start);
            } else if PUNCTUATORS.contains(ch) {
                self.pos += 1;
                if self.lex_bracket(ch, start)? {
                    continue;
                }
                self.push(Token::Punct(ch), start);
            } else {
                return Err(LexError::Unsupported { ch, offset: start });
            }
        }

        if !self.frames.is_empty() {
            return Err(LexError::Unclosed);
        }

        Ok(self.tokens)
    }

    /// Track bracket nesting. Returns true when the character closed a
    /// template expression and lexing already resumed inside the template.
    fn lex_bracket(&mut self, ch: char, start: usize) -> Result<bool, LexError> {
        match ch {
            '{' => self.frames.push(Frame::Brace),
            '(' => self.frames.push(Frame::Paren),
            '[' => self.frames.push(Frame::Bracket),
            '}' | ')' | ']' => {
                let expected = match ch {
                    '}' => Frame::Brace,
                    ')' => Frame::Paren,
                    _ => Frame::Bracket,
                };
                match self.frames.pop() {
                    Some(Frame::TemplateExpr) if ch == '}' => {
                        self.push(Token::Punct('}'), start);
                        self.lex_template(start)?;
                        return Ok(true);
                    }
                    Some(frame) if frame == expected => {}
                    _ => return Err(LexError::Unbalanced { ch, offset: start }),
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn regex_allowed(&self) -> bool {
        match self.tokens.last().map(|t| &t.token) {
            None => true,
            Some(Token::Punct(c)) => !matches!(c, ')' | ']' | '}'),
            Some(Token::Ident(word)) => REGEX_PREFIX_KEYWORDS.contains(&word.as_str()),
            Some(_) => false,
        }
    }

    fn skip_line(&mut self) {
        while let Some(ch) = self.peek(0) {
            if ch == '\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self, start: usize) -> Result<(), LexError> {
        self.pos += 2;
        loop {
            match self.peek(0) {
                None => return Err(LexError::UnterminatedComment(start)),
                Some('*') if self.peek(1) == Some('/') => {
                    self.pos += 2;
                    return Ok(());
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn lex_string(&mut self, quote: char, start: usize) -> Result<(), LexError> {
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.peek(0) {
                None | Some('\n') => return Err(LexError::UnterminatedString(start)),
                Some('\\') => {
                    match self.peek(1) {
                        None => return Err(LexError::UnterminatedString(start)),
                        // Line continuation
                        Some('\n') => {}
                        Some(escaped) => value.push(escaped),
                    }
                    self.pos += 2;
                }
                Some(ch) if ch == quote => {
                    self.pos += 1;
                    self.push(Token::Str(value), start);
                    return Ok(());
                }
                Some(ch) => {
                    value.push(ch);
                    self.pos += 1;
                }
            }
        }
    }

    /// Lex template text up to the closing backtick or the next `${`.
    /// The opening backtick (or closing brace of an expression) is already consumed.
    fn lex_template(&mut self, start: usize) -> Result<(), LexError> {
        loop {
            match self.peek(0) {
                None => return Err(LexError::UnterminatedTemplate(start)),
                Some('\\') => self.pos += 2,
                Some('`') => {
                    self.pos += 1;
                    self.push(Token::Template, start);
                    return Ok(());
                }
                Some('$') if self.peek(1) == Some('{') => {
                    let brace = self.pos + 1;
                    self.push(Token::Template, start);
                    self.pos += 2;
                    self.frames.push(Frame::TemplateExpr);
                    self.push(Token::Punct('{'), brace);
                    return Ok(());
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn lex_regex(&mut self, start: usize) -> Result<(), LexError> {
        self.pos += 1;
        let mut in_class = false;
        loop {
            match self.peek(0) {
                None | Some('\n') => return Err(LexError::UnterminatedRegex(start)),
                Some('\\') => self.pos += 2,
                Some('[') => {
                    in_class = true;
                    self.pos += 1;
                }
                Some(']') => {
                    in_class = false;
                    self.pos += 1;
                }
                Some('/') if !in_class => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        // Flags
        while self.peek(0).is_some_and(is_ident_part) {
            self.pos += 1;
        }
        self.push(Token::Regex, start);
        Ok(())
    }

    fn lex_number(&mut self) {
        while self
            .peek(0)
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            self.pos += 1;
        }
    }

    fn lex_ident_rest(&mut self, start: usize) -> String {
        while self.peek(0).is_some_and(is_ident_part) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}
