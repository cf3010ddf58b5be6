//! Structural import extraction over the token stream

use super::lexer::{tokenize, LexError, Spanned, Token};
use thiserror::Error;

/// Why the structural strategy gave up
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("malformed import declaration at offset {0}")]
    MalformedImport(usize),
}

/// Result of the structural strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralParse {
    /// Sources of every top-level import declaration, in order
    Imports(Vec<String>),
    Unparseable(ParseFailure),
}

/// Collect the module specifier of every top-level `import` declaration.
///
/// Dynamic `import()` calls and `import.meta` are expressions, not
/// declarations, and are ignored.
pub fn parse_imports(source: &str) -> StructuralParse {
    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(e) => return StructuralParse::Unparseable(e.into()),
    };

    match collect_declarations(&tokens) {
        Ok(imports) => StructuralParse::Imports(imports),
        Err(failure) => StructuralParse::Unparseable(failure),
    }
}

fn collect_declarations(tokens: &[Spanned]) -> Result<Vec<String>, ParseFailure> {
    let mut imports = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i].token {
            Token::Punct('{' | '(' | '[') => depth += 1,
            Token::Punct('}' | ')' | ']') => depth = depth.saturating_sub(1),
            Token::Ident(word) if word == "import" && depth == 0 && !follows_dot(tokens, i) => {
                if matches!(
                    tokens.get(i + 1).map(|t| &t.token),
                    Some(Token::Punct('(' | '.'))
                ) {
                    i += 1;
                    continue;
                }
                let mut cursor = Cursor { tokens, pos: i + 1 };
                let specifier = cursor
                    .import_declaration()
                    .ok_or(ParseFailure::MalformedImport(tokens[i].offset))?;
                imports.push(specifier);
                i = cursor.pos;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    Ok(imports)
}

fn follows_dot(tokens: &[Spanned], i: usize) -> bool {
    i > 0 && tokens[i - 1].token == Token::Punct('.')
}

struct Cursor<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos).map(|t| &t.token);
        self.pos += 1;
        token
    }

    fn eat_punct(&mut self, ch: char) -> bool {
        if self.peek() == Some(&Token::Punct(ch)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if matches!(self.peek(), Some(Token::Ident(w)) if w == word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn binding(&mut self) -> Option<()> {
        match self.next()? {
            Token::Ident(_) => Some(()),
            _ => None,
        }
    }

    fn string(&mut self) -> Option<String> {
        match self.next()? {
            Token::Str(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Everything after the `import` keyword
    fn import_declaration(&mut self) -> Option<String> {
        let specifier = if let Some(Token::Str(_)) = self.peek() {
            self.string()?
        } else {
            self.import_clause()?;
            if !self.eat_word("from") {
                return None;
            }
            self.string()?
        };

        self.import_attributes()?;
        self.eat_punct(';');
        Some(specifier)
    }

    fn import_clause(&mut self) -> Option<()> {
        match self.peek()? {
            Token::Ident(_) => {
                self.binding()?;
                if self.eat_punct(',') {
                    self.named_or_namespace()
                } else {
                    Some(())
                }
            }
            _ => self.named_or_namespace(),
        }
    }

    fn named_or_namespace(&mut self) -> Option<()> {
        if self.eat_punct('*') {
            if !self.eat_word("as") {
                return None;
            }
            return self.binding();
        }

        if !self.eat_punct('{') {
            return None;
        }
        loop {
            if self.eat_punct('}') {
                return Some(());
            }
            match self.next()? {
                Token::Ident(_) | Token::Str(_) => {}
                _ => return None,
            }
            if self.eat_word("as") {
                self.binding()?;
            }
            if !self.eat_punct(',') && self.peek() != Some(&Token::Punct('}')) {
                return None;
            }
        }
    }

    /// Optional `with { type: "json" }` (or legacy `assert`) clause
    fn import_attributes(&mut self) -> Option<()> {
        if !(self.eat_word("with") || self.eat_word("assert")) {
            return Some(());
        }
        if !self.eat_punct('{') {
            return None;
        }
        let mut depth = 1usize;
        while depth > 0 {
            match self.next()? {
                Token::Punct('{') => depth += 1,
                Token::Punct('}') => depth -= 1,
                _ => {}
            }
        }
        Some(())
    }
}
