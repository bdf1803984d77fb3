//! Lexical import extraction for JavaScript and TypeScript.
//!
//! This is not a parser. It tokenizes just enough (comments, strings,
//! templates, regex literals, identifiers) to find module specifiers in:
//!
//! - `import "x"` / `import a, { b } from "x"` / `import type T from "x"`
//! - `export * from "x"` / `export { a } from "x"`
//! - `import("x")`, `require("x")`, `import a = require("x")`
//!
//! Non-literal arguments are ignored. Ranges cover the quoted string token.

use importguard_domain::ImportOccurrence;
use importguard_types::SourceRange;

/// Extract import occurrences in source order.
pub fn extract_imports(text: &str) -> Vec<ImportOccurrence> {
    let mut parser = Parser::new(text);
    parser.run();
    parser.out
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Str { value: String, range: SourceRange },
    Punct(u8),
    /// Numbers, templates, regex literals: values we never inspect.
    Opaque,
    Eof,
}

/// Keywords after which `/` starts a regex literal rather than a division.
const REGEX_PREFIX_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case",
    "do", "else", "yield", "await",
];

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// Whether the previous token ends an expression (so `/` is division).
    prev_is_value: bool,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        let mut lexer = Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            prev_is_value: false,
        };
        if src.starts_with("#!") {
            lexer.skip_line();
        }
        lexer
    }

    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn skip_line(&mut self) {
        while let Some(b) = self.peek_byte(0) {
            if b == b'\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match (self.peek_byte(0), self.peek_byte(1)) {
                (Some(b), _) if b.is_ascii_whitespace() => self.pos += 1,
                (Some(b'/'), Some(b'/')) => self.skip_line(),
                (Some(b'/'), Some(b'*')) => {
                    self.pos += 2;
                    while self.pos < self.bytes.len() {
                        if self.bytes[self.pos] == b'*' && self.peek_byte(1) == Some(b'/') {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                    self.pos = self.pos.min(self.bytes.len());
                }
                _ => return,
            }
        }
    }

    fn next_token(&mut self) -> Token<'a> {
        self.skip_trivia();
        let Some(b) = self.peek_byte(0) else {
            return Token::Eof;
        };

        let token = if is_ident_start(b) {
            self.ident()
        } else if b == b'"' || b == b'\'' {
            self.string(b)
        } else if b == b'`' {
            self.template();
            Token::Opaque
        } else if b.is_ascii_digit() {
            while self
                .peek_byte(0)
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'.' || c == b'_')
            {
                self.pos += 1;
            }
            Token::Opaque
        } else if b == b'/' && !self.prev_is_value && self.regex() {
            Token::Opaque
        } else {
            self.pos += 1;
            Token::Punct(b)
        };

        self.prev_is_value = match &token {
            Token::Ident(word) => !REGEX_PREFIX_KEYWORDS.contains(word),
            Token::Str { .. } | Token::Opaque => true,
            Token::Punct(p) => matches!(p, b')' | b']' | b'}'),
            Token::Eof => false,
        };
        token
    }

    fn ident(&mut self) -> Token<'a> {
        let start = self.pos;
        while self.peek_byte(0).is_some_and(is_ident_continue) {
            self.pos += 1;
        }
        // Identifiers may contain multi-byte chars; `pos` only stops on ASCII bytes.
        Token::Ident(&self.src[start..self.pos])
    }

    /// A quoted string. Unterminated strings (a newline before the closing
    /// quote) are not strings: the quote becomes punctuation and lexing resumes after it.
    fn string(&mut self, quote: u8) -> Token<'a> {
        let start = self.pos;
        let mut i = start + 1;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'\n' => break,
                c if c == quote => {
                    let end = i + 1;
                    self.pos = end;
                    return Token::Str {
                        value: unescape(&self.src[start + 1..i]),
                        range: SourceRange::new(start, end),
                    };
                }
                _ => i += 1,
            }
        }
        self.pos = start + 1;
        Token::Punct(quote)
    }

    /// Skip a template literal, including `${ ... }` substitutions.
    fn template(&mut self) {
        self.pos += 1;
        let mut depth = 0usize;
        while let Some(b) = self.peek_byte(0) {
            match b {
                b'\\' => self.pos += 2,
                b'`' if depth == 0 => {
                    self.pos += 1;
                    return;
                }
                b'$' if self.peek_byte(1) == Some(b'{') => {
                    depth += 1;
                    self.pos += 2;
                }
                b'{' if depth > 0 => {
                    depth += 1;
                    self.pos += 1;
                }
                b'}' if depth > 0 => {
                    depth -= 1;
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.bytes.len());
    }

    /// Try to skip a regex literal starting at `/`. Returns false (consuming
    /// nothing) when no closing `/` exists on the same line.
    fn regex(&mut self) -> bool {
        let mut i = self.pos + 1;
        let mut in_class = false;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'\n' => return false,
                b'[' => {
                    in_class = true;
                    i += 1;
                }
                b']' => {
                    in_class = false;
                    i += 1;
                }
                b'/' if !in_class => {
                    i += 1;
                    while i < self.bytes.len() && self.bytes[i].is_ascii_alphabetic() {
                        i += 1;
                    }
                    self.pos = i;
                    return true;
                }
                _ => i += 1,
            }
        }
        false
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

/// Decode the escapes that can appear in a module specifier.
fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('u') => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|c| *c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                if let Some(ch) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    out.push(ch);
                }
            }
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                if let Some(ch) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    out.push(ch);
                }
            }
            // Line continuation.
            Some('\n') => {}
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token<'a>>,
    /// The last consumed token was `.` (member access: `x.import`, `a.require`).
    after_dot: bool,
    out: Vec<ImportOccurrence>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            lexer: Lexer::new(src),
            peeked: None,
            after_dot: false,
            out: Vec::new(),
        }
    }

    fn peek(&mut self) -> &Token<'a> {
        self.peeked.get_or_insert_with(|| self.lexer.next_token())
    }

    fn bump(&mut self) -> Token<'a> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token(),
        };
        self.after_dot = token == Token::Punct(b'.');
        token
    }

    fn record(&mut self, value: String, range: SourceRange) {
        self.out.push(ImportOccurrence::new(value, range));
    }

    fn run(&mut self) {
        loop {
            let member_access = self.after_dot;
            match self.bump() {
                Token::Eof => return,
                Token::Ident("import") if !member_access => self.import(),
                Token::Ident("export") if !member_access => self.from_clause(),
                Token::Ident("require") if !member_access => self.call_argument(),
                _ => {}
            }
        }
    }

    fn import(&mut self) {
        let next = self.peek();
        let is_call = *next == Token::Punct(b'(');
        let is_meta = *next == Token::Punct(b'.');
        let is_bare = matches!(next, Token::Str { .. });

        if is_call {
            // import("x")
            self.call_argument();
        } else if is_meta {
            // import.meta
        } else if is_bare {
            // import "x"
            if let Token::Str { value, range } = self.bump() {
                self.record(value, range);
            }
        } else {
            self.from_clause();
        }
    }

    /// `(` string-literal, as in `require("x")` / `import("x")`.
    fn call_argument(&mut self) {
        if *self.peek() != Token::Punct(b'(') {
            return;
        }
        self.bump();
        if !matches!(self.peek(), Token::Str { .. }) {
            return;
        }
        let Token::Str { value, range } = self.bump() else {
            return;
        };
        if matches!(self.peek(), Token::Punct(b')' | b',')) {
            self.record(value, range);
        }
    }

    /// Scan the rest of an import/export statement for `from "x"`.
    ///
    /// Stops at anything that ends the clause: `;`, `=`, `(`, a string that
    /// does not follow `from`, a template, the start of another import or
    /// export, or a `}` closing an enclosing block. Tokens that stop the scan
    /// without being consumed are handled by the main loop.
    fn from_clause(&mut self) {
        let mut depth = 0usize;
        let mut after_from = false;
        loop {
            match self.peek() {
                Token::Eof => return,
                Token::Ident("import" | "export" | "require") if !after_from => return,
                _ => {}
            }
            match self.bump() {
                Token::Str { value, range } => {
                    if after_from {
                        self.record(value, range);
                    }
                    return;
                }
                Token::Ident("from") => {
                    after_from = true;
                    continue;
                }
                Token::Punct(b';' | b'=' | b'(') | Token::Opaque => return,
                Token::Punct(b'{') => depth += 1,
                Token::Punct(b'}') => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            after_from = false;
        }
    }
}
