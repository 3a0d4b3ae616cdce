//! Lexer (tokenizer) for JavaScript.
//!
//! Tokens are produced on demand by the parser rather than upfront, which
//! enables context-sensitive tokenization (regex vs division). The lexer
//! also records whether a line terminator preceded each token so the parser
//! can apply automatic semicolon insertion.

use crate::span::Span;
use crate::token::{keyword_from_str, Token, TokenKind};

/// The lexer state.
#[derive(Clone)]
pub struct Lexer<'a> {
    /// Source code as bytes (for fast indexing).
    source: &'a [u8],
    /// Current byte position.
    pos: usize,
    /// Start position of the current token.
    token_start: usize,
    /// Whether the previous token allows a regex to follow.
    /// This disambiguates `/regex/` vs `a / b`.
    allow_regex: bool,
    /// Whether a newline was seen since the previous token.
    saw_newline: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            token_start: 0,
            allow_regex: true,
            saw_newline: false,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token {
        self.saw_newline = false;
        self.skip_whitespace_and_comments();
        self.token_start = self.pos;

        if self.is_eof() {
            return self.make_token(TokenKind::Eof);
        }

        let ch = self.current();
        let kind = match ch {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' => self.scan_identifier(),
            b'0'..=b'9' => self.scan_number(),
            b'"' | b'\'' => self.scan_string(ch),
            b'`' => self.scan_template_head(),

            b'(' => { self.advance(); TokenKind::LParen }
            b')' => { self.advance(); TokenKind::RParen }
            b'{' => { self.advance(); TokenKind::LBrace }
            b'}' => { self.advance(); TokenKind::RBrace }
            b'[' => { self.advance(); TokenKind::LBracket }
            b']' => { self.advance(); TokenKind::RBracket }
            b';' => { self.advance(); TokenKind::Semicolon }
            b',' => { self.advance(); TokenKind::Comma }
            b':' => { self.advance(); TokenKind::Colon }
            b'~' => { self.advance(); TokenKind::Tilde }

            b'.' => self.scan_dot(),
            b'?' => { self.advance(); TokenKind::Question }
            b'+' => self.scan_plus(),
            b'-' => self.scan_minus(),
            b'*' => self.scan_star(),
            b'/' => self.scan_slash(),
            b'%' => self.scan_percent(),
            b'=' => self.scan_equals(),
            b'!' => self.scan_bang(),
            b'<' => self.scan_less_than(),
            b'>' => self.scan_greater_than(),
            b'&' => self.scan_ampersand(),
            b'|' => self.scan_pipe(),
            b'^' => self.scan_caret(),

            // Non-ASCII identifier starts and anything else we don't handle.
            _ => {
                self.advance();
                TokenKind::Invalid
            }
        };

        // Update regex context based on the token we just scanned.
        self.allow_regex = kind.can_start_expr() && !matches!(kind, TokenKind::This | TokenKind::Identifier(_) | TokenKind::String(_) | TokenKind::Number(_) | TokenKind::Regex { .. } | TokenKind::TemplateNoSub(_))
            || matches!(
                kind,
                TokenKind::LParen
                    | TokenKind::LBracket
                    | TokenKind::LBrace
                    | TokenKind::Comma
                    | TokenKind::Semicolon
                    | TokenKind::Colon
                    | TokenKind::Question
                    | TokenKind::Arrow
                    | TokenKind::Return
                    | TokenKind::Case
                    | TokenKind::In
                    | TokenKind::Instanceof
                    | TokenKind::AmpAmp
                    | TokenKind::PipePipe
                    | TokenKind::Bang
                    | TokenKind::EqEq
                    | TokenKind::EqEqEq
                    | TokenKind::BangEq
                    | TokenKind::BangEqEq
            )
            || kind.is_assignment()
            || kind.binary_precedence().is_some();

        self.make_token(kind)
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&self) -> Token {
        self.clone().next_token()
    }

    // === Helper methods ===

    fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn current(&self) -> u8 {
        self.source.get(self.pos).copied().unwrap_or(0)
    }

    fn peek_char(&self) -> u8 {
        self.source.get(self.pos + 1).copied().unwrap_or(0)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            Span::new(self.token_start as u32, self.pos as u32),
            self.saw_newline,
        )
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        std::str::from_utf8(&self.source[start..end]).unwrap_or("")
    }

    fn token_slice(&self) -> &'a str {
        self.slice(self.token_start, self.pos)
    }

    // === Whitespace and comments ===

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.current() {
                b' ' | b'\t' | b'\r' => {
                    self.advance();
                }
                b'\n' => {
                    self.saw_newline = true;
                    self.advance();
                }
                b'/' if self.peek_char() == b'/' => {
                    self.skip_line_comment();
                }
                b'/' if self.peek_char() == b'*' => {
                    self.skip_block_comment();
                }
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        self.advance_n(2);
        while !self.is_eof() && self.current() != b'\n' {
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        self.advance_n(2);
        while !self.is_eof() {
            if self.current() == b'*' && self.peek_char() == b'/' {
                self.advance_n(2);
                return;
            }
            if self.current() == b'\n' {
                self.saw_newline = true;
            }
            self.advance();
        }
        // Unterminated block comment - reported as an error during parsing.
    }

    // === Token scanning ===

    fn scan_identifier(&mut self) -> TokenKind {
        while !self.is_eof() {
            match self.current() {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'$' => {
                    self.advance();
                }
                _ => break,
            }
        }

        let ident = self.token_slice();
        keyword_from_str(ident).unwrap_or_else(|| TokenKind::Identifier(ident.to_string()))
    }

    fn scan_number(&mut self) -> TokenKind {
        let start = self.pos;

        if self.current() == b'0' {
            match self.peek_char() {
                b'x' | b'X' => return self.scan_radix_number(16),
                b'b' | b'B' => return self.scan_radix_number(2),
                b'o' | b'O' => return self.scan_radix_number(8),
                _ => {}
            }
        }

        while self.current().is_ascii_digit() {
            self.advance();
        }

        if self.current() == b'.' && self.peek_char().is_ascii_digit() {
            self.advance();
            while self.current().is_ascii_digit() {
                self.advance();
            }
        }

        if self.current() == b'e' || self.current() == b'E' {
            self.advance();
            if self.current() == b'+' || self.current() == b'-' {
                self.advance();
            }
            while self.current().is_ascii_digit() {
                self.advance();
            }
        }

        let num_str = self.slice(start, self.pos);
        TokenKind::Number(num_str.parse().unwrap_or(f64::NAN))
    }

    fn scan_radix_number(&mut self, radix: u32) -> TokenKind {
        let start = self.pos;
        self.advance_n(2); // Skip 0x / 0b / 0o

        while (self.current() as char).is_digit(radix) {
            self.advance();
        }

        let digits = self.slice(start + 2, self.pos);
        let value = u64::from_str_radix(digits, radix).unwrap_or(0) as f64;
        TokenKind::Number(value)
    }

    fn scan_string(&mut self, quote: u8) -> TokenKind {
        self.advance(); // Skip opening quote

        let mut value = Vec::new();
        while !self.is_eof() && self.current() != quote {
            if self.current() == b'\\' {
                self.advance();
                if !self.is_eof() {
                    self.scan_escape_sequence(&mut value);
                }
            } else {
                value.push(self.current());
                self.advance();
            }
        }

        if self.current() == quote {
            self.advance(); // Skip closing quote
        }

        TokenKind::String(String::from_utf8_lossy(&value).into_owned())
    }

    fn scan_escape_sequence(&mut self, out: &mut Vec<u8>) {
        let ch = self.current();
        self.advance();

        let resolved = match ch {
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'\\' => '\\',
            b'\'' => '\'',
            b'"' => '"',
            b'`' => '`',
            b'0' => '\0',
            b'x' => self.scan_hex_escape(2),
            b'u' => {
                if self.current() == b'{' {
                    self.scan_unicode_escape_braces()
                } else {
                    self.scan_hex_escape(4)
                }
            }
            b'\n' => return, // Line continuation
            _ => ch as char,
        };
        let mut buf = [0u8; 4];
        out.extend_from_slice(resolved.encode_utf8(&mut buf).as_bytes());
    }

    fn scan_hex_escape(&mut self, len: usize) -> char {
        let mut value = 0u32;
        for _ in 0..len {
            if let Some(digit) = (self.current() as char).to_digit(16) {
                value = value * 16 + digit;
                self.advance();
            } else {
                break;
            }
        }
        char::from_u32(value).unwrap_or('\u{FFFD}')
    }

    fn scan_unicode_escape_braces(&mut self) -> char {
        self.advance(); // Skip {
        let mut value = 0u32;
        while self.current() != b'}' && !self.is_eof() {
            if let Some(digit) = (self.current() as char).to_digit(16) {
                value = value * 16 + digit;
                self.advance();
            } else {
                break;
            }
        }
        if self.current() == b'}' {
            self.advance();
        }
        char::from_u32(value).unwrap_or('\u{FFFD}')
    }

    fn scan_template_head(&mut self) -> TokenKind {
        self.advance(); // Skip `

        let mut value = Vec::new();
        while !self.is_eof() {
            match self.current() {
                b'`' => {
                    self.advance();
                    return TokenKind::TemplateNoSub(String::from_utf8_lossy(&value).into_owned());
                }
                b'$' if self.peek_char() == b'{' => {
                    self.advance_n(2);
                    return TokenKind::TemplateHead(String::from_utf8_lossy(&value).into_owned());
                }
                b'\\' => {
                    self.advance();
                    if !self.is_eof() {
                        self.scan_escape_sequence(&mut value);
                    }
                }
                b'\n' => {
                    self.saw_newline = true;
                    value.push(b'\n');
                    self.advance();
                }
                _ => {
                    value.push(self.current());
                    self.advance();
                }
            }
        }

        TokenKind::Invalid
    }

    /// Scan template middle or tail (called after `}` in a template).
    pub fn scan_template_continuation(&mut self) -> Token {
        self.token_start = self.pos;
        let mut value = Vec::new();

        while !self.is_eof() {
            match self.current() {
                b'`' => {
                    self.advance();
                    return self.make_token(TokenKind::TemplateTail(
                        String::from_utf8_lossy(&value).into_owned(),
                    ));
                }
                b'$' if self.peek_char() == b'{' => {
                    self.advance_n(2);
                    return self.make_token(TokenKind::TemplateMiddle(
                        String::from_utf8_lossy(&value).into_owned(),
                    ));
                }
                b'\\' => {
                    self.advance();
                    if !self.is_eof() {
                        self.scan_escape_sequence(&mut value);
                    }
                }
                _ => {
                    value.push(self.current());
                    self.advance();
                }
            }
        }

        self.make_token(TokenKind::Invalid)
    }

    fn scan_regex(&mut self) -> TokenKind {
        self.advance(); // Skip opening /
        let pattern_start = self.pos;

        let mut in_class = false;
        while !self.is_eof() {
            match self.current() {
                b'/' if !in_class => break,
                b'[' => {
                    in_class = true;
                    self.advance();
                }
                b']' => {
                    in_class = false;
                    self.advance();
                }
                b'\\' => {
                    self.advance();
                    if !self.is_eof() {
                        self.advance();
                    }
                }
                b'\n' | b'\r' => break, // Invalid - newline in regex
                _ => self.advance(),
            }
        }

        let pattern = self.slice(pattern_start, self.pos).to_string();

        if self.current() != b'/' {
            return TokenKind::Invalid;
        }
        self.advance(); // Skip closing /

        let flags_start = self.pos;
        while matches!(self.current(), b'g' | b'i' | b'm' | b's' | b'u' | b'y' | b'd' | b'v') {
            self.advance();
        }
        let flags = self.slice(flags_start, self.pos).to_string();

        TokenKind::Regex { pattern, flags }
    }

    // === Multi-character operators ===

    fn scan_dot(&mut self) -> TokenKind {
        self.advance();
        if self.current() == b'.' && self.peek_char() == b'.' {
            self.advance_n(2);
            TokenKind::Spread
        } else if self.current().is_ascii_digit() {
            self.pos -= 1; // Back up to rescan as a number
            self.scan_number()
        } else {
            TokenKind::Dot
        }
    }

    fn scan_plus(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'+' => { self.advance(); TokenKind::PlusPlus }
            b'=' => { self.advance(); TokenKind::PlusEq }
            _ => TokenKind::Plus,
        }
    }

    fn scan_minus(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'-' => { self.advance(); TokenKind::MinusMinus }
            b'=' => { self.advance(); TokenKind::MinusEq }
            _ => TokenKind::Minus,
        }
    }

    fn scan_star(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'=' => { self.advance(); TokenKind::StarEq }
            _ => TokenKind::Star,
        }
    }

    fn scan_slash(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'=' if !self.allow_regex => { self.advance(); TokenKind::SlashEq }
            _ if self.allow_regex => {
                self.pos -= 1; // Back up
                self.scan_regex()
            }
            _ => TokenKind::Slash,
        }
    }

    fn scan_percent(&mut self) -> TokenKind {
        self.advance();
        if self.current() == b'=' {
            self.advance();
            TokenKind::PercentEq
        } else {
            TokenKind::Percent
        }
    }

    fn scan_equals(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'=' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::EqEqEq
                } else {
                    TokenKind::EqEq
                }
            }
            b'>' => { self.advance(); TokenKind::Arrow }
            _ => TokenKind::Eq,
        }
    }

    fn scan_bang(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'=' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::BangEqEq
                } else {
                    TokenKind::BangEq
                }
            }
            _ => TokenKind::Bang,
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'<' => {
                self.advance();
                if self.current() == b'=' {
                    self.advance();
                    TokenKind::LtLtEq
                } else {
                    TokenKind::LtLt
                }
            }
            b'=' => { self.advance(); TokenKind::LtEq }
            _ => TokenKind::Lt,
        }
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'>' => {
                self.advance();
                match self.current() {
                    b'>' => {
                        self.advance();
                        if self.current() == b'=' {
                            self.advance();
                            TokenKind::GtGtGtEq
                        } else {
                            TokenKind::GtGtGt
                        }
                    }
                    b'=' => { self.advance(); TokenKind::GtGtEq }
                    _ => TokenKind::GtGt,
                }
            }
            b'=' => { self.advance(); TokenKind::GtEq }
            _ => TokenKind::Gt,
        }
    }

    fn scan_ampersand(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'&' => { self.advance(); TokenKind::AmpAmp }
            b'=' => { self.advance(); TokenKind::AmpEq }
            _ => TokenKind::Amp,
        }
    }

    fn scan_pipe(&mut self) -> TokenKind {
        self.advance();
        match self.current() {
            b'|' => { self.advance(); TokenKind::PipePipe }
            b'=' => { self.advance(); TokenKind::PipeEq }
            _ => TokenKind::Pipe,
        }
    }

    fn scan_caret(&mut self) -> TokenKind {
        self.advance();
        if self.current() == b'=' {
            self.advance();
            TokenKind::CaretEq
        } else {
            TokenKind::Caret
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            if matches!(token.kind, TokenKind::Eof) {
                break;
            }
            tokens.push(token.kind);
        }
        tokens
    }

    #[test]
    fn test_identifiers_and_keywords() {
        assert_eq!(
            tokenize("var foo $bar _baz"),
            vec![
                TokenKind::Var,
                TokenKind::Identifier("foo".into()),
                TokenKind::Identifier("$bar".into()),
                TokenKind::Identifier("_baz".into()),
            ]
        );
    }

    #[test]
    fn test_contextual_keywords_are_identifiers() {
        assert_eq!(
            tokenize("get set static of async"),
            vec![
                TokenKind::Identifier("get".into()),
                TokenKind::Identifier("set".into()),
                TokenKind::Identifier("static".into()),
                TokenKind::Identifier("of".into()),
                TokenKind::Identifier("async".into()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokenize("42 3.14 0xff 1e3"),
            vec![
                TokenKind::Number(42.0),
                TokenKind::Number(3.14),
                TokenKind::Number(255.0),
                TokenKind::Number(1000.0),
            ]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            tokenize(r#"'it\'s' "a\nb""#),
            vec![
                TokenKind::String("it's".into()),
                TokenKind::String("a\nb".into()),
            ]
        );
    }

    #[test]
    fn test_regex_vs_division() {
        assert_eq!(
            tokenize("a = /x/g"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::Eq,
                TokenKind::Regex { pattern: "x".into(), flags: "g".into() },
            ]
        );
        assert_eq!(
            tokenize("a / b"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::Slash,
                TokenKind::Identifier("b".into()),
            ]
        );
    }

    #[test]
    fn test_comments_and_newline_flag() {
        let mut lexer = Lexer::new("a // comment\nb");
        let a = lexer.next_token();
        let b = lexer.next_token();
        assert!(!a.had_newline_before);
        assert_eq!(b.kind, TokenKind::Identifier("b".into()));
        assert!(b.had_newline_before);
    }

    #[test]
    fn test_spans_cover_tokens() {
        let mut lexer = Lexer::new("foo('bar')");
        let foo = lexer.next_token();
        assert_eq!(foo.span, Span::new(0, 3));
        let lparen = lexer.next_token();
        assert_eq!(lparen.span, Span::new(3, 4));
        let bar = lexer.next_token();
        assert_eq!(bar.span, Span::new(4, 9));
    }

    #[test]
    fn test_template_literal() {
        assert_eq!(
            tokenize("`hello`"),
            vec![TokenKind::TemplateNoSub("hello".into())]
        );
    }
}
