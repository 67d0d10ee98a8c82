//! Scanner state machine.
//!
//! The scanner is pull-based: the parser calls `scan()` for each token and
//! uses `save_state`/`restore_state` for look-ahead. Trivia is skipped but
//! the start of each token's leading trivia is kept as its full start, so
//! comments attached to declarations can be recovered later.

use crate::char_codes::{
    is_digit, is_identifier_part, is_identifier_start, is_line_break, is_white_space_single_line,
};
use crate::syntax_kind::{SyntaxKind, text_to_keyword};

pub mod token_flags {
    pub const NONE: u32 = 0;
    pub const PRECEDING_LINE_BREAK: u32 = 1 << 0;
    pub const UNTERMINATED: u32 = 1 << 1;
}

/// Saved scanner position for speculative parsing.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    full_start: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: u32,
}

pub struct ScannerState {
    text: String,
    pos: usize,
    end: usize,
    full_start: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: u32,
}

impl ScannerState {
    pub fn new(text: String) -> Self {
        let end = text.len();
        ScannerState {
            text,
            pos: 0,
            end,
            full_start: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: token_flags::NONE,
        }
    }

    /// Start scanning at `pos` instead of the beginning of the text.
    pub fn set_text_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.end);
        self.full_start = self.pos;
        self.token_start = self.pos;
        self.token = SyntaxKind::Unknown;
        self.token_value.clear();
        self.token_flags = token_flags::NONE;
    }

    pub fn source_text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    #[inline]
    pub fn get_token(&self) -> SyntaxKind {
        self.token
    }

    /// Start of the current token's leading trivia.
    #[inline]
    pub fn get_token_full_start(&self) -> u32 {
        self.full_start as u32
    }

    #[inline]
    pub fn get_token_start(&self) -> u32 {
        self.token_start as u32
    }

    #[inline]
    pub fn get_token_end(&self) -> u32 {
        self.pos as u32
    }

    /// Cooked value: identifier name, unescaped string contents, number text.
    #[inline]
    pub fn get_token_value_ref(&self) -> &str {
        &self.token_value
    }

    /// Raw source text of the current token.
    pub fn get_token_text(&self) -> &str {
        &self.text[self.token_start..self.pos]
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags & token_flags::PRECEDING_LINE_BREAK != 0
    }

    #[inline]
    pub fn is_unterminated(&self) -> bool {
        self.token_flags & token_flags::UNTERMINATED != 0
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            full_start: self.full_start,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.full_start = snapshot.full_start;
        self.token_start = snapshot.token_start;
        self.token = snapshot.token;
        self.token_value = snapshot.token_value;
        self.token_flags = snapshot.token_flags;
    }

    #[inline]
    fn char_at(&self, pos: usize) -> Option<char> {
        self.text.get(pos..).and_then(|rest| rest.chars().next())
    }

    #[inline]
    fn byte_at(&self, pos: usize) -> u8 {
        self.text.as_bytes().get(pos).copied().unwrap_or(0)
    }

    /// Scan the next token.
    pub fn scan(&mut self) -> SyntaxKind {
        self.full_start = self.pos;
        self.token_flags = token_flags::NONE;
        self.token_value.clear();

        loop {
            self.token_start = self.pos;
            let Some(ch) = self.char_at(self.pos) else {
                self.token = SyntaxKind::EndOfFileToken;
                return self.token;
            };

            if is_line_break(ch) {
                self.token_flags |= token_flags::PRECEDING_LINE_BREAK;
                self.pos += ch.len_utf8();
                continue;
            }
            if is_white_space_single_line(ch) {
                self.pos += ch.len_utf8();
                continue;
            }

            if ch == '/' {
                match self.byte_at(self.pos + 1) {
                    b'/' => {
                        self.pos += 2;
                        while let Some(c) = self.char_at(self.pos) {
                            if is_line_break(c) {
                                break;
                            }
                            self.pos += c.len_utf8();
                        }
                        continue;
                    }
                    b'*' => {
                        self.pos += 2;
                        let mut closed = false;
                        while let Some(c) = self.char_at(self.pos) {
                            if c == '*' && self.byte_at(self.pos + 1) == b'/' {
                                self.pos += 2;
                                closed = true;
                                break;
                            }
                            if is_line_break(c) {
                                self.token_flags |= token_flags::PRECEDING_LINE_BREAK;
                            }
                            self.pos += c.len_utf8();
                        }
                        if !closed {
                            self.token_flags |= token_flags::UNTERMINATED;
                        }
                        continue;
                    }
                    _ => {}
                }
            }

            self.token = self.scan_token(ch);
            return self.token;
        }
    }

    fn scan_token(&mut self, ch: char) -> SyntaxKind {
        let next = self.byte_at(self.pos + 1);
        let next2 = self.byte_at(self.pos + 2);

        macro_rules! punct {
            ($len:expr, $kind:expr) => {{
                self.pos += $len;
                $kind
            }};
        }

        match ch {
            '"' | '\'' => self.scan_string(ch),
            '`' => {
                self.pos += 1;
                self.scan_template_span(true)
            }
            '0'..='9' => self.scan_number(),
            '.' => {
                if next.is_ascii_digit() {
                    self.scan_number()
                } else if next == b'.' && next2 == b'.' {
                    punct!(3, SyntaxKind::DotDotDotToken)
                } else {
                    punct!(1, SyntaxKind::DotToken)
                }
            }
            '{' => punct!(1, SyntaxKind::OpenBraceToken),
            '}' => punct!(1, SyntaxKind::CloseBraceToken),
            '(' => punct!(1, SyntaxKind::OpenParenToken),
            ')' => punct!(1, SyntaxKind::CloseParenToken),
            '[' => punct!(1, SyntaxKind::OpenBracketToken),
            ']' => punct!(1, SyntaxKind::CloseBracketToken),
            ';' => punct!(1, SyntaxKind::SemicolonToken),
            ',' => punct!(1, SyntaxKind::CommaToken),
            ':' => punct!(1, SyntaxKind::ColonToken),
            '@' => punct!(1, SyntaxKind::AtToken),
            '~' => punct!(1, SyntaxKind::TildeToken),
            '^' => punct!(1, SyntaxKind::CaretToken),
            '%' => punct!(1, SyntaxKind::PercentToken),
            '/' => punct!(1, SyntaxKind::SlashToken),
            '?' => {
                if next == b'?' {
                    punct!(2, SyntaxKind::QuestionQuestionToken)
                } else if next == b'.' && !next2.is_ascii_digit() {
                    punct!(2, SyntaxKind::QuestionDotToken)
                } else {
                    punct!(1, SyntaxKind::QuestionToken)
                }
            }
            '<' => {
                if next == b'=' {
                    punct!(2, SyntaxKind::LessThanEqualsToken)
                } else if next == b'<' {
                    punct!(2, SyntaxKind::LessThanLessThanToken)
                } else {
                    punct!(1, SyntaxKind::LessThanToken)
                }
            }
            // `>` is always a single token; types never need `>>` or `>=`.
            '>' => punct!(1, SyntaxKind::GreaterThanToken),
            '=' => {
                if next == b'>' {
                    punct!(2, SyntaxKind::EqualsGreaterThanToken)
                } else if next == b'=' && next2 == b'=' {
                    punct!(3, SyntaxKind::EqualsEqualsEqualsToken)
                } else if next == b'=' {
                    punct!(2, SyntaxKind::EqualsEqualsToken)
                } else {
                    punct!(1, SyntaxKind::EqualsToken)
                }
            }
            '!' => {
                if next == b'=' && next2 == b'=' {
                    punct!(3, SyntaxKind::ExclamationEqualsEqualsToken)
                } else if next == b'=' {
                    punct!(2, SyntaxKind::ExclamationEqualsToken)
                } else {
                    punct!(1, SyntaxKind::ExclamationToken)
                }
            }
            '+' => {
                if next == b'+' {
                    punct!(2, SyntaxKind::PlusPlusToken)
                } else {
                    punct!(1, SyntaxKind::PlusToken)
                }
            }
            '-' => {
                if next == b'-' {
                    punct!(2, SyntaxKind::MinusMinusToken)
                } else {
                    punct!(1, SyntaxKind::MinusToken)
                }
            }
            '*' => {
                if next == b'*' {
                    punct!(2, SyntaxKind::AsteriskAsteriskToken)
                } else {
                    punct!(1, SyntaxKind::AsteriskToken)
                }
            }
            '&' => {
                if next == b'&' {
                    punct!(2, SyntaxKind::AmpersandAmpersandToken)
                } else {
                    punct!(1, SyntaxKind::AmpersandToken)
                }
            }
            '|' => {
                if next == b'|' {
                    punct!(2, SyntaxKind::BarBarToken)
                } else {
                    punct!(1, SyntaxKind::BarToken)
                }
            }
            '#' => {
                self.pos += 1;
                match self.char_at(self.pos) {
                    Some(c) if is_identifier_start(c) => {
                        self.scan_identifier_rest();
                        self.token_value = self.text[self.token_start..self.pos].to_string();
                        SyntaxKind::PrivateIdentifier
                    }
                    _ => SyntaxKind::Unknown,
                }
            }
            c if is_identifier_start(c) => {
                self.scan_identifier_rest();
                let word = &self.text[self.token_start..self.pos];
                self.token_value = word.to_string();
                text_to_keyword(word).unwrap_or(SyntaxKind::Identifier)
            }
            c => {
                self.pos += c.len_utf8();
                SyntaxKind::Unknown
            }
        }
    }

    fn scan_identifier_rest(&mut self) {
        while let Some(c) = self.char_at(self.pos) {
            if is_identifier_part(c) || (self.pos == self.token_start && is_identifier_start(c)) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        self.pos += 1;
        let mut value = String::new();
        loop {
            let Some(c) = self.char_at(self.pos) else {
                self.token_flags |= token_flags::UNTERMINATED;
                break;
            };
            if c == quote {
                self.pos += 1;
                break;
            }
            if c == '\\' {
                self.scan_escape(&mut value);
                continue;
            }
            if is_line_break(c) {
                self.token_flags |= token_flags::UNTERMINATED;
                break;
            }
            value.push(c);
            self.pos += c.len_utf8();
        }
        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    fn scan_escape(&mut self, value: &mut String) {
        // Skip the backslash.
        self.pos += 1;
        let Some(c) = self.char_at(self.pos) else {
            return;
        };
        self.pos += c.len_utf8();
        match c {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'b' => value.push('\u{0008}'),
            'f' => value.push('\u{000C}'),
            'v' => value.push('\u{000B}'),
            '0' if !self.byte_at(self.pos).is_ascii_digit() => value.push('\0'),
            'x' => {
                let hex = self.text.get(self.pos..self.pos + 2).unwrap_or("");
                if let Some(decoded) = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
                    value.push(decoded);
                    self.pos += 2;
                }
            }
            'u' => {
                if self.byte_at(self.pos) == b'{' {
                    let close = self.text[self.pos..].find('}').map(|i| self.pos + i);
                    if let Some(close) = close {
                        let hex = &self.text[self.pos + 1..close];
                        if let Some(decoded) =
                            u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
                        {
                            value.push(decoded);
                        }
                        self.pos = close + 1;
                    }
                } else {
                    let hex = self.text.get(self.pos..self.pos + 4).unwrap_or("");
                    if let Some(decoded) =
                        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
                    {
                        value.push(decoded);
                        self.pos += 4;
                    }
                }
            }
            '\r' => {
                // Line continuation.
                if self.byte_at(self.pos) == b'\n' {
                    self.pos += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => value.push(other),
        }
    }

    /// Scan template text after a backtick or a `}` closing a substitution.
    fn scan_template_span(&mut self, is_start: bool) -> SyntaxKind {
        let mut value = String::new();
        loop {
            let Some(c) = self.char_at(self.pos) else {
                self.token_flags |= token_flags::UNTERMINATED;
                self.token_value = value;
                return if is_start {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
            };
            if c == '`' {
                self.pos += 1;
                self.token_value = value;
                return if is_start {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
            }
            if c == '$' && self.byte_at(self.pos + 1) == b'{' {
                self.pos += 2;
                self.token_value = value;
                return if is_start {
                    SyntaxKind::TemplateHead
                } else {
                    SyntaxKind::TemplateMiddle
                };
            }
            if c == '\\' {
                self.scan_escape(&mut value);
                continue;
            }
            value.push(c);
            self.pos += c.len_utf8();
        }
    }

    /// Re-scan a `}` token as the continuation of a template literal.
    pub fn re_scan_template_continuation(&mut self) -> SyntaxKind {
        self.pos = self.token_start + 1;
        self.token = self.scan_template_span(false);
        self.token
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let first = self.byte_at(self.pos);
        let radix_prefix = first == b'0'
            && matches!(self.byte_at(self.pos + 1), b'x' | b'X' | b'o' | b'O' | b'b' | b'B');

        if radix_prefix {
            self.pos += 2;
            while self.byte_at(self.pos).is_ascii_hexdigit() || self.byte_at(self.pos) == b'_' {
                self.pos += 1;
            }
        } else {
            self.scan_digits();
            if self.byte_at(self.pos) == b'.' {
                self.pos += 1;
                self.scan_digits();
            }
            if matches!(self.byte_at(self.pos), b'e' | b'E') {
                let mut lookahead = self.pos + 1;
                if matches!(self.byte_at(lookahead), b'+' | b'-') {
                    lookahead += 1;
                }
                if self.byte_at(lookahead).is_ascii_digit() {
                    self.pos = lookahead;
                    self.scan_digits();
                }
            }
        }

        if self.byte_at(self.pos) == b'n' {
            self.pos += 1;
            self.token_value = self.text[start..self.pos].to_string();
            return SyntaxKind::BigIntLiteral;
        }

        self.token_value = self.text[start..self.pos].replace('_', "");
        SyntaxKind::NumericLiteral
    }

    fn scan_digits(&mut self) {
        while let Some(c) = self.char_at(self.pos) {
            if is_digit(c) || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod tests;
