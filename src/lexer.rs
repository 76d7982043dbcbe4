use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Text(String),
    TagBegin, // {$
    TagEnd,   // $}
    /// Upper-cased tag name, or "=" for echo tags.
    TagName(String),
    Variable(String),
    /// Function name, stored without the leading `@`.
    Function(String),
    StringLit(String),
    Operator(char),
    Integer(i64),
    Double(f64),
    Eof,
}

/// Scanning mode. The lexer never switches mode on its own; the parser owns
/// every transition through [`Lexer::set_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerState {
    Text,
    TagName,
    TagContent,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),
    #[error("invalid escape sequence \\{0}")]
    InvalidEscape(char),
    #[error("escape character at end of input")]
    TrailingEscape,
    #[error("string literal not closed before end of input")]
    UnterminatedString,
    #[error("numeric literal {0:?} is out of range")]
    NumberOutOfRange(String),
    #[error("no more tokens")]
    NoMoreTokens,
}

/// Forward-only scanner over one input text. A call to [`Lexer::next_token`]
/// produces exactly one token or fails; once `Eof` has been produced, any
/// further call fails with [`LexError::NoMoreTokens`].
pub struct Lexer<'a> {
    input: &'a str,
    cursor: usize,
    state: LexerState,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            cursor: 0,
            state: LexerState::Text,
            done: false,
        }
    }

    pub fn set_state(&mut self, state: LexerState) {
        self.state = state;
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    fn advance(&mut self, n: usize) {
        self.cursor += n;
    }

    fn skip_whitespace(&mut self) {
        let rest = self.remaining();
        let trimmed = rest.trim_start();
        self.advance(rest.len() - trimmed.len());
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if self.done {
            return Err(LexError::NoMoreTokens);
        }
        match self.state {
            LexerState::Text => self.next_text(),
            LexerState::TagName => self.next_tag_name(),
            LexerState::TagContent => self.next_tag_content(),
        }
    }

    /// Literal text up to the next unescaped `{$`. A lone `{` not followed
    /// by `$` stays literal; only `\\` and `\{` are legal escapes.
    fn next_text(&mut self) -> Result<Token, LexError> {
        if self.remaining().is_empty() {
            self.done = true;
            return Ok(Token::Eof);
        }
        if self.remaining().starts_with("{$") {
            self.advance(2);
            return Ok(Token::TagBegin);
        }

        let mut text = String::new();
        loop {
            let rest = self.remaining();
            let Some(c) = rest.chars().next() else {
                break;
            };
            if rest.starts_with("{$") {
                break;
            }
            if c == '\\' {
                match rest.chars().nth(1) {
                    Some(esc @ ('\\' | '{')) => {
                        text.push(esc);
                        self.advance(2);
                    }
                    Some(other) => return Err(LexError::InvalidEscape(other)),
                    None => return Err(LexError::TrailingEscape),
                }
            } else {
                text.push(c);
                self.advance(c.len_utf8());
            }
        }
        Ok(Token::Text(text))
    }

    fn next_tag_name(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let Some(first) = self.remaining().chars().next() else {
            self.done = true;
            return Ok(Token::Eof);
        };
        if first == '=' {
            self.advance(1);
            return Ok(Token::TagName("=".to_string()));
        }
        if first.is_alphabetic() {
            let name = self.scan_name();
            return Ok(Token::TagName(name.to_uppercase()));
        }
        Err(LexError::UnexpectedCharacter(first))
    }

    fn next_tag_content(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let rest = self.remaining();
        let Some(first) = rest.chars().next() else {
            self.done = true;
            return Ok(Token::Eof);
        };

        if rest.starts_with("$}") {
            self.advance(2);
            return Ok(Token::TagEnd);
        }
        if first.is_alphabetic() {
            return Ok(Token::Variable(self.scan_name()));
        }
        if first == '@' {
            // A bare `@` with no name behind it is not a function.
            match rest.chars().nth(1) {
                Some(c) if c.is_alphabetic() => {
                    self.advance(1);
                    return Ok(Token::Function(self.scan_name()));
                }
                _ => return Err(LexError::UnexpectedCharacter('@')),
            }
        }
        if first == '"' {
            return self.scan_string();
        }
        let signs_number = first == '-' && rest[1..].starts_with(|c: char| c.is_ascii_digit());
        if first.is_ascii_digit() || signs_number {
            return self.scan_number();
        }
        if matches!(first, '+' | '-' | '*' | '/' | '^') {
            self.advance(1);
            return Ok(Token::Operator(first));
        }
        Err(LexError::UnexpectedCharacter(first))
    }

    /// Letter followed by letters, digits and underscores.
    fn scan_name(&mut self) -> String {
        let name: String = self
            .remaining()
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        self.advance(name.len());
        name
    }

    fn scan_string(&mut self) -> Result<Token, LexError> {
        self.advance(1); // opening quote
        let mut value = String::new();
        loop {
            let rest = self.remaining();
            let Some(c) = rest.chars().next() else {
                return Err(LexError::UnterminatedString);
            };
            match c {
                '"' => {
                    self.advance(1);
                    return Ok(Token::StringLit(value));
                }
                '\\' => {
                    match rest.chars().nth(1) {
                        Some('\\') => value.push('\\'),
                        Some('"') => value.push('"'),
                        Some('n') => value.push('\n'),
                        Some('r') => value.push('\r'),
                        Some('t') => value.push('\t'),
                        Some(other) => return Err(LexError::InvalidEscape(other)),
                        None => return Err(LexError::UnterminatedString),
                    }
                    self.advance(2);
                }
                _ => {
                    value.push(c);
                    self.advance(c.len_utf8());
                }
            }
        }
    }

    /// Signed integer, or double in digit-dot-digit form (no exponents).
    fn scan_number(&mut self) -> Result<Token, LexError> {
        let rest = self.remaining();
        let mut len = 0;
        if rest.starts_with('-') {
            len += 1;
        }
        len += digit_run(&rest[len..]);

        let mut is_double = false;
        let after_digits = &rest[len..];
        if after_digits.starts_with('.') && after_digits[1..].starts_with(|c: char| c.is_ascii_digit())
        {
            is_double = true;
            len += 1;
            len += digit_run(&rest[len..]);
        }

        let literal = &rest[..len];
        self.advance(len);
        if is_double {
            let value: f64 = literal
                .parse()
                .map_err(|_| LexError::NumberOutOfRange(literal.to_string()))?;
            if !value.is_finite() {
                return Err(LexError::NumberOutOfRange(literal.to_string()));
            }
            Ok(Token::Double(value))
        } else {
            let value: i64 = literal
                .parse()
                .map_err(|_| LexError::NumberOutOfRange(literal.to_string()))?;
            Ok(Token::Integer(value))
        }
    }
}

fn digit_run(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}
