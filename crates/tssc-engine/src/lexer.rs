use crate::source::Span;
use crate::token::{Token, TokenKind};

/// Keywords after which a `/` starts a regular expression rather than a division.
const REGEX_AFTER_KEYWORDS: &[&str] = &[
    "return", "typeof", "case", "do", "else", "in", "instanceof", "new", "delete", "void",
    "throw", "yield", "await", "of",
];

/// Keywords whose parenthesized head is followed by a statement, so a `/`
/// after the closing `)` starts a regular expression.
const CONDITION_KEYWORDS: &[&str] = &["if", "while", "for", "with"];

/// Tokenizer for TypeScript/JavaScript source text.
///
/// Only as much structure is recovered as the statement scanner needs:
/// identifiers, literals, comments and single-character punctuation.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::str::CharIndices<'a>,
    current_pos: usize,
    current_char: Option<char>,
    regex_allowed: bool,
    /// Whether the last token was one of [`CONDITION_KEYWORDS`]
    after_condition_keyword: bool,
    /// For each open `(`, whether it starts a statement head
    paren_heads: Vec<bool>,
    brace_depth: usize,
    /// Brace depth at each open `${` of a template literal
    template_braces: Vec<usize>,
    comments: Vec<Span>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.char_indices();
        let current_char = chars.next().map(|(_, c)| c);
        let mut lexer = Self {
            source,
            chars,
            current_pos: 0,
            current_char,
            regex_allowed: true,
            after_condition_keyword: false,
            paren_heads: Vec::new(),
            brace_depth: 0,
            template_braces: Vec::new(),
            comments: Vec::new(),
        };
        if source.starts_with("#!") {
            while !matches!(lexer.current_char, None | Some('\n')) {
                lexer.advance();
            }
        }
        lexer
    }

    /// Tokenizes the entire source; the last token is always `Eof`.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Comment spans seen so far.
    pub fn comments(&self) -> &[Span] {
        &self.comments
    }

    pub fn into_comments(self) -> Vec<Span> {
        self.comments
    }

    pub fn next_token(&mut self) -> Token {
        if let Some(error_token) = self.skip_whitespace_and_comments() {
            return error_token;
        }

        let start = self.current_pos;
        let token = match self.current_char {
            None => return Token::new(TokenKind::Eof, Span::new(start, start), String::new()),
            Some(ch) => match ch {
                '"' | '\'' => self.read_string_literal(ch),
                '`' => {
                    self.advance();
                    self.read_template(start)
                }
                '0'..='9' => self.read_number(),
                '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
                '/' if self.regex_allowed => self.read_regex(),
                '{' => {
                    self.brace_depth += 1;
                    self.read_punct(start)
                }
                '}' if self.template_braces.last() == Some(&self.brace_depth) => {
                    self.template_braces.pop();
                    self.advance();
                    self.read_template(start)
                }
                '}' => {
                    self.brace_depth = self.brace_depth.saturating_sub(1);
                    self.read_punct(start)
                }
                _ if is_identifier_start(ch) => self.read_identifier(),
                _ if ch.is_ascii_punctuation() && ch != '\\' => self.read_punct(start),
                _ => {
                    self.advance();
                    Token::error(Span::new(start, self.current_pos), 1127, "Invalid character.")
                }
            },
        };

        self.regex_allowed = match token.kind {
            TokenKind::Punct => match token.value.as_str() {
                "(" => {
                    self.paren_heads.push(self.after_condition_keyword);
                    true
                }
                ")" => self.paren_heads.pop().unwrap_or(false),
                "]" => false,
                _ => true,
            },
            TokenKind::Identifier => REGEX_AFTER_KEYWORDS.contains(&token.value.as_str()),
            TokenKind::Template => token.value.ends_with("${"),
            TokenKind::Error => self.regex_allowed,
            _ => false,
        };
        if token.kind != TokenKind::Error {
            self.after_condition_keyword = token.kind == TokenKind::Identifier
                && CONDITION_KEYWORDS.contains(&token.value.as_str());
        }
        token
    }

    // Helper methods

    fn advance(&mut self) {
        if let Some((pos, ch)) = self.chars.next() {
            self.current_pos = pos;
            self.current_char = Some(ch);
        } else {
            self.current_pos = self.source.len();
            self.current_char = None;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next().map(|(_, c)| c)
    }

    fn text_from(&self, start: usize) -> String {
        self.source[start..self.current_pos].to_string()
    }

    fn skip_whitespace_and_comments(&mut self) -> Option<Token> {
        loop {
            match self.current_char {
                Some(ch) if ch.is_whitespace() => self.advance(),
                Some('/') if self.peek() == Some('/') => {
                    let start = self.current_pos;
                    while !matches!(self.current_char, None | Some('\n')) {
                        self.advance();
                    }
                    self.comments.push(Span::new(start, self.current_pos));
                }
                Some('/') if self.peek() == Some('*') => {
                    let start = self.current_pos;
                    self.advance();
                    self.advance();
                    loop {
                        match self.current_char {
                            None => {
                                return Some(Token::error(
                                    Span::new(start, self.current_pos),
                                    1010,
                                    "'*/' expected.",
                                ));
                            }
                            Some('*') if self.peek() == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => self.advance(),
                        }
                    }
                    self.comments.push(Span::new(start, self.current_pos));
                }
                _ => return None,
            }
        }
    }

    fn read_punct(&mut self, start: usize) -> Token {
        self.advance();
        Token::new(TokenKind::Punct, Span::new(start, self.current_pos), self.text_from(start))
    }

    fn read_string_literal(&mut self, quote: char) -> Token {
        let start = self.current_pos;
        self.advance(); // opening quote

        loop {
            match self.current_char {
                None | Some('\n') => {
                    return Token::error(
                        Span::new(start, self.current_pos),
                        1002,
                        "Unterminated string literal.",
                    );
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some(ch) if ch == quote => {
                    self.advance();
                    return Token::new(
                        TokenKind::StringLiteral,
                        Span::new(start, self.current_pos),
                        self.text_from(start),
                    );
                }
                Some(_) => self.advance(),
            }
        }
    }

    /// Reads a template piece; the opening `` ` `` or `}` is already consumed.
    fn read_template(&mut self, start: usize) -> Token {
        loop {
            match self.current_char {
                None => {
                    return Token::error(
                        Span::new(start, self.current_pos),
                        1160,
                        "Unterminated template literal.",
                    );
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('`') => {
                    self.advance();
                    break;
                }
                Some('$') if self.peek() == Some('{') => {
                    self.advance();
                    self.advance();
                    self.template_braces.push(self.brace_depth);
                    break;
                }
                Some(_) => self.advance(),
            }
        }
        Token::new(TokenKind::Template, Span::new(start, self.current_pos), self.text_from(start))
    }

    fn read_number(&mut self) -> Token {
        let start = self.current_pos;
        let mut prev = '\0';
        while let Some(ch) = self.current_char {
            let exponent_sign = matches!(ch, '+' | '-')
                && matches!(prev, 'e' | 'E')
                && !self.source[start..].starts_with("0x")
                && !self.source[start..].starts_with("0X");
            if ch.is_ascii_alphanumeric() || ch == '.' || ch == '_' || exponent_sign {
                prev = ch;
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::NumberLiteral, Span::new(start, self.current_pos), self.text_from(start))
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.current_pos;
        self.advance();
        while let Some(ch) = self.current_char {
            if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Identifier, Span::new(start, self.current_pos), self.text_from(start))
    }

    fn read_regex(&mut self) -> Token {
        let start = self.current_pos;
        self.advance(); // opening slash
        let mut in_class = false;

        loop {
            match self.current_char {
                None | Some('\n') => {
                    return Token::error(
                        Span::new(start, self.current_pos),
                        1161,
                        "Unterminated regular expression literal.",
                    );
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('[') => {
                    in_class = true;
                    self.advance();
                }
                Some(']') => {
                    in_class = false;
                    self.advance();
                }
                Some('/') if !in_class => {
                    self.advance();
                    break;
                }
                Some(_) => self.advance(),
            }
        }

        // flags
        while self.current_char.is_some_and(|c| c.is_ascii_alphabetic()) {
            self.advance();
        }
        Token::new(TokenKind::RegexLiteral, Span::new(start, self.current_pos), self.text_from(start))
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$' || ch == '#'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        Lexer::new(source)
            .tokenize()
            .into_iter()
            .map(|t| (t.kind, t.value))
            .collect()
    }

    #[test]
    fn test_import_tokens() {
        let tokens = kinds("import { a } from './a';");
        let expected = vec![
            (TokenKind::Identifier, "import".to_string()),
            (TokenKind::Punct, "{".to_string()),
            (TokenKind::Identifier, "a".to_string()),
            (TokenKind::Punct, "}".to_string()),
            (TokenKind::Identifier, "from".to_string()),
            (TokenKind::StringLiteral, "'./a'".to_string()),
            (TokenKind::Punct, ";".to_string()),
            (TokenKind::Eof, String::new()),
        ];
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_comments_are_recorded() {
        let source = "// line\nlet x = 1; /* block */";
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize();
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Error));
        let comments: Vec<&str> = lexer
            .comments()
            .iter()
            .map(|s| &source[s.start..s.end])
            .collect();
        assert_eq!(comments, vec!["// line", "/* block */"]);
    }

    #[test]
    fn test_unterminated_string() {
        let tokens = Lexer::new("let s = \"oops\nlet t = 1;").tokenize();
        let error = tokens.iter().find(|t| t.kind == TokenKind::Error).unwrap();
        assert_eq!(error.value, "Unterminated string literal.");
        assert_eq!(error.code, Some(1002));
        assert_eq!(error.span.start, 8);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let tokens = Lexer::new("let a; /* never closed").tokenize();
        let error = tokens.iter().find(|t| t.kind == TokenKind::Error).unwrap();
        assert_eq!(error.value, "'*/' expected.");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_template_with_nested_braces() {
        let tokens = kinds("const s = `a${ {b: 1}.b }c`; x");
        let templates: Vec<&str> = tokens
            .iter()
            .filter(|(k, _)| *k == TokenKind::Template)
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(templates, vec!["`a${", "}c`"]);
        assert!(tokens.iter().all(|(k, _)| *k != TokenKind::Error));
    }

    #[test]
    fn test_regex_versus_division() {
        let tokens = kinds("let r = /a[/]b/g; let d = x / 2 / y;");
        let regexes: Vec<&str> = tokens
            .iter()
            .filter(|(k, _)| *k == TokenKind::RegexLiteral)
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(regexes, vec!["/a[/]b/g"]);
    }

    #[test]
    fn test_regex_after_statement_head() {
        let tokens = kinds("if (x) /'/.test(y); while (f(a)) /b/g.exec(c);");
        assert!(tokens.iter().all(|(k, _)| *k != TokenKind::Error));
        let regexes: Vec<&str> = tokens
            .iter()
            .filter(|(k, _)| *k == TokenKind::RegexLiteral)
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(regexes, vec!["/'/", "/b/g"]);
    }

    #[test]
    fn test_division_after_call() {
        let tokens = kinds("let d = f(x) / 2 / (y) / z;");
        assert!(tokens.iter().all(|(k, _)| *k != TokenKind::RegexLiteral));
    }

    #[test]
    fn test_invalid_character() {
        let tokens = Lexer::new("let a = 1 \\ 2;").tokenize();
        let error = tokens.iter().find(|t| t.kind == TokenKind::Error).unwrap();
        assert_eq!(error.value, "Invalid character.");
    }

    #[test]
    fn test_shebang_is_skipped() {
        let tokens = kinds("#!/usr/bin/env node\nfoo");
        assert_eq!(tokens[0], (TokenKind::Identifier, "foo".to_string()));
    }
}
