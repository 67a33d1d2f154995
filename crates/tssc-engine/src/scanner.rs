//! Recovers top-level statements and delimiter problems from a token stream.

use crate::source::{ImportDeclaration, Span, Statement, StatementKind, StringLiteral};
use crate::token::{Token, TokenKind};

/// A syntax problem found while scanning, not yet anchored to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxProblem {
    pub span: Span,
    pub code: u32,
    pub message: String,
}

impl SyntaxProblem {
    fn new(span: Span, code: u32, message: impl Into<String>) -> Self {
        Self {
            span,
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scanned {
    pub statements: Vec<Statement>,
    pub problems: Vec<SyntaxProblem>,
}

/// Scans a token stream produced by [`crate::Lexer::tokenize`].
pub fn scan(tokens: &[Token]) -> Scanned {
    let mut problems: Vec<SyntaxProblem> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Error)
        .map(|t| SyntaxProblem::new(t.span, t.code.unwrap_or(1127), t.value.clone()))
        .collect();

    let significant: Vec<&Token> = tokens
        .iter()
        .filter(|t| !matches!(t.kind, TokenKind::Error | TokenKind::Eof))
        .collect();
    let eof = tokens.last().map(|t| t.span).unwrap_or_default();

    check_delimiters(&significant, eof, &mut problems);
    problems.sort_by_key(|p| p.span.start);

    Scanned {
        statements: collect_statements(&significant),
        problems,
    }
}

fn closer_for(opener: char) -> char {
    match opener {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn opener_for(closer: char) -> char {
    match closer {
        ')' => '(',
        ']' => '[',
        _ => '{',
    }
}

fn punct_char(token: &Token) -> Option<char> {
    if token.kind == TokenKind::Punct {
        token.value.chars().next()
    } else {
        None
    }
}

fn check_delimiters(tokens: &[&Token], eof: Span, problems: &mut Vec<SyntaxProblem>) {
    let mut open: Vec<char> = Vec::new();

    for token in tokens {
        match punct_char(token) {
            Some(ch @ ('(' | '[' | '{')) => open.push(ch),
            Some(ch @ (')' | ']' | '}')) => {
                let opener = opener_for(ch);
                match open.iter().rposition(|&c| c == opener) {
                    Some(index) => {
                        for unclosed in open.drain(index + 1..).rev() {
                            problems.push(SyntaxProblem::new(
                                token.span,
                                1005,
                                format!("'{}' expected.", closer_for(unclosed)),
                            ));
                        }
                        open.pop();
                    }
                    None => problems.push(SyntaxProblem::new(
                        token.span,
                        1128,
                        "Declaration or statement expected.",
                    )),
                }
            }
            _ => {}
        }
    }

    for unclosed in open.into_iter().rev() {
        problems.push(SyntaxProblem::new(
            eof,
            1005,
            format!("'{}' expected.", closer_for(unclosed)),
        ));
    }
}

fn collect_statements(tokens: &[&Token]) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut pending: Option<Span> = None;
    let mut depth = 0usize;
    let mut i = 0;

    while i < tokens.len() {
        if depth == 0 && !follows_dot(tokens, i) {
            let found = import_declaration(tokens, i).or_else(|| export_from(tokens, i));
            if let Some((statement, next)) = found {
                if let Some(span) = pending.take() {
                    statements.push(Statement::new(StatementKind::Other, span));
                }
                statements.push(statement);
                i = next;
                continue;
            }
        }

        let token = tokens[i];
        match punct_char(token) {
            Some('(' | '[' | '{') => depth += 1,
            Some(')' | ']' | '}') => depth = depth.saturating_sub(1),
            _ => {}
        }
        pending = Some(match pending {
            Some(span) => span.merge(&token.span),
            None => token.span,
        });
        if depth == 0 && (token.is_punct(';') || token.is_punct('}')) {
            if let Some(span) = pending.take() {
                statements.push(Statement::new(StatementKind::Other, span));
            }
        }
        i += 1;
    }

    if let Some(span) = pending {
        statements.push(Statement::new(StatementKind::Other, span));
    }
    statements
}

fn follows_dot(tokens: &[&Token], i: usize) -> bool {
    i > 0 && tokens[i - 1].is_punct('.')
}

/// Index of the `}` closing the `{` at `open`.
fn matching_brace(tokens: &[&Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, token) in tokens[open..].iter().enumerate() {
        if token.is_punct('{') {
            depth += 1;
        } else if token.is_punct('}') {
            depth -= 1;
            if depth == 0 {
                return Some(open + offset);
            }
        }
    }
    None
}

/// Consumes import attributes and a trailing semicolon after a module specifier.
fn finish_module_clause(tokens: &[&Token], specifier: usize) -> (Span, usize) {
    let mut end = tokens[specifier].span;
    let mut next = specifier + 1;

    let has_attributes = tokens
        .get(next)
        .is_some_and(|t| t.is_word("with") || t.is_word("assert"))
        && tokens.get(next + 1).is_some_and(|t| t.is_punct('{'));
    if has_attributes {
        if let Some(close) = matching_brace(tokens, next + 1) {
            end = tokens[close].span;
            next = close + 1;
        }
    }

    if let Some(semi) = tokens.get(next).filter(|t| t.is_punct(';')) {
        end = semi.span;
        next += 1;
    }
    (end, next)
}

fn import_declaration(tokens: &[&Token], i: usize) -> Option<(Statement, usize)> {
    let keyword = tokens[i];
    if !keyword.is_word("import") {
        return None;
    }
    let first = tokens.get(i + 1)?;
    // import(...) and import.meta are expressions
    if first.is_punct('(') || first.is_punct('.') {
        return None;
    }

    let type_only = first.is_word("type")
        && tokens.get(i + 2).is_some_and(|t| {
            t.is_punct('{') || t.is_punct('*') || (t.kind == TokenKind::Identifier && !t.is_word("from"))
        });

    // import x = require("y") is an import-equals declaration
    let name_at = if type_only { i + 2 } else { i + 1 };
    if tokens.get(name_at).is_some_and(|t| t.kind == TokenKind::Identifier)
        && tokens.get(name_at + 1).is_some_and(|t| t.is_punct('='))
    {
        return None;
    }

    let mut j = i + 1;
    let mut braces = 0usize;
    loop {
        let token = tokens.get(j)?;
        match token.kind {
            TokenKind::StringLiteral if braces == 0 => break,
            TokenKind::Punct if token.is_punct('{') => braces += 1,
            TokenKind::Punct if token.is_punct('}') => braces = braces.checked_sub(1)?,
            TokenKind::Punct if braces == 0 && token.is_punct(';') => return None,
            TokenKind::Identifier
                if braces == 0 && (token.is_word("import") || token.is_word("export")) =>
            {
                return None;
            }
            _ => {}
        }
        j += 1;
    }

    // the specifier either follows `import` directly or comes after `from`
    if j != i + 1 && !tokens[j - 1].is_word("from") {
        return None;
    }

    let specifier = tokens[j];
    let (end, next) = finish_module_clause(tokens, j);
    let declaration = ImportDeclaration {
        module_specifier: StringLiteral::new(specifier.value.clone(), specifier.span),
        type_only,
    };
    Some((
        Statement::new(StatementKind::Import(declaration), keyword.span.merge(&end)),
        next,
    ))
}

fn export_from(tokens: &[&Token], i: usize) -> Option<(Statement, usize)> {
    let keyword = tokens[i];
    if !keyword.is_word("export") {
        return None;
    }

    let mut j = i + 1;
    if tokens.get(j)?.is_word("type") {
        j += 1;
    }
    let clause = tokens.get(j)?;
    if clause.is_punct('*') {
        j += 1;
        if tokens.get(j)?.is_word("as") {
            j += 2;
        }
    } else if clause.is_punct('{') {
        j = matching_brace(tokens, j)? + 1;
    } else {
        return None;
    }

    if !tokens.get(j)?.is_word("from") {
        return None;
    }
    let specifier = tokens.get(j + 1).filter(|t| t.kind == TokenKind::StringLiteral)?;
    let (end, next) = finish_module_clause(tokens, j + 1);
    Some((
        Statement::new(
            StatementKind::ExportFrom {
                module_specifier: StringLiteral::new(specifier.value.clone(), specifier.span),
            },
            keyword.span.merge(&end),
        ),
        next,
    ))
}
