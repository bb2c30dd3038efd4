//! Lexer for the transform script language.

use super::ScriptError;

/// A lexical token with the line it started on.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token kind and payload.
    pub kind: TokenKind,
    /// 1-based source line.
    pub line: u32,
}

/// Token kinds produced by [`tokenize`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    True,
    False,
    Null,
    Not,
    And,
    Or,
    Assign,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Dot,
    /// Statement separator: newline or `;`.
    Newline,
}

/// Splits script source into tokens.
///
/// Comments run from `#` to end of line. Consecutive separators collapse
/// into one `Newline` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ScriptError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line: u32 = 1;

    let push = |tokens: &mut Vec<Token>, kind: TokenKind, line: u32| {
        if kind == TokenKind::Newline {
            if matches!(tokens.last(), None | Some(Token { kind: TokenKind::Newline, .. })) {
                return;
            }
        }
        tokens.push(Token { kind, line });
    };

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\r' => {
                chars.next();
            }
            '\n' => {
                chars.next();
                push(&mut tokens, TokenKind::Newline, line);
                line += 1;
            }
            ';' => {
                chars.next();
                push(&mut tokens, TokenKind::Newline, line);
            }
            '#' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        push(&mut tokens, TokenKind::Newline, line);
                        line += 1;
                        break;
                    }
                }
            }
            '"' | '\'' => {
                let quote = c;
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => match chars.next() {
                            Some('n') => text.push('\n'),
                            Some('t') => text.push('\t'),
                            Some(other) => text.push(other),
                            None => break,
                        },
                        '\n' => break,
                        c if c == quote => {
                            closed = true;
                            break;
                        }
                        c => text.push(c),
                    }
                }
                if !closed {
                    return Err(ScriptError::new("unterminated string literal", line));
                }
                push(&mut tokens, TokenKind::Str(text), line);
            }
            c if c.is_ascii_digit() => {
                let mut text = String::new();
                let mut is_float = false;
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() {
                        text.push(c);
                        chars.next();
                    } else if c == '.' && !is_float {
                        // A digit must follow, otherwise this dot is a
                        // method-call dot on an integer literal.
                        let mut ahead = chars.clone();
                        ahead.next();
                        if ahead.peek().is_some_and(char::is_ascii_digit) {
                            is_float = true;
                            text.push(c);
                            chars.next();
                        } else {
                            break;
                        }
                    } else {
                        break;
                    }
                }
                let kind = if is_float {
                    TokenKind::Float(
                        text.parse()
                            .map_err(|_| ScriptError::new(format!("bad number: {text}"), line))?,
                    )
                } else {
                    TokenKind::Int(
                        text.parse()
                            .map_err(|_| ScriptError::new(format!("bad number: {text}"), line))?,
                    )
                };
                push(&mut tokens, kind, line);
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut text = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        text.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let kind = match text.as_str() {
                    "true" => TokenKind::True,
                    "false" => TokenKind::False,
                    "null" => TokenKind::Null,
                    "not" => TokenKind::Not,
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    _ => TokenKind::Ident(text),
                };
                push(&mut tokens, kind, line);
            }
            _ => {
                chars.next();
                let kind = match c {
                    '=' => {
                        if chars.peek() == Some(&'=') {
                            chars.next();
                            TokenKind::Eq
                        } else {
                            TokenKind::Assign
                        }
                    }
                    '!' => {
                        if chars.peek() == Some(&'=') {
                            chars.next();
                            TokenKind::NotEq
                        } else {
                            return Err(ScriptError::new("unexpected '!'", line));
                        }
                    }
                    '<' => {
                        if chars.peek() == Some(&'=') {
                            chars.next();
                            TokenKind::LtEq
                        } else {
                            TokenKind::Lt
                        }
                    }
                    '>' => {
                        if chars.peek() == Some(&'=') {
                            chars.next();
                            TokenKind::GtEq
                        } else {
                            TokenKind::Gt
                        }
                    }
                    '+' => TokenKind::Plus,
                    '-' => TokenKind::Minus,
                    '*' => TokenKind::Star,
                    '/' => TokenKind::Slash,
                    '%' => TokenKind::Percent,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    ',' => TokenKind::Comma,
                    ':' => TokenKind::Colon,
                    '.' => TokenKind::Dot,
                    other => {
                        return Err(ScriptError::new(
                            format!("unexpected character {other:?}"),
                            line,
                        ))
                    }
                };
                push(&mut tokens, kind, line);
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_assignment_statement() {
        assert_eq!(
            kinds("x = 1"),
            vec![
                TokenKind::Ident("x".to_string()),
                TokenKind::Assign,
                TokenKind::Int(1),
            ]
        );
    }

    #[test]
    fn test_method_call_and_float() {
        assert_eq!(
            kinds("df.mean(\"price\") * 2.5"),
            vec![
                TokenKind::Ident("df".to_string()),
                TokenKind::Dot,
                TokenKind::Ident("mean".to_string()),
                TokenKind::LParen,
                TokenKind::Str("price".to_string()),
                TokenKind::RParen,
                TokenKind::Star,
                TokenKind::Float(2.5),
            ]
        );
    }

    #[test]
    fn test_int_then_method_dot() {
        // `1.head` must lex as Int, Dot, Ident — not a float.
        assert_eq!(
            kinds("1.head"),
            vec![
                TokenKind::Int(1),
                TokenKind::Dot,
                TokenKind::Ident("head".to_string()),
            ]
        );
    }

    #[test]
    fn test_comments_and_separators_collapse() {
        assert_eq!(
            kinds("# leading comment\n\n\nx = 1 # trailing\n;\ny = 2"),
            vec![
                TokenKind::Ident("x".to_string()),
                TokenKind::Assign,
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Ident("y".to_string()),
                TokenKind::Assign,
                TokenKind::Int(2),
            ]
        );
    }

    #[test]
    fn test_keywords_and_comparison() {
        assert_eq!(
            kinds("not a and b or price >= 10"),
            vec![
                TokenKind::Not,
                TokenKind::Ident("a".to_string()),
                TokenKind::And,
                TokenKind::Ident("b".to_string()),
                TokenKind::Or,
                TokenKind::Ident("price".to_string()),
                TokenKind::GtEq,
                TokenKind::Int(10),
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#"'a\'b' "c\nd""#),
            vec![
                TokenKind::Str("a'b".to_string()),
                TokenKind::Str("c\nd".to_string()),
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("x = \"oops").unwrap_err();
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn test_line_numbers() {
        let tokens = tokenize("a = 1\nb = 2").unwrap();
        assert_eq!(tokens.first().map(|t| t.line), Some(1));
        assert_eq!(tokens.last().map(|t| t.line), Some(2));
    }
}
