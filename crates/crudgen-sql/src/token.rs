use crudgen_core::{ErrorCode, GeneratorError, Result};

/// One lexed token. Keywords are not distinguished here; the parser matches
/// `Ident` tokens case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bare identifier or keyword.
    Ident(String),
    /// Backtick- or double-quote-delimited identifier, delimiters stripped.
    Quoted(String),
    /// Single-quoted string literal, unescaped.
    Str(String),
    /// Numeric literal, kept verbatim.
    Number(String),
    LParen,
    RParen,
    Comma,
    Dot,
    Eq,
    Semi,
    /// Any other punctuation, e.g. the `-` of a negative default.
    Other(char),
}

/// Lexes raw DDL into tokens, dropping whitespace and SQL comments
/// (`-- …`, `# …`, `/* … */`).
pub fn lex(src: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '-' if matches!(chars.peek(), Some((_, '-'))) => {
                skip_line(&mut chars);
            }
            '#' => skip_line(&mut chars),
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                skip_block_comment(&mut chars)?;
            }
            '`' => tokens.push(Token::Quoted(read_delimited(&mut chars, '`')?)),
            '"' => tokens.push(Token::Quoted(read_delimited(&mut chars, '"')?)),
            '\'' => tokens.push(Token::Str(read_string(&mut chars)?)),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            ',' => tokens.push(Token::Comma),
            '.' => tokens.push(Token::Dot),
            '=' => tokens.push(Token::Eq),
            ';' => tokens.push(Token::Semi),
            c if c.is_ascii_digit() => {
                let mut num = String::from(c);
                while let Some((_, n)) = chars.peek() {
                    if n.is_ascii_digit() || *n == '.' {
                        num.push(*n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Number(num));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::from(c);
                while let Some((_, n)) = chars.peek() {
                    if n.is_alphanumeric() || *n == '_' || *n == '$' {
                        ident.push(*n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            c => tokens.push(Token::Other(c)),
        }
    }

    Ok(tokens)
}

fn skip_line(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) {
    for (_, c) in chars.by_ref() {
        if c == '\n' {
            break;
        }
    }
}

fn skip_block_comment(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> Result<()> {
    let mut prev = '\0';
    for (_, c) in chars.by_ref() {
        if prev == '*' && c == '/' {
            return Ok(());
        }
        prev = c;
    }
    Err(GeneratorError::with_message(
        ErrorCode::MalformedSql,
        "unterminated block comment",
    ))
}

fn read_delimited(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    delim: char,
) -> Result<String> {
    let mut out = String::new();
    for (_, c) in chars.by_ref() {
        if c == delim {
            return Ok(out);
        }
        out.push(c);
    }
    Err(GeneratorError::with_message(
        ErrorCode::MalformedSql,
        format!("unterminated `{delim}`-quoted identifier"),
    ))
}

fn read_string(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> Result<String> {
    let mut out = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            // '' escapes a quote inside the literal
            '\'' if matches!(chars.peek(), Some((_, '\''))) => {
                out.push('\'');
                chars.next();
            }
            '\'' => return Ok(out),
            '\\' => {
                if let Some((_, escaped)) = chars.next() {
                    out.push(escaped);
                }
            }
            c => out.push(c),
        }
    }
    Err(GeneratorError::with_message(
        ErrorCode::MalformedSql,
        "unterminated string literal",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_whitespace_are_dropped() {
        let tokens = lex("a -- trailing\n /* block */ b # hash\n c").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("a".into()),
                Token::Ident("b".into()),
                Token::Ident("c".into()),
            ]
        );
    }

    #[test]
    fn quoted_identifiers_keep_their_spelling() {
        let tokens = lex("`member_roles` \"created_at\"").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Quoted("member_roles".into()),
                Token::Quoted("created_at".into()),
            ]
        );
    }

    #[test]
    fn doubled_quote_escapes_inside_strings() {
        let tokens = lex("'it''s'").unwrap();
        assert_eq!(tokens, vec![Token::Str("it's".into())]);
    }

    #[test]
    fn unterminated_quote_is_malformed() {
        let err = lex("`oops").unwrap_err();
        assert_eq!(err.code(), ErrorCode::MalformedSql);

        let err = lex("'oops").unwrap_err();
        assert_eq!(err.code(), ErrorCode::MalformedSql);
    }
}
