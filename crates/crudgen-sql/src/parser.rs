mod column;

use crate::{lex, Token};
use crudgen_core::{ErrorCode, FieldSet, GeneratorError, Name, Result, TableDefinition};

/// Parses a single `CREATE TABLE` statement into a verified
/// [`TableDefinition`].
///
/// Tolerates SQL comments, quoted identifiers, arbitrary whitespace, a
/// trailing comma before the closing parenthesis, and case-insensitive
/// keywords. Table options after the column list (`ENGINE=…` etc.) are
/// accepted and ignored.
pub fn parse(sql: &str) -> Result<TableDefinition> {
    if sql.trim().is_empty() {
        return Err(GeneratorError::new(ErrorCode::EmptySql));
    }

    let tokens = lex(sql)?;
    Parser::new(tokens).parse()
}

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse(mut self) -> Result<TableDefinition> {
        self.seek_create_table()?;
        self.skip_if_not_exists();

        let table_name = self.expect_identifier("table name")?;
        // `db.table` qualifies the name; only the table part matters here.
        let table_name = if self.eat(&Token::Dot) {
            self.expect_identifier("table name")?
        } else {
            table_name
        };

        self.expect(&Token::LParen)?;

        let mut fields = FieldSet::new();
        let mut table_primary: Option<String> = None;
        let mut unique_keys: Vec<(String, Vec<String>)> = Vec::new();

        loop {
            if self.eat(&Token::RParen) {
                break;
            }
            self.parse_body_item(&mut fields, &mut table_primary, &mut unique_keys)?;

            if self.eat(&Token::Comma) {
                continue;
            }
            if self.eat(&Token::RParen) {
                break;
            }
            return Err(self.unexpected("`,` or `)` after table body item"));
        }

        apply_table_primary(&mut fields, table_primary)?;
        apply_unique_keys(&mut fields, unique_keys)?;

        TableDefinition::from_fields(Name::new(&table_name), fields.into_inner())
    }

    /// Scans forward for `CREATE TABLE`, ignoring anything before it.
    fn seek_create_table(&mut self) -> Result<()> {
        while self.pos < self.tokens.len() {
            let checkpoint = self.pos;
            if self.eat_keyword("CREATE") && self.eat_keyword("TABLE") {
                return Ok(());
            }
            self.pos = checkpoint + 1;
        }
        Err(GeneratorError::new(ErrorCode::NoCreateTable))
    }

    fn skip_if_not_exists(&mut self) {
        let checkpoint = self.pos;
        if self.eat_keyword("IF") && self.eat_keyword("NOT") && self.eat_keyword("EXISTS") {
            return;
        }
        self.pos = checkpoint;
    }

    fn parse_body_item(
        &mut self,
        fields: &mut FieldSet,
        table_primary: &mut Option<String>,
        unique_keys: &mut Vec<(String, Vec<String>)>,
    ) -> Result<()> {
        // `CONSTRAINT name` prefixes a table-level constraint.
        if self.eat_keyword("CONSTRAINT") {
            self.eat_any_identifier();
        }

        if self.eat_keyword("PRIMARY") {
            self.expect_keyword("KEY")?;
            let columns = self.parse_column_list()?;
            if columns.len() > 1 {
                return Err(GeneratorError::with_message(
                    ErrorCode::MultiplePrimaryKeys,
                    "composite table-level primary keys are not supported",
                ));
            }
            let column = columns.into_iter().next().ok_or_else(|| {
                GeneratorError::with_message(ErrorCode::MalformedSql, "empty PRIMARY KEY clause")
            })?;
            if table_primary.replace(column).is_some() {
                return Err(GeneratorError::new(ErrorCode::MultiplePrimaryKeys));
            }
            return Ok(());
        }

        if self.eat_keyword("UNIQUE") {
            // UNIQUE KEY label (a, b) / UNIQUE INDEX label (a, b)
            let _ = self.eat_keyword("KEY") || self.eat_keyword("INDEX");
            let label = self.eat_any_identifier();
            let columns = self.parse_column_list()?;
            let label = label.unwrap_or_else(|| format!("uk_{}", columns.join("_")));
            unique_keys.push((label, columns));
            return Ok(());
        }

        // Plain secondary indexes carry no schema semantics for generation.
        if self.eat_keyword("KEY") || self.eat_keyword("INDEX") {
            self.eat_any_identifier();
            self.parse_column_list()?;
            return Ok(());
        }

        if self.eat_keyword("FOREIGN") {
            self.skip_foreign_key()?;
            return Ok(());
        }

        let field = self.parse_column_def()?;
        fields.insert(field)
    }

    /// Parses `(col, col, …)` of a table-level key clause.
    fn parse_column_list(&mut self) -> Result<Vec<String>> {
        self.expect(&Token::LParen)?;
        let mut columns = Vec::new();
        loop {
            if self.eat(&Token::RParen) {
                break;
            }
            let column = self.expect_identifier("column name in key clause")?;
            // Prefix-length syntax: col(10)
            if self.eat(&Token::LParen) {
                self.skip_until_close()?;
            }
            columns.push(column);
            if !self.eat(&Token::Comma) {
                self.expect(&Token::RParen)?;
                break;
            }
        }
        Ok(columns)
    }

    fn skip_foreign_key(&mut self) -> Result<()> {
        self.expect_keyword("KEY")?;
        self.eat_any_identifier();
        if self.eat(&Token::LParen) {
            self.skip_until_close()?;
        }
        if self.eat_keyword("REFERENCES") {
            self.eat_any_identifier();
            if self.eat(&Token::LParen) {
                self.skip_until_close()?;
            }
            // ON DELETE / ON UPDATE actions
            while self.eat_keyword("ON") {
                self.eat_any_identifier();
                self.eat_any_identifier();
            }
        }
        Ok(())
    }

    /// Consumes tokens up to and including the matching `)`, assuming the
    /// opening `(` was already consumed.
    fn skip_until_close(&mut self) -> Result<()> {
        let mut depth = 1usize;
        while let Some(token) = self.next() {
            match token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(GeneratorError::with_message(
            ErrorCode::MalformedSql,
            "unbalanced parentheses",
        ))
    }

    // --- token plumbing ---

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("{expected:?}")))
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if let Some(Token::Ident(ident)) = self.peek() {
            if ident.eq_ignore_ascii_case(keyword) {
                self.pos += 1;
                return true;
            }
        }
        false
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword))
        }
    }

    /// Bare or quoted identifier, or an error naming what was expected.
    fn expect_identifier(&mut self, what: &str) -> Result<String> {
        self.eat_any_identifier()
            .ok_or_else(|| self.unexpected(what))
    }

    fn eat_any_identifier(&mut self) -> Option<String> {
        match self.peek() {
            Some(Token::Ident(ident)) | Some(Token::Quoted(ident)) => {
                let ident = ident.clone();
                self.pos += 1;
                Some(ident)
            }
            _ => None,
        }
    }

    fn unexpected(&self, expected: &str) -> GeneratorError {
        let found = match self.peek() {
            Some(token) => format!("{token:?}"),
            None => "end of input".to_string(),
        };
        GeneratorError::with_message(
            ErrorCode::MalformedSql,
            format!("expected {expected}, found {found}"),
        )
    }
}

fn apply_table_primary(fields: &mut FieldSet, table_primary: Option<String>) -> Result<()> {
    let Some(column) = table_primary else {
        return Ok(());
    };

    let Some(field) = fields.get_mut(&column) else {
        return Err(GeneratorError::with_message(
            ErrorCode::UnknownKeyColumn,
            format!("PRIMARY KEY references unknown column `{column}`"),
        ));
    };

    field.primary = true;
    field.nullable = false;
    Ok(())
}

fn apply_unique_keys(fields: &mut FieldSet, unique_keys: Vec<(String, Vec<String>)>) -> Result<()> {
    for (label, columns) in unique_keys {
        for column in columns {
            let Some(field) = fields.get_mut(&column) else {
                return Err(GeneratorError::with_message(
                    ErrorCode::UnknownKeyColumn,
                    format!("UNIQUE KEY `{label}` references unknown column `{column}`"),
                ));
            };
            field.unique_group = Some(label.clone());
        }
    }
    Ok(())
}
