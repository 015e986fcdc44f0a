use super::Parser;
use crate::Token;
use crudgen_core::{ColumnType, DefaultValue, ErrorCode, FieldDefinition, GeneratorError, Result};

impl Parser {
    /// Parses one column definition: name, type, then attribute clauses in
    /// any order up to the next `,` or the closing `)`.
    pub(super) fn parse_column_def(&mut self) -> Result<FieldDefinition> {
        let name = self.expect_identifier("column name")?;
        let raw_ty = self.expect_identifier("column type")?;

        let Some(ty) = ColumnType::from_sql(&raw_ty) else {
            return Err(GeneratorError::with_message(
                ErrorCode::UnsupportedColumnType,
                format!("unsupported column type `{raw_ty}` on `{name}`"),
            ));
        };

        let mut field = FieldDefinition::new(name, ty);
        field.length = self.parse_type_length()?;

        let mut not_null = false;
        loop {
            match self.peek() {
                Some(Token::Comma) | Some(Token::RParen) | None => break,
                _ => {}
            }
            self.parse_column_clause(&mut field, &mut not_null)?;
        }

        // NOT NULL wins over an explicit NULL; the primary key is never
        // nullable regardless of what was written.
        if not_null || field.primary {
            field.nullable = false;
        }

        Ok(field)
    }

    /// `(50)` after VARCHAR, or `(10,2)` after DECIMAL. The first number is
    /// kept as the length; a scale is accepted and dropped.
    fn parse_type_length(&mut self) -> Result<Option<u32>> {
        if !self.eat(&Token::LParen) {
            return Ok(None);
        }

        let length = match self.next() {
            Some(Token::Number(n)) => n.split('.').next().unwrap_or("").parse().ok(),
            _ => None,
        };

        if self.eat(&Token::Comma) {
            self.next();
        }
        self.expect(&Token::RParen)?;

        Ok(length)
    }

    fn parse_column_clause(&mut self, field: &mut FieldDefinition, not_null: &mut bool) -> Result<()> {
        if self.eat_keyword("NOT") {
            self.expect_keyword("NULL")?;
            *not_null = true;
        } else if self.eat_keyword("NULL") {
            field.nullable = true;
        } else if self.eat_keyword("DEFAULT") {
            field.default = Some(self.parse_default_value()?);
        } else if self.eat_keyword("AUTO_INCREMENT") || self.eat_keyword("AUTOINCREMENT") {
            field.auto_increment = true;
        } else if self.eat_keyword("PRIMARY") {
            self.expect_keyword("KEY")?;
            field.primary = true;
        } else if self.eat_keyword("UNIQUE") {
            let _ = self.eat_keyword("KEY");
            field.unique_group = Some(format!("uk_{}", field.name));
        } else if self.eat_keyword("COMMENT") {
            match self.next() {
                Some(Token::Str(comment)) => field.comment = Some(comment),
                _ => return Err(self.unexpected("string literal after COMMENT")),
            }
        } else if self.eat_keyword("ON") {
            self.expect_keyword("UPDATE")?;
            let keyword = self
                .eat_any_identifier()
                .ok_or_else(|| self.unexpected("keyword after ON UPDATE"))?;
            self.skip_call_parens()?;
            field.on_update = Some(keyword.to_ascii_uppercase());
        } else if self.eat_keyword("UNSIGNED") || self.eat_keyword("ZEROFILL") {
            // storage modifiers, no schema meaning here
        } else if self.eat_keyword("CHARACTER") {
            self.expect_keyword("SET")?;
            self.eat_any_identifier();
        } else if self.eat_keyword("COLLATE") {
            self.eat_any_identifier();
        } else {
            return Err(self.unexpected("column attribute clause"));
        }

        Ok(())
    }

    fn parse_default_value(&mut self) -> Result<DefaultValue> {
        if self.eat(&Token::Other('-')) {
            return match self.next() {
                Some(Token::Number(n)) => Ok(DefaultValue::Number(format!("-{n}"))),
                _ => Err(self.unexpected("number after `-` in DEFAULT")),
            };
        }

        match self.next() {
            Some(Token::Number(n)) => Ok(DefaultValue::Number(n)),
            Some(Token::Str(s)) => Ok(DefaultValue::Text(s)),
            Some(Token::Ident(ident)) if ident.eq_ignore_ascii_case("NULL") => {
                Ok(DefaultValue::Null)
            }
            Some(Token::Ident(keyword)) => {
                // CURRENT_TIMESTAMP and friends, optionally with precision
                self.skip_call_parens()?;
                Ok(DefaultValue::Keyword(keyword.to_ascii_uppercase()))
            }
            _ => Err(self.unexpected("DEFAULT value")),
        }
    }

    /// Consumes a trailing `(…)` precision group, e.g. `CURRENT_TIMESTAMP(3)`.
    fn skip_call_parens(&mut self) -> Result<()> {
        if self.eat(&Token::LParen) {
            self.skip_until_close()?;
        }
        Ok(())
    }
}
