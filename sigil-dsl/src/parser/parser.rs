//! Parser implementation

use super::ast::*;
use crate::lexer::*;
use thiserror::Error;

/// Errors from the combined lex-and-parse entry point.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DslError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] ParseError),
}

/// Tokenize and parse DSL source in one step.
///
/// `Err` is either the single fatal lexical error or the single fatal
/// structural error; non-fatal errors ride along inside the `Ok` outcome.
pub fn parse(source: &str) -> Result<ParseOutcome, DslError> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize()?;
    let mut parser = Parser::new(tokens);
    Ok(parser.parse()?)
}

impl Parser {
    /// Parse the token sequence into declarations.
    ///
    /// Tokens outside parenthesized forms are
    /// skipped silently; a declaration with an unrecognized keyword is
    /// dropped with a recorded error; a token-kind mismatch at an expect
    /// point aborts the whole parse.
    pub fn parse(&mut self) -> Result<ParseOutcome, ParseError> {
        let mut declarations = Vec::new();

        while !self.is_at_end() {
            if self.check(TokenKind::LParen) {
                if let Some(decl) = self.parse_declaration()? {
                    declarations.push(decl);
                }
            } else {
                // Stray tokens between forms are never fatal.
                self.advance();
            }
        }

        Ok(ParseOutcome {
            declarations,
            errors: std::mem::take(&mut self.errors),
        })
    }

    /// Parse one parenthesized declaration form, dispatching on the keyword
    /// after the opening paren.
    fn parse_declaration(&mut self) -> Result<Option<Declaration>, ParseError> {
        self.expect(TokenKind::LParen)?;

        let decl = match self.current().kind {
            TokenKind::Kind => Some(Declaration::Kind(self.parse_kind()?)),
            TokenKind::Datum => Some(Declaration::Datum(self.parse_datum()?)),
            TokenKind::Contract => Some(Declaration::Contract(self.parse_contract()?)),
            TokenKind::Plan => Some(Declaration::Plan(self.parse_plan()?)),
            TokenKind::Branch => Some(Declaration::Branch(self.parse_simple(TokenKind::Branch)?)),
            TokenKind::Agent => Some(Declaration::Agent(self.parse_agent()?)),
            TokenKind::Cue => Some(Declaration::Cue(self.parse_simple(TokenKind::Cue)?)),
            TokenKind::Maplet => Some(Declaration::Maplet(self.parse_simple(TokenKind::Maplet)?)),
            TokenKind::Apply => Some(Declaration::Apply(self.parse_simple(TokenKind::Apply)?)),
            TokenKind::Default => {
                Some(Declaration::Default(self.parse_simple(TokenKind::Default)?))
            }
            TokenKind::Test => Some(Declaration::Test(self.parse_simple(TokenKind::Test)?)),
            TokenKind::Memory => Some(Declaration::Memory(self.parse_simple(TokenKind::Memory)?)),
            TokenKind::Confidence => Some(Declaration::Confidence(
                self.parse_simple(TokenKind::Confidence)?,
            )),
            TokenKind::Validation => Some(Declaration::Validation(
                self.parse_simple(TokenKind::Validation)?,
            )),
            _ => {
                let head = self.current().clone();
                self.errors.push(ParseError {
                    message: format!("unknown declaration keyword: {}", head.text),
                    line: head.span.line,
                    column: head.span.column,
                    token: Some(head),
                });
                // Drop the rest of the form and keep going.
                self.skip_to_close();
                if self.check(TokenKind::RParen) {
                    self.advance();
                }
                None
            }
        };

        Ok(decl)
    }

    /// `(kind Name field ∷ Type ...)`. Fields are identifiers with an
    /// optional annotated type; anything else in the body is skipped.
    fn parse_kind(&mut self) -> Result<KindDecl, ParseError> {
        self.expect(TokenKind::Kind)?;
        let name = self.expect(TokenKind::Identifier)?;

        let mut fields = Vec::new();
        while !self.check(TokenKind::RParen) && !self.is_at_end() {
            if self.check(TokenKind::Identifier) {
                let field_name = self.expect(TokenKind::Identifier)?;
                let field_type = if self.check(TokenKind::TypeAnnotation) {
                    self.advance();
                    Some(self.expect(TokenKind::Identifier)?.text)
                } else {
                    None
                };
                fields.push(FieldDef {
                    name: field_name.text,
                    field_type,
                });
            } else {
                self.advance();
            }
        }

        self.expect(TokenKind::RParen)?;

        Ok(KindDecl {
            name: name.text,
            fields,
            line: name.span.line,
        })
    }

    /// `(datum Name ⟦value⟧)`. The bracketed value is optional and may be a
    /// string, number, identifier, or boolean token.
    fn parse_datum(&mut self) -> Result<DatumDecl, ParseError> {
        self.expect(TokenKind::Datum)?;
        let name = self.expect(TokenKind::Identifier)?;

        let mut value = None;
        if self.check(TokenKind::AgentBracketOpen) {
            self.advance();
            if matches!(
                self.current().kind,
                TokenKind::String
                    | TokenKind::Number
                    | TokenKind::Identifier
                    | TokenKind::Boolean
            ) {
                value = Some(self.current().text.clone());
                self.advance();
            }
            self.expect(TokenKind::AgentBracketClose)?;
        }

        self.expect(TokenKind::RParen)?;

        Ok(DatumDecl {
            name: name.text,
            value,
            line: name.span.line,
        })
    }

    /// `(contract Name ⊨ requires: cond ⊨ ensures: cond ...)`.
    fn parse_contract(&mut self) -> Result<ContractDecl, ParseError> {
        self.expect(TokenKind::Contract)?;
        let name = self.expect(TokenKind::Identifier)?;

        let mut requires = Vec::new();
        let mut ensures = Vec::new();

        while !self.check(TokenKind::RParen) && !self.is_at_end() {
            if self.check(TokenKind::Entailment) {
                self.advance();
                if self.check(TokenKind::Requires) {
                    self.advance();
                    self.expect(TokenKind::Colon)?;
                    requires.push(self.parse_condition());
                } else if self.check(TokenKind::Ensures) {
                    self.advance();
                    self.expect(TokenKind::Colon)?;
                    ensures.push(self.parse_condition());
                }
            } else {
                self.advance();
            }
        }

        self.expect(TokenKind::RParen)?;

        Ok(ContractDecl {
            name: name.text,
            requires,
            ensures,
            line: name.span.line,
        })
    }

    /// Collect a condition as the space-joined text of every token up to the
    /// next entailment glyph, requires/ensures keyword, or close paren.
    fn parse_condition(&mut self) -> String {
        let mut parts: Vec<String> = Vec::new();
        loop {
            match self.current().kind {
                TokenKind::Entailment
                | TokenKind::Requires
                | TokenKind::Ensures
                | TokenKind::RParen
                | TokenKind::Eof => break,
                _ => {
                    parts.push(self.current().text.clone());
                    self.advance();
                }
            }
        }
        parts.join(" ")
    }

    /// `(plan Name § steps: - step ...)`.
    fn parse_plan(&mut self) -> Result<PlanDecl, ParseError> {
        self.expect(TokenKind::Plan)?;
        let name = self.expect(TokenKind::Identifier)?;

        let mut steps = Vec::new();
        if self.check(TokenKind::SectionDelimiter) {
            self.advance();
            if self.check(TokenKind::Steps) {
                self.advance();
                self.expect(TokenKind::Colon)?;

                while !self.check(TokenKind::RParen) && !self.is_at_end() {
                    if self.check(TokenKind::Dash) {
                        self.advance();
                        if self.check(TokenKind::Identifier) {
                            steps.push(self.current().text.clone());
                            self.advance();
                        }
                    } else {
                        self.advance();
                    }
                }
            }
        }

        self.expect(TokenKind::RParen)?;

        Ok(PlanDecl {
            name: name.text,
            steps,
            line: name.span.line,
        })
    }

    /// `(agent ⟦Name⟧ ...)`. The name may be wrapped in agent brackets or
    /// stand bare; the body is skipped.
    fn parse_agent(&mut self) -> Result<SimpleDecl, ParseError> {
        self.expect(TokenKind::Agent)?;

        let name = if self.check(TokenKind::AgentBracketOpen) {
            self.advance();
            let name = self.expect(TokenKind::Identifier)?;
            self.expect(TokenKind::AgentBracketClose)?;
            name
        } else {
            self.expect(TokenKind::Identifier)?
        };

        self.skip_to_close();
        self.expect(TokenKind::RParen)?;

        Ok(SimpleDecl {
            name: name.text,
            line: name.span.line,
        })
    }

    /// Tolerant parse for the remaining declaration kinds: keyword, name,
    /// then skip the balance of the form.
    fn parse_simple(&mut self, keyword: TokenKind) -> Result<SimpleDecl, ParseError> {
        self.expect(keyword)?;
        let name = self.expect(TokenKind::Identifier)?;

        self.skip_to_close();
        self.expect(TokenKind::RParen)?;

        Ok(SimpleDecl {
            name: name.text,
            line: name.span.line,
        })
    }

    /// Advance to the close paren matching the already-consumed open paren,
    /// counting nested parens. Stops *at* the close paren (or at end of
    /// input) without consuming it.
    fn skip_to_close(&mut self) {
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.current().kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            self.advance();
        }
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub(crate) fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Consume the current token if it matches, otherwise fail the whole
    /// parse. This is the only fatal structural error class.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            let token = self.current().clone();
            self.advance();
            Ok(token)
        } else {
            let token = self.current().clone();
            Err(ParseError {
                message: format!("Expected {:?}, got {:?}", kind, token.kind),
                line: token.span.line,
                column: token.span.column,
                token: Some(token),
            })
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
