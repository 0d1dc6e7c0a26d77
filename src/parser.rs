use std::mem;

use crate::{
    ast::{BlockStatement, Expression, InfixOperator, PrefixOperator, Program, Statement},
    lexer::{tokenize, Token},
};

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

fn precedence(token: &Token) -> Precedence {
    match token {
        Token::Eq | Token::NotEq => Precedence::Equals,
        Token::Lt | Token::Gt => Precedence::LessGreater,
        Token::Plus | Token::Minus => Precedence::Sum,
        Token::Asterisk | Token::Slash => Precedence::Product,
        Token::LParen => Precedence::Call,
        Token::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

fn infix_operator(token: &Token) -> Option<InfixOperator> {
    match token {
        Token::Plus => Some(InfixOperator::Plus),
        Token::Minus => Some(InfixOperator::Minus),
        Token::Asterisk => Some(InfixOperator::Asterisk),
        Token::Slash => Some(InfixOperator::Slash),
        Token::Lt => Some(InfixOperator::Lt),
        Token::Gt => Some(InfixOperator::Gt),
        Token::Eq => Some(InfixOperator::Eq),
        Token::NotEq => Some(InfixOperator::NotEq),
        _ => None,
    }
}

/// Pratt parser over the token stream of one input unit.
///
/// Parsing never stops at the first problem: failed statements are skipped
/// and their messages collected in [`Parser::errors`].
pub struct Parser {
    tokens: std::vec::IntoIter<Token>,
    current: Token,
    peek: Token,
    errors: Vec<String>,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        let mut tokens = tokenize(input).into_iter();
        let current = tokens.next().unwrap_or(Token::Eof);
        let peek = tokens.next().unwrap_or(Token::Eof);

        Self {
            tokens,
            current,
            peek,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while self.current != Token::Eof {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.advance();
        }

        Program { statements }
    }

    fn advance(&mut self) {
        let next = self.tokens.next().unwrap_or(Token::Eof);
        self.current = mem::replace(&mut self.peek, next);
    }

    fn peek_is(&self, token: &Token) -> bool {
        mem::discriminant(&self.peek) == mem::discriminant(token)
    }

    fn expect_peek(&mut self, token: Token) -> Option<()> {
        if self.peek_is(&token) {
            self.advance();
            Some(())
        } else {
            self.errors.push(format!(
                "expected next token to be {}, got {} instead",
                token, self.peek
            ));
            None
        }
    }

    fn skip_semicolon(&mut self) {
        if self.peek == Token::Semicolon {
            self.advance();
        }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current {
            Token::Let => self.parse_let_statement(),
            Token::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        let name = match &self.peek {
            Token::Ident(name) => name.clone(),
            other => {
                self.errors.push(format!(
                    "expected next token to be identifier, got {} instead",
                    other
                ));
                return None;
            }
        };
        self.advance();
        self.expect_peek(Token::Assign)?;
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Let { name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Return(value))
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Expression(expression))
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while self.peek != Token::Semicolon && precedence < self::precedence(&self.peek) {
            self.advance();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match &self.current {
            Token::Ident(name) => Some(Expression::Identifier(name.clone())),
            Token::Int(literal) => match literal.parse() {
                Ok(n) => Some(Expression::Integer(n)),
                Err(_) => {
                    self.errors
                        .push(format!("could not parse {} as integer", literal));
                    None
                }
            },
            Token::Str(s) => Some(Expression::String(s.clone())),
            Token::True => Some(Expression::Boolean(true)),
            Token::False => Some(Expression::Boolean(false)),
            Token::Bang => self.parse_prefix_expression(PrefixOperator::Bang),
            Token::Minus => self.parse_prefix_expression(PrefixOperator::Minus),
            Token::LParen => self.parse_grouped_expression(),
            Token::If => self.parse_if_expression(),
            Token::Function => {
                let (parameters, body) = self.parse_function_parts()?;
                Some(Expression::Function { parameters, body })
            }
            Token::Macro => {
                let (parameters, body) = self.parse_function_parts()?;
                Some(Expression::Macro { parameters, body })
            }
            Token::LBracket => self
                .parse_expression_list(Token::RBracket)
                .map(Expression::Array),
            Token::LBrace => self.parse_hash_literal(),
            other => {
                self.errors
                    .push(format!("no prefix parse function for {} found", other));
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        match self.current {
            Token::LParen => {
                let arguments = self.parse_expression_list(Token::RParen)?;
                Some(Expression::Call {
                    function: Box::new(left),
                    arguments,
                })
            }
            Token::LBracket => {
                self.advance();
                let index = self.parse_expression(Precedence::Lowest)?;
                self.expect_peek(Token::RBracket)?;
                Some(Expression::Index {
                    left: Box::new(left),
                    index: Box::new(index),
                })
            }
            ref token => {
                let operator = infix_operator(token)?;
                let precedence = precedence(token);
                self.advance();
                let right = self.parse_expression(precedence)?;
                Some(Expression::Infix {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                })
            }
        }
    }

    fn parse_prefix_expression(&mut self, operator: PrefixOperator) -> Option<Expression> {
        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;

        Some(Expression::Prefix {
            operator,
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.advance();
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(Token::RParen)?;

        Some(expression)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        self.expect_peek(Token::LParen)?;
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(Token::RParen)?;
        self.expect_peek(Token::LBrace)?;
        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek == Token::Else {
            self.advance();
            self.expect_peek(Token::LBrace)?;
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Some(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_block_statement(&mut self) -> Option<BlockStatement> {
        let mut statements = Vec::new();
        self.advance();

        while self.current != Token::RBrace {
            if self.current == Token::Eof {
                self.errors.push("unterminated block, expected }".into());
                return None;
            }
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.advance();
        }

        Some(BlockStatement { statements })
    }

    /// Parameters and body shared by `fn` and `macro` literals.
    fn parse_function_parts(&mut self) -> Option<(Vec<String>, BlockStatement)> {
        self.expect_peek(Token::LParen)?;
        let parameters = self.parse_parameters()?;
        self.expect_peek(Token::LBrace)?;
        let body = self.parse_block_statement()?;

        Some((parameters, body))
    }

    fn parse_parameters(&mut self) -> Option<Vec<String>> {
        let mut parameters = Vec::new();

        if self.peek == Token::RParen {
            self.advance();
            return Some(parameters);
        }

        self.advance();
        parameters.push(self.parameter_name()?);

        while self.peek == Token::Comma {
            self.advance();
            self.advance();
            parameters.push(self.parameter_name()?);
        }

        self.expect_peek(Token::RParen)?;
        Some(parameters)
    }

    fn parameter_name(&mut self) -> Option<String> {
        match &self.current {
            Token::Ident(name) => Some(name.clone()),
            other => {
                self.errors
                    .push(format!("expected parameter name, got {} instead", other));
                None
            }
        }
    }

    fn parse_expression_list(&mut self, end: Token) -> Option<Vec<Expression>> {
        let mut list = Vec::new();

        if self.peek == end {
            self.advance();
            return Some(list);
        }

        self.advance();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek == Token::Comma {
            self.advance();
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;
        Some(list)
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let mut pairs = Vec::new();

        while self.peek != Token::RBrace {
            self.advance();
            let key = self.parse_expression(Precedence::Lowest)?;
            self.expect_peek(Token::Colon)?;
            self.advance();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if self.peek != Token::RBrace {
                self.expect_peek(Token::Comma)?;
            }
        }

        self.expect_peek(Token::RBrace)?;
        Some(Expression::Hash(pairs))
    }
}

/// Parses `input`, returning the program or every collected error message.
pub fn parse(input: &str) -> Result<Program, Vec<String>> {
    let mut parser = Parser::new(input);
    let program = parser.parse_program();

    if parser.errors().is_empty() {
        Ok(program)
    } else {
        Err(parser.into_errors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_ok(input: &str) -> Program {
        match parse(input) {
            Ok(program) => program,
            Err(errors) => panic!("parser errors for {:?}: {:?}", input, errors),
        }
    }

    fn parse_err(input: &str) -> Vec<String> {
        match parse(input) {
            Ok(program) => panic!("expected errors for {:?}, got {}", input, program),
            Err(errors) => errors,
        }
    }

    #[test]
    fn let_and_return_statements() {
        let program = parse_ok("let x = 5; let foobar = y; return 10;");

        assert_eq!(
            program.statements,
            vec![
                Statement::Let {
                    name: "x".into(),
                    value: Expression::Integer(5),
                },
                Statement::Let {
                    name: "foobar".into(),
                    value: Expression::Identifier("y".into()),
                },
                Statement::Return(Expression::Integer(10)),
            ]
        );
    }

    #[test]
    fn operator_precedence() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1, 2, 3, 4][(b * c)])) * d)"),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
            ),
        ];

        for (input, expected) in cases.iter() {
            assert_eq!(parse_ok(input).to_string(), *expected);
        }
    }

    #[test]
    fn if_else_expression() {
        let program = parse_ok("if (x < y) { x } else { y }");
        assert_eq!(program.to_string(), "if (x < y) { x } else { y }");

        let program = parse_ok("if (x) { x }");
        match &program.statements[0] {
            Statement::Expression(Expression::If { alternative, .. }) => {
                assert_eq!(*alternative, None)
            }
            other => panic!("not an if expression: {:?}", other),
        }
    }

    #[test]
    fn function_and_macro_literals() {
        assert_eq!(
            parse_ok("fn(x, y) { x + y; }").to_string(),
            "fn(x, y) { (x + y) }"
        );
        assert_eq!(parse_ok("fn() {}").to_string(), "fn() {  }");
        assert_eq!(
            parse_ok("macro(x, y) { x + y; }").statements,
            vec![Statement::Expression(Expression::Macro {
                parameters: vec!["x".into(), "y".into()],
                body: BlockStatement {
                    statements: vec![Statement::Expression(Expression::Infix {
                        left: Box::new(Expression::Identifier("x".into())),
                        operator: InfixOperator::Plus,
                        right: Box::new(Expression::Identifier("y".into())),
                    })],
                },
            })]
        );
    }

    #[test]
    fn string_array_and_hash_literals() {
        assert_eq!(
            parse_ok(r#""hello world""#).statements,
            vec![Statement::Expression(Expression::String("hello world".into()))]
        );
        assert_eq!(parse_ok("[]").to_string(), "[]");
        assert_eq!(parse_ok("{}").to_string(), "{}");
        assert_eq!(
            parse_ok(r#"{"one": 0 + 1, true: 2, 3: "x"}"#).to_string(),
            r#"{"one": (0 + 1), true: 2, 3: "x"}"#
        );
    }

    #[test]
    fn reports_errors() {
        assert_eq!(
            parse_err("let = 5;")[0],
            "expected next token to be identifier, got = instead"
        );
        assert_eq!(
            parse_err("let x 5;"),
            vec!["expected next token to be =, got 5 instead".to_string()]
        );
        assert_eq!(
            parse_err("(1 + 2"),
            vec!["expected next token to be ), got EOF instead".to_string()]
        );
        assert_eq!(
            parse_err("99999999999999999999"),
            vec!["could not parse 99999999999999999999 as integer".to_string()]
        );
        assert_eq!(
            parse_err("fn(x) { x"),
            vec!["unterminated block, expected }".to_string()]
        );
        assert!(parse_err("@").contains(&"no prefix parse function for ILLEGAL(@) found".to_string()));
    }

    #[test]
    fn collects_several_errors() {
        let errors = parse_err("let = 1; let y 2;");
        assert!(errors.len() >= 2, "{:?}", errors);
    }
}
