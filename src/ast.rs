use std::fmt::{self, Display};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Let { name: String, value: Expression },
    Return(Expression),
    Expression(Expression),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefixOperator {
    Bang,
    Minus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfixOperator {
    Plus,
    Minus,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Eq,
    NotEq,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Identifier(String),
    Integer(i64),
    Boolean(bool),
    String(String),
    Prefix {
        operator: PrefixOperator,
        right: Box<Expression>,
    },
    Infix {
        left: Box<Expression>,
        operator: InfixOperator,
        right: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    Function {
        parameters: Vec<String>,
        body: BlockStatement,
    },
    Macro {
        parameters: Vec<String>,
        body: BlockStatement,
    },
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Array(Vec<Expression>),
    Hash(Vec<(Expression, Expression)>),
    Index {
        left: Box<Expression>,
        index: Box<Expression>,
    },
}

impl Expression {
    /// Name of the callee when `self` is a call to a plain identifier.
    pub fn called_name(&self) -> Option<&str> {
        match self {
            Self::Call { function, .. } => match function.as_ref() {
                Self::Identifier(name) => Some(name.as_str()),
                _ => None,
            },
            _ => None,
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        display_seq(self.statements.iter(), " ", f)
    }
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        display_seq(self.statements.iter(), " ", f)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Let { name, value } => write!(f, "let {} = {};", name, value),
            Self::Return(value) => write!(f, "return {};", value),
            Self::Expression(expression) => write!(f, "{}", expression),
        }
    }
}

impl Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Bang => write!(f, "!"),
            Self::Minus => write!(f, "-"),
        }
    }
}

impl Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Asterisk => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Lt => write!(f, "<"),
            Self::Gt => write!(f, ">"),
            Self::Eq => write!(f, "=="),
            Self::NotEq => write!(f, "!="),
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Identifier(name) => write!(f, "{}", name),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::String(s) => write!(f, "\"{}\"", s),
            Self::Prefix { operator, right } => write!(f, "({}{})", operator, right),
            Self::Infix {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Self::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if {} {{ {} }}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {{ {} }}", alternative)?;
                }
                Ok(())
            }
            Self::Function { parameters, body } => {
                write!(f, "fn(")?;
                display_seq(parameters.iter(), ", ", f)?;
                write!(f, ") {{ {} }}", body)
            }
            Self::Macro { parameters, body } => {
                write!(f, "macro(")?;
                display_seq(parameters.iter(), ", ", f)?;
                write!(f, ") {{ {} }}", body)
            }
            Self::Call {
                function,
                arguments,
            } => {
                write!(f, "{}(", function)?;
                display_seq(arguments.iter(), ", ", f)?;
                write!(f, ")")
            }
            Self::Array(elements) => {
                write!(f, "[")?;
                display_seq(elements.iter(), ", ", f)?;
                write!(f, "]")
            }
            Self::Hash(pairs) => {
                write!(f, "{{")?;
                display_seq(pairs.iter().map(|(k, v)| Pair(k, v)), ", ", f)?;
                write!(f, "}}")
            }
            Self::Index { left, index } => write!(f, "({}[{}])", left, index),
        }
    }
}

/// Writes the items of `i` separated by `sep`.
pub fn display_seq<P: Display, I: Iterator<Item = P>>(
    mut i: I,
    sep: &str,
    f: &mut fmt::Formatter,
) -> fmt::Result {
    if let Some(e) = i.next() {
        write!(f, "{}", e)?;
    }

    for e in i {
        write!(f, "{}{}", sep, e)?;
    }

    Ok(())
}

/// A `key: value` pair, as printed inside hash braces.
pub struct Pair<K, V>(pub K, pub V);

impl<K: Display, V: Display> Display for Pair<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ident(name: &str) -> Box<Expression> {
        Box::new(Expression::Identifier(name.into()))
    }

    #[test]
    fn let_statement_source() {
        let program = Program {
            statements: vec![Statement::Let {
                name: "myVar".into(),
                value: Expression::Identifier("anotherVar".into()),
            }],
        };

        assert_eq!(program.to_string(), "let myVar = anotherVar;");
    }

    #[test]
    fn nested_expression_source() {
        let expression = Expression::If {
            condition: Box::new(Expression::Prefix {
                operator: PrefixOperator::Bang,
                right: ident("ok"),
            }),
            consequence: BlockStatement {
                statements: vec![Statement::Expression(Expression::Infix {
                    left: ident("a"),
                    operator: InfixOperator::Asterisk,
                    right: Box::new(Expression::Index {
                        left: ident("xs"),
                        index: Box::new(Expression::Integer(0)),
                    }),
                })],
            },
            alternative: Some(BlockStatement {
                statements: vec![Statement::Return(Expression::Call {
                    function: ident("f"),
                    arguments: vec![
                        Expression::String("s".into()),
                        Expression::Hash(vec![(
                            Expression::Boolean(true),
                            Expression::Array(vec![Expression::Integer(1)]),
                        )]),
                    ],
                })],
            }),
        };

        assert_eq!(
            expression.to_string(),
            r#"if (!ok) { (a * (xs[0])) } else { return f("s", {true: [1]}); }"#
        );
    }

    #[test]
    fn literal_source() {
        let function = Expression::Function {
            parameters: vec!["x".into(), "y".into()],
            body: BlockStatement {
                statements: vec![Statement::Expression(Expression::Infix {
                    left: ident("x"),
                    operator: InfixOperator::Plus,
                    right: ident("y"),
                })],
            },
        };
        assert_eq!(function.to_string(), "fn(x, y) { (x + y) }");

        let mac = Expression::Macro {
            parameters: vec![],
            body: BlockStatement::default(),
        };
        assert_eq!(mac.to_string(), "macro() {  }");
    }

    #[test]
    fn called_name() {
        let call = Expression::Call {
            function: ident("unquote"),
            arguments: vec![],
        };
        assert_eq!(call.called_name(), Some("unquote"));
        assert_eq!(Expression::Integer(1).called_name(), None);
    }
}
