//! Bottom-up rewriting of the program tree.
//!
//! Every walker rebuilds its node from already rewritten children and then
//! hands each rebuilt expression to the modifier, so the innermost
//! expressions are visited first. The first error aborts the walk.

use crate::{
    ast::{BlockStatement, Expression, Program, Statement},
    value::Value,
};

pub type Modifier<'a> = dyn FnMut(Expression) -> Result<Expression, Value> + 'a;

pub fn program(program: Program, modifier: &mut Modifier) -> Result<Program, Value> {
    Ok(Program {
        statements: statements(program.statements, modifier)?,
    })
}

fn block(block: BlockStatement, modifier: &mut Modifier) -> Result<BlockStatement, Value> {
    Ok(BlockStatement {
        statements: statements(block.statements, modifier)?,
    })
}

fn statements(
    statements: Vec<Statement>,
    modifier: &mut Modifier,
) -> Result<Vec<Statement>, Value> {
    statements
        .into_iter()
        .map(|s| statement(s, modifier))
        .collect()
}

fn statement(statement: Statement, modifier: &mut Modifier) -> Result<Statement, Value> {
    Ok(match statement {
        Statement::Let { name, value } => Statement::Let {
            name,
            value: expression(value, modifier)?,
        },
        Statement::Return(value) => Statement::Return(expression(value, modifier)?),
        Statement::Expression(value) => Statement::Expression(expression(value, modifier)?),
    })
}

fn boxed(node: Box<Expression>, modifier: &mut Modifier) -> Result<Box<Expression>, Value> {
    expression(*node, modifier).map(Box::new)
}

fn expressions(
    nodes: Vec<Expression>,
    modifier: &mut Modifier,
) -> Result<Vec<Expression>, Value> {
    nodes.into_iter().map(|n| expression(n, modifier)).collect()
}

pub fn expression(node: Expression, modifier: &mut Modifier) -> Result<Expression, Value> {
    let node = match node {
        Expression::Identifier(_)
        | Expression::Integer(_)
        | Expression::Boolean(_)
        | Expression::String(_) => node,
        Expression::Prefix { operator, right } => Expression::Prefix {
            operator,
            right: boxed(right, modifier)?,
        },
        Expression::Infix {
            left,
            operator,
            right,
        } => Expression::Infix {
            left: boxed(left, modifier)?,
            operator,
            right: boxed(right, modifier)?,
        },
        Expression::If {
            condition,
            consequence,
            alternative,
        } => Expression::If {
            condition: boxed(condition, modifier)?,
            consequence: block(consequence, modifier)?,
            alternative: match alternative {
                Some(alternative) => Some(block(alternative, modifier)?),
                None => None,
            },
        },
        Expression::Function { parameters, body } => Expression::Function {
            parameters,
            body: block(body, modifier)?,
        },
        Expression::Macro { parameters, body } => Expression::Macro {
            parameters,
            body: block(body, modifier)?,
        },
        Expression::Call {
            function,
            arguments,
        } => Expression::Call {
            function: boxed(function, modifier)?,
            arguments: expressions(arguments, modifier)?,
        },
        Expression::Array(elements) => Expression::Array(expressions(elements, modifier)?),
        Expression::Hash(pairs) => Expression::Hash(
            pairs
                .into_iter()
                .map(|(k, v)| Ok((expression(k, modifier)?, expression(v, modifier)?)))
                .collect::<Result<_, Value>>()?,
        ),
        Expression::Index { left, index } => Expression::Index {
            left: boxed(left, modifier)?,
            index: boxed(index, modifier)?,
        },
    };

    modifier(node)
}
