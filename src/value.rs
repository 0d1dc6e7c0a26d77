use im_rc::{HashMap, Vector};

use std::{
    cmp::PartialEq,
    fmt::{self, Debug, Display},
    rc::Rc,
};

use crate::{
    ast::{display_seq, BlockStatement, Expression, Pair},
    env::Env,
    hashkey::HashKey,
};

pub type Args = Vector<Value>;
pub type Params = Rc<Vec<String>>;
pub type EvalResult = Result<Value, Value>;
pub type BuiltinFunction = fn(Args) -> EvalResult;

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFunction,
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

/// Entry of a hash value: the original key next to its value.
#[derive(Clone, Debug, PartialEq)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

#[derive(Clone, Debug)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Null,
    String(Rc<String>),
    Array(Vector<Value>),
    Hash(HashMap<HashKey, HashPair>),
    Function {
        parameters: Params,
        body: Rc<BlockStatement>,
        env: Env,
    },
    Builtin(Builtin),
    /// Carries a `return`ed value up to the nearest call boundary.
    ReturnValue(Box<Value>),
    Error(Rc<String>),
    Quote(Rc<Expression>),
    Macro {
        parameters: Params,
        body: Rc<BlockStatement>,
        env: Env,
    },
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::Boolean(_) => "BOOLEAN",
            Self::Null => "NULL",
            Self::String(_) => "STRING",
            Self::Array(_) => "ARRAY",
            Self::Hash(_) => "HASH",
            Self::Function { .. } => "FUNCTION",
            Self::Builtin(_) => "BUILTIN",
            Self::ReturnValue(_) => "RETURN_VALUE",
            Self::Error(_) => "ERROR",
            Self::Quote(_) => "QUOTE",
            Self::Macro { .. } => "MACRO",
        }
    }

    /// Only `false` and `null` are falsy.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Boolean(false) | Self::Null)
    }

    #[inline]
    pub fn make_string<I: Into<String>>(s: I) -> Self {
        Self::String(Rc::new(s.into()))
    }

    #[inline]
    pub fn make_error<I: Into<String>>(message: I) -> Self {
        Self::Error(Rc::new(message.into()))
    }

    #[inline]
    pub fn make_array<I: IntoIterator<Item = Value>>(elements: I) -> Self {
        Self::Array(elements.into_iter().collect())
    }

    #[inline]
    pub fn make_quote(node: Expression) -> Self {
        Self::Quote(Rc::new(node))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Hash(a), Self::Hash(b)) => a == b,
            (Self::Builtin(a), Self::Builtin(b)) => a.name == b.name,
            (Self::ReturnValue(a), Self::ReturnValue(b)) => a == b,
            (Self::Error(a), Self::Error(b)) => a == b,
            (Self::Quote(a), Self::Quote(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Null => write!(f, "null"),
            Self::String(s) => write!(f, "{}", s),
            Self::Array(elements) => {
                write!(f, "[")?;
                display_seq(elements.iter(), ", ", f)?;
                write!(f, "]")
            }
            Self::Hash(pairs) => {
                write!(f, "{{")?;
                display_seq(pairs.values().map(|p| Pair(&p.key, &p.value)), ", ", f)?;
                write!(f, "}}")
            }
            Self::Function {
                parameters, body, ..
            } => {
                write!(f, "fn(")?;
                display_seq(parameters.iter(), ", ", f)?;
                write!(f, ") {{ {} }}", body)
            }
            Self::Macro {
                parameters, body, ..
            } => {
                write!(f, "macro(")?;
                display_seq(parameters.iter(), ", ", f)?;
                write!(f, ") {{ {} }}", body)
            }
            Self::Builtin(_) => write!(f, "builtin function"),
            Self::ReturnValue(value) => write!(f, "{}", value),
            Self::Error(message) => write!(f, "ERROR: {}", message),
            Self::Quote(node) => write!(f, "QUOTE({})", node),
        }
    }
}
