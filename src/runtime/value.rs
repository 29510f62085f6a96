use std::{fmt, rc::Rc};

use crate::frontend::instruction::Instruction;
use crate::runtime::host::HostHandle;

/// Runtime value used by the operand stack, the register file, and literals.
///
/// Heap-backed variants are `Rc`-shared so cloning a value is O(1): `push`,
/// `dup`, and combinator argument passing never copy string or list
/// contents. Values are immutable after creation, so sharing is safe and the
/// value graph stays acyclic.
///
/// `Handle` is an opaque reference minted by the host; the interpreter only
/// routes it back through `info`. `Function` is a captured block literal: a
/// slice of instructions with no environment of its own.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value; also what `tonum` yields on failure.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit floating point number, the only numeric type.
    Number(f64),
    /// UTF-8 string value.
    String(Rc<str>),
    /// Ordered collection of values.
    List(Rc<Vec<Value>>),
    /// Opaque host-owned reference.
    Handle(HostHandle),
    /// Captured block, invoked through the combinators.
    Function(Rc<[Instruction]>),
}

impl Value {
    /// Returns the runtime type label used in diagnostics.
    ///
    /// These labels are user-visible and are expected to remain stable.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Handle(_) => "Handle",
            Value::Function(_) => "Function",
        }
    }

    /// Structural equality as seen by the `=` and `!=` instructions.
    ///
    /// Numbers compare by IEEE 754 rules (`NaN` is not equal to itself),
    /// lists compare element by element, handles by identity, and functions
    /// only when they are the same captured block. Values of different kinds
    /// are unequal, never an error.
    pub fn value_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Number(l), Value::Number(r)) => l == r,
            (Value::String(l), Value::String(r)) => l == r,
            (Value::List(l), Value::List(r)) => {
                l.len() == r.len() && l.iter().zip(r.iter()).all(|(a, b)| a.value_eq(b))
            }
            (Value::Handle(l), Value::Handle(r)) => l == r,
            (Value::Function(l), Value::Function(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }

    /// Numeric reading of this value, if it has one.
    ///
    /// Backs the total `tonum` instruction: numbers pass through, strings
    /// are trimmed and parsed, everything else is `None`.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Converts a value to display text for `tostr`.
    ///
    /// Unlike [`std::fmt::Display`], strings are returned without quotes.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::String(s) => s.to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    /// Renders the value in source form: strings quoted, lists bracketed
    /// with space-separated elements, functions as their block text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::List(elements) => {
                let items: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", items.join(" "))
            }
            Value::Handle(handle) => write!(f, "<handle@{}>", handle.id()),
            Value::Function(body) => {
                let items: Vec<String> = body.iter().map(|i| i.to_string()).collect();
                write!(f, "{{{}}}", items.join(" "))
            }
        }
    }
}
