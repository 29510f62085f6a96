use std::cmp::Ordering;

use crate::runtime::{error::ErrorKind, error::RuntimeError, value::Value};

use super::VM;

impl VM<'_> {
    pub(super) fn execute_arithmetic(
        &mut self,
        operation: &'static str,
        apply: fn(f64, f64) -> f64,
    ) -> Result<(), RuntimeError> {
        let right = self.pop()?;
        let left = self.pop()?;
        match (&left, &right) {
            // IEEE 754 semantics throughout; division by zero is inf/NaN,
            // not an error.
            (Value::Number(l), Value::Number(r)) => self.push(Value::Number(apply(*l, *r))),
            _ => Err(self.error(ErrorKind::TypeMismatch {
                operation,
                expected: "Number and Number",
                got: format!("{} and {}", left.type_name(), right.type_name()),
            })),
        }
    }

    pub(super) fn execute_order(
        &mut self,
        operation: &'static str,
        accept: fn(Ordering) -> bool,
    ) -> Result<(), RuntimeError> {
        let right = self.pop()?;
        let left = self.pop()?;
        match (&left, &right) {
            (Value::Number(l), Value::Number(r)) => {
                // NaN orders against nothing, so every operator answers false.
                let holds = l.partial_cmp(r).is_some_and(accept);
                self.push(Value::Bool(holds))
            }
            (Value::String(l), Value::String(r)) => {
                self.push(Value::Bool(accept(l.as_ref().cmp(r.as_ref()))))
            }
            _ => Err(self.error(ErrorKind::TypeMismatch {
                operation,
                expected: "Number and Number or String and String",
                got: format!("{} and {}", left.type_name(), right.type_name()),
            })),
        }
    }

    /// `=` and `!=` accept any pair of values; mixed kinds compare unequal.
    pub(super) fn execute_equality(&mut self, negate: bool) -> Result<(), RuntimeError> {
        let right = self.pop()?;
        let left = self.pop()?;
        let equal = left.value_eq(&right);
        self.push(Value::Bool(equal != negate))
    }

    pub(super) fn execute_logic(
        &mut self,
        operation: &'static str,
        apply: fn(bool, bool) -> bool,
    ) -> Result<(), RuntimeError> {
        let right = self.pop()?;
        let left = self.pop()?;
        match (&left, &right) {
            (Value::Bool(l), Value::Bool(r)) => self.push(Value::Bool(apply(*l, *r))),
            _ => Err(self.error(ErrorKind::TypeMismatch {
                operation,
                expected: "Bool and Bool",
                got: format!("{} and {}", left.type_name(), right.type_name()),
            })),
        }
    }

    pub(super) fn execute_not(&mut self) -> Result<(), RuntimeError> {
        let value = self.pop()?;
        match value {
            Value::Bool(b) => self.push(Value::Bool(!b)),
            other => Err(self.error(ErrorKind::TypeMismatch {
                operation: "not",
                expected: "a Bool",
                got: other.type_name().to_string(),
            })),
        }
    }
}
