use std::rc::Rc;

use regex::Regex;

use crate::runtime::{error::ErrorKind, error::RuntimeError, value::Value};

use super::VM;

impl VM<'_> {
    pub(super) fn execute_concat(&mut self) -> Result<(), RuntimeError> {
        let right = self.pop()?;
        let left = self.pop()?;
        match (&left, &right) {
            (Value::String(l), Value::String(r)) => {
                let mut joined = String::with_capacity(l.len() + r.len());
                joined.push_str(l);
                joined.push_str(r);
                self.push(Value::String(joined.into()))
            }
            (Value::List(l), Value::List(r)) => {
                let mut joined = Vec::with_capacity(l.len() + r.len());
                joined.extend(l.iter().cloned());
                joined.extend(r.iter().cloned());
                self.push(Value::List(Rc::new(joined)))
            }
            _ => Err(self.error(ErrorKind::TypeMismatch {
                operation: "concat",
                expected: "String and String or List and List",
                got: format!("{} and {}", left.type_name(), right.type_name()),
            })),
        }
    }

    pub(super) fn execute_split(&mut self) -> Result<(), RuntimeError> {
        let separator = self.pop()?;
        let subject = self.pop()?;
        let (Value::String(subject), Value::String(separator)) = (&subject, &separator) else {
            return Err(self.error(ErrorKind::TypeMismatch {
                operation: "split",
                expected: "String and String",
                got: format!("{} and {}", subject.type_name(), separator.type_name()),
            }));
        };
        let pieces = if separator.is_empty() {
            // An empty separator splits into characters rather than the
            // empty-piece artifacts str::split would produce.
            subject
                .chars()
                .map(|ch| Value::String(ch.to_string().into()))
                .collect()
        } else {
            subject
                .split(separator.as_ref())
                .map(|piece| Value::String(piece.into()))
                .collect()
        };
        self.push(Value::List(Rc::new(pieces)))
    }

    pub(super) fn execute_match(&mut self) -> Result<(), RuntimeError> {
        let pattern = self.pop()?;
        let subject = self.pop()?;
        let (Value::String(subject), Value::String(pattern)) = (&subject, &pattern) else {
            return Err(self.error(ErrorKind::TypeMismatch {
                operation: "match",
                expected: "String and String",
                got: format!("{} and {}", subject.type_name(), pattern.type_name()),
            }));
        };
        let regex = Regex::new(pattern).map_err(|e| {
            self.error(ErrorKind::InvalidPattern {
                pattern: pattern.to_string(),
                detail: e.to_string(),
            })
        })?;
        self.push(Value::Bool(regex.is_match(subject)))
    }
}
