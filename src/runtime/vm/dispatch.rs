use std::cmp::Ordering;
use std::rc::Rc;

use crate::{
    frontend::instruction::{Instruction, Op},
    runtime::{error::ErrorKind, error::RuntimeError, value::Value},
};

use super::VM;

impl VM<'_> {
    pub(super) fn dispatch(&mut self, instruction: &Instruction) -> Result<(), RuntimeError> {
        match &instruction.op {
            Op::Push(value) => self.push(value.clone()),
            Op::Dup => self.stack.dup().map_err(|e| self.error(e.into())),
            Op::Swap => self.stack.swap().map_err(|e| self.error(e.into())),
            Op::Drop => self.stack.drop_top().map_err(|e| self.error(e.into())),

            Op::ILoad(register, value) => {
                self.registers.define(*register, value.clone());
                Ok(())
            }
            Op::Load => self.execute_load(),

            Op::Query => self.execute_query(),
            Op::Info => self.execute_info(),

            Op::Map => self.execute_map(),
            Op::Filter => self.execute_filter(),
            Op::Reduce => self.execute_reduce(),
            Op::Each => self.execute_each(),

            Op::ToStr => {
                let value = self.pop()?;
                self.push(Value::String(value.to_display_string().into()))
            }
            Op::ToNum => {
                let value = self.pop()?;
                let converted = match value.to_number() {
                    Some(number) => Value::Number(number),
                    None => Value::Null,
                };
                self.push(converted)
            }

            Op::Add => self.execute_arithmetic("+", |l, r| l + r),
            Op::Sub => self.execute_arithmetic("-", |l, r| l - r),
            Op::Mul => self.execute_arithmetic("*", |l, r| l * r),
            Op::Div => self.execute_arithmetic("/", |l, r| l / r),
            Op::Mod => self.execute_arithmetic("%", |l, r| l % r),

            Op::Eq => self.execute_equality(false),
            Op::NotEq => self.execute_equality(true),
            Op::Greater => self.execute_order(">", Ordering::is_gt),
            Op::GreaterEq => self.execute_order(">=", Ordering::is_ge),
            Op::Less => self.execute_order("<", Ordering::is_lt),
            Op::LessEq => self.execute_order("<=", Ordering::is_le),

            Op::And => self.execute_logic("and", |l, r| l && r),
            Op::Or => self.execute_logic("or", |l, r| l || r),
            Op::Not => self.execute_not(),

            Op::Concat => self.execute_concat(),
            Op::Match => self.execute_match(),
            Op::Split => self.execute_split(),

            Op::Iota => self.execute_iota(),
            Op::Reverse => self.execute_reverse(),
        }
    }

    pub(super) fn execute_load(&mut self) -> Result<(), RuntimeError> {
        let register = self.register_index(self.peek(0)?, "load")?;
        let value = match self.registers.get(register) {
            Some(value) => value.clone(),
            None => return Err(self.error(ErrorKind::UndefinedRegister(register))),
        };
        self.pop()?;
        self.push(value)
    }

    pub(super) fn execute_query(&mut self) -> Result<(), RuntimeError> {
        let collection = match self.peek(0)? {
            Value::String(name) => Rc::clone(name),
            other => {
                return Err(self.error(ErrorKind::TypeMismatch {
                    operation: "query",
                    expected: "a String collection name",
                    got: other.type_name().to_string(),
                }));
            }
        };
        // The operand stays on the stack until the host succeeds, so a
        // failed query leaves the stack as it was.
        let handles = self
            .host
            .query(&collection)
            .map_err(|e| self.error(e.into()))?;
        self.pop()?;
        let members = handles.into_iter().map(Value::Handle).collect();
        self.push(Value::List(Rc::new(members)))
    }

    pub(super) fn execute_info(&mut self) -> Result<(), RuntimeError> {
        let attribute = match self.peek(0)? {
            Value::String(name) => Rc::clone(name),
            other => {
                return Err(self.error(ErrorKind::TypeMismatch {
                    operation: "info",
                    expected: "a String attribute name",
                    got: other.type_name().to_string(),
                }));
            }
        };
        let handle = match self.peek(1)? {
            Value::Handle(handle) => *handle,
            other => {
                return Err(self.error(ErrorKind::TypeMismatch {
                    operation: "info",
                    expected: "a Handle",
                    got: other.type_name().to_string(),
                }));
            }
        };
        let value = self
            .host
            .info(handle, &attribute)
            .map_err(|e| self.error(e.into()))?;
        self.pop()?;
        self.pop()?;
        self.push(value)
    }

    pub(super) fn execute_iota(&mut self) -> Result<(), RuntimeError> {
        let count = self.pop()?;
        let Value::Number(count) = count else {
            return Err(self.error(ErrorKind::TypeMismatch {
                operation: "iota",
                expected: "a non-negative integer Number",
                got: count.type_name().to_string(),
            }));
        };
        if count.fract() != 0.0 || !(0.0..=u32::MAX as f64).contains(&count) {
            return Err(self.error(ErrorKind::TypeMismatch {
                operation: "iota",
                expected: "a non-negative integer Number",
                got: count.to_string(),
            }));
        }
        let items = (0..count as u32).map(|n| Value::Number(n as f64)).collect();
        self.push(Value::List(Rc::new(items)))
    }

    pub(super) fn execute_reverse(&mut self) -> Result<(), RuntimeError> {
        let items = match self.peek(0)? {
            Value::List(items) => Rc::clone(items),
            other => {
                return Err(self.error(ErrorKind::TypeMismatch {
                    operation: "reverse",
                    expected: "a List",
                    got: other.type_name().to_string(),
                }));
            }
        };
        self.pop()?;
        let mut reversed = items.as_ref().clone();
        reversed.reverse();
        self.push(Value::List(Rc::new(reversed)))
    }
}
