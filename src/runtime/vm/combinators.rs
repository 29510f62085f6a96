use std::rc::Rc;

use crate::{
    frontend::instruction::Instruction,
    runtime::{error::ErrorKind, error::RuntimeError, value::Value},
};

use super::VM;

impl VM<'_> {
    pub(super) fn execute_map(&mut self) -> Result<(), RuntimeError> {
        let (items, body) = self.combinator_operands("map")?;
        let mut mapped = Vec::with_capacity(items.len());
        for element in items.iter() {
            mapped.push(self.invoke_block(&body, vec![element.clone()])?);
        }
        self.push(Value::List(Rc::new(mapped)))
    }

    pub(super) fn execute_filter(&mut self) -> Result<(), RuntimeError> {
        let (items, body) = self.combinator_operands("filter")?;
        let mut kept = Vec::new();
        for element in items.iter() {
            match self.invoke_block(&body, vec![element.clone()])? {
                Value::Bool(true) => kept.push(element.clone()),
                Value::Bool(false) => {}
                other => {
                    return Err(self.error(ErrorKind::TypeMismatch {
                        operation: "filter",
                        expected: "a Bool from the block",
                        got: other.type_name().to_string(),
                    }));
                }
            }
        }
        self.push(Value::List(Rc::new(kept)))
    }

    pub(super) fn execute_reduce(&mut self) -> Result<(), RuntimeError> {
        // Stack is [list, register, init] with init on top.
        let register = self.register_index(self.peek(1)?, "reduce")?;
        let body = self.resolve_block(register, "reduce")?;
        let items = self.expect_list(2, "reduce")?;
        let init = self.pop()?;
        self.pop()?;
        self.pop()?;

        let mut accumulator = init;
        for element in items.iter() {
            accumulator = self.invoke_block(&body, vec![accumulator, element.clone()])?;
        }
        self.push(accumulator)
    }

    pub(super) fn execute_each(&mut self) -> Result<(), RuntimeError> {
        let (items, body) = self.combinator_operands("each")?;
        for element in items.iter() {
            // The block still must leave exactly one value; it is dropped.
            self.invoke_block(&body, vec![element.clone()])?;
        }
        Ok(())
    }

    /// Validates and pops the `[list, register]` operand pair shared by
    /// `map`, `filter`, and `each`. Nothing is popped until both check out,
    /// so a mis-typed operand leaves the stack untouched.
    fn combinator_operands(
        &mut self,
        operation: &'static str,
    ) -> Result<(Rc<Vec<Value>>, Rc<[Instruction]>), RuntimeError> {
        let register = self.register_index(self.peek(0)?, operation)?;
        let body = self.resolve_block(register, operation)?;
        let items = self.expect_list(1, operation)?;
        self.pop()?;
        self.pop()?;
        Ok((items, body))
    }

    fn expect_list(
        &self,
        depth: usize,
        operation: &'static str,
    ) -> Result<Rc<Vec<Value>>, RuntimeError> {
        match self.peek(depth)? {
            Value::List(items) => Ok(Rc::clone(items)),
            other => Err(self.error(ErrorKind::TypeMismatch {
                operation,
                expected: "a List",
                got: other.type_name().to_string(),
            })),
        }
    }
}
