use std::rc::Rc;

use crate::{
    frontend::{instruction::Instruction, position::Position, program::Program},
    runtime::{
        error::{ErrorKind, RuntimeError},
        host::Host,
        registers::Registers,
        stack::{DEFAULT_MAX_DEPTH, Stack},
        value::Value,
    },
};

mod binary_ops;
mod combinators;
mod dispatch;
mod string_ops;
mod trace;

/// Executes a program against a host.
///
/// The VM owns the operand stack and the register file; the host is
/// borrowed for the lifetime of the VM, so the embedding application
/// keeps ownership of its world.
pub struct VM<'h> {
    stack: Stack,
    registers: Registers,
    host: &'h mut dyn Host,
    trace: bool,
    max_depth: usize,
    position: Position,
}

impl<'h> VM<'h> {
    pub fn new(host: &'h mut dyn Host) -> Self {
        Self {
            stack: Stack::new(),
            registers: Registers::new(),
            host,
            trace: false,
            max_depth: DEFAULT_MAX_DEPTH,
            position: Position::new(1, 1),
        }
    }

    pub fn set_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    /// Caps the depth of the operand stack and of every block sub-stack.
    /// Must be called before `run`; it replaces the (empty) stack.
    pub fn set_max_depth(&mut self, depth: usize) {
        self.max_depth = depth;
        self.stack = Stack::with_max_depth(depth);
    }

    /// The operand stack, bottom first.
    pub fn stack(&self) -> &[Value] {
        self.stack.as_slice()
    }

    /// Consumes the VM and returns the operand stack, bottom first.
    pub fn into_stack(self) -> Vec<Value> {
        self.stack.into_values()
    }

    /// Runs every instruction in order. On error the VM stops where it
    /// was; the stack keeps whatever the completed instructions left.
    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        self.execute(&program.instructions)
    }

    fn execute(&mut self, instructions: &[Instruction]) -> Result<(), RuntimeError> {
        for instruction in instructions {
            self.position = instruction.position;
            if self.trace {
                self.trace_instruction(instruction);
            }
            self.dispatch(instruction)?;
        }
        Ok(())
    }

    /// Runs a block body on a fresh stack seeded with `args` (first
    /// argument deepest) and returns its single result. The caller's
    /// stack is never visible to the body.
    fn invoke_block(
        &mut self,
        body: &[Instruction],
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let call_position = self.position;
        let mut inner = Stack::with_max_depth(self.max_depth);
        for arg in args {
            inner.push(arg).map_err(|e| self.error(e.into()))?;
        }

        let outer = std::mem::replace(&mut self.stack, inner);
        let outcome = self.execute(body);
        let mut inner = std::mem::replace(&mut self.stack, outer);
        self.position = call_position;
        outcome?;

        if inner.len() != 1 {
            return Err(self.error(ErrorKind::ArityMismatch { left: inner.len() }));
        }
        inner.pop().map_err(|e| self.error(e.into()))
    }

    #[inline(always)]
    fn error(&self, kind: ErrorKind) -> RuntimeError {
        RuntimeError::new(kind, self.position)
    }

    #[inline(always)]
    fn push(&mut self, value: Value) -> Result<(), RuntimeError> {
        self.stack.push(value).map_err(|e| self.error(e.into()))
    }

    #[inline(always)]
    fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.stack.pop().map_err(|e| self.error(e.into()))
    }

    #[inline(always)]
    fn peek(&self, depth: usize) -> Result<&Value, RuntimeError> {
        self.stack.peek(depth).map_err(|e| self.error(e.into()))
    }

    /// Reads a register operand off a value. Only integral numbers in
    /// 0..=255 name a register.
    fn register_index(
        &self,
        value: &Value,
        operation: &'static str,
    ) -> Result<u8, RuntimeError> {
        match value {
            Value::Number(number)
                if number.fract() == 0.0 && (0.0..=255.0).contains(number) =>
            {
                Ok(*number as u8)
            }
            Value::Number(number) => Err(self.error(ErrorKind::TypeMismatch {
                operation,
                expected: "a register number in 0..=255",
                got: number.to_string(),
            })),
            other => Err(self.error(ErrorKind::TypeMismatch {
                operation,
                expected: "a register number in 0..=255",
                got: other.type_name().to_string(),
            })),
        }
    }

    /// Looks up a register that must hold a block.
    fn resolve_block(
        &self,
        register: u8,
        operation: &'static str,
    ) -> Result<Rc<[Instruction]>, RuntimeError> {
        match self.registers.get(register) {
            None => Err(self.error(ErrorKind::UndefinedRegister(register))),
            Some(Value::Function(body)) => Ok(Rc::clone(body)),
            Some(other) => Err(self.error(ErrorKind::TypeMismatch {
                operation,
                expected: "a register holding a block",
                got: other.type_name().to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod binary_ops_test;
#[cfg(test)]
mod string_ops_test;
