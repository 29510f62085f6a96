//! The operand stack.
//!
//! Each VM owns one shared stack, and every block invocation runs against a
//! fresh isolated stack, so the stack is an explicit object rather than VM
//! state spread across fields.

use crate::runtime::value::Value;

/// Default depth limit, applied to the shared stack and every isolated
/// sub-stack.
pub const DEFAULT_MAX_DEPTH: usize = 1 << 20; // 1,048,576 slots

/// Error type for stack operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackError {
    /// Tried to pop or peek past the bottom of the stack.
    Underflow,
    /// Exceeded the configured depth limit.
    Overflow,
}

impl std::fmt::Display for StackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackError::Underflow => write!(f, "stack underflow"),
            StackError::Overflow => write!(f, "stack overflow"),
        }
    }
}

impl std::error::Error for StackError {}

#[derive(Debug, Clone)]
pub struct Stack {
    items: Vec<Value>,
    max_depth: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            items: Vec::new(),
            max_depth,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn push(&mut self, value: Value) -> Result<(), StackError> {
        if self.items.len() >= self.max_depth {
            return Err(StackError::Overflow);
        }
        self.items.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Value, StackError> {
        self.items.pop().ok_or(StackError::Underflow)
    }

    /// Reference to the item at the given depth (0 = top).
    pub fn peek(&self, depth: usize) -> Result<&Value, StackError> {
        if depth >= self.items.len() {
            return Err(StackError::Underflow);
        }
        Ok(&self.items[self.items.len() - 1 - depth])
    }

    /// All items, bottom to top.
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn into_values(self) -> Vec<Value> {
        self.items
    }

    /// Duplicate the top item (`dup`).
    pub fn dup(&mut self) -> Result<(), StackError> {
        let top = self.peek(0)?.clone();
        self.push(top)
    }

    /// Exchange the top two items (`swap`).
    pub fn swap(&mut self) -> Result<(), StackError> {
        let len = self.items.len();
        if len < 2 {
            return Err(StackError::Underflow);
        }
        self.items.swap(len - 1, len - 2);
        Ok(())
    }

    /// Discard the top item (`drop`).
    pub fn drop_top(&mut self) -> Result<(), StackError> {
        self.pop()?;
        Ok(())
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
