use crate::runtime::value::Value;

/// Number of register slots. Register operands are a single byte on the
/// wire, so the file is exactly 256 slots.
pub const REGISTER_COUNT: usize = 256;

/// The function register file.
///
/// Slots hold any value, though well-formed scripts almost always store
/// blocks for the combinators to invoke. A slot that was never written is
/// distinct from one holding `nil`; reading it is an error at the VM level.
#[derive(Debug, Clone)]
pub struct Registers {
    slots: Vec<Option<Value>>,
}

impl Registers {
    pub fn new() -> Self {
        Self {
            slots: vec![None; REGISTER_COUNT],
        }
    }

    /// Installs a value. `iload` is an unconditional overwrite, so any
    /// previous contents are discarded.
    pub fn define(&mut self, register: u8, value: Value) {
        self.slots[register as usize] = Some(value);
    }

    /// The value in the slot, or `None` if the register was never defined.
    pub fn get(&self, register: u8) -> Option<&Value> {
        self.slots[register as usize].as_ref()
    }

    /// Defined slots in register order.
    pub fn defined(&self) -> impl Iterator<Item = (u8, &Value)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (index as u8, value)))
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_until_written() {
        let registers = Registers::new();
        assert!(registers.get(0).is_none());
        assert!(registers.get(255).is_none());
    }

    #[test]
    fn define_and_get() {
        let mut registers = Registers::new();
        registers.define(3, Value::Number(42.0));
        assert_eq!(registers.get(3), Some(&Value::Number(42.0)));
    }

    #[test]
    fn redefinition_overwrites() {
        let mut registers = Registers::new();
        registers.define(0, Value::Number(1.0));
        registers.define(0, Value::String("x".into()));
        assert_eq!(registers.get(0), Some(&Value::String("x".into())));
    }

    #[test]
    fn null_is_a_value_not_undefined() {
        let mut registers = Registers::new();
        registers.define(9, Value::Null);
        assert_eq!(registers.get(9), Some(&Value::Null));
    }
}
