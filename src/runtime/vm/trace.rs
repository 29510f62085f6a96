use crate::frontend::instruction::Instruction;

use super::VM;

impl VM<'_> {
    pub(super) fn trace_instruction(&self, instruction: &Instruction) {
        println!("AT={} {}", instruction.position, instruction);
        self.trace_stack();
        self.trace_registers();
    }

    fn trace_stack(&self) {
        let items: Vec<String> = self
            .stack
            .as_slice()
            .iter()
            .map(|value| value.to_string())
            .collect();
        println!("  stack: [{}]", items.join(", "));
    }

    fn trace_registers(&self) {
        let items: Vec<String> = self
            .registers
            .defined()
            .map(|(register, value)| format!("r{register}={value}"))
            .collect();
        if items.is_empty() {
            return;
        }
        println!("  registers: [{}]", items.join(", "));
    }
}
