pub mod bytecode;
pub mod frontend;
pub mod runtime;
