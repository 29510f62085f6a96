//! Runtime core types and VM execution.
//!
//! # No-Cycle Invariant
//! Runtime values are represented as immutable graphs and are expected to
//! remain acyclic. Heap-backed `Value` variants use `Rc` for cheap sharing,
//! so introducing cycles would leak memory under reference counting. The
//! language has no mutation and no way to close over a value under
//! construction, so scripts cannot violate this; hosts handing values back
//! through `info` must not either.

pub mod error;
pub mod host;
pub mod registers;
pub mod stack;
pub mod value;
pub mod vm;

pub use error::{ErrorKind, RuntimeError};
pub use host::{Host, HostError, HostHandle, StaticHost};
pub use value::Value;
pub use vm::VM;
