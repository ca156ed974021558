//! The assembler itself; no ports split since it has no swappable
//! adapter, only the concrete `hn-bus`/`hn-persistence`/`hn-cache` wiring
//! `node-runtime` hands it.

pub mod assembler;

pub use assembler::BlockAssembler;
