//! Unit tests for the bytecode system

mod test_chunk;
mod test_metadata;
mod test_opcode;
