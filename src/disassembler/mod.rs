//! JVM bytecode instruction decoding.
//!
//! This module decodes the `code` array of a method's `Code` attribute into a linear sequence
//! of instructions. It handles every assigned opcode, including the variable-length
//! `tableswitch` and `lookupswitch` (whose padding is relative to the start of the code) and
//! the `wide` prefix, so that an instruction stream can be walked reliably. It does not
//! verify bytecode or build control flow graphs.
//!
//! # Key Types
//! - [`Instruction`] - A decoded JVM instruction
//! - [`Operand`] - Instruction operands (immediates, constant pool indices, branch offsets)
//! - [`FlowType`] - How instructions affect control flow
//! - [`INSTRUCTIONS`] - The opcode table
//!
//! # Main Functions
//! - [`decode_instruction`] - Decode a single instruction
//! - [`decode_stream`] - Decode a sequence of instructions
//!
//! # Example
//! ```rust
//! use bridgescope::disassembler::decode_instruction;
//! use bridgescope::Parser;
//! let bytecode = &[0x2A, 0xB0]; // aload_0, areturn
//! let mut parser = Parser::new(bytecode);
//! let instruction = decode_instruction(&mut parser)?;
//! println!("Mnemonic: {}", instruction.mnemonic);
//! # Ok::<(), bridgescope::Error>(())
//! ```

mod decoder;
mod instruction;
mod instructions;

pub use decoder::{decode_instruction, decode_stream};
pub use instruction::{
    FlowType, Immediate, Instruction, InstructionCategory, Operand, OperandType,
};
pub use instructions::*;
