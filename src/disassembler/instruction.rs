//! Decoded JVM instruction representation.
//!
//! # Key Types
//! - [`Instruction`] - A single decoded instruction with its operand and control flow data
//! - [`Operand`] / [`Immediate`] - Decoded operand values
//! - [`OperandType`] - Operand encoding of an opcode, as listed in the opcode table
//! - [`FlowType`] / [`InstructionCategory`] - Classification used by analyses

use crate::disassembler::opcodes;

/// How an opcode's operand bytes are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandType {
    /// No operand bytes
    None,
    /// Signed byte immediate (`bipush`)
    Int8,
    /// Unsigned byte immediate (`newarray`)
    UInt8,
    /// Signed short immediate (`sipush`)
    Int16,
    /// One-byte constant pool index (`ldc`)
    ConstantPool8,
    /// Two-byte constant pool index
    ConstantPool16,
    /// Local variable slot, one byte, two under `wide`
    Local,
    /// Local slot plus signed increment (`iinc`)
    Iinc,
    /// Signed 16-bit branch offset
    Branch16,
    /// Signed 32-bit branch offset
    Branch32,
    /// Constant pool index, argument count and a zero byte
    InvokeInterface,
    /// Constant pool index and two zero bytes
    InvokeDynamic,
    /// Constant pool index and dimension count
    MultiANewArray,
    /// Padded jump table
    TableSwitch,
    /// Padded match/offset pairs
    LookupSwitch,
    /// Prefix widening the next instruction's local index
    Wide,
}

/// Immediate operand values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Immediate {
    /// Signed byte
    Int8(i8),
    /// Unsigned byte
    UInt8(u8),
    /// Signed short
    Int16(i16),
}

impl From<Immediate> for i32 {
    fn from(value: Immediate) -> Self {
        match value {
            Immediate::Int8(v) => i32::from(v),
            Immediate::UInt8(v) => i32::from(v),
            Immediate::Int16(v) => i32::from(v),
        }
    }
}

/// A decoded operand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// The instruction has no operand
    None,
    /// An immediate value
    Immediate(Immediate),
    /// An index into the constant pool
    ConstantPool(u16),
    /// A local variable slot
    Local(u16),
    /// `iinc` slot and increment
    Iinc {
        /// Local variable slot
        index: u16,
        /// Signed increment
        delta: i16,
    },
    /// Relative branch offset
    Branch(i32),
    /// `invokeinterface` operands
    InvokeInterface {
        /// Constant pool index of the interface method reference
        index: u16,
        /// Argument slot count, including the receiver
        count: u8,
    },
    /// `multianewarray` operands
    MultiANewArray {
        /// Constant pool index of the array class
        index: u16,
        /// Number of dimensions to create
        dimensions: u8,
    },
    /// `tableswitch` operands
    TableSwitch {
        /// Offset taken when the key is out of range
        default: i32,
        /// Lowest key
        low: i32,
        /// Highest key
        high: i32,
        /// Offsets for `low..=high`
        offsets: Vec<i32>,
    },
    /// `lookupswitch` operands
    LookupSwitch {
        /// Offset taken when no key matches
        default: i32,
        /// Sorted `(key, offset)` pairs
        pairs: Vec<(i32, i32)>,
    },
}

/// How an instruction affects control flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowType {
    /// Falls through to the next instruction
    Sequential,
    /// Either branches or falls through
    ConditionalBranch,
    /// Always branches
    UnconditionalBranch,
    /// Branches to one of several targets
    Switch,
    /// Invokes a method and continues afterwards
    Call,
    /// Leaves the method
    Return,
    /// Raises an exception
    Throw,
}

/// Coarse classification of opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionCategory {
    /// Pushes a constant
    Constant,
    /// Moves values between locals, arrays and the stack
    LoadStore,
    /// Arithmetic and bitwise operations
    Arithmetic,
    /// Primitive conversions
    Conversion,
    /// Comparisons producing an int
    Comparison,
    /// Operand stack manipulation
    Stack,
    /// Branches, switches and returns
    ControlFlow,
    /// Field access, allocation and type checks
    Object,
    /// Method invocation
    Call,
    /// Monitors, reserved and debugging opcodes
    Misc,
}

/// A decoded JVM instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Offset of the instruction within the method's code
    pub offset: u32,
    /// Encoded size in bytes, including padding and a `wide` prefix
    pub size: u32,
    /// The opcode, for widened instructions the one following the prefix
    pub opcode: u8,
    /// Whether the instruction was prefixed with `wide`
    pub wide: bool,
    /// Assembler mnemonic
    pub mnemonic: &'static str,
    /// Classification of the opcode
    pub category: InstructionCategory,
    /// Control flow behaviour
    pub flow_type: FlowType,
    /// The decoded operand
    pub operand: Operand,
    /// Absolute offsets this instruction may branch to
    pub branch_targets: Vec<u32>,
}

impl Instruction {
    /// `true` for the four method invocation opcodes.
    ///
    /// `invokedynamic` binds a call site rather than naming a method, and is excluded.
    #[must_use]
    pub fn is_method_call(&self) -> bool {
        matches!(
            self.opcode,
            opcodes::INVOKEVIRTUAL
                | opcodes::INVOKESPECIAL
                | opcodes::INVOKESTATIC
                | opcodes::INVOKEINTERFACE
        )
    }

    /// The constant pool index referenced by this instruction, if any
    #[must_use]
    pub fn constant_pool_index(&self) -> Option<u16> {
        match self.operand {
            Operand::ConstantPool(index)
            | Operand::InvokeInterface { index, .. }
            | Operand::MultiANewArray { index, .. } => Some(index),
            _ => None,
        }
    }

    /// Offset of the instruction that follows this one
    #[must_use]
    pub fn next_offset(&self) -> u32 {
        self.offset + self.size
    }
}
