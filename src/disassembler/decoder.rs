use crate::{
    disassembler::{
        opcodes, FlowType, Immediate, Instruction, Operand, OperandType, INSTRUCTIONS,
    },
    file::parser::Parser,
    Error::OutOfBounds,
    Result,
};

fn code_offset(value: i64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| malformed_error!("Branch target {} is outside the method", value))
}

/// Ensure at least `count` entries of `entry_size` bytes remain before allocating for them
fn check_remaining(parser: &Parser<'_>, count: usize, entry_size: usize) -> Result<()> {
    match count.checked_mul(entry_size) {
        Some(needed) if needed <= parser.len() - parser.pos() => Ok(()),
        _ => Err(OutOfBounds),
    }
}

/// Decodes a sequence of JVM instructions until the parser is exhausted.
///
/// The parser must be positioned over a slice that starts at the first instruction of the
/// method, as `tableswitch` and `lookupswitch` padding is relative to the start of the code.
///
/// # Arguments
///
/// * `parser` - Parser over the method's `code` array
///
/// # Examples
///
/// ```rust
/// use bridgescope::{disassembler::decode_stream, Parser};
///
/// // aload_0, invokevirtual #2, areturn
/// let code = [0x2A, 0xB6, 0x00, 0x02, 0xB0];
/// let instructions = decode_stream(&mut Parser::new(&code))?;
///
/// assert_eq!(instructions.len(), 3);
/// assert_eq!(instructions[1].mnemonic, "invokevirtual");
/// assert_eq!(instructions[2].offset, 4);
/// # Ok::<(), bridgescope::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if an unassigned opcode is encountered or an operand is truncated.
pub fn decode_stream(parser: &mut Parser) -> Result<Vec<Instruction>> {
    let mut instructions = Vec::new();

    while parser.has_more_data() {
        instructions.push(decode_instruction(parser)?);
    }

    Ok(instructions)
}

/// Decodes a single JVM instruction from the current parser position.
///
/// A `wide` prefix is folded into the instruction it modifies: the returned instruction
/// carries the modified opcode with [`Instruction::wide`] set, and its size covers both.
///
/// # Arguments
///
/// * `parser` - A mutable parser positioned at the start of an instruction
///
/// # Errors
///
/// Returns an error if:
/// - The opcode is unassigned, or `wide` precedes an opcode it cannot modify
/// - Operand data is truncated
/// - A switch has an inverted range, a negative pair count, or a target before the method start
///
/// # Examples
///
/// ```rust
/// use bridgescope::{disassembler::{decode_instruction, Operand}, Parser};
///
/// // wide iinc 256, -1
/// let code = [0xC4, 0x84, 0x01, 0x00, 0xFF, 0xFF];
/// let instruction = decode_instruction(&mut Parser::new(&code))?;
///
/// assert_eq!(instruction.mnemonic, "iinc");
/// assert!(instruction.wide);
/// assert_eq!(instruction.size, 6);
/// assert_eq!(instruction.operand, Operand::Iinc { index: 256, delta: -1 });
/// # Ok::<(), bridgescope::Error>(())
/// ```
pub fn decode_instruction(parser: &mut Parser) -> Result<Instruction> {
    let start = parser.pos();
    let mut opcode = parser.read_be::<u8>()?;
    let mut wide = false;
    if opcode == opcodes::WIDE {
        wide = true;
        opcode = parser.read_be::<u8>()?;
    }

    let jvm_instruction = &INSTRUCTIONS[opcode as usize];
    if jvm_instruction.instr.is_empty() {
        return Err(malformed_error!(
            "Reserved opcode: {:02X} at offset {}",
            opcode,
            start
        ));
    }
    if wide && !matches!(jvm_instruction.op_type, OperandType::Local | OperandType::Iinc) {
        return Err(malformed_error!(
            "wide prefix cannot modify {} at offset {}",
            jvm_instruction.instr,
            start
        ));
    }

    let operand = match jvm_instruction.op_type {
        OperandType::None => Operand::None,
        OperandType::Int8 => Operand::Immediate(Immediate::Int8(parser.read_be::<i8>()?)),
        OperandType::UInt8 => Operand::Immediate(Immediate::UInt8(parser.read_be::<u8>()?)),
        OperandType::Int16 => Operand::Immediate(Immediate::Int16(parser.read_be::<i16>()?)),
        OperandType::ConstantPool8 => Operand::ConstantPool(u16::from(parser.read_be::<u8>()?)),
        OperandType::ConstantPool16 => Operand::ConstantPool(parser.read_be::<u16>()?),
        OperandType::Local if wide => Operand::Local(parser.read_be::<u16>()?),
        OperandType::Local => Operand::Local(u16::from(parser.read_be::<u8>()?)),
        OperandType::Iinc if wide => Operand::Iinc {
            index: parser.read_be::<u16>()?,
            delta: parser.read_be::<i16>()?,
        },
        OperandType::Iinc => Operand::Iinc {
            index: u16::from(parser.read_be::<u8>()?),
            delta: i16::from(parser.read_be::<i8>()?),
        },
        OperandType::Branch16 => Operand::Branch(i32::from(parser.read_be::<i16>()?)),
        OperandType::Branch32 => Operand::Branch(parser.read_be::<i32>()?),
        OperandType::InvokeInterface => {
            let index = parser.read_be::<u16>()?;
            let count = parser.read_be::<u8>()?;
            // Reserved zero byte
            parser.advance()?;
            Operand::InvokeInterface { index, count }
        }
        OperandType::InvokeDynamic => {
            let index = parser.read_be::<u16>()?;
            // Two reserved zero bytes
            parser.advance_by(2)?;
            Operand::ConstantPool(index)
        }
        OperandType::MultiANewArray => Operand::MultiANewArray {
            index: parser.read_be::<u16>()?,
            dimensions: parser.read_be::<u8>()?,
        },
        OperandType::TableSwitch => {
            parser.align(4)?;
            let default = parser.read_be::<i32>()?;
            let low = parser.read_be::<i32>()?;
            let high = parser.read_be::<i32>()?;
            if high < low {
                return Err(malformed_error!(
                    "tableswitch at offset {} has high {} below low {}",
                    start,
                    high,
                    low
                ));
            }

            let count = usize::try_from(i64::from(high) - i64::from(low) + 1)
                .map_err(|_| malformed_error!("tableswitch range too large"))?;
            check_remaining(parser, count, 4)?;

            let mut offsets = Vec::with_capacity(count);
            for _ in 0..count {
                offsets.push(parser.read_be::<i32>()?);
            }

            Operand::TableSwitch {
                default,
                low,
                high,
                offsets,
            }
        }
        OperandType::LookupSwitch => {
            parser.align(4)?;
            let default = parser.read_be::<i32>()?;
            let npairs = parser.read_be::<i32>()?;
            let count = usize::try_from(npairs).map_err(|_| {
                malformed_error!(
                    "lookupswitch at offset {} has negative pair count {}",
                    start,
                    npairs
                )
            })?;
            check_remaining(parser, count, 8)?;

            let mut pairs = Vec::with_capacity(count);
            for _ in 0..count {
                pairs.push((parser.read_be::<i32>()?, parser.read_be::<i32>()?));
            }

            Operand::LookupSwitch { default, pairs }
        }
        OperandType::Wide => {
            return Err(malformed_error!("Repeated wide prefix at offset {}", start))
        }
    };

    let offset = code_offset(start as i64)?;
    let size = code_offset((parser.pos() - start) as i64)?;

    let mut branch_targets = Vec::new();
    match (&operand, jvm_instruction.flow) {
        (
            Operand::Branch(relative),
            FlowType::ConditionalBranch | FlowType::UnconditionalBranch,
        ) => {
            branch_targets.push(code_offset(i64::from(offset) + i64::from(*relative))?);
        }
        (Operand::TableSwitch { default, offsets, .. }, _) => {
            for relative in std::iter::once(default).chain(offsets) {
                branch_targets.push(code_offset(i64::from(offset) + i64::from(*relative))?);
            }
        }
        (Operand::LookupSwitch { default, pairs }, _) => {
            branch_targets.push(code_offset(i64::from(offset) + i64::from(*default))?);
            for (_, relative) in pairs {
                branch_targets.push(code_offset(i64::from(offset) + i64::from(*relative))?);
            }
        }
        _ => {}
    }

    Ok(Instruction {
        offset,
        size,
        opcode,
        wide,
        mnemonic: jvm_instruction.instr,
        category: jvm_instruction.category,
        flow_type: jvm_instruction.flow,
        operand,
        branch_targets,
    })
}

#[cfg(test)]
mod tests {
    use crate::{
        disassembler::{
            decode_instruction, decode_stream, FlowType, Immediate, InstructionCategory, Operand,
        },
        Error, Parser,
    };

    #[test]
    fn decode_instruction_basic() {
        // bipush -3
        let mut parser = Parser::new(&[0x10, 0xFD]);

        let result = decode_instruction(&mut parser).unwrap();

        assert_eq!(result.offset, 0);
        assert_eq!(result.size, 2);
        assert_eq!(result.opcode, 0x10);
        assert!(!result.wide);
        assert_eq!(result.mnemonic, "bipush");
        assert_eq!(result.category, InstructionCategory::Constant);
        assert_eq!(result.flow_type, FlowType::Sequential);
        assert_eq!(result.operand, Operand::Immediate(Immediate::Int8(-3)));
    }

    #[test]
    fn decode_instruction_branch() {
        // nop, nop, goto -2
        let mut parser = Parser::new(&[0x00, 0x00, 0xA7, 0xFF, 0xFE]);

        let result = decode_stream(&mut parser).unwrap();

        assert_eq!(result[2].mnemonic, "goto");
        assert_eq!(result[2].flow_type, FlowType::UnconditionalBranch);
        assert_eq!(result[2].branch_targets, vec![0]);
    }

    #[test]
    fn decode_instruction_branch_before_start() {
        // goto -1
        let mut parser = Parser::new(&[0xA7, 0xFF, 0xFF]);
        assert!(matches!(
            decode_instruction(&mut parser),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn decode_instruction_wide() {
        // wide aload 0x0102
        let mut parser = Parser::new(&[0xC4, 0x19, 0x01, 0x02]);

        let result = decode_instruction(&mut parser).unwrap();

        assert_eq!(result.mnemonic, "aload");
        assert!(result.wide);
        assert_eq!(result.size, 4);
        assert_eq!(result.operand, Operand::Local(0x0102));

        // wide cannot modify invokevirtual
        let mut parser = Parser::new(&[0xC4, 0xB6, 0x00, 0x01]);
        assert!(matches!(
            decode_instruction(&mut parser),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn decode_instruction_tableswitch() {
        #[rustfmt::skip]
        let code = [
            0x00,                   // nop
            0xAA, 0x00, 0x00,       // tableswitch + 2 bytes padding
            0x00, 0x00, 0x00, 0x10, // default
            0x00, 0x00, 0x00, 0x00, // low
            0x00, 0x00, 0x00, 0x01, // high
            0x00, 0x00, 0x00, 0x14,
            0x00, 0x00, 0x00, 0x18,
            0xB1,                   // return
        ];
        let mut parser = Parser::new(&code);

        let result = decode_stream(&mut parser).unwrap();
        assert_eq!(result.len(), 3);

        let switch = &result[1];
        assert_eq!(switch.mnemonic, "tableswitch");
        assert_eq!(switch.offset, 1);
        assert_eq!(switch.size, 23);
        assert_eq!(switch.flow_type, FlowType::Switch);
        assert_eq!(switch.branch_targets, vec![17, 21, 25]);
        assert_eq!(result[2].mnemonic, "return");
        assert_eq!(result[2].offset, 24);
    }

    #[test]
    fn decode_instruction_lookupswitch() {
        #[rustfmt::skip]
        let code = [
            0xAB, 0x00, 0x00, 0x00, // lookupswitch + 3 bytes padding
            0x00, 0x00, 0x00, 0x14, // default
            0x00, 0x00, 0x00, 0x01, // npairs
            0x00, 0x00, 0x00, 0x07, // key 7
            0x00, 0x00, 0x00, 0x18,
        ];
        let mut parser = Parser::new(&code);

        let result = decode_instruction(&mut parser).unwrap();
        assert_eq!(result.size, 20);
        assert_eq!(
            result.operand,
            Operand::LookupSwitch {
                default: 0x14,
                pairs: vec![(7, 0x18)]
            }
        );
        assert_eq!(result.branch_targets, vec![0x14, 0x18]);
    }

    #[test]
    fn decode_instruction_switch_errors() {
        // high below low
        #[rustfmt::skip]
        let inverted = [
            0xAA, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x05,
            0x00, 0x00, 0x00, 0x01,
        ];
        assert!(matches!(
            decode_instruction(&mut Parser::new(&inverted)),
            Err(Error::Malformed { .. })
        ));

        // npairs claims far more data than present
        #[rustfmt::skip]
        let truncated = [
            0xAB, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x7F, 0xFF, 0xFF, 0xFF,
        ];
        assert!(matches!(
            decode_instruction(&mut Parser::new(&truncated)),
            Err(Error::OutOfBounds)
        ));
    }

    #[test]
    fn decode_instruction_calls() {
        #[rustfmt::skip]
        let code = [
            0xB9, 0x00, 0x07, 0x02, 0x00, // invokeinterface #7, 2
            0xBA, 0x00, 0x09, 0x00, 0x00, // invokedynamic #9
            0xB8, 0x00, 0x0B,             // invokestatic #11
        ];
        let mut parser = Parser::new(&code);

        let result = decode_stream(&mut parser).unwrap();
        assert_eq!(result.len(), 3);

        assert!(result[0].is_method_call());
        assert_eq!(result[0].constant_pool_index(), Some(7));
        assert_eq!(result[0].size, 5);

        assert!(!result[1].is_method_call());
        assert_eq!(result[1].constant_pool_index(), Some(9));

        assert!(result[2].is_method_call());
        assert_eq!(result[2].constant_pool_index(), Some(11));
        assert_eq!(result[2].next_offset(), 13);
    }

    #[test]
    fn decode_instruction_invalid() {
        assert!(matches!(
            decode_instruction(&mut Parser::new(&[0xCB])),
            Err(Error::Malformed { .. })
        ));
        assert!(matches!(
            decode_instruction(&mut Parser::new(&[0xB6, 0x00])),
            Err(Error::OutOfBounds)
        ));
        assert!(matches!(
            decode_instruction(&mut Parser::new(&[0xC4, 0xC4, 0x15, 0x00, 0x01])),
            Err(Error::Malformed { .. })
        ));
    }
}
