use crate::error::{MetaCheckerError, Result};

use super::constant_pool::ConstantPool;

const INVOKEVIRTUAL: u8 = 0xb6;
const INVOKESPECIAL: u8 = 0xb7;
const INVOKESTATIC: u8 = 0xb8;
const INVOKEINTERFACE: u8 = 0xb9;
const INVOKEDYNAMIC: u8 = 0xba;
const TABLESWITCH: u8 = 0xaa;
const LOOKUPSWITCH: u8 = 0xab;
const WIDE: u8 = 0xc4;
const IINC: u8 = 0x84;

/// Target of an invoke instruction, resolved through the constant pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRef {
    /// Internal name of the owner class.
    pub class_name: String,
    pub name: String,
    pub descriptor: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeKind {
    Virtual,
    Special,
    Static,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Invoke {
        offset: u32,
        kind: InvokeKind,
        target: MethodRef,
    },
    Other {
        offset: u32,
        opcode: u8,
    },
}

impl Instruction {
    #[must_use]
    pub const fn offset(&self) -> u32 {
        match self {
            Self::Invoke { offset, .. } | Self::Other { offset, .. } => *offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumber {
    pub start_pc: u32,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariable {
    pub start_pc: u32,
    pub length: u32,
    pub name: String,
    pub descriptor: String,
    pub index: u16,
}

/// Decoded `Code` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code {
    pub instructions: Vec<Instruction>,
    pub line_numbers: Vec<LineNumber>,
    pub local_variables: Vec<LocalVariable>,
}

impl Code {
    /// Line of the first entry of the line number table.
    #[must_use]
    pub fn first_line(&self) -> Option<u32> {
        self.line_numbers.first().map(|entry| entry.line)
    }

    /// Source line covering bytecode offset `pc`, if line numbers are present.
    #[must_use]
    pub fn line_for(&self, pc: u32) -> Option<u32> {
        self.line_numbers
            .iter()
            .filter(|entry| entry.start_pc <= pc)
            .max_by_key(|entry| entry.start_pc)
            .map(|entry| entry.line)
    }

    /// Name of the local variable in `slot` that is live at method entry.
    #[must_use]
    pub fn local_variable_name(&self, slot: usize) -> Option<&str> {
        self.local_variables
            .iter()
            .find(|var| usize::from(var.index) == slot && var.start_pc == 0)
            .map(|var| var.name.as_str())
    }

    /// Iterate invoke instructions together with their resolved targets.
    pub fn invocations(&self) -> impl Iterator<Item = (u32, &MethodRef)> {
        self.instructions.iter().filter_map(|insn| match insn {
            Instruction::Invoke { offset, target, .. } => Some((*offset, target)),
            Instruction::Other { .. } => None,
        })
    }
}

/// Decode a raw bytecode array into instructions.
///
/// # Errors
/// Returns an error on truncated or unknown opcodes, or on invoke operands
/// that do not resolve to method references.
pub fn decode_instructions(bytecode: &[u8], pool: &ConstantPool) -> Result<Vec<Instruction>> {
    let mut instructions = Vec::new();
    let mut pc = 0usize;
    while pc < bytecode.len() {
        let opcode = bytecode[pc];
        let length = instruction_length(bytecode, pc)?;
        if pc + length > bytecode.len() {
            return Err(truncated(pc));
        }
        let offset = u32::try_from(pc).map_err(|_| truncated(pc))?;
        let kind = match opcode {
            INVOKEVIRTUAL => Some(InvokeKind::Virtual),
            INVOKESPECIAL => Some(InvokeKind::Special),
            INVOKESTATIC => Some(InvokeKind::Static),
            INVOKEINTERFACE => Some(InvokeKind::Interface),
            _ => None,
        };
        let instruction = match kind {
            Some(kind) => {
                let index = u16::from_be_bytes([bytecode[pc + 1], bytecode[pc + 2]]);
                Instruction::Invoke {
                    offset,
                    kind,
                    target: pool.method_ref(index)?,
                }
            }
            None => Instruction::Other { offset, opcode },
        };
        instructions.push(instruction);
        pc += length;
    }
    Ok(instructions)
}

fn instruction_length(code: &[u8], pc: usize) -> Result<usize> {
    let opcode = code[pc];
    let length = match opcode {
        0x00..=0x0f
        | 0x1a..=0x35
        | 0x3b..=0x83
        | 0x85..=0x98
        | 0xac..=0xb1
        | 0xbe
        | 0xbf
        | 0xc2
        | 0xc3
        | 0xca
        | 0xfe
        | 0xff => 1,
        0x10 | 0x12 | 0x15..=0x19 | 0x36..=0x3a | 0xa9 | 0xbc => 2,
        0x11 | 0x13 | 0x14 | IINC | 0x99..=0xa8 | 0xb2..=0xb8 | 0xbb | 0xbd | 0xc0 | 0xc1
        | 0xc6 | 0xc7 => 3,
        0xc5 => 4,
        INVOKEINTERFACE | INVOKEDYNAMIC | 0xc8 | 0xc9 => 5,
        WIDE => match code.get(pc + 1) {
            Some(&IINC) => 6,
            Some(_) => 4,
            None => return Err(truncated(pc)),
        },
        TABLESWITCH => {
            let base = pc + 1 + padding(pc);
            let low = read_i32(code, base + 4, pc)?;
            let high = read_i32(code, base + 8, pc)?;
            let count = usize::try_from(i64::from(high) - i64::from(low) + 1)
                .map_err(|_| truncated(pc))?;
            base + 12 + count * 4 - pc
        }
        LOOKUPSWITCH => {
            let base = pc + 1 + padding(pc);
            let pairs = usize::try_from(read_i32(code, base + 4, pc)?)
                .map_err(|_| truncated(pc))?;
            base + 8 + pairs * 8 - pc
        }
        other => {
            return Err(MetaCheckerError::ClassFormat(format!(
                "unknown opcode 0x{other:02X} at {pc}"
            )));
        }
    };
    Ok(length)
}

const fn padding(pc: usize) -> usize {
    (4 - (pc + 1) % 4) % 4
}

fn read_i32(code: &[u8], at: usize, pc: usize) -> Result<i32> {
    code.get(at..at + 4)
        .and_then(|bytes| bytes.try_into().ok())
        .map(i32::from_be_bytes)
        .ok_or_else(|| truncated(pc))
}

fn truncated(pc: usize) -> MetaCheckerError {
    MetaCheckerError::ClassFormat(format!("truncated instruction at {pc}"))
}

#[cfg(test)]
#[path = "code_tests.rs"]
mod tests;
