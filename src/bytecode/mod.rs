//! Serialized program images.
//!
//! A parsed program can be frozen to bytes and reloaded later without the
//! frontend. The envelope is a magic number, a format version, and a
//! SHA-256 digest of the body, so a stale or corrupted image is rejected
//! up front instead of misbehaving mid-run. Decoding trusts nothing:
//! every length and tag is validated and the round trip is exact,
//! source positions included.

use std::fmt;
use std::rc::Rc;

use sha2::{Digest, Sha256};

use crate::frontend::{
    instruction::{Instruction, Op},
    position::Position,
    program::Program,
};
use crate::runtime::{host::HostHandle, value::Value};

mod wire;

use wire::Reader;

pub const MAGIC: &[u8; 4] = b"TRWL";
pub const FORMAT_VERSION: u16 = 1;

// Instruction tags.
const OP_PUSH: u8 = 0x01;
const OP_DUP: u8 = 0x02;
const OP_SWAP: u8 = 0x03;
const OP_DROP: u8 = 0x04;
const OP_ILOAD: u8 = 0x05;
const OP_LOAD: u8 = 0x06;
const OP_QUERY: u8 = 0x07;
const OP_INFO: u8 = 0x08;
const OP_MAP: u8 = 0x09;
const OP_FILTER: u8 = 0x0A;
const OP_REDUCE: u8 = 0x0B;
const OP_EACH: u8 = 0x0C;
const OP_TOSTR: u8 = 0x0D;
const OP_TONUM: u8 = 0x0E;
const OP_ADD: u8 = 0x0F;
const OP_SUB: u8 = 0x10;
const OP_MUL: u8 = 0x11;
const OP_DIV: u8 = 0x12;
const OP_MOD: u8 = 0x13;
const OP_EQ: u8 = 0x14;
const OP_NOT_EQ: u8 = 0x15;
const OP_GT: u8 = 0x16;
const OP_GTE: u8 = 0x17;
const OP_LT: u8 = 0x18;
const OP_LTE: u8 = 0x19;
const OP_AND: u8 = 0x1A;
const OP_OR: u8 = 0x1B;
const OP_NOT: u8 = 0x1C;
const OP_CONCAT: u8 = 0x1D;
const OP_MATCH: u8 = 0x1E;
const OP_SPLIT: u8 = 0x1F;
const OP_IOTA: u8 = 0x20;
const OP_REVERSE: u8 = 0x21;

// Value tags.
const VAL_NULL: u8 = 0x00;
const VAL_BOOL: u8 = 0x01;
const VAL_NUMBER: u8 = 0x02;
const VAL_STRING: u8 = 0x03;
const VAL_LIST: u8 = 0x04;
const VAL_FUNCTION: u8 = 0x05;
const VAL_HANDLE: u8 = 0x06;

#[derive(Debug, Clone, PartialEq)]
pub enum ImageError {
    BadMagic,
    UnsupportedVersion(u16),
    DigestMismatch,
    Truncated,
    UnknownOpTag(u8),
    UnknownValueTag(u8),
    Malformed(String),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::BadMagic => write!(f, "not a program image (bad magic)"),
            ImageError::UnsupportedVersion(version) => {
                write!(f, "unsupported image format version {version}")
            }
            ImageError::DigestMismatch => write!(f, "image digest mismatch"),
            ImageError::Truncated => write!(f, "image is truncated"),
            ImageError::UnknownOpTag(tag) => write!(f, "unknown instruction tag {tag:#04x}"),
            ImageError::UnknownValueTag(tag) => write!(f, "unknown value tag {tag:#04x}"),
            ImageError::Malformed(detail) => write!(f, "malformed image: {detail}"),
        }
    }
}

impl std::error::Error for ImageError {}

/// Freezes a program to its image bytes.
pub fn encode(program: &Program) -> Vec<u8> {
    let mut body = Vec::new();
    wire::put_u32(&mut body, program.instructions.len() as u32);
    for instruction in &program.instructions {
        encode_instruction(&mut body, instruction);
    }

    let mut image = Vec::with_capacity(MAGIC.len() + 2 + 32 + body.len());
    image.extend_from_slice(MAGIC);
    wire::put_u16(&mut image, FORMAT_VERSION);
    image.extend_from_slice(&hash_bytes(&body));
    image.extend_from_slice(&body);
    image
}

/// Reloads a program from image bytes.
pub fn decode(image: &[u8]) -> Result<Program, ImageError> {
    let mut reader = Reader::new(image);
    if reader.read_bytes(MAGIC.len())? != MAGIC {
        return Err(ImageError::BadMagic);
    }
    let version = reader.read_u16()?;
    if version != FORMAT_VERSION {
        return Err(ImageError::UnsupportedVersion(version));
    }
    let mut digest = [0u8; 32];
    digest.copy_from_slice(reader.read_bytes(32)?);

    let body = reader.rest();
    if hash_bytes(body) != digest {
        return Err(ImageError::DigestMismatch);
    }

    let mut reader = Reader::new(body);
    let count = reader.read_u32()? as usize;
    // Length fields are untrusted until the bytes are actually there, so
    // grow instead of preallocating from the count.
    let mut instructions = Vec::new();
    for _ in 0..count {
        instructions.push(decode_instruction(&mut reader)?);
    }
    if !reader.is_empty() {
        return Err(ImageError::Malformed(
            "trailing bytes after image body".to_string(),
        ));
    }
    Ok(Program { instructions })
}

pub fn hash_bytes(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&result);
    out
}

fn encode_instruction(out: &mut Vec<u8>, instruction: &Instruction) {
    wire::put_u8(out, op_tag(&instruction.op));
    match &instruction.op {
        Op::Push(value) => encode_value(out, value),
        Op::ILoad(register, value) => {
            wire::put_u8(out, *register);
            encode_value(out, value);
        }
        _ => {}
    }
    wire::put_u32(out, instruction.position.line as u32);
    wire::put_u32(out, instruction.position.column as u32);
}

fn decode_instruction(reader: &mut Reader<'_>) -> Result<Instruction, ImageError> {
    let tag = reader.read_u8()?;
    let op = match tag {
        OP_PUSH => Op::Push(decode_value(reader)?),
        OP_ILOAD => {
            let register = reader.read_u8()?;
            Op::ILoad(register, decode_value(reader)?)
        }
        OP_DUP => Op::Dup,
        OP_SWAP => Op::Swap,
        OP_DROP => Op::Drop,
        OP_LOAD => Op::Load,
        OP_QUERY => Op::Query,
        OP_INFO => Op::Info,
        OP_MAP => Op::Map,
        OP_FILTER => Op::Filter,
        OP_REDUCE => Op::Reduce,
        OP_EACH => Op::Each,
        OP_TOSTR => Op::ToStr,
        OP_TONUM => Op::ToNum,
        OP_ADD => Op::Add,
        OP_SUB => Op::Sub,
        OP_MUL => Op::Mul,
        OP_DIV => Op::Div,
        OP_MOD => Op::Mod,
        OP_EQ => Op::Eq,
        OP_NOT_EQ => Op::NotEq,
        OP_GT => Op::Greater,
        OP_GTE => Op::GreaterEq,
        OP_LT => Op::Less,
        OP_LTE => Op::LessEq,
        OP_AND => Op::And,
        OP_OR => Op::Or,
        OP_NOT => Op::Not,
        OP_CONCAT => Op::Concat,
        OP_MATCH => Op::Match,
        OP_SPLIT => Op::Split,
        OP_IOTA => Op::Iota,
        OP_REVERSE => Op::Reverse,
        unknown => return Err(ImageError::UnknownOpTag(unknown)),
    };
    let line = reader.read_u32()? as usize;
    let column = reader.read_u32()? as usize;
    Ok(Instruction::new(op, Position::new(line, column)))
}

fn op_tag(op: &Op) -> u8 {
    match op {
        Op::Push(_) => OP_PUSH,
        Op::Dup => OP_DUP,
        Op::Swap => OP_SWAP,
        Op::Drop => OP_DROP,
        Op::ILoad(..) => OP_ILOAD,
        Op::Load => OP_LOAD,
        Op::Query => OP_QUERY,
        Op::Info => OP_INFO,
        Op::Map => OP_MAP,
        Op::Filter => OP_FILTER,
        Op::Reduce => OP_REDUCE,
        Op::Each => OP_EACH,
        Op::ToStr => OP_TOSTR,
        Op::ToNum => OP_TONUM,
        Op::Add => OP_ADD,
        Op::Sub => OP_SUB,
        Op::Mul => OP_MUL,
        Op::Div => OP_DIV,
        Op::Mod => OP_MOD,
        Op::Eq => OP_EQ,
        Op::NotEq => OP_NOT_EQ,
        Op::Greater => OP_GT,
        Op::GreaterEq => OP_GTE,
        Op::Less => OP_LT,
        Op::LessEq => OP_LTE,
        Op::And => OP_AND,
        Op::Or => OP_OR,
        Op::Not => OP_NOT,
        Op::Concat => OP_CONCAT,
        Op::Match => OP_MATCH,
        Op::Split => OP_SPLIT,
        Op::Iota => OP_IOTA,
        Op::Reverse => OP_REVERSE,
    }
}

fn encode_value(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => wire::put_u8(out, VAL_NULL),
        Value::Bool(b) => {
            wire::put_u8(out, VAL_BOOL);
            wire::put_u8(out, *b as u8);
        }
        Value::Number(n) => {
            wire::put_u8(out, VAL_NUMBER);
            wire::put_f64(out, *n);
        }
        Value::String(s) => {
            wire::put_u8(out, VAL_STRING);
            wire::put_string(out, s);
        }
        Value::List(items) => {
            wire::put_u8(out, VAL_LIST);
            wire::put_u64(out, items.len() as u64);
            for item in items.iter() {
                encode_value(out, item);
            }
        }
        Value::Handle(handle) => {
            wire::put_u8(out, VAL_HANDLE);
            wire::put_u64(out, handle.id());
        }
        Value::Function(body) => {
            wire::put_u8(out, VAL_FUNCTION);
            wire::put_u64(out, body.len() as u64);
            for instruction in body.iter() {
                encode_instruction(out, instruction);
            }
        }
    }
}

fn decode_value(reader: &mut Reader<'_>) -> Result<Value, ImageError> {
    let tag = reader.read_u8()?;
    match tag {
        VAL_NULL => Ok(Value::Null),
        VAL_BOOL => match reader.read_u8()? {
            0 => Ok(Value::Bool(false)),
            1 => Ok(Value::Bool(true)),
            other => Err(ImageError::Malformed(format!(
                "invalid Bool byte {other:#04x}"
            ))),
        },
        VAL_NUMBER => Ok(Value::Number(reader.read_f64()?)),
        VAL_STRING => Ok(Value::String(reader.read_string()?.into())),
        VAL_LIST => {
            let count = reader.read_len()?;
            let mut items = Vec::new();
            for _ in 0..count {
                items.push(decode_value(reader)?);
            }
            Ok(Value::List(Rc::new(items)))
        }
        VAL_HANDLE => Ok(Value::Handle(HostHandle::new(reader.read_u64()?))),
        VAL_FUNCTION => {
            let count = reader.read_len()?;
            let mut body = Vec::new();
            for _ in 0..count {
                body.push(decode_instruction(reader)?);
            }
            Ok(Value::Function(Rc::from(body)))
        }
        unknown => Err(ImageError::UnknownValueTag(unknown)),
    }
}
