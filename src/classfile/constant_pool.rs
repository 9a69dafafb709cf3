use crate::error::{MetaCheckerError, Result};

use super::code::MethodRef;

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class(u16),
    String(u16),
    FieldRef { class: u16, name_and_type: u16 },
    MethodRef { class: u16, name_and_type: u16 },
    InterfaceMethodRef { class: u16, name_and_type: u16 },
    NameAndType { name: u16, descriptor: u16 },
    MethodHandle { kind: u8, reference: u16 },
    MethodType(u16),
    Dynamic { bootstrap: u16, name_and_type: u16 },
    InvokeDynamic { bootstrap: u16, name_and_type: u16 },
    Module(u16),
    Package(u16),
    /// Second slot taken by a long or double constant, and slot zero.
    Unusable,
}

/// One-based constant pool as laid out in the class file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    #[must_use]
    pub fn new(entries: Vec<Constant>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// # Errors
    /// Returns an error if the index is outside the pool.
    pub fn get(&self, index: u16) -> Result<&Constant> {
        self.entries
            .get(usize::from(index))
            .filter(|c| !matches!(c, Constant::Unusable))
            .ok_or_else(|| {
                MetaCheckerError::ClassFormat(format!("invalid constant pool index {index}"))
            })
    }

    /// # Errors
    /// Returns an error if the entry is missing or not a UTF-8 constant.
    pub fn utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Constant::Utf8(text) => Ok(text),
            other => Err(unexpected(index, "Utf8", other)),
        }
    }

    /// Internal name referenced by a `Class` constant.
    ///
    /// # Errors
    /// Returns an error if the entry is missing or not a class constant.
    pub fn class_name(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Constant::Class(name) => self.utf8(*name),
            other => Err(unexpected(index, "Class", other)),
        }
    }

    /// Resolve a method or interface method reference.
    ///
    /// # Errors
    /// Returns an error if the entry is not a method reference.
    pub fn method_ref(&self, index: u16) -> Result<MethodRef> {
        let (class, name_and_type) = match self.get(index)? {
            Constant::MethodRef {
                class,
                name_and_type,
            }
            | Constant::InterfaceMethodRef {
                class,
                name_and_type,
            } => (*class, *name_and_type),
            other => return Err(unexpected(index, "Methodref", other)),
        };
        let (name, descriptor) = match self.get(name_and_type)? {
            Constant::NameAndType { name, descriptor } => (*name, *descriptor),
            other => return Err(unexpected(name_and_type, "NameAndType", other)),
        };
        Ok(MethodRef {
            class_name: self.class_name(class)?.to_string(),
            name: self.utf8(name)?.to_string(),
            descriptor: self.utf8(descriptor)?.to_string(),
        })
    }
}

fn unexpected(index: u16, expected: &str, found: &Constant) -> MetaCheckerError {
    MetaCheckerError::ClassFormat(format!(
        "constant #{index} expected {expected}, found {found:?}"
    ))
}

/// Decode the modified UTF-8 used by class files.
#[must_use]
pub fn decode_modified_utf8(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b & 0x80 == 0 {
            units.push(u16::from(b));
            i += 1;
        } else if b & 0xE0 == 0xC0 && i + 1 < bytes.len() {
            units.push((u16::from(b & 0x1F) << 6) | u16::from(bytes[i + 1] & 0x3F));
            i += 2;
        } else if b & 0xF0 == 0xE0 && i + 2 < bytes.len() {
            units.push(
                (u16::from(b & 0x0F) << 12)
                    | (u16::from(bytes[i + 1] & 0x3F) << 6)
                    | u16::from(bytes[i + 2] & 0x3F),
            );
            i += 3;
        } else {
            units.push(0xFFFD);
            i += 1;
        }
    }
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
#[path = "constant_pool_tests.rs"]
mod tests;
