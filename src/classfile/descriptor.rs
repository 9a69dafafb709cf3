use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::{MetaCheckerError, Result};

/// A JVM field type as written in descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JvmType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
    Void,
    /// Internal class name, e.g. `java/lang/String`.
    Object(String),
    Array(Box<JvmType>),
}

impl JvmType {
    /// Parse a complete field descriptor such as `[Ljava/lang/String;`.
    ///
    /// # Errors
    /// Returns an error if the descriptor is malformed or has trailing data.
    pub fn parse(descriptor: &str) -> Result<Self> {
        let mut chars = descriptor.chars().peekable();
        let parsed = Self::parse_next(&mut chars, descriptor)?;
        if chars.next().is_some() {
            return Err(bad_descriptor(descriptor));
        }
        Ok(parsed)
    }

    fn parse_next(chars: &mut Peekable<Chars<'_>>, source: &str) -> Result<Self> {
        let parsed = match chars.next() {
            Some('B') => Self::Byte,
            Some('C') => Self::Char,
            Some('D') => Self::Double,
            Some('F') => Self::Float,
            Some('I') => Self::Int,
            Some('J') => Self::Long,
            Some('S') => Self::Short,
            Some('Z') => Self::Boolean,
            Some('V') => Self::Void,
            Some('L') => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some(';') => break,
                        Some(c) => name.push(c),
                        None => return Err(bad_descriptor(source)),
                    }
                }
                if name.is_empty() {
                    return Err(bad_descriptor(source));
                }
                Self::Object(name)
            }
            Some('[') => Self::Array(Box::new(Self::parse_next(chars, source)?)),
            _ => return Err(bad_descriptor(source)),
        };
        Ok(parsed)
    }

    /// Descriptor form, inverse of [`JvmType::parse`].
    #[must_use]
    pub fn signature(&self) -> String {
        match self {
            Self::Byte => "B".to_string(),
            Self::Char => "C".to_string(),
            Self::Double => "D".to_string(),
            Self::Float => "F".to_string(),
            Self::Int => "I".to_string(),
            Self::Long => "J".to_string(),
            Self::Short => "S".to_string(),
            Self::Boolean => "Z".to_string(),
            Self::Void => "V".to_string(),
            Self::Object(name) => format!("L{name};"),
            Self::Array(element) => format!("[{}", element.signature()),
        }
    }

    /// True for class types and arrays of class types (descriptor ends with `;`).
    #[must_use]
    pub fn is_object_type(&self) -> bool {
        match self {
            Self::Object(_) => true,
            Self::Array(element) => element.is_object_type(),
            _ => false,
        }
    }

    /// True for any reference type, i.e. anything that can hold `null`.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Array(_))
    }

    #[must_use]
    pub const fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    #[must_use]
    pub const fn slot_size(&self) -> usize {
        match self {
            Self::Long | Self::Double => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for JvmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte => f.write_str("byte"),
            Self::Char => f.write_str("char"),
            Self::Double => f.write_str("double"),
            Self::Float => f.write_str("float"),
            Self::Int => f.write_str("int"),
            Self::Long => f.write_str("long"),
            Self::Short => f.write_str("short"),
            Self::Boolean => f.write_str("boolean"),
            Self::Void => f.write_str("void"),
            Self::Object(name) => f.write_str(&internal_to_canonical(name)),
            Self::Array(element) => write!(f, "{element}[]"),
        }
    }
}

/// Parameter and return types of a method descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub parameters: Vec<JvmType>,
    pub return_type: JvmType,
}

impl MethodDescriptor {
    /// Parse a method descriptor such as `(I[Ljava/lang/String;)V`.
    ///
    /// # Errors
    /// Returns an error if the descriptor is malformed.
    pub fn parse(descriptor: &str) -> Result<Self> {
        let mut chars = descriptor.chars().peekable();
        if chars.next() != Some('(') {
            return Err(bad_descriptor(descriptor));
        }
        let mut parameters = Vec::new();
        loop {
            match chars.peek() {
                Some(')') => {
                    chars.next();
                    break;
                }
                Some(_) => parameters.push(JvmType::parse_next(&mut chars, descriptor)?),
                None => return Err(bad_descriptor(descriptor)),
            }
        }
        let return_type = JvmType::parse_next(&mut chars, descriptor)?;
        if chars.next().is_some() {
            return Err(bad_descriptor(descriptor));
        }
        Ok(Self {
            parameters,
            return_type,
        })
    }
}

/// `com/example/Outer$Inner` -> `com.example.Outer$Inner`.
#[must_use]
pub fn internal_to_canonical(internal: &str) -> String {
    internal.replace('/', ".")
}

/// `Lcom/example/Weight;` -> `com.example.Weight`; other text is returned as is.
#[must_use]
pub fn signature_to_canonical(signature: &str) -> String {
    signature
        .strip_prefix('L')
        .and_then(|s| s.strip_suffix(';'))
        .map_or_else(|| signature.to_string(), internal_to_canonical)
}

fn bad_descriptor(descriptor: &str) -> MetaCheckerError {
    MetaCheckerError::ClassFormat(format!("invalid descriptor '{descriptor}'"))
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
