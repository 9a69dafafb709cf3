use std::io::Cursor;
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{MetaCheckerError, Result};

use super::code::{Code, LineNumber, LocalVariable, decode_instructions};
use super::constant_pool::{Constant, ConstantPool, decode_modified_utf8};
use super::descriptor::{JvmType, MethodDescriptor};
use super::{Annotation, ClassFile, ElementValue, FieldInfo, MethodInfo};

const MAGIC: u32 = 0xCAFE_BABE;

/// Read and parse a class file from disk.
///
/// # Errors
/// Returns `FileRead` if the file cannot be read and `ClassFormat` if it is
/// not a well-formed class file.
pub fn parse_class_file(path: &Path) -> Result<ClassFile> {
    let bytes = std::fs::read(path).map_err(|source| MetaCheckerError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_class(&bytes)
}

/// Read only the `(minor, major)` version header.
///
/// # Errors
/// Returns an error if the magic number is wrong or the data is too short.
pub fn read_version(bytes: &[u8]) -> Result<(u16, u16)> {
    let mut reader = ClassReader::new(bytes);
    reader.magic()?;
    let minor = reader.u16()?;
    let major = reader.u16()?;
    Ok((minor, major))
}

/// Parse class file bytes into a [`ClassFile`].
///
/// # Errors
/// Returns `ClassFormat` for any structural problem in the data.
pub fn parse_class(bytes: &[u8]) -> Result<ClassFile> {
    let mut reader = ClassReader::new(bytes);
    reader.magic()?;
    let minor_version = reader.u16()?;
    let major_version = reader.u16()?;
    let constant_pool = reader.constant_pool()?;

    let access_flags = reader.u16()?;
    let this_index = reader.u16()?;
    let this_class = constant_pool.class_name(this_index)?.to_string();
    let super_index = reader.u16()?;
    let super_class = if super_index == 0 {
        None
    } else {
        Some(constant_pool.class_name(super_index)?.to_string())
    };

    let interface_count = reader.u16()?;
    let mut interfaces = Vec::with_capacity(usize::from(interface_count));
    for _ in 0..interface_count {
        let index = reader.u16()?;
        interfaces.push(constant_pool.class_name(index)?.to_string());
    }

    let field_count = reader.u16()?;
    let mut fields = Vec::with_capacity(usize::from(field_count));
    for _ in 0..field_count {
        fields.push(reader.field(&constant_pool)?);
    }

    let method_count = reader.u16()?;
    let mut methods = Vec::with_capacity(usize::from(method_count));
    for _ in 0..method_count {
        methods.push(reader.method(&constant_pool)?);
    }

    let mut annotations = Vec::new();
    let mut nested_access_flags = None;
    let attribute_count = reader.u16()?;
    for _ in 0..attribute_count {
        let (name, data) = reader.attribute(&constant_pool)?;
        let mut sub = ClassReader::new(data);
        match name {
            "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
                annotations.extend(sub.annotations(&constant_pool)?);
            }
            "InnerClasses" => {
                nested_access_flags = sub.own_inner_class_flags(&constant_pool, this_index)?;
            }
            _ => {}
        }
    }

    Ok(ClassFile {
        minor_version,
        major_version,
        access_flags,
        this_class,
        super_class,
        interfaces,
        fields,
        methods,
        annotations,
        nested_access_flags,
        constant_pool,
    })
}

struct ClassReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ClassReader<'a> {
    const fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    fn magic(&mut self) -> Result<()> {
        let magic = self.u32()?;
        if magic != MAGIC {
            return Err(MetaCheckerError::ClassFormat(format!(
                "bad magic number 0x{magic:08X}"
            )));
        }
        Ok(())
    }

    fn u8(&mut self) -> Result<u8> {
        self.cursor.read_u8().map_err(eof)
    }

    fn u16(&mut self) -> Result<u16> {
        self.cursor.read_u16::<BigEndian>().map_err(eof)
    }

    fn u32(&mut self) -> Result<u32> {
        self.cursor.read_u32::<BigEndian>().map_err(eof)
    }

    fn i32(&mut self) -> Result<i32> {
        self.cursor.read_i32::<BigEndian>().map_err(eof)
    }

    fn i64(&mut self) -> Result<i64> {
        self.cursor.read_i64::<BigEndian>().map_err(eof)
    }

    fn f32(&mut self) -> Result<f32> {
        self.cursor.read_f32::<BigEndian>().map_err(eof)
    }

    fn f64(&mut self) -> Result<f64> {
        self.cursor.read_f64::<BigEndian>().map_err(eof)
    }

    fn bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let data: &'a [u8] = *self.cursor.get_ref();
        let start = usize::try_from(self.cursor.position()).map_err(|_| eof_error())?;
        let end = start.checked_add(length).ok_or_else(eof_error)?;
        let slice = data.get(start..end).ok_or_else(eof_error)?;
        self.cursor
            .set_position(u64::try_from(end).map_err(|_| eof_error())?);
        Ok(slice)
    }

    fn skip(&mut self, length: usize) -> Result<()> {
        self.bytes(length).map(|_| ())
    }

    fn constant_pool(&mut self) -> Result<ConstantPool> {
        let count = self.u16()?;
        let mut entries = Vec::with_capacity(usize::from(count));
        entries.push(Constant::Unusable);
        while entries.len() < usize::from(count) {
            let tag = self.u8()?;
            let constant = match tag {
                1 => {
                    let length = usize::from(self.u16()?);
                    Constant::Utf8(decode_modified_utf8(self.bytes(length)?))
                }
                3 => Constant::Integer(self.i32()?),
                4 => Constant::Float(self.f32()?),
                5 => Constant::Long(self.i64()?),
                6 => Constant::Double(self.f64()?),
                7 => Constant::Class(self.u16()?),
                8 => Constant::String(self.u16()?),
                9 => Constant::FieldRef {
                    class: self.u16()?,
                    name_and_type: self.u16()?,
                },
                10 => Constant::MethodRef {
                    class: self.u16()?,
                    name_and_type: self.u16()?,
                },
                11 => Constant::InterfaceMethodRef {
                    class: self.u16()?,
                    name_and_type: self.u16()?,
                },
                12 => Constant::NameAndType {
                    name: self.u16()?,
                    descriptor: self.u16()?,
                },
                15 => Constant::MethodHandle {
                    kind: self.u8()?,
                    reference: self.u16()?,
                },
                16 => Constant::MethodType(self.u16()?),
                17 => Constant::Dynamic {
                    bootstrap: self.u16()?,
                    name_and_type: self.u16()?,
                },
                18 => Constant::InvokeDynamic {
                    bootstrap: self.u16()?,
                    name_and_type: self.u16()?,
                },
                19 => Constant::Module(self.u16()?),
                20 => Constant::Package(self.u16()?),
                other => {
                    return Err(MetaCheckerError::ClassFormat(format!(
                        "unknown constant pool tag {other}"
                    )));
                }
            };
            let wide = matches!(constant, Constant::Long(_) | Constant::Double(_));
            entries.push(constant);
            if wide {
                entries.push(Constant::Unusable);
            }
        }
        Ok(ConstantPool::new(entries))
    }

    fn attribute<'p>(&mut self, pool: &'p ConstantPool) -> Result<(&'p str, &'a [u8])> {
        let name = pool.utf8(self.u16()?)?;
        let length = usize::try_from(self.u32()?).map_err(|_| eof_error())?;
        Ok((name, self.bytes(length)?))
    }

    fn field(&mut self, pool: &ConstantPool) -> Result<FieldInfo> {
        let access_flags = self.u16()?;
        let name = pool.utf8(self.u16()?)?.to_string();
        let descriptor = pool.utf8(self.u16()?)?.to_string();
        let field_type = JvmType::parse(&descriptor)?;
        let mut annotations = Vec::new();
        let attribute_count = self.u16()?;
        for _ in 0..attribute_count {
            let (attr, data) = self.attribute(pool)?;
            if matches!(
                attr,
                "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations"
            ) {
                annotations.extend(ClassReader::new(data).annotations(pool)?);
            }
        }
        Ok(FieldInfo {
            access_flags,
            name,
            descriptor,
            field_type,
            annotations,
        })
    }

    fn method(&mut self, pool: &ConstantPool) -> Result<MethodInfo> {
        let access_flags = self.u16()?;
        let name = pool.utf8(self.u16()?)?.to_string();
        let descriptor = pool.utf8(self.u16()?)?.to_string();
        let signature = MethodDescriptor::parse(&descriptor)?;
        let mut annotations = Vec::new();
        let mut visible_parameters = Vec::new();
        let mut invisible_parameters = Vec::new();
        let mut code = None;

        let attribute_count = self.u16()?;
        for _ in 0..attribute_count {
            let (attr, data) = self.attribute(pool)?;
            let mut sub = ClassReader::new(data);
            match attr {
                "RuntimeVisibleAnnotations" | "RuntimeInvisibleAnnotations" => {
                    annotations.extend(sub.annotations(pool)?);
                }
                "RuntimeVisibleParameterAnnotations" => {
                    visible_parameters = sub.parameter_annotations(pool)?;
                }
                "RuntimeInvisibleParameterAnnotations" => {
                    invisible_parameters = sub.parameter_annotations(pool)?;
                }
                "Code" => code = Some(sub.code(pool)?),
                _ => {}
            }
        }

        let mut parameter_annotations = visible_parameters;
        parameter_annotations.extend(invisible_parameters);

        Ok(MethodInfo {
            access_flags,
            name,
            descriptor,
            signature,
            annotations,
            parameter_annotations,
            code,
        })
    }

    fn code(&mut self, pool: &ConstantPool) -> Result<Code> {
        let _max_stack = self.u16()?;
        let _max_locals = self.u16()?;
        let code_length = usize::try_from(self.u32()?).map_err(|_| eof_error())?;
        let bytecode = self.bytes(code_length)?;
        let instructions = decode_instructions(bytecode, pool)?;

        let exception_count = usize::from(self.u16()?);
        self.skip(exception_count * 8)?;

        let mut line_numbers = Vec::new();
        let mut local_variables = Vec::new();
        let attribute_count = self.u16()?;
        for _ in 0..attribute_count {
            let (attr, data) = self.attribute(pool)?;
            let mut sub = ClassReader::new(data);
            match attr {
                "LineNumberTable" => {
                    let count = sub.u16()?;
                    for _ in 0..count {
                        line_numbers.push(LineNumber {
                            start_pc: u32::from(sub.u16()?),
                            line: u32::from(sub.u16()?),
                        });
                    }
                }
                "LocalVariableTable" => {
                    let count = sub.u16()?;
                    for _ in 0..count {
                        local_variables.push(LocalVariable {
                            start_pc: u32::from(sub.u16()?),
                            length: u32::from(sub.u16()?),
                            name: pool.utf8(sub.u16()?)?.to_string(),
                            descriptor: pool.utf8(sub.u16()?)?.to_string(),
                            index: sub.u16()?,
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(Code {
            instructions,
            line_numbers,
            local_variables,
        })
    }

    fn own_inner_class_flags(&mut self, pool: &ConstantPool, this_index: u16) -> Result<Option<u16>> {
        let this_name = pool.class_name(this_index)?;
        let count = self.u16()?;
        let mut flags = None;
        for _ in 0..count {
            let inner = self.u16()?;
            let _outer = self.u16()?;
            let _name = self.u16()?;
            let access = self.u16()?;
            if inner != 0 && pool.class_name(inner)? == this_name {
                flags = Some(access);
            }
        }
        Ok(flags)
    }

    fn annotations(&mut self, pool: &ConstantPool) -> Result<Vec<Annotation>> {
        let count = self.u16()?;
        (0..count).map(|_| self.annotation(pool)).collect()
    }

    fn parameter_annotations(&mut self, pool: &ConstantPool) -> Result<Vec<Vec<Annotation>>> {
        let count = self.u8()?;
        (0..count).map(|_| self.annotations(pool)).collect()
    }

    fn annotation(&mut self, pool: &ConstantPool) -> Result<Annotation> {
        let type_descriptor = pool.utf8(self.u16()?)?.to_string();
        let pair_count = self.u16()?;
        let mut elements = Vec::with_capacity(usize::from(pair_count));
        for _ in 0..pair_count {
            let name = pool.utf8(self.u16()?)?.to_string();
            elements.push((name, self.element_value(pool)?));
        }
        Ok(Annotation {
            type_descriptor,
            elements,
        })
    }

    fn element_value(&mut self, pool: &ConstantPool) -> Result<ElementValue> {
        let tag = self.u8()?;
        let value = match tag {
            b'B' | b'S' | b'I' | b'C' | b'Z' => {
                let Constant::Integer(v) = pool.get(self.u16()?)? else {
                    return Err(bad_element(tag));
                };
                match tag {
                    b'B' => ElementValue::Byte(*v),
                    b'S' => ElementValue::Short(*v),
                    b'C' => ElementValue::Char(
                        u32::try_from(*v)
                            .ok()
                            .and_then(char::from_u32)
                            .unwrap_or(char::REPLACEMENT_CHARACTER),
                    ),
                    b'Z' => ElementValue::Boolean(*v != 0),
                    _ => ElementValue::Int(*v),
                }
            }
            b'J' => match pool.get(self.u16()?)? {
                Constant::Long(v) => ElementValue::Long(*v),
                _ => return Err(bad_element(tag)),
            },
            b'F' => match pool.get(self.u16()?)? {
                Constant::Float(v) => ElementValue::Float(*v),
                _ => return Err(bad_element(tag)),
            },
            b'D' => match pool.get(self.u16()?)? {
                Constant::Double(v) => ElementValue::Double(*v),
                _ => return Err(bad_element(tag)),
            },
            b's' => ElementValue::String(pool.utf8(self.u16()?)?.to_string()),
            b'e' => ElementValue::Enum {
                type_descriptor: pool.utf8(self.u16()?)?.to_string(),
                const_name: pool.utf8(self.u16()?)?.to_string(),
            },
            b'c' => ElementValue::Class(pool.utf8(self.u16()?)?.to_string()),
            b'@' => ElementValue::Annotation(self.annotation(pool)?),
            b'[' => {
                let count = self.u16()?;
                let values: Result<Vec<_>> = (0..count).map(|_| self.element_value(pool)).collect();
                ElementValue::Array(values?)
            }
            _ => return Err(bad_element(tag)),
        };
        Ok(value)
    }
}

fn bad_element(tag: u8) -> MetaCheckerError {
    MetaCheckerError::ClassFormat(format!(
        "invalid annotation element value with tag '{}'",
        char::from(tag)
    ))
}

fn eof(_: std::io::Error) -> MetaCheckerError {
    eof_error()
}

fn eof_error() -> MetaCheckerError {
    MetaCheckerError::ClassFormat("unexpected end of class data".to_string())
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
