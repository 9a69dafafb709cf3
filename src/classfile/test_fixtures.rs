//! Minimal class file writer for building test fixtures.
//!
//! Uses only `std` so integration tests can include it with `#[path]`.
#![allow(dead_code)]

const INVOKEVIRTUAL: u8 = 0xb6;
const INVOKESPECIAL: u8 = 0xb7;
const INVOKESTATIC: u8 = 0xb8;
const INVOKEINTERFACE: u8 = 0xb9;
pub const RETURN: u8 = 0xb1;
pub const ARETURN: u8 = 0xb0;
pub const ALOAD_0: u8 = 0x2a;
pub const NOP: u8 = 0x00;

/// Descriptor prefix of the meta annotation package.
pub const META: &str = "Lcom/igormaznitsa/meta/annotation/";

/// `Lcom/igormaznitsa/meta/annotation/<name>;`
#[must_use]
pub fn meta(name: &str) -> String {
    format!("{META}{name};")
}

#[derive(Debug, Clone, PartialEq)]
enum PoolEntry {
    Utf8(String),
    Integer(i32),
    Long(i64),
    Class(u16),
    NameAndType(u16, u16),
    MethodRef(u16, u16),
    InterfaceMethodRef(u16, u16),
}

impl PoolEntry {
    const fn slots(&self) -> u16 {
        match self {
            Self::Long(_) => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Default)]
struct Pool {
    entries: Vec<PoolEntry>,
}

impl Pool {
    fn add(&mut self, entry: PoolEntry) -> u16 {
        let mut index = 1;
        for existing in &self.entries {
            if *existing == entry {
                return index;
            }
            index += existing.slots();
        }
        self.entries.push(entry);
        index
    }

    fn utf8(&mut self, text: &str) -> u16 {
        self.add(PoolEntry::Utf8(text.to_string()))
    }

    fn class(&mut self, internal: &str) -> u16 {
        let name = self.utf8(internal);
        self.add(PoolEntry::Class(name))
    }

    fn method_ref(&mut self, owner: &str, name: &str, descriptor: &str, interface: bool) -> u16 {
        let class = self.class(owner);
        let name = self.utf8(name);
        let descriptor = self.utf8(descriptor);
        let nat = self.add(PoolEntry::NameAndType(name, descriptor));
        if interface {
            self.add(PoolEntry::InterfaceMethodRef(class, nat))
        } else {
            self.add(PoolEntry::MethodRef(class, nat))
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        let count: u16 = 1 + self.entries.iter().map(PoolEntry::slots).sum::<u16>();
        put_u16(out, count);
        for entry in &self.entries {
            match entry {
                PoolEntry::Utf8(text) => {
                    out.push(1);
                    put_u16(out, u16::try_from(text.len()).unwrap());
                    out.extend_from_slice(text.as_bytes());
                }
                PoolEntry::Integer(v) => {
                    out.push(3);
                    out.extend_from_slice(&v.to_be_bytes());
                }
                PoolEntry::Long(v) => {
                    out.push(5);
                    out.extend_from_slice(&v.to_be_bytes());
                }
                PoolEntry::Class(name) => {
                    out.push(7);
                    put_u16(out, *name);
                }
                PoolEntry::NameAndType(name, descriptor) => {
                    out.push(12);
                    put_u16(out, *name);
                    put_u16(out, *descriptor);
                }
                PoolEntry::MethodRef(class, nat) => {
                    out.push(10);
                    put_u16(out, *class);
                    put_u16(out, *nat);
                }
                PoolEntry::InterfaceMethodRef(class, nat) => {
                    out.push(11);
                    put_u16(out, *class);
                    put_u16(out, *nat);
                }
            }
        }
    }
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_len(out: &mut Vec<u8>, len: usize) {
    put_u16(out, u16::try_from(len).unwrap());
}

fn put_attribute(out: &mut Vec<u8>, pool: &mut Pool, name: &str, body: &[u8]) {
    put_u16(out, pool.utf8(name));
    put_u32(out, u32::try_from(body.len()).unwrap());
    out.extend_from_slice(body);
}

#[derive(Debug, Clone)]
pub enum Value {
    Int(i32),
    Bool(bool),
    Long(i64),
    Str(String),
    Enum(String, String),
    Class(String),
    Nested(AnnotationSpec),
    Array(Vec<Value>),
}

impl Value {
    #[must_use]
    pub fn str(text: &str) -> Self {
        Self::Str(text.to_string())
    }

    /// Enum constant `name` of the type with descriptor `descriptor`.
    #[must_use]
    pub fn enumeration(descriptor: &str, name: &str) -> Self {
        Self::Enum(descriptor.to_string(), name.to_string())
    }

    fn write(&self, out: &mut Vec<u8>, pool: &mut Pool) {
        match self {
            Self::Int(v) => {
                out.push(b'I');
                put_u16(out, pool.add(PoolEntry::Integer(*v)));
            }
            Self::Bool(v) => {
                out.push(b'Z');
                put_u16(out, pool.add(PoolEntry::Integer(i32::from(*v))));
            }
            Self::Long(v) => {
                out.push(b'J');
                put_u16(out, pool.add(PoolEntry::Long(*v)));
            }
            Self::Str(text) => {
                out.push(b's');
                put_u16(out, pool.utf8(text));
            }
            Self::Enum(descriptor, name) => {
                out.push(b'e');
                put_u16(out, pool.utf8(descriptor));
                put_u16(out, pool.utf8(name));
            }
            Self::Class(descriptor) => {
                out.push(b'c');
                put_u16(out, pool.utf8(descriptor));
            }
            Self::Nested(annotation) => {
                out.push(b'@');
                annotation.write(out, pool);
            }
            Self::Array(values) => {
                out.push(b'[');
                put_len(out, values.len());
                for value in values {
                    value.write(out, pool);
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnnotationSpec {
    descriptor: String,
    elements: Vec<(String, Value)>,
    visible: bool,
}

impl AnnotationSpec {
    #[must_use]
    pub fn new(descriptor: &str) -> Self {
        Self {
            descriptor: descriptor.to_string(),
            elements: Vec::new(),
            visible: false,
        }
    }

    /// Annotation from the meta package, e.g. `AnnotationSpec::meta("Weight")`.
    #[must_use]
    pub fn meta(name: &str) -> Self {
        Self::new(&meta(name))
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.elements.push((name.to_string(), value));
        self
    }

    #[must_use]
    pub fn value(self, text: &str) -> Self {
        self.with("value", Value::str(text))
    }

    /// Store in the runtime visible attribute instead of the invisible one.
    #[must_use]
    pub const fn visible(mut self) -> Self {
        self.visible = true;
        self
    }

    fn write(&self, out: &mut Vec<u8>, pool: &mut Pool) {
        put_u16(out, pool.utf8(&self.descriptor));
        put_len(out, self.elements.len());
        for (name, value) in &self.elements {
            put_u16(out, pool.utf8(name));
            value.write(out, pool);
        }
    }
}

fn write_annotations(out: &mut Vec<u8>, pool: &mut Pool, annotations: &[AnnotationSpec]) -> u16 {
    let mut written = 0;
    for (visible, attr) in [
        (true, "RuntimeVisibleAnnotations"),
        (false, "RuntimeInvisibleAnnotations"),
    ] {
        let selected: Vec<&AnnotationSpec> =
            annotations.iter().filter(|a| a.visible == visible).collect();
        if selected.is_empty() {
            continue;
        }
        let mut body = Vec::new();
        put_len(&mut body, selected.len());
        for annotation in selected {
            annotation.write(&mut body, pool);
        }
        put_attribute(out, pool, attr, &body);
        written += 1;
    }
    written
}

fn write_parameter_annotations(
    out: &mut Vec<u8>,
    pool: &mut Pool,
    attr: &str,
    groups: &[Vec<AnnotationSpec>],
) -> u16 {
    if groups.is_empty() {
        return 0;
    }
    let mut body = vec![u8::try_from(groups.len()).unwrap()];
    for group in groups {
        put_len(&mut body, group.len());
        for annotation in group {
            annotation.write(&mut body, pool);
        }
    }
    put_attribute(out, pool, attr, &body);
    1
}

#[derive(Debug, Clone)]
enum Op {
    Raw(u8),
    Invoke {
        opcode: u8,
        owner: String,
        name: String,
        descriptor: String,
    },
}

impl Op {
    const fn size(&self) -> u16 {
        match self {
            Self::Raw(_) => 1,
            Self::Invoke { opcode, .. } if *opcode == INVOKEINTERFACE => 5,
            Self::Invoke { .. } => 3,
        }
    }
}

/// Bytecode body with optional line numbers and local variable names.
#[derive(Debug, Clone, Default)]
pub struct CodeSpec {
    ops: Vec<Op>,
    pc: u16,
    lines: Vec<(u16, u16)>,
    locals: Vec<(String, String, u16)>,
}

impl CodeSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new source line at the current bytecode offset.
    #[must_use]
    pub fn line(mut self, line: u16) -> Self {
        self.lines.push((self.pc, line));
        self
    }

    #[must_use]
    pub fn op(self, opcode: u8) -> Self {
        self.push(Op::Raw(opcode))
    }

    #[must_use]
    pub fn invoke_virtual(self, owner: &str, name: &str, descriptor: &str) -> Self {
        self.invoke(INVOKEVIRTUAL, owner, name, descriptor)
    }

    #[must_use]
    pub fn invoke_special(self, owner: &str, name: &str, descriptor: &str) -> Self {
        self.invoke(INVOKESPECIAL, owner, name, descriptor)
    }

    #[must_use]
    pub fn invoke_static(self, owner: &str, name: &str, descriptor: &str) -> Self {
        self.invoke(INVOKESTATIC, owner, name, descriptor)
    }

    #[must_use]
    pub fn invoke_interface(self, owner: &str, name: &str, descriptor: &str) -> Self {
        self.invoke(INVOKEINTERFACE, owner, name, descriptor)
    }

    #[must_use]
    pub fn local(mut self, name: &str, descriptor: &str, slot: u16) -> Self {
        self.locals
            .push((name.to_string(), descriptor.to_string(), slot));
        self
    }

    fn invoke(self, opcode: u8, owner: &str, name: &str, descriptor: &str) -> Self {
        self.push(Op::Invoke {
            opcode,
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        })
    }

    fn push(mut self, op: Op) -> Self {
        self.pc += op.size();
        self.ops.push(op);
        self
    }

    fn write(&self, out: &mut Vec<u8>, pool: &mut Pool) {
        let mut bytecode = Vec::new();
        for op in &self.ops {
            match op {
                Op::Raw(opcode) => bytecode.push(*opcode),
                Op::Invoke {
                    opcode,
                    owner,
                    name,
                    descriptor,
                } => {
                    let interface = *opcode == INVOKEINTERFACE;
                    bytecode.push(*opcode);
                    put_u16(
                        &mut bytecode,
                        pool.method_ref(owner, name, descriptor, interface),
                    );
                    if interface {
                        bytecode.extend_from_slice(&[1, 0]);
                    }
                }
            }
        }

        let mut body = Vec::new();
        put_u16(&mut body, 8);
        put_u16(&mut body, 8);
        put_u32(&mut body, u32::try_from(bytecode.len()).unwrap());
        body.extend_from_slice(&bytecode);
        put_u16(&mut body, 0);

        let mut attributes = Vec::new();
        let mut attribute_count = 0u16;
        if !self.lines.is_empty() {
            let mut table = Vec::new();
            put_len(&mut table, self.lines.len());
            for (pc, line) in &self.lines {
                put_u16(&mut table, *pc);
                put_u16(&mut table, *line);
            }
            put_attribute(&mut attributes, pool, "LineNumberTable", &table);
            attribute_count += 1;
        }
        if !self.locals.is_empty() {
            let mut table = Vec::new();
            put_len(&mut table, self.locals.len());
            for (name, descriptor, slot) in &self.locals {
                put_u16(&mut table, 0);
                put_u16(&mut table, self.pc);
                put_u16(&mut table, pool.utf8(name));
                put_u16(&mut table, pool.utf8(descriptor));
                put_u16(&mut table, *slot);
            }
            put_attribute(&mut attributes, pool, "LocalVariableTable", &table);
            attribute_count += 1;
        }
        put_u16(&mut body, attribute_count);
        body.extend_from_slice(&attributes);

        put_attribute(out, pool, "Code", &body);
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    access: u16,
    name: String,
    descriptor: String,
    annotations: Vec<AnnotationSpec>,
}

impl FieldSpec {
    #[must_use]
    pub fn new(name: &str, descriptor: &str) -> Self {
        Self {
            access: 0x0002,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            annotations: Vec::new(),
        }
    }

    #[must_use]
    pub fn annotated(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    fn write(&self, out: &mut Vec<u8>, pool: &mut Pool) {
        put_u16(out, self.access);
        put_u16(out, pool.utf8(&self.name));
        put_u16(out, pool.utf8(&self.descriptor));
        let mut attributes = Vec::new();
        let count = write_annotations(&mut attributes, pool, &self.annotations);
        put_u16(out, count);
        out.extend_from_slice(&attributes);
    }
}

#[derive(Debug, Clone)]
pub struct MethodSpec {
    access: u16,
    name: String,
    descriptor: String,
    annotations: Vec<AnnotationSpec>,
    parameters: Vec<Vec<AnnotationSpec>>,
    visible_parameters: Vec<Vec<AnnotationSpec>>,
    code: Option<CodeSpec>,
}

impl MethodSpec {
    #[must_use]
    pub fn new(name: &str, descriptor: &str) -> Self {
        Self {
            access: 0x0001,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            annotations: Vec::new(),
            parameters: Vec::new(),
            visible_parameters: Vec::new(),
            code: None,
        }
    }

    #[must_use]
    pub const fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    #[must_use]
    pub fn annotated(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Invisible parameter annotation groups, one per parameter.
    #[must_use]
    pub fn parameters(mut self, groups: Vec<Vec<AnnotationSpec>>) -> Self {
        self.parameters = groups;
        self
    }

    #[must_use]
    pub fn visible_parameters(mut self, groups: Vec<Vec<AnnotationSpec>>) -> Self {
        self.visible_parameters = groups;
        self
    }

    #[must_use]
    pub fn code(mut self, code: CodeSpec) -> Self {
        self.code = Some(code);
        self
    }

    fn write(&self, out: &mut Vec<u8>, pool: &mut Pool) {
        put_u16(out, self.access);
        put_u16(out, pool.utf8(&self.name));
        put_u16(out, pool.utf8(&self.descriptor));
        let mut attributes = Vec::new();
        let mut count = write_annotations(&mut attributes, pool, &self.annotations);
        count += write_parameter_annotations(
            &mut attributes,
            pool,
            "RuntimeVisibleParameterAnnotations",
            &self.visible_parameters,
        );
        count += write_parameter_annotations(
            &mut attributes,
            pool,
            "RuntimeInvisibleParameterAnnotations",
            &self.parameters,
        );
        if let Some(code) = &self.code {
            code.write(&mut attributes, pool);
            count += 1;
        }
        put_u16(out, count);
        out.extend_from_slice(&attributes);
    }
}

/// Builds the bytes of a class file.
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    name: String,
    major: u16,
    access: u16,
    super_class: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<FieldSpec>,
    methods: Vec<MethodSpec>,
    annotations: Vec<AnnotationSpec>,
    inner_classes: Vec<(String, Option<String>, u16)>,
}

impl ClassBuilder {
    /// Public class with internal name `name`, Java 8 format, extending `Object`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            major: 52,
            access: 0x0021,
            super_class: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
            inner_classes: Vec::new(),
        }
    }

    #[must_use]
    pub const fn major(mut self, major: u16) -> Self {
        self.major = major;
        self
    }

    #[must_use]
    pub const fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    #[must_use]
    pub fn super_class(mut self, name: Option<&str>) -> Self {
        self.super_class = name.map(str::to_string);
        self
    }

    #[must_use]
    pub fn interface(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    #[must_use]
    pub fn annotated(mut self, annotation: AnnotationSpec) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    /// Add an `InnerClasses` entry.
    #[must_use]
    pub fn inner_class(mut self, inner: &str, outer: Option<&str>, access: u16) -> Self {
        self.inner_classes
            .push((inner.to_string(), outer.map(str::to_string), access));
        self
    }

    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let mut pool = Pool::default();
        let mut body = Vec::new();

        put_u16(&mut body, self.access);
        let this_class = pool.class(&self.name);
        put_u16(&mut body, this_class);
        let super_class = self.super_class.as_deref().map_or(0, |s| pool.class(s));
        put_u16(&mut body, super_class);
        put_len(&mut body, self.interfaces.len());
        for interface in &self.interfaces {
            let index = pool.class(interface);
            put_u16(&mut body, index);
        }
        put_len(&mut body, self.fields.len());
        for field in &self.fields {
            field.write(&mut body, &mut pool);
        }
        put_len(&mut body, self.methods.len());
        for method in &self.methods {
            method.write(&mut body, &mut pool);
        }

        let mut attributes = Vec::new();
        let mut count = write_annotations(&mut attributes, &mut pool, &self.annotations);
        if !self.inner_classes.is_empty() {
            let mut table = Vec::new();
            put_len(&mut table, self.inner_classes.len());
            for (inner, outer, access) in &self.inner_classes {
                let inner_index = pool.class(inner);
                put_u16(&mut table, inner_index);
                let outer_index = outer.as_deref().map_or(0, |o| pool.class(o));
                put_u16(&mut table, outer_index);
                put_u16(&mut table, 0);
                put_u16(&mut table, *access);
            }
            put_attribute(&mut attributes, &mut pool, "InnerClasses", &table);
            count += 1;
        }
        put_u16(&mut body, count);
        body.extend_from_slice(&attributes);

        let mut out = Vec::new();
        put_u32(&mut out, 0xCAFE_BABE);
        put_u16(&mut out, 0);
        put_u16(&mut out, self.major);
        pool.write(&mut out);
        out.extend_from_slice(&body);
        out
    }
}
