//! Structured view over a compiled class file.
//!
//! Only the parts needed by the annotation checks are decoded: header,
//! constant pool, members, annotations, parameter annotations, bytecode with
//! resolved invoke targets, line numbers and local variable names.

mod code;
mod constant_pool;
mod descriptor;
mod parser;
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use code::{Code, Instruction, InvokeKind, LineNumber, LocalVariable, MethodRef};
pub use constant_pool::{Constant, ConstantPool};
pub use descriptor::{JvmType, MethodDescriptor, internal_to_canonical, signature_to_canonical};
pub use parser::{parse_class, parse_class_file, read_version};

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_BRIDGE: u16 = 0x0040;
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;

pub const CONSTRUCTOR_NAME: &str = "<init>";
pub const STATIC_INIT_NAME: &str = "<clinit>";

/// A single annotation entry as stored in the class file.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Field descriptor of the annotation type, e.g. `Lcom/example/Weight;`.
    pub type_descriptor: String,
    pub elements: Vec<(String, ElementValue)>,
}

impl Annotation {
    #[must_use]
    pub fn new(type_descriptor: &str) -> Self {
        Self {
            type_descriptor: type_descriptor.to_string(),
            elements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_element(mut self, name: &str, value: ElementValue) -> Self {
        self.elements.push((name.to_string(), value));
        self
    }

    /// Canonical dotted name of the annotation type.
    #[must_use]
    pub fn type_name(&self) -> String {
        signature_to_canonical(&self.type_descriptor)
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<&ElementValue> {
        self.elements
            .iter()
            .find(|(element, _)| element == name)
            .map(|(_, value)| value)
    }

    /// Stringified element value, or `default` when the element is absent.
    #[must_use]
    pub fn string_value(&self, name: &str, default: &str) -> String {
        self.value(name)
            .map_or_else(|| default.to_string(), ElementValue::stringify)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Byte(i32),
    Char(char),
    Double(f64),
    Float(f32),
    Int(i32),
    Long(i64),
    Short(i32),
    Boolean(bool),
    String(String),
    Enum {
        type_descriptor: String,
        const_name: String,
    },
    Class(String),
    Annotation(Annotation),
    Array(Vec<ElementValue>),
}

impl ElementValue {
    /// Text form of the value; enum constants render as their constant name.
    #[must_use]
    pub fn stringify(&self) -> String {
        match self {
            Self::Byte(v) | Self::Int(v) | Self::Short(v) => v.to_string(),
            Self::Char(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Long(v) => v.to_string(),
            Self::Boolean(v) => v.to_string(),
            Self::String(v) | Self::Class(v) => v.clone(),
            Self::Enum { const_name, .. } => const_name.clone(),
            Self::Annotation(annotation) => format!("@{}", annotation.type_name()),
            Self::Array(values) => {
                let items: Vec<String> = values.iter().map(Self::stringify).collect();
                format!("[{}]", items.join(","))
            }
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub field_type: JvmType,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: MethodDescriptor,
    pub annotations: Vec<Annotation>,
    /// Per-parameter annotation groups, visible groups first and invisible
    /// groups appended after them.
    pub parameter_annotations: Vec<Vec<Annotation>>,
    pub code: Option<Code>,
}

impl MethodInfo {
    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.access_flags & ACC_STATIC != 0
    }

    #[must_use]
    pub const fn is_bridge_or_synthetic(&self) -> bool {
        self.access_flags & (ACC_BRIDGE | ACC_SYNTHETIC) != 0
    }

    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }

    #[must_use]
    pub fn is_static_init(&self) -> bool {
        self.name == STATIC_INIT_NAME
    }

    #[must_use]
    pub fn argument_types(&self) -> &[JvmType] {
        &self.signature.parameters
    }

    #[must_use]
    pub const fn return_type(&self) -> &JvmType {
        &self.signature.return_type
    }

    /// First source line of the method body, if line numbers were compiled in.
    #[must_use]
    pub fn first_line(&self) -> Option<u32> {
        self.code.as_ref().and_then(Code::first_line)
    }

    /// Name of the local variable holding argument `index`, when debug info exists.
    #[must_use]
    pub fn argument_name(&self, index: usize) -> Option<&str> {
        let code = self.code.as_ref()?;
        let mut slot = usize::from(!self.is_static());
        for arg in self.argument_types().iter().take(index) {
            slot += arg.slot_size();
        }
        code.local_variable_name(slot)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub access_flags: u16,
    /// Internal name, e.g. `com/example/Outer$Inner`.
    pub this_class: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub annotations: Vec<Annotation>,
    /// Access flags of this class taken from its own `InnerClasses` entry.
    pub nested_access_flags: Option<u16>,
    pub constant_pool: ConstantPool,
}

impl ClassFile {
    /// Dotted class name, e.g. `com.example.Outer$Inner`.
    #[must_use]
    pub fn class_name(&self) -> String {
        internal_to_canonical(&self.this_class)
    }

    /// Name shown for constructors: the name after the package, or its last
    /// nested segment with the `$` kept (`Outer$Inner` gives `$Inner`).
    #[must_use]
    pub fn constructor_name(&self) -> &str {
        let tail = self
            .this_class
            .rsplit('/')
            .next()
            .unwrap_or(&self.this_class);
        tail.rfind('$').map_or(tail, |index| &tail[index..])
    }

    /// Internal name of the enclosing class for nested classes, else empty.
    #[must_use]
    pub fn outer_class_name(&self) -> &str {
        self.this_class
            .rfind('$')
            .map_or("", |index| &self.this_class[..index])
    }

    #[must_use]
    pub const fn is_annotation(&self) -> bool {
        self.access_flags & ACC_ANNOTATION != 0
    }

    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        self.access_flags & ACC_SYNTHETIC != 0
    }

    #[must_use]
    pub const fn is_enum(&self) -> bool {
        self.access_flags & ACC_ENUM != 0
    }

    #[must_use]
    pub const fn is_nested(&self) -> bool {
        self.nested_access_flags.is_some()
    }

    #[must_use]
    pub const fn is_static_nested(&self) -> bool {
        match self.nested_access_flags {
            Some(flags) => flags & ACC_STATIC != 0,
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
