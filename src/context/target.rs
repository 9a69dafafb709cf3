use std::fmt::Write as _;

use crate::classfile::{ClassFile, FieldInfo, MethodInfo};

/// Program construct an annotation is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Type,
    Field,
    Method,
    Constructor,
    Parameter,
}

impl ElementKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Field => "field",
            Self::Method => "method",
            Self::Constructor => "constructor",
            Self::Parameter => "parameter",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    Class,
    Field(&'a FieldInfo),
    Method(&'a MethodInfo),
}

/// The element under inspection together with its position.
///
/// `index` is the class position in the run for type targets, the field or
/// method position for members, and the argument position for parameters.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub class: &'a ClassFile,
    pub member: Member<'a>,
    pub kind: ElementKind,
    pub index: usize,
}

impl<'a> Target<'a> {
    #[must_use]
    pub const fn class(class: &'a ClassFile, index: usize) -> Self {
        Self {
            class,
            member: Member::Class,
            kind: ElementKind::Type,
            index,
        }
    }

    #[must_use]
    pub const fn field(class: &'a ClassFile, field: &'a FieldInfo, index: usize) -> Self {
        Self {
            class,
            member: Member::Field(field),
            kind: ElementKind::Field,
            index,
        }
    }

    /// Method or constructor target, depending on the method name.
    #[must_use]
    pub fn method(class: &'a ClassFile, method: &'a MethodInfo, index: usize) -> Self {
        let kind = if method.is_constructor() {
            ElementKind::Constructor
        } else {
            ElementKind::Method
        };
        Self {
            class,
            member: Member::Method(method),
            kind,
            index,
        }
    }

    #[must_use]
    pub const fn parameter(class: &'a ClassFile, method: &'a MethodInfo, index: usize) -> Self {
        Self {
            class,
            member: Member::Method(method),
            kind: ElementKind::Parameter,
            index,
        }
    }

    #[must_use]
    pub const fn method_info(&self) -> Option<&'a MethodInfo> {
        match self.member {
            Member::Method(method) => Some(method),
            _ => None,
        }
    }

    #[must_use]
    pub const fn field_info(&self) -> Option<&'a FieldInfo> {
        match self.member {
            Member::Field(field) => Some(field),
            _ => None,
        }
    }

    /// Declaration line, one above the first line of the method body.
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        let line = self.method_info()?.first_line()?;
        Some(if line > 1 { line - 1 } else { line })
    }

    /// Location prefix such as
    /// `com/example/Foo.java:[11,1] method void run(int count) (flags: #1)`.
    #[must_use]
    pub fn location(&self) -> String {
        let class_path = source_class_path(&self.class.this_class);
        let mut out = format!("{class_path}.java:[");
        match self.line() {
            Some(line) => {
                let _ = write!(out, "{line},1]");
            }
            None => out.push_str("-,-]"),
        }
        out.push(' ');
        match self.member {
            Member::Class => out.push_str("whole class"),
            Member::Field(field) => {
                let _ = write!(out, "field {} {}", field.field_type, field.name);
            }
            Member::Method(method) => {
                out.push_str(if method.is_constructor() {
                    "constructor "
                } else {
                    "method "
                });
                out.push_str(&self.method_signature(method));
                let _ = write!(out, " (flags: #{:X})", method.access_flags);
            }
        }
        out
    }

    fn method_signature(&self, method: &MethodInfo) -> String {
        let mut out = if method.is_constructor() {
            self.class.constructor_name().to_string()
        } else {
            format!("{} {}", method.return_type(), method.name)
        };
        let has_names = method
            .code
            .as_ref()
            .is_some_and(|code| !code.local_variables.is_empty());
        out.push('(');
        for (index, arg) in method.argument_types().iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            let _ = write!(out, "{arg}");
            if has_names {
                let _ = write!(out, " {}", method.argument_name(index).unwrap_or("<unknown>"));
            }
        }
        out.push(')');
        out
    }
}

/// Internal class name without its innermost nested segment.
fn source_class_path(internal: &str) -> &str {
    internal.rfind('$').map_or(internal, |index| &internal[..index])
}
