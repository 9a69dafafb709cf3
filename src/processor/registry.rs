use std::collections::HashMap;
use std::fmt;

use crate::context::ElementKind;

use super::AnnotationProcessor;
use super::complexity::ComplexityProcessor;
use super::constraint::ConstraintProcessor;
use super::informational::InformationalProcessor;
use super::null_marks::NullMarkProcessor;
use super::one_way_change::OneWayChangeProcessor;
use super::pure_function::PureFunctionProcessor;
use super::self_invocation::SelfInvocationProcessor;
use super::throws::ThrowsProcessor;
use super::weight::WeightProcessor;

/// Internal package of the meta annotations.
pub const ANNOTATION_PACKAGE: &str = "com/igormaznitsa/meta/annotation/";

const TYPE: ElementKind = ElementKind::Type;
const FIELD: ElementKind = ElementKind::Field;
const METHOD: ElementKind = ElementKind::Method;
const CONSTRUCTOR: ElementKind = ElementKind::Constructor;
const PARAMETER: ElementKind = ElementKind::Parameter;

const EVERYWHERE: &[ElementKind] = &[TYPE, FIELD, METHOD, CONSTRUCTOR, PARAMETER];

/// Every meta annotation family known to the checker, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetaAnnotation {
    Constraint,
    Determined,
    DisableSelfInvocation,
    Experimental,
    ImplementationNote,
    LazyInited,
    Link,
    MayContainNull,
    MemoryComplexity,
    MustNotContainNull,
    NeedsRefactoring,
    NonDetermined,
    OneWayChange,
    PureFunction,
    ReturnsOriginal,
    Risky,
    ThrowsRuntimeException,
    TimeComplexity,
    ToDo,
    Warning,
    Weight,
}

impl MetaAnnotation {
    pub const ALL: [Self; 21] = [
        Self::Constraint,
        Self::Determined,
        Self::DisableSelfInvocation,
        Self::Experimental,
        Self::ImplementationNote,
        Self::LazyInited,
        Self::Link,
        Self::MayContainNull,
        Self::MemoryComplexity,
        Self::MustNotContainNull,
        Self::NeedsRefactoring,
        Self::NonDetermined,
        Self::OneWayChange,
        Self::PureFunction,
        Self::ReturnsOriginal,
        Self::Risky,
        Self::ThrowsRuntimeException,
        Self::TimeComplexity,
        Self::ToDo,
        Self::Warning,
        Self::Weight,
    ];

    /// Upper snake case name used in summaries and configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Constraint => "CONSTRAINT",
            Self::Determined => "DETERMINED",
            Self::DisableSelfInvocation => "DISABLE_SELF_INVOCATION",
            Self::Experimental => "EXPERIMENTAL",
            Self::ImplementationNote => "IMPLEMENTATION_NOTE",
            Self::LazyInited => "LAZY_INITED",
            Self::Link => "LINK",
            Self::MayContainNull => "MAY_CONTAIN_NULL",
            Self::MemoryComplexity => "MEMORY_COMPLEXITY",
            Self::MustNotContainNull => "MUST_NOT_CONTAIN_NULL",
            Self::NeedsRefactoring => "NEEDS_REFACTORING",
            Self::NonDetermined => "NON_DETERMINED",
            Self::OneWayChange => "ONE_WAY_CHANGE",
            Self::PureFunction => "PURE_FUNCTION",
            Self::ReturnsOriginal => "RETURNS_ORIGINAL",
            Self::Risky => "RISKY",
            Self::ThrowsRuntimeException => "THROW_RUNTIME_EXCEPTION",
            Self::TimeComplexity => "TIME_COMPLEXITY",
            Self::ToDo => "TODO",
            Self::Warning => "WARNING",
            Self::Weight => "WEIGHT",
        }
    }

    /// Simple class names of the annotation types; repeatable annotations
    /// list their container as well.
    #[must_use]
    pub const fn simple_names(self) -> &'static [&'static str] {
        match self {
            Self::Constraint => &["Constraint"],
            Self::Determined => &["Determined"],
            Self::DisableSelfInvocation => &["DisableSelfInvocation"],
            Self::Experimental => &["Experimental"],
            Self::ImplementationNote => &["ImplementationNote"],
            Self::LazyInited => &["LazyInited"],
            Self::Link => &["Link"],
            Self::MayContainNull => &["MayContainNull"],
            Self::MemoryComplexity => &["MemoryComplexity"],
            Self::MustNotContainNull => &["MustNotContainNull"],
            Self::NeedsRefactoring => &["NeedsRefactoring"],
            Self::NonDetermined => &["NonDetermined"],
            Self::OneWayChange => &["OneWayChange"],
            Self::PureFunction => &["PureFunction"],
            Self::ReturnsOriginal => &["ReturnsOriginal"],
            Self::Risky => &["Risky"],
            Self::ThrowsRuntimeException => &["ThrowsRuntimeException", "ThrowsRuntimeExceptions"],
            Self::TimeComplexity => &["TimeComplexity"],
            Self::ToDo => &["ToDo"],
            Self::Warning => &["Warning"],
            Self::Weight => &["Weight"],
        }
    }

    /// Element kinds the annotation type may be attached to.
    #[must_use]
    pub const fn allowed_kinds(self) -> &'static [ElementKind] {
        match self {
            Self::Constraint | Self::MayContainNull | Self::MustNotContainNull => {
                &[FIELD, METHOD, PARAMETER]
            }
            Self::Determined | Self::NonDetermined | Self::NeedsRefactoring | Self::Weight => {
                &[TYPE, METHOD, CONSTRUCTOR]
            }
            Self::LazyInited => &[FIELD, METHOD],
            Self::OneWayChange => &[TYPE, METHOD],
            Self::ThrowsRuntimeException | Self::TimeComplexity | Self::MemoryComplexity => {
                &[METHOD, CONSTRUCTOR]
            }
            Self::ReturnsOriginal | Self::PureFunction | Self::DisableSelfInvocation => &[METHOD],
            Self::Link
            | Self::Risky
            | Self::Experimental
            | Self::ToDo
            | Self::Warning
            | Self::ImplementationNote => EVERYWHERE,
        }
    }

    /// Field descriptors of the annotation types, e.g. `Lcom/igormaznitsa/meta/annotation/Weight;`.
    #[must_use]
    pub fn descriptors(self) -> Vec<String> {
        self.simple_names()
            .iter()
            .map(|name| format!("L{ANNOTATION_PACKAGE}{name};"))
            .collect()
    }

    /// Dotted canonical names of the annotation types.
    #[must_use]
    pub fn canonical_names(self) -> Vec<String> {
        self.simple_names()
            .iter()
            .map(|name| format!("{}{name}", ANNOTATION_PACKAGE.replace('/', ".")))
            .collect()
    }

    /// Check a user supplied annotation name against this family.
    ///
    /// Dotted names must equal a canonical name, short names must equal the
    /// last segment; both ignore case.
    #[must_use]
    pub fn is_among_class_names(self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let suffix = format!(".{}", name.to_lowercase());
        self.canonical_names().iter().any(|canonical| {
            if name.contains('.') {
                canonical.eq_ignore_ascii_case(name)
            } else {
                canonical.to_lowercase().ends_with(&suffix)
            }
        })
    }

    /// Built-in processor for this family.
    #[must_use]
    pub fn processor(self) -> Box<dyn AnnotationProcessor> {
        match self {
            Self::Constraint => Box::new(ConstraintProcessor),
            Self::DisableSelfInvocation => Box::new(SelfInvocationProcessor),
            Self::MayContainNull | Self::MustNotContainNull => Box::new(NullMarkProcessor::new(self)),
            Self::MemoryComplexity => Box::new(ComplexityProcessor::memory()),
            Self::TimeComplexity => Box::new(ComplexityProcessor::time()),
            Self::OneWayChange => Box::new(OneWayChangeProcessor),
            Self::PureFunction => Box::new(PureFunctionProcessor),
            Self::ThrowsRuntimeException => Box::new(ThrowsProcessor),
            Self::Weight => Box::new(WeightProcessor),
            Self::Determined
            | Self::Experimental
            | Self::ImplementationNote
            | Self::LazyInited
            | Self::Link
            | Self::NeedsRefactoring
            | Self::NonDetermined
            | Self::ReturnsOriginal
            | Self::Risky
            | Self::ToDo
            | Self::Warning => Box::new(InformationalProcessor::new(self)),
        }
    }
}

impl fmt::Display for MetaAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registered processors with a descriptor index for dispatch.
pub struct ProcessorRegistry {
    processors: Vec<Box<dyn AnnotationProcessor>>,
    descriptor_map: HashMap<String, Vec<usize>>,
}

impl ProcessorRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
            descriptor_map: HashMap::new(),
        }
    }

    pub fn register(&mut self, processor: Box<dyn AnnotationProcessor>) {
        let idx = self.processors.len();
        for descriptor in processor.annotation_types() {
            self.descriptor_map.entry(descriptor).or_default().push(idx);
        }
        self.processors.push(processor);
    }

    /// Processors claiming the annotation type with the given descriptor.
    pub fn processors_for<'a>(
        &'a self,
        descriptor: &str,
    ) -> impl Iterator<Item = &'a dyn AnnotationProcessor> + 'a {
        self.descriptor_map
            .get(descriptor)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .map(|&idx| self.processors[idx].as_ref())
    }

    /// True if any registered processor may fire on elements of `kind`.
    #[must_use]
    pub fn claims_kind(&self, kind: ElementKind) -> bool {
        self.processors.iter().any(|p| p.is_element_allowed(kind))
    }

    #[must_use]
    pub fn all(&self) -> &[Box<dyn AnnotationProcessor>] {
        &self.processors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        for kind in MetaAnnotation::ALL {
            registry.register(kind.processor());
        }
        registry
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field(
                "processors",
                &self.processors.iter().map(|p| p.kind()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
