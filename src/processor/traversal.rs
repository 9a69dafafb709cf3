use indexmap::IndexMap;

use crate::classfile::{Annotation, ClassFile};
use crate::context::{CheckContext, ElementKind, Target};
use crate::error::Result;

use super::{MetaAnnotation, ProcessorRegistry};

/// Number of handled annotations per family, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationCounts {
    counts: IndexMap<MetaAnnotation, usize>,
}

impl AnnotationCounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: MetaAnnotation, count: usize) {
        *self.counts.entry(kind).or_insert(0) += count;
    }

    #[must_use]
    pub fn get(&self, kind: MetaAnnotation) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetaAnnotation, usize)> + '_ {
        self.counts.iter().map(|(kind, count)| (*kind, *count))
    }
}

/// Walk one class and dispatch its annotations to the registered processors.
///
/// Order: class annotations, fields in declaration order, then every method
/// with its own annotations followed by its parameter annotation groups.
/// Parameter groups are indexed modulo the declared argument count.
/// Handled annotations are added to `counts` as they are processed.
///
/// # Errors
/// Stops at the first processor abort and returns it; `counts` keeps what
/// was handled before it.
pub fn traverse_class(
    registry: &ProcessorRegistry,
    context: &mut CheckContext,
    class: &ClassFile,
    class_index: usize,
    counts: &mut AnnotationCounts,
) -> Result<()> {
    if registry.claims_kind(ElementKind::Type) {
        let target = Target::class(class, class_index);
        dispatch(registry, context, &target, &class.annotations, counts)?;
    }

    if registry.claims_kind(ElementKind::Field) {
        for (index, field) in class.fields.iter().enumerate() {
            let target = Target::field(class, field, index);
            dispatch(registry, context, &target, &field.annotations, counts)?;
        }
    }

    let claims_methods =
        registry.claims_kind(ElementKind::Method) || registry.claims_kind(ElementKind::Constructor);
    let claims_parameters = registry.claims_kind(ElementKind::Parameter);
    if claims_methods || claims_parameters {
        for (index, method) in class.methods.iter().enumerate() {
            let target = Target::method(class, method, index);
            if registry.claims_kind(target.kind) {
                dispatch(registry, context, &target, &method.annotations, counts)?;
            }
            if !claims_parameters {
                continue;
            }
            let argc = method.argument_types().len();
            for (group_index, group) in method.parameter_annotations.iter().enumerate() {
                let position = if argc == 0 {
                    group_index
                } else {
                    group_index % argc
                };
                let target = Target::parameter(class, method, position);
                dispatch(registry, context, &target, group, counts)?;
            }
        }
    }

    Ok(())
}

fn dispatch(
    registry: &ProcessorRegistry,
    context: &mut CheckContext,
    target: &Target<'_>,
    annotations: &[Annotation],
    counts: &mut AnnotationCounts,
) -> Result<()> {
    for annotation in annotations {
        for processor in registry.processors_for(&annotation.type_descriptor) {
            if !processor.is_element_allowed(target.kind) {
                continue;
            }
            let processed = processor.process(context, target, annotation)?;
            counts.add(processor.kind(), processed);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "traversal_tests.rs"]
mod tests;
