use crate::classfile::{Annotation, ElementValue};
use crate::context::{CheckContext, Target};
use crate::error::Result;

use super::{ANNOTATION_PACKAGE, AnnotationProcessor, MetaAnnotation};

const CONTAINER: &str = "ThrowsRuntimeExceptions";

/// `@ThrowsRuntimeException`, alone or bundled in `@ThrowsRuntimeExceptions`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThrowsProcessor;

impl AnnotationProcessor for ThrowsProcessor {
    fn kind(&self) -> MetaAnnotation {
        MetaAnnotation::ThrowsRuntimeException
    }

    fn process(
        &self,
        context: &mut CheckContext,
        target: &Target<'_>,
        annotation: &Annotation,
    ) -> Result<usize> {
        let entries = unwrap_repeatable(context, target, annotation);
        if entries.iter().any(|entry| entry.value("value").is_none()) {
            context.error(
                &format!("detected @{CONTAINER} without value"),
                Some(target),
            );
        }
        Ok(entries.len())
    }
}

/// Individual instances of a possibly repeated annotation.
///
/// A container without a `value` array is reported and yields nothing.
fn unwrap_repeatable<'a>(
    context: &mut CheckContext,
    target: &Target<'_>,
    annotation: &'a Annotation,
) -> Vec<&'a Annotation> {
    if annotation.type_descriptor != format!("L{ANNOTATION_PACKAGE}{CONTAINER};") {
        return vec![annotation];
    }
    match annotation.value("value") {
        Some(ElementValue::Array(values)) => values
            .iter()
            .filter_map(|value| match value {
                ElementValue::Annotation(nested) => Some(nested),
                _ => None,
            })
            .collect(),
        _ => {
            context.error(
                &format!("Detected annotation {} without value", annotation.type_name()),
                Some(target),
            );
            Vec::new()
        }
    }
}
