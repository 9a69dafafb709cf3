//! Annotation processors, their registry and the per-class traversal.
//!
//! Each processor validates one family of meta annotations. The registry maps
//! annotation descriptors to processors, and [`traverse_class`] walks a class
//! in a fixed order dispatching every annotation instance it finds.

mod complexity;
mod constraint;
mod informational;
mod null_marks;
mod one_way_change;
mod pure_function;
mod registry;
mod self_invocation;
mod throws;
mod traversal;
mod weight;

use crate::classfile::{Annotation, ElementValue};
use crate::context::{CheckContext, ElementKind, Target};
use crate::error::Result;

pub use constraint::has_placeholder;
pub use registry::{ANNOTATION_PACKAGE, MetaAnnotation, ProcessorRegistry};
pub use traversal::{AnnotationCounts, traverse_class};

/// Validation of one family of meta annotations.
pub trait AnnotationProcessor {
    /// Family handled by this processor.
    fn kind(&self) -> MetaAnnotation;

    /// Descriptors of the annotation types claimed by this processor.
    fn annotation_types(&self) -> Vec<String> {
        self.kind().descriptors()
    }

    /// Whether the processor may fire on elements of `kind`.
    fn is_element_allowed(&self, kind: ElementKind) -> bool {
        self.kind().allowed_kinds().contains(&kind)
    }

    /// Validate one annotation instance attached to `target`.
    ///
    /// Findings are reported through `context`; the return value is the
    /// number of annotations handled.
    ///
    /// # Errors
    /// Returns [`crate::MetaCheckerError::Abort`] when the run must stop.
    fn process(
        &self,
        context: &mut CheckContext,
        target: &Target<'_>,
        annotation: &Annotation,
    ) -> Result<usize>;
}

/// `" : text"` for non-empty text, otherwise empty.
fn with_separator(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!(" : {text}")
    }
}

/// True if the annotation carries `alert = true`.
fn has_alert(annotation: &Annotation) -> bool {
    annotation
        .value("alert")
        .and_then(ElementValue::as_bool)
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
