use crate::classfile::Annotation;
use crate::context::{CheckContext, Target};
use crate::error::Result;

use super::{AnnotationProcessor, MetaAnnotation, has_alert, with_separator};

/// Annotations that only carry a note for the reader.
///
/// `@Warning` is always reported as a warning; the others are reported at
/// info level unless marked with `alert = true`.
#[derive(Debug, Clone, Copy)]
pub struct InformationalProcessor {
    kind: MetaAnnotation,
}

impl InformationalProcessor {
    #[must_use]
    pub const fn new(kind: MetaAnnotation) -> Self {
        Self { kind }
    }

    const fn label(self) -> &'static str {
        match self.kind {
            MetaAnnotation::ToDo => "To-Do",
            MetaAnnotation::Risky => "Risky",
            MetaAnnotation::Experimental => "Experimental",
            MetaAnnotation::NeedsRefactoring => "Needs refactoring",
            MetaAnnotation::ImplementationNote => "Implementation note",
            MetaAnnotation::Link => "Link",
            MetaAnnotation::LazyInited => "Lazy inited",
            MetaAnnotation::Determined => "Determined",
            MetaAnnotation::NonDetermined => "Non-determined",
            MetaAnnotation::ReturnsOriginal => "Returns original",
            _ => "Warning",
        }
    }
}

impl AnnotationProcessor for InformationalProcessor {
    fn kind(&self) -> MetaAnnotation {
        self.kind
    }

    fn process(
        &self,
        context: &mut CheckContext,
        target: &Target<'_>,
        annotation: &Annotation,
    ) -> Result<usize> {
        let text = match annotation.value("value") {
            Some(value) => value.stringify(),
            None => annotation.string_value("comment", ""),
        };
        let message = format!("{}{}", self.label(), with_separator(&text));
        if self.kind == MetaAnnotation::Warning || has_alert(annotation) {
            context.warning(&message, Some(target));
        } else {
            context.info(&message, Some(target));
        }
        Ok(1)
    }
}
