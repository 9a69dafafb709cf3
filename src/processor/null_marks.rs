use crate::classfile::{Annotation, JvmType};
use crate::context::{CheckContext, ElementKind, Target};
use crate::error::Result;

use super::{AnnotationProcessor, MetaAnnotation};

/// `@MustNotContainNull` and `@MayContainNull`: only object types and arrays
/// of object types can be marked.
#[derive(Debug, Clone, Copy)]
pub struct NullMarkProcessor {
    kind: MetaAnnotation,
}

impl NullMarkProcessor {
    #[must_use]
    pub const fn new(kind: MetaAnnotation) -> Self {
        Self { kind }
    }
}

impl AnnotationProcessor for NullMarkProcessor {
    fn kind(&self) -> MetaAnnotation {
        self.kind
    }

    fn process(
        &self,
        context: &mut CheckContext,
        target: &Target<'_>,
        annotation: &Annotation,
    ) -> Result<usize> {
        let (marked, subject): (Option<&JvmType>, &str) = match target.kind {
            ElementKind::Field => (
                target.field_info().map(|field| &field.field_type),
                "a non-object field",
            ),
            ElementKind::Parameter => (
                target
                    .method_info()
                    .and_then(|method| method.argument_types().get(target.index)),
                "a non-object parameter",
            ),
            ElementKind::Method => (
                target.method_info().map(|method| method.return_type()),
                "the non-object result",
            ),
            other => {
                return Err(context.abort(
                    &format!("Unexpected item type [{}]", other.as_str()),
                    Some(target),
                ));
            }
        };

        if marked.is_some_and(|ty| !ty.is_object_type()) {
            context.error(
                &format!("{subject} is marked by @{}", annotation.type_name()),
                Some(target),
            );
        }
        Ok(1)
    }
}
