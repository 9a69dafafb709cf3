use crate::classfile::Annotation;
use crate::context::{CheckContext, ElementKind, Target};
use crate::error::Result;

use super::{AnnotationProcessor, MetaAnnotation};

/// `@PureFunction`: a pure function has to return something.
#[derive(Debug, Default, Clone, Copy)]
pub struct PureFunctionProcessor;

impl AnnotationProcessor for PureFunctionProcessor {
    fn kind(&self) -> MetaAnnotation {
        MetaAnnotation::PureFunction
    }

    fn process(
        &self,
        context: &mut CheckContext,
        target: &Target<'_>,
        _annotation: &Annotation,
    ) -> Result<usize> {
        if target.kind == ElementKind::Method
            && target
                .method_info()
                .is_some_and(|method| method.return_type().is_void())
        {
            context.error("pure function without result", Some(target));
        }
        Ok(1)
    }
}
