use crate::classfile::Annotation;
use crate::context::{CheckContext, Target};
use crate::error::Result;

use super::{AnnotationProcessor, MetaAnnotation};

/// `@OneWayChange`: presence is all that is checked.
#[derive(Debug, Default, Clone, Copy)]
pub struct OneWayChangeProcessor;

impl AnnotationProcessor for OneWayChangeProcessor {
    fn kind(&self) -> MetaAnnotation {
        MetaAnnotation::OneWayChange
    }

    fn process(
        &self,
        _context: &mut CheckContext,
        _target: &Target<'_>,
        _annotation: &Annotation,
    ) -> Result<usize> {
        Ok(1)
    }
}
