use crate::classfile::Annotation;
use crate::context::{CheckContext, Target};
use crate::error::Result;

use super::{AnnotationProcessor, MetaAnnotation};

/// `@DisableSelfInvocation`: no other method of the class may call the
/// annotated one.
#[derive(Debug, Default, Clone, Copy)]
pub struct SelfInvocationProcessor;

impl AnnotationProcessor for SelfInvocationProcessor {
    fn kind(&self) -> MetaAnnotation {
        MetaAnnotation::DisableSelfInvocation
    }

    fn process(
        &self,
        context: &mut CheckContext,
        target: &Target<'_>,
        _annotation: &Annotation,
    ) -> Result<usize> {
        let Some(method) = target.method_info() else {
            return Ok(1);
        };
        let class = target.class;

        for other in &class.methods {
            if std::ptr::eq(other, method) {
                continue;
            }
            let Some(code) = &other.code else {
                continue;
            };
            for (offset, call) in code.invocations() {
                if call.class_name != class.this_class
                    || call.name != method.name
                    || call.descriptor != method.descriptor
                {
                    continue;
                }
                match code.line_for(offset) {
                    Some(line) => context.error(
                        &format!("detected self invocation at line {line}"),
                        Some(target),
                    ),
                    None => context.error("detected self invocation in the class", Some(target)),
                }
            }
        }
        Ok(1)
    }
}

#[cfg(test)]
#[path = "self_invocation_tests.rs"]
mod tests;
