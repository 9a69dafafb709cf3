use std::sync::LazyLock;

use regex::Regex;

use crate::classfile::Annotation;
use crate::context::{CheckContext, Target};
use crate::error::Result;
use crate::expr::Script;

use super::{AnnotationProcessor, MetaAnnotation};

/// `X` as a standalone identifier in a dumped expression.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bx\b").expect("Invalid regex"));

/// `@Constraint`: the value must be a valid expression mentioning `X`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstraintProcessor;

impl AnnotationProcessor for ConstraintProcessor {
    fn kind(&self) -> MetaAnnotation {
        MetaAnnotation::Constraint
    }

    fn process(
        &self,
        context: &mut CheckContext,
        target: &Target<'_>,
        annotation: &Annotation,
    ) -> Result<usize> {
        let expression = annotation.string_value("value", "");
        match Script::parse(&expression) {
            Ok(script) => {
                if !PLACEHOLDER.is_match(&script.dump()) {
                    context.error(
                        &format!("can't detect 'X' at constraint expression '{expression}'"),
                        Some(target),
                    );
                }
            }
            Err(_) => {
                context.error(
                    &format!("wrong constraint expression '{expression}'"),
                    Some(target),
                );
            }
        }
        Ok(1)
    }
}

/// True if `expression` parses and uses `X` as a standalone identifier.
#[must_use]
pub fn has_placeholder(expression: &str) -> bool {
    Script::parse(expression).is_ok_and(|script| PLACEHOLDER.is_match(&script.dump()))
}
