use crate::classfile::Annotation;
use crate::context::{CheckContext, Target};
use crate::error::Result;
use crate::levels::{Complexity, Scale};

use super::{AnnotationProcessor, MetaAnnotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Measure {
    Time,
    Memory,
}

/// `@TimeComplexity` and `@MemoryComplexity`.
#[derive(Debug, Clone, Copy)]
pub struct ComplexityProcessor {
    measure: Measure,
}

impl ComplexityProcessor {
    #[must_use]
    pub const fn time() -> Self {
        Self {
            measure: Measure::Time,
        }
    }

    #[must_use]
    pub const fn memory() -> Self {
        Self {
            measure: Measure::Memory,
        }
    }

    const fn title(self) -> &'static str {
        match self.measure {
            Measure::Time => "time",
            Measure::Memory => "memory",
        }
    }
}

impl AnnotationProcessor for ComplexityProcessor {
    fn kind(&self) -> MetaAnnotation {
        match self.measure {
            Measure::Time => MetaAnnotation::TimeComplexity,
            Measure::Memory => MetaAnnotation::MemoryComplexity,
        }
    }

    fn process(
        &self,
        context: &mut CheckContext,
        target: &Target<'_>,
        annotation: &Annotation,
    ) -> Result<usize> {
        let canonical = annotation.type_name();
        let Some(value) = annotation.value("value") else {
            context.error(
                &format!("Can't find value int {canonical} annotation"),
                Some(target),
            );
            return Ok(1);
        };

        let text = value.stringify();
        let Some(level) = Complexity::from_name(&text) else {
            context.error(
                &format!(
                    "Can't get information about complexity from annotation {canonical} [{text}]"
                ),
                Some(target),
            );
            return Ok(1);
        };

        let thresholds = context.thresholds();
        let max = match self.measure {
            Measure::Time => thresholds.max_time_complexity,
            Measure::Memory => thresholds.max_memory_complexity,
        };
        if max.is_some_and(|max| level > max) {
            context.error(
                &format!(
                    "Detected violation for {} complexity : {level}",
                    self.title()
                ),
                Some(target),
            );
        }
        Ok(1)
    }
}
