use crate::classfile::Annotation;
use crate::context::{CheckContext, Target};
use crate::error::Result;
use crate::levels::{Scale, WeightUnit};

use super::{AnnotationProcessor, MetaAnnotation};

/// Weight at which an unrestricted run still warns.
const HEAVY_WEIGHT: WeightUnit = WeightUnit::ExtraHard;

/// `@Weight`: compare the unit with the configured maximum.
#[derive(Debug, Default, Clone, Copy)]
pub struct WeightProcessor;

impl AnnotationProcessor for WeightProcessor {
    fn kind(&self) -> MetaAnnotation {
        MetaAnnotation::Weight
    }

    fn process(
        &self,
        context: &mut CheckContext,
        target: &Target<'_>,
        annotation: &Annotation,
    ) -> Result<usize> {
        let Some(value) = annotation.value("value") else {
            context.error(
                &format!(
                    "Can't find unit for {} annotation",
                    annotation.type_descriptor
                ),
                Some(target),
            );
            return Ok(1);
        };

        let text = value.stringify();
        let Some(unit) = WeightUnit::from_name(&text) else {
            context.error(
                &format!(
                    "Can't get information about unit from annotation {} [{text}]",
                    annotation.type_descriptor
                ),
                Some(target),
            );
            return Ok(1);
        };

        match context.thresholds().max_weight {
            None if unit >= HEAVY_WEIGHT => {
                context.warning(&format!("has weight {unit}"), Some(target));
            }
            Some(max) if unit > max => {
                context.error(
                    &format!("Detected violation of max weight rule : {unit}"),
                    Some(target),
                );
            }
            _ => {}
        }
        Ok(1)
    }
}
