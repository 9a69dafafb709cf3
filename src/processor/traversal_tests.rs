use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::classfile::test_fixtures::{AnnotationSpec, ClassBuilder, FieldSpec, MethodSpec};
use crate::classfile::parse_class;
use crate::context::RecordingReporter;
use crate::processor::AnnotationProcessor;

type Visits = Rc<RefCell<Vec<(ElementKind, usize, String)>>>;

/// Records every call; claims `@ToDo` everywhere.
struct Recorder {
    visits: Visits,
}

impl AnnotationProcessor for Recorder {
    fn kind(&self) -> MetaAnnotation {
        MetaAnnotation::ToDo
    }

    fn process(
        &self,
        _context: &mut CheckContext,
        target: &Target<'_>,
        annotation: &Annotation,
    ) -> Result<usize> {
        self.visits.borrow_mut().push((
            target.kind,
            target.index,
            annotation.string_value("value", ""),
        ));
        Ok(1)
    }
}

struct Aborting;

impl AnnotationProcessor for Aborting {
    fn kind(&self) -> MetaAnnotation {
        MetaAnnotation::Risky
    }

    fn process(
        &self,
        context: &mut CheckContext,
        target: &Target<'_>,
        _annotation: &Annotation,
    ) -> Result<usize> {
        Err(context.abort("stop here", Some(target)))
    }
}

fn todo(text: &str) -> AnnotationSpec {
    AnnotationSpec::meta("ToDo").value(text)
}

fn recording_registry() -> (ProcessorRegistry, Visits) {
    let visits = Visits::default();
    let mut registry = ProcessorRegistry::new();
    registry.register(Box::new(Recorder {
        visits: Rc::clone(&visits),
    }));
    (registry, visits)
}

fn context() -> CheckContext {
    CheckContext::new(Box::new(RecordingReporter::new()))
}

#[test]
fn visits_elements_in_fixed_order() {
    let class = parse_class(
        &ClassBuilder::new("com/example/Ordered")
            .annotated(todo("class"))
            .field(FieldSpec::new("a", "I").annotated(todo("field a")))
            .field(FieldSpec::new("b", "I").annotated(todo("field b")))
            .method(
                MethodSpec::new("<init>", "()V").annotated(todo("constructor")),
            )
            .method(
                MethodSpec::new("run", "(ILjava/lang/String;)V")
                    .annotated(todo("method"))
                    .parameters(vec![vec![todo("p0")], vec![todo("p1")]]),
            )
            .build(),
    )
    .unwrap();

    let (registry, visits) = recording_registry();
    let mut counts = AnnotationCounts::new();
    traverse_class(&registry, &mut context(), &class, 7, &mut counts).unwrap();

    let visits = visits.borrow();
    let observed: Vec<(ElementKind, usize, &str)> = visits
        .iter()
        .map(|(kind, index, text)| (*kind, *index, text.as_str()))
        .collect();
    assert_eq!(
        observed,
        vec![
            (ElementKind::Type, 7, "class"),
            (ElementKind::Field, 0, "field a"),
            (ElementKind::Field, 1, "field b"),
            (ElementKind::Constructor, 0, "constructor"),
            (ElementKind::Method, 1, "method"),
            (ElementKind::Parameter, 0, "p0"),
            (ElementKind::Parameter, 1, "p1"),
        ]
    );
    assert_eq!(counts.get(MetaAnnotation::ToDo), 7);
    assert_eq!(counts.total(), 7);
}

#[test]
fn parameter_index_wraps_around_argument_count() {
    let class = parse_class(
        &ClassBuilder::new("com/example/Params")
            .method(
                MethodSpec::new("pair", "(JJ)V")
                    .visible_parameters(vec![vec![todo("v0")], vec![todo("v1")]])
                    .parameters(vec![vec![todo("i0")], vec![todo("i1")]]),
            )
            .build(),
    )
    .unwrap();

    let (registry, visits) = recording_registry();
    traverse_class(&registry, &mut context(), &class, 0, &mut AnnotationCounts::new()).unwrap();

    let indexes: Vec<(usize, String)> = visits
        .borrow()
        .iter()
        .map(|(_, index, text)| (*index, text.clone()))
        .collect();
    assert_eq!(
        indexes,
        vec![
            (0, "v0".to_string()),
            (1, "v1".to_string()),
            (0, "i0".to_string()),
            (1, "i1".to_string()),
        ]
    );
}

#[test]
fn parameter_groups_without_arguments_do_not_panic() {
    let class = parse_class(
        &ClassBuilder::new("com/example/Odd")
            .method(MethodSpec::new("none", "()V").parameters(vec![vec![todo("stray")]]))
            .build(),
    )
    .unwrap();

    let (registry, visits) = recording_registry();
    traverse_class(&registry, &mut context(), &class, 0, &mut AnnotationCounts::new()).unwrap();
    assert_eq!(visits.borrow().len(), 1);
    assert_eq!(visits.borrow()[0].1, 0);
}

#[test]
fn abort_stops_traversal() {
    let class = parse_class(
        &ClassBuilder::new("com/example/Stop")
            .field(FieldSpec::new("first", "I").annotated(AnnotationSpec::meta("Risky")))
            .field(FieldSpec::new("second", "I").annotated(todo("never")))
            .build(),
    )
    .unwrap();

    let (mut registry, visits) = recording_registry();
    registry.register(Box::new(Aborting));
    let mut context = context();

    let err = traverse_class(&registry, &mut context, &class, 0, &mut AnnotationCounts::new())
        .unwrap_err();
    assert!(err.is_abort());
    assert!(err.to_string().contains("stop here"));
    assert!(visits.borrow().is_empty());
    assert_eq!(context.counters().errors, 0);
}

#[test]
fn abort_keeps_counts_handled_before_it() {
    let class = parse_class(
        &ClassBuilder::new("com/example/Stop")
            .annotated(todo("class"))
            .field(FieldSpec::new("first", "I").annotated(todo("field")))
            .field(FieldSpec::new("second", "I").annotated(AnnotationSpec::meta("Risky")))
            .field(FieldSpec::new("third", "I").annotated(todo("never")))
            .build(),
    )
    .unwrap();

    let (mut registry, visits) = recording_registry();
    registry.register(Box::new(Aborting));
    let mut counts = AnnotationCounts::new();
    counts.add(MetaAnnotation::ToDo, 5);

    let err = traverse_class(&registry, &mut context(), &class, 0, &mut counts).unwrap_err();
    assert!(err.is_abort());
    assert_eq!(visits.borrow().len(), 2);
    assert_eq!(counts.get(MetaAnnotation::ToDo), 7);
    assert_eq!(counts.get(MetaAnnotation::Risky), 0);
}

#[test]
fn counts_accumulate_in_first_seen_order() {
    let mut first = AnnotationCounts::new();
    first.add(MetaAnnotation::ToDo, 2);
    first.add(MetaAnnotation::Risky, 3);
    first.add(MetaAnnotation::ToDo, 1);

    assert_eq!(first.get(MetaAnnotation::ToDo), 3);
    assert_eq!(first.get(MetaAnnotation::Risky), 3);
    assert_eq!(first.get(MetaAnnotation::Weight), 0);
    assert_eq!(first.total(), 6);
    assert_eq!(
        first.iter().collect::<Vec<_>>(),
        vec![(MetaAnnotation::ToDo, 3), (MetaAnnotation::Risky, 3)]
    );
}
