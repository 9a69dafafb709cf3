//! Signature-wide nullability marking checks.
//!
//! Unlike the annotation processors these checks look for *missing*
//! annotations: every reference-typed result and argument must say whether it
//! may be null, and every collection or object array whether its elements may.

use crate::classfile::{Annotation, ClassFile, JvmType, MethodInfo, parse_class_file};
use crate::context::{CacheState, CheckContext, Target};

const OBJECT_MARKS: &[&str] = &[
    "Ljavax/annotation/Nullable;",
    "Ljavax/annotation/Nonnull;",
    "Lorg/jetbrains/annotations/Nullable;",
    "Lorg/jetbrains/annotations/NotNull;",
];

const CONTAINER_MARKS: &[&str] = &[
    "Lcom/igormaznitsa/meta/annotation/MayContainNull;",
    "Lcom/igormaznitsa/meta/annotation/MustNotContainNull;",
];

const OBJECT_MARK_NAMES: (&str, &str) = ("Nullable", "Nonnull");
const CONTAINER_MARK_NAMES: (&str, &str) = ("MayContainNull", "MustNotContainNull");

/// Platform list and queue types, used when a type is not among the checked classes.
const PLATFORM_CONTAINERS: &[&str] = &[
    "java/util/List",
    "java/util/AbstractList",
    "java/util/AbstractSequentialList",
    "java/util/ArrayList",
    "java/util/LinkedList",
    "java/util/Vector",
    "java/util/Stack",
    "java/util/Queue",
    "java/util/Deque",
    "java/util/AbstractQueue",
    "java/util/ArrayDeque",
    "java/util/PriorityQueue",
    "java/util/concurrent/BlockingQueue",
    "java/util/concurrent/BlockingDeque",
    "java/util/concurrent/TransferQueue",
    "java/util/concurrent/ArrayBlockingQueue",
    "java/util/concurrent/ConcurrentLinkedQueue",
    "java/util/concurrent/ConcurrentLinkedDeque",
    "java/util/concurrent/CopyOnWriteArrayList",
    "java/util/concurrent/DelayQueue",
    "java/util/concurrent/LinkedBlockingDeque",
    "java/util/concurrent/LinkedBlockingQueue",
    "java/util/concurrent/LinkedTransferQueue",
    "java/util/concurrent/PriorityBlockingQueue",
    "java/util/concurrent/SynchronousQueue",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    /// `@Nullable` / `@Nonnull` on every reference type.
    Object,
    /// `@MayContainNull` / `@MustNotContainNull` on collections and object arrays.
    Container,
}

impl Rule {
    const fn marks(self) -> &'static [&'static str] {
        match self {
            Self::Object => OBJECT_MARKS,
            Self::Container => CONTAINER_MARKS,
        }
    }

    const fn names(self) -> (&'static str, &'static str) {
        match self {
            Self::Object => OBJECT_MARK_NAMES,
            Self::Container => CONTAINER_MARK_NAMES,
        }
    }
}

/// Run the enabled marking checks over every method of `class`.
///
/// Annotation types and synthetic classes are skipped, as are static
/// initialisers, bridge and synthetic methods, and the compiler generated
/// members of enums.
pub fn check_class(context: &mut CheckContext, class: &ClassFile) {
    let nullable = context.check_nullable();
    let containers = context.check_may_contain_null();
    if !(nullable || containers) || class.is_annotation() || class.is_synthetic() {
        return;
    }

    for (index, method) in class.methods.iter().enumerate() {
        if method.is_static_init() || method.is_bridge_or_synthetic() {
            continue;
        }
        if class.is_enum()
            && (method.name == "values" || method.name == "valueOf" || method.is_constructor())
        {
            continue;
        }
        let skip_parameters =
            class.is_nested() && method.access_flags == 0 && method.is_constructor();
        let target = Target::method(class, method, index);

        if nullable {
            check_result(context, &target, method, Rule::Object);
            if !skip_parameters {
                check_arguments(context, &target, method, Rule::Object);
            }
        }
        if containers {
            check_result(context, &target, method, Rule::Container);
            if !skip_parameters {
                check_arguments(context, &target, method, Rule::Container);
            }
        }
    }
}

fn check_result(context: &mut CheckContext, target: &Target<'_>, method: &MethodInfo, rule: Rule) {
    let result = method.return_type();
    let marked = has_mark(&method.annotations, rule.marks());
    let (first, second) = rule.names();
    match rule {
        Rule::Object if result.is_reference() && !marked => context.error(
            &format!("Return type must be marked by either @{first} or @{second}"),
            Some(target),
        ),
        Rule::Object if !result.is_reference() && marked => context.error(
            &format!("Non-object result type can't be marked by either @{first} or @{second}"),
            Some(target),
        ),
        Rule::Container if !marked && is_container(context, result) => context.error(
            &format!("Return type must be marked by either @{first} or @{second}"),
            Some(target),
        ),
        _ => {}
    }
}

fn check_arguments(
    context: &mut CheckContext,
    target: &Target<'_>,
    method: &MethodInfo,
    rule: Rule,
) {
    let arguments = method.argument_types();
    let skip_first = skips_outer_instance(target.class, method);
    let declared = arguments.len().saturating_sub(usize::from(skip_first));
    let (first, second) = rule.names();

    let mut group = 0;
    for (position, argument) in arguments.iter().enumerate() {
        if skip_first && position == 0 {
            continue;
        }
        let applies = match rule {
            Rule::Object => argument.is_reference(),
            Rule::Container => is_container(context, argument),
        };
        if applies
            && !has_parameter_mark(&method.parameter_annotations, group, declared, rule.marks())
        {
            context.error(
                &format!(
                    "Arg. #{} must be marked by either @{first} or @{second}",
                    position + 1
                ),
                Some(target),
            );
        }
        group += 1;
    }
}

/// Inner class constructors receive the enclosing instance as a hidden first argument.
fn skips_outer_instance(class: &ClassFile, method: &MethodInfo) -> bool {
    if !class.is_nested() || !method.is_constructor() || class.is_static_nested() {
        return false;
    }
    match method.argument_types().first() {
        Some(first) => first.signature() == format!("L{};", class.outer_class_name()),
        None => true,
    }
}

fn has_mark(annotations: &[Annotation], marks: &[&str]) -> bool {
    annotations
        .iter()
        .any(|annotation| marks.contains(&annotation.type_descriptor.as_str()))
}

/// Look for a mark on argument `group`, also in the groups appended for
/// other retention policies.
fn has_parameter_mark(
    groups: &[Vec<Annotation>],
    group: usize,
    declared: usize,
    marks: &[&str],
) -> bool {
    groups
        .iter()
        .skip(group)
        .step_by(declared.max(1))
        .any(|annotations| has_mark(annotations, marks))
}

/// Multi-dimensional arrays, arrays of objects and list or queue types.
fn is_container(context: &mut CheckContext, ty: &JvmType) -> bool {
    match ty {
        JvmType::Array(element) => matches!(**element, JvmType::Array(_) | JvmType::Object(_)),
        JvmType::Object(name) => is_container_class(context, name),
        _ => false,
    }
}

fn is_container_class(context: &mut CheckContext, internal: &str) -> bool {
    let key = format!("L{internal};");
    match context.cached_collection_state(&key) {
        Some(CacheState::Positive) => return true,
        Some(CacheState::Negative | CacheState::Pending) => return false,
        None => {}
    }

    context.remember_collection_state(&key, CacheState::Pending);
    let positive = inspect_class(context, internal);
    let state = if positive {
        CacheState::Positive
    } else {
        CacheState::Negative
    };
    context.remember_collection_state(&key, state);
    positive
}

/// Follow interfaces and superclasses of a checked class; anything outside
/// the target directory is looked up among the platform containers.
fn inspect_class(context: &mut CheckContext, internal: &str) -> bool {
    let path = context.target_dir().join(format!("{internal}.class"));
    if !path.is_file() {
        return PLATFORM_CONTAINERS.contains(&internal);
    }

    match parse_class_file(&path) {
        Ok(class) => {
            class
                .interfaces
                .iter()
                .any(|interface| is_container_class(context, interface))
                || class
                    .super_class
                    .as_deref()
                    .filter(|name| *name != "java/lang/Object")
                    .is_some_and(|name| is_container_class(context, name))
        }
        Err(_) => {
            let message = format!("Can't parse class file : {}", path.display());
            context.warning(&message, None);
            false
        }
    }
}

#[cfg(test)]
#[path = "nullability_tests.rs"]
mod tests;
