use serde::{Deserialize, Serialize};

use crate::ast::{SourceSpan, TypeAnnotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Primitive {
    Int,
    Float,
    Str,
    Bool,
    Bytes,
    None,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Str => "str",
            Primitive::Bool => "bool",
            Primitive::Bytes => "bytes",
            Primitive::None => "None",
        }
    }

    fn numeric_rank(self) -> Option<u8> {
        match self {
            Primitive::Bool => Some(0),
            Primitive::Int => Some(1),
            Primitive::Float => Some(2),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContainerKind {
    List,
    Dict,
    Set,
    Tuple,
    /// `tuple[T, ...]`: any length, every element `T`.
    VariadicTuple,
}

impl ContainerKind {
    pub fn name(self) -> &'static str {
        match self {
            ContainerKind::List => "list",
            ContainerKind::Dict => "dict",
            ContainerKind::Set => "set",
            ContainerKind::Tuple | ContainerKind::VariadicTuple => "tuple",
        }
    }

    /// Number of type parameters the generic form takes; `None` for variadic tuples.
    pub fn parameter_count(self) -> Option<usize> {
        match self {
            ContainerKind::List | ContainerKind::Set => Some(1),
            ContainerKind::Dict => Some(2),
            ContainerKind::Tuple | ContainerKind::VariadicTuple => None,
        }
    }

    pub fn is_tuple(self) -> bool {
        matches!(self, ContainerKind::Tuple | ContainerKind::VariadicTuple)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arity {
    Exact(usize),
    Range { min: usize, max: Option<usize> },
}

impl Arity {
    pub fn allows(self, count: usize) -> bool {
        match self {
            Arity::Exact(expected) => expected == count,
            Arity::Range { min, max } => {
                if count < min {
                    return false;
                }
                if let Some(limit) = max {
                    if count > limit {
                        return false;
                    }
                }
                true
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamType {
    pub name: String,
    pub ty: Type,
    /// Whether the parameter can be filled by a positional argument.
    pub positional: bool,
    pub required: bool,
}

impl ParamType {
    pub fn positional(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            positional: true,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            positional: true,
            required: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionType {
    pub params: Vec<ParamType>,
    /// Accepts extra positional arguments (`*args`).
    pub variadic: bool,
    /// Accepts extra keyword arguments (`**kwargs`).
    pub keywords: bool,
    pub return_type: Box<Type>,
}

impl FunctionType {
    pub fn new(params: Vec<ParamType>, return_type: Type) -> Self {
        Self {
            params,
            variadic: false,
            keywords: false,
            return_type: Box::new(return_type),
        }
    }

    /// A signature that accepts any arguments.
    pub fn variadic(return_type: Type) -> Self {
        Self {
            params: Vec::new(),
            variadic: true,
            keywords: true,
            return_type: Box::new(return_type),
        }
    }

    pub fn arity(&self) -> Arity {
        let positional = self.params.iter().filter(|param| param.positional);
        let min = positional.clone().filter(|param| param.required).count();
        let count = positional.count();
        if self.variadic {
            Arity::Range { min, max: None }
        } else if min == count {
            Arity::Exact(count)
        } else {
            Arity::Range {
                min,
                max: Some(count),
            }
        }
    }

    /// The signature as seen through an instance, with the receiver parameter dropped.
    pub fn without_receiver(&self) -> FunctionType {
        let mut bound = self.clone();
        if let Some(first) = bound.params.first() {
            if first.positional {
                bound.params.remove(0);
            }
        }
        bound
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Unknown,
    Primitive(Primitive),
    Container(ContainerKind, Vec<Type>),
    ClassInstance(String),
    /// The class object itself; calling it produces a `ClassInstance`.
    Class(String),
    Function(FunctionType),
    Module { name: String, resolved: bool },
}

impl Type {
    pub const INT: Type = Type::Primitive(Primitive::Int);
    pub const FLOAT: Type = Type::Primitive(Primitive::Float);
    pub const STR: Type = Type::Primitive(Primitive::Str);
    pub const BOOL: Type = Type::Primitive(Primitive::Bool);
    pub const BYTES: Type = Type::Primitive(Primitive::Bytes);
    pub const NONE: Type = Type::Primitive(Primitive::None);

    pub fn list(element: Type) -> Type {
        Type::Container(ContainerKind::List, vec![element])
    }

    pub fn dict(key: Type, value: Type) -> Type {
        Type::Container(ContainerKind::Dict, vec![key, value])
    }

    pub fn set(element: Type) -> Type {
        Type::Container(ContainerKind::Set, vec![element])
    }

    pub fn tuple(elements: Vec<Type>) -> Type {
        Type::Container(ContainerKind::Tuple, elements)
    }

    pub fn variadic_tuple(element: Type) -> Type {
        Type::Container(ContainerKind::VariadicTuple, vec![element])
    }

    pub fn function(params: Vec<ParamType>, return_type: Type) -> Type {
        Type::Function(FunctionType::new(params, return_type))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Type::Primitive(Primitive::None))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Type::Primitive(Primitive::Int | Primitive::Float | Primitive::Bool)
        )
    }

    pub fn describe(&self) -> String {
        match self {
            Type::Unknown => "Unknown".to_string(),
            Type::Primitive(primitive) => primitive.name().to_string(),
            Type::Container(ContainerKind::VariadicTuple, elements) => {
                let element = elements.first().map_or_else(|| "Unknown".to_string(), Type::describe);
                format!("tuple[{element}, ...]")
            }
            Type::Container(kind, elements) => {
                if elements.is_empty() {
                    return format!("{}[()]", kind.name());
                }
                let joined = elements
                    .iter()
                    .map(Type::describe)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}[{joined}]", kind.name())
            }
            Type::ClassInstance(key) => class_display_name(key).to_string(),
            Type::Class(key) => format!("type[{}]", class_display_name(key)),
            Type::Function(function) => {
                let mut params = function
                    .params
                    .iter()
                    .map(|param| format!("{}: {}", param.name, param.ty.describe()))
                    .collect::<Vec<_>>();
                if function.variadic {
                    params.push("*args".to_string());
                }
                if function.keywords {
                    params.push("**kwargs".to_string());
                }
                format!(
                    "({}) -> {}",
                    params.join(", "),
                    function.return_type.describe()
                )
            }
            Type::Module { name, .. } => format!("Module(\"{name}\")"),
        }
    }
}

/// Name shown in messages for a class key such as `outer.<locals>.Node@4:7`.
pub fn class_display_name(key: &str) -> &str {
    let qualified = key.split('@').next().unwrap_or(key);
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// Answers subclass questions for assignability; implemented by the checker's class table.
pub trait ClassHierarchy {
    /// `true` when `class` is `ancestor`, derives from it, or has ancestry that cannot be proven.
    fn inherits_from(&self, class: &str, ancestor: &str) -> bool;
}

impl ClassHierarchy for () {
    fn inherits_from(&self, class: &str, ancestor: &str) -> bool {
        class == ancestor
    }
}

pub fn is_assignable(expected: &Type, actual: &Type, classes: &dyn ClassHierarchy) -> bool {
    if expected.is_unknown() || actual.is_unknown() {
        return true;
    }

    match (expected, actual) {
        (Type::Primitive(expected), Type::Primitive(actual)) => {
            if expected == actual {
                return true;
            }
            // bool -> int -> float widening
            match (expected.numeric_rank(), actual.numeric_rank()) {
                (Some(expected_rank), Some(actual_rank)) => actual_rank <= expected_rank,
                _ => false,
            }
        }
        (
            Type::Container(ContainerKind::VariadicTuple, expected_elements),
            Type::Container(ContainerKind::Tuple, actual_elements),
        ) => {
            let element = expected_elements.first().unwrap_or(&Type::Unknown);
            actual_elements
                .iter()
                .all(|actual| is_assignable(element, actual, classes))
        }
        (
            Type::Container(expected_kind, expected_elements),
            Type::Container(actual_kind, actual_elements),
        ) => {
            if expected_kind != actual_kind || expected_elements.len() != actual_elements.len() {
                return false;
            }
            expected_elements
                .iter()
                .zip(actual_elements.iter())
                .all(|(expected, actual)| is_assignable(expected, actual, classes))
        }
        (Type::ClassInstance(expected), Type::ClassInstance(actual)) => {
            classes.inherits_from(actual, expected)
        }
        (Type::Class(expected), Type::Class(actual)) => classes.inherits_from(actual, expected),
        (Type::Function(expected), Type::Function(actual)) => {
            is_assignable(&expected.return_type, &actual.return_type, classes)
        }
        (
            Type::Module {
                name: expected, ..
            },
            Type::Module { name: actual, .. },
        ) => expected == actual,
        _ => false,
    }
}

/// Least upper bound used when several values flow into one place; falls back to `Unknown`.
pub fn join(left: &Type, right: &Type) -> Type {
    if left == right {
        return left.clone();
    }
    if left.is_unknown() || right.is_unknown() {
        return Type::Unknown;
    }
    match (left, right) {
        (Type::Primitive(a), Type::Primitive(b)) => match (a.numeric_rank(), b.numeric_rank()) {
            (Some(rank_a), Some(rank_b)) => {
                let wider = if rank_a >= rank_b { *a } else { *b };
                if wider == Primitive::Bool {
                    Type::INT
                } else {
                    Type::Primitive(wider)
                }
            }
            _ => Type::Unknown,
        },
        (Type::Container(kind_a, elements_a), Type::Container(kind_b, elements_b))
            if kind_a == kind_b && elements_a.len() == elements_b.len() =>
        {
            Type::Container(
                *kind_a,
                elements_a
                    .iter()
                    .zip(elements_b.iter())
                    .map(|(a, b)| join(a, b))
                    .collect(),
            )
        }
        _ => Type::Unknown,
    }
}

/// Joins every type in the iterator; `None` for an empty iterator.
pub fn join_all<'a>(types: impl IntoIterator<Item = &'a Type>) -> Option<Type> {
    types.into_iter().fold(None, |acc, ty| match acc {
        None => Some(ty.clone()),
        Some(acc) => Some(join(&acc, ty)),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAnnotation {
    pub ty: Type,
    /// Generic containers written without type arguments, with the span of each.
    pub missing_parameters: Vec<(SourceSpan, String)>,
}

/// Interprets an annotation. `lookup_class` maps a name to the class it denotes, if any.
pub fn resolve_annotation(
    annotation: &TypeAnnotation,
    lookup_class: &dyn Fn(&str) -> Option<String>,
) -> ResolvedAnnotation {
    let mut missing_parameters = Vec::new();
    let ty = annotation_type(annotation, lookup_class, &mut missing_parameters);
    ResolvedAnnotation {
        ty,
        missing_parameters,
    }
}

fn annotation_type(
    annotation: &TypeAnnotation,
    lookup_class: &dyn Fn(&str) -> Option<String>,
    missing: &mut Vec<(SourceSpan, String)>,
) -> Type {
    let leaf = annotation.leaf_name();
    let primitive = match leaf {
        "int" => Some(Primitive::Int),
        "float" => Some(Primitive::Float),
        "str" => Some(Primitive::Str),
        "bool" => Some(Primitive::Bool),
        "bytes" => Some(Primitive::Bytes),
        "None" => Some(Primitive::None),
        _ => None,
    };
    if let Some(primitive) = primitive {
        return Type::Primitive(primitive);
    }

    if let Some(class_name) = lookup_class(annotation.unquoted_name()) {
        return Type::ClassInstance(class_name);
    }

    let container = match leaf {
        "list" | "List" => Some(ContainerKind::List),
        "dict" | "Dict" => Some(ContainerKind::Dict),
        "set" | "Set" | "frozenset" | "FrozenSet" => Some(ContainerKind::Set),
        "tuple" | "Tuple" => Some(ContainerKind::Tuple),
        _ => None,
    };
    let Some(kind) = container else {
        // Any, object, Optional, Union, Callable, protocols and unknown names.
        for argument in &annotation.arguments {
            annotation_type(argument, lookup_class, missing);
        }
        return Type::Unknown;
    };

    if annotation.arguments.is_empty() {
        missing.push((annotation.span, leaf.to_string()));
        return match kind.parameter_count() {
            Some(arity) => Type::Container(kind, vec![Type::Unknown; arity]),
            None => Type::variadic_tuple(Type::Unknown),
        };
    }

    if kind == ContainerKind::Tuple {
        let variable_length = annotation
            .arguments
            .iter()
            .any(|argument| argument.name == "...");
        let elements = annotation
            .arguments
            .iter()
            .filter(|argument| argument.name != "...")
            .map(|argument| annotation_type(argument, lookup_class, missing))
            .collect::<Vec<_>>();
        if variable_length {
            let element = join_all(elements.iter()).unwrap_or(Type::Unknown);
            return Type::variadic_tuple(element);
        }
        return Type::tuple(elements);
    }

    let expected = kind.parameter_count().unwrap_or(1);
    let mut elements = annotation
        .arguments
        .iter()
        .take(expected)
        .map(|argument| annotation_type(argument, lookup_class, missing))
        .collect::<Vec<_>>();
    elements.resize(expected, Type::Unknown);
    Type::Container(kind, elements)
}
