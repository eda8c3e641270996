//! Closed attribute sets for container and primitive receivers.
//!
//! Anything not listed here is an `AttributeError` on that receiver.

use crate::types::{ContainerKind, FunctionType, ParamType, Primitive, Type};

const OBJECT_ATTRIBUTES: &[&str] = &[
    "__class__",
    "__doc__",
    "__eq__",
    "__ne__",
    "__hash__",
    "__repr__",
    "__str__",
    "__format__",
    "__sizeof__",
    "__dir__",
];

fn method(params: Vec<ParamType>, return_type: Type) -> Option<Type> {
    Some(Type::function(params, return_type))
}

fn any_method(return_type: Type) -> Option<Type> {
    Some(Type::Function(FunctionType::variadic(return_type)))
}

fn element(elements: &[Type], index: usize) -> Type {
    elements.get(index).cloned().unwrap_or(Type::Unknown)
}

pub fn container_attribute(kind: ContainerKind, elements: &[Type], name: &str) -> Option<Type> {
    if OBJECT_ATTRIBUTES.contains(&name) {
        return Some(Type::Unknown);
    }

    let this = Type::Container(kind, elements.to_vec());
    // Membership test, indexed lookup, length and iteration are shared by every kind.
    match name {
        "__len__" => return method(Vec::new(), Type::INT),
        "__contains__" => return method(vec![ParamType::positional("key", Type::Unknown)], Type::BOOL),
        "__iter__" => return any_method(Type::Unknown),
        _ => {}
    }

    match kind {
        ContainerKind::List => {
            let item = element(elements, 0);
            match name {
                "append" => method(vec![ParamType::positional("object", item)], Type::NONE),
                "extend" => method(
                    vec![ParamType::positional("iterable", Type::Unknown)],
                    Type::NONE,
                ),
                "insert" => method(
                    vec![
                        ParamType::positional("index", Type::INT),
                        ParamType::positional("object", item),
                    ],
                    Type::NONE,
                ),
                "remove" => method(vec![ParamType::positional("value", item)], Type::NONE),
                "pop" => method(vec![ParamType::optional("index", Type::INT)], item),
                "index" => method(
                    vec![
                        ParamType::positional("value", item),
                        ParamType::optional("start", Type::INT),
                        ParamType::optional("stop", Type::INT),
                    ],
                    Type::INT,
                ),
                "count" => method(vec![ParamType::positional("value", item)], Type::INT),
                "sort" => {
                    let mut signature = FunctionType::new(Vec::new(), Type::NONE);
                    signature.keywords = true;
                    Some(Type::Function(signature))
                }
                "reverse" | "clear" => method(Vec::new(), Type::NONE),
                "copy" => method(Vec::new(), this),
                "__getitem__" => method(vec![ParamType::positional("index", Type::Unknown)], item),
                "__setitem__" => method(
                    vec![
                        ParamType::positional("index", Type::Unknown),
                        ParamType::positional("value", item),
                    ],
                    Type::NONE,
                ),
                _ => None,
            }
        }
        ContainerKind::Dict => {
            let key = element(elements, 0);
            let value = element(elements, 1);
            match name {
                "keys" | "values" | "items" => method(Vec::new(), Type::Unknown),
                "get" => method(
                    vec![
                        ParamType::positional("key", key),
                        ParamType::optional("default", Type::Unknown),
                    ],
                    Type::Unknown,
                ),
                "pop" => method(
                    vec![
                        ParamType::positional("key", key),
                        ParamType::optional("default", Type::Unknown),
                    ],
                    value,
                ),
                "popitem" => method(Vec::new(), Type::tuple(vec![key, value])),
                "setdefault" => method(
                    vec![
                        ParamType::positional("key", key),
                        ParamType::optional("default", value.clone()),
                    ],
                    value,
                ),
                "update" => any_method(Type::NONE),
                "clear" => method(Vec::new(), Type::NONE),
                "copy" => method(Vec::new(), this),
                "fromkeys" => any_method(Type::Unknown),
                "__getitem__" => method(vec![ParamType::positional("key", key)], value),
                "__setitem__" => method(
                    vec![
                        ParamType::positional("key", key),
                        ParamType::positional("value", value),
                    ],
                    Type::NONE,
                ),
                _ => None,
            }
        }
        ContainerKind::Set => {
            let item = element(elements, 0);
            match name {
                "add" | "discard" | "remove" => {
                    method(vec![ParamType::positional("element", item)], Type::NONE)
                }
                "pop" => method(Vec::new(), item),
                "clear" => method(Vec::new(), Type::NONE),
                "copy" | "union" | "intersection" | "difference" | "symmetric_difference" => {
                    any_method(this)
                }
                "update"
                | "intersection_update"
                | "difference_update"
                | "symmetric_difference_update" => any_method(Type::NONE),
                "issubset" | "issuperset" | "isdisjoint" => method(
                    vec![ParamType::positional("other", Type::Unknown)],
                    Type::BOOL,
                ),
                _ => None,
            }
        }
        ContainerKind::Tuple | ContainerKind::VariadicTuple => match name {
            "count" => method(vec![ParamType::positional("value", Type::Unknown)], Type::INT),
            "index" => any_method(Type::INT),
            "__getitem__" => any_method(Type::Unknown),
            _ => None,
        },
    }
}

pub fn primitive_attribute(primitive: Primitive, name: &str) -> Option<Type> {
    if OBJECT_ATTRIBUTES.contains(&name) {
        return Some(Type::Unknown);
    }

    match primitive {
        Primitive::Str => str_attribute(name),
        Primitive::Bytes => bytes_attribute(name),
        Primitive::Int | Primitive::Bool => match name {
            "real" | "imag" | "numerator" | "denominator" => Some(Type::INT),
            "bit_length" | "bit_count" | "conjugate" => method(Vec::new(), Type::INT),
            "to_bytes" => any_method(Type::BYTES),
            "from_bytes" => any_method(Type::INT),
            "as_integer_ratio" => method(Vec::new(), Type::tuple(vec![Type::INT, Type::INT])),
            "is_integer" => method(Vec::new(), Type::BOOL),
            _ => None,
        },
        Primitive::Float => match name {
            "real" | "imag" => Some(Type::FLOAT),
            "conjugate" => method(Vec::new(), Type::FLOAT),
            "is_integer" => method(Vec::new(), Type::BOOL),
            "hex" => method(Vec::new(), Type::STR),
            "fromhex" => any_method(Type::FLOAT),
            "as_integer_ratio" => method(Vec::new(), Type::tuple(vec![Type::INT, Type::INT])),
            _ => None,
        },
        Primitive::None => match name {
            "__bool__" => method(Vec::new(), Type::BOOL),
            _ => None,
        },
    }
}

fn str_attribute(name: &str) -> Option<Type> {
    match name {
        "capitalize" | "casefold" | "center" | "expandtabs" | "format" | "format_map"
        | "join" | "ljust" | "lower" | "lstrip" | "removeprefix" | "removesuffix" | "replace"
        | "rjust" | "rstrip" | "strip" | "swapcase" | "title" | "translate" | "upper"
        | "zfill" => any_method(Type::STR),
        "endswith" | "startswith" | "isalnum" | "isalpha" | "isascii" | "isdecimal"
        | "isdigit" | "isidentifier" | "islower" | "isnumeric" | "isprintable" | "isspace"
        | "istitle" | "isupper" => any_method(Type::BOOL),
        "count" | "find" | "index" | "rfind" | "rindex" | "__len__" => any_method(Type::INT),
        "split" | "rsplit" | "splitlines" => any_method(Type::list(Type::STR)),
        "partition" | "rpartition" => {
            any_method(Type::tuple(vec![Type::STR, Type::STR, Type::STR]))
        }
        "encode" => any_method(Type::BYTES),
        "maketrans" => any_method(Type::Unknown),
        "__getitem__" => any_method(Type::STR),
        "__contains__" => any_method(Type::BOOL),
        "__iter__" => any_method(Type::Unknown),
        _ => None,
    }
}

fn bytes_attribute(name: &str) -> Option<Type> {
    match name {
        "decode" | "hex" => any_method(Type::STR),
        "endswith" | "startswith" | "isalnum" | "isalpha" | "isdigit" | "islower"
        | "isspace" | "isupper" => any_method(Type::BOOL),
        "count" | "find" | "index" | "rfind" | "rindex" | "__len__" => any_method(Type::INT),
        "join" | "lower" | "upper" | "strip" | "lstrip" | "rstrip" | "replace" => {
            any_method(Type::BYTES)
        }
        "split" | "rsplit" | "splitlines" => any_method(Type::list(Type::BYTES)),
        "__getitem__" => any_method(Type::Unknown),
        _ => None,
    }
}
