pub mod stubs;

use crate::scope::SymbolKind;
use crate::types::{FunctionType, ParamType, Type};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StubType {
    Any,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    Nil,
    ListAny,
    ListStr,
    DictAny,
    DictStr,
    SetAny,
    TupleAny,
    StrPair,
    Class(&'static str),
    Module(&'static str),
}

impl StubType {
    pub fn to_type(self) -> Type {
        match self {
            StubType::Any => Type::Unknown,
            StubType::Bool => Type::BOOL,
            StubType::Int => Type::INT,
            StubType::Float => Type::FLOAT,
            StubType::Str => Type::STR,
            StubType::Bytes => Type::BYTES,
            StubType::Nil => Type::NONE,
            StubType::ListAny => Type::list(Type::Unknown),
            StubType::ListStr => Type::list(Type::STR),
            StubType::DictAny => Type::dict(Type::Unknown, Type::Unknown),
            StubType::DictStr => Type::dict(Type::STR, Type::STR),
            StubType::SetAny => Type::set(Type::Unknown),
            StubType::TupleAny => Type::variadic_tuple(Type::Unknown),
            StubType::StrPair => Type::tuple(vec![Type::STR, Type::STR]),
            StubType::Class(name) => Type::Class(name.to_string()),
            StubType::Module(name) => Type::Module {
                name: name.to_string(),
                resolved: true,
            },
        }
    }
}

/// A parameter as `(name, type)`.
pub type StubParam = (&'static str, StubType);

#[derive(Clone, Copy, Debug)]
pub struct StubFunction {
    pub name: &'static str,
    pub params: &'static [StubParam],
    /// Leading parameters that must be supplied; the rest are optional.
    pub required: usize,
    pub variadic: bool,
    pub return_type: StubType,
}

pub const fn function(
    name: &'static str,
    params: &'static [StubParam],
    required: usize,
    return_type: StubType,
) -> StubFunction {
    StubFunction {
        name,
        params,
        required,
        variadic: false,
        return_type,
    }
}

/// A function that accepts any positional and keyword arguments.
pub const fn open_function(name: &'static str, return_type: StubType) -> StubFunction {
    StubFunction {
        name,
        params: &[],
        required: 0,
        variadic: true,
        return_type,
    }
}

impl StubFunction {
    pub fn signature(&self) -> Type {
        if self.variadic {
            return Type::Function(FunctionType::variadic(self.return_type.to_type()));
        }
        let params = self
            .params
            .iter()
            .enumerate()
            .map(|(index, &(name, ty))| {
                if index < self.required {
                    ParamType::positional(name, ty.to_type())
                } else {
                    ParamType::optional(name, ty.to_type())
                }
            })
            .collect();
        let mut signature = FunctionType::new(params, self.return_type.to_type());
        // Builtins written in C routinely take keyword flags (`sorted(key=...)`).
        signature.keywords = true;
        Type::Function(signature)
    }
}

use self::StubType::{Any, Bool, Int, Str};

pub static BUILTIN_FUNCTIONS: &[StubFunction] = &[
    open_function("print", StubType::Nil),
    function("len", &[("obj", Any)], 1, Int),
    function("str", &[("object", Any), ("encoding", Str), ("errors", Str)], 0, Str),
    function("int", &[("x", Any), ("base", Int)], 0, Int),
    function("float", &[("x", Any)], 0, StubType::Float),
    function("bool", &[("x", Any)], 0, Bool),
    function("bytes", &[("source", Any), ("encoding", Str), ("errors", Str)], 0, StubType::Bytes),
    function("list", &[("iterable", Any)], 0, StubType::ListAny),
    open_function("dict", StubType::DictAny),
    function("set", &[("iterable", Any)], 0, StubType::SetAny),
    function("frozenset", &[("iterable", Any)], 0, StubType::SetAny),
    function("tuple", &[("iterable", Any)], 0, StubType::TupleAny),
    function("range", &[("start", Int), ("stop", Int), ("step", Int)], 1, Any),
    function("enumerate", &[("iterable", Any), ("start", Int)], 1, Any),
    open_function("zip", Any),
    function("sorted", &[("iterable", Any)], 1, StubType::ListAny),
    function("reversed", &[("sequence", Any)], 1, Any),
    function("sum", &[("iterable", Any), ("start", Any)], 1, Any),
    open_function("min", Any),
    open_function("max", Any),
    function("abs", &[("x", Any)], 1, Any),
    function("round", &[("number", Any), ("ndigits", Int)], 1, Any),
    function("divmod", &[("a", Any), ("b", Any)], 2, StubType::TupleAny),
    function("pow", &[("base", Any), ("exp", Any), ("mod", Any)], 2, Any),
    function("isinstance", &[("obj", Any), ("class_or_tuple", Any)], 2, Bool),
    function("issubclass", &[("cls", Any), ("class_or_tuple", Any)], 2, Bool),
    function("callable", &[("obj", Any)], 1, Bool),
    function("repr", &[("obj", Any)], 1, Str),
    function("ascii", &[("obj", Any)], 1, Str),
    function("format", &[("value", Any), ("format_spec", Str)], 1, Str),
    function("chr", &[("i", Int)], 1, Str),
    function("ord", &[("c", Any)], 1, Int),
    function("hex", &[("number", Int)], 1, Str),
    function("bin", &[("number", Int)], 1, Str),
    function("oct", &[("number", Int)], 1, Str),
    function("input", &[("prompt", Any)], 0, Str),
    open_function("open", Any),
    open_function("type", Any),
    open_function("super", Any),
    function("id", &[("obj", Any)], 1, Int),
    function("hash", &[("obj", Any)], 1, Int),
    function("iter", &[("obj", Any), ("sentinel", Any)], 1, Any),
    function("next", &[("iterator", Any), ("default", Any)], 1, Any),
    function("any", &[("iterable", Any)], 1, Bool),
    function("all", &[("iterable", Any)], 1, Bool),
    open_function("map", Any),
    function("filter", &[("function", Any), ("iterable", Any)], 2, Any),
    function("getattr", &[("obj", Any), ("name", Str), ("default", Any)], 2, Any),
    function("setattr", &[("obj", Any), ("name", Str), ("value", Any)], 3, StubType::Nil),
    function("hasattr", &[("obj", Any), ("name", Str)], 2, Bool),
    function("delattr", &[("obj", Any), ("name", Str)], 2, StubType::Nil),
    open_function("vars", StubType::DictAny),
    open_function("dir", StubType::ListStr),
    open_function("globals", StubType::DictAny),
    open_function("locals", StubType::DictAny),
    open_function("exec", StubType::Nil),
    open_function("eval", Any),
];

pub static BUILTIN_CLASSES: &[&str] = &[
    "object",
    "BaseException",
    "Exception",
    "ArithmeticError",
    "AssertionError",
    "AttributeError",
    "EOFError",
    "FileExistsError",
    "FileNotFoundError",
    "ImportError",
    "IndexError",
    "IOError",
    "KeyError",
    "KeyboardInterrupt",
    "LookupError",
    "ModuleNotFoundError",
    "NameError",
    "NotImplementedError",
    "OSError",
    "OverflowError",
    "PermissionError",
    "RecursionError",
    "RuntimeError",
    "StopIteration",
    "SystemExit",
    "TimeoutError",
    "TypeError",
    "UnicodeDecodeError",
    "UnicodeEncodeError",
    "ValueError",
    "ZeroDivisionError",
    "Warning",
    "UserWarning",
    "DeprecationWarning",
];

/// Names that exist in every module but carry no useful static shape.
pub static BUILTIN_VALUES: &[(&str, StubType)] = &[
    ("__name__", Str),
    ("__file__", Str),
    ("__doc__", Any),
    ("__builtins__", Any),
    ("staticmethod", Any),
    ("classmethod", Any),
    ("property", Any),
    ("NotImplemented", Any),
    ("Ellipsis", Any),
];

pub fn find_function(name: &str) -> Option<&'static StubFunction> {
    BUILTIN_FUNCTIONS.iter().find(|function| function.name == name)
}

/// Every builtin binding as `(name, kind, type)`, in a fixed order.
pub fn builtin_symbols() -> impl Iterator<Item = (&'static str, SymbolKind, Type)> {
    let functions = BUILTIN_FUNCTIONS
        .iter()
        .map(|function| (function.name, SymbolKind::Function, function.signature()));
    let classes = BUILTIN_CLASSES
        .iter()
        .map(|&name| (name, SymbolKind::Class, Type::Class(name.to_string())));
    let values = BUILTIN_VALUES
        .iter()
        .map(|&(name, ty)| (name, SymbolKind::Variable, ty.to_type()));
    functions.chain(classes).chain(values)
}
