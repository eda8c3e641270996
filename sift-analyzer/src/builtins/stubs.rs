use super::StubType::{Any, Bool, Float, Int, ListAny, ListStr, Nil, Str, StrPair};
use super::{function, open_function, StubFunction, StubType};
use crate::modules::ModuleDescriptor;

pub struct StubModule {
    pub name: &'static str,
    pub functions: &'static [StubFunction],
    pub values: &'static [(&'static str, StubType)],
}

impl StubModule {
    pub fn descriptor(&self) -> ModuleDescriptor {
        let mut descriptor = ModuleDescriptor::new(self.name);
        for function in self.functions {
            descriptor
                .exports
                .insert(function.name.to_string(), function.signature());
        }
        for &(name, ty) in self.values {
            descriptor.exports.insert(name.to_string(), ty.to_type());
        }
        descriptor
    }
}

const TYPING: StubModule = StubModule {
    name: "typing",
    functions: &[
        function("cast", &[("typ", Any), ("val", Any)], 2, Any),
        open_function("TypeVar", Any),
        open_function("NewType", Any),
        function("overload", &[("func", Any)], 1, Any),
        function("final", &[("f", Any)], 1, Any),
        open_function("NamedTuple", Any),
        open_function("TypedDict", Any),
    ],
    values: &[
        ("Any", Any),
        ("Callable", Any),
        ("ClassVar", Any),
        ("Dict", Any),
        ("Final", Any),
        ("FrozenSet", Any),
        ("Generic", Any),
        ("Iterable", Any),
        ("Iterator", Any),
        ("List", Any),
        ("Literal", Any),
        ("Mapping", Any),
        ("Optional", Any),
        ("Protocol", Any),
        ("Sequence", Any),
        ("Set", Any),
        ("Tuple", Any),
        ("Type", Any),
        ("Union", Any),
        ("TYPE_CHECKING", Bool),
    ],
};

const JSON: StubModule = StubModule {
    name: "json",
    functions: &[
        open_function("dumps", Str),
        open_function("loads", Any),
        open_function("dump", Nil),
        open_function("load", Any),
    ],
    values: &[
        ("JSONDecodeError", StubType::Class("JSONDecodeError")),
        ("JSONEncoder", StubType::Class("JSONEncoder")),
        ("JSONDecoder", StubType::Class("JSONDecoder")),
    ],
};

const OS: StubModule = StubModule {
    name: "os",
    functions: &[
        function("getcwd", &[], 0, Str),
        function("listdir", &[("path", Any)], 0, ListStr),
        function("getenv", &[("key", Str), ("default", Any)], 1, Any),
        open_function("mkdir", Nil),
        open_function("makedirs", Nil),
        function("remove", &[("path", Any)], 1, Nil),
        function("rename", &[("src", Any), ("dst", Any)], 2, Nil),
        function("chdir", &[("path", Any)], 1, Nil),
        open_function("walk", Any),
    ],
    values: &[
        ("path", StubType::Module("os.path")),
        ("environ", StubType::DictStr),
        ("sep", Str),
        ("linesep", Str),
        ("name", Str),
    ],
};

const OS_PATH: StubModule = StubModule {
    name: "os.path",
    functions: &[
        open_function("join", Str),
        function("exists", &[("path", Any)], 1, Bool),
        function("isfile", &[("path", Any)], 1, Bool),
        function("isdir", &[("path", Any)], 1, Bool),
        function("basename", &[("p", Any)], 1, Str),
        function("dirname", &[("p", Any)], 1, Str),
        function("abspath", &[("path", Any)], 1, Str),
        function("realpath", &[("path", Any)], 1, Str),
        function("expanduser", &[("path", Any)], 1, Str),
        function("splitext", &[("p", Any)], 1, StrPair),
        function("split", &[("p", Any)], 1, StrPair),
        function("getsize", &[("filename", Any)], 1, Int),
    ],
    values: &[("sep", Str)],
};

const SYS: StubModule = StubModule {
    name: "sys",
    functions: &[function("exit", &[("status", Any)], 0, Nil)],
    values: &[
        ("argv", ListStr),
        ("path", ListStr),
        ("version", Str),
        ("platform", Str),
        ("maxsize", Int),
        ("stdin", Any),
        ("stdout", Any),
        ("stderr", Any),
        ("modules", StubType::DictAny),
        ("version_info", Any),
    ],
};

const MATH: StubModule = StubModule {
    name: "math",
    functions: &[
        function("sqrt", &[("x", Float)], 1, Float),
        function("floor", &[("x", Float)], 1, Int),
        function("ceil", &[("x", Float)], 1, Int),
        function("trunc", &[("x", Float)], 1, Int),
        function("pow", &[("x", Float), ("y", Float)], 2, Float),
        function("exp", &[("x", Float)], 1, Float),
        function("log", &[("x", Float), ("base", Float)], 1, Float),
        function("log10", &[("x", Float)], 1, Float),
        function("log2", &[("x", Float)], 1, Float),
        function("sin", &[("x", Float)], 1, Float),
        function("cos", &[("x", Float)], 1, Float),
        function("tan", &[("x", Float)], 1, Float),
        function("fabs", &[("x", Float)], 1, Float),
        function("factorial", &[("n", Int)], 1, Int),
        function("gcd", &[("a", Int), ("b", Int)], 2, Int),
        function("isnan", &[("x", Float)], 1, Bool),
        function("isinf", &[("x", Float)], 1, Bool),
        open_function("isclose", Bool),
    ],
    values: &[("pi", Float), ("e", Float), ("tau", Float), ("inf", Float), ("nan", Float)],
};

const RE: StubModule = StubModule {
    name: "re",
    functions: &[
        function("compile", &[("pattern", Any), ("flags", Int)], 1, Any),
        function("match", &[("pattern", Any), ("string", Str), ("flags", Int)], 2, Any),
        function("search", &[("pattern", Any), ("string", Str), ("flags", Int)], 2, Any),
        function("fullmatch", &[("pattern", Any), ("string", Str), ("flags", Int)], 2, Any),
        function("findall", &[("pattern", Any), ("string", Str), ("flags", Int)], 2, ListAny),
        open_function("sub", Str),
        open_function("split", ListAny),
        function("escape", &[("pattern", Str)], 1, Str),
    ],
    values: &[
        ("IGNORECASE", Int),
        ("MULTILINE", Int),
        ("DOTALL", Int),
        ("VERBOSE", Int),
        ("I", Int),
        ("M", Int),
        ("S", Int),
        ("X", Int),
    ],
};

pub static STANDARD_MODULES: &[StubModule] = &[TYPING, JSON, OS, OS_PATH, SYS, MATH, RE];

pub fn standard_modules() -> impl Iterator<Item = ModuleDescriptor> {
    STANDARD_MODULES.iter().map(StubModule::descriptor)
}

/// `__future__` imports are compiler directives; every name is accepted.
pub fn is_future_module(name: &str) -> bool {
    name == "__future__"
}
