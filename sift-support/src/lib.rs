use std::borrow::Cow;
use std::fmt;

fn escape_single_quotes(input: &str) -> Cow<'_, str> {
    if input.contains('\'') {
        Cow::Owned(input.replace('\'', "\\'"))
    } else {
        Cow::Borrowed(input)
    }
}

fn format_operation_error(
    component: &str,
    operation: &str,
    target: Option<&str>,
    error: impl fmt::Display,
) -> String {
    match target {
        Some(target) => {
            let escaped = escape_single_quotes(target);
            format!("{component}.{operation}('{}') failed: {error}", escaped)
        }
        None => format!("{component}.{operation} failed: {error}"),
    }
}

/// Reading or decoding a syntax tree file.
pub fn load_error(path: &str, error: impl fmt::Display) -> String {
    format_operation_error("sift", "load", Some(path), error)
}

/// Reading or decoding a module index.
pub fn index_error(path: &str, error: impl fmt::Display) -> String {
    format_operation_error("sift", "index", Some(path), error)
}

/// Reading or decoding analyzer configuration.
pub fn config_error(path: &str, error: impl fmt::Display) -> String {
    format_operation_error("sift", "config", Some(path), error)
}

pub fn analyze_error(path: &str, error: impl fmt::Display) -> String {
    format_operation_error("sift", "analyze", Some(path), error)
}

pub fn render_error(error: impl fmt::Display) -> String {
    format_operation_error("sift", "render", None, error)
}
