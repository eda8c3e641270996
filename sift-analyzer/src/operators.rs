//! Operator compatibility table for binary and unary expressions.
//!
//! Each lookup answers `Some(result)` for a legal combination and `None` for an
//! incompatible one. `Unknown` operands are absorbing and always legal.

use crate::ast::{BinaryOperator, UnaryOperator};
use crate::types::{join, join_all, ContainerKind, Primitive, Type};

pub fn binary_result(operator: BinaryOperator, left: &Type, right: &Type) -> Option<Type> {
    if left.is_unknown() || right.is_unknown() {
        return Some(Type::Unknown);
    }

    match operator {
        BinaryOperator::And | BinaryOperator::Or => Some(join(left, right)),
        BinaryOperator::Equal
        | BinaryOperator::NotEqual
        | BinaryOperator::Is
        | BinaryOperator::IsNot => Some(Type::BOOL),
        BinaryOperator::In | BinaryOperator::NotIn => membership(left, right),
        BinaryOperator::Less
        | BinaryOperator::LessEqual
        | BinaryOperator::Greater
        | BinaryOperator::GreaterEqual => ordering(left, right),
        _ => arithmetic(operator, left, right),
    }
}

pub fn unary_result(operator: UnaryOperator, operand: &Type) -> Option<Type> {
    match (operator, operand) {
        (UnaryOperator::Not, _) => Some(Type::BOOL),
        (_, Type::Unknown | Type::ClassInstance(_)) => Some(Type::Unknown),
        (UnaryOperator::Positive | UnaryOperator::Negative, Type::Primitive(primitive)) => {
            match primitive {
                Primitive::Bool | Primitive::Int => Some(Type::INT),
                Primitive::Float => Some(Type::FLOAT),
                _ => None,
            }
        }
        (UnaryOperator::Invert, Type::Primitive(Primitive::Bool | Primitive::Int)) => {
            Some(Type::INT)
        }
        _ => None,
    }
}

fn membership(left: &Type, right: &Type) -> Option<Type> {
    match right {
        Type::Container(..) | Type::ClassInstance(_) => Some(Type::BOOL),
        Type::Primitive(Primitive::Str) => match left {
            Type::Primitive(Primitive::Str) | Type::ClassInstance(_) => Some(Type::BOOL),
            _ => None,
        },
        Type::Primitive(Primitive::Bytes) => match left {
            Type::Primitive(Primitive::Bytes | Primitive::Int) => Some(Type::BOOL),
            _ => None,
        },
        _ => None,
    }
}

fn ordering(left: &Type, right: &Type) -> Option<Type> {
    match (left, right) {
        (Type::ClassInstance(_), _) | (_, Type::ClassInstance(_)) => Some(Type::BOOL),
        _ if left.is_numeric() && right.is_numeric() => Some(Type::BOOL),
        (Type::Primitive(a), Type::Primitive(b))
            if a == b && matches!(a, Primitive::Str | Primitive::Bytes) =>
        {
            Some(Type::BOOL)
        }
        (Type::Container(a, _), Type::Container(b, _))
            if a == b && *a != ContainerKind::Dict =>
        {
            Some(Type::BOOL)
        }
        _ => None,
    }
}

fn arithmetic(operator: BinaryOperator, left: &Type, right: &Type) -> Option<Type> {
    if matches!(left, Type::ClassInstance(_)) || matches!(right, Type::ClassInstance(_)) {
        // User classes may overload any operator.
        return Some(Type::Unknown);
    }

    match (left, right) {
        (Type::Primitive(a), Type::Primitive(b)) => primitive_arithmetic(operator, *a, *b),
        (Type::Container(kind, elements), Type::Primitive(p))
        | (Type::Primitive(p), Type::Container(kind, elements)) => {
            let repeat = operator == BinaryOperator::Multiply
                && matches!(p, Primitive::Int | Primitive::Bool)
                && (*kind == ContainerKind::List || kind.is_tuple());
            repeat.then(|| match kind {
                ContainerKind::List => Type::Container(*kind, elements.clone()),
                _ => Type::variadic_tuple(join_all(elements.iter()).unwrap_or(Type::Unknown)),
            })
        }
        (Type::Container(kind_a, elements_a), Type::Container(kind_b, elements_b))
            if kind_a.is_tuple() && kind_b.is_tuple() =>
        {
            (operator == BinaryOperator::Add)
                .then(|| concatenate_tuples(*kind_a, elements_a, *kind_b, elements_b))
        }
        (Type::Container(kind_a, elements_a), Type::Container(kind_b, elements_b))
            if kind_a == kind_b =>
        {
            container_arithmetic(operator, *kind_a, elements_a, elements_b)
        }
        _ => None,
    }
}

fn primitive_arithmetic(operator: BinaryOperator, left: Primitive, right: Primitive) -> Option<Type> {
    use Primitive::{Bool, Bytes, Float, Int, Str};

    let numeric = |p: Primitive| matches!(p, Bool | Int | Float);
    let integral = |p: Primitive| matches!(p, Bool | Int);

    match operator {
        BinaryOperator::Add => match (left, right) {
            (Str, Str) => Some(Type::STR),
            (Bytes, Bytes) => Some(Type::BYTES),
            _ if numeric(left) && numeric(right) => Some(widen(left, right)),
            _ => None,
        },
        BinaryOperator::Multiply => match (left, right) {
            (Str, p) | (p, Str) if integral(p) => Some(Type::STR),
            (Bytes, p) | (p, Bytes) if integral(p) => Some(Type::BYTES),
            _ if numeric(left) && numeric(right) => Some(widen(left, right)),
            _ => None,
        },
        BinaryOperator::Modulo => match left {
            // printf-style formatting accepts any right operand
            Str => Some(Type::STR),
            Bytes => Some(Type::BYTES),
            _ if numeric(left) && numeric(right) => Some(widen(left, right)),
            _ => None,
        },
        BinaryOperator::Divide => (numeric(left) && numeric(right)).then_some(Type::FLOAT),
        BinaryOperator::Subtract | BinaryOperator::FloorDivide | BinaryOperator::Power => {
            (numeric(left) && numeric(right)).then(|| widen(left, right))
        }
        BinaryOperator::BitAnd | BinaryOperator::BitOr | BinaryOperator::BitXor => {
            match (left, right) {
                (Bool, Bool) => Some(Type::BOOL),
                _ if integral(left) && integral(right) => Some(Type::INT),
                _ => None,
            }
        }
        BinaryOperator::LeftShift | BinaryOperator::RightShift => {
            (integral(left) && integral(right)).then_some(Type::INT)
        }
        _ => None,
    }
}

fn widen(left: Primitive, right: Primitive) -> Type {
    if left == Primitive::Float || right == Primitive::Float {
        Type::FLOAT
    } else {
        Type::INT
    }
}

fn concatenate_tuples(
    left_kind: ContainerKind,
    left: &[Type],
    right_kind: ContainerKind,
    right: &[Type],
) -> Type {
    if left_kind == ContainerKind::Tuple && right_kind == ContainerKind::Tuple {
        let mut elements = left.to_vec();
        elements.extend(right.iter().cloned());
        return Type::tuple(elements);
    }
    Type::variadic_tuple(join_all(left.iter().chain(right)).unwrap_or(Type::Unknown))
}

fn container_arithmetic(
    operator: BinaryOperator,
    kind: ContainerKind,
    left: &[Type],
    right: &[Type],
) -> Option<Type> {
    let joined = || -> Vec<Type> {
        if left.len() == right.len() {
            left.iter().zip(right.iter()).map(|(a, b)| join(a, b)).collect()
        } else {
            vec![Type::Unknown; left.len()]
        }
    };

    match (operator, kind) {
        (BinaryOperator::Add, ContainerKind::List) => Some(Type::Container(kind, joined())),
        (
            BinaryOperator::BitOr
            | BinaryOperator::BitAnd
            | BinaryOperator::BitXor
            | BinaryOperator::Subtract,
            ContainerKind::Set,
        ) => Some(Type::Container(kind, joined())),
        (BinaryOperator::BitOr, ContainerKind::Dict) => Some(Type::Container(kind, joined())),
        _ => None,
    }
}
