//! Property-based tests for the type lattice, the operator table and the
//! ordering guarantees of the full pipeline.

mod common;

use common::*;
use proptest::prelude::*;
use sift_analyzer::{
    binary_result, is_assignable, join, unary_result, BinaryOperator, ContainerKind,
    DiagnosticCode, Expression, Primitive, Statement, Type, UnaryOperator,
};

fn primitive() -> impl Strategy<Value = Primitive> {
    prop_oneof![
        Just(Primitive::Int),
        Just(Primitive::Float),
        Just(Primitive::Str),
        Just(Primitive::Bool),
        Just(Primitive::Bytes),
        Just(Primitive::None),
    ]
}

fn arb_type() -> impl Strategy<Value = Type> {
    let leaf = prop_oneof![
        primitive().prop_map(Type::Primitive),
        "[A-Z][a-z]{0,4}".prop_map(Type::ClassInstance),
        Just(Type::Unknown),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(Type::list),
            inner.clone().prop_map(Type::set),
            inner.clone().prop_map(Type::variadic_tuple),
            (inner.clone(), inner.clone()).prop_map(|(key, value)| Type::dict(key, value)),
            prop::collection::vec(inner, 0..3).prop_map(Type::tuple),
        ]
    })
}

fn binary_operator() -> impl Strategy<Value = BinaryOperator> {
    prop_oneof![
        Just(BinaryOperator::Add),
        Just(BinaryOperator::Subtract),
        Just(BinaryOperator::Multiply),
        Just(BinaryOperator::Divide),
        Just(BinaryOperator::FloorDivide),
        Just(BinaryOperator::Modulo),
        Just(BinaryOperator::Power),
        Just(BinaryOperator::BitAnd),
        Just(BinaryOperator::BitOr),
        Just(BinaryOperator::LeftShift),
        Just(BinaryOperator::Equal),
        Just(BinaryOperator::Less),
        Just(BinaryOperator::In),
        Just(BinaryOperator::And),
        Just(BinaryOperator::Or),
    ]
}

fn unary_operator() -> impl Strategy<Value = UnaryOperator> {
    prop_oneof![
        Just(UnaryOperator::Positive),
        Just(UnaryOperator::Negative),
        Just(UnaryOperator::Not),
        Just(UnaryOperator::Invert),
    ]
}

/// One literal of a random primitive kind at `column` on `line`.
fn literal_at(kind: u8, line: usize, column: usize) -> Expression {
    match kind % 4 {
        0 => int(line, column, 7),
        1 => float(line, column, 1.5),
        2 => string(line, column, "s"),
        _ => boolean(line, column, true),
    }
}

#[derive(Debug, Clone)]
enum Line {
    Assign { target: u8, literal: u8 },
    Print { name: u8 },
    Combine { operator: BinaryOperator, name: u8, literal: u8 },
}

fn arb_line() -> impl Strategy<Value = Line> {
    prop_oneof![
        (0u8..4, any::<u8>()).prop_map(|(target, literal)| Line::Assign { target, literal }),
        (0u8..6).prop_map(|name| Line::Print { name }),
        (binary_operator(), 0u8..6, any::<u8>())
            .prop_map(|(operator, name, literal)| Line::Combine { operator, name, literal }),
    ]
}

const NAMES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

fn lower(lines: &[Line]) -> Vec<Statement> {
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let number = index + 1;
            match line {
                Line::Assign { target, literal } => assign(
                    name(number, 1, NAMES[*target as usize]),
                    literal_at(*literal, number, 5),
                ),
                Line::Print { name: id } => expr_stmt(call(
                    name(number, 1, "print"),
                    vec![name(number, 7, NAMES[*id as usize])],
                )),
                Line::Combine {
                    operator,
                    name: id,
                    literal,
                } => expr_stmt(binary(
                    *operator,
                    name(number, 1, NAMES[*id as usize]),
                    literal_at(*literal, number, 10),
                )),
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn unknown_operands_are_always_legal(operator in binary_operator(), other in arb_type()) {
        prop_assert_eq!(binary_result(operator, &Type::Unknown, &other), Some(Type::Unknown));
        prop_assert_eq!(binary_result(operator, &other, &Type::Unknown), Some(Type::Unknown));
    }

    #[test]
    fn unary_operators_absorb_unknown(operator in unary_operator()) {
        prop_assert!(unary_result(operator, &Type::Unknown).is_some());
    }

    #[test]
    fn every_type_accepts_itself_and_unknown(ty in arb_type()) {
        prop_assert!(is_assignable(&ty, &ty, &()));
        prop_assert!(is_assignable(&ty, &Type::Unknown, &()));
        prop_assert!(is_assignable(&Type::Unknown, &ty, &()));
    }

    #[test]
    fn join_is_idempotent_and_commutative(left in arb_type(), right in arb_type()) {
        prop_assert_eq!(join(&left, &left), left.clone());
        prop_assert_eq!(join(&left, &right), join(&right, &left));
        prop_assert_eq!(join(&left, &Type::Unknown), Type::Unknown);
    }

    #[test]
    fn containers_of_different_kinds_never_assign(element in arb_type()) {
        let list = Type::Container(ContainerKind::List, vec![element.clone()]);
        let set = Type::Container(ContainerKind::Set, vec![element]);
        prop_assert!(!is_assignable(&list, &set, &()));
    }

    #[test]
    fn values_from_unresolved_modules_never_mismatch(
        operators in prop::collection::vec(binary_operator(), 1..8),
        literals in prop::collection::vec(any::<u8>(), 8),
    ) {
        // import vendored
        // value = vendored.thing
        // value <op> <literal>   (repeated)
        let mut body = vec![
            import(1, &["vendored"]),
            assign(name(2, 1, "value"), attribute(name(2, 9, "vendored"), "thing")),
        ];
        for (index, operator) in operators.iter().enumerate() {
            let line = index + 3;
            body.push(expr_stmt(binary(
                *operator,
                name(line, 1, "value"),
                literal_at(literals[index], line, 10),
            )));
        }

        let report = analyze(&module(body));
        prop_assert_eq!(codes(&report), vec![DiagnosticCode::UnresolvedImport]);
    }

    #[test]
    fn diagnostics_are_ordered_unique_and_deterministic(
        lines in prop::collection::vec(arb_line(), 0..12),
    ) {
        let tree = module(lower(&lines));
        let report = analyze(&tree);

        for pair in report.diagnostics.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let key_a = (a.span.line, a.span.column, a.code.priority());
            let key_b = (b.span.line, b.span.column, b.code.priority());
            prop_assert!(key_a <= key_b, "{:?} before {:?}", a, b);
        }

        let mut seen = std::collections::HashSet::new();
        for diagnostic in &report.diagnostics {
            prop_assert!(seen.insert((diagnostic.span, diagnostic.code)));
        }

        prop_assert_eq!(analyze(&tree), report);
    }
}
