mod common;

use common::*;
use sift_analyzer::{
    BinaryOperator, DiagnosticCode, Expression, ExpressionKind, UnaryExpression, UnaryOperator,
};

/// class User:
///     def __init__(self, name: str):
///         self.name = name
fn user_class() -> sift_analyzer::Statement {
    class(
        1,
        "User",
        vec![],
        vec![function(
            2,
            5,
            "__init__",
            vec![param(2, 18, "self", None), param(2, 24, "name", Some("str"))],
            None,
            vec![assign(
                attribute(name(3, 9, "self"), "name"),
                name(3, 21, "name"),
            )],
        )],
    )
}

#[test]
fn annotated_assignment_rejects_incompatible_value() {
    let tree = module(vec![ann_assign(
        name(1, 1, "count"),
        annotation(1, 8, "int"),
        Some(string(1, 14, "many")),
    )]);

    let report = analyze(&tree);
    assert_eq!(codes(&report), vec![DiagnosticCode::TypeMismatch]);
    assert_eq!(
        report.diagnostics[0].message,
        "assignment to 'count': expected int, found str"
    );
    assert_eq!(report.diagnostics[0].span, span(1, 14, 20));
}

#[test]
fn reassigning_an_annotated_name_is_checked() {
    let tree = module(vec![
        ann_assign(name(1, 1, "ratio"), annotation(1, 8, "float"), Some(int(1, 16, 1))),
        assign(name(2, 1, "ratio"), string(2, 9, "half")),
    ]);

    let report = analyze(&tree);
    assert_eq!(codes(&report), vec![DiagnosticCode::TypeMismatch]);
    assert_eq!(
        report.diagnostics[0].message,
        "assignment to 'ratio': expected float, found str"
    );
}

#[test]
fn adding_int_and_str_names_both_operands() {
    let tree = module(vec![expr_stmt(binary(
        BinaryOperator::Add,
        int(1, 1, 1),
        string(1, 5, "a"),
    ))]);

    let report = analyze(&tree);
    assert_eq!(messages(&report), vec!["unsupported operand types for +: 'int' and 'str'"]);
}

#[test]
fn unknown_operands_never_mismatch() {
    let tree = module(vec![
        import(1, &["vendored"]),
        expr_stmt(binary(
            BinaryOperator::Add,
            attribute(name(2, 1, "vendored"), "value"),
            string(2, 18, "x"),
        )),
    ]);

    let report = analyze(&tree);
    assert_eq!(codes(&report), vec![DiagnosticCode::UnresolvedImport]);
}

#[test]
fn mismatch_does_not_cascade_through_the_result() {
    // total = 1 + "a"
    // total - 2
    let tree = module(vec![
        assign(
            name(1, 1, "total"),
            binary(BinaryOperator::Add, int(1, 9, 1), string(1, 13, "a")),
        ),
        expr_stmt(binary(BinaryOperator::Subtract, name(2, 1, "total"), int(2, 9, 2))),
    ]);

    let report = analyze(&tree);
    assert_eq!(codes(&report), vec![DiagnosticCode::TypeMismatch]);
}

fn greet() -> sift_analyzer::Statement {
    // def greet(name: str) -> None:
    //     print(name)
    function(
        1,
        1,
        "greet",
        vec![param(1, 11, "name", Some("str"))],
        Some("None"),
        vec![expr_stmt(call(name(2, 5, "print"), vec![name(2, 11, "name")]))],
    )
}

#[test]
fn argument_type_mismatch_names_the_position() {
    let tree = module(vec![greet(), expr_stmt(call(name(3, 1, "greet"), vec![int(3, 7, 42)]))]);

    let report = analyze(&tree);
    assert_eq!(codes(&report), vec![DiagnosticCode::ArgumentTypeMismatch]);
    assert_eq!(
        report.diagnostics[0].message,
        "argument 1 to 'greet': expected str, found int"
    );
    assert_eq!(report.diagnostics[0].span, span(3, 7, 9));
}

#[test]
fn too_many_arguments_is_a_count_mismatch() {
    let tree = module(vec![
        greet(),
        expr_stmt(call(
            name(3, 1, "greet"),
            vec![string(3, 7, "a"), string(3, 12, "b")],
        )),
    ]);

    let report = analyze(&tree);
    assert_eq!(codes(&report), vec![DiagnosticCode::ArgumentCountMismatch]);
    assert_eq!(
        report.diagnostics[0].message,
        "function 'greet' expected 1 arguments but got 2"
    );
}

#[test]
fn unexpected_keyword_is_reported() {
    let tree = module(vec![
        greet(),
        expr_stmt(call_with(
            name(3, 1, "greet"),
            vec![positional(string(3, 7, "a")), keyword("loud", boolean(3, 17, true))],
        )),
    ]);

    let report = analyze(&tree);
    assert_eq!(
        messages(&report),
        vec!["function 'greet' got an unexpected keyword argument 'loud'"]
    );
}

#[test]
fn keyword_arguments_satisfy_parameters_by_name() {
    let tree = module(vec![
        greet(),
        expr_stmt(call_with(
            name(3, 1, "greet"),
            vec![keyword("name", string(3, 12, "a"))],
        )),
    ]);

    assert!(analyze(&tree).diagnostics.is_empty());
}

#[test]
fn missing_instance_attribute_is_an_attribute_error() {
    // user = User("ada")
    // user.name.upper()
    // user.email
    let tree = module(vec![
        user_class(),
        assign(
            name(4, 1, "user"),
            call(name(4, 8, "User"), vec![string(4, 13, "ada")]),
        ),
        expr_stmt(call(attribute(attribute(name(5, 1, "user"), "name"), "upper"), vec![])),
        expr_stmt(attribute(name(6, 1, "user"), "email")),
    ]);

    let report = analyze(&tree);
    assert_eq!(codes(&report), vec![DiagnosticCode::AttributeError]);
    assert_eq!(
        report.diagnostics[0].message,
        "'User' has no attribute 'email'"
    );
    assert_eq!(report.diagnostics[0].span, span(6, 6, 11));
}

#[test]
fn constructor_arity_comes_from_init() {
    let tree = module(vec![user_class(), expr_stmt(call(name(4, 1, "User"), vec![]))]);

    let report = analyze(&tree);
    assert_eq!(
        messages(&report),
        vec!["function 'User' expected 1 arguments but got 0"]
    );
}

#[test]
fn subclasses_inherit_members_and_are_assignable() {
    // class Admin(User):
    //     pass
    // admin: User = Admin("root")
    // admin.name
    let tree = module(vec![
        user_class(),
        class(4, "Admin", vec![name(4, 13, "User")], vec![pass(5, 5)]),
        ann_assign(
            name(6, 1, "admin"),
            annotation(6, 8, "User"),
            Some(call(name(6, 15, "Admin"), vec![string(6, 21, "root")])),
        ),
        expr_stmt(attribute(name(7, 1, "admin"), "name")),
    ]);

    let report = analyze(&tree);
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
}

#[test]
fn list_indices_must_be_integers() {
    let tree = module(vec![
        assign(name(1, 1, "items"), list(1, 9, vec![int(1, 10, 1), int(1, 13, 2)])),
        expr_stmt(subscript(name(2, 1, "items"), string(2, 7, "a"))),
    ]);

    let report = analyze(&tree);
    assert_eq!(
        messages(&report),
        vec!["list indices must be integers, not 'str'"]
    );
}

#[test]
fn negating_a_string_is_a_mismatch() {
    let negated = Expression::new(
        span(1, 1, 5),
        ExpressionKind::Unary(UnaryExpression {
            operator: UnaryOperator::Negative,
            operand: Box::new(string(1, 2, "ab")),
        }),
    );
    let report = analyze(&module(vec![expr_stmt(negated)]));
    assert_eq!(messages(&report), vec!["bad operand type for unary -: 'str'"]);
}

#[test]
fn calling_an_int_is_a_mismatch() {
    let tree = module(vec![
        assign(name(1, 1, "limit"), int(1, 9, 5)),
        expr_stmt(call(name(2, 1, "limit"), vec![])),
    ]);

    let report = analyze(&tree);
    assert_eq!(codes(&report), vec![DiagnosticCode::TypeMismatch]);
    assert_eq!(report.diagnostics[0].message, "'int' object is not callable");
}

#[test]
fn default_values_must_match_the_annotation() {
    let tree = module(vec![function(
        1,
        1,
        "retry",
        vec![with_default(param(1, 11, "times", Some("int")), string(1, 24, "3"))],
        None,
        vec![pass(2, 5)],
    )]);

    let report = analyze(&tree);
    assert_eq!(
        messages(&report),
        vec!["default value for parameter 'times' in function 'retry': expected int, found str"]
    );
}

#[test]
fn primitive_receivers_have_closed_attribute_sets() {
    let tree = module(vec![expr_stmt(attribute(string(1, 1, "abc"), "shout"))]);

    let report = analyze(&tree);
    assert_eq!(codes(&report), vec![DiagnosticCode::AttributeError]);
    assert_eq!(report.diagnostics[0].message, "'str' has no attribute 'shout'");
}

#[test]
fn module_attributes_come_from_the_descriptor() {
    let tree = module(vec![
        import(1, &["math"]),
        expr_stmt(call(attribute(name(2, 1, "math"), "sqrt"), vec![float(2, 11, 2.5)])),
        expr_stmt(attribute(name(3, 1, "math"), "nothing")),
    ]);

    let report = analyze(&tree);
    assert_eq!(
        messages(&report),
        vec!["module 'math' has no attribute 'nothing'"]
    );
}

#[test]
fn property_access_yields_the_return_type() {
    // class Box:
    //     @property
    //     def size(self) -> int:
    //         return 1
    // Box().size + "x"
    let size = decorated(
        function(
            3,
            5,
            "size",
            vec![param(3, 14, "self", None)],
            Some("int"),
            vec![ret(4, 9, Some(int(4, 16, 1)))],
        ),
        name(2, 6, "property"),
    );
    let tree = module(vec![
        class(1, "Box", vec![], vec![size]),
        expr_stmt(binary(
            BinaryOperator::Add,
            attribute(call(name(5, 1, "Box"), vec![]), "size"),
            string(5, 14, "x"),
        )),
    ]);

    let report = analyze(&tree);
    assert_eq!(
        messages(&report),
        vec!["unsupported operand types for +: 'int' and 'str'"]
    );
}

#[test]
fn bare_list_parameter_annotation_warns() {
    let tree = module(vec![
        from_import(1, "typing", &["List"]),
        function(
            2,
            1,
            "total",
            vec![param(2, 11, "values", Some("List"))],
            None,
            vec![pass(3, 5)],
        ),
    ]);

    let report = analyze(&tree);
    assert_eq!(codes(&report), vec![DiagnosticCode::MissingTypeParameters]);
    assert_eq!(
        report.diagnostics[0].message,
        "missing type parameters for generic type 'List'"
    );
}

/// def <function>():
///     class Node:
///         def <method>(self):
///             pass
///     Node().<called>()
fn local_node(line: usize, function_name: &str, method: &str, called: &str) -> sift_analyzer::Statement {
    function(
        line,
        1,
        function_name,
        vec![],
        None,
        vec![
            class(
                line + 1,
                "Node",
                vec![],
                vec![function(
                    line + 2,
                    9,
                    method,
                    vec![param(line + 2, 14 + method.len(), "self", None)],
                    None,
                    vec![pass(line + 3, 13)],
                )],
            ),
            expr_stmt(call(
                attribute(call(name(line + 4, 5, "Node"), vec![]), called),
                vec![],
            )),
        ],
    )
}

#[test]
fn same_named_local_classes_keep_their_own_members() {
    let tree = module(vec![
        local_node(1, "build_list", "push", "push"),
        local_node(6, "build_tree", "grow", "grow"),
    ]);

    let report = analyze(&tree);
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
}

#[test]
fn local_class_members_do_not_leak_between_functions() {
    let tree = module(vec![
        local_node(1, "build_list", "push", "grow"),
        local_node(6, "build_tree", "grow", "grow"),
    ]);

    let report = analyze(&tree);
    assert_eq!(codes(&report), vec![DiagnosticCode::AttributeError]);
    assert_eq!(
        report.diagnostics[0].message,
        "'Node' has no attribute 'grow'"
    );
    assert_eq!(report.diagnostics[0].span.line, 5);
}

/// class Cache:
///     def __init__(self): self.data = None
///     def load(self): self.data = {}
///     def read(self): self.data.get("k")
/// with the methods emitted in `order`.
fn cache_class(order: &[&str]) -> sift_analyzer::Statement {
    let methods = order
        .iter()
        .enumerate()
        .map(|(position, method)| {
            let line = 2 + position * 2;
            let self_data = attribute(name(line + 1, 9, "self"), "data");
            let body = match *method {
                "__init__" => assign(self_data, none(line + 1, 21)),
                "load" => assign(self_data, dict(line + 1, 21, vec![])),
                _ => expr_stmt(call(
                    attribute(self_data, "get"),
                    vec![string(line + 1, 23, "k")],
                )),
            };
            function(
                line,
                5,
                method,
                vec![param(line, 10 + method.len(), "self", None)],
                None,
                vec![body],
            )
        })
        .collect();
    class(1, "Cache", vec![], methods)
}

#[test]
fn attribute_inference_ignores_method_order() {
    let declared = analyze(&module(vec![cache_class(&["__init__", "load", "read"])]));
    let reversed = analyze(&module(vec![cache_class(&["read", "load", "__init__"])]));

    assert!(declared.diagnostics.is_empty(), "{:?}", declared.diagnostics);
    assert_eq!(codes(&declared), codes(&reversed));
    assert_eq!(messages(&declared), messages(&reversed));
}

#[test]
fn negating_the_smallest_int_literal_does_not_overflow() {
    // pair = (1, "a")
    // pair[-(-9223372036854775808)]
    let index = Expression::new(
        span(2, 6, 29),
        ExpressionKind::Unary(UnaryExpression {
            operator: UnaryOperator::Negative,
            operand: Box::new(int(2, 8, i64::MIN)),
        }),
    );
    let tree = module(vec![
        assign(name(1, 1, "pair"), tuple(1, 8, vec![int(1, 9, 1), string(1, 12, "a")])),
        expr_stmt(subscript(name(2, 1, "pair"), index)),
    ]);

    let report = analyze(&tree);
    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
}

#[test]
fn fixed_and_variadic_tuple_annotations_differ() {
    // single: tuple[int] = (1, 2)
    // many: tuple[int, ...] = (1, 2)
    // mixed: tuple[int, ...] = (1, "a")
    let tree = module(vec![
        ann_assign(
            name(1, 1, "single"),
            generic(1, 9, "tuple", vec![annotation(1, 15, "int")]),
            Some(tuple(1, 22, vec![int(1, 23, 1), int(1, 26, 2)])),
        ),
        ann_assign(
            name(2, 1, "many"),
            generic(2, 7, "tuple", vec![annotation(2, 13, "int"), annotation(2, 18, "...")]),
            Some(tuple(2, 25, vec![int(2, 26, 1), int(2, 29, 2)])),
        ),
        ann_assign(
            name(3, 1, "mixed"),
            generic(3, 8, "tuple", vec![annotation(3, 14, "int"), annotation(3, 19, "...")]),
            Some(tuple(3, 26, vec![int(3, 27, 1), string(3, 30, "a")])),
        ),
    ]);

    let report = analyze(&tree);
    assert_eq!(
        codes(&report),
        vec![DiagnosticCode::TypeMismatch, DiagnosticCode::TypeMismatch]
    );
    assert_eq!(report.diagnostics[0].span.line, 1);
    assert_eq!(report.diagnostics[1].span.line, 3);
}

fn names_list() -> sift_analyzer::Statement {
    assign(name(1, 1, "names"), list(1, 9, vec![string(1, 10, "a"), string(1, 15, "b")]))
}

#[test]
fn comprehension_targets_take_the_element_type() {
    // shout = [n.upper() for n in names]
    // shout[0].missing
    let tree = module(vec![
        names_list(),
        assign(
            name(2, 1, "shout"),
            list_comp(
                2,
                9,
                call(attribute(name(2, 10, "n"), "upper"), vec![]),
                name(2, 24, "n"),
                name(2, 29, "names"),
            ),
        ),
        expr_stmt(attribute(subscript(name(3, 1, "shout"), int(3, 7, 0)), "missing")),
    ]);

    let report = analyze(&tree);
    assert_eq!(
        messages(&report),
        vec!["'str' has no attribute 'missing'"]
    );
}

#[test]
fn comprehension_targets_stay_inside_the_comprehension() {
    // squares = [n for n in names]
    // n
    let tree = module(vec![
        names_list(),
        assign(
            name(2, 1, "squares"),
            list_comp(2, 11, name(2, 12, "n"), name(2, 18, "n"), name(2, 23, "names")),
        ),
        expr_stmt(name(3, 1, "n")),
    ]);

    let report = analyze(&tree);
    assert_eq!(codes(&report), vec![DiagnosticCode::UndefinedName]);
    assert_eq!(report.diagnostics[0].span, span(3, 1, 2));
}

#[test]
fn slicing_a_list_keeps_the_list_type() {
    // tail = names[1:]
    // tail[0:1] = ["z"]
    // tail.upper()
    let tree = module(vec![
        names_list(),
        assign(
            name(2, 1, "tail"),
            subscript(name(2, 8, "names"), slice(2, 14, Some(int(2, 14, 1)), None)),
        ),
        assign(
            subscript(name(3, 1, "tail"), slice(3, 6, Some(int(3, 6, 0)), Some(int(3, 8, 1)))),
            list(3, 13, vec![string(3, 14, "z")]),
        ),
        expr_stmt(call(attribute(name(4, 1, "tail"), "upper"), vec![])),
    ]);

    let report = analyze(&tree);
    assert_eq!(codes(&report), vec![DiagnosticCode::AttributeError]);
    assert!(report.diagnostics[0].message.contains("'upper'"));
}

#[test]
fn starred_targets_collect_a_list() {
    // first, *rest = names
    // first.upper()
    // rest.upper()
    let tree = module(vec![
        names_list(),
        assign(
            tuple(2, 1, vec![name(2, 1, "first"), starred(2, 8, name(2, 9, "rest"))]),
            name(2, 16, "names"),
        ),
        expr_stmt(call(attribute(name(3, 1, "first"), "upper"), vec![])),
        expr_stmt(call(attribute(name(4, 1, "rest"), "upper"), vec![])),
    ]);

    let report = analyze(&tree);
    assert_eq!(codes(&report), vec![DiagnosticCode::AttributeError]);
    assert_eq!(report.diagnostics[0].span.line, 4);
}
