use std::path::PathBuf;

use structgrade::java::{
    JavaSourceParser, ParseFailure, SourceParser, SourceUnit, TypeKind, Visibility,
};

fn parse_fixture(path: &str) -> SourceUnit {
    let full = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(path);
    let code = std::fs::read_to_string(full).expect("read fixture");
    JavaSourceParser.parse(&code).expect("parse fixture")
}

fn call_names(unit: &SourceUnit, method: &str) -> Vec<String> {
    unit.methods_named(method)
        .flat_map(|m| m.calls())
        .map(|c| c.name.clone())
        .collect()
}

#[test]
fn reference_assignment_declarations() {
    let unit = parse_fixture("fixtures/java/animals/AccessingInterfaceMethodsAssignment.java");

    let names: Vec<&str> = unit.types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["AnimalInterface", "Dog", "Cat", "AccessingInterfaceMethodsAssignment"]);

    let interface = unit.find_type("AnimalInterface").expect("interface");
    assert_eq!(interface.kind, TypeKind::Interface);
    assert_eq!(interface.line, 3);
    assert!(interface.implements.is_empty());
    assert!(interface.methods.iter().all(|m| m.body.is_none()));
    assert_eq!(interface.methods.len(), 2);

    for class in ["Dog", "Cat"] {
        let decl = unit.find_type(class).expect("class");
        assert_eq!(decl.kind, TypeKind::Class);
        assert!(decl.implements("AnimalInterface"));
        for method in ["sound", "eat"] {
            let m = decl.methods_named(method).next().expect("method");
            assert!(m.is_public());
            assert!(!m.is_static);
            assert_eq!(call_names_of(m), ["println"]);
        }
    }
}

fn call_names_of(m: &structgrade::java::MethodDeclaration) -> Vec<&str> {
    m.calls().iter().map(|c| c.name.as_str()).collect()
}

#[test]
fn reference_assignment_main_calls_in_order() {
    let unit = parse_fixture("fixtures/java/animals/AccessingInterfaceMethodsAssignment.java");

    let main = unit.methods_named("main").next().expect("main");
    assert!(main.is_static);
    assert_eq!(main.visibility, Visibility::Public);

    let calls: Vec<(&str, usize)> = main
        .calls()
        .iter()
        .map(|c| (c.name.as_str(), c.line))
        .collect();
    assert_eq!(calls, [("sound", 40), ("eat", 41), ("sound", 43), ("eat", 44)]);
}

#[test]
fn nested_types_and_qualified_interfaces() {
    let unit = parse_fixture("fixtures/java/shapes/Shapes.java");

    let names: Vec<&str> = unit.types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Shape", "Base", "Circle", "Unit", "Shapes"]);

    let base = unit.find_type("Base").expect("Base");
    assert_eq!(base.implements, ["Shape", "Serializable"]);
    let label = base.methods_named("label").next().expect("label");
    assert_eq!(label.visibility, Visibility::Protected);
    assert!(label.body.is_none());

    let circle = unit.find_type("Circle").expect("Circle");
    assert_eq!(circle.implements, ["Shape"]);
    let methods: Vec<&str> = circle.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, ["area", "label"], "constructors and nested types are not methods");

    let unit_type = unit.find_type("Unit").expect("nested Unit");
    assert_eq!(unit_type.line, 30);
    assert!(unit_type.implements("Shape"));
}

#[test]
fn interface_extends_clause_is_not_implements() {
    let unit = parse_fixture("fixtures/java/shapes/Shapes.java");
    let shape = unit.find_type("Shape").expect("Shape");
    assert_eq!(shape.kind, TypeKind::Interface);
    assert!(shape.implements.is_empty());

    let compare_to = shape.methods_named("compareTo").next().expect("default method");
    assert_eq!(compare_to.visibility, Visibility::Package);
    assert!(compare_to.body.is_some());
}

#[test]
fn calls_inside_lambdas_and_arguments_are_collected() {
    let unit = parse_fixture("fixtures/java/shapes/Shapes.java");
    let mut calls = call_names(&unit, "main");
    calls.sort();
    assert_eq!(calls, ["area", "area", "get", "max", "println"]);
}

#[test]
fn generic_implements_is_reduced_to_simple_name() {
    let code = "class Dog implements Comparable<Dog>, java.lang.Runnable {\n  public int \
                compareTo(Dog o) { return 0; }\n  public void run() {}\n}";
    let unit = JavaSourceParser.parse(code).expect("parse");
    assert_eq!(unit.types[0].implements, ["Comparable", "Runnable"]);
}

#[test]
fn enums_records_and_anonymous_classes_carry_their_methods() {
    let code = "enum App implements Runnable {\n  ONE, TWO;\n  public void run() {}\n  static \
                void main(String[] a) { ONE.run(); }\n}\nrecord Pair(int a, int b) {\n  int \
                sum() { return Math.addExact(a, b); }\n}\nclass Host {\n  Runnable r = new \
                java.lang.Runnable() {\n    public void run() { go(); }\n  };\n}";
    let unit = JavaSourceParser.parse(code).expect("parse");

    let kinds: Vec<(&str, TypeKind)> = unit
        .types
        .iter()
        .map(|t| (t.name.as_str(), t.kind))
        .collect();
    assert_eq!(
        kinds,
        [
            ("App", TypeKind::Enum),
            ("Pair", TypeKind::Record),
            ("Host", TypeKind::Class),
            ("Runnable", TypeKind::Anonymous),
        ]
    );

    let app = unit.find_type("App").expect("App");
    assert_eq!(app.implements, ["Runnable"]);
    let methods: Vec<&str> = app.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, ["run", "main"]);
    assert_eq!(call_names(&unit, "main"), ["run"]);
    assert_eq!(call_names(&unit, "sum"), ["addExact"]);

    let anonymous = &unit.types[3];
    assert!(!anonymous.is_class_or_interface());
    assert!(anonymous.implements.is_empty());
    assert_eq!(anonymous.line, 10);
    assert_eq!(call_names_of(&anonymous.methods[0]), ["go"]);

    assert!(unit.find_class_or_interface("App").is_none());
    assert!(unit.find_class_or_interface("Host").is_some());
}

#[test]
fn syntax_errors_are_rejected() {
    let err = JavaSourceParser
        .parse("class Dog implements AnimalInterface {\n  public void sound( {\n}")
        .unwrap_err();
    assert!(matches!(err, ParseFailure::SyntaxErrors { .. }), "unexpected error: {err}");
}

#[test]
fn empty_source_has_no_types() {
    let unit = JavaSourceParser.parse("").expect("parse");
    assert_eq!(unit, SourceUnit::default());
}

#[test]
fn source_unit_serializes_to_json() {
    let unit = JavaSourceParser
        .parse("interface A { void f(); }")
        .expect("parse");
    let json = serde_json::to_value(&unit).expect("serialize");
    assert_eq!(json["types"][0]["name"], "A");
    assert_eq!(json["types"][0]["kind"], "Interface");
    assert_eq!(json["types"][0]["methods"][0]["body"], serde_json::Value::Null);
}
