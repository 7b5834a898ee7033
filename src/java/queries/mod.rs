//! Tree-sitter query strings used to build a `SourceUnit`.

/// Tree-sitter query that returns class, interface, enum and record
/// declarations and anonymous class bodies, nested ones included
/// * `declaration`: the whole declaration node, or the `new` expression for
///   anonymous classes
pub const TYPE_DECLARATION_QUERY: &str = include_str!("type_declaration.scm");

/// Tree-sitter query that returns method invocations
/// * `call`: the whole invocation
/// * `name`: method call identifier
pub const METHOD_CALL_QUERY: &str = include_str!("method_invocation.scm");
