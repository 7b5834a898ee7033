#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Query};

use super::{
    parser::Parser,
    queries::{METHOD_CALL_QUERY, TYPE_DECLARATION_QUERY},
};

/// Kinds of type declarations tracked in a `SourceUnit`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TypeKind {
    /// - Interface
    Interface,
    /// - Class
    Class,
    /// - Enum
    Enum,
    /// - Record
    Record,
    /// - Anonymous class body of a `new` expression, named after the
    ///   instantiated type
    Anonymous,
}

impl TypeKind {
    /// Whether this is a plain class or interface declaration.
    pub fn is_class_or_interface(&self) -> bool {
        matches!(self, TypeKind::Class | TypeKind::Interface)
    }
}

/// Visibility of a member, taken from its explicit modifiers only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Visibility {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
    /// no access modifier
    #[default]
    Package,
}

/// A method invocation found inside a method body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallExpression {
    /// name of the invoked method, without receiver.
    pub name: String,
    /// 1-based line of the invocation.
    pub line: usize,
}

/// The body of a method, reduced to what the grader inspects.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MethodBody {
    /// every invocation in the body, nested ones included, in source order.
    pub calls: Vec<CallExpression>,
}

/// A method declared directly inside a class or interface body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MethodDeclaration {
    /// name of the method.
    pub name:       String,
    /// explicit visibility.
    pub visibility: Visibility,
    /// whether the method is declared `static`.
    pub is_static:  bool,
    /// absent for interface signatures and abstract methods.
    pub body:       Option<MethodBody>,
    /// 1-based line of the declaration.
    pub line:       usize,
}

impl MethodDeclaration {
    /// Whether the method carries an explicit `public` modifier.
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Invocations made in the body; empty for body-less methods.
    pub fn calls(&self) -> &[CallExpression] {
        self.body.as_ref().map(|b| b.calls.as_slice()).unwrap_or_default()
    }
}

/// A named class or interface declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeDeclaration {
    /// simple name of the type.
    pub name:       String,
    /// interface or class.
    pub kind:       TypeKind,
    /// methods declared directly in the type body.
    pub methods:    Vec<MethodDeclaration>,
    /// simple names from the `implements` clause; always empty for
    /// interfaces and anonymous classes.
    pub implements: Vec<String>,
    /// 1-based line of the declaration.
    pub line:       usize,
}

impl TypeDeclaration {
    /// Whether this is a plain class or interface declaration.
    pub fn is_class_or_interface(&self) -> bool {
        self.kind.is_class_or_interface()
    }

    /// Whether `interface` appears in the `implements` clause.
    pub fn implements(&self, interface: &str) -> bool {
        self.implements.iter().any(|i| i == interface)
    }

    /// Methods declared in this type with the given name.
    pub fn methods_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a MethodDeclaration> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }
}

/// The parsed representation of one source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceUnit {
    /// all type declarations and anonymous class bodies, nested ones
    /// included, in source order.
    pub types: Vec<TypeDeclaration>,
}

impl SourceUnit {
    /// Builds a `SourceUnit` from an already parsed tree.
    pub fn from_parser(parser: &Parser) -> Result<Self> {
        let type_query = parser.compile(TYPE_DECLARATION_QUERY)?;
        let call_query = parser.compile(METHOD_CALL_QUERY)?;

        let types = parser
            .captures_within(&type_query, "declaration", parser.root_node())?
            .into_iter()
            .map(|node| type_declaration(parser, &call_query, node))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { types })
    }

    /// First type declaration with the given name.
    pub fn find_type(&self, name: &str) -> Option<&TypeDeclaration> {
        self.types.iter().find(|t| t.name == name)
    }

    /// First class or interface declaration with the given name.
    pub fn find_class_or_interface<'a>(&'a self, name: &'a str) -> Option<&'a TypeDeclaration> {
        self.types_named(name).find(|t| t.is_class_or_interface())
    }

    /// Every type declaration with the given name; nested types may repeat a
    /// name.
    pub fn types_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a TypeDeclaration> + 'a {
        self.types.iter().filter(move |t| t.name == name)
    }

    /// Every method with the given name, across all type declarations.
    pub fn methods_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a MethodDeclaration> + 'a {
        self.types.iter().flat_map(move |t| t.methods_named(name))
    }
}

/// The capability the grader needs from a source-language front end.
pub trait SourceParser {
    /// Parses `source` into a `SourceUnit`.
    fn parse(&self, source: &str) -> Result<SourceUnit, ParseFailure>;
}

/// Reasons a `SourceParser` can refuse a source text.
#[derive(thiserror::Error, Debug)]
pub enum ParseFailure {
    /// The tree contains `ERROR` or `MISSING` nodes.
    #[error("syntax error at line {line}, column {column}")]
    SyntaxErrors {
        /// 1-based line of the first error.
        line:   usize,
        /// 1-based column of the first error.
        column: usize,
    },
    /// The file bytes are not UTF-8.
    #[error("source is not valid UTF-8 (first invalid byte at offset {valid_up_to})")]
    InvalidUtf8 {
        /// length of the valid prefix.
        valid_up_to: usize,
    },
    /// The parser machinery itself failed.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// `SourceParser` backed by tree-sitter's Java grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaSourceParser;

impl SourceParser for JavaSourceParser {
    fn parse(&self, source: &str) -> Result<SourceUnit, ParseFailure> {
        let parser = Parser::new(source.to_string())?;

        if let Some(point) = parser.first_syntax_error() {
            return Err(ParseFailure::SyntaxErrors {
                line:   point.row + 1,
                column: point.column + 1,
            });
        }

        Ok(SourceUnit::from_parser(&parser)?)
    }
}

/// Returns the first named child of `node` with the given kind.
fn child_of_kind<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Reduces a written type such as `java.util.Comparable<Dog>` to its simple
/// name, `Comparable`.
fn simple_type_name(written: &str) -> String {
    let without_args = written.split('<').next().unwrap_or(written);
    let last_token = without_args.split_whitespace().last().unwrap_or_default();
    last_token
        .rsplit('.')
        .next()
        .unwrap_or(last_token)
        .to_string()
}

/// Extracts a type declaration or an anonymous class body.
fn type_declaration(
    parser: &Parser,
    call_query: &Query,
    node: Node<'_>,
) -> Result<TypeDeclaration> {
    let kind = match node.kind() {
        "interface_declaration" => TypeKind::Interface,
        "enum_declaration" => TypeKind::Enum,
        "record_declaration" => TypeKind::Record,
        "object_creation_expression" => TypeKind::Anonymous,
        _ => TypeKind::Class,
    };

    let (name, body) = if kind == TypeKind::Anonymous {
        let instantiated = node
            .child_by_field_name("type")
            .context("Anonymous class has no instantiated type")
            .and_then(|n| parser.text_of(n))?;
        (simple_type_name(instantiated), child_of_kind(node, "class_body"))
    } else {
        let name = node
            .child_by_field_name("name")
            .context("Type declaration has no name")
            .and_then(|n| parser.text_of(n))?
            .to_string();
        (name, node.child_by_field_name("body"))
    };

    let mut implements = Vec::new();
    if let Some(type_list) = node
        .child_by_field_name("interfaces")
        .filter(|_| kind != TypeKind::Interface)
        .and_then(|interfaces| child_of_kind(interfaces, "type_list"))
    {
        let mut cursor = type_list.walk();
        for ty in type_list.named_children(&mut cursor) {
            implements.push(simple_type_name(parser.text_of(ty)?));
        }
    }

    let mut methods = Vec::new();
    if let Some(body) = body {
        // enum members after the constants sit one level down
        let members = match child_of_kind(body, "enum_body_declarations") {
            Some(declarations) => declarations,
            None => body,
        };
        let mut cursor = members.walk();
        for member in members
            .named_children(&mut cursor)
            .filter(|m| m.kind() == "method_declaration")
        {
            methods.push(method_declaration(parser, call_query, member)?);
        }
    }

    Ok(TypeDeclaration {
        name,
        kind,
        methods,
        implements,
        line: node.start_position().row + 1,
    })
}

/// Extracts a method declaration, scanning its body for invocations.
fn method_declaration(
    parser: &Parser,
    call_query: &Query,
    node: Node<'_>,
) -> Result<MethodDeclaration> {
    let name = node
        .child_by_field_name("name")
        .context("Method declaration has no name")
        .and_then(|n| parser.text_of(n))?
        .to_string();

    let mut visibility = Visibility::Package;
    let mut is_static = false;
    if let Some(modifiers) = child_of_kind(node, "modifiers") {
        let mut cursor = modifiers.walk();
        for modifier in modifiers.children(&mut cursor) {
            match modifier.kind() {
                "public" => visibility = Visibility::Public,
                "protected" => visibility = Visibility::Protected,
                "private" => visibility = Visibility::Private,
                "static" => is_static = true,
                _ => {}
            }
        }
    }

    let body = match node.child_by_field_name("body") {
        Some(block) => {
            let calls = parser
                .captures_within(call_query, "name", block)?
                .into_iter()
                .map(|n| {
                    Ok(CallExpression {
                        name: parser.text_of(n)?.to_string(),
                        line: n.start_position().row + 1,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Some(MethodBody { calls })
        }
        None => None,
    };

    Ok(MethodDeclaration {
        name,
        visibility,
        is_static,
        body,
        line: node.start_position().row + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_type_name_strips_generics_and_packages() {
        assert_eq!(simple_type_name("AnimalInterface"), "AnimalInterface");
        assert_eq!(simple_type_name("Comparable<Dog>"), "Comparable");
        assert_eq!(simple_type_name("java.io.Serializable"), "Serializable");
        assert_eq!(simple_type_name("Map.Entry<String, Integer>"), "Entry");
    }
}
