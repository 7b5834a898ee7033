#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Tree-sitter parser wrapper.
pub mod parser;
/// Tree-sitter query strings used by Java analysis.
pub mod queries;
/// The `SourceUnit` model and the parser capability that builds it.
pub mod unit;

pub use parser::Parser;
pub use unit::{
    CallExpression, JavaSourceParser, MethodBody, MethodDeclaration, ParseFailure, SourceParser,
    SourceUnit, TypeDeclaration, TypeKind, Visibility,
};
