#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Formatter;

use anyhow::{Context, Result, anyhow};
use tree_sitter::{Node, Point, Query, QueryCursor, StreamingIterator, Tree};

#[derive(Clone)]
/// A struct that wraps a tree-sitter parser object and source code
pub struct Parser {
    /// the source code being parsed
    code: String,
    /// the parse tree
    tree: Tree,
    /// the tree-sitter java grammar language
    lang: tree_sitter::Language,
}

/// Returns the compiled tree-sitter Java language.
fn java_language() -> tree_sitter::Language {
    tree_sitter_java::LANGUAGE.into()
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("bytes", &self.code.len())
            .field("has_error", &self.tree.root_node().has_error())
            .finish()
    }
}

impl Parser {
    /// Returns a new parser object
    ///
    /// * `source_code`: the source code to be parsed
    pub fn new(source_code: String) -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        let language = java_language();

        parser
            .set_language(&language)
            .with_context(|| "Failed to load Java grammar")?;
        let tree = parser
            .parse(source_code.as_str(), None)
            .ok_or_else(|| anyhow!("Error parsing Java code"))?;

        tracing::debug!(
            bytes = source_code.len(),
            has_error = tree.root_node().has_error(),
            "parsed java source"
        );

        Ok(Self {
            code: source_code,
            tree,
            lang: language,
        })
    }

    /// Returns the root node of the parse tree.
    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Returns the text a node spans in the source code.
    pub fn text_of(&self, node: Node<'_>) -> Result<&str> {
        node.utf8_text(self.code.as_bytes())
            .context("Cannot map node to source text")
    }

    /// Position of the first `ERROR` or `MISSING` node, if the tree has any.
    pub fn first_syntax_error(&self) -> Option<Point> {
        let root = self.tree.root_node();
        if !root.has_error() {
            return None;
        }

        let mut cursor = root.walk();
        loop {
            let node = cursor.node();
            if node.is_error() || node.is_missing() {
                return Some(node.start_position());
            }
            if node.has_error() && cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return None;
                }
            }
        }
    }

    /// Compiles a query against the Java grammar.
    pub fn compile(&self, q: &str) -> Result<Query> {
        Query::new(&self.lang, q).with_context(|| format!("Failed to compile tree-sitter query: {q}"))
    }

    /// Returns every node captured as `capture_name` by `query`, searching
    /// only the subtree rooted at `node`, in document order.
    pub fn captures_within<'tree>(
        &'tree self,
        query: &Query,
        capture_name: &str,
        node: Node<'tree>,
    ) -> Result<Vec<Node<'tree>>> {
        let capture_index = query
            .capture_index_for_name(capture_name)
            .ok_or_else(|| anyhow!("Capture name {capture_name} not present in query"))?;

        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, node, self.code.as_bytes());
        let mut results = Vec::new();

        while let Some(m) = matches.next() {
            results.extend(
                m.captures
                    .iter()
                    .filter(|c| c.index == capture_index)
                    .map(|c| c.node),
            );
        }
        results.sort_by_key(|n| n.start_byte());

        Ok(results)
    }
}
