// Go parser using tree-sitter
//
// Purely syntactic: no type information is consulted. The analysis passes
// walk the returned tree with the helpers below.

use crate::error::{Error, Result};
use tree_sitter::{Node, Parser, Tree};

/// Parser for Go source files
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    /// Create a new Go parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_go::language();
        parser
            .set_language(&language)
            .map_err(|e| Error::parser(format!("Failed to set Go language: {}", e)))?;

        Ok(Self { parser })
    }

    /// Parse Go source code to a syntax tree.
    ///
    /// A tree containing syntax errors counts as a parse failure; the
    /// caller is expected to skip the whole file.
    pub fn parse(&mut self, source: &str) -> Result<Tree> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| Error::parser("Failed to parse Go source"))?;

        if tree.root_node().has_error() {
            return Err(Error::parser("Go source contains syntax errors"));
        }
        Ok(tree)
    }
}

/// A single import entry as written in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoImport {
    /// Explicit alias (`u`, `_`, `.`) when present
    pub alias: Option<String>,
    /// Import path with surrounding quotes stripped
    pub path: String,
}

impl GoImport {
    /// The identifier this import binds, unless it is a blank import.
    ///
    /// Explicit alias when present, otherwise the last slash-separated
    /// segment of the import path.
    pub fn bound_name(&self) -> Option<&str> {
        match self.alias.as_deref() {
            Some("_") => None,
            Some(alias) => Some(alias),
            None => Some(self.path.rsplit('/').next().unwrap_or(&self.path)),
        }
    }
}

/// Extract all import entries from a parsed file
pub fn imports(root: Node, source: &str) -> Vec<GoImport> {
    let mut found = Vec::new();
    let mut cursor = root.walk();

    for child in root.children(&mut cursor) {
        if child.kind() != "import_declaration" {
            continue;
        }
        let mut decl_cursor = child.walk();
        for entry in child.children(&mut decl_cursor) {
            if entry.kind() == "import_spec" {
                if let Some(import) = parse_import_spec(&entry, source) {
                    found.push(import);
                }
            } else if entry.kind() == "import_spec_list" {
                // Multiple imports in parentheses
                let mut list_cursor = entry.walk();
                for spec in entry.children(&mut list_cursor) {
                    if spec.kind() == "import_spec" {
                        if let Some(import) = parse_import_spec(&spec, source) {
                            found.push(import);
                        }
                    }
                }
            }
        }
    }

    found
}

/// Parse a single import spec
fn parse_import_spec(node: &Node, source: &str) -> Option<GoImport> {
    let path_node = node.child_by_field_name("path")?;
    let raw = path_node.utf8_text(source.as_bytes()).ok()?;
    let path = raw.trim_matches('"').trim_matches('`').to_string();

    let alias = node
        .child_by_field_name("name")
        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
        .map(|s| s.to_string());

    Some(GoImport { alias, path })
}

/// All top-level function and method declarations in the file
pub fn top_level_decls<'t>(root: Node<'t>) -> Vec<Node<'t>> {
    let mut decls = Vec::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if is_func_decl(child) {
            decls.push(child);
        }
    }
    decls
}

/// Whether the node is a function or method declaration
pub fn is_func_decl(node: Node) -> bool {
    matches!(
        node.kind(),
        "function_declaration" | "method_declaration"
    )
}

/// Whether the declaration has a receiver (method form)
pub fn is_method(node: Node) -> bool {
    node.kind() == "method_declaration"
}

/// Declared identifier of a function or method declaration
pub fn decl_name(node: Node, source: &str) -> Option<String> {
    node.child_by_field_name("name")
        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
        .map(|s| s.to_string())
}

/// Verbatim source text of a method's receiver type.
///
/// Pointer markers and type-parameter brackets survive as written:
/// `T`, `*T`, `Generic[T]`.
pub fn receiver_type_text(node: Node, source: &str) -> Option<String> {
    let receiver = node.child_by_field_name("receiver")?;
    let mut cursor = receiver.walk();
    for child in receiver.children(&mut cursor) {
        if child.kind() == "parameter_declaration" {
            if let Some(type_node) = child.child_by_field_name("type") {
                return type_node
                    .utf8_text(source.as_bytes())
                    .ok()
                    .map(|s| s.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Tree {
        GoParser::new().unwrap().parse(source).unwrap()
    }

    #[test]
    fn test_parser_new() {
        let parser = GoParser::new();
        assert!(parser.is_ok());
    }

    #[test]
    fn test_parse_rejects_broken_source() {
        let mut parser = GoParser::new().unwrap();
        assert!(parser.parse("package p\n\nfunc broken( {\n").is_err());
    }

    #[test]
    fn test_parse_imports_single() {
        let source = "package main\n\nimport \"fmt\"\n";
        let tree = parse(source);
        let imports = imports(tree.root_node(), source);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].path, "fmt");
        assert!(imports[0].alias.is_none());
        assert_eq!(imports[0].bound_name(), Some("fmt"));
    }

    #[test]
    fn test_parse_imports_grouped() {
        let source = r#"package main

import (
    "fmt"
    u "example.com/app/util"
    _ "example.com/app/side"
    . "strings"
)
"#;
        let tree = parse(source);
        let imports = imports(tree.root_node(), source);
        assert_eq!(imports.len(), 4);

        assert_eq!(imports[0].bound_name(), Some("fmt"));

        assert_eq!(imports[1].alias.as_deref(), Some("u"));
        assert_eq!(imports[1].path, "example.com/app/util");
        assert_eq!(imports[1].bound_name(), Some("u"));

        assert_eq!(imports[2].alias.as_deref(), Some("_"));
        assert_eq!(imports[2].bound_name(), None);

        assert_eq!(imports[3].alias.as_deref(), Some("."));
    }

    #[test]
    fn test_bound_name_last_segment() {
        let import = GoImport {
            alias: None,
            path: "github.com/gin-gonic/gin".to_string(),
        };
        assert_eq!(import.bound_name(), Some("gin"));

        let bare = GoImport {
            alias: None,
            path: "fmt".to_string(),
        };
        assert_eq!(bare.bound_name(), Some("fmt"));
    }

    #[test]
    fn test_top_level_decls() {
        let source = r#"package main

func Add(a, b int) int { return a + b }

type T struct{}

func (t *T) M() {}
"#;
        let tree = parse(source);
        let decls = top_level_decls(tree.root_node());
        assert_eq!(decls.len(), 2);

        assert!(!is_method(decls[0]));
        assert_eq!(decl_name(decls[0], source).as_deref(), Some("Add"));

        assert!(is_method(decls[1]));
        assert_eq!(decl_name(decls[1], source).as_deref(), Some("M"));
    }

    #[test]
    fn test_receiver_pointer_preserved() {
        let source = "package p\n\ntype T struct{}\n\nfunc (t *T) M() {}\n";
        let tree = parse(source);
        let decls = top_level_decls(tree.root_node());
        assert_eq!(
            receiver_type_text(decls[0], source).as_deref(),
            Some("*T")
        );
    }

    #[test]
    fn test_receiver_value_form() {
        let source = "package p\n\ntype T struct{}\n\nfunc (t T) M() {}\n";
        let tree = parse(source);
        let decls = top_level_decls(tree.root_node());
        assert_eq!(receiver_type_text(decls[0], source).as_deref(), Some("T"));
    }

    #[test]
    fn test_receiver_generic_brackets_preserved() {
        let source = "package p\n\ntype Box[T any] struct{}\n\nfunc (b *Box[T]) Get() {}\n";
        let tree = parse(source);
        let decls = top_level_decls(tree.root_node());
        assert_eq!(
            receiver_type_text(decls[0], source).as_deref(),
            Some("*Box[T]")
        );
    }

    #[test]
    fn test_receiver_absent_on_function() {
        let source = "package p\n\nfunc Free() {}\n";
        let tree = parse(source);
        let decls = top_level_decls(tree.root_node());
        assert!(receiver_type_text(decls[0], source).is_none());
    }

    #[test]
    fn test_decl_lines() {
        let source = "package p\n\nfunc A() {}\nfunc B() {}\n";
        let tree = parse(source);
        let decls = top_level_decls(tree.root_node());
        assert_eq!(decls[0].start_position().row + 1, 3);
        assert_eq!(decls[1].start_position().row + 1, 4);
    }
}
