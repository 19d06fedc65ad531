// Pass 2: resolve call expressions against the definition index
//
// Resolution is purely syntactic. Two callee shapes resolve: a bare
// identifier binds to the current package, and a selector whose operand is
// a lone identifier binds through the file's import alias map. Everything
// else (method calls on expressions, chained selectors, function values)
// is dropped.

use crate::analysis::codemap::{symbol_id, CallSite, CodeMap};
use crate::analysis::{file_location, AnalysisTarget};
use crate::error::Result;
use crate::parser::{go, GoImport, GoParser};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// Extract call sites from one admitted file
pub fn extract_file(
    parser: &mut GoParser,
    map: &mut CodeMap,
    target: &AnalysisTarget,
    file: &Path,
) -> Result<()> {
    let source = std::fs::read_to_string(file)?;
    let (package, rel_path) = file_location(target, file);
    extract_source(parser, map, &package, &rel_path, &source)
}

/// Extract call sites from a source buffer
pub fn extract_source(
    parser: &mut GoParser,
    map: &mut CodeMap,
    package: &str,
    rel_path: &str,
    source: &str,
) -> Result<()> {
    let tree = parser.parse(source)?;
    let aliases = import_aliases(&go::imports(tree.root_node(), source));

    let mut visitor = CallVisitor {
        map,
        aliases,
        package,
        rel_path,
        source,
        stack: Vec::new(),
    };
    visitor.walk(tree.root_node());
    Ok(())
}

/// Build the per-file alias map.
///
/// Blank imports bind nothing. Collisions silently last-write-win.
fn import_aliases(imports: &[GoImport]) -> HashMap<String, String> {
    let mut aliases = HashMap::new();
    for import in imports {
        if let Some(name) = import.bound_name() {
            aliases.insert(name.to_string(), import.path.clone());
        }
    }
    aliases
}

/// Tree walker carrying the caller-ID stack.
///
/// Declarations push their synthesized ID around their body; function
/// literals inherit the enclosing declaration and do not push. Calls are
/// attributed only while the stack is non-empty.
struct CallVisitor<'a> {
    map: &'a mut CodeMap,
    aliases: HashMap<String, String>,
    package: &'a str,
    rel_path: &'a str,
    source: &'a str,
    stack: Vec<String>,
}

impl CallVisitor<'_> {
    fn walk(&mut self, node: tree_sitter::Node) {
        if go::is_func_decl(node) {
            let id = self.declaration_id(node);
            self.stack.push(id);
            if let Some(body) = node.child_by_field_name("body") {
                self.walk_children(body);
            }
            self.stack.pop();
            return;
        }

        if node.kind() == "call_expression" {
            self.record_call(node);
            // Arguments and the callee expression may contain further calls.
        }

        self.walk_children(node);
    }

    fn walk_children(&mut self, node: tree_sitter::Node) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk(child);
        }
    }

    /// Synthesize the caller ID for a declaration, same construction as
    /// Pass 1. An unreadable receiver type degrades to a `<?>` component
    /// so calls in the body remain attributable.
    fn declaration_id(&self, node: tree_sitter::Node) -> String {
        let name = go::decl_name(node, self.source).unwrap_or_default();
        if !go::is_method(node) {
            return symbol_id(self.package, None, &name);
        }
        match go::receiver_type_text(node, self.source) {
            Some(recv) => symbol_id(self.package, Some(&recv), &name),
            None => {
                warn!(
                    "could not read receiver type for {} in {}",
                    name, self.rel_path
                );
                symbol_id(self.package, Some("<?>"), &name)
            }
        }
    }

    fn record_call(&mut self, node: tree_sitter::Node) {
        let Some(caller_id) = self.stack.last() else {
            return;
        };
        let Some(fun) = node.child_by_field_name("function") else {
            return;
        };
        let Some(callee_id) = self.resolve_callee(fun) else {
            return;
        };
        if !self.map.contains(&callee_id) {
            return;
        }

        let site = CallSite {
            file_path: self.rel_path.to_string(),
            line: node.start_position().row + 1,
            caller_id: caller_id.clone(),
        };
        self.map.add_call_site(&callee_id, site);
    }

    /// Resolve the callee expression to a symbol ID, when possible
    fn resolve_callee(&self, fun: tree_sitter::Node) -> Option<String> {
        match fun.kind() {
            "identifier" => {
                let name = fun.utf8_text(self.source.as_bytes()).ok()?;
                Some(format!("{}.{}", self.package, name))
            }
            "selector_expression" => {
                let operand = fun.child_by_field_name("operand")?;
                if operand.kind() != "identifier" {
                    return None;
                }
                let qualifier = operand.utf8_text(self.source.as_bytes()).ok()?;
                let import_path = self.aliases.get(qualifier)?;
                let field = fun
                    .child_by_field_name("field")?
                    .utf8_text(self.source.as_bytes())
                    .ok()?;
                Some(format!("{}.{}", import_path, field))
            }
            _ => None,
        }
    }
}
