// Pass 1: index every top-level function and method declaration

use crate::analysis::codemap::{symbol_id, CodeMap, Definition};
use crate::analysis::{file_location, AnalysisTarget};
use crate::error::Result;
use crate::parser::{go, GoParser};
use std::path::Path;
use tracing::warn;

/// Index all declarations in one admitted file
pub fn index_file(
    parser: &mut GoParser,
    map: &mut CodeMap,
    target: &AnalysisTarget,
    file: &Path,
) -> Result<()> {
    let source = std::fs::read_to_string(file)?;
    let (package, rel_path) = file_location(target, file);
    index_source(parser, map, &package, &rel_path, &source)
}

/// Index all declarations in a source buffer.
///
/// Function literals carry no declared name and are not indexed. A method
/// whose receiver type cannot be read is skipped with a warning.
pub fn index_source(
    parser: &mut GoParser,
    map: &mut CodeMap,
    package: &str,
    rel_path: &str,
    source: &str,
) -> Result<()> {
    let tree = parser.parse(source)?;

    for decl in go::top_level_decls(tree.root_node()) {
        let Some(name) = go::decl_name(decl, source) else {
            continue;
        };

        let receiver = if go::is_method(decl) {
            match go::receiver_type_text(decl, source) {
                Some(recv) => Some(recv),
                None => {
                    warn!(
                        "could not read receiver type for {} in {}, skipping declaration",
                        name, rel_path
                    );
                    continue;
                }
            }
        } else {
            None
        };

        let id = symbol_id(package, receiver.as_deref(), &name);
        map.insert_definition(Definition {
            id,
            name,
            package: package.to_string(),
            file_path: rel_path.to_string(),
            line: decl.start_position().row + 1,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(source: &str) -> CodeMap {
        let mut parser = GoParser::new().unwrap();
        let mut map = CodeMap::new();
        index_source(&mut parser, &mut map, "m/svc", "svc/a.go", source).unwrap();
        map
    }

    #[test]
    fn test_free_function() {
        let map = index("package svc\n\nfunc Run() {}\n");
        let def = map.definition("m/svc.Run").unwrap();
        assert_eq!(def.name, "Run");
        assert_eq!(def.package, "m/svc");
        assert_eq!(def.file_path, "svc/a.go");
        assert_eq!(def.line, 3);
    }

    #[test]
    fn test_method_pointer_receiver() {
        let map = index("package svc\n\ntype T struct{}\n\nfunc (t *T) M() {}\n");
        assert!(map.contains("m/svc.*T.M"));
        assert!(!map.contains("m/svc.T.M"));
    }

    #[test]
    fn test_method_generic_receiver_literal() {
        let map = index("package svc\n\ntype Box[T any] struct{}\n\nfunc (b Box[T]) Get() {}\n");
        assert!(map.contains("m/svc.Box[T].Get"));
    }

    #[test]
    fn test_package_prefixes_id() {
        let map = index("package svc\n\nfunc A() {}\n\ntype T struct{}\n\nfunc (t T) B() {}\n");
        for def in map.definitions() {
            assert!(def.id.starts_with(&format!("{}.", def.package)));
        }
    }

    #[test]
    fn test_function_literals_not_indexed() {
        let map = index(
            "package svc\n\nfunc Outer() {\n\tf := func() {}\n\tf()\n}\n",
        );
        assert_eq!(map.len(), 1);
        assert!(map.contains("m/svc.Outer"));
    }

    #[test]
    fn test_redeclaration_last_writer_wins() {
        let mut parser = GoParser::new().unwrap();
        let mut map = CodeMap::new();
        index_source(&mut parser, &mut map, "m", "a.go", "package p\n\nfunc F() {}\n").unwrap();
        index_source(&mut parser, &mut map, "m", "b.go", "package p\n\nfunc F() {}\n").unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(map.definition("m.F").unwrap().file_path, "b.go");
    }

    #[test]
    fn test_parse_failure_is_an_error() {
        let mut parser = GoParser::new().unwrap();
        let mut map = CodeMap::new();
        let result = index_source(&mut parser, &mut map, "m", "a.go", "package p\nfunc ( {\n");
        assert!(result.is_err());
        assert!(map.is_empty());
    }
}
