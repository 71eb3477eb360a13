//! Package clause and import extraction for Gno/Go source files.
//!
//! Only two constructs are read: the `package` clause and the import
//! declarations (single `import "path"` or a parenthesized block). Everything
//! else in the file is ignored. Parsing uses tree-sitter-go, which recovers
//! from syntax errors, so a broken file still yields whatever can be trusted.
//!
//! A package clause only counts when it names a single identifier. A
//! missing name, a keyword, or trailing tokens skip the file with a
//! diagnostic rather than guessing a name.
//! Interpreted import paths are unquoted with Go's escape rules.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, trace, warn};

use crate::diagnostics::Diagnostic;
use crate::error::{Error, Result};
use crate::types::SourceFile;

/// Tree-sitter node kind constants for the Go grammar.
mod node_kinds {
    pub const PACKAGE_CLAUSE: &str = "package_clause";
    pub const PACKAGE_IDENTIFIER: &str = "package_identifier";
    pub const IMPORT_DECLARATION: &str = "import_declaration";
    pub const IMPORT_SPEC: &str = "import_spec";
    pub const IMPORT_SPEC_LIST: &str = "import_spec_list";
    pub const INTERPRETED_STRING_LITERAL: &str = "interpreted_string_literal";
    pub const RAW_STRING_LITERAL: &str = "raw_string_literal";
    pub const ERROR: &str = "ERROR";

    // Anonymous keyword tokens
    pub const IMPORT_KEYWORD: &str = "import";
    pub const PACKAGE_KEYWORD: &str = "package";
}

/// Go's reserved words; none of them can name a package.
const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// Outcome of looking for the package clause.
#[derive(Debug, PartialEq, Eq)]
enum PackageClause {
    Declared(String),
    /// Clause present but unusable, at this 1-indexed line
    Malformed(usize),
    Missing,
}

/// Facts extracted from a single file.
///
/// Owned so that worker threads can hand results back for the sequential
/// registry merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Path of the scanned file
    pub path: PathBuf,
    /// Declared package name, if the file has a package clause
    pub package: Option<String>,
    /// Import paths in source order, without duplicates
    pub imports: Vec<String>,
    /// Findings for this file
    pub diagnostics: Vec<Diagnostic>,
}

impl ScannedFile {
    fn skipped(file: &SourceFile, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            path: file.path.clone(),
            package: None,
            imports: Vec::new(),
            diagnostics,
        }
    }
}

/// Create a parser configured for the Go grammar.
///
/// Parsers are not `Sync`, so each scan builds its own.
pub fn go_parser() -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| Error::Parser(e.to_string()))?;
    Ok(parser)
}

/// Scan one file for its package clause and imports.
///
/// A missing package clause or malformed import syntax is reported in
/// [`ScannedFile::diagnostics`], never as an error.
pub fn scan_source(file: &SourceFile) -> Result<ScannedFile> {
    let mut parser = go_parser()?;
    scan_with_parser(&mut parser, file)
}

/// Scan one file with a caller-provided parser.
pub fn scan_with_parser(
    parser: &mut tree_sitter::Parser,
    file: &SourceFile,
) -> Result<ScannedFile> {
    let content = file.content.as_bytes();
    let tree = parser
        .parse(content, None)
        .ok_or_else(|| Error::Parser(format!("failed to parse {}", file.path.display())))?;
    let root = tree.root_node();

    let mut diagnostics = Vec::new();

    let package = match package_clause(&root, content) {
        PackageClause::Declared(name) => name,
        PackageClause::Malformed(line) => {
            warn!(
                file = %file.path.display(),
                line,
                "Malformed package clause, skipping file"
            );
            diagnostics.push(Diagnostic::malformed_package_clause(&file.path, line));
            return Ok(ScannedFile::skipped(file, diagnostics));
        }
        PackageClause::Missing => {
            warn!(file = %file.path.display(), "No package clause, skipping file");
            diagnostics.push(Diagnostic::missing_package_clause(&file.path));
            return Ok(ScannedFile::skipped(file, diagnostics));
        }
    };

    let imports = match extract_imports(&root, content) {
        Ok(imports) => imports,
        Err(line) => {
            warn!(
                file = %file.path.display(),
                line,
                "Malformed import declaration, ignoring file imports"
            );
            diagnostics.push(Diagnostic::malformed_import(&file.path, line));
            Vec::new()
        }
    };

    debug!(
        file = %file.path.display(),
        package = %package,
        imports = imports.len(),
        "Scanned file"
    );

    Ok(ScannedFile {
        path: file.path.clone(),
        package: Some(package),
        imports,
        diagnostics,
    })
}

/// Locate and validate the package clause.
///
/// The clause must parse cleanly, name a non-keyword identifier, and be
/// followed by nothing but a comment or `;` on its line. Error recovery
/// reads `package\nimport "b"` as a package named `import`, hence the
/// keyword check.
fn package_clause(root: &tree_sitter::Node, content: &[u8]) -> PackageClause {
    use node_kinds::{PACKAGE_IDENTIFIER, PACKAGE_KEYWORD};

    let Some(clause) = find_package_clause(root) else {
        return match find_keyword(root, PACKAGE_KEYWORD) {
            Some(line) => PackageClause::Malformed(line),
            None => PackageClause::Missing,
        };
    };

    let line = line_of(&clause);
    if clause.has_error() {
        return PackageClause::Malformed(line);
    }

    let mut cursor = clause.walk();
    let Some(identifier) = clause
        .named_children(&mut cursor)
        .find(|n| n.kind() == PACKAGE_IDENTIFIER)
    else {
        return PackageClause::Malformed(line);
    };
    match node_text(&identifier, content) {
        Some(name)
            if is_identifier(&name)
                && !GO_KEYWORDS.contains(&name.as_str())
                && rest_of_line_is_blank(content, clause.end_byte()) =>
        {
            PackageClause::Declared(name)
        }
        _ => PackageClause::Malformed(line),
    }
}

/// Find the first `package_clause` node.
///
/// Looks at top-level nodes and inside error-recovery nodes, since a
/// syntax error elsewhere can wrap the package clause in `ERROR`.
fn find_package_clause<'t>(node: &tree_sitter::Node<'t>) -> Option<tree_sitter::Node<'t>> {
    use node_kinds::{ERROR, PACKAGE_CLAUSE};

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            PACKAGE_CLAUSE => return Some(child),
            ERROR => {
                if let Some(clause) = find_package_clause(&child) {
                    return Some(clause);
                }
            }
            _ => {}
        }
    }
    None
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Whether only whitespace, an optional `;`, and an optional comment
/// follow `offset` on its line.
fn rest_of_line_is_blank(content: &[u8], offset: usize) -> bool {
    let rest = &content[offset.min(content.len())..];
    let line_end = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
    let Ok(line) = std::str::from_utf8(&rest[..line_end]) else {
        return false;
    };
    let line = line.trim_start();
    let line = line.strip_prefix(';').unwrap_or(line).trim();
    line.is_empty() || line.starts_with("//") || line.starts_with("/*")
}

/// Extract import paths in source order.
///
/// Returns `Err(line)` with the 1-indexed line of the first malformed
/// import declaration.
fn extract_imports(
    root: &tree_sitter::Node,
    content: &[u8],
) -> std::result::Result<Vec<String>, usize> {
    use node_kinds::{ERROR, IMPORT_DECLARATION, IMPORT_KEYWORD};

    let mut imports = Vec::new();
    let mut seen = HashSet::new();

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        match child.kind() {
            IMPORT_DECLARATION => {
                if child.has_error() {
                    return Err(line_of(&child));
                }
                for path in import_paths(&child, content).ok_or_else(|| line_of(&child))? {
                    if seen.insert(path.clone()) {
                        imports.push(path);
                    }
                }
            }
            ERROR => {
                if let Some(line) = find_keyword(&child, IMPORT_KEYWORD) {
                    return Err(line);
                }
            }
            _ => {}
        }
    }

    Ok(imports)
}

/// Collect the paths of one import declaration.
///
/// Returns `None` if a spec has no usable path.
fn import_paths(declaration: &tree_sitter::Node, content: &[u8]) -> Option<Vec<String>> {
    use node_kinds::{IMPORT_SPEC, IMPORT_SPEC_LIST};

    let mut paths = Vec::new();
    let mut cursor = declaration.walk();
    for child in declaration.named_children(&mut cursor) {
        match child.kind() {
            IMPORT_SPEC => paths.push(import_spec_path(&child, content)?),
            IMPORT_SPEC_LIST => {
                let mut inner = child.walk();
                for spec in child.named_children(&mut inner) {
                    if spec.kind() == IMPORT_SPEC {
                        paths.push(import_spec_path(&spec, content)?);
                    }
                }
            }
            _ => {}
        }
    }
    Some(paths)
}

/// Read the path of an import spec, ignoring any alias.
fn import_spec_path(spec: &tree_sitter::Node, content: &[u8]) -> Option<String> {
    use node_kinds::{INTERPRETED_STRING_LITERAL, RAW_STRING_LITERAL};

    let literal = spec.child_by_field_name("path")?;
    let raw = node_text(&literal, content)?;
    let path = match literal.kind() {
        INTERPRETED_STRING_LITERAL => unescape(raw.strip_prefix('"')?.strip_suffix('"')?)?,
        RAW_STRING_LITERAL => raw.trim_matches('`').to_string(),
        _ => return None,
    };

    if path.is_empty() {
        return None;
    }
    Some(path)
}

/// Decode the escape sequences of a Go interpreted string body.
///
/// Returns `None` for an invalid escape or a result that is not UTF-8.
fn unescape(body: &str) -> Option<String> {
    if !body.contains('\\') {
        return Some(body.to_string());
    }

    let mut bytes = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let escaped = chars.next()?;
        let simple = match escaped {
            'a' => Some(0x07),
            'b' => Some(0x08),
            'f' => Some(0x0c),
            'n' => Some(b'\n'),
            'r' => Some(b'\r'),
            't' => Some(b'\t'),
            'v' => Some(0x0b),
            '\\' => Some(b'\\'),
            '"' => Some(b'"'),
            _ => None,
        };
        if let Some(byte) = simple {
            bytes.push(byte);
            continue;
        }
        match escaped {
            'x' => bytes.push(u8::try_from(hex_digits(&mut chars, 2)?).ok()?),
            'u' | 'U' => {
                let width = if escaped == 'u' { 4 } else { 8 };
                let c = char::from_u32(hex_digits(&mut chars, width)?)?;
                let mut buf = [0; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            '0'..='7' => {
                let mut value = escaped.to_digit(8)?;
                for _ in 0..2 {
                    value = value * 8 + chars.next()?.to_digit(8)?;
                }
                bytes.push(u8::try_from(value).ok()?);
            }
            _ => return None,
        }
    }
    String::from_utf8(bytes).ok()
}

fn hex_digits(chars: &mut std::str::Chars<'_>, width: usize) -> Option<u32> {
    (0..width).try_fold(0, |value, _| Some(value * 16 + chars.next()?.to_digit(16)?))
}

/// Find an anonymous keyword token anywhere below `node`.
fn find_keyword(node: &tree_sitter::Node, keyword: &str) -> Option<usize> {
    if !node.is_named() && node.kind() == keyword {
        return Some(line_of(node));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(line) = find_keyword(&child, keyword) {
            return Some(line);
        }
    }
    None
}

fn line_of(node: &tree_sitter::Node) -> usize {
    node.start_position().row + 1
}

/// Get text content of a tree-sitter node.
///
/// Returns `None` if the node's byte range contains invalid UTF-8.
fn node_text(node: &tree_sitter::Node, content: &[u8]) -> Option<String> {
    match std::str::from_utf8(&content[node.byte_range()]) {
        Ok(s) => Some(s.to_string()),
        Err(e) => {
            trace!(
                byte_range = ?node.byte_range(),
                error = %e,
                node_kind = %node.kind(),
                "Failed to decode node text as UTF-8"
            );
            None
        }
    }
}
