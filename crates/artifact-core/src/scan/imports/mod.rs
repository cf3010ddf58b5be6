//! Import extraction
//!
//! Two strategies run as a pipeline: the structural strategy tokenizes the
//! module and reads its top-level import declarations; only when it reports
//! that the source could not be parsed does the pattern strategy run.
//! Either way only external (non-relative) specifiers are kept.

mod lexer;
pub mod pattern;
pub mod structural;

pub use lexer::LexError;
pub use structural::{parse_imports, ParseFailure, StructuralParse};

/// Which strategy produced an import list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Structural,
    Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImports {
    /// External specifiers, deduplicated, in order of first appearance
    pub specifiers: Vec<String>,
    pub strategy: Strategy,
}

/// Extract the external import specifiers of a module
pub fn extract_imports(source: &str) -> ExtractedImports {
    let (found, strategy) = match parse_imports(source) {
        StructuralParse::Imports(found) => (found, Strategy::Structural),
        StructuralParse::Unparseable(reason) => {
            tracing::debug!(%reason, "structural import parse failed, falling back to patterns");
            (pattern::scan_imports(source), Strategy::Pattern)
        }
    };

    let mut specifiers: Vec<String> = Vec::new();
    for spec in found {
        if is_external(&spec) && !specifiers.contains(&spec) {
            specifiers.push(spec);
        }
    }

    ExtractedImports {
        specifiers,
        strategy,
    }
}

/// Relative (`./x`, `../x`), absolute (`/x`) and project-alias (`@/x`)
/// specifiers resolve to files on disk rather than packages.
pub fn is_external(specifier: &str) -> bool {
    !(specifier.is_empty()
        || specifier.starts_with('.')
        || specifier.starts_with('/')
        || specifier.starts_with("@/"))
}
