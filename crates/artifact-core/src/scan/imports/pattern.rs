//! Regular-expression import scan used when structural parsing fails

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `import <clause> from '<spec>'`, clause may span lines but not cross a quote or `;`
    static ref IMPORT_FROM: Regex =
        Regex::new(r#"\bimport\s+[^'";]*?\bfrom\s*['"]([^'"\n]+)['"]"#)
            .expect("import-from pattern is valid");

    /// `import '<spec>'`
    static ref BARE_IMPORT: Regex =
        Regex::new(r#"\bimport\s*['"]([^'"\n]+)['"]"#).expect("bare import pattern is valid");
}

/// Find import specifiers by pattern, in order of appearance.
pub fn scan_imports(source: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = IMPORT_FROM
        .captures_iter(source)
        .chain(BARE_IMPORT.captures_iter(source))
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.start(), m.as_str().to_string()))
        .collect();

    found.sort_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, spec)| spec).collect()
}
