//! Storage access lint - ensures browser storage goes through one module.
//!
//! Persistence keys and the localStorage/sessionStorage handles live in
//! src/app/storage.rs so that every consumer shares the same keys and the
//! host builds get the in-memory stand-in. This test flags any file that
//! reaches for web storage or spells a storage key literal directly.

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Calls that must only appear in the storage module
const DISALLOWED_CALLS: &[&str] = &[".local_storage()", ".session_storage()"];

/// Raw key literals that must only appear in the storage module
const KEY_LITERALS: &[&str] = &["\"taproom-cart\"", "\"taproom-session\"", "\"taproom-prefs\""];

const STORAGE_MODULE: &str = "src/app/storage.rs";

fn is_storage_module(path: &Path) -> bool {
    path.ends_with(STORAGE_MODULE) || path.to_string_lossy().ends_with("app/storage.rs")
}

#[test]
fn browser_storage_only_touched_in_storage_module() {
    let mut violations = Vec::new();

    for entry in WalkDir::new("src")
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
    {
        if is_storage_module(entry.path()) {
            continue;
        }
        let content = match fs::read_to_string(entry.path()) {
            Ok(content) => content,
            Err(_) => continue,
        };

        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.starts_with("//") {
                continue;
            }
            for pattern in DISALLOWED_CALLS.iter().chain(KEY_LITERALS) {
                if line.contains(pattern) {
                    violations.push(format!(
                        "{}:{}: `{}` - go through app::storage instead",
                        entry.path().display(),
                        lineno + 1,
                        pattern
                    ));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "\n\nSTORAGE ACCESS VIOLATIONS:\n{}\n",
        violations.join("\n")
    );
}
