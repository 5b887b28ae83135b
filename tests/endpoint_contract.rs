#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Endpoint Contract Tests
//!
//! Ensures backend endpoint paths don't change without explicit approval.
//! The golden file at tests/fixtures/endpoint_paths.txt is the source of
//! truth.
//!
//! If this test fails:
//! 1. Review the path changes carefully against the backend
//! 2. Update endpoint_paths.txt if the change is intentional
//!
//! Run with: cargo test --test endpoint_contract

use std::collections::BTreeSet;
use std::fs;

/// Extract entries from the golden file
fn load_golden_paths() -> BTreeSet<String> {
    let content = fs::read_to_string("tests/fixtures/endpoint_paths.txt")
        .expect("Failed to read endpoint_paths.txt");

    content
        .lines()
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
        .map(|line| line.trim().to_string())
        .collect()
}

/// Extract the `routes` module constants from the api module source
fn extract_paths_from_source() -> BTreeSet<String> {
    let content = fs::read_to_string("src/app/api.rs").expect("Failed to read api.rs");

    let mut paths = BTreeSet::new();
    let mut in_routes = false;

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with("pub mod routes") {
            in_routes = true;
            continue;
        }
        if in_routes && line == "}" {
            break;
        }
        if !in_routes || line.starts_with("//") {
            continue;
        }

        // Match `pub const NAME: &str = "/path";`
        if let Some(rest) = line.strip_prefix("pub const ") {
            let Some((name, value)) = rest.split_once(':') else {
                continue;
            };
            let Some(start) = value.find('"') else {
                continue;
            };
            let Some(end) = value[start + 1..].find('"') else {
                continue;
            };
            let path = &value[start + 1..start + 1 + end];
            paths.insert(format!("{} {}", name.trim(), path));
        }
    }

    paths
}

#[test]
fn endpoint_paths_match_contract() {
    let golden = load_golden_paths();
    let actual = extract_paths_from_source();

    assert!(
        !actual.is_empty(),
        "No endpoint constants found in src/app/api.rs - extraction broken?"
    );

    let added: Vec<_> = actual.difference(&golden).collect();
    let removed: Vec<_> = golden.difference(&actual).collect();

    if !added.is_empty() || !removed.is_empty() {
        let mut msg = String::from("\n\nENDPOINT CONTRACT VIOLATION!\n\n");
        if !added.is_empty() {
            msg.push_str("Paths added (not in golden file):\n");
            for path in &added {
                msg.push_str(&format!("  + {}\n", path));
            }
        }
        if !removed.is_empty() {
            msg.push_str("Paths removed (still in golden file):\n");
            for path in &removed {
                msg.push_str(&format!("  - {}\n", path));
            }
        }
        msg.push_str("\nIf intentional, update tests/fixtures/endpoint_paths.txt\n");
        panic!("{}", msg);
    }
}
