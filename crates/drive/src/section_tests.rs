// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const DOC: &str = "\
# Title

Intro text.

## Backend

Node

### Database

Postgres

## Frontend

React
";

#[test]
fn extracts_section_through_deeper_headings() {
    let out = extract_section(DOC, "Backend").unwrap();
    assert!(out.contains("Backend"));
    assert!(out.contains("Node"));
    assert!(out.contains("Postgres"));
    assert!(!out.contains("React"));
}

#[test]
fn stops_at_equal_depth_heading() {
    let out = extract_section(DOC, "Frontend").unwrap();
    assert!(out.contains("React"));
    assert!(!out.contains("Node"));
}

#[test]
fn top_level_section_spans_everything_below() {
    let out = extract_section(DOC, "Title").unwrap();
    assert!(out.contains("Intro text."));
    assert!(out.contains("React"));
}

#[test]
fn section_match_is_case_insensitive() {
    assert!(extract_section(DOC, "backend").is_ok());
}

#[test]
fn missing_section_errors() {
    let err = extract_section(DOC, "Deployment").unwrap_err();
    assert!(matches!(err, DriveError::SectionNotFound(_)));
}

#[test]
fn result_is_trimmed() {
    let out = extract_section(DOC, "Frontend").unwrap();
    assert_eq!(out, "## Frontend\n\nReact");
}
