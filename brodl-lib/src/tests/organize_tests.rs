use std::fs;
use std::path::Path;

use crate::organize::{find_duplicates, organize_files, quarantine_duplicates};

const HEADER_TEMPLATE: &str = "<?xml version=\"1.0\"?><CampaignHeader>\
<name>NAME</name><author>AUTHOR</author></CampaignHeader>";

fn write_map(path: &Path, author: Option<&str>, payload: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut bytes = Vec::new();
    if let Some(author) = author {
        bytes.extend_from_slice(HEADER_TEMPLATE.replace("AUTHOR", author).as_bytes());
    }
    bytes.extend_from_slice(payload);
    fs::write(path, bytes).unwrap();
}

#[test]
fn files_are_routed_into_star_buckets() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_map(&root.join("115-1-Five.bfg"), None, b"a");
    write_map(&root.join("214-2-Four.bfg"), None, b"b");
    write_map(&root.join("312-3-Two.bfg"), None, b"c");
    write_map(&root.join("110-4-Unrated.bfg"), None, b"d");
    fs::write(root.join("archive-5-stuff.zip"), b"e").unwrap();
    fs::write(root.join("stray.bfg"), b"f").unwrap();

    let summary = organize_files(root).unwrap();

    assert!(root.join("5 Stars").join("115-1-Five.bfg").is_file());
    assert!(root.join("4 Stars").join("214-2-Four.bfg").is_file());
    assert!(root.join("3 Stars and less").join("312-3-Two.bfg").is_file());
    assert!(root
        .join("3 Stars and less")
        .join("110-4-Unrated.bfg")
        .is_file());
    assert!(root.join("non-bfg").join("archive-5-stuff.zip").is_file());
    // Not enough fields to read a rating from, left alone
    assert!(root.join("stray.bfg").is_file());

    assert_eq!(summary.five_star, 1);
    assert_eq!(summary.four_star, 1);
    assert_eq!(summary.three_or_less, 2);
    assert_eq!(summary.non_map, 1);
    assert_eq!(summary.total(), 5);
}

#[test]
fn organize_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_map(&root.join("115-1-Five.bfg"), None, b"a");

    organize_files(root).unwrap();
    let second = organize_files(root).unwrap();

    assert_eq!(second.total(), 0);
    assert!(root.join("5 Stars").join("115-1-Five.bfg").is_file());
}

#[test]
fn highest_id_is_canonical_and_the_rest_are_quarantined() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_map(&root.join("115-10-Same Map.bfg"), None, b"ten bytes!");
    write_map(&root.join("113-25-Same Map.bfg"), None, b"25");
    write_map(&root.join("112-7-Same Map.bfg"), None, b"seven b");
    write_map(&root.join("115-99-Unique.bfg"), None, b"u");

    let groups = find_duplicates(root).unwrap();
    assert_eq!(groups.len(), 1);
    let group = &groups[0];
    assert_eq!(group.map_name, "Same Map");
    assert_eq!(group.author, "<unknown>");
    let ids: Vec<u64> = group.members.iter().map(|m| m.workshop_id).collect();
    assert_eq!(ids, vec![25, 10, 7]);

    let summary = quarantine_duplicates(root, &groups).unwrap();
    assert_eq!(summary.groups, 1);
    assert_eq!(summary.quarantined, 2);

    assert!(root.join("113-25-Same Map.bfg").is_file());
    assert!(root.join("duplicates").join("115-10-Same Map.bfg").is_file());
    assert!(root.join("duplicates").join("112-7-Same Map.bfg").is_file());
    assert!(root.join("115-99-Unique.bfg").is_file());

    let report = fs::read_to_string(root.join("duplicates").join("@duplicates.txt")).unwrap();
    assert_eq!(
        report,
        "'Same Map' by <unknown>\n\
         Main - ID 25 - Size (B) 2\n\
         Dupl - ID 10 - Size (B) 10\n\
         Dupl - ID 7 - Size (B) 7\n"
    );
}

#[test]
fn same_title_by_different_authors_is_not_a_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_map(&root.join("115-1-Arena.bfg"), Some("alice"), b"x");
    write_map(&root.join("115-2-Arena.bfg"), Some("bob"), b"y");

    let groups = find_duplicates(root).unwrap();
    assert!(groups.is_empty());
}

#[test]
fn report_groups_are_sorted_and_blank_line_separated() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_map(&root.join("115-2-Beta.bfg"), Some("zed"), b"bb");
    write_map(&root.join("115-1-Beta.bfg"), Some("zed"), b"b");
    write_map(&root.join("115-4-Alpha.bfg"), Some("amy"), b"aa");
    write_map(&root.join("115-3-Alpha.bfg"), Some("amy"), b"a");

    let groups = find_duplicates(root).unwrap();
    quarantine_duplicates(root, &groups).unwrap();

    let report = fs::read_to_string(root.join("duplicates").join("@duplicates.txt")).unwrap();
    let alpha = report.find("'Alpha' by amy").unwrap();
    let beta = report.find("'Beta' by zed").unwrap();
    assert!(alpha < beta);
    assert!(report.contains("\n\n'Beta'"));
}
