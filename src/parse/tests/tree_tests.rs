//! Tests for navigation tree construction.

use super::fixtures::{FULL, MINIMAL, parse};
use crate::model::{NodeData, NodeKind};
use crate::parse::parse_metadata_json;

#[test]
fn test_minimal_document_node_ids() {
    let data = parse(MINIMAL);
    let tree = &data.tree;

    assert_eq!(tree.root_id(), "drawing:00");
    for id in [
        "drawing:00",
        "discipline:00:건축",
        "region:00:건축:A",
        "revision:00:건축:A:REV1",
    ] {
        assert!(tree.contains(id), "missing node {id}");
    }
    assert_eq!(tree.len(), 4);
}

#[test]
fn test_minimal_document_revision_path() {
    let data = parse(MINIMAL);
    assert_eq!(data.revisions.len(), 1);
    let entry = &data.revisions[0];
    assert_eq!(
        entry.path,
        vec!["전체 배치도", "건축", "Region A", "REV1"]
    );
    assert_eq!(entry.region_id.as_deref(), Some("A"));
    assert_eq!(entry.parent_image.as_deref(), Some("00_site.png"));
}

#[test]
fn test_tree_is_bidirectionally_consistent() {
    for json in [MINIMAL, FULL] {
        let data = parse(json);
        assert!(data.tree.validate().is_empty(), "{:?}", data.tree.validate());

        for node in data.tree.iter() {
            if node.id != data.tree.root_id() && node.kind() != NodeKind::Drawing {
                let parent = data.tree.parent(&node.id).expect("non-drawing nodes have parents");
                assert!(parent.children.contains(&node.id));
            }
            for child in data.tree.children(&node.id) {
                assert_eq!(child.parent_id.as_deref(), Some(node.id.as_str()));
            }
        }
    }
}

#[test]
fn test_parse_is_deterministic() {
    let a = parse(FULL);
    let b = parse(FULL);
    assert_eq!(a, b);

    let ids_a: Vec<&str> = a.tree.iter().map(|n| n.id.as_str()).collect();
    let ids_b: Vec<&str> = b.tree.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids_a, ids_b);
}

#[test]
fn test_child_listed_before_parent_is_linked() {
    let data = parse(FULL);
    let building = data.tree.get("drawing:01").unwrap();
    assert_eq!(
        building.children,
        vec!["drawing:02".to_string(), "discipline:01:건축".to_string()]
    );

    let floor = data.tree.get("drawing:02").unwrap();
    assert_eq!(floor.parent_id.as_deref(), Some("drawing:01"));
    assert_eq!(floor.path, vec!["Site", "Building A", "Floor 1"]);
}

#[test]
fn test_children_follow_document_order() {
    let data = parse(FULL);
    let arch = data.tree.get("discipline:01:건축").unwrap();
    assert_eq!(
        arch.children,
        vec!["region:01:건축:A".to_string(), "region:01:건축:B".to_string()]
    );
    let region_a = data.tree.get("region:01:건축:A").unwrap();
    assert_eq!(
        region_a.children,
        vec![
            "revision:01:건축:A:REV1".to_string(),
            "revision:01:건축:A:REV2".to_string()
        ]
    );
}

#[test]
fn test_discipline_without_history_is_a_leaf() {
    let data = parse(FULL);
    let fire = data.tree.get("discipline:02:소방").unwrap();
    assert!(fire.children.is_empty());
    assert!(fire.polygon().is_some());
    assert!(data.revisions.iter().all(|r| r.discipline != "소방"));
}

#[test]
fn test_null_discipline_is_skipped() {
    let data = parse(FULL);
    assert!(!data.tree.contains("discipline:02:조경"));
}

#[test]
fn test_falsy_disciplines_are_skipped() {
    let json = r#"{"drawings": {
        "00": {"id": "00", "name": "Site", "image": "s.png", "disciplines": {
            "A": {"revisions": [{"version": "REV1", "image": "a1.png"}]},
            "B": false,
            "C": 0,
            "D": "",
            "E": null
        }}
    }}"#;
    let data = parse_metadata_json(json).unwrap();
    assert_eq!(data.revisions.len(), 1);
    assert!(data.tree.contains("discipline:00:A"));
    for name in ["B", "C", "D", "E"] {
        assert!(!data.tree.contains(&format!("discipline:00:{name}")));
    }
    assert_eq!(data.tree.get("drawing:00").unwrap().children.len(), 1);
}

#[test]
fn test_flat_revisions_attach_to_discipline() {
    let data = parse(FULL);
    let node = data.tree.get("revision:02:구조:REV2A").unwrap();
    assert_eq!(node.parent_id.as_deref(), Some("discipline:02:구조"));
    assert_eq!(node.path, vec!["Site", "Building A", "Floor 1", "구조", "REV2A"]);
    match &node.data {
        NodeData::Revision {
            region_id, image, ..
        } => {
            assert!(region_id.is_none());
            assert_eq!(image, "s2.png");
        }
        other => panic!("unexpected node data {other:?}"),
    }
}

#[test]
fn test_root_prefers_drawing_00() {
    let json = r#"{"drawings": {
        "10": {"id": "10", "name": "Other", "image": "o.png", "parent": null},
        "00": {"id": "00", "name": "Root", "image": "r.png", "parent": null}
    }}"#;
    let data = parse_metadata_json(json).unwrap();
    assert_eq!(data.tree.root_id(), "drawing:00");
}

#[test]
fn test_root_falls_back_to_parentless_drawing() {
    let json = r#"{"drawings": {
        "05": {"id": "05", "name": "Child", "image": "c.png", "parent": "07"},
        "07": {"id": "07", "name": "Top", "image": "t.png", "parent": null}
    }}"#;
    let data = parse_metadata_json(json).unwrap();
    assert_eq!(data.tree.root_id(), "drawing:07");
}

#[test]
fn test_root_falls_back_to_first_drawing() {
    let json = r#"{"drawings": {
        "05": {"id": "05", "name": "A", "image": "a.png", "parent": "06"},
        "06": {"id": "06", "name": "B", "image": "b.png", "parent": "05"}
    }}"#;
    let data = parse_metadata_json(json).unwrap();
    assert_eq!(data.tree.root_id(), "drawing:05");
}

#[test]
fn test_dangling_parent_becomes_path_root() {
    let json = r#"{"drawings": {
        "00": {"id": "00", "name": "Root", "image": "r.png", "parent": null},
        "03": {"id": "03", "name": "Orphan", "image": "o.png", "parent": "99"}
    }}"#;
    let data = parse_metadata_json(json).unwrap();
    let orphan = data.tree.get("drawing:03").unwrap();
    assert_eq!(orphan.path, vec!["Orphan"]);
    assert!(orphan.parent_id.is_none());
    assert!(data.tree.validate().is_empty());
}

#[test]
fn test_parent_cycle_terminates_and_stays_acyclic() {
    let json = r#"{"drawings": {
        "05": {"id": "05", "name": "A", "image": "a.png", "parent": "06"},
        "06": {"id": "06", "name": "B", "image": "b.png", "parent": "05"}
    }}"#;
    let data = parse_metadata_json(json).unwrap();

    assert_eq!(data.tree.get("drawing:05").unwrap().path, vec!["B", "A"]);
    assert_eq!(data.tree.get("drawing:06").unwrap().path, vec!["A", "B"]);
    assert!(data.tree.validate().is_empty());

    for node in data.tree.iter() {
        let ancestors = data.tree.ancestors(&node.id);
        assert!(ancestors.iter().all(|a| a.id != node.id));
    }
    assert_eq!(
        data.tree.get("drawing:05").unwrap().parent_id.as_deref(),
        Some("drawing:06")
    );
    assert!(data.tree.get("drawing:06").unwrap().parent_id.is_none());
}

#[test]
fn test_empty_document() {
    let data = parse_metadata_json(r#"{"drawings": {}}"#).unwrap();
    assert!(data.tree.is_empty());
    assert_eq!(data.tree.root_id(), "");
    assert!(data.tree.root().is_none());
    assert!(data.revisions.is_empty());
}

#[test]
fn test_malformed_json_is_an_error() {
    assert!(parse_metadata_json("{").is_err());
}

#[test]
fn test_drawing_node_for() {
    let data = parse(FULL);
    let owner = data.tree.drawing_node_for("revision:01:건축:B:REV1").unwrap();
    assert_eq!(owner.id, "drawing:01");
    let own = data.tree.drawing_node_for("drawing:00").unwrap();
    assert_eq!(own.id, "drawing:00");
}
