//! Shared metadata documents for parser tests.

use crate::model::ParsedDrawingData;
use crate::parse::parse_metadata_json;

/// Single drawing with one region holding one revision.
pub const MINIMAL: &str = r#"{
    "project": {"name": "Test", "unit": "px"},
    "disciplines": [{"name": "건축"}],
    "drawings": {
        "00": {
            "id": "00",
            "name": "전체 배치도",
            "image": "00_site.png",
            "parent": null,
            "position": null,
            "disciplines": {
                "건축": {
                    "regions": {
                        "A": {
                            "polygon": {"vertices": [[0, 0], [10, 0], [10, 10]]},
                            "revisions": [
                                {
                                    "version": "REV1",
                                    "image": "00_arch_a_rev1.png",
                                    "date": "2024-01-01",
                                    "description": "Initial",
                                    "changes": []
                                }
                            ]
                        }
                    }
                }
            }
        }
    }
}"#;

/// Two-level hierarchy covering every discipline shape.
///
/// Drawing `02` is listed before its parent `01`.
pub const FULL: &str = r#"{
    "project": {"name": "Campus", "unit": "px"},
    "disciplines": [{"name": "건축"}, {"name": "구조"}, {"name": "소방"}],
    "drawings": {
        "00": {
            "id": "00",
            "name": "Site",
            "image": "site.png",
            "parent": null,
            "position": null
        },
        "02": {
            "id": "02",
            "name": "Floor 1",
            "image": "floor1.png",
            "parent": "01",
            "position": {
                "vertices": [[0, 0], [5, 0], [5, 5]],
                "imageTransform": {"x": 1, "y": 2, "scale": 0.5, "rotation": 0}
            },
            "disciplines": {
                "구조": {
                    "image": "floor1_struct.png",
                    "imageTransform": {"x": 0, "y": 0, "scale": 1, "rotation": 0, "relativeTo": "floor1.png"},
                    "revisions": [
                        {"version": "REV1", "image": "s1.png", "date": "2024-01-01", "description": "", "changes": []},
                        {"version": "REV2A", "image": "s2.png", "date": "2024-02-01", "description": "", "changes": ["beam"]}
                    ]
                },
                "소방": {"polygon": {"vertices": [[1, 1], [2, 2], [3, 1]]}},
                "조경": null
            }
        },
        "01": {
            "id": "01",
            "name": "Building A",
            "image": "building_a.png",
            "parent": "00",
            "position": null,
            "disciplines": {
                "건축": {
                    "regions": {
                        "A": {
                            "polygon": {},
                            "revisions": [
                                {"version": "REV1", "image": "a1.png", "date": "2024-01-01", "description": "", "changes": []},
                                {"version": "REV2", "image": "a2.png", "date": "2024-03-01", "description": "", "changes": []}
                            ]
                        },
                        "B": {
                            "polygon": {},
                            "revisions": [
                                {"version": "REV1", "image": "b1.png", "date": "2024-01-01", "description": "", "changes": []}
                            ]
                        }
                    }
                }
            }
        }
    }
}"#;

pub fn parse(json: &str) -> ParsedDrawingData {
    parse_metadata_json(json).expect("fixture parses")
}

/// Count revision objects directly in a JSON document.
pub fn count_source_revisions(json: &str) -> usize {
    let value: serde_json::Value = serde_json::from_str(json).unwrap();
    let mut count = 0;
    for drawing in value["drawings"].as_object().unwrap().values() {
        let Some(disciplines) = drawing.get("disciplines").and_then(|d| d.as_object()) else {
            continue;
        };
        for discipline in disciplines.values() {
            if let Some(regions) = discipline.get("regions").and_then(|r| r.as_object()) {
                for region in regions.values() {
                    count += region["revisions"].as_array().map_or(0, Vec::len);
                }
            } else if let Some(list) = discipline.get("revisions").and_then(|r| r.as_array()) {
                count += list.len();
            }
        }
    }
    count
}
