//! Metadata document schema.
//!
//! These types mirror the JSON document shipped alongside the drawing
//! images. Discipline entries are decoded once into [`DisciplineHistory`]
//! so later stages never re-inspect which keys were present.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::ordered::OrderedMap;
use super::transform::{ImageTransform, PolygonTransform};

/// Top-level metadata document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawingMetadata {
    /// Project information
    #[serde(default)]
    pub project: ProjectInfo,
    /// Disciplines known to the project
    #[serde(default)]
    pub disciplines: Vec<DisciplineInfo>,
    /// Drawings keyed by drawing id, in document order
    #[serde(default)]
    pub drawings: OrderedMap<Drawing>,
}

impl DrawingMetadata {
    /// Decode a metadata document from JSON text.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Basic project information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Project name
    #[serde(default)]
    pub name: String,
    /// Length unit used by the drawings
    #[serde(default)]
    pub unit: String,
}

/// A discipline label listed at the document level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisciplineInfo {
    /// Discipline name
    pub name: String,
}

/// A drawing (building, floor, site) in the drawing hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drawing {
    /// Drawing id, also the key in the drawings object
    pub id: String,
    /// Display name
    pub name: String,
    /// Image file name of the drawing
    pub image: String,
    /// Parent drawing id, `None` for a root drawing
    #[serde(default)]
    pub parent: Option<String>,
    /// Placement of this drawing on its parent
    #[serde(default)]
    pub position: Option<Position>,
    /// Discipline data keyed by discipline name. Falsy entries are skipped.
    #[serde(default, deserialize_with = "deserialize_disciplines")]
    pub disciplines: Option<OrderedMap<Option<Discipline>>>,
}

/// Whether a JSON value is `null`, `false`, zero or the empty string.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Decode discipline entries. Falsy values become `None`; other non-object
/// values become a discipline without data.
fn deserialize_disciplines<'de, D>(
    deserializer: D,
) -> Result<Option<OrderedMap<Option<Discipline>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<OrderedMap<Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let mut disciplines = OrderedMap::new();
    for (name, value) in raw.iter() {
        let discipline = if is_falsy(value) {
            None
        } else if value.is_object() {
            Some(Discipline::deserialize(value).map_err(<D::Error as serde::de::Error>::custom)?)
        } else {
            Some(Discipline::from(RawDiscipline::default()))
        };
        disciplines.insert(name, discipline);
    }
    Ok(Some(disciplines))
}

/// Placement of a drawing on its parent drawing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Outline of the drawing on the parent image
    #[serde(default)]
    pub vertices: Option<Vec<Vec<f32>>>,
    /// Transform of the drawing image onto its parent
    pub image_transform: ImageTransform,
}

/// Region of interest polygon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Polygon {
    /// Vertices as `[x, y]` pairs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertices: Option<Vec<Vec<f32>>>,
    /// Transform applied to the vertices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon_transform: Option<PolygonTransform>,
}

impl Polygon {
    /// Vertices as points. Entries with fewer than two numbers are skipped.
    pub fn points(&self) -> Vec<(f32, f32)> {
        self.vertices
            .iter()
            .flatten()
            .filter_map(|v| match v.as_slice() {
                [x, y, ..] => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    /// Vertices after applying the polygon transform, if any.
    pub fn projected_points(&self) -> Vec<(f32, f32)> {
        let points = self.points();
        match &self.polygon_transform {
            Some(t) => {
                let t = t.resolve();
                points.into_iter().map(|(x, y)| t.apply(x, y)).collect()
            }
            None => points,
        }
    }
}

/// A dated revision of a discipline or region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    /// Version label, e.g. `REV1` or `REV2A`
    pub version: String,
    /// Image file name of this revision
    pub image: String,
    /// Revision date (YYYY-MM-DD)
    #[serde(default)]
    pub date: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// List of changes
    #[serde(default)]
    pub changes: Vec<String>,
    /// Alignment of this revision's image onto its base
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_transform: Option<ImageTransform>,
    /// Region outline for this revision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Polygon>,
}

impl Revision {
    /// Split the version label into its number and suffix (`REV2A` -> `(2, "A")`).
    ///
    /// Returns `None` when the label does not follow the `REV<number><suffix>` pattern.
    pub fn version_parts(&self) -> Option<(u32, &str)> {
        let rest = self.version.strip_prefix("REV")?;
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        let number = rest[..digits].parse().ok()?;
        Some((number, &rest[digits..]))
    }
}

/// A sub-area of a discipline with its own revision history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// Region outline
    #[serde(default)]
    pub polygon: Polygon,
    /// Revisions of this region
    #[serde(default)]
    pub revisions: Vec<Revision>,
}

/// How a discipline's history is organized.
#[derive(Debug, Clone)]
pub enum DisciplineHistory {
    /// History broken down per region
    Regions(OrderedMap<Region>),
    /// Flat revision list
    Revisions(Vec<Revision>),
    /// No revision history
    None,
}

/// Discipline data attached to a drawing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawDiscipline", into = "RawDiscipline")]
pub struct Discipline {
    /// Image of this discipline, if it differs from the drawing image
    pub image: Option<String>,
    /// Alignment onto the drawing image
    pub image_transform: Option<ImageTransform>,
    /// Outline of the discipline on the drawing
    pub polygon: Option<Polygon>,
    /// Revision history
    pub history: DisciplineHistory,
}

/// Wire shape of a discipline entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDiscipline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_transform: Option<ImageTransform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    polygon: Option<Polygon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    regions: Option<OrderedMap<Region>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    revisions: Option<Vec<Revision>>,
}

impl From<RawDiscipline> for Discipline {
    fn from(raw: RawDiscipline) -> Self {
        // Regions win when a malformed entry carries both keys.
        let history = match (raw.regions, raw.revisions) {
            (Some(regions), _) => DisciplineHistory::Regions(regions),
            (None, Some(revisions)) => DisciplineHistory::Revisions(revisions),
            (None, None) => DisciplineHistory::None,
        };
        Self {
            image: raw.image,
            image_transform: raw.image_transform,
            polygon: raw.polygon,
            history,
        }
    }
}

impl From<Discipline> for RawDiscipline {
    fn from(d: Discipline) -> Self {
        let (regions, revisions) = match d.history {
            DisciplineHistory::Regions(r) => (Some(r), None),
            DisciplineHistory::Revisions(r) => (None, Some(r)),
            DisciplineHistory::None => (None, None),
        };
        Self {
            image: d.image,
            image_transform: d.image_transform,
            polygon: d.polygon,
            regions,
            revisions,
        }
    }
}
