use serde::{Deserialize, Serialize};

use crate::core::Coordinate;

/// Clue identifier assigned by the knowledge base
pub type ClueId = i64;

/// Separator between clue type and coordinate in a description
const TYPE_SEPARATOR: &str = " at ";

/// Fixed clue categories and their point values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClueType {
    #[serde(rename = "IR signature")]
    IrSignature,
    #[serde(rename = "red hat")]
    RedHat,
    #[serde(rename = "footprint")]
    Footprint,
    #[serde(rename = "unknown")]
    Unknown,
}

impl ClueType {
    pub const ALL: [ClueType; 4] = [
        ClueType::IrSignature,
        ClueType::RedHat,
        ClueType::Footprint,
        ClueType::Unknown,
    ];

    /// Points awarded for this type
    pub const fn points(self) -> u32 {
        match self {
            ClueType::IrSignature => 30,
            ClueType::RedHat => 20,
            ClueType::Footprint => 10,
            ClueType::Unknown => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ClueType::IrSignature => "IR signature",
            ClueType::RedHat => "red hat",
            ClueType::Footprint => "footprint",
            ClueType::Unknown => "unknown",
        }
    }

    /// Exact, case-sensitive lookup; anything else is `Unknown`
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.label() == label)
            .unwrap_or(ClueType::Unknown)
    }
}

impl std::fmt::Display for ClueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of splitting a `"<type> at <lat>,<lon>"` description
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedClue {
    /// Raw type text; may be a label outside the points table
    pub type_label: String,
    pub coordinate: Coordinate,
}

impl ParsedClue {
    pub fn clue_type(&self) -> ClueType {
        ClueType::from_label(&self.type_label)
    }
}

/// Parse a clue description, never failing.
///
/// Without `" at "` the type is `"unknown"` at the origin. A malformed
/// coordinate falls back to the origin but keeps the extracted type.
pub fn parse_clue(description: &str) -> ParsedClue {
    let mut parts = description.split(TYPE_SEPARATOR);
    let head = parts.next().unwrap_or_default();

    let Some(location) = parts.next() else {
        return ParsedClue {
            type_label: ClueType::Unknown.label().to_string(),
            coordinate: Coordinate::ORIGIN,
        };
    };

    ParsedClue {
        type_label: head.trim().to_string(),
        coordinate: parse_coordinate(location).unwrap_or(Coordinate::ORIGIN),
    }
}

fn parse_coordinate(text: &str) -> Option<Coordinate> {
    let mut fields = text.split(',');
    let lat = fields.next()?.trim().parse::<f64>().ok()?;
    let lon = fields.next()?.trim().parse::<f64>().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some(Coordinate::new(lat, lon))
}
