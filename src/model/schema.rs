//! Cell tags, column types and column metadata

use serde::{Deserialize, Serialize};

/// Cell kind reported by the workbook decoder, before any interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LowLevelTypeTag {
    Empty,
    Text,
    Number,
    Date,
    Boolean,
    Error,
    Blank,
    /// A code outside the known set
    Unknown(u8),
}

impl LowLevelTypeTag {
    /// Map a BIFF reader cell type code to a tag
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => LowLevelTypeTag::Empty,
            1 => LowLevelTypeTag::Text,
            2 => LowLevelTypeTag::Number,
            3 => LowLevelTypeTag::Date,
            4 => LowLevelTypeTag::Boolean,
            5 => LowLevelTypeTag::Error,
            6 => LowLevelTypeTag::Blank,
            other => LowLevelTypeTag::Unknown(other),
        }
    }

    /// The default column type for this tag
    ///
    /// Date maps to DateTime here; the date normalizer narrows it once the
    /// whole column has been seen. Unknown codes fall back to Text.
    pub fn semantic_type(self) -> SemanticType {
        match self {
            LowLevelTypeTag::Empty => SemanticType::Boolean,
            LowLevelTypeTag::Text => SemanticType::Text,
            LowLevelTypeTag::Number => SemanticType::Number,
            LowLevelTypeTag::Date => SemanticType::DateTime,
            LowLevelTypeTag::Boolean => SemanticType::Boolean,
            LowLevelTypeTag::Error => SemanticType::Text,
            LowLevelTypeTag::Blank => SemanticType::Boolean,
            LowLevelTypeTag::Unknown(_) => SemanticType::Text,
        }
    }
}

/// User-facing type of a whole column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Text,
    Number,
    Boolean,
    Date,
    Time,
    DateTime,
    TimeDelta,
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SemanticType::Text => write!(f, "text"),
            SemanticType::Number => write!(f, "number"),
            SemanticType::Boolean => write!(f, "boolean"),
            SemanticType::Date => write!(f, "date"),
            SemanticType::Time => write!(f, "time"),
            SemanticType::DateTime => write!(f, "datetime"),
            SemanticType::TimeDelta => write!(f, "timedelta"),
        }
    }
}

impl std::str::FromStr for SemanticType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(SemanticType::Text),
            "number" => Ok(SemanticType::Number),
            "boolean" | "bool" => Ok(SemanticType::Boolean),
            "date" => Ok(SemanticType::Date),
            "time" => Ok(SemanticType::Time),
            "datetime" => Ok(SemanticType::DateTime),
            "timedelta" => Ok(SemanticType::TimeDelta),
            _ => Err(format!("Unknown column type: {}", s)),
        }
    }
}

/// Column metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name (from header or caller), if any
    pub name: Option<String>,
    /// Column index (0-based position)
    pub index: usize,
    /// Final type of every value in the column
    pub semantic_type: SemanticType,
}

impl Column {
    /// Create a column with a specified type
    pub fn new(name: Option<String>, index: usize, semantic_type: SemanticType) -> Self {
        Self {
            name,
            index,
            semantic_type,
        }
    }

    /// Name for display, falling back to a spreadsheet-style letter
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => column_letter(self.index),
        }
    }
}

/// Spreadsheet column letter for a 0-based index (0 -> A, 26 -> AA)
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
