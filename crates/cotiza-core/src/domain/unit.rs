use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The two daily-valued reference units published by the BCU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Unidad Indexada.
    Ui,
    /// Unidad Reajustable.
    Ur,
}

impl UnitKind {
    /// Parse the short code used in URLs and cache keys, case-insensitively.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "ui" => Ok(Self::Ui),
            "ur" => Ok(Self::Ur),
            _ => Err(ValidationError::InvalidUnitKind {
                value: input.to_owned(),
            }),
        }
    }

    /// Short code, as sent to the upstream and used in cache keys.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ui => "ui",
            Self::Ur => "ur",
        }
    }

    /// Uppercase tag carried in the `tipo` field of responses.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Ui => "UI",
            Self::Ur => "UR",
        }
    }

    /// Substring matched against the first cell of each result-table row.
    ///
    /// "UNIDAD REAJUSTAB" is intentionally a prefix: the upstream has shipped
    /// both "UNIDAD REAJUSTABLE" and abbreviated variants of the row name.
    pub const fn row_label(self) -> &'static str {
        match self {
            Self::Ui => "UNIDAD INDEXADA",
            Self::Ur => "UNIDAD REAJUSTAB",
        }
    }

    /// Default display name when the source row label is unavailable.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Ui => "UNIDAD INDEXADA",
            Self::Ur => "UNIDAD REAJUSTABLE",
        }
    }

    /// Mixed-case name used inside human-readable messages.
    pub const fn human_name(self) -> &'static str {
        match self {
            Self::Ui => "Unidad Indexada",
            Self::Ur => "Unidad Reajustable",
        }
    }
}

impl Display for UnitKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
