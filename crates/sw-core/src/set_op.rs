//! Set-operation kinds and multiplicities

use serde::{Deserialize, Serialize};

/// Set operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetOpKind {
    /// UNION
    Union,
    /// INTERSECT
    Intersect,
    /// EXCEPT (difference)
    Except,
}

impl SetOpKind {
    /// All kinds, in declaration order
    pub const ALL: [SetOpKind; 3] = [SetOpKind::Union, SetOpKind::Intersect, SetOpKind::Except];

    /// SQL keyword for this kind
    pub fn keyword(&self) -> &'static str {
        match self {
            SetOpKind::Union => "UNION",
            SetOpKind::Intersect => "INTERSECT",
            SetOpKind::Except => "EXCEPT",
        }
    }
}

impl std::fmt::Display for SetOpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Whether duplicate rows are collapsed (set) or kept (bag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Multiplicity {
    /// Set semantics
    Distinct,
    /// Bag semantics
    All,
}

impl Multiplicity {
    /// Both multiplicities
    pub const ALL: [Multiplicity; 2] = [Multiplicity::Distinct, Multiplicity::All];

    /// Map a `distinct` flag to a multiplicity
    pub fn from_distinct(distinct: bool) -> Self {
        if distinct {
            Multiplicity::Distinct
        } else {
            Multiplicity::All
        }
    }

    /// Whether this is the set-semantics variant
    pub fn is_distinct(&self) -> bool {
        matches!(self, Multiplicity::Distinct)
    }
}

impl std::fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Multiplicity::Distinct => write!(f, "DISTINCT"),
            Multiplicity::All => write!(f, "ALL"),
        }
    }
}
