use std::fmt;

/// Machine-readable error codes shared by every netseg crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    GraphParseError,
    UnknownVertex,
    DuplicateVertex,
    MissingAttribute,
    UnknownLevel,
    GroupingMismatch,
    DimensionMismatch,
    NotSquare,
    MismatchedGroups,
    UndirectedCrossAttributes,
    DirectedOnUndirected,
    ContactExceedsMargin,
    NotFullMatrix,
    NoTies,
    EmptyGroup,
    RequiresUndirected,
    UndefinedIndex,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::GraphParseError => "E1002",
            Self::UnknownVertex => "E2001",
            Self::DuplicateVertex => "E2002",
            Self::MissingAttribute => "E2003",
            Self::UnknownLevel => "E2004",
            Self::GroupingMismatch => "E2005",
            Self::DimensionMismatch => "E3001",
            Self::NotSquare => "E3002",
            Self::MismatchedGroups => "E3003",
            Self::UndirectedCrossAttributes => "E3004",
            Self::DirectedOnUndirected => "E3005",
            Self::ContactExceedsMargin => "E3006",
            Self::NotFullMatrix => "E3007",
            Self::NoTies => "E4001",
            Self::EmptyGroup => "E4002",
            Self::RequiresUndirected => "E4003",
            Self::UndefinedIndex => "E4004",
        }
    }

    /// Short human-facing summary for logs.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::GraphParseError => "Graph document parse error",
            Self::UnknownVertex => "Unknown vertex",
            Self::DuplicateVertex => "Duplicate vertex name",
            Self::MissingAttribute => "Vertex is missing the grouping attribute",
            Self::UnknownLevel => "Attribute value outside the declared levels",
            Self::GroupingMismatch => "Grouping does not cover the graph's vertices",
            Self::DimensionMismatch => "Table dimensions do not match",
            Self::NotSquare => "Matrix is not square",
            Self::MismatchedGroups => "Ego and alter groups differ",
            Self::UndirectedCrossAttributes => "Undirected mixing needs a single attribute",
            Self::DirectedOnUndirected => "Cannot treat an undirected graph as directed",
            Self::ContactExceedsMargin => "Tie count exceeds the number of possible dyads",
            Self::NotFullMatrix => "Full mixing matrix required",
            Self::NoTies => "No ties to compute from",
            Self::EmptyGroup => "Group has no ties",
            Self::RequiresUndirected => "Index is defined for undirected graphs only",
            Self::UndefinedIndex => "Index is undefined for this input",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in netseg.toml and retry."),
            Self::GraphParseError => {
                Some("Expected {\"directed\": bool, \"vertices\": [...], \"edges\": [[a, b], ...]}.")
            }
            Self::UnknownVertex => Some("Add the vertex before adding edges that reference it."),
            Self::DuplicateVertex => Some("Vertex names must be unique."),
            Self::MissingAttribute => Some("Give every vertex a value for the grouping attribute."),
            Self::UnknownLevel => Some("Include every observed value in the explicit level list."),
            Self::GroupingMismatch => Some("Build groupings from the graph they are applied to."),
            Self::DimensionMismatch => {
                Some("Build the contact layer and group sizes from the same groupings.")
            }
            Self::NotSquare | Self::MismatchedGroups => {
                Some("Use the same attribute for egos and alters.")
            }
            Self::UndirectedCrossAttributes => {
                Some("Use the same attribute for egos and alters, or treat the graph as directed.")
            }
            Self::DirectedOnUndirected => Some("Leave `directed` unset for undirected graphs."),
            Self::ContactExceedsMargin => {
                Some("Set `loops = true` if the graph has self-ties; remove multi-edges.")
            }
            Self::NotFullMatrix => Some("Compute the mixing matrix with `full = true`."),
            Self::NoTies | Self::EmptyGroup | Self::UndefinedIndex => None,
            Self::RequiresUndirected => Some("Convert the graph to an undirected one first."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while building graphs, groupings, and mixing matrices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MixingError {
    #[error("invalid graph document: {0}")]
    GraphParse(String),

    #[error("unknown vertex '{0}'")]
    UnknownVertex(String),

    #[error("duplicate vertex '{0}'")]
    DuplicateVertex(String),

    #[error("vertex '{vertex}' has no value for attribute '{attr}'")]
    MissingAttribute { vertex: String, attr: String },

    #[error("vertex '{vertex}' has value '{value}' for '{attr}', which is not a declared level")]
    UnknownLevel {
        vertex: String,
        attr: String,
        value: String,
    },

    #[error("grouping by '{attr}' covers {grouped} vertices, graph has {vertices}")]
    GroupingMismatch {
        attr: String,
        grouped: usize,
        vertices: usize,
    },

    #[error("dimension mismatch: contact layer is {contact_rows}x{contact_cols}, group sizes give {size_rows}x{size_cols}")]
    DimensionMismatch {
        contact_rows: usize,
        contact_cols: usize,
        size_rows: usize,
        size_cols: usize,
    },

    #[error("expected a square matrix, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("ego groups and alter groups differ")]
    MismatchedGroups,

    #[error("undirected mixing matrix requested for different ego attribute '{rattr}' and alter attribute '{cattr}'")]
    UndirectedCrossAttributes { rattr: String, cattr: String },

    #[error("graph is undirected and cannot be analysed as directed")]
    DirectedOnUndirected,

    #[error("cell ({ego}, {alter}) has {contact} ties but only {margin} possible dyads")]
    ContactExceedsMargin {
        ego: String,
        alter: String,
        contact: u64,
        margin: u64,
    },
}

impl MixingError {
    /// The stable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::GraphParse(_) => ErrorCode::GraphParseError,
            Self::UnknownVertex(_) => ErrorCode::UnknownVertex,
            Self::DuplicateVertex(_) => ErrorCode::DuplicateVertex,
            Self::MissingAttribute { .. } => ErrorCode::MissingAttribute,
            Self::UnknownLevel { .. } => ErrorCode::UnknownLevel,
            Self::GroupingMismatch { .. } => ErrorCode::GroupingMismatch,
            Self::DimensionMismatch { .. } => ErrorCode::DimensionMismatch,
            Self::NotSquare { .. } => ErrorCode::NotSquare,
            Self::MismatchedGroups => ErrorCode::MismatchedGroups,
            Self::UndirectedCrossAttributes { .. } => ErrorCode::UndirectedCrossAttributes,
            Self::DirectedOnUndirected => ErrorCode::DirectedOnUndirected,
            Self::ContactExceedsMargin { .. } => ErrorCode::ContactExceedsMargin,
        }
    }
}
