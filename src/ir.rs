use serde::{Deserialize, Serialize};

/// Legacy colouring thresholds used when a node carries no `timeRanges`.
pub const DEFAULT_POOR_MS: f64 = 2000.0;
pub const DEFAULT_BAD_MS: f64 = 5000.0;

/// Layout direction handed to the layered algorithm as `rankdir`.
///
/// Only `LR` and `TB` are interpreted; any other token is carried through
/// untouched and behaves like "not horizontal".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Orientation {
    #[default]
    TopBottom,
    LeftRight,
    Other(String),
}

impl Orientation {
    pub fn from_token(token: &str) -> Self {
        match token {
            "TB" => Self::TopBottom,
            "LR" => Self::LeftRight,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_token(&self) -> &str {
        match self {
            Self::TopBottom => "TB",
            Self::LeftRight => "LR",
            Self::Other(token) => token.as_str(),
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::LeftRight)
    }
}

impl From<String> for Orientation {
    fn from(value: String) -> Self {
        Self::from_token(&value)
    }
}

impl From<Orientation> for String {
    fn from(value: Orientation) -> Self {
        value.as_token().to_string()
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeRanges {
    pub poor: f64,
    pub bad: f64,
}

impl Default for TimeRanges {
    fn default() -> Self {
        Self {
            poor: DEFAULT_POOR_MS,
            bad: DEFAULT_BAD_MS,
        }
    }
}

/// One step of the action graph as authored in the page builder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    /// Authored duration in milliseconds.
    pub time: f64,
    pub is_calculated: bool,
    pub colorize_time: bool,
    pub time_ranges: Option<TimeRanges>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, time: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            time,
            ..Self::default()
        }
    }

    pub fn calculated(mut self) -> Self {
        self.is_calculated = true;
        self
    }

    pub fn colorized(mut self) -> Self {
        self.colorize_time = true;
        self
    }

    pub fn with_time_ranges(mut self, poor: f64, bad: f64) -> Self {
        self.time_ranges = Some(TimeRanges { poor, bad });
        self
    }

    pub fn time_ranges_or_default(&self) -> TimeRanges {
        self.time_ranges.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Arrow,
    ArrowClosed,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphEdge {
    #[serde(rename = "fromNodeID")]
    pub from: String,
    #[serde(rename = "toNodeID")]
    pub to: String,
    pub animated: bool,
    /// Absent on older documents, which lay out every edge.
    pub auto_layout: Option<bool>,
    pub marker_end: Option<MarkerKind>,
    #[serde(rename = "type")]
    pub edge_type: Option<String>,
}

impl GraphEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Self::default()
        }
    }

    pub fn manual(mut self) -> Self {
        self.auto_layout = Some(false);
        self
    }

    pub fn with_marker(mut self, marker: MarkerKind) -> Self {
        self.marker_end = Some(marker);
        self
    }

    pub fn is_auto_layout(&self) -> bool {
        self.auto_layout.unwrap_or(true)
    }

    pub fn render_id(&self) -> String {
        format!("edge-{}-{}", self.from, self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphSettings {
    pub background_color: String,
    pub orientation: Orientation,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            background_color: "#fcfcfc".to_string(),
            orientation: Orientation::TopBottom,
        }
    }
}

/// Everything the widget receives from the property panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphDocument {
    pub graph: GraphSettings,
    pub height: f32,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphDocument {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            graph: GraphSettings {
                orientation,
                ..GraphSettings::default()
            },
            ..Self::default()
        }
    }
}

impl Default for GraphDocument {
    fn default() -> Self {
        Self {
            graph: GraphSettings::default(),
            height: 700.0,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}
