use serde::{Deserialize, Serialize};

use crate::timing::TimeBucket;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeColors {
    pub fill: String,
    pub text: String,
}

impl BadgeColors {
    fn new(fill: &str, text: &str) -> Self {
        Self {
            fill: fill.to_string(),
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub node_fill: String,
    pub node_border: String,
    pub text_color: String,
    pub line_color: String,
    pub handle_color: String,
    pub neutral: BadgeColors,
    pub good: BadgeColors,
    pub warning: BadgeColors,
    pub critical: BadgeColors,
}

impl Theme {
    /// Light slate palette used by the page builder canvas.
    pub fn slate() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            node_fill: "#F8FAFC".to_string(),
            node_border: "#E2E8F0".to_string(),
            text_color: "#0F172A".to_string(),
            line_color: "#B1B1B7".to_string(),
            handle_color: "#64748B".to_string(),
            neutral: BadgeColors::new("#F1F5F9", "#94A3B8"),
            good: BadgeColors::new("#DCFCE7", "#16A34A"),
            warning: BadgeColors::new("#FEF9C3", "#CA8A04"),
            critical: BadgeColors::new("#FEE2E2", "#EF4444"),
        }
    }

    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            node_fill: "#1E293B".to_string(),
            node_border: "#334155".to_string(),
            text_color: "#E2E8F0".to_string(),
            line_color: "#64748B".to_string(),
            handle_color: "#94A3B8".to_string(),
            neutral: BadgeColors::new("#334155", "#94A3B8"),
            good: BadgeColors::new("#14532D", "#86EFAC"),
            warning: BadgeColors::new("#713F12", "#FDE047"),
            critical: BadgeColors::new("#7F1D1D", "#FCA5A5"),
        }
    }

    pub fn badge(&self, bucket: TimeBucket) -> &BadgeColors {
        match bucket {
            TimeBucket::Neutral => &self.neutral,
            TimeBucket::Good => &self.good,
            TimeBucket::Warning => &self.warning,
            TimeBucket::Critical => &self.critical,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::slate()
    }
}
