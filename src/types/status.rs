//! Overall dashboard status derived from the trouble count

use serde::{Deserialize, Serialize};

/// Trouble counts above this are `TROUBLE`; 1..=this is `ATTENTION`.
pub const ATTENTION_MAX_TROUBLES: usize = 50;

/// Dashboard status banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardStatus {
    /// No troubles at all
    Normal,
    /// At most `ATTENTION_MAX_TROUBLES` troubles
    Attention,
    /// More than `ATTENTION_MAX_TROUBLES` troubles
    Trouble,
}

impl DashboardStatus {
    pub fn from_trouble_count(trouble_count: usize) -> Self {
        match trouble_count {
            0 => DashboardStatus::Normal,
            n if n <= ATTENTION_MAX_TROUBLES => DashboardStatus::Attention,
            _ => DashboardStatus::Trouble,
        }
    }
}

impl std::fmt::Display for DashboardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardStatus::Normal => write!(f, "NORMAL"),
            DashboardStatus::Attention => write!(f, "ATTENTION"),
            DashboardStatus::Trouble => write!(f, "TROUBLE"),
        }
    }
}
