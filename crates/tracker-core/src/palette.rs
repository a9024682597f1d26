use crate::Status;

pub const GREEN: &str = "#22c55e";
pub const BLUE: &str = "#3b82f6";
pub const PURPLE: &str = "#a855f7";
pub const YELLOW: &str = "#eab308";
pub const RED: &str = "#ef4444";
pub const GRAY: &str = "#6b7280";

/// The colors a status may use. Built once at startup and handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// The six status colors the editor offers.
    pub fn standard() -> Self {
        Palette {
            colors: [GREEN, BLUE, PURPLE, YELLOW, RED, GRAY]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }

    /// Case-insensitive, so "#22C55E" and "#22c55e" are the same color.
    pub fn contains(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c.eq_ignore_ascii_case(color))
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }
}

/// Statuses given to projects saved before statuses existed.
pub fn default_statuses() -> Vec<Status> {
    [
        ("implemented", "Implemented", GREEN),
        ("intended", "Intended", BLUE),
        ("aspirational", "Aspirational", PURPLE),
    ]
    .iter()
    .map(|(id, name, color)| Status {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
    })
    .collect()
}
