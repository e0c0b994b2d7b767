//! Ship rendering styles
//!
//! Every generated ship is rendered in one of two aesthetics:
//! - Blocky: toy-like, low-poly, vibrant simulator look
//! - Real life: photorealistic travel photography
//!
//! The style is picked per prompt by [`crate::session::rules::classify_style`].

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendering aesthetic selected for an image request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StyleHint {
    /// Blocky, toy-like simulator render
    #[default]
    Blocky,

    /// Photorealistic cruise ship photograph
    RealLife,
}

impl fmt::Display for StyleHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocky => write!(f, "BLOCKY"),
            Self::RealLife => write!(f, "REAL LIFE"),
        }
    }
}

impl StyleHint {
    /// Get a user-friendly description of this style
    pub fn description(&self) -> &'static str {
        match self {
            Self::Blocky => "Blocky toy-style build with vibrant colors",
            Self::RealLife => "Photorealistic ship from real life",
        }
    }

    /// Get a colored tag representation of this style
    pub fn colored_tag(&self) -> String {
        match self {
            Self::Blocky => format!("[{}]", "BLOCKY".green()),
            Self::RealLife => format!("[{}]", "REAL LIFE".cyan()),
        }
    }
}
