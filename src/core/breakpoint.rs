//! Responsive breakpoints
//!
//! The style cascade is an explicit override list, not a narrow-to-wide
//! ordering: `desktop` is the base, then `tablet`, `mobile` and finally
//! `wide`. Rendering at `wide` therefore picks up mobile overrides too.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Responsive viewport category used to select style overrides
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Breakpoint {
    #[default]
    Desktop,
    Tablet,
    Mobile,
    Wide,
}

impl Breakpoint {
    /// Override order used when merging per-breakpoint styles.
    pub const CASCADE: [Breakpoint; 4] = [
        Breakpoint::Desktop,
        Breakpoint::Tablet,
        Breakpoint::Mobile,
        Breakpoint::Wide,
    ];

    /// Position of this breakpoint in [`Breakpoint::CASCADE`].
    pub fn cascade_index(self) -> usize {
        match self {
            Breakpoint::Desktop => 0,
            Breakpoint::Tablet => 1,
            Breakpoint::Mobile => 2,
            Breakpoint::Wide => 3,
        }
    }

    /// The breakpoints whose styles apply when rendering at `self`,
    /// in merge order.
    pub fn cascade(self) -> &'static [Breakpoint] {
        &Self::CASCADE[..=self.cascade_index()]
    }

    /// Toolbar label
    pub fn label(self) -> &'static str {
        match self {
            Breakpoint::Desktop => "Desktop",
            Breakpoint::Tablet => "Tablet",
            Breakpoint::Mobile => "Mobile",
            Breakpoint::Wide => "Wide",
        }
    }
}
