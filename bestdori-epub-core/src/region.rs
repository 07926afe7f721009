//! Server regions.
//!
//! The mirror stores per-region values as fixed-position arrays; a region
//! selects a slot in those arrays and a directory in the asset tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Game server region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Japanese server.
    Jp,
    /// Worldwide English server.
    #[default]
    En,
    /// Taiwanese server.
    Tw,
    /// Chinese server.
    Cn,
    /// Korean server.
    Kr,
}

impl Region {
    /// Slot of this region in the mirror's per-region arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Jp => 0,
            Self::En => 1,
            Self::Tw => 2,
            Self::Cn => 3,
            Self::Kr => 4,
        }
    }

    /// Directory name of this region in the asset tree.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Jp => "jp",
            Self::En => "en",
            Self::Tw => "tw",
            Self::Cn => "cn",
            Self::Kr => "kr",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_en() {
        assert_eq!(Region::default(), Region::En);
        assert_eq!(Region::default().index(), 1);
    }

    #[test]
    fn test_indices_are_array_slots() {
        let all = [Region::Jp, Region::En, Region::Tw, Region::Cn, Region::Kr];
        for (slot, region) in all.into_iter().enumerate() {
            assert_eq!(region.index(), slot);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let region: Region = serde_json::from_str(r#""kr""#).unwrap();
        assert_eq!(region, Region::Kr);
        assert_eq!(serde_json::to_string(&Region::Jp).unwrap(), r#""jp""#);
        assert_eq!(Region::Tw.to_string(), "tw");
    }
}
