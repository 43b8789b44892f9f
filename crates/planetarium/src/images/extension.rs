//! Accepted image extensions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// An image extension accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageExtension {
    /// `.png`
    Png,
    /// `.jpg`
    Jpg,
    /// `.jpeg`
    Jpeg,
    /// `.gif`
    Gif,
}

impl ImageExtension {
    /// Every accepted extension, in the order stored files are looked up.
    pub const ALL: [Self; 4] = [Self::Png, Self::Jpg, Self::Jpeg, Self::Gif];

    /// The extension as written in file names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
        }
    }
}

impl std::fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageExtension {
    type Err = Error;

    /// Parse an extension, ignoring ASCII case and a leading dot.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|ext| ext.as_str() == normalized)
            .ok_or_else(|| Error::InvalidExtension {
                extension: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allowed() {
        assert_eq!("png".parse::<ImageExtension>().unwrap(), ImageExtension::Png);
        assert_eq!("jpg".parse::<ImageExtension>().unwrap(), ImageExtension::Jpg);
        assert_eq!(
            "jpeg".parse::<ImageExtension>().unwrap(),
            ImageExtension::Jpeg
        );
        assert_eq!("gif".parse::<ImageExtension>().unwrap(), ImageExtension::Gif);
    }

    #[test]
    fn test_parse_ignores_case_and_dot() {
        assert_eq!("PNG".parse::<ImageExtension>().unwrap(), ImageExtension::Png);
        assert_eq!(
            ".JpEg".parse::<ImageExtension>().unwrap(),
            ImageExtension::Jpeg
        );
    }

    #[test]
    fn test_parse_rejected() {
        for bad in ["exe", "", "svg", "png.exe", "tiff"] {
            match bad.parse::<ImageExtension>() {
                Err(Error::InvalidExtension { extension }) => assert_eq!(extension, bad),
                other => panic!("expected InvalidExtension for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_display() {
        let names: Vec<_> = ImageExtension::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["png", "jpg", "jpeg", "gif"]);
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&ImageExtension::Jpeg).unwrap();
        assert_eq!(json, "\"jpeg\"");
    }
}
