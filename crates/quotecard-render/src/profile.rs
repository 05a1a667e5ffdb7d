use core::fmt;

use serde::{Deserialize, Serialize};

/// Export target identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileId {
    /// 1200x630 social-share target.
    Share,
    /// 1400x800 download target.
    Download,
}

/// Canvas geometry and typography ratios for one export target.
///
/// The two shipped profiles are layout contracts: their ratios and
/// gap sizes are fixed, only the glyph widths vary by backend.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportProfile {
    pub id: ProfileId,
    pub canvas_width_px: u32,
    pub canvas_height_px: u32,
    pub padding_px: u32,
    /// Quote font = round(base font * this).
    pub quote_font_scale: f32,
    /// Author font = round(base font * this).
    pub author_font_scale: f32,
    /// Quote line height = round(quote font * this).
    pub quote_line_height_scale: f32,
    /// Author line height = round(author font * this).
    pub author_line_height_scale: f32,
    /// Fixed gap between the quote and author blocks, always added
    /// even when one block is empty.
    pub inter_block_gap_px: i32,
}

impl ExportProfile {
    /// Social-share profile (Twitter card aspect ratio).
    pub const fn share() -> Self {
        Self {
            id: ProfileId::Share,
            canvas_width_px: 1200,
            canvas_height_px: 630,
            padding_px: 60,
            quote_font_scale: 1.8,
            author_font_scale: 0.9,
            quote_line_height_scale: 1.3,
            author_line_height_scale: 1.5,
            inter_block_gap_px: 20,
        }
    }

    /// Download profile (higher resolution for saving as a file).
    pub const fn download() -> Self {
        Self {
            id: ProfileId::Download,
            canvas_width_px: 1400,
            canvas_height_px: 800,
            padding_px: 80,
            quote_font_scale: 2.0,
            author_font_scale: 1.1,
            quote_line_height_scale: 1.3,
            author_line_height_scale: 1.5,
            inter_block_gap_px: 24,
        }
    }

    /// Profile for an export target id.
    pub const fn for_id(id: ProfileId) -> Self {
        match id {
            ProfileId::Share => Self::share(),
            ProfileId::Download => Self::download(),
        }
    }

    /// Usable text width between the side paddings.
    pub fn content_width_px(&self) -> u32 {
        self.canvas_width_px
            .saturating_sub(self.padding_px.saturating_mul(2))
    }

    /// Check the geometry invariants (positive dims, padding leaves
    /// usable width).
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.canvas_width_px == 0 || self.canvas_height_px == 0 || self.padding_px == 0 {
            return Err(ProfileError::ZeroDimension);
        }
        if self.padding_px * 2 >= self.canvas_width_px {
            return Err(ProfileError::PaddingTooWide {
                padding_px: self.padding_px,
                canvas_width_px: self.canvas_width_px,
            });
        }
        Ok(())
    }
}

/// Geometry invariant violation in an export profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileError {
    /// Width, height, or padding was zero.
    ZeroDimension,
    /// `2 * padding` does not leave any content width.
    PaddingTooWide { padding_px: u32, canvas_width_px: u32 },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "profile dimensions must be positive"),
            Self::PaddingTooWide {
                padding_px,
                canvas_width_px,
            } => write!(
                f,
                "padding leaves no content width (padding={} canvas_width={})",
                padding_px, canvas_width_px
            ),
        }
    }
}

impl std::error::Error for ProfileError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_profile_matches_contract() {
        let profile = ExportProfile::share();
        assert_eq!(
            (profile.canvas_width_px, profile.canvas_height_px),
            (1200, 630)
        );
        assert_eq!(profile.padding_px, 60);
        assert_eq!(profile.quote_font_scale, 1.8);
        assert_eq!(profile.author_font_scale, 0.9);
        assert_eq!(profile.inter_block_gap_px, 20);
        assert_eq!(profile.content_width_px(), 1080);
        profile.validate().unwrap();
    }

    #[test]
    fn download_profile_matches_contract() {
        let profile = ExportProfile::download();
        assert_eq!(
            (profile.canvas_width_px, profile.canvas_height_px),
            (1400, 800)
        );
        assert_eq!(profile.padding_px, 80);
        assert_eq!(profile.quote_font_scale, 2.0);
        assert_eq!(profile.author_font_scale, 1.1);
        assert_eq!(profile.inter_block_gap_px, 24);
        assert_eq!(profile.content_width_px(), 1240);
        profile.validate().unwrap();
    }

    #[test]
    fn both_profiles_share_line_height_ratios() {
        for profile in [ExportProfile::share(), ExportProfile::download()] {
            assert_eq!(profile.quote_line_height_scale, 1.3);
            assert_eq!(profile.author_line_height_scale, 1.5);
        }
    }

    #[test]
    fn validate_rejects_degenerate_geometry() {
        let mut profile = ExportProfile::share();
        profile.padding_px = 600;
        assert_eq!(
            profile.validate(),
            Err(ProfileError::PaddingTooWide {
                padding_px: 600,
                canvas_width_px: 1200
            })
        );
        profile.canvas_width_px = 0;
        assert_eq!(profile.validate(), Err(ProfileError::ZeroDimension));
    }

    #[test]
    fn profile_serializes_round_trip() {
        let profile = ExportProfile::download();
        let json = serde_json::to_string(&profile).unwrap();
        let back: ExportProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
