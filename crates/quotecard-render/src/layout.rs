use core::fmt;
use std::sync::Arc;

use quotecard::{BackgroundMode, DecodedImage, PresentationState, Rgba};

use crate::card_ir::{
    cover_placement, CardScene, DrawCommand, ImageCommand, ImagePlacement, RectCommand,
    ResolvedTextStyle, TextCommand,
};
use crate::profile::ExportProfile;

/// Text measurement hook for glyph-accurate wrap and centering
/// decisions.
///
/// Backends install an implementation so layout uses the same width
/// model as drawing. Determinism contract: identical (text, style)
/// inputs must return identical widths within one process.
pub trait TextMeasurer: Send + Sync {
    /// Measure rendered text width in px for the provided style.
    fn measure_text_px(&self, text: &str, style: &ResolvedTextStyle) -> f32;
}

/// Fallback width model used when no backend measurer is installed.
///
/// Flat per-glyph em factors; good enough to keep wrap decisions
/// stable, not glyph-accurate.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicMeasurer;

impl TextMeasurer for HeuristicMeasurer {
    fn measure_text_px(&self, text: &str, style: &ResolvedTextStyle) -> f32 {
        let mut em_sum = 0.0f32;
        for ch in text.chars() {
            em_sum += if ch == ' ' { 0.30 } else { 0.52 };
        }
        em_sum * style.size_px
    }
}

/// Greedy word wrap against a pixel budget.
///
/// Words are separated on whitespace runs and re-joined with single
/// spaces. A line is closed when appending the next word would exceed
/// `max_width_px` and the line already holds at least one word. Words
/// are never split: a single word wider than the budget is emitted as
/// its own overflowing line.
pub fn wrap_text(
    text: &str,
    style: &ResolvedTextStyle,
    max_width_px: f32,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if measurer.measure_text_px(&candidate, style) > max_width_px && !current.is_empty() {
            lines.push(core::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Card layout engine: presentation snapshot in, draw-command scene
/// out.
#[derive(Clone)]
pub struct CardLayout {
    profile: ExportProfile,
    text_measurer: Option<Arc<dyn TextMeasurer>>,
}

impl fmt::Debug for CardLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardLayout")
            .field("profile", &self.profile)
            .field("has_text_measurer", &self.text_measurer.is_some())
            .finish()
    }
}

impl CardLayout {
    /// Create a layout engine for one export profile.
    pub fn new(profile: ExportProfile) -> Self {
        Self {
            profile,
            text_measurer: None,
        }
    }

    /// Install a shared text measurer for glyph-accurate width fitting.
    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.text_measurer = Some(measurer);
        self
    }

    pub fn profile(&self) -> &ExportProfile {
        &self.profile
    }

    fn measure(&self, text: &str, style: &ResolvedTextStyle) -> f32 {
        self.text_measurer
            .as_ref()
            .map(|m| m.measure_text_px(text, style))
            .unwrap_or_else(|| HeuristicMeasurer.measure_text_px(text, style))
    }

    /// Stage 1+2: solid fill, then the optional background image.
    ///
    /// A missing image leaves the solid fill standing alone; decode
    /// failures never reach this stage (the backend degrades them to
    /// `None` beforehand).
    pub fn compose_background(
        &self,
        scene: &mut CardScene,
        color: Rgba,
        image: Option<&DecodedImage>,
        mode: BackgroundMode,
    ) {
        scene.push_command(DrawCommand::Rect(RectCommand {
            x: 0,
            y: 0,
            width: scene.width,
            height: scene.height,
            color,
        }));
        if let Some(image) = image {
            let placement = match mode {
                BackgroundMode::Cover => {
                    cover_placement(image.width(), image.height(), scene.width, scene.height)
                }
                BackgroundMode::Repeat => ImagePlacement::Tile,
            };
            scene.push_command(DrawCommand::Image(ImageCommand {
                image: image.clone(),
                placement,
            }));
        }
    }

    /// Stages 3-5: wrap both blocks, center the combined block
    /// vertically, emit per-line horizontally centered text commands.
    pub fn layout_text(&self, scene: &mut CardScene, state: &PresentationState) {
        let profile = &self.profile;
        let base = state.base_font_size_px.max(1.0);
        let family: Arc<str> = Arc::from(state.font_family.as_str());

        let quote_style = ResolvedTextStyle {
            family: Arc::clone(&family),
            size_px: (base * profile.quote_font_scale).round(),
            color: state.quote_color,
        };
        let author_style = ResolvedTextStyle {
            family,
            size_px: (base * profile.author_font_scale).round(),
            color: state.author_color,
        };

        let max_width = profile.content_width_px() as f32;
        let quote_lines = self.wrap(state.quote_text.trim(), &quote_style, max_width);
        let author_lines = self.wrap(state.author_text.trim(), &author_style, max_width);

        let quote_line_h = (quote_style.size_px * profile.quote_line_height_scale).round() as i32;
        let author_line_h =
            (author_style.size_px * profile.author_line_height_scale).round() as i32;

        // Fixed gap is part of the content height even when a block is
        // empty.
        let total_height = quote_lines.len() as i32 * quote_line_h
            + profile.inter_block_gap_px
            + author_lines.len() as i32 * author_line_h;

        // Vertical block centering; overflow of a small canvas is
        // permitted, so y may start negative.
        let mut y = ((profile.canvas_height_px as f32 - total_height as f32) / 2.0).round() as i32;

        log::debug!(
            "card layout: profile={:?} quote_lines={} author_lines={} content_height_px={}",
            profile.id,
            quote_lines.len(),
            author_lines.len(),
            total_height
        );

        for line in quote_lines {
            self.push_centered_line(scene, line, &quote_style, y);
            y += quote_line_h;
        }
        y += profile.inter_block_gap_px;
        for line in author_lines {
            self.push_centered_line(scene, line, &author_style, y);
            y += author_line_h;
        }
    }

    /// Full composition pipeline for one snapshot.
    pub fn compose(&self, state: &PresentationState) -> CardScene {
        let profile = &self.profile;
        let mut scene = CardScene::new(profile.canvas_width_px, profile.canvas_height_px);
        self.compose_background(
            &mut scene,
            state.background_color,
            state.background_image.as_ref(),
            state.background_mode,
        );
        self.layout_text(&mut scene, state);
        scene
    }

    fn wrap(&self, text: &str, style: &ResolvedTextStyle, max_width_px: f32) -> Vec<String> {
        match self.text_measurer.as_ref() {
            Some(measurer) => wrap_text(text, style, max_width_px, measurer.as_ref()),
            None => wrap_text(text, style, max_width_px, &HeuristicMeasurer),
        }
    }

    fn push_centered_line(
        &self,
        scene: &mut CardScene,
        line: String,
        style: &ResolvedTextStyle,
        top_y: i32,
    ) {
        let line_width = self.measure(&line, style);
        let x = ((scene.width as f32 - line_width) / 2.0).round() as i32;
        scene.push_command(DrawCommand::Text(TextCommand {
            x,
            top_y,
            text: line,
            style: style.clone(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ExportProfile;

    /// Deterministic stub: every glyph advances exactly `advance_px`.
    struct FixedAdvance {
        advance_px: f32,
    }

    impl TextMeasurer for FixedAdvance {
        fn measure_text_px(&self, text: &str, _style: &ResolvedTextStyle) -> f32 {
            text.chars().count() as f32 * self.advance_px
        }
    }

    fn style(size_px: f32) -> ResolvedTextStyle {
        ResolvedTextStyle {
            family: Arc::from("sans-serif"),
            size_px,
            color: Rgba::QUOTE_INK,
        }
    }

    #[test]
    fn wrap_reassembles_normalized_text() {
        let measurer = FixedAdvance { advance_px: 10.0 };
        let text = "  Do not   watch the clock.\nDo what it does. ";
        let lines = wrap_text(text.trim(), &style(20.0), 120.0, &measurer);
        assert!(lines.len() > 1);
        assert_eq!(
            lines.join(" "),
            "Do not watch the clock. Do what it does."
        );
    }

    #[test]
    fn wrap_respects_width_budget() {
        let measurer = FixedAdvance { advance_px: 10.0 };
        let lines = wrap_text(
            "alpha beta gamma delta epsilon",
            &style(20.0),
            100.0,
            &measurer,
        );
        for line in &lines {
            if line.split_whitespace().count() > 1 {
                assert!(measurer.measure_text_px(line, &style(20.0)) <= 100.0);
            }
        }
    }

    #[test]
    fn overlong_single_word_is_never_split() {
        let measurer = FixedAdvance { advance_px: 10.0 };
        let token = "x".repeat(60);
        let lines = wrap_text(&token, &style(20.0), 100.0, &measurer);
        assert_eq!(lines, vec![token]);
    }

    #[test]
    fn overlong_word_in_running_text_gets_its_own_line() {
        let measurer = FixedAdvance { advance_px: 10.0 };
        let token = "y".repeat(30);
        let text = format!("tiny {} tail", token);
        let lines = wrap_text(&text, &style(20.0), 100.0, &measurer);
        assert_eq!(lines, vec!["tiny".to_string(), token, "tail".to_string()]);
    }

    #[test]
    fn wrap_of_empty_text_is_empty() {
        let measurer = FixedAdvance { advance_px: 10.0 };
        assert!(wrap_text("", &style(20.0), 100.0, &measurer).is_empty());
        assert!(wrap_text("   ", &style(20.0), 100.0, &measurer).is_empty());
    }

    #[test]
    fn single_line_is_centered_and_stable() {
        let layout = CardLayout::new(ExportProfile::share())
            .with_text_measurer(Arc::new(FixedAdvance { advance_px: 10.0 }));
        let state = PresentationState {
            quote_text: "steady".to_string(),
            ..PresentationState::default()
        };
        let first = layout.compose(&state);
        let second = layout.compose(&state);
        assert_eq!(first, second);

        let text = first.text_commands().next().unwrap();
        // 6 glyphs * 10 px at a 1200 px canvas.
        assert_eq!(text.x, ((1200.0f32 - 60.0) / 2.0).round() as i32);
    }

    #[test]
    fn block_is_vertically_centered_as_a_whole() {
        let layout = CardLayout::new(ExportProfile::share())
            .with_text_measurer(Arc::new(FixedAdvance { advance_px: 10.0 }));
        let state = PresentationState {
            quote_text: "one".to_string(),
            author_text: "two".to_string(),
            base_font_size_px: 28.0,
            ..PresentationState::default()
        };
        let scene = layout.compose(&state);
        let rows: Vec<_> = scene.text_commands().collect();
        assert_eq!(rows.len(), 2);

        // quote font 50 px -> line height 65; author font 25 px ->
        // line height 38; total 65 + 20 + 38 = 123.
        let total = 65 + 20 + 38;
        let expected_y = ((630.0f32 - total as f32) / 2.0).round() as i32;
        assert_eq!(rows[0].top_y, expected_y);
        assert_eq!(rows[1].top_y, expected_y + 65 + 20);
    }

    #[test]
    fn empty_author_still_reserves_the_gap() {
        let layout = CardLayout::new(ExportProfile::share())
            .with_text_measurer(Arc::new(FixedAdvance { advance_px: 10.0 }));
        let state = PresentationState {
            quote_text: "one".to_string(),
            author_text: "   ".to_string(),
            base_font_size_px: 28.0,
            ..PresentationState::default()
        };
        let scene = layout.compose(&state);
        let rows: Vec<_> = scene.text_commands().collect();
        assert_eq!(rows.len(), 1);

        // Content height is the quote line plus the fixed gap.
        let total = 65 + 20;
        assert_eq!(rows[0].top_y, ((630.0f32 - total as f32) / 2.0).round() as i32);
    }

    #[test]
    fn background_image_command_follows_the_fill() {
        let image = DecodedImage::from_rgba8(2, 2, vec![0u8; 16]).unwrap();
        let layout = CardLayout::new(ExportProfile::share());
        let state = PresentationState {
            background_image: Some(image),
            background_mode: BackgroundMode::Repeat,
            ..PresentationState::default()
        };
        let scene = layout.compose(&state);
        assert!(matches!(scene.commands[0], DrawCommand::Rect(_)));
        assert!(matches!(
            scene.commands[1],
            DrawCommand::Image(ImageCommand {
                placement: ImagePlacement::Tile,
                ..
            })
        ));
    }

    #[test]
    fn no_image_leaves_solid_fill_alone() {
        let layout = CardLayout::new(ExportProfile::download());
        let scene = layout.compose(&PresentationState::default());
        assert_eq!(scene.commands.len(), 1);
        let DrawCommand::Rect(rect) = &scene.commands[0] else {
            panic!("expected background fill");
        };
        assert_eq!((rect.width, rect.height), (1400, 800));
        assert_eq!(rect.color, Rgba::BACKGROUND);
    }

    #[test]
    fn fonts_are_scaled_and_rounded_per_profile() {
        let layout = CardLayout::new(ExportProfile::download())
            .with_text_measurer(Arc::new(FixedAdvance { advance_px: 8.0 }));
        let state = PresentationState {
            quote_text: "q".to_string(),
            author_text: "a".to_string(),
            base_font_size_px: 27.0,
            ..PresentationState::default()
        };
        let scene = layout.compose(&state);
        let rows: Vec<_> = scene.text_commands().collect();
        assert_eq!(rows[0].style.size_px, 54.0); // round(27 * 2.0)
        assert_eq!(rows[1].style.size_px, 30.0); // round(27 * 1.1)
    }
}
