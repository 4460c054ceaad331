//! Frame rate statistics, with optional text nodes to show them

use std::collections::VecDeque;
use std::time::Duration;

use crate::color::Rgba;
use crate::component::{Component, HorizontalAnchor};
use crate::error::UiError;
use crate::geometry::Point;
use crate::tree::{NodeId, UiTree};

/// Frames kept for the rolling average
pub const MAXIMUM_SAMPLES: usize = 100;

/// Above this the FPS line is green, otherwise red
const SMOOTH_FPS: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct FrameCounter {
    total_frames: u64,
    total_time: Duration,
    average_fps: f64,
    current_fps: f64,
    samples: VecDeque<f64>,
    lines: Option<[NodeId; 4]>,
    /// Padding of the first line and of the three after it
    paddings: (Point, Point),
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self {
            total_frames: 0,
            total_time: Duration::ZERO,
            average_fps: 0.0,
            current_fps: 0.0,
            samples: VecDeque::with_capacity(MAXIMUM_SAMPLES + 1),
            lines: None,
            paddings: (Point::new(10, 10), Point::new(10, 5)),
        }
    }
}

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paddings for the nodes [`format`](Self::format) creates
    pub fn with_paddings(mut self, first: Point, rest: Point) -> Self {
        self.paddings = (first, rest);
        self
    }

    /// Record one frame that took `delta`
    pub fn update(&mut self, delta: Duration) {
        let seconds = delta.as_secs_f64();
        self.current_fps = if seconds > 0.0 { (1.0 / seconds).trunc() } else { 0.0 };
        self.samples.push_back(self.current_fps);

        if self.samples.len() > MAXIMUM_SAMPLES {
            self.samples.pop_front();
            self.average_fps = self.samples.iter().sum::<f64>() / self.samples.len() as f64;
        } else {
            self.average_fps = self.current_fps;
        }

        self.total_frames += 1;
        self.total_time += delta;
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    pub fn average_fps(&self) -> f64 {
        self.average_fps
    }

    /// Whole frames per second of the last frame
    pub fn current_fps(&self) -> f64 {
        self.current_fps
    }

    /// Green while the frame rate is smooth, red below that
    pub fn fps_color(&self) -> Rgba {
        if self.current_fps > SMOOTH_FPS {
            Rgba::GREEN
        } else {
            Rgba::RED
        }
    }

    /// The four display lines
    pub fn lines(&self) -> [String; 4] {
        let secs = self.total_time.as_secs();
        [
            format!("FPS: {}", self.current_fps),
            format!("Total Frames: {}", self.total_frames),
            format!("Average FPS: {:.1}", self.average_fps),
            format!(
                "Game Time: {:02}:{:02}:{:02}",
                secs / 3600,
                secs / 60 % 60,
                secs % 60
            ),
        ]
    }

    /// Text nodes showing the current stats.
    ///
    /// The first call creates four detached nodes (add them to a panel);
    /// later calls update those same nodes in place. The FPS line takes
    /// [`fps_color`](Self::fps_color), the rest take `color`.
    pub fn format(&mut self, tree: &mut UiTree, color: Rgba) -> Result<[NodeId; 4], UiError> {
        let text = self.lines();
        let fps_color = self.fps_color();
        let colors = [fps_color, color, color, color];
        if let Some(lines) = self.lines.filter(|ids| ids.iter().all(|id| tree.contains(*id))) {
            for ((id, line), tint) in lines.iter().zip(text).zip(colors) {
                tree.set_text(*id, line)?;
                tree.set_text_color(*id, tint)?;
            }
            return Ok(lines);
        }

        let (first, rest) = self.paddings;
        let paddings = [first, rest, rest, rest];
        let mut created = Vec::with_capacity(4);
        for ((line, padding), tint) in text.into_iter().zip(paddings).zip(colors) {
            created.push(tree.insert(
                Component::text(line, tint, padding).with_h_anchor(HorizontalAnchor::Left),
            ));
        }
        let lines = [created[0], created[1], created[2], created[3]];
        self.lines = Some(lines);
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::font::MonospaceMetrics;
    use crate::geometry::Size;

    #[test]
    fn test_average_tracks_current_until_window_fills() {
        let mut counter = FrameCounter::new();
        counter.update(Duration::from_millis(20));
        assert!((counter.current_fps() - 50.0).abs() < 1e-9);
        assert_eq!(counter.average_fps(), counter.current_fps());

        for _ in 0..MAXIMUM_SAMPLES - 1 {
            counter.update(Duration::from_millis(10));
        }
        // exactly full: still the current rate
        assert_eq!(counter.average_fps(), counter.current_fps());

        counter.update(Duration::from_millis(10));
        // the 20ms frame rolled out of the window
        assert!((counter.average_fps() - 100.0).abs() < 1e-9);
        assert_eq!(counter.total_frames(), 101);
    }

    #[test]
    fn test_rolling_average_includes_slow_frames() {
        let mut counter = FrameCounter::new();
        for _ in 0..MAXIMUM_SAMPLES {
            counter.update(Duration::from_millis(10));
        }
        counter.update(Duration::from_millis(20));
        // 99 samples at 100 and one at 50
        assert!((counter.average_fps() - 99.5).abs() < 1e-9);
    }

    #[test]
    fn test_lines() {
        let mut counter = FrameCounter::new();
        counter.update(Duration::from_secs(3725));
        let lines = counter.lines();
        assert_eq!(lines[1], "Total Frames: 1");
        assert_eq!(lines[3], "Game Time: 01:02:05");
    }

    #[test]
    fn test_fps_is_truncated() {
        let mut counter = FrameCounter::new();
        counter.update(Duration::from_micros(16_900));
        assert_eq!(counter.current_fps(), 59.0);
        assert_eq!(
            counter.lines(),
            [
                "FPS: 59".to_string(),
                "Total Frames: 1".to_string(),
                "Average FPS: 59.0".to_string(),
                "Game Time: 00:00:00".to_string(),
            ]
        );
    }

    #[test]
    fn test_fps_line_color_follows_frame_rate() {
        let mut tree = UiTree::new(Size::new(800, 600), MonospaceMetrics::default(), UiConfig::default());
        let mut counter = FrameCounter::new();
        counter.update(Duration::from_millis(16));
        let lines = counter.format(&mut tree, Rgba::WHITE).unwrap();
        assert_eq!(tree.component(lines[0]).unwrap().tint, Rgba::GREEN);
        assert_eq!(tree.component(lines[1]).unwrap().tint, Rgba::WHITE);

        counter.update(Duration::from_millis(100));
        counter.format(&mut tree, Rgba::WHITE).unwrap();
        assert_eq!(tree.component(lines[0]).unwrap().render.text(), Some("FPS: 10"));
        assert_eq!(tree.component(lines[0]).unwrap().tint, Rgba::RED);
        assert_eq!(tree.component(lines[3]).unwrap().tint, Rgba::WHITE);
    }

    #[test]
    fn test_custom_paddings() {
        let mut tree = UiTree::new(Size::new(80, 24), MonospaceMetrics::default(), UiConfig::default());
        let mut counter = FrameCounter::new().with_paddings(Point::new(1, 0), Point::ZERO);
        let lines = counter.format(&mut tree, Rgba::WHITE).unwrap();

        assert_eq!(tree.component(lines[0]).unwrap().location(), Point::new(1, 0));
        assert_eq!(tree.component(lines[3]).unwrap().location(), Point::ZERO);
    }

    #[test]
    fn test_format_reuses_nodes() {
        let mut tree = UiTree::new(Size::new(800, 600), MonospaceMetrics::default(), UiConfig::default());
        let mut counter = FrameCounter::new();
        counter.update(Duration::from_millis(16));

        let first = counter.format(&mut tree, Rgba::WHITE).unwrap();
        counter.update(Duration::from_millis(16));
        let second = counter.format(&mut tree, Rgba::RED).unwrap();

        assert_eq!(first, second);
        assert_eq!(tree.component(second[1]).unwrap().render.text(), Some("Total Frames: 2"));
        assert_eq!(tree.component(second[1]).unwrap().tint, Rgba::RED);
        assert_eq!(tree.component(second[0]).unwrap().tint, Rgba::GREEN);
    }
}
