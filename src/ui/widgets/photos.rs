use crate::config::PhotosConfig;
use crate::feeds::FeedData;
use crate::ui::widgets::{border_style, FeedWidget};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::any::Any;
use std::path::{Path, PathBuf};

const PHOTO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];
const DEFAULT_PIXEL_SIZE: u32 = 32;

#[derive(Debug, Clone)]
pub struct PhotosWidget {
    id: String,
    title: String,
    position: (usize, usize),
    selected: bool,
    dir: Option<PathBuf>,
    photos: Vec<PathBuf>,
    current: usize,
    pixel_data: Option<PixelData>,
    pixel_size: u32,
    error_message: Option<String>,
    scroll_offset: usize,
}

#[derive(Debug, Clone)]
struct PixelData {
    pixels: Vec<Vec<PixelColor>>,
    width: u32,
    height: u32,
    original_width: u32,
    original_height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PixelColor {
    r: u8,
    g: u8,
    b: u8,
}

impl PixelColor {
    fn to_ratatui_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

/// Uploaded photos in `dir`, sorted by file name.
pub fn scan_photos(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut photos: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| PHOTO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    photos.sort();
    Ok(photos)
}

impl PhotosWidget {
    pub fn new(config: PhotosConfig) -> Self {
        let mut widget = Self {
            id: format!("photos-{}-{}", config.position.row, config.position.col),
            title: config.title,
            position: (config.position.row, config.position.col),
            selected: false,
            dir: config.dir,
            photos: Vec::new(),
            current: 0,
            pixel_data: None,
            pixel_size: config.pixel_size.unwrap_or(DEFAULT_PIXEL_SIZE),
            error_message: None,
            scroll_offset: 0,
        };
        widget.rescan();
        widget
    }

    pub fn rescan(&mut self) {
        let Some(dir) = self.dir.clone() else {
            return;
        };

        match scan_photos(&dir) {
            Ok(photos) => {
                tracing::debug!(dir = %dir.display(), count = photos.len(), "scanned photos");
                self.photos = photos;
                self.error_message = None;
                self.current = self.current.min(self.photos.len().saturating_sub(1));
                self.reload_image();
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "could not read photos directory");
                self.photos.clear();
                self.pixel_data = None;
                self.error_message = Some(format!("Cannot read {}: {}", dir.display(), e));
            }
        }
    }

    pub fn next_photo(&mut self) {
        if !self.photos.is_empty() {
            self.current = (self.current + 1) % self.photos.len();
            self.scroll_offset = 0;
            self.reload_image();
        }
    }

    pub fn prev_photo(&mut self) {
        if !self.photos.is_empty() {
            self.current = (self.current + self.photos.len() - 1) % self.photos.len();
            self.scroll_offset = 0;
            self.reload_image();
        }
    }

    pub fn increase_pixel_size(&mut self) {
        if self.pixel_size < 128 {
            self.pixel_size *= 2;
            self.reload_image();
        }
    }

    pub fn decrease_pixel_size(&mut self) {
        if self.pixel_size > 8 {
            self.pixel_size /= 2;
            self.reload_image();
        }
    }

    fn reload_image(&mut self) {
        let Some(path) = self.photos.get(self.current) else {
            self.pixel_data = None;
            return;
        };

        match Self::load_image_sync(path, self.pixel_size) {
            Ok(data) => {
                self.pixel_data = Some(data);
                self.error_message = None;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not decode photo");
                self.pixel_data = None;
                self.error_message = Some(format!("Error loading image: {}", e));
            }
        }
    }

    fn load_image_sync(path: &Path, target_size: u32) -> anyhow::Result<PixelData> {
        let img_bytes = std::fs::read(path)?;
        let img = image::load_from_memory(&img_bytes)?;

        let original_width = img.width();
        let original_height = img.height();

        // Keep aspect ratio inside a target_size square
        let (new_width, new_height) = if original_width > original_height {
            let ratio = original_height as f64 / original_width as f64;
            (target_size, ((target_size as f64 * ratio) as u32).max(1))
        } else {
            let ratio = original_width as f64 / original_height as f64;
            (((target_size as f64 * ratio) as u32).max(1), target_size)
        };

        let resized = img.resize_exact(new_width, new_height, image::imageops::FilterType::Nearest);
        let rgb_img = resized.to_rgb8();

        let pixels = (0..new_height)
            .map(|y| {
                (0..new_width)
                    .map(|x| {
                        let pixel = rgb_img.get_pixel(x, y);
                        PixelColor {
                            r: pixel[0],
                            g: pixel[1],
                            b: pixel[2],
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(PixelData {
            pixels,
            width: new_width,
            height: new_height,
            original_width,
            original_height,
        })
    }

    fn current_name(&self) -> String {
        self.photos
            .get(self.current)
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl FeedWidget for PhotosWidget {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn position(&self) -> (usize, usize) {
        self.position
    }

    fn render(&self, frame: &mut Frame, area: Rect, selected: bool) {
        let title = if self.photos.is_empty() {
            format!(" {} ", self.title)
        } else {
            format!(" {} ({}/{}) ", self.title, self.current + 1, self.photos.len())
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(selected))
            .title(title);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if let Some(error) = &self.error_message {
            let error_text = vec![
                Line::from(""),
                Line::from(Span::styled(error, Style::default().fg(Color::Red))),
            ];
            let paragraph = Paragraph::new(error_text).alignment(Alignment::Center);
            frame.render_widget(paragraph, inner);
            return;
        }

        if let Some(data) = &self.pixel_data {
            self.render_photo(frame, inner, data);
        } else {
            self.render_help(frame, inner);
        }
    }

    fn update_data(&mut self, _data: FeedData) {
        // Photos are read from disk, not fetched
    }

    fn scroll_up(&mut self) {
        if self.scroll_offset > 0 {
            self.scroll_offset -= 1;
        }
    }

    fn scroll_down(&mut self) {
        if let Some(data) = &self.pixel_data {
            if self.scroll_offset < data.height as usize {
                self.scroll_offset += 1;
            }
        }
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<crate::ui::widgets::WidgetAction> {
        match key.code {
            KeyCode::Right | KeyCode::Char('l') => self.next_photo(),
            KeyCode::Left | KeyCode::Char('h') => self.prev_photo(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.increase_pixel_size(),
            KeyCode::Char('-') => self.decrease_pixel_size(),
            KeyCode::Char('r') => self.rescan(),
            _ => {}
        }
        None
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}

impl PhotosWidget {
    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let help_lines = vec![
            Line::from(""),
            Line::from(Span::styled("No photos yet", Style::default().fg(Color::Cyan))),
            Line::from(""),
            Line::from("Point the photos pane at your uploads in config.toml:"),
            Line::from(""),
            Line::from("[[widgets]]"),
            Line::from("type = \"photos\""),
            Line::from("dir = \"/path/to/uploads\""),
            Line::from("position = { row = 0, col = 1 }"),
            Line::from(""),
            Line::from("Keys: ←→ photo | +/- resolution | r rescan"),
        ];

        let paragraph = Paragraph::new(help_lines).alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_photo(&self, frame: &mut Frame, area: Rect, data: &PixelData) {
        let mut lines = Vec::new();

        lines.push(Line::from(vec![
            Span::styled(self.current_name(), Style::default().fg(Color::White)),
            Span::styled(
                format!(
                    "  {}x{} → {}x{}",
                    data.original_width, data.original_height, data.width, data.height
                ),
                Style::default().fg(Color::Gray),
            ),
        ]));

        // One terminal row shows two pixel rows using the upper half block
        let header_height = 1;
        let max_visible_rows = area.height.saturating_sub(header_height) as usize * 2;
        let start_row = self
            .scroll_offset
            .min((data.height as usize).saturating_sub(max_visible_rows));
        let end_row = (start_row + max_visible_rows).min(data.height as usize);

        for pair in data.pixels[start_row..end_row].chunks(2) {
            let spans: Vec<Span> = pair[0]
                .iter()
                .enumerate()
                .map(|(x, top)| {
                    let mut style = Style::default().fg(top.to_ratatui_color());
                    if let Some(bottom) = pair.get(1).and_then(|row| row.get(x)) {
                        style = style.bg(bottom.to_ratatui_color());
                    }
                    Span::styled("▀", style)
                })
                .collect();
            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Position;

    fn config(dir: Option<PathBuf>) -> PhotosConfig {
        PhotosConfig {
            title: "Photos".to_string(),
            dir,
            pixel_size: Some(8),
            position: Position { row: 0, col: 1 },
        }
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = image::RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                image::Rgb([255, 0, 0])
            } else {
                image::Rgb([0, 0, 255])
            }
        });
        img.save(path).unwrap();
    }

    #[test]
    fn test_scan_photos_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.png"), b"png").unwrap();
        std::fs::write(dir.path().join("a.PNG"), b"png").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a photo").unwrap();
        std::fs::create_dir(dir.path().join("nested.jpg")).unwrap();

        let photos = scan_photos(dir.path()).unwrap();
        let names: Vec<_> = photos
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.png"]);
    }

    #[test]
    fn test_load_and_cycle_photos() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("1.png"), 16, 8);
        write_png(&dir.path().join("2.png"), 4, 4);

        let mut widget = PhotosWidget::new(config(Some(dir.path().to_path_buf())));
        assert_eq!(widget.photos.len(), 2);
        let data = widget.pixel_data.as_ref().unwrap();
        assert_eq!((data.width, data.height), (8, 4));
        assert_eq!(data.pixels[0][0], PixelColor { r: 255, g: 0, b: 0 });

        widget.next_photo();
        assert_eq!(widget.current_name(), "2.png");
        widget.next_photo();
        assert_eq!(widget.current_name(), "1.png");
        widget.prev_photo();
        assert_eq!(widget.current_name(), "2.png");
    }

    #[test]
    fn test_pixel_size_bounds() {
        let mut widget = PhotosWidget::new(config(None));
        widget.decrease_pixel_size();
        assert_eq!(widget.pixel_size, 8);
        for _ in 0..10 {
            widget.increase_pixel_size();
        }
        assert_eq!(widget.pixel_size, 128);
    }

    #[test]
    fn test_corrupt_photo_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.png"), b"not really a png").unwrap();

        let widget = PhotosWidget::new(config(Some(dir.path().to_path_buf())));
        assert!(widget.pixel_data.is_none());
        assert!(widget
            .error_message
            .as_deref()
            .unwrap()
            .starts_with("Error loading image"));
    }

    #[test]
    fn test_missing_dir_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let widget = PhotosWidget::new(config(Some(dir.path().join("missing"))));
        assert!(widget.photos.is_empty());
        assert!(widget.error_message.is_some());
    }
}
