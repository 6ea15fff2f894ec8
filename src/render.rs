pub const DEFAULT_FONT_SIZE: u32 = 14;

/// Markdown span with an explicit pixel size for notebook-style display
/// surfaces. The span is left unclosed; those surfaces terminate it at the
/// end of the block.
pub fn sized_markdown(text: &str, font_size: u32) -> String {
    format!("<span style='font-size:{font_size}px;'>{text}")
}

/// Inline style for one correlation cell: highlighted when the value sits
/// at or beyond the threshold in either direction, empty otherwise.
pub fn highlight_cell(value: f64, threshold: f64) -> String {
    if value.abs() >= threshold.abs() {
        "background-color: yellow".to_string()
    } else {
        String::new()
    }
}
