//! Figure blocks for resolved images.

/// Alt text the site inserts when the author left it unchanged.
const DEFAULT_ALT: &str = "alt text";
const UPLOADER_ALT_PREFIX: &str = "enter image";

/// Whether `alt` is worth a caption.
pub fn has_caption(alt: &str) -> bool {
    let alt = alt.trim();
    !alt.is_empty() && !alt.starts_with(UPLOADER_ALT_PREFIX) && alt != DEFAULT_ALT
}

/// Renders a centered figure including `file_name`.
pub fn render(file_name: &str, alt: &str, scale: f32) -> String {
    let mut figure = format!("\\begin{{figure}}\n\\centering\n\\includegraphics[scale={scale}]{{{file_name}}}");
    if has_caption(alt) {
        figure.push_str(&format!("\n\\caption{{{}}}", alt.trim()));
    }
    figure.push_str("\n\\end{figure}");
    figure
}
