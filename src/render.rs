use crate::slot::SlotData;

/// Build the status2d markup fragment for one block.
///
/// The icon is drawn as a pill (bar color on the block color), the text in
/// the block color on the bar color. Whitespace-only text is passed through
/// verbatim so blocks can reserve space without drawing anything.
///
/// # Arguments
///
/// * `data` - Icon, text and color of the block
/// * `bar_color` - Background color of the bar
///
/// # Returns
///
/// The markup fragment, or an empty string when both icon and text are empty
#[must_use]
pub fn render(data: &SlotData, bar_color: &str) -> String {
    let SlotData { icon, text, color } = data;

    match (icon.is_empty(), text.is_empty()) {
        (false, false) if all_space(text) => {
            format!("^c{bar_color}^^b{color}^ {icon} ^c{color}^^b{bar_color}^{text}")
        }
        (false, false) => {
            format!("^c{bar_color}^^b{color}^ {icon} ^c{color}^^b{bar_color}^ {text} ")
        }
        (true, false) if all_space(text) => text.clone(),
        (true, false) => format!("^c{color}^^b{bar_color}^ {text} "),
        (false, true) => format!("^c{bar_color}^^b{color}^ {icon} "),
        (true, true) => String::new(),
    }
}

/// Whether `text` holds whitespace only (true for the empty string)
#[must_use]
pub fn all_space(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}
