//! Terminal UI: the text area, the status bar and toasts.

mod render;
mod status;

pub use render::{line_number_width, render};
pub use status::status_line;
