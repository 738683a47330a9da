mod formatter;

pub use formatter::{
    format_breakdown, format_invalid, format_invalid_json, format_json, save_report,
    should_use_colors,
};
