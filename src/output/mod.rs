pub mod json;
pub mod table;

use crate::config::OutputFormat;
use crate::location::ResolvedLocation;

pub fn format_location(format: OutputFormat, location: &ResolvedLocation) -> String {
    match format {
        OutputFormat::Table => table::format_table(location),
        OutputFormat::Json => json::format_json(location),
    }
}
