use crate::location::{DownloadKind, ResolvedLocation};
use colored::Colorize;
use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color as TableColor,
    ContentArrangement, Table,
};

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

pub fn format_table(location: &ResolvedLocation) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Value"]);

    let provider = location
        .provider
        .map_or_else(|| "unknown".to_string(), |kind| kind.to_string());
    let branch = if location.branch.is_empty() {
        format!("({})", location.branch_or_placeholder())
    } else if location.is_tag_branch {
        format!("{} (tag)", location.branch)
    } else {
        location.branch.clone()
    };
    let target = if location.path.is_empty() {
        "repository root"
    } else if location.is_file {
        "file"
    } else {
        "directory"
    };
    let download_cell = match location.download_kind {
        DownloadKind::FullPackage => Cell::new("full package").fg(TableColor::Green),
        DownloadKind::PartialPackage => Cell::new("partial package").fg(TableColor::Yellow),
        DownloadKind::SingleFile => Cell::new("single file").fg(TableColor::Cyan),
        DownloadKind::Custom => Cell::new("custom"),
        DownloadKind::None => Cell::new("none").fg(TableColor::Red),
    };

    let rows = [
        ("Host", format!("{} ({provider})", location.hostname)),
        ("Owner", location.owner.clone()),
        ("Repository", location.name.clone()),
        ("Branch", branch),
        ("Path", or_dash(&location.path).to_string()),
        ("Target", target.to_string()),
    ];
    for (field, value) in rows {
        table.add_row(vec![Cell::new(field), Cell::new(value)]);
    }
    table.add_row(vec![Cell::new("Download"), download_cell]);

    let urls = [
        ("Clone URL", &location.clone_url),
        ("Remote", &location.remote_url),
        ("Archive URL", &location.archive_url),
        ("File URL", &location.file_url),
        ("Browse URL", &location.query_url),
    ];
    for (field, value) in urls {
        table.add_row(vec![Cell::new(field), Cell::new(or_dash(value))]);
    }
    table.add_row(vec![
        Cell::new("Local dir"),
        Cell::new(location.local_dir_path.display().to_string()),
    ]);

    let summary = format!(
        "\n{}/{} resolved from {}",
        location.owner, location.name, location.resolved_url
    );

    format!("{table}\n{}", summary.green().bold())
}
