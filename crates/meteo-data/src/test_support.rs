//! Fixture builders shared by the unit tests of this crate.

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

/// Measurement tags of a `metData` element with their default values.
pub const MEASUREMENTS: &[(&str, &str)] = &[
    ("td", "-1.5"),
    ("tavg", "3.2"),
    ("tx", "4.0"),
    ("tn", "2.1"),
    ("rhavg", "81"),
    ("ddavg_val", "220"),
    ("ddmax_val", "240"),
    ("ffavg_val", "1.8"),
    ("ffmax_val", "4.6"),
    ("mslavg", "1021.4"),
    ("pavg", "978.2"),
    ("rr_val", "0.0"),
    ("tp_1h_acc", "0.2"),
    ("tp_24h_acc", "3.4"),
    ("snow", "0"),
    ("gSunRadavg", "112"),
    ("diffSunRadavg", "64"),
    ("vis_val", "20"),
];

/// A complete `metData` element with default measurements.
pub fn met_data(station: &str, valid_start: &str) -> String {
    met_data_with(station, valid_start, "", "")
}

/// A complete `metData` element with `field` set to `value`.
pub fn met_data_with(station: &str, valid_start: &str, field: &str, value: &str) -> String {
    let mut xml = format!(
        "<metData><domain_meteosiId>{station}</domain_meteosiId>\
         <sunrise>2.1.2024 7:43 CET</sunrise><sunset>2.1.2024 16:27 CET</sunset>\
         <validStart>{valid_start}</validStart><validEnd>2.1.2024 15:30 CET</validEnd>"
    );
    for (tag, default) in MEASUREMENTS {
        let v = if *tag == field { value } else { default };
        xml.push_str(&format!("<{tag}>{v}</{tag}>"));
    }
    xml.push_str("</metData>");
    xml
}

/// Wrap `observations` in a `data` document.
pub fn document(observations: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><data><language>sl</language>{}</data>",
        observations.concat()
    )
}

/// A JSON archive line embedding `xml`.
pub fn archive_line(xml: &str) -> String {
    serde_json::json!({ "xml": xml }).to_string()
}

/// `count` observations of distinct stations `{prefix}{i}`, `per_line` per
/// archive line.
pub fn unique_lines(prefix: &str, count: usize, per_line: usize) -> Vec<String> {
    let observations: Vec<String> = (0..count)
        .map(|i| met_data(&format!("{prefix}{i}"), "2.1.2024 15:00 CET"))
        .collect();
    observations
        .chunks(per_line.max(1))
        .map(|chunk| archive_line(&document(chunk)))
        .collect()
}

/// Write `lines` to `dir/name`, gzip-compressed when the name ends in `.gz`.
pub fn write_archive(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut content = lines.join("\n");
    content.push('\n');

    if name.ends_with(".gz") {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();
    } else {
        std::fs::write(&path, content).unwrap();
    }
    path
}
