use std::io::Write;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::extractor::MetadataRecord;

/// Column order of the CSV report.
pub const CSV_HEADER: [&str; 5] = ["Filename", "Assembly Name", "GUID", "TYPELIB", "MVID"];

/// Render one record in the fixed console layout.
///
/// Optional fields are omitted entirely rather than printed empty, so a
/// record without interop attributes is three lines.
pub fn render_record(record: &MetadataRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("File: {}\n", record.file));
    out.push_str(&format!("  Assembly Name: {}\n", record.assembly_name));
    out.push_str(&format!("  MVID: {}\n", record.mvid));
    if let Some(guid) = &record.guid {
        out.push_str(&format!("  GUID: {guid}\n"));
    }
    if let Some(version) = &record.typelib_version {
        out.push_str(&format!("  TYPELIB Version: {version}\n"));
    }
    out
}

/// Print one record to stdout, followed by a blank separator line.
pub fn print_record(record: &MetadataRecord) {
    print!("{}", render_record(record));
    println!();
}

/// Print `data` as pretty JSON (the `--json` output mode).
pub fn print_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{json}");
    Ok(())
}

/// Write the CSV report: header plus one row per record.
///
/// Truncates any existing file at `dest`. Called once per run; there are no
/// append or merge semantics across runs.
pub fn write_csv(dest: &Path, records: &[MetadataRecord]) -> anyhow::Result<()> {
    let file = std::fs::File::create(dest)
        .with_context(|| format!("failed to create CSV file: {}", dest.display()))?;
    write_csv_to(file, records)
}

fn write_csv_to<W: Write>(writer: W, records: &[MetadataRecord]) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for record in records {
        let typelib = record
            .typelib_version
            .map(|version| version.to_string())
            .unwrap_or_default();
        csv.write_record([
            record.file.as_str(),
            record.assembly_name.as_str(),
            record.guid.as_deref().unwrap_or(""),
            typelib.as_str(),
            record.mvid.as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::TypeLibVersion;

    fn record(file: &str) -> MetadataRecord {
        MetadataRecord {
            file: file.to_string(),
            assembly_name: "App".to_string(),
            mvid: "11111111-1111-1111-1111-111111111111".to_string(),
            guid: None,
            typelib_version: None,
        }
    }

    #[test]
    fn render_without_interop_attributes_is_three_lines() {
        let rendered = render_record(&record("app.exe"));
        assert_eq!(
            rendered,
            "File: app.exe\n  Assembly Name: App\n  MVID: 11111111-1111-1111-1111-111111111111\n"
        );
    }

    #[test]
    fn render_includes_guid_and_typelib_when_present() {
        let mut rec = record("lib.dll");
        rec.guid = Some("deadbeef-0000-0000-0000-000000000000".to_string());
        rec.typelib_version = Some(TypeLibVersion { major: 1, minor: 0 });

        let rendered = render_record(&rec);
        assert!(rendered.contains("  GUID: deadbeef-0000-0000-0000-000000000000\n"));
        assert!(rendered.ends_with("  TYPELIB Version: 1.0\n"));
    }

    #[test]
    fn csv_row_leaves_absent_fields_empty() {
        let mut buf = Vec::new();
        write_csv_to(&mut buf, &[record("app.exe")]).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Filename,Assembly Name,GUID,TYPELIB,MVID\n\
             app.exe,App,,,11111111-1111-1111-1111-111111111111\n"
        );
    }

    #[test]
    fn csv_renders_typelib_as_major_dot_minor() {
        let mut rec = record("lib.dll");
        rec.guid = Some("aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee".to_string());
        rec.typelib_version = Some(TypeLibVersion { major: 3, minor: 12 });

        let mut buf = Vec::new();
        write_csv_to(&mut buf, &[rec]).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with(
            "lib.dll,App,aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee,3.12,\
             11111111-1111-1111-1111-111111111111\n"
        ));
    }

    #[test]
    fn csv_with_no_records_is_header_only() {
        let mut buf = Vec::new();
        write_csv_to(&mut buf, &[]).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Filename,Assembly Name,GUID,TYPELIB,MVID\n");
    }
}
