use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use sizecheck_core::{ScanResult, format_size};
use tracing::debug;

/// Export file format, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Csv,
    Html,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => ExportFormat::Csv,
            Some("html") | Some("htm") => ExportFormat::Html,
            Some("json") => ExportFormat::Json,
            _ => ExportFormat::Text,
        }
    }
}

/// Header lines every export starts with
pub struct ExportContext {
    /// Local time the export was generated
    pub generated: String,
    /// Threshold as entered, e.g. "1 GB"
    pub threshold: String,
}

impl ExportContext {
    pub fn now(threshold: String) -> Self {
        Self {
            generated: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            threshold,
        }
    }
}

/// Write `result` to `path` in the format its extension asks for
pub fn export(path: &Path, result: &ScanResult, ctx: &ExportContext) -> Result<ExportFormat> {
    let format = ExportFormat::from_path(path);
    let file = File::create(path)
        .wrap_err_with(|| format!("Failed to create export file {}", path.display()))?;
    let mut out = BufWriter::new(file);

    match format {
        ExportFormat::Text => write_text(&mut out, result, ctx)?,
        ExportFormat::Csv => write_csv(&mut out, result, ctx)?,
        ExportFormat::Html => write_html(&mut out, result, ctx)?,
        ExportFormat::Json => serde_json::to_writer_pretty(&mut out, result)?,
    }
    out.flush()
        .wrap_err_with(|| format!("Failed to write export file {}", path.display()))?;
    debug!(path = %path.display(), ?format, "export written");

    Ok(format)
}

pub fn write_text(
    out: &mut impl Write,
    result: &ScanResult,
    ctx: &ExportContext,
) -> io::Result<()> {
    writeln!(out, "File Size Check Results - {}", ctx.generated)?;
    writeln!(out, "Directory: {}", result.root.display())?;
    writeln!(out, "Size threshold: {}", ctx.threshold)?;
    writeln!(out)?;

    let rule = "-".repeat(80);
    writeln!(out, "Large Folders ({}):", result.large_folders.len())?;
    writeln!(out, "{rule}")?;
    for folder in &result.large_folders {
        let size = format_size(folder.size);
        writeln!(out, "{} | {}", folder.path.display(), size)?;
    }

    writeln!(out)?;
    writeln!(out, "Large Files ({}):", result.large_files.len())?;
    writeln!(out, "{rule}")?;
    for file in &result.large_files {
        writeln!(out, "{} | {}", file.path.display(), format_size(file.size))?;
    }
    Ok(())
}

pub fn write_csv(
    out: &mut impl Write,
    result: &ScanResult,
    ctx: &ExportContext,
) -> csv::Result<()> {
    // Header and section rows have fewer columns than entry rows
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(out);

    writer.write_record(["File Size Check Results", ctx.generated.as_str()])?;
    let root = result.root.display().to_string();
    writer.write_record(["Directory", root.as_str()])?;
    writer.write_record(["Size threshold", ctx.threshold.as_str()])?;

    let heading = format!("Large Folders ({}):", result.large_folders.len());
    writer.write_record([heading])?;
    writer.write_record(["Path", "Size", "Bytes"])?;
    for folder in &result.large_folders {
        writer.write_record([
            folder.path.display().to_string(),
            format_size(folder.size),
            folder.size.to_string(),
        ])?;
    }

    writer.write_record([format!("Large Files ({}):", result.large_files.len())])?;
    writer.write_record(["Path", "Size", "Bytes"])?;
    for file in &result.large_files {
        writer.write_record([
            file.path.display().to_string(),
            format_size(file.size),
            file.size.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

const HTML_STYLE: &str = "body { font-family: 'Segoe UI', Arial, sans-serif; margin: 20px; \
background-color: #202020; color: #e0e0e0; }
h1, h2 { color: #0078d7; }
.metadata { background-color: #2d2d2d; padding: 15px; border-radius: 4px; margin-bottom: 20px; }
table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
th, td { text-align: left; padding: 8px; border-bottom: 1px solid #3e3e3e; }
th { background-color: #2d2d2d; }
td.size { text-align: right; white-space: nowrap; }";

pub fn write_html(
    out: &mut impl Write,
    result: &ScanResult,
    ctx: &ExportContext,
) -> io::Result<()> {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html>\n<head>\n<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>File Size Check Results</title>")?;
    writeln!(out, "<style>\n{HTML_STYLE}\n</style>\n</head>\n<body>")?;
    writeln!(out, "<h1>File Size Check Results</h1>")?;
    writeln!(out, "<div class=\"metadata\">")?;
    writeln!(
        out,
        "<p><strong>Generated:</strong> {}</p>",
        escape_html(&ctx.generated)
    )?;
    writeln!(
        out,
        "<p><strong>Directory:</strong> {}</p>",
        escape_html(&result.root.display().to_string())
    )?;
    writeln!(
        out,
        "<p><strong>Size threshold:</strong> {}</p>",
        escape_html(&ctx.threshold)
    )?;
    writeln!(out, "</div>")?;

    let folders = result
        .large_folders
        .iter()
        .map(|f| (f.path.display().to_string(), f.size));
    write_html_table(out, "Large Folders", folders)?;

    let files = result
        .large_files
        .iter()
        .map(|f| (f.path.display().to_string(), f.size));
    write_html_table(out, "Large Files", files)?;

    writeln!(out, "</body>\n</html>")
}

fn write_html_table(
    out: &mut impl Write,
    title: &str,
    rows: impl ExactSizeIterator<Item = (String, u64)>,
) -> io::Result<()> {
    writeln!(out, "<h2>{} ({})</h2>", title, rows.len())?;
    writeln!(out, "<table>\n<tr><th>Path</th><th>Size</th></tr>")?;
    for (path, size) in rows {
        writeln!(
            out,
            "<tr><td>{}</td><td class=\"size\">{}</td></tr>",
            escape_html(&path),
            format_size(size)
        )?;
    }
    writeln!(out, "</table>")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use sizecheck_core::{FileRecord, FolderRecord, ScanStatus};
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    fn sample() -> ScanResult {
        ScanResult {
            status: ScanStatus::Completed,
            root: PathBuf::from("/srv/media"),
            threshold: 1024,
            total_size: 10 * 1024 * 1024,
            folder_count: 3,
            file_count: 4,
            large_folders: vec![FolderRecord {
                path: PathBuf::from("/srv/media/a&b"),
                size: 5 * 1024 * 1024,
            }],
            large_files: vec![
                FileRecord {
                    path: PathBuf::from("/srv/media/a&b/<movie>.mkv"),
                    size: 4 * 1024 * 1024,
                },
                FileRecord {
                    path: PathBuf::from("/srv/media/b, c.iso"),
                    size: 2048,
                },
            ],
            errors: vec![],
            elapsed: Duration::from_secs(2),
        }
    }

    fn ctx() -> ExportContext {
        ExportContext {
            generated: "2024-05-01 12:00:00".into(),
            threshold: "1 KB".into(),
        }
    }

    #[test]
    fn test_format_from_extension() {
        let format_of = |name: &str| ExportFormat::from_path(Path::new(name));
        assert_eq!(format_of("out.csv"), ExportFormat::Csv);
        assert_eq!(format_of("OUT.HTML"), ExportFormat::Html);
        assert_eq!(format_of("r.htm"), ExportFormat::Html);
        assert_eq!(format_of("r.json"), ExportFormat::Json);
        assert_eq!(format_of("r.txt"), ExportFormat::Text);
        assert_eq!(format_of("results"), ExportFormat::Text);
    }

    #[test]
    fn test_text_export() {
        let mut out = Vec::new();
        write_text(&mut out, &sample(), &ctx()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let first = text.lines().next().unwrap();
        assert_eq!(first, "File Size Check Results - 2024-05-01 12:00:00");
        assert!(text.contains("Size threshold: 1 KB"));
        assert!(text.contains("Large Folders (1):"));
        assert!(text.contains("/srv/media/a&b | 5.00 MB"));
        assert!(text.contains("Large Files (2):"));
        assert!(text.contains("/srv/media/b, c.iso | 2.00 KB"));
    }

    #[test]
    fn test_csv_export_quotes_fields() {
        let mut out = Vec::new();
        write_csv(&mut out, &sample(), &ctx()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Directory,/srv/media\n"));
        assert!(text.contains("Path,Size,Bytes\n"));
        assert!(text.contains("/srv/media/a&b,5.00 MB,5242880\n"));
        assert!(text.contains("\"/srv/media/b, c.iso\",2.00 KB,2048\n"));
    }

    #[test]
    fn test_html_export_escapes_paths() {
        let mut out = Vec::new();
        write_html(&mut out, &sample(), &ctx()).unwrap();
        let html = String::from_utf8(out).unwrap();

        assert!(html.contains("<h2>Large Files (2)</h2>"));
        assert!(html.contains("/srv/media/a&amp;b/&lt;movie&gt;.mkv"));
        assert!(!html.contains("<movie>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_export_to_file_picks_format() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.json");

        let format = export(&path, &sample(), &ctx()).unwrap();
        assert_eq!(format, ExportFormat::Json);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_size"], 10 * 1024 * 1024);
        assert_eq!(value["status"], "Completed");
        assert_eq!(value["large_files"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
    }
}
