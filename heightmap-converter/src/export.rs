/// Chunked heightmap export to Lua, CSV and JSON
use crate::error::{ConvertError, ConvertResult};
use crate::progress::{Progress, fraction_percent};
use crate::settings::JsonLayout;
use crate::transform::Heightmap;
use constants::export::{CSV_EXTENSION, JSON_EXTENSION, LUA_EXTENSION};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Lua,
    Csv,
    Json,
}

impl ExportFormat {
    /// Pick the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> ConvertResult<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            LUA_EXTENSION => Ok(ExportFormat::Lua),
            CSV_EXTENSION => Ok(ExportFormat::Csv),
            JSON_EXTENSION => Ok(ExportFormat::Json),
            _ => Err(ConvertError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Lua => "Lua",
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }
}

/// Row chunking and layout choices for one export.
#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    pub chunk_rows: usize,
    pub json_layout: JsonLayout,
}

/// Export `heightmap` to `path`, choosing the format by extension.
pub fn export_to_path(
    heightmap: &Heightmap,
    path: &Path,
    options: ExportOptions,
    progress: &mut dyn Progress,
) -> ConvertResult<ExportFormat> {
    let format = ExportFormat::from_path(path)?;
    log::info!("Saving heightmap as {}", format.name());

    let mut writer = BufWriter::new(File::create(path)?);
    write_heightmap(heightmap, format, options, &mut writer, progress)?;
    writer.flush()?;

    log::info!("Heightmap saved to {}", path.display());
    Ok(format)
}

/// Serialise `heightmap` into `writer` one row chunk at a time.
pub fn write_heightmap<W: Write>(
    heightmap: &Heightmap,
    format: ExportFormat,
    options: ExportOptions,
    writer: &mut W,
    progress: &mut dyn Progress,
) -> ConvertResult<()> {
    let chunk_rows = options.chunk_rows.max(1);
    let rows = heightmap.height();
    let total_chunks = rows.div_ceil(chunk_rows);

    progress.set_percent(0.0);

    match format {
        ExportFormat::Lua => writer.write_all(b"return {\n")?,
        ExportFormat::Json if options.json_layout == JsonLayout::Document => {
            writer.write_all(b"[")?
        }
        _ => {}
    }

    for chunk in 0..total_chunks {
        let start = chunk * chunk_rows;
        let end = (start + chunk_rows).min(rows);
        log::debug!("Writing rows {}..{}", start, end);

        match format {
            ExportFormat::Lua => write_lua_rows(heightmap, start..end, writer)?,
            ExportFormat::Csv => write_csv_rows(heightmap, start..end, writer)?,
            ExportFormat::Json => match options.json_layout {
                JsonLayout::Document => write_json_rows(heightmap, start..end, writer)?,
                JsonLayout::Fragments => write_json_fragment(heightmap, start..end, writer)?,
            },
        }

        progress.set_percent(fraction_percent(chunk + 1, total_chunks));
    }

    match format {
        ExportFormat::Lua => writer.write_all(b"}")?,
        ExportFormat::Json if options.json_layout == JsonLayout::Document => {
            writer.write_all(b"]")?
        }
        _ => {}
    }

    progress.set_percent(100.0);
    Ok(())
}

/// Comma-joined values using the shortest round-trip float form.
fn write_values<W: Write>(row: &[f64], writer: &mut W) -> ConvertResult<()> {
    for (i, value) in row.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        write!(writer, "{:?}", value)?;
    }
    Ok(())
}

fn write_lua_rows<W: Write>(
    heightmap: &Heightmap,
    rows: std::ops::Range<usize>,
    writer: &mut W,
) -> ConvertResult<()> {
    for y in rows {
        writer.write_all(b"{")?;
        write_values(heightmap.row(y), writer)?;
        writer.write_all(b"},\n")?;
    }
    Ok(())
}

fn write_csv_rows<W: Write>(
    heightmap: &Heightmap,
    rows: std::ops::Range<usize>,
    writer: &mut W,
) -> ConvertResult<()> {
    for y in rows {
        write_values(heightmap.row(y), writer)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Rows of a chunk inside the enclosing document array.
fn write_json_rows<W: Write>(
    heightmap: &Heightmap,
    rows: std::ops::Range<usize>,
    writer: &mut W,
) -> ConvertResult<()> {
    for y in rows {
        if y > 0 {
            writer.write_all(b",")?;
        }
        serde_json::to_writer(&mut *writer, heightmap.row(y))?;
    }
    Ok(())
}

/// A chunk as a standalone array, with no separator from its neighbours.
fn write_json_fragment<W: Write>(
    heightmap: &Heightmap,
    rows: std::ops::Range<usize>,
    writer: &mut W,
) -> ConvertResult<()> {
    let chunk: Vec<&[f64]> = rows.map(|y| heightmap.row(y)).collect();
    serde_json::to_writer(&mut *writer, &chunk)?;
    Ok(())
}
