/// Grid rows written per export chunk
pub const DEFAULT_EXPORT_CHUNK_ROWS: usize = 100;

/// Suffix appended to an export path for its manifest sidecar
pub const MANIFEST_SUFFIX: &str = ".manifest.json";

/// Extensions recognised by the exporter
pub const LUA_EXTENSION: &str = "lua";
pub const CSV_EXTENSION: &str = "csv";
pub const JSON_EXTENSION: &str = "json";
