// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV scanning and upload encoding detection

mod csv_parser;
mod encoding;

pub use csv_parser::CsvParser;
pub use encoding::decode_text;
