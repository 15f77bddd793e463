use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::info;

use super::schema::{Schema, SchemaDefinition, SchemaError};

#[derive(Debug, thiserror::Error)]
pub enum SchemaLoadError {
    #[error("failed to read questionnaire file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid questionnaire JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid questionnaire: {0}")]
    Schema(#[from] SchemaError),
}

/// Reads authored questionnaires from JSON.
pub struct SchemaLoader;

impl SchemaLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Schema, SchemaLoadError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let schema = Self::from_reader(BufReader::new(file))?;
        info!(path = %path.display(), "questionnaire read from file");
        Ok(schema)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Schema, SchemaLoadError> {
        let definition: SchemaDefinition = serde_json::from_reader(reader)?;
        Ok(Schema::new(definition)?)
    }
}
