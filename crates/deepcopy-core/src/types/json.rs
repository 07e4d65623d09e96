use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{TypeArena, TypeId};

fn default_receiver() -> String {
    "o".to_string()
}

/// Everything one synthesis run needs, as produced by an external introspection tool.
///
/// ```json
/// {
///   "types": [
///     { "kind": "primitive", "primitive": "string" },
///     { "name": "Foo", "namespace": "example.com/pkg", "kind": "record",
///       "fields": [{ "name": "A", "ty": 0 }] }
///   ],
///   "root": 1,
///   "receiver": "f"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDocument {
    pub types: TypeArena,
    pub root: TypeId,
    #[serde(default = "default_receiver")]
    pub receiver: String,
    #[serde(default)]
    pub ignore: Vec<TypeId>,
}

impl TypeDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        let document: TypeDocument = serde_json::from_str(json)?;
        document.validate()?;
        Ok(document)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let document: TypeDocument = serde_json::from_reader(reader)?;
        document.validate()?;
        Ok(document)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.types.validate()?;
        self.types.check_id(self.root)?;
        for id in &self.ignore {
            self.types.check_id(*id)?;
        }
        if !is_identifier(&self.receiver) {
            return Err(Error::descriptor(format!(
                "receiver `{}` is not a Go identifier",
                self.receiver
            )));
        }
        Ok(())
    }
}

/// Whether `s` can name a Go variable or receiver.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}
