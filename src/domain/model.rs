use crate::codec::Record;
use crate::error::Result;

use super::parse_id;

/// A car model offered by the dealership
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub id: u32,
    pub name: String,
    pub brand: String,
}

impl Model {
    pub fn new(id: u32, name: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            brand: brand.into(),
        }
    }
}

impl Record for Model {
    type Key = u32;

    const ENTITY: &'static str = "model";
    const DATA_FILE: &'static str = "models.txt";
    const INDEX_FILE: &'static str = "models_index.txt";
    const FIELD_COUNT: usize = 3;

    fn key(&self) -> u32 {
        self.id
    }

    fn to_fields(&self) -> Result<Vec<String>> {
        Ok(vec![self.id.to_string(), self.name.clone(), self.brand.clone()])
    }

    fn from_fields(fields: &[&str]) -> Result<Self> {
        Ok(Self {
            id: parse_id(fields[0])?,
            name: fields[1].to_string(),
            brand: fields[2].to_string(),
        })
    }
}
