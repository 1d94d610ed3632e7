use serde::{Deserialize, Serialize};
use storage::RaceSnapshot;

use crate::error::{CollectorError, Result};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiResponse {
    #[serde(default)]
    pub data: Option<RaceData>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RaceData {
    #[serde(rename = "getRaceById", default)]
    pub race: Option<RaceSnapshot>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GraphQlError {
    pub message: String,
}

impl ApiResponse {
    /// A race wins over partial errors; errors alone are a failure; neither
    /// means the id has no race.
    pub fn into_race(self) -> Result<Option<RaceSnapshot>> {
        let race = self.data.and_then(|data| data.race);
        let errors = self.errors.unwrap_or_default();

        match race {
            Some(race) => Ok(Some(race)),
            None if !errors.is_empty() => Err(CollectorError::Graphql(
                errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            )),
            None => Ok(None),
        }
    }
}
