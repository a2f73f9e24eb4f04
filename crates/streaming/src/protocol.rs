//! Wire types for the embedding service.
//!
//! - `GET  /index`    → [`CorpusResponse`] (initial seed + projection id)
//! - `POST /search`   [`SearchRequest`] → [`CorpusResponse`]
//! - `POST /pca`      [`RecenterRequest`] → [`CorpusResponse`] (recenter)
//!
//! Responses are decoded leniently: coordinates may be objects or arrays, the
//! word map may be wrapped or bare.

use std::collections::BTreeMap;

use foundation::math::Vec3;
use scene::word::{FetchedCorpus, FetchedWord};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Opaque token identifying the coordinate space; echoed back so the service
/// keeps coordinates consistent across calls.
pub type ProjectionId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "word")]
    pub text: String,
    pub languages: Vec<String>,
    #[serde(rename = "words_per_l")]
    pub words_per_language: usize,
    #[serde(rename = "pca_id", skip_serializing_if = "Option::is_none", default)]
    pub projection_id: Option<ProjectionId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecenterRequest {
    pub words: Vec<String>,
    pub search_history: Vec<String>,
    #[serde(rename = "pca_id", skip_serializing_if = "Option::is_none", default)]
    pub projection_id: Option<ProjectionId>,
}

/// Coordinates as the service may send them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireCoords {
    Object {
        x: f64,
        y: f64,
        z: f64,
        #[serde(default)]
        language: Option<String>,
    },
    Array([f64; 3]),
}

impl WireCoords {
    fn into_fetched(self) -> FetchedWord {
        match self {
            WireCoords::Object { x, y, z, language } => {
                FetchedWord::new(Vec3::new(x, y, z), language)
            }
            WireCoords::Array(v) => FetchedWord::new(Vec3::from_array(v), None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WrappedCorpus {
    #[serde(alias = "vectors")]
    pub words: BTreeMap<String, WireCoords>,
    #[serde(default, alias = "pca_id")]
    pub projection_id: Option<ProjectionId>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum ResponseBody {
    Wrapped(WrappedCorpus),
    Bare(BTreeMap<String, WireCoords>),
}

/// A decoded corpus response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorpusResponse {
    pub words: FetchedCorpus,
    pub projection_id: Option<ProjectionId>,
}

impl CorpusResponse {
    pub fn from_json(body: &str) -> Result<Self, FetchError> {
        let (words, projection_id) = match serde_json::from_str::<ResponseBody>(body) {
            Ok(ResponseBody::Wrapped(w)) => (w.words, w.projection_id),
            Ok(ResponseBody::Bare(words)) => (words, None),
            Err(err) => {
                return Err(FetchError::malformed(format!(
                    "expected a word → coordinates map: {err}"
                )));
            }
        };
        let words = words
            .into_iter()
            .map(|(word, coords)| (word, coords.into_fetched()))
            .collect();
        Ok(Self {
            words,
            projection_id,
        })
    }
}
