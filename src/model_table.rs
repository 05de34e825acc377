use crate::chat::ChatRequest;
use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;

/// Source model id to replacement model id. Loaded once at startup and
/// shared read-only by every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelTable {
    entries: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone)]
pub struct Rewritten {
    pub request: ChatRequest,
    pub substitution: Option<Substitution>,
}

impl ModelTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|source| ConfigError::ModelTableRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&raw).map_err(|source| ConfigError::ModelTableParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_slice(raw: &[u8]) -> serde_json::Result<Self> {
        let entries: HashMap<String, String> = serde_json::from_slice(raw)?;
        Ok(Self { entries })
    }

    pub fn lookup(&self, model: &str) -> Option<&str> {
        self.entries.get(model).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces `request.model` when it is a key of the table. Exact match
    /// only; everything else in the request is returned untouched.
    pub fn rewrite(&self, mut request: ChatRequest) -> Rewritten {
        let Some(target) = self.lookup(&request.model) else {
            return Rewritten {
                request,
                substitution: None,
            };
        };
        let substitution = Substitution {
            from: std::mem::replace(&mut request.model, target.to_string()),
            to: target.to_string(),
        };
        tracing::info!(
            from = %substitution.from,
            to = %substitution.to,
            "replaced model"
        );
        metrics::counter!(
            "model_forward_substitutions_total",
            "from" => substitution.from.clone(),
            "to" => substitution.to.clone()
        )
        .increment(1);
        Rewritten {
            request,
            substitution: Some(substitution),
        }
    }
}

impl FromIterator<(String, String)> for ModelTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
