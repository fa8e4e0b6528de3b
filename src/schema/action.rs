use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Loosely typed action parameters, as received from content data.
pub type ActionParams = HashMap<String, String>;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("action type must not be empty")]
    EmptyType,
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A declarative unit of world work produced by the narrative/event system.
///
/// On the wire the discriminant is called `type`; older content used
/// `paramsDict` for the parameters, which is still accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawActionRecord")]
pub struct ActionRecord {
    #[serde(rename = "type")]
    action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    params: Option<ActionParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message_key: Option<String>,
}

#[derive(Deserialize)]
struct RawActionRecord {
    #[serde(rename = "type")]
    action_type: String,
    #[serde(default, alias = "paramsDict")]
    params: Option<ActionParams>,
    #[serde(default)]
    message_key: Option<String>,
}

impl TryFrom<RawActionRecord> for ActionRecord {
    type Error = ActionError;

    fn try_from(raw: RawActionRecord) -> Result<Self, Self::Error> {
        let mut record = ActionRecord::new(raw.action_type)?;
        record.params = raw.params;
        record.message_key = raw.message_key;
        Ok(record)
    }
}

impl ActionRecord {
    pub fn new(action_type: impl Into<String>) -> Result<Self, ActionError> {
        let action_type = action_type.into();
        if action_type.is_empty() {
            return Err(ActionError::EmptyType);
        }
        Ok(Self {
            action_type,
            params: None,
            message_key: None,
        })
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .get_or_insert_with(ActionParams::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_message_key(mut self, key: impl Into<String>) -> Self {
        self.message_key = Some(key.into());
        self
    }

    /// Parse a JSON array of records, e.g. the `world_actions` of a run result.
    pub fn batch_from_json(input: &str) -> Result<Vec<ActionRecord>, ActionError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// The raw parameters; `None` when the record carried none at all.
    pub fn params(&self) -> Option<&ActionParams> {
        self.params.as_ref()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.as_ref()?.get(name).map(String::as_str)
    }

    /// Text key of a message to display alongside the action, if any.
    pub fn message_key(&self) -> Option<&str> {
        self.message_key.as_deref()
    }
}
