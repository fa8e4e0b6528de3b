/// World effects — the collaborator interface behind the built-in actions.
///
/// Doors, node animation and drones are owned by the engine. The dispatcher
/// only knows them through [`WorldEffects`]; the built-in handlers here
/// translate loosely typed action parameters into those calls.

use thiserror::Error;

use crate::core::dispatcher::{ActionDispatcher, ParamDefault};
use crate::schema::action::ActionParams;

/// Failure inside a single action handler. Never aborts a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("{kind} '{id}' not found in scene")]
    EntityNotFound { kind: &'static str, id: String },
    #[error("invalid parameter '{name}' = '{value}': {reason}")]
    InvalidParam {
        name: String,
        value: String,
        reason: String,
    },
    #[error("effect failed: {0}")]
    Effect(String),
}

/// Engine-side effect triggers used by the built-in handlers.
pub trait WorldEffects {
    /// Play the open animation, sound and VFX for door `id`.
    fn open_door(&mut self, id: &str) -> Result<(), HandlerError>;

    fn animate_nodes(&mut self, animation: &NodeAnimation) -> Result<(), HandlerError>;

    /// Play the fall animation for drone `id`.
    fn drone_fall(&mut self, id: &str) -> Result<(), HandlerError>;
}

/// Arguments of an `animate_nodes` action.
///
/// `enabled` and `skipped` arrive as comma-separated node ids. Every other
/// parameter is passed through untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeAnimation {
    pub enabled: Vec<String>,
    pub skipped: Vec<String>,
    pub extra: ActionParams,
}

impl NodeAnimation {
    pub fn from_params(params: &ActionParams) -> Self {
        let mut animation = NodeAnimation::default();
        for (name, value) in params {
            match name.as_str() {
                "enabled" => animation.enabled = split_ids(value),
                "skipped" => animation.skipped = split_ids(value),
                _ => {
                    animation.extra.insert(name.clone(), value.clone());
                }
            }
        }
        animation
    }
}

fn split_ids(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// The action types every client understands out of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinAction {
    OpenDoor,
    AnimateNodes,
    DroneFall,
}

impl BuiltinAction {
    pub const ALL: [BuiltinAction; 3] = [Self::OpenDoor, Self::AnimateNodes, Self::DroneFall];

    /// Wire name used in `ActionRecord::action_type`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenDoor => "open_door",
            Self::AnimateNodes => "animate_nodes",
            Self::DroneFall => "drone_fall",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }

    /// Identifying parameter and the value used when content omits it.
    pub fn param_default(&self) -> Option<ParamDefault> {
        match self {
            Self::OpenDoor => Some(ParamDefault::new("id", "D-01")),
            Self::AnimateNodes => None,
            Self::DroneFall => Some(ParamDefault::new("id", "DR-01")),
        }
    }
}

/// Parameter the entity handlers read their target from.
const ID_PARAM: &str = "id";

fn required_id(params: &ActionParams) -> Result<&str, HandlerError> {
    params
        .get(ID_PARAM)
        .map(String::as_str)
        .ok_or_else(|| HandlerError::InvalidParam {
            name: ID_PARAM.to_string(),
            value: String::new(),
            reason: "missing".to_string(),
        })
}

fn open_door<E: WorldEffects>(effects: &mut E, params: &ActionParams) -> Result<(), HandlerError> {
    let id = required_id(params)?;
    tracing::debug!(door_id = id, "Opening door");
    effects.open_door(id)
}

fn animate_nodes<E: WorldEffects>(
    effects: &mut E,
    params: &ActionParams,
) -> Result<(), HandlerError> {
    let animation = NodeAnimation::from_params(params);
    tracing::debug!(
        enabled = animation.enabled.len(),
        skipped = animation.skipped.len(),
        "Animating nodes"
    );
    effects.animate_nodes(&animation)
}

fn drone_fall<E: WorldEffects>(effects: &mut E, params: &ActionParams) -> Result<(), HandlerError> {
    let id = required_id(params)?;
    tracing::debug!(drone_id = id, "Drone falling");
    effects.drone_fall(id)
}

/// Bind the three built-in handlers on `dispatcher`, replacing any existing
/// bindings for their types.
pub fn register_builtins<E: WorldEffects + 'static>(dispatcher: &mut ActionDispatcher<E>) {
    for action in BuiltinAction::ALL {
        let handler: fn(&mut E, &ActionParams) -> Result<(), HandlerError> = match action {
            BuiltinAction::OpenDoor => open_door::<E>,
            BuiltinAction::AnimateNodes => animate_nodes::<E>,
            BuiltinAction::DroneFall => drone_fall::<E>,
        };
        match action.param_default() {
            Some(default) => dispatcher.register_with_default(action.name(), default, handler),
            None => dispatcher.register_handler(action.name(), handler),
        };
    }
}
