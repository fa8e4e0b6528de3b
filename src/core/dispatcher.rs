/// Action dispatch — applies ordered batches of world actions to handlers.
///
/// Handlers are bound by action type at startup. A batch is applied strictly
/// in order; unknown types and handler failures are reported to the
/// diagnostic sink and never stop the rest of the batch.

use rustc_hash::FxHashMap;
use std::borrow::Cow;

use crate::core::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::core::effects::{self, HandlerError, WorldEffects};
use crate::schema::action::{ActionParams, ActionRecord};

/// A capability that performs the effect for one action type.
pub trait ActionHandler<E> {
    fn handle(&mut self, effects: &mut E, params: &ActionParams) -> Result<(), HandlerError>;
}

impl<E, F> ActionHandler<E> for F
where
    F: FnMut(&mut E, &ActionParams) -> Result<(), HandlerError>,
{
    fn handle(&mut self, effects: &mut E, params: &ActionParams) -> Result<(), HandlerError> {
        self(effects, params)
    }
}

/// The identifying parameter of an action type and its fallback value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDefault {
    name: String,
    value: String,
}

impl ParamDefault {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Borrow `params` unchanged when the parameter is present, otherwise
    /// return a copy with the default filled in.
    fn fill<'a>(&self, params: Cow<'a, ActionParams>) -> Cow<'a, ActionParams> {
        if params.contains_key(&self.name) {
            return params;
        }
        let mut owned = params.into_owned();
        owned.insert(self.name.clone(), self.value.clone());
        Cow::Owned(owned)
    }
}

struct Binding<E> {
    handler: Box<dyn ActionHandler<E>>,
    default: Option<ParamDefault>,
}

/// Summary of one [`ActionDispatcher::apply`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Records whose handler ran to completion without error.
    pub handled: usize,
    /// Everything reported to the sink during the call, in batch order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Maps action types to handlers and owns the effects collaborator they
/// drive. Registering a type that is already bound replaces the old handler.
pub struct ActionDispatcher<E> {
    handlers: FxHashMap<String, Binding<E>>,
    effects: E,
    sink: Box<dyn DiagnosticSink>,
}

impl<E: 'static> ActionDispatcher<E> {
    pub fn new(effects: E) -> Self {
        Self {
            handlers: FxHashMap::default(),
            effects,
            sink: Box::new(TracingSink),
        }
    }

    /// Replace the diagnostic sink.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Bind `handler` to `action_type`. Returns true if a previous binding
    /// was replaced.
    pub fn register_handler(
        &mut self,
        action_type: impl Into<String>,
        handler: impl ActionHandler<E> + 'static,
    ) -> bool {
        self.bind(action_type.into(), Box::new(handler), None)
    }

    /// Like [`register_handler`](Self::register_handler), but the handler
    /// always sees `default.name()` in its params.
    pub fn register_with_default(
        &mut self,
        action_type: impl Into<String>,
        default: ParamDefault,
        handler: impl ActionHandler<E> + 'static,
    ) -> bool {
        self.bind(action_type.into(), Box::new(handler), Some(default))
    }

    fn bind(
        &mut self,
        action_type: String,
        handler: Box<dyn ActionHandler<E>>,
        default: Option<ParamDefault>,
    ) -> bool {
        let replaced = self
            .handlers
            .insert(action_type.clone(), Binding { handler, default })
            .is_some();
        if replaced {
            tracing::debug!(%action_type, "Replaced action handler");
        }
        replaced
    }

    pub fn unregister(&mut self, action_type: &str) -> bool {
        self.handlers.remove(action_type).is_some()
    }

    pub fn has_handler(&self, action_type: &str) -> bool {
        self.handlers.contains_key(action_type)
    }

    /// Registered action types, sorted.
    pub fn handler_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Apply `actions` in order, one at a time.
    pub fn apply(&mut self, actions: &[ActionRecord]) -> ApplyReport {
        let mut report = ApplyReport::default();
        let empty = ActionParams::new();

        for (index, action) in actions.iter().enumerate() {
            let action_type = action.action_type();
            let Some(binding) = self.handlers.get_mut(action_type) else {
                let diagnostic = Diagnostic::UnknownActionType {
                    index,
                    action_type: action_type.to_string(),
                };
                self.sink.report(&diagnostic);
                report.diagnostics.push(diagnostic);
                continue;
            };

            let mut params = Cow::Borrowed(action.params().unwrap_or(&empty));
            if let Some(default) = &binding.default {
                params = default.fill(params);
            }

            match binding.handler.handle(&mut self.effects, &params) {
                Ok(()) => report.handled += 1,
                Err(error) => {
                    let diagnostic = Diagnostic::HandlerFailed {
                        index,
                        action_type: action_type.to_string(),
                        error,
                    };
                    self.sink.report(&diagnostic);
                    report.diagnostics.push(diagnostic);
                }
            }
        }

        report
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut E {
        &mut self.effects
    }

    pub fn into_effects(self) -> E {
        self.effects
    }
}

impl<E: WorldEffects + 'static> ActionDispatcher<E> {
    /// A dispatcher with `open_door`, `animate_nodes` and `drone_fall`
    /// already bound.
    pub fn with_builtin_handlers(effects: E) -> Self {
        let mut dispatcher = Self::new(effects);
        effects::register_builtins(&mut dispatcher);
        dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::MemorySink;

    /// Records every call as `"type:id"`.
    type Log = Vec<String>;

    fn record(action_type: &str) -> ActionRecord {
        ActionRecord::new(action_type).unwrap()
    }

    fn logging_handler(
        tag: &'static str,
    ) -> impl FnMut(&mut Log, &ActionParams) -> Result<(), HandlerError> {
        move |log, params| {
            let id = params.get("id").map(String::as_str).unwrap_or("-");
            log.push(format!("{}:{}", tag, id));
            Ok(())
        }
    }

    #[test]
    fn apply_empty_batch() {
        let sink = MemorySink::new();
        let mut dispatcher = ActionDispatcher::new(Log::new()).with_sink(sink.clone());
        dispatcher.register_handler("open_door", logging_handler("door"));

        let report = dispatcher.apply(&[]);
        assert_eq!(report, ApplyReport::default());
        assert!(report.is_clean());
        assert!(sink.is_empty());
        assert!(dispatcher.effects().is_empty());
    }

    #[test]
    fn default_fills_missing_param_only() {
        let mut dispatcher = ActionDispatcher::new(Log::new());
        dispatcher.register_with_default(
            "open_door",
            ParamDefault::new("id", "D-01"),
            logging_handler("door"),
        );

        let report = dispatcher.apply(&[
            record("open_door"),
            record("open_door").with_param("id", "D-02"),
            record("open_door").with_param("speed", "slow"),
        ]);
        assert_eq!(report.handled, 3);
        assert_eq!(
            dispatcher.effects(),
            &vec!["door:D-01", "door:D-02", "door:D-01"]
        );
    }

    #[test]
    fn handler_without_default_sees_raw_params() {
        let mut dispatcher = ActionDispatcher::new(Log::new());
        dispatcher.register_handler("ping", logging_handler("ping"));
        dispatcher.apply(&[record("ping")]);
        assert_eq!(dispatcher.effects(), &vec!["ping:-"]);
    }

    #[test]
    fn unknown_type_is_reported_once_and_batch_continues() {
        let sink = MemorySink::new();
        let mut dispatcher = ActionDispatcher::new(Log::new()).with_sink(sink.clone());
        dispatcher.register_handler("a", logging_handler("a"));

        let report = dispatcher.apply(&[record("a"), record("nope"), record("a")]);
        assert_eq!(report.handled, 2);
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::UnknownActionType {
                index: 1,
                action_type: "nope".to_string()
            }]
        );
        assert_eq!(sink.diagnostics(), report.diagnostics);
        assert_eq!(dispatcher.effects().len(), 2);
    }

    #[test]
    fn handler_failure_does_not_stop_batch() {
        let sink = MemorySink::new();
        let mut dispatcher = ActionDispatcher::new(Log::new()).with_sink(sink.clone());
        dispatcher.register_handler(
            "open_door",
            |_: &mut Log, params: &ActionParams| -> Result<(), HandlerError> {
                Err(HandlerError::EntityNotFound {
                    kind: "door",
                    id: params.get("id").cloned().unwrap_or_default(),
                })
            },
        );
        dispatcher.register_handler("b", logging_handler("b"));

        let report = dispatcher.apply(&[
            record("open_door").with_param("id", "D-99"),
            record("b"),
        ]);
        assert_eq!(report.handled, 1);
        assert_eq!(dispatcher.effects(), &vec!["b:-"]);
        assert_eq!(sink.len(), 1);
        let text = sink.diagnostics()[0].to_string();
        assert!(text.contains("open_door"));
        assert!(text.contains("D-99"));
    }

    #[test]
    fn last_registration_wins() {
        let mut dispatcher = ActionDispatcher::new(Log::new());
        assert!(!dispatcher.register_handler("x", logging_handler("first")));
        assert!(dispatcher.register_handler("x", logging_handler("second")));
        dispatcher.apply(&[record("x")]);
        assert_eq!(dispatcher.effects(), &vec!["second:-"]);
    }

    #[test]
    fn replacing_drops_old_default() {
        let mut dispatcher = ActionDispatcher::new(Log::new());
        dispatcher.register_with_default("x", ParamDefault::new("id", "X-1"), logging_handler("x"));
        dispatcher.register_handler("x", logging_handler("x"));
        dispatcher.apply(&[record("x")]);
        assert_eq!(dispatcher.effects(), &vec!["x:-"]);
    }

    #[test]
    fn unregister_and_introspection() {
        let mut dispatcher = ActionDispatcher::new(Log::new());
        dispatcher.register_handler("b", logging_handler("b"));
        dispatcher.register_handler("a", logging_handler("a"));
        assert_eq!(dispatcher.handler_types(), vec!["a", "b"]);
        assert!(dispatcher.has_handler("a"));
        assert!(dispatcher.unregister("a"));
        assert!(!dispatcher.unregister("a"));
        assert!(!dispatcher.has_handler("a"));

        let report = dispatcher.apply(&[record("a")]);
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn stateful_handler_keeps_state_between_calls() {
        let mut dispatcher = ActionDispatcher::new(Log::new());
        let mut count = 0;
        dispatcher.register_handler("tick", move |log: &mut Log, _: &ActionParams| -> Result<(), HandlerError> {
            count += 1;
            log.push(format!("tick {}", count));
            Ok(())
        });
        dispatcher.apply(&[record("tick"), record("tick")]);
        dispatcher.effects_mut().push("end".to_string());
        assert_eq!(dispatcher.into_effects(), vec!["tick 1", "tick 2", "end"]);
    }
}
