pub mod coverage;
pub mod diagnostics;
pub mod dispatcher;
pub mod effects;
pub mod resolver;
pub mod settings;
