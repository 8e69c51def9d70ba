//! # PBQ Builder - strategy and filter selection over boolean queries

pub mod builder;
pub mod codec;
pub mod config;
pub mod errors;
pub mod filters;
pub mod session;
pub mod types;

// Convenience re-exports
pub use builder::{BuilderMode, BuilderState, QueryBuilder};
pub use codec::{MemoryStateStore, ParamMap, QueryStringStore, StateCodec, StateStore};
pub use errors::BuilderError;
pub use session::SessionData;

pub mod prelude {
    pub use crate::builder::{BuilderMode, BuilderState, QueryBuilder};

    pub use crate::codec::{
        parse_query_string, to_query_string, MemoryStateStore, ParamMap, PersistedState,
        QueryStringStore, StateCodec, StateStore,
    };

    pub use crate::config::{BuilderConfig, ConfigError};
    pub use crate::errors::BuilderError;
    pub use crate::filters::FilterCatalog;
    pub use crate::session::SessionData;

    pub use crate::types::{
        Concept, Filter, FilterCategory, Strategy, StrategyDefinition, StrategyKey, Term,
        TermSource, Vocabulary,
    };
}
