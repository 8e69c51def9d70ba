//! Domain types supplied by the session or selected by the user

pub mod concept;
pub mod filter;
pub mod strategy;

pub use concept::{Concept, Term, TermSource, Vocabulary};
pub use filter::{Filter, FilterCategory};
pub use strategy::{Strategy, StrategyDefinition, StrategyKey, UnknownStrategy};
