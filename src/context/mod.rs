//! Query-time context bundle produced by the (external) context parser
//!
//! A `ParsedContext` holds the entities, relationships and retrieved chunks
//! for a single query. It is owned by the query and discarded afterwards.

mod chunk;
mod input;

pub use chunk::{Chunk, SourceType};
pub use input::{parse_causal_paths, AttributionInput, CausalPathHop, InputError, ParsedContext};
