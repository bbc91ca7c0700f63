//! Stock filter engine: staged/active state machine, payload builder,
//! session context and saved presets

pub mod actions;
pub mod payload;
pub mod presets;
pub mod reducer;
pub mod session;
pub mod state;

pub use actions::FilterAction;
pub use payload::{build_payload, FilterPayload};
pub use presets::{FilterPreset, KvStore, MemoryKvStore, PresetManager, SqliteKvStore};
pub use reducer::reduce;
pub use session::FilterSession;
pub use state::{ActiveCriterion, FilterState};
