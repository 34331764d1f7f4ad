//! Purpose: Define the stable public Rust API boundary for cartelera.
//! Exports: Core types and operations needed by the CLI and tests.
//! Role: Public, additive-only surface; hides internal module layout.
//! Invariants: This module is the only public path callers should depend on.

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};

pub use crate::core::calendar::{month_from_spanish, weekday_name};
pub use crate::core::dataset::{Film, Table, TableStats, REQUIRED_COLUMNS};
pub use crate::core::query::{
    ActorTally, DirectorCredit, ScoreRow, VotesOutcome, VOTE_THRESHOLD,
};
