//! Public extension contracts for plugging alternative signing schemes into the sequencer.

pub mod request_signer;

pub use request_signer::*;
