//! Conversation-tree reconstruction, rank filtering and pairing for
//! preference / instruction dataset preparation. Pure, no I/O.

pub mod core_domain;

pub use core_domain as core;
