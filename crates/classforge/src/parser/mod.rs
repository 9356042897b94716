//! Style tree to syntax tree
//!
//! Signature, constraint and relationship parsing, tied together by the
//! [`TreeBuilder`].

pub mod builder;
pub mod constraints;
pub mod relationship;
pub mod signature;

pub use builder::{BuildSummary, TreeBuilder};
pub use relationship::EdgeStyle;
pub use signature::{parse_member, parse_method, parse_property, Member, MemberKind};
