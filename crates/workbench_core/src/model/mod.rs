//! Domain model for the project tracker.
//!
//! # Responsibility
//! - Define the canonical data structures shared by repository and
//!   service layers.
//! - Keep the project aggregate shape (project + materials + steps +
//!   categories) in one place.
//!
//! # Invariants
//! - A `Project` identity is assigned by the store on insert and never
//!   changes afterwards.
//! - Child collections belong to exactly one project aggregate.

pub mod project;
