//! Device implementations of the collaborator seams

pub mod mock;
