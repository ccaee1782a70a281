//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity deletion.
#[derive(Clone, Copy, Debug)]
pub struct Deletion;

/// Marker type describing an entity expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

/// Marker type describing an entity execution.
#[derive(Clone, Copy, Debug)]
pub struct Execution;

/// Marker type describing an entity modification.
#[derive(Clone, Copy, Debug)]
pub struct Modification;

/// Marker type describing an entity posting.
#[derive(Clone, Copy, Debug)]
pub struct Posting;

/// Marker type describing an entity submission.
#[derive(Clone, Copy, Debug)]
pub struct Submission;
