//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an interval start.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type describing an interval end.
#[derive(Clone, Copy, Debug)]
pub struct End;

/// Marker type describing an entity completion.
#[derive(Clone, Copy, Debug)]
pub struct Completion;
