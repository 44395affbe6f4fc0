//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an entity modification.
#[derive(Clone, Copy, Debug)]
pub struct Modification;

/// Marker type describing an entity deletion.
#[derive(Clone, Copy, Debug)]
pub struct Deletion;

/// Marker type describing a deadline.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

/// Marker type describing a performed maintenance.
#[derive(Clone, Copy, Debug)]
pub struct Maintenance;

/// Marker type describing a dispatch to an external party.
#[derive(Clone, Copy, Debug)]
pub struct Sending;

/// Marker type describing a response of an external party.
#[derive(Clone, Copy, Debug)]
pub struct Response;

/// Marker type describing a finalization of some work.
#[derive(Clone, Copy, Debug)]
pub struct Finalization;

/// Marker type describing a start of some period.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type describing an end of some period.
#[derive(Clone, Copy, Debug)]
pub struct Finish;

/// Marker type describing a return of a lent item.
#[derive(Clone, Copy, Debug)]
pub struct Return;
