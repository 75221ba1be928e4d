//! Marker types distinguishing dates of the same entity.

/// Entity came into existence: created, registered, hired or concluded.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Entity stopped being active without being removed.
#[derive(Clone, Copy, Debug)]
pub struct Deactivation;

/// Something stops being valid or becomes due.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;
