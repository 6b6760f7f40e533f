//! Pure authorization decisions. No IO: handlers resolve the actor and the
//! record owner, then ask these functions who may see or modify what.
//!
//! The two record types intentionally do not share one rule set. Locations
//! grant admins a write/delete override and owner-filtered listing; parcels
//! are globally listable but writable only by their owner, admin or not.
//! The asymmetry is part of the observed contract and is preserved rather
//! than unified, since unifying it would silently change who can access
//! which records.

use model::entities::user::Role;

/// The authenticated identity making a request, resolved from a verified
/// bearer token.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

/// Scope of a list query for the requesting actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Every record, regardless of owner.
    All,
    /// Only records stamped with this owner id.
    OwnedBy(i32),
}

/// Location lists are owner-filtered for plain users; admins see every
/// record. Out-of-scope records are filtered out, never a 403.
pub fn location_list_scope(actor: &Actor) -> ListScope {
    match actor.role {
        Role::Admin => ListScope::All,
        Role::User => ListScope::OwnedBy(actor.id),
    }
}

/// Parcel lists are visible in full to any authenticated actor.
pub fn parcel_list_scope(_actor: &Actor) -> ListScope {
    ListScope::All
}

/// A location may be written or deleted by its owner or by an admin.
pub fn can_modify_location(actor: &Actor, owner_id: i32) -> bool {
    actor.role == Role::Admin || actor.id == owner_id
}

/// A parcel may be written or deleted only by its owner. No admin override.
pub fn can_modify_parcel(actor: &Actor, owner_id: i32) -> bool {
    actor.id == owner_id
}

/// Account management is reserved for admins.
pub fn can_manage_users(actor: &Actor) -> bool {
    actor.role == Role::Admin
}
