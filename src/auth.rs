//! Authentication and authorization.
//!
//! - `token`: stateless HS256 bearer tokens carrying id, username, and role.
//! - `password`: bcrypt hashing, treated as an opaque one-way function.
//! - `policy`: the pure ownership policy deciding who may see or modify
//!   which records.
//! - `extract`: axum extractors resolving a request to an [`policy::Actor`].

pub mod extract;
pub mod password;
pub mod policy;
pub mod token;
