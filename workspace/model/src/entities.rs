//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the geospatial note-taking application
//! here: user accounts plus the two kinds of map records they own.

pub mod location;
pub mod site_polygon;
pub mod user;
