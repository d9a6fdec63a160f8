//! Marketplace core for experience-group campaigns: advertisers post
//! campaigns, influencers apply, advertisers pick the winners.
//!
//! The services here are plain synchronous functions over a SQLite store and
//! an external identity provider; transports (the CLI in this crate, or any
//! HTTP layer) sit on top of the uniform [`error::Envelope`].

pub mod applications;
pub mod auth;
pub mod campaigns;
pub mod db;
pub mod error;
pub mod models;
pub mod schema;
pub mod wizard;
