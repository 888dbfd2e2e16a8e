//! HTTP side of a match: the request that tells the server to start play

pub mod start;

pub use start::{HttpStarter, MatchStarter, StartError, StartReply};
