//! Client for the Space Engineers dedicated server remote API.

pub mod auth;
pub mod client;
pub mod credential;
pub mod decode;
pub mod error;
pub mod types;

pub use client::{endpoints, RemoteApi, VRageClient, BASE_PATH, PONG};
pub use credential::Credential;
pub use error::{CredentialError, Result, VrageError};
pub use types::{Cheater, Grid, Player, Position, ServerInfo, SpatialEntity};
