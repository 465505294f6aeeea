//! Decoding of raw response bodies into typed records.

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::types::*;

/// Parse an enveloped response and return its `data` payload.
pub fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_slice(body)?;
    tracing::trace!(
        api_version = %envelope.meta.api_version,
        query_time = envelope.meta.query_time,
        "decoded response envelope"
    );
    Ok(envelope.data)
}

pub fn decode_ping(body: &[u8]) -> Result<PingData> {
    decode_envelope(body)
}

pub fn decode_server_info(body: &[u8]) -> Result<ServerInfo> {
    decode_envelope(body)
}

pub fn decode_planets(body: &[u8]) -> Result<Vec<SpatialEntity>> {
    decode_envelope::<PlanetList>(body).map(|d| d.planets)
}

pub fn decode_asteroids(body: &[u8]) -> Result<Vec<SpatialEntity>> {
    decode_envelope::<AsteroidList>(body).map(|d| d.asteroids)
}

pub fn decode_grids(body: &[u8]) -> Result<Vec<Grid>> {
    decode_envelope::<GridList>(body).map(|d| d.grids)
}

pub fn decode_banned_players(body: &[u8]) -> Result<Vec<Player>> {
    decode_envelope::<BannedPlayers>(body).map(|d| d.banned_players)
}

pub fn decode_kicked_players(body: &[u8]) -> Result<Vec<Player>> {
    decode_envelope::<KickedPlayers>(body).map(|d| d.kicked_players)
}

pub fn decode_cheaters(body: &[u8]) -> Result<Vec<Cheater>> {
    decode_envelope::<Cheaters>(body).map(|d| d.cheaters)
}
