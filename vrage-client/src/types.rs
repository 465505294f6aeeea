//! Response records for the VRage Remote API.
//!
//! Every response is wrapped in `{ "meta": {...}, "data": {...} }`. Payload
//! structs default every field so that a server omitting a value yields the
//! zero value instead of a decode failure.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    #[serde(rename = "queryTime")]
    pub query_time: f64,
}

/// Common response envelope. `data` is mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub meta: Meta,
    pub data: T,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PingData {
    #[serde(rename = "Result")]
    pub result: String,
}

/// `/v1/server`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerInfo {
    #[serde(rename = "IsReady")]
    pub is_ready: bool,
    #[serde(rename = "PirateUsedPCU")]
    pub pirate_used_pcu: u64,
    #[serde(rename = "Players")]
    pub players: i64,
    #[serde(rename = "ServerId")]
    pub server_id: u64,
    #[serde(rename = "ServerName")]
    pub server_name: String,
    #[serde(rename = "SimSpeed")]
    pub sim_speed: f64,
    #[serde(rename = "SimulationCpuLoad")]
    pub simulation_cpu_load: f64,
    /// Seconds the session has been running
    #[serde(rename = "TotalTime")]
    pub total_time: u64,
    #[serde(rename = "UsedPCU")]
    pub used_pcu: u64,
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "WorldName")]
    pub world_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Z")]
    pub z: f64,
}

/// A planet or an asteroid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialEntity {
    #[serde(rename = "DisplayName")]
    pub display_name: String,
    #[serde(rename = "EntityId")]
    pub entity_id: i64,
    #[serde(rename = "Position")]
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetList {
    #[serde(rename = "Planets")]
    pub planets: Vec<SpatialEntity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidList {
    #[serde(rename = "Asteroids")]
    pub asteroids: Vec<SpatialEntity>,
}

/// A ship or station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grid {
    #[serde(rename = "DisplayName")]
    pub display_name: String,
    #[serde(rename = "EntityId")]
    pub entity_id: i64,
    /// "Large" or "Small"
    #[serde(rename = "GridSize")]
    pub grid_size: String,
    #[serde(rename = "BlocksCount")]
    pub blocks_count: u64,
    #[serde(rename = "Mass")]
    pub mass: f64,
    #[serde(rename = "Position")]
    pub position: Position,
    #[serde(rename = "LinearSpeed")]
    pub linear_speed: f64,
    #[serde(rename = "DistanceToPlayer")]
    pub distance_to_player: f64,
    #[serde(rename = "OwnerSteamId")]
    pub owner_steam_id: u64,
    /// Empty for unowned grids
    #[serde(rename = "OwnerDisplayName")]
    pub owner_display_name: String,
    #[serde(rename = "IsPowered")]
    pub is_powered: bool,
    #[serde(rename = "PCU")]
    pub pcu: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridList {
    #[serde(rename = "Grids")]
    pub grids: Vec<Grid>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Player {
    #[serde(rename = "SteamID")]
    pub steam_id: u64,
    #[serde(rename = "DisplayName")]
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannedPlayers {
    #[serde(rename = "BannedPlayers")]
    pub banned_players: Vec<Player>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KickedPlayers {
    #[serde(rename = "KickedPlayers")]
    pub kicked_players: Vec<Player>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cheater {
    #[serde(rename = "Explanation")]
    pub explanation: String,
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "PlayerId")]
    pub player_id: u64,
    #[serde(rename = "ServerDateTime")]
    pub server_date_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cheaters {
    #[serde(rename = "Cheaters")]
    pub cheaters: Vec<Cheater>,
}
