//! Descriptors for every series the exporter can emit.
//!
//! Built once at startup and shared read-only between scrapes.

use std::sync::Arc;

pub const NAMESPACE: &str = "space_engineers";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    /// Monotonic within a server session.
    Counter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDesc {
    /// Fully qualified name, namespace included
    pub name: String,
    pub help: &'static str,
    pub kind: MetricKind,
    pub labels: &'static [&'static str],
}

impl MetricDesc {
    fn new(
        namespace: &str,
        name: &str,
        help: &'static str,
        kind: MetricKind,
        labels: &'static [&'static str],
    ) -> Arc<Self> {
        Arc::new(Self {
            name: build_fq_name(namespace, name),
            help,
            kind,
            labels,
        })
    }
}

fn build_fq_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}_{}", namespace, name)
    }
}

const ENTITY_LABELS: &[&str] = &["name", "id", "x", "y", "z"];

#[derive(Debug)]
pub struct MetricSchema {
    pub up: Arc<MetricDesc>,
    pub server_info: Arc<MetricDesc>,
    pub server_ready: Arc<MetricDesc>,
    pub server_uptime: Arc<MetricDesc>,
    pub players: Arc<MetricDesc>,
    pub sim_cpu_load: Arc<MetricDesc>,
    pub sim_speed: Arc<MetricDesc>,
    pub used_pcu: Arc<MetricDesc>,
    pub pirate_used_pcu: Arc<MetricDesc>,
    pub planet_info: Arc<MetricDesc>,
    pub asteroid_info: Arc<MetricDesc>,
    pub grids: Arc<MetricDesc>,
    pub grid_pcu: Arc<MetricDesc>,
    pub banned_players: Arc<MetricDesc>,
    pub kicked_players: Arc<MetricDesc>,
    pub cheaters: Arc<MetricDesc>,
}

impl MetricSchema {
    pub fn new(namespace: &str) -> Self {
        use MetricKind::*;
        let ns = namespace;
        Self {
            up: MetricDesc::new(
                ns,
                "up",
                "Was the exporter able to contact the remote API?",
                Gauge,
                &[],
            ),
            server_info: MetricDesc::new(
                ns,
                "server_info",
                "Server identity, always 1",
                Gauge,
                &["server_name", "world_name", "version", "server_id"],
            ),
            server_ready: MetricDesc::new(
                ns,
                "server_ready",
                "Is the server ready to accept players?",
                Gauge,
                &[],
            ),
            server_uptime: MetricDesc::new(
                ns,
                "server_uptime_seconds",
                "Seconds the current session has been running",
                Counter,
                &[],
            ),
            players: MetricDesc::new(ns, "players", "Number of connected players", Gauge, &[]),
            sim_cpu_load: MetricDesc::new(
                ns,
                "sim_cpu_load",
                "Simulation CPU load in percent",
                Gauge,
                &[],
            ),
            sim_speed: MetricDesc::new(ns, "sim_speed", "Simulation speed factor", Gauge, &[]),
            used_pcu: MetricDesc::new(ns, "used_pcu", "Total PCU in use", Gauge, &[]),
            pirate_used_pcu: MetricDesc::new(
                ns,
                "pirate_used_pcu",
                "PCU in use by pirates",
                Gauge,
                &[],
            ),
            planet_info: MetricDesc::new(
                ns,
                "planet_info",
                "Planet in the session, always 1",
                Gauge,
                ENTITY_LABELS,
            ),
            asteroid_info: MetricDesc::new(
                ns,
                "asteroid_info",
                "Asteroid in the session, always 1",
                Gauge,
                ENTITY_LABELS,
            ),
            grids: MetricDesc::new(ns, "grids", "Number of grids", Gauge, &["powered", "size"]),
            grid_pcu: MetricDesc::new(
                ns,
                "grid_pcu",
                "PCU used by grids, per owner",
                Gauge,
                &["powered", "size", "owner"],
            ),
            banned_players: MetricDesc::new(
                ns,
                "banned_players",
                "Number of banned players",
                Gauge,
                &[],
            ),
            kicked_players: MetricDesc::new(
                ns,
                "kicked_players",
                "Number of kicked players",
                Gauge,
                &[],
            ),
            cheaters: MetricDesc::new(ns, "cheaters", "Number of reported cheaters", Gauge, &[]),
        }
    }

    /// All descriptors in emission order.
    pub fn descriptors(&self) -> [&Arc<MetricDesc>; 16] {
        [
            &self.up,
            &self.server_info,
            &self.server_ready,
            &self.server_uptime,
            &self.players,
            &self.sim_cpu_load,
            &self.sim_speed,
            &self.used_pcu,
            &self.pirate_used_pcu,
            &self.planet_info,
            &self.asteroid_info,
            &self.grids,
            &self.grid_pcu,
            &self.banned_players,
            &self.kicked_players,
            &self.cheaters,
        ]
    }
}

impl Default for MetricSchema {
    fn default() -> Self {
        Self::new(NAMESPACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_namespaced_and_unique() {
        let schema = MetricSchema::default();
        let descriptors = schema.descriptors();
        let names: HashSet<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names.len(), 16);
        assert!(names.iter().all(|n| n.starts_with("space_engineers_")));
        assert!(names.contains("space_engineers_up"));
    }

    #[test]
    fn test_uptime_is_counter() {
        let schema = MetricSchema::default();
        assert_eq!(schema.server_uptime.kind, MetricKind::Counter);
        assert_eq!(schema.players.kind, MetricKind::Gauge);
    }

    #[test]
    fn test_empty_namespace() {
        let schema = MetricSchema::new("");
        assert_eq!(schema.up.name, "up");
    }
}
