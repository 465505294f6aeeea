//! One scrape cycle against the remote API.
//!
//! Calls run strictly in order. A failing step ends the cycle but keeps
//! whatever was already emitted; nothing is raised to the caller.

use std::sync::Arc;
use std::time::Instant;

use vrage_client::{RemoteApi, SpatialEntity, VrageError};

use crate::grouping::summarize_grids;
use crate::schema::{MetricDesc, MetricSchema};
use crate::snapshot::MetricSnapshot;

pub struct Collector {
    api: Arc<dyn RemoteApi>,
    schema: Arc<MetricSchema>,
}

impl Collector {
    pub fn new(api: Arc<dyn RemoteApi>, schema: Arc<MetricSchema>) -> Self {
        Self { api, schema }
    }

    /// Run a full cycle. `up` is the only series guaranteed to be present.
    pub async fn collect(&self) -> MetricSnapshot {
        let started = Instant::now();
        let mut snapshot = MetricSnapshot::new();

        if let Err(e) = self.api.ping().await {
            tracing::warn!("Remote API liveness check failed: {}", e);
            snapshot.set(&self.schema.up, 0.0);
            return snapshot;
        }
        snapshot.set(&self.schema.up, 1.0);

        if let Err(e) = self.collect_details(&mut snapshot).await {
            tracing::warn!("Scrape cycle aborted early: {}", e);
        }

        tracing::debug!(
            "Scrape cycle finished with {} series in {:?}",
            snapshot.len(),
            started.elapsed()
        );
        snapshot
    }

    async fn collect_details(&self, snapshot: &mut MetricSnapshot) -> Result<(), VrageError> {
        self.collect_server_info(snapshot).await?;
        self.collect_planets(snapshot).await?;
        self.collect_asteroids(snapshot).await?;
        self.collect_grids(snapshot).await?;
        self.collect_moderation(snapshot).await
    }

    async fn collect_server_info(&self, snapshot: &mut MetricSnapshot) -> Result<(), VrageError> {
        let info = self.api.server_info().await?;
        let s = &self.schema;

        snapshot.push(
            &s.server_info,
            vec![
                info.server_name.clone(),
                info.world_name.clone(),
                info.version.clone(),
                info.server_id.to_string(),
            ],
            1.0,
        );
        snapshot.set(&s.server_ready, if info.is_ready { 1.0 } else { 0.0 });
        snapshot.set(&s.server_uptime, info.total_time as f64);
        snapshot.set(&s.players, info.players as f64);
        snapshot.set(&s.sim_cpu_load, info.simulation_cpu_load);
        snapshot.set(&s.sim_speed, info.sim_speed);
        snapshot.set(&s.used_pcu, info.used_pcu as f64);
        snapshot.set(&s.pirate_used_pcu, info.pirate_used_pcu as f64);
        Ok(())
    }

    async fn collect_planets(&self, snapshot: &mut MetricSnapshot) -> Result<(), VrageError> {
        let planets = self.api.planets().await?;
        push_entities(snapshot, &self.schema.planet_info, &planets);
        Ok(())
    }

    async fn collect_asteroids(&self, snapshot: &mut MetricSnapshot) -> Result<(), VrageError> {
        let asteroids = self.api.asteroids().await?;
        push_entities(snapshot, &self.schema.asteroid_info, &asteroids);
        Ok(())
    }

    async fn collect_grids(&self, snapshot: &mut MetricSnapshot) -> Result<(), VrageError> {
        let grids = self.api.grids().await?;
        let summary = summarize_grids(&grids);

        for bucket in &summary.buckets {
            let powered = bucket.key.powered_label();
            let size = bucket.key.size.as_str();
            snapshot.push(
                &self.schema.grids,
                vec![powered.to_string(), size.to_string()],
                bucket.count as f64,
            );
        }

        // TODO: make owner scope configurable (per-bucket owners would cut
        // the zero-valued series but make grid_pcu cardinality unstable).
        for bucket in &summary.buckets {
            let powered = bucket.key.powered_label();
            let size = bucket.key.size.as_str();
            for (owner, pcu) in &bucket.pcu_by_owner {
                snapshot.push(
                    &self.schema.grid_pcu,
                    vec![powered.to_string(), size.to_string(), owner.clone()],
                    *pcu as f64,
                );
            }
        }
        Ok(())
    }

    async fn collect_moderation(&self, snapshot: &mut MetricSnapshot) -> Result<(), VrageError> {
        let banned = self.api.banned_players().await?;
        snapshot.set(&self.schema.banned_players, banned.len() as f64);

        let kicked = self.api.kicked_players().await?;
        snapshot.set(&self.schema.kicked_players, kicked.len() as f64);

        let cheaters = self.api.cheaters().await?;
        snapshot.set(&self.schema.cheaters, cheaters.len() as f64);
        Ok(())
    }
}

fn push_entities(
    snapshot: &mut MetricSnapshot,
    desc: &Arc<MetricDesc>,
    entities: &[SpatialEntity],
) {
    for entity in entities {
        snapshot.push(
            desc,
            vec![
                entity.display_name.clone(),
                entity.entity_id.to_string(),
                entity.position.x.to_string(),
                entity.position.y.to_string(),
                entity.position.z.to_string(),
            ],
            1.0,
        );
    }
}
