//! Per-scrape collection of labeled observations.

use std::sync::Arc;

use crate::schema::MetricDesc;

#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub desc: Arc<MetricDesc>,
    pub label_values: Vec<String>,
    pub value: f64,
}

/// Output of one scrape cycle. Observations keep their emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSnapshot {
    observations: Vec<Observation>,
}

impl MetricSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, desc: &Arc<MetricDesc>, label_values: Vec<String>, value: f64) {
        debug_assert_eq!(
            desc.labels.len(),
            label_values.len(),
            "label arity mismatch for {}",
            desc.name
        );
        self.observations.push(Observation {
            desc: Arc::clone(desc),
            label_values,
            value,
        });
    }

    /// Shorthand for unlabeled series.
    pub fn set(&mut self, desc: &Arc<MetricDesc>, value: f64) {
        self.push(desc, Vec::new(), value);
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Value of the series `name` with exactly these label values.
    pub fn get(&self, name: &str, label_values: &[&str]) -> Option<f64> {
        self.observations
            .iter()
            .find(|o| {
                o.desc.name == name
                    && o.label_values
                        .iter()
                        .map(String::as_str)
                        .eq(label_values.iter().copied())
            })
            .map(|o| o.value)
    }

    pub fn series_count(&self, name: &str) -> usize {
        self.observations.iter().filter(|o| o.desc.name == name).count()
    }

    /// Observations grouped by descriptor, in order of first appearance.
    pub fn families(&self) -> Vec<(&Arc<MetricDesc>, Vec<&Observation>)> {
        let mut families: Vec<(&Arc<MetricDesc>, Vec<&Observation>)> = Vec::new();
        for obs in &self.observations {
            match families.iter().position(|(desc, _)| desc.name == obs.desc.name) {
                Some(i) => families[i].1.push(obs),
                None => families.push((&obs.desc, vec![obs])),
            }
        }
        families
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MetricSchema;

    #[test]
    fn test_get_and_families() {
        let schema = MetricSchema::default();
        let mut snapshot = MetricSnapshot::new();
        snapshot.set(&schema.up, 1.0);
        snapshot.push(&schema.grids, vec!["true".into(), "Large".into()], 2.0);
        snapshot.push(&schema.grids, vec!["false".into(), "Small".into()], 1.0);

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.get("space_engineers_up", &[]), Some(1.0));
        assert_eq!(snapshot.get("space_engineers_grids", &["false", "Small"]), Some(1.0));
        assert_eq!(snapshot.get("space_engineers_grids", &["false", "Large"]), None);
        assert_eq!(snapshot.series_count("space_engineers_grids"), 2);

        let families = snapshot.families();
        assert_eq!(families.len(), 2);
        assert_eq!(families[0].0.name, "space_engineers_up");
        assert_eq!(families[1].1.len(), 2);
    }
}
