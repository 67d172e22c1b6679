use jointbench_common::EntityId;
use jointbench_physics::FilterData;
use jointbench_tools::{EntityInfo, WorldSummary};
use serde::Serialize;
use std::fmt;

/// Filter data of one entity at one moment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSnapshot {
    pub label: String,
    pub entity: EntityId,
    pub records: Vec<FilterData>,
}

/// End-of-run snapshot of the scene.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub summary: WorldSummary,
    pub joint_attached: bool,
    pub preserve_filter_data: bool,
    pub entities: Vec<EntityInfo>,
    pub filter_before: Vec<FilterSnapshot>,
    pub filter_after: Vec<FilterSnapshot>,
}

impl ScenarioReport {
    /// Whether every entity dumped before the attachment reports the same
    /// records afterwards. `None` until the probe has been attached.
    pub fn filter_data_unchanged(&self) -> Option<bool> {
        if !self.joint_attached {
            return None;
        }
        Some(
            self.filter_before
                .iter()
                .zip(&self.filter_after)
                .all(|(before, after)| before.records == after.records),
        )
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary)?;
        writeln!(
            f,
            "probe joint: {} (preserve filter data: {})",
            if self.joint_attached { "attached" } else { "pending" },
            self.preserve_filter_data
        )?;
        for info in &self.entities {
            writeln!(f, "  {info}")?;
        }
        if let Some(unchanged) = self.filter_data_unchanged() {
            writeln!(
                f,
                "filter data {}",
                if unchanged { "unchanged by attachment" } else { "CHANGED by attachment" }
            )?;
        }
        Ok(())
    }
}
