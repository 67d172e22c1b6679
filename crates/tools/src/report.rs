use jointbench_common::EntityId;
use jointbench_physics::{PhysicsContext, Result};
use std::fmt::Write;

/// Human-readable dump of an entity's filter data: a header line, then one
/// `FilterData:` line per collider with the four words in binary.
pub fn filter_data_report(ctx: &PhysicsContext, id: EntityId) -> Result<String> {
    let records = ctx.filter_data(id)?;
    tracing::debug!(%id, shapes = records.len(), "filter data report");
    let mut out = String::new();
    let _ = writeln!(out, "filter data of entity {id} ({} shapes)", records.len());
    for fd in &records {
        let _ = writeln!(out, "FilterData: {fd}");
    }
    Ok(out)
}
