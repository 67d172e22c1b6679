//! Developer Tooling: world inspector and filter-data reports.
//!
//! # Invariants
//! - Tools only read world and physics state.

mod inspector;
mod report;

pub use inspector::{EntityInfo, WorldInspector, WorldSummary};
pub use report::filter_data_report;

pub fn crate_info() -> &'static str {
    "jointbench-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
