use std::collections::HashMap;

use serde::Serialize;

use crate::store::operations::reports::ReportType;
use crate::store::{Store, StoreError};

/// All reports against one place, tallied by type. Free-text content is
/// carried only for the catch-all type, in arrival order with duplicates
/// kept.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceReportGroup {
    pub place_id: String,
    pub road_address: String,
    pub counts_by_type: HashMap<String, u64>,
    pub other_contents: Vec<String>,
}

/// Groups every report by its owning place. Places with zero reports do
/// not appear. Report volume is bounded (every row is admin-triaged), so
/// grouping in memory beats maintaining another index.
pub fn group_reports_by_place(store: &Store) -> Result<Vec<PlaceReportGroup>, StoreError> {
    let mut groups: Vec<PlaceReportGroup> = Vec::new();
    let mut by_place: HashMap<String, usize> = HashMap::new();

    for report in store.list_reports()? {
        let idx = match by_place.get(&report.place_id) {
            Some(&idx) => idx,
            None => {
                let road_address = store
                    .get_place(&report.place_id)?
                    .map(|p| p.road_address)
                    .unwrap_or_default();
                groups.push(PlaceReportGroup {
                    place_id: report.place_id.clone(),
                    road_address,
                    counts_by_type: HashMap::new(),
                    other_contents: Vec::new(),
                });
                by_place.insert(report.place_id.clone(), groups.len() - 1);
                groups.len() - 1
            }
        };

        let group = &mut groups[idx];
        *group
            .counts_by_type
            .entry(report.report_type.as_str().to_string())
            .or_insert(0) += 1;
        if report.report_type == ReportType::Other {
            if let Some(content) = report.content {
                group.other_contents.push(content);
            }
        }
    }

    Ok(groups)
}
