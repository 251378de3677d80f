use hashlink_core::DumpGroup;

use crate::candidates::{ArchiveLayout, CandidatePlan, plan_candidates};
use crate::probe::Probe;
use crate::taxonomy::Taxonomy;

/// Finds the first candidate URL the archive actually serves.
pub struct ArchiveResolver<P> {
    taxonomy: Taxonomy,
    layout: ArchiveLayout,
    probe: P,
}

impl<P: Probe> ArchiveResolver<P> {
    pub fn new(taxonomy: Taxonomy, layout: ArchiveLayout, probe: P) -> Self {
        Self {
            taxonomy,
            layout,
            probe,
        }
    }

    pub fn layout(&self) -> &ArchiveLayout {
        &self.layout
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn plan(&self, group: DumpGroup, console: &str, declared_name: &str) -> CandidatePlan {
        let plan = plan_candidates(&self.taxonomy, &self.layout, group, console, declared_name);
        if plan.console_fallback {
            log::warn!(
                "No {group} folder listed for console '{console}', trying the console name as the folder (review archives.yaml)"
            );
        }
        plan
    }

    /// Probe candidates one at a time; the first hit wins.
    pub async fn resolve(
        &self,
        group: DumpGroup,
        console: &str,
        declared_name: &str,
    ) -> Option<String> {
        let plan = self.plan(group, console, declared_name);
        for url in plan.urls {
            if self.probe.exists(&url).await {
                log::debug!("Found {declared_name} at {url}");
                return Some(url);
            }
        }
        log::debug!("No candidate found for {declared_name} ({group}, {console})");
        None
    }
}
