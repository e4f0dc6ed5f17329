//! Backstage incident stage.
//!
//! Rolls the incident catalog against the invoking company's roster.
//! Each catalog entry is an independent weekly probability, scaled by
//! a roster morale factor: low morale breeds incidents, high morale
//! dampens them. Factor is clamped to [0.6, 1.4].

use crate::{
    config::{IncidentCatalog, IncidentDefinition},
    error::SimResult,
    inbox::{InboxItem, InboxKind},
    rng::GameRng,
    stage::{StageContext, WeeklyStage},
    store::SimStore,
    types::Week,
};

/// Roster slice the incident rolls need.
#[derive(Debug, Clone)]
pub struct RosterWorker {
    pub worker_id: String,
    pub name: String,
    pub morale: i32,
}

/// A materialized incident, persisted and turned into a notice.
#[derive(Debug, Clone)]
pub struct BackstageIncident {
    pub incident_id: String,
    pub company_id: String,
    pub week: Week,
    pub type_id: String,
    pub title: String,
    pub description: String,
    pub severity: i32,
    pub participants: Vec<String>,
}

pub struct IncidentStage {
    catalog: IncidentCatalog,
}

impl IncidentStage {
    pub fn new(catalog: IncidentCatalog) -> Self {
        Self { catalog }
    }
}

/// 1.2 - avg/100, clamped to [0.6, 1.4]. A miserable roster (avg 0)
/// sits at 1.2; a content roster (avg 80+) bottoms out at 0.6.
pub fn morale_factor(roster: &[RosterWorker]) -> f64 {
    if roster.is_empty() {
        return 1.0;
    }
    let avg: f64 = roster.iter().map(|w| f64::from(w.morale)).sum::<f64>() / roster.len() as f64;
    (1.2 - avg / 100.0).clamp(0.6, 1.4)
}

fn pick_participants<'a>(
    rng: &mut GameRng,
    roster: &'a [RosterWorker],
    definition: &IncidentDefinition,
) -> Vec<&'a RosterWorker> {
    let wanted = rng.next_i64_in(
        i64::from(definition.participants_min),
        i64::from(definition.participants_max),
    ) as usize;
    let wanted = wanted.min(roster.len());
    let mut indices: Vec<usize> = (0..roster.len()).collect();
    // Partial Fisher-Yates: the first `wanted` slots end up uniform.
    for slot in 0..wanted {
        let pick = slot + rng.next_u64_below((indices.len() - slot) as u64) as usize;
        indices.swap(slot, pick);
    }
    indices[..wanted].iter().map(|&i| &roster[i]).collect()
}

fn expand_template(template: &str, participants: &[&RosterWorker]) -> String {
    let first = participants.first().map_or("", |w| w.name.as_str());
    let all = participants
        .iter()
        .map(|w| w.name.as_str())
        .collect::<Vec<_>>()
        .join(" et ");
    template.replace("{workers}", &all).replace("{worker}", first)
}

impl WeeklyStage for IncidentStage {
    fn name(&self) -> &'static str {
        "backstage"
    }

    fn run(
        &mut self,
        ctx: &StageContext,
        store: &SimStore,
        rng: &mut GameRng,
    ) -> SimResult<Vec<InboxItem>> {
        let week = ctx.week;
        let roster = store.company_roster(&ctx.company.company_id)?;
        if roster.is_empty() {
            return Ok(Vec::new());
        }
        let factor = morale_factor(&roster);
        let mut items = Vec::new();
        let mut sequence = 0u32;

        for definition in &self.catalog.incidents {
            if !rng.chance(definition.chance * factor) {
                continue;
            }
            let participants = pick_participants(rng, &roster, definition);
            if participants.is_empty() {
                continue;
            }
            let severity = rng.next_i64_in(
                i64::from(definition.severity_min),
                i64::from(definition.severity_max),
            ) as i32;
            let morale_delta = rng.next_i64_in(
                i64::from(definition.morale_impact_min),
                i64::from(definition.morale_impact_max),
            ) as i32;

            for worker in &participants {
                store.apply_morale_delta(&worker.worker_id, morale_delta)?;
            }

            sequence += 1;
            let incident = BackstageIncident {
                incident_id: format!("INC-{week}-{sequence}"),
                company_id: ctx.company.company_id.clone(),
                week,
                type_id: definition.type_id.clone(),
                title: definition.title.clone(),
                description: expand_template(&definition.description_template, &participants),
                severity,
                participants: participants.iter().map(|w| w.worker_id.clone()).collect(),
            };
            store.insert_backstage_incident(&incident)?;
            log::debug!(
                "incident {} ({}) severity {severity}, morale {morale_delta:+}",
                incident.incident_id,
                incident.type_id
            );

            items.push(InboxItem::new(
                InboxKind::Incident,
                incident.title.clone(),
                incident.description.clone(),
                week,
            ));
        }
        Ok(items)
    }
}
