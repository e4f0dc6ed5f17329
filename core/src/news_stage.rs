//! Flavor news stage.
//!
//! Pure narrative filler: 1 to 3 items drawn from a static pool, no
//! state mutation beyond the inbox.

use crate::{
    error::SimResult,
    inbox::{InboxItem, InboxKind},
    rng::GameRng,
    stage::{StageContext, WeeklyStage},
    store::SimStore,
};

const HEADLINES: &[(&str, &str)] = &[
    (
        "Rumeurs de coulisses",
        "Des bruits de couloir évoquent un grand retour dans les semaines à venir.",
    ),
    (
        "La presse spécialisée s'emballe",
        "Un journaliste affirme qu'un contrat majeur serait en cours de négociation.",
    ),
    (
        "Engouement du public",
        "Les forums de fans débattent du meilleur match de la semaine passée.",
    ),
    (
        "Marché des transferts",
        "Plusieurs promotions surveilleraient de près les agents libres du moment.",
    ),
    (
        "Tournée à l'étranger",
        "Une tournée internationale serait à l'étude pour la saison prochaine.",
    ),
    (
        "Audiences en discussion",
        "Les diffuseurs renégocieraient leurs créneaux pour la fin d'année.",
    ),
];

pub struct NewsStage;

impl WeeklyStage for NewsStage {
    fn name(&self) -> &'static str {
        "news"
    }

    fn run(
        &mut self,
        ctx: &StageContext,
        _store: &SimStore,
        rng: &mut GameRng,
    ) -> SimResult<Vec<InboxItem>> {
        let count = rng.next_i64_in(1, 3) as usize;
        let mut indices: Vec<usize> = (0..HEADLINES.len()).collect();
        for slot in 0..count {
            let pick = slot + rng.next_u64_below((indices.len() - slot) as u64) as usize;
            indices.swap(slot, pick);
        }
        Ok(indices[..count]
            .iter()
            .map(|&i| {
                let (title, body) = HEADLINES[i];
                InboxItem::new(InboxKind::News, title, body, ctx.week)
            })
            .collect())
    }
}
