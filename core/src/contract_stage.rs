//! Contract and offer expiration stage.
//!
//! Emits a notice at exactly 4 weeks and exactly 1 week before a
//! contract runs out — never at any other distance, and never for
//! already-expired contracts. Pending offers past their expiry week
//! are marked expired.

use crate::{
    error::SimResult,
    inbox::{InboxItem, InboxKind},
    rng::GameRng,
    stage::{StageContext, WeeklyStage},
    store::SimStore,
    types::Week,
};

#[derive(Debug, Clone)]
pub struct ContractRow {
    pub worker_id: String,
    pub weekly_cost: f64,
    pub end_week: Week,
}

#[derive(Debug, Clone)]
pub struct OfferRow {
    pub offer_id: String,
    pub worker_id: String,
    pub company_id: String,
    pub expires_week: Week,
}

const WARNING_WEEKS: Week = 4;
const FINAL_WEEKS: Week = 1;

pub struct ContractStage;

impl WeeklyStage for ContractStage {
    fn name(&self) -> &'static str {
        "contracts"
    }

    fn run(
        &mut self,
        ctx: &StageContext,
        store: &SimStore,
        _rng: &mut GameRng,
    ) -> SimResult<Vec<InboxItem>> {
        let week = ctx.week;
        let names = store.worker_names()?;
        let mut items = Vec::new();

        for contract in store.active_contracts(&ctx.company.company_id)? {
            if contract.end_week < week {
                continue;
            }
            let remaining = contract.end_week - week;
            let title = match remaining {
                WARNING_WEEKS => "Contrat bientôt à échéance",
                FINAL_WEEKS => "Contrat arrive à expiration",
                _ => continue,
            };
            let name = names
                .get(&contract.worker_id)
                .map_or(contract.worker_id.as_str(), String::as_str);
            items.push(InboxItem::new(
                InboxKind::Contract,
                title,
                format!("{name} arrive en fin de contrat dans {remaining} semaine(s)."),
                week,
            ));
        }

        for offer in store.pending_offers()? {
            if offer.expires_week >= week {
                continue;
            }
            store.mark_offer_expired(&offer.offer_id)?;
            let name = names
                .get(&offer.worker_id)
                .map_or(offer.worker_id.as_str(), String::as_str);
            items.push(InboxItem::new(
                InboxKind::Contract,
                "Offre expirée",
                format!("L'offre faite à {name} a expiré sans réponse."),
                week,
            ));
        }
        Ok(items)
    }
}
