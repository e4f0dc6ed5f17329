//! Weekly finance stage.
//!
//! Applies the week's scheduled money movements for the player
//! company: payroll from active contracts, fixed overhead, ticket and
//! merchandising revenue scaled by audience, and the TV rights payment
//! when the show has a broadcast deal. Every movement is journaled to
//! the transaction log before the treasury balance moves.

use crate::{
    config::FinanceSettings,
    error::SimResult,
    inbox::{InboxItem, InboxKind},
    rng::GameRng,
    stage::{StageContext, WeeklyStage},
    store::SimStore,
    types::round2,
};

pub struct FinanceStage {
    settings: FinanceSettings,
}

impl FinanceStage {
    pub fn new(settings: FinanceSettings) -> Self {
        Self { settings }
    }
}

impl WeeklyStage for FinanceStage {
    fn name(&self) -> &'static str {
        "finance"
    }

    fn run(
        &mut self,
        ctx: &StageContext,
        store: &SimStore,
        _rng: &mut GameRng,
    ) -> SimResult<Vec<InboxItem>> {
        let company_id = &ctx.company.company_id;
        let week = ctx.week;

        let payroll: f64 = store
            .active_contracts(company_id)?
            .iter()
            .map(|c| c.weekly_cost)
            .sum();
        let tickets = ctx.company.average_audience as f64 * self.settings.ticket_rate;
        let merch = ctx.company.average_audience as f64 * self.settings.merch_rate;
        let tv = if ctx.show.has_tv_deal {
            self.settings.tv_weekly_revenue
        } else {
            0.0
        };

        let mut net = 0.0;
        let mut apply = |category: &str, amount: f64, label: &str| -> SimResult<()> {
            if amount == 0.0 {
                return Ok(());
            }
            let amount = round2(amount);
            store.record_finance_transaction(company_id, week, category, amount, label)?;
            store.adjust_treasury(company_id, amount)?;
            net += amount;
            Ok(())
        };

        apply("billetterie", tickets, "Recettes billetterie")?;
        apply("merchandising", merch, "Recettes merchandising")?;
        apply("tv", tv, "Droits de diffusion")?;
        apply("masse_salariale", -payroll, "Salaires hebdomadaires")?;
        apply("frais_fixes", -self.settings.weekly_overhead, "Frais de fonctionnement")?;

        log::debug!(
            "finance week {week}: net {:.2} for {company_id}",
            round2(net)
        );

        Ok(vec![InboxItem::new(
            InboxKind::Finance,
            "Bilan financier hebdomadaire",
            format!(
                "Résultat net de la semaine : {:.2} (salaires {:.2}, recettes {:.2}).",
                round2(net),
                round2(payroll),
                round2(tickets + merch + tv)
            ),
            week,
        )])
    }
}
