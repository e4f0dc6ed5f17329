//! Company state and weekly finance queries.

use super::SimStore;
use crate::{
    error::{SimError, SimResult},
    types::Week,
    world_sim_stage::CompanyState,
};
use rusqlite::params;

impl SimStore {
    pub fn insert_company(&self, company: &CompanyState) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO companies (company_id, name, region, prestige, treasury,
                                    average_audience, reach)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                company.company_id,
                company.name,
                company.region,
                company.prestige,
                company.treasury,
                company.average_audience,
                company.reach,
            ],
        )?;
        Ok(())
    }

    /// All companies, in stable id order. World-sim planning depends on
    /// this ordering for deterministic tie-breaks.
    pub fn companies(&self) -> SimResult<Vec<CompanyState>> {
        let mut stmt = self.conn.prepare(
            "SELECT company_id, name, region, prestige, treasury, average_audience, reach
             FROM companies ORDER BY company_id ASC",
        )?;
        let rows = stmt.query_map([], company_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn company(&self, company_id: &str) -> SimResult<CompanyState> {
        self.conn
            .query_row(
                "SELECT company_id, name, region, prestige, treasury, average_audience, reach
                 FROM companies WHERE company_id = ?1",
                params![company_id],
                company_row_mapper,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => SimError::CompanyNotFound {
                    company_id: company_id.to_string(),
                },
                other => other.into(),
            })
    }

    /// Apply a world-sim impact. Prestige clamping to [0, 100] is
    /// enforced here, in the single UPDATE; treasury is unclamped.
    pub fn apply_company_impact(
        &self,
        company_id: &str,
        prestige_delta: i64,
        treasury_delta: f64,
    ) -> SimResult<()> {
        self.conn.execute(
            "UPDATE companies
             SET prestige = MAX(0, MIN(100, prestige + ?1)),
                 treasury = treasury + ?2
             WHERE company_id = ?3",
            params![prestige_delta, treasury_delta, company_id],
        )?;
        Ok(())
    }

    pub fn adjust_treasury(&self, company_id: &str, delta: f64) -> SimResult<()> {
        self.conn.execute(
            "UPDATE companies SET treasury = treasury + ?1 WHERE company_id = ?2",
            params![delta, company_id],
        )?;
        Ok(())
    }

    pub fn record_finance_transaction(
        &self,
        company_id: &str,
        week: Week,
        category: &str,
        amount: f64,
        label: &str,
    ) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO finance_transactions (company_id, week, category, amount, label)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![company_id, week as i64, category, amount, label],
        )?;
        Ok(())
    }

    pub fn treasury(&self, company_id: &str) -> SimResult<f64> {
        self.conn
            .query_row(
                "SELECT treasury FROM companies WHERE company_id = ?1",
                params![company_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    pub fn prestige(&self, company_id: &str) -> SimResult<i64> {
        self.conn
            .query_row(
                "SELECT prestige FROM companies WHERE company_id = ?1",
                params![company_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }

    pub fn finance_transaction_count(&self, company_id: &str, week: Week) -> SimResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM finance_transactions
                 WHERE company_id = ?1 AND week = ?2",
                params![company_id, week as i64],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}

fn company_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<CompanyState> {
    Ok(CompanyState {
        company_id: row.get(0)?,
        name: row.get(1)?,
        region: row.get(2)?,
        prestige: row.get(3)?,
        treasury: row.get(4)?,
        average_audience: row.get(5)?,
        reach: row.get(6)?,
    })
}
