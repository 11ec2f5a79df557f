//! Reporting summary: pipeline and revenue figures for the summary bar,
//! and the same breakdowns as plain tables for `crm report`.

use clap::ValueEnum;

use crate::data::{Direction, Lead, Message, Order, OrderStatus, Stage};
use crate::table::{CellValue, Column, Record, RenderedTable, Table};

/// Which breakdown `crm report` prints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Breakdown {
    /// Leads and deal value per stage
    #[default]
    Pipeline,
    /// Order count and total per status
    Orders,
}

/// Leads and deal value sitting in one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSummary {
    pub stage: Stage,
    pub count: usize,
    /// Sum of deal values in cents
    pub value: i64,
}

/// One entry per stage, in pipeline order (empty stages included)
pub fn pipeline(leads: &[Lead]) -> Vec<StageSummary> {
    Stage::ALL
        .into_iter()
        .map(|stage| {
            let in_stage = leads.iter().filter(|l| l.stage == stage);
            StageSummary {
                stage,
                count: in_stage.clone().count(),
                value: in_stage.map(|l| l.value).sum(),
            }
        })
        .collect()
}

/// Deal value of leads not yet won or lost
pub fn open_pipeline_value(leads: &[Lead]) -> i64 {
    leads
        .iter()
        .filter(|l| !l.stage.is_closed())
        .map(|l| l.value)
        .sum()
}

/// Won leads over closed leads, as a percentage
pub fn win_rate(leads: &[Lead]) -> Option<f64> {
    let closed = leads.iter().filter(|l| l.stage.is_closed()).count();
    let won = leads.iter().filter(|l| l.stage == Stage::Won).count();
    (closed > 0).then(|| won as f64 * 100.0 / closed as f64)
}

/// Order count and total per status
pub fn orders_by_status(orders: &[Order]) -> Vec<(OrderStatus, usize, i64)> {
    OrderStatus::ALL
        .into_iter()
        .map(|status| {
            let matching: Vec<_> = orders.iter().filter(|o| o.status == status).collect();
            (status, matching.len(), matching.iter().map(|o| o.total).sum())
        })
        .collect()
}

/// Total of shipped and delivered orders, in cents
pub fn revenue(orders: &[Order]) -> i64 {
    orders
        .iter()
        .filter(|o| o.status.is_revenue())
        .map(|o| o.total)
        .sum()
}

pub fn unread_count(messages: &[Message]) -> usize {
    messages
        .iter()
        .filter(|m| m.direction == Direction::Incoming && !m.read)
        .count()
}

/// Breakdown as a table in pipeline or status order.
///
/// The rows are schema-less [`Record`]s, one per stage or status, with
/// empty groups included.
pub fn breakdown(kind: Breakdown, leads: &[Lead], orders: &[Order]) -> RenderedTable {
    let (rows, columns): (Vec<Record>, Vec<Column<Record>>) = match kind {
        Breakdown::Pipeline => (
            pipeline(leads)
                .into_iter()
                .map(|s| {
                    Record::new()
                        .with("stage", s.stage.label())
                        .with("count", s.count as f64)
                        .with("value", CellValue::Money(s.value))
                })
                .collect(),
            vec![
                Column::new("stage", "Stage"),
                Column::new("count", "Leads"),
                Column::new("value", "Value"),
            ],
        ),
        Breakdown::Orders => (
            orders_by_status(orders)
                .into_iter()
                .map(|(status, count, total)| {
                    Record::new()
                        .with("status", status.label())
                        .with("count", count as f64)
                        .with("total", CellValue::Money(total))
                })
                .collect(),
            vec![
                Column::new("status", "Status"),
                Column::new("count", "Orders"),
                Column::new("total", "Total"),
            ],
        ),
    };
    Table::new(columns).render(&rows)
}
