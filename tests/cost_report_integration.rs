//! Integration tests for the cost report pipeline: month enumeration,
//! fail-soft batch reads, flattening and ranking.

use std::collections::HashMap;

use canteiro::config::Labels;
use canteiro::costs::{
    aggregate_costs, build_cost_report, load_hours, Assignments, CostEntry, EntryKind,
    InvoiceData, MoneyValue, MonthRange, Operation, RdDocument, RdSource, RdUser, Refund, Scope,
    SubOperation, SubOperationRef, YearMonth,
};
use canteiro::errors::{Error, Result};
use indoc::indoc;
use pretty_assertions::assert_eq;

fn ym(s: &str) -> YearMonth {
    s.parse().unwrap()
}

fn range(a: &str, b: &str) -> MonthRange {
    MonthRange::new(ym(a), ym(b)).unwrap()
}

#[derive(Default)]
struct StubSource {
    users: Vec<RdUser>,
    rds: HashMap<(String, YearMonth), RdDocument>,
    assignments: HashMap<String, Assignments>,
    broken: Vec<(String, YearMonth)>,
    operations: Vec<Operation>,
}

impl StubSource {
    fn user(mut self, id: &str, name: &str) -> Self {
        self.users.push(RdUser {
            id: id.into(),
            full_name: Some(name.into()),
            ..Default::default()
        });
        self
    }

    fn rd(mut self, user: &str, month: &str, rd: RdDocument) -> Self {
        self.rds.insert((user.into(), ym(month)), rd);
        self
    }
}

impl RdSource for StubSource {
    fn users(&self) -> Result<Vec<RdUser>> {
        Ok(self.users.clone())
    }

    fn rd(&self, user_id: &str, month: YearMonth) -> Result<Option<RdDocument>> {
        let key = (user_id.to_string(), month);
        if self.broken.contains(&key) {
            return Err(Error::fetch(user_id, month, "timeout"));
        }
        Ok(self.rds.get(&key).cloned())
    }

    fn assignments(&self, user_id: &str) -> Result<Assignments> {
        Ok(self.assignments.get(user_id).cloned().unwrap_or_default())
    }

    fn operations(&self) -> Result<Vec<Operation>> {
        Ok(self.operations.clone())
    }
}

fn invoice(op: &str, value: &str) -> RdDocument {
    RdDocument {
        operation: Some(op.into()),
        invoice_data: Some(InvoiceData {
            value: Some(value.into()),
        }),
        ..Default::default()
    }
}

#[test]
fn test_two_months_sum_into_one_category() {
    let entries = vec![
        CostEntry::new(ym("2024-01"), "A", "x", "R$ 100,00", EntryKind::Invoice),
        CostEntry::new(ym("2024-02"), "A", "x", "R$ 50,00", EntryKind::Invoice),
    ];
    let report = aggregate_costs(&entries, &range("2024-01", "2024-02"), &Labels::default());

    assert_eq!(report.category("A").map(|c| c.total), Some(150.0));
    assert_eq!(report.total(), 150.0);
    assert_eq!(
        report.monthly_totals.values().copied().collect::<Vec<_>>(),
        vec![100.0, 50.0]
    );
}

#[test]
fn test_failed_reads_do_not_abort_the_report() {
    let mut source = StubSource::default()
        .user("u1", "Ana Reis")
        .user("u2", "Bruno Dias")
        .rd("u1", "2024-01", invoice("MELI", "R$ 1.000,00"))
        .rd("u2", "2024-01", invoice("MELI", "R$ 500,00"))
        .rd("u2", "2024-02", invoice("AMAZON", "R$ 250,00"));
    source.broken.push(("u2".into(), ym("2024-01")));

    let run = build_cost_report(&source, &range("2024-01", "2024-03"), &Labels::default())
        .unwrap();

    assert_eq!(run.failures.len(), 1);
    assert!(matches!(run.failures[0], Error::Fetch { .. }));
    assert_eq!(run.report.total(), 1250.0);
    assert_eq!(run.report.months_covered.len(), 3);
    assert_eq!(run.report.monthly_totals.get(&ym("2024-03")), Some(&0.0));
}

#[test]
fn test_refund_fallback_chain_and_drill_down() {
    let rd: RdDocument = serde_json::from_str(indoc! {r#"
        {
          "operation": "MELI",
          "subOperation": { "obra": "CD Extrema" },
          "invoiceData": { "value": "R$ 300,00" },
          "refunds": [
            { "value": 40, "expenseType": "Combustível" },
            { "value": "60,00", "operation": "AMAZON", "subOperation": { "obra": "GRU5" } },
            { "value": "R$ 10,00" },
            { "value": "abc" }
          ]
        }
    "#})
    .unwrap();
    let source = StubSource::default()
        .user("u1", "Ana Reis")
        .rd("u1", "2024-05", rd);

    let report = build_cost_report(&source, &range("2024-05", "2024-05"), &Labels::default())
        .unwrap()
        .report;

    let meli = report.category("MELI").unwrap();
    assert_eq!(meli.total, 350.0);
    assert_eq!(meli.subcategories.get("CD Extrema"), Some(&300.0));
    assert_eq!(meli.subcategories.get("Combustível"), Some(&40.0));
    assert_eq!(meli.subcategories.get("Reembolso"), Some(&10.0));
    assert_eq!(report.category("AMAZON").map(|c| c.total), Some(60.0));
    assert_eq!(report.skipped, 1);

    let drilled = report.ranking(&Scope::Category("MELI".into()));
    let names: Vec<&str> = drilled.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["CD Extrema", "Combustível", "Reembolso"]);
    let share = drilled[0].percentage.unwrap();
    assert!((share - 300.0 / 350.0 * 100.0).abs() < 1e-9);
}

#[test]
fn test_rejected_invoice_and_assignment_fallback() {
    let mut rejected = invoice("MELI", "R$ 900,00");
    rejected.invoice_rejected = true;
    rejected.refunds.push(Refund {
        value: Some(MoneyValue::Number(25.0)),
        ..Default::default()
    });

    let mut source = StubSource::default()
        .user("u1", "Ana Reis")
        .rd("u1", "2024-01", rejected)
        .rd("u1", "2024-02", invoice("", "R$ 80,00"))
        .rd("u1", "2024-03", invoice("", "R$ 5,00"));
    source
        .assignments
        .insert("u1".into(), [("2024-1".to_string(), "VIA".to_string())].into());

    let report = build_cost_report(&source, &range("2024-01", "2024-03"), &Labels::default())
        .unwrap()
        .report;

    assert_eq!(report.category("MELI").map(|c| c.total), Some(25.0));
    assert_eq!(report.category("VIA").map(|c| c.total), Some(80.0));
    assert_eq!(report.category("OUTROS").map(|c| c.total), Some(5.0));
    assert_eq!(
        report
            .category("VIA")
            .and_then(|c| c.subcategories.get("Mão de Obra")),
        Some(&80.0)
    );
}

#[test]
fn test_top_n_and_unknown_drill_down() {
    let jan = ym("2024-01");
    let entries: Vec<CostEntry> = (1..=7)
        .map(|i| {
            CostEntry::new(
                jan,
                format!("OP{i}"),
                "x",
                MoneyValue::Number(f64::from(i) * 10.0),
                EntryKind::Invoice,
            )
        })
        .collect();
    let report = aggregate_costs(&entries, &range("2024-01", "2024-01"), &Labels::default());

    let top = report.top_n(&Scope::Overview, 5);
    let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["OP7", "OP6", "OP5", "OP4", "OP3"]);

    let unknown = report.top_n(&Scope::Category("NOPE".into()), 5);
    assert_eq!(unknown, top);
}

#[test]
fn test_hours_from_source() {
    let mut source = StubSource::default().user("u1", "Ana Reis").rd(
        "u1",
        "2024-04",
        RdDocument {
            sub_operation: Some(SubOperationRef {
                obra: Some("CD Cajamar".into()),
            }),
            total_minutes: Some(MoneyValue::Text("95".into())),
            ..Default::default()
        },
    );
    source.operations.push(Operation {
        name: "MELI".into(),
        sub_operations: vec![SubOperation {
            cte: 7,
            contabil: "7001".into(),
            obra: "CD Cajamar".into(),
        }],
    });

    let matrix = load_hours(&source, &MonthRange::year(2024)).unwrap();
    assert_eq!(matrix.minutes("u1", "CD Cajamar"), 95);
    assert_eq!(matrix.user_total("u1"), 95);
}
