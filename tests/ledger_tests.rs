// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billbook::events::LedgerEvent;
use billbook::models::*;
use billbook::query::balance_drift;
use billbook::{Ledger, LedgerError, db};
use chrono::NaiveDate;
use rstest::rstest;
use rust_decimal::Decimal;

const FOOD: &str = "sys-expense-food";
const SALARY: &str = "sys-income-salary";

struct Fixture {
    ledger: Ledger,
    account: String,
}

fn setup() -> Fixture {
    let ledger = Ledger::new(db::open_in_memory().unwrap());
    let account = ledger
        .accounts()
        .add(NewAccount {
            name: "Daily".into(),
            ..Default::default()
        })
        .unwrap()
        .id;
    Fixture { ledger, account }
}

fn dec(v: i64) -> Decimal {
    Decimal::from(v)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

impl Fixture {
    fn asset(&self, name: &str, balance: i64) -> String {
        self.ledger
            .assets()
            .add(NewAsset::new(name, AssetType::Bank).with_balance(dec(balance)))
            .unwrap()
            .id
    }

    fn balance(&self, id: &str) -> Decimal {
        self.ledger.assets().get(id).unwrap().unwrap().balance
    }

    fn spec(&self, t: BillType, asset: &str, amount: i64) -> NewBill {
        NewBill {
            account_id: self.account.clone(),
            asset_id: asset.to_string(),
            to_account_id: None,
            to_asset_id: None,
            category_id: match t {
                BillType::Income => SALARY.to_string(),
                _ => FOOD.to_string(),
            },
            amount: dec(amount),
            currency: None,
            bill_type: t,
            description: None,
            date: day(1),
        }
    }

    fn transfer(&self, from: &str, to: &str, amount: i64) -> NewBill {
        NewBill {
            to_account_id: Some(self.account.clone()),
            to_asset_id: Some(to.to_string()),
            ..self.spec(BillType::Transfer, from, amount)
        }
    }
}

#[test]
fn expense_update_delete_scenario() {
    let f = setup();
    let a = f.asset("A", 1000);
    let bill = f
        .ledger
        .bills()
        .add(f.spec(BillType::Expense, &a, 200))
        .unwrap();
    assert_eq!(f.balance(&a), dec(800));

    f.ledger
        .bills()
        .update(
            &bill.id,
            BillPatch {
                amount: Some(dec(350)),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(f.balance(&a), dec(650));

    assert!(f.ledger.bills().remove(&bill.id).unwrap());
    assert_eq!(f.balance(&a), dec(1000));
}

#[test]
fn transfer_create_delete_scenario() {
    let f = setup();
    let s = f.asset("S", 1000);
    let d = f.asset("D", 0);
    let bill = f.ledger.bills().add(f.transfer(&s, &d, 400)).unwrap();
    assert_eq!(f.balance(&s), dec(600));
    assert_eq!(f.balance(&d), dec(400));
    assert_eq!(bill.to_asset_name.as_deref(), Some("D"));

    assert!(f.ledger.bills().remove(&bill.id).unwrap());
    assert_eq!(f.balance(&s), dec(1000));
    assert_eq!(f.balance(&d), dec(0));
}

#[rstest]
#[case(BillType::Expense, 100, 250, -150)]
#[case(BillType::Expense, 300, 120, 180)]
#[case(BillType::Income, 100, 250, 150)]
#[case(BillType::Income, 300, 120, -180)]
fn amount_update_moves_balance_by_difference(
    #[case] t: BillType,
    #[case] from: i64,
    #[case] to: i64,
    #[case] expected_shift: i64,
) {
    let f = setup();
    let a = f.asset("A", 500);
    let bill = f.ledger.bills().add(f.spec(t, &a, from)).unwrap();
    let before = f.balance(&a);
    f.ledger
        .bills()
        .update(
            &bill.id,
            BillPatch {
                amount: Some(dec(to)),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(f.balance(&a) - before, dec(expected_shift));
}

#[rstest]
#[case(BillType::Expense)]
#[case(BillType::Income)]
fn create_then_delete_is_identity(#[case] t: BillType) {
    let f = setup();
    let a = f.asset("A", 42);
    let bill = f.ledger.bills().add(f.spec(t, &a, 17)).unwrap();
    assert_ne!(f.balance(&a), dec(42));
    f.ledger.bills().remove(&bill.id).unwrap();
    assert_eq!(f.balance(&a), dec(42));
}

#[test]
fn updating_a_transfer_reverses_both_sides() {
    let f = setup();
    let s = f.asset("S", 1000);
    let d = f.asset("D", 0);
    let e = f.asset("E", 0);
    let bill = f.ledger.bills().add(f.transfer(&s, &d, 400)).unwrap();

    f.ledger
        .bills()
        .update(
            &bill.id,
            BillPatch {
                to_asset_id: Some(Some(e.clone())),
                amount: Some(dec(100)),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(f.balance(&s), dec(900));
    assert_eq!(f.balance(&d), dec(0));
    assert_eq!(f.balance(&e), dec(100));
}

#[test]
fn changing_transfer_to_expense_drops_destination_credit() {
    let f = setup();
    let s = f.asset("S", 1000);
    let d = f.asset("D", 0);
    let bill = f.ledger.bills().add(f.transfer(&s, &d, 400)).unwrap();

    let updated = f
        .ledger
        .bills()
        .update(
            &bill.id,
            BillPatch {
                bill_type: Some(BillType::Expense),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert!(updated.to_asset_id.is_none());
    assert_eq!(f.balance(&s), dec(600));
    assert_eq!(f.balance(&d), dec(0));
}

#[test]
fn changing_expense_to_income_flips_sign() {
    let f = setup();
    let a = f.asset("A", 100);
    let bill = f
        .ledger
        .bills()
        .add(f.spec(BillType::Expense, &a, 30))
        .unwrap();
    assert_eq!(f.balance(&a), dec(70));
    f.ledger
        .bills()
        .update(
            &bill.id,
            BillPatch {
                bill_type: Some(BillType::Income),
                category_id: Some(SALARY.into()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(f.balance(&a), dec(130));
}

#[test]
fn moving_bill_to_another_asset() {
    let f = setup();
    let a = f.asset("A", 100);
    let b = f.asset("B", 100);
    let bill = f
        .ledger
        .bills()
        .add(f.spec(BillType::Expense, &a, 30))
        .unwrap();
    let updated = f
        .ledger
        .bills()
        .update(
            &bill.id,
            BillPatch {
                asset_id: Some(b.clone()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(f.balance(&a), dec(100));
    assert_eq!(f.balance(&b), dec(70));
    assert_eq!(updated.asset_name, "B");
}

#[test]
fn description_only_update_leaves_balances() {
    let f = setup();
    let a = f.asset("A", 100);
    let bill = f
        .ledger
        .bills()
        .add(f.spec(BillType::Expense, &a, 30))
        .unwrap();
    let updated = f
        .ledger
        .bills()
        .update(
            &bill.id,
            BillPatch {
                description: Some(Some("lunch".into())),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("lunch"));
    assert_eq!(f.balance(&a), dec(70));
    assert!(updated.updated_at >= bill.updated_at);
}

#[rstest]
#[case("account")]
#[case("asset")]
#[case("category")]
fn unknown_reference_is_rejected_without_mutation(#[case] which: &str) {
    let f = setup();
    let a = f.asset("A", 100);
    let mut spec = f.spec(BillType::Expense, &a, 10);
    match which {
        "account" => spec.account_id = "nope".into(),
        "asset" => spec.asset_id = "nope".into(),
        _ => spec.category_id = "nope".into(),
    }
    let err = f.ledger.bills().add(spec).unwrap_err();
    match err {
        LedgerError::MissingDependency { kind, id } => {
            assert_eq!(kind, which);
            assert_eq!(id, "nope");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(f.balance(&a), dec(100));
    assert!(f.ledger.bills().all().unwrap().is_empty());
}

#[test]
fn unresolvable_transfer_destination_fails_whole_operation() {
    let f = setup();
    let s = f.asset("S", 1000);
    let err = f.ledger.bills().add(f.transfer(&s, "ghost", 50)).unwrap_err();
    assert!(matches!(err, LedgerError::MissingDependency { kind: "asset", .. }));
    assert_eq!(f.balance(&s), dec(1000));
    assert!(f.ledger.bills().all().unwrap().is_empty());
}

#[test]
fn transfer_without_destination_is_invalid() {
    let f = setup();
    let s = f.asset("S", 1000);
    let err = f
        .ledger
        .bills()
        .add(f.spec(BillType::Transfer, &s, 50))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn transfer_to_same_asset_is_invalid() {
    let f = setup();
    let s = f.asset("S", 1000);
    let err = f.ledger.bills().add(f.transfer(&s, &s, 50)).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(f.balance(&s), dec(1000));
}

#[rstest]
#[case(0)]
#[case(-5)]
fn non_positive_amount_is_invalid(#[case] amount: i64) {
    let f = setup();
    let a = f.asset("A", 10);
    let err = f
        .ledger
        .bills()
        .add(f.spec(BillType::Expense, &a, amount))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn category_type_must_match_bill_type() {
    let f = setup();
    let a = f.asset("A", 10);
    let spec = NewBill {
        category_id: SALARY.into(),
        ..f.spec(BillType::Expense, &a, 5)
    };
    let err = f.ledger.bills().add(spec).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn transfers_skip_category_type_check() {
    let f = setup();
    let s = f.asset("S", 10);
    let d = f.asset("D", 0);
    let spec = NewBill {
        category_id: SALARY.into(),
        ..f.transfer(&s, &d, 5)
    };
    assert!(f.ledger.bills().add(spec).is_ok());
}

#[test]
fn failed_update_changes_nothing() {
    let f = setup();
    let a = f.asset("A", 100);
    let bill = f
        .ledger
        .bills()
        .add(f.spec(BillType::Expense, &a, 30))
        .unwrap();
    let err = f
        .ledger
        .bills()
        .update(
            &bill.id,
            BillPatch {
                asset_id: Some("missing".into()),
                amount: Some(dec(90)),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(err.is_user_error());
    assert_eq!(f.balance(&a), dec(70));
    assert_eq!(f.ledger.bills().get(&bill.id).unwrap().unwrap(), bill);
}

#[test]
fn destination_on_expense_update_is_rejected() {
    let f = setup();
    let a = f.asset("A", 1000);
    let b = f.asset("B", 0);
    let bill = f
        .ledger
        .bills()
        .add(f.spec(BillType::Expense, &a, 100))
        .unwrap();
    let err = f
        .ledger
        .bills()
        .update(
            &bill.id,
            BillPatch {
                to_account_id: Some(Some(f.account.clone())),
                to_asset_id: Some(Some(b.clone())),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(f.balance(&a), dec(900));
    assert_eq!(f.balance(&b), dec(0));
    assert_eq!(f.ledger.bills().get(&bill.id).unwrap().unwrap(), bill);
}

#[test]
fn moving_bill_to_another_asset_takes_its_currency() {
    let f = setup();
    let a = f.asset("A", 100);
    let euro = f
        .ledger
        .assets()
        .add(NewAsset {
            currency: Some("EUR".into()),
            ..NewAsset::new("Euro", AssetType::Bank).with_balance(dec(100))
        })
        .unwrap()
        .id;
    let bill = f
        .ledger
        .bills()
        .add(f.spec(BillType::Expense, &a, 10))
        .unwrap();
    assert_eq!(bill.currency, "USD");

    let moved = f
        .ledger
        .bills()
        .update(
            &bill.id,
            BillPatch {
                asset_id: Some(euro.clone()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(moved.currency, "EUR");

    let pinned = f
        .ledger
        .bills()
        .update(
            &bill.id,
            BillPatch {
                asset_id: Some(a.clone()),
                currency: Some("gbp".into()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(pinned.currency, "GBP");
}

#[test]
fn unknown_ids_are_not_errors() {
    let f = setup();
    assert!(f
        .ledger
        .bills()
        .update("nope", BillPatch::default())
        .unwrap()
        .is_none());
    assert!(!f.ledger.bills().remove("nope").unwrap());
}

#[test]
fn snapshots_are_taken_at_creation() {
    let f = setup();
    let a = f.asset("Wallet", 100);
    let bill = f
        .ledger
        .bills()
        .add(f.spec(BillType::Expense, &a, 1))
        .unwrap();
    assert_eq!(bill.account_name, "Daily");
    assert_eq!(bill.asset_name, "Wallet");
    assert_eq!(bill.category_name, "Food & Dining");
    assert_eq!(bill.currency, "USD");
    assert_eq!(bill.user_id, "local");

    f.ledger
        .assets()
        .update(
            &a,
            AssetPatch {
                name: Some("Purse".into()),
                ..Default::default()
            },
        )
        .unwrap();
    let stored = f.ledger.bills().get(&bill.id).unwrap().unwrap();
    assert_eq!(stored.asset_name, "Wallet");
}

#[test]
fn bills_are_attributed_to_signed_in_user() {
    let f = setup();
    let user = f.ledger.user().register("ada", "ada@example.com").unwrap();
    let a = f.asset("A", 0);
    let bill = f
        .ledger
        .bills()
        .add(f.spec(BillType::Income, &a, 10))
        .unwrap();
    assert_eq!(bill.user_id, user.id);
}

#[test]
fn balance_invariant_holds_over_mixed_sequence() {
    let f = setup();
    let cash = f.asset("Cash", 300);
    let bank = f.asset("Bank", 2000);
    let card = f.asset("Card", 0);
    let bills = f.ledger.bills();

    let b1 = bills.add(f.spec(BillType::Income, &bank, 1500)).unwrap();
    let b2 = bills.add(f.spec(BillType::Expense, &cash, 45)).unwrap();
    let b3 = bills.add(f.transfer(&bank, &cash, 200)).unwrap();
    let b4 = bills.add(f.spec(BillType::Expense, &card, 99)).unwrap();
    bills
        .update(
            &b2.id,
            BillPatch {
                amount: Some(dec(60)),
                asset_id: Some(card.clone()),
                ..Default::default()
            },
        )
        .unwrap();
    bills
        .update(
            &b3.id,
            BillPatch {
                amount: Some(dec(250)),
                ..Default::default()
            },
        )
        .unwrap();
    bills.remove(&b1.id).unwrap();
    bills.remove(&b4.id).unwrap();

    // Remaining: b2 expense 60 on card, b3 transfer 250 bank -> cash.
    assert_eq!(f.balance(&cash), dec(550));
    assert_eq!(f.balance(&bank), dec(1750));
    assert_eq!(f.balance(&card), dec(-60));

    let assets = f.ledger.assets().list(None).unwrap();
    let all = bills.all().unwrap();
    assert!(balance_drift(&assets, &all).is_empty());
}

#[test]
fn deleting_referenced_asset_leaves_bill_and_allows_removal() {
    let f = setup();
    let s = f.asset("S", 100);
    let d = f.asset("D", 0);
    let bill = f.ledger.bills().add(f.transfer(&s, &d, 40)).unwrap();
    assert!(f.ledger.assets().remove(&d).unwrap());
    assert!(f.ledger.bills().get(&bill.id).unwrap().is_some());

    assert!(f.ledger.bills().remove(&bill.id).unwrap());
    assert_eq!(f.balance(&s), dec(100));
}

#[test]
fn mutations_publish_ledger_events() {
    let f = setup();
    let mut rx = f.ledger.subscribe();
    let a = f.asset("A", 10);
    let bill = f
        .ledger
        .bills()
        .add(f.spec(BillType::Expense, &a, 1))
        .unwrap();
    f.ledger
        .bills()
        .update(
            &bill.id,
            BillPatch {
                amount: Some(dec(2)),
                ..Default::default()
            },
        )
        .unwrap();
    f.ledger.bills().remove(&bill.id).unwrap();
    f.ledger.bills().remove(&bill.id).unwrap();

    assert_eq!(rx.try_recv().unwrap(), LedgerEvent::BillCreated(bill.id.clone()));
    assert_eq!(rx.try_recv().unwrap(), LedgerEvent::BillUpdated(bill.id.clone()));
    assert_eq!(rx.try_recv().unwrap(), LedgerEvent::BillDeleted(bill.id.clone()));
    assert!(rx.try_recv().is_err());
}

#[test]
fn rejected_create_publishes_nothing() {
    let f = setup();
    let mut rx = f.ledger.subscribe();
    let a = f.asset("A", 10);
    let _ = f.ledger.bills().add(f.spec(BillType::Expense, &a, 0));
    assert!(rx.try_recv().is_err());
}
