//! Expense aggregation for summaries and charts.
//!
//! Amounts are summed with exact decimal arithmetic. Groups are keyed by a
//! string label and kept in a `BTreeMap`, so they come out sorted by label.
//! Day and month labels are zero-padded, which makes label order the same as
//! chronological order.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::report::{GroupBy, query::ReportExpense};

/// The label of the group `expense` belongs to.
pub(super) fn group_label(expense: &ReportExpense, group_by: GroupBy) -> String {
    let date = expense.spent_at.date();

    match group_by {
        GroupBy::Day => format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        ),
        GroupBy::Month => format!("{:04}-{:02}", date.year(), u8::from(date.month())),
        GroupBy::Category => expense.category.clone(),
    }
}

/// Sums expense amounts per group.
///
/// # Returns
/// BTreeMap mapping each group label to the sum of the amounts in that group,
/// iterated in ascending label order.
pub(super) fn aggregate_by_group(
    expenses: &[ReportExpense],
    group_by: GroupBy,
) -> BTreeMap<String, Decimal> {
    let mut totals = BTreeMap::new();

    for expense in expenses {
        *totals
            .entry(group_label(expense, group_by))
            .or_insert(Decimal::ZERO) += expense.amount.as_decimal();
    }

    totals
}

/// Sums the amounts of all `expenses`, regardless of group.
pub(super) fn grand_total(expenses: &[ReportExpense]) -> Decimal {
    expenses
        .iter()
        .map(|expense| expense.amount.as_decimal())
        .sum()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use time::{OffsetDateTime, macros::datetime};

    use crate::report::{
        GroupBy,
        aggregation::{aggregate_by_group, grand_total, group_label},
        query::ReportExpense,
    };

    fn create_test_expense(
        amount: &str,
        spent_at: OffsetDateTime,
        category: &str,
    ) -> ReportExpense {
        ReportExpense {
            amount: amount.parse().unwrap(),
            spent_at,
            category: category.to_owned(),
        }
    }

    #[test]
    fn labels_zero_pad_days_and_months() {
        let expense = create_test_expense("1.00", datetime!(2025-03-05 23:59 UTC), "Food");

        assert_eq!(group_label(&expense, GroupBy::Day), "2025-03-05");
        assert_eq!(group_label(&expense, GroupBy::Month), "2025-03");
        assert_eq!(group_label(&expense, GroupBy::Category), "Food");
    }

    #[test]
    fn aggregate_by_day_sums_expenses() {
        let expenses = vec![
            create_test_expense("10.00", datetime!(2025-10-15 09:00 UTC), "Food"),
            create_test_expense("5.25", datetime!(2025-10-15 18:00 UTC), "Transport"),
            create_test_expense("20.00", datetime!(2025-10-16 11:00 UTC), "Transport"),
        ];

        let result = aggregate_by_group(&expenses, GroupBy::Day);

        assert_eq!(result.len(), 2);
        assert_eq!(result["2025-10-15"], Decimal::new(1525, 2));
        assert_eq!(result["2025-10-16"], Decimal::new(2000, 2));
    }

    #[test]
    fn aggregate_by_month_sorts_chronologically() {
        let expenses = vec![
            create_test_expense("1.00", datetime!(2025-11-01 00:00 UTC), "Food"),
            create_test_expense("1.00", datetime!(2024-12-31 23:59 UTC), "Food"),
            create_test_expense("1.00", datetime!(2025-02-14 12:00 UTC), "Food"),
        ];

        let labels: Vec<String> = aggregate_by_group(&expenses, GroupBy::Month)
            .into_keys()
            .collect();

        assert_eq!(labels, vec!["2024-12", "2025-02", "2025-11"]);
    }

    #[test]
    fn aggregate_by_category_keeps_category_verbatim() {
        let expenses = vec![
            create_test_expense("1.00", datetime!(2025-10-15 09:00 UTC), "food"),
            create_test_expense("2.00", datetime!(2025-10-15 09:00 UTC), "Food"),
            create_test_expense("3.00", datetime!(2025-10-15 09:00 UTC), "Food"),
        ];

        let result = aggregate_by_group(&expenses, GroupBy::Category);

        assert_eq!(result.len(), 2);
        assert_eq!(result["food"], Decimal::new(100, 2));
        assert_eq!(result["Food"], Decimal::new(500, 2));
    }

    #[test]
    fn sums_are_exact() {
        // 0.1 + 0.2 is not 0.3 with binary floating point.
        let expenses = vec![
            create_test_expense("0.10", datetime!(2025-10-15 09:00 UTC), "Food"),
            create_test_expense("0.20", datetime!(2025-10-15 10:00 UTC), "Food"),
        ];

        assert_eq!(grand_total(&expenses), Decimal::new(30, 2));
        assert_eq!(
            aggregate_by_group(&expenses, GroupBy::Category)["Food"],
            Decimal::new(30, 2)
        );
    }

    #[test]
    fn grand_total_matches_sum_of_groups() {
        let expenses = vec![
            create_test_expense("10.00", datetime!(2025-10-15 10:00 UTC), "Food"),
            create_test_expense("20.00", datetime!(2025-10-16 11:00 UTC), "Transport"),
            create_test_expense("0.99", datetime!(2025-11-02 08:00 UTC), "Food"),
        ];

        for group_by in [GroupBy::Day, GroupBy::Month, GroupBy::Category] {
            let sum_of_groups: Decimal = aggregate_by_group(&expenses, group_by).values().sum();

            assert_eq!(sum_of_groups, grand_total(&expenses), "group by {group_by}");
        }
    }

    #[test]
    fn handles_empty_input() {
        assert!(aggregate_by_group(&[], GroupBy::Day).is_empty());
        assert_eq!(grand_total(&[]), Decimal::ZERO);
    }
}
