use tracing::debug;

use crate::dataset::{Dataset, StudentRecord};
use crate::error::LeaderboardError;
use crate::scoring::{score_record, ScoreResult, Weights};

/// A row together with its computed score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredStudent {
    pub record: StudentRecord,
    pub score: ScoreResult,
}

impl ScoredStudent {
    pub fn total(&self) -> f64 {
        self.score.total
    }
}

/// Points summed over every student sharing one category value.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySum {
    pub category: String,
    pub total: f64,
    pub students: usize,
}

/// Ranked and summarised view of one group.
///
/// Only built through [`aggregate`], which guarantees at least one row.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    group: String,
    ranked: Vec<ScoredStudent>,
    average: f64,
    category_sums: Vec<CategorySum>,
}

impl Leaderboard {
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Students by total points, highest first. Equal totals keep file order.
    pub fn ranked(&self) -> &[ScoredStudent] {
        &self.ranked
    }

    pub fn top(&self) -> &ScoredStudent {
        &self.ranked[0]
    }

    /// The first `limit` ranked students, or all of them
    pub fn leading(&self, limit: Option<usize>) -> &[ScoredStudent] {
        match limit {
            Some(limit) => &self.ranked[..limit.min(self.ranked.len())],
            None => &self.ranked,
        }
    }

    pub fn average(&self) -> f64 {
        self.average
    }

    /// Per-gender sums in order of first appearance in the file
    pub fn category_sums(&self) -> &[CategorySum] {
        &self.category_sums
    }

    pub fn grand_total(&self) -> f64 {
        self.ranked.iter().map(ScoredStudent::total).sum()
    }

    pub fn max_total(&self) -> f64 {
        self.top().total()
    }

    pub fn is_above_average(&self, student: &ScoredStudent) -> bool {
        student.total() > self.average
    }

    /// Share of the grand total held by one category, as a percentage.
    pub fn category_share(&self, category: &CategorySum) -> f64 {
        let grand_total = self.grand_total();
        if grand_total > 0.0 {
            category.total / grand_total * 100.0
        } else {
            0.0
        }
    }

    /// Rows whose scoring failed and were counted as 0
    pub fn warnings(&self) -> impl Iterator<Item = &ScoredStudent> {
        self.ranked.iter().filter(|s| s.score.incomplete)
    }
}

/// Score every row of a dataset, in file order.
pub fn score_dataset(dataset: &Dataset, weights: &Weights) -> Vec<ScoredStudent> {
    dataset
        .rows
        .iter()
        .map(|record| ScoredStudent {
            record: record.clone(),
            score: score_record(record, weights),
        })
        .collect()
}

/// Rank scored rows and compute the group summary.
pub fn aggregate(group: &str, scored: Vec<ScoredStudent>) -> Result<Leaderboard, LeaderboardError> {
    if scored.is_empty() {
        return Err(LeaderboardError::EmptyDataset {
            group: group.to_string(),
        });
    }

    // Categories are collected before sorting so their order follows the file.
    let mut category_sums: Vec<CategorySum> = Vec::new();
    for student in &scored {
        match category_sums
            .iter_mut()
            .find(|c| c.category == student.record.gender)
        {
            Some(entry) => {
                entry.total += student.total();
                entry.students += 1;
            }
            None => category_sums.push(CategorySum {
                category: student.record.gender.clone(),
                total: student.total(),
                students: 1,
            }),
        }
    }

    let average = scored.iter().map(ScoredStudent::total).sum::<f64>() / scored.len() as f64;

    let mut ranked = scored;
    // sort_by is stable: ties keep input order
    ranked.sort_by(|a, b| b.total().total_cmp(&a.total()));

    debug!(
        group,
        students = ranked.len(),
        categories = category_sums.len(),
        average,
        "aggregated leaderboard"
    );

    Ok(Leaderboard {
        group: group.to_string(),
        ranked,
        average,
        category_sums,
    })
}

/// Score, rank and summarise a loaded dataset.
pub fn build_leaderboard(dataset: &Dataset, weights: &Weights) -> Result<Leaderboard, LeaderboardError> {
    aggregate(&dataset.group, score_dataset(dataset, weights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Activity;

    fn dataset(rows: Vec<StudentRecord>) -> Dataset {
        Dataset {
            group: "period-1".to_string(),
            rows,
        }
    }

    fn names(board: &Leaderboard) -> Vec<&str> {
        board.ranked().iter().map(|s| s.record.student.as_str()).collect()
    }

    #[test]
    fn test_two_student_example() {
        let data = dataset(vec![
            StudentRecord::new("A", "F", 2.0, 3.0, 1.0),
            StudentRecord::new("B", "M", 0.0, 5.0, 2.0),
        ]);
        let board = build_leaderboard(&data, &Weights::default()).unwrap();

        assert_eq!(board.group(), "period-1");
        assert_eq!(names(&board), vec!["B", "A"]);
        assert_eq!(board.top().record.student, "B");
        assert_eq!(board.top().total(), 16.0);
        assert_eq!(board.average(), 13.5);
        assert_eq!(
            board.category_sums(),
            &[
                CategorySum { category: "F".to_string(), total: 11.0, students: 1 },
                CategorySum { category: "M".to_string(), total: 16.0, students: 1 },
            ]
        );
    }

    #[test]
    fn test_ties_keep_input_order() {
        let data = dataset(vec![
            StudentRecord::new("first", "F", 3.0, 0.0, 0.0),
            StudentRecord::new("high", "M", 0.0, 0.0, 5.0),
            StudentRecord::new("second", "M", 1.0, 1.0, 0.0),
            StudentRecord::new("third", "F", 0.0, 0.0, 1.0),
        ]);
        let board = build_leaderboard(&data, &Weights::default()).unwrap();
        assert_eq!(names(&board), vec!["high", "first", "second", "third"]);
    }

    #[test]
    fn test_ranked_sorted_descending_and_top_is_max() {
        let data = dataset(vec![
            StudentRecord::new("a", "F", 5.0, 1.0, 0.0),
            StudentRecord::new("b", "M", 1.0, 4.0, 2.0),
            StudentRecord::new("c", "F", 9.0, 0.0, 3.0),
            StudentRecord::new("d", "X", 0.0, 0.0, 0.0),
        ]);
        let board = build_leaderboard(&data, &Weights::default()).unwrap();

        let totals: Vec<f64> = board.ranked().iter().map(ScoredStudent::total).collect();
        assert!(totals.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(board.top(), &board.ranked()[0]);
        assert!(totals.iter().all(|t| board.max_total() >= *t));
    }

    #[test]
    fn test_totals_match_weighted_column_sums() {
        let rows = vec![
            StudentRecord::new("a", "F", 5.0, 1.0, 0.0),
            StudentRecord::new("b", "M", 1.0, 4.0, 2.0),
            StudentRecord::new("c", "F", 9.0, 0.0, 3.0),
        ];
        let column_sum = |activity: Activity| -> f64 {
            rows.iter().map(|r| r.count(activity).unwrap()).sum()
        };
        let expected = column_sum(Activity::Interaction)
            + column_sum(Activity::Quiz) * 2.0
            + column_sum(Activity::Assignment) * 3.0;

        let board = build_leaderboard(&dataset(rows.clone()), &Weights::default()).unwrap();
        assert_eq!(board.grand_total(), expected);
    }

    #[test]
    fn test_category_sums_partition_total() {
        let data = dataset(vec![
            StudentRecord::new("a", "M", 1.0, 1.0, 1.0),
            StudentRecord::new("b", "F", 2.0, 2.0, 2.0),
            StudentRecord::new("c", "M", 3.0, 0.0, 1.0),
            StudentRecord::new("d", "NB", 0.0, 1.0, 0.0),
        ]);
        let board = build_leaderboard(&data, &Weights::default()).unwrap();

        let categories: Vec<&str> = board.category_sums().iter().map(|c| c.category.as_str()).collect();
        assert_eq!(categories, vec!["M", "F", "NB"]);

        let partition: f64 = board.category_sums().iter().map(|c| c.total).sum();
        assert_eq!(partition, board.grand_total());

        let shares: f64 = board.category_sums().iter().map(|c| board.category_share(c)).sum();
        assert!((shares - 100.0).abs() < 1e-9);
        assert_eq!(board.category_sums()[0].students, 2);
    }

    #[test]
    fn test_average_and_above_average() {
        let data = dataset(vec![
            StudentRecord::new("a", "F", 10.0, 0.0, 0.0),
            StudentRecord::new("b", "M", 20.0, 0.0, 0.0),
            StudentRecord::new("c", "F", 30.0, 0.0, 0.0),
        ]);
        let board = build_leaderboard(&data, &Weights::default()).unwrap();
        assert_eq!(board.average(), 20.0);

        let above: Vec<bool> = board.ranked().iter().map(|s| board.is_above_average(s)).collect();
        assert_eq!(above, vec![true, false, false]);
    }

    #[test]
    fn test_bad_row_scores_zero_others_unaffected() {
        let mut broken = StudentRecord::new("broken", "F", 4.0, 4.0, 4.0);
        broken.interaction = None;
        let data = dataset(vec![
            StudentRecord::new("a", "F", 2.0, 3.0, 1.0),
            broken,
            StudentRecord::new("b", "M", 0.0, 5.0, 2.0),
        ]);
        let board = build_leaderboard(&data, &Weights::default()).unwrap();

        assert_eq!(names(&board), vec!["b", "a", "broken"]);
        assert_eq!(board.ranked()[0].total(), 16.0);
        assert_eq!(board.ranked()[1].total(), 11.0);
        assert_eq!(board.ranked()[2].total(), 0.0);
        assert_eq!(board.average(), 9.0);

        let warned: Vec<&str> = board.warnings().map(|s| s.record.student.as_str()).collect();
        assert_eq!(warned, vec!["broken"]);
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        let err = build_leaderboard(&dataset(vec![]), &Weights::default()).unwrap_err();
        assert!(matches!(err, LeaderboardError::EmptyDataset { ref group } if group == "period-1"));
    }

    #[test]
    fn test_all_zero_shares() {
        let data = dataset(vec![StudentRecord::new("a", "F", 0.0, 0.0, 0.0)]);
        let board = build_leaderboard(&data, &Weights::default()).unwrap();
        assert_eq!(board.category_share(&board.category_sums()[0]), 0.0);
    }

    #[test]
    fn test_leading_caps_at_group_size() {
        let data = dataset(vec![
            StudentRecord::new("A", "F", 2.0, 3.0, 1.0),
            StudentRecord::new("B", "M", 0.0, 5.0, 2.0),
        ]);
        let board = build_leaderboard(&data, &Weights::default()).unwrap();
        assert_eq!(board.leading(Some(1)).len(), 1);
        assert_eq!(board.leading(Some(1))[0].record.student, "B");
        assert_eq!(board.leading(Some(5)).len(), 2);
        assert_eq!(board.leading(None).len(), 2);
    }
}
