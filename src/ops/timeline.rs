use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::model::board::Board;
use crate::model::config::TimelineConfig;

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// A contiguous run of visible calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineWindow {
    pub start: NaiveDate,
    pub days: u32,
    pub step_days: u32,
}

impl TimelineWindow {
    /// Window starting on the Sunday on or before `today`. At the very start
    /// of the calendar the window starts on `today` itself.
    pub fn around(today: NaiveDate, config: &TimelineConfig) -> Self {
        let back = u64::from(today.weekday().num_days_from_sunday());
        TimelineWindow {
            start: today.checked_sub_days(Days::new(back)).unwrap_or(today),
            days: config.days.max(1),
            step_days: config.step_days,
        }
    }

    /// Move by `steps` navigation steps (negative = earlier). `None` when the
    /// moved window would leave the calendar.
    pub fn shift(&self, steps: i64) -> Option<Self> {
        let delta = i64::from(self.step_days).checked_mul(steps)?;
        let start = if delta >= 0 {
            self.start.checked_add_days(Days::new(delta.unsigned_abs()))?
        } else {
            self.start.checked_sub_days(Days::new(delta.unsigned_abs()))?
        };
        start.checked_add_days(Days::new(u64::from(self.days.max(1)) - 1))?;
        Some(TimelineWindow { start, ..*self })
    }

    pub fn next(&self) -> Option<Self> {
        self.shift(1)
    }

    pub fn previous(&self) -> Option<Self> {
        self.shift(-1)
    }

    /// Jump back to the window containing `today`, keeping width and step.
    pub fn reset(&self, today: NaiveDate) -> Self {
        let config = TimelineConfig {
            days: self.days,
            step_days: self.step_days,
        };
        Self::around(today, &config)
    }

    /// Last visible day, clamped to the end of the calendar
    pub fn end(&self) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(u64::from(self.days.max(1)) - 1))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Every visible day, in order
    pub fn dates(&self) -> Vec<NaiveDate> {
        (0..self.days)
            .map_while(|d| self.start.checked_add_days(Days::new(u64::from(d))))
            .collect()
    }

    /// Window indices covered by `[from, to]`, or `None` if the range misses
    /// the window entirely or is empty.
    pub fn span(&self, from: NaiveDate, to: NaiveDate) -> Option<(usize, usize)> {
        if from > to || to < self.start || from > self.end() {
            return None;
        }
        let first = from.max(self.start);
        let last = to.min(self.end());
        let start = (first - self.start).num_days() as usize;
        let end = (last - self.start).num_days() as usize;
        Some((start, end))
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// A task placed on the timeline grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineItem {
    pub task_id: String,
    pub column_id: String,
    pub title: String,
    pub start_column: usize,
    pub end_column: usize,
    pub row: usize,
}

/// First-fit row assignment. Each span goes into the first row where it
/// overlaps nothing already placed; otherwise a new row is opened.
pub fn pack_rows(spans: &[(usize, usize)]) -> Vec<usize> {
    let mut rows: Vec<Vec<(usize, usize)>> = Vec::new();
    let mut assigned = Vec::with_capacity(spans.len());

    for &(start, end) in spans {
        let overlaps =
            |&(s, e): &(usize, usize)| !(start > e || end < s);
        let row = match rows.iter().position(|row| !row.iter().any(overlaps)) {
            Some(r) => r,
            None => {
                rows.push(Vec::new());
                rows.len() - 1
            }
        };
        rows[row].push((start, end));
        assigned.push(row);
    }
    assigned
}

/// Place a board's dated tasks on the window. Tasks are taken in column order,
/// then position within the column. Tasks without a due date, or whose
/// creation-to-due range misses the window, are left out.
pub fn project(board: &Board, window: &TimelineWindow) -> Vec<TimelineItem> {
    let mut items = Vec::new();
    let mut spans = Vec::new();

    for column in &board.columns {
        for task in &column.tasks {
            let Some(due) = task.due_date else {
                continue;
            };
            let Some((start, end)) = window.span(task.creation_date.date_naive(), due) else {
                continue;
            };
            spans.push((start, end));
            items.push(TimelineItem {
                task_id: task.id.clone(),
                column_id: column.id.clone(),
                title: task.title.clone(),
                start_column: start,
                end_column: end,
                row: 0,
            });
        }
    }

    for (item, row) in items.iter_mut().zip(pack_rows(&spans)) {
        item.row = row;
    }
    items
}

/// Number of rows used by a projection
pub fn row_count(items: &[TimelineItem]) -> usize {
    items.iter().map(|i| i.row + 1).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::Store;
    use crate::model::task::TaskDraft;
    use crate::ops::{board_ops, task_ops};
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_starts_on_sunday() {
        let config = TimelineConfig::default();
        // 2026-10-18 is a Sunday
        let w = TimelineWindow::around(date(2026, 10, 18), &config);
        assert_eq!(w.start, date(2026, 10, 18));
        let w = TimelineWindow::around(date(2026, 10, 21), &config);
        assert_eq!(w.start, date(2026, 10, 18));
        assert_eq!(w.days, 21);
        assert_eq!(w.end(), date(2026, 11, 7));
        assert_eq!(w.dates().len(), 21);
    }

    #[test]
    fn navigation_steps_two_weeks() {
        let config = TimelineConfig::default();
        let w = TimelineWindow::around(date(2026, 10, 21), &config);
        assert_eq!(w.next().unwrap().start, date(2026, 11, 1));
        assert_eq!(w.previous().unwrap().start, date(2026, 10, 4));
        assert_eq!(w.shift(2).unwrap().reset(date(2026, 10, 21)), w);
        assert_eq!(w.shift(-3).unwrap().start, date(2026, 9, 6));
        assert_eq!(w.shift(0), Some(w));
    }

    #[test]
    fn window_at_calendar_edges_does_not_overflow() {
        let config = TimelineConfig::default();
        let w = TimelineWindow::around(NaiveDate::MAX, &config);
        assert_eq!(w.end(), NaiveDate::MAX);
        assert!(w.dates().len() <= 21);
        assert_eq!(w.next(), None);
        assert_eq!(w.span(NaiveDate::MAX, NaiveDate::MAX).map(|(_, e)| e), Some(w.dates().len() - 1));

        let w = TimelineWindow::around(NaiveDate::MIN, &config);
        assert_eq!(w.start, NaiveDate::MIN);
        assert_eq!(w.previous(), None);
        assert_eq!(w.end(), NaiveDate::MIN + chrono::Duration::days(20));
    }

    #[test]
    fn huge_shifts_are_rejected() {
        let w = TimelineWindow::around(date(2026, 10, 21), &TimelineConfig::default());
        assert_eq!(w.shift(10_000_000), None);
        assert_eq!(w.shift(-10_000_000), None);
        assert_eq!(w.shift(i64::MAX), None);
        assert_eq!(w.shift(i64::MIN), None);
    }

    #[test]
    fn span_clips_to_window() {
        let w = TimelineWindow::around(date(2026, 10, 18), &TimelineConfig::default());
        assert_eq!(w.span(date(2026, 10, 1), date(2026, 10, 20)), Some((0, 2)));
        assert_eq!(w.span(date(2026, 11, 5), date(2026, 12, 1)), Some((18, 20)));
        assert_eq!(w.span(date(2026, 10, 19), date(2026, 10, 19)), Some((1, 1)));
        assert_eq!(w.span(date(2026, 9, 1), date(2026, 10, 17)), None);
        assert_eq!(w.span(date(2026, 11, 8), date(2026, 11, 9)), None);
        // due before creation
        assert_eq!(w.span(date(2026, 10, 25), date(2026, 10, 20)), None);
    }

    #[test]
    fn overlapping_spans_stack() {
        assert_eq!(pack_rows(&[(2, 4), (3, 5)]), vec![0, 1]);
    }

    #[test]
    fn first_fit_reuses_earliest_free_row() {
        let rows = pack_rows(&[(0, 3), (2, 5), (4, 6), (0, 1), (7, 7)]);
        // (4,6) fits beside (0,3); (0,1) collides with (0,3) but not (2,5)
        assert_eq!(rows, vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn touching_endpoints_overlap() {
        assert_eq!(pack_rows(&[(0, 2), (2, 4)]), vec![0, 1]);
        assert_eq!(pack_rows(&[(0, 2), (3, 4)]), vec![0, 0]);
    }

    #[test]
    fn rows_never_hold_overlapping_spans() {
        let mut rng = StdRng::seed_from_u64(7);
        let spans: Vec<(usize, usize)> = (0..200)
            .map(|_| {
                let a = rng.random_range(0..21usize);
                let b = rng.random_range(0..21usize);
                (a.min(b), a.max(b))
            })
            .collect();
        let rows = pack_rows(&spans);
        for i in 0..spans.len() {
            for j in (i + 1)..spans.len() {
                if rows[i] == rows[j] {
                    let (a, b) = (spans[i], spans[j]);
                    assert!(a.1 < b.0 || b.1 < a.0, "{:?} and {:?} share row {}", a, b, rows[i]);
                }
            }
        }
    }

    #[test]
    fn project_board_tasks() {
        let mut store = Store::new();
        let board_id = board_ops::add_board(&mut store, "B");
        let (todo, doing) = {
            let b = store.board(&board_id).unwrap();
            (b.columns[0].id.clone(), b.columns[1].id.clone())
        };
        let created = Utc.with_ymd_and_hms(2026, 10, 20, 9, 30, 0).unwrap();
        let dated = |title: &str, due: NaiveDate| TaskDraft {
            title: title.to_string(),
            due_date: Some(due),
            creation_date: Some(created),
            ..Default::default()
        };

        task_ops::add_task(&mut store, &board_id, &todo, dated("A", date(2026, 10, 22)));
        task_ops::add_task(&mut store, &board_id, &todo, TaskDraft::new("undated"));
        task_ops::add_task(&mut store, &board_id, &doing, dated("B", date(2026, 10, 23)));
        task_ops::add_task(&mut store, &board_id, &doing, dated("C", date(2026, 10, 25)));
        task_ops::add_task(&mut store, &board_id, &doing, dated("past", date(2026, 10, 1)));

        let window = TimelineWindow::around(date(2026, 10, 21), &TimelineConfig::default());
        let items = project(store.board(&board_id).unwrap(), &window);
        let got: Vec<(&str, usize, usize, usize)> = items
            .iter()
            .map(|i| (i.title.as_str(), i.start_column, i.end_column, i.row))
            .collect();
        assert_eq!(
            got,
            vec![("A", 2, 4, 0), ("B", 2, 5, 1), ("C", 2, 7, 2)]
        );
        assert_eq!(items[1].column_id, doing);
        assert_eq!(row_count(&items), 3);
        assert_eq!(row_count(&[]), 0);
    }
}
