use super::progress::{CompletionState, TOTAL_TASK_DAYS};
use crate::core::result::{StrategyResult, WeekLabel};
use serde::Serialize;

/// One cell of the practice calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub index: usize,
    pub week: WeekLabel,
    pub theme: String,
    pub action: String,
    pub completed: bool,
}

/// Lays the weekly plan out day by day, capped at the checklist length.
pub fn practice_calendar(result: &StrategyResult, progress: &CompletionState) -> Vec<CalendarDay> {
    result
        .weekly_plan
        .iter()
        .flat_map(|week| {
            week.days
                .iter()
                .map(move |action| (week, action))
        })
        .take(TOTAL_TASK_DAYS)
        .enumerate()
        .map(|(index, (week, action))| CalendarDay {
            index,
            week: week.week.clone(),
            theme: week.theme.clone(),
            action: action.clone(),
            completed: progress.is_completed(index),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizerLimits;
    use crate::core::defaults::default_response;
    use crate::core::form::NormalizeContext;

    #[test]
    fn default_plan_lays_out_84_days() {
        let result = default_response(&NormalizeContext::new("카페", "합정동", 1000), &NormalizerLimits::default());
        let mut progress = CompletionState::new();
        progress.set(7, true).unwrap();

        let days = practice_calendar(&result, &progress);
        assert_eq!(days.len(), 84);
        assert_eq!(days[7].week, WeekLabel::Number(2));
        assert!(days[7].completed);
        assert!(!days[8].completed);
        assert_eq!(days[83].index, 83);
    }
}
