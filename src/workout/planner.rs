//! Training Planner
//!
//! Places the workouts of a training plan on the calendar. Workouts follow
//! the `W##S## Title` naming scheme, where `W##` counts weeks back from the
//! race week and `S##` numbers the sessions within a week.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

use super::model::Workout;
use super::plan::PlanError;

static WORKOUT_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^W(\d{2})S(\d{2})\s+(.+)$").expect("workout name pattern is valid"));

/// Training days used when none are configured: Tuesday, Thursday, Saturday.
pub const DEFAULT_TRAINING_DAYS: [u8; 3] = [1, 3, 5];

/// Week, session and title parsed from a `W##S## Title` name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutName {
    pub week: u32,
    pub session: u32,
    pub title: String,
}

impl WorkoutName {
    pub fn new(week: u32, session: u32, title: impl Into<String>) -> Self {
        Self {
            week,
            session,
            title: title.into(),
        }
    }

    /// Parses a name; `None` when it does not follow the scheme.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneplanner::workout::WorkoutName;
    ///
    /// let name = WorkoutName::parse("W03S02 Long run").unwrap();
    /// assert_eq!((name.week, name.session, name.title.as_str()), (3, 2, "Long run"));
    /// assert!(WorkoutName::parse("Long run").is_none());
    /// ```
    pub fn parse(name: &str) -> Option<Self> {
        let captures = WORKOUT_NAME_RE.captures(name.trim())?;
        Some(Self {
            week: captures[1].parse().ok()?,
            session: captures[2].parse().ok()?,
            title: captures[3].to_string(),
        })
    }

    pub fn format(&self) -> String {
        format!("W{:02}S{:02} {}", self.week, self.session, self.title)
    }
}

impl fmt::Display for WorkoutName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Week numbers used by the workouts, ascending.
pub fn weeks(workouts: &[Workout]) -> Vec<u32> {
    workouts
        .iter()
        .filter_map(|workout| WorkoutName::parse(&workout.name))
        .map(|name| name.week)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Highest session number of each week.
pub fn sessions_per_week(workouts: &[Workout]) -> BTreeMap<u32, u32> {
    let mut sessions = BTreeMap::new();
    for name in workouts.iter().filter_map(|workout| WorkoutName::parse(&workout.name)) {
        let highest = sessions.entry(name.week).or_insert(0);
        *highest = (*highest).max(name.session);
    }
    sessions
}

/// Assigns calendar dates to plan workouts relative to a race day.
#[derive(Debug, Clone)]
pub struct TrainingPlanner {
    race_day: NaiveDate,
    preferred_days: Vec<Weekday>,
}

impl TrainingPlanner {
    /// Creates a planner using the default training days.
    pub fn new(race_day: NaiveDate) -> Self {
        Self {
            race_day,
            preferred_days: DEFAULT_TRAINING_DAYS
                .iter()
                .filter_map(|day| Weekday::try_from(*day).ok())
                .collect(),
        }
    }

    /// Sets the training days, 0 = Monday .. 6 = Sunday.
    pub fn with_preferred_days(mut self, days: &[u8]) -> Result<Self, PlanError> {
        let mut sorted = days.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let weekdays = sorted
            .into_iter()
            .map(|day| Weekday::try_from(day).map_err(|_| PlanError::InvalidDay(day)))
            .collect::<Result<Vec<_>, _>>()?;

        if weekdays.is_empty() {
            return Err(PlanError::NoTrainingDays);
        }
        self.preferred_days = weekdays;
        Ok(self)
    }

    pub fn race_day(&self) -> NaiveDate {
        self.race_day
    }

    pub fn preferred_days(&self) -> &[Weekday] {
        &self.preferred_days
    }

    /// Monday of the given week, counting back from the race week.
    pub fn week_start(&self, week: u32) -> NaiveDate {
        let offset = i64::from(self.race_day.weekday().num_days_from_monday()) + 7 * i64::from(week);
        self.race_day - Duration::days(offset)
    }

    /// Dates the workouts of one week.
    ///
    /// Workouts are taken in name order. The i-th one goes to the i-th
    /// training day (wrapping around), moving forward a day at a time while
    /// that date is already taken.
    ///
    /// Returns the number of workouts scheduled.
    pub fn schedule_week(&self, workouts: &mut [Workout], week: u32) -> Result<usize, PlanError> {
        let mut indices: Vec<usize> = workouts
            .iter()
            .enumerate()
            .filter(|(_, workout)| WorkoutName::parse(&workout.name).map_or(false, |name| name.week == week))
            .map(|(index, _)| index)
            .collect();

        if indices.is_empty() {
            return Err(PlanError::EmptyWeek(week));
        }
        indices.sort_by(|a, b| workouts[*a].name.cmp(&workouts[*b].name));

        let week_start = self.week_start(week);
        let mut used = HashSet::new();

        for (position, index) in indices.iter().enumerate() {
            let weekday = self.preferred_days[position % self.preferred_days.len()];
            let days_to_add = (7 + weekday.num_days_from_monday() - week_start.weekday().num_days_from_monday()) % 7;
            let mut date = week_start + Duration::days(i64::from(days_to_add));

            while used.contains(&date) {
                date += Duration::days(1);
            }
            used.insert(date);

            let workout = &mut workouts[*index];
            debug!("Scheduled '{}' on {} ({})", workout.name, date, date.weekday());
            workout.scheduled_date = Some(date);
        }

        info!("Scheduled {} workouts for week {} starting {}", indices.len(), week, week_start);
        Ok(indices.len())
    }

    /// Dates every workout that follows the naming scheme.
    pub fn schedule_all(&self, workouts: &mut [Workout]) -> Result<usize, PlanError> {
        let plan_weeks = weeks(workouts);
        if plan_weeks.is_empty() {
            return Err(PlanError::NoWeeks);
        }

        let mut scheduled = 0;
        for week in plan_weeks {
            scheduled += self.schedule_week(workouts, week)?;
        }
        Ok(scheduled)
    }

    /// Removes every scheduled date.
    pub fn clear(workouts: &mut [Workout]) {
        for workout in workouts {
            workout.scheduled_date = None;
        }
    }
}
