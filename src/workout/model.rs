//! Workout Data Model
//!
//! Core data structures representing a structured workout: the sport, the
//! ordered step tree, and the intensity target attached to each step.
//!
//! # Step tree
//!
//! A workout holds an ordered list of [`WorkoutStep`]s. Each step is either a
//! leaf (warmup, interval, recovery, ...) ending on a lap press, a duration or
//! a distance, or a repeat group whose body is itself an ordered list of steps
//! executed a fixed number of times:
//!
//! ```text
//! warmup: 10min @ Z1
//! repeat 4:
//!     interval: 1km @ Z4
//!     recovery: 2min @ Z1
//! cooldown: lap-button
//! ```
//!
//! Step `order` is the 1-based position among siblings, not a global index.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::zones::resolver::ZoneResolver;

/// Sport a workout is planned for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SportType {
    Running,
    Cycling,
    Swimming,
}

impl SportType {
    /// All supported sports, in configuration order.
    pub const ALL: [SportType; 3] = [SportType::Running, SportType::Cycling, SportType::Swimming];

    /// Symbolic key used in configuration and on the wire.
    pub fn key(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
            Self::Swimming => "swimming",
        }
    }
}

impl fmt::Display for SportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|sport| sport.key() == key)
            .ok_or_else(|| format!("Unknown sport type: '{}'", s))
    }
}

/// Kind of workout step.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Warmup,
    Cooldown,
    Interval,
    Recovery,
    Rest,
    Repeat,
    Other,
}

impl StepType {
    /// All step types, repeat included.
    pub const ALL: [StepType; 7] = [
        StepType::Warmup,
        StepType::Cooldown,
        StepType::Interval,
        StepType::Recovery,
        StepType::Rest,
        StepType::Repeat,
        StepType::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Warmup => "warmup",
            Self::Cooldown => "cooldown",
            Self::Interval => "interval",
            Self::Recovery => "recovery",
            Self::Rest => "rest",
            Self::Repeat => "repeat",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StepType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|step_type| step_type.key() == key)
            .ok_or_else(|| format!("Unknown step type: '{}'", s))
    }
}

/// Rule that terminates a step, without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndConditionKind {
    LapButton,
    Time,
    Distance,
    Iterations,
}

impl EndConditionKind {
    pub const ALL: [EndConditionKind; 4] = [
        EndConditionKind::LapButton,
        EndConditionKind::Time,
        EndConditionKind::Distance,
        EndConditionKind::Iterations,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::LapButton => "lap.button",
            Self::Time => "time",
            Self::Distance => "distance",
            Self::Iterations => "iterations",
        }
    }
}

impl fmt::Display for EndConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// End condition of a leaf step together with its value.
///
/// Repeat groups always end on iterations, which is carried by
/// [`RepeatGroup::iterations`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum EndCondition {
    /// Step ends when the athlete presses the lap button
    LapButton,
    /// Step ends after a duration
    Time { seconds: u32 },
    /// Step ends after a distance
    Distance { meters: f64 },
}

impl EndCondition {
    pub fn kind(&self) -> EndConditionKind {
        match self {
            Self::LapButton => EndConditionKind::LapButton,
            Self::Time { .. } => EndConditionKind::Time,
            Self::Distance { .. } => EndConditionKind::Distance,
        }
    }

    /// Numeric value in the condition's unit (seconds or meters).
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::LapButton => None,
            Self::Time { seconds } => Some(f64::from(*seconds)),
            Self::Distance { meters } => Some(*meters),
        }
    }
}

/// Kind of intensity target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    NoTarget,
    PaceZone,
    HeartRateZone,
    PowerZone,
    SpeedZone,
    CadenceZone,
}

impl TargetKind {
    pub const ALL: [TargetKind; 6] = [
        TargetKind::NoTarget,
        TargetKind::PaceZone,
        TargetKind::HeartRateZone,
        TargetKind::PowerZone,
        TargetKind::SpeedZone,
        TargetKind::CadenceZone,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::NoTarget => "no.target",
            Self::PaceZone => "pace.zone",
            Self::HeartRateZone => "heart.rate.zone",
            Self::PowerZone => "power.zone",
            Self::SpeedZone => "speed.zone",
            Self::CadenceZone => "cadence.zone",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| format!("Unknown target type: '{}'", s))
    }
}

/// Numeric intensity constraint attached to a step.
///
/// Values are in the kind's native unit: m/s for pace and speed, bpm for
/// heart rate, watts for power, rpm for cadence. For pace, `from_value` is the
/// slower bound and `to_value` the faster one, so `from_value <= to_value`
/// holds in m/s even though the pace strings read the other way round.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub kind: TargetKind,
    pub from_value: f64,
    pub to_value: f64,
    /// Platform zone number, when the target refers to a device zone
    pub zone_number: Option<u32>,
    /// Cached zone name, see [`Target::resolve_label`]
    pub zone_label: Option<String>,
}

impl Target {
    /// A target meaning "no target".
    pub fn none() -> Self {
        Self::new(TargetKind::NoTarget, 0.0, 0.0)
    }

    pub fn new(kind: TargetKind, from_value: f64, to_value: f64) -> Self {
        Self {
            kind,
            from_value,
            to_value,
            zone_number: None,
            zone_label: None,
        }
    }

    /// Pace target in m/s (`from` slower, `to` faster).
    pub fn pace(from_value: f64, to_value: f64) -> Self {
        Self::new(TargetKind::PaceZone, from_value, to_value)
    }

    /// Heart-rate target in bpm.
    pub fn heart_rate(from_value: f64, to_value: f64) -> Self {
        Self::new(TargetKind::HeartRateZone, from_value, to_value)
    }

    /// Power target in watts.
    pub fn power(from_value: f64, to_value: f64) -> Self {
        Self::new(TargetKind::PowerZone, from_value, to_value)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.zone_label = Some(label.into());
        self
    }

    pub fn with_zone_number(mut self, zone_number: u32) -> Self {
        self.zone_number = Some(zone_number);
        self
    }

    pub fn is_none(&self) -> bool {
        self.kind == TargetKind::NoTarget
    }

    /// Midpoint of the two bounds.
    pub fn average(&self) -> f64 {
        (self.from_value + self.to_value) / 2.0
    }

    /// Returns the zone name matching this target, caching it in
    /// `zone_label`.
    ///
    /// The label is a pure function of the bounds and the configuration, so
    /// calling this repeatedly is always safe. A target that already carries
    /// a label is returned unchanged.
    pub fn resolve_label(&mut self, resolver: &ZoneResolver<'_>, sport: SportType) -> Option<&str> {
        if self.zone_label.is_none() && !self.is_none() {
            self.zone_label = resolver.label_for(sport, self);
        }
        self.zone_label.as_deref()
    }
}

impl Default for Target {
    fn default() -> Self {
        Self::none()
    }
}

/// A step that does not contain other steps.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafStep {
    /// Never [`StepType::Repeat`]; see the workout validator
    pub step_type: StepType,
    pub description: String,
    pub end: EndCondition,
    pub target: Target,
}

/// A step whose body is executed `iterations` times.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatGroup {
    pub iterations: u32,
    pub description: String,
    pub steps: Vec<WorkoutStep>,
}

impl RepeatGroup {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations,
            description: String::new(),
            steps: Vec::new(),
        }
    }

    /// Appends a step to the body, assigning its order when unset.
    pub fn add_step(&mut self, step: WorkoutStep) {
        push_ordered(&mut self.steps, step);
    }
}

impl From<RepeatGroup> for WorkoutStep {
    fn from(group: RepeatGroup) -> Self {
        Self {
            order: 0,
            kind: StepKind::Repeat(group),
        }
    }
}

/// Leaf or container.
#[derive(Debug, Clone, PartialEq)]
pub enum StepKind {
    Leaf(LeafStep),
    Repeat(RepeatGroup),
}

/// A single step of a workout.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutStep {
    /// 1-based position among siblings; 0 means "not assigned yet"
    pub order: u32,
    pub kind: StepKind,
}

impl WorkoutStep {
    /// Creates a leaf step with no target.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneplanner::workout::{EndCondition, StepType, Target, WorkoutStep};
    ///
    /// let step = WorkoutStep::new(StepType::Interval, EndCondition::Distance { meters: 1000.0 })
    ///     .with_target(Target::pace(3.0, 3.5))
    ///     .with_description("threshold");
    /// assert_eq!(step.end_condition_value(), Some(1000.0));
    /// ```
    pub fn new(step_type: StepType, end: EndCondition) -> Self {
        Self {
            order: 0,
            kind: StepKind::Leaf(LeafStep {
                step_type,
                description: String::new(),
                end,
                target: Target::none(),
            }),
        }
    }

    /// Creates an empty repeat group.
    pub fn repeat(iterations: u32) -> Self {
        Self {
            order: 0,
            kind: StepKind::Repeat(RepeatGroup::new(iterations)),
        }
    }

    /// Sets the target of a leaf step. Repeat groups carry no target.
    pub fn with_target(mut self, target: Target) -> Self {
        match &mut self.kind {
            StepKind::Leaf(leaf) => leaf.target = target,
            StepKind::Repeat(_) => debug!("Ignoring target on repeat group"),
        }
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        match &mut self.kind {
            StepKind::Leaf(leaf) => leaf.description = description.into(),
            StepKind::Repeat(group) => group.description = description.into(),
        }
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    /// Appends body steps to a repeat group. Leaf steps are returned unchanged.
    pub fn with_steps(mut self, steps: Vec<WorkoutStep>) -> Self {
        match &mut self.kind {
            StepKind::Repeat(group) => {
                for step in steps {
                    group.add_step(step);
                }
            }
            StepKind::Leaf(_) => debug!("Ignoring body steps on a leaf step"),
        }
        self
    }

    pub fn step_type(&self) -> StepType {
        match &self.kind {
            StepKind::Leaf(leaf) => leaf.step_type,
            StepKind::Repeat(_) => StepType::Repeat,
        }
    }

    pub fn description(&self) -> &str {
        match &self.kind {
            StepKind::Leaf(leaf) => &leaf.description,
            StepKind::Repeat(group) => &group.description,
        }
    }

    pub fn end_condition(&self) -> EndConditionKind {
        match &self.kind {
            StepKind::Leaf(leaf) => leaf.end.kind(),
            StepKind::Repeat(_) => EndConditionKind::Iterations,
        }
    }

    /// Seconds, meters or repeat count depending on the end condition.
    pub fn end_condition_value(&self) -> Option<f64> {
        match &self.kind {
            StepKind::Leaf(leaf) => leaf.end.value(),
            StepKind::Repeat(group) => Some(f64::from(group.iterations)),
        }
    }

    /// The step's target, `None` for repeat groups and "no target".
    pub fn target(&self) -> Option<&Target> {
        match &self.kind {
            StepKind::Leaf(leaf) if !leaf.target.is_none() => Some(&leaf.target),
            _ => None,
        }
    }

    pub fn target_mut(&mut self) -> Option<&mut Target> {
        match &mut self.kind {
            StepKind::Leaf(leaf) if !leaf.target.is_none() => Some(&mut leaf.target),
            _ => None,
        }
    }

    /// Body of a repeat group; empty for leaf steps.
    pub fn children(&self) -> &[WorkoutStep] {
        match &self.kind {
            StepKind::Leaf(_) => &[],
            StepKind::Repeat(group) => &group.steps,
        }
    }

    pub fn is_repeat(&self) -> bool {
        matches!(self.kind, StepKind::Repeat(_))
    }

    /// Number of steps in this subtree, this step included.
    pub fn step_count(&self) -> usize {
        1 + self.children().iter().map(WorkoutStep::step_count).sum::<usize>()
    }

    /// Rewrites distance steps with a pace target into time steps.
    ///
    /// Returns how many steps were converted in this subtree.
    pub fn dist_to_time(&mut self) -> usize {
        match &mut self.kind {
            StepKind::Repeat(group) => group.steps.iter_mut().map(WorkoutStep::dist_to_time).sum(),
            StepKind::Leaf(leaf) => {
                let EndCondition::Distance { meters } = leaf.end else {
                    return 0;
                };
                if leaf.target.kind != TargetKind::PaceZone {
                    return 0;
                }

                let average_pace = leaf.target.average();
                if average_pace <= 0.0 || !average_pace.is_finite() {
                    debug!("Skipping distance conversion: average pace is {}", average_pace);
                    return 0;
                }

                let seconds = round_to_ten(meters / average_pace);
                debug!("Converted {} m at {:.3} m/s into {} s", meters, average_pace, seconds);
                leaf.end = EndCondition::Time { seconds };
                1
            }
        }
    }

    /// Expected duration in seconds, when every leaf can be estimated.
    pub fn estimated_duration(&self) -> Option<f64> {
        match &self.kind {
            StepKind::Repeat(group) => {
                let body = group
                    .steps
                    .iter()
                    .map(WorkoutStep::estimated_duration)
                    .sum::<Option<f64>>()?;
                Some(body * f64::from(group.iterations))
            }
            StepKind::Leaf(leaf) => match leaf.end {
                EndCondition::Time { seconds } => Some(f64::from(seconds)),
                EndCondition::Distance { meters } => {
                    let speed = leaf.target.average();
                    (matches!(leaf.target.kind, TargetKind::PaceZone | TargetKind::SpeedZone)
                        && speed > 0.0)
                        .then(|| meters / speed)
                }
                EndCondition::LapButton => None,
            },
        }
    }

    fn resolve_labels(&mut self, resolver: &ZoneResolver<'_>, sport: SportType) -> usize {
        match &mut self.kind {
            StepKind::Repeat(group) => group
                .steps
                .iter_mut()
                .map(|step| step.resolve_labels(resolver, sport))
                .sum(),
            StepKind::Leaf(leaf) => usize::from(leaf.target.resolve_label(resolver, sport).is_some()),
        }
    }
}

/// Rounds seconds to the nearest multiple of ten.
fn round_to_ten(seconds: f64) -> u32 {
    ((seconds / 10.0).round() * 10.0).max(0.0) as u32
}

/// Appends a step, assigning the next 1-based order when it is unset.
pub(crate) fn push_ordered(steps: &mut Vec<WorkoutStep>, mut step: WorkoutStep) {
    if step.order == 0 {
        step.order = steps.len() as u32 + 1;
    }
    steps.push(step);
}

/// A complete workout.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub sport_type: SportType,
    pub name: String,
    pub description: Option<String>,
    /// Top-level steps in execution order
    pub steps: Vec<WorkoutStep>,
    /// Calendar date the workout is planned for, if any
    pub scheduled_date: Option<NaiveDate>,
}

impl Workout {
    /// Creates a new empty workout.
    pub fn new(sport_type: SportType, name: impl Into<String>) -> Self {
        Self {
            sport_type,
            name: name.into().trim().to_string(),
            description: None,
            steps: Vec::new(),
            scheduled_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.trim().is_empty()).then_some(description);
        self
    }

    pub fn with_steps(mut self, steps: Vec<WorkoutStep>) -> Self {
        for step in steps {
            self.add_step(step);
        }
        self
    }

    /// Appends a top-level step, assigning its order when unset.
    pub fn add_step(&mut self, step: WorkoutStep) {
        push_ordered(&mut self.steps, step);
    }

    /// Total number of steps, repeat groups and their bodies included.
    pub fn step_count(&self) -> usize {
        self.steps.iter().map(WorkoutStep::step_count).sum()
    }

    /// Returns the number of top-level steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the workout has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Converts every distance step with a pace target into a time step.
    ///
    /// The duration is `distance / average pace`, rounded to the nearest ten
    /// seconds. Steps whose average pace is zero are left unchanged.
    pub fn dist_to_time(&mut self) -> usize {
        let converted: usize = self.steps.iter_mut().map(WorkoutStep::dist_to_time).sum();
        if converted > 0 {
            info!("Workout '{}': converted {} distance steps to time", self.name, converted);
        }
        converted
    }

    /// Expected total duration in whole seconds.
    pub fn estimated_duration(&self) -> Option<u32> {
        let total = self
            .steps
            .iter()
            .map(WorkoutStep::estimated_duration)
            .sum::<Option<f64>>()?;
        Some(total.round() as u32)
    }

    /// Fills in zone labels for every target that matches a configured zone.
    ///
    /// Returns how many targets carry a label afterwards.
    pub fn resolve_labels(&mut self, resolver: &ZoneResolver<'_>) -> usize {
        let sport = self.sport_type;
        self.steps
            .iter_mut()
            .map(|step| step.resolve_labels(resolver, sport))
            .sum()
    }

    /// Iterates over every leaf step, descending into repeat bodies.
    pub fn leaf_steps(&self) -> Vec<&LeafStep> {
        fn collect<'a>(steps: &'a [WorkoutStep], out: &mut Vec<&'a LeafStep>) {
            for step in steps {
                match &step.kind {
                    StepKind::Leaf(leaf) => out.push(leaf),
                    StepKind::Repeat(group) => collect(&group.steps, out),
                }
            }
        }

        let mut leaves = Vec::new();
        collect(&self.steps, &mut leaves);
        leaves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval_block() -> WorkoutStep {
        WorkoutStep::repeat(4).with_steps(vec![
            WorkoutStep::new(StepType::Interval, EndCondition::Distance { meters: 400.0 }),
            WorkoutStep::new(StepType::Recovery, EndCondition::Time { seconds: 90 }),
        ])
    }

    #[test]
    fn test_workout_add_step_assigns_order() {
        let mut workout = Workout::new(SportType::Running, "Easy run");
        workout.add_step(WorkoutStep::new(StepType::Warmup, EndCondition::LapButton));
        workout.add_step(WorkoutStep::new(StepType::Cooldown, EndCondition::LapButton));

        assert_eq!(workout.steps[0].order, 1);
        assert_eq!(workout.steps[1].order, 2);
    }

    #[test]
    fn test_add_step_keeps_explicit_order() {
        let mut workout = Workout::new(SportType::Running, "Ordered");
        workout.add_step(WorkoutStep::new(StepType::Warmup, EndCondition::LapButton).with_order(7));

        assert_eq!(workout.steps[0].order, 7);
    }

    #[test]
    fn test_repeat_body_order_is_per_sibling() {
        let mut workout = Workout::new(SportType::Running, "Intervals");
        workout.add_step(WorkoutStep::new(StepType::Warmup, EndCondition::LapButton));
        workout.add_step(interval_block());

        let repeat = &workout.steps[1];
        assert_eq!(repeat.order, 2);
        assert_eq!(repeat.children()[0].order, 1);
        assert_eq!(repeat.children()[1].order, 2);
    }

    #[test]
    fn test_leaf_ignores_children() {
        let leaf = WorkoutStep::new(StepType::Interval, EndCondition::LapButton)
            .with_steps(vec![WorkoutStep::new(StepType::Rest, EndCondition::LapButton)]);

        assert!(!leaf.is_repeat());
        assert!(leaf.children().is_empty());
    }

    #[test]
    fn test_repeat_end_condition_is_iterations() {
        let repeat = interval_block();
        assert_eq!(repeat.step_type(), StepType::Repeat);
        assert_eq!(repeat.end_condition(), EndConditionKind::Iterations);
        assert_eq!(repeat.end_condition_value(), Some(4.0));
        assert!(repeat.target().is_none());
    }

    #[test]
    fn test_step_count_includes_repeat_body() {
        let workout = Workout::new(SportType::Running, "Count").with_steps(vec![
            WorkoutStep::new(StepType::Warmup, EndCondition::LapButton),
            interval_block(),
        ]);

        assert_eq!(workout.len(), 2);
        assert_eq!(workout.step_count(), 4);
    }

    #[test]
    fn test_dist_to_time_rounds_to_ten_seconds() {
        let mut workout = Workout::new(SportType::Running, "Convert").with_steps(vec![
            WorkoutStep::new(StepType::Interval, EndCondition::Distance { meters: 1000.0 })
                .with_target(Target::pace(3.0, 3.5)),
        ]);

        assert_eq!(workout.dist_to_time(), 1);
        assert_eq!(workout.steps[0].end_condition(), EndConditionKind::Time);
        assert_eq!(workout.steps[0].end_condition_value(), Some(310.0));
    }

    #[test]
    fn test_dist_to_time_skips_zero_pace() {
        let mut workout = Workout::new(SportType::Running, "Zero").with_steps(vec![
            WorkoutStep::new(StepType::Interval, EndCondition::Distance { meters: 1000.0 })
                .with_target(Target::pace(0.0, 0.0)),
        ]);

        assert_eq!(workout.dist_to_time(), 0);
        assert_eq!(workout.steps[0].end_condition(), EndConditionKind::Distance);
    }

    #[test]
    fn test_dist_to_time_ignores_non_pace_targets() {
        let mut workout = Workout::new(SportType::Cycling, "Power").with_steps(vec![
            WorkoutStep::new(StepType::Interval, EndCondition::Distance { meters: 5000.0 })
                .with_target(Target::power(200.0, 250.0)),
        ]);

        assert_eq!(workout.dist_to_time(), 0);
        assert_eq!(workout.steps[0].end_condition(), EndConditionKind::Distance);
    }

    #[test]
    fn test_dist_to_time_descends_into_repeats() {
        let mut workout = Workout::new(SportType::Running, "Nested").with_steps(vec![
            WorkoutStep::repeat(3).with_steps(vec![WorkoutStep::new(
                StepType::Interval,
                EndCondition::Distance { meters: 400.0 },
            )
            .with_target(Target::pace(4.0, 4.0))]),
        ]);

        assert_eq!(workout.dist_to_time(), 1);
        let child = &workout.steps[0].children()[0];
        assert_eq!(child.end_condition_value(), Some(100.0));
    }

    #[test]
    fn test_estimated_duration() {
        let workout = Workout::new(SportType::Running, "Duration").with_steps(vec![
            WorkoutStep::new(StepType::Warmup, EndCondition::Time { seconds: 600 }),
            WorkoutStep::repeat(2).with_steps(vec![WorkoutStep::new(
                StepType::Interval,
                EndCondition::Distance { meters: 1000.0 },
            )
            .with_target(Target::pace(4.0, 4.0))]),
        ]);

        assert_eq!(workout.estimated_duration(), Some(1100));
    }

    #[test]
    fn test_estimated_duration_unknown_for_lap_button() {
        let workout = Workout::new(SportType::Running, "Open").with_steps(vec![WorkoutStep::new(
            StepType::Cooldown,
            EndCondition::LapButton,
        )]);

        assert_eq!(workout.estimated_duration(), None);
    }

    #[test]
    fn test_leaf_steps_flatten_repeats() {
        let workout = Workout::new(SportType::Running, "Leaves").with_steps(vec![
            WorkoutStep::new(StepType::Warmup, EndCondition::LapButton),
            interval_block(),
        ]);

        let types: Vec<StepType> = workout.leaf_steps().iter().map(|l| l.step_type).collect();
        assert_eq!(types, vec![StepType::Warmup, StepType::Interval, StepType::Recovery]);
    }

    #[test]
    fn test_sport_and_step_type_parsing() {
        assert_eq!("Cycling".parse::<SportType>(), Ok(SportType::Cycling));
        assert_eq!("cooldown".parse::<StepType>(), Ok(StepType::Cooldown));
        assert!("yoga".parse::<SportType>().is_err());
        assert_eq!("heart.rate.zone".parse::<TargetKind>(), Ok(TargetKind::HeartRateZone));
    }

    #[test]
    fn test_workout_description_blank_is_none() {
        let workout = Workout::new(SportType::Swimming, "Swim").with_description("  ");
        assert!(workout.description.is_none());
    }
}
