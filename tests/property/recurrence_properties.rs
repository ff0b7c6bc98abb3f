// Property-based tests for recurrence expansion and alarm planning
// Checks laws that must hold for any start date, interval and cap

#[path = "../fixtures/mod.rs"]
mod fixtures;

use std::sync::Arc;

use calendar_alarms::services::recurrence::EventOccurrences;
use calendar_alarms::{
    plan_future_occurrences, AlarmNotification, EndCondition, FutureAlarmOccurrences,
    RepeatPeriod, RepeatRule,
};
use chrono::{Duration, NaiveTime, TimeZone};
use chrono_tz::Europe::Berlin;
use proptest::prelude::*;

use fixtures::alarms::{alarm, shared};
use fixtures::dates::{berlin, now};

fn frequency() -> impl Strategy<Value = RepeatPeriod> {
    prop_oneof![
        Just(RepeatPeriod::Daily),
        Just(RepeatPeriod::Weekly),
        Just(RepeatPeriod::Monthly),
        Just(RepeatPeriod::Annually),
    ]
}

fn alarms_from_offsets(offsets: &[i64]) -> Vec<Arc<AlarmNotification>> {
    offsets
        .iter()
        .enumerate()
        .map(|(i, minutes)| {
            shared(alarm(
                &format!("alarm{}", i),
                now() + Duration::minutes(*minutes),
                "5M",
                Some(RepeatRule::new(RepeatPeriod::Daily, 1, "Europe/Berlin")),
            ))
        })
        .collect()
}

proptest! {
    /// Property: a count of N yields exactly N occurrences numbered 1..=N
    #[test]
    fn prop_count_yields_numbered_occurrences(
        year in 2000..2040i32,
        month in 1..=12u32,
        day in 1..=28u32,
        interval in 1..=5u32,
        times in 1..=20u32,
        freq in frequency(),
    ) {
        let start = berlin(year, month, day, 12, 0);
        let rule = RepeatRule::new(freq, interval, "Europe/Berlin")
            .with_end_condition(EndCondition::Count { times });

        let occurrences: Vec<_> = EventOccurrences::new(start, start, &rule, Berlin)
            .unwrap()
            .take(times as usize + 5)
            .collect();

        prop_assert_eq!(occurrences.len(), times as usize);
        for (i, occurrence) in occurrences.iter().enumerate() {
            prop_assert_eq!(occurrence.occurrence_number, i as u32 + 1);
        }
    }

    /// Property: daily and weekly steps keep the wall clock of the rule zone
    #[test]
    fn prop_steps_keep_local_time_of_day(
        year in 2000..2040i32,
        month in 1..=12u32,
        day in 1..=28u32,
        hour in 4..=22u32,
        interval in 1..=14u32,
        weekly in any::<bool>(),
    ) {
        let start = berlin(year, month, day, hour, 30);
        let freq = if weekly { RepeatPeriod::Weekly } else { RepeatPeriod::Daily };
        let step_days = if weekly { i64::from(interval) * 7 } else { i64::from(interval) };
        let rule = RepeatRule::new(freq, interval, "Europe/Berlin");

        let starts: Vec<_> = EventOccurrences::new(start, start, &rule, Berlin)
            .unwrap()
            .take(10)
            .map(|o| o.start.with_timezone(&Berlin))
            .collect();

        let expected_time = NaiveTime::from_hms_opt(hour, 30, 0).unwrap();
        for pair in starts.windows(2) {
            prop_assert_eq!((pair[1].date_naive() - pair[0].date_naive()).num_days(), step_days);
            prop_assert_eq!(pair[1].time(), expected_time);
        }
    }

    /// Property: excluding one occurrence removes exactly that occurrence
    #[test]
    fn prop_exclusion_removes_only_the_excluded_instant(
        year in 2000..2040i32,
        month in 1..=12u32,
        day in 1..=28u32,
        freq in frequency(),
        excluded in 0..10usize,
    ) {
        let start = berlin(year, month, day, 12, 0);
        let rule = RepeatRule::new(freq, 1, "Europe/Berlin")
            .with_end_condition(EndCondition::Count { times: 10 });
        let full: Vec<_> = EventOccurrences::new(start, start, &rule, Berlin).unwrap().collect();

        let with_exclusion = rule.clone().with_excluded_dates([full[excluded].start]);
        let filtered: Vec<_> = EventOccurrences::new(start, start, &with_exclusion, Berlin)
            .unwrap()
            .collect();

        let mut expected = full.clone();
        expected.remove(excluded);
        prop_assert_eq!(filtered, expected);
    }

    /// Property: every planned alarm fires at or after now
    #[test]
    fn prop_planned_alarms_are_not_in_the_past(
        offset_minutes in -10_000i64..10_000,
        trigger_minutes in 0..=600u32,
        interval in 1..=3u32,
    ) {
        let start = now() + Duration::minutes(offset_minutes);
        let rule = RepeatRule::new(RepeatPeriod::Daily, interval, "Europe/Berlin");
        let trigger = format!("{}M", trigger_minutes);
        let single = shared(alarm("a", start, &trigger, Some(rule)));

        let planned: Vec<_> = FutureAlarmOccurrences::new(single, now(), Berlin)
            .unwrap()
            .take(5)
            .collect();

        prop_assert_eq!(planned.len(), 5);
        for occurrence in &planned {
            prop_assert!(occurrence.alarm_time() >= now());
        }
    }

    /// Property: the plan is capped and interleaves each alarm's own sequence
    #[test]
    fn prop_plan_interleaves_alarm_sequences(
        offsets in prop::collection::vec(-3_000i64..3_000, 1..6),
        per_alarm in 0..6usize,
        overall in 0..20usize,
    ) {
        let alarms = alarms_from_offsets(&offsets);

        let plan = plan_future_occurrences(&alarms, per_alarm, overall, now(), Berlin).unwrap();

        prop_assert_eq!(plan.len(), overall.min(alarms.len() * per_alarm));

        for alarm in &alarms {
            let own: Vec<_> = plan
                .iter()
                .filter(|o| Arc::ptr_eq(&o.alarm, alarm))
                .cloned()
                .collect();
            let expected: Vec<_> = FutureAlarmOccurrences::new(Arc::clone(alarm), now(), Berlin)
                .unwrap()
                .take(own.len())
                .collect();
            prop_assert!(own.len() <= per_alarm);
            prop_assert_eq!(own, expected);
        }

        let again = plan_future_occurrences(&alarms, per_alarm, overall, now(), Berlin).unwrap();
        prop_assert_eq!(plan, again);
    }
}

#[cfg(test)]
mod additional_tests {
    use super::*;
    use calendar_alarms::AdvancedRule;

    #[test]
    fn test_monthly_from_31st_clamps_without_drifting() {
        let start = chrono::Utc.with_ymd_and_hms(2025, 1, 31, 9, 0, 0).unwrap();
        let rule = RepeatRule::new(RepeatPeriod::Monthly, 1, "UTC");

        let days: Vec<_> = EventOccurrences::new(start, start, &rule, Berlin)
            .unwrap()
            .take(4)
            .map(|o| o.start.format("%m-%d").to_string())
            .collect();

        assert_eq!(days, vec!["01-31", "02-28", "03-31", "04-30"]);
    }

    #[test]
    fn test_by_day_never_selects_other_weekdays() {
        let start = berlin(2025, 3, 3, 7, 0);
        let rule = RepeatRule::new(RepeatPeriod::Weekly, 1, "Europe/Berlin")
            .with_advanced_rule(AdvancedRule::by_day("MO,TH"));

        let weekdays: Vec<_> = EventOccurrences::new(start, start, &rule, Berlin)
            .unwrap()
            .take(20)
            .map(|o| o.start.with_timezone(&Berlin).format("%a").to_string())
            .collect();

        assert!(weekdays.iter().all(|d| d == "Mon" || d == "Thu"));
    }
}
