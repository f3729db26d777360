//! Rule-based insight generation over a window of mood entries.
//!
//! This module turns a fetched page of entries plus the store-wide summary
//! into an ordered list of human-readable observations. It is a pure
//! function of its inputs: no store access, no mutation of the window.
//!
//! ## Rule cascade
//!
//! The engine runs a fixed cascade of independent rules, each appending zero
//! or one observation (the location rule may add a second caution line):
//!
//! 1. Empty window short-circuits to a single "start logging" message
//! 2. Average rating over the window
//! 3. Dominant emotion
//! 4. Rating trend (newest five vs oldest five)
//! 5. Location correlation (best group, plus caution for a clearly worse one)
//! 6. Social-context correlation
//! 7. Weather correlation
//! 8. Activity correlation (with vs without a category)
//! 9. Day-of-week pattern
//! 10. Combined social-context x activity pattern
//!
//! Every rule is gated by its own sample-size threshold; missing data skips
//! the rule silently. Entries are expected newest-first, matching the
//! repository page order.

use crate::db::stats::Summary;
use crate::libs::mood::{Activity, MoodEntry};
use chrono::{DateTime, Datelike, Weekday};
use std::fmt;

/// Minimum samples a single group (location, context, weather, activity,
/// factor pair) needs before it participates in a correlation.
const MIN_GROUP_SAMPLES: usize = 3;
/// Minimum qualifying entries before a contextual correlation rule fires.
const MIN_CORRELATION_ENTRIES: usize = 5;
/// Minimum activity-bearing entries for the activity rule.
const MIN_ACTIVITY_ENTRIES: usize = 10;
/// Minimum window size for the day-of-week rule.
const MIN_WEEKDAY_ENTRIES: usize = 14;
/// Minimum window size for the combined-factor rule.
const MIN_COMBINED_ENTRIES: usize = 30;
/// Mean delta between the newest and oldest five entries that counts as a trend.
const TREND_DELTA: f64 = 0.5;
/// Mean uplift a single activity category must show to be reported.
const ACTIVITY_DELTA: f64 = 0.5;
/// Best-to-worst weekday mean spread required for the weekday rule.
const WEEKDAY_DELTA: f64 = 0.7;
/// Gap below the best group that turns the worst one into a caution.
const CAUTION_DELTA: f64 = 0.8;
/// Margin over the overall average required for a combined-factor report.
const COMBINED_DELTA: f64 = 0.8;

/// One generated observation. Wording lives in the `Display` impl so the
/// rule code stays about numbers, not strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Insight {
    StartLogging,
    AverageRating { mean: f64, total_logged: i64 },
    DominantEmotion(String),
    TrendImproving,
    TrendDeclining,
    TrendStable,
    BestLocation { location: String, mean: f64 },
    LocationCaution { location: String, mean: f64 },
    BestSocialContext { context: String, mean: f64 },
    BestWeather { condition: String, mean: f64 },
    ActivityBoost { activity: String, delta: f64 },
    WeekdayPattern { best: String, best_mean: f64, worst: String, worst_mean: f64 },
    CombinedFactor { context: String, activity: String, mean: f64, overall: f64 },
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insight::StartLogging => {
                write!(f, "Start logging your mood to see personalized insights here!")
            }
            Insight::AverageRating { mean, total_logged } => {
                write!(f, "Your average mood rating is {:.1} out of 5 across {} logged entries.", mean, total_logged)
            }
            Insight::DominantEmotion(emotion) => {
                write!(f, "Your most frequent emotion lately is {}.", emotion)
            }
            Insight::TrendImproving => write!(f, "Your mood has been improving recently. Keep it up!"),
            Insight::TrendDeclining => write!(f, "Your mood has been declining lately. Be kind to yourself."),
            Insight::TrendStable => write!(f, "Your mood has been stable recently."),
            Insight::BestLocation { location, mean } => {
                write!(f, "You tend to feel best at {} (average {:.1}).", location, mean)
            }
            Insight::LocationCaution { location, mean } => {
                write!(f, "Your mood dips noticeably at {} (average {:.1}).", location, mean)
            }
            Insight::BestSocialContext { context, mean } => {
                write!(f, "Your mood is highest when your time is spent as: {} (average {:.1}).", context, mean)
            }
            Insight::BestWeather { condition, mean } => {
                write!(f, "{} weather seems to suit you (average {:.1}).", condition, mean)
            }
            Insight::ActivityBoost { activity, delta } => {
                write!(f, "Entries with {} average {:.1} points higher than entries without it.", activity, delta)
            }
            Insight::WeekdayPattern { best, best_mean, worst, worst_mean } => {
                write!(
                    f,
                    "{} is usually your best day ({:.1}), while {} tends to be your lowest ({:.1}).",
                    best, best_mean, worst, worst_mean
                )
            }
            Insight::CombinedFactor { context, activity, mean, overall } => {
                write!(
                    f,
                    "The combination of {} time and {} stands out: average {:.1}, well above your overall {:.1}.",
                    context, activity, mean, overall
                )
            }
        }
    }
}

/// Runs the full rule cascade and renders each insight to a string.
///
/// `entries` is one analysis window, newest-first. `summary` supplies
/// store-wide counters for wording; the rules themselves only look at the
/// window.
pub fn generate_insights(entries: &[MoodEntry], summary: &Summary) -> Vec<String> {
    if entries.is_empty() {
        return vec![Insight::StartLogging.to_string()];
    }

    let mut insights = Vec::new();

    insights.push(Insight::AverageRating {
        mean: mean_rating(entries),
        total_logged: summary.entry_count.max(entries.len() as i64),
    });

    if let Some(insight) = dominant_emotion(entries) {
        insights.push(insight);
    }
    if let Some(insight) = trend(entries) {
        insights.push(insight);
    }
    insights.extend(location_correlation(entries));
    if let Some(insight) = social_correlation(entries) {
        insights.push(insight);
    }
    if let Some(insight) = weather_correlation(entries) {
        insights.push(insight);
    }
    if let Some(insight) = activity_correlation(entries) {
        insights.push(insight);
    }
    if let Some(insight) = weekday_pattern(entries) {
        insights.push(insight);
    }
    if let Some(insight) = combined_factor(entries) {
        insights.push(insight);
    }

    insights.iter().map(|i| i.to_string()).collect()
}

fn mean_rating(entries: &[MoodEntry]) -> f64 {
    let sum: i64 = entries.iter().map(|e| e.rating).sum();
    sum as f64 / entries.len() as f64
}

/// Per-label mean ratings in first-encounter order.
///
/// The window is small (one page), so a linear scan per label beats pulling
/// in a map and losing the encounter order the tie-breaks depend on.
fn grouped_means<'a>(samples: impl Iterator<Item = (&'a str, i64)>) -> Vec<(String, f64, usize)> {
    let mut groups: Vec<(String, i64, usize)> = Vec::new();
    for (label, rating) in samples {
        match groups.iter_mut().find(|(l, _, _)| l == label) {
            Some((_, sum, count)) => {
                *sum += rating;
                *count += 1;
            }
            None => groups.push((label.to_string(), rating, 1)),
        }
    }
    groups
        .into_iter()
        .map(|(label, sum, count)| (label, sum as f64 / count as f64, count))
        .collect()
}

fn dominant_emotion(entries: &[MoodEntry]) -> Option<Insight> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for entry in entries {
        let label = entry.emotion.label();
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }
    // Strict comparison keeps the first-encountered label on ties.
    let mut best: Option<(&str, usize)> = None;
    for (label, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| Insight::DominantEmotion(label.to_string()))
}

fn trend(entries: &[MoodEntry]) -> Option<Insight> {
    if entries.len() <= 5 {
        return None;
    }
    // Newest-first window: the head is recent, the tail is oldest.
    let newest = mean_rating(&entries[..5]);
    let oldest = mean_rating(&entries[entries.len() - 5..]);
    let delta = newest - oldest;
    if delta >= TREND_DELTA {
        Some(Insight::TrendImproving)
    } else if delta <= -TREND_DELTA {
        Some(Insight::TrendDeclining)
    } else {
        Some(Insight::TrendStable)
    }
}

/// Qualifying groups for a contextual correlation: groups with enough
/// samples, provided the qualifying entries and group count clear the rule
/// thresholds. A single group is never reported; a correlation needs a
/// second group to compare against.
fn qualifying_groups<'a>(samples: impl Iterator<Item = (&'a str, i64)>) -> Option<Vec<(String, f64, usize)>> {
    let groups: Vec<(String, f64, usize)> = grouped_means(samples)
        .into_iter()
        .filter(|(_, _, count)| *count >= MIN_GROUP_SAMPLES)
        .collect();
    let qualifying_entries: usize = groups.iter().map(|(_, _, count)| count).sum();
    if qualifying_entries < MIN_CORRELATION_ENTRIES || groups.len() < 2 {
        return None;
    }
    Some(groups)
}

fn location_correlation(entries: &[MoodEntry]) -> Vec<Insight> {
    let samples = entries
        .iter()
        .filter_map(|e| e.location.as_deref().map(|l| (l, e.rating)));
    let groups = match qualifying_groups(samples) {
        Some(groups) => groups,
        None => return Vec::new(),
    };

    let best = match groups.iter().cloned().reduce(|a, b| if b.1 > a.1 { b } else { a }) {
        Some(group) => group,
        None => return Vec::new(),
    };
    let worst = match groups.iter().cloned().reduce(|a, b| if b.1 < a.1 { b } else { a }) {
        Some(group) => group,
        None => return Vec::new(),
    };

    let mut insights = vec![Insight::BestLocation {
        location: best.0.clone(),
        mean: best.1,
    }];
    if worst.0 != best.0 && best.1 - worst.1 >= CAUTION_DELTA {
        insights.push(Insight::LocationCaution {
            location: worst.0,
            mean: worst.1,
        });
    }
    insights
}

fn social_correlation(entries: &[MoodEntry]) -> Option<Insight> {
    let samples = entries
        .iter()
        .filter_map(|e| e.social_context.as_ref().map(|c| (c.label(), e.rating)));
    let groups = qualifying_groups(samples)?;
    let best = groups.into_iter().reduce(|a, b| if b.1 > a.1 { b } else { a })?;
    Some(Insight::BestSocialContext {
        context: best.0,
        mean: best.1,
    })
}

fn weather_correlation(entries: &[MoodEntry]) -> Option<Insight> {
    let samples = entries
        .iter()
        .filter_map(|e| e.weather.as_ref().map(|w| (w.label(), e.rating)));
    let groups = qualifying_groups(samples)?;
    let best = groups.into_iter().reduce(|a, b| if b.1 > a.1 { b } else { a })?;
    Some(Insight::BestWeather {
        condition: best.0,
        mean: best.1,
    })
}

fn activity_correlation(entries: &[MoodEntry]) -> Option<Insight> {
    let tagged = entries.iter().filter(|e| !e.activities.is_empty()).count();
    if tagged < MIN_ACTIVITY_ENTRIES {
        return None;
    }

    let mut categories: Vec<Activity> = Vec::new();
    for entry in entries {
        for activity in entry.activities.keys() {
            if !categories.contains(activity) {
                categories.push(*activity);
            }
        }
    }

    let mut best: Option<(Activity, f64)> = None;
    for category in categories {
        let (with, without): (Vec<&MoodEntry>, Vec<&MoodEntry>) =
            entries.iter().partition(|e| e.activities.contains_key(&category));
        if with.len() < MIN_GROUP_SAMPLES || without.is_empty() {
            continue;
        }
        let mean_of = |list: &[&MoodEntry]| {
            list.iter().map(|e| e.rating).sum::<i64>() as f64 / list.len() as f64
        };
        let delta = mean_of(&with) - mean_of(&without);
        if delta > 0.0 && best.map_or(true, |(_, d)| delta > d) {
            best = Some((category, delta));
        }
    }

    let (activity, delta) = best?;
    if delta > ACTIVITY_DELTA {
        Some(Insight::ActivityBoost {
            activity: activity.label().to_string(),
            delta,
        })
    } else {
        None
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn weekday_pattern(entries: &[MoodEntry]) -> Option<Insight> {
    if entries.len() < MIN_WEEKDAY_ENTRIES {
        return None;
    }

    // UTC keeps the engine a deterministic function of its inputs.
    let samples = entries.iter().filter_map(|e| {
        DateTime::from_timestamp_millis(e.entry_time).map(|dt| (weekday_name(dt.weekday()), e.rating))
    });
    let groups = grouped_means(samples);
    if groups.len() <= 3 {
        return None;
    }

    let best = groups.iter().cloned().reduce(|a, b| if b.1 > a.1 { b } else { a })?;
    let worst = groups.iter().cloned().reduce(|a, b| if b.1 < a.1 { b } else { a })?;
    if best.1 - worst.1 > WEEKDAY_DELTA {
        Some(Insight::WeekdayPattern {
            best: best.0,
            best_mean: best.1,
            worst: worst.0,
            worst_mean: worst.1,
        })
    } else {
        None
    }
}

fn combined_factor(entries: &[MoodEntry]) -> Option<Insight> {
    if entries.len() < MIN_COMBINED_ENTRIES {
        return None;
    }
    let overall = mean_rating(entries);

    // One pair sample per (social context, activity category) an entry carries.
    let mut pairs: Vec<(String, Activity, i64, usize)> = Vec::new();
    for entry in entries {
        let context = match &entry.social_context {
            Some(context) if !entry.activities.is_empty() => context.label(),
            _ => continue,
        };
        for activity in entry.activities.keys() {
            match pairs
                .iter_mut()
                .find(|(c, a, _, _)| c == context && a == activity)
            {
                Some((_, _, sum, count)) => {
                    *sum += entry.rating;
                    *count += 1;
                }
                None => pairs.push((context.to_string(), *activity, entry.rating, 1)),
            }
        }
    }

    let best = pairs
        .into_iter()
        .filter(|(_, _, _, count)| *count >= MIN_GROUP_SAMPLES)
        .map(|(context, activity, sum, count)| (context, activity, sum as f64 / count as f64))
        .reduce(|a, b| if b.2 > a.2 { b } else { a })?;

    if best.2 > overall + COMBINED_DELTA {
        Some(Insight::CombinedFactor {
            context: best.0,
            activity: best.1.label().to_string(),
            mean: best.2,
            overall,
        })
    } else {
        None
    }
}
