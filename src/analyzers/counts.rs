use crate::models::{AccidentRecord, AccidentTable, Severity};
use crate::processors::RecordFilter;
use crate::utils::stats::percentage;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;

/// Categorical columns that can be grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    State,
    City,
    WeatherCondition,
    Severity,
    YearMonth,
    DayPhase,
}

impl Category {
    pub fn column_name(&self) -> &'static str {
        match self {
            Category::State => "State",
            Category::City => "City",
            Category::WeatherCondition => "Weather_Condition",
            Category::Severity => "Severity",
            Category::YearMonth => "YearMonth",
            Category::DayPhase => "Sunrise_Sunset",
        }
    }

    /// Group key of `record`, `None` when the record has no value for it.
    pub fn key<'a>(&self, record: &'a AccidentRecord) -> Option<Cow<'a, str>> {
        match self {
            Category::State => Some(Cow::Borrowed(record.state.as_str())),
            Category::City => Some(Cow::Borrowed(record.city.as_str())),
            Category::WeatherCondition => Some(Cow::Borrowed(record.weather_condition.as_str())),
            Category::Severity => Some(Cow::Owned(record.severity.to_string())),
            Category::YearMonth => record.year_month.map(|ym| Cow::Owned(ym.to_string())),
            Category::DayPhase => Some(Cow::Borrowed(record.sunrise_sunset.as_str())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

impl CategoryCount {
    pub fn percentage_of(&self, total: usize) -> f64 {
        percentage(self.count, total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairCount {
    pub first: String,
    pub second: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityShare {
    pub severity: Severity,
    pub count: usize,
    pub percentage: f64,
}

/// Counts keys, most frequent first. Equal counts keep first-seen order.
pub(crate) fn tally<K, I>(keys: I) -> Vec<(K, usize)>
where
    K: Hash + Eq + Clone,
    I: IntoIterator<Item = K>,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for key in keys {
        match slots.get(&key) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Rows per value of `category`, descending, optionally cut to the top `top_n`.
pub fn count_by(
    table: &AccidentTable,
    filter: &RecordFilter,
    category: Category,
    top_n: Option<usize>,
) -> Vec<CategoryCount> {
    let counts = tally(filter.apply(table).filter_map(|r| category.key(r)));
    let limit = top_n.unwrap_or(counts.len());

    counts
        .into_iter()
        .take(limit)
        .map(|(key, count)| CategoryCount {
            category: key.into_owned(),
            count,
        })
        .collect()
}

/// Rows per combination of two categories, descending.
pub fn count_by_pair(
    table: &AccidentTable,
    filter: &RecordFilter,
    first: Category,
    second: Category,
    top_n: Option<usize>,
) -> Vec<PairCount> {
    let counts = tally(
        filter
            .apply(table)
            .filter_map(|r| Some((first.key(r)?, second.key(r)?))),
    );
    let limit = top_n.unwrap_or(counts.len());

    counts
        .into_iter()
        .take(limit)
        .map(|((a, b), count)| PairCount {
            first: a.into_owned(),
            second: b.into_owned(),
            count,
        })
        .collect()
}

/// Accidents per state, for the choropleth.
pub fn state_counts(table: &AccidentTable, filter: &RecordFilter) -> Vec<CategoryCount> {
    count_by(table, filter, Category::State, None)
}

pub fn top_weather_conditions(
    table: &AccidentTable,
    filter: &RecordFilter,
    top_n: usize,
) -> Vec<CategoryCount> {
    count_by(table, filter, Category::WeatherCondition, Some(top_n))
}

pub fn top_cities(table: &AccidentTable, filter: &RecordFilter, top_n: usize) -> Vec<CategoryCount> {
    count_by(table, filter, Category::City, Some(top_n))
}

/// Count and share of each severity level present, ascending by level.
pub fn severity_distribution(table: &AccidentTable, filter: &RecordFilter) -> Vec<SeverityShare> {
    let mut counts: BTreeMap<Severity, usize> = BTreeMap::new();
    let mut total = 0;
    for record in filter.apply(table) {
        *counts.entry(record.severity).or_insert(0) += 1;
        total += 1;
    }

    counts
        .into_iter()
        .map(|(severity, count)| SeverityShare {
            severity,
            count,
            percentage: percentage(count, total),
        })
        .collect()
}
