//! Survey response statistics.

use mate_core::SurveyResponse;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveySummary {
    pub responses: usize,
    /// Mean over responses that gave an ABV
    pub mean_abv: Option<f64>,
}

/// Mood × recommended drink cross table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodPivot {
    pub moods: Vec<String>,
    pub recommendations: Vec<String>,
    /// `counts[mood][recommendation]`
    pub counts: Vec<Vec<u64>>,
    /// Counts as a share of their mood's row, in percent, one decimal
    pub row_pct: Vec<Vec<f64>>,
}

impl MoodPivot {
    pub fn is_empty(&self) -> bool {
        self.moods.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodCount {
    pub food: String,
    pub responses: u64,
}

/// Everything the stats page shows about survey responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyStats {
    pub summary: SurveySummary,
    pub mood_pivot: MoodPivot,
    pub food: Vec<FoodCount>,
}

impl SurveyStats {
    pub fn from_responses(responses: &[SurveyResponse]) -> Self {
        Self {
            summary: survey_summary(responses),
            mood_pivot: mood_pivot(responses),
            food: food_counts(responses),
        }
    }
}

pub fn survey_summary(responses: &[SurveyResponse]) -> SurveySummary {
    let abvs: Vec<f64> = responses
        .iter()
        .filter_map(|r| r.abv)
        .filter(|abv| abv.is_finite())
        .collect();
    let mean_abv = (!abvs.is_empty()).then(|| abvs.iter().sum::<f64>() / abvs.len() as f64);

    SurveySummary {
        responses: responses.len(),
        mean_abv,
    }
}

/// Cross table of responses that name both a mood and a recommendation.
pub fn mood_pivot(responses: &[SurveyResponse]) -> MoodPivot {
    let mut cells: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    let mut recommendations = BTreeSet::new();

    for response in responses {
        let (Some(mood), Some(rec)) = (response.mood.as_deref(), response.recommended.as_deref())
        else {
            continue;
        };
        *cells.entry((mood, rec)).or_default() += 1;
        recommendations.insert(rec);
    }

    let moods: BTreeSet<&str> = cells.keys().map(|(mood, _)| *mood).collect();

    let counts: Vec<Vec<u64>> = moods
        .iter()
        .map(|mood| {
            recommendations
                .iter()
                .map(|rec| cells.get(&(*mood, *rec)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    let row_pct = counts
        .iter()
        .map(|row| {
            let total: u64 = row.iter().sum();
            row.iter()
                .map(|&count| round1(count as f64 / total as f64 * 100.0))
                .collect()
        })
        .collect();

    MoodPivot {
        moods: moods.into_iter().map(String::from).collect(),
        recommendations: recommendations.into_iter().map(String::from).collect(),
        counts,
        row_pct,
    }
}

/// Responses per food, most common first.
pub fn food_counts(responses: &[SurveyResponse]) -> Vec<FoodCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for food in responses.iter().filter_map(|r| r.food.as_deref()) {
        *counts.entry(food).or_default() += 1;
    }

    let mut rows: Vec<FoodCount> = counts
        .into_iter()
        .map(|(food, responses)| FoodCount {
            food: food.to_string(),
            responses,
        })
        .collect();
    rows.sort_by(|a, b| b.responses.cmp(&a.responses).then_with(|| a.food.cmp(&b.food)));
    rows
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
