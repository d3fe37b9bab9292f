//! Recently-viewed recommendation engine.
//!
//! A pure function over the caller-fetched view history and catalog.
//! Users fall into one of three regimes by history length, each with its
//! own scoring policy. Random score terms are fresh draws on every call;
//! there is no seeding and no reproducibility guarantee.

use std::collections::HashSet;

use rand::Rng;
use serde::Serialize;

use crate::models::{CourseRecord, CourseView};

use super::catalog::CourseTable;

/// Default number of recommendations when the request does not say.
pub const DEFAULT_TOP_K: usize = 12;

/// How many same-subject results the multi-view regime guarantees.
const SAME_SUBJECT_GUARANTEE: usize = 2;

/// Scoring policy actually applied, reported in the debug block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    PopularForNewUsers,
    SimilarToFirstCourse,
    SameCategoryGuarantee,
    StandardScoring,
}

/// One recommended course, with its heuristic score where the regime
/// computes one.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub course: CourseRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Diagnostic metadata attached to every heuristic result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationDebug {
    pub viewed_courses: usize,
    pub resolved_courses: usize,
    pub preferred_subjects: Vec<String>,
    pub preferred_levels: Vec<String>,
    pub algorithm: Algorithm,
    pub returned_course_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_subject_count: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResult {
    pub recommendations: Vec<Recommendation>,
    pub message: String,
    /// Absent when the result came from the remote model backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<RecommendationDebug>,
}

#[derive(Clone, Copy)]
struct ScoredCourse<'a> {
    course: &'a CourseRecord,
    score: f64,
}

/// Computes ranked course recommendations from a user's recent views.
///
/// `recent_views` must already be limited to the ten most recent events,
/// most recent first, and `top_k` must be at least 1; both are enforced
/// by the HTTP layer.
pub fn recommend(
    recent_views: &[CourseView],
    catalog: &CourseTable,
    top_k: usize,
) -> RecommendationResult {
    match recent_views {
        [] => recommend_popular(catalog, top_k, 0),
        [only] => recommend_similar(only, catalog, top_k),
        _ => recommend_from_history(recent_views, catalog, top_k),
    }
}

/// Cold-start regime: no usable history, rank the whole catalog by
/// popularity. The sort is stable, so equally popular courses keep
/// their catalog order.
fn recommend_popular(
    catalog: &CourseTable,
    top_k: usize,
    viewed_courses: usize,
) -> RecommendationResult {
    let mut ranked: Vec<&CourseRecord> = catalog.all().iter().collect();
    ranked.sort_by_key(|course| std::cmp::Reverse(course.popularity()));

    let recommendations: Vec<Recommendation> = ranked
        .into_iter()
        .take(top_k)
        .map(|course| Recommendation {
            course: course.clone(),
            score: None,
        })
        .collect();
    let returned_course_ids = recommendations
        .iter()
        .map(|r| r.course.id.clone())
        .collect();

    RecommendationResult {
        message: "Showing the most popular courses to get you started".to_string(),
        debug: Some(RecommendationDebug {
            viewed_courses,
            resolved_courses: 0,
            preferred_subjects: Vec::new(),
            preferred_levels: Vec::new(),
            algorithm: Algorithm::PopularForNewUsers,
            returned_course_ids,
            same_subject_count: None,
        }),
        recommendations,
    }
}

/// Single-observation regime: score the rest of the catalog against the
/// one course the user looked at. The subject and level bonuses dwarf
/// the random term, so matching courses always rank first.
fn recommend_similar(
    view: &CourseView,
    catalog: &CourseTable,
    top_k: usize,
) -> RecommendationResult {
    let Some(viewed) = catalog.by_id(&view.course_id) else {
        // The one known view no longer resolves against the catalog, so
        // there is nothing to be similar to.
        return recommend_popular(catalog, top_k, 1);
    };

    let mut rng = rand::thread_rng();
    let mut scored: Vec<ScoredCourse> = catalog
        .all()
        .iter()
        .filter(|course| course.id != viewed.id)
        .map(|course| {
            let mut score = 0.0;
            if course.subject == viewed.subject {
                score += 100.0;
            }
            if course.level == viewed.level {
                score += 50.0;
            }
            score += (course.subscriber_count() as f64 / 10_000.0).min(20.0);
            score += rng.gen_range(0.0..10.0);
            ScoredCourse { course, score }
        })
        .collect();

    sort_by_score(&mut scored);
    scored.truncate(top_k);

    let recommendations: Vec<Recommendation> = scored
        .iter()
        .map(|s| Recommendation {
            course: s.course.clone(),
            score: Some(round2(s.score)),
        })
        .collect();
    let returned_course_ids = recommendations
        .iter()
        .map(|r| r.course.id.clone())
        .collect();

    RecommendationResult {
        message: format!("Courses similar to \"{}\"", viewed.title),
        debug: Some(RecommendationDebug {
            viewed_courses: 1,
            resolved_courses: 1,
            preferred_subjects: vec![viewed.subject.clone()],
            preferred_levels: vec![viewed.level.clone()],
            algorithm: Algorithm::SimilarToFirstCourse,
            returned_course_ids,
            same_subject_count: None,
        }),
        recommendations,
    }
}

/// Multi-observation regime: score candidates against the set of
/// subjects and levels the user has viewed, then guarantee the most
/// recent course's subject stays represented in the result.
fn recommend_from_history(
    recent_views: &[CourseView],
    catalog: &CourseTable,
    top_k: usize,
) -> RecommendationResult {
    let viewed_ids: HashSet<&str> = recent_views.iter().map(|v| v.course_id.as_str()).collect();
    // Ids the catalog no longer knows are dropped without complaint.
    let resolved: Vec<&CourseRecord> = recent_views
        .iter()
        .filter_map(|v| catalog.by_id(&v.course_id))
        .collect();

    let user_subjects = distinct(resolved.iter().map(|c| c.subject.as_str()));
    let user_levels = distinct(resolved.iter().map(|c| c.level.as_str()));
    let most_recent = catalog.by_id(&recent_views[0].course_id);

    let mut rng = rand::thread_rng();
    let mut scored: Vec<ScoredCourse> = catalog
        .all()
        .iter()
        .filter(|course| !viewed_ids.contains(course.id.as_str()))
        .map(|course| {
            let mut score = 0.0;
            if user_subjects.iter().any(|s| s == &course.subject) {
                score += 200.0;
            }
            if user_levels.iter().any(|l| l == &course.level) {
                score += 50.0;
            }
            score += (course.subscriber_count() as f64 / 10_000.0).min(5.0);
            score += rng.gen_range(0.0..2.0);
            ScoredCourse { course, score }
        })
        .collect();

    sort_by_score(&mut scored);

    let (selected, algorithm, same_subject_count, message) = match most_recent {
        Some(anchor) => {
            let mut selected: Vec<ScoredCourse> = scored
                .iter()
                .copied()
                .filter(|s| s.course.subject == anchor.subject)
                .take(SAME_SUBJECT_GUARANTEE.min(top_k))
                .collect();
            let achieved = selected.len();
            selected.extend(
                scored
                    .iter()
                    .copied()
                    .filter(|s| s.course.subject != anchor.subject)
                    .take(top_k - achieved),
            );
            biased_shuffle(&mut selected, &mut rng);

            let message = format!(
                "Based on your recent views, with {} picks from {}",
                achieved, anchor.subject
            );
            (
                selected,
                Algorithm::SameCategoryGuarantee,
                Some(achieved),
                message,
            )
        }
        None => {
            let selected: Vec<ScoredCourse> = scored.iter().copied().take(top_k).collect();
            (
                selected,
                Algorithm::StandardScoring,
                None,
                "Based on your recent views".to_string(),
            )
        }
    };

    let recommendations: Vec<Recommendation> = selected
        .iter()
        .map(|s| Recommendation {
            course: s.course.clone(),
            score: Some(round2(s.score)),
        })
        .collect();
    let returned_course_ids = recommendations
        .iter()
        .map(|r| r.course.id.clone())
        .collect();

    RecommendationResult {
        message,
        debug: Some(RecommendationDebug {
            viewed_courses: recent_views.len(),
            resolved_courses: resolved.len(),
            preferred_subjects: user_subjects,
            preferred_levels: user_levels,
            algorithm,
            returned_course_ids,
            same_subject_count,
        }),
        recommendations,
    }
}

/// Descending by score; the random term already decided any near-ties.
fn sort_by_score(scored: &mut [ScoredCourse<'_>]) {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn round2(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

/// Distinct values in first-seen order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

/// Reshuffles a ranked list, biased rather than uniform.
///
/// Equivalent to sorting with a comparator that returns `random() - 0.3`:
/// each comparison lets the later element win 70% of the time, so entries
/// drift toward the front of the list. Implemented as an insertion sort
/// driven by that coin flip. Membership and length are untouched.
fn biased_shuffle<T>(items: &mut [T], rng: &mut impl Rng) {
    for i in 1..items.len() {
        let mut j = i;
        // compare(previous, inserted) = random() - 0.3; a positive draw
        // orders the inserted element in front of the previous one.
        while j > 0 && rng.gen::<f64>() - 0.3 > 0.0 {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}
