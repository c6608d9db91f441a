use rust_decimal::Decimal;
use tracing::debug;

use crate::dto::outputs::CalibrationAdvice;
use crate::models::{Course, RaceTime};

/// Below this many shared athletes no recommendation is made.
pub const MIN_SHARED_ATHLETES: usize = 3;
/// Sample size at which the size component of confidence saturates.
const FULL_CONFIDENCE_SAMPLE: usize = 20;
/// A relative median absolute deviation of this much drives confidence to 0.
const MAX_RELATIVE_SPREAD: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// One athlete's time on the course under review and on the reference course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedAthleteTimes {
    pub course_time: RaceTime,
    pub reference_time: RaceTime,
}

/// Infers a difficulty rating for `course` from athletes who also ran
/// `reference`. Advisory only: the result is for a human reviewer.
///
/// Each athlete implies the rating that would give both of their
/// performances the same XC time:
///
/// r = r_ref × (t_course / d_course) / (t_ref / d_ref)
///
/// The recommendation is the median of those ratings. Confidence combines
/// sample size with how tightly the implied ratings agree.
pub fn recommend_difficulty(
    course: &Course,
    reference: &Course,
    shared: &[SharedAthleteTimes],
) -> Option<CalibrationAdvice> {
    if shared.len() < MIN_SHARED_ATHLETES {
        debug!(
            "Only {} shared athletes between '{}' and '{}', no recommendation",
            shared.len(),
            course.name,
            reference.name
        );
        return None;
    }

    let course_distance = Decimal::from(course.distance_meters);
    let reference_distance = Decimal::from(reference.distance_meters);

    let mut implied: Vec<Decimal> = shared
        .iter()
        .filter_map(|pair| {
            let course_pace = Decimal::from(pair.course_time.centiseconds()) / course_distance;
            let reference_pace =
                Decimal::from(pair.reference_time.centiseconds()) / reference_distance;
            reference
                .difficulty_rating
                .checked_mul(course_pace)?
                .checked_div(reference_pace)
        })
        .collect();

    let estimate = median(&mut implied)?;
    let mut deviations: Vec<Decimal> = implied.iter().map(|r| (*r - estimate).abs()).collect();
    let spread = median(&mut deviations)?;

    let size_factor = Decimal::from(implied.len().min(FULL_CONFIDENCE_SAMPLE))
        / Decimal::from(FULL_CONFIDENCE_SAMPLE);
    let consistency =
        (Decimal::ONE - (spread / estimate) / MAX_RELATIVE_SPREAD).max(Decimal::ZERO);

    Some(CalibrationAdvice {
        recommended_difficulty: estimate.round_dp(3),
        confidence: (size_factor * consistency).round_dp(2),
        shared_athlete_count: implied.len(),
    })
}

fn median(values: &mut [Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    values.sort();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / Decimal::TWO)
    } else {
        Some(values[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(course: &str, reference: &str) -> SharedAthleteTimes {
        SharedAthleteTimes {
            course_time: RaceTime::parse(course).unwrap(),
            reference_time: RaceTime::parse(reference).unwrap(),
        }
    }

    fn unrated(distance: u32) -> Course {
        Course::new("Unrated", distance, Decimal::ONE).unwrap()
    }

    #[test]
    fn test_too_few_shared_athletes() {
        let shared = vec![pair("18:00", "16:00"), pair("19:00", "17:00")];
        assert!(recommend_difficulty(&unrated(5000), &Course::reference(5000), &shared).is_none());
    }

    #[test]
    fn test_consistent_ratio_is_recommended() {
        // everyone runs 10% slower on the unrated course
        let shared = vec![
            pair("17:36", "16:00"),
            pair("18:42", "17:00"),
            pair("19:48", "18:00"),
            pair("20:54", "19:00"),
        ];
        let advice =
            recommend_difficulty(&unrated(5000), &Course::reference(5000), &shared).unwrap();
        assert_eq!(advice.recommended_difficulty, Decimal::new(1100, 3));
        assert_eq!(advice.shared_athlete_count, 4);
        // perfect agreement, confidence limited by sample size only
        assert_eq!(advice.confidence, Decimal::new(20, 2));
    }

    #[test]
    fn test_distance_is_accounted_for() {
        // same pace on a 4K course means the course is neutral
        let shared = vec![
            pair("12:48", "16:00"),
            pair("13:36", "17:00"),
            pair("14:24", "18:00"),
        ];
        let advice =
            recommend_difficulty(&unrated(4000), &Course::reference(5000), &shared).unwrap();
        assert_eq!(advice.recommended_difficulty, Decimal::ONE);
    }

    #[test]
    fn test_reference_rating_carries_through() {
        let reference = Course::new("Rated", 5000, Decimal::new(105, 2)).unwrap();
        let shared = vec![
            pair("16:00", "16:00"),
            pair("17:00", "17:00"),
            pair("18:00", "18:00"),
        ];
        let advice = recommend_difficulty(&unrated(5000), &reference, &shared).unwrap();
        assert_eq!(advice.recommended_difficulty, Decimal::new(1050, 3));
    }

    #[test]
    fn test_outlier_lowers_confidence_not_estimate() {
        let clean = vec![
            pair("17:36", "16:00"),
            pair("18:42", "17:00"),
            pair("19:48", "18:00"),
            pair("20:54", "19:00"),
            pair("22:00", "20:00"),
        ];
        let mut noisy = clean.clone();
        noisy[0] = pair("16:00", "16:00");
        noisy[1] = pair("20:24", "17:00");

        let course = unrated(5000);
        let reference = Course::reference(5000);
        let clean_advice = recommend_difficulty(&course, &reference, &clean).unwrap();
        let noisy_advice = recommend_difficulty(&course, &reference, &noisy).unwrap();

        assert_eq!(noisy_advice.recommended_difficulty, Decimal::new(1100, 3));
        assert!(noisy_advice.confidence <= clean_advice.confidence);
    }
}
