use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{League, LeagueMember, Score, Standing};

#[derive(Default)]
struct Tally {
    total_points: Decimal,
    predictions_made: u32,
    perfect_predictions: u32,
}

/// Ranks league members on their scores.
///
/// Order: total points desc, perfect predictions desc, predictions made desc,
/// earlier join, then user id. User ids are unique within a league, so the
/// chain is total and positions run 1..=N without sharing. Scores of
/// non-members are ignored; members without scores rank with zero points.
pub fn standings(league: &League, scores: &[Score]) -> Vec<Standing> {
    let mut tallies: HashMap<Uuid, Tally> = league
        .members
        .iter()
        .map(|m| (m.user_id, Tally::default()))
        .collect();

    for score in scores {
        if let Some(tally) = tallies.get_mut(&score.user_id) {
            tally.total_points += score.total();
            tally.predictions_made += 1;
            if score.is_perfect() {
                tally.perfect_predictions += 1;
            }
        }
    }

    let mut rows: Vec<(&LeagueMember, Tally)> = league
        .members
        .iter()
        .filter_map(|m| tallies.remove(&m.user_id).map(|t| (m, t)))
        .collect();

    rows.sort_by(|(a_member, a), (b_member, b)| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| b.perfect_predictions.cmp(&a.perfect_predictions))
            .then_with(|| b.predictions_made.cmp(&a.predictions_made))
            .then_with(|| a_member.joined_at.cmp(&b_member.joined_at))
            .then_with(|| a_member.user_id.cmp(&b_member.user_id))
    });

    rows.into_iter()
        .enumerate()
        .map(|(idx, (member, tally))| Standing {
            user_id: member.user_id,
            position: idx as u32 + 1,
            total_points: tally.total_points,
            predictions_made: tally.predictions_made,
            perfect_predictions: tally.perfect_predictions,
        })
        .collect()
}
