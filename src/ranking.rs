//! Skill ranking and greedy team division.

use crate::error::ApiError;
use crate::models::Player;

/// Fewest registered players needed before teams can be formed.
pub const MIN_PLAYERS_FOR_TEAMS: usize = 10;

/// Sum of strength, speed and drible. A player without skills scores zero.
pub fn skill_score(player: &Player) -> f64 {
    player.skills.as_ref().map_or(0.0, |skills| skills.score())
}

/// Orders players by skill score, highest first.
/// Equal scores keep their relative input order.
pub fn rank_players(mut players: Vec<Player>) -> Vec<Player> {
    players.sort_by(|a, b| skill_score(b).total_cmp(&skill_score(a)));
    players
}

/// Accepts only a strictly positive integer team size.
pub fn parse_players_per_team(raw: Option<&serde_json::Value>) -> Result<usize, ApiError> {
    raw.and_then(serde_json::Value::as_u64)
        .filter(|&n| n > 0)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| ApiError::validation("Please provide a valid number of players per team."))
}

/// Ranks all players then slices the ranking into consecutive teams of
/// `players_per_team`. The last team holds the remainder and may be smaller.
pub fn divide_teams(
    players: Vec<Player>,
    players_per_team: usize,
) -> Result<Vec<Vec<Player>>, ApiError> {
    if players_per_team == 0 {
        return Err(ApiError::validation(
            "Please provide a valid number of players per team.",
        ));
    }
    if players.len() < MIN_PLAYERS_FOR_TEAMS {
        return Err(ApiError::validation(format!(
            "At least {} players are required to form teams.",
            MIN_PLAYERS_FOR_TEAMS
        )));
    }

    let ranked = rank_players(players);
    Ok(ranked
        .chunks(players_per_team)
        .map(<[Player]>::to_vec)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Skills;
    use chrono::Utc;
    use serde_json::json;

    fn player(id: &str, skills: Option<Skills>) -> Player {
        let now = Utc::now();
        Player {
            id: id.to_string(),
            name: format!("Player {id}"),
            nickname: None,
            creation_date: now,
            skills,
            created_at: now,
            updated_at: now,
        }
    }

    fn scored(id: &str, score: f64) -> Player {
        player(id, Some(Skills::new(score, 0.0, 0.0)))
    }

    fn ids(players: &[Player]) -> Vec<&str> {
        players.iter().map(|p| p.id.as_str()).collect()
    }

    fn roster(n: usize) -> Vec<Player> {
        (0..n).map(|i| scored(&format!("p{i}"), (i % 7) as f64)).collect()
    }

    #[test]
    fn missing_skills_score_zero() {
        assert_eq!(skill_score(&player("a", None)), 0.0);
        assert_eq!(skill_score(&player("b", Some(Skills::default()))), 0.0);
    }

    #[test]
    fn score_sums_present_components() {
        let p = player(
            "a",
            Some(Skills {
                strength: Some(3.0),
                speed: Some(4.5),
                drible: None,
            }),
        );
        assert_eq!(skill_score(&p), 7.5);
        assert_eq!(skill_score(&player("b", Some(Skills::new(10.0, 10.0, 10.0)))), 30.0);
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let players = vec![
            scored("a", 7.0),
            scored("b", 9.0),
            scored("c", 7.0),
            player("d", None),
            scored("e", 3.0),
            player("f", Some(Skills::default())),
        ];

        let ranked = rank_players(players);
        assert_eq!(ids(&ranked), vec!["b", "a", "c", "e", "d", "f"]);
        assert!(ranked
            .windows(2)
            .all(|w| skill_score(&w[0]) >= skill_score(&w[1])));
    }

    #[test]
    fn ranking_keeps_full_records() {
        let ranked = rank_players(vec![scored("a", 1.0), scored("b", 2.0)]);
        assert_eq!(ranked[0].skills, Some(Skills::new(2.0, 0.0, 0.0)));
        assert_eq!(ranked[0].name, "Player b");
    }

    #[test]
    fn divides_into_contiguous_slices_of_the_ranking() {
        // scores [7, 9, 7, 3] plus six zero-score fillers
        let mut players = vec![
            scored("a", 7.0),
            scored("b", 9.0),
            scored("c", 7.0),
            scored("d", 3.0),
        ];
        players.extend((0..6).map(|i| player(&format!("z{i}"), None)));

        let teams = divide_teams(players, 2).unwrap();
        assert_eq!(teams.len(), 5);
        assert_eq!(ids(&teams[0]), vec!["b", "a"]);
        assert_eq!(ids(&teams[1]), vec!["c", "d"]);
        assert_eq!(ids(&teams[2]), vec!["z0", "z1"]);
    }

    #[test]
    fn last_team_holds_the_remainder() {
        let players = roster(13);
        let expected = rank_players(players.clone());

        let teams = divide_teams(players, 5).unwrap();
        let sizes: Vec<usize> = teams.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![5, 5, 3]);

        let flattened: Vec<Player> = teams.into_iter().flatten().collect();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn exact_multiple_gives_equal_teams() {
        let teams = divide_teams(roster(12), 4).unwrap();
        assert_eq!(teams.len(), 3);
        assert!(teams.iter().all(|t| t.len() == 4));

        let one_team = divide_teams(roster(10), 25).unwrap();
        assert_eq!(one_team.len(), 1);
        assert_eq!(one_team[0].len(), 10);
    }

    #[test]
    fn fewer_than_ten_players_cannot_form_teams() {
        for n in 0..MIN_PLAYERS_FOR_TEAMS {
            let result = divide_teams(roster(n), 2);
            assert!(matches!(result, Err(ApiError::Validation(_))), "n={n}");
        }
    }

    #[test]
    fn zero_team_size_is_rejected() {
        assert!(matches!(
            divide_teams(roster(10), 0),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn team_size_must_be_a_positive_integer() {
        assert_eq!(parse_players_per_team(Some(&json!(5))).unwrap(), 5);

        for bad in [json!(0), json!(-1), json!(2.5), json!("3"), json!(null)] {
            assert!(parse_players_per_team(Some(&bad)).is_err(), "{bad}");
        }
        assert!(parse_players_per_team(None).is_err());
    }
}
