//! Tests for seat priority and automated replies in a directed match.

use tactix::{
    Cell, GameLogic, GameState, MatchDirector, MoveError, Player, PlayerInfo, PlayerKind, Position,
    SubmitError,
};

fn human_vs_automated() -> MatchDirector {
    let roster = vec![
        PlayerInfo::new(Player::Cross, 1, PlayerKind::Human),
        PlayerInfo::new(Player::Circle, 2, PlayerKind::Automated),
    ];
    MatchDirector::new(GameLogic::default(), roster).unwrap()
}

fn human_vs_human() -> MatchDirector {
    let roster = vec![
        PlayerInfo::new(Player::Cross, 1, PlayerKind::Human),
        PlayerInfo::new(Player::Circle, 2, PlayerKind::Human),
    ];
    MatchDirector::new(GameLogic::default(), roster).unwrap()
}

fn occupied_count(director: &MatchDirector) -> usize {
    director
        .logic()
        .game_board()
        .get()
        .cells()
        .iter()
        .filter(|cell| !cell.is_empty())
        .count()
}

#[test]
fn test_start_match_gives_priority_to_cross() {
    let director = human_vs_human();
    assert_eq!(director.priority(), None);

    director.start_match();

    assert_eq!(director.priority(), Some(1));
    assert_eq!(director.logic().game_state().get(), GameState::Started);
}

#[test]
fn test_submit_before_start_is_refused() {
    let director = human_vs_human();
    assert_eq!(
        director.submit(1, Position::new(0, 0)),
        Err(SubmitError::NotStarted)
    );
}

#[test]
fn test_automated_seat_answers_human_move() {
    let director = human_vs_automated();
    director.start_match();

    director.submit(1, Position::new(0, 0)).unwrap();

    // The human move and exactly one automated reply.
    assert_eq!(occupied_count(&director), 2);
    assert_eq!(director.priority(), Some(1));
    assert_eq!(
        director.logic().game_board().get().get(Position::new(0, 0)),
        Some(Cell::Occupied(Player::Cross))
    );
}

#[test]
fn test_priority_is_enforced() {
    let director = human_vs_human();
    director.start_match();

    assert_eq!(
        director.submit(2, Position::new(0, 0)),
        Err(SubmitError::NotYourTurn(2))
    );

    director.submit(1, Position::new(0, 0)).unwrap();
    assert_eq!(director.priority(), Some(2));
    assert_eq!(
        director.submit(1, Position::new(0, 1)),
        Err(SubmitError::NotYourTurn(1))
    );
}

#[test]
fn test_unknown_seat_is_refused() {
    let director = human_vs_human();
    director.start_match();
    assert_eq!(
        director.submit(9, Position::new(0, 0)),
        Err(SubmitError::UnknownPlayer(9))
    );
}

#[test]
fn test_refused_move_keeps_priority() {
    let director = human_vs_human();
    director.start_match();
    director.submit(1, Position::new(1, 1)).unwrap();

    let result = director.submit(2, Position::new(1, 1));
    assert_eq!(
        result,
        Err(SubmitError::Refused(MoveError::Occupied(Position::new(
            1, 1
        ))))
    );
    assert_eq!(director.priority(), Some(2));
}

#[test]
fn test_win_clears_priority() {
    let director = human_vs_human();
    director.start_match();
    director.submit(1, Position::new(0, 0)).unwrap();
    director.submit(2, Position::new(1, 0)).unwrap();
    director.submit(1, Position::new(0, 1)).unwrap();
    director.submit(2, Position::new(1, 1)).unwrap();
    director.submit(1, Position::new(0, 2)).unwrap();

    assert_eq!(
        director.logic().game_state().get(),
        GameState::Won(Player::Cross)
    );
    assert_eq!(director.priority(), None);
    assert_eq!(
        director.submit(2, Position::new(2, 2)),
        Err(SubmitError::NotStarted)
    );
}

#[test]
fn test_undo_to_empty_board_restores_cross_priority() {
    let director = human_vs_human();
    director.start_match();
    director.submit(1, Position::new(0, 0)).unwrap();
    assert_eq!(director.priority(), Some(2));

    // Only one move to roll back; the board comes up clean and the turn
    // goes back to the opening seat.
    director.logic().undo_last_two_moves();

    assert!(director.logic().game_board().get().is_clear());
    assert_eq!(director.priority(), Some(1));

    // Priority really is usable: Cross can open again.
    director.submit(1, Position::new(2, 2)).unwrap();
}

#[test]
fn test_partial_undo_leaves_priority_alone() {
    let director = human_vs_human();
    director.start_match();
    director.submit(1, Position::new(0, 0)).unwrap();
    director.submit(2, Position::new(1, 0)).unwrap();
    director.submit(1, Position::new(2, 0)).unwrap();

    // Rolls back to one occupied cell; not a clean board, so the turn
    // holder is unchanged.
    director.logic().undo_last_two_moves();
    assert_eq!(occupied_count(&director), 1);
    assert_eq!(director.priority(), Some(2));
}

#[test]
fn test_automated_match_plays_to_completion() {
    let roster = vec![
        PlayerInfo::new(Player::Cross, 1, PlayerKind::Automated),
        PlayerInfo::new(Player::Circle, 2, PlayerKind::Automated),
    ];
    let director = MatchDirector::new(GameLogic::default(), roster).unwrap();

    director.start_match();

    let state = director.logic().game_state().get();
    assert!(state.is_terminal(), "unexpected state: {state}");
    assert_eq!(director.priority(), None);
}

#[test]
fn test_automated_games_always_terminate() {
    for _ in 0..25 {
        let roster = vec![
            PlayerInfo::new(Player::Cross, 1, PlayerKind::Automated),
            PlayerInfo::new(Player::Circle, 2, PlayerKind::Automated),
        ];
        let director = MatchDirector::new(GameLogic::default(), roster).unwrap();
        director.start_match();
        assert!(director.logic().game_state().get().is_terminal());
    }
}
