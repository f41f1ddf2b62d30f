//! Integration tests for the game session flow.
use std::time::Duration;

use pn_core::{CoreError, GameStatus, MemberId, Persona, Voice};
use pn_dialogue::audio::silent_wav;
use pn_dialogue::{CompanyProfile, DialogueError, PassthroughTranscoder, Role, ScriptedDialogue};
use pn_game::{Game, GameConfig, GameError};

type TestGame = Game<ScriptedDialogue, PassthroughTranscoder>;

fn config() -> GameConfig {
    GameConfig::default().with_seed(7).with_manual_ticks()
}

fn game(script: ScriptedDialogue) -> TestGame {
    Game::new(script, PassthroughTranscoder, config()).unwrap()
}

fn wav() -> Vec<u8> {
    silent_wav(16_000, 1, 160)
}

fn first_raised(game: &TestGame) -> MemberId {
    game.crowd().raised().next().expect("a raised hand").id
}

async fn started(script: ScriptedDialogue) -> TestGame {
    let mut game = game(script);
    game.start_game().await.unwrap();
    game
}

#[tokio::test]
async fn start_game_seats_crowd() {
    let mut game = game(ScriptedDialogue::new());
    assert_eq!(game.status(), GameStatus::Idle);

    let company = game.start_game().await.unwrap().clone();
    assert_eq!(company, CompanyProfile::default());
    assert_eq!(game.status(), GameStatus::Playing);
    assert_eq!(game.crowd().len(), 30);
    assert_eq!(game.crowd().raised().count(), 5);
    assert!(game.history().is_empty());

    let snap = game.snapshot().await.unwrap();
    assert_eq!(snap.tick, 0);
    assert_eq!(snap.price, 100.0);
}

#[tokio::test]
async fn actions_before_start_fail() {
    let mut game = game(ScriptedDialogue::new());
    let err = game.call_on(MemberId::new()).await.unwrap_err();
    assert!(matches!(err, GameError::NotPlaying));
    assert!(matches!(game.finish().await, Err(GameError::NotPlaying)));
}

#[tokio::test]
async fn call_on_opens_conversation() {
    let mut game = started(ScriptedDialogue::new()).await;
    let id = first_raised(&game);

    let question = game.call_on(id).await.unwrap();
    let persona = game.active_persona().unwrap().clone();
    assert!(question.transcript.starts_with(&persona.name));

    let member = game.crowd().get(id).unwrap();
    assert!(member.is_talking);
    assert!(!member.has_question);
    assert_eq!(game.history().len(), 1);
    assert_eq!(game.history().turns()[0].message.role, Role::Assistant);
    assert_eq!(game.history().turns()[0].speaker, persona.name);
}

#[tokio::test]
async fn member_without_question_cannot_be_called() {
    let mut game = started(ScriptedDialogue::new()).await;
    let id = game
        .crowd()
        .members()
        .iter()
        .find(|m| !m.has_question)
        .unwrap()
        .id;

    let err = game.call_on(id).await.unwrap_err();
    assert!(matches!(err, GameError::Core(CoreError::NoQuestion(_))));
    assert!(game.history().is_empty());
    assert!(game.crowd().talking().is_none());
}

#[tokio::test]
async fn answer_needs_a_reporter() {
    let mut game = started(ScriptedDialogue::new().with_evaluation(0.5, false)).await;
    let err = game.answer(&wav()).await.unwrap_err();
    assert!(matches!(err, GameError::NoActiveConversation));
}

#[tokio::test]
async fn judged_answer_moves_market_and_commits() {
    let mut game = started(ScriptedDialogue::new().with_evaluation(1.0, false)).await;
    game.call_on(first_raised(&game)).await.unwrap();

    let outcome = game.answer(&wav()).await.unwrap();
    assert_eq!(outcome.evaluation.score, 1.0);
    assert!(!outcome.conversation_ended);
    assert_eq!(outcome.price.trend, 1.0);
    assert!((10..=100).contains(&outcome.price.trend_remaining_steps));

    let turns = game.history().turns();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[1].message.role, Role::User);
    assert!(turns[1].message.has_audio());
    assert_eq!(turns[1].score, Some(1.0));
    assert_eq!(turns[1].speaker, "Mr. Ballmer");
    assert_eq!(turns[2].message.text_content(), outcome.reply.transcript);

    // positive trend with volatility 10 pushes every tick up
    game.tick().await.unwrap();
    let snap = game.snapshot().await.unwrap();
    assert!(snap.price >= 100.0);
    assert!(game.active_persona().is_some());
}

#[tokio::test]
async fn failed_evaluation_commits_nothing() {
    let script = ScriptedDialogue::new()
        .with_failure(DialogueError::MissingToolCall("generate_evaluation_score"))
        .with_evaluation(-0.5, false);
    let mut game = started(script).await;
    game.call_on(first_raised(&game)).await.unwrap();

    let err = game.answer(&wav()).await.unwrap_err();
    assert!(matches!(err, GameError::Service(_)));
    assert_eq!(game.history().len(), 1);
    let snap = game.snapshot().await.unwrap();
    assert_eq!(snap.trend, 0.0);
    assert_eq!(snap.trend_remaining_steps, 0);

    let outcome = game.answer(&wav()).await.unwrap();
    assert_eq!(outcome.price.trend, -0.5);
    assert_eq!(game.history().len(), 3);
}

#[tokio::test]
async fn failed_reply_leaves_market_and_history_untouched() {
    let script = ScriptedDialogue::new()
        .with_evaluation(-1.0, false)
        .with_evaluation(-1.0, false)
        .with_reply_failure(DialogueError::MalformedResponse("boom".into()));
    let mut game = started(script).await;
    game.call_on(first_raised(&game)).await.unwrap();

    let err = game.answer(&wav()).await.unwrap_err();
    assert!(matches!(err, GameError::Service(_)));
    assert_eq!(game.history().len(), 1);
    let snap = game.snapshot().await.unwrap();
    assert_eq!(snap.trend, 0.0);
    assert_eq!(snap.trend_remaining_steps, 0);
    assert!(game.active_persona().is_some());

    let outcome = game.answer(&wav()).await.unwrap();
    assert_eq!(outcome.price.trend, -1.0);
    assert!(outcome.price.trend_remaining_steps >= 10);
    assert_eq!(game.history().len(), 3);
}

#[tokio::test]
async fn unreadable_audio_is_input_error() {
    let mut game = started(ScriptedDialogue::new().with_evaluation(0.5, false)).await;
    game.call_on(first_raised(&game)).await.unwrap();

    let err = game.answer(b"not a wav file").await.unwrap_err();
    assert!(matches!(err, GameError::Input(_)));
    assert_eq!(game.history().len(), 1);
}

#[tokio::test]
async fn ended_exchange_reseats_reporter() {
    let mut game = started(ScriptedDialogue::new().with_evaluation(-0.2, true)).await;
    let id = first_raised(&game);
    game.call_on(id).await.unwrap();

    let outcome = game.answer(&wav()).await.unwrap();
    assert!(outcome.conversation_ended);
    assert!(game.active_persona().is_none());
    assert!(game.crowd().talking().is_none());
    assert!(game.crowd().raised().count() > 0);
    assert!(!game.crowd().get(id).unwrap().is_talking);

    let err = game.answer(&wav()).await.unwrap_err();
    assert!(matches!(err, GameError::NoActiveConversation));
}

#[tokio::test]
async fn round_resets_when_everyone_has_talked() {
    let solo = Persona::new("Only Reporter", "One Network", "Asks everything.", Voice::Sage);
    let mut game = Game::new(
        ScriptedDialogue::new().with_evaluation(0.1, true),
        PassthroughTranscoder,
        config(),
    )
    .unwrap()
    .with_roster(vec![solo])
    .unwrap();
    game.start_game().await.unwrap();

    game.call_on(first_raised(&game)).await.unwrap();
    assert!(game.talked().is_empty());

    game.answer(&wav()).await.unwrap();
    assert_eq!(game.crowd().raised().count(), 5);
}

#[tokio::test]
async fn calling_another_member_switches_reporter() {
    let mut game = started(ScriptedDialogue::new()).await;
    let raised: Vec<MemberId> = game.crowd().raised().map(|m| m.id).collect();

    game.call_on(raised[0]).await.unwrap();
    game.call_on(raised[1]).await.unwrap();

    assert_eq!(game.crowd().talking().unwrap().id, raised[1]);
    assert!(!game.crowd().get(raised[0]).unwrap().is_talking);
    assert_eq!(game.history().len(), 2);
}

#[tokio::test]
async fn finish_closes_market_and_blocks_turns() {
    let mut game = started(ScriptedDialogue::new()).await;
    game.tick().await.unwrap();
    game.tick().await.unwrap();
    let epoch = game.epoch();

    let summary = game.finish().await.unwrap();
    assert_eq!(summary.ticks, 2);
    assert_eq!(game.status(), GameStatus::Finished);
    assert!(game.epoch() > epoch);

    assert_eq!(game.snapshot().await.unwrap().tick, 2);
    assert_eq!(game.price_history().await.unwrap().len(), 2);
    assert!(matches!(game.tick().await, Err(GameError::MarketClosed)));

    let id = first_raised(&game);
    assert!(matches!(game.call_on(id).await, Err(GameError::NotPlaying)));
    assert_eq!(game.finish().await.unwrap(), summary);
}

#[tokio::test]
async fn expired_clock_ends_game() {
    let mut game = Game::new(
        ScriptedDialogue::new(),
        PassthroughTranscoder,
        config().with_duration_secs(1),
    )
    .unwrap();
    game.start_game().await.unwrap();
    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert!(game.is_expired());

    let id = first_raised(&game);
    assert!(matches!(game.call_on(id).await, Err(GameError::NotPlaying)));
    assert_eq!(game.status(), GameStatus::Finished);
}

#[tokio::test]
async fn restart_resets_history() {
    let mut game = started(ScriptedDialogue::new()).await;
    game.call_on(first_raised(&game)).await.unwrap();
    game.finish().await.unwrap();

    game.start_game().await.unwrap();
    assert_eq!(game.status(), GameStatus::Playing);
    assert!(game.history().is_empty());
    assert!(game.crowd().talking().is_none());
}

#[test]
fn zero_duration_is_rejected() {
    let err = Game::new(
        ScriptedDialogue::new(),
        PassthroughTranscoder,
        GameConfig::default().with_duration_secs(0),
    )
    .err()
    .unwrap();
    assert!(matches!(err, GameError::Core(CoreError::InvalidDuration)));
}
