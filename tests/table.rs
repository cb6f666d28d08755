use schafkopf_rs::action::{Action, ActionKind, ActionValidationCode};
use schafkopf_rs::agents::{AiAgent, BotProfile, Difficulty};
use schafkopf_rs::controller::Controller;
use schafkopf_rs::engine::{GameEngine, TurnSource};
use schafkopf_rs::rules::GameRules;
use schafkopf_rs::seat::PlayerPosition;
use schafkopf_rs::table::Table;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

fn bot(seed: u64) -> Box<AiAgent> {
    Box::new(AiAgent::standard(
        BotProfile::for_difficulty(Difficulty::Hard).with_seed(seed).with_delay_ms(0, 0),
    ))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_submissions_apply_once() {
    let controller = Arc::new(Controller::new(GameRules::default(), 3));
    let bottom = controller.subscribe_player(Some(PlayerPosition::Bottom)).unwrap();
    let pass = Action::new(bottom.id(), PlayerPosition::Bottom, ActionKind::ChooseGame(None));

    let mut racers = JoinSet::new();
    for _ in 0..16 {
        let c = Arc::clone(&controller);
        racers.spawn(async move { c.submit(pass) });
    }
    let mut codes = Vec::new();
    while let Some(code) = racers.join_next().await {
        codes.push(code.unwrap());
    }
    let wins = codes.iter().filter(|c| c.is_success()).count();
    assert_eq!(wins, 1);
    assert!(codes.iter().all(|&c| c.is_success() || c == ActionValidationCode::WrongTurn));
    assert_eq!(controller.history_len(), 1);
    assert_eq!(controller.turn(), Some(PlayerPosition::Left));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn seat_tasks_play_until_stopped() {
    schafkopf_rs::telemetry::init_test_tracing();
    let controller = Arc::new(Controller::new(GameRules::default(), 17));
    let mut table = Table::new(Arc::clone(&controller)).with_poll_interval(Duration::from_millis(5));
    for pos in PlayerPosition::ALL {
        let handle = controller.subscribe_player(Some(pos)).unwrap();
        table.seat_agent(handle, bot(pos.index() as u64));
    }

    let played = tokio::time::timeout(Duration::from_secs(30), async {
        while controller.games_played() < 3 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(played.is_ok(), "bots stalled at {:?}", controller);

    let reports = table.shutdown().await;
    let seats: Vec<_> = reports.iter().map(|r| r.position).collect();
    assert_eq!(seats, PlayerPosition::ALL.to_vec());
    assert!(reports.iter().all(|r| r.submitted > 0));
    for log in controller.completed_games() {
        assert!(log.replay().is_ok());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn idle_seat_stops_on_shutdown() {
    let controller = Arc::new(Controller::new(GameRules::default(), 2));
    let mut table = Table::new(Arc::clone(&controller));
    // Bottom opens but nobody sits there, so Left never gets a turn.
    let left = controller.subscribe_player(Some(PlayerPosition::Left)).unwrap();
    table.seat_agent(left, bot(1));
    tokio::time::sleep(Duration::from_millis(50)).await;

    let reports = tokio::time::timeout(Duration::from_secs(5), table.shutdown()).await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].submitted, 0);
    assert_eq!(controller.history_len(), 0);
}
