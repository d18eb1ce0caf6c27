use rand::rngs::SmallRng;
use rand::SeedableRng;
use skirmish::core::{Board, MatchEngine, MatchState, Phase, Piece, Side};
use skirmish::protocol::cell_sequence;
use skirmish::{
    serve_connection, AiPlayer, ClientNode, GameHandle, InMemoryTransport, MatchCoordinator,
    ServerMessage, Transport,
};
use tokio::time::{timeout, Duration};

const WAIT: Duration = Duration::from_secs(5);

async fn recv_msg(t: &mut InMemoryTransport) -> ServerMessage {
    let frame = timeout(WAIT, t.recv()).await.expect("timed out").expect("closed");
    ServerMessage::decode(&frame).unwrap()
}

async fn connect(handle: &GameHandle) -> InMemoryTransport {
    let (server, client) = InMemoryTransport::pair();
    let handle = handle.clone();
    tokio::spawn(async move { serve_connection(handle, Box::new(server)).await });
    client
}

async fn wait_for(handle: &GameHandle, pred: impl Fn(&MatchState) -> bool) -> MatchState {
    timeout(WAIT, async {
        loop {
            let state = handle.snapshot().await.unwrap();
            if pred(&state) {
                return state;
            }
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("state never reached")
}

/// Seat A then B and consume the init/start messages.
async fn seat_both(handle: &GameHandle) -> (InMemoryTransport, InMemoryTransport) {
    let mut a = connect(handle).await;
    assert!(matches!(recv_msg(&mut a).await, ServerMessage::Init { player_id: Side::A, .. }));
    let mut b = connect(handle).await;
    assert!(matches!(recv_msg(&mut b).await, ServerMessage::Init { player_id: Side::B, .. }));
    assert_eq!(recv_msg(&mut a).await, ServerMessage::start(Side::A));
    assert_eq!(recv_msg(&mut b).await, ServerMessage::start(Side::A));
    (a, b)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_init_start_and_update_broadcast() -> anyhow::Result<()> {
    let (handle, _task) = MatchCoordinator::spawn();

    let mut a = connect(&handle).await;
    match recv_msg(&mut a).await {
        ServerMessage::Init { player_id, board } => {
            assert_eq!(player_id, Side::A);
            assert_eq!(board, cell_sequence(&Board::initial()));
        }
        other => panic!("expected init, got {:?}", other),
    }
    let state = handle.snapshot().await?;
    assert_eq!(state.phase, Phase::Waiting);

    let mut b = connect(&handle).await;
    assert!(matches!(recv_msg(&mut b).await, ServerMessage::Init { player_id: Side::B, .. }));
    assert_eq!(recv_msg(&mut a).await, ServerMessage::start(Side::A));
    assert_eq!(recv_msg(&mut b).await, ServerMessage::start(Side::A));
    assert_eq!(handle.snapshot().await?.phase, Phase::InProgress);

    a.send(r#"{"character":"A-P1","move":"Backward"}"#).await?;
    let mut cells = *Board::initial().cells();
    cells[5] = cells[0].take();
    let expected = Board::from_cells(cells).unwrap();
    let update = ServerMessage::update(&expected, Side::B);
    assert_eq!(recv_msg(&mut a).await, update);
    assert_eq!(recv_msg(&mut b).await, update);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejections_reply_to_sender_only() -> anyhow::Result<()> {
    let (handle, _task) = MatchCoordinator::spawn();
    let (mut a, mut b) = seat_both(&handle).await;

    b.send(r#"{"character":"B-P1","move":"Forward"}"#).await?;
    assert_eq!(recv_msg(&mut b).await, ServerMessage::error("Not your turn!"));

    a.send(r#"{"character":"A-P1","move":"Forward"}"#).await?;
    assert_eq!(recv_msg(&mut a).await, ServerMessage::error("Invalid move!"));

    a.send("{not json").await?;
    assert_eq!(recv_msg(&mut a).await, ServerMessage::error("Invalid JSON format."));

    // b saw none of a's errors: its next message is the update from a's move
    a.send(r#"{"character":"A-P3","move":"B"}"#).await?;
    assert!(matches!(recv_msg(&mut b).await, ServerMessage::Update { current_turn: Side::B, .. }));
    assert!(matches!(recv_msg(&mut a).await, ServerMessage::Update { current_turn: Side::B, .. }));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_third_connection_is_refused() -> anyhow::Result<()> {
    let (handle, _task) = MatchCoordinator::spawn();
    let (_a, _b) = seat_both(&handle).await;

    let mut c = connect(&handle).await;
    assert_eq!(recv_msg(&mut c).await, ServerMessage::error("Game is already full."));
    assert!(timeout(WAIT, c.recv()).await?.is_err());

    let state = handle.snapshot().await?;
    assert_eq!(state.phase, Phase::InProgress);
    assert_eq!(state.board, Board::initial());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_leaving_pauses_and_empty_table_resets() -> anyhow::Result<()> {
    let (handle, _task) = MatchCoordinator::spawn();
    let (mut a, b) = seat_both(&handle).await;

    a.send(r#"{"character":"A-H1","move":"Backward"}"#).await?;
    recv_msg(&mut a).await;

    drop(b);
    let state = wait_for(&handle, |s| s.phase == Phase::Waiting).await;
    assert_eq!(state.current_turn, Side::B);
    assert_ne!(state.board, Board::initial());

    // a newcomer takes the vacant seat and the match resumes where it paused
    let mut c = connect(&handle).await;
    assert!(matches!(recv_msg(&mut c).await, ServerMessage::Init { player_id: Side::B, .. }));
    let resumed = ServerMessage::update(&state.board, Side::B);
    for client in [&mut a, &mut c] {
        assert_eq!(recv_msg(client).await, ServerMessage::start(Side::B));
        assert_eq!(recv_msg(client).await, resumed);
    }
    assert_eq!(handle.snapshot().await?.phase, Phase::InProgress);

    drop(a);
    drop(c);
    wait_for(&handle, |s| *s == MatchState::initial()).await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_winning_move_ends_and_resets_match() -> anyhow::Result<()> {
    let a_piece: Piece = "A-P1".parse()?;
    let b_piece: Piece = "B-P1".parse()?;
    let engine = MatchEngine::from_state(MatchState {
        board: Board::with_pieces(&[(a_piece, 5), (b_piece, 0)]),
        ..MatchState::initial()
    });
    let (handle, _task) = MatchCoordinator::spawn_with(engine);

    let mut a = connect(&handle).await;
    recv_msg(&mut a).await;
    let mut b = connect(&handle).await;
    recv_msg(&mut b).await;
    recv_msg(&mut a).await;
    recv_msg(&mut b).await;

    a.send(r#"{"character":"A-P1","move":"Forward"}"#).await?;
    for client in [&mut a, &mut b] {
        match recv_msg(client).await {
            ServerMessage::Update { board, current_turn } => {
                assert_eq!(board[0], "A-P1");
                assert_eq!(board[5], "");
                assert!(!board.iter().any(|c| c.starts_with('B')));
                assert_eq!(current_turn, Side::A);
            }
            other => panic!("expected update, got {:?}", other),
        }
        assert_eq!(recv_msg(client).await, ServerMessage::game_over(Side::A));
        assert!(timeout(WAIT, client.recv()).await?.is_err(), "seat should be closed");
    }

    wait_for(&handle, |s| *s == MatchState::initial()).await;

    // a fresh match is open for new players
    let mut next = connect(&handle).await;
    assert!(matches!(recv_msg(&mut next).await, ServerMessage::Init { player_id: Side::A, .. }));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_client_taking_a_vacated_seat_plays_on() -> anyhow::Result<()> {
    let (handle, _task) = MatchCoordinator::spawn();
    let (mut a, b) = seat_both(&handle).await;

    a.send(r#"{"character":"A-P2","move":"Backward"}"#).await?;
    recv_msg(&mut a).await;
    drop(b);
    let paused = wait_for(&handle, |s| s.phase == Phase::Waiting).await;

    let (server, client) = InMemoryTransport::pair();
    tokio::spawn(serve_connection(handle.clone(), Box::new(server)));
    let node = tokio::spawn(async move {
        let mut node = ClientNode::new(Box::new(AiPlayer::new()), Box::new(client));
        let mut rng = SmallRng::seed_from_u64(5);
        node.run(&mut rng).await
    });

    assert_eq!(recv_msg(&mut a).await, ServerMessage::start(Side::B));
    assert_eq!(recv_msg(&mut a).await, ServerMessage::update(&paused.board, Side::B));
    // the newcomer holds B and it is B's turn, so its move comes next
    match recv_msg(&mut a).await {
        ServerMessage::Update { board, current_turn } => {
            assert_eq!(current_turn, Side::A);
            assert_ne!(board, cell_sequence(&paused.board));
            assert_eq!(board[6], "A-P2");
        }
        other => panic!("expected the resumed client's move, got {:?}", other),
    }

    node.abort();
    Ok(())
}

fn updates(seen: &[ServerMessage]) -> Vec<&ServerMessage> {
    seen.iter()
        .filter(|m| matches!(m, ServerMessage::Update { .. }))
        .collect()
}

fn errors(seen: &[ServerMessage]) -> Vec<&str> {
    seen.iter()
        .filter_map(|m| match m {
            ServerMessage::Error { message } => Some(message.as_str()),
            _ => None,
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_simultaneous_moves_are_serialized() -> anyhow::Result<()> {
    let (handle, _task) = MatchCoordinator::spawn();
    let (a, b) = seat_both(&handle).await;
    let (mut reader_a, writer_a) = Box::new(a).split();
    let (mut reader_b, writer_b) = Box::new(b).split();

    let burst = |mut writer: Box<dyn skirmish::transport::FrameWriter>, frames: [&'static str; 4]| {
        tokio::spawn(async move {
            for frame in frames {
                writer.send(frame).await?;
            }
            // keep the writer: dropping it would end the connection
            anyhow::Ok(writer)
        })
    };
    let sender_a = burst(
        writer_a,
        [
            r#"{"character":"A-P1","move":"Backward"}"#,
            r#"{"character":"A-P2","move":"Backward"}"#,
            r#"{"character":"A-H1","move":"Backward"}"#,
            r#"{"character":"A-P3","move":"Backward"}"#,
        ],
    );
    let sender_b = burst(
        writer_b,
        [
            r#"{"character":"B-P1","move":"Forward"}"#,
            r#"{"character":"B-P2","move":"Forward"}"#,
            r#"{"character":"B-H1","move":"Forward"}"#,
            r#"{"character":"B-P3","move":"Forward"}"#,
        ],
    );
    let _writer_a = sender_a.await??;
    let _writer_b = sender_b.await??;

    // every submission yields exactly one outcome: a broadcast update or an
    // error to its sender
    let mut seen_a = Vec::new();
    let mut seen_b = Vec::new();
    timeout(WAIT, async {
        loop {
            let outcomes = updates(&seen_a).len() + errors(&seen_a).len() + errors(&seen_b).len();
            if outcomes == 8 && updates(&seen_b).len() == updates(&seen_a).len() {
                return anyhow::Ok(());
            }
            tokio::select! {
                frame = reader_a.recv() => seen_a.push(ServerMessage::decode(&frame?)?),
                frame = reader_b.recv() => seen_b.push(ServerMessage::decode(&frame?)?),
            }
        }
    })
    .await??;

    let accepted = updates(&seen_a);
    assert!(!accepted.is_empty());
    assert_eq!(accepted, updates(&seen_b));
    for (i, update) in accepted.iter().enumerate() {
        let expected = if i % 2 == 0 { Side::B } else { Side::A };
        assert!(
            matches!(update, ServerMessage::Update { current_turn, .. } if *current_turn == expected),
            "update {} out of turn order: {:?}",
            i,
            update
        );
    }
    for message in errors(&seen_a).into_iter().chain(errors(&seen_b)) {
        assert!(
            message == "Not your turn!" || message == "Invalid move!",
            "unexpected rejection: {}",
            message
        );
    }

    let state = handle.snapshot().await?;
    assert_eq!(state.phase, Phase::InProgress);
    assert!(Board::from_cells(*state.board.cells()).is_some(), "a piece appears twice");
    assert_eq!(state.board.cells().iter().flatten().count(), 10);
    assert_eq!(
        accepted.last().copied(),
        Some(&ServerMessage::update(&state.board, state.current_turn))
    );
    Ok(())
}
