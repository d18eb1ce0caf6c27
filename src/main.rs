#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use skirmish::{
    init_logging, server, AiPlayer, CliPlayer, ClientNode, ClientOutcome, InMemoryTransport,
    MatchCoordinator, Player, ServerConfig, TcpTransport,
};
#[cfg(feature = "std")]
use skirmish::server::SeatedConnection;

#[cfg(feature = "std")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Debug)]
#[cfg(feature = "std")]
enum PlayerType {
    Human,
    Ai,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Host the match and wait for two players.
    Serve {
        #[arg(long, default_value = skirmish::config::DEFAULT_BIND)]
        bind: String,
        #[arg(long, default_value_t = skirmish::transport::tcp::MAX_FRAME_SIZE, help = "Largest accepted frame in bytes")]
        max_frame_bytes: u32,
        #[arg(long, default_value_t = 30, help = "Give up on a frame write after this many seconds")]
        write_timeout_secs: u64,
    },
    /// Join a match hosted by a server.
    Client {
        #[arg(long, default_value = "127.0.0.1:8080")]
        connect: String,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Two AI players against an in-process server.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 500, help = "Stop after this many moves per side")]
        max_moves: usize,
    },
}

#[cfg(feature = "std")]
fn rng_from(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            max_frame_bytes,
            write_timeout_secs,
        } => {
            let config = ServerConfig {
                bind,
                max_frame_size: max_frame_bytes,
                write_timeout: Duration::from_secs(write_timeout_secs),
            };
            server::run(config).await?;
        }
        Commands::Client {
            connect,
            player,
            seed,
        } => {
            println!("Connecting to {}...", connect);
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let transport = TcpTransport::connect(&connect).await?;
            println!("Connected successfully!");
            let player: Box<dyn Player> = match player {
                PlayerType::Human => Box::new(CliPlayer::new()),
                PlayerType::Ai => Box::new(AiPlayer::new()),
            };
            let mut rng = rng_from(seed);
            let mut node = ClientNode::new(player, Box::new(transport));
            report(node.run(&mut rng).await?);
        }
        Commands::Local { seed, max_moves } => {
            println!("Starting local AI vs AI game...");
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let mut rng_a = rng_from(seed);
            let mut rng_b = rng_from(seed.map(|s| s.wrapping_add(1)));

            let (handle, _coordinator) = MatchCoordinator::spawn();
            let (server_a, client_a) = InMemoryTransport::pair();
            let (server_b, client_b) = InMemoryTransport::pair();

            // seat A strictly before B
            for transport in [server_a, server_b] {
                if let Some(seated) = SeatedConnection::join(handle.clone(), Box::new(transport)).await? {
                    tokio::spawn(seated.run());
                }
            }
            let mut node_a = ClientNode::new(Box::new(AiPlayer::new()), Box::new(client_a))
                .with_move_limit(max_moves);
            let mut node_b = ClientNode::new(Box::new(AiPlayer::new()), Box::new(client_b))
                .with_move_limit(max_moves);

            tokio::select! {
                res = node_a.run(&mut rng_a) => println!("Player A: {:?}", res?),
                res = node_b.run(&mut rng_b) => println!("Player B: {:?}", res?),
            }
        }
    }
    Ok(())
}

#[cfg(feature = "std")]
fn report(outcome: ClientOutcome) {
    match outcome {
        ClientOutcome::Won => println!("\nVICTORY! You captured every enemy piece."),
        ClientOutcome::Lost => println!("\nDEFEAT. All your pieces were captured."),
        ClientOutcome::Refused => println!("\nThe game is already full."),
        ClientOutcome::Abandoned => println!("\nYou left the game."),
        ClientOutcome::Disconnected => println!("\nConnection to the server was lost."),
    }
}
