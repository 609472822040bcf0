use chestkeeper::config::Config;
use chestkeeper::host::{MemoryHost, MemorySender, WorldAccess};
use chestkeeper::input::parser::split_line;
use chestkeeper::models::types::{Location, PlayerId};
use chestkeeper::renderer::ansi::{strip_codes, to_ansi};
use chestkeeper::{CmdCtx, OpenOverride, Plugin, on_chest_open_attempt, process_command};
use clap::Parser;
use std::collections::HashMap;
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Drives the chest plugin from stdin against an in-memory server.
#[derive(Parser, Debug)]
#[command(name = "chestkeeper", version, about = "Special loot chests console")]
struct Args {
    /// TOML server configuration (defaults to the environment / .env)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Plugin data directory, overrides the configuration
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

/// Console session: the server, the plugin and the players seen so far.
struct Console {
    host: MemoryHost,
    plugin: Plugin,
    sender: MemorySender,
    players: HashMap<String, PlayerId>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };
    if let Some(dir) = args.data_dir {
        cfg.data_dir = dir;
    }

    let host = MemoryHost::with_worlds(cfg.worlds.iter().cloned());
    let plugin = Plugin::enable(cfg.data_dir.clone(), &host)?;
    let mut console = Console {
        host,
        plugin,
        sender: MemorySender::console(),
        players: HashMap::new(),
    };

    println!("{}", render(&chestkeeper::commands::banner()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let tokens = split_line(&line);
        let Some((cmd, rest)) = tokens.split_first() else {
            continue;
        };
        let res = match cmd.as_str() {
            "chest" => {
                console.chest(rest);
                Ok(())
            }
            "open" => console.open(rest),
            "block" => console.block(rest),
            "quit" | "exit" => break,
            other => Err(anyhow::anyhow!("unknown command {other:?}, try: chest, open, block, quit")),
        };
        if let Err(e) = res {
            eprintln!("{e}");
        }
        console.flush();
    }

    tracing::info!("console closed");
    Ok(())
}

impl Console {
    fn chest(&mut self, args: &[String]) {
        let mut rng = rand::rng();
        let mut ctx = CmdCtx {
            plugin: &mut self.plugin,
            host: &mut self.host,
            sender: &mut self.sender,
            rng: &mut rng,
        };
        if !process_command(args, &mut ctx) {
            println!("Usage: /chest <add|place|remove|reload|help> ...");
        }
    }

    /// open <player> <x> <y> <z> <world>
    fn open(&mut self, args: &[String]) -> anyhow::Result<()> {
        let [player, rest @ ..] = args else {
            anyhow::bail!("usage: open <player> <x> <y> <z> <world>");
        };
        let location = parse_location(rest)?;
        let id = *self.players.entry(player.clone()).or_default();

        let mut rng = rand::rng();
        match on_chest_open_attempt(&mut self.plugin, &self.host, &location, id, 0.0, &mut rng)? {
            None => println!("{location} is not a special chest"),
            Some(OpenOverride::AlreadyLooted(msg)) => println!("{}", render(&msg)),
            Some(OpenOverride::Present(inv)) => {
                let inv = inv.borrow();
                println!("{}", render(inv.title.as_deref().unwrap_or("Chest")));
                if inv.is_empty() {
                    println!("  (empty)");
                }
                for slot in 0..inv.size() {
                    if let Some(stack) = inv.get(slot) {
                        println!("  [{slot:2}] {} x{}", stack.item, stack.count);
                    }
                }
            }
        }
        Ok(())
    }

    /// block <x> <y> <z> <world>
    fn block(&self, args: &[String]) -> anyhow::Result<()> {
        let location = parse_location(args)?;
        let block = self.host.block_at(&location)?;
        println!("{location}: {block:?}");
        Ok(())
    }

    /// Prints what the console sender was told and what was broadcast since the last call.
    fn flush(&mut self) {
        for msg in self.sender.inbox.drain(..) {
            println!("{}", render(&msg));
        }
        for msg in self.host.broadcasts.drain(..) {
            println!("[broadcast] {}", render(&msg));
        }
    }
}

/// Colors for a terminal, plain text when piped.
fn render(text: &str) -> String {
    if std::io::stdout().is_terminal() {
        to_ansi(text)
    } else {
        strip_codes(text)
    }
}

fn parse_location(args: &[String]) -> anyhow::Result<Location> {
    let [x, y, z, world] = args else {
        anyhow::bail!("expected <x> <y> <z> <world>");
    };
    Ok(Location::new(world.as_str(), x.parse()?, y.parse()?, z.parse()?))
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, prelude::*};

    color_eyre::install().map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_timer(tracing_subscriber::fmt::time::uptime()),
        )
        .with(tracing_error::ErrorLayer::default())
        .init();
    Ok(())
}
