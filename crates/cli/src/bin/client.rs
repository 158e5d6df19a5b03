//! Client entry point: a thin relay between stdin lines and the
//! coordinator's wire protocol. No interactive prettifying — one line in,
//! one reply out.

use std::path::PathBuf;

use clap::Parser;
use cli::ClusterConfig;
use corelib::Record;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[derive(Parser)]
#[command(about = "Interactive client for the key-value cluster")]
struct Args {
    /// Override path for the cluster discovery file.
    #[arg(long, default_value_os_t = ClusterConfig::default_path())]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::init_logging();
    let args = Args::parse();

    let coordinator = ClusterConfig::read(&args.config)?;
    let stream = TcpStream::connect((coordinator.ip.as_str(), coordinator.port)).await?;
    let (read_half, mut write_half) = stream.into_split();
    let mut server_reader = BufReader::new(read_half);

    let mut line = String::new();
    server_reader.read_line(&mut line).await?; // ack(connected)

    write_half.write_all(Record::identify_client().to_line().as_bytes()).await?;
    write_half.flush().await?;

    line.clear();
    server_reader.read_line(&mut line).await?; // ack(ready_to_serve)
    tracing::info!(reply = line.trim(), "connected to coordinator");

    let stdin = io::stdin();
    let mut stdin_reader = BufReader::new(stdin);
    let mut input = String::new();

    loop {
        input.clear();
        if stdin_reader.read_line(&mut input).await? == 0 {
            break;
        }
        if input.trim().is_empty() {
            continue;
        }

        write_half.write_all(input.as_bytes()).await?;
        if !input.ends_with('\n') {
            write_half.write_all(b"\n").await?;
        }
        write_half.flush().await?;

        line.clear();
        if server_reader.read_line(&mut line).await? == 0 {
            break;
        }
        print!("{line}");
    }

    Ok(())
}
