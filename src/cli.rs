//! Replay harness for the pairing policy.
//!
//! Provides subcommands for:
//! - Replaying recorded pairing broadcasts through the policy (`replay`)
//! - Printing the variant to action table (`policy`)

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::config::PairingPolicyConfig;
use crate::error::{Error, Result};
use crate::pairing::{DryRunControl, PairingPolicyHandler};
use crate::receiver::{PairingBroadcast, PairingReceiver, ReceiverSummary, spawn_receiver};
use crate::telemetry::LogFormat;

/// Broadcasts buffered between the reader and the receiver task.
const CHANNEL_CAPACITY: usize = 32;

#[derive(Parser, Debug)]
#[command(name = "btautopin")]
#[command(about = "Headless Bluetooth pairing responder")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay JSON-lines pairing broadcasts against a dry-run pairing API
    Replay {
        /// File of broadcasts, one JSON object per line (stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Print the variant to action table
    Policy,
}

/// Run a CLI command.
pub async fn run_command(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Replay { input } => {
            let summary = match input {
                Some(path) => replay_file(&path).await?,
                None => replay(BufReader::new(tokio::io::stdin())).await?,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Command::Policy => {
            print_policy(&PairingPolicyConfig::shared());
            Ok(())
        }
    }
}

async fn replay_file(path: &Path) -> Result<ReceiverSummary> {
    let file = tokio::fs::File::open(path).await?;
    replay(BufReader::new(file)).await
}

/// Feed every broadcast from `reader` through a dry-run receiver.
///
/// Blank lines are skipped; malformed lines are logged and skipped.
pub async fn replay<R>(reader: R) -> Result<ReceiverSummary>
where
    R: AsyncBufRead + Unpin,
{
    let handler = PairingPolicyHandler::new(DryRunControl, PairingPolicyConfig::shared());
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let task = spawn_receiver(PairingReceiver::new(handler), rx);

    let mut lines = reader.lines();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<PairingBroadcast>(&line) {
            Ok(broadcast) => {
                if tx.send(broadcast).await.is_err() {
                    return Err(Error::ReceiverStopped);
                }
            }
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Skipping malformed broadcast");
            }
        }
    }
    drop(tx);

    Ok(task.await?)
}

fn print_policy(config: &PairingPolicyConfig) {
    println!("{:<24} {:>6}  ACTION", "VARIANT", "CODE");
    for (variant, action) in config.policy_table() {
        println!("{:<24} {:>6}  {}", variant.to_string(), variant.code(), action);
    }
    println!("{:<24} {:>6}  {}", "(any other)", "-", crate::pairing::PairingAction::Ignore);
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn test_replay_counts_and_skips_malformed_lines() {
        let input = concat!(
            r#"{"action":"android.bluetooth.device.action.PAIRING_REQUEST","device":"AA:BB:CC:DD:EE:FF","variant":0}"#,
            "\n",
            "not json\n",
            "\n",
            r#"{"action":"android.bluetooth.device.action.PAIRING_REQUEST","device":"AA:BB:CC:DD:EE:FF","variant":7}"#,
            "\n",
            r#"{"action":"android.bluetooth.device.action.PAIRING_REQUEST","variant":3}"#,
            "\n",
        );

        let summary = replay(BufReader::new(input.as_bytes())).await.unwrap();
        assert_eq!(summary.pin_injected, 2);
        assert_eq!(summary.ignored, 1);
        assert_eq!(summary.handled(), 3);
    }

    #[tokio::test]
    async fn test_replay_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"action":"android.bluetooth.device.action.PAIRING_REQUEST","device":"AA:BB:CC:DD:EE:FF","variant":2}}"#
        )
        .unwrap();

        let summary = replay_file(file.path()).await.unwrap();
        assert_eq!(summary.confirmed_without_pin, 1);
    }

    #[tokio::test]
    async fn test_replay_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = replay_file(&dir.path().join("missing.jsonl"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_replay_error_converts_into_anyhow() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_command(Command::Replay {
            input: Some(dir.path().join("missing.jsonl")),
        })
        .await;
        let err = result.unwrap_err();
        assert!(err.downcast_ref::<Error>().is_some());
    }

    #[test]
    fn test_cli_parses_replay() {
        let cli = Cli::try_parse_from(["btautopin", "--log-format", "json", "replay", "-i", "x.jsonl"])
            .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Command::Replay { input: Some(_) }));
    }

    #[test]
    fn test_cli_has_no_pin_flag() {
        assert!(Cli::try_parse_from(["btautopin", "replay", "--pin", "1234"]).is_err());
    }
}
