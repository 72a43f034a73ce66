use anyhow::{Context, Result, bail};
use httpspan::http::trace::Trace;
use httpspan::{MessageKind, Outcome, Parser, Settings};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

const USAGE: &str = "usage: httpspan [--response] [--lenient] [--restart] [--chunk-size N] [FILE]";

struct Args {
    kind: MessageKind,
    lenient: bool,
    restart: bool,
    chunk_size: usize,
    path: Option<String>,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = Args {
            kind: MessageKind::Request,
            lenient: false,
            restart: false,
            chunk_size: 4096,
            path: None,
        };
        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--response" => args.kind = MessageKind::Response,
                "--lenient" => args.lenient = true,
                "--restart" => args.restart = true,
                "--chunk-size" => {
                    let value = iter.next().context(USAGE)?;
                    args.chunk_size = value
                        .parse()
                        .with_context(|| format!("invalid chunk size {value}"))?;
                    if args.chunk_size == 0 {
                        bail!("chunk size must be at least 1");
                    }
                }
                "-h" | "--help" => bail!(USAGE),
                _ if arg.starts_with('-') => bail!("unknown option {arg}\n{USAGE}"),
                _ => args.path = Some(arg),
            }
        }
        Ok(args)
    }
}

/// Feeds `input` to the parser `chunk_size` bytes at a time and prints the
/// trace. Returns once the stream ends, the parser pauses or fails.
async fn run<R: AsyncRead + Unpin>(mut input: R, args: &Args, settings: Settings) -> Result<()> {
    let mut parser = Parser::with_settings(args.kind, settings);
    let mut trace = Trace::new();
    let mut stdout = tokio::io::stdout();
    let mut buf = vec![0u8; args.chunk_size];

    loop {
        let n = input.read(&mut buf).await?;
        let result = if n == 0 {
            parser.finish(&mut trace).map(|_| None)
        } else {
            parser.consume(&buf[..n], &mut trace).map(Some)
        };

        for line in trace.drain() {
            stdout.write_all(line.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }

        match result {
            Ok(None) => break,
            Ok(Some(Outcome::Consumed(_))) => {}
            Ok(Some(Outcome::Paused(at))) => {
                tracing::info!(offset = at, "parser paused, remaining input belongs to the upgraded protocol");
                break;
            }
            Err(e) => {
                stdout.flush().await?;
                return Err(e.into());
            }
        }
    }

    stdout.flush().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let args = Args::parse()?;
    let mut settings = Settings::load()?;
    if args.lenient {
        settings.strict = false;
        settings.allow_lf_without_cr = true;
    }
    if args.restart {
        settings.restart_after_complete = true;
    }
    tracing::debug!(?settings, "parser settings");

    let work = async {
        match &args.path {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("failed to open {path}"))?;
                run(file, &args, settings).await
            }
            None => run(tokio::io::stdin(), &args, settings).await,
        }
    };

    tokio::select! {
        res = work => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
        }
    }

    Ok(())
}
