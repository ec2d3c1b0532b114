use {
    anyhow::Result,
    argh::FromArgs,
    at_qrcode::{Codec, QrCodec},
    serde_json::{Map, Value},
    tracing::debug,
    tracing_subscriber::EnvFilter,
};

/// Parse and validate AT fiscal document QR code strings.
#[derive(FromArgs)]
struct Args {
    /// reject irregular but interpretable input
    #[argh(switch)]
    strict: bool,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Parse(ParseArgs),
    Check(CheckArgs),
}

/// Print the fields of a QR code string as JSON.
#[derive(FromArgs)]
#[argh(subcommand, name = "parse")]
struct ParseArgs {
    /// the QR code string
    #[argh(positional)]
    code: String,
}

/// Validate a QR code string and print its canonical form.
#[derive(FromArgs)]
#[argh(subcommand, name = "check")]
struct CheckArgs {
    /// the QR code string
    #[argh(positional)]
    code: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Args = argh::from_env();
    let codec = if args.strict {
        QrCodec::strict()
    } else {
        QrCodec::default()
    };
    debug!(?codec, "codec configured");

    match args.command {
        Command::Parse(ParseArgs { code }) => {
            let record = codec.decode(&code)?;
            let fields: Map<String, Value> = record
                .iter()
                .map(|(field, value)| (field.name().to_owned(), Value::from(value)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&fields)?);
        }
        Command::Check(CheckArgs { code }) => {
            let record = codec.decode(&code)?;
            println!("{}", record.to_qr_string(true)?);
        }
    }
    Ok(())
}
