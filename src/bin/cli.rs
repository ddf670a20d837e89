//! quickmaps CLI
//!
//! Command-line access to the coordinate field: clean form input, split a
//! coordinate back into inputs, and check/normalize/encode stored values.

use std::fs;
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use quickmaps::{
    Config, Coordinate, LatLngColumn, MapField, MapWidget, MultiValueField, QuickmapsError,
    RawValue, Result,
};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

/// quickmaps CLI
#[derive(Parser, Debug)]
#[command(name = "quickmaps-cli")]
#[command(about = "Clean, normalize and encode latitude/longitude field values")]
#[command(version)]
struct Args {
    /// Treat a blank submission as the unset coordinate instead of an error
    #[arg(long, global = true)]
    optional: bool,

    /// Reject the empty coordinate when validating stored values
    #[arg(long, global = true)]
    no_blank: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clean submitted latitude/longitude inputs into a coordinate
    Compress {
        /// Latitude input
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,

        /// Longitude input
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<String>,

        /// Tick the clear checkbox
        #[arg(long)]
        clear: bool,
    },

    /// Split a coordinate into [latitude, longitude, clear]
    Decompress(Input),

    /// Check a stored value against the two-key invariant
    Validate(Input),

    /// Normalize a stored value into its canonical form
    Normalize(Input),

    /// Encode a stored value into a hex column blob
    Encode(Input),

    /// Decode a hex column blob
    Decode {
        /// Hex-encoded blob
        hex: String,
    },

    /// Print the map widget template context for a value
    Context {
        /// Field name
        #[arg(long, default_value = "location")]
        name: String,

        /// Widget id (defaults to id_{name})
        #[arg(long)]
        id: Option<String>,

        #[command(flatten)]
        input: Input,
    },
}

/// A JSON value given inline or read from a file
#[derive(ClapArgs, Debug)]
struct Input {
    /// JSON value
    value: Option<String>,

    /// Read the JSON value from a file
    #[arg(short, long, conflicts_with = "value")]
    file: Option<PathBuf>,
}

impl Input {
    fn read(&self) -> Result<Value> {
        let text = match (&self.value, &self.file) {
            (Some(value), _) => value.clone(),
            (None, Some(path)) => fs::read_to_string(path)?,
            (None, None) => "null".to_string(),
        };
        Ok(serde_json::from_str(&text)?)
    }
}

fn main() {
    // Logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,quickmaps=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .required(!args.optional)
        .blank(!args.no_blank)
        .build();

    match run(args.command, config) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(command: Commands, config: Config) -> Result<String> {
    config.validate()?;
    let column = LatLngColumn::new(config.clone());

    match command {
        Commands::Compress { lat, lng, clear } => {
            let field = MapField::new(&config);
            let data = [RawValue::from(lat), RawValue::from(lng), RawValue::Bool(clear)];
            let coordinate = field.clean(&data)?;
            Ok(serde_json::to_string(&coordinate)?)
        }
        Commands::Decompress(input) => {
            let coordinate = column.prepare(Some(&input.read()?))?;
            let parts = MapWidget::new(&config).decompress(&coordinate);
            Ok(serde_json::to_string(&parts)?)
        }
        Commands::Validate(input) => {
            column.validate(&input.read()?)?;
            Ok("ok".to_string())
        }
        Commands::Normalize(input) => {
            let value = column.prepare_value(Some(&input.read()?))?;
            Ok(value.to_string())
        }
        Commands::Encode(input) => {
            let coordinate = column.clean(&input.read()?)?;
            Ok(to_hex(&column.to_db(&coordinate)?))
        }
        Commands::Decode { hex } => {
            let coordinate = column.from_db(&from_hex(&hex)?)?;
            Ok(serde_json::to_string(&coordinate)?)
        }
        Commands::Context { name, id, input } => {
            let coordinate: Coordinate = column.prepare(Some(&input.read()?))?;
            let id = id.unwrap_or_else(|| format!("id_{}", name));
            let context = MapWidget::new(&config).context(&name, &id, &coordinate);
            Ok(serde_json::to_string_pretty(&context)?)
        }
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn from_hex(hex: &str) -> Result<Vec<u8>> {
    let hex = hex.trim();
    if !hex.is_ascii() || hex.len() % 2 != 0 {
        return Err(QuickmapsError::Serialization(format!(
            "not a hex string: {:?}",
            hex
        )));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| {
                QuickmapsError::Serialization(format!("invalid hex at offset {}: {}", i, e))
            })
        })
        .collect()
}
