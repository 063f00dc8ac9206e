use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand};
use serde_json::json;

use blm_adapter::auth::{authenticate, CredentialCodec};

#[derive(Parser)]
#[command(name = "blm-cli")]
#[command(about = "Offline credential tooling for blm-adapter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a user/password pair into a Taosd token
    Encode { user: String, password: String },
    /// Decode a Taosd token
    Decode { token: String },
    /// Print ready-to-use Authorization headers for a user/password pair
    Header { user: String, password: String },
    /// Resolve an Authorization header the way the server does
    Check { header: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let codec = CredentialCodec::default();

    let output = match cli.command {
        Commands::Encode { user, password } => json!({ "token": codec.encode(&user, &password)? }),
        Commands::Decode { token } => {
            let (user, password) = codec.decode(&token)?;
            json!({ "user": user, "password": password })
        }
        Commands::Header { user, password } => json!({
            "basic": format!("Basic {}", STANDARD.encode(format!("{user}:{password}"))),
            "taosd": format!("Taosd {}", codec.encode(&user, &password)?),
        }),
        Commands::Check { header } => match authenticate(Some(header.as_str()), &codec) {
            Ok(identity) => json!({ "status": "ok", "user": identity.user }),
            Err(e) => json!({ "status": "error", "code": e.code(), "desc": e.to_string() }),
        },
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
