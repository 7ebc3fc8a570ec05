use std::io::{self, Write};

use crate::config::{DEFAULT_REDIRECT_URI, OAuthClientConfig, data_dir, ensure_directories, env_file_path};
use crate::error::{Error, Result};

pub struct InitArgs {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    ensure_directories()?;

    let env_file = env_file_path();

    if env_file.exists() && !args.force {
        println!("Config already exists at {}", env_file.display());
        println!("Use --force to overwrite.");
        return Ok(());
    }

    let client_id = value_or_prompt(args.client_id, "OAuth client ID")?;
    let client_secret = value_or_prompt(args.client_secret, "OAuth client secret")?;
    let redirect_uri = args
        .redirect_uri
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());

    let config = OAuthClientConfig {
        client_id,
        client_secret,
        redirect_uri,
    };
    std::fs::write(&env_file, config.to_env_file())?;

    println!("Config saved to {}", env_file.display());
    println!("Data directory: {}", data_dir().display());
    println!("Redirect URI:   {}", config.redirect_uri);
    println!("\nRegister this redirect URI for the client in the Google Cloud console.");

    Ok(())
}

fn value_or_prompt(value: Option<String>, label: &str) -> Result<String> {
    let value = match value {
        Some(v) => v,
        None => {
            print!("Enter your {}: ", label);
            io::stdout().flush()?;
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            input
        }
    };

    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(Error::Config(format!("{} is required", label)));
    }
    Ok(value)
}
