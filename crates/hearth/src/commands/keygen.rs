//! Keygen command - prints a fresh session key.

use anyhow::Result;
use clap::Args;

use hearth_config::{SESSION_KEY_ENV, encode_session_key};
use hearth_session::KEY_LEN;

use super::Context;

/// Arguments for the keygen command.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Print a shell `export` line instead of the bare key
    #[arg(long)]
    pub export: bool,
}

/// Run the keygen command.
pub fn run(args: KeygenArgs, ctx: &Context) -> Result<()> {
    let key = generate_key()?;
    if args.export {
        println!("export {}={}", SESSION_KEY_ENV, key);
    } else {
        println!("{}", key);
    }
    if ctx.verbose {
        eprintln!("Generated {} random bytes; set {} to use it", KEY_LEN, SESSION_KEY_ENV);
    }
    Ok(())
}

/// Generate a random session key, base64 encoded.
fn generate_key() -> Result<String> {
    let mut bytes = [0u8; KEY_LEN];
    hearth_session::fill_random(&mut bytes)?;
    Ok(encode_session_key(&bytes))
}
