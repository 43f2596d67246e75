//! # Generate Secret Key Utility
//!
//! Mints a secret-key elevation token for a specific `(login, email)`
//! pair. Only administrators run this, out-of-band; the resulting token
//! authorizes registration of one non-customer account and expires after
//! 30 minutes.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --package gen-secret-key --bin gen_secret_key -- <login> <email>
//! ```
//!
//! Requires `SECRET_KEY_SECRET` (and the other signing keys) in the
//! environment or a `.env` file. The signing key itself is never printed.

use lib_auth::SecretKeyService;
use lib_auth::token::SECRET_KEY_TTL_MINUTES;
use lib_core::Config;
use std::env;
use std::process;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut args = env::args().skip(1);
    let (login, email) = match (args.next(), args.next()) {
        (Some(login), Some(email)) => (login, email),
        _ => {
            eprintln!("usage: gen_secret_key <login> <email>");
            process::exit(2);
        }
    };

    let config = Config::from_env()?;
    config.validate()?;

    let service = SecretKeyService::new(config.secret_key_secret.clone());
    let token = service.generate(&login, &email)?;

    println!("Secret key for {} <{}>", login, email);
    println!("Valid for {} minutes, single identity only.", SECRET_KEY_TTL_MINUTES);
    println!();
    println!("{}", token);

    Ok(())
}
