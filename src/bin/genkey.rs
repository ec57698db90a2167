//! Session key generator.
//!
//! Copyright (C) 2026 Cookiebox contributors
//! SPDX-License-Identifier: AGPL-3.0-only
//!
//! Emits a freshly generated random secret as base64. The default length
//! doubles as a direct session key; longer outputs are usable as
//! passphrase secrets.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use clap::Parser;
use cookiebox::security::crypto::secretbox::KEY_BYTES;
use rand::RngCore;

#[derive(Parser)]
#[command(name = "genkey", about = "Generate a session encryption key")]
struct Args {
    /// Length of the secret in bytes.
    #[arg(short = 'l', long, default_value_t = KEY_BYTES)]
    length: usize,
}

fn main() {
    let args = Args::parse();

    if args.length < KEY_BYTES {
        eprintln!("secret must be at least {KEY_BYTES} bytes");
        std::process::exit(1);
    }

    let mut secret = vec![0u8; args.length];
    rand::rng().fill_bytes(&mut secret);

    println!("{}", STANDARD.encode(&secret));
}
