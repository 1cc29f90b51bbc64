//! Generates the AES key and IV used to encrypt the persisted session.
//!
//! `ENCRYPTION_KEY` (32 bytes) and `ENCRYPTION_IV` (16 bytes) are read from
//! the environment or a `.env` file. Without them, deterministic keys
//! derived from the package name are used and a build warning is printed.

use dotenv::dotenv;
use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

fn write_bytes(file: &mut File, name: &str, value: &[u8]) -> io::Result<()> {
    let bytes: Vec<String> = value.iter().map(u8::to_string).collect();
    writeln!(
        file,
        "#[allow(unused)]\npub const APP_METADATA_{}: &[u8; {}] = &[{}];",
        name,
        value.len(),
        bytes.join(", ")
    )
}

/// Pads with `!` or truncates to exactly `len` bytes.
fn fit(mut value: String, len: usize) -> Vec<u8> {
    value.truncate(len);
    while value.len() < len {
        value.push('!');
    }
    value.into_bytes()
}

fn session_keys() -> (Vec<u8>, Vec<u8>) {
    if let (Ok(key), Ok(iv)) = (env::var("ENCRYPTION_KEY"), env::var("ENCRYPTION_IV")) {
        if key.len() != KEY_LEN {
            panic!("ENCRYPTION_KEY must be exactly {} bytes long, got {} bytes", KEY_LEN, key.len());
        }
        if iv.len() != IV_LEN {
            panic!("ENCRYPTION_IV must be exactly {} bytes long, got {} bytes", IV_LEN, iv.len());
        }
        return (key.into_bytes(), iv.into_bytes());
    }

    let package = env::var("CARGO_PKG_NAME").unwrap_or_else(|_| "taskly".to_string());
    println!("cargo:warning=ENCRYPTION_KEY or ENCRYPTION_IV not set, using default session keys.");
    println!("cargo:warning=Set both in the environment or a .env file for release builds.");
    (
        fit(format!("{}_session_encryption_key", package), KEY_LEN),
        fit(format!("{}_session_iv", package), IV_LEN),
    )
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-env-changed=ENCRYPTION_KEY");
    println!("cargo:rerun-if-env-changed=ENCRYPTION_IV");
    println!("cargo:rerun-if-changed=.env");

    let _ = dotenv();

    let out_dir = env::var("OUT_DIR").map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;
    let mut file = File::create(Path::new(&out_dir).join("app_metadata.rs"))?;

    let (key, iv) = session_keys();
    write_bytes(&mut file, "ENCRYPTION_KEY", &key)?;
    write_bytes(&mut file, "ENCRYPTION_IV", &iv)?;

    Ok(())
}
