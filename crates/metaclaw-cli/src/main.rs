// MetaClaw CLI - Command-line interface for publishing to a MetaClaw registry

mod keystore;
pub mod metadata;
mod record;

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use record::ArtifactRecord;

/// MetaClaw - Skill & Capsule Signing Tool
#[derive(Parser)]
#[command(name = "metaclaw")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the signing key (defaults to ~/.metaclaw/keys)
    #[arg(long, global = true, env = "METACLAW_KEY_DIR", value_name = "DIR")]
    key_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the signing key (init, show)
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Sign an artifact record
    Sign {
        /// Path to the artifact record (JSON)
        path: PathBuf,

        /// Add metadata key=value pairs (can be specified multiple times)
        #[arg(short, long = "meta", value_name = "KEY=VALUE")]
        meta: Vec<String>,

        /// Print the signed record instead of writing <record>.signed.json
        #[arg(long)]
        dry_run: bool,
    },
    /// Verify the signature attached to an artifact record
    Verify {
        /// Path to the signed artifact record
        path: PathBuf,
    },
    /// Register an artifact record with a registry
    Push {
        /// Path to the artifact record
        path: PathBuf,

        /// Registry base URL
        #[arg(long, env = "METACLAW_REGISTRY", default_value = "http://localhost:8088")]
        registry: String,

        /// Admin bearer token
        #[arg(long, env = "REGISTRY_ADMIN_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Print the sha256 digest of a file in registry form
    Digest {
        /// Path to the file
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Generate a new signing key
    Init {
        /// Force overwrite existing key
        #[arg(short, long)]
        force: bool,
    },
    /// Show the public key and key id
    Show,
}

fn main() {
    let cli = Cli::parse();

    let result = key_dir(cli.key_dir).and_then(|dir| match cli.command {
        Commands::Key { action } => handle_key(&dir, action),
        Commands::Sign { path, meta, dry_run } => handle_sign(&dir, &path, &meta, dry_run),
        Commands::Verify { path } => handle_verify(&dir, &path),
        Commands::Push {
            path,
            registry,
            token,
        } => handle_push(&path, &registry, token.as_deref()),
        Commands::Digest { path } => handle_digest(&path),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn key_dir(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir),
        None => keystore::default_key_dir(),
    }
}

fn handle_key(dir: &Path, action: KeyAction) -> anyhow::Result<()> {
    match action {
        KeyAction::Init { force } => {
            let passphrase = keystore::read_passphrase(true)?;
            let info = keystore::init_key(dir, &passphrase, force)?;
            println!("Signing key initialized successfully!");
            println!();
            println!("Key ID:     {}", info.key_id);
            println!("Public key: {}", info.public_key);
            println!();
            println!("Your key files are stored in {}", dir.display());
            println!("Keep your passphrase safe - it cannot be recovered!");
            Ok(())
        }
        KeyAction::Show => {
            let info = keystore::load_key_info(dir)?;
            println!("Key ID:     {}", info.key_id);
            println!("Public key: {}", info.public_key);
            println!("Created:    {}", info.created_at);
            Ok(())
        }
    }
}

fn handle_sign(dir: &Path, path: &Path, meta: &[String], dry_run: bool) -> anyhow::Result<()> {
    let mut record = ArtifactRecord::load(path)?;
    record.metadata = metadata::merge_metadata(record.metadata.take(), meta)?;

    let info = keystore::load_key_info(dir)?;
    let passphrase = keystore::read_passphrase(false)?;
    let signing_key = keystore::load_signing_key(dir, &passphrase)?;

    let signature = metaclaw_crypto::sign_payload(&signing_key, &record.signature_payload())?;
    record.signature = Some(signature);

    let json = record.to_pretty_json()?;
    if dry_run {
        print!("{}", json);
        return Ok(());
    }

    let output_path = record::signed_path(path);
    std::fs::write(&output_path, &json)
        .map_err(|e| anyhow!("Failed to write '{}': {}", output_path.display(), e))?;

    println!("Signed record written to: {}", output_path.display());
    println!("Key ID: {}", info.key_id);
    Ok(())
}

fn handle_verify(dir: &Path, path: &Path) -> anyhow::Result<()> {
    use colored::Colorize;

    let record = ArtifactRecord::load(path)?;
    let signature = record
        .signature
        .as_ref()
        .ok_or_else(|| anyhow!("'{}' carries no signature", path.display()))?;

    match metaclaw_crypto::verify_payload(signature, &record.signature_payload()) {
        Ok(key_id) => {
            println!("{} {}", "✓".green().bold(), "Signature verified".green());
            println!();

            let key_indicator = match keystore::load_key_info(dir) {
                Ok(local) if local.key_id == key_id => "(Local Key)".cyan().to_string(),
                Ok(_) => "(External Key)".yellow().to_string(),
                Err(_) => "(No local key)".dimmed().to_string(),
            };

            println!("  Key ID:   {} {}", key_id, key_indicator);
            println!("  Artifact: {} {} {}", record.kind, record.name, record.version);
            println!("  Digest:   {}", record.digest);
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), "Signature verification failed".red());
            eprintln!();
            eprintln!("  Error: {}", e);
            Err(e.into())
        }
    }
}

fn handle_push(path: &Path, registry: &str, token: Option<&str>) -> anyhow::Result<()> {
    use colored::Colorize;

    let record = ArtifactRecord::load(path)?;
    let url = format!("{}/v1/artifacts", registry.trim_end_matches('/'));

    let mut request = ureq::post(&url);
    if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
        request = request.set("Authorization", &format!("Bearer {}", token));
    }

    let stored: serde_json::Value = match request.send_json(&record) {
        Ok(response) => response
            .into_json()
            .map_err(|e| anyhow!("Failed to read registry response: {}", e))?,
        Err(ureq::Error::Status(code, response)) => {
            let message = response
                .into_json::<serde_json::Value>()
                .ok()
                .and_then(|body| body.get("error").and_then(|v| v.as_str()).map(str::to_string))
                .unwrap_or_else(|| "no error message".to_string());
            return Err(anyhow!("Registry rejected artifact (HTTP {}): {}", code, message));
        }
        Err(e) => return Err(anyhow!("Failed to reach registry at {}: {}", url, e)),
    };

    println!("{} Artifact registered", "✓".green().bold());
    println!();
    println!("  Registry: {}", registry);
    println!("  Artifact: {} {} {}", record.kind, record.name, record.version);
    if let Some(created_at) = stored.get("createdAt").and_then(|v| v.as_str()) {
        println!("  Created:  {}", created_at);
    }
    if record.signature.is_none() {
        println!("  {}", "(unsigned)".dimmed());
    }
    Ok(())
}

fn handle_digest(path: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow!("Failed to read '{}': {}", path.display(), e))?;
    println!("{}", metaclaw_crypto::sha256_digest(&bytes));
    Ok(())
}
