//! Command-line interface for encrypting and decrypting raw AES-128 block files.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use aes_accel::{run_batch, LoopbackAccelerator};
use aes_core::{
    apply_blocks_with, block_count, decrypt_block, encrypt_block, expand_key, tables_consistent,
    Aes128Key, BatchConfig, Direction, Error, BLOCK_SIZE,
};
use anyhow::{bail, ensure, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::{debug, info};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Default key of the block-file harness: bytes 01 through 10.
const HARNESS_KEY_HEX: &str = "0102030405060708090a0b0c0d0e0f10";

/// AES-128 ECB over raw block files.
#[derive(Parser)]
#[command(
    name = "aes128",
    version,
    author,
    about = "AES-128 ECB over raw 16-byte block files"
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Where the block transforms run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// The in-process cipher.
    Cpu,
    /// The software accelerator, reached through the offload contract.
    Loopback,
}

#[derive(Args)]
struct CipherArgs {
    /// Input file of concatenated 16-byte blocks.
    #[arg(long, value_name = "FILE")]
    input: PathBuf,
    /// Output path for the transformed blocks.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
    /// Number of blocks to process; defaults to the whole input.
    #[arg(long, value_name = "N")]
    blocks: Option<usize>,
    /// AES-128 key as 32 hex characters.
    #[arg(long, value_name = "HEX", env = "AES128_KEY_HEX", default_value = HARNESS_KEY_HEX)]
    key_hex: String,
    /// Worker threads (0 uses every available core).
    #[arg(long, default_value_t = 1)]
    workers: usize,
    /// Execution backend.
    #[arg(long, value_enum, default_value_t = Backend::Cpu)]
    backend: Backend,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a block file.
    Enc(CipherArgs),
    /// Decrypt a block file.
    Dec(CipherArgs),
    /// Print each block of a file as one hex line.
    Show {
        /// Input file of concatenated 16-byte blocks.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Number of blocks to print; defaults to the whole input.
        #[arg(long, value_name = "N")]
        blocks: Option<usize>,
    },
    /// Run the cipher self-checks.
    Check {
        /// Number of random blocks compared across backends.
        #[arg(long, default_value_t = 64)]
        samples: usize,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Encrypt and decrypt random blocks under a random key.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Enc(args) => cmd_cipher(Direction::Encrypt, &args),
        Commands::Dec(args) => cmd_cipher(Direction::Decrypt, &args),
        Commands::Show { input, blocks } => cmd_show(&input, blocks),
        Commands::Check { samples, seed } => cmd_check(samples, seed),
        Commands::Demo { seed } => cmd_demo(seed),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn cmd_cipher(direction: Direction, args: &CipherArgs) -> Result<()> {
    let key = parse_key_hex(&args.key_hex)?;
    let (mut data, blocks) = load_blocks(&args.input, args.blocks)?;
    info!(
        "{direction} {blocks} block(s) from {} via {:?}",
        args.input.display(),
        args.backend
    );
    transform(
        direction,
        &mut data,
        blocks,
        &key,
        batch_config(args.workers),
        args.backend,
    )?;
    fs::write(&args.output, &data)
        .with_context(|| format!("write {}", args.output.display()))?;
    Ok(())
}

fn cmd_show(input: &Path, blocks: Option<usize>) -> Result<()> {
    let (data, _) = load_blocks(input, blocks)?;
    for block in data.chunks_exact(BLOCK_SIZE) {
        println!("{}", hex::encode(block));
    }
    Ok(())
}

fn cmd_check(samples: usize, seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    run_checks(samples, &mut rng)?;
    println!("all checks passed ({samples} random blocks)");
    Ok(())
}

fn cmd_demo(seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut key_bytes = [0u8; 16];
    rng.fill_bytes(&mut key_bytes);
    let key = Aes128Key::from(key_bytes);

    let mut data = [0u8; 2 * BLOCK_SIZE];
    rng.fill_bytes(&mut data);
    let plaintext_hex = hex::encode(data);

    let config = BatchConfig::default();
    transform(Direction::Encrypt, &mut data, 2, &key, config, Backend::Cpu)?;
    let ciphertext_hex = hex::encode(data);
    transform(Direction::Decrypt, &mut data, 2, &key, config, Backend::Cpu)?;
    let decrypted_hex = hex::encode(data);

    println!("demo key: {}", hex::encode(key_bytes));
    println!("plaintext: {}", plaintext_hex);
    println!("ciphertext: {}", ciphertext_hex);
    println!("decrypted: {}", decrypted_hex);
    if decrypted_hex != plaintext_hex {
        bail!("demo roundtrip failed");
    }
    Ok(())
}

/// Runs `direction` over `blocks` blocks of `data` on the selected backend.
fn transform(
    direction: Direction,
    data: &mut [u8],
    blocks: usize,
    key: &Aes128Key,
    config: BatchConfig,
    backend: Backend,
) -> Result<()> {
    match backend {
        Backend::Cpu => {
            let schedule = expand_key(key);
            apply_blocks_with(direction, data, blocks, &schedule, &config)
                .with_context(|| format!("{direction} on cpu"))?;
        }
        Backend::Loopback => {
            let device = LoopbackAccelerator::with_config(config);
            run_batch(&device, direction, data, blocks, key)
                .with_context(|| format!("{direction} on loopback accelerator"))?;
        }
    }
    Ok(())
}

fn run_checks(samples: usize, rng: &mut impl RngCore) -> Result<()> {
    ensure!(tables_consistent(), "S-box tables are not mutual inverses");

    // FIPS-197 appendix C.1
    let nist_key = parse_key_hex("000102030405060708090a0b0c0d0e0f")?;
    let nist_plain = hex_block("00112233445566778899aabbccddeeff")?;
    let nist_cipher = hex_block("69c4e0d86a7b0430d8cdb78070b4c55a")?;
    let schedule = expand_key(&nist_key);
    ensure!(
        encrypt_block(&nist_plain, &schedule) == nist_cipher,
        "known-answer encryption mismatch"
    );
    ensure!(
        decrypt_block(&nist_cipher, &schedule) == nist_plain,
        "known-answer decryption mismatch"
    );
    debug!("known-answer vector ok");

    let harness = expand_key(&parse_key_hex(HARNESS_KEY_HEX)?);
    ensure!(
        decrypt_block(&encrypt_block(&nist_plain, &harness), &harness) == nist_plain,
        "harness key round trip failed"
    );

    let key = parse_key_hex(HARNESS_KEY_HEX)?;
    let mut data = vec![0u8; samples * BLOCK_SIZE];
    rng.fill_bytes(&mut data);
    let mut on_cpu = data.clone();
    let mut offloaded = data.clone();
    let config = BatchConfig::available();
    transform(Direction::Encrypt, &mut on_cpu, samples, &key, config, Backend::Cpu)?;
    transform(
        Direction::Encrypt,
        &mut offloaded,
        samples,
        &key,
        config,
        Backend::Loopback,
    )?;
    ensure!(on_cpu == offloaded, "cpu and loopback backends disagree");

    transform(Direction::Decrypt, &mut on_cpu, samples, &key, config, Backend::Cpu)?;
    ensure!(on_cpu == data, "batch round trip failed");
    debug!("{samples} random blocks agree across backends");
    Ok(())
}

/// Reads a block file, keeping the first `blocks` blocks when a count is given.
fn load_blocks(path: &Path, blocks: Option<usize>) -> Result<(Vec<u8>, usize)> {
    let mut data = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let blocks = match blocks {
        Some(n) => {
            let wanted = n.checked_mul(BLOCK_SIZE);
            match wanted {
                Some(wanted) if wanted <= data.len() => data.truncate(wanted),
                _ => {
                    return Err(Error::InvalidBufferLength {
                        len: data.len(),
                        blocks: n,
                    })
                    .with_context(|| format!("{} is too short", path.display()));
                }
            }
            n
        }
        None => block_count(data.len()).with_context(|| {
            format!("{} is not a whole number of 16-byte blocks", path.display())
        })?,
    };
    Ok((data, blocks))
}

fn batch_config(workers: usize) -> BatchConfig {
    if workers == 0 {
        BatchConfig::available()
    } else {
        BatchConfig::with_workers(workers)
    }
}

fn parse_key_hex(hex_str: &str) -> Result<Aes128Key> {
    let bytes = hex::decode(hex_str.trim()).context("decode key hex")?;
    Aes128Key::try_from(bytes.as_slice()).context("AES-128 key must be 32 hex characters")
}

fn hex_block(hex_str: &str) -> Result<[u8; BLOCK_SIZE]> {
    let bytes = hex::decode(hex_str).context("decode block hex")?;
    bytes
        .as_slice()
        .try_into()
        .context("block must be 32 hex characters")
}

fn seeded_rng(seed: Option<u64>) -> impl RngCore + CryptoRng {
    match seed {
        Some(value) => ChaCha20Rng::seed_from_u64(value),
        None => ChaCha20Rng::from_entropy(),
    }
}
